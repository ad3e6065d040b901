use crate::Error;
use std::fmt;
use std::str::FromStr;

/// Every operation the API exposes under `/api/{name}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Operation {
    Login,
    VerifyAdmin,
    GetCompanyProfile,
    SaveCompanyProfile,
    GetSurveys,
    GetSurvey,
    SaveSurvey,
    DeleteSurvey,
    GetResponses,
    SubmitResponse,
    SendNotification,
    DeleteUser,
}

impl Operation {
    pub const ALL: [Operation; 12] = [
        Operation::Login,
        Operation::VerifyAdmin,
        Operation::GetCompanyProfile,
        Operation::SaveCompanyProfile,
        Operation::GetSurveys,
        Operation::GetSurvey,
        Operation::SaveSurvey,
        Operation::DeleteSurvey,
        Operation::GetResponses,
        Operation::SubmitResponse,
        Operation::SendNotification,
        Operation::DeleteUser,
    ];

    /// Wire name, as used in the request path.
    pub fn name(self) -> &'static str {
        match self {
            Operation::Login => "login",
            Operation::VerifyAdmin => "verifyAdmin",
            Operation::GetCompanyProfile => "getCompanyProfile",
            Operation::SaveCompanyProfile => "saveCompanyProfile",
            Operation::GetSurveys => "getSurveys",
            Operation::GetSurvey => "getSurvey",
            Operation::SaveSurvey => "saveSurvey",
            Operation::DeleteSurvey => "deleteSurvey",
            Operation::GetResponses => "getResponses",
            Operation::SubmitResponse => "submitResponse",
            Operation::SendNotification => "sendNotification",
            Operation::DeleteUser => "deleteUser",
        }
    }
}

impl FromStr for Operation {
    type Err = Error;

    /// Names are case-sensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Operation::ALL
            .into_iter()
            .find(|op| op.name() == s)
            .ok_or_else(|| Error::UnknownOperation(s.to_string()))
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

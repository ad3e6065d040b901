//! Typed operation payloads
//!
//! Every field is optional at the serde level. Handlers decide which ones are
//! required and answer with a failed status when they are missing, instead of
//! rejecting the request.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value as JsonValue;

use crate::db::Fields;

/// Decode a payload into its request type. Malformed payloads (wrong field
/// types) produce a message meant for a failed status.
pub fn parse<T: DeserializeOwned>(payload: JsonValue) -> Result<T, String> {
    serde_json::from_value(payload).map_err(|e| format!("invalid payload: {e}"))
}

/// Treats empty strings as missing.
pub fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// "companyId required", "companyId and surveyId required",
/// "email, surveyTitle and responseCount required".
pub fn required_message(fields: &[&str]) -> String {
    match fields {
        [] => "required fields missing".to_string(),
        [one] => format!("{one} required"),
        [init @ .., last] => format!("{} and {last} required", init.join(", ")),
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub company_id: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyAdminRequest {
    pub password: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyRequest {
    pub company_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveProfileRequest {
    pub company_id: Option<String>,
    pub profile_data: Option<Fields>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurveyRequest {
    pub company_id: Option<String>,
    pub survey_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveSurveyRequest {
    pub company_id: Option<String>,
    pub survey_id: Option<String>,
    pub data: Option<Fields>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitResponseRequest {
    pub company_id: Option<String>,
    pub survey_id: Option<String>,
    pub data: Option<Fields>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationRequest {
    pub email: Option<String>,
    pub survey_title: Option<String>,
    pub response_count: Option<u64>,
}

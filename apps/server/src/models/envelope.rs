//! Uniform result shapes returned by operations

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::db::Fields;

/// `{ "success": bool, "error"?: string }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Status {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Status {
    pub fn ok() -> Self {
        Self {
            success: true,
            error: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
        }
    }
}

/// Company profile as stored and returned.
///
/// The stored document is passed through as is, whatever its field types.
/// Only the well-known keys that are absent are filled with defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompanyProfile(pub Fields);

impl CompanyProfile {
    pub const NAME: &'static str = "name";
    pub const DESCRIPTION: &'static str = "description";
    pub const AVATAR_URL: &'static str = "avatarUrl";

    pub fn empty(avatar_url: &str) -> Self {
        Self(Fields::new()).with_defaults(avatar_url)
    }

    /// Insert defaults for `name`, `description` and `avatarUrl` where the
    /// key is missing. Present keys are kept, even when `null`.
    pub fn with_defaults(mut self, avatar_url: &str) -> Self {
        for (key, value) in [
            (Self::NAME, ""),
            (Self::DESCRIPTION, ""),
            (Self::AVATAR_URL, avatar_url),
        ] {
            self.0
                .entry(key)
                .or_insert_with(|| JsonValue::String(value.to_string()));
        }
        self
    }
}

/// What an operation hands back. The variant is fixed per operation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Envelope {
    Status(Status),
    Profile(CompanyProfile),
    Surveys(Vec<JsonValue>),
    /// Serialized as `null` when the survey does not exist.
    Survey(Option<JsonValue>),
    Responses(Vec<JsonValue>),
}

impl Envelope {
    pub fn ok() -> Self {
        Envelope::Status(Status::ok())
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Envelope::Status(Status::failure(error))
    }

    /// `false` only for failed status envelopes.
    pub fn is_success(&self) -> bool {
        match self {
            Envelope::Status(status) => status.success,
            _ => true,
        }
    }
}

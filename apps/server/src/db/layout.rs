//! Where companies, surveys and responses live in the document hierarchy.
//!
//! ```text
//! company_profiles/{companyId}
//! surveys_{companyId}/{surveyId}
//! surveys_{companyId}/{surveyId}/responses/{responseId}
//! ```

use super::path::{CollectionPath, DocumentPath};
use crate::{Error, Result};

pub const PROFILES_COLLECTION: &str = "company_profiles";
pub const RESPONSES_COLLECTION: &str = "responses";
const SURVEYS_PREFIX: &str = "surveys_";

pub fn profile(company_id: &str) -> Result<DocumentPath> {
    CollectionPath::root(PROFILES_COLLECTION)?.doc(company_id)
}

pub fn surveys(company_id: &str) -> Result<CollectionPath> {
    if company_id.is_empty() {
        return Err(Error::InvalidPath("empty company id".to_string()));
    }
    CollectionPath::root(format!("{SURVEYS_PREFIX}{company_id}"))
}

pub fn survey(company_id: &str, survey_id: &str) -> Result<DocumentPath> {
    surveys(company_id)?.doc(survey_id)
}

pub fn responses(company_id: &str, survey_id: &str) -> Result<CollectionPath> {
    survey(company_id, survey_id)?.collection(RESPONSES_COLLECTION)
}

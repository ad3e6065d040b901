//! Survey and response access

use chrono::Utc;
use serde_json::Value as JsonValue;
use std::sync::Arc;

use crate::{
    db::{layout, DocumentStore, Fields, OrderBy},
    Result,
};

/// Field carrying the creation time surveys are ordered by.
pub const CREATED_FIELD: &str = "created";

pub struct SurveyService {
    store: Arc<dyn DocumentStore>,
}

impl SurveyService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// All surveys of a company, newest first, each with its `id` merged in.
    pub async fn list_surveys(&self, company_id: &str) -> Result<Vec<JsonValue>> {
        let surveys = layout::surveys(company_id)?;
        let docs = self
            .store
            .list(&surveys, Some(&OrderBy::descending(CREATED_FIELD)))
            .await?;
        Ok(docs.into_iter().map(|d| d.into_json_with_id()).collect())
    }

    pub async fn get_survey(&self, company_id: &str, survey_id: &str) -> Result<Option<JsonValue>> {
        let path = layout::survey(company_id, survey_id)?;
        Ok(self.store.get(&path).await?.map(|d| d.into_json_with_id()))
    }

    /// Create (no id) or fully replace (id given) a survey. Returns its id.
    ///
    /// New surveys without a `created` field are stamped with the current
    /// time in epoch milliseconds so they take part in ordering.
    pub async fn save_survey(
        &self,
        company_id: &str,
        survey_id: Option<&str>,
        mut data: Fields,
    ) -> Result<String> {
        data.remove("id");
        match survey_id {
            Some(id) => {
                let path = layout::survey(company_id, id)?;
                self.store.set(&path, data).await?;
                tracing::debug!(company_id, survey_id = id, "Survey replaced");
                Ok(id.to_string())
            }
            None => {
                if !data.contains_key(CREATED_FIELD) {
                    data.insert(
                        CREATED_FIELD.to_string(),
                        JsonValue::from(Utc::now().timestamp_millis()),
                    );
                }
                let path = self.store.add(&layout::surveys(company_id)?, data).await?;
                tracing::debug!(company_id, survey_id = path.id(), "Survey created");
                Ok(path.id().to_string())
            }
        }
    }

    /// Response bodies of a survey, without ids.
    pub async fn list_responses(&self, company_id: &str, survey_id: &str) -> Result<Vec<JsonValue>> {
        let responses = layout::responses(company_id, survey_id)?;
        let docs = self.store.list(&responses, None).await?;
        Ok(docs.into_iter().map(|d| JsonValue::Object(d.data)).collect())
    }

    /// Append a response. The parent survey is not checked for existence.
    pub async fn submit_response(
        &self,
        company_id: &str,
        survey_id: &str,
        data: Fields,
    ) -> Result<String> {
        let responses = layout::responses(company_id, survey_id)?;
        let path = self.store.add(&responses, data).await?;
        Ok(path.id().to_string())
    }
}

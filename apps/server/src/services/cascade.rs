//! Cascade deletion of surveys and whole companies
//!
//! A hierarchical store does not remove sub-collections together with their
//! parent, so every survey deletion first removes its responses, then the
//! survey document. All responses of a survey go in one atomic batch: a
//! failure leaves the survey and every response in place.
//!
//! Company deletion folds the survey cascade over every survey and stops at
//! the first failure. Surveys processed before the failure are fully gone,
//! the rest are untouched, and the profile is kept.

use std::sync::Arc;

use crate::{
    db::{layout, DocumentPath, DocumentStore},
    Error, Result,
};

/// Outcome of one successful survey cascade.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SurveyDeletion {
    pub survey_id: String,
    pub responses_removed: usize,
}

/// Outcome of one successful company cascade.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompanyDeletion {
    pub company_id: String,
    pub surveys: Vec<SurveyDeletion>,
}

impl CompanyDeletion {
    pub fn responses_removed(&self) -> usize {
        self.surveys.iter().map(|s| s.responses_removed).sum()
    }
}

pub struct CascadeService {
    store: Arc<dyn DocumentStore>,
}

impl CascadeService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Remove a survey and every response under it.
    ///
    /// Deleting a survey that does not exist succeeds with nothing removed.
    pub async fn delete_survey(&self, company_id: &str, survey_id: &str) -> Result<SurveyDeletion> {
        let survey_path = layout::survey(company_id, survey_id)?;
        let responses = layout::responses(company_id, survey_id)?;

        let response_paths: Vec<DocumentPath> = self
            .store
            .list(&responses, None)
            .await?
            .into_iter()
            .map(|doc| doc.path)
            .collect();

        if !response_paths.is_empty() {
            self.store
                .batch_delete(&response_paths)
                .await
                .map_err(|e| {
                    tracing::warn!(
                        company_id,
                        survey_id,
                        responses = response_paths.len(),
                        error = %e,
                        "Response batch failed; survey kept"
                    );
                    e
                })?;
        }

        self.store.delete(&survey_path).await?;

        tracing::info!(
            company_id,
            survey_id,
            responses_removed = response_paths.len(),
            "Survey deleted"
        );

        Ok(SurveyDeletion {
            survey_id: survey_id.to_string(),
            responses_removed: response_paths.len(),
        })
    }

    /// Remove every survey of a company (with their responses), then its profile.
    ///
    /// Stops at the first survey that fails and returns
    /// [`Error::CascadeAborted`] naming the surveys already removed.
    pub async fn delete_company(&self, company_id: &str) -> Result<CompanyDeletion> {
        let profile_path = layout::profile(company_id)?;
        let surveys = layout::surveys(company_id)?;

        let survey_ids: Vec<String> = self
            .store
            .list(&surveys, None)
            .await?
            .into_iter()
            .map(|doc| doc.id().to_string())
            .collect();

        let mut completed: Vec<SurveyDeletion> = Vec::with_capacity(survey_ids.len());
        for survey_id in survey_ids {
            match self.delete_survey(company_id, &survey_id).await {
                Ok(deletion) => completed.push(deletion),
                Err(e) => {
                    let completed: Vec<String> =
                        completed.into_iter().map(|d| d.survey_id).collect();
                    tracing::error!(
                        company_id,
                        failed_survey = %survey_id,
                        completed = completed.len(),
                        error = %e,
                        "Company cascade aborted"
                    );
                    return Err(Error::CascadeAborted {
                        completed,
                        failed: survey_id,
                        reason: e.to_string(),
                    });
                }
            }
        }

        self.store.delete(&profile_path).await?;

        let deletion = CompanyDeletion {
            company_id: company_id.to_string(),
            surveys: completed,
        };
        tracing::info!(
            company_id,
            surveys_removed = deletion.surveys.len(),
            responses_removed = deletion.responses_removed(),
            "Company deleted"
        );
        Ok(deletion)
    }
}

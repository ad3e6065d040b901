//! Company profile access

use std::sync::Arc;

use crate::{
    db::{layout, DocumentStore, Fields},
    models::CompanyProfile,
    Result,
};

pub struct ProfileService {
    store: Arc<dyn DocumentStore>,
    default_avatar_url: String,
}

impl ProfileService {
    pub fn new(store: Arc<dyn DocumentStore>, default_avatar_url: impl Into<String>) -> Self {
        Self {
            store,
            default_avatar_url: default_avatar_url.into(),
        }
    }

    /// Profile shown for companies that never saved one.
    pub fn default_profile(&self) -> CompanyProfile {
        CompanyProfile::empty(&self.default_avatar_url)
    }

    /// Stored profile with defaults for missing keys, or `None` when the
    /// company has not saved one yet.
    pub async fn get_profile(&self, company_id: &str) -> Result<Option<CompanyProfile>> {
        let path = layout::profile(company_id)?;
        let profile = self
            .store
            .get(&path)
            .await?
            .map(|doc| CompanyProfile(doc.data).with_defaults(&self.default_avatar_url));
        Ok(profile)
    }

    /// Replace the whole profile document.
    pub async fn save_profile(&self, company_id: &str, profile: Fields) -> Result<()> {
        let path = layout::profile(company_id)?;
        self.store.set(&path, profile).await?;
        tracing::debug!(company_id, "Company profile saved");
        Ok(())
    }
}

//! Outbound notifications
//!
//! A notification is formatted here and handed to an external HTTP endpoint
//! (typically a mail relay webhook). Delivery is fire-and-forget: once the
//! endpoint answers, the notification counts as sent.

use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;

use crate::{config::NotificationConfig, Error, Result};

/// A "new responses" notification for one survey owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub to: String,
    pub from: String,
    pub subject: String,
    pub message: String,
    pub survey_title: String,
    pub response_count: u64,
}

impl Notification {
    pub fn new_responses(
        to: impl Into<String>,
        from: impl Into<String>,
        subject_prefix: &str,
        survey_title: &str,
        response_count: u64,
    ) -> Self {
        let message = if response_count == 1 {
            format!("A customer answered your survey \"{survey_title}\"")
        } else {
            format!("{response_count} customers answered your survey \"{survey_title}\"")
        };
        Self {
            to: to.into(),
            from: from.into(),
            subject: format!("{subject_prefix} - New response(s) on {survey_title}"),
            message,
            survey_title: survey_title.to_string(),
            response_count,
        }
    }
}

#[async_trait]
pub trait NotificationRelay: Send + Sync {
    async fn send(&self, notification: &Notification) -> Result<()>;
}

/// Relay POSTing the notification as JSON to a configured URL.
pub struct HttpNotificationRelay {
    client: reqwest::Client,
    endpoint_url: Option<String>,
}

impl HttpNotificationRelay {
    pub fn new(config: &NotificationConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(concat!("avaliare/", env!("CARGO_PKG_VERSION")))
            .build()?;
        if config.endpoint_url.is_none() {
            tracing::warn!("`notification.endpoint_url` is not set; notifications will fail");
        }
        Ok(Self {
            client,
            endpoint_url: config.endpoint_url.clone(),
        })
    }
}

#[async_trait]
impl NotificationRelay for HttpNotificationRelay {
    async fn send(&self, notification: &Notification) -> Result<()> {
        let endpoint = self
            .endpoint_url
            .as_deref()
            .ok_or_else(|| Error::Notification("notification endpoint not configured".into()))?;

        let response = self.client.post(endpoint).json(notification).send().await?;

        let status = response.status();
        if status.is_success() {
            tracing::debug!(
                survey_title = %notification.survey_title,
                response_count = notification.response_count,
                "Notification delivered"
            );
        } else {
            tracing::warn!(
                status = %status,
                survey_title = %notification.survey_title,
                "Notification endpoint answered with a non-success status"
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn singular_message_for_one_response() {
        let n = Notification::new_responses("a@b.c", "noreply@x", "Avaliare", "NPS", 1);
        assert_eq!(n.message, "A customer answered your survey \"NPS\"");
        assert_eq!(n.subject, "Avaliare - New response(s) on NPS");
    }

    #[test]
    fn plural_message_otherwise() {
        let n = Notification::new_responses("a@b.c", "noreply@x", "Avaliare", "NPS", 4);
        assert_eq!(n.message, "4 customers answered your survey \"NPS\"");
        let n = Notification::new_responses("a@b.c", "noreply@x", "Avaliare", "NPS", 0);
        assert_eq!(n.message, "0 customers answered your survey \"NPS\"");
    }

    #[test]
    fn serializes_camel_case_payload() {
        let n = Notification::new_responses("a@b.c", "noreply@x", "P", "T", 2);
        let v = serde_json::to_value(&n).unwrap();
        assert_eq!(v["to"], "a@b.c");
        assert_eq!(v["from"], "noreply@x");
        assert_eq!(v["surveyTitle"], "T");
        assert_eq!(v["responseCount"], 2);
    }

    #[tokio::test]
    async fn unconfigured_endpoint_fails() {
        let relay = HttpNotificationRelay::new(&NotificationConfig::default()).unwrap();
        let n = Notification::new_responses("a@b.c", "x", "P", "T", 1);
        let err = relay.send(&n).await.unwrap_err();
        assert!(err.to_string().contains("not configured"));
    }
}

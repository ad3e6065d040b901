//! Operation name → handler table

use async_trait::async_trait;
use serde_json::Value as JsonValue;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use crate::{
    models::{Envelope, Operation},
    services::handlers::OperationHandlers,
    Error, Result,
};

/// Something that can answer one operation.
///
/// A handler receives the raw JSON payload and validates it itself. Missing
/// fields are answered with a failed [`Envelope::Status`], not with `Err`;
/// `Err` is reserved for failures the handler could not turn into a status.
#[async_trait]
pub trait Handler: Send + Sync {
    async fn handle(&self, payload: JsonValue) -> Result<Envelope>;
}

/// Adapts an async closure into a [`Handler`].
struct FnHandler<F>(F);

#[async_trait]
impl<F, Fut> Handler for FnHandler<F>
where
    F: Fn(JsonValue) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Envelope>> + Send,
{
    async fn handle(&self, payload: JsonValue) -> Result<Envelope> {
        (self.0)(payload).await
    }
}

#[derive(Clone, Default)]
pub struct OperationRegistry {
    handlers: HashMap<Operation, Arc<dyn Handler>>,
}

impl OperationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `handler` to `operation`, replacing any previous binding.
    pub fn register(&mut self, operation: Operation, handler: Arc<dyn Handler>) -> &mut Self {
        if self.handlers.insert(operation, handler).is_some() {
            tracing::debug!(operation = %operation, "Replaced operation handler");
        }
        self
    }

    pub fn register_fn<F, Fut>(&mut self, operation: Operation, f: F) -> &mut Self
    where
        F: Fn(JsonValue) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Envelope>> + Send + 'static,
    {
        self.register(operation, Arc::new(FnHandler(f)))
    }

    pub fn get(&self, operation: Operation) -> Option<Arc<dyn Handler>> {
        self.handlers.get(&operation).cloned()
    }

    /// Look a wire name up. Names that are not operations, and operations
    /// without a handler, are both [`Error::UnknownOperation`].
    pub fn resolve(&self, name: &str) -> Result<(Operation, Arc<dyn Handler>)> {
        let operation: Operation = name.parse()?;
        let handler = self
            .get(operation)
            .ok_or_else(|| Error::UnknownOperation(name.to_string()))?;
        Ok((operation, handler))
    }

    /// Registered operations in declaration order.
    pub fn operations(&self) -> Vec<Operation> {
        let mut ops: Vec<Operation> = self.handlers.keys().copied().collect();
        ops.sort();
        ops
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Table binding every [`Operation`] to its handler.
    pub fn standard(handlers: Arc<OperationHandlers>) -> Self {
        macro_rules! bind {
            ($registry:ident, $op:expr, $method:ident) => {{
                let h = Arc::clone(&handlers);
                $registry.register_fn($op, move |payload| {
                    let h = Arc::clone(&h);
                    async move { h.$method(payload).await }
                });
            }};
        }

        let mut registry = Self::new();
        bind!(registry, Operation::Login, login);
        bind!(registry, Operation::VerifyAdmin, verify_admin);
        bind!(registry, Operation::GetCompanyProfile, get_company_profile);
        bind!(registry, Operation::SaveCompanyProfile, save_company_profile);
        bind!(registry, Operation::GetSurveys, get_surveys);
        bind!(registry, Operation::GetSurvey, get_survey);
        bind!(registry, Operation::SaveSurvey, save_survey);
        bind!(registry, Operation::DeleteSurvey, delete_survey);
        bind!(registry, Operation::GetResponses, get_responses);
        bind!(registry, Operation::SubmitResponse, submit_response);
        bind!(registry, Operation::SendNotification, send_notification);
        bind!(registry, Operation::DeleteUser, delete_user);
        registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_distinguishes_unknown_and_unregistered() {
        let mut registry = OperationRegistry::new();
        registry.register_fn(Operation::Login, |_| async { Ok::<_, Error>(Envelope::ok()) });

        assert!(registry.resolve("login").is_ok());
        assert!(matches!(
            registry.resolve("getSurveys"),
            Err(Error::UnknownOperation(name)) if name == "getSurveys"
        ));
        assert!(matches!(
            registry.resolve("nonexistentOp"),
            Err(Error::UnknownOperation(_))
        ));
    }

    #[tokio::test]
    async fn later_registration_replaces_earlier() {
        let mut registry = OperationRegistry::new();
        registry
            .register_fn(Operation::Login, |_| async { Ok::<_, Error>(Envelope::ok()) })
            .register_fn(Operation::Login, |_| async { Ok::<_, Error>(Envelope::failure("second")) });

        assert_eq!(registry.len(), 1);
        let (_, handler) = registry.resolve("login").unwrap();
        let out = handler.handle(JsonValue::Null).await.unwrap();
        assert_eq!(out, Envelope::failure("second"));
    }
}

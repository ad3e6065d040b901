//! Shared helpers for integration tests
//!
//! Every test app runs the real router on an in-memory store wrapped in a
//! [`FaultyStore`], so tests can inject store failures, and on a
//! [`RecordingRelay`] instead of the HTTP notification relay.

use async_trait::async_trait;
use avaliare::{
    api::create_router,
    config::Config,
    db::{
        layout, CollectionPath, Document, DocumentPath, DocumentStore, Fields,
        InMemoryDocumentStore, OrderBy,
    },
    notify::{Notification, NotificationRelay},
    state::AppState,
    Error, Result,
};
use axum::{
    body::{to_bytes, Body},
    http::{HeaderMap, Method, Request, StatusCode},
    Router,
};
use serde_json::Value as JsonValue;
use std::{
    future::Future,
    pin::Pin,
    sync::{
        atomic::{AtomicBool, AtomicUsize, Ordering},
        Arc, Mutex,
    },
};
use tower::ServiceExt;

pub type TestFuture = Pin<Box<dyn Future<Output = anyhow::Result<()>> + Send>>;

// ============================================================================
// Fault-injecting store
// ============================================================================

/// In-memory store that can be told to fail.
#[derive(Default)]
pub struct FaultyStore {
    pub inner: InMemoryDocumentStore,
    /// Writes touching a path starting with this prefix fail.
    fail_writes_under: Mutex<Option<String>>,
    /// Every read fails.
    fail_reads: AtomicBool,
    /// Number of batch deletes allowed to succeed before the rest fail.
    batch_budget: Mutex<Option<usize>>,
    pub batch_calls: AtomicUsize,
}

impl FaultyStore {
    pub fn fail_writes_under(&self, prefix: impl Into<String>) {
        *self.fail_writes_under.lock().unwrap() = Some(prefix.into());
    }

    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn fail_batches_after(&self, successful: usize) {
        *self.batch_budget.lock().unwrap() = Some(successful);
    }

    pub fn heal(&self) {
        *self.fail_writes_under.lock().unwrap() = None;
        *self.batch_budget.lock().unwrap() = None;
        self.fail_reads(false);
    }

    fn check_read(&self) -> Result<()> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(Error::Store("injected read failure".to_string()));
        }
        Ok(())
    }

    fn check_write(&self, path: &DocumentPath) -> Result<()> {
        let guard = self.fail_writes_under.lock().unwrap();
        if let Some(prefix) = guard.as_deref() {
            if path.as_string().starts_with(prefix) {
                return Err(Error::Store(format!("injected write failure at {path}")));
            }
        }
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for FaultyStore {
    async fn get(&self, path: &DocumentPath) -> Result<Option<Document>> {
        self.check_read()?;
        self.inner.get(path).await
    }

    async fn set(&self, path: &DocumentPath, data: Fields) -> Result<()> {
        self.check_write(path)?;
        self.inner.set(path, data).await
    }

    async fn add(&self, collection: &CollectionPath, data: Fields) -> Result<DocumentPath> {
        self.inner.add(collection, data).await
    }

    async fn delete(&self, path: &DocumentPath) -> Result<()> {
        self.check_write(path)?;
        self.inner.delete(path).await
    }

    async fn list(
        &self,
        collection: &CollectionPath,
        order_by: Option<&OrderBy>,
    ) -> Result<Vec<Document>> {
        self.check_read()?;
        self.inner.list(collection, order_by).await
    }

    async fn batch_delete(&self, paths: &[DocumentPath]) -> Result<()> {
        self.batch_calls.fetch_add(1, Ordering::SeqCst);
        {
            let mut budget = self.batch_budget.lock().unwrap();
            if let Some(remaining) = budget.as_mut() {
                if *remaining == 0 {
                    return Err(Error::Store("injected batch failure".to_string()));
                }
                *remaining -= 1;
            }
        }
        // All or nothing: refuse the whole batch if any member is poisoned.
        for path in paths {
            self.check_write(path)?;
        }
        self.inner.batch_delete(paths).await
    }

    fn backend_name(&self) -> &'static str {
        "faulty-memory"
    }
}

// ============================================================================
// Recording notification relay
// ============================================================================

#[derive(Default)]
pub struct RecordingRelay {
    pub sent: Mutex<Vec<Notification>>,
    pub fail: AtomicBool,
}

impl RecordingRelay {
    pub fn sent(&self) -> Vec<Notification> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl NotificationRelay for RecordingRelay {
    async fn send(&self, notification: &Notification) -> Result<()> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(Error::Notification("relay unreachable".to_string()));
        }
        self.sent.lock().unwrap().push(notification.clone());
        Ok(())
    }
}

// ============================================================================
// Test application
// ============================================================================

pub struct TestApp {
    pub state: AppState,
    pub router: Router,
    pub store: Arc<FaultyStore>,
    pub relay: Arc<RecordingRelay>,
}

impl TestApp {
    pub fn new(config: Config) -> Self {
        let store = Arc::new(FaultyStore::default());
        let relay = Arc::new(RecordingRelay::default());
        let state = AppState::with_components(config, store.clone(), relay.clone());
        let router = create_router(state.clone());
        Self {
            state,
            router,
            store,
            relay,
        }
    }

    pub async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<Vec<u8>>,
    ) -> anyhow::Result<(StatusCode, HeaderMap, Vec<u8>)> {
        self.request_with_extra_headers(method, path, body, &[])
            .await
    }

    pub async fn request_with_extra_headers(
        &self,
        method: Method,
        path: &str,
        body: Option<Vec<u8>>,
        headers: &[(&str, &str)],
    ) -> anyhow::Result<(StatusCode, HeaderMap, Vec<u8>)> {
        let mut builder = Request::builder().method(method).uri(path);
        if body.is_some() {
            builder = builder.header("content-type", "application/json");
        }
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        let request = builder.body(body.map(Body::from).unwrap_or_else(Body::empty))?;

        let response = self.router.clone().oneshot(request).await?;
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), usize::MAX).await?;
        Ok((status, headers, bytes.to_vec()))
    }

    /// `POST /api/{operation}` with a JSON payload; returns status and parsed body.
    pub async fn call(
        &self,
        operation: &str,
        payload: JsonValue,
    ) -> anyhow::Result<(StatusCode, JsonValue)> {
        let (status, _headers, body) = self
            .request(
                Method::POST,
                &format!("/api/{operation}"),
                Some(serde_json::to_vec(&payload)?),
            )
            .await?;
        let json = serde_json::from_slice(&body)?;
        Ok((status, json))
    }

    /// Like [`TestApp::call`] but insists on HTTP 200.
    pub async fn ok(&self, operation: &str, payload: JsonValue) -> anyhow::Result<JsonValue> {
        let (status, body) = self.call(operation, payload).await?;
        assert_status(status, StatusCode::OK, operation);
        Ok(body)
    }

    pub async fn survey_count(&self, company_id: &str) -> usize {
        self.store
            .inner
            .count(&layout::surveys(company_id).unwrap())
            .await
    }

    pub async fn response_count(&self, company_id: &str, survey_id: &str) -> usize {
        self.store
            .inner
            .count(&layout::responses(company_id, survey_id).unwrap())
            .await
    }

    pub async fn has_profile(&self, company_id: &str) -> bool {
        self.store
            .inner
            .get(&layout::profile(company_id).unwrap())
            .await
            .unwrap()
            .is_some()
    }
}

pub fn test_config() -> Config {
    let mut config = Config::in_memory();
    config.auth.login_password = Some("company-pass".to_string());
    config.auth.admin_password = Some("admin-pass".to_string());
    config
}

pub async fn with_test_app<F>(f: F) -> anyhow::Result<()>
where
    F: FnOnce(TestApp) -> TestFuture,
{
    with_test_app_with_config(|_| {}, f).await
}

pub async fn with_test_app_with_config<C, F>(configure: C, f: F) -> anyhow::Result<()>
where
    C: FnOnce(&mut Config),
    F: FnOnce(TestApp) -> TestFuture,
{
    let mut config = test_config();
    configure(&mut config);
    f(TestApp::new(config)).await
}

pub fn assert_status(actual: StatusCode, expected: StatusCode, context: &str) {
    assert_eq!(
        actual, expected,
        "unexpected status for {context}: got {actual}, expected {expected}"
    );
}

/// Seed a survey with `responses` responses through the API.
pub async fn seed_survey(
    app: &TestApp,
    company_id: &str,
    survey_id: &str,
    responses: usize,
) -> anyhow::Result<()> {
    let saved = app
        .ok(
            "saveSurvey",
            serde_json::json!({
                "companyId": company_id,
                "surveyId": survey_id,
                "data": { "title": format!("Survey {survey_id}") }
            }),
        )
        .await?;
    assert_eq!(saved["success"], true);

    for i in 0..responses {
        let submitted = app
            .ok(
                "submitResponse",
                serde_json::json!({
                    "companyId": company_id,
                    "surveyId": survey_id,
                    "data": { "score": i % 10 }
                }),
            )
            .await?;
        assert_eq!(submitted["success"], true);
    }
    Ok(())
}

//! Operation dispatch
//!
//! The dispatcher is the last line of defense: whatever a handler does, the
//! caller gets either an [`Envelope`] or one of two errors,
//! [`Error::UnknownOperation`] or [`Error::Internal`].

use futures::FutureExt;
use serde_json::Value as JsonValue;
use std::{
    any::Any,
    panic::AssertUnwindSafe,
    sync::Arc,
    time::{Duration, Instant},
};
use tracing::Instrument;

use crate::{models::Envelope, services::OperationRegistry, Error, Result};

pub struct Dispatcher {
    registry: Arc<OperationRegistry>,
}

impl Dispatcher {
    pub fn new(registry: Arc<OperationRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &OperationRegistry {
        &self.registry
    }

    pub async fn dispatch(&self, operation_name: &str, payload: JsonValue) -> Result<Envelope> {
        let (operation, handler) = match self.registry.resolve(operation_name) {
            Ok(found) => found,
            Err(e) => {
                tracing::debug!(operation = operation_name, "Unknown operation requested");
                return Err(e);
            }
        };

        let span = tracing::info_span!("dispatch", operation = %operation);
        async move {
            let started = Instant::now();
            let outcome = AssertUnwindSafe(handler.handle(payload))
                .catch_unwind()
                .await;
            let elapsed_ms = elapsed_millis(started.elapsed());

            match outcome {
                Ok(Ok(envelope)) => {
                    if envelope.is_success() {
                        tracing::debug!(elapsed_ms, "Operation completed");
                    } else {
                        tracing::info!(elapsed_ms, "Operation answered with a failed status");
                    }
                    Ok(envelope)
                }
                Ok(Err(e)) => {
                    tracing::error!(elapsed_ms, error = %e, "Operation failed");
                    Err(Error::Internal(e.to_string()))
                }
                Err(panic) => {
                    let message = panic_message(panic.as_ref());
                    tracing::error!(elapsed_ms, panic = %message, "Operation handler panicked");
                    Err(Error::Internal(message))
                }
            }
        }
        .instrument(span)
        .await
    }
}

/// Milliseconds in `elapsed`, saturating at `u64::MAX`.
fn elapsed_millis(elapsed: Duration) -> u64 {
    u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "handler panicked".to_string()
    }
}

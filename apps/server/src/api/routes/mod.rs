use crate::api::handlers::{operations, static_files};
use crate::state::AppState;
use axum::{
    routing::{post, MethodRouter},
    Router,
};

/// Named operations. Every POST under `/api/` reaches the dispatcher, which
/// answers unknown names; other methods on these paths are served as static
/// content.
pub fn operation_routes() -> Router<AppState> {
    // `*operation` does not match an empty suffix, hence the bare `/api/`.
    Router::new()
        .route("/api/", dispatch())
        .route("/api/*operation", dispatch())
}

fn dispatch() -> MethodRouter<AppState> {
    post(operations::dispatch_operation).fallback(static_files::serve_static)
}

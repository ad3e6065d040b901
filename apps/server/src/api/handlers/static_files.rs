//! Static content for every request that is not an API operation.

use crate::state::AppState;
use axum::{
    extract::{Request, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::path::Path;
use tower::ServiceExt;
use tower_http::services::{ServeDir, ServeFile};

/// Serve a file from `server.static_dir`, falling back to its `index.html`
/// so client-side routes resolve.
pub async fn serve_static(State(state): State<AppState>, req: Request) -> Response {
    let Some(dir) = state.config.server.static_dir.as_deref() else {
        return (StatusCode::NOT_FOUND, "Not found").into_response();
    };

    let index = Path::new(dir).join("index.html");
    let service = ServeDir::new(dir).fallback(ServeFile::new(index));
    match service.oneshot(req).await {
        Ok(response) => response.into_response(),
        Err(never) => match never {},
    }
}

//! HTTP surface: routes, shared state and the upload handler.

mod error;
mod handler;

pub use error::{ApiError, PipelineError, GENERIC_FAILURE};
pub use handler::{health, upload_audio};

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::config::PollConfig;
use crate::transcription::{Sleeper, TranscriptionProvider};

/// Read-only state shared by every request
#[derive(Clone)]
pub struct AppState {
    pub provider: Arc<dyn TranscriptionProvider>,
    pub sleeper: Arc<dyn Sleeper>,
    pub poll: PollConfig,
    pub upload_dir: PathBuf,
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/upload-audio", post(upload_audio))
        .route("/health", get(health))
        // Uploads are not size-limited.
        .layer(DefaultBodyLimit::disable())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

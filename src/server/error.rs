use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;
use tracing::error;

use crate::transcription::TranscriptionError;
use crate::upload::UploadError;

/// Message returned to callers for every failure
pub const GENERIC_FAILURE: &str = "Failed to process audio";

/// Anything that can go wrong while handling one upload
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Upload(#[from] UploadError),
    #[error(transparent)]
    Transcription(#[from] TranscriptionError),
}

/// Error response for the upload endpoint.
///
/// The detail is logged server-side; clients only ever see a generic 500.
#[derive(Debug)]
pub struct ApiError(pub PipelineError);

impl From<PipelineError> for ApiError {
    fn from(err: PipelineError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        error!("Failed to process audio: {}", self.0);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({ "error": GENERIC_FAILURE })),
        )
            .into_response()
    }
}

use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, State};
use axum::Json;
use tracing::{info, warn};

use super::error::{ApiError, PipelineError};
use super::AppState;
use crate::analytics::{build_report, AnalyticsResult};
use crate::transcription::CompletionPoller;
use crate::upload::{receive_audio, UploadError};

/// POST /upload-audio
///
/// A body that is not a multipart form fails like any other upload error.
pub async fn upload_audio(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<AnalyticsResult>, ApiError> {
    let mut multipart = multipart.map_err(|e| PipelineError::from(UploadError::from(e)))?;
    let report = process_upload(&state, &mut multipart).await?;
    Ok(Json(report))
}

/// Run one upload through the whole pipeline.
///
/// The stored upload is dropped, and so deleted, before this returns on every path.
async fn process_upload(state: &AppState, multipart: &mut Multipart) -> Result<AnalyticsResult, PipelineError> {
    let uploaded = receive_audio(multipart, &state.upload_dir).await?;

    let provider = state.provider.as_ref();
    let audio_url = provider.upload(uploaded.path()).await?;
    let job_id = provider.request_transcription(&audio_url).await?;

    let transcript = CompletionPoller::new(provider, state.sleeper.as_ref(), state.poll)
        .wait_for_completion(&job_id)
        .await?;

    let report = build_report(&transcript);

    if let Err(e) = uploaded.remove() {
        warn!("Failed to remove upload after processing: {}", e);
    }
    info!("Processed transcript {} ({} words)", job_id, report.total_words);

    Ok(report)
}

/// GET /health
pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

//! AssemblyAI HTTP client.
//!
//! Three calls make up a transcription: upload the raw audio, submit a
//! transcript job for the uploaded URL, then fetch the job until it is done.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info};

use super::transcript::RawTranscript;
use crate::config::AssemblyAiConfig;

#[derive(Error, Debug)]
pub enum TranscriptionError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to build HTTP client: {0}")]
    Client(String),
    #[error("Audio upload failed: {0}")]
    UploadFailed(String),
    #[error("Transcript submission failed: {0}")]
    SubmissionFailed(String),
    #[error("Transcript status check failed: {0}")]
    StatusCheckFailed(String),
    #[error("Transcription failed: {0}")]
    TranscriptionFailed(String),
    #[error("Unexpected transcript status: {0}")]
    UnexpectedStatus(String),
    #[error("Transcript not completed after {0} status checks")]
    PollLimitReached(u32),
}

/// A speech-to-text backend that works in upload / submit / fetch steps
#[async_trait]
pub trait TranscriptionProvider: Send + Sync {
    /// Upload a local audio file, returning the provider-side URL
    async fn upload(&self, file_path: &Path) -> Result<String, TranscriptionError>;

    /// Start a transcription job for an uploaded file, returning the job id
    async fn request_transcription(&self, audio_url: &str) -> Result<String, TranscriptionError>;

    /// Fetch the current state of a transcription job
    async fn fetch_transcript(&self, job_id: &str) -> Result<RawTranscript, TranscriptionError>;
}

/// Request body for `POST /v2/transcript`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TranscriptRequest {
    pub audio_url: String,
    /// Keep filler words such as "um" and "uh" in the transcript
    pub disfluencies: bool,
    pub punctuate: bool,
    /// Enable speaker diarization
    pub speaker_labels: bool,
}

impl TranscriptRequest {
    pub fn new(audio_url: impl Into<String>) -> Self {
        Self {
            audio_url: audio_url.into(),
            disfluencies: true,
            punctuate: true,
            speaker_labels: true,
        }
    }
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    upload_url: String,
}

#[derive(Debug, Deserialize)]
struct SubmitResponse {
    id: String,
}

pub struct AssemblyAiClient {
    http: reqwest::Client,
    base_url: String,
}

impl AssemblyAiClient {
    pub fn new(config: &AssemblyAiConfig) -> Result<Self, TranscriptionError> {
        let mut headers = HeaderMap::new();
        let mut auth = HeaderValue::from_str(&config.api_key)
            .map_err(|e| TranscriptionError::Client(format!("Invalid API key header: {}", e)))?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .connect_timeout(config.connect_timeout)
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| TranscriptionError::Client(e.to_string()))?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/v2/{}", self.base_url, path)
    }
}

/// Turn a non-success response into an error message with status and body
async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, String> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "Failed to read error response".to_string());
    Err(format!("HTTP {}: {}", status, body))
}

#[async_trait]
impl TranscriptionProvider for AssemblyAiClient {
    async fn upload(&self, file_path: &Path) -> Result<String, TranscriptionError> {
        let audio = tokio::fs::read(file_path).await?;
        info!("Uploading {} bytes of audio to AssemblyAI", audio.len());

        let response = self
            .http
            .post(self.url("upload"))
            .header(CONTENT_TYPE, "application/octet-stream")
            .body(audio)
            .send()
            .await
            .map_err(|e| TranscriptionError::UploadFailed(format!("HTTP request failed: {}", e)))?;

        let response = check_status(response)
            .await
            .map_err(TranscriptionError::UploadFailed)?;

        let body: UploadResponse = response
            .json()
            .await
            .map_err(|e| TranscriptionError::UploadFailed(format!("Invalid response: {}", e)))?;

        debug!("Audio uploaded to {}", body.upload_url);
        Ok(body.upload_url)
    }

    async fn request_transcription(&self, audio_url: &str) -> Result<String, TranscriptionError> {
        let response = self
            .http
            .post(self.url("transcript"))
            .json(&TranscriptRequest::new(audio_url))
            .send()
            .await
            .map_err(|e| TranscriptionError::SubmissionFailed(format!("HTTP request failed: {}", e)))?;

        let response = check_status(response)
            .await
            .map_err(TranscriptionError::SubmissionFailed)?;

        let body: SubmitResponse = response
            .json()
            .await
            .map_err(|e| TranscriptionError::SubmissionFailed(format!("Invalid response: {}", e)))?;

        info!("Submitted transcript job {}", body.id);
        Ok(body.id)
    }

    async fn fetch_transcript(&self, job_id: &str) -> Result<RawTranscript, TranscriptionError> {
        let response = self
            .http
            .get(self.url(&format!("transcript/{}", job_id)))
            .send()
            .await
            .map_err(|e| TranscriptionError::StatusCheckFailed(format!("HTTP request failed: {}", e)))?;

        let response = check_status(response)
            .await
            .map_err(TranscriptionError::StatusCheckFailed)?;

        response
            .json()
            .await
            .map_err(|e| TranscriptionError::StatusCheckFailed(format!("Invalid response: {}", e)))
    }
}

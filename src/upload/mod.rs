//! Receives the uploaded audio file from a multipart form.
//!
//! The file is streamed into a named temporary file under the upload
//! directory. The file is removed when the returned [`UploadedFile`] is
//! dropped, whichever way the request ends.

use axum::extract::multipart::{Field, MultipartError};
use axum::extract::multipart::MultipartRejection;
use axum::extract::Multipart;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

/// Multipart field that carries the audio
pub const AUDIO_FIELD: &str = "audio";

#[derive(Error, Debug)]
pub enum UploadError {
    #[error("No file provided in field 'audio'")]
    NoFileProvided,
    #[error("Request is not a multipart form: {0}")]
    NotMultipart(#[from] MultipartRejection),
    #[error("Malformed multipart body: {0}")]
    Multipart(#[from] MultipartError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// An uploaded audio file living in the upload directory
#[derive(Debug)]
pub struct UploadedFile {
    file: NamedTempFile,
    /// Original filename sent by the client, if any
    pub original_name: Option<String>,
    /// Bytes written
    pub size: u64,
}

impl UploadedFile {
    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Delete the file now instead of waiting for drop
    pub fn remove(self) -> std::io::Result<()> {
        let path: PathBuf = self.file.path().to_path_buf();
        self.file.close()?;
        debug!("Removed upload {:?}", path);
        Ok(())
    }
}

/// Pull the `audio` file out of the form and store it under `upload_dir`.
///
/// Only a file part counts: an `audio` field without a filename is skipped,
/// as are other fields and any repeated `audio` file.
pub async fn receive_audio(multipart: &mut Multipart, upload_dir: &Path) -> Result<UploadedFile, UploadError> {
    let mut uploaded: Option<UploadedFile> = None;

    while let Some(field) = multipart.next_field().await? {
        if uploaded.is_some() || field.name() != Some(AUDIO_FIELD) || field.file_name().is_none() {
            debug!("Skipping multipart field {:?}", field.name());
            continue;
        }
        uploaded = Some(store_field(field, upload_dir).await?);
    }

    let uploaded = uploaded.ok_or(UploadError::NoFileProvided)?;
    info!(
        "Received upload {:?} ({} bytes) at {:?}",
        uploaded.original_name.as_deref().unwrap_or("<unnamed>"),
        uploaded.size,
        uploaded.path()
    );
    Ok(uploaded)
}

async fn store_field(mut field: Field<'_>, upload_dir: &Path) -> Result<UploadedFile, UploadError> {
    tokio::fs::create_dir_all(upload_dir).await?;

    let original_name = field.file_name().map(|n| n.to_string());
    let file = tempfile::Builder::new()
        .prefix("audio-")
        .tempfile_in(upload_dir)?;

    let mut writer = tokio::fs::File::from_std(file.reopen()?);
    let mut size: u64 = 0;
    while let Some(chunk) = field.chunk().await? {
        writer.write_all(&chunk).await?;
        size += chunk.len() as u64;
    }
    writer.flush().await?;

    Ok(UploadedFile {
        file,
        original_name,
        size,
    })
}

//! Waits for a transcript job to reach a terminal status.

use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, info, warn};

use super::client::{TranscriptionError, TranscriptionProvider};
use super::transcript::{RawTranscript, TranscriptStatus};
use crate::config::PollConfig;

/// Suspends the current task between status checks
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// Sleeps on the tokio timer
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

pub struct CompletionPoller<'a> {
    provider: &'a dyn TranscriptionProvider,
    sleeper: &'a dyn Sleeper,
    config: PollConfig,
}

impl<'a> CompletionPoller<'a> {
    pub fn new(provider: &'a dyn TranscriptionProvider, sleeper: &'a dyn Sleeper, config: PollConfig) -> Self {
        Self {
            provider,
            sleeper,
            config,
        }
    }

    /// Poll `job_id` until it completes or fails.
    ///
    /// `queued` and `processing` wait one interval and check again; with no
    /// `max_attempts` configured this never gives up on its own.
    pub async fn wait_for_completion(&self, job_id: &str) -> Result<RawTranscript, TranscriptionError> {
        let mut attempts: u32 = 0;

        loop {
            let transcript = self.provider.fetch_transcript(job_id).await?;
            attempts += 1;

            match transcript.status {
                TranscriptStatus::Completed => {
                    info!("Transcript {} completed after {} status checks", job_id, attempts);
                    return Ok(transcript);
                }
                TranscriptStatus::Error => {
                    let message = transcript
                        .error
                        .unwrap_or_else(|| "no error message from provider".to_string());
                    warn!("Transcript {} failed: {}", job_id, message);
                    return Err(TranscriptionError::TranscriptionFailed(message));
                }
                TranscriptStatus::Unknown => {
                    return Err(TranscriptionError::UnexpectedStatus(format!(
                        "transcript {} reported an unrecognised status",
                        job_id
                    )));
                }
                TranscriptStatus::Queued | TranscriptStatus::Processing => {
                    debug!("Transcript {} is {} (check {})", job_id, transcript.status, attempts);
                }
            }

            if let Some(max) = self.config.max_attempts {
                if attempts >= max {
                    return Err(TranscriptionError::PollLimitReached(max));
                }
            }

            self.sleeper.sleep(self.config.interval).await;
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::path::Path;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Records requested waits instead of sleeping
    #[derive(Default)]
    pub(crate) struct RecordingSleeper {
        pub waits: Mutex<Vec<Duration>>,
    }

    #[async_trait]
    impl Sleeper for RecordingSleeper {
        async fn sleep(&self, duration: Duration) {
            self.waits.lock().unwrap().push(duration);
        }
    }

    /// Replays a fixed sequence of transcript states
    struct ScriptedProvider {
        script: Vec<RawTranscript>,
        fetches: AtomicUsize,
    }

    impl ScriptedProvider {
        fn new(script: Vec<RawTranscript>) -> Self {
            Self {
                script,
                fetches: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl TranscriptionProvider for ScriptedProvider {
        async fn upload(&self, _file_path: &Path) -> Result<String, TranscriptionError> {
            unreachable!("poller never uploads")
        }

        async fn request_transcription(&self, _audio_url: &str) -> Result<String, TranscriptionError> {
            unreachable!("poller never submits")
        }

        async fn fetch_transcript(&self, _job_id: &str) -> Result<RawTranscript, TranscriptionError> {
            let i = self.fetches.fetch_add(1, Ordering::SeqCst);
            let last = self.script.len() - 1;
            Ok(self.script[i.min(last)].clone())
        }
    }

    pub(crate) fn transcript(status: TranscriptStatus) -> RawTranscript {
        RawTranscript {
            id: "job-1".to_string(),
            status,
            text: None,
            words: Vec::new(),
            utterances: None,
            audio_duration: None,
            error: None,
        }
    }

    #[tokio::test]
    async fn test_queued_processing_completed() {
        let mut done = transcript(TranscriptStatus::Completed);
        done.text = Some("hello".to_string());
        let provider = ScriptedProvider::new(vec![
            transcript(TranscriptStatus::Queued),
            transcript(TranscriptStatus::Processing),
            done,
        ]);
        let sleeper = RecordingSleeper::default();

        let result = CompletionPoller::new(&provider, &sleeper, PollConfig::default())
            .wait_for_completion("job-1")
            .await
            .unwrap();

        assert_eq!(result.status, TranscriptStatus::Completed);
        assert_eq!(result.text.as_deref(), Some("hello"));
        assert_eq!(provider.fetches.load(Ordering::SeqCst), 3);
        assert_eq!(
            *sleeper.waits.lock().unwrap(),
            vec![Duration::from_secs(3), Duration::from_secs(3)]
        );
    }

    #[tokio::test]
    async fn test_completed_on_first_check_does_not_wait() {
        let provider = ScriptedProvider::new(vec![transcript(TranscriptStatus::Completed)]);
        let sleeper = RecordingSleeper::default();

        CompletionPoller::new(&provider, &sleeper, PollConfig::default())
            .wait_for_completion("job-1")
            .await
            .unwrap();

        assert!(sleeper.waits.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_error_status_carries_provider_message() {
        let mut failed = transcript(TranscriptStatus::Error);
        failed.error = Some("Audio file could not be decoded".to_string());
        let provider = ScriptedProvider::new(vec![transcript(TranscriptStatus::Processing), failed]);
        let sleeper = RecordingSleeper::default();

        let err = CompletionPoller::new(&provider, &sleeper, PollConfig::default())
            .wait_for_completion("job-1")
            .await
            .unwrap_err();

        match err {
            TranscriptionError::TranscriptionFailed(msg) => {
                assert_eq!(msg, "Audio file could not be decoded");
            }
            other => panic!("expected TranscriptionFailed, got {:?}", other),
        }
        assert_eq!(sleeper.waits.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_unknown_status_fails() {
        let provider = ScriptedProvider::new(vec![transcript(TranscriptStatus::Unknown)]);
        let sleeper = RecordingSleeper::default();

        let err = CompletionPoller::new(&provider, &sleeper, PollConfig::default())
            .wait_for_completion("job-1")
            .await
            .unwrap_err();

        assert!(matches!(err, TranscriptionError::UnexpectedStatus(_)));
    }

    #[tokio::test]
    async fn test_max_attempts() {
        let provider = ScriptedProvider::new(vec![transcript(TranscriptStatus::Processing)]);
        let sleeper = RecordingSleeper::default();
        let config = PollConfig {
            interval: Duration::from_millis(10),
            max_attempts: Some(4),
        };

        let err = CompletionPoller::new(&provider, &sleeper, config)
            .wait_for_completion("job-1")
            .await
            .unwrap_err();

        assert!(matches!(err, TranscriptionError::PollLimitReached(4)));
        assert_eq!(provider.fetches.load(Ordering::SeqCst), 4);
        assert_eq!(sleeper.waits.lock().unwrap().len(), 3);
    }
}

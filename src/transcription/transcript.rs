//! Transcript payloads returned by the AssemblyAI API.
//!
//! Only the fields the analytics need are modelled; anything else in the
//! response is ignored during deserialization.

use serde::Deserialize;

/// Job status reported by the provider
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TranscriptStatus {
    Queued,
    Processing,
    Completed,
    Error,
    /// Any status string this service does not know about
    #[serde(other)]
    Unknown,
}

impl TranscriptStatus {
    /// Whether polling should stop at this status
    pub fn is_terminal(&self) -> bool {
        !matches!(self, TranscriptStatus::Queued | TranscriptStatus::Processing)
    }
}

impl std::fmt::Display for TranscriptStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TranscriptStatus::Queued => write!(f, "queued"),
            TranscriptStatus::Processing => write!(f, "processing"),
            TranscriptStatus::Completed => write!(f, "completed"),
            TranscriptStatus::Error => write!(f, "error"),
            TranscriptStatus::Unknown => write!(f, "unknown"),
        }
    }
}

/// A single recognised word
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Word {
    /// The word text
    pub text: String,
    /// Start time in milliseconds
    pub start: u64,
    /// End time in milliseconds
    pub end: u64,
    /// Confidence score (0.0 - 1.0), null when the provider has none
    #[serde(default)]
    pub confidence: Option<f64>,
    /// Speaker id when diarization is enabled
    #[serde(default)]
    pub speaker: Option<String>,
}

/// A diarized speaker turn
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Utterance {
    /// Raw speaker id as assigned by the provider
    pub speaker: String,
    pub text: String,
    /// Start time in milliseconds
    pub start: u64,
    /// End time in milliseconds
    pub end: u64,
    pub confidence: f64,
}

/// Transcript job as returned by `GET /v2/transcript/{id}`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawTranscript {
    pub id: String,
    pub status: TranscriptStatus,
    /// Full transcript text
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub words: Vec<Word>,
    #[serde(default)]
    pub utterances: Option<Vec<Utterance>>,
    /// Audio duration in seconds
    #[serde(default)]
    pub audio_duration: Option<f64>,
    /// Provider error message when `status` is `error`
    #[serde(default)]
    pub error: Option<String>,
}

impl RawTranscript {
    /// Utterances, treating a missing list like an empty one
    pub fn utterances(&self) -> &[Utterance] {
        self.utterances.as_deref().unwrap_or_default()
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<Word>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<Vec<Word>>::deserialize(deserializer)?.unwrap_or_default())
}

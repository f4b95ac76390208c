//! Transcription via the AssemblyAI HTTP API.
//!
//! The client uploads audio and submits jobs; the poller waits for a job to
//! finish and hands back the raw transcript.

pub mod client;
pub mod poller;
pub mod transcript;

pub use client::{AssemblyAiClient, TranscriptionError, TranscriptionProvider};
pub use poller::{CompletionPoller, Sleeper, TokioSleeper};
pub use transcript::{RawTranscript, TranscriptStatus, Utterance, Word};

//! Derives speaking analytics from a completed transcript.
//!
//! Every step is a plain function over the transcript so each rule can be
//! checked on its own.

use tracing::info;

use super::report::{round2, AnalyticsResult, Hesitation, Pause, SpeakerInfo, SpeakerSegment};
use crate::transcription::{RawTranscript, Utterance, Word};

/// Filler words counted as hesitations (compared lowercased)
pub const HESITATION_WORDS: [&str; 3] = ["uh", "um", "ah"];

const MS_PER_MINUTE: f64 = 60_000.0;

/// Milliseconds to minutes, rounded to two decimals
pub fn ms_to_minutes(ms: u64) -> f64 {
    round2(ms as f64 / MS_PER_MINUTE)
}

/// Words per minute over the whole recording, rounded to two decimals.
///
/// Returns `None` when the duration is missing, zero or negative.
pub fn words_per_minute(word_count: usize, audio_duration_secs: Option<f64>) -> Option<f64> {
    let duration = audio_duration_secs.filter(|d| d.is_finite() && *d > 0.0)?;
    let minutes = duration / 60.0;
    Some(round2(word_count as f64 / minutes))
}

/// Words without a confidence score.
///
/// The provider leaves confidence null on tokens it did not decode as speech,
/// which is what gets reported as a pause here.
pub fn pauses(words: &[Word]) -> Vec<Pause> {
    words
        .iter()
        .filter(|w| w.confidence.is_none())
        .map(|w| Pause {
            start: ms_to_minutes(w.start),
            end: ms_to_minutes(w.end),
        })
        .collect()
}

pub fn is_hesitation(text: &str) -> bool {
    let lower = text.to_lowercase();
    HESITATION_WORDS.contains(&lower.as_str())
}

/// Filler words, in transcript order
pub fn hesitations(words: &[Word]) -> Vec<Hesitation> {
    words
        .iter()
        .filter(|w| is_hesitation(&w.text))
        .map(|w| Hesitation {
            text: w.text.clone(),
            start: ms_to_minutes(w.start),
            end: ms_to_minutes(w.end),
        })
        .collect()
}

/// Display label for the speaker at `index` in first-appearance order:
/// 0 -> "Speaker A", 25 -> "Speaker Z", 26 -> "Speaker AA".
pub fn speaker_label(index: usize) -> String {
    let mut letters = Vec::new();
    let mut n = index + 1;
    while n > 0 {
        n -= 1;
        letters.push((b'A' + (n % 26) as u8) as char);
        n /= 26;
    }
    letters.reverse();
    format!("Speaker {}", letters.into_iter().collect::<String>())
}

/// Raw speaker ids mapped to display labels, in order of first appearance
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpeakerLabelMap {
    speakers: Vec<SpeakerInfo>,
}

impl SpeakerLabelMap {
    pub fn from_utterances(utterances: &[Utterance]) -> Self {
        let mut speakers: Vec<SpeakerInfo> = Vec::new();

        for utterance in utterances {
            if speakers.iter().any(|s| s.speaker_id == utterance.speaker) {
                continue;
            }
            speakers.push(SpeakerInfo {
                speaker_id: utterance.speaker.clone(),
                speaker_label: speaker_label(speakers.len()),
            });
        }

        Self { speakers }
    }

    pub fn label_for(&self, speaker_id: &str) -> Option<&str> {
        self.speakers
            .iter()
            .find(|s| s.speaker_id == speaker_id)
            .map(|s| s.speaker_label.as_str())
    }

    pub fn len(&self) -> usize {
        self.speakers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.speakers.is_empty()
    }

    pub fn into_speakers(self) -> Vec<SpeakerInfo> {
        self.speakers
    }
}

/// One segment per utterance, labelled through `labels`
pub fn speaker_segments(utterances: &[Utterance], labels: &SpeakerLabelMap) -> Vec<SpeakerSegment> {
    utterances
        .iter()
        .map(|u| SpeakerSegment {
            speaker: labels.label_for(&u.speaker).unwrap_or_default().to_string(),
            speaker_id: u.speaker.clone(),
            text: u.text.clone(),
            start: ms_to_minutes(u.start),
            end: ms_to_minutes(u.end),
            confidence: u.confidence,
        })
        .collect()
}

/// Assemble the full report for a completed transcript
pub fn build_report(transcript: &RawTranscript) -> AnalyticsResult {
    let words = &transcript.words;
    let utterances = transcript.utterances();

    let labels = SpeakerLabelMap::from_utterances(utterances);
    let speaker_segments = speaker_segments(utterances, &labels);

    let result = AnalyticsResult {
        wpm: words_per_minute(words.len(), transcript.audio_duration),
        total_words: words.len(),
        speaker_count: labels.len(),
        speakers: labels.into_speakers(),
        speaker_segments,
        pauses: pauses(words),
        hesitations: hesitations(words),
        full_text: transcript.text.clone().unwrap_or_default(),
    };

    info!(
        "Built report for transcript {}: {} words, {} speakers, {} pauses, {} hesitations",
        transcript.id,
        result.total_words,
        result.speaker_count,
        result.pauses.len(),
        result.hesitations.len()
    );

    result
}

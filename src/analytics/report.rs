//! Response shapes for the speech analytics report.
//!
//! Rates and timestamps go out as fixed two-decimal strings (`"1.00"`), the
//! format clients of this endpoint already parse. Values are rounded once with
//! [`round2`], so half-way values round away from zero (0.015 -> "0.02").

use serde::{Serialize, Serializer};

/// Round to two decimal places, half-way values away from zero
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn fixed2<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format!("{:.2}", value))
}

fn fixed2_opt<S: Serializer>(value: &Option<f64>, serializer: S) -> Result<S::Ok, S::Error> {
    match value {
        Some(v) => fixed2(v, serializer),
        None => serializer.serialize_none(),
    }
}

/// A raw speaker id and the display label assigned to it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpeakerInfo {
    pub speaker_id: String,
    pub speaker_label: String,
}

/// One speaker turn, times in minutes
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpeakerSegment {
    /// Display label, e.g. "Speaker A"
    pub speaker: String,
    pub speaker_id: String,
    pub text: String,
    #[serde(serialize_with = "fixed2")]
    pub start: f64,
    #[serde(serialize_with = "fixed2")]
    pub end: f64,
    pub confidence: f64,
}

/// A word the provider returned without a confidence score
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Pause {
    #[serde(serialize_with = "fixed2")]
    pub start: f64,
    #[serde(serialize_with = "fixed2")]
    pub end: f64,
}

/// A filler word ("uh", "um", "ah")
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Hesitation {
    pub text: String,
    #[serde(serialize_with = "fixed2")]
    pub start: f64,
    #[serde(serialize_with = "fixed2")]
    pub end: f64,
}

/// The full analytics report for one upload
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalyticsResult {
    /// Words per minute; null when the audio duration is unknown or zero
    #[serde(serialize_with = "fixed2_opt")]
    pub wpm: Option<f64>,
    pub total_words: usize,
    pub speaker_count: usize,
    pub speakers: Vec<SpeakerInfo>,
    pub speaker_segments: Vec<SpeakerSegment>,
    pub pauses: Vec<Pause>,
    pub hesitations: Vec<Hesitation>,
    pub full_text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round2() {
        assert_eq!(round2(1.0), 1.0);
        assert_eq!(round2(0.008333), 0.01);
        assert_eq!(round2(142.857142), 142.86);
        assert_eq!(round2(2.0 / 3.0), 0.67);
    }

    #[test]
    fn test_fixed_two_decimal_output() {
        let pause = Pause { start: 0.0, end: 1.5 };
        assert_eq!(
            serde_json::to_value(&pause).unwrap(),
            serde_json::json!({"start": "0.00", "end": "1.50"})
        );
    }

    #[test]
    fn test_missing_wpm_is_null() {
        let result = AnalyticsResult {
            wpm: None,
            total_words: 0,
            speaker_count: 0,
            speakers: Vec::new(),
            speaker_segments: Vec::new(),
            pauses: Vec::new(),
            hesitations: Vec::new(),
            full_text: String::new(),
        };

        let json = serde_json::to_value(&result).unwrap();
        assert!(json["wpm"].is_null());
    }
}

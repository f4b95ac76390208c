//! Speaking analytics derived from a completed transcript.

pub mod formatter;
pub mod report;

pub use formatter::{build_report, SpeakerLabelMap};
pub use report::{AnalyticsResult, Hesitation, Pause, SpeakerInfo, SpeakerSegment};

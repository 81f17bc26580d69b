//! Parsers for the text reports emitted by external measurement tools.
//!
//! Both parsers are pure functions over the captured report text, which
//! keeps the process-spawning boundary out of the unit tests.

pub mod massif;
pub mod speed;

pub use massif::{parse_peak_snapshot, PeakSnapshot};
pub use speed::{parse_speed_report, SpeedRun};

// src/lib.rs
// Public library surface for the binaries and integration tests.

pub mod clock;
pub mod config;
pub mod date_extract;
pub mod error;
pub mod resolve;
pub mod record;

// Polling loop and its collaborators
pub mod poll;
pub mod scrape;
pub mod ocr;
pub mod notify;

pub mod telemetry;

pub use crate::clock::{Clock, FixedClock, SystemClock};
pub use crate::date_extract::{DateExtractor, DateResolution};
pub use crate::poll::{NotificationStatus, PollOutcome, PollState, PollingConfig, PollingController};
pub use crate::record::MenuRecord;
pub use crate::resolve::{CandidateOrigin, SourceResolver, TextCandidate};

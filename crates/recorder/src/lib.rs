//! Recording engine for internet radio streams.
//!
//! A session records one stream URL into a target directory for a fixed
//! wall-clock duration. Dropped connections do not end the session: the
//! controller reconnects and keeps recording against the remaining time
//! budget until the deadline passes. Playlist references (`.m3u`) are
//! resolved to a direct stream URL before the first attempt, and the
//! server's content type decides the output file extension.

pub mod classify;
pub mod config;
pub mod error;
pub mod resolve;
pub mod session;

mod attempt;
mod filename;

pub use attempt::{AttemptEnd, AttemptOutcome};
pub use classify::{Classified, MediaKind, classify};
pub use config::RecorderConfig;
pub use error::RecordError;
pub use session::{ReconnectPolicy, RecordingRequest, SessionSummary, record};

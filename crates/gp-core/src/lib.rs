//! Core domain logic for gitpulse.
//!
//! This crate contains the fundamental types and logic for:
//! - History scanning: turning `git log --name-status` output into raw changes
//! - Event building: author normalization and path exclusion
//! - Output: the timestamp-sorted JSONL event stream

pub mod builder;
pub mod event;
pub mod history;
pub mod output;
pub mod types;

pub use builder::{AuthorMap, EventBuilder, ExclusionRules, MissingAuthors};
pub use event::{Event, EventLine, RawChange};
pub use history::{
    HISTORY_LOG_SEPARATOR, HistoryLogScanner, MalformedRecord, history_log_format, scan,
};
pub use output::{OutputError, write_events, write_to};
pub use types::{ProjectName, RepoId, TimeBasis, ValidationError};

//! File-touch events extracted from repository history.

use serde::Serialize;

use crate::types::ProjectName;

/// A single changed path of a commit, as read from the history log.
///
/// The path has its status prefix and quoting removed; the author is exactly
/// what git printed (usually an email address).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawChange {
    pub path: String,
    /// Unix epoch milliseconds, whole seconds only.
    pub timestamp_ms: i64,
    pub author: String,
}

impl RawChange {
    pub fn new(path: impl Into<String>, timestamp_ms: i64, author: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            timestamp_ms,
            author: author.into(),
        }
    }
}

/// "File touched by author at time" within a configured project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    /// The project the source repository belongs to.
    pub project: ProjectName,
    /// Repository-relative file path.
    pub path: String,
    /// Unix epoch milliseconds.
    pub timestamp_ms: i64,
    /// Canonical author identity.
    pub author: String,
}

impl Event {
    /// Returns the serialized form written to the event stream.
    pub fn to_line(&self) -> EventLine<'_> {
        EventLine {
            ts: self.timestamp_ms,
            project: self.project.as_str(),
            author: &self.author,
        }
    }
}

/// One line of the output stream.
#[derive(Debug, Serialize)]
pub struct EventLine<'a> {
    pub ts: i64,
    pub project: &'a str,
    pub author: &'a str,
}

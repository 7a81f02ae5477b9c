//! Parsing of `git log --name-status` output into raw changes.
//!
//! The scanner relies on the exact format produced by [`history_log_format`]:
//!
//! ```text
//! ------------------------------------------------------------------------
//! rabc1234 | dev@example.com | 2021-01-02 03:04:05 +0000 (Sat, 2 Jan 2021 03:04:05 +0000) | x lines
//! Changed paths:
//! M	src/main.rs
//! A	"file with spaces.txt"
//!
//! ------------------------------------------------------------------------
//! ...
//! ```
//!
//! Each record opens with a separator line, followed by a revision line, a
//! `Changed paths:` header and one line per touched file. The file list ends
//! at the first blank line. Anything else between records is ignored.

use chrono::{DateTime, Local, NaiveDateTime, TimeZone};
use thiserror::Error;

use crate::event::RawChange;
use crate::types::TimeBasis;

/// Line that opens every commit record (72 dashes).
pub const HISTORY_LOG_SEPARATOR: &str =
    "------------------------------------------------------------------------";

/// Field separator within the revision line.
const FIELD_SEPARATOR: &str = " | ";

const DATE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Returns the `--pretty=format:` string the scanner expects.
pub fn history_log_format() -> String {
    format!("%n{HISTORY_LOG_SEPARATOR}%nr%h | %ae | %ai (%aD) | x lines%nChanged paths:")
}

/// Why a single commit record was skipped.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MalformedRecord {
    /// The revision line did not contain revision, author and date.
    #[error("revision line has {found} field(s), expected at least 3: {line:?}")]
    MissingFields { found: usize, line: String },

    /// The date field could not be parsed.
    #[error("malformed date: {value:?}")]
    BadDate { value: String },

    /// The date falls into a local time gap (e.g. a DST transition).
    #[error("nonexistent local time: {value:?}")]
    NonexistentLocalTime { value: String },

    /// The date resolves to an instant before 1970-01-01T00:00:00Z.
    #[error("date before the Unix epoch: {value:?}")]
    BeforeEpoch { value: String },
}

/// Author and time shared by all changed paths of one commit.
#[derive(Debug)]
struct Commit {
    author: String,
    timestamp_ms: i64,
}

#[derive(Debug)]
enum State {
    SeekingSeparator,
    ReadingRevisionLine,
    SkippingChangedPathsHeader(Commit),
    ReadingChangePaths(Commit),
    Done,
}

/// Lazy, single-pass scanner over history log text.
///
/// Created by [`scan`]. Yields one [`RawChange`] per changed path. Malformed
/// records are logged and skipped; a missing or blank revision line right
/// after a separator ends the scan (see [`HistoryLogScanner::ended_early`]).
#[derive(Debug)]
pub struct HistoryLogScanner<'a> {
    lines: std::str::SplitInclusive<'a, char>,
    state: State,
    time_basis: TimeBasis,
    malformed: usize,
    ended_early: bool,
}

/// Starts scanning `text`, interpreting commit times with `time_basis`.
pub fn scan(text: &str, time_basis: TimeBasis) -> HistoryLogScanner<'_> {
    HistoryLogScanner {
        lines: text.split_inclusive('\n'),
        state: State::SeekingSeparator,
        time_basis,
        malformed: 0,
        ended_early: false,
    }
}

impl HistoryLogScanner<'_> {
    /// Number of records skipped so far because they could not be parsed.
    pub const fn malformed_records(&self) -> usize {
        self.malformed
    }

    /// Whether the scan stopped at a missing or blank revision line.
    pub const fn ended_early(&self) -> bool {
        self.ended_early
    }

    fn parse_revision_line(&self, line: &str) -> Result<Commit, MalformedRecord> {
        let line = trim_line_terminator(line);
        let fields: Vec<&str> = line.split(FIELD_SEPARATOR).collect();
        if fields.len() < 3 {
            return Err(MalformedRecord::MissingFields {
                found: fields.len(),
                line: line.to_string(),
            });
        }

        let seconds = parse_commit_time(fields[2], self.time_basis, &Local)?;
        Ok(Commit {
            author: fields[1].to_string(),
            timestamp_ms: seconds * 1000,
        })
    }
}

impl Iterator for HistoryLogScanner<'_> {
    type Item = RawChange;

    fn next(&mut self) -> Option<RawChange> {
        loop {
            match std::mem::replace(&mut self.state, State::Done) {
                State::SeekingSeparator => {
                    let line = self.lines.next()?;
                    self.state = if line.starts_with(HISTORY_LOG_SEPARATOR) {
                        State::ReadingRevisionLine
                    } else {
                        State::SeekingSeparator
                    };
                }
                State::ReadingRevisionLine => match self.lines.next() {
                    Some(line) if !is_blank(line) => match self.parse_revision_line(line) {
                        Ok(commit) => self.state = State::SkippingChangedPathsHeader(commit),
                        Err(reason) => {
                            tracing::warn!(%reason, "skipping malformed history record");
                            self.malformed += 1;
                            self.state = State::SeekingSeparator;
                        }
                    },
                    _ => {
                        tracing::debug!("history ended before revision line");
                        self.ended_early = true;
                        return None;
                    }
                },
                State::SkippingChangedPathsHeader(commit) => {
                    self.lines.next()?;
                    self.state = State::ReadingChangePaths(commit);
                }
                State::ReadingChangePaths(commit) => match self.lines.next() {
                    Some(line) if !is_blank(line) => {
                        let change = RawChange::new(
                            change_path(line),
                            commit.timestamp_ms,
                            commit.author.clone(),
                        );
                        self.state = State::ReadingChangePaths(commit);
                        return Some(change);
                    }
                    Some(_) => self.state = State::SeekingSeparator,
                    None => return None,
                },
                State::Done => return None,
            }
        }
    }
}

/// Whether a line is shorter than two characters, terminator included.
fn is_blank(line: &str) -> bool {
    match line.strip_suffix('\n') {
        Some(content) => content.strip_suffix('\r').unwrap_or(content).is_empty(),
        None => line.chars().nth(1).is_none(),
    }
}

fn trim_line_terminator(line: &str) -> &str {
    line.trim_end_matches(['\n', '\r'])
}

/// Drops the two-character status prefix and git's quoting.
fn change_path(line: &str) -> String {
    let content = trim_line_terminator(line);
    let path = content
        .char_indices()
        .nth(2)
        .map_or("", |(idx, _)| &content[idx..]);
    path.replace('"', "")
}

/// Parses the `%ai` field (`YYYY-MM-DD HH:MM:SS +ZZZZ (...)`) to epoch seconds.
///
/// `local_zone` is only consulted for [`TimeBasis::Local`].
fn parse_commit_time<Tz: TimeZone>(
    field: &str,
    time_basis: TimeBasis,
    local_zone: &Tz,
) -> Result<i64, MalformedRecord> {
    let mut tokens = field.split_whitespace();
    let (Some(date), Some(time)) = (tokens.next(), tokens.next()) else {
        return Err(MalformedRecord::BadDate {
            value: field.to_string(),
        });
    };
    let value = format!("{date} {time}");
    let bad_date = || MalformedRecord::BadDate {
        value: value.clone(),
    };

    let naive = NaiveDateTime::parse_from_str(&value, DATE_TIME_FORMAT).map_err(|_| bad_date())?;

    let seconds = match time_basis {
        TimeBasis::Utc => naive.and_utc().timestamp(),
        TimeBasis::Local => local_zone
            .from_local_datetime(&naive)
            .earliest()
            .map(|dt| dt.timestamp())
            .ok_or_else(|| MalformedRecord::NonexistentLocalTime {
                value: value.clone(),
            })?,
        TimeBasis::AuthorOffset => {
            let offset = tokens.next().ok_or_else(bad_date)?;
            DateTime::parse_from_str(
                &format!("{value} {offset}"),
                &format!("{DATE_TIME_FORMAT} %z"),
            )
            .map(|dt| dt.timestamp())
            .map_err(|_| MalformedRecord::BadDate {
                value: format!("{value} {offset}"),
            })?
        }
    };

    if seconds < 0 {
        return Err(MalformedRecord::BeforeEpoch { value });
    }
    Ok(seconds)
}

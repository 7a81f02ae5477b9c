//! Writing the sorted event stream as JSONL.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::event::Event;

/// Errors while writing the event stream.
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to write event stream: {0}")]
    Stream(#[from] io::Error),
    #[error("failed to serialize event: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Sorts events by timestamp (stable, so ties keep encounter order).
pub fn sort_events(events: &mut [Event]) {
    events.sort_by_key(|event| event.timestamp_ms);
}

/// Sorts `events` and writes them to `writer`, one JSON object per line.
///
/// Returns the number of events written.
pub fn write_to<W: Write>(writer: W, mut events: Vec<Event>) -> Result<usize, OutputError> {
    sort_events(&mut events);

    let mut writer = BufWriter::new(writer);
    for event in &events {
        serde_json::to_writer(&mut writer, &event.to_line())?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;

    Ok(events.len())
}

/// Sorts `events` and writes them to `path`, replacing any existing file.
pub fn write_events(path: &Path, events: Vec<Event>) -> Result<usize, OutputError> {
    let io_error = |source| OutputError::Io {
        path: path.to_path_buf(),
        source,
    };

    let file = File::create(path).map_err(io_error)?;
    match write_to(file, events) {
        Err(OutputError::Stream(source)) => Err(io_error(source)),
        result => result,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use insta::assert_snapshot;

    use crate::types::ProjectName;

    fn event(project: &str, ts: i64, author: &str) -> Event {
        Event {
            project: ProjectName::new(project).unwrap(),
            path: format!("src/{ts}.rs"),
            timestamp_ms: ts,
            author: author.to_string(),
        }
    }

    fn timestamps(output: &str) -> Vec<i64> {
        output
            .lines()
            .map(|line| {
                let value: serde_json::Value = serde_json::from_str(line).unwrap();
                value["ts"].as_i64().unwrap()
            })
            .collect()
    }

    #[test]
    fn output_is_sorted_by_timestamp() {
        let events = vec![
            event("compiler", 300, "Alice"),
            event("website", 100, "Bob"),
            event("compiler", 200, "Alice"),
        ];

        let mut buf = Vec::new();
        let written = write_to(&mut buf, events).unwrap();
        let output = String::from_utf8(buf).unwrap();

        assert_eq!(written, 3);
        assert_eq!(timestamps(&output), vec![100, 200, 300]);
    }

    #[test]
    fn ties_keep_encounter_order() {
        let events = vec![
            event("a", 200, "first"),
            event("b", 100, "early"),
            event("c", 200, "second"),
            event("d", 200, "third"),
        ];

        let mut buf = Vec::new();
        write_to(&mut buf, events).unwrap();
        let output = String::from_utf8(buf).unwrap();

        assert_snapshot!(output, @r#"
        {"ts":100,"project":"b","author":"early"}
        {"ts":200,"project":"a","author":"first"}
        {"ts":200,"project":"c","author":"second"}
        {"ts":200,"project":"d","author":"third"}
        "#);
    }

    #[test]
    fn empty_input_writes_nothing() {
        let mut buf = Vec::new();
        assert_eq!(write_to(&mut buf, Vec::new()).unwrap(), 0);
        assert!(buf.is_empty());
    }

    #[test]
    fn write_events_overwrites_existing_file() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("events.stream");
        std::fs::write(&path, "stale content\nmore stale content\n").unwrap();

        let written = write_events(&path, vec![event("compiler", 5000, "Alice")]).unwrap();

        assert_eq!(written, 1);
        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            content,
            "{\"ts\":5000,\"project\":\"compiler\",\"author\":\"Alice\"}\n"
        );
    }

    #[test]
    fn write_events_reports_unwritable_destination() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("missing-dir").join("events.stream");

        let err = write_events(&path, vec![event("compiler", 1, "Alice")]).unwrap_err();

        assert!(matches!(err, OutputError::Io { .. }));
        assert!(err.to_string().contains("missing-dir"));
    }
}

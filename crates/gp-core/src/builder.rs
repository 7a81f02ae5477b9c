//! Turning raw changes into events: author normalization and path exclusion.

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use crate::event::{Event, RawChange};
use crate::types::ProjectName;

/// Maps raw author identifiers (as printed by git) to canonical identities.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuthorMap(HashMap<String, String>);

impl AuthorMap {
    pub fn canonical(&self, raw: &str) -> Option<&str> {
        self.0.get(raw).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for AuthorMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Path substrings whose events are dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExclusionRules(Vec<String>);

impl ExclusionRules {
    /// Whether any rule occurs within `path`.
    pub fn excludes(&self, path: &str) -> bool {
        self.0.iter().any(|rule| path.contains(rule.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for ExclusionRules {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

/// Raw author identifiers seen without a canonical mapping, kept sorted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MissingAuthors(BTreeSet<String>);

impl MissingAuthors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, raw: &str) {
        if !self.0.contains(raw) {
            self.0.insert(raw.to_string());
        }
    }

    pub fn contains(&self, raw: &str) -> bool {
        self.0.contains(raw)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

/// Builds events from raw changes using the configured author map and
/// exclusion rules.
#[derive(Debug, Clone, Copy)]
pub struct EventBuilder<'a> {
    authors: &'a AuthorMap,
    exclusions: &'a ExclusionRules,
}

impl<'a> EventBuilder<'a> {
    pub const fn new(authors: &'a AuthorMap, exclusions: &'a ExclusionRules) -> Self {
        Self {
            authors,
            exclusions,
        }
    }

    /// Builds the event for `raw`, or `None` if its path is excluded.
    ///
    /// Authors without a mapping keep their raw identifier and are recorded in
    /// `missing`, whether or not the path ends up excluded.
    pub fn build(
        &self,
        raw: RawChange,
        project: &ProjectName,
        missing: &mut MissingAuthors,
    ) -> Option<Event> {
        let author = if let Some(canonical) = self.authors.canonical(&raw.author) {
            canonical.to_string()
        } else {
            missing.record(&raw.author);
            raw.author
        };

        if self.exclusions.excludes(&raw.path) {
            tracing::trace!(path = %raw.path, "excluded path");
            return None;
        }

        Some(Event {
            project: project.clone(),
            path: raw.path,
            timestamp_ms: raw.timestamp_ms,
            author,
        })
    }
}

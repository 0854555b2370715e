use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub type DocId = String;

/// Direction of a user keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum KeywordKind {
    Positive,
    Negative,
}

impl KeywordKind {
    pub fn opposite(self) -> Self {
        match self {
            KeywordKind::Positive => KeywordKind::Negative,
            KeywordKind::Negative => KeywordKind::Positive,
        }
    }

    /// Path segment used by the keyword endpoints.
    pub fn as_path(self) -> &'static str {
        match self {
            KeywordKind::Positive => "POSITIVE",
            KeywordKind::Negative => "NEGATIVE",
        }
    }
}

impl fmt::Display for KeywordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_path())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {what}: {value}")]
pub struct ParseNameError {
    what: &'static str,
    value: String,
}

impl ParseNameError {
    pub(crate) fn new(what: &'static str, value: &str) -> Self {
        Self {
            what,
            value: value.to_string(),
        }
    }
}

impl FromStr for KeywordKind {
    type Err = ParseNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "positive" | "pos" | "+" => Ok(KeywordKind::Positive),
            "negative" | "neg" | "-" => Ok(KeywordKind::Negative),
            _ => Err(ParseNameError::new("keyword kind", s)),
        }
    }
}

/// Visible keep/discard marker of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum ClassificationStatus {
    #[default]
    Unknown,
    Keep,
    Discard,
}

impl ClassificationStatus {
    /// Movement into the kept feed caused by switching to this status.
    pub fn kept_sign(self) -> i32 {
        match self {
            ClassificationStatus::Keep => 1,
            ClassificationStatus::Discard => -1,
            ClassificationStatus::Unknown => 0,
        }
    }
}

/// Author-level decision attached by the server's evaluation, used when no
/// user keyword applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FallbackMarker {
    Keep,
    Discard,
}

/// Keywords compared case-insensitively; the first spelling seen is kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeywordSet {
    entries: BTreeMap<String, String>,
}

impl KeywordSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if the keyword was not present yet.
    pub fn insert(&mut self, keyword: &str) -> bool {
        let key = fold(keyword);
        if self.entries.contains_key(&key) {
            return false;
        }
        self.entries.insert(key, keyword.to_string());
        true
    }

    /// Returns true if the keyword was present.
    pub fn remove(&mut self, keyword: &str) -> bool {
        self.entries.remove(&fold(keyword)).is_some()
    }

    pub fn contains(&self, keyword: &str) -> bool {
        self.entries.contains_key(&fold(keyword))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.values().map(String::as_str)
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.entries.values().cloned().collect()
    }
}

impl<S: AsRef<str>> FromIterator<S> for KeywordSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = KeywordSet::new();
        for keyword in iter {
            set.insert(keyword.as_ref());
        }
        set
    }
}

fn fold(keyword: &str) -> String {
    keyword.to_lowercase()
}

/// A materialized document in a content region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub id: DocId,
    /// Rendered markup as received from the server.
    pub html: String,
    /// Text keywords are matched against.
    pub text: String,
    pub positive: KeywordSet,
    pub negative: KeywordSet,
    pub fallback: Option<FallbackMarker>,
    pub status: ClassificationStatus,
}

impl Document {
    pub fn new(id: impl Into<DocId>, html: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            html: html.into(),
            text: text.into(),
            positive: KeywordSet::new(),
            negative: KeywordSet::new(),
            fallback: None,
            status: ClassificationStatus::Unknown,
        }
    }

    pub fn with_fallback(mut self, fallback: FallbackMarker) -> Self {
        self.fallback = Some(fallback);
        self
    }

    pub fn with_status(mut self, status: ClassificationStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_keyword(mut self, kind: KeywordKind, keyword: &str) -> Self {
        self.keywords_mut(kind).insert(keyword);
        self
    }

    pub fn keywords(&self, kind: KeywordKind) -> &KeywordSet {
        match kind {
            KeywordKind::Positive => &self.positive,
            KeywordKind::Negative => &self.negative,
        }
    }

    pub fn keywords_mut(&mut self, kind: KeywordKind) -> &mut KeywordSet {
        match kind {
            KeywordKind::Positive => &mut self.positive,
            KeywordKind::Negative => &mut self.negative,
        }
    }

    /// Keywords that explain the current status: positive ones win.
    pub fn deciding_keywords(&self) -> Vec<String> {
        if !self.positive.is_empty() {
            self.positive.to_vec()
        } else {
            self.negative.to_vec()
        }
    }
}

//! Keep/discard classification of materialized documents.
//!
//! The precedence used here must agree with the server, which classifies the
//! documents that have not been fetched yet. The default order is: positive
//! keyword, negative keyword, fallback keep marker, fallback discard marker.

use engine_logging::{engine_debug, engine_warn};
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

use crate::{ClassificationStatus, Document, FallbackMarker, KeywordKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rule {
    PositiveKeyword,
    NegativeKeyword,
    FallbackKeep,
    FallbackDiscard,
}

impl Rule {
    fn evaluate(self, doc: &Document) -> Option<ClassificationStatus> {
        match self {
            Rule::PositiveKeyword if !doc.positive.is_empty() => Some(ClassificationStatus::Keep),
            Rule::NegativeKeyword if !doc.negative.is_empty() => {
                Some(ClassificationStatus::Discard)
            }
            Rule::FallbackKeep if doc.fallback == Some(FallbackMarker::Keep) => {
                Some(ClassificationStatus::Keep)
            }
            Rule::FallbackDiscard if doc.fallback == Some(FallbackMarker::Discard) => {
                Some(ClassificationStatus::Discard)
            }
            _ => None,
        }
    }
}

/// Ordered rules; the first one that applies decides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Precedence {
    rules: Vec<Rule>,
}

impl Precedence {
    pub fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }
}

impl Default for Precedence {
    fn default() -> Self {
        Self::new(vec![
            Rule::PositiveKeyword,
            Rule::NegativeKeyword,
            Rule::FallbackKeep,
            Rule::FallbackDiscard,
        ])
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum KeywordError {
    #[error("keyword is empty")]
    Empty,
    #[error("invalid keyword pattern: {0}")]
    Pattern(String),
}

/// Case-insensitive literal match of a keyword in document text, anchored on
/// word boundaries at the ends that are word characters.
#[derive(Debug, Clone)]
pub struct KeywordPattern {
    regex: Regex,
}

impl KeywordPattern {
    pub fn new(keyword: &str) -> Result<Self, KeywordError> {
        let (Some(first), Some(last)) = (keyword.chars().next(), keyword.chars().last()) else {
            return Err(KeywordError::Empty);
        };
        let mut pattern = String::with_capacity(keyword.len() + 8);
        if is_word_char(first) {
            pattern.push_str(r"\b");
        }
        pattern.push_str(&regex::escape(keyword));
        if is_word_char(last) {
            pattern.push_str(r"\b");
        }
        let regex = RegexBuilder::new(&pattern)
            .case_insensitive(true)
            .build()
            .map_err(|err| KeywordError::Pattern(err.to_string()))?;
        Ok(Self { regex })
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }

    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Outcome of one keyword add/remove pass. Each document counts at most once,
/// from its status before the call to its status after it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Reclassification {
    /// Documents whose visible status changed.
    pub changed: usize,
    /// Net movement into the kept feed: +1 per document now kept, -1 per
    /// document now discarded.
    pub kept_delta: i32,
}

impl Reclassification {
    pub fn is_empty(&self) -> bool {
        self.changed == 0
    }

    fn record(&mut self, after: ClassificationStatus) {
        self.changed += 1;
        self.kept_delta += after.kept_sign();
    }
}

#[derive(Debug, Clone, Default)]
pub struct ClassificationEngine {
    precedence: Precedence,
}

impl ClassificationEngine {
    pub fn new(precedence: Precedence) -> Self {
        Self { precedence }
    }

    pub fn precedence(&self) -> &Precedence {
        &self.precedence
    }

    /// Status implied by the document's annotations and fallback marker.
    pub fn classify(&self, doc: &Document) -> ClassificationStatus {
        self.precedence
            .rules()
            .iter()
            .find_map(|rule| rule.evaluate(doc))
            .unwrap_or_default()
    }

    /// Records `keyword` of `kind` on every document whose text contains it,
    /// after withdrawing it from the opposite kind everywhere.
    pub fn apply_keyword<'a, I>(&self, kind: KeywordKind, keyword: &str, docs: I) -> Reclassification
    where
        I: IntoIterator<Item = &'a mut Document>,
    {
        let pattern = match KeywordPattern::new(keyword) {
            Ok(pattern) => pattern,
            Err(err) => {
                engine_warn!("Ignoring {} keyword {:?}: {}", kind, keyword, err);
                return Reclassification::default();
            }
        };

        let mut outcome = Reclassification::default();
        for doc in docs {
            let before = doc.status;
            let withdrawn = doc.keywords_mut(kind.opposite()).remove(keyword);
            let matched = pattern.is_match(&doc.text);
            if matched {
                doc.keywords_mut(kind).insert(keyword);
            }
            if withdrawn || matched {
                self.restamp(doc, before, &mut outcome);
            }
        }
        engine_debug!(
            "Applied {} keyword {:?}: {} changed, kept delta {}",
            kind,
            keyword,
            outcome.changed,
            outcome.kept_delta
        );
        outcome
    }

    /// Withdraws `keyword` of `kind` from every document.
    pub fn remove_keyword<'a, I>(&self, kind: KeywordKind, keyword: &str, docs: I) -> Reclassification
    where
        I: IntoIterator<Item = &'a mut Document>,
    {
        let mut outcome = Reclassification::default();
        if keyword.is_empty() {
            engine_warn!("Ignoring removal of empty {} keyword", kind);
            return outcome;
        }
        for doc in docs {
            let before = doc.status;
            if doc.keywords_mut(kind).remove(keyword) {
                self.restamp(doc, before, &mut outcome);
            }
        }
        engine_debug!(
            "Removed {} keyword {:?}: {} changed, kept delta {}",
            kind,
            keyword,
            outcome.changed,
            outcome.kept_delta
        );
        outcome
    }

    fn restamp(
        &self,
        doc: &mut Document,
        before: ClassificationStatus,
        outcome: &mut Reclassification,
    ) {
        let after = self.classify(doc);
        if after != before {
            doc.status = after;
            outcome.record(after);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{KeywordError, KeywordPattern};

    #[test]
    fn word_keywords_are_anchored() {
        let pattern = KeywordPattern::new("cat").unwrap();
        assert_eq!(pattern.as_str(), r"\bcat\b");
        assert!(pattern.is_match("My CAT sleeps"));
        assert!(!pattern.is_match("concatenate"));
    }

    #[test]
    fn non_word_ends_are_not_anchored() {
        let pattern = KeywordPattern::new("#rust").unwrap();
        assert_eq!(pattern.as_str(), r"\#rust\b");
        assert!(pattern.is_match("learning#rust today"));
        assert!(!pattern.is_match("#rustacean"));
    }

    #[test]
    fn metacharacters_are_literal() {
        let pattern = KeywordPattern::new("c++ (beta)").unwrap();
        assert!(pattern.is_match("trying c++ (beta) now"));
        assert!(!pattern.is_match("trying cc (beta) now"));
    }

    #[test]
    fn empty_keyword_is_rejected() {
        assert_eq!(KeywordPattern::new("").unwrap_err(), KeywordError::Empty);
    }
}

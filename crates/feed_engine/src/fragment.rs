//! Parsing of server HTML fragments into documents and sentinels.

use ego_tree::NodeRef;
use scraper::node::Node;
use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use feed_core::{
    ClassificationStatus, Document, FallbackMarker, Fragment, KeywordKind, KeywordLists,
    KeywordSet, Sentinel,
};

/// CSS selectors describing the server markup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkupSelectors {
    pub document: String,
    pub text: String,
    pub sentinel: String,
    pub positive_keywords: String,
    pub negative_keywords: String,
}

impl Default for MarkupSelectors {
    fn default() -> Self {
        Self {
            document: ".tweet".to_string(),
            text: ".text".to_string(),
            sentinel: "a.feed-next".to_string(),
            positive_keywords: "#kws-positive .kw-text".to_string(),
            negative_keywords: "#kws-negative .kw-text".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid selector {selector:?}: {message}")]
pub struct MarkupError {
    pub selector: String,
    pub message: String,
}

fn selector(css: &str) -> Result<Selector, MarkupError> {
    Selector::parse(css).map_err(|err| MarkupError {
        selector: css.to_string(),
        message: err.to_string(),
    })
}

#[derive(Debug, Clone)]
pub struct FragmentParser {
    document: Selector,
    text: Selector,
    sentinel: Selector,
    positive_keywords: Selector,
    negative_keywords: Selector,
}

impl FragmentParser {
    pub fn new(selectors: &MarkupSelectors) -> Result<Self, MarkupError> {
        Ok(Self {
            document: selector(&selectors.document)?,
            text: selector(&selectors.text)?,
            sentinel: selector(&selectors.sentinel)?,
            positive_keywords: selector(&selectors.positive_keywords)?,
            negative_keywords: selector(&selectors.negative_keywords)?,
        })
    }

    /// Documents in markup order plus the last sentinel link, if any.
    /// `content_selector` narrows the markup to the matching elements first.
    pub fn parse_fragment(
        &self,
        html: &str,
        content_selector: Option<&str>,
    ) -> Result<Fragment, MarkupError> {
        let parsed = Html::parse_fragment(html);
        let narrowed;
        let source = match content_selector {
            Some(css) => {
                let content = selector(css)?;
                let markup: String = parsed.select(&content).map(|el| el.html()).collect();
                narrowed = Html::parse_fragment(&markup);
                &narrowed
            }
            None => &parsed,
        };

        let documents = source
            .select(&self.document)
            .map(|el| self.document_from(el))
            .collect();
        let sentinel = source
            .select(&self.sentinel)
            .last()
            .map(|link| Sentinel::new(link.value().attr("href").unwrap_or_default()));

        Ok(Fragment::new(documents, sentinel))
    }

    /// Keyword lists as rendered by `keywords/all`.
    pub fn parse_keyword_lists(&self, html: &str) -> KeywordLists {
        let parsed = Html::parse_fragment(html);
        let collect = |sel: &Selector| -> Vec<String> {
            parsed
                .select(sel)
                .map(|el| normalize_whitespace(&visible_text(el)))
                .filter(|word| !word.is_empty())
                .collect()
        };
        KeywordLists {
            positive: collect(&self.positive_keywords),
            negative: collect(&self.negative_keywords),
        }
    }

    fn document_from(&self, el: ElementRef<'_>) -> Document {
        let html = el.html();
        let id = el
            .value()
            .attr("data-id")
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(str::to_owned)
            .unwrap_or_else(|| short_hash(&html));
        let text_source = el.select(&self.text).next().unwrap_or(el);
        let text = normalize_whitespace(&visible_text(text_source));

        let mut doc = Document::new(id, html, text);
        let mut status = ClassificationStatus::Unknown;
        for class in el.value().classes() {
            match class {
                "status-keep" => status = ClassificationStatus::Keep,
                "status-discard" => status = ClassificationStatus::Discard,
                "status-unknown" => status = ClassificationStatus::Unknown,
                "eval-status-keep" | "eval-keep" => doc.fallback = Some(FallbackMarker::Keep),
                "eval-status-discard" | "eval-discard" => {
                    doc.fallback = Some(FallbackMarker::Discard)
                }
                _ => {}
            }
        }
        doc.status = status;
        doc.positive = keyword_attr(el, "data-pos-kws");
        doc.negative = keyword_attr(el, "data-neg-kws");
        doc
    }
}

/// Tab separated annotation list; the delimiter form ends here.
fn keyword_attr(el: ElementRef<'_>, attr: &str) -> KeywordSet {
    el.value()
        .attr(attr)
        .map(|raw| {
            raw.split('\t')
                .map(str::trim)
                .filter(|kw| !kw.is_empty())
                .collect()
        })
        .unwrap_or_default()
}

fn visible_text(el: ElementRef<'_>) -> String {
    let mut out = String::new();
    collect_text(*el, &mut out);
    out
}

fn collect_text(node: NodeRef<'_, Node>, out: &mut String) {
    match node.value() {
        Node::Text(text) => out.push_str(text),
        Node::Element(element) if matches!(element.name(), "script" | "style") => {}
        Node::Element(element) => {
            let block = matches!(element.name(), "br" | "p" | "div" | "li");
            if block {
                out.push(' ');
            }
            for child in node.children() {
                collect_text(child, out);
            }
            if block {
                out.push(' ');
            }
        }
        _ => {
            for child in node.children() {
                collect_text(child, out);
            }
        }
    }
}

fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn short_hash(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    let digest = hasher.finalize();
    let mut hex = String::with_capacity(16);
    for byte in digest.iter().take(8) {
        use std::fmt::Write;
        let _ = write!(&mut hex, "{byte:02x}");
    }
    hex
}

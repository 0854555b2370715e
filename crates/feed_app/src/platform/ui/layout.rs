use std::cell::RefCell;
use std::collections::HashMap;

use feed_core::{ContentRegion, DocId, Geometry, Layout, RegionId, Viewport};
use feed_engine::{Converter, Html2MdConverter};

/// Lines used by the header above the feed.
pub const HEADER_LINES: i64 = 3;

/// Measures regions in terminal lines. Each document takes one separator line
/// plus its wrapped markdown text.
#[derive(Debug, Clone)]
pub struct TerminalLayout {
    width: usize,
    height: i64,
    scroll_top: i64,
    preview_scroll: i64,
    converter: Html2MdConverter,
    /// Wrapped lines per document; the width never changes.
    wrapped: RefCell<HashMap<DocId, Vec<String>>>,
}

impl TerminalLayout {
    pub fn new(width: usize, height: i64) -> Self {
        Self {
            width: width.max(20),
            height: height.max(HEADER_LINES + 1),
            scroll_top: 0,
            preview_scroll: 0,
            converter: Html2MdConverter,
            wrapped: RefCell::new(HashMap::new()),
        }
    }

    /// Lines available to the active feed.
    pub fn feed_height(&self) -> i64 {
        self.height - HEADER_LINES
    }

    pub fn preview_height(&self) -> i64 {
        (self.height / 2).max(1)
    }

    pub fn scroll_top(&self) -> i64 {
        self.scroll_top
    }

    pub fn preview_scroll(&self) -> i64 {
        self.preview_scroll
    }

    /// Wrapped text lines of one document, without its separator.
    pub fn document_lines(&self, id: &str, html: &str) -> Vec<String> {
        if let Some(lines) = self.wrapped.borrow().get(id) {
            return lines.clone();
        }
        let lines = self.wrap_document(html);
        self.wrapped
            .borrow_mut()
            .insert(id.to_string(), lines.clone());
        lines
    }

    pub fn document_height(&self, id: &str, html: &str) -> i64 {
        if let Some(lines) = self.wrapped.borrow().get(id) {
            return 1 + lines.len() as i64;
        }
        1 + self.document_lines(id, html).len() as i64
    }

    /// Height of `(id, html)` documents plus the loading placeholder line, if any.
    pub fn content_height<'a>(
        &self,
        documents: impl IntoIterator<Item = (&'a str, &'a str)>,
        loading: bool,
    ) -> i64 {
        let rows: i64 = documents
            .into_iter()
            .map(|(id, html)| self.document_height(id, html))
            .sum();
        rows + i64::from(loading)
    }

    /// Drops the wrapped lines of every document, e.g. for a new search.
    pub fn forget_documents(&mut self) {
        self.wrapped.get_mut().clear();
    }

    fn wrap_document(&self, html: &str) -> Vec<String> {
        let markdown = self.converter.to_markdown(html);
        let mut lines = Vec::new();
        for line in markdown.lines() {
            lines.extend(
                textwrap::wrap(line, self.width)
                    .into_iter()
                    .map(|part| part.into_owned()),
            );
        }
        if lines.is_empty() {
            lines.push(String::new());
        }
        lines
    }

    /// Scrolls the feed, never past the top or the last screen of content.
    pub fn scroll_by(&mut self, delta: i64, content_height: i64) {
        let max = (content_height - self.feed_height()).max(0);
        self.scroll_top = self.scroll_top.saturating_add(delta).clamp(0, max);
    }

    pub fn scroll_preview_by(&mut self, delta: i64, content_height: i64) {
        let max = (content_height - self.preview_height()).max(0);
        self.preview_scroll = self.preview_scroll.saturating_add(delta).clamp(0, max);
    }

    pub fn reset_preview(&mut self) {
        self.preview_scroll = 0;
    }
}

impl Layout for TerminalLayout {
    fn geometry(&self, region: RegionId, content: &ContentRegion) -> Geometry {
        let content_height = self.content_height(
            content
                .documents()
                .iter()
                .map(|doc| (doc.id.as_str(), doc.html.as_str())),
            content.placeholder().is_some(),
        );
        let viewport = match region {
            RegionId::Feed(_) => Viewport::Window {
                scroll_top: self.scroll_top,
                height: self.feed_height(),
            },
            RegionId::Preview => Viewport::Element {
                offset_top: self.preview_scroll,
                height: self.preview_height(),
            },
        };
        Geometry {
            content_top: 0,
            content_height,
            viewport,
        }
    }

    fn scroll_offset(&self) -> i64 {
        self.scroll_top
    }

    fn scroll_to(&mut self, offset: i64) {
        self.scroll_top = offset.max(0);
    }
}

#[cfg(test)]
mod tests {
    use feed_core::{ContentRegion, Document, Fragment, Layout, RegionId, Sentinel, Viewport};

    use super::{TerminalLayout, HEADER_LINES};

    fn content(texts: &[&str]) -> ContentRegion {
        let documents = texts
            .iter()
            .enumerate()
            .map(|(i, text)| Document::new(i.to_string(), format!("<p>{text}</p>"), *text))
            .collect();
        let mut region = ContentRegion::new();
        region.set_content(Fragment::new(documents, Some(Sentinel::new("next"))));
        region
    }

    #[test]
    fn long_lines_wrap_to_the_terminal_width() {
        let layout = TerminalLayout::new(20, 24);
        let text = "a".repeat(45);
        let lines = layout.document_lines("long", &format!("<p>{text}</p>"));
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[2].len(), 5);
        assert_eq!(layout.document_height("short", "<p>short</p>"), 2);
    }

    #[test]
    fn feeds_use_the_window_and_the_preview_an_element() {
        let layout = TerminalLayout::new(40, 24 + HEADER_LINES);
        let content = content(&["one", "two", "three"]);

        let feed = layout.geometry(RegionId::Feed(feed_core::FeedType::Kept), &content);
        assert_eq!(feed.content_height, 6);
        assert_eq!(
            feed.viewport,
            Viewport::Window {
                scroll_top: 0,
                height: 24
            }
        );
        assert!(feed.is_at_bottom(0));

        let preview = layout.geometry(RegionId::Preview, &content);
        assert!(matches!(preview.viewport, Viewport::Element { height: 13, .. }));
    }

    #[test]
    fn scrolling_is_clamped_to_the_content() {
        let mut layout = TerminalLayout::new(40, 10 + HEADER_LINES);
        layout.scroll_by(-5, 100);
        assert_eq!(layout.scroll_top(), 0);
        layout.scroll_by(500, 100);
        assert_eq!(layout.scroll_top(), 90);
        layout.scroll_to(12);
        assert_eq!(layout.scroll_offset(), 12);
    }

    #[test]
    fn huge_scroll_deltas_saturate() {
        let mut layout = TerminalLayout::new(40, 10 + HEADER_LINES);
        layout.scroll_by(5, 100);
        layout.scroll_by(i64::MAX, 100);
        assert_eq!(layout.scroll_top(), 90);
        layout.scroll_by(i64::MIN, 100);
        assert_eq!(layout.scroll_top(), 0);

        layout.scroll_preview_by(3, 100);
        layout.scroll_preview_by(i64::MAX, 100);
        assert_eq!(layout.preview_scroll(), 100 - layout.preview_height());
    }

    #[test]
    fn wrapped_lines_are_reused_per_document() {
        let mut layout = TerminalLayout::new(20, 24);
        assert_eq!(layout.document_height("t1", "<p>one</p>"), 2);

        // Same id: the first wrapping is kept.
        let lines = layout.document_lines("t1", &format!("<p>{}</p>", "b".repeat(45)));
        assert_eq!(lines, vec!["one".to_string()]);

        layout.forget_documents();
        assert_eq!(
            layout.document_height("t1", &format!("<p>{}</p>", "b".repeat(45))),
            4
        );
    }
}

#![allow(dead_code)]

use std::sync::Once;

use feed_core::{
    ContentRegion, Document, FallbackMarker, Fragment, Geometry, Layout, RegionId, Sentinel,
    Viewport,
};

pub const ROW_HEIGHT: i64 = 100;

pub fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(engine_logging::initialize_for_tests);
}

/// Lays documents out in fixed-height rows at the top of the window.
#[derive(Debug)]
pub struct FakeLayout {
    pub window_height: i64,
    pub scroll_top: i64,
    pub preview_height: i64,
    pub preview_scroll: i64,
    pub scroll_calls: Vec<i64>,
}

impl FakeLayout {
    pub fn new(window_height: i64) -> Self {
        Self {
            window_height,
            scroll_top: 0,
            preview_height: window_height,
            preview_scroll: 0,
            scroll_calls: Vec::new(),
        }
    }

    /// Scrolls to the very end of `documents` rows.
    pub fn scroll_to_row(&mut self, rows: usize) {
        self.scroll_top = rows as i64 * ROW_HEIGHT - self.window_height;
    }
}

impl Layout for FakeLayout {
    fn geometry(&self, region: RegionId, content: &ContentRegion) -> Geometry {
        let content_height = content.len() as i64 * ROW_HEIGHT;
        let viewport = match region {
            RegionId::Feed(_) => Viewport::Window {
                scroll_top: self.scroll_top,
                height: self.window_height,
            },
            RegionId::Preview => Viewport::Element {
                offset_top: self.preview_scroll,
                height: self.preview_height,
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
        self.scroll_top = offset;
        self.scroll_calls.push(offset);
    }
}

pub fn doc(id: &str, text: &str) -> Document {
    Document::new(id, format!("<div class=\"tweet\">{text}</div>"), text)
}

pub fn marked(id: &str, text: &str, marker: FallbackMarker) -> Document {
    doc(id, text).with_fallback(marker)
}

/// `count` documents named `{prefix}{n}` followed by a sentinel when `next` is set.
pub fn page(prefix: &str, count: usize, next: Option<&str>) -> Fragment {
    let documents = (0..count)
        .map(|n| doc(&format!("{prefix}{n}"), &format!("document {prefix}{n}")))
        .collect();
    Fragment::new(documents, next.map(Sentinel::new))
}

use crate::{ContentRegion, RegionId};

/// The scrollable area a region is shown in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Viewport {
    /// The whole window; `scroll_top` is the window scroll offset.
    Window { scroll_top: i64, height: i64 },
    /// A scrollable ancestor element; `offset_top` is its offset in the page.
    Element { offset_top: i64, height: i64 },
}

impl Viewport {
    pub fn top(&self) -> i64 {
        match *self {
            Viewport::Window { scroll_top, .. } => scroll_top,
            Viewport::Element { offset_top, .. } => offset_top,
        }
    }

    pub fn height(&self) -> i64 {
        match *self {
            Viewport::Window { height, .. } | Viewport::Element { height, .. } => height,
        }
    }
}

/// Measured position of a content region relative to its viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Geometry {
    pub content_top: i64,
    pub content_height: i64,
    pub viewport: Viewport,
}

impl Geometry {
    /// Distance between the bottom of the content and the bottom of the viewport.
    /// Negative when the content does not fill the viewport.
    pub fn distance_to_bottom(&self) -> i64 {
        let content_bottom = self.content_top + self.content_height;
        let viewport_bottom = self.viewport.top() + self.viewport.height();
        content_bottom - viewport_bottom
    }

    pub fn is_at_bottom(&self, padding: i64) -> bool {
        is_at_bottom(
            self.content_top,
            self.content_height,
            self.viewport.top(),
            self.viewport.height(),
            padding,
        )
    }
}

/// True when the visible viewport is within `padding` of the bottom of the content.
pub fn is_at_bottom(
    content_top: i64,
    content_height: i64,
    viewport_top: i64,
    viewport_height: i64,
    padding: i64,
) -> bool {
    let content_bottom = content_top + content_height;
    let viewport_bottom = viewport_top + viewport_height;
    content_bottom - viewport_bottom <= padding
}

/// Host-side measurements. Implemented by whatever renders the regions.
pub trait Layout {
    /// Current geometry of `content`, shown as region `region`.
    fn geometry(&self, region: RegionId, content: &ContentRegion) -> Geometry;

    /// Current scroll offset of the main window.
    fn scroll_offset(&self) -> i64;

    /// Scrolls the main window to `offset`.
    fn scroll_to(&mut self, offset: i64);
}

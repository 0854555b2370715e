//! The two result feeds, KEPT and DISCARDED, of which exactly one is shown.

use std::fmt;
use std::str::FromStr;

use engine_logging::{engine_debug, engine_warn};
use serde::{Deserialize, Serialize};

use crate::document::ParseNameError;
use crate::{
    BatchObserver, Document, Effect, FetchFailure, Fragment, Layout, LoaderOptions, Notification,
    Notifier, PageRequest, Region, RegionId,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FeedType {
    Kept,
    Discarded,
}

impl FeedType {
    pub const ALL: [FeedType; 2] = [FeedType::Kept, FeedType::Discarded];

    pub fn other(self) -> Self {
        match self {
            FeedType::Kept => FeedType::Discarded,
            FeedType::Discarded => FeedType::Kept,
        }
    }

    /// Path segment used by the feed endpoints.
    pub fn as_path(self) -> &'static str {
        match self {
            FeedType::Kept => "KEPT",
            FeedType::Discarded => "DISCARDED",
        }
    }
}

impl fmt::Display for FeedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_path())
    }
}

impl FromStr for FeedType {
    type Err = ParseNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "kept" | "keep" => Ok(FeedType::Kept),
            "discarded" | "discard" => Ok(FeedType::Discarded),
            _ => Err(ParseNameError::new("feed type", s)),
        }
    }
}

#[derive(Debug)]
struct FeedPane {
    region: Region,
    initialized: bool,
    starting: bool,
    scroll_offset: i64,
}

impl FeedPane {
    fn new(feed: FeedType) -> Self {
        Self {
            region: Region::new(RegionId::Feed(feed)),
            initialized: false,
            starting: false,
            scroll_offset: 0,
        }
    }

    fn hide(&mut self, layout: &dyn Layout) {
        self.region.pause();
        if self.region.content().is_visible() {
            self.scroll_offset = layout.scroll_offset();
            self.region.content_mut().set_visible(false);
        }
    }

    /// Shows the pane and binds its loader on first display.
    fn show(&mut self, options: &LoaderOptions, layout: &mut dyn Layout) -> Option<PageRequest> {
        self.region.content_mut().set_visible(true);
        layout.scroll_to(self.scroll_offset);
        if self.region.loader().is_none() {
            return self.region.bind(options.clone(), layout);
        }
        self.region.resume(layout)
    }

    fn clear(&mut self) {
        self.region.clear();
        self.region.content_mut().set_visible(false);
        self.initialized = false;
        self.starting = false;
        self.scroll_offset = 0;
    }
}

/// Owns both feed regions and which one is visible.
#[derive(Debug)]
pub struct FeedController {
    kept: FeedPane,
    discarded: FeedPane,
    active: Option<FeedType>,
    options: LoaderOptions,
}

impl FeedController {
    pub fn new(options: LoaderOptions) -> Self {
        Self {
            kept: FeedPane::new(FeedType::Kept),
            discarded: FeedPane::new(FeedType::Discarded),
            active: None,
            options,
        }
    }

    pub fn active(&self) -> Option<FeedType> {
        self.active
    }

    pub fn region(&self, feed: FeedType) -> &Region {
        &self.pane(feed).region
    }

    pub fn is_initialized(&self, feed: FeedType) -> bool {
        self.pane(feed).initialized
    }

    pub fn recorded_offset(&self, feed: FeedType) -> i64 {
        self.pane(feed).scroll_offset
    }

    fn pane(&self, feed: FeedType) -> &FeedPane {
        match feed {
            FeedType::Kept => &self.kept,
            FeedType::Discarded => &self.discarded,
        }
    }

    fn pane_mut(&mut self, feed: FeedType) -> &mut FeedPane {
        match feed {
            FeedType::Kept => &mut self.kept,
            FeedType::Discarded => &mut self.discarded,
        }
    }

    /// Switches the visible feed. An uninitialized feed is shown once its
    /// start page arrives through [`FeedController::feed_started`].
    pub fn select_feed(
        &mut self,
        feed: FeedType,
        layout: &mut dyn Layout,
        notifier: &mut Notifier,
    ) -> Vec<Effect> {
        if self.active == Some(feed) && self.pane(feed).initialized {
            return Vec::new();
        }

        self.pane_mut(feed.other()).hide(layout);
        self.active = Some(feed);

        if !self.pane(feed).initialized {
            let pane = self.pane_mut(feed);
            if pane.starting {
                return Vec::new();
            }
            pane.starting = true;
            engine_debug!("Starting feed {}", feed);
            return vec![Effect::StartFeed { feed }];
        }

        let options = self.options.clone();
        let mut effects = Vec::new();
        if let Some(request) = self.pane_mut(feed).show(&options, layout) {
            effects.push(Effect::FetchPage(request));
        }
        notifier.publish(Notification::FeedSelected(feed));
        effects
    }

    /// Start page for `feed` arrived.
    pub fn feed_started(
        &mut self,
        feed: FeedType,
        result: Result<Fragment, FetchFailure>,
        layout: &mut dyn Layout,
        notifier: &mut Notifier,
    ) -> Vec<Effect> {
        let pane = self.pane_mut(feed);
        if !pane.starting {
            engine_debug!("Ignoring start page for {} after the feeds were cleared", feed);
            return Vec::new();
        }
        pane.starting = false;
        match result {
            Ok(fragment) => self.install(feed, fragment, layout, notifier),
            Err(failure) => {
                engine_warn!("Failed to start feed {}: {}", feed, failure);
                Vec::new()
            }
        }
    }

    /// Initial KEPT page delivered together with a new search.
    pub fn feed_available(
        &mut self,
        fragment: Fragment,
        layout: &mut dyn Layout,
        notifier: &mut Notifier,
    ) -> Vec<Effect> {
        self.pane_mut(FeedType::Discarded).hide(layout);
        self.active = Some(FeedType::Kept);
        self.install(FeedType::Kept, fragment, layout, notifier)
    }

    fn install(
        &mut self,
        feed: FeedType,
        fragment: Fragment,
        layout: &mut dyn Layout,
        notifier: &mut Notifier,
    ) -> Vec<Effect> {
        let options = self.options.clone();
        let active = self.active == Some(feed);
        let pane = self.pane_mut(feed);
        pane.region.content_mut().set_content(fragment);
        pane.initialized = true;
        pane.starting = false;

        if !active {
            // Bound by `show` once the user switches to it.
            engine_debug!("Start page for hidden feed {} stored", feed);
            return Vec::new();
        }

        let mut effects = Vec::new();
        pane.region.content_mut().set_visible(true);
        layout.scroll_to(pane.scroll_offset);
        if let Some(request) = pane.region.bind(options, layout) {
            effects.push(Effect::FetchPage(request));
        }
        if let Some(request) = pane.region.resume(layout) {
            effects.push(Effect::FetchPage(request));
        }
        notifier.publish(Notification::FeedSelected(feed));
        effects
    }

    /// Scroll event on the main window.
    pub fn scrolled(&mut self, layout: &dyn Layout) -> Vec<Effect> {
        [&mut self.kept, &mut self.discarded]
            .into_iter()
            .filter_map(|pane| pane.region.scrolled(layout))
            .map(Effect::FetchPage)
            .collect()
    }

    /// Completion of a page request issued for one of the feeds.
    pub fn page_loaded(
        &mut self,
        feed: FeedType,
        ticket: u64,
        result: Result<Fragment, FetchFailure>,
        observer: &mut dyn BatchObserver,
        layout: &dyn Layout,
    ) -> Vec<Effect> {
        self.pane_mut(feed)
            .region
            .complete(ticket, result, observer, layout)
            .map(Effect::FetchPage)
            .into_iter()
            .collect()
    }

    /// Every document currently materialized in either feed.
    pub fn documents_mut(&mut self) -> impl Iterator<Item = &mut Document> {
        self.kept
            .region
            .content_mut()
            .documents_mut()
            .chain(self.discarded.region.content_mut().documents_mut())
    }

    /// Empties both feeds for a new search expression.
    pub fn clear_all(&mut self) {
        self.kept.clear();
        self.discarded.clear();
        self.active = None;
    }
}

//! Scroll-driven incremental loader.
//!
//! A loader is bound to one [`ContentRegion`] whose content ends with a
//! sentinel link. When the viewport gets close to the bottom of the region,
//! the page behind the sentinel is requested; the response replaces the
//! sentinel and the loader keeps going while the new content ends with
//! another sentinel.

use engine_logging::{engine_debug, engine_trace};

use crate::{ContentRegion, Document, Layout, RegionId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoaderState {
    /// Armed and listening to scroll events.
    Running,
    /// A request is in flight; scroll events are ignored.
    Fetching,
    /// Nothing to load, fetch failed, or paused.
    Stopped,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoaderOptions {
    /// Distance in pixels from the bottom that triggers a fetch.
    pub padding: i64,
    /// Placeholder shown while a page is loading.
    pub loading_html: String,
    /// Narrows fetched responses to the matching elements.
    pub content_selector: Option<String>,
}

impl Default for LoaderOptions {
    fn default() -> Self {
        Self {
            padding: 50,
            loading_html: "Loading...".to_string(),
            content_selector: None,
        }
    }
}

/// A page the host must fetch and report back with the same ticket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub region: RegionId,
    pub ticket: u64,
    pub href: String,
    pub content_selector: Option<String>,
}

/// Receives every batch of documents appended by a loader.
pub trait BatchObserver {
    fn batch_appended(&mut self, region: RegionId, documents: &[Document]);
}

impl<F> BatchObserver for F
where
    F: FnMut(RegionId, &[Document]),
{
    fn batch_appended(&mut self, region: RegionId, documents: &[Document]) {
        self(region, documents)
    }
}

#[derive(Debug)]
pub struct IncrementalLoader {
    options: LoaderOptions,
    state: LoaderState,
    listening: bool,
    fetches_issued: u64,
}

impl IncrementalLoader {
    pub(crate) fn new(options: LoaderOptions) -> Self {
        Self {
            options,
            state: LoaderState::Stopped,
            listening: false,
            fetches_issued: 0,
        }
    }

    pub fn state(&self) -> LoaderState {
        self.state
    }

    pub fn is_listening(&self) -> bool {
        self.listening
    }

    pub fn options(&self) -> &LoaderOptions {
        &self.options
    }

    /// Requests issued since the loader was created.
    pub fn fetches_issued(&self) -> u64 {
        self.fetches_issued
    }

    pub(crate) fn init(
        &mut self,
        options: LoaderOptions,
        region: RegionId,
        content: &mut ContentRegion,
        layout: &dyn Layout,
    ) -> Option<PageRequest> {
        self.options = options;
        if !content.has_sentinel() {
            self.pause();
            engine_debug!("No link for initial content in {:?}", region);
            return None;
        }
        self.listening = true;
        if content.is_fetching() {
            self.state = LoaderState::Fetching;
            return None;
        }
        self.state = LoaderState::Running;
        self.check(region, content, layout)
    }

    pub(crate) fn on_scroll(
        &mut self,
        region: RegionId,
        content: &mut ContentRegion,
        layout: &dyn Layout,
    ) -> Option<PageRequest> {
        if !self.listening {
            return None;
        }
        self.check(region, content, layout)
    }

    pub(crate) fn pause(&mut self) {
        self.listening = false;
        self.state = LoaderState::Stopped;
        engine_trace!("Unlinked scroll event");
    }

    pub(crate) fn resume(
        &mut self,
        region: RegionId,
        content: &mut ContentRegion,
        layout: &dyn Layout,
    ) -> Option<PageRequest> {
        if self.state != LoaderState::Stopped {
            return None;
        }
        if !content.has_sentinel() {
            return None;
        }
        self.listening = true;
        // The sentinel of the request still in flight must not be fetched twice.
        if content.is_fetching() {
            self.state = LoaderState::Fetching;
            return None;
        }
        self.state = LoaderState::Running;
        self.check(region, content, layout)
    }

    pub(crate) fn after_fetch(
        &mut self,
        succeeded: bool,
        region: RegionId,
        content: &mut ContentRegion,
        layout: &dyn Layout,
    ) -> Option<PageRequest> {
        if !succeeded {
            self.pause();
            return None;
        }
        if self.state != LoaderState::Fetching {
            return None;
        }
        if !content.has_sentinel() {
            engine_debug!("Last page reached for {:?}", region);
            self.pause();
            return None;
        }
        self.state = LoaderState::Running;
        self.check(region, content, layout)
    }

    fn check(
        &mut self,
        region: RegionId,
        content: &mut ContentRegion,
        layout: &dyn Layout,
    ) -> Option<PageRequest> {
        if self.state != LoaderState::Running {
            return None;
        }
        let geometry = layout.geometry(region, content);
        engine_trace!("Distance to bottom: {}", geometry.distance_to_bottom());
        if !geometry.is_at_bottom(self.options.padding) {
            return None;
        }
        self.load(region, content)
    }

    fn load(&mut self, region: RegionId, content: &mut ContentRegion) -> Option<PageRequest> {
        self.state = LoaderState::Fetching;
        let Some(href) = content.next_href().map(str::to_owned) else {
            engine_debug!("No link for additional content in {:?}", region);
            self.pause();
            return None;
        };

        engine_debug!("Loading more content from: {}", href);
        let ticket = content.begin_fetch(&self.options.loading_html);
        self.fetches_issued += 1;
        Some(PageRequest {
            region,
            ticket,
            href,
            content_selector: self.options.content_selector.clone(),
        })
    }
}

use std::ops::Range;

use crate::loader::{BatchObserver, IncrementalLoader, LoaderOptions, LoaderState, PageRequest};
use crate::{Document, FeedType, FetchFailure, Layout};

/// Identifies one independently loaded region of the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegionId {
    Feed(FeedType),
    /// The keyword preview modal.
    Preview,
}

/// The "next page" link ending a fragment. `href` is `None` when the link
/// carries no usable target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sentinel {
    pub href: Option<String>,
}

impl Sentinel {
    pub fn new(href: impl Into<String>) -> Self {
        let href = href.into();
        let href = if href.trim().is_empty() {
            None
        } else {
            Some(href.trim().to_string())
        };
        Self { href }
    }

    pub fn malformed() -> Self {
        Self { href: None }
    }
}

/// Parsed server response: documents in page order plus an optional sentinel.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fragment {
    pub documents: Vec<Document>,
    pub sentinel: Option<Sentinel>,
}

impl Fragment {
    pub fn new(documents: Vec<Document>, sentinel: Option<Sentinel>) -> Self {
        Self {
            documents,
            sentinel,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct PendingFetch {
    ticket: u64,
    placeholder: String,
}

/// Ordered documents plus at most one trailing sentinel.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentRegion {
    documents: Vec<Document>,
    sentinel: Option<Sentinel>,
    pending: Option<PendingFetch>,
    visible: bool,
    tickets: u64,
}

impl ContentRegion {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn documents_mut(&mut self) -> impl Iterator<Item = &mut Document> {
        self.documents.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn sentinel(&self) -> Option<&Sentinel> {
        self.sentinel.as_ref()
    }

    pub fn has_sentinel(&self) -> bool {
        self.sentinel.is_some()
    }

    pub fn next_href(&self) -> Option<&str> {
        self.sentinel.as_ref().and_then(|s| s.href.as_deref())
    }

    /// Loading indicator currently shown after the sentinel.
    pub fn placeholder(&self) -> Option<&str> {
        self.pending.as_ref().map(|p| p.placeholder.as_str())
    }

    pub fn is_fetching(&self) -> bool {
        self.pending.is_some()
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    /// Replaces the whole content with `fragment`.
    pub fn set_content(&mut self, fragment: Fragment) {
        self.documents = fragment.documents;
        self.sentinel = fragment.sentinel;
        self.pending = None;
    }

    /// Drops all documents and the sentinel. Any in-flight fetch becomes stale.
    pub fn clear(&mut self) {
        self.documents.clear();
        self.sentinel = None;
        self.pending = None;
    }

    pub(crate) fn begin_fetch(&mut self, placeholder: &str) -> u64 {
        self.tickets += 1;
        self.pending = Some(PendingFetch {
            ticket: self.tickets,
            placeholder: placeholder.to_string(),
        });
        self.tickets
    }

    /// Removes the placeholder of fetch `ticket`. False when the fetch is stale.
    pub(crate) fn settle(&mut self, ticket: u64) -> bool {
        match &self.pending {
            Some(pending) if pending.ticket == ticket => {
                self.pending = None;
                true
            }
            _ => false,
        }
    }

    /// Replaces the trailing sentinel with the fetched fragment.
    pub(crate) fn replace_sentinel(&mut self, fragment: Fragment) -> Range<usize> {
        let start = self.documents.len();
        self.documents.extend(fragment.documents);
        self.sentinel = fragment.sentinel;
        start..self.documents.len()
    }
}

/// A content region together with the loader bound to it.
#[derive(Debug)]
pub struct Region {
    id: RegionId,
    content: ContentRegion,
    loader: Option<IncrementalLoader>,
}

impl Region {
    pub fn new(id: RegionId) -> Self {
        Self {
            id,
            content: ContentRegion::new(),
            loader: None,
        }
    }

    pub fn id(&self) -> RegionId {
        self.id
    }

    pub fn content(&self) -> &ContentRegion {
        &self.content
    }

    pub fn content_mut(&mut self) -> &mut ContentRegion {
        &mut self.content
    }

    pub fn loader(&self) -> Option<&IncrementalLoader> {
        self.loader.as_ref()
    }

    pub fn loader_state(&self) -> Option<LoaderState> {
        self.loader.as_ref().map(IncrementalLoader::state)
    }

    /// Binds a loader, reusing the existing one if the region is already bound.
    pub fn bind(&mut self, options: LoaderOptions, layout: &dyn Layout) -> Option<PageRequest> {
        let loader = self
            .loader
            .get_or_insert_with(|| IncrementalLoader::new(options.clone()));
        loader.init(options, self.id, &mut self.content, layout)
    }

    /// Scroll event from the viewport.
    pub fn scrolled(&mut self, layout: &dyn Layout) -> Option<PageRequest> {
        let loader = self.loader.as_mut()?;
        loader.on_scroll(self.id, &mut self.content, layout)
    }

    pub fn pause(&mut self) {
        if let Some(loader) = self.loader.as_mut() {
            loader.pause();
        }
    }

    pub fn resume(&mut self, layout: &dyn Layout) -> Option<PageRequest> {
        let loader = self.loader.as_mut()?;
        loader.resume(self.id, &mut self.content, layout)
    }

    /// Pauses and detaches the loader.
    pub fn destroy(&mut self) {
        if let Some(mut loader) = self.loader.take() {
            loader.pause();
        }
    }

    /// Destroys the loader and empties the region.
    pub fn clear(&mut self) {
        self.destroy();
        self.content.clear();
    }

    /// Completion of the page fetch identified by `ticket`.
    pub fn complete(
        &mut self,
        ticket: u64,
        result: Result<Fragment, FetchFailure>,
        observer: &mut dyn BatchObserver,
        layout: &dyn Layout,
    ) -> Option<PageRequest> {
        if !self.content.settle(ticket) {
            engine_logging::engine_debug!(
                "Dropping stale page {} for region {:?}",
                ticket,
                self.id
            );
            return None;
        }

        let succeeded = match result {
            Ok(fragment) => {
                let appended = self.content.replace_sentinel(fragment);
                observer.batch_appended(self.id, &self.content.documents()[appended]);
                true
            }
            Err(failure) => {
                engine_logging::engine_warn!(
                    "Failed to fetch content for {:?}: {}. Stopping.",
                    self.id,
                    failure
                );
                false
            }
        };

        let loader = self.loader.as_mut()?;
        loader.after_fetch(succeeded, self.id, &mut self.content, layout)
    }
}

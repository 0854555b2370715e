use std::sync::mpsc;

use crate::view_model::{AppViewModel, DocumentRow, KeywordListView, RegionView};
use crate::{
    ClassificationEngine, FeedController, FeedType, KeywordKind, KeywordSet, LoaderOptions,
    Notification, Notifier, Precedence, Region, RegionId, StatsReconciler,
};

/// Tunables of a browsing session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionOptions {
    pub feed_loader: LoaderOptions,
    pub preview_loader: LoaderOptions,
    pub precedence: Precedence,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            feed_loader: LoaderOptions {
                padding: 20,
                ..LoaderOptions::default()
            },
            preview_loader: LoaderOptions::default(),
            precedence: Precedence::default(),
        }
    }
}

/// One page session: both feeds, the keyword preview, keywords and stats.
#[derive(Debug)]
pub struct AppState {
    pub(crate) feeds: FeedController,
    pub(crate) preview: Region,
    pub(crate) preview_options: LoaderOptions,
    pub(crate) preview_subject: Option<(FeedType, String)>,
    pub(crate) classifier: ClassificationEngine,
    pub(crate) stats: StatsReconciler,
    pub(crate) positive: KeywordSet,
    pub(crate) negative: KeywordSet,
    pub(crate) keywords_requested: bool,
    pub(crate) notice: Option<String>,
    pub(crate) notifier: Notifier,
    dirty: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self::with_options(SessionOptions::default())
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: SessionOptions) -> Self {
        Self {
            feeds: FeedController::new(options.feed_loader),
            preview: Region::new(RegionId::Preview),
            preview_options: options.preview_loader,
            preview_subject: None,
            classifier: ClassificationEngine::new(options.precedence),
            stats: StatsReconciler::new(),
            positive: KeywordSet::new(),
            negative: KeywordSet::new(),
            keywords_requested: false,
            notice: None,
            notifier: Notifier::new(),
            dirty: false,
        }
    }

    /// Registers a new notification subscriber.
    pub fn subscribe(&mut self) -> mpsc::Receiver<Notification> {
        self.notifier.subscribe()
    }

    pub fn feeds(&self) -> &FeedController {
        &self.feeds
    }

    pub fn preview(&self) -> &Region {
        &self.preview
    }

    pub fn stats(&self) -> &StatsReconciler {
        &self.stats
    }

    pub fn classifier(&self) -> &ClassificationEngine {
        &self.classifier
    }

    /// Server-confirmed keywords of `kind`.
    pub fn keywords(&self, kind: KeywordKind) -> &KeywordSet {
        match kind {
            KeywordKind::Positive => &self.positive,
            KeywordKind::Negative => &self.negative,
        }
    }

    pub(crate) fn keywords_mut(&mut self, kind: KeywordKind) -> &mut KeywordSet {
        match kind {
            KeywordKind::Positive => &mut self.positive,
            KeywordKind::Negative => &mut self.negative,
        }
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn view(&self) -> AppViewModel {
        let feeds = FeedType::ALL
            .iter()
            .map(|feed| region_view(self.feeds.region(*feed)))
            .collect();
        let preview = self
            .preview_subject
            .as_ref()
            .map(|(feed, keyword)| (*feed, keyword.clone(), region_view(&self.preview)));

        AppViewModel {
            active_feed: self.feeds.active(),
            feeds,
            preview,
            stats: self.stats.summary(),
            keywords: KeywordListView {
                positive: self.positive.to_vec(),
                negative: self.negative.to_vec(),
            },
            notice: self.notice.clone(),
            dirty: self.dirty,
        }
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Returns whether a render is due and resets the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }
}

fn region_view(region: &Region) -> RegionView {
    let content = region.content();
    RegionView {
        region: region.id(),
        visible: content.is_visible(),
        loading: content.placeholder().map(str::to_owned),
        has_more: content.has_sentinel(),
        loader_state: region.loader_state(),
        documents: content
            .documents()
            .iter()
            .map(|doc| DocumentRow {
                id: doc.id.clone(),
                html: doc.html.clone(),
                text: doc.text.clone(),
                status: doc.status,
                deciding_keywords: doc.deciding_keywords(),
            })
            .collect(),
    }
}

use crate::{ClassificationStatus, DocId, FeedType, LoaderState, RegionId, StatsSummary};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub active_feed: Option<FeedType>,
    /// KEPT first, then DISCARDED.
    pub feeds: Vec<RegionView>,
    /// Open keyword preview: its feed, keyword and content.
    pub preview: Option<(FeedType, String, RegionView)>,
    /// `None` until the server reported stats.
    pub stats: Option<StatsSummary>,
    pub keywords: KeywordListView,
    /// Blocking notice the user must dismiss.
    pub notice: Option<String>,
    pub dirty: bool,
}

impl AppViewModel {
    pub fn feed(&self, feed: FeedType) -> Option<&RegionView> {
        self.feeds
            .iter()
            .find(|view| view.region == RegionId::Feed(feed))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionView {
    pub region: RegionId,
    pub visible: bool,
    pub documents: Vec<DocumentRow>,
    /// Placeholder shown while a page is loading.
    pub loading: Option<String>,
    pub has_more: bool,
    pub loader_state: Option<LoaderState>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentRow {
    pub id: DocId,
    pub html: String,
    pub text: String,
    pub status: ClassificationStatus,
    /// Keywords that explain the status, if a keyword decided it.
    pub deciding_keywords: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct KeywordListView {
    pub positive: Vec<String>,
    pub negative: Vec<String>,
}

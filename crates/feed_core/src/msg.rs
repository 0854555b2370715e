use crate::{FeedType, Fragment, KeywordKind, RegionId, StatsSnapshot};

/// Failure reported by the host for a request issued through an effect.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct FetchFailure {
    pub message: String,
}

impl FetchFailure {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Server answer to a keyword add or remove.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeywordAck {
    /// The keyword lists changed.
    Updated,
    /// The server already had (or never had) the keyword.
    Unchanged,
}

/// Server-side keyword lists of the current search.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeywordLists {
    pub positive: Vec<String>,
    pub negative: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// A new search expression was submitted or sense selection restarted.
    SearchRestarted,
    /// A search produced its feed; carries the initial KEPT page.
    FeedAvailable(Fragment),
    /// User toggled the visible feed.
    FeedSelected(FeedType),
    /// Start page of a feed arrived.
    FeedStarted {
        feed: FeedType,
        result: Result<Fragment, FetchFailure>,
    },
    /// The main window scrolled.
    Scrolled,
    /// The keyword preview scrolled.
    PreviewScrolled,
    /// A page requested by a loader arrived.
    PageLoaded {
        region: RegionId,
        ticket: u64,
        result: Result<Fragment, FetchFailure>,
    },
    /// User selected text in a document and chose its kind.
    KeywordChosen { kind: KeywordKind, keyword: String },
    /// Server acknowledged a keyword addition.
    KeywordAdded {
        kind: KeywordKind,
        keyword: String,
        result: Result<KeywordAck, FetchFailure>,
    },
    /// User cancelled a keyword from the keyword list.
    KeywordRemoveRequested { kind: KeywordKind, keyword: String },
    /// Server acknowledged a keyword removal.
    KeywordRemoved {
        kind: KeywordKind,
        keyword: String,
        result: Result<KeywordAck, FetchFailure>,
    },
    KeywordsLoaded(Result<KeywordLists, FetchFailure>),
    StatsLoaded(Result<StatsSnapshot, FetchFailure>),
    /// Open the preview of not-yet-fetched documents of `feed` matching `keyword`.
    PreviewRequested { feed: FeedType, keyword: String },
    PreviewLoaded {
        feed: FeedType,
        keyword: String,
        result: Result<Fragment, FetchFailure>,
    },
    PreviewClosed,
    /// User acknowledged the blocking notice.
    NoticeDismissed,
    /// UI/render tick to coalesce rendering.
    Tick,
}

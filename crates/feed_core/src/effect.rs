use crate::{FeedType, KeywordKind, PageRequest};

/// Requests the host runs on behalf of the state machine. Each one is answered
/// with the matching [`crate::Msg`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// GET `feed/{feed}/start`, answered by `Msg::FeedStarted`.
    StartFeed { feed: FeedType },
    /// GET the sentinel href, answered by `Msg::PageLoaded`.
    FetchPage(PageRequest),
    /// GET `feed/stats`.
    FetchStats,
    /// POST `feed/updStats`.
    PostStatsDiff { feed: FeedType, diff: i32 },
    /// POST `keywords/{kind}/new`.
    AddKeyword { kind: KeywordKind, keyword: String },
    /// POST `keywords/{kind}/remove`.
    RemoveKeyword { kind: KeywordKind, keyword: String },
    /// GET `keywords/all`.
    FetchKeywords,
    /// GET `keywords/{feed}/preview`.
    FetchPreview { feed: FeedType, keyword: String },
}

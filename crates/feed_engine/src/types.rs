use std::fmt;

use feed_core::{
    FeedType, FetchFailure, Fragment, KeywordAck, KeywordKind, KeywordLists, RegionId,
    StatsSnapshot,
};

/// Completion of one effect run by the engine thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    FeedStarted {
        feed: FeedType,
        result: Result<Fragment, FetchError>,
    },
    PageLoaded {
        region: RegionId,
        ticket: u64,
        result: Result<Fragment, FetchError>,
    },
    /// Answer to a stats refresh or a stats delta.
    StatsLoaded(Result<StatsSnapshot, FetchError>),
    KeywordAdded {
        kind: KeywordKind,
        keyword: String,
        result: Result<KeywordAck, FetchError>,
    },
    KeywordRemoved {
        kind: KeywordKind,
        keyword: String,
        result: Result<KeywordAck, FetchError>,
    },
    KeywordsLoaded(Result<KeywordLists, FetchError>),
    PreviewLoaded {
        feed: FeedType,
        keyword: String,
        result: Result<Fragment, FetchError>,
    },
    /// The engine could not start and drops every command.
    Unavailable { message: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOutput {
    pub status: u16,
    pub bytes: Vec<u8>,
    pub metadata: FetchMetadata,
}

impl FetchOutput {
    pub fn is_not_modified(&self) -> bool {
        self.status == 304
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchMetadata {
    pub original_url: String,
    pub final_url: String,
    pub content_type: Option<String>,
    pub byte_len: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct FetchError {
    pub kind: FailureKind,
    pub message: String,
}

impl FetchError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl From<FetchError> for FetchFailure {
    fn from(err: FetchError) -> Self {
        FetchFailure::new(err.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    RedirectLimitExceeded,
    TooLarge { max_bytes: u64, actual: Option<u64> },
    UnsupportedContentType { content_type: String },
    Decode,
    InvalidResponse,
    Network,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::RedirectLimitExceeded => write!(f, "redirect limit exceeded"),
            FailureKind::TooLarge { max_bytes, actual } => {
                write!(f, "response too large (max {max_bytes}, actual {actual:?})")
            }
            FailureKind::UnsupportedContentType { content_type } => {
                write!(f, "unsupported content type {content_type}")
            }
            FailureKind::Decode => write!(f, "undecodable response"),
            FailureKind::InvalidResponse => write!(f, "invalid response"),
            FailureKind::Network => write!(f, "network error"),
        }
    }
}

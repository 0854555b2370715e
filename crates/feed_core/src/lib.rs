//! Feed core: incremental loading, keyword classification and stats
//! reconciliation as a pure state machine.
mod classify;
mod document;
mod effect;
mod feed;
mod geometry;
mod loader;
mod msg;
mod notify;
mod region;
mod state;
mod stats;
mod update;
mod view_model;

pub use classify::{
    ClassificationEngine, KeywordError, KeywordPattern, Precedence, Reclassification, Rule,
};
pub use document::{
    ClassificationStatus, DocId, Document, FallbackMarker, KeywordKind, KeywordSet, ParseNameError,
};
pub use effect::Effect;
pub use feed::{FeedController, FeedType};
pub use geometry::{is_at_bottom, Geometry, Layout, Viewport};
pub use loader::{BatchObserver, IncrementalLoader, LoaderOptions, LoaderState, PageRequest};
pub use msg::{FetchFailure, KeywordAck, KeywordLists, Msg};
pub use notify::{Notification, Notifier};
pub use region::{ContentRegion, Fragment, Region, RegionId, Sentinel};
pub use state::{AppState, SessionOptions};
pub use stats::{StatsReconciler, StatsRequest, StatsSnapshot, StatsSummary};
pub use update::update;
pub use view_model::{AppViewModel, DocumentRow, KeywordListView, RegionView};

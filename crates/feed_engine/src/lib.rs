//! Feed engine: HTTP client for the feed server and effect execution.
mod api;
mod convert;
mod decode;
mod engine;
mod fetch;
mod fragment;
mod types;

pub use api::{FeedApi, HttpFeedApi};
pub use convert::{Converter, Html2MdConverter};
pub use decode::{decode_text, DecodeError, DecodedText};
pub use engine::EngineHandle;
pub use fetch::{FetchSettings, Fetcher, HttpRequest, Method, ReqwestFetcher};
pub use fragment::{FragmentParser, MarkupError, MarkupSelectors};
pub use types::{EngineEvent, FailureKind, FetchError, FetchMetadata, FetchOutput};

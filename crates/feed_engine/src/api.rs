//! Typed client for the feed server endpoints.

use std::sync::Arc;

use engine_logging::engine_debug;
use feed_core::{FeedType, Fragment, KeywordAck, KeywordKind, KeywordLists, StatsSnapshot};
use url::Url;

use crate::decode::body_text;
use crate::fetch::{Fetcher, HttpRequest};
use crate::fragment::FragmentParser;
use crate::{FailureKind, FetchError, FetchOutput};

#[async_trait::async_trait]
pub trait FeedApi: Send + Sync {
    /// `GET feed/{feed}/start`
    async fn start_feed(&self, feed: FeedType) -> Result<Fragment, FetchError>;
    /// GET of a sentinel href, resolved against the server base.
    async fn page(&self, href: &str, content_selector: Option<&str>)
        -> Result<Fragment, FetchError>;
    /// `GET feed/stats`
    async fn stats(&self) -> Result<StatsSnapshot, FetchError>;
    /// `POST feed/updStats`
    async fn post_stats_diff(&self, feed: FeedType, diff: i32)
        -> Result<StatsSnapshot, FetchError>;
    /// `POST keywords/{kind}/new`
    async fn add_keyword(&self, kind: KeywordKind, keyword: &str)
        -> Result<KeywordAck, FetchError>;
    /// `POST keywords/{kind}/remove`
    async fn remove_keyword(&self, kind: KeywordKind, keyword: &str)
        -> Result<KeywordAck, FetchError>;
    /// `GET keywords/all`
    async fn keywords(&self) -> Result<KeywordLists, FetchError>;
    /// `GET keywords/{feed}/preview?k=`
    async fn preview(&self, feed: FeedType, keyword: &str) -> Result<Fragment, FetchError>;
}

pub struct HttpFeedApi {
    base: Url,
    fetcher: Arc<dyn Fetcher>,
    parser: FragmentParser,
}

impl HttpFeedApi {
    pub fn new(
        base_url: &str,
        fetcher: Arc<dyn Fetcher>,
        parser: FragmentParser,
    ) -> Result<Self, FetchError> {
        let mut base = Url::parse(base_url)
            .map_err(|err| FetchError::new(FailureKind::InvalidUrl, err.to_string()))?;
        // Relative paths join under the base only when it ends with a slash.
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Ok(Self {
            base,
            fetcher,
            parser,
        })
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    /// Resolves a server path or sentinel href against the base URL.
    pub fn resolve(&self, href: &str) -> Result<Url, FetchError> {
        self.base
            .join(href)
            .map_err(|err| FetchError::new(FailureKind::InvalidUrl, format!("{href}: {err}")))
    }

    async fn fragment(
        &self,
        request: HttpRequest,
        content_selector: Option<&str>,
    ) -> Result<Fragment, FetchError> {
        let output = self.fetcher.fetch(request).await?;
        let html = body_text(&output)?;
        let fragment = self
            .parser
            .parse_fragment(&html, content_selector)
            .map_err(|err| FetchError::new(FailureKind::InvalidResponse, err.to_string()))?;
        engine_debug!(
            "{} documents from {} (more: {})",
            fragment.documents.len(),
            output.metadata.final_url,
            fragment.sentinel.is_some()
        );
        Ok(fragment)
    }

    async fn keyword_edit(
        &self,
        kind: KeywordKind,
        action: &str,
        keyword: &str,
    ) -> Result<KeywordAck, FetchError> {
        let url = self.resolve(&format!("keywords/{}/{action}", kind.as_path()))?;
        let output = self
            .fetcher
            .fetch(HttpRequest::post(url).with_field("k", keyword))
            .await?;
        Ok(keyword_ack(&output))
    }
}

fn keyword_ack(output: &FetchOutput) -> KeywordAck {
    if output.is_not_modified() {
        KeywordAck::Unchanged
    } else {
        KeywordAck::Updated
    }
}

fn stats_from(output: &FetchOutput) -> Result<StatsSnapshot, FetchError> {
    serde_json::from_slice(&output.bytes)
        .map_err(|err| FetchError::new(FailureKind::InvalidResponse, err.to_string()))
}

#[async_trait::async_trait]
impl FeedApi for HttpFeedApi {
    async fn start_feed(&self, feed: FeedType) -> Result<Fragment, FetchError> {
        let url = self.resolve(&format!("feed/{}/start", feed.as_path()))?;
        self.fragment(HttpRequest::get(url), None).await
    }

    async fn page(
        &self,
        href: &str,
        content_selector: Option<&str>,
    ) -> Result<Fragment, FetchError> {
        let url = self.resolve(href)?;
        self.fragment(HttpRequest::get(url), content_selector).await
    }

    async fn stats(&self) -> Result<StatsSnapshot, FetchError> {
        let url = self.resolve("feed/stats")?;
        let output = self.fetcher.fetch(HttpRequest::get(url)).await?;
        stats_from(&output)
    }

    async fn post_stats_diff(
        &self,
        feed: FeedType,
        diff: i32,
    ) -> Result<StatsSnapshot, FetchError> {
        let url = self.resolve("feed/updStats")?;
        let request = HttpRequest::post(url)
            .with_field("feedType", feed.as_path())
            .with_field("diff", diff.to_string());
        let output = self.fetcher.fetch(request).await?;
        stats_from(&output)
    }

    async fn add_keyword(&self, kind: KeywordKind, keyword: &str) -> Result<KeywordAck, FetchError> {
        self.keyword_edit(kind, "new", keyword).await
    }

    async fn remove_keyword(
        &self,
        kind: KeywordKind,
        keyword: &str,
    ) -> Result<KeywordAck, FetchError> {
        self.keyword_edit(kind, "remove", keyword).await
    }

    async fn keywords(&self) -> Result<KeywordLists, FetchError> {
        let url = self.resolve("keywords/all")?;
        let output = self.fetcher.fetch(HttpRequest::get(url)).await?;
        let html = body_text(&output)?;
        Ok(self.parser.parse_keyword_lists(&html))
    }

    async fn preview(&self, feed: FeedType, keyword: &str) -> Result<Fragment, FetchError> {
        let url = self.resolve(&format!("keywords/{}/preview", feed.as_path()))?;
        self.fragment(HttpRequest::get(url).with_query("k", keyword), None)
            .await
    }
}

use std::sync::{mpsc, Arc};
use std::thread;

use engine_logging::{engine_error, engine_info};
use feed_core::{FeedType, KeywordKind, PageRequest};

use crate::api::FeedApi;
use crate::EngineEvent;

enum EngineCommand {
    StartFeed { feed: FeedType },
    FetchPage(PageRequest),
    FetchStats,
    PostStatsDiff { feed: FeedType, diff: i32 },
    AddKeyword { kind: KeywordKind, keyword: String },
    RemoveKeyword { kind: KeywordKind, keyword: String },
    FetchKeywords,
    FetchPreview { feed: FeedType, keyword: String },
}

/// Runs server requests on a background tokio runtime. Completions are
/// polled with [`EngineHandle::try_recv`].
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
}

impl EngineHandle {
    pub fn new(api: Arc<dyn FeedApi>) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();

        thread::spawn(move || {
            let runtime = match tokio::runtime::Runtime::new() {
                Ok(runtime) => runtime,
                Err(err) => {
                    engine_error!("Failed to start tokio runtime: {}", err);
                    let _ = event_tx.send(EngineEvent::Unavailable {
                        message: err.to_string(),
                    });
                    return;
                }
            };
            while let Ok(command) = cmd_rx.recv() {
                let api = api.clone();
                let event_tx = event_tx.clone();
                runtime.spawn(async move {
                    let event = handle_command(api.as_ref(), command).await;
                    let _ = event_tx.send(event);
                });
            }
            engine_info!("Engine command channel closed");
        });

        Self { cmd_tx, event_rx }
    }

    fn send(&self, command: EngineCommand) {
        let _ = self.cmd_tx.send(command);
    }

    pub fn start_feed(&self, feed: FeedType) {
        self.send(EngineCommand::StartFeed { feed });
    }

    pub fn fetch_page(&self, request: PageRequest) {
        self.send(EngineCommand::FetchPage(request));
    }

    pub fn fetch_stats(&self) {
        self.send(EngineCommand::FetchStats);
    }

    pub fn post_stats_diff(&self, feed: FeedType, diff: i32) {
        self.send(EngineCommand::PostStatsDiff { feed, diff });
    }

    pub fn add_keyword(&self, kind: KeywordKind, keyword: impl Into<String>) {
        self.send(EngineCommand::AddKeyword {
            kind,
            keyword: keyword.into(),
        });
    }

    pub fn remove_keyword(&self, kind: KeywordKind, keyword: impl Into<String>) {
        self.send(EngineCommand::RemoveKeyword {
            kind,
            keyword: keyword.into(),
        });
    }

    pub fn fetch_keywords(&self) {
        self.send(EngineCommand::FetchKeywords);
    }

    pub fn fetch_preview(&self, feed: FeedType, keyword: impl Into<String>) {
        self.send(EngineCommand::FetchPreview {
            feed,
            keyword: keyword.into(),
        });
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }
}

async fn handle_command(api: &dyn FeedApi, command: EngineCommand) -> EngineEvent {
    match command {
        EngineCommand::StartFeed { feed } => EngineEvent::FeedStarted {
            feed,
            result: api.start_feed(feed).await,
        },
        EngineCommand::FetchPage(request) => EngineEvent::PageLoaded {
            region: request.region,
            ticket: request.ticket,
            result: api
                .page(&request.href, request.content_selector.as_deref())
                .await,
        },
        EngineCommand::FetchStats => EngineEvent::StatsLoaded(api.stats().await),
        EngineCommand::PostStatsDiff { feed, diff } => {
            EngineEvent::StatsLoaded(api.post_stats_diff(feed, diff).await)
        }
        EngineCommand::AddKeyword { kind, keyword } => {
            let result = api.add_keyword(kind, &keyword).await;
            EngineEvent::KeywordAdded {
                kind,
                keyword,
                result,
            }
        }
        EngineCommand::RemoveKeyword { kind, keyword } => {
            let result = api.remove_keyword(kind, &keyword).await;
            EngineEvent::KeywordRemoved {
                kind,
                keyword,
                result,
            }
        }
        EngineCommand::FetchKeywords => EngineEvent::KeywordsLoaded(api.keywords().await),
        EngineCommand::FetchPreview { feed, keyword } => {
            let result = api.preview(feed, &keyword).await;
            EngineEvent::PreviewLoaded {
                feed,
                keyword,
                result,
            }
        }
    }
}

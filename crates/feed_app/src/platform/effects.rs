use engine_logging::{engine_error, engine_info, engine_warn};
use feed_core::{Effect, FeedType, FetchFailure, Msg};
use feed_engine::{EngineEvent, EngineHandle};

/// Hands effects to the engine and turns its events back into messages.
pub struct EffectRunner {
    engine: EngineHandle,
    /// A restart is waiting for the initial KEPT page.
    awaiting_initial: bool,
}

impl EffectRunner {
    pub fn new(engine: EngineHandle) -> Self {
        Self {
            engine,
            awaiting_initial: false,
        }
    }

    /// Requests the initial KEPT page of a new search.
    pub fn restart(&mut self) {
        engine_info!("Requesting initial {} page", FeedType::Kept);
        self.awaiting_initial = true;
        self.engine.start_feed(FeedType::Kept);
    }

    pub fn run(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::StartFeed { feed } => {
                    engine_info!("StartFeed feed={}", feed);
                    self.engine.start_feed(feed);
                }
                Effect::FetchPage(request) => {
                    engine_info!(
                        "FetchPage region={:?} ticket={} href={}",
                        request.region,
                        request.ticket,
                        request.href
                    );
                    self.engine.fetch_page(request);
                }
                Effect::FetchStats => self.engine.fetch_stats(),
                Effect::PostStatsDiff { feed, diff } => {
                    engine_info!("PostStatsDiff feed={} diff={}", feed, diff);
                    self.engine.post_stats_diff(feed, diff);
                }
                Effect::AddKeyword { kind, keyword } => {
                    engine_info!("AddKeyword kind={:?} keyword_len={}", kind, keyword.len());
                    self.engine.add_keyword(kind, keyword);
                }
                Effect::RemoveKeyword { kind, keyword } => {
                    engine_info!("RemoveKeyword kind={:?} keyword_len={}", kind, keyword.len());
                    self.engine.remove_keyword(kind, keyword);
                }
                Effect::FetchKeywords => self.engine.fetch_keywords(),
                Effect::FetchPreview { feed, keyword } => {
                    engine_info!("FetchPreview feed={} keyword_len={}", feed, keyword.len());
                    self.engine.fetch_preview(feed, keyword);
                }
            }
        }
    }

    /// Drains finished requests.
    pub fn poll(&mut self) -> Vec<Msg> {
        let mut messages = Vec::new();
        while let Some(event) = self.engine.try_recv() {
            if let Some(msg) = event_to_msg(event, &mut self.awaiting_initial) {
                messages.push(msg);
            }
        }
        messages
    }
}

fn event_to_msg(event: EngineEvent, awaiting_initial: &mut bool) -> Option<Msg> {
    let msg = match event {
        EngineEvent::FeedStarted { feed, result } => {
            if feed == FeedType::Kept && std::mem::take(awaiting_initial) {
                return match result {
                    Ok(fragment) => Some(Msg::FeedAvailable(fragment)),
                    Err(err) => {
                        engine_warn!("Initial {} page failed: {}", feed, err);
                        None
                    }
                };
            }
            Msg::FeedStarted {
                feed,
                result: result.map_err(FetchFailure::from),
            }
        }
        EngineEvent::PageLoaded {
            region,
            ticket,
            result,
        } => Msg::PageLoaded {
            region,
            ticket,
            result: result.map_err(FetchFailure::from),
        },
        EngineEvent::StatsLoaded(result) => Msg::StatsLoaded(result.map_err(FetchFailure::from)),
        EngineEvent::KeywordAdded {
            kind,
            keyword,
            result,
        } => Msg::KeywordAdded {
            kind,
            keyword,
            result: result.map_err(FetchFailure::from),
        },
        EngineEvent::KeywordRemoved {
            kind,
            keyword,
            result,
        } => Msg::KeywordRemoved {
            kind,
            keyword,
            result: result.map_err(FetchFailure::from),
        },
        EngineEvent::KeywordsLoaded(result) => {
            Msg::KeywordsLoaded(result.map_err(FetchFailure::from))
        }
        EngineEvent::PreviewLoaded {
            feed,
            keyword,
            result,
        } => Msg::PreviewLoaded {
            feed,
            keyword,
            result: result.map_err(FetchFailure::from),
        },
        EngineEvent::Unavailable { message } => {
            engine_error!("Engine unavailable: {}", message);
            return None;
        }
    };
    Some(msg)
}

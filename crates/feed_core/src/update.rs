use engine_logging::{engine_debug, engine_info, engine_warn};

use crate::{
    AppState, Document, Effect, FeedType, KeywordAck, Layout, Msg, Notification,
    Reclassification, RegionId, StatsRequest,
};

pub(crate) const REMOVE_FAILED_NOTICE: &str = "Server failed to remove keyword";

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg, layout: &mut dyn Layout) -> (AppState, Vec<Effect>) {
    if !matches!(msg, Msg::Tick) {
        state.mark_dirty();
    }

    let effects = match msg {
        Msg::SearchRestarted => {
            engine_info!("Clearing feeds for a new search");
            state.feeds.clear_all();
            state.preview.clear();
            state.preview.content_mut().set_visible(false);
            state.preview_subject = None;
            state.stats.reset();
            state.positive.clear();
            state.negative.clear();
            state.keywords_requested = false;
            state.notice = None;
            state.notifier.publish(Notification::Cleared);
            Vec::new()
        }
        Msg::FeedAvailable(fragment) => {
            let mut effects = state
                .feeds
                .feed_available(fragment, layout, &mut state.notifier);
            effects.extend(session_refresh(&mut state));
            effects
        }
        Msg::FeedSelected(feed) => state.feeds.select_feed(feed, layout, &mut state.notifier),
        Msg::FeedStarted { feed, result } => {
            let started = result.is_ok();
            let mut effects = state
                .feeds
                .feed_started(feed, result, layout, &mut state.notifier);
            if started && state.feeds.is_initialized(feed) {
                effects.extend(session_refresh(&mut state));
            }
            effects
        }
        Msg::Scrolled => state.feeds.scrolled(layout),
        Msg::PreviewScrolled => state
            .preview
            .scrolled(layout)
            .map(Effect::FetchPage)
            .into_iter()
            .collect(),
        Msg::PageLoaded {
            region,
            ticket,
            result,
        } => match region {
            RegionId::Feed(feed) => {
                let mut batches = 0usize;
                let mut observer = |_: RegionId, documents: &[Document]| {
                    engine_debug!("Appended {} documents to {}", documents.len(), feed);
                    batches += 1;
                };
                let mut effects =
                    state
                        .feeds
                        .page_loaded(feed, ticket, result, &mut observer, layout);
                if batches > 0 {
                    effects.push(Effect::FetchStats);
                }
                effects
            }
            RegionId::Preview => {
                let mut observer = |_: RegionId, _: &[Document]| {};
                state
                    .preview
                    .complete(ticket, result, &mut observer, layout)
                    .map(Effect::FetchPage)
                    .into_iter()
                    .collect()
            }
        },
        Msg::KeywordChosen { kind, keyword } => match normalize_keyword(&keyword) {
            Some(keyword) => vec![Effect::AddKeyword { kind, keyword }],
            None => Vec::new(),
        },
        Msg::KeywordAdded {
            kind,
            keyword,
            result,
        } => match result {
            Ok(KeywordAck::Updated) => {
                state.keywords_mut(kind.opposite()).remove(&keyword);
                state.keywords_mut(kind).insert(&keyword);
                let change =
                    state
                        .classifier
                        .apply_keyword(kind, &keyword, state.feeds.documents_mut());
                state.notifier.publish(Notification::KeywordApplied {
                    kind,
                    keyword,
                    change,
                });
                vec![stats_effect(&mut state, change)]
            }
            Ok(KeywordAck::Unchanged) => {
                engine_debug!("Server already had {} keyword {:?}", kind, keyword);
                Vec::new()
            }
            Err(failure) => {
                engine_warn!("Failed to add {} keyword {:?}: {}", kind, keyword, failure);
                Vec::new()
            }
        },
        Msg::KeywordRemoveRequested { kind, keyword } => match normalize_keyword(&keyword) {
            Some(keyword) => vec![Effect::RemoveKeyword { kind, keyword }],
            None => Vec::new(),
        },
        Msg::KeywordRemoved {
            kind,
            keyword,
            result,
        } => match result {
            Ok(KeywordAck::Updated) => {
                state.keywords_mut(kind).remove(&keyword);
                let change =
                    state
                        .classifier
                        .remove_keyword(kind, &keyword, state.feeds.documents_mut());
                state.notifier.publish(Notification::KeywordRemoved {
                    kind,
                    keyword,
                    change,
                });
                vec![stats_effect(&mut state, change)]
            }
            Ok(KeywordAck::Unchanged) => {
                engine_debug!("Server did not have {} keyword {:?}", kind, keyword);
                Vec::new()
            }
            Err(failure) => {
                engine_warn!("Failed to remove {} keyword {:?}: {}", kind, keyword, failure);
                state.notice = Some(REMOVE_FAILED_NOTICE.to_string());
                Vec::new()
            }
        },
        Msg::KeywordsLoaded(result) => {
            match result {
                Ok(lists) => {
                    state.positive = lists.positive.iter().map(String::as_str).collect();
                    state.negative = lists.negative.iter().map(String::as_str).collect();
                }
                Err(failure) => {
                    engine_warn!("Failed to load keywords: {}", failure);
                    state.keywords_requested = false;
                }
            }
            Vec::new()
        }
        Msg::StatsLoaded(result) => {
            if let Some(snapshot) = state.stats.accept(result) {
                let snapshot = snapshot.clone();
                state.notifier.publish(Notification::StatsUpdated(snapshot));
            }
            Vec::new()
        }
        Msg::PreviewRequested { feed, keyword } => match normalize_keyword(&keyword) {
            Some(keyword) => {
                state.preview.clear();
                state.preview.content_mut().set_visible(false);
                state.preview_subject = Some((feed, keyword.clone()));
                vec![Effect::FetchPreview { feed, keyword }]
            }
            None => Vec::new(),
        },
        Msg::PreviewLoaded {
            feed,
            keyword,
            result,
        } => preview_loaded(&mut state, feed, keyword, result, layout),
        Msg::PreviewClosed => {
            state.preview.clear();
            state.preview.content_mut().set_visible(false);
            state.preview_subject = None;
            Vec::new()
        }
        Msg::NoticeDismissed => {
            state.notice = None;
            Vec::new()
        }
        Msg::Tick => Vec::new(),
    };

    (state, effects)
}

fn preview_loaded(
    state: &mut AppState,
    feed: FeedType,
    keyword: String,
    result: Result<crate::Fragment, crate::FetchFailure>,
    layout: &mut dyn Layout,
) -> Vec<Effect> {
    let current = state
        .preview_subject
        .as_ref()
        .is_some_and(|(f, k)| *f == feed && *k == keyword);
    if !current {
        engine_debug!("Dropping preview for {} {:?}", feed, keyword);
        return Vec::new();
    }

    match result {
        Ok(fragment) => {
            let options = state.preview_options.clone();
            state.preview.content_mut().set_content(fragment);
            state.preview.content_mut().set_visible(true);
            state
                .preview
                .bind(options, layout)
                .map(Effect::FetchPage)
                .into_iter()
                .collect()
        }
        Err(failure) => {
            engine_warn!("Failed to preview {} {:?}: {}", feed, keyword, failure);
            state.preview_subject = None;
            Vec::new()
        }
    }
}

/// Keyword list and stats follow every newly shown feed.
fn session_refresh(state: &mut AppState) -> Vec<Effect> {
    let mut effects = Vec::with_capacity(2);
    if !state.keywords_requested {
        state.keywords_requested = true;
        effects.push(Effect::FetchKeywords);
    }
    effects.push(Effect::FetchStats);
    effects
}

fn stats_effect(state: &mut AppState, change: Reclassification) -> Effect {
    match state.stats.reconcile(change) {
        StatsRequest::Refresh => Effect::FetchStats,
        StatsRequest::Update { feed, diff } => Effect::PostStatsDiff { feed, diff },
    }
}

fn normalize_keyword(raw: &str) -> Option<String> {
    let keyword = raw.trim();
    if keyword.is_empty() {
        engine_debug!("Ignoring empty keyword");
        return None;
    }
    Some(keyword.to_string())
}

use std::io::{self, BufRead, Write};
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use anyhow::Context;
use engine_logging::{engine_debug, engine_info, level_from_name};
use feed_core::{update, AppState, Msg, Notification};
use feed_engine::{EngineHandle, FragmentParser, HttpFeedApi, ReqwestFetcher};

use super::config::AppConfig;
use super::effects::EffectRunner;
use super::input::{parse_command, Command, HELP};
use super::logging;
use super::ui::layout::TerminalLayout;
use super::ui::render::render;

const POLL_INTERVAL: Duration = Duration::from_millis(75);
const DEFAULT_COLUMNS: usize = 100;
const DEFAULT_LINES: i64 = 40;

pub fn run_app(config: AppConfig) -> anyhow::Result<()> {
    logging::initialize(
        config.logging.destination,
        level_from_name(&config.logging.level),
    );
    engine_info!("Starting feed_app against {}", config.server.base_url);

    let fetcher = ReqwestFetcher::new(config.fetch_settings()).context("building http client")?;
    let parser = FragmentParser::new(&config.markup).context("compiling markup selectors")?;
    let api = HttpFeedApi::new(&config.server.base_url, Arc::new(fetcher), parser)
        .context("parsing server url")?;
    let runner = EffectRunner::new(EngineHandle::new(Arc::new(api)));

    let mut app = App::new(config, runner);
    let lines = spawn_stdin_reader();

    app.restart();
    app.redraw_if_dirty();

    loop {
        match lines.recv_timeout(POLL_INTERVAL) {
            Ok(Some(line)) => {
                if app.handle_line(&line) == Flow::Quit {
                    break;
                }
            }
            Ok(None) | Err(mpsc::RecvTimeoutError::Disconnected) => break,
            Err(mpsc::RecvTimeoutError::Timeout) => app.dispatch(Msg::Tick),
        }
        app.poll_engine();
        app.redraw_if_dirty();
    }

    engine_info!("feed_app exiting");
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

struct App {
    state: AppState,
    layout: TerminalLayout,
    runner: EffectRunner,
    notifications: mpsc::Receiver<Notification>,
    status: Option<String>,
}

impl App {
    fn new(config: AppConfig, runner: EffectRunner) -> Self {
        let mut state = AppState::with_options(config.session_options());
        let notifications = state.subscribe();
        Self {
            state,
            layout: TerminalLayout::new(terminal_columns(), terminal_lines()),
            runner,
            notifications,
            status: None,
        }
    }

    fn restart(&mut self) {
        self.layout.reset_preview();
        self.layout.forget_documents();
        self.dispatch(Msg::SearchRestarted);
        self.runner.restart();
    }

    fn dispatch(&mut self, msg: Msg) {
        let state = std::mem::take(&mut self.state);
        let (state, effects) = update(state, msg, &mut self.layout);
        self.state = state;
        self.runner.run(effects);
    }

    fn poll_engine(&mut self) {
        for msg in self.runner.poll() {
            self.dispatch(msg);
        }
        while let Ok(notification) = self.notifications.try_recv() {
            engine_debug!("Notification: {:?}", notification);
            if let Some(status) = status_line(&notification) {
                self.status = Some(status);
            }
        }
    }

    fn handle_line(&mut self, line: &str) -> Flow {
        let command = match parse_command(line) {
            Ok(Some(command)) => command,
            Ok(None) => return Flow::Continue,
            Err(err) => {
                self.status = Some(err.to_string());
                self.print_screen();
                return Flow::Continue;
            }
        };

        match command {
            Command::Scroll(delta) => {
                let height = self.visible_feed_height();
                self.layout.scroll_by(delta, height);
                self.dispatch(Msg::Scrolled);
                // Redraw even when the loader had nothing to do.
                self.print_screen();
            }
            Command::ScrollPreview(delta) => {
                let height = self.preview_height();
                self.layout.scroll_preview_by(delta, height);
                self.dispatch(Msg::PreviewScrolled);
                self.print_screen();
            }
            Command::Show(feed) => self.dispatch(Msg::FeedSelected(feed)),
            Command::AddKeyword { kind, keyword } => {
                self.dispatch(Msg::KeywordChosen { kind, keyword })
            }
            Command::RemoveKeyword { kind, keyword } => {
                self.dispatch(Msg::KeywordRemoveRequested { kind, keyword })
            }
            Command::Preview { feed, keyword } => {
                self.layout.reset_preview();
                self.dispatch(Msg::PreviewRequested { feed, keyword });
            }
            Command::ClosePreview => self.dispatch(Msg::PreviewClosed),
            Command::Dismiss => self.dispatch(Msg::NoticeDismissed),
            Command::Restart => self.restart(),
            Command::Help => {
                self.status = Some(HELP.to_string());
                self.print_screen();
            }
            Command::Quit => return Flow::Quit,
        }
        Flow::Continue
    }

    fn visible_feed_height(&self) -> i64 {
        let view = self.state.view();
        view.feeds
            .iter()
            .find(|feed| feed.visible)
            .map(|feed| {
                self.layout.content_height(
                    feed.documents
                        .iter()
                        .map(|row| (row.id.as_str(), row.html.as_str())),
                    feed.loading.is_some(),
                )
            })
            .unwrap_or(0)
    }

    fn preview_height(&self) -> i64 {
        let content = self.state.preview().content();
        self.layout.content_height(
            content
                .documents()
                .iter()
                .map(|doc| (doc.id.as_str(), doc.html.as_str())),
            content.placeholder().is_some(),
        )
    }

    fn redraw_if_dirty(&mut self) {
        if self.state.consume_dirty() {
            self.print_screen();
        }
    }

    fn print_screen(&mut self) {
        let mut screen = render(&self.state.view(), &self.layout);
        if let Some(status) = self.status.take() {
            screen.push_str(&status);
            screen.push('\n');
        }
        let mut stdout = io::stdout().lock();
        let _ = write!(stdout, "\x1b[2J\x1b[H{screen}> ");
        let _ = stdout.flush();
    }
}

fn status_line(notification: &Notification) -> Option<String> {
    match notification {
        Notification::KeywordApplied {
            keyword, change, ..
        } => Some(format!(
            "added '{keyword}': {} documents reclassified",
            change.changed
        )),
        Notification::KeywordRemoved {
            keyword, change, ..
        } => Some(format!(
            "removed '{keyword}': {} documents reclassified",
            change.changed
        )),
        Notification::Cleared | Notification::FeedSelected(_) | Notification::StatsUpdated(_) => {
            None
        }
    }
}

/// Lines read from stdin; `None` once stdin is closed.
fn spawn_stdin_reader() -> mpsc::Receiver<Option<String>> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            match line {
                Ok(line) => {
                    if tx.send(Some(line)).is_err() {
                        return;
                    }
                }
                Err(_) => break,
            }
        }
        let _ = tx.send(None);
    });
    rx
}

fn terminal_columns() -> usize {
    std::env::var("COLUMNS")
        .ok()
        .and_then(|value| value.trim().parse().ok())
        .unwrap_or(DEFAULT_COLUMNS)
}

fn terminal_lines() -> i64 {
    std::env::var("LINES")
        .ok()
        .and_then(|value| value.trim().parse().ok())
        // Keep a line for the prompt.
        .map(|lines: i64| lines - 1)
        .unwrap_or(DEFAULT_LINES)
}

#[cfg(test)]
mod tests {
    use feed_core::{KeywordKind, Notification, Reclassification};

    use super::status_line;

    #[test]
    fn reclassification_is_reported_on_the_status_line() {
        let notification = Notification::KeywordApplied {
            kind: KeywordKind::Positive,
            keyword: "cats".to_string(),
            change: Reclassification {
                changed: 3,
                kept_delta: 1,
            },
        };
        assert_eq!(
            status_line(&notification).as_deref(),
            Some("added 'cats': 3 documents reclassified")
        );
        assert_eq!(status_line(&Notification::Cleared), None);
    }
}

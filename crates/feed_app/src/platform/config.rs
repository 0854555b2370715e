//! RON configuration for the terminal host.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use engine_logging::engine_info;
use feed_core::{LoaderOptions, Precedence, Rule, SessionOptions};
use feed_engine::{FetchSettings, MarkupSelectors};
use serde::{Deserialize, Serialize};

use super::logging::LogDestination;

pub const DEFAULT_CONFIG_FILE: &str = "feed_app.ron";

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub loader: LoaderConfig,
    pub markup: MarkupSelectors,
    pub classification: ClassificationConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub base_url: String,
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: u64,
    pub max_bytes: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        let fetch = FetchSettings::default();
        Self {
            base_url: "http://localhost:8080/".to_string(),
            connect_timeout_secs: fetch.connect_timeout.as_secs(),
            request_timeout_secs: fetch.request_timeout.as_secs(),
            max_bytes: fetch.max_bytes,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    pub padding: i64,
    pub loading_html: String,
    pub content_selector: Option<String>,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        let feed = SessionOptions::default().feed_loader;
        Self {
            padding: feed.padding,
            loading_html: feed.loading_html,
            content_selector: feed.content_selector,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassificationConfig {
    pub precedence: Vec<Rule>,
}

impl Default for ClassificationConfig {
    fn default() -> Self {
        Self {
            precedence: Precedence::default().rules().to_vec(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub destination: LogDestination,
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            destination: LogDestination::File,
            level: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Loads `path`, or `feed_app.ron` when no path is given. Only a missing
    /// default file falls back to the built-in defaults.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let (path, explicit) = match path {
            Some(path) => (path.to_path_buf(), true),
            None => (PathBuf::from(DEFAULT_CONFIG_FILE), false),
        };

        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(err) if !explicit && err.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Self::default());
            }
            Err(err) => {
                return Err(err).with_context(|| format!("reading config {}", path.display()))
            }
        };

        let config: AppConfig =
            ron::from_str(&text).with_context(|| format!("parsing config {}", path.display()))?;
        engine_info!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    pub fn fetch_settings(&self) -> FetchSettings {
        FetchSettings {
            connect_timeout: Duration::from_secs(self.server.connect_timeout_secs),
            request_timeout: Duration::from_secs(self.server.request_timeout_secs),
            max_bytes: self.server.max_bytes,
            ..FetchSettings::default()
        }
    }

    pub fn session_options(&self) -> SessionOptions {
        SessionOptions {
            feed_loader: LoaderOptions {
                padding: self.loader.padding,
                loading_html: self.loader.loading_html.clone(),
                content_selector: self.loader.content_selector.clone(),
            },
            preview_loader: LoaderOptions {
                loading_html: self.loader.loading_html.clone(),
                ..LoaderOptions::default()
            },
            precedence: Precedence::new(self.classification.precedence.clone()),
        }
    }
}

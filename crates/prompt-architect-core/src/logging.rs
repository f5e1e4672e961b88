use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Logging configuration for the app
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "debug", "info", "warn", "error", "off")
    pub level: String,
    /// Optional file path for log output. If None, logs go to stderr
    pub file_path: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "off".to_string(),
            file_path: None,
        }
    }
}

impl LoggingConfig {
    /// Create config from environment variables
    pub fn from_env() -> Self {
        Self {
            level: std::env::var("PROMPT_ARCHITECT_LOG").unwrap_or_else(|_| "off".to_string()),
            file_path: std::env::var("PROMPT_ARCHITECT_LOG_FILE").ok().map(PathBuf::from),
        }
    }

    pub fn level<S: Into<String>>(mut self, level: S) -> Self {
        self.level = level.into();
        self
    }

    pub fn file_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.file_path = Some(path.into());
        self
    }

    /// Use `path` unless a file was already chosen
    pub fn or_file_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        if self.file_path.is_none() {
            self.file_path = Some(path.into());
        }
        self
    }

    pub fn is_enabled(&self) -> bool {
        !self.level.eq_ignore_ascii_case("off")
    }

    fn filter(&self) -> Result<EnvFilter> {
        Ok(EnvFilter::new("warn")
            .add_directive(format!("prompt_architect_core={}", self.level).parse()?)
            .add_directive(format!("prompt_architect={}", self.level).parse()?))
    }

    /// Initialize the global tracing subscriber. Does nothing when the level is `off`.
    pub fn init(self) -> Result<()> {
        if !self.is_enabled() {
            return Ok(());
        }
        let filter = self.filter()?;

        match self.file_path {
            Some(path) => {
                let dir = path.parent().unwrap_or_else(|| Path::new("."));
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| "prompt-architect.log".to_string());
                let file_appender = RollingFileAppender::builder()
                    .rotation(Rotation::DAILY)
                    .filename_prefix(name)
                    .build(dir)?;

                // File output without colors (colors don't work well in files)
                tracing_subscriber::registry()
                    .with(filter)
                    .with(
                        tracing_subscriber::fmt::layer()
                            .with_writer(file_appender)
                            .with_ansi(false),
                    )
                    .try_init()
                    .map_err(|_| anyhow!("Failed to initialize subscriber (already set)"))?;
            }
            None => {
                tracing_subscriber::registry()
                    .with(filter)
                    .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                    .try_init()
                    .map_err(|_| anyhow!("Failed to initialize subscriber (already set)"))?;
            }
        }

        Ok(())
    }
}

//! Observability configuration.

use serde::{Deserialize, Serialize};

/// Environment variable holding the log filter directive.
pub const FILTER_ENV: &str = "RUST_LOG";

/// Environment variable selecting the log format (`json` or `plain`).
pub const FORMAT_ENV: &str = "BLOCKS_LOG_FORMAT";

const DEFAULT_FILTER: &str = "info";

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    /// One JSON object per line, with timestamps.
    #[default]
    Json,
    /// Human-readable single-line output.
    Plain,
}

impl LogFormat {
    /// Parses `json` / `plain`, case-insensitively.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "json" => Some(LogFormat::Json),
            "plain" | "text" | "pretty" => Some(LogFormat::Plain),
            _ => None,
        }
    }
}

/// How the process logs.
///
/// Constructed once at the process edge and passed by reference to [`crate::init`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// `EnvFilter` directive, e.g. `info` or `blocks_infra=debug,info`.
    pub filter: String,
    pub format: LogFormat,
    /// Include the event target (module path) in each line.
    pub with_target: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            filter: DEFAULT_FILTER.to_string(),
            format: LogFormat::Json,
            with_target: false,
        }
    }
}

impl ObservabilityConfig {
    /// Reads [`FILTER_ENV`] and [`FORMAT_ENV`], keeping defaults for anything unset
    /// or unrecognized.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) over an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(filter) = lookup(FILTER_ENV).filter(|f| !f.trim().is_empty()) {
            config.filter = filter;
        }
        if let Some(format) = lookup(FORMAT_ENV).as_deref().and_then(LogFormat::parse) {
            config.format = format;
        }
        config
    }

    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = filter.into();
        self
    }

    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_target(mut self, with_target: bool) -> Self {
        self.with_target = with_target;
        self
    }

    pub fn is_json(&self) -> bool {
        self.format == LogFormat::Json
    }
}

use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilemanConfig {
    pub shell: ShellConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShellConfig {
    /// Prompt template. Supports `{cwd}`, `{user}`, `{home}` and the
    /// colour tokens `{red}`, `{green}`, `{blue}`, `{yellow}`, `{cyan}`,
    /// `{bold}`, `{reset}`.
    pub prompt: String,
    /// Colourise status prefixes (warnings, errors, notices).
    pub color: bool,
    pub history: HistoryConfig,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            prompt: "{cwd} > ".to_string(),
            color: true,
            history: HistoryConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    pub enabled: bool,
    pub file: String,
    pub max_entries: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            file: "~/.fileman_history".to_string(),
            max_entries: 1000,
        }
    }
}

impl HistoryConfig {
    /// History file path with a leading `~` expanded.
    pub fn path(&self) -> PathBuf {
        PathBuf::from(shellexpand::tilde(&self.file).into_owned())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: LogLevel,
    pub format: LogFormat,
    /// Extra `EnvFilter` directives appended to the level, e.g. `fileman=debug`.
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Warn,
            format: LogFormat::Compact,
            filter: String::new(),
        }
    }
}

impl LoggingConfig {
    /// Directive string suitable for `tracing_subscriber::EnvFilter::new`.
    pub fn directives(&self) -> String {
        if self.filter.is_empty() {
            self.level.as_str().to_string()
        } else {
            format!("{},{}", self.level.as_str(), self.filter)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

impl FromStr for LogLevel {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "trace" => Ok(Self::Trace),
            "debug" => Ok(Self::Debug),
            "info" => Ok(Self::Info),
            "warn" | "warning" => Ok(Self::Warn),
            "error" => Ok(Self::Error),
            other => Err(ConfigError::InvalidValue(format!("unknown log level '{other}'"))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Compact,
}

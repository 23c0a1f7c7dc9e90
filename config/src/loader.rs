use crate::{ConfigError, FilemanConfig};
use regex::Regex;
use serde_yaml::{Mapping, Value};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

type EnvLookup = Arc<dyn Fn(&str) -> Option<String> + Send + Sync>;

pub struct ConfigLoader {
    explicit_file: Option<PathBuf>,
    search_paths: Vec<PathBuf>,
    env: EnvLookup,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    pub fn new() -> Self {
        let mut search_paths = Vec::new();

        if let Some(home) = dirs::home_dir() {
            search_paths.push(home.join(".config/fileman/fileman.yaml"));
        }
        search_paths.push(PathBuf::from("./fileman.yaml"));

        #[cfg(unix)]
        search_paths.insert(0, PathBuf::from("/etc/fileman/fileman.yaml"));

        Self {
            explicit_file: None,
            search_paths,
            env: Arc::new(|key: &str| std::env::var(key).ok()),
        }
    }

    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        self.explicit_file = Some(path.as_ref().to_path_buf());
        self
    }

    /// Replace the default search locations.
    pub fn with_search_paths(mut self, paths: Vec<PathBuf>) -> Self {
        self.search_paths = paths;
        self
    }

    /// Read `FILEMAN_*` and `${VAR}` values through `lookup` instead of
    /// the process environment.
    pub fn with_env<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String> + Send + Sync + 'static,
    {
        self.env = Arc::new(lookup);
        self
    }

    pub fn load(&self) -> Result<FilemanConfig, ConfigError> {
        let explicit = self
            .explicit_file
            .clone()
            .or_else(|| (self.env)("FILEMAN_CONFIG").map(PathBuf::from));

        let mut merged = Value::Mapping(Mapping::new());
        if let Some(path) = explicit {
            let content = std::fs::read_to_string(&path).map_err(|e| ConfigError::ReadFile {
                path: path.clone(),
                source: e,
            })?;
            debug!(path = %path.display(), "loading config");
            merge_values(&mut merged, self.parse_yaml(&content)?);
        } else {
            for path in &self.search_paths {
                if path.exists() {
                    if let Ok(content) = std::fs::read_to_string(path) {
                        debug!(path = %path.display(), "merging config");
                        merge_values(&mut merged, self.parse_yaml(&content)?);
                    }
                }
            }
        }

        let mut config: FilemanConfig = serde_yaml::from_value(merged)?;
        self.apply_env_overrides(&mut config);
        Ok(config)
    }

    fn parse_yaml(&self, content: &str) -> Result<Value, ConfigError> {
        let expanded = self.expand_env_vars(content);
        if expanded.trim().is_empty() {
            return Ok(Value::Mapping(Mapping::new()));
        }
        Ok(serde_yaml::from_str(&expanded)?)
    }

    fn expand_env_vars(&self, content: &str) -> String {
        let Ok(re) = Regex::new(r"\$\{([^}]+)\}") else {
            return content.to_string();
        };
        re.replace_all(content, |caps: &regex::Captures| {
            (self.env)(&caps[1]).unwrap_or_default()
        })
        .to_string()
    }

    fn apply_env_overrides(&self, config: &mut FilemanConfig) {
        if let Some(level) = (self.env)("FILEMAN_LOG_LEVEL") {
            if let Ok(l) = level.parse() {
                config.logging.level = l;
            }
        }
        if let Some(prompt) = (self.env)("FILEMAN_PROMPT") {
            if !prompt.is_empty() {
                config.shell.prompt = prompt;
            }
        }
        if let Some(file) = (self.env)("FILEMAN_HISTORY_FILE") {
            if !file.is_empty() {
                config.shell.history.file = file;
            }
        }
    }
}

/// Fold `overlay` into `base`. Mappings merge key by key; any other value
/// present in `overlay` replaces what `base` had.
fn merge_values(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Mapping(base), Value::Mapping(overlay)) => {
            for (key, value) in overlay {
                match base.get_mut(&key) {
                    Some(existing) => merge_values(existing, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (_, Value::Null) => {}
        (base, overlay) => *base = overlay,
    }
}

//! fileman configuration
//!
//! The shell runs with compiled-in defaults when no file is present.
//! Optional YAML files tune the prompt, line history and logging.
//!
//! # Configuration Loading Priority
//!
//! 1. Compiled-in defaults
//! 2. `/etc/fileman/fileman.yaml` (system-wide)
//! 3. `~/.config/fileman/fileman.yaml` (user)
//! 4. `./fileman.yaml` (project-local)
//! 5. `--config FILE` or `FILEMAN_CONFIG=/path/to/config.yaml` (explicit, replaces 2-4)
//! 6. Environment variables (highest priority)
//!
//! # Example Configuration
//!
//! ```yaml
//! shell:
//!   prompt: "{green}{cwd}{reset} > "
//!   color: true
//!   history:
//!     file: "~/.fileman_history"
//!     max_entries: 1000
//!
//! logging:
//!   level: warn
//! ```

#![allow(missing_docs)]

mod error;
mod loader;
mod types;

pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use types::*;

/// Load configuration from default locations.
///
/// Searches for config files in order and merges them.
/// Environment variables override file values.
pub fn load() -> Result<FilemanConfig, ConfigError> {
    ConfigLoader::new().load()
}

/// Load configuration from a specific file.
pub fn load_from_file(path: &str) -> Result<FilemanConfig, ConfigError> {
    ConfigLoader::new().with_file(path).load()
}

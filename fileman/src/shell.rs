//! Session state

use crate::error::{FmError, FmResult};
use crate::path;
use std::path::{Path, PathBuf};

pub struct Shell {
    /// Current directory; the only notion of "where we are".
    pub cwd: PathBuf,
    /// Start directory and the floor for `up`.
    pub home: PathBuf,
}

impl Shell {
    /// Session rooted at `home`, without checking that it exists.
    pub fn new(home: impl AsRef<Path>) -> Self {
        let home = path::normalize(home.as_ref());
        Self {
            cwd: home.clone(),
            home,
        }
    }

    /// Session rooted at `home`, which must be an existing directory.
    /// Relative paths are made absolute once, here.
    pub async fn open(home: impl AsRef<Path>) -> FmResult<Self> {
        let home = home.as_ref();
        let absolute = tokio::fs::canonicalize(home)
            .await
            .map_err(|e| FmError::from_io_kind(home, e))?;
        let shell = Self::new(absolute);
        let metadata = tokio::fs::metadata(&shell.home)
            .await
            .map_err(|e| FmError::from_io_kind(&shell.home, e))?;
        if !metadata.is_dir() {
            return Err(FmError::NotADirectory(shell.home.display().to_string()));
        }
        Ok(shell)
    }

    /// Session rooted at the user's home directory.
    pub async fn open_home() -> FmResult<Self> {
        let home = dirs::home_dir()
            .ok_or_else(|| FmError::NotFound("home directory".to_string()))?;
        Self::open(home).await
    }

    pub fn resolve_path(&self, raw: &str) -> PathBuf {
        path::resolve(&self.cwd, &self.home, raw)
    }

    pub fn at_home(&self) -> bool {
        self.cwd == self.home
    }
}

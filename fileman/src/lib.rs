//! fileman - interactive file manager shell
//!
//! This crate provides:
//! - A read-eval-print loop rooted at the user's home directory
//! - A closed set of file commands (ls, cat, cp, mv, rm, hash, compress, ...)
//! - Session-relative path resolution that never touches the process cwd

pub mod command;
pub mod error;
pub mod eval;
pub mod help;
pub mod path;
pub mod shell;

pub use command::Command;
pub use error::{FmError, FmResult};
pub use eval::{ExecContext, LineOutcome, Output};
pub use shell::Shell;

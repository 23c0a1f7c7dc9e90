//! Command dispatch for fileman

use crate::command::Command;
use crate::error::{FmError, FmResult};
use crate::shell::Shell;
use colored::Colorize;
use std::io::Write;
use tracing::{debug, info, warn};

mod builtins_codec;
mod builtins_fs;
mod builtins_nav;
mod builtins_os;
pub(crate) mod utils;

pub use builtins_codec::sha256_file;
pub use builtins_fs::{list_dir, DirEntryInfo, EntryKind};
pub use builtins_os::{cpu_info, CpuInfo, HostProperty, EOL};
pub use utils::current_user;

pub(crate) const STREAM_CHUNK_SIZE: usize = 64 * 1024;

pub enum Output {
    Stdout,
    Stderr,
    Buffer(Vec<u8>),
}

impl Output {
    pub fn write(&mut self, data: &[u8]) -> std::io::Result<()> {
        match self {
            Output::Stdout => {
                let mut out = std::io::stdout().lock();
                out.write_all(data)?;
                out.flush()
            }
            Output::Stderr => std::io::stderr().write_all(data),
            Output::Buffer(buf) => {
                buf.extend_from_slice(data);
                Ok(())
            }
        }
    }

    pub fn writeln(&mut self, s: &str) -> std::io::Result<()> {
        self.write(s.as_bytes())?;
        self.write(b"\n")
    }

    /// Captured bytes, empty for the process streams.
    pub fn contents(&self) -> &[u8] {
        match self {
            Output::Buffer(buf) => buf,
            Output::Stdout | Output::Stderr => &[],
        }
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(self.contents()).into_owned()
    }
}

/// Where a command writes, and how status lines are styled.
pub struct ExecContext {
    pub stdout: Output,
    pub stderr: Output,
    pub color: bool,
}

impl Default for ExecContext {
    fn default() -> Self {
        Self {
            stdout: Output::Stdout,
            stderr: Output::Stderr,
            color: false,
        }
    }
}

impl ExecContext {
    /// Context that captures both streams, for `-c` runs and tests.
    pub fn buffered() -> Self {
        Self {
            stdout: Output::Buffer(Vec::new()),
            stderr: Output::Buffer(Vec::new()),
            color: false,
        }
    }

    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    pub fn write_err(&mut self, msg: &str) {
        let _ = self.stderr.writeln(msg);
    }

    /// Informational line on stdout.
    pub fn notice(&mut self, msg: &str) -> std::io::Result<()> {
        let line = if self.color { msg.cyan().to_string() } else { msg.to_string() };
        self.stdout.writeln(&line)
    }

    /// Warning line on stdout; the session carries on.
    pub fn warn(&mut self, msg: &str) -> std::io::Result<()> {
        let line = if self.color { msg.yellow().to_string() } else { msg.to_string() };
        self.stdout.writeln(&line)
    }

    /// Failure line on stderr.
    pub fn fail(&mut self, msg: &str) {
        let line = if self.color { msg.red().to_string() } else { msg.to_string() };
        self.write_err(&line);
    }
}

/// What happened to one input line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineOutcome {
    Empty,
    Completed,
    Failed,
    Unknown,
}

impl Shell {
    /// Run one line of input through the dispatch loop.
    ///
    /// Handler failures are reported to `ctx` and never returned; the only
    /// error that escapes is [`FmError::Exit`] (plus failures writing to
    /// `ctx` itself). Every line that does not exit ends with the current
    /// directory being printed.
    pub async fn execute_line(&mut self, line: &str, ctx: &mut ExecContext) -> FmResult<LineOutcome> {
        let outcome = self.dispatch_line(line, ctx).await?;
        ctx.stdout
            .writeln(&format!("You are currently in {}", self.cwd.display()))?;
        Ok(outcome)
    }

    async fn dispatch_line(&mut self, line: &str, ctx: &mut ExecContext) -> FmResult<LineOutcome> {
        let mut words = line.split_whitespace();
        let Some(name) = words.next() else {
            return Ok(LineOutcome::Empty);
        };
        let args: Vec<String> = words.map(str::to_string).collect();

        let Ok(command) = name.parse::<Command>() else {
            debug!(name, "unknown operation");
            ctx.warn(&format!("Invalid input: unknown operation '{name}'"))?;
            return Ok(LineOutcome::Unknown);
        };

        match self.run_command(command, &args, ctx).await {
            Ok(()) => {
                if command.is_mutating() {
                    info!(command = %command, ?args, cwd = %self.cwd.display(), "applied");
                }
                Ok(LineOutcome::Completed)
            }
            Err(FmError::Exit(code)) => Err(FmError::Exit(code)),
            Err(e) => {
                warn!(command = %command, error = %e, "operation failed");
                ctx.fail(&format!("Error: Operation failed. Details - {e}"));
                Ok(LineOutcome::Failed)
            }
        }
    }

    /// Look up `name` and run it, returning the handler's error as-is.
    pub async fn execute(&mut self, name: &str, args: &[String], ctx: &mut ExecContext) -> FmResult<()> {
        let command = name.parse::<Command>()?;
        self.run_command(command, args, ctx).await
    }

    pub async fn run_command(
        &mut self,
        command: Command,
        args: &[String],
        ctx: &mut ExecContext,
    ) -> FmResult<()> {
        debug!(command = %command, ?args, cwd = %self.cwd.display(), "dispatch");
        match command {
            Command::Up => self.cmd_up(ctx),
            Command::Cd => self.cmd_cd(args).await,
            Command::Ls => self.cmd_ls(ctx).await,
            Command::Cat => self.cmd_cat(args, ctx).await,
            Command::Add => self.cmd_add(args, ctx).await,
            Command::Rn => self.cmd_rn(args, ctx).await,
            Command::Cp => self.cmd_copy(args, ctx, false).await,
            Command::Mv => self.cmd_copy(args, ctx, true).await,
            Command::Rm => self.cmd_rm(args, ctx).await,
            Command::Os => self.cmd_os(args, ctx).await,
            Command::Hash => self.cmd_hash(args, ctx).await,
            Command::Compress => self.cmd_compress(args, ctx).await,
            Command::Decompress => self.cmd_decompress(args, ctx).await,
            Command::Help => cmd_help(args, ctx),
            Command::Exit => Err(FmError::Exit(0)),
        }
    }
}

fn cmd_help(args: &[String], ctx: &mut ExecContext) -> FmResult<()> {
    use crate::help::{format_help, format_help_list, get_help};

    let text = match args.first() {
        None => format_help_list(),
        Some(name) => match get_help(name) {
            Some(help) => format_help(help),
            None => return Err(FmError::InvalidArgument(format!("no help for '{name}'"))),
        },
    };
    ctx.stdout.write(text.as_bytes())?;
    Ok(())
}

//! Command registry

use crate::error::FmError;
use std::fmt;
use std::str::FromStr;

/// Every command the shell understands. The set is closed: a name that
/// does not parse into a variant is an unknown operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    Up,
    Cd,
    Ls,
    Cat,
    Add,
    Rn,
    Cp,
    Mv,
    Rm,
    Os,
    Hash,
    Compress,
    Decompress,
    Help,
    Exit,
}

impl Command {
    pub const ALL: &'static [Command] = &[
        Command::Up,
        Command::Cd,
        Command::Ls,
        Command::Cat,
        Command::Add,
        Command::Rn,
        Command::Cp,
        Command::Mv,
        Command::Rm,
        Command::Os,
        Command::Hash,
        Command::Compress,
        Command::Decompress,
        Command::Help,
        Command::Exit,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Command::Up => "up",
            Command::Cd => "cd",
            Command::Ls => "ls",
            Command::Cat => "cat",
            Command::Add => "add",
            Command::Rn => "rn",
            Command::Cp => "cp",
            Command::Mv => "mv",
            Command::Rm => "rm",
            Command::Os => "os",
            Command::Hash => "hash",
            Command::Compress => "compress",
            Command::Decompress => "decompress",
            Command::Help => "help",
            Command::Exit => ".exit",
        }
    }

    /// Commands that may change files or the session directory.
    pub fn is_mutating(self) -> bool {
        matches!(
            self,
            Command::Up
                | Command::Cd
                | Command::Add
                | Command::Rn
                | Command::Cp
                | Command::Mv
                | Command::Rm
                | Command::Compress
                | Command::Decompress
        )
    }
}

impl FromStr for Command {
    type Err = FmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Command::ALL
            .iter()
            .copied()
            .find(|cmd| cmd.name() == s)
            .ok_or_else(|| FmError::UnknownCommand(s.to_string()))
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

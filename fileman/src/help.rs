use crate::command::Command;

pub struct CommandHelp {
    pub command: Command,
    pub summary: &'static str,
    pub usage: &'static str,
    pub options: &'static [(&'static str, &'static str)],
}

pub const COMMANDS: &[CommandHelp] = &[
    CommandHelp {
        command: Command::Up,
        summary: "Go to the parent directory (not above home)",
        usage: "up",
        options: &[],
    },
    CommandHelp {
        command: Command::Cd,
        summary: "Change the current directory",
        usage: "cd PATH",
        options: &[],
    },
    CommandHelp {
        command: Command::Ls,
        summary: "List the current directory, folders first",
        usage: "ls",
        options: &[],
    },
    CommandHelp {
        command: Command::Cat,
        summary: "Print a file's contents",
        usage: "cat PATH",
        options: &[],
    },
    CommandHelp {
        command: Command::Add,
        summary: "Create an empty file",
        usage: "add NAME",
        options: &[],
    },
    CommandHelp {
        command: Command::Rn,
        summary: "Rename a file within its directory",
        usage: "rn PATH NEW_NAME",
        options: &[],
    },
    CommandHelp {
        command: Command::Cp,
        summary: "Copy a file into a directory",
        usage: "cp SOURCE DEST_DIR",
        options: &[],
    },
    CommandHelp {
        command: Command::Mv,
        summary: "Move a file into a directory",
        usage: "mv SOURCE DEST_DIR",
        options: &[],
    },
    CommandHelp {
        command: Command::Rm,
        summary: "Delete a file or an empty directory",
        usage: "rm PATH",
        options: &[],
    },
    CommandHelp {
        command: Command::Os,
        summary: "Print host information",
        usage: "os KEY",
        options: &[
            ("--EOL", "Platform line ending"),
            ("--cpus", "CPU count, model and clock speed"),
            ("--homedir", "Home directory"),
            ("--username", "Current user name"),
            ("--architecture", "CPU architecture"),
        ],
    },
    CommandHelp {
        command: Command::Hash,
        summary: "Print the SHA-256 digest of a file",
        usage: "hash PATH",
        options: &[],
    },
    CommandHelp {
        command: Command::Compress,
        summary: "Compress a file with Brotli",
        usage: "compress SOURCE DEST",
        options: &[],
    },
    CommandHelp {
        command: Command::Decompress,
        summary: "Decompress a Brotli file",
        usage: "decompress SOURCE DEST",
        options: &[],
    },
    CommandHelp {
        command: Command::Help,
        summary: "Show help for commands",
        usage: "help [COMMAND]",
        options: &[],
    },
    CommandHelp {
        command: Command::Exit,
        summary: "Leave the file manager",
        usage: ".exit",
        options: &[],
    },
];

pub fn get_help(name: &str) -> Option<&'static CommandHelp> {
    COMMANDS.iter().find(|c| c.command.name() == name)
}

pub fn format_help(cmd: &CommandHelp) -> String {
    let mut out = String::new();
    out.push_str(&format!("{} - {}\n\n", cmd.command, cmd.summary));
    out.push_str(&format!("Usage: {}\n", cmd.usage));
    if !cmd.options.is_empty() {
        out.push_str("\nKeys:\n");
        for (opt, desc) in cmd.options {
            out.push_str(&format!("  {:16} {}\n", opt, desc));
        }
    }
    out
}

pub fn format_help_list() -> String {
    let mut out = String::new();
    out.push_str("Available commands:\n\n");

    for cmd in COMMANDS {
        out.push_str(&format!("  {:12} {}\n", cmd.command.name(), cmd.summary));
    }

    out.push_str("\nUse 'help COMMAND' for more information.\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_command_has_help() {
        for cmd in Command::ALL {
            assert!(get_help(cmd.name()).is_some(), "missing help for {cmd}");
        }
    }

    #[test]
    fn os_help_lists_keys() {
        let text = format_help(get_help("os").unwrap());
        assert!(text.contains("--architecture"));
        assert!(text.starts_with("os - "));
    }
}

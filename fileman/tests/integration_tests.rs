//! Integration tests for fileman
//!
//! Each test builds a throwaway home directory, drives the shell one line
//! at a time through `execute_line`, and inspects both the captured output
//! and the filesystem afterwards.

use fileman::{Command, ExecContext, FmError, LineOutcome, Shell};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

struct Session {
    home: TempDir,
    shell: Shell,
}

impl Session {
    fn new() -> Self {
        let home = tempfile::tempdir().expect("tempdir");
        let shell = Shell::new(home.path());
        Self { home, shell }
    }

    fn home(&self) -> &Path {
        self.home.path()
    }

    /// Run one line and return its outcome plus captured stdout/stderr.
    async fn line(&mut self, input: &str) -> (LineOutcome, String, String) {
        let mut ctx = ExecContext::buffered();
        let outcome = self
            .shell
            .execute_line(input, &mut ctx)
            .await
            .expect("line should not exit");
        (outcome, ctx.stdout.text(), ctx.stderr.text())
    }

    /// Run a command and return the handler's own result.
    async fn run(&mut self, name: &str, args: &[&str]) -> Result<String, FmError> {
        let mut ctx = ExecContext::buffered();
        let args: Vec<String> = args.iter().map(|s| s.to_string()).collect();
        self.shell.execute(name, &args, &mut ctx).await?;
        Ok(ctx.stdout.text())
    }

    fn snapshot(&self) -> Vec<String> {
        let mut names: Vec<String> = walk(self.home());
        names.sort();
        names
    }
}

fn walk(dir: &Path) -> Vec<String> {
    let mut out = Vec::new();
    for entry in fs::read_dir(dir).unwrap().flatten() {
        let path = entry.path();
        out.push(path.display().to_string());
        if path.is_dir() {
            out.extend(walk(&path));
        }
    }
    out
}

#[tokio::test]
async fn whitespace_lines_are_noops() {
    let mut s = Session::new();
    let before = s.snapshot();
    for input in ["", "   ", "\t\t", " \t  "] {
        let (outcome, stdout, stderr) = s.line(input).await;
        assert_eq!(outcome, LineOutcome::Empty);
        assert_eq!(stdout, format!("You are currently in {}\n", s.home().display()));
        assert!(stderr.is_empty());
    }
    assert_eq!(s.snapshot(), before);
}

#[tokio::test]
async fn unknown_commands_warn_without_mutation() {
    let mut s = Session::new();
    fs::write(s.home().join("keep.txt"), b"x").unwrap();
    let before = s.snapshot();

    for input in ["delete keep.txt", "RM keep.txt", "exit", "touch new"] {
        let (outcome, stdout, _) = s.line(input).await;
        assert_eq!(outcome, LineOutcome::Unknown);
        assert!(stdout.contains("unknown operation"));
        assert!(stdout.ends_with(&format!("You are currently in {}\n", s.home().display())));
    }
    assert_eq!(s.snapshot(), before);
}

#[tokio::test]
async fn navigation_scenario() {
    let mut s = Session::new();
    fs::create_dir(s.home().join("projects")).unwrap();

    let (outcome, stdout, _) = s.line("cd projects").await;
    assert_eq!(outcome, LineOutcome::Completed);
    assert_eq!(s.shell.cwd, s.home().join("projects"));
    assert!(stdout.ends_with(&format!("{}\n", s.home().join("projects").display())));

    s.line("up").await;
    assert_eq!(s.shell.cwd, s.home());

    let (outcome, stdout, _) = s.line("up").await;
    assert_eq!(outcome, LineOutcome::Completed);
    assert_eq!(s.shell.cwd, s.home());
    assert!(stdout.contains("already in the home directory"));
}

#[tokio::test]
async fn cd_to_missing_path_keeps_cwd() {
    let mut s = Session::new();
    let err = s.run("cd", &["nowhere"]).await.unwrap_err();
    assert!(matches!(err, FmError::NotFound(_)));
    assert_eq!(s.shell.cwd, s.home());

    let (outcome, _, stderr) = s.line("cd nowhere/deeper").await;
    assert_eq!(outcome, LineOutcome::Failed);
    assert!(stderr.starts_with("Error: Operation failed. Details - No such file or directory"));
    assert_eq!(s.shell.cwd, s.home());
}

#[tokio::test]
async fn cd_absolute_and_relative_parent() {
    let mut s = Session::new();
    fs::create_dir_all(s.home().join("a/b")).unwrap();
    let abs = s.home().join("a/b");

    s.run("cd", &[abs.to_str().unwrap()]).await.unwrap();
    assert_eq!(s.shell.cwd, abs);
    s.run("cd", &["../.."]).await.unwrap();
    assert_eq!(s.shell.cwd, s.home());
}

#[tokio::test]
async fn add_twice_scenario() {
    let mut s = Session::new();
    let (outcome, _, _) = s.line("add test.txt").await;
    assert_eq!(outcome, LineOutcome::Completed);
    assert_eq!(fs::metadata(s.home().join("test.txt")).unwrap().len(), 0);

    fs::write(s.home().join("test.txt"), b"content").unwrap();
    let err = s.run("add", &["test.txt"]).await.unwrap_err();
    assert!(matches!(err, FmError::AlreadyExists(_)));
    assert_eq!(fs::read(s.home().join("test.txt")).unwrap(), b"content");
}

#[tokio::test]
async fn copy_and_move_reject_directories() {
    let mut s = Session::new();
    fs::create_dir_all(s.home().join("src/inner")).unwrap();
    fs::create_dir(s.home().join("dst")).unwrap();
    let before = s.snapshot();

    for cmd in ["cp", "mv"] {
        let err = s.run(cmd, &["src", "dst"]).await.unwrap_err();
        assert!(matches!(err, FmError::Unsupported(_)), "{cmd}: {err}");
    }
    assert_eq!(s.snapshot(), before);
}

#[tokio::test]
async fn move_preserves_bytes_and_removes_source() {
    let mut s = Session::new();
    fs::create_dir(s.home().join("D")).unwrap();
    let payload: Vec<u8> = (0..300_000u32).map(|i| (i * 7 % 256) as u8).collect();
    fs::write(s.home().join("F"), &payload).unwrap();

    let (outcome, stdout, _) = s.line("mv F D").await;
    assert_eq!(outcome, LineOutcome::Completed);
    assert!(stdout.contains("moved to"));
    assert_eq!(fs::read(s.home().join("D/F")).unwrap(), payload);
    assert!(!s.home().join("F").exists());
}

#[tokio::test]
async fn copy_into_parent_from_subdirectory() {
    let mut s = Session::new();
    fs::create_dir(s.home().join("sub")).unwrap();
    fs::write(s.home().join("sub/note.md"), b"# hi").unwrap();

    s.run("cd", &["sub"]).await.unwrap();
    s.run("cp", &["note.md", ".."]).await.unwrap();
    assert_eq!(fs::read(s.home().join("note.md")).unwrap(), b"# hi");
    assert!(s.home().join("sub/note.md").exists());
}

#[tokio::test]
async fn compress_then_decompress_round_trips() {
    let mut s = Session::new();
    let text = "The quick brown fox jumps over the lazy dog.\n".repeat(5_000);
    fs::write(s.home().join("A"), &text).unwrap();

    let (o1, _, _) = s.line("compress A B").await;
    let (o2, _, _) = s.line("decompress B C").await;
    assert_eq!((o1, o2), (LineOutcome::Completed, LineOutcome::Completed));
    assert_eq!(fs::read_to_string(s.home().join("C")).unwrap(), text);
}

#[tokio::test]
async fn hash_is_stable_across_runs() {
    let mut s = Session::new();
    fs::write(s.home().join("F"), b"hello fileman").unwrap();

    let first = s.run("hash", &["F"]).await.unwrap();
    let second = s.run("hash", &["F"]).await.unwrap();
    assert_eq!(first, second);
    assert_eq!(first.trim().len(), 64);
    assert!(first.trim().chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
}

#[tokio::test]
async fn cat_prints_file_and_newline() {
    let mut s = Session::new();
    fs::write(s.home().join("poem.txt"), "über\nfin").unwrap();
    let out = s.run("cat", &["poem.txt"]).await.unwrap();
    assert_eq!(out, "über\nfin\n");
}

#[tokio::test]
async fn ls_reports_table_or_empty_message() {
    let mut s = Session::new();
    let out = s.run("ls", &[]).await.unwrap();
    assert_eq!(out, "Directory is empty\n");

    fs::write(s.home().join("b.txt"), b"").unwrap();
    fs::create_dir(s.home().join("c")).unwrap();
    let out = s.run("ls", &[]).await.unwrap();
    let folder_row = out.find("│ c ").unwrap();
    let file_row = out.find("│ b.txt").unwrap();
    assert!(folder_row < file_row);
    assert!(out.contains("(index)"));
}

#[tokio::test]
async fn rename_and_remove() {
    let mut s = Session::new();
    fs::write(s.home().join("old"), b"1").unwrap();

    s.run("rn", &["old", "new"]).await.unwrap();
    assert!(s.home().join("new").exists());
    assert!(!s.home().join("old").exists());

    s.run("rm", &["new"]).await.unwrap();
    assert!(!s.home().join("new").exists());

    let (outcome, _, stderr) = s.line("rm new").await;
    assert_eq!(outcome, LineOutcome::Failed);
    assert!(stderr.contains("Operation failed"));
}

#[tokio::test]
async fn missing_arguments_are_invalid() {
    let mut s = Session::new();
    let cases: &[(&str, &[&str])] = &[
        ("cd", &[]),
        ("cat", &[]),
        ("add", &[]),
        ("rn", &["x"]),
        ("cp", &["x"]),
        ("mv", &[]),
        ("rm", &[]),
        ("os", &[]),
        ("hash", &[]),
        ("compress", &["x"]),
        ("decompress", &[]),
    ];
    for (name, args) in cases {
        let err = s.run(name, args).await.unwrap_err();
        assert!(matches!(err, FmError::InvalidArgument(_)), "{name}: {err}");
    }
}

#[tokio::test]
async fn os_keys() {
    let mut s = Session::new();
    assert_eq!(s.run("os", &["--architecture"]).await.unwrap().trim(), std::env::consts::ARCH);
    assert!(s.run("os", &["--homedir"]).await.unwrap().trim().starts_with('/'));
    assert!(matches!(
        s.run("os", &["--everything"]).await,
        Err(FmError::InvalidArgument(_))
    ));
}

#[tokio::test]
async fn exit_ends_session_without_redisplay() {
    let mut s = Session::new();
    let mut ctx = ExecContext::buffered();
    let result = s.shell.execute_line("  .exit  ", &mut ctx).await;
    assert!(matches!(result, Err(FmError::Exit(0))));
    assert!(ctx.stdout.contents().is_empty());
}

#[tokio::test]
async fn failures_do_not_end_session() {
    let mut s = Session::new();
    for input in ["cat nope", "cp a", "decompress x y", "rm ghost"] {
        let (outcome, _, stderr) = s.line(input).await;
        assert_eq!(outcome, LineOutcome::Failed, "{input}");
        assert!(stderr.starts_with("Error: Operation failed. Details - "));
    }
    let (outcome, _, _) = s.line("add after.txt").await;
    assert_eq!(outcome, LineOutcome::Completed);
}

#[test]
fn every_command_is_registered() {
    let names: Vec<&str> = Command::ALL.iter().map(|c| c.name()).collect();
    for expected in [
        "up", "cd", "ls", "cat", "add", "rn", "cp", "mv", "rm", "os", "hash", "compress",
        "decompress", ".exit",
    ] {
        assert!(names.contains(&expected), "{expected} missing");
    }
}

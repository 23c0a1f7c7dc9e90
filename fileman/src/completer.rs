use fileman::path::resolve;
use fileman::Command;
use rustyline::completion::{Completer, Pair};
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Context, Helper};
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

pub struct FilemanHelper {
    pub cwd: Arc<RwLock<PathBuf>>,
    pub home: PathBuf,
}

impl FilemanHelper {
    pub fn new(cwd: Arc<RwLock<PathBuf>>, home: PathBuf) -> Self {
        Self { cwd, home }
    }
}

impl Completer for FilemanHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let line_to_cursor = &line[..pos];
        let (start, word) = find_word_start(line_to_cursor);
        let is_first_word = !line_to_cursor[..start].contains(|c: char| !c.is_whitespace());

        if is_first_word {
            if word.is_empty() {
                return Ok((pos, vec![]));
            }
            let completions = Command::ALL
                .iter()
                .map(|cmd| cmd.name())
                .filter(|name| name.starts_with(word))
                .map(|name| Pair {
                    display: name.to_string(),
                    replacement: name.to_string(),
                })
                .collect();
            return Ok((start, completions));
        }

        let cwd = match self.cwd.read() {
            Ok(guard) => guard.clone(),
            Err(_) => return Ok((pos, vec![])),
        };

        let (dir_prefix, partial_name) = match word.rfind('/') {
            Some(last_slash) => (&word[..=last_slash], &word[last_slash + 1..]),
            None => ("", word),
        };
        let dir = if dir_prefix.is_empty() {
            cwd
        } else {
            resolve(&cwd, &self.home, dir_prefix)
        };

        let completions = complete_path(&dir, partial_name)
            .into_iter()
            .map(|name| Pair {
                replacement: format!("{dir_prefix}{name}"),
                display: name,
            })
            .collect();

        Ok((start, completions))
    }
}

fn complete_path(dir: &Path, partial: &str) -> Vec<String> {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return vec![];
    };
    let mut names: Vec<String> = entries
        .flatten()
        .filter_map(|entry| {
            let name = entry.file_name().to_string_lossy().into_owned();
            if !name.starts_with(partial) {
                return None;
            }
            let is_dir = entry.file_type().is_ok_and(|ft| ft.is_dir());
            Some(if is_dir { format!("{name}/") } else { name })
        })
        .collect();
    names.sort();
    names
}

fn find_word_start(line: &str) -> (usize, &str) {
    let mut start = line.len();
    for (i, c) in line.char_indices().rev() {
        if c.is_whitespace() {
            break;
        }
        start = i;
    }
    (start, &line[start..])
}

impl Hinter for FilemanHelper {
    type Hint = String;

    fn hint(&self, _line: &str, _pos: usize, _ctx: &Context<'_>) -> Option<String> {
        None
    }
}

impl Highlighter for FilemanHelper {
    fn highlight_hint<'h>(&self, hint: &'h str) -> Cow<'h, str> {
        Cow::Borrowed(hint)
    }
}

impl Validator for FilemanHelper {}

impl Helper for FilemanHelper {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn word_start_splits_on_whitespace() {
        assert_eq!(find_word_start("cp a.txt do"), (9, "do"));
        assert_eq!(find_word_start("ls"), (0, "ls"));
        assert_eq!(find_word_start("cat "), (4, ""));
    }

    #[test]
    fn path_candidates_mark_directories() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("docs")).unwrap();
        std::fs::write(dir.path().join("draft.txt"), b"").unwrap();
        std::fs::write(dir.path().join("other"), b"").unwrap();

        assert_eq!(complete_path(dir.path(), "d"), ["docs/", "draft.txt"]);
        assert!(complete_path(&dir.path().join("missing"), "").is_empty());
    }
}

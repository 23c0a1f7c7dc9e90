//! Path resolution against the session directory.
//!
//! Every path argument goes through [`resolve`] before it reaches the
//! filesystem. The process working directory is never consulted.

use std::path::{Component, Path, PathBuf};

/// Resolve `raw` against `cwd`, expanding a leading `~` to `home`.
///
/// The result is absolute and lexically normalized: `.` components are
/// dropped and `..` pops one component, stopping at the root.
pub fn resolve(cwd: &Path, home: &Path, raw: &str) -> PathBuf {
    let expanded = if raw == "~" {
        home.to_path_buf()
    } else if let Some(rest) = raw.strip_prefix("~/") {
        home.join(rest)
    } else {
        PathBuf::from(raw)
    };

    if expanded.is_absolute() {
        normalize(&expanded)
    } else {
        normalize(&cwd.join(expanded))
    }
}

/// Lexically normalize a path without touching the filesystem.
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Prefix(prefix) => out.push(prefix.as_os_str()),
            Component::RootDir => out.push(component.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            Component::Normal(name) => out.push(name),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cwd() -> PathBuf {
        PathBuf::from("/home/u/projects")
    }

    fn home() -> PathBuf {
        PathBuf::from("/home/u")
    }

    #[test]
    fn relative_joins_cwd() {
        assert_eq!(resolve(&cwd(), &home(), "a.txt"), PathBuf::from("/home/u/projects/a.txt"));
        assert_eq!(resolve(&cwd(), &home(), "./a/./b"), PathBuf::from("/home/u/projects/a/b"));
    }

    #[test]
    fn parent_components_pop() {
        assert_eq!(resolve(&cwd(), &home(), ".."), home());
        assert_eq!(resolve(&cwd(), &home(), "../../../../.."), PathBuf::from("/"));
        assert_eq!(resolve(&cwd(), &home(), "x/../y"), PathBuf::from("/home/u/projects/y"));
    }

    #[test]
    fn absolute_ignores_cwd() {
        assert_eq!(resolve(&cwd(), &home(), "/etc//hosts"), PathBuf::from("/etc/hosts"));
        assert_eq!(resolve(&cwd(), &home(), "/tmp/../var"), PathBuf::from("/var"));
    }

    #[test]
    fn tilde_expands_to_home() {
        assert_eq!(resolve(&cwd(), &home(), "~"), home());
        assert_eq!(resolve(&cwd(), &home(), "~/notes"), PathBuf::from("/home/u/notes"));
        assert_eq!(resolve(&cwd(), &home(), "~other"), PathBuf::from("/home/u/projects/~other"));
    }

    #[test]
    fn empty_resolves_to_cwd() {
        assert_eq!(resolve(&cwd(), &home(), ""), cwd());
    }
}

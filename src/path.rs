//! Shorthand path expansion for backup list entries.
//!
//! Entries may be absolute (`/etc/hosts`), home-relative (`~/notes`),
//! sibling-user (`~alice/notes`) or plain relative. Expansion is best
//! effort: when a resolution step fails, the input is kept unchanged.

use std::path::{Path, PathBuf, MAIN_SEPARATOR};

/// Root directory holding user home directories on the given platform
/// (`std::env::consts::OS` identifiers).
pub fn users_root_dir(platform: &str) -> &'static str {
    match platform {
        "macos" => "/Users",
        _ => "/home",
    }
}

/// Expand a backup list entry into an absolute path.
///
/// Relative entries resolve against `exec_dir`, the directory containing
/// the running executable (not the working directory). Passing `None`
/// leaves them unchanged.
pub fn expand_path(path: &str, exec_dir: Option<&Path>) -> PathBuf {
    let sep = MAIN_SEPARATOR;

    if path.starts_with(sep) {
        // case 1: /some/absolute/path
        PathBuf::from(path)
    } else if let Some(rest) = path.strip_prefix(&format!("~{sep}")) {
        // case 2: ~/somewhere
        match dirs::home_dir() {
            Some(home) => home.join(rest),
            None => PathBuf::from(path),
        }
    } else if let Some(rest) = path.strip_prefix('~') {
        // case 3: ~someone/somewhere
        Path::new(users_root_dir(std::env::consts::OS)).join(rest)
    } else {
        // case 4: some/relative/path
        match exec_dir {
            Some(dir) => dir.join(path),
            None => PathBuf::from(path),
        }
    }
}

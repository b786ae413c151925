//! Program lookup on `PATH`

use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

/// True for a regular file with any execute bit set
pub fn is_executable(path: &Path) -> bool {
    match path.metadata() {
        Ok(metadata) if metadata.is_file() => metadata.permissions().mode() & 0o111 != 0,
        _ => false,
    }
}

/// Locate a program.
///
/// A name containing `/` is taken as a path (relative to `cwd` when not
/// absolute). Anything else is searched for in each directory of
/// `search_path`, which may be separated by `:` or `;`. Empty entries mean
/// the current directory.
pub fn resolve_program(name: &str, search_path: &str, cwd: &Path) -> Option<PathBuf> {
    if name.is_empty() {
        return None;
    }

    if name.contains('/') {
        let path = cwd.join(name);
        return is_executable(&path).then_some(path);
    }

    search_path
        .split([':', ';'])
        .map(|dir| {
            if dir.is_empty() {
                cwd.join(name)
            } else {
                cwd.join(dir).join(name)
            }
        })
        .find(|candidate| is_executable(candidate))
}

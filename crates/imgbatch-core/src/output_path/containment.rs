//! Lexical containment check for output paths.

use std::io;
use std::path::{Component, Path, PathBuf};

/// Makes `path` absolute (against the current directory) and removes `.`
/// and `..` components without touching the filesystem.
pub fn normalize(path: &Path) -> io::Result<PathBuf> {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()?.join(path)
    };

    let mut out = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    Ok(out)
}

/// True if `path` is `directory` itself or lies beneath it, after both are
/// normalized. Comparison is per component, so `/out2` is not inside `/out`.
pub fn is_within_directory(path: &Path, directory: &Path) -> io::Result<bool> {
    let path = normalize(path)?;
    let directory = normalize(directory)?;
    Ok(path.starts_with(&directory))
}

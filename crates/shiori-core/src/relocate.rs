use std::io;
use std::path::{Path, PathBuf};

use crate::error::ShioriError;

/// Holding area for consumed episodes, relative to the working directory.
pub const WATCHED_DIR: &str = "watched";

/// Create `working_dir/watched` unless it already exists.
pub fn ensure_watched_dir(working_dir: &Path) -> io::Result<PathBuf> {
    let dir = working_dir.join(WATCHED_DIR);
    if !dir.is_dir() {
        std::fs::create_dir_all(&dir)?;
        tracing::info!(path = %dir.display(), "created watched directory");
    }
    Ok(dir)
}

/// Move `file_name` from `working_dir` into its watched directory.
///
/// An existing file at the destination is never replaced.
pub fn relocate(file_name: &str, working_dir: &Path) -> Result<PathBuf, ShioriError> {
    let failure = |source: io::Error| ShioriError::Relocation {
        file: file_name.to_string(),
        source,
    };

    let watched = ensure_watched_dir(working_dir).map_err(failure)?;
    let source = working_dir.join(file_name);
    let destination = watched.join(file_name);

    if destination.exists() {
        return Err(failure(io::Error::new(
            io::ErrorKind::AlreadyExists,
            format!("{} already exists", destination.display()),
        )));
    }

    std::fs::rename(&source, &destination).map_err(failure)?;
    tracing::info!(from = %source.display(), to = %destination.display(), "moved episode file");
    Ok(destination)
}

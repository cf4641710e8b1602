//! Subcommand handlers

pub mod analyze;
pub mod coverage;

use crate::error::CliResult;
use std::path::{Path, PathBuf};

/// Resolve `path` against the current directory if it is relative. Paths
/// handed to subprocesses with their own working directory must be absolute.
pub(crate) fn absolutize(path: &Path) -> CliResult<PathBuf> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(std::env::current_dir()?.join(path))
    }
}

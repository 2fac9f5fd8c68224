use ignore::WalkBuilder;
use std::path::{Path, PathBuf};
use tracing::{debug, info, trace};

use crate::errors::{RenameError, RenameResult};
use crate::filters::FileFilter;

/// Expands include/ignore globs under `root` into a concrete, sorted file list.
///
/// Hidden files are walked (`.env*` has to be reachable) and `.gitignore` rules are
/// honoured even outside a git checkout. Globs are matched against paths relative to
/// `root`.
pub fn resolve_files(root: &Path, include: &[String], ignore: &[String]) -> RenameResult<Vec<PathBuf>> {
    if !root.is_dir() {
        return Err(RenameError::file_not_found(root));
    }
    let filter = FileFilter::new(include, ignore)?;

    let mut builder = WalkBuilder::new(root);
    builder
        .hidden(false)
        .git_ignore(true)
        .git_exclude(true)
        .git_global(false)
        .require_git(false)
        .filter_entry(|entry| entry.file_name() != ".git");

    debug!("Scanning directory: {}", root.display());
    let mut files: Vec<PathBuf> = builder
        .build()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                debug!("Skipping unreadable entry: {}", e);
                None
            }
        })
        .filter(|entry| entry.file_type().is_some_and(|ft| ft.is_file()))
        .filter(|entry| {
            let relative = entry.path().strip_prefix(root).unwrap_or(entry.path());
            let keep = filter.should_include_file(relative);
            if !keep {
                trace!("Filtered out: {}", relative.display());
            }
            keep
        })
        .map(|entry| entry.into_path())
        .collect();

    files.sort();
    files.dedup();
    info!("Resolved {} files under {}", files.len(), root.display());
    Ok(files)
}

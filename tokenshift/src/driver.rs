//! Runs the rewrite strategies over a resolved file list.
//!
//! Work is spread over a dedicated rayon pool whose size is the configured concurrency
//! limit, so at most that many files are being read, rewritten or written at once. Every
//! file produces exactly one [`FileOutcome`]; a failure on one file never stops the others.
use indicatif::{ProgressBar, ProgressStyle};
use rayon::iter::{IntoParallelRefIterator, ParallelIterator};
use rayon::ThreadPoolBuilder;
use std::fs;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use tracing::{debug, info, trace, warn};

use crate::classifier::{classify, FileKind};
use crate::errors::{RenameError, RenameResult};
use crate::options::RenameOptions;
use crate::results::{FileOutcome, RewritePreview, RunSummary};
use crate::strategies;

/// Maps `f` over `items` with no more than `limit` calls in flight
pub(crate) fn run_bounded<T, R, F>(items: &[T], limit: NonZeroUsize, f: F) -> RenameResult<Vec<R>>
where
    T: Sync,
    R: Send,
    F: Fn(&T) -> R + Sync + Send,
{
    let pool = ThreadPoolBuilder::new()
        .num_threads(limit.get())
        .thread_name(|i| format!("tokenshift-worker-{}", i))
        .build()
        .map_err(|e| RenameError::config_error(format!("Failed to start worker pool: {}", e)))?;

    Ok(pool.install(|| items.par_iter().map(&f).collect()))
}

/// Writes through a sibling temp file so a crash never leaves a half-written file
fn write_atomically(path: &Path, content: &str) -> RenameResult<()> {
    let metadata = fs::metadata(path).map_err(|e| RenameError::from_io(path, e))?;
    if metadata.permissions().readonly() {
        return Err(RenameError::permission_denied(path));
    }

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let tmp_path = path.with_file_name(format!(".{}.tokenshift.tmp", file_name));

    fs::write(&tmp_path, content).map_err(|e| RenameError::from_io(&tmp_path, e))?;
    if let Err(e) = fs::set_permissions(&tmp_path, metadata.permissions())
        .and_then(|_| fs::rename(&tmp_path, path))
    {
        let _ = fs::remove_file(&tmp_path);
        return Err(RenameError::from_io(path, e));
    }
    Ok(())
}

fn rewrite_file(
    path: &Path,
    kind: FileKind,
    options: &RenameOptions,
    outcome: &mut FileOutcome,
) -> RenameResult<()> {
    let bytes = fs::read(path).map_err(|e| RenameError::from_io(path, e))?;
    outcome.was_read = true;
    let original = String::from_utf8(bytes).map_err(|_| RenameError::invalid_utf8(path))?;

    let rewritten = strategies::rewrite(kind, &original, options)?;
    if let Some(warning) = &rewritten.warning {
        warn!("{}: {}", path.display(), warning);
    }
    outcome.warning = rewritten.warning;

    if rewritten.content == original {
        trace!("No changes in {}", path.display());
        return Ok(());
    }

    if options.preview {
        debug!("Would modify {}", path.display());
        outcome.was_modified = true;
        outcome.preview = Some(RewritePreview {
            original,
            rewritten: rewritten.content,
        });
        return Ok(());
    }

    write_atomically(path, &rewritten.content)?;
    outcome.was_modified = true;
    debug!("Modified {}", path.display());
    Ok(())
}

/// Classifies, rewrites and (outside preview mode) writes back a single file.
///
/// Files no strategy claims are passed through without being opened.
pub fn process_file(path: &Path, options: &RenameOptions) -> FileOutcome {
    let mut outcome = FileOutcome::new(path);
    let Some(kind) = classify(path) else {
        trace!("No strategy for {}", path.display());
        return outcome;
    };
    outcome.strategy = Some(kind);

    if let Err(e) = rewrite_file(path, kind, options, &mut outcome) {
        warn!("Failed to process {}: {}", path.display(), e);
        outcome.error = Some(e.to_string());
    }
    outcome
}

fn process_all(
    files: &[PathBuf],
    options: &RenameOptions,
    progress: Option<&ProgressBar>,
) -> RenameResult<(RunSummary, Vec<FileOutcome>)> {
    info!(
        "Processing {} files with concurrency {}",
        files.len(),
        options.concurrency_limit
    );
    let outcomes = run_bounded(files, options.concurrency_limit, |path| {
        let outcome = process_file(path, options);
        if let Some(progress) = progress {
            progress.inc(1);
        }
        outcome
    })?;

    let summary = RunSummary::from_outcomes(&outcomes);
    info!(
        "Processed {} files: {} modified, {} errors, {} warnings",
        summary.processed, summary.modified, summary.errors, summary.warnings
    );
    Ok((summary, outcomes))
}

/// Processes every file, returning the summary and one outcome per input path (in input order)
pub fn process_files(
    files: &[PathBuf],
    options: &RenameOptions,
) -> RenameResult<(RunSummary, Vec<FileOutcome>)> {
    process_all(files, options, None)
}

/// Like [`process_files`], with a progress bar on stderr
pub fn process_files_with_progress(
    files: &[PathBuf],
    options: &RenameOptions,
) -> RenameResult<(RunSummary, Vec<FileOutcome>)> {
    let progress = ProgressBar::new(files.len() as u64);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} files")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-"),
    );

    let result = process_all(files, options, Some(&progress));
    progress.finish_and_clear();
    result
}

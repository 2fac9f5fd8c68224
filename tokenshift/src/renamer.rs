use std::path::PathBuf;
use tracing::info;

use crate::config::RenameConfig;
use crate::driver::{process_files, process_files_with_progress};
use crate::errors::RenameResult;
use crate::files::resolve_files;
use crate::options::RenameOptions;
use crate::post_pass::run_post_pass;
use crate::results::{FileOutcome, RunReport, RunSummary};
use crate::validation::validate;

/// Entry point for a rename run: resolve files, rewrite them, then run the post-pass updaters.
#[derive(Debug, Clone)]
pub struct Renamer {
    options: RenameOptions,
}

impl Renamer {
    pub fn new(options: RenameOptions) -> Self {
        Self { options }
    }

    /// Validates `config` first; nothing is touched if that fails
    pub fn from_config(config: &RenameConfig) -> RenameResult<Self> {
        Ok(Self::new(validate(config)?))
    }

    pub fn options(&self) -> &RenameOptions {
        &self.options
    }

    /// The files a run would process
    pub fn resolve_files(&self) -> RenameResult<Vec<PathBuf>> {
        resolve_files(&self.options.root, &self.options.include, &self.options.ignore)
    }

    pub fn run(&self) -> RenameResult<RunReport> {
        let files = self.resolve_files()?;
        self.run_on(&files)
    }

    /// Runs against a caller-supplied file list instead of resolving one
    pub fn run_on(&self, files: &[PathBuf]) -> RenameResult<RunReport> {
        self.finish(process_files(files, &self.options)?)
    }

    pub fn run_with_progress(&self) -> RenameResult<RunReport> {
        let files = self.resolve_files()?;
        self.finish(process_files_with_progress(&files, &self.options)?)
    }

    fn finish(&self, (summary, outcomes): (RunSummary, Vec<FileOutcome>)) -> RenameResult<RunReport> {
        let post_pass = run_post_pass(&self.options);
        info!(
            "Rename of {} pair(s) finished: {} of {} files modified",
            self.options.rename_map.len(),
            summary.modified,
            summary.processed
        );
        Ok(RunReport {
            summary,
            outcomes,
            post_pass,
        })
    }
}

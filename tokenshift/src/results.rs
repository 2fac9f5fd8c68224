use std::path::PathBuf;

use crate::classifier::FileKind;

/// Original and rewritten text of a file that would change in preview mode
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewritePreview {
    pub original: String,
    pub rewritten: String,
}

/// What happened to a single file
#[derive(Debug, Clone, Default)]
pub struct FileOutcome {
    /// The file processed
    pub path: PathBuf,
    /// Strategy applied, if any
    pub strategy: Option<FileKind>,
    /// Whether the content was read
    pub was_read: bool,
    /// Whether the content changed (or would change, in preview mode)
    pub was_modified: bool,
    /// Error that stopped this file
    pub error: Option<String>,
    /// Non-fatal problem, e.g. JSON that failed to parse
    pub warning: Option<String>,
    /// Populated in preview mode for files that would change
    pub preview: Option<RewritePreview>,
}

impl FileOutcome {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ..Default::default()
        }
    }
}

/// Counts over every outcome of a run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Files processed, successful or not
    pub processed: usize,
    /// Files whose content changed
    pub modified: usize,
    /// Files that failed
    pub errors: usize,
    /// Files processed with a warning
    pub warnings: usize,
}

impl RunSummary {
    pub fn new() -> Self {
        Default::default()
    }

    /// Folds one outcome into the counts
    pub fn add_outcome(&mut self, outcome: &FileOutcome) {
        self.processed += 1;
        if outcome.was_modified {
            self.modified += 1;
        }
        if outcome.error.is_some() {
            self.errors += 1;
        }
        if outcome.warning.is_some() {
            self.warnings += 1;
        }
    }

    pub fn from_outcomes<'a>(outcomes: impl IntoIterator<Item = &'a FileOutcome>) -> Self {
        let mut summary = Self::new();
        for outcome in outcomes {
            summary.add_outcome(outcome);
        }
        summary
    }

    /// Merges another summary into this one
    pub fn merge(&mut self, other: RunSummary) {
        self.processed += other.processed;
        self.modified += other.modified;
        self.errors += other.errors;
        self.warnings += other.warnings;
    }
}

/// Result of the package manifest update
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManifestUpdate {
    /// No `package.json` under the root
    NotFound,
    /// Nothing matched
    Unchanged,
    /// Manifest rewritten
    Updated {
        path: PathBuf,
        renamed_package: bool,
        renamed_dependencies: Vec<(String, String)>,
    },
}

/// Result of the git remote update
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteUpdate {
    /// No remote URL contains an old token
    Unchanged,
    /// Remote URL rewritten
    Updated {
        remote: String,
        old_url: String,
        new_url: String,
    },
}

/// What the post-pass updaters did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostPassReport {
    pub manifest: Option<ManifestUpdate>,
    pub remote: Option<RemoteUpdate>,
    pub warnings: Vec<String>,
}

/// Everything a run produced
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    pub summary: RunSummary,
    pub outcomes: Vec<FileOutcome>,
    pub post_pass: PostPassReport,
}

impl RunReport {
    /// Outcomes that would change, in preview mode
    pub fn previews(&self) -> impl Iterator<Item = (&PathBuf, &RewritePreview)> {
        self.outcomes
            .iter()
            .filter_map(|o| o.preview.as_ref().map(|p| (&o.path, p)))
    }
}

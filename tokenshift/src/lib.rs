pub mod classifier;
pub mod config;
pub mod driver;
pub mod errors;
pub mod files;
pub mod filters;
pub mod options;
pub mod post_pass;
pub mod renamer;
pub mod results;
pub mod strategies;
pub mod validation;

pub use classifier::{classify, FileKind};
pub use config::{CliOverrides, RenameConfig};
pub use errors::{RenameError, RenameResult};
pub use options::{RenameMap, RenameOptions, RenamePair};
pub use renamer::Renamer;
pub use results::{
    FileOutcome, ManifestUpdate, PostPassReport, RemoteUpdate, RewritePreview, RunReport,
    RunSummary,
};
pub use validation::{validate, ValidationErrors, ValidationIssue};

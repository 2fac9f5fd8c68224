//! File-type specific rewrite strategies.
//!
//! Every strategy takes the full text of a file and the run's options and applies each
//! pair of the rename map in order. The regex strategies (code, env, docker, markdown)
//! are fixed pipelines of named rules, see [`rules`]; JSON and YAML are rewritten
//! structurally, see [`structured`].

pub mod code;
pub mod docker;
pub mod env;
pub mod markdown;
pub(crate) mod rules;
pub mod structured;

use crate::classifier::FileKind;
use crate::errors::RenameResult;
use crate::options::RenameOptions;

/// Output of a strategy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewritten {
    pub content: String,
    /// Set when the file was left alone because it could not be parsed
    pub warning: Option<String>,
}

impl Rewritten {
    pub fn new(content: String) -> Self {
        Self {
            content,
            warning: None,
        }
    }

    pub fn skipped(original: &str, warning: impl Into<String>) -> Self {
        Self {
            content: original.to_string(),
            warning: Some(warning.into()),
        }
    }
}

/// Rewrites `text` with the strategy for `kind`
pub fn rewrite(kind: FileKind, text: &str, options: &RenameOptions) -> RenameResult<Rewritten> {
    match kind {
        FileKind::Code => code::rewrite(text, options).map(Rewritten::new),
        FileKind::Json => structured::rewrite_json(text, options),
        FileKind::Yaml => structured::rewrite_yaml(text, options),
        FileKind::Env => env::rewrite(text, options).map(Rewritten::new),
        FileKind::Docker => docker::rewrite(text, options).map(Rewritten::new),
        FileKind::Markdown => markdown::rewrite(text, options).map(Rewritten::new),
    }
}

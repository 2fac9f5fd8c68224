use std::fmt;
use std::num::NonZeroUsize;

use crate::config::RenameConfig;
use crate::options::{RenameMap, RenameOptions, MAX_CONCURRENCY};

/// Longest token accepted (the npm package name limit)
pub const MAX_TOKEN_LENGTH: usize = 214;

/// One problem with the supplied options
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    pub field: String,
    pub message: String,
    pub value: String,
}

impl ValidationIssue {
    fn new(field: impl Into<String>, message: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            value: value.into(),
        }
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} (got '{}')", self.field, self.message, self.value)
    }
}

/// Every issue found in one validation pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    pub issues: Vec<ValidationIssue>,
}

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    fn push(&mut self, field: &str, message: impl Into<String>, value: impl Into<String>) {
        self.issues.push(ValidationIssue::new(field, message, value));
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.issues.iter().map(|i| i.field.as_str())
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, issue) in self.issues.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "  - {}", issue)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

fn is_token_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '@' | '/' | '.' | '_' | '-')
}

fn check_token(errors: &mut ValidationErrors, field: &str, token: &str) {
    if token.is_empty() {
        errors.push(field, "must not be empty", token);
        return;
    }
    if token.chars().count() > MAX_TOKEN_LENGTH {
        errors.push(
            field,
            format!("must be at most {} characters", MAX_TOKEN_LENGTH),
            token,
        );
    }
    if let Some(bad) = token.chars().find(|c| !is_token_char(*c)) {
        errors.push(
            field,
            format!(
                "contains invalid character {:?}; allowed are letters, digits and @ / . _ -",
                bad
            ),
            token,
        );
    }
}

fn check_pair(errors: &mut ValidationErrors, field: &str, old: &str, new: &str) {
    check_token(errors, &format!("{}.old", field), old);
    check_token(errors, &format!("{}.new", field), new);
    if !old.is_empty() && old == new {
        errors.push(field, "old and new names must differ", old);
    }
}

/// Checks a raw config and produces the options for a run.
///
/// All problems are collected before returning so the caller can report them in one go.
/// Nothing here touches the filesystem.
pub fn validate(config: &RenameConfig) -> Result<RenameOptions, ValidationErrors> {
    let mut errors = ValidationErrors::default();

    let batch = match config.mapping.as_deref() {
        Some(text) => match RenameMap::from_json(text) {
            Ok(map) if map.is_empty() => {
                errors.push("mapping", "must contain at least one pair", text);
                None
            }
            Ok(map) => Some(map),
            Err(message) => {
                errors.push("mapping", message, text);
                None
            }
        },
        None => None,
    };

    match &batch {
        Some(map) => {
            for pair in map {
                check_pair(&mut errors, &format!("mapping[{}]", pair.old), &pair.old, &pair.new);
            }
        }
        // A mapping that failed to parse already produced an issue
        None if config.mapping.is_none() => {
            check_token(&mut errors, "old_name", &config.old_name);
            check_token(&mut errors, "new_name", &config.new_name);
            if !config.old_name.is_empty() && config.old_name == config.new_name {
                errors.push("new_name", "must differ from old_name", &config.new_name);
            }
        }
        None => {}
    }

    let concurrency = NonZeroUsize::new(config.concurrency)
        .filter(|n| n.get() <= MAX_CONCURRENCY);
    if concurrency.is_none() {
        errors.push(
            "concurrency",
            format!("must be between 1 and {}", MAX_CONCURRENCY),
            config.concurrency.to_string(),
        );
    }

    match concurrency {
        Some(concurrency_limit) if errors.is_empty() => {
            let rename_map = RenameMap::resolve(&config.old_name, &config.new_name, batch);
            // With a batch mapping the primary pair is its first entry
            let (old_name, new_name) = match rename_map.iter().next() {
                Some(first) if config.old_name.is_empty() => (first.old.clone(), first.new.clone()),
                _ => (config.old_name.clone(), config.new_name.clone()),
            };
            Ok(RenameOptions {
                old_name,
                new_name,
                rename_map,
                case_sensitive: config.case_sensitive,
                preview: config.dry_run,
                update_manifest: config.update_package_json,
                update_remote: config.update_git_remote,
                concurrency_limit,
                include: config.include.clone(),
                ignore: config.ignore.clone(),
                root: config.root.clone(),
            })
        }
        _ => Err(errors),
    }
}

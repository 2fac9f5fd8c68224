use glob::Pattern;
use std::path::Path;

use crate::errors::{RenameError, RenameResult};

/// Ignored in every run
pub const DEFAULT_IGNORE_PATTERNS: &[&str] = &["**/node_modules/**", "**/.git/**"];

/// Checks if a file is likely to be binary
pub fn is_likely_binary(path: &Path) -> bool {
    const BINARY_EXTENSIONS: &[&str] = &[
        "exe", "dll", "so", "dylib", "bin", "obj", "o", "class", "jar", "war", "ear", "png", "jpg",
        "jpeg", "gif", "bmp", "ico", "webp", "pdf", "doc", "docx", "xls", "xlsx", "zip", "tar",
        "gz", "7z", "rar", "woff", "woff2", "ttf", "eot", "mp3", "mp4", "wasm",
    ];

    if let Some(ext) = path.extension() {
        if let Some(ext_str) = ext.to_str() {
            return BINARY_EXTENSIONS
                .iter()
                .any(|&bin_ext| bin_ext.eq_ignore_ascii_case(ext_str));
        }
    }
    false
}

fn compile_patterns<'a>(patterns: impl IntoIterator<Item = &'a str>) -> RenameResult<Vec<Pattern>> {
    patterns
        .into_iter()
        .map(|p| {
            Pattern::new(p).map_err(|e| RenameError::invalid_pattern(format!("'{}': {}", p, e)))
        })
        .collect()
}

fn matches_any(path: &Path, patterns: &[Pattern]) -> bool {
    let normalized = path.to_string_lossy().replace('\\', "/");
    patterns.iter().any(|p| p.matches(&normalized))
}

/// Include/ignore glob filter over root-relative paths
#[derive(Debug, Clone)]
pub struct FileFilter {
    include: Vec<Pattern>,
    ignore: Vec<Pattern>,
}

impl FileFilter {
    /// Compiles the patterns; the default ignores are always added
    pub fn new(include: &[String], ignore: &[String]) -> RenameResult<Self> {
        Ok(Self {
            include: compile_patterns(include.iter().map(String::as_str))?,
            ignore: compile_patterns(
                DEFAULT_IGNORE_PATTERNS
                    .iter()
                    .copied()
                    .chain(ignore.iter().map(String::as_str)),
            )?,
        })
    }

    /// An empty include set accepts every path
    pub fn is_included(&self, relative: &Path) -> bool {
        self.include.is_empty() || matches_any(relative, &self.include)
    }

    pub fn is_ignored(&self, relative: &Path) -> bool {
        matches_any(relative, &self.ignore)
    }

    /// Determines if a file should be renamed in
    pub fn should_include_file(&self, relative: &Path) -> bool {
        !is_likely_binary(relative) && self.is_included(relative) && !self.is_ignored(relative)
    }
}

use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;
use std::path::PathBuf;

/// Default number of files processed at once
pub const DEFAULT_CONCURRENCY: usize = 10;

/// Upper bound accepted for the concurrency limit
pub const MAX_CONCURRENCY: usize = 100;

/// A single `old -> new` token pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenamePair {
    pub old: String,
    pub new: String,
}

impl RenamePair {
    pub fn new(old: impl Into<String>, new: impl Into<String>) -> Self {
        Self {
            old: old.into(),
            new: new.into(),
        }
    }
}

/// Ordered set of token pairs applied as one batch.
///
/// Pairs are applied in insertion order and every pair sees the output of the previous
/// one, so `a -> b` followed by `b -> c` turns `a` into `c`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenameMap {
    pairs: Vec<RenamePair>,
}

impl RenameMap {
    /// Map holding one pair
    pub fn single(old: impl Into<String>, new: impl Into<String>) -> Self {
        Self {
            pairs: vec![RenamePair::new(old, new)],
        }
    }

    /// Map holding `pairs` in the order given
    pub fn from_pairs<I, O, N>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (O, N)>,
        O: Into<String>,
        N: Into<String>,
    {
        Self {
            pairs: pairs
                .into_iter()
                .map(|(old, new)| RenamePair::new(old, new))
                .collect(),
        }
    }

    /// Parses a batch mapping such as `{"pkg1": "newpkg1", "pkg2": "newpkg2"}`.
    ///
    /// Key order of the document is kept. Anything other than an object of strings is
    /// rejected with a message suitable for a validation issue.
    pub fn from_json(text: &str) -> Result<Self, String> {
        let value: serde_json::Value =
            serde_json::from_str(text).map_err(|e| format!("mapping is not valid JSON: {}", e))?;
        let object = value
            .as_object()
            .ok_or_else(|| "mapping must be a JSON object of old -> new names".to_string())?;

        let mut pairs = Vec::with_capacity(object.len());
        for (old, new) in object {
            let new = new
                .as_str()
                .ok_or_else(|| format!("mapping value for '{}' must be a string", old))?;
            pairs.push(RenamePair::new(old.clone(), new));
        }
        Ok(Self { pairs })
    }

    /// The batch mapping wins over the single pair when one is supplied; the two are
    /// never merged.
    pub fn resolve(old_name: &str, new_name: &str, batch: Option<RenameMap>) -> Self {
        match batch {
            Some(map) => map,
            None => Self::single(old_name, new_name),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &RenamePair> {
        self.pairs.iter()
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

impl<'a> IntoIterator for &'a RenameMap {
    type Item = &'a RenamePair;
    type IntoIter = std::slice::Iter<'a, RenamePair>;

    fn into_iter(self) -> Self::IntoIter {
        self.pairs.iter()
    }
}

/// Fully resolved options for one run.
///
/// Built once at the boundary (usually by [`crate::validation::validate`]) and only read
/// afterwards.
#[derive(Debug, Clone)]
pub struct RenameOptions {
    /// Primary token being renamed
    pub old_name: String,

    /// Its replacement
    pub new_name: String,

    /// Pairs actually applied to file contents
    pub rename_map: RenameMap,

    /// Exact matching when true, case-insensitive otherwise
    pub case_sensitive: bool,

    /// Compute rewrites without writing anything
    pub preview: bool,

    /// Rename the package name and dependency keys in `package.json` afterwards
    pub update_manifest: bool,

    /// Rewrite the git remote URL afterwards
    pub update_remote: bool,

    /// Maximum number of files in flight
    pub concurrency_limit: NonZeroUsize,

    /// Glob patterns a file must match (all files when empty)
    pub include: Vec<String>,

    /// Glob patterns that exclude a file
    pub ignore: Vec<String>,

    /// Directory the file set is resolved from
    pub root: PathBuf,
}

impl RenameOptions {
    /// Options for a single pair with every other setting at its default
    pub fn new(old_name: impl Into<String>, new_name: impl Into<String>) -> Self {
        let old_name = old_name.into();
        let new_name = new_name.into();
        Self {
            rename_map: RenameMap::single(old_name.clone(), new_name.clone()),
            old_name,
            new_name,
            case_sensitive: true,
            preview: false,
            update_manifest: false,
            update_remote: false,
            concurrency_limit: default_concurrency(),
            include: Vec::new(),
            ignore: Vec::new(),
            root: PathBuf::from("."),
        }
    }

    /// Replaces the applied pairs with a batch mapping
    pub fn with_map(mut self, map: RenameMap) -> Self {
        self.rename_map = map;
        self
    }
}

pub fn default_concurrency() -> NonZeroUsize {
    NonZeroUsize::new(DEFAULT_CONCURRENCY).unwrap_or(NonZeroUsize::MIN)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_json_keeps_order() {
        let map = RenameMap::from_json(r#"{"zeta": "omega", "alpha": "beta", "mid": "center"}"#)
            .unwrap();
        let olds: Vec<&str> = map.iter().map(|p| p.old.as_str()).collect();
        assert_eq!(olds, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_from_json_rejects_bad_input() {
        assert!(RenameMap::from_json("{not json").is_err());
        assert!(RenameMap::from_json(r#"["a", "b"]"#).is_err());
        let err = RenameMap::from_json(r#"{"a": 1}"#).unwrap_err();
        assert!(err.contains("'a'"));
    }

    #[test]
    fn test_batch_replaces_single_pair() {
        let batch = RenameMap::from_pairs([("pkg1", "newpkg1"), ("pkg2", "newpkg2")]);
        let map = RenameMap::resolve("ignored", "also-ignored", Some(batch.clone()));
        assert_eq!(map, batch);
        assert!(map.iter().all(|p| p.old != "ignored"));

        let map = RenameMap::resolve("old", "new", None);
        assert_eq!(map, RenameMap::single("old", "new"));
    }

    #[test]
    fn test_options_defaults() {
        let options = RenameOptions::new("old", "new");
        assert_eq!(options.concurrency_limit.get(), DEFAULT_CONCURRENCY);
        assert!(options.case_sensitive);
        assert!(!options.preview);
        assert_eq!(options.rename_map.len(), 1);
    }
}

use config::{Config as ConfigBuilder, ConfigError, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::options::DEFAULT_CONCURRENCY;

/// Raw, unvalidated settings for a rename run.
///
/// # Configuration Locations
///
/// Settings are layered, later sources overriding earlier ones:
/// 1. Global `$CONFIG_DIR/tokenshift/config.yaml`
/// 2. Local `.tokenshift.yaml` in the current directory
/// 3. Custom file passed via `--config`
///
/// Command-line values ([`CliOverrides`]) are applied last with [`RenameConfig::merge_with_cli`].
///
/// # Configuration Format
///
/// ```yaml
/// old_name: "old-package"
/// new_name: "new-package"
///
/// # Optional batch mapping; replaces old_name/new_name when present
/// mapping: '{"pkg1": "newpkg1", "pkg2": "newpkg2"}'
///
/// case_sensitive: true
/// dry_run: false
/// update_package_json: true
/// update_git_remote: false
///
/// # Files processed at once (1-100)
/// concurrency: 10
///
/// include:
///   - "src/**"
/// ignore:
///   - "**/dist/**"
///
/// log_level: "info"
/// ```
///
/// Nothing here is checked yet. [`crate::validation::validate`] turns a config into
/// [`crate::RenameOptions`] or a list of every problem found.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenameConfig {
    /// Token to rename
    #[serde(default)]
    pub old_name: String,

    /// Replacement token
    #[serde(default)]
    pub new_name: String,

    /// Batch mapping as a JSON object of old -> new names
    #[serde(default)]
    pub mapping: Option<String>,

    /// Match tokens exactly (true) or ignoring case (false)
    #[serde(default = "default_true")]
    pub case_sensitive: bool,

    /// Show what would change without writing
    #[serde(default)]
    pub dry_run: bool,

    /// Update `package.json` name and dependency keys after the file pass
    #[serde(default)]
    pub update_package_json: bool,

    /// Update the git remote URL after the file pass
    #[serde(default)]
    pub update_git_remote: bool,

    /// Number of files processed concurrently
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    /// Glob patterns of files to process (all files when empty)
    #[serde(default)]
    pub include: Vec<String>,

    /// Glob patterns of files to skip
    #[serde(default)]
    pub ignore: Vec<String>,

    /// Directory to rename in
    #[serde(default = "default_root")]
    pub root: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_true() -> bool {
    true
}

fn default_concurrency() -> usize {
    DEFAULT_CONCURRENCY
}

fn default_root() -> PathBuf {
    PathBuf::from(".")
}

pub(crate) fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for RenameConfig {
    fn default() -> Self {
        Self {
            old_name: String::new(),
            new_name: String::new(),
            mapping: None,
            case_sensitive: true,
            dry_run: false,
            update_package_json: false,
            update_git_remote: false,
            concurrency: DEFAULT_CONCURRENCY,
            include: Vec::new(),
            ignore: Vec::new(),
            root: default_root(),
            log_level: default_log_level(),
        }
    }
}

impl RenameConfig {
    /// Loads configuration from the default locations
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(None)
    }

    /// Loads configuration from the default locations plus an optional explicit file
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = ConfigBuilder::builder();

        let config_files = [
            dirs::config_dir().map(|p| p.join("tokenshift/config.yaml")),
            Some(PathBuf::from(".tokenshift.yaml")),
        ];

        for path in config_files.iter().flatten() {
            if path.exists() {
                builder = builder.add_source(File::from(path.as_path()));
            }
        }

        // An explicit file must exist
        if let Some(path) = config_path {
            builder = builder.add_source(File::from(path).required(true));
        }

        builder.build()?.try_deserialize()
    }

    /// Merges CLI arguments with configuration file values
    pub fn merge_with_cli(mut self, cli: CliOverrides) -> Self {
        if let Some(old_name) = cli.old_name {
            self.old_name = old_name;
        }
        if let Some(new_name) = cli.new_name {
            self.new_name = new_name;
        }
        if cli.mapping.is_some() {
            self.mapping = cli.mapping;
        }
        // Flags can only be switched on from the command line
        if cli.ignore_case {
            self.case_sensitive = false;
        }
        self.dry_run |= cli.dry_run;
        self.update_package_json |= cli.update_package_json;
        self.update_git_remote |= cli.update_git_remote;
        if let Some(concurrency) = cli.concurrency {
            self.concurrency = concurrency;
        }
        if !cli.include.is_empty() {
            self.include = cli.include;
        }
        if !cli.ignore.is_empty() {
            self.ignore = cli.ignore;
        }
        if let Some(root) = cli.root {
            self.root = root;
        }
        if let Some(log_level) = cli.log_level {
            self.log_level = log_level;
        }
        self
    }
}

/// Values given on the command line. `None` and `false` leave the loaded value alone.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub old_name: Option<String>,
    pub new_name: Option<String>,
    pub mapping: Option<String>,
    pub ignore_case: bool,
    pub dry_run: bool,
    pub update_package_json: bool,
    pub update_git_remote: bool,
    pub concurrency: Option<usize>,
    pub include: Vec<String>,
    pub ignore: Vec<String>,
    pub root: Option<PathBuf>,
    pub log_level: Option<String>,
}

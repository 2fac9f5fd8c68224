use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Rewrite strategy selected for a file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FileKind {
    Code,
    Json,
    Yaml,
    Env,
    Docker,
    Markdown,
}

impl FileKind {
    pub fn name(self) -> &'static str {
        match self {
            FileKind::Code => "code",
            FileKind::Json => "json",
            FileKind::Yaml => "yaml",
            FileKind::Env => "env",
            FileKind::Docker => "docker",
            FileKind::Markdown => "markdown",
        }
    }
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

const CODE_EXTENSIONS: &[&str] = &["ts", "tsx", "js", "jsx", "mjs", "cjs", "mts", "cts"];
const JSON_EXTENSIONS: &[&str] = &["json"];
const YAML_EXTENSIONS: &[&str] = &["yml", "yaml"];
const MARKDOWN_EXTENSIONS: &[&str] = &["md", "mdx", "markdown"];

fn by_extension(path: &Path) -> Option<FileKind> {
    let ext = path.extension()?.to_str()?;
    let table: [(&[&str], FileKind); 4] = [
        (CODE_EXTENSIONS, FileKind::Code),
        (JSON_EXTENSIONS, FileKind::Json),
        (YAML_EXTENSIONS, FileKind::Yaml),
        (MARKDOWN_EXTENSIONS, FileKind::Markdown),
    ];
    table
        .iter()
        .find(|(exts, _)| exts.iter().any(|e| e.eq_ignore_ascii_case(ext)))
        .map(|(_, kind)| *kind)
}

fn by_name(path: &Path) -> Option<FileKind> {
    let name = path.file_name()?.to_str()?;
    if name.contains(".env") {
        return Some(FileKind::Env);
    }
    let lower = name.to_ascii_lowercase();
    if lower.contains("dockerfile") || lower.contains("docker-compose") {
        return Some(FileKind::Docker);
    }
    None
}

/// Picks the strategy for `path`, or `None` for passthrough files.
///
/// Extension checks run before name checks, so a file can only ever get one strategy:
/// `Dockerfile.yaml` is YAML and `Dockerfile.dev` is Docker.
pub fn classify(path: &Path) -> Option<FileKind> {
    by_extension(path).or_else(|| by_name(path))
}

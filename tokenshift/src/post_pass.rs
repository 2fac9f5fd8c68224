//! Updates that run once after the file pass: the package manifest and the git remote.
//!
//! Both are best-effort. [`run_post_pass`] turns any failure into a warning on the report.
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;
use std::process::Command;
use tracing::{debug, info, warn};

use crate::errors::{RenameError, RenameResult};
use crate::options::RenameOptions;
use crate::results::{ManifestUpdate, PostPassReport, RemoteUpdate};

const MANIFEST_FILE: &str = "package.json";
const DEPENDENCY_SECTIONS: &[&str] = &[
    "dependencies",
    "devDependencies",
    "peerDependencies",
    "optionalDependencies",
];

/// Renames `from` to `to` in place; a key already named `to` is overwritten
fn rename_key(map: &mut Map<String, Value>, from: &str, to: &str) {
    let entries = std::mem::take(map);
    *map = entries
        .into_iter()
        .map(|(key, value)| {
            if key == from {
                (to.to_string(), value)
            } else {
                (key, value)
            }
        })
        .collect();
}

/// Renames the package and matching dependency keys in `root/package.json`
pub fn update_manifest(root: &Path, options: &RenameOptions) -> RenameResult<ManifestUpdate> {
    let path = root.join(MANIFEST_FILE);
    if !path.is_file() {
        debug!("No {} under {}", MANIFEST_FILE, root.display());
        return Ok(ManifestUpdate::NotFound);
    }

    let text = fs::read_to_string(&path).map_err(|e| RenameError::from_io(&path, e))?;
    let mut manifest: Value = serde_json::from_str(&text)?;
    let Some(fields) = manifest.as_object_mut() else {
        return Err(RenameError::config_error(format!(
            "{} is not a JSON object",
            path.display()
        )));
    };

    let mut renamed_package = false;
    for pair in &options.rename_map {
        if fields.get("name").and_then(Value::as_str) == Some(pair.old.as_str()) {
            fields.insert("name".to_string(), Value::String(pair.new.clone()));
            renamed_package = true;
        }
    }

    let mut renamed_dependencies = Vec::new();
    for section in DEPENDENCY_SECTIONS {
        let Some(Value::Object(deps)) = fields.get_mut(*section) else {
            continue;
        };
        for pair in &options.rename_map {
            let Some(key) = deps.keys().find(|k| k.contains(&pair.old)).cloned() else {
                continue;
            };
            let renamed = key.replace(&pair.old, &pair.new);
            debug!("{}: {} -> {}", section, key, renamed);
            rename_key(deps, &key, &renamed);
            renamed_dependencies.push((key, renamed));
        }
    }

    if !renamed_package && renamed_dependencies.is_empty() {
        return Ok(ManifestUpdate::Unchanged);
    }

    let mut output = serde_json::to_string_pretty(&manifest)?;
    if text.ends_with('\n') {
        output.push('\n');
    }
    fs::write(&path, output).map_err(|e| RenameError::from_io(&path, e))?;
    info!("Updated {}", path.display());

    Ok(ManifestUpdate::Updated {
        path,
        renamed_package,
        renamed_dependencies,
    })
}

fn git(root: &Path, args: &[&str]) -> RenameResult<String> {
    let output = Command::new("git")
        .current_dir(root)
        .args(args)
        .output()
        .map_err(|e| RenameError::git_error(format!("Failed to run git {}: {}", args.join(" "), e)))?;

    if !output.status.success() {
        return Err(RenameError::git_error(format!(
            "git {} failed: {}",
            args.join(" "),
            String::from_utf8_lossy(&output.stderr).trim()
        )));
    }
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

/// Rewrites the URL of the first remote that mentions an old token
pub fn update_remote(root: &Path, options: &RenameOptions) -> RenameResult<RemoteUpdate> {
    let remotes = git(root, &["remote"])?;
    for remote in remotes.lines().map(str::trim).filter(|r| !r.is_empty()) {
        let old_url = git(root, &["remote", "get-url", remote])?;
        if !options
            .rename_map
            .iter()
            .any(|pair| old_url.contains(&pair.old))
        {
            continue;
        }

        let new_url = options
            .rename_map
            .iter()
            .fold(old_url.clone(), |url, pair| url.replace(&pair.old, &pair.new));
        git(root, &["remote", "set-url", remote, &new_url])?;
        info!("Updated remote {}: {} -> {}", remote, old_url, new_url);

        return Ok(RemoteUpdate::Updated {
            remote: remote.to_string(),
            old_url,
            new_url,
        });
    }
    Ok(RemoteUpdate::Unchanged)
}

/// Runs the enabled updaters against `options.root`. Never fails.
pub fn run_post_pass(options: &RenameOptions) -> PostPassReport {
    let mut report = PostPassReport::default();
    if options.preview {
        debug!("Preview mode, skipping post-pass updates");
        return report;
    }

    if options.update_manifest {
        match update_manifest(&options.root, options) {
            Ok(ManifestUpdate::NotFound) => {
                let message = format!("No {} found in {}", MANIFEST_FILE, options.root.display());
                warn!("{}", message);
                report.warnings.push(message);
                report.manifest = Some(ManifestUpdate::NotFound);
            }
            Ok(update) => report.manifest = Some(update),
            Err(e) => {
                let message = format!("Failed to update {}: {}", MANIFEST_FILE, e);
                warn!("{}", message);
                report.warnings.push(message);
            }
        }
    }

    if options.update_remote {
        match update_remote(&options.root, options) {
            Ok(update) => report.remote = Some(update),
            Err(e) => {
                let message = format!("Failed to update git remote: {}", e);
                warn!("{}", message);
                report.warnings.push(message);
            }
        }
    }

    report
}

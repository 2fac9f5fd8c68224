use anyhow::Result;
use std::fs;
use std::path::Path;
use tempfile::{tempdir, TempDir};
use tokenshift::{
    FileKind, ManifestUpdate, RenameConfig, RenameError, RenameOptions, Renamer,
};

fn create_test_files(dir: &TempDir, files: &[(&str, &str)]) -> Result<()> {
    for (name, content) in files {
        let path = dir.path().join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, content)?;
    }
    Ok(())
}

fn read(dir: &TempDir, name: &str) -> Result<String> {
    Ok(fs::read_to_string(dir.path().join(name))?)
}

fn options_in(root: &Path, old: &str, new: &str) -> RenameOptions {
    let mut options = RenameOptions::new(old, new);
    options.root = root.to_path_buf();
    options
}

fn mixed_project(dir: &TempDir) -> Result<()> {
    create_test_files(
        dir,
        &[
            (
                "src/index.ts",
                "import { a } from 'old-package';\nconst utils = require('old-package/utils');\n",
            ),
            (
                "package.json",
                "{\n  \"name\": \"old-package\",\n  \"dependencies\": {\n    \"old-package-core\": \"1.0.0\"\n  }\n}\n",
            ),
            ("config.yml", "app:\n  name: old-package\n"),
            ("Dockerfile", "FROM old-package/base:1\nRUN make\n"),
            ("README.md", "# old-package\n\nRun `old-package start`.\n"),
            ("LICENSE", "old-package is licensed\n"),
            ("node_modules/old-package/index.js", "module.exports = 'old-package';\n"),
        ],
    )
}

#[test]
fn test_mixed_project() -> Result<()> {
    let dir = tempdir()?;
    mixed_project(&dir)?;

    let report = Renamer::new(options_in(dir.path(), "old-package", "new-package")).run()?;

    assert_eq!(report.summary.processed, 6);
    assert_eq!(report.summary.modified, 5);
    assert_eq!(report.summary.errors, 0);
    assert_eq!(report.summary.warnings, 0);

    let index = read(&dir, "src/index.ts")?;
    assert!(index.contains("from 'new-package'"));
    assert!(index.contains("require('new-package/utils')"));

    let manifest: serde_json::Value = serde_json::from_str(&read(&dir, "package.json")?)?;
    assert_eq!(manifest["name"], "new-package");
    assert_eq!(manifest["dependencies"]["new-package-core"], "1.0.0");

    assert_eq!(read(&dir, "config.yml")?, "app:\n  name: new-package\n");
    assert_eq!(read(&dir, "Dockerfile")?, "FROM new-package/base:1\nRUN make\n");
    assert_eq!(
        read(&dir, "README.md")?,
        "# new-package\n\nRun `new-package start`.\n"
    );
    assert_eq!(read(&dir, "LICENSE")?, "old-package is licensed\n");
    assert_eq!(
        read(&dir, "node_modules/old-package/index.js")?,
        "module.exports = 'old-package';\n"
    );

    let license = report
        .outcomes
        .iter()
        .find(|o| o.path.ends_with("LICENSE"))
        .expect("LICENSE outcome");
    assert!(!license.was_read);
    assert!(license.strategy.is_none());
    Ok(())
}

#[test]
fn test_second_run_is_a_fixed_point() -> Result<()> {
    let dir = tempdir()?;
    mixed_project(&dir)?;
    let renamer = Renamer::new(options_in(dir.path(), "old-package", "new-package"));

    let first = renamer.run()?;
    let snapshot = read(&dir, "package.json")?;
    let second = renamer.run()?;

    assert!(first.summary.modified > 0);
    assert_eq!(second.summary.modified, 0);
    assert_eq!(read(&dir, "package.json")?, snapshot);
    Ok(())
}

#[test]
fn test_dry_run_writes_nothing() -> Result<()> {
    let dir = tempdir()?;
    mixed_project(&dir)?;
    let before = read(&dir, "src/index.ts")?;

    let mut options = options_in(dir.path(), "old-package", "new-package");
    options.preview = true;
    options.update_manifest = true;
    let report = Renamer::new(options).run()?;

    assert_eq!(report.summary.modified, 5);
    assert_eq!(report.previews().count(), 5);
    assert_eq!(read(&dir, "src/index.ts")?, before);
    assert!(report.post_pass.manifest.is_none());

    let (_, preview) = report
        .previews()
        .find(|(path, _)| path.ends_with("index.ts"))
        .expect("index.ts preview");
    assert_eq!(preview.original, before);
    assert!(preview.rewritten.contains("from 'new-package'"));
    Ok(())
}

#[test]
fn test_env_names_are_uppercased() -> Result<()> {
    let dir = tempdir()?;
    create_test_files(&dir, &[(".env", "old_var=value\n"), (".env.local", "export OLD_VAR_HOST=x\n")])?;

    let report = Renamer::new(options_in(dir.path(), "old_var", "new_var")).run()?;

    assert_eq!(report.summary.modified, 2);
    assert_eq!(read(&dir, ".env")?, "NEW_VAR=value\n");
    assert_eq!(read(&dir, ".env.local")?, "export NEW_VAR_HOST=x\n");
    Ok(())
}

#[test]
fn test_batch_mapping() -> Result<()> {
    let dir = tempdir()?;
    create_test_files(
        &dir,
        &[(
            "app.js",
            "import a from 'pkg1';\nimport b from 'pkg2';\n",
        )],
    )?;

    let config = RenameConfig {
        mapping: Some(r#"{"pkg1": "newpkg1", "pkg2": "newpkg2"}"#.to_string()),
        root: dir.path().to_path_buf(),
        ..Default::default()
    };
    let renamer = Renamer::from_config(&config)?;
    assert_eq!(renamer.options().rename_map.len(), 2);
    renamer.run()?;

    let app = read(&dir, "app.js")?;
    assert!(app.contains("from 'newpkg1'"));
    assert!(app.contains("from 'newpkg2'"));
    Ok(())
}

#[test]
fn test_invalid_config_touches_nothing() -> Result<()> {
    let dir = tempdir()?;
    create_test_files(&dir, &[("a.ts", "import 'old';\n")])?;

    let config = RenameConfig {
        old_name: "old".to_string(),
        new_name: "new name!".to_string(),
        concurrency: 0,
        root: dir.path().to_path_buf(),
        ..Default::default()
    };
    match Renamer::from_config(&config) {
        Err(RenameError::Validation(errors)) => {
            let fields: Vec<_> = errors.fields().collect();
            assert!(fields.contains(&"new_name"));
            assert!(fields.contains(&"concurrency"));
        }
        other => panic!("expected validation errors, got {:?}", other.map(|_| ())),
    }
    assert_eq!(read(&dir, "a.ts")?, "import 'old';\n");
    Ok(())
}

#[test]
fn test_corrupted_json_does_not_stop_the_batch() -> Result<()> {
    let dir = tempdir()?;
    create_test_files(
        &dir,
        &[
            ("broken.json", "{\"old-lib\": }"),
            ("ok.json", "{\"dep\": \"old-lib\"}"),
            ("main.ts", "export { x } from 'old-lib';\n"),
        ],
    )?;

    let report = Renamer::new(options_in(dir.path(), "old-lib", "new-lib")).run()?;

    assert_eq!(report.summary.processed, 3);
    assert_eq!(report.summary.modified, 2);
    assert_eq!(report.summary.warnings, 1);
    assert_eq!(report.summary.errors, 0);
    assert_eq!(read(&dir, "broken.json")?, "{\"old-lib\": }");
    assert!(read(&dir, "main.ts")?.contains("from 'new-lib'"));

    let broken = report
        .outcomes
        .iter()
        .find(|o| o.path.ends_with("broken.json"))
        .expect("broken.json outcome");
    assert_eq!(broken.strategy, Some(FileKind::Json));
    assert!(!broken.was_modified);
    Ok(())
}

#[test]
fn test_case_insensitive_rename() -> Result<()> {
    let dir = tempdir()?;
    create_test_files(&dir, &[("index.ts", "import x from 'Old-Lib';\n")])?;

    let mut options = options_in(dir.path(), "old-lib", "new-lib");
    options.case_sensitive = false;
    Renamer::new(options).run()?;

    assert_eq!(read(&dir, "index.ts")?, "import x from 'new-lib';\n");
    Ok(())
}

#[test]
fn test_manifest_post_pass() -> Result<()> {
    let dir = tempdir()?;
    create_test_files(
        &dir,
        &[
            ("src/index.ts", "import 'old-lib';\n"),
            (
                "package.json",
                "{\"name\": \"old-lib\", \"devDependencies\": {\"old-lib-tools\": \"^1\"}}",
            ),
        ],
    )?;

    let mut options = options_in(dir.path(), "old-lib", "new-lib");
    options.include = vec!["src/**".to_string()];
    options.update_manifest = true;
    let report = Renamer::new(options).run()?;

    assert_eq!(report.summary.processed, 1);
    match &report.post_pass.manifest {
        Some(ManifestUpdate::Updated {
            renamed_package,
            renamed_dependencies,
            ..
        }) => {
            assert!(renamed_package);
            assert_eq!(renamed_dependencies.len(), 1);
        }
        other => panic!("unexpected manifest update {:?}", other),
    }
    let manifest: serde_json::Value = serde_json::from_str(&read(&dir, "package.json")?)?;
    assert_eq!(manifest["name"], "new-lib");
    assert!(manifest["devDependencies"].get("new-lib-tools").is_some());
    Ok(())
}

#[test]
fn test_run_on_explicit_files() -> Result<()> {
    let dir = tempdir()?;
    create_test_files(
        &dir,
        &[("a.md", "old docs\n"), ("b.md", "old docs\n")],
    )?;

    let options = options_in(dir.path(), "old", "new");
    let report = Renamer::new(options).run_on(&[dir.path().join("a.md")])?;

    assert_eq!(report.summary.processed, 1);
    assert_eq!(read(&dir, "a.md")?, "new docs\n");
    assert_eq!(read(&dir, "b.md")?, "old docs\n");
    Ok(())
}

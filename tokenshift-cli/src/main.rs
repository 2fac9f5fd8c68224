use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tokenshift::{
    classify, files::resolve_files, CliOverrides, ManifestUpdate, RemoteUpdate, RenameConfig,
    RenameError, Renamer, RunReport, ValidationErrors,
};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

mod diff_utils;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct CliRenameArgs {
    /// Token to rename
    #[arg(long = "from")]
    old_name: Option<String>,

    /// Replacement token
    #[arg(long = "to")]
    new_name: Option<String>,

    /// Batch mapping as a JSON object, e.g. '{"pkg1":"newpkg1"}'. Replaces --from/--to
    #[arg(short = 'm', long = "map")]
    mapping: Option<String>,

    /// Show what would change without writing anything
    #[arg(short = 'n', long)]
    dry_run: bool,

    /// Print a unified diff of every file that would change (implies --dry-run)
    #[arg(long)]
    diff: bool,

    /// Match tokens regardless of case
    #[arg(short = 'i', long)]
    ignore_case: bool,

    /// Also rename the package and its dependencies in package.json
    #[arg(long)]
    update_package_json: bool,

    /// Also rewrite the git remote URL
    #[arg(long)]
    update_git_remote: bool,

    /// Maximum number of files processed at once (1-100)
    #[arg(short = 'j', long)]
    concurrency: Option<usize>,

    #[command(flatten)]
    files: CliFileArgs,

    /// Configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Show a progress bar
    #[arg(long)]
    progress: bool,

    /// Log level when RUST_LOG is not set (error|warn|info|debug|trace)
    #[arg(long)]
    log_level: Option<String>,
}

#[derive(Args)]
struct CliFileArgs {
    /// Root directory to rename in
    #[arg(short = 'd', long)]
    root: Option<PathBuf>,

    /// Only process files matching these globs
    #[arg(long)]
    include: Vec<String>,

    /// Skip files matching these globs (glob format)
    #[arg(long)]
    ignore: Vec<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Rename a token (or a batch of tokens) across a project
    Rename(Box<CliRenameArgs>),

    /// List the files a rename would process and the strategy each one gets
    Files(CliFileArgs),
}

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{} {:#}", "error:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

fn run() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Rename(args) => rename(*args),
        Commands::Files(args) => {
            init_logging(&RenameConfig::default().log_level);
            let root = args.root.unwrap_or_else(|| PathBuf::from("."));
            list_files(&root, &args.include, &args.ignore)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn rename(args: CliRenameArgs) -> anyhow::Result<ExitCode> {
    let overrides = CliOverrides {
        old_name: args.old_name,
        new_name: args.new_name,
        mapping: args.mapping,
        ignore_case: args.ignore_case,
        dry_run: args.dry_run || args.diff,
        update_package_json: args.update_package_json,
        update_git_remote: args.update_git_remote,
        concurrency: args.concurrency,
        include: args.files.include,
        ignore: args.files.ignore,
        root: args.files.root,
        log_level: args.log_level,
    };

    let loaded = match &args.config {
        Some(path) => RenameConfig::load_from(Some(path)),
        None => RenameConfig::load(),
    };
    let config = loaded
        .context("Failed to load configuration")?
        .merge_with_cli(overrides);
    init_logging(&config.log_level);
    if let Some(path) = &args.config {
        debug!("Loaded configuration from {}", path.display());
    }

    let renamer = match Renamer::from_config(&config) {
        Ok(renamer) => renamer,
        Err(RenameError::Validation(errors)) => {
            print_validation_errors(&errors);
            return Ok(ExitCode::from(2));
        }
        Err(e) => return Err(e.into()),
    };
    info!(
        "Renaming {} token(s) under {} ({})",
        renamer.options().rename_map.len(),
        renamer.options().root.display(),
        if renamer.options().preview { "dry run" } else { "writing" }
    );

    let report = if args.progress {
        renamer.run_with_progress()?
    } else {
        renamer.run()?
    };

    let root = &renamer.options().root;
    if args.diff {
        for (path, preview) in report.previews() {
            diff_utils::print_unified_diff(
                display_path(root, path),
                &preview.original,
                &preview.rewritten,
            );
        }
    }
    print_report(&report, root, renamer.options().preview);

    // File errors are part of the summary, not a failed run
    Ok(ExitCode::SUCCESS)
}

fn display_path<'a>(root: &Path, path: &'a Path) -> &'a Path {
    path.strip_prefix(root).unwrap_or(path)
}

fn list_files(root: &Path, include: &[String], ignore: &[String]) -> anyhow::Result<()> {
    let files = resolve_files(root, include, ignore)?;
    for path in &files {
        let strategy = classify(path)
            .map(|kind| kind.name().to_string())
            .unwrap_or_else(|| "passthrough".to_string());
        println!("{:<12} {}", strategy.cyan(), display_path(root, path).display());
    }
    println!("\n{} files", files.len());
    Ok(())
}

fn print_validation_errors(errors: &ValidationErrors) {
    eprintln!("{}", "Invalid options:".red().bold());
    for issue in &errors.issues {
        eprintln!(
            "  {} {} (got '{}')",
            format!("{}:", issue.field).yellow(),
            issue.message,
            issue.value
        );
    }
}

fn print_report(report: &RunReport, root: &Path, preview: bool) {
    if preview {
        println!("Dry run - no changes will be made");
    }

    for outcome in &report.outcomes {
        let path = display_path(root, &outcome.path).display().to_string();
        if let Some(error) = &outcome.error {
            println!("{} {}: {}", "error".red(), path.blue(), error);
        } else if let Some(warning) = &outcome.warning {
            println!("{} {}: {}", "warning".yellow(), path.blue(), warning);
        }
        if outcome.was_modified {
            let verb = if preview { "would modify" } else { "modified" };
            println!("{} {}", verb.green(), path.blue());
        }
    }

    match &report.post_pass.manifest {
        Some(ManifestUpdate::Updated {
            path,
            renamed_package,
            renamed_dependencies,
        }) => {
            println!("{} {}", "Updated".green(), path.display());
            if *renamed_package {
                println!("  package name renamed");
            }
            for (old, new) in renamed_dependencies {
                println!("  {} -> {}", old.red(), new.green());
            }
        }
        Some(ManifestUpdate::Unchanged) => println!("package.json unchanged"),
        Some(ManifestUpdate::NotFound) | None => {}
    }
    if let Some(RemoteUpdate::Updated {
        remote,
        old_url,
        new_url,
    }) = &report.post_pass.remote
    {
        println!(
            "{} remote {}: {} -> {}",
            "Updated".green(),
            remote,
            old_url.red(),
            new_url.green()
        );
    }
    for warning in &report.post_pass.warnings {
        println!("{} {}", "warning".yellow(), warning);
    }

    let summary = &report.summary;
    println!(
        "\nProcessed {} files: {} modified, {} errors, {} warnings",
        summary.processed, summary.modified, summary.errors, summary.warnings
    );
}

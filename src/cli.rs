//! Command-line interface for unilint.

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand, ValueEnum};
use walkdir::WalkDir;

use crate::checkers::{default_checkers, MessageId};
use crate::config::Config;
use crate::lint::{LintResult, Linter};
use crate::report;

/// Exit codes.
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FAILED: i32 = 1;
pub const EXIT_ERROR: i32 = 2;

/// Directory names never descended into.
const SKIPPED_DIRS: &[&str] = &["__pycache__", "venv", "node_modules"];

/// String hygiene linter for Python 2 code bases.
///
/// Flags plain string literals that should carry a `u` or `r` prefix, `%`
/// formatting of string literals, and classes that define `__str__` without
/// `__unicode__`.
#[derive(Parser)]
#[command(name = "unilint")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Lint Python files or directories
    #[command(visible_alias = "check")]
    Lint(LintArgs),
    /// List every message unilint can emit
    ListMessages,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Pretty,
    Text,
    Json,
    Sarif,
}

/// Arguments for the lint command.
#[derive(Args)]
pub struct LintArgs {
    /// Files or directories to lint
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,

    /// Path to configuration YAML file (default: auto-discover)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Pretty)]
    pub format: OutputFormat,

    /// Messages to disable (codes, symbols or `all`), comma separated
    #[arg(long, value_delimiter = ',')]
    pub disable: Vec<String>,

    /// Messages to enable even if disabled, comma separated
    #[arg(long, value_delimiter = ',')]
    pub enable: Vec<String>,

    /// Show suppressed diagnostics in output
    #[arg(long)]
    pub show_suppressed: bool,
}

/// Collect Python files under `root`.
///
/// A file given directly is always returned. Directories are walked for
/// `*.py`, skipping hidden directories, caches, virtualenvs and excluded
/// paths.
pub fn collect_files(root: &Path, config: &Config) -> anyhow::Result<Vec<PathBuf>> {
    if root.is_file() {
        return Ok(vec![root.to_path_buf()]);
    }

    let mut files = Vec::new();

    for entry in WalkDir::new(root)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| {
            if e.depth() == 0 || !e.file_type().is_dir() {
                return true;
            }
            let name = e.file_name().to_string_lossy();
            !name.starts_with('.') && !SKIPPED_DIRS.contains(&&*name)
        })
    {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some("py") {
            continue;
        }
        let relative = path.strip_prefix(root).unwrap_or(path);
        if config.is_path_excluded(relative) || config.is_path_excluded(path) {
            tracing::debug!("excluded {}", path.display());
            continue;
        }
        files.push(path.to_path_buf());
    }

    Ok(files)
}

/// Merge command-line selections into the loaded configuration.
fn apply_overrides(config: &mut Config, args: &LintArgs) -> anyhow::Result<()> {
    for (flag, selectors) in [("--disable", &args.disable), ("--enable", &args.enable)] {
        for selector in selectors {
            if MessageId::matching(selector).is_empty() {
                anyhow::bail!("unknown message {:?} passed to {}", selector, flag);
            }
        }
    }
    config.disable.extend(args.disable.iter().cloned());
    config.enable.extend(args.enable.iter().cloned());
    Ok(())
}

/// Lint every path and return the merged result.
pub fn lint_paths(paths: &[PathBuf], config: &Config) -> anyhow::Result<LintResult> {
    let mut files = Vec::new();
    for path in paths {
        if !path.exists() {
            anyhow::bail!("cannot access path {}", path.display());
        }
        files.extend(collect_files(path, config)?);
    }
    files.sort();
    files.dedup();
    tracing::debug!("collected {} files", files.len());

    let linter = Linter::with_default_checkers().with_filter(config.message_filter());
    tracing::debug!(
        "checkers {:?}, enabled messages {:?}",
        linter.checker_names(),
        config.message_filter().enabled_ids()
    );
    Ok(linter.check_files(&files))
}

/// Exit code for a finished run.
pub fn exit_code(result: &LintResult) -> i32 {
    if !result.errors.is_empty() {
        EXIT_ERROR
    } else if !result.diagnostics.is_empty() {
        EXIT_FAILED
    } else {
        EXIT_SUCCESS
    }
}

/// Run the lint command.
pub fn run_lint(args: &LintArgs) -> anyhow::Result<i32> {
    let cwd = std::env::current_dir()?;
    let mut config = match Config::load(args.config.as_deref(), &cwd) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {}", e);
            return Ok(EXIT_ERROR);
        }
    };
    if let Err(e) = apply_overrides(&mut config, args) {
        eprintln!("Error: {}", e);
        return Ok(EXIT_ERROR);
    }

    let result = lint_paths(&args.paths, &config)?;
    if result.scanned == 0 && result.errors.is_empty() {
        eprintln!("Warning: no files to lint");
        return Ok(EXIT_SUCCESS);
    }

    let path_strs: Vec<String> = args
        .paths
        .iter()
        .map(|p| p.to_string_lossy().into_owned())
        .collect();

    match args.format {
        OutputFormat::Pretty => report::write_pretty(&path_strs, &result, args.show_suppressed),
        OutputFormat::Text => report::write_text(&result),
        OutputFormat::Json => report::write_json(&path_strs, &result)?,
        OutputFormat::Sarif => {
            // Relative URIs only make sense against a single root
            let base = match args.paths.as_slice() {
                [single] => single.as_path(),
                _ => Path::new(""),
            };
            report::write_sarif(base, &result)?;
        }
    }

    Ok(exit_code(&result))
}

/// Run the list-messages command.
pub fn run_list_messages() -> anyhow::Result<i32> {
    println!("Available messages:");
    println!();

    let checkers = default_checkers();
    for id in MessageId::ALL {
        let def = id.def();
        let checker = checkers
            .iter()
            .find(|c| c.messages().contains(&id))
            .map(|c| c.name())
            .unwrap_or(def.checker);
        println!("  {}  {:<36} [{}]", def.code, def.symbol, checker);
        println!("         {}", def.template);
        println!("         {}", def.description);
        println!();
    }

    println!("Usage:");
    println!("  unilint lint <path> --disable W1403,string-format-operator-deprecated");

    Ok(EXIT_SUCCESS)
}

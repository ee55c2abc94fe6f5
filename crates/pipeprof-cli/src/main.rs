mod display;

use anyhow::{Context, Result};
use clap::error::ErrorKind;
use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};
use pipeprof_core::config::DEFAULT_CONFIG_FILE;
use pipeprof_core::{analyzer, AnalyzerConfig};
use std::env;
use std::path::{Path, PathBuf};
use tracing::{debug, info, Level};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(
    name = "pipeprof",
    version,
    about = "PipeProf — CI/CD Pipeline Cost Profiler",
    long_about = "Estimate the monthly compute cost of a CI workflow and list the cheapest fixes.",
    args_conflicts_with_subcommands = true
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    args: AnalyzeArgs,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Analyze a workflow (same as passing the path directly)
    Analyze(AnalyzeArgs),
}

#[derive(Args, Debug)]
struct AnalyzeArgs {
    /// Path to a workflow file or a directory of workflow files
    path: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,

    /// Shorthand for `--format json`
    #[arg(long)]
    json: bool,

    /// Analyzer config file (defaults to ./.pipeprof.toml when present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,

    /// Only log errors
    #[arg(short, long)]
    quiet: bool,
}

impl Cli {
    /// Resolve the bare and `analyze` forms to one set of arguments plus the
    /// required path.
    fn into_analyze_args(self) -> Result<(PathBuf, AnalyzeArgs), clap::Error> {
        let mut args = match self.command {
            Some(Commands::Analyze(args)) => args,
            None => self.args,
        };
        match args.path.take() {
            Some(path) => Ok((path, args)),
            None => Err(Cli::command().error(
                ErrorKind::MissingRequiredArgument,
                "a workflow file or directory <PATH> is required",
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

fn main() -> Result<()> {
    let (path, args) = Cli::parse().into_analyze_args().unwrap_or_else(|e| e.exit());
    init_logging(&args);
    debug!(path = %path.display(), ?args, "pipeprof v{} starting", env!("CARGO_PKG_VERSION"));

    let format = if args.json { OutputFormat::Json } else { args.format };
    let config = resolve_config(args.config.as_deref())?;
    cmd_analyze(&path, format, &config)
}

fn init_logging(args: &AnalyzeArgs) {
    let level = if args.verbose {
        Level::DEBUG
    } else if args.quiet {
        Level::ERROR
    } else {
        let level_str = env::var("PIPEPROF_LOG_LEVEL").unwrap_or_else(|_| "warn".to_string());
        parse_level(&level_str)
    };

    let filter = if env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::new(format!("pipeprof={level},pipeprof_core={level}"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .init();
}

fn parse_level(level_str: &str) -> Level {
    match level_str.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => {
            eprintln!(
                "Invalid log level '{}', defaulting to WARN. Valid levels: trace, debug, info, warn, error",
                level_str
            );
            Level::WARN
        }
    }
}

fn resolve_config(explicit: Option<&Path>) -> Result<AnalyzerConfig> {
    if let Some(path) = explicit {
        return Ok(AnalyzerConfig::load(path)?);
    }

    let default_path = Path::new(DEFAULT_CONFIG_FILE);
    if default_path.is_file() {
        info!(path = %default_path.display(), "using config file");
        return Ok(AnalyzerConfig::load(default_path)?);
    }

    Ok(AnalyzerConfig::default())
}

fn discover_workflow_files(path: &Path) -> Result<Vec<PathBuf>> {
    if path.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }

    if path.is_dir() {
        let mut files = Vec::new();
        for ext in ["yml", "yaml"] {
            let pattern = format!("{}/**/*.{}", path.display(), ext);
            files.extend(
                glob::glob(&pattern)
                    .context("Failed to read glob pattern")?
                    .filter_map(|r| r.ok()),
            );
        }
        files.sort();
        return Ok(files);
    }

    anyhow::bail!("Path '{}' does not exist", path.display());
}

fn cmd_analyze(path: &Path, format: OutputFormat, config: &AnalyzerConfig) -> Result<()> {
    let files = discover_workflow_files(path)?;

    if files.is_empty() {
        anyhow::bail!(
            "No workflow files found at '{}'. \
            Make sure the path points to a YAML workflow file or directory.",
            path.display()
        );
    }

    for file in &files {
        let raw = std::fs::read(file)
            .with_context(|| format!("Failed to read workflow file: {}", file.display()))?;
        debug!(file = %file.display(), bytes = raw.len(), "analyzing workflow");

        let report = analyzer::analyze_with(&raw, config);

        match format {
            OutputFormat::Json => {
                let json = serde_json::to_string_pretty(&report)?;
                println!("{}", json);
            }
            OutputFormat::Table => display::print_report(file, &report),
        }
    }

    Ok(())
}

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use dirscout::{
    find_dirs, find_entries, find_files, EntryFilter, FoundEntry, RecursionScope, WalkConfig,
    WalkResult,
};
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Glob pattern applied to entry names ("." lists everything)
    #[arg(default_value = "*")]
    pattern: String,

    /// Root directory to enumerate
    #[arg(short = 'd', long, default_value = ".")]
    root: PathBuf,

    /// Recurse into the full subtree instead of direct children only
    #[arg(short = 'R', long)]
    recursive: bool,

    /// List files only
    #[arg(long, conflicts_with = "dirs")]
    files: bool,

    /// List directories only
    #[arg(long)]
    dirs: bool,

    /// Show only totals, not individual entries
    #[arg(short, long)]
    stats: bool,

    /// Output format (text|json)
    #[arg(long, default_value = "text")]
    format: String,

    /// Configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,
}

enum OutputFormat {
    Text,
    Json,
}

fn main() -> Result<()> {
    run()
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let cli_config = WalkConfig {
        root_path: cli.root.clone(),
        pattern: cli.pattern.clone(),
        scope: if cli.recursive {
            RecursionScope::AllDirectories
        } else {
            RecursionScope::TopOnly
        },
        entry_filter: if cli.files {
            EntryFilter::Files
        } else if cli.dirs {
            EntryFilter::Directories
        } else {
            EntryFilter::All
        },
        stats_only: cli.stats,
        log_level: cli.log_level.clone().unwrap_or_else(|| "warn".to_string()),
    };

    let config = WalkConfig::load_from(cli.config.as_deref())
        .context("Failed to load configuration")?
        .merge_with_cli(cli_config);

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.log_level))
        .init();
    debug!("Effective configuration: {:?}", config);

    let format = match cli.format.to_lowercase().as_str() {
        "json" => OutputFormat::Json,
        _ => OutputFormat::Text,
    };

    // Entries stream out as the traversal produces them; nothing is
    // collected unless we only need totals.
    match config.entry_filter {
        EntryFilter::Files => emit(find_files(&config)?, &format, config.stats_only),
        EntryFilter::Directories => emit(find_dirs(&config)?, &format, config.stats_only),
        EntryFilter::All => emit(find_entries(&config)?, &format, config.stats_only),
    }
}

fn emit(
    entries: impl Iterator<Item = WalkResult<FoundEntry>>,
    format: &OutputFormat,
    stats_only: bool,
) -> Result<()> {
    let mut files = 0usize;
    let mut directories = 0usize;

    for entry in entries {
        let entry = entry.context("Enumeration failed")?;
        if entry.is_dir() {
            directories += 1;
        } else {
            files += 1;
        }
        if stats_only {
            continue;
        }
        match format {
            OutputFormat::Text => print_entry(&entry),
            OutputFormat::Json => println!("{}", serde_json::to_string(&entry)?),
        }
    }

    if stats_only {
        match format {
            OutputFormat::Text => {
                println!(
                    "{} {} files, {} directories",
                    "Total:".bold(),
                    files.to_string().green(),
                    directories.to_string().green(),
                );
            }
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::json!({
                        "files": files,
                        "directories": directories,
                        "total": files + directories,
                    })
                );
            }
        }
    }
    Ok(())
}

fn print_entry(entry: &FoundEntry) {
    if entry.is_dir() {
        println!("{}", entry.path.display().to_string().blue().bold());
    } else {
        println!("{}", entry.path.display());
    }
}

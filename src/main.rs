//! person-dedupe: find likely duplicate person records across directories.

#![allow(clippy::struct_excessive_bools, clippy::needless_pass_by_value)]

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use person_dedupe::{
    batch::CompareMode,
    cli::{self, ExplainTarget, ScanPaths},
    config::{AppConfig, ConfigOverrides, ConfigPreset},
    model::RecordId,
    pipeline::exit_codes,
    reports::ReportFormat,
};
use std::io;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "person-dedupe")]
#[command(version)]
#[command(about = "Find likely duplicate person records with fuzzy name, email and phone scoring", long_about = None)]
#[command(after_help = "EXIT CODES:
    0  Scan complete (no matches, or --fail-on-match not set)
    1  Matches found with --fail-on-match
    2  Scan stopped early; rerun with the same --state file
    3  Error occurred

EXAMPLES:
    # Compare staff against students
    person-dedupe scan staff.json students.json

    # Find duplicates inside one export
    person-dedupe scan users.json --preset strict

    # Resumable scan in 30 second slices
    person-dedupe scan staff.json students.json --state scan.json --time-budget 30

    # Why did (or didn't) two records match?
    person-dedupe explain users.json 12 408")]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Disable colored output (also respects `NO_COLOR` env)
    #[arg(long, global = true)]
    no_color: bool,

    /// Path to configuration file
    #[arg(long, global = true, env = "PERSON_DEDUPE_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Options shared by `scan` and `explain`
#[derive(Parser)]
struct ScoringArgs {
    /// Scoring preset (strict, balanced, permissive)
    #[arg(short, long)]
    preset: Option<String>,

    /// Minimum confidence to report (0-100); overrides the preset
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(0..=100))]
    threshold: Option<u32>,

    /// Output format
    #[arg(short, long)]
    output: Option<ReportFormat>,

    /// Output file path (stdout if not specified)
    #[arg(short = 'O', long)]
    output_file: Option<PathBuf>,

    /// Exit with code 1 if any pair matches
    #[arg(long)]
    fail_on_match: bool,
}

/// Arguments for the `scan` subcommand
#[derive(Parser)]
struct ScanArgs {
    /// Record dump to check (JSON array or {"records": [...]})
    sources: PathBuf,

    /// Record dump to check against; omit to compare SOURCES against itself
    candidates: Option<PathBuf>,

    #[command(flatten)]
    scoring: ScoringArgs,

    /// Pair selection mode
    #[arg(long, value_enum)]
    mode: Option<CompareMode>,

    /// Skip pairs whose records share an id
    #[arg(long)]
    exclude_same_id: bool,

    /// Pairs scored per chunk
    #[arg(long)]
    chunk_size: Option<usize>,

    /// State file for resumable scans
    #[arg(long = "state")]
    state_file: Option<PathBuf>,

    /// Stop starting new chunks after this many seconds
    #[arg(long)]
    time_budget: Option<u64>,

    /// Stop after this many chunks
    #[arg(long)]
    max_chunks: Option<usize>,

    /// Only report the N highest-confidence matches
    #[arg(long)]
    limit: Option<usize>,
}

/// Arguments for the `explain` subcommand
#[derive(Parser)]
struct ExplainArgs {
    /// Record dump holding the source record
    sources: PathBuf,

    /// Id of the source record
    source_id: String,

    /// Id of the candidate record
    candidate_id: String,

    /// Dump holding the candidate (defaults to SOURCES)
    #[arg(long)]
    candidates: Option<PathBuf>,

    #[command(flatten)]
    scoring: ScoringArgs,
}

#[derive(Subcommand)]
enum Commands {
    /// Score record pairs and report likely duplicates
    Scan(ScanArgs),

    /// Break down the score of a single pair
    Explain(ExplainArgs),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },

    /// Generate JSON Schema for the config file format
    ConfigSchema {
        /// Write schema to file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show, discover, or initialize configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Sub-subcommands for the `config` command
#[derive(Subcommand)]
enum ConfigAction {
    /// Print current effective configuration (merged from defaults + file)
    Show,
    /// Print the discovered config file, if any
    Path,
    /// Generate an example .person-dedupe.yaml in the current directory
    Init,
    /// Print the settings of a named preset (default, strict, permissive, ci-cd)
    Preset { name: String },
}

impl ScoringArgs {
    fn overrides(self, flags: &GlobalFlags) -> ConfigOverrides {
        ConfigOverrides {
            preset: self.preset,
            threshold: self.threshold,
            format: self.output,
            output_file: self.output_file,
            no_color: flags.no_color.then_some(true),
            fail_on_match: self.fail_on_match.then_some(true),
            quiet: flags.quiet.then_some(true),
            ..ConfigOverrides::default()
        }
    }
}

struct GlobalFlags {
    quiet: bool,
    no_color: bool,
    config: Option<PathBuf>,
}

/// Layer CLI overrides over the discovered config file.
fn effective_config(overrides: &ConfigOverrides, flags: &GlobalFlags) -> AppConfig {
    let (config, loaded_from) =
        AppConfig::from_file_with_overrides(flags.config.as_deref(), overrides);
    if let Some(path) = loaded_from {
        tracing::debug!("Loaded config from {}", path.display());
    }
    config
}

fn main() {
    let code = match run() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {err:#}");
            exit_codes::ERROR
        }
    };
    if code != exit_codes::SUCCESS {
        std::process::exit(code);
    }
}

fn run() -> Result<i32> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "warn"
    } else {
        "info"
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| log_level.to_string()),
        ))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(io::stderr),
        )
        .init();

    let flags = GlobalFlags {
        quiet: cli.quiet,
        no_color: cli.no_color,
        config: cli.config,
    };

    match cli.command {
        Commands::Scan(args) => {
            let overrides = ConfigOverrides {
                exclude_same_id: args.exclude_same_id.then_some(true),
                mode: args.mode,
                chunk_size: args.chunk_size,
                state_file: args.state_file,
                time_budget_secs: args.time_budget,
                max_chunks: args.max_chunks,
                limit: args.limit,
                ..args.scoring.overrides(&flags)
            };

            let config = effective_config(&overrides, &flags);
            let paths = ScanPaths {
                sources: args.sources,
                candidates: args.candidates,
            };
            cli::run_scan(config, &paths)
        }

        Commands::Explain(args) => {
            let overrides = args.scoring.overrides(&flags);
            let config = effective_config(&overrides, &flags);
            let target = ExplainTarget {
                sources: args.sources,
                candidates: args.candidates,
                source_id: RecordId::parse_lenient(&args.source_id),
                candidate_id: RecordId::parse_lenient(&args.candidate_id),
            };
            cli::run_explain(&config, &target)
        }

        Commands::Completions { shell } => {
            generate(shell, &mut Cli::command(), "person-dedupe", &mut io::stdout());
            Ok(exit_codes::SUCCESS)
        }

        Commands::ConfigSchema { output } => {
            let schema = person_dedupe::config::generate_json_schema()?;
            if let Some(path) = output {
                std::fs::write(&path, &schema)
                    .with_context(|| format!("failed to write {}", path.display()))?;
                eprintln!("Schema written to {}", path.display());
            } else {
                println!("{schema}");
            }
            Ok(exit_codes::SUCCESS)
        }

        Commands::Config { action } => {
            match action {
                ConfigAction::Show => {
                    let (config, loaded_from) =
                        person_dedupe::config::load_or_default(flags.config.as_deref());
                    if let Some(path) = &loaded_from {
                        eprintln!("# Loaded from: {}", path.display());
                    } else {
                        eprintln!("# No config file found; showing defaults");
                    }
                    let yaml =
                        serde_yaml::to_string(&config).context("failed to serialize config")?;
                    print!("{yaml}");
                }
                ConfigAction::Path => {
                    match person_dedupe::config::discover_config_file(flags.config.as_deref()) {
                        Some(path) => eprintln!("Active config file: {}", path.display()),
                        None => eprintln!("No config file found."),
                    }
                }
                ConfigAction::Init => {
                    let target = std::env::current_dir()
                        .context("cannot determine current directory")?
                        .join(".person-dedupe.yaml");
                    if target.exists() {
                        anyhow::bail!(
                            "{} already exists. Remove it first to re-initialize.",
                            target.display()
                        );
                    }
                    let content = person_dedupe::config::generate_full_example_config();
                    std::fs::write(&target, content)
                        .with_context(|| format!("failed to write {}", target.display()))?;
                    eprintln!("Created {}", target.display());
                }
                ConfigAction::Preset { name } => {
                    let preset = ConfigPreset::from_name(&name).with_context(|| {
                        let names: Vec<&str> =
                            ConfigPreset::all().iter().map(|p| p.name()).collect();
                        format!("unknown preset '{name}' (expected one of: {})", names.join(", "))
                    })?;
                    eprintln!("# {}", preset.description());
                    let yaml = serde_yaml::to_string(&AppConfig::from_preset(preset))
                        .context("failed to serialize config")?;
                    print!("{yaml}");
                }
            }
            Ok(exit_codes::SUCCESS)
        }
    }
}

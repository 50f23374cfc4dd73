//! tabjoin - Relational joins for small tabular data

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};

use tabjoin::clean::{clean_names, clean_table};
use tabjoin::config::{JoinConfig, OutputFormat};
use tabjoin::dupes::find_dupes;
use tabjoin::join::{JoinEngine, JoinKind, JoinSpec};
use tabjoin::output::render_to_stdout;
use tabjoin::parser::LoaderFactory;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliOutputFormat {
    Terminal,
    Json,
}

impl From<CliOutputFormat> for OutputFormat {
    fn from(f: CliOutputFormat) -> Self {
        match f {
            CliOutputFormat::Terminal => OutputFormat::Terminal,
            CliOutputFormat::Json => OutputFormat::Json,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliJoinKind {
    Left,
    Inner,
}

impl From<CliJoinKind> for JoinKind {
    fn from(k: CliJoinKind) -> Self {
        match k {
            CliJoinKind::Left => JoinKind::Left,
            CliJoinKind::Inner => JoinKind::Inner,
        }
    }
}

/// Relational joins, duplicate detection, and header cleaning for tabular data
#[derive(Parser, Debug)]
#[command(name = "tabjoin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Join two tables on key columns
    Join {
        /// Left table file
        left_file: PathBuf,

        /// Right table file
        right_file: PathBuf,

        /// Key column(s) carrying the same name in both tables (comma-separated)
        #[arg(short, long, value_delimiter = ',', conflicts_with_all = ["left_on", "right_on"])]
        on: Vec<String>,

        /// Key column(s) in the left table (comma-separated, pairs with --right-on)
        #[arg(long, value_delimiter = ',', requires = "right_on")]
        left_on: Vec<String>,

        /// Key column(s) in the right table (comma-separated, pairs with --left-on)
        #[arg(long, value_delimiter = ',', requires = "left_on")]
        right_on: Vec<String>,

        /// Join kind
        #[arg(short, long, value_enum, default_value = "left")]
        kind: CliJoinKind,

        /// Treat null key values as equal to each other
        #[arg(long)]
        null_equals_null: bool,

        /// Suffix for right columns whose name collides with a left column
        #[arg(long, default_value = "_right")]
        suffix: String,

        /// Output format
        #[arg(short, long, value_enum, default_value = "terminal")]
        format: CliOutputFormat,
    },

    /// Show rows whose check-column values repeat
    Dupes {
        /// Table file
        file: PathBuf,

        /// Column(s) to check for duplicates (comma-separated; default all)
        #[arg(short, long, value_delimiter = ',')]
        check: Vec<String>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "terminal")]
        format: CliOutputFormat,
    },

    /// Normalize column headers to snake_case identifiers
    Clean {
        /// Table file
        file: PathBuf,

        /// Print only the old -> new name mapping
        #[arg(long)]
        names_only: bool,

        /// Output format
        #[arg(short, long, value_enum, default_value = "terminal")]
        format: CliOutputFormat,
    },
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(2)
        }
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let factory = LoaderFactory::new();

    match cli.command {
        Command::Join {
            left_file,
            right_file,
            on,
            left_on,
            right_on,
            kind,
            null_equals_null,
            suffix,
            format,
        } => {
            let config = if !on.is_empty() {
                JoinConfig::new(left_file, right_file).with_keys(on)
            } else if !left_on.is_empty() {
                JoinConfig::new(left_file, right_file).with_mapped_keys(left_on, right_on)
            } else {
                bail!("No key columns given: pass --on or --left-on/--right-on");
            };
            let config = config
                .with_kind(kind.into())
                .with_null_equals_null(null_equals_null)
                .with_collision_suffix(suffix)
                .with_output_format(format.into());

            let left = factory
                .load(&config.left_file)
                .with_context(|| format!("Failed to load left table: {}", config.left_file.display()))?;
            let right = factory
                .load(&config.right_file)
                .with_context(|| format!("Failed to load right table: {}", config.right_file.display()))?;

            let spec = JoinSpec::mapped(config.left_keys.clone(), config.right_keys.clone());
            let engine = JoinEngine::new(config.join_options());
            let joined = engine.join(&left, &right, &spec, config.kind)?;

            render_to_stdout(&joined, config.output_format)?;
        }

        Command::Dupes {
            file,
            check,
            format,
        } => {
            let table = factory
                .load(&file)
                .with_context(|| format!("Failed to load table: {}", file.display()))?;
            let dupes = find_dupes(&table, &check)?;
            render_to_stdout(&dupes, format.into())?;
        }

        Command::Clean {
            file,
            names_only,
            format,
        } => {
            let table = factory
                .load(&file)
                .with_context(|| format!("Failed to load table: {}", file.display()))?;

            let format: OutputFormat = format.into();
            if names_only {
                let raw: Vec<&str> = table.column_names().collect();
                let cleaned = clean_names(&raw);
                match format {
                    OutputFormat::Json => {
                        let mapping: serde_json::Map<String, serde_json::Value> = raw
                            .iter()
                            .zip(&cleaned)
                            .map(|(old, new)| {
                                (old.to_string(), serde_json::Value::String(new.clone()))
                            })
                            .collect();
                        println!("{}", serde_json::to_string_pretty(&mapping)?);
                    }
                    OutputFormat::Terminal => {
                        for (old, new) in raw.iter().zip(&cleaned) {
                            println!("{} -> {}", old, new);
                        }
                    }
                }
            } else {
                let cleaned = clean_table(&table)?;
                render_to_stdout(&cleaned, format)?;
            }
        }
    }

    Ok(())
}

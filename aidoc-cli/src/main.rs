//! `aidoc` - inspect the AI document schema and validate records offline.

use aidoc_cli::commands;
use aidoc_cli::telemetry::init_tracing;
use aidoc_cli::ExportFormat;
use aidoc_core::AidocConfig;
use aidoc_guard::Validator;
use anyhow::Context;
use clap::builder::RangedU64ValueParser;
use clap::{Parser, Subcommand};
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(
    name = "aidoc",
    about = "AI document metadata schema: inspect, export and validate",
    version
)]
struct Cli {
    /// Path to a TOML config file; AIDOC_* environment variables override it.
    #[arg(long, global = true, env = "AIDOC_CONFIG")]
    config: Option<PathBuf>,

    /// Emit logs as JSON lines on stderr.
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print field totals, group counts and the ordered field list.
    Info,

    /// Export the field registry.
    Export {
        #[arg(long, value_enum, default_value_t = ExportFormat::Markdown)]
        format: ExportFormat,

        /// Write to a file instead of stdout.
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Validate and print a sample ingestion record.
    Example {
        #[arg(long, default_value = "example_user")]
        user: String,

        #[arg(long, default_value = "example.pdf")]
        document: String,

        #[arg(long, default_value = "This is an example document chunk.")]
        text: String,

        /// Attach a placeholder vector of this many dimensions.
        #[arg(long, value_parser = RangedU64ValueParser::<usize>::new().range(1..))]
        dims: Option<usize>,
    },

    /// Validate a candidate JSON object as an insert, or as an update when
    /// `--previous` names the stored record.
    Validate {
        #[arg(long)]
        candidate: PathBuf,

        #[arg(long)]
        previous: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.log_json)?;

    let config = AidocConfig::load(cli.config.as_deref()).context("loading configuration")?;

    match cli.command {
        Commands::Info => {
            print!("{}", commands::info(&config));
        }
        Commands::Export { format, output } => {
            let text = commands::export(&config, format)?;
            match output {
                Some(path) => fs::write(&path, text)
                    .with_context(|| format!("writing {}", path.display()))?,
                None => print!("{text}"),
            }
        }
        Commands::Example {
            user,
            document,
            text,
            dims,
        } => {
            let validated = commands::example(config, &user, &document, &text, dims)?;
            println!("{}", serde_json::to_string_pretty(&validated.record)?);
        }
        Commands::Validate {
            candidate,
            previous,
        } => {
            let validator = Validator::with_system_sources(config)?;
            let outcome = commands::validate_files(&validator, &candidate, previous.as_deref())?;
            print!("{}", outcome.render()?);
            if !outcome.is_accepted() {
                return Ok(ExitCode::FAILURE);
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}

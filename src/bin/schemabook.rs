//! Schemabook CLI
//!
//! Validates schema documents and reports on the resulting model.

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use schemabook::config::OutputFormat;
use schemabook::{build_model_with, Document, Model, SchemabookConfig};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "schemabook")]
#[command(about = "Validate schema documents and inspect their type model")]
struct Cli {
    /// Config file, loaded on top of the default locations
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a document and report every defect
    Check {
        /// Document to validate (.json or .toml)
        input: PathBuf,
        /// Print diagnostics as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print a summary of a valid document's model
    Summary {
        /// Document to summarize (.json or .toml)
        input: PathBuf,
        /// Write the summary to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Inspect or create configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Print the effective configuration
    Show,
    /// Write a default configuration file
    Init {
        #[arg(default_value = "schemabook.toml")]
        path: PathBuf,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Returns whether the command succeeded
fn run(cli: Cli) -> anyhow::Result<bool> {
    let config = SchemabookConfig::load_from(cli.config.as_deref())
        .context("failed to load configuration")?;

    match cli.command {
        Commands::Check { input, json } => {
            let doc = load_document(&input)?;
            let (model, errors) =
                build_model_with(&doc, &config.predefined_scalars(), &config.model_options());

            if json {
                println!("{}", to_json(&errors, config.output.format)?);
            } else if errors.has_errors() {
                eprint!("{}", errors.format_all());
            } else {
                println!(
                    "✅ {} - {} types, no errors",
                    input.display(),
                    model.registry.total_types()
                );
            }

            Ok(!errors.has_errors())
        }

        Commands::Summary { input, output } => {
            let doc = load_document(&input)?;
            let model = match Model::build_with(
                &doc,
                &config.predefined_scalars(),
                &config.model_options(),
            ) {
                Ok(model) => model,
                Err(errors) => {
                    eprint!("{}", errors.format_all());
                    return Ok(false);
                }
            };

            let content = to_json(&model.summary(), config.output.format)?;
            match output {
                Some(path) => {
                    std::fs::write(&path, content)
                        .with_context(|| format!("failed to write {}", path.display()))?;
                    println!("📝 Summary written to {}", path.display());
                }
                None => println!("{}", content),
            }

            Ok(true)
        }

        Commands::Config { command } => {
            match command {
                ConfigCommands::Show => {
                    print!("{}", toml::to_string_pretty(&config)?);
                }
                ConfigCommands::Init { path } => {
                    if path.exists() {
                        anyhow::bail!("{} already exists", path.display());
                    }
                    SchemabookConfig::default()
                        .save(&path)
                        .with_context(|| format!("failed to write {}", path.display()))?;
                    println!("📝 Default configuration written to {}", path.display());
                }
            }
            Ok(true)
        }
    }
}

fn load_document(path: &Path) -> anyhow::Result<Document> {
    Document::from_path(path).with_context(|| format!("failed to load {}", path.display()))
}

fn to_json<T: Serialize>(value: &T, format: OutputFormat) -> serde_json::Result<String> {
    match format {
        OutputFormat::Pretty => serde_json::to_string_pretty(value),
        OutputFormat::Compact => serde_json::to_string(value),
    }
}

//! Medirec CLI
//!
//! Operator tool around the prediction engine:
//! - Running a prediction end to end (`predict`)
//! - Verifying that tables, indices and the model artifact load together (`check`)
//! - Packing a fitted-model export into a verified artifact (`model pack`)
//! - Inspecting an artifact header and manifest (`model inspect`)
//! - Listing the symptom vocabulary (`symptoms`)

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::env;
use std::path::PathBuf;

use medirec_engine::{split_symptoms, EngineConfig, PredictionOutcome, PredictionService};

mod model_cmd;
mod render;

#[derive(Parser)]
#[command(name = "medirec")]
#[command(author, version, about = "Medirec: symptom-based disease prediction and recommendations")]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Debug, Clone)]
struct GlobalArgs {
    /// Engine config (JSON). Defaults to `$MEDIREC_CONFIG` when set.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding the knowledge tables (overrides the config).
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Classifier artifact (overrides the config).
    #[arg(long, global = true)]
    model: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug). `RUST_LOG` takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Predict a disease from comma-separated symptoms and print recommendations.
    Predict {
        /// e.g. "itching, skin_rash"
        symptoms: String,
        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
        /// Also show which symptoms were recognized or ignored
        #[arg(long)]
        explain: bool,
    },

    /// Load every startup artifact and report what was loaded.
    Check,

    /// Model artifact commands.
    Model {
        #[command(subcommand)]
        command: ModelCommands,
    },

    /// List the symptom vocabulary in feature order.
    Symptoms {
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
enum ModelCommands {
    /// Pack a fitted-model JSON export into a verified artifact.
    Pack {
        /// Model export (JSON)
        export: PathBuf,
        /// Output artifact path
        #[arg(short, long)]
        out: PathBuf,
    },

    /// Verify an artifact and print its header and manifest.
    Inspect {
        artifact: PathBuf,
        /// Also check the artifact against the configured indices
        #[arg(long)]
        check_indices: bool,
    },
}

fn init_tracing(verbose: u8) {
    use tracing_subscriber::EnvFilter;

    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn resolve_config(global: &GlobalArgs) -> Result<EngineConfig> {
    let path = global
        .config
        .clone()
        .or_else(|| env::var_os("MEDIREC_CONFIG").map(PathBuf::from));

    let mut config = match path {
        Some(path) => EngineConfig::from_json_file(&path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => EngineConfig::default(),
    };
    if let Some(dir) = &global.data_dir {
        config.data_dir = dir.clone();
    }
    if let Some(model) = &global.model {
        config.model_path = model.clone();
    }
    Ok(config)
}

fn load_service(config: &EngineConfig) -> Result<PredictionService> {
    PredictionService::load(config).context("starting prediction engine")
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.global.verbose);
    let config = resolve_config(&cli.global)?;
    tracing::debug!(?config, "resolved configuration");

    match cli.command {
        Commands::Predict {
            symptoms,
            json,
            explain,
        } => {
            let service = load_service(&config)?;
            let outcome = service.predict_and_recommend(&symptoms)?;
            let report = match (&outcome, explain) {
                (PredictionOutcome::Recommended(_), true) => Some(
                    service
                        .encoder()
                        .encode_with_report(split_symptoms(&symptoms))
                        .1,
                ),
                _ => None,
            };

            if json {
                let mut value = serde_json::to_value(&outcome)?;
                if let (Some(report), Some(obj)) = (&report, value.as_object_mut()) {
                    obj.insert("encoding".to_string(), serde_json::to_value(report)?);
                }
                println!("{}", serde_json::to_string_pretty(&value)?);
            } else {
                if let Some(report) = &report {
                    render::print_report(report);
                }
                render::print_outcome(&outcome);
            }
        }

        Commands::Check => {
            let service = load_service(&config)?;
            render::print_check(&config, &service);
        }

        Commands::Model { command } => match command {
            ModelCommands::Pack { export, out } => model_cmd::pack(&config, &export, &out)?,
            ModelCommands::Inspect {
                artifact,
                check_indices,
            } => model_cmd::inspect(&config, &artifact, check_indices)?,
        },

        Commands::Symptoms { json } => {
            let (symptoms, _) = config.load_indices()?;
            if json {
                let names: Vec<&str> = symptoms.names().collect();
                println!("{}", serde_json::to_string_pretty(&names)?);
            } else {
                for (pos, name) in symptoms.names().enumerate() {
                    println!("{pos:>4}  {name}");
                }
            }
        }
    }

    Ok(())
}

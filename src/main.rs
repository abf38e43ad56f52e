//! Activity Classifier CLI
//!
//! Classifies human activity from inertial sensor windows.

use activity_classifier::{
    config::Config, ArtifactPaths, Artifacts, Label, FEATURE_NAMES, VERSION, WINDOW_SIZE,
};
use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "activity-classifier")]
#[command(version = VERSION)]
#[command(about = "Human activity classification from inertial sensor windows", long_about = None)]
struct Cli {
    /// Scaler artifact (overrides the configured path)
    #[arg(long, global = true)]
    scaler: Option<PathBuf>,

    /// Model artifact (overrides the configured path)
    #[arg(long, global = true)]
    model: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve predictions over HTTP
    #[cfg(feature = "server")]
    Serve {
        /// Address to bind to
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to
        #[arg(long)]
        port: Option<u16>,
    },

    /// Classify a series read from a JSON file
    Predict {
        /// File containing {"data": [[acc_X, ..., gyro_Z], ...]}
        #[arg(long, short)]
        input: PathBuf,
    },

    /// Print the feature vector extracted from a JSON file
    Features {
        /// File containing {"data": [[acc_X, ..., gyro_Z], ...]}
        #[arg(long, short)]
        input: PathBuf,
    },

    /// List the canonical activity labels
    Labels,

    /// Show configuration
    Config,
}

/// Series file accepted by `predict` and `features`.
#[derive(Deserialize)]
struct SeriesFile {
    data: Vec<Vec<f64>>,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let mut config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Warning: Could not load config, using defaults: {e}");
            Config::default()
        }
    };
    if let Some(scaler) = cli.scaler {
        config.scaler_path = scaler;
    }
    if let Some(model) = cli.model {
        config.model_path = model;
    }

    init_tracing(&config.log_filter);

    let result = match cli.command {
        #[cfg(feature = "server")]
        Commands::Serve { host, port } => cmd_serve(config, host, port).await,
        Commands::Predict { input } => cmd_predict(&config, &input),
        Commands::Features { input } => cmd_features(&config, &input),
        Commands::Labels => {
            cmd_labels();
            Ok(())
        }
        Commands::Config => cmd_config(&config),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

/// Install the tracing subscriber. `RUST_LOG` takes precedence over the config.
fn init_tracing(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Load the artifacts. Any failure here is fatal to the command.
fn load_artifacts(paths: &ArtifactPaths) -> anyhow::Result<Artifacts> {
    Artifacts::load(paths).context("could not initialize the classification pipeline")
}

fn read_series(path: &Path) -> anyhow::Result<Vec<Vec<f64>>> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let file: SeriesFile =
        serde_json::from_str(&content).with_context(|| format!("parsing {}", path.display()))?;
    Ok(file.data)
}

#[cfg(feature = "server")]
async fn cmd_serve(config: Config, host: Option<String>, port: Option<u16>) -> anyhow::Result<()> {
    use activity_classifier::server::{run, ServerConfig};
    use activity_classifier::stats::create_shared_stats_with_persistence;
    use std::sync::Arc;

    let artifacts = Arc::new(load_artifacts(&config.artifact_paths())?);
    let stats = create_shared_stats_with_persistence(config.stats_path());

    let server_config = ServerConfig::new(
        host.unwrap_or(config.server.host),
        port.unwrap_or(config.server.port),
    );
    let (addr, shutdown_tx) = run(server_config, artifacts, stats.clone()).await?;

    println!("Activity Classifier v{VERSION}");
    println!("Listening on http://{addr}");
    println!("Press Ctrl+C to stop");

    tokio::signal::ctrl_c()
        .await
        .context("waiting for Ctrl+C")?;

    let _ = shutdown_tx.send(());

    if let Err(e) = stats.save() {
        eprintln!("Warning: Could not save prediction stats: {e}");
    }

    println!();
    println!("{}", stats.summary());
    Ok(())
}

fn cmd_predict(config: &Config, input: &Path) -> anyhow::Result<()> {
    let artifacts = load_artifacts(&config.artifact_paths())?;
    let data = read_series(input)?;

    let label = artifacts.pipeline().run(&data)?;
    println!("{} {}", label.id(), label);
    Ok(())
}

fn cmd_features(config: &Config, input: &Path) -> anyhow::Result<()> {
    let artifacts = load_artifacts(&config.artifact_paths())?;
    let data = read_series(input)?;

    let evaluation = artifacts.pipeline().evaluate(&data)?;
    println!("{}", serde_json::to_string_pretty(&evaluation.features)?);
    if !evaluation.features.defaulted().is_empty() {
        eprintln!(
            "Note: {} feature(s) defaulted to 0: {}",
            evaluation.features.defaulted().len(),
            evaluation.features.defaulted().join(", ")
        );
    }
    Ok(())
}

fn cmd_labels() {
    println!("Activity Labels");
    println!("===============");
    for label in Label::ALL {
        println!("  {}  {}", label.id(), label);
    }
    println!();
    println!(
        "Window: last {} samples, {} features",
        WINDOW_SIZE,
        FEATURE_NAMES.len()
    );
}

fn cmd_config(config: &Config) -> anyhow::Result<()> {
    println!("Configuration");
    println!("=============");
    println!();
    println!("Config file: {:?}", Config::config_path());
    println!();
    println!("{}", serde_json::to_string_pretty(config)?);
    Ok(())
}

//! # pipeline-anomaly
//!
//! Command-line runner for the windowed anomaly pipeline.

use std::fs::File;
use std::path::{Path, PathBuf};

use aggregate_facade::WindowAggregator;
use anomaly_facade::{is_alert, DetectorEnsemble, DetectorRegistry};
use anyhow::{Context, Result};
use batch_facade::NdjsonSource;
use clap::{Parser, Subcommand};
use pipeline_facade::{build_pipeline, PipelineConfig, CONFIG_ENV};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "pipeline-anomaly")]
#[command(about = "Windowed aggregation and anomaly detection over chain events", long_about = None)]
struct Cli {
    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load, aggregate, detect and alert once
    Run {
        /// Pipeline config (YAML)
        #[arg(short, long, env = CONFIG_ENV)]
        config: Option<PathBuf>,

        /// Write aggregates and report as JSON
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Check a config file and print the detector order
    Validate {
        /// Pipeline config (YAML)
        #[arg(short, long, env = CONFIG_ENV)]
        config: Option<PathBuf>,
    },

    /// Aggregate and score a replay file without storage or alerting
    Detect {
        /// Newline-delimited JSON events
        #[arg(short, long)]
        input: PathBuf,

        /// Pipeline config (YAML); defaults apply when absent
        #[arg(short, long, env = CONFIG_ENV)]
        config: Option<PathBuf>,
    },
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

fn load_config(explicit: Option<PathBuf>) -> Result<PipelineConfig> {
    let path = PipelineConfig::resolve_path(explicit);
    let config = PipelineConfig::load_validated(&path)
        .with_context(|| format!("invalid config {}", path.display()))?;
    info!(path = %path.display(), "config loaded");
    Ok(config)
}

fn write_json<T: serde::Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let file = File::create(path).with_context(|| format!("cannot create {}", path.display()))?;
    serde_json::to_writer_pretty(file, value)?;
    println!("Results written to {}", path.display());
    Ok(())
}

fn run_pipeline(config: Option<PathBuf>, output: Option<PathBuf>) -> Result<()> {
    let config = load_config(config)?;
    let mut built = build_pipeline(&config, &DetectorRegistry::default())?;
    let outcome = built.orchestrator.execute()?;

    println!("Final state: {}", outcome.final_state);
    println!("Rows loaded: {}", outcome.rows_loaded);
    println!(
        "Window: {} to {}",
        outcome.report.window_start.to_rfc3339(),
        outcome.report.window_end.to_rfc3339()
    );
    println!("Aggregates: {}", outcome.aggregates.len());
    for anomaly in &outcome.report.anomalies {
        println!(
            "  {:<10} score={:.4} severity={:.4}",
            anomaly.detector, anomaly.score, anomaly.severity
        );
    }
    println!(
        "Highest severity: {:.4} (alerted: {})",
        outcome.report.highest_severity(),
        outcome.alerted
    );

    if let Some(path) = output {
        write_json(&path, &outcome)?;
    }
    Ok(())
}

fn run_validate(config: Option<PathBuf>) -> Result<()> {
    let config = load_config(config)?;
    println!("Config OK");
    println!("Detectors: {}", config.anomaly_detection.detector_order().join(", "));
    println!("Windows: {}", config.features.windows.join(", "));
    println!("Alert threshold: {}", config.alerting.threshold_score);
    Ok(())
}

fn run_detect(input: PathBuf, config: Option<PathBuf>) -> Result<()> {
    let config = match config {
        Some(path) => load_config(Some(path))?,
        None => {
            warn!("no config given, using defaults");
            PipelineConfig::default()
        }
    };

    let source = NdjsonSource::new(&input, 1_000)
        .with_context(|| format!("cannot open {}", input.display()))?;
    let window = source.read_all()?.sorted_by_event_time();
    println!("Loaded {} events from {}", window.len(), input.display());

    let aggregates = WindowAggregator::from_config(&config.features).aggregate(&window)?;
    let mut ensemble =
        DetectorEnsemble::from_config(&DetectorRegistry::default(), &config.anomaly_detection)?;
    let report = ensemble.run(&window)?;

    let json = serde_json::json!({
        "aggregates": aggregates,
        "report": report,
        "would_alert": is_alert(&report, config.alerting.threshold_score),
    });
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}

fn main() {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(cli.log_json);

    let result = match cli.command {
        Commands::Run { config, output } => run_pipeline(config, output),
        Commands::Validate { config } => run_validate(config),
        Commands::Detect { input, config } => run_detect(input, config),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

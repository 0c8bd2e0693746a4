//! oncorisk CLI Module
//!
//! Command-line interface for training, prediction and model status.

use clap::{Parser, Subcommand};
use colored::*;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::cancer::CancerType;
use crate::config::EngineConfig;
use crate::engine::Engine;
use crate::inference::PredictionResult;
use crate::store::ModelStatus;
use crate::training::TrainingMetrics;

// ─── Styling helpers ───────────────────────────────────────────────────────────

fn dim(s: &str) -> ColoredString {
    s.truecolor(100, 100, 100)
}
fn accent(s: &str) -> ColoredString {
    s.truecolor(120, 170, 255)
}
fn muted(s: &str) -> ColoredString {
    s.truecolor(140, 140, 140)
}
fn ok(s: &str) -> ColoredString {
    s.truecolor(100, 210, 120)
}

fn kv(key: &str, val: &str) {
    println!("  {:<20} {}", muted(key), val.white());
}

fn step_run(msg: &str) {
    print!("  {} {}... ", accent("›"), msg);
}

fn step_done(detail: &str) {
    println!("{} {}", ok("done"), dim(detail));
}

fn section(title: &str) {
    println!();
    println!("  {}", title.white().bold());
    println!("  {}", dim(&"─".repeat(56)));
}

// ─── CLI definition ────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "oncorisk")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Train and serve breast, lung and prostate cancer risk classifiers")]
#[command(long_about = None)]
pub struct Cli {
    /// Directory holding model artifacts (overrides MODELS_DIR)
    #[arg(long, global = true)]
    pub model_dir: Option<PathBuf>,

    /// Directory holding the default datasets (overrides DATA_DIR)
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Train the model for a cancer type
    Train {
        /// Cancer type (breast, lung, prostate)
        cancer_type: CancerType,

        /// Training CSV; defaults to the bundled dataset
        #[arg(short, long)]
        data: Option<PathBuf>,
    },

    /// Predict a single record
    Predict {
        /// Cancer type (breast, lung, prostate)
        cancer_type: CancerType,

        /// JSON object of form fields, or @path to a JSON file
        #[arg(short, long)]
        input: String,

        /// Print the raw JSON result
        #[arg(long)]
        json: bool,
    },

    /// Predict every row of a CSV file
    PredictBatch {
        /// Cancer type (breast, lung, prostate)
        cancer_type: CancerType,

        /// Input CSV file
        #[arg(short, long)]
        data: PathBuf,

        /// Output CSV; defaults to the upload directory
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show training status
    Status {
        /// Cancer type; all types when omitted
        cancer_type: Option<CancerType>,

        /// Print the raw JSON status
        #[arg(long)]
        json: bool,
    },
}

impl Cli {
    /// Engine configuration from the environment with flag overrides
    pub fn engine_config(&self) -> EngineConfig {
        let mut config = EngineConfig::default();
        if let Some(dir) = &self.model_dir {
            config = config.with_model_dir(dir);
        }
        if let Some(dir) = &self.data_dir {
            config = config.with_data_dir(dir);
        }
        config
    }
}

/// Run a parsed command line
pub fn run(cli: Cli) -> anyhow::Result<()> {
    let engine = Engine::new(cli.engine_config());

    match cli.command {
        Commands::Train { cancer_type, data } => cmd_train(&engine, cancer_type, data.as_deref()),
        Commands::Predict { cancer_type, input, json } => cmd_predict(&engine, cancer_type, &input, json),
        Commands::PredictBatch { cancer_type, data, output } => {
            cmd_predict_batch(&engine, cancer_type, &data, output.as_deref())
        }
        Commands::Status { cancer_type, json } => cmd_status(&engine, cancer_type, json),
    }
}

/// Parse `--input`: inline JSON, or `@path` naming a JSON file
pub fn parse_input(input: &str) -> anyhow::Result<Map<String, Value>> {
    let raw = match input.strip_prefix('@') {
        Some(path) => std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("cannot read input file {}: {}", path, e))?,
        None => input.to_string(),
    };

    match serde_json::from_str::<Value>(&raw)? {
        Value::Object(fields) => Ok(fields),
        other => anyhow::bail!("input must be a JSON object, got {}", other),
    }
}

// ─── Commands ──────────────────────────────────────────────────────────────────

pub fn cmd_train(engine: &Engine, cancer_type: CancerType, data: Option<&Path>) -> anyhow::Result<()> {
    section(&format!("Train {}", cancer_type));

    let data_path = match data {
        Some(path) => path.to_path_buf(),
        None => engine.default_data_path(cancer_type)?,
    };

    step_run(&format!("Training on {}", data_path.display()));
    let start = Instant::now();
    let metrics = engine.train(cancer_type, Some(&data_path))?;
    step_done(&format!("{:.2?}", start.elapsed()));

    println!();
    print_metrics(&metrics);
    println!();
    Ok(())
}

pub fn cmd_predict(engine: &Engine, cancer_type: CancerType, input: &str, json: bool) -> anyhow::Result<()> {
    let fields = parse_input(input)?;
    let result = engine.predict(cancer_type, &fields)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    section(&format!("Predict {}", cancer_type));
    print_prediction(&result);
    println!();
    Ok(())
}

pub fn cmd_predict_batch(
    engine: &Engine,
    cancer_type: CancerType,
    data: &Path,
    output: Option<&Path>,
) -> anyhow::Result<()> {
    section(&format!("Batch predict {}", cancer_type));

    step_run(&format!("Scoring {}", data.display()));
    let start = Instant::now();
    let written = engine.predict_batch_to_file(cancer_type, data, output)?;
    step_done(&format!("{:.2?}", start.elapsed()));

    println!();
    kv("Output", &written.display().to_string());
    println!();
    Ok(())
}

pub fn cmd_status(engine: &Engine, cancer_type: Option<CancerType>, json: bool) -> anyhow::Result<()> {
    let types: Vec<CancerType> = match cancer_type {
        Some(ct) => vec![ct],
        None => CancerType::ALL.to_vec(),
    };

    let statuses = types
        .into_iter()
        .map(|ct| engine.status(ct))
        .collect::<crate::error::Result<Vec<_>>>()?;

    if json {
        let out = if statuses.len() == 1 {
            serde_json::to_string_pretty(&statuses[0])?
        } else {
            serde_json::to_string_pretty(&statuses)?
        };
        println!("{}", out);
        return Ok(());
    }

    section("Status");
    for status in &statuses {
        print_status(status);
    }
    println!();
    Ok(())
}

// ─── Output ────────────────────────────────────────────────────────────────────

fn print_metrics(metrics: &TrainingMetrics) {
    kv("Accuracy", &format!("{:.4}", metrics.accuracy));
    kv("Precision", &format!("{:.4}", metrics.precision));
    kv("Recall", &format!("{:.4}", metrics.recall));
    kv("F1 score", &format!("{:.4}", metrics.f1_score));
    kv(
        "Samples",
        &format!("{} train / {} test", metrics.training_samples, metrics.test_samples),
    );
    kv("Features", &metrics.features.to_string());
}

fn print_prediction(result: &PredictionResult) {
    kv("Prediction", &format!("{} ({})", result.prediction, result.prediction_code));
    kv("Confidence", &format!("{:.2}%", result.confidence));
    for (class, p) in &result.probabilities {
        kv(&format!("P(class {})", class), &format!("{:.4}", p));
    }
    kv("Model", &result.model_type);
    kv("Features used", &result.features_used.to_string());
    if let Some(info) = &result.model_info {
        if let Some(trained_at) = &info.trained_at {
            kv("Trained at", trained_at);
        }
        if let Some(accuracy) = info.accuracy {
            kv("Model accuracy", &format!("{:.4}", accuracy));
        }
    }
}

fn print_status(status: &ModelStatus) {
    let state = if status.is_trained {
        ok("trained")
    } else {
        "not trained".yellow()
    };
    println!("  {:<12} {}", status.cancer_type.to_string().white().bold(), state);
    if let Some(metrics) = &status.metrics {
        kv("  Accuracy", &format!("{:.4}", metrics.accuracy));
        kv("  F1 score", &format!("{:.4}", metrics.f1_score));
    }
    if let Some(trained_at) = &status.trained_at {
        kv("  Trained at", trained_at);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        let cli = Cli::try_parse_from([
            "oncorisk",
            "--model-dir",
            "/tmp/m",
            "train",
            "Breast",
            "--data",
            "b.csv",
        ])
        .unwrap();
        assert_eq!(cli.engine_config().model_dir, PathBuf::from("/tmp/m"));
        match cli.command {
            Commands::Train { cancer_type, data } => {
                assert_eq!(cancer_type, CancerType::Breast);
                assert_eq!(data, Some(PathBuf::from("b.csv")));
            }
            _ => panic!("expected train"),
        }

        let cli = Cli::try_parse_from(["oncorisk", "status"]).unwrap();
        assert!(matches!(cli.command, Commands::Status { cancer_type: None, json: false }));

        let cli = Cli::try_parse_from(["oncorisk", "predict-batch", "lung", "--data", "in.csv"]).unwrap();
        assert!(matches!(cli.command, Commands::PredictBatch { cancer_type: CancerType::Lung, .. }));
    }

    #[test]
    fn test_unknown_cancer_type_rejected() {
        assert!(Cli::try_parse_from(["oncorisk", "train", "skin"]).is_err());
    }

    #[test]
    fn test_parse_input() {
        let fields = parse_input(r#"{"psa": 4.1, "dre": "yes"}"#).unwrap();
        assert_eq!(fields.len(), 2);
        assert!(parse_input("[1, 2]").is_err());

        let file = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(file.path(), r#"{"radiusMean": 14.2}"#).unwrap();
        let fields = parse_input(&format!("@{}", file.path().display())).unwrap();
        assert_eq!(fields["radiusMean"], 14.2);
    }
}

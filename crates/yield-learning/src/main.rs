//! CLI entry point for training and querying the crop yield model.
//!
//! Every command prints exactly one JSON line on stdout. Logs go to stderr.

use anyhow::Result;
use clap::error::ErrorKind;
use clap::{Parser, Subcommand};
use dotenv::dotenv;
use serde::Serialize;
use serde_json::json;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{debug, info};
use yield_learning::{
    ModelBundle, Pipeline, PredictionLog, PredictionRequest, TrainingConfig, YieldError, health,
    predict,
};
use yield_processing::{GeneratorConfig, SyntheticGenerator, write_csv};

#[derive(Parser, Debug)]
#[command(
    name = "yield-predictor",
    version,
    about = "Crop yield prediction with a random forest trained on synthetic agronomic data",
    long_about = "Crop yield prediction with a random forest trained on synthetic agronomic data.\n\n\
                  ENVIRONMENT VARIABLES:\n  \
                  YIELD_MODEL_DIR         Directory holding the model artifact files\n  \
                  YIELD_PREDICTION_LOG    JSON Lines file recording every prediction\n  \
                  RUST_LOG                Log filter, overrides --log-level\n\n\
                  EXAMPLES:\n  \
                  yield-predictor train\n  \
                  yield-predictor predict '{\"crop_type\":\"tomato\",\"growth_stage\":\"fruiting\",\
                  \"days_planting\":90,\"location\":\"greenhouse\",\"temperature\":24,\
                  \"humidity\":65,\"light\":750}'\n  \
                  yield-predictor health\n  \
                  yield-predictor generate --output dataset.csv"
)]
struct Cli {
    /// Directory holding yield_model.json, scaler.json and encoders.json
    #[arg(long, global = true, env = "YIELD_MODEL_DIR", default_value = ".")]
    model_dir: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate data, fit the forest and save the artifact
    Train {
        /// Number of synthetic samples
        #[arg(long, default_value_t = 2000)]
        samples: usize,

        /// Random seed for generation, split and forest
        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// Number of trees in the forest
        #[arg(long, default_value_t = 100)]
        trees: usize,
    },

    /// Predict the yield for one JSON-encoded sample
    Predict {
        /// Request object with crop_type, growth_stage, days_planting,
        /// location, temperature, humidity and light
        input: Option<String>,

        /// Append each prediction to this JSON Lines file
        #[arg(long, env = "YIELD_PREDICTION_LOG")]
        prediction_log: Option<PathBuf>,
    },

    /// Report whether a trained artifact is available
    Health,

    /// Write a synthetic dataset as CSV
    Generate {
        /// Destination CSV file
        #[arg(short, long)]
        output: PathBuf,

        /// Number of synthetic samples
        #[arg(long, default_value_t = 2000)]
        samples: usize,

        /// Random seed
        #[arg(long, default_value_t = 42)]
        seed: u64,
    },
}

#[derive(Serialize)]
struct DatasetSummary {
    path: String,
    rows: usize,
    columns: Vec<String>,
}

/// Initialize the tracing subscriber on stderr so stdout carries only JSON.
fn init_logging(level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// What one invocation prints, and whether it exits with status 1.
#[derive(Debug)]
struct Outcome {
    line: String,
    usage_error: bool,
}

impl Outcome {
    fn value<T: Serialize>(value: &T) -> Self {
        match serde_json::to_string(value) {
            Ok(line) => Self {
                line,
                usage_error: false,
            },
            Err(e) => Self::error(e),
        }
    }

    fn error(message: impl std::fmt::Display) -> Self {
        Self {
            line: json!({ "error": message.to_string() }).to_string(),
            usage_error: false,
        }
    }

    fn usage(message: impl std::fmt::Display) -> Self {
        Self {
            usage_error: true,
            ..Self::error(message)
        }
    }
}

fn main() -> ExitCode {
    // Load .env before parsing so it can feed the env-backed flags
    dotenv().ok();

    let outcome = match Cli::try_parse() {
        Ok(cli) => {
            init_logging(&cli.log_level);
            execute(cli)
        }
        Err(e) => match e.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => e.exit(),
            _ => parse_failure(&e),
        },
    };

    println!("{}", outcome.line);
    if outcome.usage_error {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn parse_failure(error: &clap::Error) -> Outcome {
    match error.kind() {
        ErrorKind::MissingSubcommand | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => {
            Outcome::usage("Usage: yield-predictor <train|predict|health|generate>")
        }
        _ => {
            let rendered = error.to_string();
            let first_line = rendered.lines().next().unwrap_or("invalid arguments");
            Outcome::usage(first_line.trim_start_matches("error: "))
        }
    }
}

fn execute(cli: Cli) -> Outcome {
    match cli.command {
        Command::Train {
            samples,
            seed,
            trees,
        } => match run_train(&cli.model_dir, samples, seed, trees) {
            Ok(report) => Outcome::value(&report),
            Err(e) => Outcome::error(format!(
                "Training failed: {}",
                training_failure_reason(&e)
            )),
        },
        Command::Predict { input: None, .. } => {
            Outcome::usage("Prediction input is required: yield-predictor predict '<json>'")
        }
        Command::Predict {
            input: Some(input),
            prediction_log,
        } => match run_predict(&cli.model_dir, &input, prediction_log.as_deref()) {
            Ok(response) => Outcome::value(&response),
            Err(e) => Outcome::error(e),
        },
        Command::Health => match health(&cli.model_dir) {
            Ok(report) => Outcome::value(&report),
            Err(e) => Outcome::error(e),
        },
        Command::Generate {
            output,
            samples,
            seed,
        } => match run_generate(&output, samples, seed) {
            Ok(summary) => Outcome::value(&summary),
            Err(e) => Outcome::error(e),
        },
    }
}

fn run_train(
    model_dir: &Path,
    samples: usize,
    seed: u64,
    trees: usize,
) -> Result<yield_learning::TrainingReport> {
    let config = TrainingConfig::builder()
        .n_samples(samples)
        .seed(seed)
        .n_trees(trees)
        .build()?;

    info!(
        "Training on {} samples (seed {}, {} trees) into {}",
        samples,
        seed,
        trees,
        model_dir.display()
    );

    let pipeline = Pipeline::builder()
        .config(config)
        .on_progress(|update| {
            debug!(
                "[{}] {:.0}% - {}",
                update.stage,
                update.progress * 100.0,
                update.message
            );
        })
        .build();

    Ok(pipeline.train(model_dir)?)
}

/// The part of a training error that follows the "Training failed: " prefix.
fn training_failure_reason(error: &anyhow::Error) -> String {
    match error.downcast_ref::<YieldError>() {
        Some(YieldError::TrainingFailed(reason)) => reason.clone(),
        _ => error.to_string(),
    }
}

fn run_predict(
    model_dir: &Path,
    input: &str,
    prediction_log: Option<&Path>,
) -> Result<yield_learning::PredictionResponse> {
    let request: PredictionRequest =
        serde_json::from_str(input).map_err(|e| YieldError::InvalidInput(e.to_string()))?;

    let bundle = ModelBundle::load(model_dir)?;
    let response = predict(&bundle, &request)?;

    if let Some(path) = prediction_log {
        PredictionLog::new(path).append(&request, &response)?;
    }

    Ok(response)
}

fn run_generate(output: &Path, samples: usize, seed: u64) -> Result<DatasetSummary> {
    let mut df = SyntheticGenerator::new(GeneratorConfig::new(samples, seed))?.generate()?;
    let path = write_csv(&mut df, output)?;

    Ok(DatasetSummary {
        path: path.display().to_string(),
        rows: df.height(),
        columns: df
            .get_column_names()
            .iter()
            .map(|name| name.to_string())
            .collect(),
    })
}

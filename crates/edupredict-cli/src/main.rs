mod config;
mod display;

use std::fs::File;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::{Arc, Mutex};

use anyhow::Context;
use clap::builder::PossibleValuesParser;
use clap::{Args, Parser, Subcommand};
use edupredict_core::{
    Choice, Gender, Lunch, ParentalEducation, RaceEthnicity, RawSubmission, SubmissionHandler,
    TestPreparation,
};
use tracing_subscriber::EnvFilter;

use crate::config::{PipelineConfig, build_predictor};

#[derive(Parser)]
#[command(name = "edupredict", version, about = "Predict a student's math score")]
struct Cli {
    /// ONNX model directory (containing model.onnx) or model file.
    #[arg(long, env = "EDUPREDICT_MODEL", global = true)]
    model: Option<PathBuf>,

    /// Base URL of a model-serving endpoint.
    #[arg(long, env = "EDUPREDICT_PIPELINE_URL", global = true)]
    pipeline_url: Option<String>,

    /// Upper bound on a single pipeline call.
    #[arg(long, env = "EDUPREDICT_TIMEOUT_SECS", default_value_t = 30, global = true)]
    timeout_secs: u64,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the HTML form.
    Serve {
        #[arg(long, env = "EDUPREDICT_BIND", default_value = "0.0.0.0:5000")]
        bind: SocketAddr,
    },
    /// Run the interactive terminal form.
    Tui {
        /// Write logs here; the terminal belongs to the form.
        #[arg(long, env = "EDUPREDICT_LOG_FILE")]
        log_file: Option<PathBuf>,
    },
    /// Predict once from flags and print the result.
    Predict(PredictArgs),
}

#[derive(Args)]
struct PredictArgs {
    #[arg(long, default_value = "Male", value_parser = PossibleValuesParser::new(Gender::labels()))]
    gender: String,

    #[arg(long, default_value = "Group A", value_parser = PossibleValuesParser::new(RaceEthnicity::labels()))]
    ethnicity: String,

    #[arg(
        long,
        default_value = "Associate's Degree",
        value_parser = PossibleValuesParser::new(ParentalEducation::labels())
    )]
    parental_education: String,

    #[arg(long, default_value = "Free / Reduced", value_parser = PossibleValuesParser::new(Lunch::labels()))]
    lunch: String,

    #[arg(long, default_value = "None", value_parser = PossibleValuesParser::new(TestPreparation::labels()))]
    test_preparation: String,

    #[arg(long, default_value_t = 70.0, allow_negative_numbers = true)]
    reading_score: f64,

    #[arg(long, default_value_t = 70.0, allow_negative_numbers = true)]
    writing_score: f64,

    /// Also print the raw pipeline output.
    #[arg(long)]
    details: bool,
}

impl PredictArgs {
    fn submission(&self) -> anyhow::Result<RawSubmission> {
        Ok(RawSubmission {
            gender: self.gender.parse()?,
            race_ethnicity: self.ethnicity.parse()?,
            parental_level_of_education: self.parental_education.parse()?,
            lunch: self.lunch.parse()?,
            test_preparation_course: self.test_preparation.parse()?,
            reading_score: self.reading_score,
            writing_score: self.writing_score,
        })
    }
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .init();
}

/// The terminal is owned by the form, so logs go to a file or nowhere.
fn init_file_tracing(path: &Path) -> anyhow::Result<()> {
    let file = File::create(path).with_context(|| format!("creating log file {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    match &cli.command {
        Command::Tui {
            log_file: Some(path),
        } => init_file_tracing(path)?,
        Command::Tui { log_file: None } => {}
        _ => init_tracing(),
    }
    tracing::info!("edupredict v{}", env!("CARGO_PKG_VERSION"));

    let config = PipelineConfig::from_args(cli.model.clone(), cli.pipeline_url.as_deref())?;
    let handler: Arc<dyn SubmissionHandler> = Arc::new(build_predictor(&config, cli.timeout_secs)?);

    match cli.command {
        Command::Serve { bind } => {
            edupredict_web::serve(bind, handler)
                .await
                .with_context(|| format!("serving on {bind}"))?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Tui { .. } => {
            let runtime = tokio::runtime::Handle::current();
            tokio::task::spawn_blocking(move || edupredict_tui::run(handler, runtime)).await??;
            Ok(ExitCode::SUCCESS)
        }
        Command::Predict(args) => {
            let raw = args.submission()?;
            match handler.submit(raw).await {
                Ok(prediction) => {
                    print!("{}", display::render_card(&prediction, args.details));
                    Ok(ExitCode::SUCCESS)
                }
                Err(err) => {
                    tracing::warn!(kind = ?err.kind(), "prediction failed");
                    eprint!("{}", display::render_failure(&err));
                    Ok(ExitCode::FAILURE)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn predict_flags_take_display_labels() {
        let cli = Cli::try_parse_from([
            "edupredict",
            "--pipeline-url",
            "http://localhost:5001",
            "predict",
            "--gender",
            "Other / Prefer not to say",
            "--ethnicity",
            "Group C",
            "--lunch",
            "Standard",
            "--reading-score",
            "88",
        ])
        .unwrap();
        let Command::Predict(args) = cli.command else {
            panic!("expected predict");
        };
        let raw = args.submission().unwrap();
        assert_eq!(raw.gender, Gender::Other);
        assert_eq!(raw.race_ethnicity, RaceEthnicity::GroupC);
        assert_eq!(raw.lunch, Lunch::Standard);
        assert_eq!(raw.test_preparation_course, TestPreparation::None);
        assert_eq!(raw.reading_score, 88.0);
        assert_eq!(raw.writing_score, 70.0);
    }

    #[test]
    fn tokens_are_not_accepted_as_flags() {
        let err = Cli::try_parse_from(["edupredict", "predict", "--ethnicity", "group C"]);
        assert!(err.is_err());
    }

    #[test]
    fn serve_defaults() {
        let cli = Cli::try_parse_from(["edupredict", "--model", "m", "serve"]).unwrap();
        assert_eq!(cli.timeout_secs, 30);
        let Command::Serve { bind } = cli.command else {
            panic!("expected serve");
        };
        assert_eq!(bind, "0.0.0.0:5000".parse::<SocketAddr>().unwrap());
    }
}

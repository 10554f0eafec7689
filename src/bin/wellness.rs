//! Wellness CLI - Command-line interface for the wellness score engine
//!
//! Commands:
//! - score: Score a week of metrics given as flags or a JSON document
//! - aggregate: Aggregate raw health records and score the result
//! - demo: Score the fixed demo week

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use chrono::{DateTime, Utc};
use wellness_score::encoder::{ReportEncoder, ScoreReport};
use wellness_score::presentation::score_and_build;
use wellness_score::source::{demo_metrics, LiveSource};
use wellness_score::{
    select_source, Capability, DashboardStore, DataOrigin, HealthMetrics, PresentationConfig,
    ScoreError, WELLNESS_VERSION,
};

/// Wellness - composite health score for a week of wearable data
#[derive(Parser)]
#[command(name = "wellness")]
#[command(author = "Synheart AI Inc")]
#[command(version = WELLNESS_VERSION)]
#[command(about = "Score a week of steps, sleep and heart rate", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    presentation: PresentationArgs,
}

#[derive(Subcommand)]
enum Commands {
    /// Score a week of metrics
    Score {
        /// Metrics JSON file (use - for stdin)
        #[arg(short, long, conflicts_with_all = ["steps", "sleep_hours", "heart_rate"])]
        input: Option<PathBuf>,

        /// Steps over the last 7 days
        #[arg(long, required_unless_present = "input")]
        steps: Option<u64>,

        /// Total sleep over the last 7 days (hours)
        #[arg(long, required_unless_present = "input")]
        sleep_hours: Option<f64>,

        /// Average heart rate over the last 7 days (bpm, 0 for no data)
        #[arg(long, required_unless_present = "input")]
        heart_rate: Option<u32>,

        /// Sleep for the most recent night (hours)
        #[arg(long)]
        night_sleep_hours: Option<f64>,

        /// Steps recorded today
        #[arg(long)]
        today_steps: Option<u64>,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Aggregate raw health records and score them
    Aggregate {
        /// Record set JSON file (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// End of the 7-day window (RFC 3339, defaults to now)
        #[arg(long)]
        now: Option<String>,

        /// Treat live data as unavailable and use the demo week
        #[arg(long)]
        offline: bool,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Score the fixed demo week
    Demo {
        #[command(flatten)]
        output: OutputArgs,
    },
}

#[derive(Args)]
struct OutputArgs {
    /// Output format
    #[arg(long, default_value = "text")]
    format: OutputFormat,
}

/// Overrides for the presentation targets (environment values otherwise)
#[derive(Args)]
struct PresentationArgs {
    /// Nightly sleep target (hours)
    #[arg(long, global = true)]
    target_sleep_hours: Option<f64>,

    /// Deficit above which the sleep alert is shown (minutes)
    #[arg(long, global = true)]
    sleep_alert_minutes: Option<u32>,

    /// Daily step goal
    #[arg(long, global = true)]
    exercise_goal_steps: Option<u64>,
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// Human readable summary
    Text,
    /// Compact JSON report
    Json,
    /// Pretty-printed JSON report
    JsonPretty,
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!(
                "{}",
                serde_json::to_string(&CliError::from(e))
                    .unwrap_or_else(|_| "Unknown error".to_string())
            );
            ExitCode::FAILURE
        }
    }
}

/// Logs go to stderr, filtered by RUST_LOG (warn by default)
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<(), WellnessCliError> {
    let config = resolve_config(&cli.presentation)?;

    match cli.command {
        Commands::Score {
            input,
            steps,
            sleep_hours,
            heart_rate,
            night_sleep_hours,
            today_steps,
            output,
        } => {
            let metrics = match input {
                Some(path) => HealthMetrics::from_json(&read_input(&path)?)?,
                None => {
                    let metrics = HealthMetrics {
                        today_steps,
                        today_sleep_hours: night_sleep_hours,
                        ..HealthMetrics::new(
                            steps.unwrap_or_default(),
                            sleep_hours.unwrap_or_default(),
                            heart_rate.unwrap_or_default(),
                        )
                    };
                    metrics.validate()?;
                    metrics
                }
            };
            emit(&metrics, DataOrigin::Live, &config, &output.format)
        }

        Commands::Aggregate {
            input,
            now,
            offline,
            output,
        } => cmd_aggregate(&input, now.as_deref(), offline, config, &output.format),

        Commands::Demo { output } => emit(&demo_metrics(), DataOrigin::Demo, &config, &output.format),
    }
}

fn resolve_config(args: &PresentationArgs) -> Result<PresentationConfig, WellnessCliError> {
    let mut config = PresentationConfig::from_env()?;
    if let Some(hours) = args.target_sleep_hours {
        config.target_sleep_hours = hours;
    }
    if let Some(minutes) = args.sleep_alert_minutes {
        config.sleep_alert_minutes = minutes;
    }
    if let Some(steps) = args.exercise_goal_steps {
        config.exercise_goal_steps = steps;
    }
    config.validate()?;
    Ok(config)
}

fn cmd_aggregate(
    input: &Path,
    now: Option<&str>,
    offline: bool,
    config: PresentationConfig,
    format: &OutputFormat,
) -> Result<(), WellnessCliError> {
    let now = match now {
        Some(raw) => DateTime::parse_from_rfc3339(raw)
            .map(|t| t.with_timezone(&Utc))
            .map_err(|e| ScoreError::InvalidTimestamp(format!("{raw}: {e}")))?,
        None => Utc::now(),
    };

    let live = LiveSource::from_json(&read_input(input)?, now)?;
    debug!(
        steps = live.records().steps.len(),
        sleep_sessions = live.records().sleep_sessions.len(),
        heart_rate_samples = live.records().heart_rate.len(),
        "loaded health records"
    );

    let source = select_source(Capability::from_granted(!offline), Some(live));
    let mut store = DashboardStore::new(config);
    let state = store.refresh(source.as_ref());

    let view = state.view.as_ref().ok_or(WellnessCliError::NoState)?;
    write_report(&ReportEncoder::new().encode(view), format)
}

fn emit(
    metrics: &HealthMetrics,
    origin: DataOrigin,
    config: &PresentationConfig,
    format: &OutputFormat,
) -> Result<(), WellnessCliError> {
    let view = score_and_build(metrics, origin, config);
    write_report(&ReportEncoder::new().encode(&view), format)
}

fn read_input(path: &Path) -> Result<String, WellnessCliError> {
    if path.to_string_lossy() == "-" {
        if atty::is(atty::Stream::Stdin) {
            return Err(WellnessCliError::InteractiveStdin);
        }
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        Ok(buffer)
    } else {
        Ok(fs::read_to_string(path)?)
    }
}

fn write_report(report: &ScoreReport, format: &OutputFormat) -> Result<(), WellnessCliError> {
    let output = match format {
        OutputFormat::Text => format_text(report),
        OutputFormat::Json => serde_json::to_string(report)?,
        OutputFormat::JsonPretty => serde_json::to_string_pretty(report)?,
    };
    println!("{output}");
    Ok(())
}

fn format_text(report: &ScoreReport) -> String {
    let score = &report.score;
    let p = &report.presentation;
    let mut lines = vec![
        format!(
            "Wellness score: {}/100 ({} data)",
            score.total_score,
            report.origin.as_str()
        ),
        format!("  exercise    {:>2}  {}", score.exercise_score, p.exercise_status),
        format!(
            "  sleep       {:>2}  {} ({} min short of target)",
            score.sleep_score, p.sleep_status, p.sleep_deficit_minutes
        ),
    ];
    if p.has_heart_rate_data {
        lines.push(format!(
            "  heart rate  {:>2}  {}",
            score.heart_rate_score, p.heart_rate_status
        ));
    } else {
        lines.push(format!("  heart rate  {:>2}  no data", score.heart_rate_score));
    }
    if p.show_sleep_alert {
        lines.push(format!(
            "Sleep alert: {} minutes short of the nightly target",
            p.sleep_deficit_minutes
        ));
    }
    if p.per_night_sleep_estimated {
        lines.push(format!(
            "Note: nightly sleep {:.1} h estimated from the weekly total",
            p.per_night_sleep_hours
        ));
    }
    lines.join("\n")
}

#[derive(Debug)]
enum WellnessCliError {
    Io(io::Error),
    Score(ScoreError),
    Json(serde_json::Error),
    InteractiveStdin,
    NoState,
}

impl From<io::Error> for WellnessCliError {
    fn from(e: io::Error) -> Self {
        WellnessCliError::Io(e)
    }
}

impl From<ScoreError> for WellnessCliError {
    fn from(e: ScoreError) -> Self {
        WellnessCliError::Score(e)
    }
}

impl From<serde_json::Error> for WellnessCliError {
    fn from(e: serde_json::Error) -> Self {
        WellnessCliError::Json(e)
    }
}

#[derive(serde::Serialize)]
struct CliError {
    code: String,
    message: String,
    hint: Option<String>,
}

impl From<WellnessCliError> for CliError {
    fn from(e: WellnessCliError) -> Self {
        match e {
            WellnessCliError::Io(e) => CliError {
                code: "IO_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check file paths and permissions".to_string()),
            },
            WellnessCliError::Score(ScoreError::Config(msg)) => CliError {
                code: "CONFIG_ERROR".to_string(),
                message: msg,
                hint: Some("Check WELLNESS_* environment variables and flags".to_string()),
            },
            WellnessCliError::Score(e) => CliError {
                code: "INPUT_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Ensure input matches the metrics or record set format".to_string()),
            },
            WellnessCliError::Json(e) => CliError {
                code: "JSON_ERROR".to_string(),
                message: e.to_string(),
                hint: None,
            },
            WellnessCliError::InteractiveStdin => CliError {
                code: "NO_INPUT".to_string(),
                message: "stdin is a terminal".to_string(),
                hint: Some("Pipe a JSON document or pass --input <file>".to_string()),
            },
            WellnessCliError::NoState => CliError {
                code: "NO_STATE".to_string(),
                message: "No dashboard state was published".to_string(),
                hint: None,
            },
        }
    }
}

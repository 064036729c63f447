//! Bridge Cadence Core - refresh-interval recommendation CLI
//!
//! The main entry point for bc-core, handling:
//! - Batch analysis of bridge-opening events
//! - Real-time urgency scoring
//! - Configuration inspection and validation

use std::path::PathBuf;

use bc_common::{OutputFormat, RunId, SCHEMA_VERSION};
use bc_config::{load_config, ConfigError, LoadedConfig};
use bc_core::decision::RecommendationMethod;
use bc_core::exit_codes::ExitCode;
use bc_core::input::read_events;
use bc_core::logging::{event_names, init_logging, LogConfig, LogFormat, LogLevel, Stage};
use bc_core::service::{AnalysisService, RealTimeAnalysis, ServiceRun};
use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};

/// Bridge Cadence Core - how often to refresh bridge-opening data
#[derive(Parser)]
#[command(name = "bc-core")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    global: GlobalOpts,
}

/// Global options available to all commands
#[derive(Args, Debug)]
struct GlobalOpts {
    /// Path to analysis config file (overrides env and XDG lookup)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "json")]
    format: OutputFormat,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Decrease verbosity (quiet mode)
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Log format on stderr (human or jsonl)
    #[arg(long, global = true)]
    log_format: Option<LogFormat>,
}

#[derive(Subcommand)]
enum Commands {
    /// Recommend a refresh interval for a batch of events
    Analyze(AnalyzeArgs),

    /// Recommendation plus open/recent counts and an urgency score
    Realtime(AnalyzeArgs),

    /// Configuration management
    Config(ConfigArgs),
}

#[derive(Args, Debug)]
struct AnalyzeArgs {
    /// JSON array of events; `-` reads stdin
    #[arg(long, short = 'e', default_value = "-")]
    events: PathBuf,

    /// Evaluate freshness and recent activity as of this RFC 3339 instant
    #[arg(long)]
    now: Option<DateTime<Utc>>,
}

#[derive(Args, Debug)]
struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommands,
}

#[derive(Subcommand, Debug)]
enum ConfigCommands {
    /// Print the effective configuration and where it came from
    Show,
    /// Validate the configuration and exit
    Validate,
}

fn main() -> std::process::ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // --help and --version also arrive here, on stdout.
            let code = if e.use_stderr() {
                ExitCode::ArgsError
            } else {
                ExitCode::Clean
            };
            let _ = e.print();
            return code.into();
        }
    };

    let cli_level = if cli.global.quiet {
        Some(LogLevel::Error)
    } else {
        match cli.global.verbose {
            0 => None,
            1 => Some(LogLevel::Info),
            2 => Some(LogLevel::Debug),
            _ => Some(LogLevel::Trace),
        }
    };
    init_logging(&LogConfig::from_env(cli_level, cli.global.log_format));

    let exit_code = match &cli.command {
        Commands::Analyze(args) => run_analyze(&cli.global, args),
        Commands::Realtime(args) => run_realtime(&cli.global, args),
        Commands::Config(args) => run_config(&cli.global, args),
    };
    exit_code.into()
}

fn load(global: &GlobalOpts) -> Result<LoadedConfig, ExitCode> {
    load_config(global.config.as_deref()).map_err(|e| output_config_error(global, &e))
}

fn build_service(global: &GlobalOpts) -> Result<(LoadedConfig, AnalysisService), ExitCode> {
    let loaded = load(global)?;
    let service = AnalysisService::new(loaded.config.clone())
        .map_err(|e| output_config_error(global, &ConfigError::ValidationError(e)))?;
    Ok((loaded, service))
}

fn run_analyze(global: &GlobalOpts, args: &AnalyzeArgs) -> ExitCode {
    let (loaded, service) = match build_service(global) {
        Ok(v) => v,
        Err(code) => return code,
    };
    let events = match read_events(&args.events) {
        Ok(events) => events,
        Err(e) => return output_error(global, &e),
    };
    tracing::info!(
        event = event_names::INGEST_LOADED,
        stage = %Stage::Ingest,
        events = events.len(),
        "events loaded"
    );

    let run_id = RunId::new();
    let now = args.now.unwrap_or_else(Utc::now);
    let run = service.run(&events, now);
    let exit_code = outcome_code(&run);

    match global.format {
        OutputFormat::Json => {
            let response = serde_json::json!({
                "schema_version": SCHEMA_VERSION,
                "run_id": run_id.0,
                "generated_at": now.to_rfc3339(),
                "config": loaded.snapshot,
                "truncated_events": run.truncated,
                "state": *run.state,
                "report": run.report,
            });
            match print_json(&response) {
                ExitCode::Clean => exit_code,
                other => other,
            }
        }
        OutputFormat::Summary => {
            println!("[{}] {}", run_id, summary_line(&run));
            exit_code
        }
    }
}

fn run_realtime(global: &GlobalOpts, args: &AnalyzeArgs) -> ExitCode {
    let (_, service) = match build_service(global) {
        Ok(v) => v,
        Err(code) => return code,
    };
    let events = match read_events(&args.events) {
        Ok(events) => events,
        Err(e) => return output_error(global, &e),
    };

    let run_id = RunId::new();
    let now = args.now.unwrap_or_else(Utc::now);
    let rt: RealTimeAnalysis = service.perform_real_time_analysis_at(&events, now);
    let state = service.current_state();
    let exit_code = if rt.recommendation.method == RecommendationMethod::InsufficientData {
        ExitCode::InsufficientData
    } else {
        ExitCode::Clean
    };

    match global.format {
        OutputFormat::Json => {
            let response = serde_json::json!({
                "schema_version": SCHEMA_VERSION,
                "run_id": run_id.0,
                "generated_at": now.to_rfc3339(),
                "state": *state,
                "realtime": rt,
            });
            match print_json(&response) {
                ExitCode::Clean => exit_code,
                other => other,
            }
        }
        OutputFormat::Summary => {
            println!(
                "[{}] refresh every {:.0}s, urgency {:.2} ({} open, {} recent)",
                run_id,
                rt.recommendation.interval_secs,
                rt.urgency_score,
                rt.open_count,
                rt.recent_activity_count
            );
            exit_code
        }
    }
}

fn run_config(global: &GlobalOpts, args: &ConfigArgs) -> ExitCode {
    let loaded = match load(global) {
        Ok(l) => l,
        Err(code) => return code,
    };
    match args.command {
        ConfigCommands::Show => match global.format {
            OutputFormat::Json => print_json(&serde_json::json!({
                "schema_version": SCHEMA_VERSION,
                "snapshot": loaded.snapshot,
                "config": loaded.config,
            })),
            OutputFormat::Summary => {
                println!(
                    "config source: {} ({})",
                    loaded.paths.analysis_source,
                    loaded
                        .snapshot
                        .config_path
                        .as_deref()
                        .unwrap_or("built-in defaults")
                );
                ExitCode::Clean
            }
        },
        ConfigCommands::Validate => match global.format {
            OutputFormat::Json => print_json(&serde_json::json!({
                "schema_version": SCHEMA_VERSION,
                "status": "valid",
                "config_source": loaded.paths.analysis_source.to_string(),
                "config_hash": loaded.snapshot.config_hash,
            })),
            OutputFormat::Summary => {
                println!("config valid");
                ExitCode::Clean
            }
        },
    }
}

fn outcome_code(run: &ServiceRun) -> ExitCode {
    if run.report.is_insufficient() {
        ExitCode::InsufficientData
    } else {
        ExitCode::Clean
    }
}

fn summary_line(run: &ServiceRun) -> String {
    let rec = &run.report.recommendation;
    format!(
        "refresh every {:.0}s (confidence {:.2}, {}) freshness={} stability={}",
        rec.interval_secs,
        rec.confidence,
        rec.method,
        to_snake(&run.state.data_freshness),
        to_snake(&run.state.pattern_stability),
    )
}

fn to_snake<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_value(value)
        .ok()
        .and_then(|v| v.as_str().map(str::to_string))
        .unwrap_or_default()
}

fn print_json(value: &serde_json::Value) -> ExitCode {
    match serde_json::to_string_pretty(value) {
        Ok(s) => {
            println!("{}", s);
            ExitCode::Clean
        }
        Err(e) => {
            eprintln!("failed to serialize output: {}", e);
            ExitCode::InternalError
        }
    }
}

fn output_error(global: &GlobalOpts, error: &bc_common::Error) -> ExitCode {
    let exit_code = ExitCode::for_error(error);
    match global.format {
        OutputFormat::Json => {
            let response = serde_json::json!({
                "schema_version": SCHEMA_VERSION,
                "status": "error",
                "error": {
                    "code": error.code(),
                    "category": error.category(),
                    "message": error.to_string(),
                    "recoverable": error.is_recoverable(),
                    "remediation": error.remediation(),
                }
            });
            if let Ok(s) = serde_json::to_string_pretty(&response) {
                eprintln!("{}", s);
            }
        }
        OutputFormat::Summary => eprintln!("error: {}", error),
    }
    exit_code
}

/// Output a config error in the appropriate format.
fn output_config_error(global: &GlobalOpts, error: &ConfigError) -> ExitCode {
    let (error_code, exit_code) = match error {
        ConfigError::NotFound { .. } => (10, ExitCode::ConfigError),
        ConfigError::ParseError { .. } => (11, ExitCode::ConfigError),
        ConfigError::ValidationError(v) => (v.code(), ExitCode::ConfigError),
        ConfigError::IoError { .. } => (60, ExitCode::IoError),
    };
    tracing::error!(
        event = event_names::CONFIG_ERROR,
        stage = %Stage::Init,
        code = error_code,
        "{}",
        error
    );

    match global.format {
        OutputFormat::Json => {
            let response = serde_json::json!({
                "schema_version": SCHEMA_VERSION,
                "status": "error",
                "error": {
                    "code": error_code,
                    "message": error.to_string(),
                }
            });
            if let Ok(s) = serde_json::to_string_pretty(&response) {
                eprintln!("{}", s);
            }
        }
        OutputFormat::Summary => eprintln!("config error: {}", error),
    }
    exit_code
}

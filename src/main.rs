//! Volume Capacity Scorer
//!
//! Scores the candidate nodes of a pod offline, from a snapshot of the
//! volumes it would bind or provision on each node, using the same scoring
//! the volume binding plugin applies during scheduling.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use tracing::{error, info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use volume_capacity_scorer::{
    Error, NodeScore, Result, ScoringSnapshot, VolumeBindingArgs, VolumeBindingScore,
};

// =============================================================================
// CLI Arguments
// =============================================================================

/// Output format for node scores
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

/// Volume Capacity Scorer - capacity-aware node scoring for volume binding
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Volume binding args file (YAML); defaults apply when omitted
    #[arg(long, env = "SCORER_CONFIG")]
    config: Option<PathBuf>,

    /// Scoring snapshot describing candidate nodes (YAML or JSON)
    #[arg(long, env = "SCORER_INPUT")]
    input: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value = "table")]
    output: OutputFormat,

    /// Print the JSON schema of the args file and exit
    #[arg(long)]
    print_config_schema: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Output logs as JSON
    #[arg(long, env = "LOG_JSON")]
    log_json: bool,
}

// =============================================================================
// Main
// =============================================================================

fn main() -> Result<()> {
    let args = Args::parse();

    if args.print_config_schema {
        println!("{}", VolumeBindingArgs::json_schema()?);
        return Ok(());
    }

    init_logging(&args);

    info!("Starting Volume Capacity Scorer v{}", volume_capacity_scorer::VERSION);

    if let Err(e) = run(&args) {
        if e.is_configuration() {
            error!("Invalid configuration: {}", e);
        } else {
            error!("Scoring failed: {}", e);
        }
        return Err(e);
    }

    Ok(())
}

fn run(args: &Args) -> Result<()> {
    let binding_args = match &args.config {
        Some(path) => VolumeBindingArgs::from_file(path)?,
        None => VolumeBindingArgs::default(),
    };
    let plugin = VolumeBindingScore::from_args(&binding_args)?;

    let input = args
        .input
        .as_ref()
        .ok_or_else(|| Error::Configuration("--input is required".into()))?;
    let snapshot = ScoringSnapshot::from_file(input)?;
    let nodes = snapshot.resolve()?;
    info!("Scoring {} candidate nodes", nodes.len());

    let scores = plugin.score_nodes(nodes.iter().map(|(name, volumes)| (name.as_str(), volumes)));
    print_scores(&scores, args.output)?;

    Ok(())
}

// =============================================================================
// Output
// =============================================================================

fn print_scores(scores: &[NodeScore], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(scores)?);
        }
        OutputFormat::Table => {
            let width = scores
                .iter()
                .map(|s| s.node.len())
                .max()
                .unwrap_or(0)
                .max("NODE".len());
            println!("{:<width$}  SCORE", "NODE", width = width);
            for score in scores {
                println!("{:<width$}  {}", score.node, score.score, width = width);
            }
        }
    }
    Ok(())
}

// =============================================================================
// Logging Setup
// =============================================================================

fn init_logging(args: &Args) {
    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    // Logs go to stderr so scores on stdout stay machine readable
    if args.log_json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .init();
    }
}

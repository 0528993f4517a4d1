use clap::Parser;
use financial_health_score::{EngineConfig, HealthScoreEngine, Mode};
use std::io::Read;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Compute a Financial Health Score from a snapshot JSON document.
#[derive(Debug, Parser)]
#[command(name = "health-score", version)]
struct Cli {
    /// Snapshot file, or `-` to read stdin
    snapshot: PathBuf,

    /// Reject incomplete snapshots instead of using neutral defaults
    #[arg(long)]
    strict: bool,

    /// Print the condensed snapshot summary instead of the score
    #[arg(long)]
    summary: bool,

    /// Single-line JSON output
    #[arg(long)]
    compact: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables
    dotenv::dotenv().ok();

    // Logs go to stderr so stdout stays valid JSON
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = EngineConfig::from_env()?;
    if cli.strict {
        config.mode = Mode::Strict;
    }

    info!(
        snapshot = %cli.snapshot.display(),
        mode = %config.mode,
        max_per_account = ?config.window.max_per_account,
        lookback_days = ?config.window.lookback_days,
        "Financial health score starting"
    );

    let text = if cli.snapshot.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        std::fs::read_to_string(&cli.snapshot)?
    };
    let raw: serde_json::Value = serde_json::from_str(&text)?;

    let engine = HealthScoreEngine::new(config);

    let output = if cli.summary {
        serde_json::to_value(engine.summarize(&raw)?)?
    } else {
        match engine.score(&raw) {
            Ok(report) => serde_json::to_value(report)?,
            Err(e) => {
                eprintln!("Scoring failed: {}", e);
                return Err(e.into());
            }
        }
    };

    let rendered = if cli.compact {
        serde_json::to_string(&output)?
    } else {
        serde_json::to_string_pretty(&output)?
    };
    println!("{}", rendered);

    Ok(())
}

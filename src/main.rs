use std::fs;

use anyhow::{Context, Result};
use tracing::info;

use oche::config::{OutputFormat, ReplayConfig};
use oche::dto::leg_log::LegLog;
use oche::{init_tracing, load_dotenv};

fn main() -> Result<()> {
    load_dotenv();
    init_tracing();

    let config = ReplayConfig::from_env_and_args(std::env::args().skip(1))?;
    info!("Replaying leg log {}", config.leg_log_path.display());

    let raw = fs::read_to_string(&config.leg_log_path)
        .with_context(|| format!("failed to read {}", config.leg_log_path.display()))?;
    let log: LegLog = serde_json::from_str(&raw).context("leg log is not valid JSON")?;

    let report = log.report().context("leg log could not be replayed")?;

    let rendered = match config.output {
        OutputFormat::Pretty => serde_json::to_string_pretty(&report)?,
        OutputFormat::Compact => serde_json::to_string(&report)?,
    };
    println!("{rendered}");
    Ok(())
}

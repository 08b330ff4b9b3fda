mod cli;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use chrono::{Local, NaiveTime, TimeZone, Utc};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::Cli;
use content_analyser::aggregator::{beginning_of_year, Aggregator};
use content_analyser::config::Config;
use content_analyser::http::ReqwestTransport;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("content_analyser=info")),
        )
        .init();

    let cli = Cli::parse();
    let mut config = Config::load(cli.config.as_deref()).context("loading configuration")?;
    if let Some(dir) = cli.output_dir {
        config.output_dir = Some(dir);
    }

    let transport = ReqwestTransport::new(Duration::from_secs(config.request_timeout_secs))
        .context("building HTTP client")?;
    let mut aggregator = Aggregator::from_config(&config, Arc::new(transport))
        .context("building producer registry")?;
    if !cli.only.is_empty() {
        aggregator.retain_named(&cli.only)?;
    }

    if cli.list {
        for name in aggregator.producer_names() {
            println!("{name}");
        }
        return Ok(());
    }

    let cutoff = match cli.since {
        Some(date) => Local
            .from_local_datetime(&date.and_time(NaiveTime::MIN))
            .earliest()
            .map(|at| at.with_timezone(&Utc))
            .with_context(|| format!("{date} has no local midnight"))?,
        None => beginning_of_year(&Local::now()),
    };

    let summary = aggregator
        .run_with_cutoff(cutoff)
        .await
        .with_context(|| format!("writing reports to {}", aggregator.output_dir().display()))?;

    for path in &summary.written {
        println!("{}", path.display());
    }
    if !summary.is_complete() {
        for failure in &summary.failed {
            eprintln!("{}: {}", failure.producer, failure.error);
        }
        bail!("{} of {} producers failed", summary.failed.len(), summary.failed.len() + summary.written.len());
    }
    Ok(())
}

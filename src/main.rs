//! athena-frames - run Athena datasource queries from the command line.

mod cli;

use anyhow::{Context, Result};
use athena_frames::config::Config;
use athena_frames::datasource::{Datasource, HealthStatus};
use athena_frames::error::FramesError;
use athena_frames::logging;
use athena_frames::query::QueryDescriptor;
use athena_frames::transport::{HttpTransport, HttpTransportConfig};
use cli::{Cli, Command};
use serde::Serialize;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    let cli = Cli::parse_args();

    match &cli.log_file {
        Some(path) => logging::init_file_logging(path),
        None => logging::init_stderr_logging(),
    }

    match run(cli).await {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            match e.downcast_ref::<FramesError>() {
                Some(frames_err) => error!("{}: {:#}", frames_err.category(), e),
                None => error!("{:#}", e),
            }
            std::process::exit(1);
        }
    }
}

async fn run(cli: Cli) -> Result<i32> {
    let config_path = cli.config_path();
    info!("Loading config from: {}", config_path.display());
    let mut config = Config::load_from_file(&config_path)?;
    config.apply_env_defaults();
    cli.apply_overrides(&mut config);
    config.settings.validate()?;
    info!("Datasource: {}", config.settings.display_string());

    let base_url = config.endpoint.base_url()?;
    let transport = HttpTransport::new(
        HttpTransportConfig::new(base_url.as_str()).with_timeout(config.endpoint.timeout_secs),
    )?;
    let datasource = Datasource::new(Arc::new(transport), config.endpoint.datasource_id()?);

    match &cli.command {
        Command::Query { queries, .. } => {
            let content = std::fs::read_to_string(queries)
                .with_context(|| format!("Failed to read {}", queries.display()))?;
            let descriptors: Vec<QueryDescriptor> = serde_json::from_str(&content)
                .with_context(|| format!("Invalid query descriptors in {}", queries.display()))?;
            let range = cli
                .command
                .time_range()
                .context("query command without a time range")?;

            let cancel = CancellationToken::new();
            let on_interrupt = cancel.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    on_interrupt.cancel();
                }
            });

            let frames = datasource
                .query_with_cancel(&descriptors, &range, &cancel)
                .await?;
            print_json(&frames)?;
            Ok(0)
        }
        Command::NamedQueries => {
            let options = datasource.list_named_queries().await?;
            print_json(&options)?;
            Ok(0)
        }
        Command::Health => {
            let health = datasource.check_health().await;
            print_json(&health)?;
            Ok(if health.status == HealthStatus::Success { 0 } else { 1 })
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

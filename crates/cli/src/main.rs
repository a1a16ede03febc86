//! taskman - command-line client for the task REST API
//!
//! Wires the HTTP gateway and task store together and maps each subcommand
//! onto a store or form operation.

mod commands;

use clap::Parser;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use taskman_core::gateway::HttpTaskGateway;
use taskman_core::store::TaskStore;
use taskman_core::GatewayConfig;

use crate::commands::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "taskman=info,taskman_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let env_config = GatewayConfig::from_env();
    let config = match &cli.api_base {
        Some(base) => GatewayConfig::new(base.as_str()).with_no_proxy(env_config.no_proxy),
        None => env_config,
    };

    let gateway = HttpTaskGateway::new(config)?;
    tracing::info!("Using task API at {}", gateway.base_url());

    let store = TaskStore::new(Arc::new(gateway));
    commands::run(cli.command, &store).await
}

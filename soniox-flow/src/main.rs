#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

mod args;
mod io;

use anyhow::Context as _;
use args::{Args, Command, RunArgs};
use clap::Parser;
use soniox_client::SonioxClient;
use soniox_config::Config;
use soniox_node::NodeContext;
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Load configuration
    let config = Config::load(&args.config)?;

    // Initialize logging
    soniox_telemetry::init(config.telemetry.as_ref(), args.log_filter.as_deref())?;

    tracing::debug!(config_path = %args.config.display(), "starting soniox-flow");

    let client = SonioxClient::from_config(&config).context("failed to build Soniox client")?;

    match args.command {
        Command::Run(run_args) => run(&client, run_args).await,
        Command::TestCredentials => test_credentials(&client).await,
    }
}

async fn run(client: &SonioxClient, args: RunArgs) -> anyhow::Result<()> {
    let items = io::read_items(&args.input).await?;
    let defaults = io::read_parameters(args.parameters.as_deref()).await?;

    tracing::info!(items = items.len(), input = %args.input.display(), "starting batch");

    // Cancel any in-progress wait on shutdown
    let cancel = CancellationToken::new();
    let cancel_clone = cancel.clone();

    tokio::spawn(async move {
        shutdown_signal().await;
        cancel_clone.cancel();
    });

    let context = NodeContext {
        api: client,
        defaults,
        continue_on_fail: args.continue_on_fail,
        cancel,
    };

    let result = context.execute_batch(&items).await.map_err(|failure| {
        let description = failure.error.description().map(str::to_owned);
        let error = anyhow::Error::new(failure);
        match description {
            Some(description) => error.context(description),
            None => error,
        }
    })?;

    io::write_items(args.output.as_deref(), &result.items).await?;

    if result.aborted {
        anyhow::bail!(
            "execution cancelled after {} of {} items",
            result.items.len(),
            items.len()
        );
    }

    Ok(())
}

async fn test_credentials(client: &SonioxClient) -> anyhow::Result<()> {
    match client.test_credentials().await {
        Ok(()) => {
            tracing::info!(base_url = %client.base_url(), "credentials accepted");
            Ok(())
        }
        Err(e) => {
            let hint = e.hint().map(str::to_owned);
            let error = anyhow::Error::new(e).context("credential test failed");
            Err(match hint {
                Some(hint) => error.context(hint),
                None => error,
            })
        }
    }
}

/// Wait for a shutdown signal (`SIGINT` or `SIGTERM`)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }

    tracing::info!("shutdown signal received");
}

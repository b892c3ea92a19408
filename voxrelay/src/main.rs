#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

mod args;

use anyhow::Context;
use args::Args;
use clap::Parser;
use tokio_util::sync::CancellationToken;
use voxrelay_config::Config;
use voxrelay_server::Server;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is not an error
    let dotenv = dotenvy::dotenv();

    let args = Args::parse();

    // Load configuration
    let mut config = match args.config {
        Some(ref path) => Config::load(path)?,
        None => Config::load_default().context("set OPENAI_API_KEY or pass --config")?,
    };

    if let Some(listen) = args.listen {
        config.server.listen_address = Some(listen);
    }

    // Initialize telemetry
    let telemetry = voxrelay_telemetry::init(config.telemetry.as_ref(), &args.log_filter)?;

    if let Ok(ref path) = dotenv {
        tracing::debug!(path = %path.display(), "loaded environment file");
    }

    tracing::info!(
        config_path = %args.config.as_ref().map_or_else(|| "<built-in>".into(), |p| p.display().to_string()),
        stt_model = %config.stt.model,
        llm_model = %config.llm.model,
        "starting voxrelay"
    );

    // Build server
    let server = Server::new(&config);

    // Set up graceful shutdown
    let shutdown = CancellationToken::new();
    let shutdown_clone = shutdown.clone();

    tokio::spawn(async move {
        shutdown_signal().await;
        shutdown_clone.cancel();
    });

    // Run server
    server.serve(shutdown).await?;

    if let Err(e) = telemetry.force_flush() {
        tracing::warn!("{e}");
    }

    tracing::info!("voxrelay stopped");
    Ok(())
}

/// Wait for a shutdown signal (`SIGINT` or `SIGTERM`)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to listen for Ctrl+C: {e}");
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
                tracing::error!("failed to install SIGTERM handler: {e}");
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

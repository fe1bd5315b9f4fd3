mod cli;
mod error;
mod server;

use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use meraki_core::{Collector, CoreError, ExporterMetrics, run_periodic};

use crate::cli::Cli;
use crate::error::ExporterError;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_tracing(cli.verbose, cli.log_json);

    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8, json: bool) {
    let filter = match verbosity {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

async fn run(cli: Cli) -> Result<(), ExporterError> {
    let settings = meraki_config::load_settings(cli.config.as_deref(), &cli.overrides())?;
    let collector_config = settings.to_collector_config()?;
    let addr = settings.listen_addr()?;

    info!(version = env!("CARGO_PKG_VERSION"), "starting meraki-exporter");

    let missing = collector_config.missing_settings();
    if !missing.is_empty() {
        warn!(
            ?missing,
            "MERAKI_ORG_ID and MERAKI_API_KEY are not both set; collection cycles will be skipped"
        );
    }

    let interval = collector_config.interval;
    let metrics = Arc::new(ExporterMetrics::new().map_err(CoreError::from)?);
    let collector = Arc::new(Collector::new(collector_config, Arc::clone(&metrics))?);

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| ExporterError::Bind { addr, source })?;
    info!(%addr, interval_secs = interval.as_secs(), "serving metrics on http://{addr}/metrics");

    let cancel = CancellationToken::new();
    let poller = tokio::spawn(run_periodic(collector, interval, cancel.clone()));

    axum::serve(listener, server::router(metrics))
        .with_graceful_shutdown(shutdown_signal(cancel.clone()))
        .await
        .map_err(ExporterError::Serve)?;

    // The server can also stop on its own; make sure the poller follows.
    cancel.cancel();
    if let Err(e) = poller.await {
        warn!(error = %e, "collection task ended abnormally");
    }

    info!("meraki-exporter stopped");
    Ok(())
}

/// Resolve on Ctrl-C or SIGTERM and cancel background collection.
async fn shutdown_signal(cancel: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    info!("shutdown signal received; finishing in-flight collection");
    cancel.cancel();
}

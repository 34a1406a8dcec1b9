mod cli;
mod error;
mod http;

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tokio::sync::watch;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use unifi_exporter_config::{Config, LogFormat, LogSection, load_config};
use unifi_exporter_core::{
    ControllerSource, DeviceCollector, Exporter, ResourceClient, select_sites, sites_string,
};

use crate::cli::Cli;
use crate::error::CliError;
use crate::http::HttpServer;

/// Grace period for in-flight scrapes once shutdown starts.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn init_tracing(log: &LogSection, verbosity: u8) -> Result<(), CliError> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => {
            let directive = match verbosity {
                0 => log.level.as_str(),
                1 => "debug",
                _ => "trace",
            };
            EnvFilter::try_new(directive).map_err(|e| CliError::Validation {
                field: "log.level".into(),
                reason: e.to_string(),
            })?
        }
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    match log.format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Text => builder.with_target(false).init(),
    }
    Ok(())
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let mut config = load_config(cli.config.as_deref())?;
    cli.apply(&mut config);
    config.validate()?;

    if cli.print_config {
        print!("{}", config.to_redacted_toml()?);
        return Ok(());
    }

    init_tracing(&config.log, cli.verbose)?;
    serve(config).await
}

async fn serve(config: Config) -> Result<(), CliError> {
    let controller = config.controller_config()?;
    info!(url = %controller.url, "Starting UniFi exporter");

    let source = ControllerSource::connect(&controller)
        .await
        .map_err(|e| CliError::from_source(e, &controller))?;
    let source = Arc::new(source);
    debug!(platform = ?source.platform(), "logged in to controller");

    let all_sites = source
        .sites()
        .await
        .map_err(|e| CliError::from_source(e, &controller))?;
    let available = sites_string(&all_sites);
    let sites = select_sites(&config.controller.site, all_sites)
        .map_err(|e| CliError::from_select(&e, available))?;
    info!(sites = %sites_string(&sites), "monitoring sites");

    let namespace = config.namespace();
    let collector = DeviceCollector::new(&namespace, Arc::clone(&source), sites)
        .with_fetch_timeout(config.fetch_timeout());
    let exporter = Arc::new(Exporter::new(&namespace).with_collector(Box::new(collector)));

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let server = HttpServer::new(exporter, config.listen, config.metrics_path);
    let mut server_task = tokio::spawn(server.run(shutdown_rx));

    let early_exit = tokio::select! {
        joined = &mut server_task => Some(joined),
        () = shutdown_signal() => None,
    };

    let outcome = if let Some(joined) = early_exit {
        joined.map_err(|e| CliError::Server(e.to_string()))?
    } else {
        if shutdown_tx.send(true).is_err() {
            debug!("HTTP server already gone");
        }
        match tokio::time::timeout(SHUTDOWN_GRACE, server_task).await {
            Ok(joined) => joined.map_err(|e| CliError::Server(e.to_string()))?,
            Err(_) => {
                warn!("HTTP server did not stop within {}s", SHUTDOWN_GRACE.as_secs());
                Ok(())
            }
        }
    };

    source.logout().await;
    info!("Exporter stopped");
    outcome
}

/// Resolve on Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "cannot listen for Ctrl+C");
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
                warn!(error = %e, "cannot listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("Received Ctrl+C, shutting down"),
        () = terminate => info!("Received SIGTERM, shutting down"),
    }
}

mod cli;
mod error;
mod probe;

use std::path::Path;

use clap::Parser;
use secrecy::{ExposeSecret, SecretString};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use onair_core::{ActivityMachine, CoreError};

use crate::cli::Cli;
use crate::error::CliError;
use crate::probe::HostProbe;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    let cancel = CancellationToken::new();
    spawn_shutdown_listener(cancel.clone());

    if let Err(err) = run(cli, &cancel).await {
        let code = err.exit_code();
        if code != error::exit_code::SUCCESS {
            eprintln!("{:?}", miette::Report::new(err));
        }
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();
}

async fn run(cli: Cli, cancel: &CancellationToken) -> Result<(), CliError> {
    let path = cli.config.unwrap_or_else(onair_config::config_path);

    let mut cfg = onair_config::load_config(&path).map_err(|e| CliError::config(e, &path))?;

    // CLI flags win over file and environment
    if let Some(light) = cli.light {
        cfg.light.name = Some(light);
    }
    if let Some(ms) = cli.interval_ms {
        cfg.poll_interval_ms = ms;
    }

    let app_key = onair_config::resolve_app_key(&cfg.bridge);
    let watch = cfg
        .to_watch_config(app_key)
        .map_err(|e| CliError::config(e, &path))?;
    let probe = HostProbe::from_config(&cfg.probe)?;

    let established = match onair_core::establish(&watch, cancel).await {
        Ok(established) => established,
        Err(CoreError::Cancelled) => {
            info!("interrupted during startup");
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    if let Some(ref key) = established.paired_key {
        persist_app_key(&path, key);
    }

    let mut machine = ActivityMachine::new(
        established.session,
        probe,
        established.light,
        watch.on_air,
        watch.poll_interval,
    );
    machine.run(cancel).await?;
    Ok(())
}

/// Save a freshly paired key. Failure is reported, never fatal.
fn persist_app_key(path: &Path, key: &SecretString) {
    warn!(
        app_key = %key.expose_secret(),
        "paired with bridge; keep this application key if it cannot be stored"
    );

    match onair_config::store_app_key(path, key) {
        Ok(storage) => info!(?storage, "application key saved"),
        Err(e) => error!(error = %e, "could not save application key"),
    }
}

/// Cancel `cancel` on Ctrl-C or SIGTERM.
fn spawn_shutdown_listener(cancel: CancellationToken) {
    tokio::spawn(async move {
        let ctrl_c = async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!(error = %e, "cannot listen for Ctrl-C");
                std::future::pending::<()>().await;
            }
        };

        #[cfg(unix)]
        let terminate = async {
            use tokio::signal::unix::{SignalKind, signal};
            match signal(SignalKind::terminate()) {
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
            () = ctrl_c => {}
            () = terminate => {}
        }

        info!("shutdown requested");
        cancel.cancel();
    });
}

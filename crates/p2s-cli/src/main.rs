use clap::Parser;
use log::LevelFilter;
use p2s_client::{HttpSlidesClient, SlidesApi, WorkflowDriver};
use std::sync::Arc;

mod args;
mod render;

use args::Cli;
use render::{ConsoleObserver, SessionSlot};

const EXIT_INTERRUPTED: i32 = 130;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_level_filter: LevelFilter = cli
        .log_level
        .parse::<LevelFilter>()
        .map_err(|_| anyhow::anyhow!("Invalid log level '{}'", cli.log_level))?;
    env_logger::Builder::new()
        .filter_level(log_level_filter)
        .parse_default_env()
        .init();

    let code = run(cli).await;
    std::process::exit(code);
}

async fn run(cli: Cli) -> i32 {
    let config = match cli.resolve_config().await {
        Ok(config) => config,
        Err(e) => {
            log::error!("Configuration rejected: {}", e);
            eprintln!("✗ {}", e);
            return e.exit_code();
        }
    };

    let client = match HttpSlidesClient::from_config(&config.api) {
        Ok(client) => Arc::new(client),
        Err(e) => {
            eprintln!("✗ {}", e);
            return e.exit_code();
        }
    };

    let observer = ConsoleObserver::new(Arc::clone(&client), &config);
    let session = observer.session_slot();
    let driver = WorkflowDriver::from_config(client.clone(), &config);

    observer.banner();

    tokio::select! {
        outcome = driver.run(&config.files, &observer) => match outcome {
            Ok(report) => {
                observer.summary(&report);
                0
            }
            Err(failure) => {
                log::error!("{}", failure);
                observer.failure(&failure);
                failure.error.exit_code()
            }
        },
        _ = shutdown_signal() => {
            observer.interrupted();
            match cancel_session(client.as_ref(), &session).await {
                CancelOutcome::Cancelled(session_id) => {
                    observer.warning(format!("Cancelled session {}", session_id))
                }
                CancelOutcome::Failed(session_id) => {
                    observer.warning(format!("Could not cancel session {}", session_id))
                }
                CancelOutcome::NoSession => {}
            }
            EXIT_INTERRUPTED
        }
    }
}

/// What the interrupt path did with the session of this run.
#[derive(Debug, Clone, PartialEq, Eq)]
enum CancelOutcome {
    NoSession,
    Cancelled(String),
    Failed(String),
}

/// Ask the service to stop a session started by this run, if any.
async fn cancel_session(api: &dyn SlidesApi, session: &SessionSlot) -> CancelOutcome {
    let session_id = session.lock().ok().and_then(|slot| slot.clone());
    let Some(session_id) = session_id else {
        log::info!("No session was started, nothing to cancel");
        return CancelOutcome::NoSession;
    };

    match api.cancel(&session_id).await {
        Ok(()) => CancelOutcome::Cancelled(session_id),
        Err(e) => {
            log::warn!("Failed to cancel session {}: {}", session_id, e);
            CancelOutcome::Failed(session_id)
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            log::warn!("Failed to install Ctrl+C handler: {}", e);
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
                log::warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            log::info!("Received Ctrl+C, stopping...");
        },
        _ = terminate => {
            log::info!("Received SIGTERM, stopping...");
        },
    }
}

//! `wallfetch run` – poll on a timer until SIGINT/SIGTERM.

use anyhow::{Context, Result};
use wallfetch_core::config::WallfetchConfig;
use wallfetch_core::daemon::Daemon;
use wallfetch_core::shutdown;

pub async fn run_daemon(cfg: &WallfetchConfig) -> Result<()> {
    let daemon = Daemon::from_config(cfg)?;
    let (trigger, listener) = shutdown::channel();
    let mut running = tokio::spawn(daemon.run(listener));

    tokio::select! {
        signal = wait_for_signal() => {
            signal?;
            tracing::info!("shutdown signal received");
        }
        finished = &mut running => {
            // Only returns early on a startup error.
            finished.context("scheduler task join")??;
            return Ok(());
        }
    }

    trigger.trigger();
    let cycles = running.await.context("scheduler task join")??;
    tracing::info!(cycles, "wallfetch exiting");
    println!("exiting");
    Ok(())
}

/// Resolves on SIGINT or SIGTERM (Ctrl-C elsewhere).
async fn wait_for_signal() -> Result<()> {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        let mut sigint = signal(SignalKind::interrupt()).context("register SIGINT handler")?;
        let mut sigterm = signal(SignalKind::terminate()).context("register SIGTERM handler")?;
        tokio::select! {
            _ = sigint.recv() => {}
            _ = sigterm.recv() => {}
        }
    }

    #[cfg(not(unix))]
    {
        tokio::signal::ctrl_c()
            .await
            .context("listen for ctrl_c")?;
    }

    Ok(())
}

use std::time::Duration;

use tokio::sync::broadcast;
use tokio::time::MissedTickBehavior;

use foldsync_engine::{run_pass, Journal, PassOutcome, SyncEndpoint};

use crate::error::{io_err, DaemonError};

/// Owns the periodic mirroring loop between a source and a replica.
///
/// Passes are strictly serialized: each tick's pass is awaited before the
/// next tick is observed, and interval ticks that fire while a pass is
/// still running are skipped rather than queued.
pub struct Scheduler {
    source: SyncEndpoint,
    replica: SyncEndpoint,
    journal: Journal,
    interval: Duration,
    shutdown: broadcast::Sender<()>,
    // Subscribed at construction so a stop sent before `run` is polled is
    // not lost.
    shutdown_rx: broadcast::Receiver<()>,
}

impl Scheduler {
    pub fn new(
        source: SyncEndpoint,
        replica: SyncEndpoint,
        journal: Journal,
        interval: Duration,
    ) -> Self {
        let (shutdown, shutdown_rx) = broadcast::channel(16);
        Self {
            source,
            replica,
            journal,
            interval,
            shutdown,
            shutdown_rx,
        }
    }

    /// Handle that stops the loop after the in-flight pass (if any)
    /// finishes.
    pub fn stop_handle(&self) -> StopHandle {
        StopHandle {
            shutdown: self.shutdown.clone(),
        }
    }

    /// Build a tokio runtime and drive the loop until ctrl-c.
    pub fn start_blocking(self) -> Result<(), DaemonError> {
        init_tracing();
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .map_err(|e| io_err("tokio-runtime", e))?;
        runtime.block_on(async {
            self.spawn_ctrl_c_task();
            self.run().await
        })
    }

    fn spawn_ctrl_c_task(&self) {
        let shutdown = self.shutdown.clone();
        tokio::spawn(async move {
            let mut shutdown_rx = shutdown.subscribe();
            tokio::select! {
                _ = shutdown_rx.recv() => {}
                signal = tokio::signal::ctrl_c() => {
                    match signal {
                        Ok(()) => {
                            tracing::info!("received ctrl-c, stopping scheduler");
                            let _ = shutdown.send(());
                        }
                        Err(err) => tracing::error!(error = %err, "ctrl-c handler failed"),
                    }
                }
            }
        });
    }

    /// Run the loop on the current runtime until a stop signal arrives.
    ///
    /// The interval's first tick fires immediately, which is the startup
    /// pass. The stop signal is only observed between passes, so shutdown
    /// is graceful: an in-flight pass always runs to completion and its
    /// journal lines are written before this returns.
    pub async fn run(mut self) -> Result<(), DaemonError> {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = self.shutdown_rx.recv() => break,
                _ = ticker.tick() => {
                    let source = self.source.clone();
                    let replica = self.replica.clone();
                    let journal = self.journal.clone();
                    let outcome = tokio::task::spawn_blocking(move || {
                        run_pass(&source, &replica, &journal)
                    })
                    .await
                    .map_err(|err| DaemonError::Task(format!("pass join error: {err}")))?;

                    match outcome {
                        PassOutcome::Completed => tracing::info!("pass completed"),
                        PassOutcome::Failed(reason) => {
                            tracing::warn!(%reason, "pass failed; retrying on next tick");
                        }
                    }
                }
            }
        }

        Ok(())
    }
}

/// Clonable stop trigger for a running [`Scheduler`].
#[derive(Debug, Clone)]
pub struct StopHandle {
    shutdown: broadcast::Sender<()>,
}

impl StopHandle {
    pub fn stop(&self) {
        let _ = self.shutdown.send(());
    }
}

fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt().with_env_filter(filter).with_target(false).try_init();
}

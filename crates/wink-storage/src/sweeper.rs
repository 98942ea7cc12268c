use jiff::Timestamp;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};
use wink_core::repository::{Repository, Result};

const MIN_INTERVAL: Duration = Duration::from_millis(1);

/// Periodically purges expired records from a repository.
pub struct Sweeper<R> {
    repository: R,
    interval: Duration,
}

impl<R: Repository> Sweeper<R> {
    pub fn new(repository: R, interval: Duration) -> Self {
        Self {
            repository,
            interval: interval.max(MIN_INTERVAL),
        }
    }

    /// Runs a single purge pass and returns the number of purged records.
    pub async fn sweep_once(&self) -> Result<usize> {
        let purged = self.repository.purge_expired(Timestamp::now()).await?;
        if purged > 0 {
            info!(purged, "purged expired short links");
        } else {
            debug!("sweep found nothing to purge");
        }
        Ok(purged)
    }

    /// Runs the sweeper in the background until `shutdown` flips to `true`
    /// or its sender is dropped.
    pub fn spawn(self, mut shutdown: watch::Receiver<bool>) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(self.interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        if let Err(e) = self.sweep_once().await {
                            warn!(error = %e, "sweep failed");
                        }
                    }
                    changed = shutdown.changed() => {
                        if changed.is_err() || *shutdown.borrow() {
                            debug!("sweeper stopped");
                            break;
                        }
                    }
                }
            }
        })
    }
}

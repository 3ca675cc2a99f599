//! Graceful shutdown handling.

use log::{info, warn};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Cancels `cancel` when the process receives Ctrl-C.
///
/// The scheduler finishes its current step, aggregates what it recorded and
/// returns. The returned task ends on its own once `cancel` fires for any
/// other reason.
pub fn cancel_on_ctrl_c(cancel: CancellationToken) -> JoinHandle<()> {
    tokio::spawn(async move {
        tokio::select! {
            _ = cancel.cancelled() => {}
            result = tokio::signal::ctrl_c() => {
                match result {
                    Ok(()) => info!("Interrupt received, stopping after the current probe"),
                    Err(e) => warn!("Failed to listen for Ctrl-C: {e}; stopping"),
                }
                cancel.cancel();
            }
        }
    })
}

/// Waits for the Ctrl-C watcher to end, logging a failed or panicked task.
pub async fn join_watcher(watcher: JoinHandle<()>) {
    if let Err(e) = watcher.await {
        warn!("Ctrl-C watcher task failed (this is non-critical): {e}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_watcher_exits_when_token_cancelled() {
        let cancel = CancellationToken::new();
        let watcher = cancel_on_ctrl_c(cancel.clone());
        cancel.cancel();
        tokio::time::timeout(Duration::from_secs(5), watcher)
            .await
            .expect("Watcher should exit after cancellation")
            .expect("Watcher task should not panic");
    }

    #[tokio::test]
    async fn test_join_watcher_absorbs_panicked_task() {
        let watcher: JoinHandle<()> = tokio::spawn(async { panic!("watcher blew up") });
        tokio::time::timeout(Duration::from_secs(5), join_watcher(watcher))
            .await
            .expect("Joining a panicked watcher should return");
    }

    #[tokio::test]
    async fn test_join_watcher_after_cancellation() {
        let cancel = CancellationToken::new();
        let watcher = cancel_on_ctrl_c(cancel.clone());
        cancel.cancel();
        tokio::time::timeout(Duration::from_secs(5), join_watcher(watcher))
            .await
            .expect("Watcher should exit after cancellation");
    }
}

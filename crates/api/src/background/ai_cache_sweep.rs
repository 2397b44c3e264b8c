//! Periodic removal of expired AI cache entries.
//!
//! Expired entries are also dropped lazily on lookup; the sweep keeps
//! entries that are never looked up again from holding capacity.

use std::sync::Arc;
use std::time::Duration;

use nova_ai::AiGateway;
use tokio_util::sync::CancellationToken;

/// Run the cache sweep loop every `interval` until `cancel` is triggered.
pub async fn run(gateway: Arc<AiGateway>, interval: Duration, cancel: CancellationToken) {
    tracing::info!(
        interval_secs = interval.as_secs(),
        "AI cache sweep job started"
    );

    let mut ticker = tokio::time::interval(interval);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("AI cache sweep job stopping");
                break;
            }
            _ = ticker.tick() => {
                let removed = gateway.cache().cleanup().await;
                if removed > 0 {
                    tracing::info!(removed, "AI cache sweep: purged expired entries");
                } else {
                    tracing::debug!("AI cache sweep: nothing expired");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use nova_ai::config::AiConfig;

    use super::*;

    #[tokio::test(start_paused = true)]
    async fn sweep_removes_expired_entries_and_stops_on_cancel() {
        let gateway = Arc::new(AiGateway::from_config(&AiConfig::default()));
        gateway
            .cache()
            .set("stale".into(), "old".into(), Duration::from_secs(1))
            .await;
        gateway
            .cache()
            .set("fresh".into(), "new".into(), Duration::from_secs(3600))
            .await;

        let cancel = CancellationToken::new();
        let handle = tokio::spawn(run(
            Arc::clone(&gateway),
            Duration::from_secs(60),
            cancel.clone(),
        ));

        // First tick fires immediately; the second one sees the stale entry expired.
        tokio::time::sleep(Duration::from_secs(61)).await;
        assert_eq!(gateway.cache().len().await, 1);

        cancel.cancel();
        handle.await.expect("sweep task should exit cleanly");
    }
}

//! Recurring liveness pings
//!
//! The ping loop ticks on a fixed interval with no jitter. Each tick spawns
//! its own ping, so a request slower than the interval never delays or skips
//! the next tick (pings may overlap). Failures are logged and counted; they
//! never stop the schedule. Only the cancellation token ends the loop.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::task::{JoinHandle, JoinSet};
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use nl_core::config::MAX_PING_INTERVAL;

use crate::api::NodeApi;

/// Counters shared between the loop and its handle
#[derive(Debug, Default)]
struct PingStats {
    sent: AtomicU64,
    failed: AtomicU64,
}

/// Configured but not yet running ping loop
pub struct PingTask<A> {
    api: Arc<A>,
    node_id: String,
    interval: Duration,
}

impl<A: NodeApi + 'static> PingTask<A> {
    /// Intervals longer than [`MAX_PING_INTERVAL`], or too long to schedule
    /// on this clock, are clamped to it.
    pub fn new(api: Arc<A>, node_id: impl Into<String>, interval: Duration) -> Self {
        let schedulable = Instant::now().checked_add(interval).is_some();
        let interval = if schedulable && interval <= MAX_PING_INTERVAL {
            interval
        } else {
            tracing::warn!(
                "Ping interval {:?} too long, using {}s",
                interval,
                MAX_PING_INTERVAL.as_secs()
            );
            MAX_PING_INTERVAL
        };

        Self {
            api,
            node_id: node_id.into(),
            interval,
        }
    }

    /// Start the loop. The first ping fires one interval from now.
    pub fn spawn(self, cancel: CancellationToken) -> PingHandle {
        let stats = Arc::new(PingStats::default());
        let join = tokio::spawn(self.run(cancel.clone(), Arc::clone(&stats)));
        PingHandle {
            cancel,
            join,
            stats,
        }
    }

    async fn run(self, cancel: CancellationToken, stats: Arc<PingStats>) {
        tracing::info!(
            "Ping task started for node {} ({}s interval)",
            self.node_id,
            self.interval.as_secs()
        );

        let now = Instant::now();
        let first = now.checked_add(self.interval).unwrap_or(now);
        let mut ticker = tokio::time::interval_at(first, self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Burst);
        let mut in_flight = JoinSet::new();

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::info!("Ping task stopping ({} in flight)", in_flight.len());
                    break;
                }
                _ = ticker.tick() => {
                    stats.sent.fetch_add(1, Ordering::Relaxed);
                    tracing::info!("Sending ping...");

                    let api = Arc::clone(&self.api);
                    let node_id = self.node_id.clone();
                    let stats = Arc::clone(&stats);
                    in_flight.spawn(async move {
                        if let Err(e) = api.ping_node(&node_id).await {
                            let failed = stats.failed.fetch_add(1, Ordering::Relaxed) + 1;
                            tracing::warn!("Ping failed ({} total): {}", failed, e);
                        }
                    });
                }
                Some(result) = in_flight.join_next(), if !in_flight.is_empty() => {
                    if let Err(e) = result {
                        tracing::error!("Ping task panicked: {}", e);
                    }
                }
            }
        }

        in_flight.abort_all();
    }
}

/// Handle to a running ping loop
pub struct PingHandle {
    cancel: CancellationToken,
    join: JoinHandle<()>,
    stats: Arc<PingStats>,
}

impl PingHandle {
    /// Number of recurring pings dispatched so far
    pub fn pings_sent(&self) -> u64 {
        self.stats.sent.load(Ordering::Relaxed)
    }

    /// Number of recurring pings that completed with an error
    pub fn pings_failed(&self) -> u64 {
        self.stats.failed.load(Ordering::Relaxed)
    }

    /// Token that stops the loop when cancelled
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Whether the loop has exited, either cancelled or panicked
    pub fn is_finished(&self) -> bool {
        self.join.is_finished()
    }

    /// Cancel the loop and wait for it to exit. In-flight pings are aborted.
    pub async fn shutdown(self) {
        self.cancel.cancel();
        if let Err(e) = self.join.await {
            tracing::error!("Ping task ended abnormally: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::GatewayResponse;
    use crate::error::AgentError;
    use async_trait::async_trait;
    use std::sync::atomic::AtomicUsize;

    #[derive(Default)]
    struct CountingApi {
        pings: AtomicUsize,
    }

    #[async_trait]
    impl NodeApi for CountingApi {
        async fn register_node(&self, _: &str, _: &str) -> Result<GatewayResponse, AgentError> {
            unreachable!("ping task never registers")
        }

        async fn start_session(&self, _: &str) -> Result<GatewayResponse, AgentError> {
            unreachable!("ping task never starts sessions")
        }

        async fn stop_session(&self, _: &str) -> Result<GatewayResponse, AgentError> {
            unreachable!("ping task never stops sessions")
        }

        async fn ping_node(&self, _: &str) -> Result<GatewayResponse, AgentError> {
            self.pings.fetch_add(1, Ordering::SeqCst);
            Ok(GatewayResponse {
                status: 200,
                body: serde_json::Value::Null,
            })
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_ping_before_first_interval() {
        let api = Arc::new(CountingApi::default());
        let handle = PingTask::new(Arc::clone(&api), "abc", Duration::from_secs(60))
            .spawn(CancellationToken::new());

        tokio::time::sleep(Duration::from_secs(59)).await;
        assert_eq!(api.pings.load(Ordering::SeqCst), 0);
        assert_eq!(handle.pings_sent(), 0);

        handle.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_stops_loop() {
        let api = Arc::new(CountingApi::default());
        let handle = PingTask::new(Arc::clone(&api), "abc", Duration::from_secs(60))
            .spawn(CancellationToken::new());
        let token = handle.cancel_token();

        tokio::time::sleep(Duration::from_secs(61)).await;
        handle.shutdown().await;
        assert!(token.is_cancelled());

        let before = api.pings.load(Ordering::SeqCst);
        tokio::time::sleep(Duration::from_secs(600)).await;
        assert_eq!(api.pings.load(Ordering::SeqCst), before);
    }

    #[tokio::test(start_paused = true)]
    async fn test_huge_interval_is_clamped() {
        let api = Arc::new(CountingApi::default());
        let handle = PingTask::new(Arc::clone(&api), "abc", Duration::from_secs(u64::MAX))
            .spawn(CancellationToken::new());

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(!handle.is_finished());
        assert_eq!(api.pings.load(Ordering::SeqCst), 0);

        tokio::time::sleep(MAX_PING_INTERVAL).await;
        assert_eq!(api.pings.load(Ordering::SeqCst), 1);
        assert!(!handle.is_finished());

        handle.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_external_cancel_finishes_task() {
        let api = Arc::new(CountingApi::default());
        let cancel = CancellationToken::new();
        let handle = PingTask::new(api, "abc", Duration::from_secs(60)).spawn(cancel.clone());

        cancel.cancel();
        tokio::time::sleep(Duration::from_millis(1)).await;
        assert!(handle.is_finished());
    }
}

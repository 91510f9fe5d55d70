//! Reconnecting swap listener.

use super::ReconnectPolicy;
use crate::error::ExecutionError;
use swap_monitor_protocols::ChainError;
use swap_monitor_protocols::feed::{FeedEvent, FeedSender, SwapSession};
use tokio::sync::mpsc;
use tracing::{error, info, warn};

/// Drives a `SwapSession` and re-establishes it from scratch whenever it drops.
pub struct SwapListener<S> {
    /// Session factory for one connection lifetime.
    session: S,
    /// Delay and give-up policy.
    policy: ReconnectPolicy,
}

impl<S: SwapSession> SwapListener<S> {
    /// Creates a new listener.
    pub fn new(session: S, policy: ReconnectPolicy) -> Self {
        Self { session, policy }
    }

    /// Runs until the consumer goes away or the policy is exhausted.
    ///
    /// The failure counter resets whenever a session got as far as `Connected`, so a
    /// quiet pool that keeps dropping its connection is retried indefinitely.
    pub async fn run(&self, tx: mpsc::Sender<FeedEvent>) -> Result<(), ExecutionError> {
        let sender = FeedSender::new(tx);
        let mut attempts: u32 = 0;

        loop {
            let delivered_before = sender.delivered();
            let connected_before = sender.connected();
            let result = self.session.run(&sender).await;
            let delivered = sender.delivered() - delivered_before;
            let connected = sender.connected() > connected_before;

            let reason = match result {
                Ok(()) => "session ended".to_string(),
                Err(ChainError::ConsumerGone) => {
                    info!("Feed consumer gone, stopping listener");
                    return Ok(());
                }
                Err(e) => e.to_string(),
            };

            if connected {
                attempts = 0;
            }
            attempts += 1;

            error!(
                reason = %reason,
                connected,
                delivered,
                attempts,
                "Swap feed disconnected"
            );

            if sender
                .send(FeedEvent::Disconnected {
                    reason: reason.clone(),
                })
                .await
                .is_err()
            {
                return Ok(());
            }

            if self.policy.is_exhausted(attempts) {
                error!(attempts, "Max reconnect attempts reached, stopping listener");
                return Err(ExecutionError::RetriesExhausted {
                    attempts,
                    last_error: reason,
                });
            }

            let delay = self.policy.delay_for(attempts);
            warn!(
                attempts,
                delay_ms = delay.as_millis() as u64,
                "Reconnecting..."
            );
            tokio::time::sleep(delay).await;
        }
    }
}

//! Feed consumer loop.

use super::{ProcessorStats, SwapProcessor, SwapRow, TimeDisplay};
use swap_monitor_domain::entities::Pool;
use swap_monitor_domain::metrics::LiquiditySnapshot;
use swap_monitor_domain::policy::PrimaryAsset;
use swap_monitor_protocols::feed::FeedEvent;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Presentation seam for the monitor.
pub trait RowSink {
    /// A session came up. Called again after every reconnect.
    fn on_connected(&mut self, pool: &Pool, snapshot: Option<&LiquiditySnapshot>);
    /// One processed swap.
    fn on_row(&mut self, row: &SwapRow);
    /// The session dropped.
    fn on_disconnected(&mut self, reason: &str);
}

/// Configuration for the swap monitor.
#[derive(Debug, Clone, Default)]
pub struct MonitorConfig {
    /// Reference asset for sentiment. Defaults to the pool's asset A.
    pub primary: Option<PrimaryAsset>,
    /// Maintain a running reserve estimate when a snapshot is available.
    pub track_reserves: bool,
    /// Time zone for the time column.
    pub time_display: TimeDisplay,
}

impl MonitorConfig {
    pub fn new(primary: Option<PrimaryAsset>) -> Self {
        Self {
            primary,
            ..Default::default()
        }
    }

    fn primary_for(&self, pool: &Pool) -> PrimaryAsset {
        self.primary
            .clone()
            .unwrap_or_else(|| PrimaryAsset::new(pool.token_a.symbol.clone()))
    }
}

/// Consumes feed events and drives a `RowSink`.
///
/// A reconnect to the same pool keeps the processor and reseeds its reserve estimate.
pub struct SwapMonitor {
    config: MonitorConfig,
    processor: Option<SwapProcessor>,
    totals: ProcessorStats,
}

impl SwapMonitor {
    pub fn new(config: MonitorConfig) -> Self {
        Self {
            config,
            processor: None,
            totals: ProcessorStats::default(),
        }
    }

    /// Totals across all sessions so far.
    pub fn stats(&self) -> ProcessorStats {
        let current = self
            .processor
            .as_ref()
            .map(SwapProcessor::stats)
            .unwrap_or_default();
        ProcessorStats {
            processed: self.totals.processed + current.processed,
            skipped: self.totals.skipped + current.skipped,
            reserve_drift: self.totals.reserve_drift + current.reserve_drift,
        }
    }

    /// Handles one feed event.
    pub fn handle<K: RowSink + ?Sized>(&mut self, event: FeedEvent, sink: &mut K) {
        match event {
            FeedEvent::Connected { pool, snapshot } => {
                let seed = if self.config.track_reserves {
                    if snapshot.is_none() {
                        warn!("Reserve tracking requested but no snapshot was read");
                    }
                    snapshot.as_ref()
                } else {
                    None
                };

                let same_pool = self
                    .processor
                    .as_ref()
                    .is_some_and(|processor| processor.pool() == &pool);
                if !same_pool {
                    self.retire_processor();
                    let primary = self.config.primary_for(&pool);
                    self.processor = Some(
                        SwapProcessor::new(pool, primary)
                            .with_time_display(self.config.time_display),
                    );
                }

                if let Some(processor) = self.processor.as_mut() {
                    processor.reseed(seed);
                    info!(
                        pool = %processor.pool().address,
                        reattached = same_pool,
                        tracking = processor.reserves().is_some(),
                        "Monitor attached to pool"
                    );
                    sink.on_connected(processor.pool(), snapshot.as_ref());
                }
            }
            FeedEvent::Swap(swap) => {
                let Some(processor) = self.processor.as_mut() else {
                    debug!("Swap received before pool was resolved, dropping");
                    return;
                };
                if let Some(row) = processor.process(&swap) {
                    sink.on_row(&row);
                }
            }
            FeedEvent::Disconnected { reason } => {
                sink.on_disconnected(&reason);
            }
        }
    }

    /// Runs until the feed channel closes.
    pub async fn run<K: RowSink + ?Sized>(
        &mut self,
        mut rx: mpsc::Receiver<FeedEvent>,
        sink: &mut K,
    ) -> ProcessorStats {
        while let Some(event) = rx.recv().await {
            self.handle(event, sink);
        }
        let stats = self.stats();
        info!(
            processed = stats.processed,
            skipped = stats.skipped,
            reserve_drift = stats.reserve_drift,
            "Feed closed"
        );
        stats
    }

    fn retire_processor(&mut self) {
        if let Some(processor) = self.processor.take() {
            let stats = processor.stats();
            self.totals.processed += stats.processed;
            self.totals.skipped += stats.skipped;
            self.totals.reserve_drift += stats.reserve_drift;
        }
    }
}

//! Per-event processing.

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};
use swap_monitor_domain::classifier::{self, SwapMetrics};
use swap_monitor_domain::display::{format_amount, format_ratio, ratio_line, short_address};
use swap_monitor_domain::entities::{Pool, SwapEvent};
use swap_monitor_domain::metrics::LiquiditySnapshot;
use swap_monitor_domain::policy::{self, PrimaryAsset, Sentiment};
use swap_monitor_domain::reserves::ReserveTracker;
use tracing::{debug, warn};

/// Decimal places shown for swap amounts.
pub const AMOUNT_PLACES: u32 = 6;

/// Time zone used for the time column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeDisplay {
    #[default]
    Local,
    Utc,
}

/// A fully formatted table row. Every field is display-ready.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapRow {
    /// `HH:MM:SS` of the block, or of arrival when the block time is unknown.
    pub time: String,
    /// `"USDC->WETH"`.
    pub direction: String,
    /// Presentation relative to the primary asset.
    pub sentiment: Sentiment,
    /// Net amount of asset A.
    pub amount_a: String,
    /// Net amount of asset B.
    pub amount_b: String,
    /// Both-way price line.
    pub ratio: String,
    /// Shortened recipient address.
    pub maker: String,
    /// Spot price of A in B from the running reserve estimate, when tracked.
    pub spot: Option<String>,
}

/// Counters for processed and skipped events.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProcessorStats {
    /// Events turned into rows.
    pub processed: u64,
    /// Malformed events skipped.
    pub skipped: u64,
    /// Events the reserve estimate could not absorb.
    pub reserve_drift: u64,
}

/// Classifies swaps for one pool and renders them into rows.
///
/// The processor is the single writer of the running reserve estimate; events must be
/// fed in delivery order.
pub struct SwapProcessor {
    /// Pool the events belong to.
    pool: Pool,
    /// Reference asset for sentiment.
    primary: PrimaryAsset,
    /// Optional running reserve estimate.
    reserves: Option<ReserveTracker>,
    /// Time zone for the time column.
    time_display: TimeDisplay,
    /// Counters.
    stats: ProcessorStats,
}

impl SwapProcessor {
    /// Creates a processor without reserve tracking.
    pub fn new(pool: Pool, primary: PrimaryAsset) -> Self {
        Self {
            pool,
            primary,
            reserves: None,
            time_display: TimeDisplay::default(),
            stats: ProcessorStats::default(),
        }
    }

    /// Enables reserve tracking seeded from `snapshot`.
    #[must_use]
    pub fn with_reserves(mut self, snapshot: &LiquiditySnapshot) -> Self {
        self.reseed(Some(snapshot));
        self
    }

    /// Resets the running estimate to `snapshot`. `None` stops tracking.
    pub fn reseed(&mut self, snapshot: Option<&LiquiditySnapshot>) {
        let Some(snapshot) = snapshot else {
            self.reserves = None;
            return;
        };
        if let Some(tracker) = self.reserves.as_mut() {
            tracker.reseed(snapshot.reserve_a, snapshot.reserve_b);
        } else {
            self.reserves = Some(ReserveTracker::from_snapshot(snapshot));
        }
    }

    #[must_use]
    pub fn with_time_display(mut self, time_display: TimeDisplay) -> Self {
        self.time_display = time_display;
        self
    }

    pub fn pool(&self) -> &Pool {
        &self.pool
    }

    pub fn stats(&self) -> ProcessorStats {
        self.stats
    }

    pub fn reserves(&self) -> Option<&ReserveTracker> {
        self.reserves.as_ref()
    }

    /// Processes one event. Malformed events are logged and skipped.
    pub fn process(&mut self, event: &SwapEvent) -> Option<SwapRow> {
        let metrics = match classifier::classify(event, &self.pool) {
            Ok(metrics) => metrics,
            Err(e) => {
                self.stats.skipped += 1;
                warn!(
                    stage = "classify",
                    block = ?event.block_number,
                    tx = ?event.transaction_hash,
                    log_index = ?event.log_index,
                    error = %e,
                    "Skipping swap event"
                );
                return None;
            }
        };

        let spot = self.update_reserves(event);
        let row = self.build_row(event, &metrics, spot);
        self.stats.processed += 1;
        Some(row)
    }

    fn update_reserves(&mut self, event: &SwapEvent) -> Option<String> {
        let tracker = self.reserves.as_mut()?;

        if let Err(e) = tracker.apply(event, &self.pool) {
            self.stats.reserve_drift += 1;
            warn!(
                stage = "reserves",
                block = ?event.block_number,
                tx = ?event.transaction_hash,
                error = %e,
                "Running reserve estimate drifted, keeping previous value"
            );
        }

        match tracker.price_a_in_b(&self.pool) {
            Ok(price) => {
                debug!(
                    events_since_seed = tracker.events_since_seed(),
                    price = %price,
                    "Updated running reserves"
                );
                Some(format_ratio(price))
            }
            Err(e) => {
                warn!(stage = "reserves", error = %e, "Cannot price running reserves");
                None
            }
        }
    }

    fn build_row(&self, event: &SwapEvent, metrics: &SwapMetrics, spot: Option<String>) -> SwapRow {
        SwapRow {
            time: self.format_time(event.timestamp),
            direction: metrics.direction.label(&self.pool),
            sentiment: policy::sentiment(metrics.direction, &self.pool, &self.primary),
            amount_a: format_amount(metrics.net_a, AMOUNT_PLACES),
            amount_b: format_amount(metrics.net_b, AMOUNT_PLACES),
            ratio: ratio_line(&self.pool, metrics),
            maker: short_address(&event.recipient),
            spot,
        }
    }

    fn format_time(&self, timestamp: Option<u64>) -> String {
        let utc = timestamp
            .and_then(|ts| i64::try_from(ts).ok())
            .and_then(|ts| DateTime::<Utc>::from_timestamp(ts, 0))
            .unwrap_or_else(Utc::now);

        match self.time_display {
            TimeDisplay::Local => utc.with_timezone(&Local).format("%H:%M:%S").to_string(),
            TimeDisplay::Utc => utc.format("%H:%M:%S").to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use primitive_types::U256;
    use swap_monitor_domain::entities::Token;

    fn pool() -> Pool {
        Pool::new(
            "0xpool",
            "Uniswap V2",
            Token::new("0xa", "WETH", 18, "Wrapped Ether"),
            Token::new("0xb", "USDC", 6, "USD Coin"),
        )
    }

    fn buy_weth() -> SwapEvent {
        SwapEvent::new(0u64, 3_000_000_000u64, 1_000_000_000_000_000_000u128, 0u64)
            .with_parties(
                "0x7a250d5630B4cF539739dF2C5dAcb4c659F2488D",
                "0x28C6c06298d514Db089934071355E5743bf21d60",
            )
            .with_timestamp(1_700_000_000)
    }

    #[test]
    fn test_process_builds_display_row() {
        let mut processor =
            SwapProcessor::new(pool(), PrimaryAsset::new("WETH")).with_time_display(TimeDisplay::Utc);

        let row = processor.process(&buy_weth()).unwrap();

        assert_eq!(row.time, "22:13:20");
        assert_eq!(row.direction, "USDC->WETH");
        assert_eq!(row.sentiment, Sentiment::Favorable);
        assert_eq!(row.amount_a, "1.000000");
        assert_eq!(row.amount_b, "3,000.000000");
        assert_eq!(row.ratio, "1 WETH ≈ 3,000.00 USDC, 1 USDC ≈ 0.0003333 WETH");
        assert_eq!(row.maker, "0x28C6...1d60");
        assert_eq!(row.spot, None);
        assert_eq!(processor.stats().processed, 1);
    }

    #[test]
    fn test_malformed_event_is_skipped_and_next_is_processed() {
        let mut processor = SwapProcessor::new(pool(), PrimaryAsset::new("WETH"));

        assert!(processor.process(&SwapEvent::new(0u64, 0u64, 0u64, 0u64)).is_none());
        assert!(processor.process(&SwapEvent::new(5u64, 5u64, 1u64, 1u64)).is_none());
        assert!(processor.process(&buy_weth()).is_some());

        let stats = processor.stats();
        assert_eq!(stats.skipped, 2);
        assert_eq!(stats.processed, 1);
    }

    #[test]
    fn test_reserve_tracking_updates_estimate() {
        let snapshot = LiquiditySnapshot::new(
            U256::from(1_000u64),
            U256::zero(),
            U256::from(10_000_000_000_000_000_000u128),
            U256::from(30_000_000_000u64),
            0,
        )
        .unwrap();
        let mut processor =
            SwapProcessor::new(pool(), PrimaryAsset::new("USDC")).with_reserves(&snapshot);

        let row = processor.process(&buy_weth()).unwrap();

        assert_eq!(row.sentiment, Sentiment::Unfavorable);
        let (reserve_a, reserve_b) = processor.reserves().unwrap().reserves();
        assert_eq!(reserve_a, U256::from(9_000_000_000_000_000_000u128));
        assert_eq!(reserve_b, U256::from(33_000_000_000u64));
        // 33,000 / 9 = 3,666.67
        assert_eq!(row.spot.as_deref(), Some("3,666.67"));
    }

    #[test]
    fn test_reserve_drift_still_renders_row() {
        let snapshot =
            LiquiditySnapshot::new(U256::from(1u64), U256::zero(), U256::from(1u64), U256::from(1u64), 0)
                .unwrap();
        let mut processor =
            SwapProcessor::new(pool(), PrimaryAsset::new("WETH")).with_reserves(&snapshot);

        assert!(processor.process(&buy_weth()).is_some());
        assert_eq!(processor.stats().reserve_drift, 1);
        assert_eq!(processor.reserves().unwrap().events_since_seed(), 0);
    }

    #[test]
    fn test_reseed_replaces_or_drops_estimate() {
        let snapshot = LiquiditySnapshot::new(
            U256::from(1_000u64),
            U256::zero(),
            U256::from(10_000_000_000_000_000_000u128),
            U256::from(30_000_000_000u64),
            0,
        )
        .unwrap();
        let mut processor =
            SwapProcessor::new(pool(), PrimaryAsset::new("USDC")).with_reserves(&snapshot);
        processor.process(&buy_weth());

        processor.reseed(Some(&snapshot));
        let tracker = processor.reserves().unwrap();
        assert_eq!(tracker.events_since_seed(), 0);
        assert_eq!(tracker.reserves().0, U256::from(10_000_000_000_000_000_000u128));

        processor.reseed(None);
        assert!(processor.reserves().is_none());
        assert_eq!(processor.process(&buy_weth()).unwrap().spot, None);
    }
}

//! Live swap feed.
//!
//! One session is one connection lifetime: connect, resolve the pool, optionally read
//! the liquidity snapshot, then forward every decoded `Swap` log until the subscription
//! ends or a poll fails. Reconnecting is the caller's job.

use crate::bindings::SwapLog;
use crate::block_time::{BlockTimeCache, BlockTimeSource, EthersBlockTimes};
use crate::connection::Endpoint;
use crate::reader::{EthersPoolReader, format_address, parse_address};
use crate::{ChainError, resolver, snapshot};
use async_trait::async_trait;
use ethers::abi::RawLog;
use ethers::contract::{EthEvent, LogMeta};
use ethers::prelude::*;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use swap_monitor_domain::entities::{Pool, SwapEvent};
use swap_monitor_domain::metrics::LiquiditySnapshot;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Event delivered to the feed consumer.
#[derive(Debug, Clone)]
pub enum FeedEvent {
    /// A session is live; pool state has been (re)acquired from scratch.
    Connected {
        pool: Pool,
        snapshot: Option<LiquiditySnapshot>,
    },
    /// A decoded swap, in delivery order.
    Swap(SwapEvent),
    /// The session ended; a reconnect may follow.
    Disconnected { reason: String },
}

/// Sending half of the feed channel. Counts delivered swaps and established sessions.
#[derive(Debug, Clone)]
pub struct FeedSender {
    tx: mpsc::Sender<FeedEvent>,
    delivered: Arc<AtomicU64>,
    connected: Arc<AtomicU64>,
}

impl FeedSender {
    pub fn new(tx: mpsc::Sender<FeedEvent>) -> Self {
        Self {
            tx,
            delivered: Arc::new(AtomicU64::new(0)),
            connected: Arc::new(AtomicU64::new(0)),
        }
    }

    pub async fn send(&self, event: FeedEvent) -> Result<(), ChainError> {
        let counter = match event {
            FeedEvent::Swap(_) => Some(&self.delivered),
            FeedEvent::Connected { .. } => Some(&self.connected),
            FeedEvent::Disconnected { .. } => None,
        };
        self.tx
            .send(event)
            .await
            .map_err(|_| ChainError::ConsumerGone)?;
        if let Some(counter) = counter {
            counter.fetch_add(1, Ordering::SeqCst);
        }
        Ok(())
    }

    /// Swaps delivered through this sender and its clones.
    pub fn delivered(&self) -> u64 {
        self.delivered.load(Ordering::SeqCst)
    }

    /// `Connected` events delivered through this sender and its clones.
    pub fn connected(&self) -> u64 {
        self.connected.load(Ordering::SeqCst)
    }
}

/// One connection lifetime of a swap source.
#[async_trait]
pub trait SwapSession: Send + Sync {
    /// Runs until the underlying stream fails or ends. Never returns `Ok` while the
    /// connection is still usable.
    async fn run(&self, tx: &FeedSender) -> Result<(), ChainError>;
}

/// Configuration for the ethers-backed feed.
#[derive(Debug, Clone)]
pub struct FeedConfig {
    /// Node endpoint.
    pub endpoint: Endpoint,
    /// Pair contract address.
    pub pool_address: String,
    /// Read the liquidity snapshot on every connect.
    pub with_snapshot: bool,
    /// Addresses whose liquidity token balance counts as burned.
    pub burn_addresses: Vec<String>,
    /// Fetch block timestamps for the time column.
    pub block_times: bool,
    /// Blocks kept in the timestamp cache.
    pub block_cache_capacity: usize,
    /// Polling interval for HTTP endpoints.
    pub poll_interval: Duration,
}

impl FeedConfig {
    pub fn new(endpoint: Endpoint, pool_address: impl Into<String>) -> Self {
        Self {
            endpoint,
            pool_address: pool_address.into(),
            with_snapshot: false,
            burn_addresses: snapshot::default_burn_addresses(),
            block_times: true,
            block_cache_capacity: crate::block_time::DEFAULT_CAPACITY,
            poll_interval: Duration::from_secs(2),
        }
    }
}

/// Swap feed over an ethers `Provider`.
///
/// WebSocket endpoints use an `eth_subscribe` log subscription. HTTP endpoints install a
/// log filter and poll it; a failed poll ends the session.
pub struct EthersSwapFeed {
    config: FeedConfig,
}

impl EthersSwapFeed {
    pub fn new(config: FeedConfig) -> Self {
        Self { config }
    }

    /// Resolves the pool, reads the snapshot if configured and announces the session.
    async fn attach<M: Middleware + 'static>(
        &self,
        client: Arc<M>,
        tx: &FeedSender,
    ) -> Result<EthersPoolReader<M>, ChainError> {
        let address = parse_address(&self.config.pool_address)?;
        let reader = EthersPoolReader::new(address, client);

        let pool = resolver::resolve_pool(&reader).await?;
        let snapshot = if self.config.with_snapshot {
            Some(snapshot::read_snapshot(&reader, &self.config.burn_addresses).await?)
        } else {
            None
        };
        tx.send(FeedEvent::Connected { pool, snapshot }).await?;
        Ok(reader)
    }

    fn forwarder<M: Middleware + 'static>(&self, client: Arc<M>) -> Forwarder<EthersBlockTimes<M>> {
        let block_times = self.config.block_times.then(|| {
            BlockTimeCache::new(
                EthersBlockTimes::new(client),
                self.config.block_cache_capacity,
            )
        });
        Forwarder { block_times }
    }

    async fn subscribe(&self, client: Arc<Provider<Ws>>, tx: &FeedSender) -> Result<(), ChainError> {
        let reader = self.attach(Arc::clone(&client), tx).await?;
        let mut forwarder = self.forwarder(client);

        let event = reader.pair().event::<SwapLog>();
        let mut stream = event
            .subscribe_with_meta()
            .await
            .map_err(|e| ChainError::Subscription(e.to_string()))?;
        info!(pool = %self.config.pool_address, "Subscribed to Swap events");

        while let Some(item) = stream.next().await {
            match item {
                Ok((log, meta)) => forwarder.forward(&log, &meta, tx).await?,
                Err(e) => warn!(error = %e, "Skipping undecodable Swap log"),
            }
        }

        debug!(misses = forwarder.misses(), "Swap subscription ended");
        Err(ChainError::StreamClosed)
    }

    async fn poll(&self, client: Arc<Provider<Http>>, tx: &FeedSender) -> Result<(), ChainError> {
        let reader = self.attach(Arc::clone(&client), tx).await?;
        let mut forwarder = self.forwarder(Arc::clone(&client));
        let filter = reader.pair().event::<SwapLog>().filter;

        poll_swaps(
            client.as_ref(),
            &filter,
            self.config.poll_interval,
            &mut forwarder,
            tx,
        )
        .await
    }
}

#[async_trait]
impl SwapSession for EthersSwapFeed {
    async fn run(&self, tx: &FeedSender) -> Result<(), ChainError> {
        match self.connect().await? {
            Connection::Ws(provider) => self.subscribe(provider, tx).await,
            Connection::Http(provider) => self.poll(provider, tx).await,
        }
    }
}

/// A connected provider for either transport.
enum Connection {
    Ws(Arc<Provider<Ws>>),
    Http(Arc<Provider<Http>>),
}

impl EthersSwapFeed {
    async fn connect(&self) -> Result<Connection, ChainError> {
        let connection_error = |e: &dyn std::fmt::Display| ChainError::Connection {
            url: self.config.endpoint.to_string(),
            reason: e.to_string(),
        };

        match &self.config.endpoint {
            Endpoint::Ws(url) => {
                info!(endpoint = %self.config.endpoint, "Connecting over WebSocket");
                let provider = Provider::<Ws>::connect(url.as_str())
                    .await
                    .map_err(|e| connection_error(&e))?;
                Ok(Connection::Ws(Arc::new(provider)))
            }
            Endpoint::Http(url) => {
                info!(endpoint = %self.config.endpoint, "Connecting over HTTP");
                let provider =
                    Provider::<Http>::try_from(url.as_str()).map_err(|e| connection_error(&e))?;
                Ok(Connection::Http(Arc::new(provider)))
            }
        }
    }

    /// Connects once and reads the pool metadata and liquidity snapshot.
    pub async fn inspect(&self) -> Result<(Pool, LiquiditySnapshot), ChainError> {
        match self.connect().await? {
            Connection::Ws(provider) => self.read_state(provider).await,
            Connection::Http(provider) => self.read_state(provider).await,
        }
    }

    async fn read_state<M: Middleware + 'static>(
        &self,
        client: Arc<M>,
    ) -> Result<(Pool, LiquiditySnapshot), ChainError> {
        let address = parse_address(&self.config.pool_address)?;
        let reader = EthersPoolReader::new(address, client);
        let pool = resolver::resolve_pool(&reader).await?;
        let snapshot = snapshot::read_snapshot(&reader, &self.config.burn_addresses).await?;
        Ok((pool, snapshot))
    }
}

/// Turns decoded logs into `FeedEvent::Swap`, filling block timestamps when enabled.
pub(crate) struct Forwarder<S> {
    block_times: Option<BlockTimeCache<S>>,
}

impl<S: BlockTimeSource> Forwarder<S> {
    async fn forward(
        &mut self,
        log: &SwapLog,
        meta: &LogMeta,
        tx: &FeedSender,
    ) -> Result<(), ChainError> {
        let mut swap = to_swap_event(log, meta);
        if let Some(block_times) = self.block_times.as_mut() {
            let block_number = meta.block_number.low_u64();
            match block_times.timestamp(block_number).await {
                Ok(timestamp) => swap.timestamp = timestamp,
                Err(e) => warn!(block_number, error = %e, "Block timestamp unavailable"),
            }
        }
        tx.send(FeedEvent::Swap(swap)).await
    }

    fn misses(&self) -> u64 {
        self.block_times.as_ref().map_or(0, BlockTimeCache::misses)
    }
}

/// Installs `filter` and polls it every `interval`. Only returns on failure: a poll
/// error, its filter expiring on the node, or a dropped consumer.
pub(crate) async fn poll_swaps<M: Middleware, S: BlockTimeSource>(
    client: &M,
    filter: &Filter,
    interval: Duration,
    forwarder: &mut Forwarder<S>,
    tx: &FeedSender,
) -> Result<(), ChainError> {
    let id = client
        .new_filter(FilterKind::Logs(filter))
        .await
        .map_err(|e| ChainError::Subscription(e.to_string()))?;
    info!(filter = ?id, "Polling Swap events");

    loop {
        tokio::time::sleep(interval).await;
        let logs: Vec<Log> = client
            .get_filter_changes(id)
            .await
            .map_err(|e| ChainError::Poll(e.to_string()))?;

        for log in logs {
            if log.removed == Some(true) {
                debug!(tx = ?log.transaction_hash, "Ignoring removed log");
                continue;
            }
            let Some(meta) = log_meta(&log) else {
                debug!("Ignoring pending log");
                continue;
            };
            let raw = RawLog {
                topics: log.topics.clone(),
                data: log.data.to_vec(),
            };
            match <SwapLog as EthEvent>::decode_log(&raw) {
                Ok(decoded) => forwarder.forward(&decoded, &meta, tx).await?,
                Err(e) => warn!(error = %e, "Skipping undecodable Swap log"),
            }
        }
    }
}

/// Position metadata of a mined log. `None` for pending logs.
fn log_meta(log: &Log) -> Option<LogMeta> {
    Some(LogMeta {
        address: log.address,
        block_number: log.block_number?,
        block_hash: log.block_hash?,
        transaction_hash: log.transaction_hash?,
        transaction_index: log.transaction_index?,
        log_index: log.log_index?,
    })
}

/// Maps a decoded log onto the pool's A/B naming.
pub fn to_swap_event(log: &SwapLog, meta: &LogMeta) -> SwapEvent {
    SwapEvent::new(
        log.amount0_in,
        log.amount1_in,
        log.amount0_out,
        log.amount1_out,
    )
    .with_parties(format_address(&log.sender), format_address(&log.to))
    .with_log_position(
        meta.block_number.low_u64(),
        format!("{:?}", meta.transaction_hash),
        meta.log_index.low_u64(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_swap_event_maps_token0_to_a() {
        let log = SwapLog {
            sender: Address::repeat_byte(0x11),
            amount0_in: U256::zero(),
            amount1_in: U256::from(3_000_000_000u64),
            amount0_out: U256::from(1_000_000_000_000_000_000u128),
            amount1_out: U256::zero(),
            to: Address::repeat_byte(0x22),
        };
        let meta = LogMeta {
            address: Address::zero(),
            block_number: U64::from(19_000_000u64),
            block_hash: H256::zero(),
            transaction_hash: H256::repeat_byte(0xab),
            transaction_index: U64::from(3u64),
            log_index: U256::from(42u64),
        };

        let swap = to_swap_event(&log, &meta);

        assert_eq!(swap.amount_b_in, U256::from(3_000_000_000u64));
        assert_eq!(swap.amount_a_out, U256::from(1_000_000_000_000_000_000u128));
        assert_eq!(swap.block_number, Some(19_000_000));
        assert_eq!(swap.log_index, Some(42));
        assert_eq!(swap.recipient, format_address(&Address::repeat_byte(0x22)));
        assert!(swap.transaction_hash.unwrap().starts_with("0xabab"));
        assert_eq!(swap.timestamp, None);
    }

    fn swap_log_entry() -> Log {
        let amounts = [0u64, 3_000_000_000, 1_000_000_000_000_000_000, 0]
            .into_iter()
            .map(|amount| ethers::abi::Token::Uint(U256::from(amount)))
            .collect::<Vec<_>>();
        Log {
            address: Address::repeat_byte(0x44),
            topics: vec![
                SwapLog::signature(),
                H256::from(Address::repeat_byte(0x11)),
                H256::from(Address::repeat_byte(0x22)),
            ],
            data: Bytes::from(ethers::abi::encode(&amounts)),
            block_hash: Some(H256::repeat_byte(0x01)),
            block_number: Some(U64::from(19_000_001u64)),
            transaction_hash: Some(H256::repeat_byte(0xcd)),
            transaction_index: Some(U64::from(0u64)),
            log_index: Some(U256::from(7u64)),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_polling_forwards_swaps_then_fails_on_transport_error() {
        let (provider, mock) = Provider::mocked();
        // Responses are served last-pushed first: newFilter, then one getFilterChanges.
        let pending = Log {
            block_number: None,
            ..swap_log_entry()
        };
        mock.push::<Vec<Log>, _>(vec![swap_log_entry(), pending]).unwrap();
        mock.push::<U256, _>(U256::from(1u64)).unwrap();

        let (tx, mut rx) = mpsc::channel(8);
        let sender = FeedSender::new(tx);
        let mut forwarder = Forwarder::<EthersBlockTimes<Provider<MockProvider>>> {
            block_times: None,
        };
        let filter = Filter::new().address(Address::repeat_byte(0x44));

        let result = poll_swaps(
            &provider,
            &filter,
            Duration::from_millis(1),
            &mut forwarder,
            &sender,
        )
        .await;

        assert!(matches!(result, Err(ChainError::Poll(_))));
        assert_eq!(sender.delivered(), 1);
        let Some(FeedEvent::Swap(swap)) = rx.recv().await else {
            panic!("expected a swap");
        };
        assert_eq!(swap.amount_b_in, U256::from(3_000_000_000u64));
        assert_eq!(swap.amount_a_out, U256::from(1_000_000_000_000_000_000u128));
        assert_eq!(swap.block_number, Some(19_000_001));
        assert_eq!(swap.log_index, Some(7));
        assert_eq!(swap.sender, format_address(&Address::repeat_byte(0x11)));
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_polling_fails_when_filter_cannot_be_installed() {
        let (provider, _mock) = Provider::mocked();
        let (tx, _rx) = mpsc::channel(1);
        let sender = FeedSender::new(tx);
        let mut forwarder = Forwarder::<EthersBlockTimes<Provider<MockProvider>>> {
            block_times: None,
        };

        let result = poll_swaps(
            &provider,
            &Filter::new(),
            Duration::from_millis(1),
            &mut forwarder,
            &sender,
        )
        .await;

        assert!(matches!(result, Err(ChainError::Subscription(_))));
    }

    #[tokio::test]
    async fn test_feed_sender_counts_swaps_only() {
        let (tx, mut rx) = mpsc::channel(4);
        let sender = FeedSender::new(tx);

        sender
            .send(FeedEvent::Disconnected {
                reason: "test".to_string(),
            })
            .await
            .unwrap();
        sender
            .send(FeedEvent::Swap(SwapEvent::new(1u64, 0u64, 0u64, 1u64)))
            .await
            .unwrap();

        assert_eq!(sender.delivered(), 1);
        assert_eq!(sender.connected(), 0);
        assert!(matches!(rx.recv().await, Some(FeedEvent::Disconnected { .. })));
        assert!(matches!(rx.recv().await, Some(FeedEvent::Swap(_))));
    }

    #[tokio::test]
    async fn test_feed_sender_reports_dropped_consumer() {
        let (tx, rx) = mpsc::channel(1);
        drop(rx);
        let sender = FeedSender::new(tx);

        let result = sender
            .send(FeedEvent::Swap(SwapEvent::new(1u64, 0u64, 0u64, 1u64)))
            .await;
        assert!(matches!(result, Err(ChainError::ConsumerGone)));
    }
}

//! Block timestamps, fetched once per block rather than once per event.

use crate::ChainError;
use async_trait::async_trait;
use ethers::prelude::*;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use tracing::debug;

/// Default number of blocks kept in the cache.
pub const DEFAULT_CAPACITY: usize = 256;

#[async_trait]
pub trait BlockTimeSource: Send + Sync {
    /// Unix timestamp of the block, `None` if the node does not know the block yet.
    async fn block_timestamp(&self, block_number: u64) -> Result<Option<u64>, ChainError>;
}

/// `BlockTimeSource` backed by `eth_getBlockByNumber`.
pub struct EthersBlockTimes<M> {
    client: Arc<M>,
}

impl<M> EthersBlockTimes<M> {
    pub fn new(client: Arc<M>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl<M: Middleware + 'static> BlockTimeSource for EthersBlockTimes<M> {
    async fn block_timestamp(&self, block_number: u64) -> Result<Option<u64>, ChainError> {
        let block = self
            .client
            .get_block(BlockId::Number(BlockNumber::Number(block_number.into())))
            .await
            .map_err(|e| ChainError::call("getBlock", e))?;
        Ok(block.map(|b| b.timestamp.low_u64()))
    }
}

/// Bounded block-number to timestamp cache with FIFO eviction.
pub struct BlockTimeCache<S> {
    source: S,
    capacity: usize,
    entries: HashMap<u64, u64>,
    order: VecDeque<u64>,
    misses: u64,
}

impl<S: BlockTimeSource> BlockTimeCache<S> {
    pub fn new(source: S, capacity: usize) -> Self {
        Self {
            source,
            capacity,
            entries: HashMap::with_capacity(capacity),
            order: VecDeque::with_capacity(capacity),
            misses: 0,
        }
    }

    pub async fn timestamp(&mut self, block_number: u64) -> Result<Option<u64>, ChainError> {
        if let Some(timestamp) = self.entries.get(&block_number) {
            return Ok(Some(*timestamp));
        }

        self.misses += 1;
        let timestamp = self.source.block_timestamp(block_number).await?;
        if let Some(timestamp) = timestamp {
            self.insert(block_number, timestamp);
        }
        debug!(block_number, ?timestamp, "Fetched block timestamp");
        Ok(timestamp)
    }

    fn insert(&mut self, block_number: u64, timestamp: u64) {
        if self.capacity == 0 {
            return;
        }
        while self.entries.len() >= self.capacity {
            match self.order.pop_front() {
                Some(oldest) => {
                    self.entries.remove(&oldest);
                }
                None => break,
            }
        }
        self.entries.insert(block_number, timestamp);
        self.order.push_back(block_number);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of lookups that went to the source.
    pub fn misses(&self) -> u64 {
        self.misses
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    struct CountingSource {
        calls: Arc<AtomicU32>,
    }

    #[async_trait]
    impl BlockTimeSource for CountingSource {
        async fn block_timestamp(&self, block_number: u64) -> Result<Option<u64>, ChainError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if block_number == 0 {
                return Ok(None);
            }
            Ok(Some(1_700_000_000 + block_number * 12))
        }
    }

    fn cache(capacity: usize) -> (BlockTimeCache<CountingSource>, Arc<AtomicU32>) {
        let calls = Arc::new(AtomicU32::new(0));
        let source = CountingSource {
            calls: Arc::clone(&calls),
        };
        (BlockTimeCache::new(source, capacity), calls)
    }

    #[tokio::test]
    async fn test_one_fetch_per_block() {
        let (mut cache, calls) = cache(8);

        for _ in 0..5 {
            assert_eq!(cache.timestamp(10).await.unwrap(), Some(1_700_000_120));
        }
        cache.timestamp(11).await.unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(cache.misses(), 2);
        assert_eq!(cache.len(), 2);
    }

    #[tokio::test]
    async fn test_evicts_oldest_block() {
        let (mut cache, calls) = cache(2);

        cache.timestamp(1).await.unwrap();
        cache.timestamp(2).await.unwrap();
        cache.timestamp(3).await.unwrap();
        assert_eq!(cache.len(), 2);

        // block 1 was evicted, block 3 is still cached
        cache.timestamp(3).await.unwrap();
        cache.timestamp(1).await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn test_unknown_block_is_not_cached() {
        let (mut cache, calls) = cache(2);

        assert_eq!(cache.timestamp(0).await.unwrap(), None);
        assert_eq!(cache.timestamp(0).await.unwrap(), None);
        assert!(cache.is_empty());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}

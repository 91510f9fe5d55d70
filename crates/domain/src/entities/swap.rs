use primitive_types::U256;
use serde::{Deserialize, Serialize};

/// A decoded `Swap` log, expressed in terms of the pool's asset A and asset B.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapEvent {
    pub sender: String,
    pub recipient: String,
    pub amount_a_in: U256,
    pub amount_b_in: U256,
    pub amount_a_out: U256,
    pub amount_b_out: U256,
    pub block_number: Option<u64>,
    pub transaction_hash: Option<String>,
    pub log_index: Option<u64>,
    /// Block timestamp in unix seconds, when known.
    pub timestamp: Option<u64>,
}

impl SwapEvent {
    /// Creates an event with amounts only; chain context is attached with the `with_*` builders.
    pub fn new(
        amount_a_in: impl Into<U256>,
        amount_b_in: impl Into<U256>,
        amount_a_out: impl Into<U256>,
        amount_b_out: impl Into<U256>,
    ) -> Self {
        Self {
            sender: String::new(),
            recipient: String::new(),
            amount_a_in: amount_a_in.into(),
            amount_b_in: amount_b_in.into(),
            amount_a_out: amount_a_out.into(),
            amount_b_out: amount_b_out.into(),
            block_number: None,
            transaction_hash: None,
            log_index: None,
            timestamp: None,
        }
    }

    #[must_use]
    pub fn with_parties(mut self, sender: impl Into<String>, recipient: impl Into<String>) -> Self {
        self.sender = sender.into();
        self.recipient = recipient.into();
        self
    }

    #[must_use]
    pub fn with_log_position(
        mut self,
        block_number: u64,
        transaction_hash: impl Into<String>,
        log_index: u64,
    ) -> Self {
        self.block_number = Some(block_number);
        self.transaction_hash = Some(transaction_hash.into());
        self.log_index = Some(log_index);
        self
    }

    #[must_use]
    pub fn with_timestamp(mut self, timestamp: u64) -> Self {
        self.timestamp = Some(timestamp);
        self
    }
}

use swap_monitor_domain::DomainError;
use thiserror::Error;

/// Failures at the chain-client boundary.
#[derive(Debug, Error)]
pub enum ChainError {
    #[error("unsupported endpoint {0}: expected ws://, wss://, http:// or https://")]
    Endpoint(String),

    #[error("connection to {url} failed: {reason}")]
    Connection { url: String, reason: String },

    #[error("invalid address {0}")]
    InvalidAddress(String),

    #[error("call {call} failed: {reason}")]
    Call { call: &'static str, reason: String },

    #[error("event subscription failed: {0}")]
    Subscription(String),

    #[error("log polling failed: {0}")]
    Poll(String),

    #[error("event stream closed by the node")]
    StreamClosed,

    #[error("feed consumer dropped")]
    ConsumerGone,

    #[error(transparent)]
    Domain(#[from] DomainError),
}

impl ChainError {
    pub(crate) fn call(call: &'static str, reason: impl ToString) -> Self {
        Self::Call {
            call,
            reason: reason.to_string(),
        }
    }
}

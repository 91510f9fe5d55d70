use crate::classifier::SwapDirection;
use crate::entities::Pool;
use serde::{Deserialize, Serialize};

/// The configured reference asset, identified by symbol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrimaryAsset(pub String);

impl PrimaryAsset {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self(symbol.into())
    }

    pub fn symbol(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sentiment {
    /// The primary asset was acquired.
    Favorable,
    /// The primary asset was paid away.
    Unfavorable,
    /// The primary asset is not part of this pool.
    Neutral,
}

/// Decides how a classified trade is presented relative to the primary asset.
pub fn sentiment(direction: SwapDirection, pool: &Pool, primary: &PrimaryAsset) -> Sentiment {
    match pool.side_of(primary.symbol()) {
        Some(side) if side == direction.output_side() => Sentiment::Favorable,
        Some(_) => Sentiment::Unfavorable,
        None => Sentiment::Neutral,
    }
}

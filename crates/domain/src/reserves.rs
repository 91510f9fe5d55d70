//! Running reserve estimate.
//!
//! The tracker is seeded from an authoritative `getReserves()` read and then moved by
//! each settled swap's net delta. It is an approximation: any missed event makes it
//! drift, and nothing here reconciles with the chain. Callers should reseed after every
//! reconnect and treat `events_since_seed` as the staleness measure.

use crate::entities::{Pool, SwapEvent};
use crate::error::DomainError;
use crate::math::constant_product;
use crate::metrics::LiquiditySnapshot;
use crate::value_objects::{Amount, Ratio};
use primitive_types::U256;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReserveTracker {
    reserve_a: U256,
    reserve_b: U256,
    events_since_seed: u64,
}

impl ReserveTracker {
    pub fn seed(reserve_a: U256, reserve_b: U256) -> Self {
        Self {
            reserve_a,
            reserve_b,
            events_since_seed: 0,
        }
    }

    pub fn from_snapshot(snapshot: &LiquiditySnapshot) -> Self {
        Self::seed(snapshot.reserve_a, snapshot.reserve_b)
    }

    /// Replaces the estimate with authoritative values.
    pub fn reseed(&mut self, reserve_a: U256, reserve_b: U256) {
        *self = Self::seed(reserve_a, reserve_b);
    }

    pub fn reserves(&self) -> (U256, U256) {
        (self.reserve_a, self.reserve_b)
    }

    pub fn events_since_seed(&self) -> u64 {
        self.events_since_seed
    }

    /// Adds `in - out` for each asset. On drift below zero the estimate is left as it was.
    pub fn apply(&mut self, event: &SwapEvent, pool: &Pool) -> Result<(), DomainError> {
        let reserve_a = shift(
            self.reserve_a,
            event.amount_a_in,
            event.amount_a_out,
            &pool.token_a.symbol,
        )?;
        let reserve_b = shift(
            self.reserve_b,
            event.amount_b_in,
            event.amount_b_out,
            &pool.token_b.symbol,
        )?;

        self.reserve_a = reserve_a;
        self.reserve_b = reserve_b;
        self.events_since_seed += 1;
        Ok(())
    }

    /// Spot price of A in units of B from the current estimate.
    pub fn price_a_in_b(&self, pool: &Pool) -> Result<Ratio, DomainError> {
        constant_product::spot_price(
            Amount::new(self.reserve_a, pool.token_a.decimals),
            Amount::new(self.reserve_b, pool.token_b.decimals),
        )
    }
}

fn shift(reserve: U256, inflow: U256, outflow: U256, symbol: &str) -> Result<U256, DomainError> {
    reserve
        .checked_add(inflow)
        .ok_or(DomainError::Overflow("running reserve"))?
        .checked_sub(outflow)
        .ok_or_else(|| DomainError::ReserveDrift {
            symbol: symbol.to_string(),
            reserve,
            outflow,
        })
}

//! Read-only views of a pool's reserves and oracle state.

use core::fmt;

use alloy_primitives::U256;

use super::Amount;

/// Stable index of a pool inside the registry arena.
///
/// Pools refer to their sibling by `PoolId` rather than by reference; the
/// registry resolves the id at call time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PoolId(usize);

impl PoolId {
    pub(crate) const fn new(index: usize) -> Self {
        Self(index)
    }

    /// Position in the registry arena.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for PoolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "pool#{}", self.0)
    }
}

/// Reserves of a directional pool as of its last update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Reserves {
    /// Reserve of the token flowing in.
    pub reserve_in: Amount,
    /// Reserve of the token flowing out.
    pub reserve_out: Amount,
    /// Block timestamp (mod 2^32) of the last update.
    pub block_timestamp_last: u32,
}

impl Reserves {
    /// `reserve_in * reserve_out` in 256 bits.
    #[must_use]
    pub fn k(&self) -> U256 {
        self.reserve_in.to_u256() * self.reserve_out.to_u256()
    }

    /// `true` when either side is empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.reserve_in.is_zero() || self.reserve_out.is_zero()
    }
}

/// Price accumulators and the fee baseline of a pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct OracleSnapshot {
    /// Σ elapsed · UQ112.112(reserve_out / reserve_in).
    pub price_in_cumulative: U256,
    /// Σ elapsed · UQ112.112(reserve_in / reserve_out).
    pub price_out_cumulative: U256,
    /// `reserve_in * reserve_out` after the last mint or burn.
    pub k_last: U256,
}

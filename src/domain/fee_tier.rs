//! Swap fee tier built on [`BasisPoints`].

use core::fmt;

use alloy_primitives::U256;
use serde::{Deserialize, Serialize};

use super::BasisPoints;

/// The fee a pool keeps from every swap input, in basis points.
///
/// The pool never transfers the fee anywhere: it stays in the reserves and
/// shows up as K growth.  The swap invariant and the router formulas scale
/// everything by [`BasisPoints::DENOMINATOR`], so the default 30 bp tier
/// reproduces the classic `997 / 1000` arithmetic bit-for-bit.
///
/// # Examples
///
/// ```
/// use dualpool_amm::domain::{BasisPoints, FeeTier};
///
/// let tier = FeeTier::DEFAULT_SWAP;
/// assert_eq!(tier.basis_points().get(), 30);
/// assert!(FeeTier::new(BasisPoints::new(10_000)).complement().is_none());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeeTier(BasisPoints);

impl FeeTier {
    /// Fee-free swaps (plain `x · y = k`).
    pub const ZERO: Self = Self(BasisPoints::ZERO);

    /// 0.30% fee, the exchange default. Selling `1e18` into `(5e18, 10e18)`
    /// yields `1662497915624478906` here and `1666666666666666666` at
    /// [`FeeTier::ZERO`].
    pub const DEFAULT_SWAP: Self = Self(BasisPoints::new(30));

    /// Creates a new `FeeTier` from arbitrary [`BasisPoints`].
    pub const fn new(basis_points: BasisPoints) -> Self {
        Self(basis_points)
    }

    /// Returns the underlying [`BasisPoints`].
    #[must_use]
    pub const fn basis_points(&self) -> BasisPoints {
        self.0
    }

    /// Fee numerator as a 256-bit integer.
    #[must_use]
    pub fn numerator(&self) -> U256 {
        self.0.to_u256()
    }

    /// `10_000 - fee`, the share of the input that prices the swap.
    ///
    /// Returns `None` for fees of 100% or more, which make every swap
    /// impossible.
    #[must_use]
    pub fn complement(&self) -> Option<U256> {
        match self.0.complement() {
            Some(c) if c.get() != 0 => Some(c.to_u256()),
            _ => None,
        }
    }
}

impl Default for FeeTier {
    fn default() -> Self {
        Self::DEFAULT_SWAP
    }
}

impl fmt::Display for FeeTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FeeTier({})", self.0)
    }
}

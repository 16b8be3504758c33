//! Liquidity-share units of a directional pool.

use core::fmt;

use alloy_primitives::U256;
use serde::{Deserialize, Serialize};

/// Liquidity-share units minted by a pool.
///
/// This is distinct from [`Amount`](super::Amount) because it measures a
/// claim on both reserves of one pool, not a quantity of a specific token.
/// The first mint of every pool locks [`Liquidity::MINIMUM`] at the zero
/// address, so a live pool never reports a supply below it.
///
/// # Examples
///
/// ```
/// use dualpool_amm::domain::Liquidity;
///
/// let a = Liquidity::new(1_000);
/// let b = Liquidity::new(2_000);
/// assert_eq!(a.checked_add(&b), Some(Liquidity::new(3_000)));
/// assert_eq!(Liquidity::MINIMUM.get(), 1_000);
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Liquidity(u128);

impl Liquidity {
    /// No liquidity.
    pub const ZERO: Self = Self(0);

    /// Shares permanently locked on the first mint of a pool.
    pub const MINIMUM: Self = Self(1_000);

    /// Largest representable amount; as an allowance it never decreases.
    pub const MAX: Self = Self(u128::MAX);

    /// Creates a new `Liquidity` from a raw `u128` value.
    pub const fn new(value: u128) -> Self {
        Self(value)
    }

    /// Returns the underlying `u128` value.
    #[must_use]
    pub const fn get(&self) -> u128 {
        self.0
    }

    /// Returns `true` if the liquidity is zero.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Widens to a 256-bit integer.
    #[must_use]
    pub fn to_u256(self) -> U256 {
        U256::from(self.0)
    }

    /// Narrows a 256-bit value; `None` if it does not fit in `u128`.
    #[must_use]
    pub fn from_u256(value: U256) -> Option<Self> {
        u128::try_from(value).ok().map(Self)
    }

    /// Checked addition. Returns `None` on overflow.
    #[must_use]
    pub const fn checked_add(&self, other: &Self) -> Option<Self> {
        match self.0.checked_add(other.0) {
            Some(v) => Some(Self(v)),
            None => None,
        }
    }

    /// Checked subtraction. Returns `None` on underflow.
    #[must_use]
    pub const fn checked_sub(&self, other: &Self) -> Option<Self> {
        match self.0.checked_sub(other.0) {
            Some(v) => Some(Self(v)),
            None => None,
        }
    }
}

impl fmt::Display for Liquidity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

//! 256-bit helpers: integer square root and `a * b / d`.
//!
//! Reserves are capped at `2^112 - 1`, so every product of two reserves or
//! a reserve and a share supply fits comfortably in [`U256`].  All helpers
//! truncate toward zero; the pool invariant checks depend on that direction.

use alloy_primitives::U256;

use super::CheckedArithmetic;
use crate::error::AmmError;

/// Integer square root via the Babylonian method, rounded down.
///
/// `sqrt(0) = 0` and `sqrt(1..=3) = 1`.
///
/// # Examples
///
/// ```
/// use alloy_primitives::U256;
/// use dualpool_amm::math::sqrt;
///
/// assert_eq!(sqrt(U256::from(16u8)), U256::from(4u8));
/// assert_eq!(sqrt(U256::from(15u8)), U256::from(3u8));
/// ```
#[must_use]
pub fn sqrt(y: U256) -> U256 {
    let three = U256::from(3u8);
    if y > three {
        let mut z = y;
        // y / 2 + 1 never overflows and is >= sqrt(y) for y > 3.
        let mut x = (y >> 1) + U256::from(1u8);
        while x < z {
            z = x;
            x = (y / x + x) >> 1;
        }
        z
    } else if y.is_zero() {
        U256::ZERO
    } else {
        U256::from(1u8)
    }
}

/// Computes `a * b / d` with a checked 256-bit product, rounding down.
///
/// # Errors
///
/// - [`AmmError::Overflow`] if `a * b` exceeds 256 bits.
/// - [`AmmError::DivisionByZero`] if `d` is zero.
pub fn mul_div(a: U256, b: U256, d: U256) -> Result<U256, AmmError> {
    a.safe_mul(&b)?.safe_div(&d)
}

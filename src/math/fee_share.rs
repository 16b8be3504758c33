//! Liquidity minted to fee recipients out of constant-product growth.
//!
//! When `sqrt(k)` has grown from `root_k_last` to `root_k`, the blended
//! fee term is
//!
//! ```text
//! numerator   = S * (root_k - root_k_last) * 6
//! denominator = root_k * 11 + root_k_last
//! ```
//!
//! The pair creator receives `numerator / (denominator * 10)` and the
//! protocol `numerator / (denominator * 15)`. Both use the same pre-fee
//! supply `S`.

use alloy_primitives::U256;

use super::CheckedArithmetic;
use crate::domain::Liquidity;
use crate::error::AmmError;

/// `N` of the blended growth term.
pub const BLENDED_NUMERATOR: u32 = 6;

/// `D` of the blended growth term.
pub const BLENDED_DENOMINATOR: u32 = 11;

/// Divisor of the blended term paid to the protocol `fee_to` address.
pub const PROTOCOL_DIVISOR: u32 = 15;

/// Divisor of the blended term paid to the pair owner.
pub const CREATOR_DIVISOR: u32 = 10;

/// Shares to mint for `1/divisor` of the blended growth term.
///
/// Returns zero when there is no growth or no supply.
///
/// # Errors
///
/// Returns [`AmmError::Overflow`] if an intermediate exceeds 256 bits or the
/// result does not fit in `u128`, and [`AmmError::DivisionByZero`] for a zero
/// divisor.
pub fn fee_share(
    total_supply: Liquidity,
    root_k: U256,
    root_k_last: U256,
    divisor: u32,
) -> Result<Liquidity, AmmError> {
    if root_k <= root_k_last || total_supply.is_zero() {
        return Ok(Liquidity::ZERO);
    }
    let numerator = total_supply
        .to_u256()
        .safe_mul(&root_k.safe_sub(&root_k_last)?)?
        .safe_mul(&U256::from(BLENDED_NUMERATOR))?;
    let denominator = root_k
        .safe_mul(&U256::from(BLENDED_DENOMINATOR))?
        .safe_add(&root_k_last)?
        .safe_mul(&U256::from(divisor))?;
    let share = numerator.safe_div(&denominator)?;
    Liquidity::from_u256(share).ok_or(AmmError::Overflow("fee share exceeds u128"))
}

/// Shares owed to the protocol fee recipient.
///
/// # Errors
///
/// See [`fee_share`].
pub fn protocol_fee_liquidity(
    total_supply: Liquidity,
    root_k: U256,
    root_k_last: U256,
) -> Result<Liquidity, AmmError> {
    fee_share(total_supply, root_k, root_k_last, PROTOCOL_DIVISOR)
}

/// Shares owed to the pair creator.
///
/// # Errors
///
/// See [`fee_share`].
pub fn creator_fee_liquidity(
    total_supply: Liquidity,
    root_k: U256,
    root_k_last: U256,
) -> Result<Liquidity, AmmError> {
    fee_share(total_supply, root_k, root_k_last, CREATOR_DIVISOR)
}

//! Pair quoting formulas: `quote`, `get_amount_out`, `get_amount_in`.
//!
//! These are the exact integer formulas the router uses to size trades and
//! the pool implicitly enforces through its swap invariant.  All division
//! truncates; `get_amount_in` adds one afterwards so the returned input is
//! always sufficient.
//!
//! # Fee scaling
//!
//! The fee is expressed in basis points, so the formulas are scaled by
//! `10 000` rather than `1 000`.  For the default 30 bp fee this is the
//! `997 / 1000` arithmetic multiplied through by ten, which leaves every
//! floor result unchanged.

use alloy_primitives::U256;

use super::{mul_div, CheckedArithmetic};
use crate::domain::{Amount, BasisPoints, FeeTier};
use crate::error::AmmError;

/// Given some amount of an asset and pair reserves, returns the equivalent
/// amount of the other asset: `amount_a * reserve_b / reserve_a`.
///
/// # Errors
///
/// - [`AmmError::InsufficientAmount`] if `amount_a` is zero.
/// - [`AmmError::InsufficientLiquidity`] if either reserve is zero.
/// - [`AmmError::Overflow`] if the result does not fit in `u128`.
pub fn quote(amount_a: Amount, reserve_a: Amount, reserve_b: Amount) -> Result<Amount, AmmError> {
    if amount_a.is_zero() {
        return Err(AmmError::InsufficientAmount);
    }
    if reserve_a.is_zero() || reserve_b.is_zero() {
        return Err(AmmError::InsufficientLiquidity);
    }
    let out = mul_div(amount_a.to_u256(), reserve_b.to_u256(), reserve_a.to_u256())?;
    Amount::from_u256(out).ok_or(AmmError::Overflow("quote result exceeds u128"))
}

/// Maximum output for `amount_in` at the default 0.30% fee.
///
/// # Examples
///
/// ```
/// use dualpool_amm::domain::Amount;
/// use dualpool_amm::math::get_amount_out;
///
/// let e18 = 1_000_000_000_000_000_000u128;
/// let out = get_amount_out(Amount::new(e18), Amount::new(5 * e18), Amount::new(10 * e18))
///     .expect("valid reserves");
/// assert_eq!(out, Amount::new(1_662_497_915_624_478_906));
/// ```
///
/// The fee-free figure for the same trade, `1_666_666_666_666_666_666`,
/// needs [`get_amount_out_with_fee`] with [`FeeTier::ZERO`].
///
/// # Errors
///
/// See [`get_amount_out_with_fee`].
pub fn get_amount_out(
    amount_in: Amount,
    reserve_in: Amount,
    reserve_out: Amount,
) -> Result<Amount, AmmError> {
    get_amount_out_with_fee(amount_in, reserve_in, reserve_out, FeeTier::DEFAULT_SWAP)
}

/// Maximum output for `amount_in` after deducting `fee`:
///
/// ```text
/// in_with_fee = amount_in * (10_000 - fee)
/// amount_out  = in_with_fee * reserve_out / (reserve_in * 10_000 + in_with_fee)
/// ```
///
/// # Errors
///
/// - [`AmmError::InsufficientInputAmount`] if `amount_in` is zero.
/// - [`AmmError::InsufficientLiquidity`] if either reserve is zero.
/// - [`AmmError::InvalidConfiguration`] if the fee is 100% or more.
pub fn get_amount_out_with_fee(
    amount_in: Amount,
    reserve_in: Amount,
    reserve_out: Amount,
    fee: FeeTier,
) -> Result<Amount, AmmError> {
    if amount_in.is_zero() {
        return Err(AmmError::InsufficientInputAmount);
    }
    if reserve_in.is_zero() || reserve_out.is_zero() {
        return Err(AmmError::InsufficientLiquidity);
    }
    let complement = fee
        .complement()
        .ok_or(AmmError::InvalidConfiguration("swap fee must be below 100%"))?;
    let in_with_fee = amount_in.to_u256().safe_mul(&complement)?;
    let numerator = in_with_fee.safe_mul(&reserve_out.to_u256())?;
    let denominator = reserve_in
        .to_u256()
        .safe_mul(&denominator_scale())?
        .safe_add(&in_with_fee)?;
    let out = numerator.safe_div(&denominator)?;
    Amount::from_u256(out).ok_or(AmmError::Overflow("amount out exceeds u128"))
}

/// Minimum input that buys `amount_out` at the default 0.30% fee.
///
/// # Errors
///
/// See [`get_amount_in_with_fee`].
pub fn get_amount_in(
    amount_out: Amount,
    reserve_in: Amount,
    reserve_out: Amount,
) -> Result<Amount, AmmError> {
    get_amount_in_with_fee(amount_out, reserve_in, reserve_out, FeeTier::DEFAULT_SWAP)
}

/// Minimum input that buys `amount_out` after deducting `fee`:
///
/// ```text
/// amount_in = reserve_in * amount_out * 10_000 / ((reserve_out - amount_out) * (10_000 - fee)) + 1
/// ```
///
/// # Errors
///
/// - [`AmmError::InsufficientOutputAmount`] if `amount_out` is zero.
/// - [`AmmError::InsufficientLiquidity`] if either reserve is zero or
///   `amount_out >= reserve_out`.
/// - [`AmmError::InvalidConfiguration`] if the fee is 100% or more.
pub fn get_amount_in_with_fee(
    amount_out: Amount,
    reserve_in: Amount,
    reserve_out: Amount,
    fee: FeeTier,
) -> Result<Amount, AmmError> {
    if amount_out.is_zero() {
        return Err(AmmError::InsufficientOutputAmount);
    }
    if reserve_in.is_zero() || reserve_out.is_zero() || amount_out >= reserve_out {
        return Err(AmmError::InsufficientLiquidity);
    }
    let complement = fee
        .complement()
        .ok_or(AmmError::InvalidConfiguration("swap fee must be below 100%"))?;
    let numerator = reserve_in
        .to_u256()
        .safe_mul(&amount_out.to_u256())?
        .safe_mul(&denominator_scale())?;
    let denominator = reserve_out
        .safe_sub(&amount_out)?
        .to_u256()
        .safe_mul(&complement)?;
    let amount_in = numerator.safe_div(&denominator)?.safe_add(&U256::from(1u8))?;
    Amount::from_u256(amount_in).ok_or(AmmError::Overflow("amount in exceeds u128"))
}

fn denominator_scale() -> U256 {
    U256::from(BasisPoints::DENOMINATOR)
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    const E18: u128 = 1_000_000_000_000_000_000;

    fn a(v: u128) -> Amount {
        Amount::new(v)
    }

    // -- quote ----------------------------------------------------------------

    #[test]
    fn quote_proportional() {
        assert_eq!(quote(a(1), a(100), a(200)), Ok(a(2)));
        assert_eq!(quote(a(E18), a(4 * E18), a(E18)), Ok(a(E18 / 4)));
    }

    #[test]
    fn quote_errors() {
        assert_eq!(quote(a(0), a(100), a(200)), Err(AmmError::InsufficientAmount));
        assert_eq!(quote(a(1), a(0), a(200)), Err(AmmError::InsufficientLiquidity));
        assert_eq!(quote(a(1), a(100), a(0)), Err(AmmError::InsufficientLiquidity));
    }

    // -- get_amount_out -------------------------------------------------------

    #[test]
    fn amount_out_default_fee() {
        assert_eq!(get_amount_out(a(2), a(100), a(100)), Ok(a(1)));
        assert_eq!(
            get_amount_out(a(E18), a(5 * E18), a(10 * E18)),
            Ok(a(1_662_497_915_624_478_906))
        );
    }

    #[test]
    fn amount_out_fee_free() {
        assert_eq!(
            get_amount_out_with_fee(a(E18), a(5 * E18), a(10 * E18), FeeTier::ZERO),
            Ok(a(1_666_666_666_666_666_666))
        );
    }

    #[test]
    fn amount_out_errors() {
        assert_eq!(
            get_amount_out(a(0), a(100), a(100)),
            Err(AmmError::InsufficientInputAmount)
        );
        assert_eq!(
            get_amount_out(a(2), a(0), a(100)),
            Err(AmmError::InsufficientLiquidity)
        );
        assert_eq!(
            get_amount_out(a(2), a(100), a(0)),
            Err(AmmError::InsufficientLiquidity)
        );
        let full = FeeTier::new(BasisPoints::MAX_PERCENT);
        let Err(AmmError::InvalidConfiguration(_)) =
            get_amount_out_with_fee(a(2), a(100), a(100), full)
        else {
            panic!("expected InvalidConfiguration");
        };
    }

    // -- get_amount_in --------------------------------------------------------

    #[test]
    fn amount_in_default_fee() {
        assert_eq!(get_amount_in(a(1), a(100), a(100)), Ok(a(2)));
    }

    #[test]
    fn amount_in_errors() {
        assert_eq!(
            get_amount_in(a(0), a(100), a(100)),
            Err(AmmError::InsufficientOutputAmount)
        );
        assert_eq!(
            get_amount_in(a(1), a(0), a(100)),
            Err(AmmError::InsufficientLiquidity)
        );
        assert_eq!(
            get_amount_in(a(1), a(100), a(0)),
            Err(AmmError::InsufficientLiquidity)
        );
        assert_eq!(
            get_amount_in(a(100), a(100), a(100)),
            Err(AmmError::InsufficientLiquidity)
        );
    }

    #[test]
    fn thirty_bp_matches_per_mille_formula() {
        // 997/1000 reference computed with plain u128 arithmetic.
        let (x, r_in, r_out) = (12_345u128, 1_000_000u128, 3_000_000u128);
        let reference = x * 997 * r_out / (r_in * 1000 + x * 997);
        assert_eq!(get_amount_out(a(x), a(r_in), a(r_out)), Ok(a(reference)));
        let reference_in = r_in * x * 1000 / ((r_out - x) * 997) + 1;
        assert_eq!(get_amount_in(a(x), a(r_in), a(r_out)), Ok(a(reference_in)));
    }
}

//! UQ112.112 fixed-point encoding for the price accumulators.
//!
//! A reserve below `2^112` shifted left by 112 bits fits in 224 bits, so
//! `encode(r) / r'` always fits in a [`U256`] and the accumulators only ever
//! overflow through deliberate wrapping addition.

use alloy_primitives::U256;

use crate::domain::Amount;

/// Number of fractional bits.
pub const RESOLUTION: usize = 112;

/// Encodes `value` as UQ112.112 (`value << 112`).
#[must_use]
pub fn encode(value: Amount) -> U256 {
    value.to_u256() << RESOLUTION
}

/// Divides a UQ112.112 number by an integer, returning UQ112.112.
///
/// Returns `None` when `divisor` is zero.
#[must_use]
pub fn uqdiv(encoded: U256, divisor: Amount) -> Option<U256> {
    encoded.checked_div(divisor.to_u256())
}

/// `elapsed * (encode(numerator) / denominator)`, wrapping on overflow.
///
/// Returns zero when `denominator` is zero, leaving the accumulator unchanged.
#[must_use]
pub fn price_increment(numerator: Amount, denominator: Amount, elapsed: u32) -> U256 {
    uqdiv(encode(numerator), denominator)
        .map(|price| price.wrapping_mul(U256::from(elapsed)))
        .unwrap_or_default()
}

//! Exact integer arithmetic for the dual-pool engine.
//!
//! Everything here floors. Reserves and supplies are `u128`; any product of
//! two of them is formed in [`alloy_primitives::U256`] and checked.
//!
//! - [`CheckedArithmetic`]: fallible `+ - * /` for domain newtypes and `U256`
//! - [`quote`], [`get_amount_out`], [`get_amount_in`]: pair pricing
//! - [`sqrt`], [`mul_div`]: 256-bit helpers
//! - [`uq112x112`]: oracle price encoding
//! - [`protocol_fee_liquidity`], [`creator_fee_liquidity`]: fee-share mints

mod amounts;
mod checked;
mod fee_share;
pub mod uq112x112;
mod wide;

pub use amounts::{
    get_amount_in, get_amount_in_with_fee, get_amount_out, get_amount_out_with_fee, quote,
};
pub use checked::CheckedArithmetic;
pub use fee_share::{
    creator_fee_liquidity, fee_share, protocol_fee_liquidity, BLENDED_DENOMINATOR,
    BLENDED_NUMERATOR, CREATOR_DIVISOR, PROTOCOL_DIVISOR,
};
pub use wide::{mul_div, sqrt};

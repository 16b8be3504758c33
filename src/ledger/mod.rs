//! In-memory ledgers standing in for on-chain token contracts.
//!
//! - [`TokenBank`]: every external token the pools trade
//! - [`ShareLedger`]: the liquidity token of one pool

mod shares;
mod tokens;

pub use shares::ShareLedger;
pub use tokens::TokenBank;

//! Declarative, validated configuration.
//!
//! [`ExchangeConfig`] fixes the exchange-wide addresses and economic
//! defaults; [`PairSettings`] carries the owner, arbitrage trigger and
//! [`OracleMode`] shared by the two pools of a pair.  Both are
//! deserializable and validate on construction.

mod exchange_config;
mod pair_settings;

pub use exchange_config::ExchangeConfig;
pub use pair_settings::{OracleMode, PairSettings};

//! Convenience re-exports for common types and traits.
//!
//! ```rust
//! use dualpool_amm::prelude::*;
//! ```

pub use crate::domain::{
    Address, Amount, BasisPoints, Direction, Event, FeeTier, Liquidity, LogEntry, OracleSnapshot,
    Reserves, TokenPair,
};

pub use crate::traits::{AccountTokens, OwnerOnly, PairAuthority, SwapCallee, TokenLedger};

pub use crate::math::CheckedArithmetic;

pub use crate::config::{ExchangeConfig, OracleMode, PairSettings};

pub use crate::error::{AmmError, Result};

pub use crate::exchange::Exchange;

pub use crate::router::{AddLiquidity, LiquidityAdded, LiquidityRemoved, RemoveLiquidity, Router};

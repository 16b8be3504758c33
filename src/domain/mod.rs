//! Fundamental domain value types used throughout the engine.
//!
//! This module contains the value types that model the dual-pool domain:
//! amounts, liquidity shares, basis points, token pairs and flow
//! directions, pool identifiers, reserve and oracle views, and events.
//! Numeric types are newtypes over `u128`; 256-bit intermediates use
//! [`alloy_primitives::U256`].

mod amount;
mod basis_points;
mod event;
mod fee_tier;
mod liquidity;
mod pool_state;
mod token_pair;

pub use alloy_primitives::Address;

pub use amount::Amount;
pub use basis_points::BasisPoints;
pub use event::{Event, EventLog, LogEntry};
pub use fee_tier::FeeTier;
pub use liquidity::Liquidity;
pub use pool_state::{OracleSnapshot, PoolId, Reserves};
pub use token_pair::{Direction, TokenPair};

//! Directional pools and the arbitrage engine that couples each pair.
//!
//! Every token pair is served by two [`DirectionalPool`]s: `Aab` sells
//! token1 for token0 and `Abb` sells token0 for token1.  A swap on either
//! pool first lets [`arbitrage`] move liquidity between the two when their
//! prices drift apart by more than the pair's trigger rate.

pub mod arbitrage;
mod context;
mod directional;

pub use arbitrage::ArbitragePlan;
pub use context::PoolContext;
pub use directional::DirectionalPool;

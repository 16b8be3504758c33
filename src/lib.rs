//! # Dual-Pool AMM
//!
//! Constant-product exchange where every token pair is served by **two**
//! directional pools, one per flow direction, kept in line by an internal
//! arbitrage step.
//!
//! Each [`DirectionalPool`](pools::DirectionalPool) behaves like a Uniswap
//! v2 pair that only sells its output token: reserves, liquidity shares,
//! a wrapping UQ112.112 TWAP oracle and fee-share minting on `sqrt(k)`
//! growth.  Before a swap settles, the pool compares its price with its
//! sibling's and, if they drifted apart by more than the pair's trigger
//! rate, trades with the sibling until both quote the same price.
//!
//! # Quick Start
//!
//! ```rust
//! use dualpool_amm::prelude::*;
//!
//! let admin = Address::repeat_byte(0xad);
//! let alice = Address::repeat_byte(0xa1);
//! let (usdc, weth) = (Address::repeat_byte(0x01), Address::repeat_byte(0x02));
//!
//! // 1. Deploy the exchange (30 bp swap fee, 10 bp arbitrage trigger).
//! //    Use `config.with_swap_fee(FeeTier::ZERO)` for plain x·y=k quotes.
//! let config = ExchangeConfig::deployed_by(admin).expect("valid config");
//! let mut exchange = Exchange::new(config).expect("exchange");
//!
//! // 2. Fund Alice and let the router spend her tokens
//! let router = exchange.config().router();
//! exchange.mint_tokens(usdc, alice, Amount::new(3_000_000_000)).expect("faucet");
//! exchange.mint_tokens(weth, alice, Amount::new(2_000_000)).expect("faucet");
//! exchange.approve(usdc, alice, router, Amount::MAX);
//! exchange.approve(weth, alice, router, Amount::MAX);
//!
//! // 3. Seed both pools of the pair, half of each token per pool
//! let deposit = AddLiquidity::new(
//!     usdc, weth, Amount::new(2_000_000_000), Amount::new(1_000_000), 50, alice, u64::MAX,
//! );
//! exchange.router().add_liquidity(alice, &deposit).expect("liquidity");
//!
//! // 4. Sell 1 000 000 USDC for WETH
//! let amounts = exchange
//!     .router()
//!     .swap_exact_tokens_for_tokens(alice, Amount::new(1_000_000), Amount::ZERO, &[usdc, weth], alice, u64::MAX)
//!     .expect("swap");
//! assert!(amounts[1] > Amount::ZERO);
//! ```
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │   Exchange   │  atomic calls over TokenBank + PoolRegistry + EventLog
//! └──────┬──────┘
//!        │ router() / create_update_pair / mint / burn / swap
//!        ▼
//! ┌─────────────┐
//! │ Router       │  ratio split, slippage guards, multi-hop paths
//! │ PoolRegistry │  pair creation, address derivation, fee recipient
//! └──────┬──────┘
//!        │ PoolContext
//!        ▼
//! ┌─────────────┐
//! │    Pools     │  DirectionalPool ×2 per pair, arbitrage between them
//! └──────┬──────┘
//!        │
//!        ▼
//! ┌─────────────┐
//! │ Math, Domain │  UQ112.112, sqrt, quotes, Amount, Liquidity, events
//! └─────────────┘
//! ```
//!
//! # Module Guide
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`domain`] | Value types: [`Amount`](domain::Amount), [`Liquidity`](domain::Liquidity), [`TokenPair`](domain::TokenPair), events |
//! | [`math`] | Checked arithmetic, pricing, `sqrt`, UQ112.112, fee shares |
//! | [`traits`] | [`TokenLedger`](traits::TokenLedger), [`SwapCallee`](traits::SwapCallee), [`PairAuthority`](traits::PairAuthority) |
//! | [`config`] | [`ExchangeConfig`](config::ExchangeConfig), [`PairSettings`](config::PairSettings) |
//! | [`ledger`] | In-memory [`TokenBank`](ledger::TokenBank) and [`ShareLedger`](ledger::ShareLedger) |
//! | [`pools`] | [`DirectionalPool`](pools::DirectionalPool) and the [`arbitrage`](pools::arbitrage) engine |
//! | [`factory`] | [`PoolRegistry`](factory::PoolRegistry) |
//! | [`router`] | [`Router`](router::Router) entry points and estimators |
//! | [`exchange`] | [`Exchange`](exchange::Exchange) transactional facade |
//! | [`error`] | [`AmmError`](error::AmmError) unified error enum |
//! | [`prelude`] | Convenience re-exports |

pub mod config;
pub mod domain;
pub mod error;
pub mod exchange;
pub mod factory;
pub mod ledger;
pub mod math;
pub mod pools;
pub mod prelude;
pub mod router;
pub mod traits;

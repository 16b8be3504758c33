//! Router: liquidity provisioning across both pools of a pair, and
//! multi-hop swaps.
//!
//! Every entry point checks its deadline before anything else and runs as a
//! single exchange transaction.  Tokens move straight from the caller to the
//! pools on the router's allowance; the router itself never holds funds.
//!
//! # Pools of a call
//!
//! For a call naming `(token_a, token_b)`, *AAB* is the pool where token A
//! flows in and token B flows out, *ABB* the opposite one.

mod liquidity;
mod quotes;
mod swaps;

use alloy_primitives::Address;

use crate::domain::{Amount, Liquidity};
use crate::error::AmmError;
use crate::exchange::Exchange;

pub use crate::math::{get_amount_in, get_amount_out, quote};
pub use quotes::{estimate_amounts_in, estimate_amounts_out, projected_reserves};

/// Deposit request for [`Router::add_liquidity`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddLiquidity {
    /// First token.
    pub token_a: Address,
    /// Second token.
    pub token_b: Address,
    /// Most token A the caller is willing to deposit.
    pub amount_a_desired: Amount,
    /// Most token B the caller is willing to deposit.
    pub amount_b_desired: Amount,
    /// Least total token A that must be deposited.
    pub amount_a_min: Amount,
    /// Least total token B that must be deposited.
    pub amount_b_min: Amount,
    /// Percentage (0..=100) of each desired amount aimed at pool AAB.
    pub ratio: u8,
    /// Recipient of the minted shares.
    pub to: Address,
    /// Last valid timestamp.
    pub deadline: u64,
}

impl AddLiquidity {
    /// Request without slippage bounds.
    #[must_use]
    pub const fn new(
        token_a: Address,
        token_b: Address,
        amount_a_desired: Amount,
        amount_b_desired: Amount,
        ratio: u8,
        to: Address,
        deadline: u64,
    ) -> Self {
        Self {
            token_a,
            token_b,
            amount_a_desired,
            amount_b_desired,
            amount_a_min: Amount::ZERO,
            amount_b_min: Amount::ZERO,
            ratio,
            to,
            deadline,
        }
    }

    /// Sets the minimum totals.
    #[must_use]
    pub const fn with_minimums(mut self, amount_a_min: Amount, amount_b_min: Amount) -> Self {
        self.amount_a_min = amount_a_min;
        self.amount_b_min = amount_b_min;
        self
    }
}

/// Outcome of [`Router::add_liquidity`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LiquidityAdded {
    /// Token A deposited across both pools.
    pub amount_a: Amount,
    /// Token B deposited across both pools.
    pub amount_b: Amount,
    /// Shares minted by pool AAB.
    pub liquidity_aab: Liquidity,
    /// Shares minted by pool ABB.
    pub liquidity_abb: Liquidity,
}

/// Withdrawal request for [`Router::remove_liquidity`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RemoveLiquidity {
    /// First token.
    pub token_a: Address,
    /// Second token.
    pub token_b: Address,
    /// Shares of pool AAB to burn.
    pub liquidity_aab: Liquidity,
    /// Shares of pool ABB to burn.
    pub liquidity_abb: Liquidity,
    /// Least total token A to receive.
    pub amount_a_min: Amount,
    /// Least total token B to receive.
    pub amount_b_min: Amount,
    /// Recipient of the withdrawn tokens.
    pub to: Address,
    /// Last valid timestamp.
    pub deadline: u64,
}

impl RemoveLiquidity {
    /// Request without slippage bounds.
    #[must_use]
    pub const fn new(
        token_a: Address,
        token_b: Address,
        liquidity_aab: Liquidity,
        liquidity_abb: Liquidity,
        to: Address,
        deadline: u64,
    ) -> Self {
        Self {
            token_a,
            token_b,
            liquidity_aab,
            liquidity_abb,
            amount_a_min: Amount::ZERO,
            amount_b_min: Amount::ZERO,
            to,
            deadline,
        }
    }

    /// Sets the minimum totals.
    #[must_use]
    pub const fn with_minimums(mut self, amount_a_min: Amount, amount_b_min: Amount) -> Self {
        self.amount_a_min = amount_a_min;
        self.amount_b_min = amount_b_min;
        self
    }
}

/// Outcome of [`Router::remove_liquidity`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LiquidityRemoved {
    /// Token A paid out across both pools.
    pub amount_a: Amount,
    /// Token B paid out across both pools.
    pub amount_b: Amount,
}

/// Router entry points bound to an [`Exchange`].
///
/// Obtained through [`Exchange::router`].
#[derive(Debug)]
pub struct Router<'a> {
    exchange: &'a mut Exchange,
}

impl<'a> Router<'a> {
    pub(crate) fn new(exchange: &'a mut Exchange) -> Self {
        Self { exchange }
    }

    /// Router address; callers approve it to move their tokens and shares.
    #[must_use]
    pub fn address(&self) -> Address {
        self.exchange.config().router()
    }

    /// Deposits into both pools of `{token_a, token_b}`, creating the pair
    /// with the caller as owner if it does not exist yet.
    ///
    /// # Errors
    ///
    /// - [`AmmError::Expired`] if the deadline passed.
    /// - [`AmmError::RatioError`] if `ratio > 100`.
    /// - [`AmmError::InsufficientAmount`] if neither pool gets both tokens.
    /// - [`AmmError::InsufficientAAmount`] / [`AmmError::InsufficientBAmount`]
    ///   if the totals fall below the minimums.
    /// - Allowance, balance and mint failures.
    pub fn add_liquidity(
        &mut self,
        caller: Address,
        params: &AddLiquidity,
    ) -> Result<LiquidityAdded, AmmError> {
        self.exchange
            .transact("add_liquidity", |tx| liquidity::add(tx, caller, params))
    }

    /// Burns the caller's shares of both pools and pays the tokens to `to`.
    ///
    /// # Errors
    ///
    /// - [`AmmError::Expired`] if the deadline passed.
    /// - [`AmmError::UnknownPool`] if the pair does not exist.
    /// - [`AmmError::InsufficientLiquidityBurned`] if both share amounts
    ///   are zero or a burn returns nothing.
    /// - [`AmmError::InsufficientAAmount`] / [`AmmError::InsufficientBAmount`]
    ///   if the totals fall below the minimums.
    pub fn remove_liquidity(
        &mut self,
        caller: Address,
        params: &RemoveLiquidity,
    ) -> Result<LiquidityRemoved, AmmError> {
        self.exchange
            .transact("remove_liquidity", |tx| liquidity::remove(tx, caller, params))
    }

    /// Sells exactly `amount_in` of `path[0]` for as much of the last token
    /// as possible.  Returns the amount at every hop.
    ///
    /// # Errors
    ///
    /// - [`AmmError::Expired`] if the deadline passed.
    /// - [`AmmError::InvalidPath`] for short paths or missing pools.
    /// - [`AmmError::InsufficientOutputAmount`] if the output would be
    ///   below `amount_out_min`.
    #[allow(clippy::too_many_arguments)]
    pub fn swap_exact_tokens_for_tokens(
        &mut self,
        caller: Address,
        amount_in: Amount,
        amount_out_min: Amount,
        path: &[Address],
        to: Address,
        deadline: u64,
    ) -> Result<Vec<Amount>, AmmError> {
        self.exchange.transact("swap_exact_tokens_for_tokens", |tx| {
            swaps::exact_in(tx, caller, amount_in, amount_out_min, path, to, deadline)
        })
    }

    /// Buys exactly `amount_out` of the last token, spending at most
    /// `amount_in_max` of `path[0]`.  Returns the amount at every hop.
    ///
    /// # Errors
    ///
    /// - [`AmmError::Expired`] if the deadline passed.
    /// - [`AmmError::InvalidPath`] for short paths or missing pools.
    /// - [`AmmError::ExcessiveInputAmount`] if the input would exceed
    ///   `amount_in_max`.
    #[allow(clippy::too_many_arguments)]
    pub fn swap_tokens_for_exact_tokens(
        &mut self,
        caller: Address,
        amount_out: Amount,
        amount_in_max: Amount,
        path: &[Address],
        to: Address,
        deadline: u64,
    ) -> Result<Vec<Amount>, AmmError> {
        self.exchange.transact("swap_tokens_for_exact_tokens", |tx| {
            swaps::exact_out(tx, caller, amount_out, amount_in_max, path, to, deadline)
        })
    }

    /// See [`estimate_amounts_out`].
    ///
    /// # Errors
    ///
    /// See [`estimate_amounts_out`].
    pub fn estimate_amounts_out(&self, amount_in: Amount, path: &[Address]) -> Result<Vec<Amount>, AmmError> {
        self.exchange.estimate_amounts_out(amount_in, path)
    }

    /// See [`estimate_amounts_in`].
    ///
    /// # Errors
    ///
    /// See [`estimate_amounts_in`].
    pub fn estimate_amounts_in(&self, amount_out: Amount, path: &[Address]) -> Result<Vec<Amount>, AmmError> {
        self.exchange.estimate_amounts_in(amount_out, path)
    }
}

fn ensure_deadline(deadline: u64, now: u64) -> Result<(), AmmError> {
    if deadline < now {
        return Err(AmmError::Expired);
    }
    Ok(())
}

//! Splitting deposits and withdrawals across the two pools of a pair.

use alloy_primitives::Address;
use tracing::debug;

use super::{ensure_deadline, AddLiquidity, LiquidityAdded, LiquidityRemoved, RemoveLiquidity};
use crate::config::{OracleMode, PairSettings};
use crate::domain::{Amount, Liquidity};
use crate::error::AmmError;
use crate::exchange::Transaction;
use crate::math::{quote, CheckedArithmetic};

/// `(floor(amount · ratio / 100), rest)`.
fn split(amount: Amount, ratio: u8) -> (Amount, Amount) {
    let ratio = u128::from(ratio);
    let value = amount.get();
    let first = (value / 100) * ratio + (value % 100) * ratio / 100;
    (Amount::new(first), Amount::new(value - first))
}

/// Amounts of `(a, b)` to deposit into a pool holding `(reserve_a,
/// reserve_b)`, or `None` if the pool gets nothing.
fn optimal_amounts(
    desired_a: Amount,
    desired_b: Amount,
    reserve_a: Amount,
    reserve_b: Amount,
) -> Result<Option<(Amount, Amount)>, AmmError> {
    if desired_a.is_zero() || desired_b.is_zero() {
        return Ok(None);
    }
    if reserve_a.is_zero() && reserve_b.is_zero() {
        return Ok(Some((desired_a, desired_b)));
    }
    let b_optimal = quote(desired_a, reserve_a, reserve_b)?;
    if b_optimal <= desired_b {
        return Ok(Some((desired_a, b_optimal)));
    }
    let a_optimal = quote(desired_b, reserve_b, reserve_a)?;
    Ok(Some((a_optimal, desired_b)))
}

pub(super) fn add(
    tx: &mut Transaction<'_>,
    caller: Address,
    params: &AddLiquidity,
) -> Result<LiquidityAdded, AmmError> {
    ensure_deadline(params.deadline, tx.now)?;
    if params.ratio > 100 {
        return Err(AmmError::RatioError(params.ratio));
    }
    let (token_a, token_b) = (params.token_a, params.token_b);
    if tx.pool_for(token_a, token_b).is_none() {
        let settings = PairSettings::new(
            caller,
            tx.config.default_trigger_rate(),
            OracleMode::Enabled,
        )?;
        tx.create_update_pair(caller, token_a, token_b, settings)?;
    }
    let pool_aab = tx.pool_for(token_a, token_b).ok_or(AmmError::UnknownPool)?;
    let pool_abb = tx.pool_for(token_b, token_a).ok_or(AmmError::UnknownPool)?;

    let (a_aab, a_abb) = split(params.amount_a_desired, params.ratio);
    let (b_aab, b_abb) = split(params.amount_b_desired, params.ratio);

    let aab = tx.registry.pool_at(pool_aab)?.get_reserves();
    let abb = tx.registry.pool_at(pool_abb)?.get_reserves();
    let deposits = [
        (pool_aab, optimal_amounts(a_aab, b_aab, aab.reserve_in, aab.reserve_out)?),
        (pool_abb, optimal_amounts(a_abb, b_abb, abb.reserve_out, abb.reserve_in)?),
    ];
    if deposits.iter().all(|(_, amounts)| amounts.is_none()) {
        return Err(AmmError::InsufficientAmount);
    }

    let (mut amount_a, mut amount_b) = (Amount::ZERO, Amount::ZERO);
    for (_, amounts) in &deposits {
        if let Some((a, b)) = amounts {
            amount_a = amount_a.safe_add(a)?;
            amount_b = amount_b.safe_add(b)?;
        }
    }
    if amount_a < params.amount_a_min {
        return Err(AmmError::InsufficientAAmount);
    }
    if amount_b < params.amount_b_min {
        return Err(AmmError::InsufficientBAmount);
    }

    let router = tx.config.router();
    let mut minted = [Liquidity::ZERO; 2];
    for ((pool, amounts), liquidity) in deposits.into_iter().zip(minted.iter_mut()) {
        let Some((a, b)) = amounts else {
            continue;
        };
        tx.tokens.transfer_from(token_a, router, caller, pool, a)?;
        tx.tokens.transfer_from(token_b, router, caller, pool, b)?;
        *liquidity = tx.mint(router, pool, params.to)?;
    }
    let [liquidity_aab, liquidity_abb] = minted;
    debug!(
        %token_a,
        %token_b,
        %amount_a,
        %amount_b,
        %liquidity_aab,
        %liquidity_abb,
        "liquidity added"
    );
    Ok(LiquidityAdded {
        amount_a,
        amount_b,
        liquidity_aab,
        liquidity_abb,
    })
}

pub(super) fn remove(
    tx: &mut Transaction<'_>,
    caller: Address,
    params: &RemoveLiquidity,
) -> Result<LiquidityRemoved, AmmError> {
    ensure_deadline(params.deadline, tx.now)?;
    let (token_a, token_b) = (params.token_a, params.token_b);
    let pool_aab = tx.pool_for(token_a, token_b).ok_or(AmmError::UnknownPool)?;
    let pool_abb = tx.pool_for(token_b, token_a).ok_or(AmmError::UnknownPool)?;
    if params.liquidity_aab.is_zero() && params.liquidity_abb.is_zero() {
        return Err(AmmError::InsufficientLiquidityBurned);
    }

    let router = tx.config.router();
    let (mut amount_a, mut amount_b) = (Amount::ZERO, Amount::ZERO);
    for (pool, liquidity, a_flows_in) in [
        (pool_aab, params.liquidity_aab, true),
        (pool_abb, params.liquidity_abb, false),
    ] {
        if liquidity.is_zero() {
            continue;
        }
        tx.with_shares(pool, |shares, log| {
            shares.transfer_from(router, caller, pool, liquidity, log)
        })?;
        let (amount_in, amount_out) = tx.burn(router, pool, params.to)?;
        let (a, b) = if a_flows_in {
            (amount_in, amount_out)
        } else {
            (amount_out, amount_in)
        };
        amount_a = amount_a.safe_add(&a)?;
        amount_b = amount_b.safe_add(&b)?;
    }
    if amount_a < params.amount_a_min {
        return Err(AmmError::InsufficientAAmount);
    }
    if amount_b < params.amount_b_min {
        return Err(AmmError::InsufficientBAmount);
    }
    debug!(%token_a, %token_b, %amount_a, %amount_b, "liquidity removed");
    Ok(LiquidityRemoved { amount_a, amount_b })
}

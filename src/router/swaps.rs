//! Multi-hop swap execution.

use alloy_primitives::Address;
use tracing::debug;

use super::{ensure_deadline, estimate_amounts_in, estimate_amounts_out};
use crate::domain::Amount;
use crate::error::AmmError;
use crate::exchange::Transaction;

pub(super) fn exact_in(
    tx: &mut Transaction<'_>,
    caller: Address,
    amount_in: Amount,
    amount_out_min: Amount,
    path: &[Address],
    to: Address,
    deadline: u64,
) -> Result<Vec<Amount>, AmmError> {
    ensure_deadline(deadline, tx.now)?;
    let amounts = estimate_amounts_out(tx.registry, tx.config.swap_fee(), amount_in, path)?;
    if amounts.last().copied().unwrap_or_default() < amount_out_min {
        return Err(AmmError::InsufficientOutputAmount);
    }
    execute(tx, caller, &amounts, path, to)?;
    Ok(amounts)
}

pub(super) fn exact_out(
    tx: &mut Transaction<'_>,
    caller: Address,
    amount_out: Amount,
    amount_in_max: Amount,
    path: &[Address],
    to: Address,
    deadline: u64,
) -> Result<Vec<Amount>, AmmError> {
    ensure_deadline(deadline, tx.now)?;
    let amounts = estimate_amounts_in(tx.registry, tx.config.swap_fee(), amount_out, path)?;
    if amounts.first().copied().unwrap_or_default() > amount_in_max {
        return Err(AmmError::ExcessiveInputAmount);
    }
    execute(tx, caller, &amounts, path, to)?;
    Ok(amounts)
}

/// Pays `amounts[0]` into the first pool, then swaps hop by hop; every
/// intermediate output goes straight to the next hop's pool.
fn execute(
    tx: &mut Transaction<'_>,
    caller: Address,
    amounts: &[Amount],
    path: &[Address],
    to: Address,
) -> Result<(), AmmError> {
    let router = tx.config.router();
    let (Some(&first_in), Some(&first_out), Some(&amount_in)) =
        (path.first(), path.get(1), amounts.first())
    else {
        return Err(AmmError::InvalidPath);
    };
    let first_pool = tx.pool_for(first_in, first_out).ok_or(AmmError::InvalidPath)?;
    tx.tokens
        .transfer_from(first_in, router, caller, first_pool, amount_in)?;

    for (hop, tokens) in path.windows(2).enumerate() {
        let &[token_in, token_out] = tokens else {
            return Err(AmmError::InvalidPath);
        };
        let pool = tx.pool_for(token_in, token_out).ok_or(AmmError::InvalidPath)?;
        let amount_out = amounts.get(hop + 1).copied().ok_or(AmmError::InvalidPath)?;
        let recipient = match path.get(hop + 2) {
            Some(&next) => tx.pool_for(token_out, next).ok_or(AmmError::InvalidPath)?,
            None => to,
        };
        tx.swap(router, pool, amount_out, recipient, None, &[])?;
        debug!(%pool, %token_in, %token_out, %amount_out, "hop settled");
    }
    Ok(())
}

//! Multi-hop amount estimation.

use alloy_primitives::Address;

use crate::domain::{Amount, FeeTier, Reserves};
use crate::error::AmmError;
use crate::factory::PoolRegistry;
use crate::math::{get_amount_in_with_fee, get_amount_out_with_fee};
use crate::pools::arbitrage;

/// Reserves the pool taking `token_in` for `token_out` will hold once its
/// next swap has rebalanced it against its sibling.
///
/// # Errors
///
/// Returns [`AmmError::InvalidPath`] if no such pool exists.
pub fn projected_reserves(
    registry: &PoolRegistry,
    token_in: Address,
    token_out: Address,
) -> Result<Reserves, AmmError> {
    let id = registry
        .pool_for(token_in, token_out)
        .ok_or(AmmError::InvalidPath)?;
    let pool = registry.pool(id)?;
    let sibling = registry.pool(pool.sibling())?;
    Ok(arbitrage::project(pool, sibling))
}

/// Amounts along `path` when selling `amount_in` of `path[0]`.
///
/// The first element is `amount_in`, the last the final output.
///
/// # Errors
///
/// - [`AmmError::InvalidPath`] if `path` has fewer than two tokens or a hop
///   has no pool.
/// - Any [`get_amount_out_with_fee`] failure.
pub fn estimate_amounts_out(
    registry: &PoolRegistry,
    fee: FeeTier,
    amount_in: Amount,
    path: &[Address],
) -> Result<Vec<Amount>, AmmError> {
    if path.len() < 2 {
        return Err(AmmError::InvalidPath);
    }
    let mut amounts = Vec::with_capacity(path.len());
    let mut current = amount_in;
    amounts.push(current);
    for hop in path.windows(2) {
        let &[token_in, token_out] = hop else {
            return Err(AmmError::InvalidPath);
        };
        let reserves = projected_reserves(registry, token_in, token_out)?;
        current = get_amount_out_with_fee(current, reserves.reserve_in, reserves.reserve_out, fee)?;
        amounts.push(current);
    }
    Ok(amounts)
}

/// Amounts along `path` when buying `amount_out` of the last token.
///
/// The first element is the required input, the last `amount_out`.
///
/// # Errors
///
/// - [`AmmError::InvalidPath`] if `path` has fewer than two tokens or a hop
///   has no pool.
/// - Any [`get_amount_in_with_fee`] failure.
pub fn estimate_amounts_in(
    registry: &PoolRegistry,
    fee: FeeTier,
    amount_out: Amount,
    path: &[Address],
) -> Result<Vec<Amount>, AmmError> {
    if path.len() < 2 {
        return Err(AmmError::InvalidPath);
    }
    let mut amounts = Vec::with_capacity(path.len());
    let mut current = amount_out;
    amounts.push(current);
    for hop in path.windows(2).rev() {
        let &[token_in, token_out] = hop else {
            return Err(AmmError::InvalidPath);
        };
        let reserves = projected_reserves(registry, token_in, token_out)?;
        current = get_amount_in_with_fee(current, reserves.reserve_in, reserves.reserve_out, fee)?;
        amounts.push(current);
    }
    amounts.reverse();
    Ok(amounts)
}

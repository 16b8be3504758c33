//! Internal rebalancing between the two directional pools of a pair.
//!
//! Let the swapping pool hold `(x_a, x_b)` and its sibling `(y_a, y_b)` of
//! `(token0, token1)`.  Their prices agree when `x_a · y_b = y_a · x_b`; the
//! signed gap is
//!
//! ```text
//! cross = x_a · y_b − y_a · x_b
//! ```
//!
//! When `|cross| · 10⁴ > trigger_rate · min(x_a · y_b, y_a · x_b)` the pools
//! trade with each other:
//!
//! ```text
//! L_a = |cross| / (2 · (x_b + y_b))
//! L_b = |cross| / (2 · (x_a + y_a))
//! ```
//!
//! For `cross > 0` the pool sends `L_a` of token0 to its sibling and
//! receives `L_b` of token1; for `cross < 0` the flows reverse.  The move is
//! skipped if either amount rounds to zero, a pool is empty, a reserve would
//! exceed `2^112 - 1`, or either pool's product would shrink.
//!
//! Planning only reads committed reserves, so input already deposited for
//! the pending swap is never moved.

use alloy_primitives::U256;
use tracing::debug;

use super::{DirectionalPool, PoolContext};
use crate::domain::{Amount, BasisPoints, Event, Reserves};
use crate::error::AmmError;

/// Token movement between a pool and its sibling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArbitragePlan {
    /// `true` if the pool sends token0 to its sibling (and receives token1).
    pub token0_to_sibling: bool,
    /// Token0 moved.
    pub amount0: Amount,
    /// Token1 moved the other way.
    pub amount1: Amount,
}

impl ArbitragePlan {
    /// Reserves of `(pool, sibling)` in `(token0, token1)` order after the
    /// move, or `None` if a side would go negative or overflow.
    #[must_use]
    pub fn apply_to(
        &self,
        pool: (Amount, Amount),
        sibling: (Amount, Amount),
    ) -> Option<((Amount, Amount), (Amount, Amount))> {
        let (from, to) = if self.token0_to_sibling {
            (pool, sibling)
        } else {
            (sibling, pool)
        };
        let from_after = (
            from.0.checked_sub(&self.amount0)?,
            from.1.checked_add(&self.amount1)?,
        );
        let to_after = (
            to.0.checked_add(&self.amount0)?,
            to.1.checked_sub(&self.amount1)?,
        );
        Some(if self.token0_to_sibling {
            (from_after, to_after)
        } else {
            (to_after, from_after)
        })
    }
}

/// Plans the rebalancing of `pool` against `sibling`, both given in
/// `(token0, token1)` order.
///
/// Returns `None` when the prices are within `trigger_rate` or the move
/// would be unsafe.
#[must_use]
pub fn plan(
    pool: (Amount, Amount),
    sibling: (Amount, Amount),
    trigger_rate: BasisPoints,
) -> Option<ArbitragePlan> {
    if pool.0.is_zero() || pool.1.is_zero() || sibling.0.is_zero() || sibling.1.is_zero() {
        return None;
    }
    let (x_a, x_b) = (pool.0.to_u256(), pool.1.to_u256());
    let (y_a, y_b) = (sibling.0.to_u256(), sibling.1.to_u256());

    let lhs = x_a.checked_mul(y_b)?;
    let rhs = y_a.checked_mul(x_b)?;
    let (cross, token0_to_sibling) = if lhs >= rhs {
        (lhs - rhs, true)
    } else {
        (rhs - lhs, false)
    };
    if cross.is_zero() {
        return None;
    }
    let gap = cross.checked_mul(U256::from(BasisPoints::DENOMINATOR))?;
    let threshold = lhs.min(rhs).checked_mul(trigger_rate.to_u256())?;
    if gap <= threshold {
        return None;
    }

    let two = U256::from(2u8);
    let amount0 = cross.checked_div(two.checked_mul(x_b.checked_add(y_b)?)?)?;
    let amount1 = cross.checked_div(two.checked_mul(x_a.checked_add(y_a)?)?)?;
    let plan = ArbitragePlan {
        token0_to_sibling,
        amount0: Amount::from_u256(amount0)?,
        amount1: Amount::from_u256(amount1)?,
    };
    if plan.amount0.is_zero() || plan.amount1.is_zero() {
        return None;
    }

    let (pool_after, sibling_after) = plan.apply_to(pool, sibling)?;
    let within_cap = [pool_after.0, pool_after.1, sibling_after.0, sibling_after.1]
        .iter()
        .all(|r| *r <= Amount::MAX_RESERVE);
    let k_kept = product(pool_after)? >= product(pool)?
        && product(sibling_after)? >= product(sibling)?;
    (within_cap && k_kept).then_some(plan)
}

fn product(reserves: (Amount, Amount)) -> Option<U256> {
    reserves.0.to_u256().checked_mul(reserves.1.to_u256())
}

/// Reserves `pool` would have after the rebalancing its next swap performs.
///
/// `block_timestamp_last` is carried over unchanged.
#[must_use]
pub fn project(pool: &DirectionalPool, sibling: &DirectionalPool) -> Reserves {
    let current = pool.get_reserves();
    let by_token = pool.reserves_by_token();
    let Some(after) = plan(
        by_token,
        sibling.reserves_by_token(),
        pool.settings().trigger_rate(),
    )
    .and_then(|p| p.apply_to(by_token, sibling.reserves_by_token()))
    .map(|(pool_after, _)| pool.direction().orient(pool_after)) else {
        return current;
    };
    Reserves {
        reserve_in: after.0,
        reserve_out: after.1,
        block_timestamp_last: current.block_timestamp_last,
    }
}

/// Moves tokens between `pool` and `sibling` if their prices diverged, then
/// settles both pools' reserves and emits `Arbitrage` from `pool`.
///
/// Only reserves are settled. Neither pool's `k_last` is moved to its new
/// product: the K growth from rebalancing must stay visible to the fee
/// mint, which harvests it on the next mint or burn.
///
/// Planned amounts are always below half of the sending pool's reserve, so
/// the transfers cannot fail for lack of funds.
///
/// # Errors
///
/// Propagates ledger errors only.
pub(super) fn rebalance(
    pool: &mut DirectionalPool,
    sibling: &mut DirectionalPool,
    ctx: &mut PoolContext<'_>,
) -> Result<Option<ArbitragePlan>, AmmError> {
    let (pool_now, sibling_now) = (pool.reserves_by_token(), sibling.reserves_by_token());
    let Some(plan) = plan(pool_now, sibling_now, pool.settings().trigger_rate()) else {
        return Ok(None);
    };
    let Some((pool_after, sibling_after)) = plan.apply_to(pool_now, sibling_now) else {
        return Ok(None);
    };

    let pair = pool.token_pair();
    let (source, sink) = if plan.token0_to_sibling {
        (pool.address(), sibling.address())
    } else {
        (sibling.address(), pool.address())
    };
    ctx.tokens.transfer(pair.token0(), source, sink, plan.amount0)?;
    ctx.tokens.transfer(pair.token1(), sink, source, plan.amount1)?;

    let (pool_in, pool_out) = pool.direction().orient(pool_after);
    pool.update(pool_in, pool_out, ctx)?;
    let (sibling_in, sibling_out) = sibling.direction().orient(sibling_after);
    sibling.update(sibling_in, sibling_out, ctx)?;

    ctx.log.emit(
        pool.address(),
        Event::Arbitrage {
            token0_source: source,
            token0_sink: sink,
            amount0: plan.amount0,
            amount1: plan.amount1,
        },
    );
    debug!(
        pool = %pool.address(),
        sibling = %sibling.address(),
        amount0 = %plan.amount0,
        amount1 = %plan.amount1,
        "arbitrage"
    );
    Ok(Some(plan))
}

//! One flow direction of a pair: a constant-product pool that only sells
//! its output token.
//!
//! The pool never trusts what it is told about deposits.  Every mint, burn
//! and swap reads the pool account's live token balances and compares them
//! against the last committed reserves; the difference is what was paid in.
//!
//! # Swap sequence
//!
//! 1. Validate `amount_out` and `to`.
//! 2. Rebalance against the sibling pool if the two prices diverged.
//! 3. Pay `amount_out` to `to` and run the optional flash callback.
//! 4. Re-read balances and derive the input actually received.
//! 5. Require `(bal_in·10⁴ − in_in·f)(bal_out·10⁴ − in_out·f) ≥ r_in·r_out·10⁸`.
//! 6. Commit reserves, advance the oracle, emit `Sync` and `Swap`.
//!
//! `f` is the exchange swap fee, 30 bp by default. Against reserves
//! `(5e18, 10e18)` an input of `1e18` buys `1662497915624478906` at the
//! default and `1666666666666666666` with [`FeeTier::ZERO`](crate::domain::FeeTier::ZERO).
//!
//! # Fee liquidity
//!
//! With the oracle enabled, growth of `sqrt(k)` since the last mint or burn
//! is partly paid out as freshly minted shares before the next mint or
//! burn. The blended term `S·(√k − √k_last)·6 / (√k·11 + √k_last)` is split
//! 1/15 to the protocol recipient and 1/10 to the pair owner.

use alloy_primitives::{Address, U256};
use tracing::debug;

use super::{arbitrage, PoolContext};
use crate::config::PairSettings;
use crate::domain::{
    Amount, BasisPoints, Direction, Event, Liquidity, OracleSnapshot, PoolId, Reserves,
    TokenPair,
};
use crate::error::AmmError;
use crate::ledger::ShareLedger;
use crate::math::{self, uq112x112, CheckedArithmetic};
use crate::traits::{AccountTokens, SwapCallee};

/// A directional constant-product pool.
///
/// # State
///
/// - `reserve_in` / `reserve_out`: balances as of the last update, each at
///   most `2^112 - 1`
/// - price accumulators: wrapping UQ112.112 time integrals of the spot price
/// - `k_last`: `reserve_in * reserve_out` after the last mint or burn, zero
///   while the oracle is disabled
/// - `shares`: the pool's liquidity token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectionalPool {
    id: PoolId,
    sibling: PoolId,
    address: Address,
    pair: TokenPair,
    direction: Direction,
    reserve_in: Amount,
    reserve_out: Amount,
    block_timestamp_last: u32,
    price_in_cumulative_last: U256,
    price_out_cumulative_last: U256,
    k_last: U256,
    settings: PairSettings,
    shares: ShareLedger,
}

impl DirectionalPool {
    pub(crate) fn new(
        id: PoolId,
        sibling: PoolId,
        address: Address,
        pair: TokenPair,
        direction: Direction,
        settings: PairSettings,
    ) -> Self {
        Self {
            id,
            sibling,
            address,
            pair,
            direction,
            reserve_in: Amount::ZERO,
            reserve_out: Amount::ZERO,
            block_timestamp_last: 0,
            price_in_cumulative_last: U256::ZERO,
            price_out_cumulative_last: U256::ZERO,
            k_last: U256::ZERO,
            settings,
            shares: ShareLedger::new(address),
        }
    }

    /// Arena index of this pool.
    #[must_use]
    pub const fn id(&self) -> PoolId {
        self.id
    }

    /// Arena index of the opposite-direction pool.
    #[must_use]
    pub const fn sibling(&self) -> PoolId {
        self.sibling
    }

    /// Account holding the pool's tokens.
    #[must_use]
    pub const fn address(&self) -> Address {
        self.address
    }

    /// The sorted pair this pool belongs to.
    #[must_use]
    pub const fn token_pair(&self) -> TokenPair {
        self.pair
    }

    /// Flow direction relative to the sorted pair.
    #[must_use]
    pub const fn direction(&self) -> Direction {
        self.direction
    }

    /// Token the pool buys.
    #[must_use]
    pub const fn token_in(&self) -> Address {
        self.pair.tokens(self.direction).0
    }

    /// Token the pool sells.
    #[must_use]
    pub const fn token_out(&self) -> Address {
        self.pair.tokens(self.direction).1
    }

    /// Owner, trigger rate and oracle mode.
    #[must_use]
    pub const fn settings(&self) -> PairSettings {
        self.settings
    }

    /// The pool's liquidity-share ledger.
    #[must_use]
    pub const fn shares(&self) -> &ShareLedger {
        &self.shares
    }

    pub(crate) fn shares_mut(&mut self) -> &mut ShareLedger {
        &mut self.shares
    }

    pub(crate) fn set_settings(&mut self, settings: PairSettings) {
        self.settings = settings;
    }

    /// `(reserve_in, reserve_out, block_timestamp_last)`.
    #[must_use]
    pub const fn get_reserves(&self) -> Reserves {
        Reserves {
            reserve_in: self.reserve_in,
            reserve_out: self.reserve_out,
            block_timestamp_last: self.block_timestamp_last,
        }
    }

    /// `(price_in_cumulative, price_out_cumulative, k_last)`.
    #[must_use]
    pub const fn get_oracle_info(&self) -> OracleSnapshot {
        OracleSnapshot {
            price_in_cumulative: self.price_in_cumulative_last,
            price_out_cumulative: self.price_out_cumulative_last,
            k_last: self.k_last,
        }
    }

    /// Reserves in `(token0, token1)` order.
    #[must_use]
    pub fn reserves_by_token(&self) -> (Amount, Amount) {
        self.direction.orient((self.reserve_in, self.reserve_out))
    }

    // -- liquidity ----------------------------------------------------------

    /// Mints shares to `to` for the tokens deposited since the last update.
    ///
    /// The first mint locks [`Liquidity::MINIMUM`] at the zero address.
    ///
    /// # Errors
    ///
    /// - [`AmmError::InsufficientLiquidityMinted`] if the deposit is worth
    ///   zero shares.
    /// - [`AmmError::Overflow`] if a reserve would exceed `2^112 - 1`.
    pub fn mint(&mut self, to: Address, ctx: &mut PoolContext<'_>) -> Result<Liquidity, AmmError> {
        let (balance_in, balance_out) = self.balances(ctx);
        let amount_in = balance_in.safe_sub(&self.reserve_in)?;
        let amount_out = balance_out.safe_sub(&self.reserve_out)?;

        let fee_on = self.mint_fee(ctx)?;
        let supply = self.shares.total_supply();
        let liquidity = if supply.is_zero() {
            let root = math::sqrt(amount_in.to_u256().safe_mul(&amount_out.to_u256())?);
            let root = Liquidity::from_u256(root)
                .ok_or(AmmError::Overflow("initial liquidity exceeds u128"))?;
            let liquidity = root
                .safe_sub(&Liquidity::MINIMUM)
                .map_err(|_| AmmError::InsufficientLiquidityMinted)?;
            self.shares
                .mint(Address::ZERO, Liquidity::MINIMUM, ctx.log)?;
            liquidity
        } else {
            let s = supply.to_u256();
            let by_in = math::mul_div(amount_in.to_u256(), s, self.reserve_in.to_u256())?;
            let by_out = math::mul_div(amount_out.to_u256(), s, self.reserve_out.to_u256())?;
            Liquidity::from_u256(by_in.min(by_out))
                .ok_or(AmmError::Overflow("minted liquidity exceeds u128"))?
        };
        if liquidity.is_zero() {
            return Err(AmmError::InsufficientLiquidityMinted);
        }
        self.shares.mint(to, liquidity, ctx.log)?;

        self.update(balance_in, balance_out, ctx)?;
        self.record_k_last(fee_on);
        ctx.log.emit(
            self.address,
            Event::Mint {
                sender: ctx.sender,
                amount_in,
                amount_out,
            },
        );
        debug!(
            pool = %self.address,
            %to,
            %amount_in,
            %amount_out,
            %liquidity,
            "mint"
        );
        Ok(liquidity)
    }

    /// Burns the shares held by the pool itself and pays the proportional
    /// reserves to `to`.
    ///
    /// # Errors
    ///
    /// - [`AmmError::InsufficientLiquidityBurned`] if either payout is zero.
    pub fn burn(
        &mut self,
        to: Address,
        ctx: &mut PoolContext<'_>,
    ) -> Result<(Amount, Amount), AmmError> {
        let (token_in, token_out) = (self.token_in(), self.token_out());
        let (balance_in, balance_out) = self.balances(ctx);
        let liquidity = self.shares.balance_of(self.address);

        let fee_on = self.mint_fee(ctx)?;
        let supply = self.shares.total_supply();
        if supply.is_zero() {
            return Err(AmmError::InsufficientLiquidityBurned);
        }
        let s = supply.to_u256();
        let amount_in = Amount::from_u256(math::mul_div(liquidity.to_u256(), balance_in.to_u256(), s)?)
            .ok_or(AmmError::Overflow("burn amount exceeds u128"))?;
        let amount_out =
            Amount::from_u256(math::mul_div(liquidity.to_u256(), balance_out.to_u256(), s)?)
                .ok_or(AmmError::Overflow("burn amount exceeds u128"))?;
        if amount_in.is_zero() || amount_out.is_zero() {
            return Err(AmmError::InsufficientLiquidityBurned);
        }

        self.shares.burn(self.address, liquidity, ctx.log)?;
        ctx.tokens.transfer(token_in, self.address, to, amount_in)?;
        ctx.tokens.transfer(token_out, self.address, to, amount_out)?;

        let (balance_in, balance_out) = self.balances(ctx);
        self.update(balance_in, balance_out, ctx)?;
        self.record_k_last(fee_on);
        ctx.log.emit(
            self.address,
            Event::Burn {
                sender: ctx.sender,
                amount_in,
                amount_out,
                to,
            },
        );
        debug!(
            pool = %self.address,
            %to,
            %liquidity,
            %amount_in,
            %amount_out,
            "burn"
        );
        Ok((amount_in, amount_out))
    }

    // -- swap ---------------------------------------------------------------

    /// Sells `amount_out` of the output token to `to`, paid for by whatever
    /// was deposited beforehand or during the callback.
    ///
    /// `sibling` must be this pool's opposite-direction pool; it may be
    /// rebalanced before the swap settles.
    ///
    /// # Errors
    ///
    /// - [`AmmError::InsufficientOutputAmount`] if `amount_out` is zero.
    /// - [`AmmError::InvalidTo`] if `to` is one of the pair's tokens.
    /// - [`AmmError::InsufficientLiquidity`] if `amount_out >= reserve_out`.
    /// - [`AmmError::InsufficientInputAmount`] if nothing was paid in.
    /// - [`AmmError::K`] if the fee-adjusted invariant would decrease.
    /// - [`AmmError::UnknownPool`] if `sibling` is not this pool's sibling.
    pub fn swap(
        &mut self,
        sibling: &mut DirectionalPool,
        amount_out: Amount,
        to: Address,
        callee: Option<&mut dyn SwapCallee>,
        data: &[u8],
        ctx: &mut PoolContext<'_>,
    ) -> Result<(), AmmError> {
        if amount_out.is_zero() {
            return Err(AmmError::InsufficientOutputAmount);
        }
        let (token_in, token_out) = (self.token_in(), self.token_out());
        if to == token_in || to == token_out {
            return Err(AmmError::InvalidTo);
        }
        if sibling.id != self.sibling || sibling.sibling != self.id {
            return Err(AmmError::UnknownPool);
        }

        arbitrage::rebalance(self, sibling, ctx)?;

        let (reserve_in, reserve_out) = (self.reserve_in, self.reserve_out);
        if amount_out >= reserve_out {
            return Err(AmmError::InsufficientLiquidity);
        }

        ctx.tokens.transfer(token_out, self.address, to, amount_out)?;
        if let Some(callee) = callee {
            let mut tokens = AccountTokens::new(&mut *ctx.tokens, to);
            callee.on_swap(&mut tokens, ctx.sender, amount_out, data)?;
        }

        let (balance_in, balance_out) = self.balances(ctx);
        let remaining_out = reserve_out.safe_sub(&amount_out)?;
        let paid_in = balance_in.saturating_sub(&reserve_in);
        let paid_out = balance_out.saturating_sub(&remaining_out);
        if paid_in.is_zero() && paid_out.is_zero() {
            return Err(AmmError::InsufficientInputAmount);
        }

        let scale = U256::from(BasisPoints::DENOMINATOR);
        let fee = ctx.swap_fee.numerator();
        let adjusted_in = balance_in
            .to_u256()
            .safe_mul(&scale)?
            .safe_sub(&paid_in.to_u256().safe_mul(&fee)?)?;
        let adjusted_out = balance_out
            .to_u256()
            .safe_mul(&scale)?
            .safe_sub(&paid_out.to_u256().safe_mul(&fee)?)?;
        let k_before = reserve_in
            .to_u256()
            .safe_mul(&reserve_out.to_u256())?
            .safe_mul(&scale.safe_mul(&scale)?)?;
        if adjusted_in.safe_mul(&adjusted_out)? < k_before {
            return Err(AmmError::K);
        }

        self.update(balance_in, balance_out, ctx)?;
        ctx.log.emit(
            self.address,
            Event::Swap {
                sender: ctx.sender,
                amount_in: paid_in,
                amount_out,
                to,
            },
        );
        debug!(
            pool = %self.address,
            sender = %ctx.sender,
            amount_in = %paid_in,
            %amount_out,
            %to,
            "swap"
        );
        Ok(())
    }

    // -- maintenance --------------------------------------------------------

    /// Forces reserves to match balances.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::Overflow`] if a balance exceeds `2^112 - 1`.
    pub fn sync(&mut self, ctx: &mut PoolContext<'_>) -> Result<(), AmmError> {
        let (balance_in, balance_out) = self.balances(ctx);
        self.update(balance_in, balance_out, ctx)
    }

    /// Sends balances in excess of the reserves to `to`.
    ///
    /// # Errors
    ///
    /// Propagates token transfer errors.
    pub fn skim(&mut self, to: Address, ctx: &mut PoolContext<'_>) -> Result<(), AmmError> {
        let (balance_in, balance_out) = self.balances(ctx);
        let excess_in = balance_in.saturating_sub(&self.reserve_in);
        let excess_out = balance_out.saturating_sub(&self.reserve_out);
        if !excess_in.is_zero() {
            ctx.tokens
                .transfer(self.token_in(), self.address, to, excess_in)?;
        }
        if !excess_out.is_zero() {
            ctx.tokens
                .transfer(self.token_out(), self.address, to, excess_out)?;
        }
        Ok(())
    }

    // -- internals ----------------------------------------------------------

    fn balances(&self, ctx: &PoolContext<'_>) -> (Amount, Amount) {
        (
            ctx.tokens.balance_of(self.token_in(), self.address),
            ctx.tokens.balance_of(self.token_out(), self.address),
        )
    }

    /// Commits new reserves, advancing or clearing the oracle, and emits
    /// `Sync`.
    pub(super) fn update(
        &mut self,
        balance_in: Amount,
        balance_out: Amount,
        ctx: &mut PoolContext<'_>,
    ) -> Result<(), AmmError> {
        if balance_in > Amount::MAX_RESERVE || balance_out > Amount::MAX_RESERVE {
            return Err(AmmError::Overflow("reserve exceeds 2^112 - 1"));
        }
        if self.settings.oracle().is_enabled() {
            let elapsed = ctx.now.wrapping_sub(self.block_timestamp_last);
            if elapsed > 0 && !self.reserve_in.is_zero() && !self.reserve_out.is_zero() {
                self.price_in_cumulative_last = self.price_in_cumulative_last.wrapping_add(
                    uq112x112::price_increment(self.reserve_out, self.reserve_in, elapsed),
                );
                self.price_out_cumulative_last = self.price_out_cumulative_last.wrapping_add(
                    uq112x112::price_increment(self.reserve_in, self.reserve_out, elapsed),
                );
            }
        } else {
            self.price_in_cumulative_last = U256::ZERO;
            self.price_out_cumulative_last = U256::ZERO;
            self.k_last = U256::ZERO;
        }
        self.reserve_in = balance_in;
        self.reserve_out = balance_out;
        self.block_timestamp_last = ctx.now;
        ctx.log.emit(
            self.address,
            Event::Sync {
                reserve_in: balance_in,
                reserve_out: balance_out,
            },
        );
        Ok(())
    }

    /// Mints protocol and creator fee shares for growth since `k_last`.
    ///
    /// Returns whether fee collection is on for this pair.
    fn mint_fee(&mut self, ctx: &mut PoolContext<'_>) -> Result<bool, AmmError> {
        if !self.settings.oracle().is_enabled() {
            self.k_last = U256::ZERO;
            return Ok(false);
        }
        if self.k_last.is_zero() {
            return Ok(true);
        }
        let root_k = math::sqrt(self.get_reserves().k());
        let root_k_last = math::sqrt(self.k_last);
        if root_k <= root_k_last {
            return Ok(true);
        }
        let supply = self.shares.total_supply();
        let protocol = math::protocol_fee_liquidity(supply, root_k, root_k_last)?;
        let creator = math::creator_fee_liquidity(supply, root_k, root_k_last)?;
        if !ctx.fee_to.is_zero() && !protocol.is_zero() {
            self.shares.mint(ctx.fee_to, protocol, ctx.log)?;
        }
        let owner = self.settings.owner();
        if !owner.is_zero() && !creator.is_zero() {
            self.shares.mint(owner, creator, ctx.log)?;
        }
        debug!(pool = %self.address, %protocol, %creator, "fee liquidity");
        Ok(true)
    }

    fn record_k_last(&mut self, fee_on: bool) {
        self.k_last = if fee_on {
            self.get_reserves().k()
        } else {
            U256::ZERO
        };
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::config::OracleMode;
    use crate::domain::{EventLog, FeeTier};
    use crate::ledger::TokenBank;
    use crate::traits::TokenLedger;

    const E18: u128 = 1_000_000_000_000_000_000;
    const TOKEN_A: Address = Address::repeat_byte(0x0a);
    const TOKEN_B: Address = Address::repeat_byte(0x0b);
    const POOL_AAB: Address = Address::repeat_byte(0x10);
    const POOL_ABB: Address = Address::repeat_byte(0x20);
    const ALICE: Address = Address::repeat_byte(0xa1);
    const OWNER: Address = Address::repeat_byte(0x0e);
    const FEE_TO: Address = Address::repeat_byte(0xfe);

    struct Fixture {
        aab: DirectionalPool,
        abb: DirectionalPool,
        bank: TokenBank,
        log: EventLog,
        now: u32,
        swap_fee: FeeTier,
        fee_to: Address,
    }

    impl Fixture {
        fn new(oracle: OracleMode) -> Self {
            let Ok(pair) = TokenPair::new(TOKEN_A, TOKEN_B) else {
                panic!("valid pair");
            };
            let Ok(settings) = PairSettings::new(OWNER, BasisPoints::new(10), oracle) else {
                panic!("valid settings");
            };
            let (a, b) = (PoolId::new(0), PoolId::new(1));
            Self {
                aab: DirectionalPool::new(a, b, POOL_AAB, pair, Direction::Aab, settings),
                abb: DirectionalPool::new(b, a, POOL_ABB, pair, Direction::Abb, settings),
                bank: TokenBank::new(),
                log: EventLog::default(),
                now: 1,
                swap_fee: FeeTier::DEFAULT_SWAP,
                fee_to: Address::ZERO,
            }
        }

        fn ctx(&mut self) -> PoolContext<'_> {
            PoolContext {
                tokens: &mut self.bank,
                log: &mut self.log,
                sender: ALICE,
                now: self.now,
                fee_to: self.fee_to,
                swap_fee: self.swap_fee,
            }
        }

        fn fund(&mut self, token: Address, to: Address, amount: u128) {
            let Ok(()) = self.bank.mint(token, to, Amount::new(amount)) else {
                panic!("mint failed");
            };
        }

        /// Deposits `(a, b)` of (token0, token1) into the AAB pool and mints.
        fn seed_aab(&mut self, a: u128, b: u128) -> Liquidity {
            self.fund(TOKEN_A, POOL_AAB, a);
            self.fund(TOKEN_B, POOL_AAB, b);
            let mut pool = self.aab.clone();
            let result = pool.mint(ALICE, &mut self.ctx());
            self.aab = pool;
            let Ok(liquidity) = result else {
                panic!("mint failed: {result:?}");
            };
            liquidity
        }

        fn seed_abb(&mut self, a: u128, b: u128) -> Liquidity {
            self.fund(TOKEN_A, POOL_ABB, a);
            self.fund(TOKEN_B, POOL_ABB, b);
            let mut pool = self.abb.clone();
            let result = pool.mint(ALICE, &mut self.ctx());
            self.abb = pool;
            let Ok(liquidity) = result else {
                panic!("mint failed: {result:?}");
            };
            liquidity
        }

        fn swap_aab(&mut self, amount_in: u128, amount_out: u128) -> Result<(), AmmError> {
            self.fund(TOKEN_A, POOL_AAB, amount_in);
            let (bank, log) = (self.bank.clone(), self.log.clone());
            let (mut aab, mut abb) = (self.aab.clone(), self.abb.clone());
            let result =
                aab.swap(&mut abb, Amount::new(amount_out), ALICE, None, &[], &mut self.ctx());
            if result.is_ok() {
                self.aab = aab;
                self.abb = abb;
            } else {
                self.bank = bank;
                self.log = log;
            }
            result
        }
    }

    #[test]
    fn first_mint_locks_minimum() {
        let mut fx = Fixture::new(OracleMode::Enabled);
        let minted = fx.seed_aab(E18 / 2, 2 * E18);
        assert_eq!(minted, Liquidity::new(E18 - 1_000));
        assert_eq!(fx.aab.shares().balance_of(Address::ZERO), Liquidity::MINIMUM);
        assert_eq!(fx.aab.shares().total_supply(), Liquidity::new(E18));
        let reserves = fx.aab.get_reserves();
        assert_eq!(reserves.reserve_in, Amount::new(E18 / 2));
        assert_eq!(reserves.reserve_out, Amount::new(2 * E18));
        assert_eq!(fx.aab.get_oracle_info().k_last, reserves.k());
    }

    #[test]
    fn tiny_first_mint_rejected() {
        let mut fx = Fixture::new(OracleMode::Enabled);
        fx.fund(TOKEN_A, POOL_AAB, 1_000);
        fx.fund(TOKEN_B, POOL_AAB, 1_000);
        let mut pool = fx.aab.clone();
        assert_eq!(
            pool.mint(ALICE, &mut fx.ctx()),
            Err(AmmError::InsufficientLiquidityMinted)
        );
    }

    #[test]
    fn second_mint_is_proportional() {
        let mut fx = Fixture::new(OracleMode::Enabled);
        fx.seed_aab(4 * E18, E18);
        let minted = fx.seed_aab(E18, E18);
        // min(1e18 * 2e18 / 4e18, 1e18 * 2e18 / 1e18)
        assert_eq!(minted, Liquidity::new(E18 / 2));
    }

    #[test]
    fn burn_returns_proportional_amounts() {
        let mut fx = Fixture::new(OracleMode::Enabled);
        let minted = fx.seed_aab(3 * E18, 3 * E18);
        let Ok(()) = fx.aab.shares_mut().transfer(ALICE, POOL_AAB, minted, &mut fx.log) else {
            panic!("share transfer failed");
        };
        let mut pool = fx.aab.clone();
        let Ok((a, b)) = pool.burn(ALICE, &mut fx.ctx()) else {
            panic!("burn failed");
        };
        assert_eq!(a, Amount::new(3 * E18 - 1_000));
        assert_eq!(b, Amount::new(3 * E18 - 1_000));
        assert_eq!(pool.shares().total_supply(), Liquidity::MINIMUM);
        assert_eq!(pool.get_reserves().reserve_in, Amount::new(1_000));
    }

    #[test]
    fn burn_without_shares_rejected() {
        let mut fx = Fixture::new(OracleMode::Enabled);
        fx.seed_aab(E18, E18);
        let mut pool = fx.aab.clone();
        assert_eq!(
            pool.burn(ALICE, &mut fx.ctx()),
            Err(AmmError::InsufficientLiquidityBurned)
        );
    }

    #[test]
    fn swap_fee_free_matches_constant_product() {
        let mut fx = Fixture::new(OracleMode::Enabled);
        fx.swap_fee = FeeTier::ZERO;
        fx.seed_aab(5 * E18, 10 * E18);
        let out = 1_666_666_666_666_666_666;
        assert_eq!(fx.swap_aab(E18, out), Ok(()));
        assert_eq!(fx.bank.balance_of(TOKEN_B, ALICE), Amount::new(out));
        let reserves = fx.aab.get_reserves();
        assert_eq!(reserves.reserve_in, Amount::new(6 * E18));
        assert_eq!(reserves.reserve_out, Amount::new(10 * E18 - out));
    }

    #[test]
    fn swap_one_unit_too_many_fails_k() {
        let mut fx = Fixture::new(OracleMode::Enabled);
        fx.seed_aab(5 * E18, 10 * E18);
        assert_eq!(fx.swap_aab(E18, 1_662_497_915_624_478_907), Err(AmmError::K));
        assert_eq!(fx.bank.balance_of(TOKEN_B, ALICE), Amount::ZERO);
        // The deposit is still in the pool; one unit less clears the check.
        assert_eq!(fx.swap_aab(0, 1_662_497_915_624_478_906), Ok(()));
    }

    #[test]
    fn swap_validations() {
        let mut fx = Fixture::new(OracleMode::Enabled);
        fx.seed_aab(5 * E18, 10 * E18);
        assert_eq!(fx.swap_aab(0, 0), Err(AmmError::InsufficientOutputAmount));
        assert_eq!(fx.swap_aab(0, 10 * E18), Err(AmmError::InsufficientLiquidity));
        assert_eq!(fx.swap_aab(0, 1), Err(AmmError::InsufficientInputAmount));

        let (mut aab, mut abb) = (fx.aab.clone(), fx.abb.clone());
        assert_eq!(
            aab.swap(&mut abb, Amount::new(1), TOKEN_A, None, &[], &mut fx.ctx()),
            Err(AmmError::InvalidTo)
        );
        let mut stranger = fx.aab.clone();
        assert_eq!(
            aab.swap(&mut stranger, Amount::new(1), ALICE, None, &[], &mut fx.ctx()),
            Err(AmmError::UnknownPool)
        );
    }

    #[test]
    fn flash_swap_repaid_in_callback() {
        struct Repay;
        impl SwapCallee for Repay {
            fn on_swap(
                &mut self,
                tokens: &mut AccountTokens<'_>,
                _sender: Address,
                amount_out: Amount,
                _data: &[u8],
            ) -> Result<(), AmmError> {
                // Return the borrowed output plus a 0.31% premium.
                let premium = Amount::new(amount_out.get() / 10_000 * 31 + 1);
                let owed = amount_out.safe_add(&premium)?;
                tokens.transfer(TOKEN_B, POOL_AAB, owed)
            }
        }

        let mut fx = Fixture::new(OracleMode::Enabled);
        fx.seed_aab(5 * E18, 10 * E18);
        fx.fund(TOKEN_B, ALICE, E18);
        let (mut aab, mut abb) = (fx.aab.clone(), fx.abb.clone());
        let mut callee = Repay;
        let result = aab.swap(
            &mut abb,
            Amount::new(E18),
            ALICE,
            Some(&mut callee),
            b"flash",
            &mut fx.ctx(),
        );
        assert_eq!(result, Ok(()));
        assert!(aab.get_reserves().k() > Amount::new(5 * E18).to_u256() * Amount::new(10 * E18).to_u256());
    }

    #[test]
    fn sync_is_idempotent() {
        let mut fx = Fixture::new(OracleMode::Enabled);
        fx.seed_aab(E18, E18);
        fx.fund(TOKEN_A, POOL_AAB, 5);
        let mut pool = fx.aab.clone();
        assert_eq!(pool.sync(&mut fx.ctx()), Ok(()));
        let (reserves, oracle) = (pool.get_reserves(), pool.get_oracle_info());
        assert_eq!(reserves.reserve_in, Amount::new(E18 + 5));
        assert_eq!(pool.sync(&mut fx.ctx()), Ok(()));
        assert_eq!(pool.get_reserves(), reserves);
        assert_eq!(pool.get_oracle_info(), oracle);
    }

    #[test]
    fn skim_returns_excess() {
        let mut fx = Fixture::new(OracleMode::Enabled);
        fx.seed_aab(E18, E18);
        fx.fund(TOKEN_B, POOL_AAB, 7);
        let mut pool = fx.aab.clone();
        assert_eq!(pool.skim(ALICE, &mut fx.ctx()), Ok(()));
        assert_eq!(fx.bank.balance_of(TOKEN_B, ALICE), Amount::new(7));
        assert_eq!(fx.bank.balance_of(TOKEN_B, POOL_AAB), Amount::new(E18));
    }

    #[test]
    fn oracle_accumulates_elapsed_price() {
        let mut fx = Fixture::new(OracleMode::Enabled);
        fx.seed_aab(E18, 2 * E18);
        fx.now += 10;
        let mut pool = fx.aab.clone();
        assert_eq!(pool.sync(&mut fx.ctx()), Ok(()));
        let info = pool.get_oracle_info();
        assert_eq!(info.price_in_cumulative, (U256::from(2u8) << 112) * U256::from(10u8));
        assert_eq!(info.price_out_cumulative, (U256::from(1u8) << 111) * U256::from(10u8));
        assert_eq!(pool.get_reserves().block_timestamp_last, fx.now);
    }

    #[test]
    fn timestamp_wraps() {
        let mut fx = Fixture::new(OracleMode::Enabled);
        fx.now = u32::MAX;
        fx.seed_aab(E18, E18);
        fx.now = 4; // five seconds later, modulo 2^32
        let mut pool = fx.aab.clone();
        assert_eq!(pool.sync(&mut fx.ctx()), Ok(()));
        assert_eq!(
            pool.get_oracle_info().price_in_cumulative,
            (U256::from(1u8) << 112) * U256::from(5u8)
        );
    }

    #[test]
    fn disabled_oracle_clears_state() {
        let mut fx = Fixture::new(OracleMode::Disabled);
        fx.seed_aab(E18, 2 * E18);
        fx.now += 10;
        let mut pool = fx.aab.clone();
        assert_eq!(pool.sync(&mut fx.ctx()), Ok(()));
        assert_eq!(pool.get_oracle_info(), OracleSnapshot::default());
    }

    #[test]
    fn growth_mints_fee_liquidity() {
        let mut fx = Fixture::new(OracleMode::Enabled);
        fx.fee_to = FEE_TO;
        fx.seed_aab(10 * E18, 10 * E18);
        // Donation grows k without minting shares.
        fx.fund(TOKEN_A, POOL_AAB, E18);
        fx.fund(TOKEN_B, POOL_AAB, E18);
        let mut pool = fx.aab.clone();
        assert_eq!(pool.sync(&mut fx.ctx()), Ok(()));
        fx.aab = pool;

        let supply = fx.aab.shares().total_supply();
        let root_k = U256::from(11 * E18);
        let root_k_last = U256::from(10 * E18);
        let Ok(protocol) = math::protocol_fee_liquidity(supply, root_k, root_k_last) else {
            panic!("fee math failed");
        };
        let Ok(creator) = math::creator_fee_liquidity(supply, root_k, root_k_last) else {
            panic!("fee math failed");
        };

        fx.seed_aab(E18, E18);
        assert_eq!(fx.aab.shares().balance_of(FEE_TO), protocol);
        assert_eq!(fx.aab.shares().balance_of(OWNER), creator);
        assert_eq!(protocol, Liquidity::new(30_534_351_145_038_167));
        assert_eq!(creator, Liquidity::new(45_801_526_717_557_251));
    }

    #[test]
    fn reserve_cap_enforced() {
        let mut fx = Fixture::new(OracleMode::Enabled);
        fx.fund(TOKEN_A, POOL_AAB, Amount::MAX_RESERVE.get() + 1);
        fx.fund(TOKEN_B, POOL_AAB, E18);
        let mut pool = fx.aab.clone();
        let Err(AmmError::Overflow(_)) = pool.mint(ALICE, &mut fx.ctx()) else {
            panic!("expected Overflow");
        };
    }

    #[test]
    fn arbitrage_runs_before_swap() {
        let mut fx = Fixture::new(OracleMode::Enabled);
        fx.seed_aab(1_010 * E18, 990_099_009_900_990_099_010);
        fx.seed_abb(1_000 * E18, 1_000 * E18);
        let k_last = (fx.aab.get_oracle_info().k_last, fx.abb.get_oracle_info().k_last);
        assert_eq!(fx.swap_aab(E18, E18 / 2), Ok(()));
        // Rebalancing settles reserves but leaves the growth to the fee mint.
        assert_eq!(
            (fx.aab.get_oracle_info().k_last, fx.abb.get_oracle_info().k_last),
            k_last
        );
        let arb = fx
            .log
            .entries()
            .iter()
            .find(|e| matches!(e.event, Event::Arbitrage { .. }));
        let Some(entry) = arb else {
            panic!("expected an Arbitrage event");
        };
        assert_eq!(
            entry.event,
            Event::Arbitrage {
                token0_source: POOL_AAB,
                token0_sink: POOL_ABB,
                amount0: Amount::new(4_999_999_999_999_999_999),
                amount1: Amount::new(4_950_495_049_504_950_495),
            }
        );
        assert_eq!(
            fx.abb.reserves_by_token(),
            (
                Amount::new(1_004_999_999_999_999_999_999),
                Amount::new(995_049_504_950_495_049_505)
            )
        );
    }

    // -- event order --------------------------------------------------------

    fn entries_since(log: &EventLog, mark: usize) -> Vec<(Address, Event)> {
        log.since(mark)
            .iter()
            .map(|e| (e.emitter, e.event.clone()))
            .collect()
    }

    #[test]
    fn first_mint_event_order() {
        let mut fx = Fixture::new(OracleMode::Enabled);
        fx.seed_aab(E18 / 2, 2 * E18);
        assert_eq!(
            entries_since(&fx.log, 0),
            vec![
                (
                    POOL_AAB,
                    Event::Transfer {
                        from: Address::ZERO,
                        to: Address::ZERO,
                        value: Liquidity::MINIMUM,
                    }
                ),
                (
                    POOL_AAB,
                    Event::Transfer {
                        from: Address::ZERO,
                        to: ALICE,
                        value: Liquidity::new(E18 - 1_000),
                    }
                ),
                (
                    POOL_AAB,
                    Event::Sync {
                        reserve_in: Amount::new(E18 / 2),
                        reserve_out: Amount::new(2 * E18),
                    }
                ),
                (
                    POOL_AAB,
                    Event::Mint {
                        sender: ALICE,
                        amount_in: Amount::new(E18 / 2),
                        amount_out: Amount::new(2 * E18),
                    }
                ),
            ]
        );
    }

    #[test]
    fn burn_event_order() {
        let mut fx = Fixture::new(OracleMode::Enabled);
        let minted = fx.seed_aab(3 * E18, 3 * E18);
        let Ok(()) = fx.aab.shares_mut().transfer(ALICE, POOL_AAB, minted, &mut fx.log) else {
            panic!("share transfer failed");
        };
        let mark = fx.log.len();
        let mut pool = fx.aab.clone();
        let Ok(_) = pool.burn(ALICE, &mut fx.ctx()) else {
            panic!("burn failed");
        };
        let paid = Amount::new(3 * E18 - 1_000);
        assert_eq!(
            entries_since(&fx.log, mark),
            vec![
                (
                    POOL_AAB,
                    Event::Transfer {
                        from: POOL_AAB,
                        to: Address::ZERO,
                        value: minted,
                    }
                ),
                (
                    POOL_AAB,
                    Event::Sync {
                        reserve_in: Amount::new(1_000),
                        reserve_out: Amount::new(1_000),
                    }
                ),
                (
                    POOL_AAB,
                    Event::Burn {
                        sender: ALICE,
                        amount_in: paid,
                        amount_out: paid,
                        to: ALICE,
                    }
                ),
            ]
        );
    }

    #[test]
    fn arbitrage_swap_event_order() {
        let mut fx = Fixture::new(OracleMode::Enabled);
        fx.seed_aab(1_010 * E18, 990_099_009_900_990_099_010);
        fx.seed_abb(1_000 * E18, 1_000 * E18);
        let mark = fx.log.len();
        assert_eq!(fx.swap_aab(E18, E18 / 2), Ok(()));
        assert_eq!(
            entries_since(&fx.log, mark),
            vec![
                (
                    POOL_AAB,
                    Event::Sync {
                        reserve_in: Amount::new(1_005_000_000_000_000_000_001),
                        reserve_out: Amount::new(995_049_504_950_495_049_505),
                    }
                ),
                (
                    POOL_ABB,
                    Event::Sync {
                        reserve_in: Amount::new(995_049_504_950_495_049_505),
                        reserve_out: Amount::new(1_004_999_999_999_999_999_999),
                    }
                ),
                (
                    POOL_AAB,
                    Event::Arbitrage {
                        token0_source: POOL_AAB,
                        token0_sink: POOL_ABB,
                        amount0: Amount::new(4_999_999_999_999_999_999),
                        amount1: Amount::new(4_950_495_049_504_950_495),
                    }
                ),
                (
                    POOL_AAB,
                    Event::Sync {
                        reserve_in: Amount::new(1_006_000_000_000_000_000_001),
                        reserve_out: Amount::new(994_549_504_950_495_049_505),
                    }
                ),
                (
                    POOL_AAB,
                    Event::Swap {
                        sender: ALICE,
                        amount_in: Amount::new(E18),
                        amount_out: Amount::new(E18 / 2),
                        to: ALICE,
                    }
                ),
            ]
        );
    }

    #[test]
    fn fee_shares_minted_before_deposit_shares() {
        let mut fx = Fixture::new(OracleMode::Enabled);
        fx.fee_to = FEE_TO;
        fx.seed_aab(10 * E18, 10 * E18);
        fx.fund(TOKEN_A, POOL_AAB, E18);
        fx.fund(TOKEN_B, POOL_AAB, E18);
        let mut pool = fx.aab.clone();
        assert_eq!(pool.sync(&mut fx.ctx()), Ok(()));
        fx.aab = pool;

        let mark = fx.log.len();
        fx.seed_aab(E18, E18);
        let mint = |to, value| {
            (
                POOL_AAB,
                Event::Transfer {
                    from: Address::ZERO,
                    to,
                    value: Liquidity::new(value),
                },
            )
        };
        assert_eq!(
            entries_since(&fx.log, mark),
            vec![
                mint(FEE_TO, 30_534_351_145_038_167),
                mint(OWNER, 45_801_526_717_557_251),
                mint(ALICE, 916_030_534_351_145_038),
                (
                    POOL_AAB,
                    Event::Sync {
                        reserve_in: Amount::new(12 * E18),
                        reserve_out: Amount::new(12 * E18),
                    }
                ),
                (
                    POOL_AAB,
                    Event::Mint {
                        sender: ALICE,
                        amount_in: Amount::new(E18),
                        amount_out: Amount::new(E18),
                    }
                ),
            ]
        );
    }
}

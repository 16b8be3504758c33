//! The exchange: token ledger, pool registry and event log behind one
//! transactional facade.
//!
//! Every state-changing call runs against a working copy of the token
//! ledger and the registry.  The copy replaces the live state only if the
//! call succeeds; on error the events it emitted are dropped as well, so a
//! failed call leaves no trace.
//!
//! # Example
//!
//! ```rust
//! use dualpool_amm::config::ExchangeConfig;
//! use dualpool_amm::domain::{Address, Amount};
//! use dualpool_amm::exchange::Exchange;
//! use dualpool_amm::router::AddLiquidity;
//!
//! let admin = Address::repeat_byte(0xad);
//! let alice = Address::repeat_byte(0xa1);
//! let (a, b) = (Address::repeat_byte(0x0a), Address::repeat_byte(0x0b));
//!
//! let config = ExchangeConfig::deployed_by(admin).expect("valid config");
//! let mut exchange = Exchange::new(config).expect("exchange");
//! let router = exchange.config().router();
//! for token in [a, b] {
//!     exchange.mint_tokens(token, alice, Amount::new(10_000_000)).expect("faucet");
//!     exchange.approve(token, alice, router, Amount::MAX);
//! }
//!
//! let added = exchange
//!     .router()
//!     .add_liquidity(
//!         alice,
//!         &AddLiquidity::new(a, b, Amount::new(4_000_000), Amount::new(4_000_000), 50, alice, u64::MAX),
//!     )
//!     .expect("liquidity added");
//! assert_eq!(added.amount_a, Amount::new(4_000_000));
//!
//! let (a_in, b_in) = exchange.get_pair(a, b);
//! assert_eq!(exchange.get_reserves(a_in).expect("pool").reserve_in, Amount::new(2_000_000));
//! assert_eq!(exchange.get_reserves(b_in).expect("pool").reserve_out, Amount::new(2_000_000));
//! ```

use std::sync::Arc;

use alloy_primitives::Address;
use tracing::{debug, info};

use crate::config::{ExchangeConfig, PairSettings};
use crate::domain::{Amount, EventLog, Liquidity, LogEntry, OracleSnapshot, Reserves};
use crate::error::AmmError;
use crate::factory::PoolRegistry;
use crate::ledger::{ShareLedger, TokenBank};
use crate::pools::{DirectionalPool, PoolContext};
use crate::router::{self, Router};
use crate::traits::{PairAuthority, SwapCallee, TokenLedger};

/// In-memory dual-pool exchange.
#[derive(Debug, Clone)]
pub struct Exchange {
    config: ExchangeConfig,
    tokens: TokenBank,
    registry: PoolRegistry,
    log: EventLog,
    timestamp: u64,
}

impl Exchange {
    /// Deploys an empty exchange.
    ///
    /// # Errors
    ///
    /// Propagates [`ExchangeConfig::validate`] failures.
    pub fn new(config: ExchangeConfig) -> Result<Self, AmmError> {
        config.validate()?;
        let registry = PoolRegistry::new(&config);
        Ok(Self::assemble(config, registry))
    }

    /// Deploys an empty exchange whose pair updates may also be approved by
    /// `authority`.
    ///
    /// # Errors
    ///
    /// Propagates [`ExchangeConfig::validate`] failures.
    pub fn with_authority(
        config: ExchangeConfig,
        authority: Arc<dyn PairAuthority + Send + Sync>,
    ) -> Result<Self, AmmError> {
        config.validate()?;
        let registry = PoolRegistry::with_authority(&config, authority);
        Ok(Self::assemble(config, registry))
    }

    fn assemble(config: ExchangeConfig, registry: PoolRegistry) -> Self {
        info!(
            admin = %config.admin(),
            registry = %config.registry(),
            router = %config.router(),
            swap_fee = %config.swap_fee(),
            "exchange deployed"
        );
        Self {
            config,
            tokens: TokenBank::new(),
            registry,
            log: EventLog::default(),
            timestamp: 0,
        }
    }

    /// Deployment configuration.
    #[must_use]
    pub const fn config(&self) -> &ExchangeConfig {
        &self.config
    }

    /// Pool registry (read-only).
    #[must_use]
    pub const fn registry(&self) -> &PoolRegistry {
        &self.registry
    }

    /// Token ledger (read-only).
    #[must_use]
    pub const fn tokens(&self) -> &TokenBank {
        &self.tokens
    }

    // -- clock ------------------------------------------------------------------

    /// Current block timestamp in seconds.
    #[must_use]
    pub const fn timestamp(&self) -> u64 {
        self.timestamp
    }

    /// Sets the block timestamp.
    pub fn set_timestamp(&mut self, timestamp: u64) {
        self.timestamp = timestamp;
    }

    /// Moves the block timestamp forward by `seconds`, saturating.
    pub fn advance_time(&mut self, seconds: u64) {
        self.timestamp = self.timestamp.saturating_add(seconds);
    }

    // -- events -----------------------------------------------------------------

    /// Every event emitted by committed calls, in order.
    #[must_use]
    pub fn events(&self) -> &[LogEntry] {
        self.log.entries()
    }

    /// Events emitted after the first `from`.
    #[must_use]
    pub fn events_since(&self, from: usize) -> &[LogEntry] {
        self.log.since(from)
    }

    /// Removes and returns all recorded events.
    pub fn drain_events(&mut self) -> Vec<LogEntry> {
        self.log.drain()
    }

    // -- transactions -----------------------------------------------------------

    /// Runs `body` against a working copy and commits it only on success.
    pub(crate) fn transact<T>(
        &mut self,
        operation: &'static str,
        body: impl FnOnce(&mut Transaction<'_>) -> Result<T, AmmError>,
    ) -> Result<T, AmmError> {
        let mut tokens = self.tokens.clone();
        let mut registry = self.registry.clone();
        let mark = self.log.len();
        let result = body(&mut Transaction {
            tokens: &mut tokens,
            registry: &mut registry,
            log: &mut self.log,
            config: &self.config,
            now: self.timestamp,
        });
        match result {
            Ok(value) => {
                self.tokens = tokens;
                self.registry = registry;
                Ok(value)
            }
            Err(error) => {
                self.log.truncate(mark);
                debug!(operation, %error, "transaction reverted");
                Err(error)
            }
        }
    }

    // -- external tokens --------------------------------------------------------

    /// Credits freshly minted `token` to `to`.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::Overflow`] if the balance would overflow.
    pub fn mint_tokens(&mut self, token: Address, to: Address, amount: Amount) -> Result<(), AmmError> {
        self.transact("mint_tokens", |tx| tx.tokens.mint(token, to, amount))
    }

    /// Sets `spender`'s allowance over `owner`'s `token`.
    pub fn approve(&mut self, token: Address, owner: Address, spender: Address, amount: Amount) {
        self.tokens.approve(token, owner, spender, amount);
    }

    /// Moves `amount` of `token` from `from` to `to`.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InsufficientBalance`] if `from` holds too little.
    pub fn transfer(&mut self, token: Address, from: Address, to: Address, amount: Amount) -> Result<(), AmmError> {
        self.transact("transfer", |tx| tx.tokens.transfer(token, from, to, amount))
    }

    /// Moves `owner`'s `token` on behalf of `spender`.
    ///
    /// # Errors
    ///
    /// See [`TokenBank::transfer_from`].
    pub fn transfer_from(
        &mut self,
        token: Address,
        spender: Address,
        owner: Address,
        to: Address,
        amount: Amount,
    ) -> Result<(), AmmError> {
        self.transact("transfer_from", |tx| {
            tx.tokens.transfer_from(token, spender, owner, to, amount)
        })
    }

    /// `token` balance of `holder`.
    #[must_use]
    pub fn balance_of(&self, token: Address, holder: Address) -> Amount {
        self.tokens.balance_of(token, holder)
    }

    // -- registry ---------------------------------------------------------------

    /// Creates the two pools of `{token_x, token_y}`, or updates their
    /// settings.  See [`PoolRegistry::create_update_pair`].
    ///
    /// # Errors
    ///
    /// See [`PoolRegistry::create_update_pair`].
    pub fn create_update_pair(
        &mut self,
        caller: Address,
        token_x: Address,
        token_y: Address,
        settings: PairSettings,
    ) -> Result<(Address, Address), AmmError> {
        self.transact("create_update_pair", |tx| {
            tx.create_update_pair(caller, token_x, token_y, settings)
        })
    }

    /// `(pool where x flows in, pool where y flows in)`, zero if unknown.
    #[must_use]
    pub fn get_pair(&self, token_x: Address, token_y: Address) -> (Address, Address) {
        self.registry.get_pair(token_x, token_y)
    }

    /// Number of registered pairs.
    #[must_use]
    pub fn all_pairs_length(&self) -> usize {
        self.registry.all_pairs_length()
    }

    /// Sets the protocol fee recipient.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::Forbidden`] unless `caller` is the admin.
    pub fn set_fee_to(&mut self, caller: Address, fee_to: Address) -> Result<(), AmmError> {
        self.transact("set_fee_to", |tx| tx.registry.set_fee_to(caller, fee_to))
    }

    /// Transfers the admin role.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::Forbidden`] unless `caller` is the admin.
    pub fn set_admin(&mut self, caller: Address, admin: Address) -> Result<(), AmmError> {
        self.transact("set_admin", |tx| tx.registry.set_admin(caller, admin))
    }

    // -- pool views -------------------------------------------------------------

    /// The pool at `pool`.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::UnknownPool`] if no pool lives there.
    pub fn pool(&self, pool: Address) -> Result<&DirectionalPool, AmmError> {
        self.registry.pool_at(pool)
    }

    /// Committed reserves of `pool`.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::UnknownPool`] if no pool lives there.
    pub fn get_reserves(&self, pool: Address) -> Result<Reserves, AmmError> {
        Ok(self.pool(pool)?.get_reserves())
    }

    /// Oracle accumulators and `k_last` of `pool`.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::UnknownPool`] if no pool lives there.
    pub fn get_oracle_info(&self, pool: Address) -> Result<OracleSnapshot, AmmError> {
        Ok(self.pool(pool)?.get_oracle_info())
    }

    /// Liquidity share ledger of `pool`.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::UnknownPool`] if no pool lives there.
    pub fn shares(&self, pool: Address) -> Result<&ShareLedger, AmmError> {
        Ok(self.pool(pool)?.shares())
    }

    /// Output quote along `path` for `amount_in`, against the reserves each
    /// hop will see after arbitrage.
    ///
    /// # Errors
    ///
    /// See [`router::estimate_amounts_out`].
    pub fn estimate_amounts_out(&self, amount_in: Amount, path: &[Address]) -> Result<Vec<Amount>, AmmError> {
        router::estimate_amounts_out(&self.registry, self.config.swap_fee(), amount_in, path)
    }

    /// Input quote along `path` for `amount_out`.
    ///
    /// # Errors
    ///
    /// See [`router::estimate_amounts_in`].
    pub fn estimate_amounts_in(&self, amount_out: Amount, path: &[Address]) -> Result<Vec<Amount>, AmmError> {
        router::estimate_amounts_in(&self.registry, self.config.swap_fee(), amount_out, path)
    }

    // -- pool operations --------------------------------------------------------

    /// Mints shares of `pool` to `to` for tokens already sent to it.
    ///
    /// # Errors
    ///
    /// See [`DirectionalPool::mint`].
    pub fn mint(&mut self, caller: Address, pool: Address, to: Address) -> Result<Liquidity, AmmError> {
        self.transact("mint", |tx| tx.mint(caller, pool, to))
    }

    /// Burns the shares `pool` holds of itself, paying `to`.
    ///
    /// # Errors
    ///
    /// See [`DirectionalPool::burn`].
    pub fn burn(&mut self, caller: Address, pool: Address, to: Address) -> Result<(Amount, Amount), AmmError> {
        self.transact("burn", |tx| tx.burn(caller, pool, to))
    }

    /// Swaps on `pool`, optionally as a flash swap through `callee`.
    ///
    /// # Errors
    ///
    /// See [`DirectionalPool::swap`].
    pub fn swap(
        &mut self,
        caller: Address,
        pool: Address,
        amount_out: Amount,
        to: Address,
        callee: Option<&mut dyn SwapCallee>,
        data: &[u8],
    ) -> Result<(), AmmError> {
        self.transact("swap", |tx| tx.swap(caller, pool, amount_out, to, callee, data))
    }

    /// Forces `pool`'s reserves to match its balances.
    ///
    /// # Errors
    ///
    /// See [`DirectionalPool::sync`].
    pub fn sync(&mut self, caller: Address, pool: Address) -> Result<(), AmmError> {
        self.transact("sync", |tx| tx.with_pool(caller, pool, |p, ctx| p.sync(ctx)))
    }

    /// Sends `pool`'s balances in excess of its reserves to `to`.
    ///
    /// # Errors
    ///
    /// See [`DirectionalPool::skim`].
    pub fn skim(&mut self, caller: Address, pool: Address, to: Address) -> Result<(), AmmError> {
        self.transact("skim", |tx| tx.with_pool(caller, pool, |p, ctx| p.skim(to, ctx)))
    }

    // -- liquidity shares -------------------------------------------------------

    /// Moves `owner`'s shares of `pool` to `to`.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InsufficientBalance`] if `owner` holds too few.
    pub fn transfer_shares(
        &mut self,
        pool: Address,
        owner: Address,
        to: Address,
        value: Liquidity,
    ) -> Result<(), AmmError> {
        self.transact("transfer_shares", |tx| {
            tx.with_shares(pool, |shares, log| shares.transfer(owner, to, value, log))
        })
    }

    /// Moves `owner`'s shares of `pool` on behalf of `spender`.
    ///
    /// # Errors
    ///
    /// See [`ShareLedger::transfer_from`].
    pub fn transfer_shares_from(
        &mut self,
        pool: Address,
        spender: Address,
        owner: Address,
        to: Address,
        value: Liquidity,
    ) -> Result<(), AmmError> {
        self.transact("transfer_shares_from", |tx| {
            tx.with_shares(pool, |shares, log| shares.transfer_from(spender, owner, to, value, log))
        })
    }

    /// Sets `spender`'s allowance over `owner`'s shares of `pool`.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::UnknownPool`] if no pool lives there.
    pub fn approve_shares(
        &mut self,
        pool: Address,
        owner: Address,
        spender: Address,
        value: Liquidity,
    ) -> Result<(), AmmError> {
        self.transact("approve_shares", |tx| {
            tx.with_shares(pool, |shares, log| {
                shares.approve(owner, spender, value, log);
                Ok(())
            })
        })
    }

    /// Applies a pre-verified signed share approval on `pool`.
    ///
    /// # Errors
    ///
    /// See [`ShareLedger::permit`].
    #[allow(clippy::too_many_arguments)]
    pub fn permit(
        &mut self,
        pool: Address,
        owner: Address,
        spender: Address,
        value: Liquidity,
        deadline: u64,
        nonce: u64,
    ) -> Result<(), AmmError> {
        let now = self.timestamp;
        self.transact("permit", |tx| {
            tx.with_shares(pool, |shares, log| {
                shares.permit(owner, spender, value, deadline, nonce, now, log)
            })
        })
    }

    // -- router -----------------------------------------------------------------

    /// Router entry points acting on this exchange.
    pub fn router(&mut self) -> Router<'_> {
        Router::new(self)
    }
}

/// Mutable view of an exchange's working copy for one call.
pub(crate) struct Transaction<'a> {
    pub(crate) tokens: &'a mut TokenBank,
    pub(crate) registry: &'a mut PoolRegistry,
    pub(crate) log: &'a mut EventLog,
    pub(crate) config: &'a ExchangeConfig,
    pub(crate) now: u64,
}

impl Transaction<'_> {
    /// Block timestamp modulo 2^32, as pools record it.
    #[allow(clippy::cast_possible_truncation)]
    const fn block_timestamp(&self) -> u32 {
        (self.now & 0xffff_ffff) as u32
    }

    pub(crate) fn create_update_pair(
        &mut self,
        caller: Address,
        token_x: Address,
        token_y: Address,
        settings: PairSettings,
    ) -> Result<(Address, Address), AmmError> {
        self.registry
            .create_update_pair(caller, token_x, token_y, settings, &mut *self.tokens, &mut *self.log)
    }

    /// Runs `op` on the pool at `pool` with a context for `sender`.
    pub(crate) fn with_pool<T>(
        &mut self,
        sender: Address,
        pool: Address,
        op: impl FnOnce(&mut DirectionalPool, &mut PoolContext<'_>) -> Result<T, AmmError>,
    ) -> Result<T, AmmError> {
        let now = self.block_timestamp();
        let id = self.registry.pool_id(pool)?;
        let fee_to = self.registry.fee_to();
        let pool = self.registry.pool_mut(id)?;
        let mut ctx = PoolContext {
            tokens: &mut *self.tokens,
            log: &mut *self.log,
            sender,
            now,
            fee_to,
            swap_fee: self.config.swap_fee(),
        };
        op(pool, &mut ctx)
    }

    pub(crate) fn with_shares<T>(
        &mut self,
        pool: Address,
        op: impl FnOnce(&mut ShareLedger, &mut EventLog) -> Result<T, AmmError>,
    ) -> Result<T, AmmError> {
        let id = self.registry.pool_id(pool)?;
        let pool = self.registry.pool_mut(id)?;
        op(pool.shares_mut(), &mut *self.log)
    }

    pub(crate) fn mint(&mut self, sender: Address, pool: Address, to: Address) -> Result<Liquidity, AmmError> {
        self.with_pool(sender, pool, |p, ctx| p.mint(to, ctx))
    }

    pub(crate) fn burn(
        &mut self,
        sender: Address,
        pool: Address,
        to: Address,
    ) -> Result<(Amount, Amount), AmmError> {
        self.with_pool(sender, pool, |p, ctx| p.burn(to, ctx))
    }

    pub(crate) fn swap(
        &mut self,
        sender: Address,
        pool: Address,
        amount_out: Amount,
        to: Address,
        callee: Option<&mut dyn SwapCallee>,
        data: &[u8],
    ) -> Result<(), AmmError> {
        let now = self.block_timestamp();
        let id = self.registry.pool_id(pool)?;
        let fee_to = self.registry.fee_to();
        let (pool, sibling) = self.registry.pool_and_sibling_mut(id)?;
        let mut ctx = PoolContext {
            tokens: &mut *self.tokens,
            log: &mut *self.log,
            sender,
            now,
            fee_to,
            swap_fee: self.config.swap_fee(),
        };
        pool.swap(sibling, amount_out, to, callee, data, &mut ctx)
    }

    /// Address of the pool taking `token_in` for `token_out`.
    pub(crate) fn pool_for(&self, token_in: Address, token_out: Address) -> Option<Address> {
        let id = self.registry.pool_for(token_in, token_out)?;
        self.registry.pool(id).ok().map(DirectionalPool::address)
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::config::OracleMode;
    use crate::domain::{BasisPoints, Event, FeeTier};

    const ADMIN: Address = Address::repeat_byte(0xad);
    const ALICE: Address = Address::repeat_byte(0xa1);
    const A: Address = Address::repeat_byte(0x0a);
    const B: Address = Address::repeat_byte(0x0b);
    const E18: u128 = 1_000_000_000_000_000_000;

    fn exchange() -> Exchange {
        let Ok(config) = ExchangeConfig::deployed_by(ADMIN).and_then(|c| c.with_swap_fee(FeeTier::ZERO)) else {
            panic!("valid config");
        };
        let Ok(ex) = Exchange::new(config) else {
            panic!("exchange");
        };
        ex
    }

    fn seeded() -> (Exchange, Address, Address) {
        let mut ex = exchange();
        let Ok(settings) = PairSettings::new(ALICE, BasisPoints::new(10), OracleMode::Enabled) else {
            panic!("settings");
        };
        let Ok((a_in, b_in)) = ex.create_update_pair(ALICE, A, B, settings) else {
            panic!("pair");
        };
        for (token, amount) in [(A, 1_000 * E18), (B, 2_000 * E18)] {
            let Ok(()) = ex.mint_tokens(token, ALICE, Amount::new(amount)) else {
                panic!("faucet");
            };
        }
        for pool in [a_in, b_in] {
            let Ok(()) = ex.transfer(A, ALICE, pool, Amount::new(100 * E18)) else {
                panic!("fund A");
            };
            let Ok(()) = ex.transfer(B, ALICE, pool, Amount::new(100 * E18)) else {
                panic!("fund B");
            };
            let Ok(_) = ex.mint(ALICE, pool, ALICE) else {
                panic!("mint");
            };
        }
        (ex, a_in, b_in)
    }

    #[test]
    fn failed_call_leaves_no_trace() {
        let (mut ex, a_in, _) = seeded();
        let before = ex.clone();
        let events = ex.events().len();
        // Pays out, then fails the K check.
        assert_eq!(
            ex.swap(ALICE, a_in, Amount::new(E18), ALICE, None, &[]),
            Err(AmmError::InsufficientInputAmount)
        );
        assert_eq!(ex.events().len(), events);
        assert_eq!(ex.tokens(), before.tokens());
        assert_eq!(ex.get_reserves(a_in), before.get_reserves(a_in));
        assert_eq!(ex.balance_of(B, ALICE), before.balance_of(B, ALICE));
    }

    #[test]
    fn direct_swap_commits() {
        let (mut ex, a_in, _) = seeded();
        let Ok(()) = ex.transfer(A, ALICE, a_in, Amount::new(E18)) else {
            panic!("pay in");
        };
        let out = Amount::new(990_099_009_900_990_099);
        assert_eq!(ex.swap(ALICE, a_in, out, ALICE, None, &[]), Ok(()));
        let Ok(reserves) = ex.get_reserves(a_in) else {
            panic!("pool");
        };
        assert_eq!(reserves.reserve_in, Amount::new(101 * E18));
        assert!(matches!(
            ex.events().last().map(|e| &e.event),
            Some(Event::Swap { .. })
        ));
    }

    #[test]
    fn unknown_pool_rejected() {
        let mut ex = exchange();
        assert_eq!(ex.sync(ALICE, A), Err(AmmError::UnknownPool));
        assert_eq!(ex.get_reserves(A), Err(AmmError::UnknownPool));
    }

    #[test]
    fn share_operations_route_to_pool_ledger() {
        let (mut ex, a_in, _) = seeded();
        let bob = Address::repeat_byte(0xb0);
        assert_eq!(ex.approve_shares(a_in, ALICE, bob, Liquidity::new(10)), Ok(()));
        assert_eq!(
            ex.events().last().map(|e| (e.emitter, e.event.clone())),
            Some((
                a_in,
                Event::Approval {
                    owner: ALICE,
                    spender: bob,
                    value: Liquidity::new(10),
                }
            ))
        );
        assert_eq!(
            ex.approve_shares(A, ALICE, bob, Liquidity::new(10)),
            Err(AmmError::UnknownPool)
        );
        assert_eq!(
            ex.transfer_shares_from(a_in, bob, ALICE, bob, Liquidity::new(10)),
            Ok(())
        );
        let Ok(shares) = ex.shares(a_in) else {
            panic!("pool");
        };
        assert_eq!(shares.balance_of(bob), Liquidity::new(10));
        assert_eq!(shares.allowance(ALICE, bob), Liquidity::ZERO);
    }

    #[test]
    fn permit_checks_clock_and_nonce() {
        let (mut ex, a_in, _) = seeded();
        let bob = Address::repeat_byte(0xb0);
        ex.set_timestamp(100);
        assert_eq!(
            ex.permit(a_in, ALICE, bob, Liquidity::new(5), 99, 0),
            Err(AmmError::Expired)
        );
        assert_eq!(ex.permit(a_in, ALICE, bob, Liquidity::new(5), 100, 0), Ok(()));
        assert_eq!(
            ex.permit(a_in, ALICE, bob, Liquidity::new(5), 100, 0),
            Err(AmmError::InvalidNonce {
                expected: 1,
                got: 0
            })
        );
    }

    #[test]
    fn clock_truncates_for_pools() {
        let (mut ex, a_in, _) = seeded();
        ex.set_timestamp((1 << 32) + 7);
        let Ok(()) = ex.sync(ALICE, a_in) else {
            panic!("sync");
        };
        let Ok(reserves) = ex.get_reserves(a_in) else {
            panic!("pool");
        };
        assert_eq!(reserves.block_timestamp_last, 7);
        ex.advance_time(3);
        assert_eq!(ex.timestamp(), (1 << 32) + 10);
    }
}

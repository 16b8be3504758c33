//! Pair registry: creates, finds and reconfigures the pools of each pair.
//!
//! Pools live in an arena indexed by [`PoolId`].  Each pool stores the id
//! of its sibling, so the two directions of a pair refer to each other
//! without owning each other.

use std::collections::HashMap;
use std::sync::Arc;

use alloy_primitives::{keccak256, Address};
use tracing::info;

use crate::config::{ExchangeConfig, PairSettings};
use crate::domain::{Amount, Direction, Event, EventLog, PoolId, TokenPair};
use crate::error::AmmError;
use crate::ledger::TokenBank;
use crate::pools::DirectionalPool;
use crate::traits::{OwnerOnly, PairAuthority};

/// Bytes whose hash stands in for the pool init code in address derivation.
pub const POOL_CREATION_CODE: &[u8] = b"dualpool-amm::DirectionalPool";

/// Deterministic address of the pool selling `token_out` for `token_in`.
///
/// `create2(registry, keccak256(token_in ‖ token_out), keccak256(code))`,
/// so it can be computed before the pool exists.
///
/// # Examples
///
/// ```
/// use alloy_primitives::Address;
/// use dualpool_amm::factory::pool_address;
///
/// let registry = Address::repeat_byte(0xf0);
/// let (a, b) = (Address::repeat_byte(1), Address::repeat_byte(2));
/// assert_ne!(pool_address(registry, a, b), pool_address(registry, b, a));
/// assert_eq!(pool_address(registry, a, b), pool_address(registry, a, b));
/// ```
#[must_use]
pub fn pool_address(registry: Address, token_in: Address, token_out: Address) -> Address {
    let salt = keccak256([token_in.as_slice(), token_out.as_slice()].concat());
    let code_hash = keccak256(POOL_CREATION_CODE);
    registry.create2(&salt.0, &code_hash.0)
}

/// Owner of every pool and of the exchange-wide fee settings.
#[derive(Clone)]
pub struct PoolRegistry {
    address: Address,
    router: Address,
    admin: Address,
    fee_to: Address,
    pools: Vec<DirectionalPool>,
    pairs: HashMap<TokenPair, (PoolId, PoolId)>,
    all_pairs: Vec<TokenPair>,
    by_address: HashMap<Address, PoolId>,
    authority: Arc<dyn PairAuthority + Send + Sync>,
}

impl core::fmt::Debug for PoolRegistry {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PoolRegistry")
            .field("address", &self.address)
            .field("admin", &self.admin)
            .field("fee_to", &self.fee_to)
            .field("pairs", &self.all_pairs.len())
            .finish_non_exhaustive()
    }
}

impl PoolRegistry {
    /// Creates an empty registry where only pair owners may update pairs.
    #[must_use]
    pub fn new(config: &ExchangeConfig) -> Self {
        Self::with_authority(config, Arc::new(OwnerOnly))
    }

    /// Creates an empty registry consulting `authority` for non-owner
    /// pair updates.
    #[must_use]
    pub fn with_authority(
        config: &ExchangeConfig,
        authority: Arc<dyn PairAuthority + Send + Sync>,
    ) -> Self {
        Self {
            address: config.registry(),
            router: config.router(),
            admin: config.admin(),
            fee_to: Address::ZERO,
            pools: Vec::new(),
            pairs: HashMap::new(),
            all_pairs: Vec::new(),
            by_address: HashMap::new(),
            authority,
        }
    }

    /// Registry address.
    #[must_use]
    pub const fn address(&self) -> Address {
        self.address
    }

    /// Protocol fee recipient; zero when unset.
    #[must_use]
    pub const fn fee_to(&self) -> Address {
        self.fee_to
    }

    /// Account allowed to change `fee_to` and `admin`.
    #[must_use]
    pub const fn admin(&self) -> Address {
        self.admin
    }

    /// Number of registered pairs.
    #[must_use]
    pub fn all_pairs_length(&self) -> usize {
        self.all_pairs.len()
    }

    /// Pair registered at position `index` (0-based).
    #[must_use]
    pub fn all_pairs(&self, index: usize) -> Option<TokenPair> {
        self.all_pairs.get(index).copied()
    }

    /// Sets the protocol fee recipient.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::Forbidden`] unless `caller` is the admin.
    pub fn set_fee_to(&mut self, caller: Address, fee_to: Address) -> Result<(), AmmError> {
        if caller != self.admin {
            return Err(AmmError::Forbidden);
        }
        self.fee_to = fee_to;
        info!(%fee_to, "protocol fee recipient updated");
        Ok(())
    }

    /// Hands the admin role to `admin`.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::Forbidden`] unless `caller` is the admin.
    pub fn set_admin(&mut self, caller: Address, admin: Address) -> Result<(), AmmError> {
        if caller != self.admin {
            return Err(AmmError::Forbidden);
        }
        self.admin = admin;
        info!(%admin, "registry admin updated");
        Ok(())
    }

    /// `(pool where x flows in, pool where y flows in)`, or two zero
    /// addresses if the pair is unknown.
    #[must_use]
    pub fn get_pair(&self, token_x: Address, token_y: Address) -> (Address, Address) {
        let lookup = || {
            let x_in = self.pool_for(token_x, token_y)?;
            let y_in = self.pool_for(token_y, token_x)?;
            Some((self.pools.get(x_in.index())?.address(), self.pools.get(y_in.index())?.address()))
        };
        lookup().unwrap_or((Address::ZERO, Address::ZERO))
    }

    /// Id of the pool that takes `token_in` and pays `token_out`.
    #[must_use]
    pub fn pool_for(&self, token_in: Address, token_out: Address) -> Option<PoolId> {
        let pair = TokenPair::new(token_in, token_out).ok()?;
        let (aab, abb) = self.pairs.get(&pair)?;
        match pair.direction_from(token_in)? {
            Direction::Aab => Some(*aab),
            Direction::Abb => Some(*abb),
        }
    }

    /// Id of the pool at `address`.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::UnknownPool`] if no pool lives there.
    pub fn pool_id(&self, address: Address) -> Result<PoolId, AmmError> {
        self.by_address
            .get(&address)
            .copied()
            .ok_or(AmmError::UnknownPool)
    }

    /// The pool with id `id`.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::UnknownPool`] for an id the registry never issued.
    pub fn pool(&self, id: PoolId) -> Result<&DirectionalPool, AmmError> {
        self.pools.get(id.index()).ok_or(AmmError::UnknownPool)
    }

    /// The pool at `address`.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::UnknownPool`] if no pool lives there.
    pub fn pool_at(&self, address: Address) -> Result<&DirectionalPool, AmmError> {
        self.pool(self.pool_id(address)?)
    }

    pub(crate) fn pool_mut(&mut self, id: PoolId) -> Result<&mut DirectionalPool, AmmError> {
        self.pools.get_mut(id.index()).ok_or(AmmError::UnknownPool)
    }

    /// Mutable access to a pool and its sibling at once.
    pub(crate) fn pool_and_sibling_mut(
        &mut self,
        id: PoolId,
    ) -> Result<(&mut DirectionalPool, &mut DirectionalPool), AmmError> {
        let sibling = self.pool(id)?.sibling();
        let (i, j) = (id.index(), sibling.index());
        if i == j || i.max(j) >= self.pools.len() {
            return Err(AmmError::UnknownPool);
        }
        let (lo, hi) = (i.min(j), i.max(j));
        let (left, right) = self.pools.split_at_mut(hi);
        let low = left.get_mut(lo).ok_or(AmmError::UnknownPool)?;
        let high = right.first_mut().ok_or(AmmError::UnknownPool)?;
        Ok(if i < j { (low, high) } else { (high, low) })
    }

    /// Creates both pools of `{x, y}`, or updates their settings if the pair
    /// already exists.
    ///
    /// New pools grant the router an infinite allowance over both of their
    /// tokens and a `PairCreated` event is emitted with the 1-based pair
    /// index.
    ///
    /// Returns `(pool where x flows in, pool where y flows in)`.
    ///
    /// # Errors
    ///
    /// - [`AmmError::IdenticalAddresses`] if `x == y`.
    /// - [`AmmError::ZeroAddress`] if either token is zero.
    /// - [`AmmError::InvalidConfiguration`] for invalid `settings`.
    /// - [`AmmError::Forbidden`] if the pair exists and `caller` is neither
    ///   its owner nor approved by the pair authority.
    pub fn create_update_pair(
        &mut self,
        caller: Address,
        token_x: Address,
        token_y: Address,
        settings: PairSettings,
        tokens: &mut TokenBank,
        log: &mut EventLog,
    ) -> Result<(Address, Address), AmmError> {
        let pair = TokenPair::new(token_x, token_y)?;
        settings.validate()?;

        if let Some(&(aab, abb)) = self.pairs.get(&pair) {
            let owner = self.pool(aab)?.settings().owner();
            if caller != owner && !self.authority.can_update(&pair, owner, caller) {
                return Err(AmmError::Forbidden);
            }
            self.pool_mut(aab)?.set_settings(settings);
            self.pool_mut(abb)?.set_settings(settings);
            info!(
                token0 = %pair.token0(),
                token1 = %pair.token1(),
                owner = %settings.owner(),
                trigger_rate = %settings.trigger_rate(),
                "pair settings updated"
            );
            return Ok(self.get_pair(token_x, token_y));
        }

        let aab = PoolId::new(self.pools.len());
        let abb = PoolId::new(self.pools.len() + 1);
        for (id, sibling, direction) in [(aab, abb, Direction::Aab), (abb, aab, Direction::Abb)] {
            let (token_in, token_out) = pair.tokens(direction);
            let address = pool_address(self.address, token_in, token_out);
            if self.by_address.contains_key(&address) {
                return Err(AmmError::PairExists);
            }
            tokens.approve(token_in, address, self.router, Amount::MAX);
            tokens.approve(token_out, address, self.router, Amount::MAX);
            self.by_address.insert(address, id);
            self.pools.push(DirectionalPool::new(
                id, sibling, address, pair, direction, settings,
            ));
        }
        self.pairs.insert(pair, (aab, abb));
        self.all_pairs.push(pair);

        let (pool_aab, pool_abb) = (self.pool(aab)?.address(), self.pool(abb)?.address());
        log.emit(
            self.address,
            Event::PairCreated {
                token0: pair.token0(),
                token1: pair.token1(),
                pool_aab,
                pool_abb,
                pair_index: self.all_pairs.len(),
            },
        );
        info!(
            token0 = %pair.token0(),
            token1 = %pair.token1(),
            %pool_aab,
            %pool_abb,
            pair_index = self.all_pairs.len(),
            "pair created"
        );
        Ok(self.get_pair(token_x, token_y))
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::config::OracleMode;
    use crate::domain::BasisPoints;

    const ADMIN: Address = Address::repeat_byte(0xad);
    const OWNER: Address = Address::repeat_byte(0x0e);
    const MALLORY: Address = Address::repeat_byte(0x66);
    const A: Address = Address::repeat_byte(0x0a);
    const B: Address = Address::repeat_byte(0x0b);

    fn registry() -> PoolRegistry {
        let Ok(config) = ExchangeConfig::deployed_by(ADMIN) else {
            panic!("valid config");
        };
        PoolRegistry::new(&config)
    }

    fn settings(owner: Address, trigger: u32) -> PairSettings {
        let Ok(s) = PairSettings::new(owner, BasisPoints::new(trigger), OracleMode::Enabled) else {
            panic!("valid settings");
        };
        s
    }

    fn create(reg: &mut PoolRegistry, bank: &mut TokenBank, log: &mut EventLog) -> (Address, Address) {
        let Ok(pools) = reg.create_update_pair(OWNER, B, A, settings(OWNER, 10), bank, log) else {
            panic!("pair creation failed");
        };
        pools
    }

    #[test]
    fn creates_both_pools() {
        let (mut reg, mut bank, mut log) = (registry(), TokenBank::new(), EventLog::default());
        let (b_in, a_in) = create(&mut reg, &mut bank, &mut log);
        assert_eq!(a_in, pool_address(reg.address(), A, B));
        assert_eq!(b_in, pool_address(reg.address(), B, A));
        assert_eq!(reg.get_pair(A, B), (a_in, b_in));
        assert_eq!(reg.get_pair(B, A), (b_in, a_in));
        assert_eq!(reg.all_pairs_length(), 1);

        let Ok(pool) = reg.pool_at(a_in) else {
            panic!("pool registered");
        };
        assert_eq!(pool.token_in(), A);
        assert_eq!(pool.token_out(), B);
        let Ok(sibling) = reg.pool(pool.sibling()) else {
            panic!("sibling registered");
        };
        assert_eq!(sibling.address(), b_in);

        assert_eq!(
            log.entries()[0].event,
            Event::PairCreated {
                token0: A,
                token1: B,
                pool_aab: a_in,
                pool_abb: b_in,
                pair_index: 1,
            }
        );
        assert_eq!(bank.allowance(A, a_in, reg.router), Amount::MAX);
        assert_eq!(bank.allowance(B, b_in, reg.router), Amount::MAX);
    }

    #[test]
    fn unknown_pair_is_zero() {
        let reg = registry();
        assert_eq!(reg.get_pair(A, B), (Address::ZERO, Address::ZERO));
        assert_eq!(reg.get_pair(A, A), (Address::ZERO, Address::ZERO));
        assert_eq!(reg.pool_id(A), Err(AmmError::UnknownPool));
    }

    #[test]
    fn invalid_tokens_rejected() {
        let (mut reg, mut bank, mut log) = (registry(), TokenBank::new(), EventLog::default());
        assert_eq!(
            reg.create_update_pair(OWNER, A, A, settings(OWNER, 10), &mut bank, &mut log),
            Err(AmmError::IdenticalAddresses)
        );
        assert_eq!(
            reg.create_update_pair(OWNER, A, Address::ZERO, settings(OWNER, 10), &mut bank, &mut log),
            Err(AmmError::ZeroAddress)
        );
    }

    #[test]
    fn owner_updates_settings() {
        let (mut reg, mut bank, mut log) = (registry(), TokenBank::new(), EventLog::default());
        let (b_in, a_in) = create(&mut reg, &mut bank, &mut log);
        let new = settings(MALLORY, 50);
        assert_eq!(
            reg.create_update_pair(OWNER, A, B, new, &mut bank, &mut log),
            Ok((a_in, b_in))
        );
        for pool in [a_in, b_in] {
            let Ok(p) = reg.pool_at(pool) else {
                panic!("pool registered");
            };
            assert_eq!(p.settings(), new);
        }
        assert_eq!(reg.all_pairs_length(), 1);
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn stranger_cannot_update() {
        let (mut reg, mut bank, mut log) = (registry(), TokenBank::new(), EventLog::default());
        create(&mut reg, &mut bank, &mut log);
        assert_eq!(
            reg.create_update_pair(MALLORY, A, B, settings(MALLORY, 0), &mut bank, &mut log),
            Err(AmmError::Forbidden)
        );
    }

    #[test]
    fn custom_authority_consulted() {
        struct Delegate;
        impl PairAuthority for Delegate {
            fn can_update(&self, _pair: &TokenPair, _owner: Address, caller: Address) -> bool {
                caller == MALLORY
            }
        }
        let Ok(config) = ExchangeConfig::deployed_by(ADMIN) else {
            panic!("valid config");
        };
        let mut reg = PoolRegistry::with_authority(&config, Arc::new(Delegate));
        let (mut bank, mut log) = (TokenBank::new(), EventLog::default());
        create(&mut reg, &mut bank, &mut log);
        assert!(reg
            .create_update_pair(MALLORY, A, B, settings(MALLORY, 0), &mut bank, &mut log)
            .is_ok());
    }

    #[test]
    fn admin_settings_gated() {
        let mut reg = registry();
        assert_eq!(reg.set_fee_to(MALLORY, MALLORY), Err(AmmError::Forbidden));
        assert_eq!(reg.set_fee_to(ADMIN, OWNER), Ok(()));
        assert_eq!(reg.fee_to(), OWNER);
        assert_eq!(reg.set_admin(MALLORY, MALLORY), Err(AmmError::Forbidden));
        assert_eq!(reg.set_admin(ADMIN, OWNER), Ok(()));
        assert_eq!(reg.set_fee_to(ADMIN, ADMIN), Err(AmmError::Forbidden));
        assert_eq!(reg.admin(), OWNER);
    }

    #[test]
    fn sibling_access() {
        let (mut reg, mut bank, mut log) = (registry(), TokenBank::new(), EventLog::default());
        let (_, a_in) = create(&mut reg, &mut bank, &mut log);
        let Ok(id) = reg.pool_id(a_in) else {
            panic!("pool registered");
        };
        let Ok((pool, sibling)) = reg.pool_and_sibling_mut(id) else {
            panic!("expected both pools");
        };
        assert_eq!(pool.address(), a_in);
        assert_eq!(sibling.sibling(), pool.id());
    }
}

//! Liquidity-share token of a single pool.
//!
//! Every [`DirectionalPool`](crate::pools::DirectionalPool) owns one
//! `ShareLedger`.  The ledger emits `Transfer` and `Approval` events with
//! the pool's address as emitter, so mints appear as transfers from the
//! zero address and burns as transfers to it.

use std::collections::HashMap;

use alloy_primitives::Address;

use crate::domain::{Event, EventLog, Liquidity};
use crate::error::AmmError;
use crate::math::CheckedArithmetic;

/// Balances, allowances and permit nonces of one pool's shares.
///
/// Invariant: the sum of all balances equals [`ShareLedger::total_supply`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShareLedger {
    address: Address,
    total_supply: Liquidity,
    balances: HashMap<Address, Liquidity>,
    allowances: HashMap<(Address, Address), Liquidity>,
    nonces: HashMap<Address, u64>,
}

impl ShareLedger {
    /// Creates an empty ledger for the pool at `address`.
    #[must_use]
    pub fn new(address: Address) -> Self {
        Self {
            address,
            ..Self::default()
        }
    }

    /// Address of the pool issuing the shares.
    #[must_use]
    pub const fn address(&self) -> Address {
        self.address
    }

    /// Total shares in existence.
    #[must_use]
    pub const fn total_supply(&self) -> Liquidity {
        self.total_supply
    }

    /// Shares held by `holder`.
    #[must_use]
    pub fn balance_of(&self, holder: Address) -> Liquidity {
        self.balances.get(&holder).copied().unwrap_or_default()
    }

    /// Remaining allowance of `spender` over `owner`'s shares.
    #[must_use]
    pub fn allowance(&self, owner: Address, spender: Address) -> Liquidity {
        self.allowances
            .get(&(owner, spender))
            .copied()
            .unwrap_or_default()
    }

    /// Next permit nonce expected for `owner`.
    #[must_use]
    pub fn nonces(&self, owner: Address) -> u64 {
        self.nonces.get(&owner).copied().unwrap_or_default()
    }

    /// Creates `value` shares for `to`.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::Overflow`] if the supply would overflow.
    pub fn mint(&mut self, to: Address, value: Liquidity, log: &mut EventLog) -> Result<(), AmmError> {
        let supply = self.total_supply.safe_add(&value)?;
        let balance = self.balance_of(to).safe_add(&value)?;
        self.total_supply = supply;
        self.balances.insert(to, balance);
        log.emit(
            self.address,
            Event::Transfer {
                from: Address::ZERO,
                to,
                value,
            },
        );
        Ok(())
    }

    /// Destroys `value` of `from`'s shares.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InsufficientBalance`] if `from` holds too little.
    pub fn burn(
        &mut self,
        from: Address,
        value: Liquidity,
        log: &mut EventLog,
    ) -> Result<(), AmmError> {
        let balance = self
            .balance_of(from)
            .safe_sub(&value)
            .map_err(|_| AmmError::InsufficientBalance)?;
        self.total_supply = self.total_supply.safe_sub(&value)?;
        self.balances.insert(from, balance);
        log.emit(
            self.address,
            Event::Transfer {
                from,
                to: Address::ZERO,
                value,
            },
        );
        Ok(())
    }

    /// Moves shares from `from` to `to`.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InsufficientBalance`] if `from` holds too little.
    pub fn transfer(
        &mut self,
        from: Address,
        to: Address,
        value: Liquidity,
        log: &mut EventLog,
    ) -> Result<(), AmmError> {
        let from_balance = self
            .balance_of(from)
            .safe_sub(&value)
            .map_err(|_| AmmError::InsufficientBalance)?;
        if from != to {
            let to_balance = self.balance_of(to).safe_add(&value)?;
            self.balances.insert(from, from_balance);
            self.balances.insert(to, to_balance);
        }
        log.emit(self.address, Event::Transfer { from, to, value });
        Ok(())
    }

    /// Moves `from`'s shares on behalf of `spender`, consuming allowance
    /// unless it is [`Liquidity::MAX`].
    ///
    /// # Errors
    ///
    /// - [`AmmError::InsufficientAllowance`] if the allowance is too low.
    /// - [`AmmError::InsufficientBalance`] if `from` holds too little.
    pub fn transfer_from(
        &mut self,
        spender: Address,
        from: Address,
        to: Address,
        value: Liquidity,
        log: &mut EventLog,
    ) -> Result<(), AmmError> {
        let allowed = self.allowance(from, spender);
        let remaining = allowed
            .safe_sub(&value)
            .map_err(|_| AmmError::InsufficientAllowance)?;
        self.transfer(from, to, value, log)?;
        if allowed != Liquidity::MAX {
            self.allowances.insert((from, spender), remaining);
        }
        Ok(())
    }

    /// Sets `spender`'s allowance over `owner`'s shares.
    pub fn approve(
        &mut self,
        owner: Address,
        spender: Address,
        value: Liquidity,
        log: &mut EventLog,
    ) {
        self.allowances.insert((owner, spender), value);
        log.emit(
            self.address,
            Event::Approval {
                owner,
                spender,
                value,
            },
        );
    }

    /// Applies a signed approval whose signature the caller already verified.
    ///
    /// `nonce` must equal [`ShareLedger::nonces`] for `owner`; it is then
    /// incremented.
    ///
    /// # Errors
    ///
    /// - [`AmmError::Expired`] if `deadline < now`.
    /// - [`AmmError::InvalidNonce`] if `nonce` is not the expected one.
    #[allow(clippy::too_many_arguments)]
    pub fn permit(
        &mut self,
        owner: Address,
        spender: Address,
        value: Liquidity,
        deadline: u64,
        nonce: u64,
        now: u64,
        log: &mut EventLog,
    ) -> Result<(), AmmError> {
        if deadline < now {
            return Err(AmmError::Expired);
        }
        let expected = self.nonces(owner);
        if nonce != expected {
            return Err(AmmError::InvalidNonce {
                expected,
                got: nonce,
            });
        }
        self.nonces.insert(owner, expected.saturating_add(1));
        self.approve(owner, spender, value, log);
        Ok(())
    }
}

//! In-memory balances and allowances for every external token.

use std::collections::HashMap;

use alloy_primitives::Address;

use crate::domain::Amount;
use crate::error::AmmError;
use crate::math::CheckedArithmetic;
use crate::traits::TokenLedger;

/// Balances keyed by `(token, holder)`, allowances by `(token, owner,
/// spender)`.
///
/// An allowance of [`Amount::MAX`] is infinite and never decremented.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenBank {
    balances: HashMap<(Address, Address), Amount>,
    allowances: HashMap<(Address, Address, Address), Amount>,
}

impl TokenBank {
    /// Creates an empty bank.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Credits `amount` of `token` to `to` out of thin air.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::Overflow`] if the balance would overflow.
    pub fn mint(&mut self, token: Address, to: Address, amount: Amount) -> Result<(), AmmError> {
        let balance = self.balance_of(token, to).safe_add(&amount)?;
        self.balances.insert((token, to), balance);
        Ok(())
    }

    /// Sets the allowance of `spender` over `owner`'s `token`.
    pub fn approve(&mut self, token: Address, owner: Address, spender: Address, amount: Amount) {
        self.allowances.insert((token, owner, spender), amount);
    }

    /// Remaining allowance of `spender` over `owner`'s `token`.
    #[must_use]
    pub fn allowance(&self, token: Address, owner: Address, spender: Address) -> Amount {
        self.allowances
            .get(&(token, owner, spender))
            .copied()
            .unwrap_or_default()
    }

    /// Moves `owner`'s tokens on behalf of `spender`, consuming allowance.
    ///
    /// # Errors
    ///
    /// - [`AmmError::InsufficientAllowance`] if the allowance is too low.
    /// - [`AmmError::InsufficientBalance`] if `owner` holds too little.
    pub fn transfer_from(
        &mut self,
        token: Address,
        spender: Address,
        owner: Address,
        to: Address,
        amount: Amount,
    ) -> Result<(), AmmError> {
        let allowed = self.allowance(token, owner, spender);
        if allowed < amount {
            return Err(AmmError::InsufficientAllowance);
        }
        self.transfer(token, owner, to, amount)?;
        if allowed != Amount::MAX {
            self.allowances
                .insert((token, owner, spender), allowed.safe_sub(&amount)?);
        }
        Ok(())
    }
}

impl TokenLedger for TokenBank {
    fn balance_of(&self, token: Address, holder: Address) -> Amount {
        self.balances
            .get(&(token, holder))
            .copied()
            .unwrap_or_default()
    }

    fn transfer(
        &mut self,
        token: Address,
        from: Address,
        to: Address,
        amount: Amount,
    ) -> Result<(), AmmError> {
        let from_balance = self
            .balance_of(token, from)
            .safe_sub(&amount)
            .map_err(|_| AmmError::InsufficientBalance)?;
        if from == to {
            return Ok(());
        }
        let to_balance = self.balance_of(token, to).safe_add(&amount)?;
        self.balances.insert((token, from), from_balance);
        self.balances.insert((token, to), to_balance);
        Ok(())
    }
}

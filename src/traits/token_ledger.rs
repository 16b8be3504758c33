//! Fungible token balances as seen by a pool.
//!
//! Pools never cache their holdings: every mint, burn and swap re-reads the
//! balance of its own account through [`TokenLedger::balance_of`] and moves
//! tokens out through [`TokenLedger::transfer`].  The crate ships
//! [`TokenBank`](crate::ledger::TokenBank) as the in-memory implementation.

use alloy_primitives::Address;

use crate::domain::Amount;
use crate::error::AmmError;

/// Minimal ledger interface the pools depend on.
///
/// `transfer` moves `amount` of `token` from `from` to `to` on behalf of
/// `from`; allowance checks belong to the caller.  A failed transfer must
/// leave both balances unchanged.
pub trait TokenLedger {
    /// Balance of `holder` in `token`.
    fn balance_of(&self, token: Address, holder: Address) -> Amount;

    /// Moves tokens between two accounts.
    ///
    /// # Errors
    ///
    /// - [`AmmError::InsufficientBalance`] if `from` holds less than `amount`.
    /// - [`AmmError::Overflow`] if the recipient balance would overflow.
    fn transfer(
        &mut self,
        token: Address,
        from: Address,
        to: Address,
        amount: Amount,
    ) -> Result<(), AmmError>;
}

//! Flash-swap hook.
//!
//! A pool pays `amount_out` to the recipient before it checks that it was
//! paid.  If the caller supplies a [`SwapCallee`], the pool invokes it in
//! between: the callee may use the borrowed tokens and must leave enough
//! input in the pool for the invariant check that follows.
//!
//! The callee only receives an [`AccountTokens`] handle scoped to the swap
//! recipient.  It can read balances and spend the recipient's tokens, but it
//! has no path back into any pool, so a re-entrant swap, mint or burn cannot
//! be expressed.

use alloy_primitives::Address;

use super::TokenLedger;
use crate::domain::Amount;
use crate::error::AmmError;

/// Receiver of the optimistic output of a swap.
pub trait SwapCallee {
    /// Called after `amount_out` of the pool's output token has been paid to
    /// `tokens.account()`.
    ///
    /// # Errors
    ///
    /// Any error aborts the whole swap.
    fn on_swap(
        &mut self,
        tokens: &mut AccountTokens<'_>,
        sender: Address,
        amount_out: Amount,
        data: &[u8],
    ) -> Result<(), AmmError>;
}

/// Token access restricted to a single account.
pub struct AccountTokens<'a> {
    ledger: &'a mut dyn TokenLedger,
    account: Address,
}

impl<'a> AccountTokens<'a> {
    pub(crate) fn new(ledger: &'a mut dyn TokenLedger, account: Address) -> Self {
        Self { ledger, account }
    }

    /// The account this handle acts for.
    #[must_use]
    pub fn account(&self) -> Address {
        self.account
    }

    /// Balance of any holder.
    #[must_use]
    pub fn balance_of(&self, token: Address, holder: Address) -> Amount {
        self.ledger.balance_of(token, holder)
    }

    /// Sends the account's tokens to `to`.
    ///
    /// # Errors
    ///
    /// Propagates the ledger's transfer errors.
    pub fn transfer(&mut self, token: Address, to: Address, amount: Amount) -> Result<(), AmmError> {
        self.ledger.transfer(token, self.account, to, amount)
    }
}

impl core::fmt::Debug for AccountTokens<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("AccountTokens")
            .field("account", &self.account)
            .finish_non_exhaustive()
    }
}

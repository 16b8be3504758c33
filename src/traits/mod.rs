//! Seams between the engine and its collaborators.
//!
//! - [`TokenLedger`]: fungible balances the pools hold and move
//! - [`SwapCallee`]: flash-swap hook invoked between payout and check
//! - [`PairAuthority`]: who besides the owner may reconfigure a pair

mod pair_authority;
mod swap_callee;
mod token_ledger;

pub use pair_authority::{OwnerOnly, PairAuthority};
pub use swap_callee::{AccountTokens, SwapCallee};
pub use token_ledger::TokenLedger;

//! Environment a pool operation runs against.

use alloy_primitives::Address;

use crate::domain::{EventLog, FeeTier};
use crate::traits::TokenLedger;

/// Everything a pool needs from outside its own state for one call.
///
/// The exchange builds a fresh context per transaction from its working
/// copy, so anything written through `tokens` or `log` is discarded with
/// the copy if the transaction fails.
pub struct PoolContext<'a> {
    /// Token balances of all accounts, pools included.
    pub tokens: &'a mut dyn TokenLedger,
    /// Event sink.
    pub log: &'a mut EventLog,
    /// Account invoking the pool (`msg.sender`).
    pub sender: Address,
    /// Current block timestamp, truncated to 32 bits.
    pub now: u32,
    /// Protocol fee recipient; zero disables the protocol share.
    pub fee_to: Address,
    /// Fee charged on swap input.
    pub swap_fee: FeeTier,
}

impl core::fmt::Debug for PoolContext<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PoolContext")
            .field("sender", &self.sender)
            .field("now", &self.now)
            .field("fee_to", &self.fee_to)
            .field("swap_fee", &self.swap_fee)
            .finish_non_exhaustive()
    }
}

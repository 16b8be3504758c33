//! Events emitted by pools, share ledgers and the registry.

use alloy_primitives::Address;

use super::{Amount, Liquidity};

/// An event in the order it was emitted.
///
/// Pool-level amounts are oriented by the emitting pool's direction:
/// `amount_in` is always the pool's input token, `amount_out` its output
/// token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Liquidity shares moved; `from == 0` is a mint, `to == 0` a burn.
    Transfer {
        from: Address,
        to: Address,
        value: Liquidity,
    },
    /// Share allowance set.
    Approval {
        owner: Address,
        spender: Address,
        value: Liquidity,
    },
    /// Reserves committed.
    Sync {
        reserve_in: Amount,
        reserve_out: Amount,
    },
    /// Liquidity added.
    Mint {
        sender: Address,
        amount_in: Amount,
        amount_out: Amount,
    },
    /// Liquidity removed.
    Burn {
        sender: Address,
        amount_in: Amount,
        amount_out: Amount,
        to: Address,
    },
    /// Swap settled.
    Swap {
        sender: Address,
        amount_in: Amount,
        amount_out: Amount,
        to: Address,
    },
    /// New pair registered; `pair_index` is 1-based.
    PairCreated {
        token0: Address,
        token1: Address,
        pool_aab: Address,
        pool_abb: Address,
        pair_index: usize,
    },
    /// Sibling pools rebalanced: `amount0` of token0 moved from
    /// `token0_source` to `token0_sink`, `amount1` of token1 moved back.
    Arbitrage {
        token0_source: Address,
        token0_sink: Address,
        amount0: Amount,
        amount1: Amount,
    },
}

/// An [`Event`] tagged with the address that emitted it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    /// Pool, share ledger or registry address.
    pub emitter: Address,
    /// The event payload.
    pub event: Event,
}

/// Append-only, ordered event log.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventLog {
    entries: Vec<LogEntry>,
}

impl EventLog {
    /// Appends an event.
    pub fn emit(&mut self, emitter: Address, event: Event) {
        self.entries.push(LogEntry { emitter, event });
    }

    /// All entries in emission order.
    #[must_use]
    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    /// Number of recorded entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `true` if nothing was emitted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries emitted after the first `from` entries.
    #[must_use]
    pub fn since(&self, from: usize) -> &[LogEntry] {
        self.entries.get(from..).unwrap_or_default()
    }

    /// Drops every entry after the first `len`.
    pub(crate) fn truncate(&mut self, len: usize) {
        self.entries.truncate(len);
    }

    /// Removes and returns every entry.
    pub fn drain(&mut self) -> Vec<LogEntry> {
        core::mem::take(&mut self.entries)
    }
}

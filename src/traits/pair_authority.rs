//! Authorization hook for updating an existing pair's settings.

use alloy_primitives::Address;

use crate::domain::TokenPair;

/// Decides whether `caller` may change the settings of `pair`.
///
/// The registry always lets the recorded owner through; the hook is only
/// consulted for everyone else.  Implementations can delegate to any
/// external ownership record.
pub trait PairAuthority {
    /// `true` if `caller` may update `pair`, whose owner is `owner`.
    fn can_update(&self, pair: &TokenPair, owner: Address, caller: Address) -> bool;
}

/// Only the recorded owner may update a pair.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OwnerOnly;

impl PairAuthority for OwnerOnly {
    fn can_update(&self, _pair: &TokenPair, owner: Address, caller: Address) -> bool {
        owner == caller
    }
}

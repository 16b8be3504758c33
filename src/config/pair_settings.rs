//! Per-pair settings shared by both directional pools.

use alloy_primitives::Address;
use serde::{Deserialize, Serialize};

use crate::domain::BasisPoints;
use crate::error::AmmError;

/// Whether a pair maintains its price oracle and fee baseline.
///
/// While disabled, the price accumulators and `k_last` stay at zero, which
/// also switches off protocol and creator fee minting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OracleMode {
    /// Accumulate prices and record `k_last`.
    #[default]
    Enabled,
    /// Keep accumulators and `k_last` at zero.
    Disabled,
}

impl OracleMode {
    /// `true` for [`OracleMode::Enabled`].
    #[must_use]
    pub const fn is_enabled(self) -> bool {
        matches!(self, Self::Enabled)
    }
}

/// Owner, arbitrage trigger and oracle mode of a pair.
///
/// # Validation
///
/// - `trigger_rate` must not exceed 10 000 basis points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PairSettings {
    owner: Address,
    trigger_rate: BasisPoints,
    #[serde(default)]
    oracle: OracleMode,
}

impl PairSettings {
    /// Creates validated settings.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InvalidConfiguration`] if `trigger_rate` is above
    /// 100%.
    pub fn new(
        owner: Address,
        trigger_rate: BasisPoints,
        oracle: OracleMode,
    ) -> Result<Self, AmmError> {
        let settings = Self {
            owner,
            trigger_rate,
            oracle,
        };
        settings.validate()?;
        Ok(settings)
    }

    /// Validates all invariants.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InvalidConfiguration`] if `trigger_rate` is above
    /// 100%.
    pub fn validate(&self) -> Result<(), AmmError> {
        if !self.trigger_rate.is_valid_percent() {
            return Err(AmmError::InvalidConfiguration(
                "trigger rate must not exceed 10000 bp",
            ));
        }
        Ok(())
    }

    /// Receiver of the creator fee share; zero disables it.
    #[must_use]
    pub const fn owner(&self) -> Address {
        self.owner
    }

    /// Relative price divergence above which sibling pools rebalance.
    #[must_use]
    pub const fn trigger_rate(&self) -> BasisPoints {
        self.trigger_rate
    }

    /// Oracle mode.
    #[must_use]
    pub const fn oracle(&self) -> OracleMode {
        self.oracle
    }
}

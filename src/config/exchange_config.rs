//! Process-wide configuration of an [`Exchange`](crate::exchange::Exchange).

use alloy_primitives::Address;
use serde::{Deserialize, Serialize};

use crate::domain::{BasisPoints, FeeTier};
use crate::error::AmmError;

/// Addresses and economic defaults fixed when the exchange is constructed.
///
/// # Derived Values
///
/// [`ExchangeConfig::deployed_by`] places the registry and router at the
/// first two contract-creation addresses of the admin account.
///
/// # Validation
///
/// - `admin`, `registry` and `router` must be non-zero and distinct.
/// - `swap_fee` must be below 100%.
/// - `default_trigger_rate` must not exceed 10 000 basis points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeConfig {
    admin: Address,
    registry: Address,
    router: Address,
    #[serde(default)]
    swap_fee: FeeTier,
    #[serde(default = "default_trigger_rate")]
    default_trigger_rate: BasisPoints,
}

const fn default_trigger_rate() -> BasisPoints {
    ExchangeConfig::DEFAULT_TRIGGER_RATE
}

impl ExchangeConfig {
    /// Trigger rate given to pairs the router creates on the fly.
    pub const DEFAULT_TRIGGER_RATE: BasisPoints = BasisPoints::new(10);

    /// Creates a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::ZeroAddress`] for a zero address and
    /// [`AmmError::InvalidConfiguration`] for any other violated invariant.
    pub fn new(
        admin: Address,
        registry: Address,
        router: Address,
        swap_fee: FeeTier,
        default_trigger_rate: BasisPoints,
    ) -> Result<Self, AmmError> {
        let config = Self {
            admin,
            registry,
            router,
            swap_fee,
            default_trigger_rate,
        };
        config.validate()?;
        Ok(config)
    }

    /// Default fee and trigger, with registry and router at `admin`'s
    /// nonce-0 and nonce-1 creation addresses.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::ZeroAddress`] if `admin` is zero.
    pub fn deployed_by(admin: Address) -> Result<Self, AmmError> {
        Self::new(
            admin,
            admin.create(0),
            admin.create(1),
            FeeTier::DEFAULT_SWAP,
            Self::DEFAULT_TRIGGER_RATE,
        )
    }

    /// Returns a copy with a different swap fee.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InvalidConfiguration`] if the fee is 100% or more.
    pub fn with_swap_fee(self, swap_fee: FeeTier) -> Result<Self, AmmError> {
        let config = Self { swap_fee, ..self };
        config.validate()?;
        Ok(config)
    }

    /// Validates all configuration invariants.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::ZeroAddress`] for a zero address and
    /// [`AmmError::InvalidConfiguration`] for any other violated invariant.
    pub fn validate(&self) -> Result<(), AmmError> {
        if self.admin.is_zero() || self.registry.is_zero() || self.router.is_zero() {
            return Err(AmmError::ZeroAddress);
        }
        if self.registry == self.router || self.admin == self.registry || self.admin == self.router
        {
            return Err(AmmError::InvalidConfiguration(
                "admin, registry and router must be distinct",
            ));
        }
        if self.swap_fee.complement().is_none() {
            return Err(AmmError::InvalidConfiguration("swap fee must be below 100%"));
        }
        if !self.default_trigger_rate.is_valid_percent() {
            return Err(AmmError::InvalidConfiguration(
                "trigger rate must not exceed 10000 bp",
            ));
        }
        Ok(())
    }

    /// Initial registry admin.
    #[must_use]
    pub const fn admin(&self) -> Address {
        self.admin
    }

    /// Registry address; pool addresses derive from it.
    #[must_use]
    pub const fn registry(&self) -> Address {
        self.registry
    }

    /// Router address; pools grant it infinite allowances.
    #[must_use]
    pub const fn router(&self) -> Address {
        self.router
    }

    /// Swap fee enforced by every pool.
    #[must_use]
    pub const fn swap_fee(&self) -> FeeTier {
        self.swap_fee
    }

    /// Trigger rate for pairs created by the router.
    #[must_use]
    pub const fn default_trigger_rate(&self) -> BasisPoints {
        self.default_trigger_rate
    }
}

//! Checked arithmetic trait for domain wrapper types and 256-bit words.
//!
//! The [`CheckedArithmetic`] trait provides fallible arithmetic operations
//! that return [`Result<Self, AmmError>`](crate::error::AmmError) instead
//! of panicking or wrapping on overflow, underflow, or division by zero.
//!
//! # Implementations
//!
//! - [`Amount`] — token quantities (`u128`)
//! - [`Liquidity`] — pool share quantities (`u128`)
//! - [`U256`] — reserve products, fee numerators, oracle prices
//!
//! # Examples
//!
//! ```
//! use dualpool_amm::domain::Amount;
//! use dualpool_amm::math::CheckedArithmetic;
//!
//! let a = Amount::new(100);
//! let b = Amount::new(200);
//! assert_eq!(a.safe_add(&b), Ok(Amount::new(300)));
//! assert!(a.safe_sub(&b).is_err());
//! ```

use alloy_primitives::U256;

use crate::domain::{Amount, Liquidity};
use crate::error::AmmError;

/// Fallible arithmetic for domain wrapper types.
///
/// Every method returns [`Result<Self, AmmError>`] with a specific error
/// variant so callers can distinguish overflow from underflow from
/// division by zero.
///
/// # Contract
///
/// - **No panics** — all error conditions produce `Err`.
/// - **No saturation** — errors propagate instead.
/// - Division truncates toward zero.
pub trait CheckedArithmetic: Sized {
    /// Checked addition.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::Overflow`] if the result exceeds the
    /// representable range.
    fn safe_add(&self, other: &Self) -> Result<Self, AmmError>;

    /// Checked subtraction.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::Underflow`] if the result would be negative.
    fn safe_sub(&self, other: &Self) -> Result<Self, AmmError>;

    /// Checked multiplication.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::Overflow`] if the result exceeds the
    /// representable range.
    fn safe_mul(&self, other: &Self) -> Result<Self, AmmError>;

    /// Floor division.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::DivisionByZero`] if `other` is zero.
    fn safe_div(&self, other: &Self) -> Result<Self, AmmError>;
}

// ---------------------------------------------------------------------------
// Amount
// ---------------------------------------------------------------------------

impl CheckedArithmetic for Amount {
    #[inline]
    fn safe_add(&self, other: &Self) -> Result<Self, AmmError> {
        self.checked_add(other)
            .ok_or(AmmError::Overflow("amount addition overflow"))
    }

    #[inline]
    fn safe_sub(&self, other: &Self) -> Result<Self, AmmError> {
        self.checked_sub(other)
            .ok_or(AmmError::Underflow("amount subtraction underflow"))
    }

    #[inline]
    fn safe_mul(&self, other: &Self) -> Result<Self, AmmError> {
        self.checked_mul(other)
            .ok_or(AmmError::Overflow("amount multiplication overflow"))
    }

    #[inline]
    fn safe_div(&self, other: &Self) -> Result<Self, AmmError> {
        self.checked_div(other).ok_or(AmmError::DivisionByZero)
    }
}

// ---------------------------------------------------------------------------
// Liquidity
// ---------------------------------------------------------------------------

impl CheckedArithmetic for Liquidity {
    #[inline]
    fn safe_add(&self, other: &Self) -> Result<Self, AmmError> {
        self.checked_add(other)
            .ok_or(AmmError::Overflow("liquidity addition overflow"))
    }

    #[inline]
    fn safe_sub(&self, other: &Self) -> Result<Self, AmmError> {
        self.checked_sub(other)
            .ok_or(AmmError::Underflow("liquidity subtraction underflow"))
    }

    #[inline]
    fn safe_mul(&self, other: &Self) -> Result<Self, AmmError> {
        self.get()
            .checked_mul(other.get())
            .map(Liquidity::new)
            .ok_or(AmmError::Overflow("liquidity multiplication overflow"))
    }

    fn safe_div(&self, other: &Self) -> Result<Self, AmmError> {
        if other.is_zero() {
            return Err(AmmError::DivisionByZero);
        }
        Ok(Liquidity::new(self.get() / other.get()))
    }
}

// ---------------------------------------------------------------------------
// U256
// ---------------------------------------------------------------------------

impl CheckedArithmetic for U256 {
    #[inline]
    fn safe_add(&self, other: &Self) -> Result<Self, AmmError> {
        self.checked_add(*other)
            .ok_or(AmmError::Overflow("u256 addition overflow"))
    }

    #[inline]
    fn safe_sub(&self, other: &Self) -> Result<Self, AmmError> {
        self.checked_sub(*other)
            .ok_or(AmmError::Underflow("u256 subtraction underflow"))
    }

    #[inline]
    fn safe_mul(&self, other: &Self) -> Result<Self, AmmError> {
        self.checked_mul(*other)
            .ok_or(AmmError::Overflow("u256 multiplication overflow"))
    }

    #[inline]
    fn safe_div(&self, other: &Self) -> Result<Self, AmmError> {
        self.checked_div(*other).ok_or(AmmError::DivisionByZero)
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    mod amount {
        use super::*;

        #[test]
        fn add_overflow() {
            let Err(AmmError::Overflow(_)) = Amount::MAX.safe_add(&Amount::new(1)) else {
                panic!("expected Overflow");
            };
        }

        #[test]
        fn sub_underflow() {
            let Err(AmmError::Underflow(_)) = Amount::new(1).safe_sub(&Amount::new(2)) else {
                panic!("expected Underflow");
            };
        }

        #[test]
        fn div_by_zero() {
            assert_eq!(
                Amount::new(100).safe_div(&Amount::ZERO),
                Err(AmmError::DivisionByZero)
            );
        }

        #[test]
        fn chaining_works() {
            // (100 + 200) * 3 - 100 = 800
            let result = Amount::new(100)
                .safe_add(&Amount::new(200))
                .and_then(|v| v.safe_mul(&Amount::new(3)))
                .and_then(|v| v.safe_sub(&Amount::new(100)))
                .and_then(|v| v.safe_div(&Amount::new(3)));
            assert_eq!(result, Ok(Amount::new(266)));
        }
    }

    mod liquidity {
        use super::*;

        #[test]
        fn mul_and_div() {
            assert_eq!(
                Liquidity::new(10).safe_mul(&Liquidity::new(20)),
                Ok(Liquidity::new(200))
            );
            assert_eq!(
                Liquidity::new(10).safe_div(&Liquidity::new(3)),
                Ok(Liquidity::new(3))
            );
            assert_eq!(
                Liquidity::new(10).safe_div(&Liquidity::ZERO),
                Err(AmmError::DivisionByZero)
            );
        }

        #[test]
        fn sub_underflow() {
            let Err(AmmError::Underflow(_)) = Liquidity::new(1).safe_sub(&Liquidity::new(2))
            else {
                panic!("expected Underflow");
            };
        }
    }

    mod wide {
        use super::*;

        #[test]
        fn mul_overflow() {
            let Err(AmmError::Overflow(_)) = U256::MAX.safe_mul(&U256::from(2u8)) else {
                panic!("expected Overflow");
            };
        }

        #[test]
        fn reserve_product_fits() {
            let r = U256::from(Amount::MAX_RESERVE.get());
            let Ok(k) = r.safe_mul(&r) else {
                panic!("expected Ok");
            };
            assert!(k.safe_mul(&U256::from(10_000u32 * 10_000u32)).is_ok());
        }

        #[test]
        fn div_by_zero() {
            assert_eq!(
                U256::from(1u8).safe_div(&U256::ZERO),
                Err(AmmError::DivisionByZero)
            );
        }
    }
}

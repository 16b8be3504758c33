//! Sorted pair of distinct tokens and the two flow directions over it.

use alloy_primitives::Address;

use crate::error::AmmError;

/// An unordered pair of distinct tokens, stored canonically sorted.
///
/// The canonical ordering guarantees `token0 < token1`, so `(A, B)` and
/// `(B, A)` name the same pair and map to the same registry entry.
///
/// # Examples
///
/// ```
/// use alloy_primitives::Address;
/// use dualpool_amm::domain::{Direction, TokenPair};
///
/// let a = Address::repeat_byte(0x0a);
/// let b = Address::repeat_byte(0x0b);
///
/// let pair = TokenPair::new(b, a).expect("distinct tokens");
/// assert_eq!(pair.token0(), a);
/// assert_eq!(pair.direction_from(a), Some(Direction::Aab));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TokenPair {
    token0: Address,
    token1: Address,
}

impl TokenPair {
    /// Creates a canonically-ordered `TokenPair`.
    ///
    /// # Errors
    ///
    /// - [`AmmError::IdenticalAddresses`] if both tokens are the same.
    /// - [`AmmError::ZeroAddress`] if either token is the zero address.
    pub fn new(token_x: Address, token_y: Address) -> Result<Self, AmmError> {
        if token_x == token_y {
            return Err(AmmError::IdenticalAddresses);
        }
        let (token0, token1) = if token_x < token_y {
            (token_x, token_y)
        } else {
            (token_y, token_x)
        };
        if token0 == Address::ZERO {
            return Err(AmmError::ZeroAddress);
        }
        Ok(Self { token0, token1 })
    }

    /// Returns the lower-addressed token.
    #[must_use]
    pub const fn token0(&self) -> Address {
        self.token0
    }

    /// Returns the higher-addressed token.
    #[must_use]
    pub const fn token1(&self) -> Address {
        self.token1
    }

    /// Returns `true` if `token` is part of this pair.
    #[must_use]
    pub fn contains(&self, token: Address) -> bool {
        self.token0 == token || self.token1 == token
    }

    /// Returns the counterpart of `token`, or `None` if it is not in the pair.
    #[must_use]
    pub fn other(&self, token: Address) -> Option<Address> {
        if token == self.token0 {
            Some(self.token1)
        } else if token == self.token1 {
            Some(self.token0)
        } else {
            None
        }
    }

    /// Direction of the pool into which `token_in` flows.
    #[must_use]
    pub fn direction_from(&self, token_in: Address) -> Option<Direction> {
        if token_in == self.token0 {
            Some(Direction::Aab)
        } else if token_in == self.token1 {
            Some(Direction::Abb)
        } else {
            None
        }
    }

    /// `(token_in, token_out)` of the pool flowing in `direction`.
    #[must_use]
    pub const fn tokens(&self, direction: Direction) -> (Address, Address) {
        match direction {
            Direction::Aab => (self.token0, self.token1),
            Direction::Abb => (self.token1, self.token0),
        }
    }
}

/// Flow direction of one pool of a pair, relative to the sorted tokens.
///
/// `Aab` takes `token0` in and pays `token1` out; `Abb` is its mirror.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Direction {
    /// `token0` in, `token1` out.
    Aab,
    /// `token1` in, `token0` out.
    Abb,
}

impl Direction {
    /// The sibling pool's direction.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Aab => Self::Abb,
            Self::Abb => Self::Aab,
        }
    }

    /// Converts between `(token0, token1)` order and this direction's
    /// `(in, out)` order.  The mapping is its own inverse.
    #[must_use]
    pub fn orient<T>(self, values: (T, T)) -> (T, T) {
        match self {
            Self::Aab => values,
            Self::Abb => (values.1, values.0),
        }
    }
}

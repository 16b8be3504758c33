//! Unified error types for the dual-pool AMM engine.
//!
//! All fallible operations across the crate return `AmmError` as their
//! error type, ensuring a consistent error handling experience for consumers.
//! Every variant is a synchronous validation failure: the exchange rolls
//! back the whole operation before the error reaches the caller.

use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = core::result::Result<T, AmmError>;

/// Every failure the engine can report.
///
/// The first group mirrors the string-coded reverts of the pair, factory
/// and router contracts.  The second group covers arithmetic and ledger
/// failures that the integer math surfaces explicitly instead of wrapping.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AmmError {
    // -- pair / factory -----------------------------------------------------
    /// Both tokens of a pair are the same address.
    #[error("identical addresses")]
    IdenticalAddresses,

    /// A token address is the zero address.
    #[error("zero address")]
    ZeroAddress,

    /// Caller is not allowed to perform the operation.
    #[error("forbidden")]
    Forbidden,

    /// The pair already exists where a fresh pair was required.
    #[error("pair exists")]
    PairExists,

    /// Quote amount is zero.
    #[error("insufficient amount")]
    InsufficientAmount,

    /// Reserves are empty or cannot cover the requested output.
    #[error("insufficient liquidity")]
    InsufficientLiquidity,

    /// No input was received, or the quoted input is zero.
    #[error("insufficient input amount")]
    InsufficientInputAmount,

    /// The requested or received output is zero or below the minimum.
    #[error("insufficient output amount")]
    InsufficientOutputAmount,

    /// A mint would create zero liquidity shares.
    #[error("insufficient liquidity minted")]
    InsufficientLiquidityMinted,

    /// A burn would return zero of either token.
    #[error("insufficient liquidity burned")]
    InsufficientLiquidityBurned,

    /// Swap recipient is one of the pool's own tokens.
    #[error("invalid to")]
    InvalidTo,

    /// The fee-adjusted constant-product invariant would decrease.
    #[error("K")]
    K,

    // -- router ---------------------------------------------------------------
    /// A swap path has fewer than two tokens.
    #[error("invalid path")]
    InvalidPath,

    /// Required input exceeds the caller's maximum.
    #[error("excessive input amount")]
    ExcessiveInputAmount,

    /// Token A amount is below the caller's minimum.
    #[error("insufficient A amount")]
    InsufficientAAmount,

    /// Token B amount is below the caller's minimum.
    #[error("insufficient B amount")]
    InsufficientBAmount,

    /// The deadline has passed.
    #[error("expired")]
    Expired,

    /// Split ratio is outside `0..=100`.
    #[error("ratio must be within 0..=100, got {0}")]
    RatioError(u8),

    // -- arithmetic -----------------------------------------------------------
    /// An intermediate or stored value exceeds its representable range.
    #[error("arithmetic overflow: {0}")]
    Overflow(&'static str),

    /// A subtraction would go negative.
    #[error("arithmetic underflow: {0}")]
    Underflow(&'static str),

    /// Division by zero.
    #[error("division by zero")]
    DivisionByZero,

    // -- ledgers --------------------------------------------------------------
    /// Holder balance is below the transferred amount.
    #[error("insufficient balance")]
    InsufficientBalance,

    /// Spender allowance is below the transferred amount.
    #[error("insufficient allowance")]
    InsufficientAllowance,

    /// A permit nonce does not match the owner's current nonce.
    #[error("invalid nonce: expected {expected}, got {got}")]
    InvalidNonce {
        /// Nonce the ledger expects next.
        expected: u64,
        /// Nonce carried by the permit.
        got: u64,
    },

    /// No pool is registered under the given id or address.
    #[error("unknown pool")]
    UnknownPool,

    /// A configuration value is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(&'static str),
}

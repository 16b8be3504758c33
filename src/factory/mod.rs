//! Pair creation and lookup.
//!
//! The [`PoolRegistry`] owns every [`DirectionalPool`](crate::pools::DirectionalPool),
//! derives pool addresses deterministically via [`pool_address`], and holds
//! the admin-controlled protocol fee recipient.

mod registry;

pub use registry::{pool_address, PoolRegistry, POOL_CREATION_CODE};

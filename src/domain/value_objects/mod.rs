//! Domain Value Objects
//!
//! Immutable value types that represent domain concepts.

mod hash;
mod kind;

pub use hash::ContentHash;
pub use kind::{AssetKind, InvalidKind, MAX_KIND_LEN};

//! AAS Types - Core entity model for Asset Administration Shells
//!
//! This crate contains the pure data structures describing an industrial asset:
//! an [`AssetShell`] owns named [`Submodel`]s, and each submodel owns named
//! [`Element`]s holding a scalar [`ElementValue`].
//!
//! Ownership is strictly hierarchical. Collections are keyed by `id_short` and
//! backed by `BTreeMap`, so iteration order (and therefore any serialized form)
//! is independent of insertion order.

mod model;
mod shell;
pub mod timestamp;
mod value;

pub use model::*;
pub use shell::*;
pub use value::*;

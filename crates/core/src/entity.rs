//! Entity trait: identity that survives state changes.
//!
//! An account keeps its identifier through renames and ledger appends; two
//! accounts with equal names and histories are still distinct entities.

pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    fn id(&self) -> &Self::Id;
}

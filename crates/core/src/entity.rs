//! Entity trait: a record whose identity survives every field change.

/// Entity marker + minimal interface.
///
/// Two entities are the same record iff their ids are equal, whatever the
/// other fields hold.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Copy + Eq + core::hash::Hash + core::fmt::Debug + core::fmt::Display;

    /// Returns the entity identifier.
    fn id(&self) -> Self::Id;
}

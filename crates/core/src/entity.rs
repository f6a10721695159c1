//! Entity trait: identity + continuity across state changes.

/// A record with a stable identity.
///
/// Stores key their tables by `Entity::Id`; two records with the same id are
/// the same record regardless of their other fields.
pub trait Entity {
    /// Strongly-typed identifier.
    type Id: Copy + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the record identifier.
    fn id(&self) -> Self::Id;
}

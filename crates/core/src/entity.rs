//! Entity trait: identity + continuity across state changes.

/// Entity marker + minimal interface.
///
/// Players, groups, users and training sessions are entities: two records with
/// the same id are the same person/session even if every other field differs.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;
}

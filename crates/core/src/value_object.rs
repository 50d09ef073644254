//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects have no identity and are compared by their attribute values:
/// a match clock reading of `12:05` equals every other `12:05`, a jersey
/// number `9` equals every other `9`. They are immutable; "changing" one means
/// building a new value.
///
/// ```ignore
/// #[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// struct MatchTime { minute: u32, second: u32 }
///
/// impl ValueObject for MatchTime {}
/// ```
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}

//! `matchday-core`: domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives shared by the roster, match
//! and CSV crates (no IO, no clocks, no storage).

pub mod aggregate;
pub mod entity;
pub mod error;
pub mod id;
pub mod value_object;

pub use aggregate::{Aggregate, AggregateRoot};
pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use id::{AggregateId, EntryId};
pub use value_object::ValueObject;

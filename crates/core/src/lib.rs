//! `cmi-core`: domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns):
//! the dirham amount type, the domain error model and batch identifiers.

pub mod error;
pub mod id;
pub mod money;
pub mod value_object;

pub use error::{DomainError, DomainResult};
pub use id::BatchId;
pub use money::Amount;
pub use value_object::ValueObject;

//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects are immutable and compared by their attribute values:
/// two `Amount`s of 76.00 DH are the same amount, and an `InvoiceRecord`
/// has no identity beyond its position in the session collection.
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}

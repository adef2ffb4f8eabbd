//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects are immutable and compared by their attribute values. To
/// "change" one, build a new value. `Money`, `Currency` and order lines are
/// value objects; the sales order itself is not.
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}

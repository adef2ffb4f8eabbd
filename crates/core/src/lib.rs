//! `acme-core` — shared domain building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns):
//! errors, aggregate traits, identifiers and money.

pub mod aggregate;
pub mod error;
pub mod id;
pub mod money;
pub mod value_object;

pub use aggregate::{Aggregate, AggregateRoot};
pub use error::{DomainError, DomainResult};
pub use id::{CustomerId, ProductId, SalesOrderId};
pub use money::{Currency, Money, MoneyError};
pub use value_object::ValueObject;

//! Sales Orders domain module.
//!
//! This crate contains business rules for sales orders, implemented purely as
//! deterministic domain logic (no IO, no HTTP, no storage).

pub mod config;
pub mod item;
pub mod order;

pub use config::SalesConfig;
pub use item::SalesOrderItem;
pub use order::{
    AddItem, ChangeOrderDate, ItemAdded, ItemRemoved, ItemUpdated, OpenSalesOrder,
    OrderDateChanged, RemoveItem, SalesOrder, SalesOrderCommand, SalesOrderEvent,
    SalesOrderOpened, UpdateItem,
};

pub use acme_core::{Currency, CustomerId, Money, ProductId, SalesOrderId};

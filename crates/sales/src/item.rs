//! Sales order line item.

use serde::{Deserialize, Serialize};

use acme_core::{DomainError, DomainResult, Money, ProductId, ValueObject};

/// Order line: product, quantity, unit price.
///
/// Lines are immutable and only built by the owning [`crate::SalesOrder`];
/// changing quantity or price goes through the aggregate so the order total
/// is recomputed together with the line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalesOrderItem {
    line_no: u32,
    product_id: ProductId,
    quantity: i64,
    unit_price: Money,
}

impl SalesOrderItem {
    /// Validate and build a line.
    ///
    /// Checks, in order: product id present, `quantity > 0`, unit price
    /// amount `> 0`.
    pub(crate) fn new(
        line_no: u32,
        product_id: ProductId,
        quantity: i64,
        unit_price: Money,
    ) -> DomainResult<Self> {
        if product_id.is_nil() {
            return Err(DomainError::null_argument("product_id"));
        }

        if quantity <= 0 {
            return Err(DomainError::invalid_argument(
                "quantity must be greater than zero",
            ));
        }

        if !unit_price.is_positive() {
            return Err(DomainError::invalid_argument(
                "unit price must be greater than zero",
            ));
        }

        Ok(Self::restore(line_no, product_id, quantity, unit_price))
    }

    /// Rebuild a line from an already-validated event.
    pub(crate) fn restore(
        line_no: u32,
        product_id: ProductId,
        quantity: i64,
        unit_price: Money,
    ) -> Self {
        Self {
            line_no,
            product_id,
            quantity,
            unit_price,
        }
    }

    pub fn line_no(&self) -> u32 {
        self.line_no
    }

    pub fn product_id(&self) -> ProductId {
        self.product_id
    }

    pub fn quantity(&self) -> i64 {
        self.quantity
    }

    pub fn unit_price(&self) -> Money {
        self.unit_price
    }

    /// `unit_price * quantity`, exact.
    pub fn calculate_item_amount(&self) -> DomainResult<Money> {
        Ok(self.unit_price.multiply(self.quantity)?)
    }
}

impl ValueObject for SalesOrderItem {}

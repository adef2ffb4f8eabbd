use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use acme_core::{
    Aggregate, AggregateRoot, Currency, CustomerId, DomainError, DomainResult, Money, ProductId,
    SalesOrderId,
};
use acme_events::Event;

use crate::config::SalesConfig;
use crate::item::SalesOrderItem;

/// Aggregate root: SalesOrder.
///
/// Invariants held after every applied event:
/// - `total_amount` equals the sum of every line's amount, in insertion order;
/// - every line is priced in the order currency;
/// - line numbers are unique and never reused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SalesOrder {
    id: SalesOrderId,
    customer_id: CustomerId,
    currency: Currency,
    order_date: DateTime<Utc>,
    items: Vec<SalesOrderItem>,
    total_amount: Money,
    next_line_no: u32,
    version: u64,
}

impl SalesOrder {
    /// Open a new order for `customer_id`, dated now, priced in `currency`.
    pub fn new(customer_id: CustomerId, currency: Currency) -> DomainResult<Self> {
        Self::create(SalesOrderId::new(), customer_id, currency, Utc::now())
    }

    /// Open a new order in the configured default currency.
    pub fn open(customer_id: CustomerId, config: &SalesConfig) -> DomainResult<Self> {
        Self::new(customer_id, config.default_currency)
    }

    /// Open a new order with an explicit identifier and date.
    pub fn create(
        order_id: SalesOrderId,
        customer_id: CustomerId,
        currency: Currency,
        order_date: DateTime<Utc>,
    ) -> DomainResult<Self> {
        let opened = Self::handle_open(&OpenSalesOrder {
            order_id,
            customer_id,
            currency,
            order_date,
            occurred_at: Utc::now(),
        })?;
        let order = Self::from_opened(&opened);
        debug!(order_id = %order.id, customer_id = %order.customer_id, "sales order opened");
        Ok(order)
    }

    /// Decide the opening event for a new order.
    pub fn handle_open(cmd: &OpenSalesOrder) -> DomainResult<SalesOrderOpened> {
        if cmd.order_id.is_nil() {
            return Err(DomainError::null_argument("order_id"));
        }
        if cmd.customer_id.is_nil() {
            return Err(DomainError::null_argument("customer_id"));
        }

        Ok(SalesOrderOpened {
            order_id: cmd.order_id,
            customer_id: cmd.customer_id,
            currency: cmd.currency,
            order_date: cmd.order_date,
            occurred_at: cmd.occurred_at,
        })
    }

    /// Initial state described by an opening event (version 1).
    pub fn from_opened(e: &SalesOrderOpened) -> Self {
        Self {
            id: e.order_id,
            customer_id: e.customer_id,
            currency: e.currency,
            order_date: e.order_date,
            items: Vec::new(),
            total_amount: Money::zero(e.currency),
            next_line_no: 1,
            version: 1,
        }
    }

    /// Rebuild an order from its full event stream.
    ///
    /// The stream must start with [`SalesOrderEvent::SalesOrderOpened`].
    pub fn replay(events: &[SalesOrderEvent]) -> DomainResult<Self> {
        let Some((first, rest)) = events.split_first() else {
            return Err(DomainError::invariant("cannot replay an empty event stream"));
        };
        let SalesOrderEvent::SalesOrderOpened(opened) = first else {
            return Err(DomainError::invariant(
                "event stream must start with sales order opened",
            ));
        };

        let mut order = Self::from_opened(opened);
        for event in rest {
            order.ensure_replayable(event)?;
            order.apply(event);
        }
        Ok(order)
    }

    pub fn id_typed(&self) -> SalesOrderId {
        self.id
    }

    pub fn customer_id(&self) -> CustomerId {
        self.customer_id
    }

    pub fn currency(&self) -> Currency {
        self.currency
    }

    pub fn order_date(&self) -> DateTime<Utc> {
        self.order_date
    }

    pub fn total_amount(&self) -> Money {
        self.total_amount
    }

    pub fn items(&self) -> &[SalesOrderItem] {
        &self.items
    }

    pub fn item(&self, line_no: u32) -> Option<&SalesOrderItem> {
        self.items.iter().find(|item| item.line_no() == line_no)
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Add a line and recompute the total. Returns the new line number.
    pub fn add_item(
        &mut self,
        product_id: ProductId,
        quantity: i64,
        unit_price: Money,
    ) -> DomainResult<u32> {
        let line_no = self.next_line_no;
        self.run(&SalesOrderCommand::AddItem(AddItem {
            order_id: self.id,
            product_id,
            quantity,
            unit_price,
            occurred_at: Utc::now(),
        }))?;
        Ok(line_no)
    }

    /// Replace quantity and unit price of an existing line.
    pub fn update_item(&mut self, line_no: u32, quantity: i64, unit_price: Money) -> DomainResult<()> {
        self.run(&SalesOrderCommand::UpdateItem(UpdateItem {
            order_id: self.id,
            line_no,
            quantity,
            unit_price,
            occurred_at: Utc::now(),
        }))?;
        Ok(())
    }

    pub fn remove_item(&mut self, line_no: u32) -> DomainResult<()> {
        self.run(&SalesOrderCommand::RemoveItem(RemoveItem {
            order_id: self.id,
            line_no,
            occurred_at: Utc::now(),
        }))?;
        Ok(())
    }

    /// Override the order date (back-dating or correction). No range checks.
    pub fn with_order_date(&mut self, order_date: DateTime<Utc>) -> &mut Self {
        self.apply(&SalesOrderEvent::OrderDateChanged(OrderDateChanged {
            order_id: self.id,
            order_date,
            occurred_at: Utc::now(),
        }));
        self
    }

    /// Sum of all line amounts, folded from zero in insertion order.
    pub fn calculate_order_total(&self) -> DomainResult<Money> {
        sum_lines(self.currency, &self.items)
    }

    /// Display-only rendering of the total, e.g. `25.50USD`.
    ///
    /// Padded to the currency's decimal places, never rounded below the
    /// amount's own scale.
    pub fn order_total_amount_as_string(&self) -> String {
        let amount = self.total_amount.amount();
        let places = self.currency.decimal_places().max(amount.scale());
        format!("{:.*}{}", places as usize, amount, self.currency.code())
    }

    fn run(&mut self, command: &SalesOrderCommand) -> DomainResult<Vec<SalesOrderEvent>> {
        let order_id = self.id;
        self.execute(command).inspect_err(|err| {
            warn!(order_id = %order_id, error = %err, "sales order command rejected");
        })
    }
}

impl AggregateRoot for SalesOrder {
    type Id = SalesOrderId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}

fn sum_lines<'a>(
    currency: Currency,
    items: impl IntoIterator<Item = &'a SalesOrderItem>,
) -> DomainResult<Money> {
    items
        .into_iter()
        .try_fold(Money::zero(currency), |total, item| {
            Ok(total.add(&item.calculate_item_amount()?)?)
        })
}

/// Command: OpenSalesOrder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenSalesOrder {
    pub order_id: SalesOrderId,
    pub customer_id: CustomerId,
    pub currency: Currency,
    pub order_date: DateTime<Utc>,
    pub occurred_at: DateTime<Utc>,
}

/// Command: AddItem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddItem {
    pub order_id: SalesOrderId,
    pub product_id: ProductId,
    pub quantity: i64,
    pub unit_price: Money,
    pub occurred_at: DateTime<Utc>,
}

/// Command: UpdateItem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateItem {
    pub order_id: SalesOrderId,
    pub line_no: u32,
    pub quantity: i64,
    pub unit_price: Money,
    pub occurred_at: DateTime<Utc>,
}

/// Command: RemoveItem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoveItem {
    pub order_id: SalesOrderId,
    pub line_no: u32,
    pub occurred_at: DateTime<Utc>,
}

/// Command: ChangeOrderDate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeOrderDate {
    pub order_id: SalesOrderId,
    pub order_date: DateTime<Utc>,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SalesOrderCommand {
    AddItem(AddItem),
    UpdateItem(UpdateItem),
    RemoveItem(RemoveItem),
    ChangeOrderDate(ChangeOrderDate),
}

/// Event: SalesOrderOpened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalesOrderOpened {
    pub order_id: SalesOrderId,
    pub customer_id: CustomerId,
    pub currency: Currency,
    pub order_date: DateTime<Utc>,
    pub occurred_at: DateTime<Utc>,
}

/// Event: ItemAdded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemAdded {
    pub order_id: SalesOrderId,
    pub line_no: u32,
    pub product_id: ProductId,
    pub quantity: i64,
    pub unit_price: Money,
    /// Order total after this line was added.
    pub order_total: Money,
    pub occurred_at: DateTime<Utc>,
}

/// Event: ItemUpdated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemUpdated {
    pub order_id: SalesOrderId,
    pub line_no: u32,
    pub quantity: i64,
    pub unit_price: Money,
    pub order_total: Money,
    pub occurred_at: DateTime<Utc>,
}

/// Event: ItemRemoved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemRemoved {
    pub order_id: SalesOrderId,
    pub line_no: u32,
    pub order_total: Money,
    pub occurred_at: DateTime<Utc>,
}

/// Event: OrderDateChanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderDateChanged {
    pub order_id: SalesOrderId,
    pub order_date: DateTime<Utc>,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SalesOrderEvent {
    SalesOrderOpened(SalesOrderOpened),
    ItemAdded(ItemAdded),
    ItemUpdated(ItemUpdated),
    ItemRemoved(ItemRemoved),
    OrderDateChanged(OrderDateChanged),
}

impl Event for SalesOrderEvent {
    fn event_type(&self) -> &'static str {
        match self {
            SalesOrderEvent::SalesOrderOpened(_) => "sales.order.opened",
            SalesOrderEvent::ItemAdded(_) => "sales.order.item_added",
            SalesOrderEvent::ItemUpdated(_) => "sales.order.item_updated",
            SalesOrderEvent::ItemRemoved(_) => "sales.order.item_removed",
            SalesOrderEvent::OrderDateChanged(_) => "sales.order.date_changed",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            SalesOrderEvent::SalesOrderOpened(e) => e.occurred_at,
            SalesOrderEvent::ItemAdded(e) => e.occurred_at,
            SalesOrderEvent::ItemUpdated(e) => e.occurred_at,
            SalesOrderEvent::ItemRemoved(e) => e.occurred_at,
            SalesOrderEvent::OrderDateChanged(e) => e.occurred_at,
        }
    }
}

impl Aggregate for SalesOrder {
    type Command = SalesOrderCommand;
    type Event = SalesOrderEvent;
    type Error = DomainError;

    fn apply(&mut self, event: &Self::Event) {
        match event {
            SalesOrderEvent::SalesOrderOpened(e) => {
                let version = self.version;
                *self = Self::from_opened(e);
                self.version = version;
            }
            SalesOrderEvent::ItemAdded(e) => {
                self.items.push(SalesOrderItem::restore(
                    e.line_no,
                    e.product_id,
                    e.quantity,
                    e.unit_price,
                ));
                self.next_line_no = self.next_line_no.max(e.line_no.saturating_add(1));
                self.total_amount = e.order_total;
            }
            SalesOrderEvent::ItemUpdated(e) => {
                if let Some(item) = self.items.iter_mut().find(|i| i.line_no() == e.line_no) {
                    *item = SalesOrderItem::restore(
                        e.line_no,
                        item.product_id(),
                        e.quantity,
                        e.unit_price,
                    );
                }
                self.total_amount = e.order_total;
            }
            SalesOrderEvent::ItemRemoved(e) => {
                if let Some(index) = self.items.iter().position(|i| i.line_no() == e.line_no) {
                    self.items.remove(index);
                }
                self.total_amount = e.order_total;
            }
            SalesOrderEvent::OrderDateChanged(e) => {
                self.order_date = e.order_date;
            }
        }

        // Deterministic version tracking: +1 per applied event.
        self.version += 1;

        debug!(
            order_id = %self.id,
            event = event.event_type(),
            version = self.version,
            items = self.items.len(),
            total = %self.total_amount,
            "sales order event applied"
        );
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            SalesOrderCommand::AddItem(cmd) => self.handle_add_item(cmd),
            SalesOrderCommand::UpdateItem(cmd) => self.handle_update_item(cmd),
            SalesOrderCommand::RemoveItem(cmd) => self.handle_remove_item(cmd),
            SalesOrderCommand::ChangeOrderDate(cmd) => self.handle_change_order_date(cmd),
        }
    }
}

impl SalesOrder {
    fn ensure_order_id(&self, order_id: SalesOrderId) -> Result<(), DomainError> {
        if self.id != order_id {
            return Err(DomainError::invariant("order_id mismatch"));
        }
        Ok(())
    }

    fn ensure_currency(&self, unit_price: &Money) -> Result<(), DomainError> {
        if unit_price.currency() != self.currency {
            return Err(DomainError::invalid_argument(format!(
                "unit price currency {} does not match order currency {}",
                unit_price.currency(),
                self.currency
            )));
        }
        Ok(())
    }

    fn position_of(&self, line_no: u32) -> Result<usize, DomainError> {
        self.items
            .iter()
            .position(|item| item.line_no() == line_no)
            .ok_or_else(|| DomainError::not_found(format!("order line {line_no}")))
    }

    /// Reject stream events that would break line numbering or target
    /// another order.
    fn ensure_replayable(&self, event: &SalesOrderEvent) -> Result<(), DomainError> {
        match event {
            SalesOrderEvent::SalesOrderOpened(_) => Err(DomainError::invariant(
                "sales order opened may only start the event stream",
            )),
            SalesOrderEvent::ItemAdded(e) => {
                self.ensure_order_id(e.order_id)?;
                if e.line_no < self.next_line_no || e.line_no == u32::MAX {
                    return Err(DomainError::invariant(format!(
                        "order line {} is out of sequence",
                        e.line_no
                    )));
                }
                Ok(())
            }
            SalesOrderEvent::ItemUpdated(e) => {
                self.ensure_order_id(e.order_id)?;
                self.position_of(e.line_no).map(|_| ())
            }
            SalesOrderEvent::ItemRemoved(e) => {
                self.ensure_order_id(e.order_id)?;
                self.position_of(e.line_no).map(|_| ())
            }
            SalesOrderEvent::OrderDateChanged(e) => self.ensure_order_id(e.order_id),
        }
    }

    fn handle_add_item(&self, cmd: &AddItem) -> Result<Vec<SalesOrderEvent>, DomainError> {
        self.ensure_order_id(cmd.order_id)?;

        if self.next_line_no.checked_add(1).is_none() {
            return Err(DomainError::invariant("order line numbers exhausted"));
        }

        let item = SalesOrderItem::new(
            self.next_line_no,
            cmd.product_id,
            cmd.quantity,
            cmd.unit_price,
        )?;
        self.ensure_currency(&cmd.unit_price)?;

        let order_total = sum_lines(self.currency, self.items.iter().chain([&item]))?;

        Ok(vec![SalesOrderEvent::ItemAdded(ItemAdded {
            order_id: cmd.order_id,
            line_no: item.line_no(),
            product_id: item.product_id(),
            quantity: item.quantity(),
            unit_price: item.unit_price(),
            order_total,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_update_item(&self, cmd: &UpdateItem) -> Result<Vec<SalesOrderEvent>, DomainError> {
        self.ensure_order_id(cmd.order_id)?;

        let index = self.position_of(cmd.line_no)?;
        let replacement = SalesOrderItem::new(
            cmd.line_no,
            self.items[index].product_id(),
            cmd.quantity,
            cmd.unit_price,
        )?;
        self.ensure_currency(&cmd.unit_price)?;

        let lines = self
            .items
            .iter()
            .enumerate()
            .map(|(i, item)| if i == index { &replacement } else { item });
        let order_total = sum_lines(self.currency, lines)?;

        Ok(vec![SalesOrderEvent::ItemUpdated(ItemUpdated {
            order_id: cmd.order_id,
            line_no: cmd.line_no,
            quantity: cmd.quantity,
            unit_price: cmd.unit_price,
            order_total,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_remove_item(&self, cmd: &RemoveItem) -> Result<Vec<SalesOrderEvent>, DomainError> {
        self.ensure_order_id(cmd.order_id)?;

        let index = self.position_of(cmd.line_no)?;
        let lines = self
            .items
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != index)
            .map(|(_, item)| item);
        let order_total = sum_lines(self.currency, lines)?;

        Ok(vec![SalesOrderEvent::ItemRemoved(ItemRemoved {
            order_id: cmd.order_id,
            line_no: cmd.line_no,
            order_total,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_change_order_date(
        &self,
        cmd: &ChangeOrderDate,
    ) -> Result<Vec<SalesOrderEvent>, DomainError> {
        self.ensure_order_id(cmd.order_id)?;

        Ok(vec![SalesOrderEvent::OrderDateChanged(OrderDateChanged {
            order_id: cmd.order_id,
            order_date: cmd.order_date,
            occurred_at: cmd.occurred_at,
        })])
    }
}

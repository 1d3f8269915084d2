//! Order workflow - pure business logic without HTTP layer
//!
//! Every operation that touches more than one row runs inside a single
//! transaction, so an order is never visible with half its items or with
//! instruments left in a stale state.

use chrono::{Duration, Local};
use rust_decimal::Decimal;
use sea_orm::*;
use serde::Serialize;

use crate::domain::{
    Actor, DomainError, InstrumentStatus, InvoiceStatus, OrderPaymentStatus, OrderStatus, OrderType,
};
use crate::models::client::Entity as Client;
use crate::models::client_address::{self, Entity as ClientAddress};
use crate::models::instrument::Entity as Instrument;
use crate::models::invoice::{self, Entity as Invoice};
use crate::models::order::{self, Entity as Order, OrderDto, OrderItemDto, UpdateOrderDto};
use crate::models::order_item::{self, Entity as OrderItem};
use crate::models::payment::{self, Entity as Payment};
use crate::services::{inventory_service, numbering, pricing};

pub const INVOICE_TERMS: &str = "Payment is due within 30 days of invoice date. \
Late payments are subject to a 2% monthly interest charge.";

#[derive(Debug, Serialize)]
pub struct OrderWithItems {
    #[serde(flatten)]
    pub order: order::Model,
    pub items: Vec<order_item::Model>,
    pub payments: Vec<payment::Model>,
    pub invoice: Option<invoice::Model>,
}

fn require_manager(actor: &Actor) -> Result<(), DomainError> {
    if actor.can_manage_orders() {
        Ok(())
    } else {
        Err(DomainError::Forbidden(
            "order management requires staff or admin role".to_string(),
        ))
    }
}

fn timestamp() -> String {
    Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

struct PricedItem {
    dto: OrderItemDto,
    quantity: u32,
    subtotal: Decimal,
}

/// Validate items against inventory and recompute every subtotal.
async fn price_items<C: ConnectionTrait>(
    conn: &C,
    order_type: OrderType,
    items: Vec<OrderItemDto>,
) -> Result<(Vec<PricedItem>, Decimal), DomainError> {
    if items.is_empty() {
        return Err(DomainError::Validation(
            "order must contain at least one item".to_string(),
        ));
    }

    let mut priced = Vec::with_capacity(items.len());
    for item in items {
        let quantity = item.quantity.unwrap_or(1);
        if quantity == 0 {
            return Err(DomainError::Validation(
                "item quantity must be at least 1".to_string(),
            ));
        }

        Instrument::find_by_id(item.instrument_id)
            .one(conn)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("instrument {}", item.instrument_id)))?;

        let subtotal = pricing::item_subtotal(
            order_type,
            item.unit_price,
            quantity,
            item.rental_duration_days,
        );
        priced.push(PricedItem {
            dto: item,
            quantity,
            subtotal,
        });
    }

    let subtotals: Vec<Decimal> = priced.iter().map(|p| p.subtotal).collect();
    Ok((priced, pricing::order_total(&subtotals)))
}

async fn insert_items<C: ConnectionTrait>(
    conn: &C,
    order_id: i32,
    priced: Vec<PricedItem>,
    now: &str,
) -> Result<Vec<order_item::Model>, DomainError> {
    let mut rows = Vec::with_capacity(priced.len());
    for p in priced {
        let row = order_item::ActiveModel {
            order_id: Set(order_id),
            instrument_id: Set(p.dto.instrument_id),
            quantity: Set(p.quantity as i32),
            unit_price: Set(p.dto.unit_price),
            rental_start_date: Set(p.dto.rental_start_date),
            rental_end_date: Set(p.dto.rental_end_date),
            rental_duration_days: Set(p.dto.rental_duration_days.map(|d| d as i32)),
            subtotal: Set(p.subtotal),
            created_at: Set(now.to_owned()),
            updated_at: Set(now.to_owned()),
            ..Default::default()
        };
        rows.push(row.insert(conn).await?);
    }
    Ok(rows)
}

/// Create an order with its items, number it and move every instrument to
/// the status the order type dictates. All in one transaction.
pub async fn create_order(
    db: &DatabaseConnection,
    actor: &Actor,
    dto: OrderDto,
) -> Result<OrderWithItems, DomainError> {
    require_manager(actor)?;
    let order_type = OrderType::parse(&dto.order_type)?;
    let now = timestamp();
    let today = Local::now().date_naive();

    let txn = db.begin().await?;

    Client::find_by_id(dto.client_id)
        .one(&txn)
        .await?
        .ok_or_else(|| DomainError::NotFound(format!("client {}", dto.client_id)))?;

    let (priced, total_amount) = price_items(&txn, order_type, dto.items).await?;
    let tax_amount = dto.tax_amount.unwrap_or(Decimal::ZERO);
    let discount_amount = dto.discount_amount.unwrap_or(Decimal::ZERO);
    let grand_total = pricing::grand_total(total_amount, tax_amount, discount_amount);

    let order_number = numbering::next_order_number(&txn, order_type, today).await?;
    let order_date = dto
        .order_date
        .unwrap_or_else(|| today.format("%Y-%m-%d").to_string());

    let saved = order::ActiveModel {
        order_number: Set(order_number),
        client_id: Set(dto.client_id),
        order_type: Set(order_type.as_str().to_owned()),
        status: Set(OrderStatus::Pending.as_str().to_owned()),
        payment_status: Set(OrderPaymentStatus::Pending.as_str().to_owned()),
        order_date: Set(order_date),
        delivery_date: Set(dto.delivery_date),
        total_amount: Set(total_amount),
        tax_amount: Set(tax_amount),
        discount_amount: Set(discount_amount),
        grand_total: Set(grand_total),
        notes: Set(dto.notes),
        created_by: Set(Some(actor.id.clone())),
        created_at: Set(now.clone()),
        updated_at: Set(now.clone()),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    let target = order_type.target_instrument_status();
    let items = insert_items(&txn, saved.id, priced, &now).await?;
    for item in &items {
        inventory_service::transition(&txn, item.instrument_id, target).await?;
    }

    txn.commit().await?;

    Ok(OrderWithItems {
        order: saved,
        items,
        payments: Vec::new(),
        invoice: None,
    })
}

/// Update an order in place. Replacing `items` recomputes every subtotal and
/// the totals; inventory is never touched here. The order type and number
/// are immutable after creation.
pub async fn update_order(
    db: &DatabaseConnection,
    actor: &Actor,
    order_id: i32,
    dto: UpdateOrderDto,
) -> Result<OrderWithItems, DomainError> {
    require_manager(actor)?;
    let now = timestamp();

    let txn = db.begin().await?;

    let existing = Order::find_by_id(order_id)
        .one(&txn)
        .await?
        .ok_or_else(|| DomainError::NotFound(format!("order {}", order_id)))?;
    let order_type = OrderType::parse(&existing.order_type)?;

    let mut total_amount = existing.total_amount;
    let mut tax_amount = existing.tax_amount;
    let mut discount_amount = existing.discount_amount;

    if let Some(tax) = dto.tax_amount {
        tax_amount = tax;
    }
    if let Some(discount) = dto.discount_amount {
        discount_amount = discount;
    }

    let mut new_items = None;
    if let Some(items) = dto.items {
        let (priced, total) = price_items(&txn, order_type, items).await?;
        OrderItem::delete_many()
            .filter(order_item::Column::OrderId.eq(order_id))
            .exec(&txn)
            .await?;
        new_items = Some(insert_items(&txn, order_id, priced, &now).await?);
        total_amount = total;
    }

    let mut active: order::ActiveModel = existing.into();
    if let Some(delivery_date) = dto.delivery_date {
        active.delivery_date = Set(Some(delivery_date));
    }
    if let Some(notes) = dto.notes {
        active.notes = Set(Some(notes));
    }
    active.total_amount = Set(total_amount);
    active.tax_amount = Set(tax_amount);
    active.discount_amount = Set(discount_amount);
    // Grand total is always rederived, even when only tax or discount moved.
    active.grand_total = Set(pricing::grand_total(
        total_amount,
        tax_amount,
        discount_amount,
    ));
    active.updated_at = Set(now);
    let updated = active.update(&txn).await?;

    let items = match new_items {
        Some(items) => items,
        None => {
            OrderItem::find()
                .filter(order_item::Column::OrderId.eq(order_id))
                .all(&txn)
                .await?
        }
    };

    let payments = Payment::find()
        .filter(payment::Column::OrderId.eq(order_id))
        .all(&txn)
        .await?;
    let invoice = Invoice::find()
        .filter(invoice::Column::OrderId.eq(order_id))
        .one(&txn)
        .await?;

    txn.commit().await?;

    Ok(OrderWithItems {
        order: updated,
        items,
        payments,
        invoice,
    })
}

async fn step_status(
    db: &DatabaseConnection,
    actor: &Actor,
    order_id: i32,
    from: OrderStatus,
    to: OrderStatus,
) -> Result<order::Model, DomainError> {
    require_manager(actor)?;
    let txn = db.begin().await?;

    let existing = Order::find_by_id(order_id)
        .one(&txn)
        .await?
        .ok_or_else(|| DomainError::NotFound(format!("order {}", order_id)))?;

    if existing.status != from.as_str() {
        return Err(DomainError::State(format!(
            "order is {}, expected {}",
            existing.status,
            from.as_str()
        )));
    }

    let mut active: order::ActiveModel = existing.into();
    active.status = Set(to.as_str().to_owned());
    active.updated_at = Set(timestamp());
    let updated = active.update(&txn).await?;

    txn.commit().await?;
    Ok(updated)
}

pub async fn confirm_order(
    db: &DatabaseConnection,
    actor: &Actor,
    order_id: i32,
) -> Result<order::Model, DomainError> {
    step_status(db, actor, order_id, OrderStatus::Pending, OrderStatus::Confirmed).await
}

pub async fn process_order(
    db: &DatabaseConnection,
    actor: &Actor,
    order_id: i32,
) -> Result<order::Model, DomainError> {
    step_status(
        db,
        actor,
        order_id,
        OrderStatus::Confirmed,
        OrderStatus::Processing,
    )
    .await
}

pub async fn complete_order(
    db: &DatabaseConnection,
    actor: &Actor,
    order_id: i32,
) -> Result<order::Model, DomainError> {
    step_status(
        db,
        actor,
        order_id,
        OrderStatus::Processing,
        OrderStatus::Completed,
    )
    .await
}

/// Cancel an order and put every instrument on it back to `available`.
/// The restore is unconditional by design of the workflow: cancellation is
/// the explicit recovery path, not a reconciliation.
pub async fn cancel_order(
    db: &DatabaseConnection,
    actor: &Actor,
    order_id: i32,
) -> Result<order::Model, DomainError> {
    require_manager(actor)?;
    let txn = db.begin().await?;

    let existing = Order::find_by_id(order_id)
        .one(&txn)
        .await?
        .ok_or_else(|| DomainError::NotFound(format!("order {}", order_id)))?;

    if existing.status == OrderStatus::Completed.as_str() {
        return Err(DomainError::Conflict(
            "cannot cancel a completed order".to_string(),
        ));
    }
    if existing.status == OrderStatus::Cancelled.as_str() {
        return Err(DomainError::State("order is already cancelled".to_string()));
    }

    let items = OrderItem::find()
        .filter(order_item::Column::OrderId.eq(order_id))
        .all(&txn)
        .await?;

    let mut active: order::ActiveModel = existing.into();
    active.status = Set(OrderStatus::Cancelled.as_str().to_owned());
    active.updated_at = Set(timestamp());
    let updated = active.update(&txn).await?;

    for item in &items {
        inventory_service::transition(&txn, item.instrument_id, InstrumentStatus::Available)
            .await?;
    }

    txn.commit().await?;
    Ok(updated)
}

/// Generate the invoice for an order. At most one invoice per order; the
/// billing address is snapshotted as text from the client's default billing
/// address, with shipping falling back to the billing text.
pub async fn generate_invoice(
    db: &DatabaseConnection,
    actor: &Actor,
    order_id: i32,
) -> Result<invoice::Model, DomainError> {
    require_manager(actor)?;
    let now = timestamp();
    let today = Local::now().date_naive();

    let txn = db.begin().await?;

    let order = Order::find_by_id(order_id)
        .one(&txn)
        .await?
        .ok_or_else(|| DomainError::NotFound(format!("order {}", order_id)))?;

    let existing = Invoice::find()
        .filter(invoice::Column::OrderId.eq(order_id))
        .one(&txn)
        .await?;
    if existing.is_some() {
        return Err(DomainError::Conflict(
            "invoice already exists for this order".to_string(),
        ));
    }

    let billing = ClientAddress::find()
        .filter(client_address::Column::ClientId.eq(order.client_id))
        .filter(client_address::Column::IsDefault.eq(true))
        .filter(client_address::Column::AddressType.is_in(["billing", "both"]))
        .one(&txn)
        .await?
        .ok_or_else(|| {
            DomainError::NotFound("no default billing address for client".to_string())
        })?;

    let shipping = ClientAddress::find()
        .filter(client_address::Column::ClientId.eq(order.client_id))
        .filter(client_address::Column::IsDefault.eq(true))
        .filter(client_address::Column::AddressType.is_in(["shipping", "both"]))
        .one(&txn)
        .await?;

    let billing_text = billing.as_text();
    let shipping_text = shipping
        .map(|a| a.as_text())
        .unwrap_or_else(|| billing_text.clone());

    let invoice_number = numbering::next_invoice_number(&txn, today).await?;
    let due_date = (today + Duration::days(30)).format("%Y-%m-%d").to_string();

    let saved = invoice::ActiveModel {
        order_id: Set(order_id),
        invoice_number: Set(invoice_number),
        invoice_date: Set(today.format("%Y-%m-%d").to_string()),
        due_date: Set(due_date),
        status: Set(InvoiceStatus::Draft.as_str().to_owned()),
        billing_address: Set(billing_text),
        shipping_address: Set(Some(shipping_text)),
        terms_and_conditions: Set(Some(INVOICE_TERMS.to_owned())),
        notes: Set(None),
        created_at: Set(now.clone()),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    txn.commit().await?;
    Ok(saved)
}

/// Fetch one order with its items, payments and invoice.
pub async fn get_order(
    db: &DatabaseConnection,
    order_id: i32,
) -> Result<OrderWithItems, DomainError> {
    let order = Order::find_by_id(order_id)
        .one(db)
        .await?
        .ok_or_else(|| DomainError::NotFound(format!("order {}", order_id)))?;

    let items = OrderItem::find()
        .filter(order_item::Column::OrderId.eq(order_id))
        .all(db)
        .await?;
    let payments = Payment::find()
        .filter(payment::Column::OrderId.eq(order_id))
        .all(db)
        .await?;
    let invoice = Invoice::find()
        .filter(invoice::Column::OrderId.eq(order_id))
        .one(db)
        .await?;

    Ok(OrderWithItems {
        order,
        items,
        payments,
        invoice,
    })
}

/// Filter parameters for listing orders
#[derive(Debug, Default, Clone)]
pub struct OrderFilter {
    pub client_id: Option<i32>,
    pub status: Option<String>,
    pub order_type: Option<String>,
}

pub async fn list_orders(
    db: &DatabaseConnection,
    filter: OrderFilter,
) -> Result<Vec<order::Model>, DomainError> {
    let mut condition = Condition::all();

    if let Some(client_id) = filter.client_id {
        condition = condition.add(order::Column::ClientId.eq(client_id));
    }
    if let Some(status) = filter.status {
        condition = condition.add(order::Column::Status.eq(status));
    }
    if let Some(order_type) = filter.order_type {
        condition = condition.add(order::Column::OrderType.eq(order_type));
    }

    let orders = Order::find()
        .filter(condition)
        .order_by_desc(order::Column::Id)
        .all(db)
        .await?;
    Ok(orders)
}

//! Invoice lifecycle beyond generation (which lives in the order workflow).

use chrono::Local;
use sea_orm::*;
use serde_json::json;

use crate::domain::{Actor, DomainError, InvoiceStatus, OrderPaymentStatus};
use crate::models::invoice::{self, Entity as Invoice};
use crate::models::order::{self, Entity as Order};
use crate::services::notify;

/// Mark an invoice as sent and dispatch a notification. Sending is
/// unconditional: re-sending an already sent invoice is allowed.
pub async fn send_invoice(
    db: &DatabaseConnection,
    actor: &Actor,
    invoice_id: i32,
    notify_url: Option<String>,
) -> Result<invoice::Model, DomainError> {
    if !actor.can_manage_orders() {
        return Err(DomainError::Forbidden(
            "sending invoices requires staff or admin role".to_string(),
        ));
    }

    let found = Invoice::find_by_id(invoice_id)
        .one(db)
        .await?
        .ok_or_else(|| DomainError::NotFound(format!("invoice {}", invoice_id)))?;

    let now = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
    let mut active: invoice::ActiveModel = found.into();
    active.status = Set(InvoiceStatus::Sent.as_str().to_owned());
    active.updated_at = Set(now);
    let updated = active.update(db).await?;

    // Dispatched after the row is committed; delivery failures are logged
    // and never fail the operation.
    notify::dispatch(
        notify_url,
        "invoice.sent",
        json!({
            "invoice_id": updated.id,
            "invoice_number": updated.invoice_number,
            "order_id": updated.order_id,
        }),
    );

    Ok(updated)
}

/// Explicit override: force the invoice and its order to `paid` regardless
/// of recorded payment totals. Distinct from the reconciled path so audits
/// can tell an intended override from drift.
pub async fn force_mark_paid(
    db: &DatabaseConnection,
    actor: &Actor,
    invoice_id: i32,
) -> Result<invoice::Model, DomainError> {
    if !actor.can_manage_orders() {
        return Err(DomainError::Forbidden(
            "settling invoices requires staff or admin role".to_string(),
        ));
    }

    let now = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
    let txn = db.begin().await?;

    let found = Invoice::find_by_id(invoice_id)
        .one(&txn)
        .await?
        .ok_or_else(|| DomainError::NotFound(format!("invoice {}", invoice_id)))?;
    let order_id = found.order_id;

    let mut active: invoice::ActiveModel = found.into();
    active.status = Set(InvoiceStatus::Paid.as_str().to_owned());
    active.updated_at = Set(now.clone());
    let updated = active.update(&txn).await?;

    let order = Order::find_by_id(order_id)
        .one(&txn)
        .await?
        .ok_or_else(|| DomainError::NotFound(format!("order {}", order_id)))?;
    let mut order_active: order::ActiveModel = order.into();
    order_active.payment_status = Set(OrderPaymentStatus::Paid.as_str().to_owned());
    order_active.updated_at = Set(now);
    order_active.update(&txn).await?;

    txn.commit().await?;
    Ok(updated)
}

pub async fn list_invoices(
    db: &DatabaseConnection,
    status: Option<String>,
) -> Result<Vec<invoice::Model>, DomainError> {
    let mut condition = Condition::all();
    if let Some(status) = status {
        condition = condition.add(invoice::Column::Status.eq(status));
    }

    let invoices = Invoice::find()
        .filter(condition)
        .order_by_desc(invoice::Column::Id)
        .all(db)
        .await?;
    Ok(invoices)
}

pub async fn get_invoice(
    db: &DatabaseConnection,
    invoice_id: i32,
) -> Result<invoice::Model, DomainError> {
    Invoice::find_by_id(invoice_id)
        .one(db)
        .await?
        .ok_or_else(|| DomainError::NotFound(format!("invoice {}", invoice_id)))
}

pub async fn invoice_for_order(
    db: &DatabaseConnection,
    order_id: i32,
) -> Result<invoice::Model, DomainError> {
    Invoice::find()
        .filter(invoice::Column::OrderId.eq(order_id))
        .one(db)
        .await?
        .ok_or_else(|| DomainError::NotFound(format!("invoice for order {}", order_id)))
}

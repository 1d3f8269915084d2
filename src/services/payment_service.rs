//! Payment reconciliation.
//!
//! Recording a payment rederives the order's payment position from the sum
//! of its completed payments. Each payment row is counted exactly once; the
//! derived status is never set directly by callers.

use chrono::Local;
use rust_decimal::Decimal;
use sea_orm::*;

use crate::domain::{Actor, DomainError, InvoiceStatus, OrderPaymentStatus, PaymentStatus};
use crate::models::invoice::{self, Entity as Invoice};
use crate::models::order::{self, Entity as Order};
use crate::models::payment::{self, Entity as Payment, PaymentDto};

const PAYMENT_METHODS: &[&str] = &[
    "cash",
    "credit_card",
    "debit_card",
    "bank_transfer",
    "upi",
    "cheque",
];

fn derive_status(total_paid: Decimal, grand_total: Decimal) -> OrderPaymentStatus {
    if total_paid >= grand_total {
        OrderPaymentStatus::Paid
    } else if total_paid > Decimal::ZERO {
        OrderPaymentStatus::Partial
    } else {
        OrderPaymentStatus::Pending
    }
}

/// Record a payment against an order and reconcile the order's payment
/// status. A fully paid order cascades to its invoice, if one exists.
pub async fn record_payment(
    db: &DatabaseConnection,
    actor: &Actor,
    order_id: i32,
    dto: PaymentDto,
) -> Result<(payment::Model, order::Model), DomainError> {
    if !actor.can_manage_orders() {
        return Err(DomainError::Forbidden(
            "recording payments requires staff or admin role".to_string(),
        ));
    }

    if dto.amount <= Decimal::ZERO {
        return Err(DomainError::Validation(
            "payment amount must be positive".to_string(),
        ));
    }
    if !PAYMENT_METHODS.contains(&dto.payment_method.as_str()) {
        return Err(DomainError::Validation(format!(
            "unknown payment method: {}",
            dto.payment_method
        )));
    }
    let status = match &dto.status {
        Some(s) => PaymentStatus::parse(s)?,
        None => PaymentStatus::Pending,
    };

    let now = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
    let today = Local::now().format("%Y-%m-%d").to_string();

    let txn = db.begin().await?;

    let order = Order::find_by_id(order_id)
        .one(&txn)
        .await?
        .ok_or_else(|| DomainError::NotFound(format!("order {}", order_id)))?;

    let saved = payment::ActiveModel {
        order_id: Set(order_id),
        payment_method: Set(dto.payment_method),
        amount: Set(dto.amount),
        transaction_id: Set(dto.transaction_id),
        payment_date: Set(dto.payment_date.unwrap_or(today)),
        status: Set(status.as_str().to_owned()),
        notes: Set(dto.notes),
        created_by: Set(Some(actor.id.clone())),
        created_at: Set(now.clone()),
        updated_at: Set(now.clone()),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    // Sum completed payments including the row just inserted.
    let completed = Payment::find()
        .filter(payment::Column::OrderId.eq(order_id))
        .filter(payment::Column::Status.eq(PaymentStatus::Completed.as_str()))
        .all(&txn)
        .await?;
    let total_paid: Decimal = completed.iter().map(|p| p.amount).sum();

    let payment_status = derive_status(total_paid, order.grand_total);

    let mut active: order::ActiveModel = order.into();
    active.payment_status = Set(payment_status.as_str().to_owned());
    active.updated_at = Set(now.clone());
    let updated_order = active.update(&txn).await?;

    if payment_status == OrderPaymentStatus::Paid {
        if let Some(inv) = Invoice::find()
            .filter(invoice::Column::OrderId.eq(order_id))
            .one(&txn)
            .await?
        {
            let mut inv_active: invoice::ActiveModel = inv.into();
            inv_active.status = Set(InvoiceStatus::Paid.as_str().to_owned());
            inv_active.updated_at = Set(now);
            inv_active.update(&txn).await?;
        }
    }

    txn.commit().await?;
    Ok((saved, updated_order))
}

pub async fn list_payments(
    db: &DatabaseConnection,
    order_id: i32,
) -> Result<Vec<payment::Model>, DomainError> {
    let payments = Payment::find()
        .filter(payment::Column::OrderId.eq(order_id))
        .order_by_asc(payment::Column::Id)
        .all(db)
        .await?;
    Ok(payments)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn derive_status_thresholds() {
        assert_eq!(
            derive_status(Decimal::ZERO, dec("100")),
            OrderPaymentStatus::Pending
        );
        assert_eq!(
            derive_status(dec("40"), dec("100")),
            OrderPaymentStatus::Partial
        );
        assert_eq!(
            derive_status(dec("100"), dec("100")),
            OrderPaymentStatus::Paid
        );
        assert_eq!(
            derive_status(dec("150"), dec("100")),
            OrderPaymentStatus::Paid
        );
    }
}

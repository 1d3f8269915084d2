//! Pricing engine. Pure decimal arithmetic, no persistence.
//!
//! Subtotals are recomputed from the submitted fields on every write;
//! caller-supplied subtotals are never trusted.

use rust_decimal::Decimal;

use crate::domain::OrderType;

/// Subtotal for one line item.
///
/// Rentals multiply by the duration in days. A rental item without a
/// duration falls back to `unit_price * quantity`, matching the historical
/// billing behavior.
pub fn item_subtotal(
    order_type: OrderType,
    unit_price: Decimal,
    quantity: u32,
    rental_duration_days: Option<u32>,
) -> Decimal {
    let base = unit_price * Decimal::from(quantity);
    match (order_type, rental_duration_days) {
        (OrderType::Rental, Some(days)) => base * Decimal::from(days),
        _ => base,
    }
}

/// Sum of item subtotals. Each subtotal is counted exactly once.
pub fn order_total(subtotals: &[Decimal]) -> Decimal {
    subtotals.iter().copied().sum()
}

/// `grand_total = total + tax - discount`. Tax and discount are
/// caller-supplied, never computed here.
pub fn grand_total(total_amount: Decimal, tax_amount: Decimal, discount_amount: Decimal) -> Decimal {
    total_amount + tax_amount - discount_amount
}

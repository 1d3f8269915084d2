//! Lifecycle vocabularies for orders, instruments, payments and invoices.
//!
//! Rows store these as plain strings; the enums are the single place where
//! the allowed values and their spellings live.

use crate::domain::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderType {
    Sale,
    Rental,
    Storage,
}

impl OrderType {
    pub fn parse(s: &str) -> Result<Self, DomainError> {
        match s {
            "sale" => Ok(OrderType::Sale),
            "rental" => Ok(OrderType::Rental),
            "storage" => Ok(OrderType::Storage),
            other => Err(DomainError::Validation(format!(
                "unknown order type: {}",
                other
            ))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderType::Sale => "sale",
            OrderType::Rental => "rental",
            OrderType::Storage => "storage",
        }
    }

    /// Prefix used in order numbers (S20240101xxxx, R..., ST...).
    pub fn number_prefix(&self) -> &'static str {
        match self {
            OrderType::Sale => "S",
            OrderType::Rental => "R",
            OrderType::Storage => "ST",
        }
    }

    /// Instrument status an order of this type drives its items into.
    pub fn target_instrument_status(&self) -> InstrumentStatus {
        match self {
            OrderType::Sale => InstrumentStatus::Sold,
            OrderType::Rental => InstrumentStatus::Rented,
            OrderType::Storage => InstrumentStatus::Stored,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Processing,
    Completed,
    Cancelled,
}

impl OrderStatus {
    pub fn parse(s: &str) -> Result<Self, DomainError> {
        match s {
            "pending" => Ok(OrderStatus::Pending),
            "confirmed" => Ok(OrderStatus::Confirmed),
            "processing" => Ok(OrderStatus::Processing),
            "completed" => Ok(OrderStatus::Completed),
            "cancelled" => Ok(OrderStatus::Cancelled),
            other => Err(DomainError::Validation(format!(
                "unknown order status: {}",
                other
            ))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::Processing => "processing",
            OrderStatus::Completed => "completed",
            OrderStatus::Cancelled => "cancelled",
        }
    }
}

/// Derived payment position of an order, never set directly by callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderPaymentStatus {
    Pending,
    Partial,
    Paid,
}

impl OrderPaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderPaymentStatus::Pending => "pending",
            OrderPaymentStatus::Partial => "partial",
            OrderPaymentStatus::Paid => "paid",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstrumentStatus {
    Available,
    Sold,
    Rented,
    Stored,
    Maintenance,
}

impl InstrumentStatus {
    pub fn parse(s: &str) -> Result<Self, DomainError> {
        match s {
            "available" => Ok(InstrumentStatus::Available),
            "sold" => Ok(InstrumentStatus::Sold),
            "rented" => Ok(InstrumentStatus::Rented),
            "stored" => Ok(InstrumentStatus::Stored),
            "maintenance" => Ok(InstrumentStatus::Maintenance),
            other => Err(DomainError::Validation(format!(
                "unknown instrument status: {}",
                other
            ))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            InstrumentStatus::Available => "available",
            InstrumentStatus::Sold => "sold",
            InstrumentStatus::Rented => "rented",
            InstrumentStatus::Stored => "stored",
            InstrumentStatus::Maintenance => "maintenance",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentStatus {
    Pending,
    Completed,
    Failed,
    Refunded,
}

impl PaymentStatus {
    pub fn parse(s: &str) -> Result<Self, DomainError> {
        match s {
            "pending" => Ok(PaymentStatus::Pending),
            "completed" => Ok(PaymentStatus::Completed),
            "failed" => Ok(PaymentStatus::Failed),
            "refunded" => Ok(PaymentStatus::Refunded),
            other => Err(DomainError::Validation(format!(
                "unknown payment status: {}",
                other
            ))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Completed => "completed",
            PaymentStatus::Failed => "failed",
            PaymentStatus::Refunded => "refunded",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvoiceStatus {
    Draft,
    Sent,
    Paid,
    Overdue,
    Cancelled,
}

impl InvoiceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvoiceStatus::Draft => "draft",
            InvoiceStatus::Sent => "sent",
            InvoiceStatus::Paid => "paid",
            InvoiceStatus::Overdue => "overdue",
            InvoiceStatus::Cancelled => "cancelled",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_type_prefixes() {
        assert_eq!(OrderType::Sale.number_prefix(), "S");
        assert_eq!(OrderType::Rental.number_prefix(), "R");
        assert_eq!(OrderType::Storage.number_prefix(), "ST");
    }

    #[test]
    fn order_type_drives_instrument_status() {
        assert_eq!(
            OrderType::Sale.target_instrument_status(),
            InstrumentStatus::Sold
        );
        assert_eq!(
            OrderType::Rental.target_instrument_status(),
            InstrumentStatus::Rented
        );
        assert_eq!(
            OrderType::Storage.target_instrument_status(),
            InstrumentStatus::Stored
        );
    }

    #[test]
    fn parse_round_trips() {
        for s in ["pending", "confirmed", "processing", "completed", "cancelled"] {
            assert_eq!(OrderStatus::parse(s).unwrap().as_str(), s);
        }
        assert!(OrderStatus::parse("shipped").is_err());
    }
}

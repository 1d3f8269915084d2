//! Document numbering for orders and invoices.
//!
//! Numbers are date-scoped: `<prefix><YYYYMMDD><seq:04>` where the sequence
//! restarts per prefix and day. Allocation goes through a counter row with a
//! single atomic UPSERT, so two concurrent creations can never mint the same
//! number; read-then-write is deliberately avoided.

use chrono::NaiveDate;
use sea_orm::{ConnectionTrait, Statement};

use crate::domain::{DomainError, OrderType};

async fn next_sequence<C: ConnectionTrait>(conn: &C, scope: &str) -> Result<i64, DomainError> {
    let stmt = Statement::from_sql_and_values(
        conn.get_database_backend(),
        r#"
        INSERT INTO document_counters (scope, last_seq) VALUES (?, 1)
        ON CONFLICT(scope) DO UPDATE SET last_seq = last_seq + 1
        RETURNING last_seq
        "#,
        [scope.into()],
    );

    let row = conn
        .query_one(stmt)
        .await?
        .ok_or_else(|| DomainError::Database("counter allocation returned no row".to_string()))?;

    let seq: i64 = row
        .try_get("", "last_seq")
        .map_err(|e| DomainError::Database(e.to_string()))?;
    Ok(seq)
}

/// Next order number for the given type and date, e.g. `S202401010001`.
pub async fn next_order_number<C: ConnectionTrait>(
    conn: &C,
    order_type: OrderType,
    date: NaiveDate,
) -> Result<String, DomainError> {
    let scope = format!("{}{}", order_type.number_prefix(), date.format("%Y%m%d"));
    let seq = next_sequence(conn, &scope).await?;
    Ok(format!("{}{:04}", scope, seq))
}

/// Next invoice number for the given date, e.g. `INV202401010001`.
pub async fn next_invoice_number<C: ConnectionTrait>(
    conn: &C,
    date: NaiveDate,
) -> Result<String, DomainError> {
    let scope = format!("INV{}", date.format("%Y%m%d"));
    let seq = next_sequence(conn, &scope).await?;
    Ok(format!("{}{:04}", scope, seq))
}

//! Instrument inventory ledger.
//!
//! The instrument `status` column is the single source of truth for
//! availability. Transitions are unguarded: the order workflow decides when
//! a transition is legal, this layer only records it.

use chrono::Local;
use sea_orm::*;

use crate::domain::{DomainError, InstrumentStatus};
use crate::models::instrument::{self, Entity as Instrument};

/// Move an instrument to the target status. Returns the updated row.
pub async fn transition<C: ConnectionTrait>(
    conn: &C,
    instrument_id: i32,
    target: InstrumentStatus,
) -> Result<instrument::Model, DomainError> {
    let found = Instrument::find_by_id(instrument_id)
        .one(conn)
        .await?
        .ok_or_else(|| DomainError::NotFound(format!("instrument {}", instrument_id)))?;

    let now = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
    let mut active: instrument::ActiveModel = found.into();
    active.status = Set(target.as_str().to_owned());
    active.updated_at = Set(now);

    Ok(active.update(conn).await?)
}

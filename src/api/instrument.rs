use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use chrono::Local;
use sea_orm::*;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::api::{actor_from_headers, error_response, ApiError};
use crate::domain::InstrumentStatus;
use crate::models::instrument::{self, Entity as Instrument, InstrumentDto};
use crate::services::inventory_service;

#[derive(Deserialize)]
pub struct ListInstrumentsQuery {
    pub status: Option<String>,
}

pub async fn list_instruments(
    State(db): State<DatabaseConnection>,
    Query(query): Query<ListInstrumentsQuery>,
) -> Result<Json<Value>, ApiError> {
    let mut condition = Condition::all();
    if let Some(status) = query.status {
        condition = condition.add(instrument::Column::Status.eq(status));
    }

    let instruments = Instrument::find()
        .filter(condition)
        .order_by_asc(instrument::Column::Name)
        .all(&db)
        .await
        .map_err(|e| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": e.to_string() })),
            )
        })?;

    Ok(Json(json!({ "instruments": instruments })))
}

pub async fn get_instrument(
    State(db): State<DatabaseConnection>,
    Path(id): Path<i32>,
) -> Result<Json<instrument::Model>, ApiError> {
    let found = Instrument::find_by_id(id)
        .one(&db)
        .await
        .map_err(|e| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": e.to_string() })),
            )
        })?
        .ok_or((
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "Not found: instrument" })),
        ))?;

    Ok(Json(found))
}

pub async fn create_instrument(
    State(db): State<DatabaseConnection>,
    headers: HeaderMap,
    Json(payload): Json<InstrumentDto>,
) -> Result<(StatusCode, Json<instrument::Model>), ApiError> {
    actor_from_headers(&headers)?;
    let now = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();

    let status = match payload.status {
        Some(s) => InstrumentStatus::parse(&s)
            .map_err(error_response)?
            .as_str()
            .to_owned(),
        None => "available".to_owned(),
    };

    let saved = instrument::ActiveModel {
        name: Set(payload.name),
        serial_number: Set(payload.serial_number),
        description: Set(payload.description),
        purchase_date: Set(payload.purchase_date),
        purchase_price: Set(payload.purchase_price),
        rental_price_per_day: Set(payload.rental_price_per_day),
        selling_price: Set(payload.selling_price),
        status: Set(status),
        manufacturer: Set(payload.manufacturer),
        notes: Set(payload.notes),
        created_at: Set(now.clone()),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(&db)
    .await
    .map_err(|e| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": e.to_string() })),
        )
    })?;

    Ok((StatusCode::CREATED, Json(saved)))
}

#[derive(Deserialize)]
pub struct UpdateStatusDto {
    pub status: String,
}

pub async fn update_status(
    State(db): State<DatabaseConnection>,
    headers: HeaderMap,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateStatusDto>,
) -> Result<Json<instrument::Model>, ApiError> {
    actor_from_headers(&headers)?;
    let target = InstrumentStatus::parse(&payload.status).map_err(error_response)?;

    let updated = inventory_service::transition(&db, id, target)
        .await
        .map_err(error_response)?;

    Ok(Json(updated))
}

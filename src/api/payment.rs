use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use sea_orm::DatabaseConnection;
use serde_json::{json, Value};

use crate::api::{actor_from_headers, error_response, ApiError};
use crate::models::payment::PaymentDto;
use crate::services::payment_service;

pub async fn list_payments(
    State(db): State<DatabaseConnection>,
    Path(order_id): Path<i32>,
) -> Result<Json<Value>, ApiError> {
    let payments = payment_service::list_payments(&db, order_id)
        .await
        .map_err(error_response)?;
    Ok(Json(json!({ "payments": payments })))
}

pub async fn record_payment(
    State(db): State<DatabaseConnection>,
    headers: HeaderMap,
    Path(order_id): Path<i32>,
    Json(payload): Json<PaymentDto>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let actor = actor_from_headers(&headers)?;
    let (payment, order) = payment_service::record_payment(&db, &actor, order_id, payload)
        .await
        .map_err(error_response)?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "payment": payment,
            "order": order,
        })),
    ))
}

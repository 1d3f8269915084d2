use axum::{
    extract::{Path, Query, State},
    http::HeaderMap,
    Json,
};
use sea_orm::DatabaseConnection;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::api::{actor_from_headers, error_response, ApiError};
use crate::models::invoice;
use crate::services::invoice_service;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct ListInvoicesQuery {
    pub status: Option<String>,
}

pub async fn list_invoices(
    State(db): State<DatabaseConnection>,
    Query(query): Query<ListInvoicesQuery>,
) -> Result<Json<Value>, ApiError> {
    let invoices = invoice_service::list_invoices(&db, query.status)
        .await
        .map_err(error_response)?;
    Ok(Json(json!({ "invoices": invoices })))
}

pub async fn get_invoice(
    State(db): State<DatabaseConnection>,
    Path(id): Path<i32>,
) -> Result<Json<invoice::Model>, ApiError> {
    let found = invoice_service::get_invoice(&db, id)
        .await
        .map_err(error_response)?;
    Ok(Json(found))
}

pub async fn get_order_invoice(
    State(db): State<DatabaseConnection>,
    Path(order_id): Path<i32>,
) -> Result<Json<invoice::Model>, ApiError> {
    let found = invoice_service::invoice_for_order(&db, order_id)
        .await
        .map_err(error_response)?;
    Ok(Json(found))
}

pub async fn send_invoice(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i32>,
) -> Result<Json<invoice::Model>, ApiError> {
    let actor = actor_from_headers(&headers)?;
    let updated = invoice_service::send_invoice(&state.db, &actor, id, state.notify_url.clone())
        .await
        .map_err(error_response)?;
    Ok(Json(updated))
}

pub async fn mark_paid(
    State(db): State<DatabaseConnection>,
    headers: HeaderMap,
    Path(id): Path<i32>,
) -> Result<Json<invoice::Model>, ApiError> {
    let actor = actor_from_headers(&headers)?;
    let updated = invoice_service::force_mark_paid(&db, &actor, id)
        .await
        .map_err(error_response)?;
    Ok(Json(updated))
}

use axum::{
    extract::{Path, Query, State},
    http::HeaderMap,
    Json,
};
use sea_orm::DatabaseConnection;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::api::{actor_from_headers, error_response, ApiError};
use crate::models::order::{OrderDto, UpdateOrderDto};
use crate::services::order_service::{self, OrderFilter};

use axum::http::StatusCode;

#[derive(Deserialize)]
pub struct ListOrdersQuery {
    pub client_id: Option<i32>,
    pub status: Option<String>,
    pub order_type: Option<String>,
}

pub async fn list_orders(
    State(db): State<DatabaseConnection>,
    Query(query): Query<ListOrdersQuery>,
) -> Result<Json<Value>, ApiError> {
    let filter = OrderFilter {
        client_id: query.client_id,
        status: query.status,
        order_type: query.order_type,
    };
    let orders = order_service::list_orders(&db, filter)
        .await
        .map_err(error_response)?;
    Ok(Json(json!({ "orders": orders })))
}

pub async fn get_order(
    State(db): State<DatabaseConnection>,
    Path(id): Path<i32>,
) -> Result<Json<order_service::OrderWithItems>, ApiError> {
    let result = order_service::get_order(&db, id)
        .await
        .map_err(error_response)?;
    Ok(Json(result))
}

pub async fn create_order(
    State(db): State<DatabaseConnection>,
    headers: HeaderMap,
    Json(payload): Json<OrderDto>,
) -> Result<(StatusCode, Json<order_service::OrderWithItems>), ApiError> {
    let actor = actor_from_headers(&headers)?;
    let result = order_service::create_order(&db, &actor, payload)
        .await
        .map_err(error_response)?;
    Ok((StatusCode::CREATED, Json(result)))
}

pub async fn update_order(
    State(db): State<DatabaseConnection>,
    headers: HeaderMap,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateOrderDto>,
) -> Result<Json<order_service::OrderWithItems>, ApiError> {
    let actor = actor_from_headers(&headers)?;
    let result = order_service::update_order(&db, &actor, id, payload)
        .await
        .map_err(error_response)?;
    Ok(Json(result))
}

pub async fn confirm_order(
    State(db): State<DatabaseConnection>,
    headers: HeaderMap,
    Path(id): Path<i32>,
) -> Result<Json<Value>, ApiError> {
    let actor = actor_from_headers(&headers)?;
    let order = order_service::confirm_order(&db, &actor, id)
        .await
        .map_err(error_response)?;
    Ok(Json(json!(order)))
}

pub async fn process_order(
    State(db): State<DatabaseConnection>,
    headers: HeaderMap,
    Path(id): Path<i32>,
) -> Result<Json<Value>, ApiError> {
    let actor = actor_from_headers(&headers)?;
    let order = order_service::process_order(&db, &actor, id)
        .await
        .map_err(error_response)?;
    Ok(Json(json!(order)))
}

pub async fn complete_order(
    State(db): State<DatabaseConnection>,
    headers: HeaderMap,
    Path(id): Path<i32>,
) -> Result<Json<Value>, ApiError> {
    let actor = actor_from_headers(&headers)?;
    let order = order_service::complete_order(&db, &actor, id)
        .await
        .map_err(error_response)?;
    Ok(Json(json!(order)))
}

pub async fn cancel_order(
    State(db): State<DatabaseConnection>,
    headers: HeaderMap,
    Path(id): Path<i32>,
) -> Result<Json<Value>, ApiError> {
    let actor = actor_from_headers(&headers)?;
    let order = order_service::cancel_order(&db, &actor, id)
        .await
        .map_err(error_response)?;
    Ok(Json(json!(order)))
}

pub async fn generate_invoice(
    State(db): State<DatabaseConnection>,
    headers: HeaderMap,
    Path(id): Path<i32>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let actor = actor_from_headers(&headers)?;
    let invoice = order_service::generate_invoice(&db, &actor, id)
        .await
        .map_err(error_response)?;
    Ok((StatusCode::CREATED, Json(json!(invoice))))
}

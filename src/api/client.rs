use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use chrono::Local;
use sea_orm::*;
use serde_json::{json, Value};

use crate::api::{actor_from_headers, ApiError};
use crate::models::client::{self, ClientDto, Entity as Client};
use crate::models::client_address::{self, ClientAddressDto, Entity as ClientAddress};

pub async fn list_clients(
    State(db): State<DatabaseConnection>,
) -> Result<Json<Value>, ApiError> {
    let clients = Client::find()
        .order_by_asc(client::Column::HospitalName)
        .all(&db)
        .await
        .map_err(|e| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": e.to_string() })),
            )
        })?;

    Ok(Json(json!({ "clients": clients })))
}

pub async fn get_client(
    State(db): State<DatabaseConnection>,
    Path(id): Path<i32>,
) -> Result<Json<client::Model>, ApiError> {
    let found = Client::find_by_id(id)
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
            Json(json!({ "error": "Not found: client" })),
        ))?;

    Ok(Json(found))
}

pub async fn create_client(
    State(db): State<DatabaseConnection>,
    headers: HeaderMap,
    Json(payload): Json<ClientDto>,
) -> Result<(StatusCode, Json<client::Model>), ApiError> {
    actor_from_headers(&headers)?;
    let now = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();

    let saved = client::ActiveModel {
        hospital_name: Set(payload.hospital_name),
        contact_person: Set(payload.contact_person),
        email: Set(payload.email),
        phone: Set(payload.phone),
        is_active: Set(payload.is_active.unwrap_or(true)),
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

pub async fn list_addresses(
    State(db): State<DatabaseConnection>,
    Path(client_id): Path<i32>,
) -> Result<Json<Value>, ApiError> {
    let addresses = ClientAddress::find()
        .filter(client_address::Column::ClientId.eq(client_id))
        .all(&db)
        .await
        .map_err(|e| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": e.to_string() })),
            )
        })?;

    Ok(Json(json!({ "addresses": addresses })))
}

pub async fn create_address(
    State(db): State<DatabaseConnection>,
    headers: HeaderMap,
    Path(client_id): Path<i32>,
    Json(payload): Json<ClientAddressDto>,
) -> Result<(StatusCode, Json<client_address::Model>), ApiError> {
    actor_from_headers(&headers)?;
    let now = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();

    Client::find_by_id(client_id)
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
            Json(json!({ "error": "Not found: client" })),
        ))?;

    let saved = client_address::ActiveModel {
        client_id: Set(client_id),
        address_type: Set(payload.address_type.unwrap_or_else(|| "both".to_string())),
        street_address: Set(payload.street_address),
        city: Set(payload.city),
        state: Set(payload.state),
        postal_code: Set(payload.postal_code),
        country: Set(payload.country.unwrap_or_else(|| "India".to_string())),
        is_default: Set(payload.is_default.unwrap_or(true)),
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

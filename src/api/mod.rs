pub mod client;
pub mod health;
pub mod instrument;
pub mod invoice;
pub mod order;
pub mod payment;

use axum::{
    http::{HeaderMap, StatusCode},
    routing::{get, post, put},
    Json, Router,
};
use serde_json::{json, Value};

use crate::domain::{Actor, DomainError, Role};
use crate::state::AppState;

pub type ApiError = (StatusCode, Json<Value>);

/// Map domain failures onto HTTP statuses with a uniform error body.
pub fn error_response(err: DomainError) -> ApiError {
    let status = match &err {
        DomainError::NotFound(_) => StatusCode::NOT_FOUND,
        DomainError::Validation(_) => StatusCode::BAD_REQUEST,
        DomainError::Conflict(_) | DomainError::State(_) => StatusCode::CONFLICT,
        DomainError::Forbidden(_) => StatusCode::FORBIDDEN,
        DomainError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(json!({ "error": err.to_string() })))
}

/// Resolve the calling actor from `X-Actor-Id` / `X-Actor-Role` headers.
/// Mutating routes refuse requests without a recognizable actor.
pub fn actor_from_headers(headers: &HeaderMap) -> Result<Actor, ApiError> {
    let id = headers
        .get("x-actor-id")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| {
            (
                StatusCode::FORBIDDEN,
                Json(json!({ "error": "Forbidden: missing X-Actor-Id header" })),
            )
        })?;

    let role = headers
        .get("x-actor-role")
        .and_then(|v| v.to_str().ok())
        .and_then(Role::parse)
        .ok_or_else(|| {
            (
                StatusCode::FORBIDDEN,
                Json(json!({ "error": "Forbidden: missing or unknown X-Actor-Role header" })),
            )
        })?;

    Ok(Actor {
        id: id.to_string(),
        role,
    })
}

pub fn api_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health::health_check))
        // Clients
        .route(
            "/clients",
            get(client::list_clients).post(client::create_client),
        )
        .route("/clients/:id", get(client::get_client))
        .route(
            "/clients/:id/addresses",
            get(client::list_addresses).post(client::create_address),
        )
        // Instruments
        .route(
            "/instruments",
            get(instrument::list_instruments).post(instrument::create_instrument),
        )
        .route("/instruments/:id", get(instrument::get_instrument))
        .route("/instruments/:id/status", put(instrument::update_status))
        // Orders
        .route("/orders", get(order::list_orders).post(order::create_order))
        .route("/orders/:id", get(order::get_order).put(order::update_order))
        .route("/orders/:id/confirm", post(order::confirm_order))
        .route("/orders/:id/process", post(order::process_order))
        .route("/orders/:id/complete", post(order::complete_order))
        .route("/orders/:id/cancel", post(order::cancel_order))
        .route("/orders/:id/generate_invoice", post(order::generate_invoice))
        .route("/orders/:id/invoice", get(invoice::get_order_invoice))
        // Payments
        .route(
            "/orders/:id/payments",
            get(payment::list_payments).post(payment::record_payment),
        )
        // Invoices
        .route("/invoices", get(invoice::list_invoices))
        .route("/invoices/:id", get(invoice::get_invoice))
        .route("/invoices/:id/send", post(invoice::send_invoice))
        .route("/invoices/:id/mark_paid", post(invoice::mark_paid))
        .with_state(state)
}

use medequip::db;
use medequip::domain::{Actor, DomainError, Role};
use medequip::models::instrument::Entity as Instrument;
use medequip::models::order::{OrderDto, OrderItemDto, UpdateOrderDto};
use medequip::services::order_service;
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};

fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

fn staff() -> Actor {
    Actor {
        id: "staff-1".to_string(),
        role: Role::Staff,
    }
}

async fn setup_test_db() -> DatabaseConnection {
    db::init_db("sqlite::memory:")
        .await
        .expect("Failed to init DB")
}

async fn create_test_client(db: &DatabaseConnection) -> i32 {
    let now = chrono::Utc::now().to_rfc3339();
    let client = medequip::models::client::ActiveModel {
        hospital_name: Set("City General Hospital".to_string()),
        contact_person: Set(Some("Dr. Rao".to_string())),
        email: Set(Some("purchasing@citygeneral.example".to_string())),
        phone: Set(None),
        is_active: Set(true),
        created_at: Set(now.clone()),
        updated_at: Set(now),
        ..Default::default()
    };
    client.insert(db).await.expect("Failed to create client").id
}

async fn create_test_instrument(db: &DatabaseConnection, serial: &str) -> i32 {
    let now = chrono::Utc::now().to_rfc3339();
    let instrument = medequip::models::instrument::ActiveModel {
        name: Set("Ultrasound Scanner".to_string()),
        serial_number: Set(serial.to_string()),
        description: Set(None),
        purchase_date: Set("2023-06-01".to_string()),
        purchase_price: Set(dec("5000.00")),
        rental_price_per_day: Set(dec("50.00")),
        selling_price: Set(dec("100.00")),
        status: Set("available".to_string()),
        manufacturer: Set(Some("Medix".to_string())),
        notes: Set(None),
        created_at: Set(now.clone()),
        updated_at: Set(now),
        ..Default::default()
    };
    instrument
        .insert(db)
        .await
        .expect("Failed to create instrument")
        .id
}

fn sale_item(instrument_id: i32, quantity: u32, unit_price: &str) -> OrderItemDto {
    OrderItemDto {
        instrument_id,
        quantity: Some(quantity),
        unit_price: unit_price.parse().unwrap(),
        rental_start_date: None,
        rental_end_date: None,
        rental_duration_days: None,
    }
}

fn order_dto(client_id: i32, order_type: &str, items: Vec<OrderItemDto>) -> OrderDto {
    OrderDto {
        client_id,
        order_type: order_type.to_string(),
        order_date: None,
        delivery_date: None,
        tax_amount: None,
        discount_amount: None,
        notes: None,
        items,
    }
}

async fn instrument_status(db: &DatabaseConnection, id: i32) -> String {
    Instrument::find_by_id(id)
        .one(db)
        .await
        .unwrap()
        .unwrap()
        .status
}

#[tokio::test]
async fn test_create_sale_order_totals_and_inventory() {
    let db = setup_test_db().await;
    let client_id = create_test_client(&db).await;
    let instrument_id = create_test_instrument(&db, "SN-001").await;

    let mut dto = order_dto(client_id, "sale", vec![sale_item(instrument_id, 2, "100.00")]);
    dto.tax_amount = Some(dec("20.00"));
    dto.discount_amount = Some(dec("10.00"));

    let result = order_service::create_order(&db, &staff(), dto)
        .await
        .expect("Failed to create order");

    assert!(result.order.order_number.starts_with('S'));
    assert_eq!(result.order.status, "pending");
    assert_eq!(result.order.payment_status, "pending");
    assert_eq!(result.order.total_amount, dec("200.00"));
    assert_eq!(result.order.grand_total, dec("210.00"));
    assert_eq!(result.items.len(), 1);
    assert_eq!(result.items[0].subtotal, dec("200.00"));

    assert_eq!(instrument_status(&db, instrument_id).await, "sold");
}

#[tokio::test]
async fn test_create_rental_order_multiplies_duration() {
    let db = setup_test_db().await;
    let client_id = create_test_client(&db).await;
    let instrument_id = create_test_instrument(&db, "SN-002").await;

    let item = OrderItemDto {
        instrument_id,
        quantity: Some(1),
        unit_price: dec("50.00"),
        rental_start_date: Some("2024-01-01".to_string()),
        rental_end_date: Some("2024-01-08".to_string()),
        rental_duration_days: Some(7),
    };
    let dto = order_dto(client_id, "rental", vec![item]);

    let result = order_service::create_order(&db, &staff(), dto)
        .await
        .expect("Failed to create order");

    assert!(result.order.order_number.starts_with('R'));
    assert_eq!(result.order.total_amount, dec("350.00"));
    assert_eq!(instrument_status(&db, instrument_id).await, "rented");
}

#[tokio::test]
async fn test_rental_without_duration_charges_per_unit_only() {
    let db = setup_test_db().await;
    let client_id = create_test_client(&db).await;
    let instrument_id = create_test_instrument(&db, "SN-003").await;

    let item = OrderItemDto {
        instrument_id,
        quantity: Some(3),
        unit_price: dec("50.00"),
        rental_start_date: None,
        rental_end_date: None,
        rental_duration_days: None,
    };
    let dto = order_dto(client_id, "rental", vec![item]);

    let result = order_service::create_order(&db, &staff(), dto)
        .await
        .expect("Failed to create order");
    assert_eq!(result.order.total_amount, dec("150.00"));
}

#[tokio::test]
async fn test_create_storage_order_marks_instrument_stored() {
    let db = setup_test_db().await;
    let client_id = create_test_client(&db).await;
    let instrument_id = create_test_instrument(&db, "SN-004").await;

    let dto = order_dto(
        client_id,
        "storage",
        vec![sale_item(instrument_id, 1, "10.00")],
    );
    let result = order_service::create_order(&db, &staff(), dto)
        .await
        .expect("Failed to create order");

    assert!(result.order.order_number.starts_with("ST"));
    assert_eq!(instrument_status(&db, instrument_id).await, "stored");
}

#[tokio::test]
async fn test_create_order_rejects_empty_items() {
    let db = setup_test_db().await;
    let client_id = create_test_client(&db).await;

    let dto = order_dto(client_id, "sale", vec![]);
    let err = order_service::create_order(&db, &staff(), dto)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Validation(_)));
}

#[tokio::test]
async fn test_create_order_rejects_unknown_instrument() {
    let db = setup_test_db().await;
    let client_id = create_test_client(&db).await;

    let dto = order_dto(client_id, "sale", vec![sale_item(999, 1, "100.00")]);
    let err = order_service::create_order(&db, &staff(), dto)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::NotFound(_)));
}

#[tokio::test]
async fn test_create_order_rejects_client_role() {
    let db = setup_test_db().await;
    let client_id = create_test_client(&db).await;
    let instrument_id = create_test_instrument(&db, "SN-005").await;

    let actor = Actor {
        id: "client-1".to_string(),
        role: Role::Client,
    };
    let dto = order_dto(client_id, "sale", vec![sale_item(instrument_id, 1, "100.00")]);
    let err = order_service::create_order(&db, &actor, dto)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Forbidden(_)));
}

#[tokio::test]
async fn test_update_order_replaces_items_without_touching_inventory() {
    let db = setup_test_db().await;
    let client_id = create_test_client(&db).await;
    let first = create_test_instrument(&db, "SN-006").await;
    let second = create_test_instrument(&db, "SN-007").await;

    let dto = order_dto(client_id, "sale", vec![sale_item(first, 2, "100.00")]);
    let created = order_service::create_order(&db, &staff(), dto)
        .await
        .expect("Failed to create order");

    let update = UpdateOrderDto {
        delivery_date: None,
        tax_amount: Some(dec("5.00")),
        discount_amount: None,
        notes: None,
        items: Some(vec![sale_item(second, 1, "100.00")]),
    };
    let updated = order_service::update_order(&db, &staff(), created.order.id, update)
        .await
        .expect("Failed to update order");

    assert_eq!(updated.items.len(), 1);
    assert_eq!(updated.items[0].instrument_id, second);
    assert_eq!(updated.order.total_amount, dec("100.00"));
    assert_eq!(updated.order.grand_total, dec("105.00"));
    // Order type is immutable and the number stays as issued.
    assert_eq!(updated.order.order_number, created.order.order_number);

    // Updates never drive instrument transitions.
    assert_eq!(instrument_status(&db, first).await, "sold");
    assert_eq!(instrument_status(&db, second).await, "available");
}

#[tokio::test]
async fn test_update_recomputes_grand_total_on_discount_change() {
    let db = setup_test_db().await;
    let client_id = create_test_client(&db).await;
    let instrument_id = create_test_instrument(&db, "SN-008").await;

    let mut dto = order_dto(client_id, "sale", vec![sale_item(instrument_id, 1, "100.00")]);
    dto.tax_amount = Some(dec("10.00"));
    let created = order_service::create_order(&db, &staff(), dto)
        .await
        .expect("Failed to create order");
    assert_eq!(created.order.grand_total, dec("110.00"));

    let update = UpdateOrderDto {
        delivery_date: None,
        tax_amount: None,
        discount_amount: Some(dec("25.00")),
        notes: None,
        items: None,
    };
    let updated = order_service::update_order(&db, &staff(), created.order.id, update)
        .await
        .expect("Failed to update order");
    assert_eq!(updated.order.grand_total, dec("85.00"));
}

#[tokio::test]
async fn test_status_transitions_follow_single_steps() {
    let db = setup_test_db().await;
    let client_id = create_test_client(&db).await;
    let instrument_id = create_test_instrument(&db, "SN-009").await;

    let dto = order_dto(client_id, "sale", vec![sale_item(instrument_id, 1, "100.00")]);
    let created = order_service::create_order(&db, &staff(), dto)
        .await
        .expect("Failed to create order");
    let id = created.order.id;

    // Cannot skip ahead from pending.
    let err = order_service::complete_order(&db, &staff(), id)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::State(_)));

    let confirmed = order_service::confirm_order(&db, &staff(), id).await.unwrap();
    assert_eq!(confirmed.status, "confirmed");

    let processing = order_service::process_order(&db, &staff(), id).await.unwrap();
    assert_eq!(processing.status, "processing");

    let completed = order_service::complete_order(&db, &staff(), id).await.unwrap();
    assert_eq!(completed.status, "completed");

    // Confirming again is illegal once past pending.
    let err = order_service::confirm_order(&db, &staff(), id)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::State(_)));
}

#[tokio::test]
async fn test_cancel_pending_order_restores_instruments() {
    let db = setup_test_db().await;
    let client_id = create_test_client(&db).await;
    let instrument_id = create_test_instrument(&db, "SN-010").await;

    let dto = order_dto(client_id, "sale", vec![sale_item(instrument_id, 1, "100.00")]);
    let created = order_service::create_order(&db, &staff(), dto)
        .await
        .expect("Failed to create order");
    assert_eq!(instrument_status(&db, instrument_id).await, "sold");

    let cancelled = order_service::cancel_order(&db, &staff(), created.order.id)
        .await
        .expect("Failed to cancel order");
    assert_eq!(cancelled.status, "cancelled");
    assert_eq!(instrument_status(&db, instrument_id).await, "available");

    // Cancelling twice is rejected.
    let err = order_service::cancel_order(&db, &staff(), created.order.id)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::State(_)));
}

#[tokio::test]
async fn test_cancel_completed_order_conflicts() {
    let db = setup_test_db().await;
    let client_id = create_test_client(&db).await;
    let instrument_id = create_test_instrument(&db, "SN-011").await;

    let dto = order_dto(client_id, "sale", vec![sale_item(instrument_id, 1, "100.00")]);
    let created = order_service::create_order(&db, &staff(), dto)
        .await
        .expect("Failed to create order");
    let id = created.order.id;

    order_service::confirm_order(&db, &staff(), id).await.unwrap();
    order_service::process_order(&db, &staff(), id).await.unwrap();
    order_service::complete_order(&db, &staff(), id).await.unwrap();

    let err = order_service::cancel_order(&db, &staff(), id).await.unwrap_err();
    assert!(matches!(err, DomainError::Conflict(_)));
    // A completed sale keeps its instrument sold.
    assert_eq!(instrument_status(&db, instrument_id).await, "sold");
}

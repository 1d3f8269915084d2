use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "orders")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub order_number: String,
    pub client_id: i32,
    pub order_type: String, // 'sale', 'rental', 'storage'
    pub status: String,     // 'pending', 'confirmed', 'processing', 'completed', 'cancelled'
    pub payment_status: String, // 'pending', 'partial', 'paid' ('overdue'/'refunded' reserved, never derived)
    pub order_date: String,
    pub delivery_date: Option<String>,
    pub total_amount: Decimal,
    pub tax_amount: Decimal,
    pub discount_amount: Decimal,
    pub grand_total: Decimal,
    pub notes: Option<String>,
    pub created_by: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::client::Entity",
        from = "Column::ClientId",
        to = "super::client::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Client,
    #[sea_orm(has_many = "super::order_item::Entity")]
    OrderItem,
    #[sea_orm(has_many = "super::payment::Entity")]
    Payment,
    #[sea_orm(has_one = "super::invoice::Entity")]
    Invoice,
}

impl Related<super::client::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Client.def()
    }
}

impl Related<super::order_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OrderItem.def()
    }
}

impl Related<super::payment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Payment.def()
    }
}

impl Related<super::invoice::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Invoice.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Line item as submitted when creating or updating an order. Subtotals are
/// always recomputed server-side, never trusted from input.
#[derive(Debug, Serialize, Deserialize)]
pub struct OrderItemDto {
    pub instrument_id: i32,
    pub quantity: Option<u32>,
    pub unit_price: Decimal,
    pub rental_start_date: Option<String>,
    pub rental_end_date: Option<String>,
    pub rental_duration_days: Option<u32>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct OrderDto {
    pub client_id: i32,
    pub order_type: String,
    pub order_date: Option<String>,
    pub delivery_date: Option<String>,
    pub tax_amount: Option<Decimal>,
    pub discount_amount: Option<Decimal>,
    pub notes: Option<String>,
    pub items: Vec<OrderItemDto>,
}

/// Partial update payload. Order type and numbering never change after
/// creation; replacing `items` recomputes the totals.
#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateOrderDto {
    pub delivery_date: Option<String>,
    pub tax_amount: Option<Decimal>,
    pub discount_amount: Option<Decimal>,
    pub notes: Option<String>,
    pub items: Option<Vec<OrderItemDto>>,
}

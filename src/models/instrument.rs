use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "instruments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub serial_number: String,
    pub description: Option<String>,
    pub purchase_date: String,
    pub purchase_price: Decimal,
    pub rental_price_per_day: Decimal,
    pub selling_price: Decimal,
    pub status: String, // 'available', 'sold', 'rented', 'stored', 'maintenance'
    pub manufacturer: Option<String>,
    pub notes: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::order_item::Entity")]
    OrderItem,
}

impl Related<super::order_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OrderItem.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Debug, Serialize, Deserialize)]
pub struct InstrumentDto {
    pub id: Option<i32>,
    pub name: String,
    pub serial_number: String,
    pub description: Option<String>,
    pub purchase_date: String,
    pub purchase_price: Decimal,
    pub rental_price_per_day: Decimal,
    pub selling_price: Decimal,
    pub status: Option<String>,
    pub manufacturer: Option<String>,
    pub notes: Option<String>,
}

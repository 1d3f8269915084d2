use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "payments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub order_id: i32,
    pub payment_method: String, // 'cash', 'credit_card', 'debit_card', 'bank_transfer', 'upi', 'cheque'
    pub amount: Decimal,
    pub transaction_id: Option<String>,
    pub payment_date: String,
    pub status: String, // 'pending', 'completed', 'failed', 'refunded'
    pub notes: Option<String>,
    pub created_by: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::order::Entity",
        from = "Column::OrderId",
        to = "super::order::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Order,
}

impl Related<super::order::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Order.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Debug, Serialize, Deserialize)]
pub struct PaymentDto {
    pub payment_method: String,
    pub amount: Decimal,
    pub transaction_id: Option<String>,
    pub payment_date: Option<String>,
    pub status: Option<String>,
    pub notes: Option<String>,
}

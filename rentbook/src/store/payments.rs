use chrono::Utc;
use sea_orm::{ActiveModelTrait, ConnectionTrait, EntityTrait, QueryOrder, Set};

use super::StoreError;
use crate::entity::payment;

pub const DEFAULT_PAYMENT_STATUS: &str = "paid";

/// A validated payment ready to insert.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPayment {
    pub property_id: i32,
    pub tenant_id: i32,
    pub amount: f64,
    pub date: Option<String>,
    pub status: String,
}

/// All payments in insertion order.
pub async fn list<C: ConnectionTrait>(db: &C) -> Result<Vec<payment::Model>, StoreError> {
    Ok(payment::Entity::find()
        .order_by_asc(payment::Column::Id)
        .all(db)
        .await?)
}

pub async fn create<C: ConnectionTrait>(
    db: &C,
    input: NewPayment,
) -> Result<payment::Model, StoreError> {
    Ok(payment::ActiveModel {
        property_id: Set(input.property_id),
        tenant_id: Set(input.tenant_id),
        amount: Set(input.amount),
        date: Set(input.date),
        status: Set(input.status),
        created_at: Set(Utc::now().naive_utc()),
        ..Default::default()
    }
    .insert(db)
    .await?)
}

use sea_orm::{
    ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter, TransactionTrait,
};

use super::{PropertyStatus, StoreError};
use crate::entity::{payment, property, tenant};

/// Portfolio-wide counts shown on the dashboard.
#[derive(Debug, Clone, PartialEq)]
pub struct PortfolioSummary {
    pub total_properties: u64,
    pub occupied_properties: u64,
    pub vacant_properties: u64,
    /// Sum of monthly rent over occupied properties.
    pub total_monthly_revenue: f64,
    pub pending_payments: u64,
    pub total_tenants: u64,
}

/// All counts are read inside one transaction so they describe the same state.
pub async fn portfolio<C>(db: &C) -> Result<PortfolioSummary, StoreError>
where
    C: ConnectionTrait + TransactionTrait,
{
    let txn = db.begin().await?;

    let total_properties = property::Entity::find().count(&txn).await?;

    let occupied = property::Entity::find()
        .filter(property::Column::Status.eq(PropertyStatus::Occupied.as_str()))
        .all(&txn)
        .await?;
    let occupied_properties = occupied.len() as u64;
    let total_monthly_revenue: f64 = occupied.iter().map(|p| p.monthly_rent).sum();

    let vacant_properties = property::Entity::find()
        .filter(property::Column::Status.eq(PropertyStatus::Vacant.as_str()))
        .count(&txn)
        .await?;

    let pending_payments = payment::Entity::find()
        .filter(payment::Column::Status.eq("pending"))
        .count(&txn)
        .await?;
    let total_tenants = tenant::Entity::find().count(&txn).await?;

    txn.commit().await?;

    Ok(PortfolioSummary {
        total_properties,
        occupied_properties,
        vacant_properties,
        total_monthly_revenue,
        pending_payments,
        total_tenants,
    })
}

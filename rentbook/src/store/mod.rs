//! Persistence for properties, tenants and payments.
//!
//! Every operation takes the connection it runs on, so a handler can pass the
//! pooled connection or an open transaction without the store caring which.

pub mod payments;
pub mod properties;
pub mod summary;
pub mod tenants;

/// Error type for domain-store operations.
#[derive(Debug)]
pub enum StoreError {
    /// The addressed record does not exist. Carries the entity name.
    NotFound(&'static str),
    /// A unique value is already taken.
    Duplicate(String),
    /// The record is still referenced by other records.
    Referenced(String),
    Db(sea_orm::DbErr),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::NotFound(what) => write!(f, "{what} not found"),
            StoreError::Duplicate(msg) => write!(f, "{msg}"),
            StoreError::Referenced(msg) => write!(f, "{msg}"),
            StoreError::Db(e) => write!(f, "Database error: {e}"),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<sea_orm::DbErr> for StoreError {
    fn from(e: sea_orm::DbErr) -> Self {
        StoreError::Db(e)
    }
}

/// Occupancy of a property.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyStatus {
    Vacant,
    Occupied,
}

impl PropertyStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PropertyStatus::Vacant => "vacant",
            PropertyStatus::Occupied => "occupied",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "vacant" => Some(PropertyStatus::Vacant),
            "occupied" => Some(PropertyStatus::Occupied),
            _ => None,
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use migration::{Migrator, MigratorTrait};
    use sea_orm::{Database, DatabaseConnection};

    use super::properties::{self, NewProperty};
    use crate::entity::property;

    pub async fn setup() -> DatabaseConnection {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        Migrator::up(&db, None).await.unwrap();
        db
    }

    pub async fn seed_property(db: &DatabaseConnection, address: &str, rent: f64) -> property::Model {
        properties::create(db, NewProperty::new(address, rent))
            .await
            .unwrap()
    }
}

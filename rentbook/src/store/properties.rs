use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};

use super::{PropertyStatus, StoreError};
use crate::entity::{payment, property, tenant};

pub const DEFAULT_PROPERTY_TYPE: &str = "Residential";

/// A validated property ready to insert.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProperty {
    pub address: String,
    pub unit_count: i32,
    pub monthly_rent: f64,
    pub status: PropertyStatus,
    pub property_type: String,
    pub image_url: Option<String>,
}

impl NewProperty {
    /// A property with every optional field at its default.
    pub fn new(address: impl Into<String>, monthly_rent: f64) -> Self {
        Self {
            address: address.into(),
            unit_count: 1,
            monthly_rent,
            status: PropertyStatus::Vacant,
            property_type: DEFAULT_PROPERTY_TYPE.to_string(),
            image_url: None,
        }
    }
}

/// Partial update; `None` keeps the stored value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropertyPatch {
    pub address: Option<String>,
    pub unit_count: Option<i32>,
    pub monthly_rent: Option<f64>,
    pub status: Option<PropertyStatus>,
    pub property_type: Option<String>,
    pub image_url: Option<String>,
}

/// All properties in insertion order.
pub async fn list<C: ConnectionTrait>(db: &C) -> Result<Vec<property::Model>, StoreError> {
    Ok(property::Entity::find()
        .order_by_asc(property::Column::Id)
        .all(db)
        .await?)
}

pub async fn get<C: ConnectionTrait>(db: &C, id: i32) -> Result<property::Model, StoreError> {
    property::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or(StoreError::NotFound("Property"))
}

pub async fn create<C: ConnectionTrait>(
    db: &C,
    input: NewProperty,
) -> Result<property::Model, StoreError> {
    let model = property::ActiveModel {
        address: Set(input.address),
        unit_count: Set(input.unit_count),
        monthly_rent: Set(input.monthly_rent),
        status: Set(input.status.as_str().to_string()),
        property_type: Set(input.property_type),
        image_url: Set(input.image_url),
        created_at: Set(Utc::now().naive_utc()),
        ..Default::default()
    }
    .insert(db)
    .await?;

    tracing::debug!(property_id = model.id, "property created");
    Ok(model)
}

pub async fn update<C: ConnectionTrait>(
    db: &C,
    id: i32,
    patch: PropertyPatch,
) -> Result<property::Model, StoreError> {
    let model = get(db, id).await?;
    if patch == PropertyPatch::default() {
        return Ok(model);
    }
    let mut active: property::ActiveModel = model.into();

    if let Some(address) = patch.address {
        active.address = Set(address);
    }
    if let Some(unit_count) = patch.unit_count {
        active.unit_count = Set(unit_count);
    }
    if let Some(monthly_rent) = patch.monthly_rent {
        active.monthly_rent = Set(monthly_rent);
    }
    if let Some(status) = patch.status {
        active.status = Set(status.as_str().to_string());
    }
    if let Some(property_type) = patch.property_type {
        active.property_type = Set(property_type);
    }
    if let Some(image_url) = patch.image_url {
        active.image_url = Set(Some(image_url));
    }

    Ok(active.update(db).await?)
}

/// Delete a property nobody references. Tenants and payments are never
/// cascaded; a referenced property is refused instead. The reference check
/// and the delete share one transaction.
pub async fn delete<C>(db: &C, id: i32) -> Result<(), StoreError>
where
    C: ConnectionTrait + TransactionTrait,
{
    let txn = db.begin().await?;
    let model = get(&txn, id).await?;

    let tenants = tenant::Entity::find()
        .filter(tenant::Column::PropertyId.eq(id))
        .count(&txn)
        .await?;
    let payments = payment::Entity::find()
        .filter(payment::Column::PropertyId.eq(id))
        .count(&txn)
        .await?;
    if tenants > 0 || payments > 0 {
        return Err(StoreError::Referenced(format!(
            "Property is referenced by {tenants} tenant(s) and {payments} payment(s)"
        )));
    }

    let active: property::ActiveModel = model.into();
    active.delete(&txn).await?;
    txn.commit().await?;
    tracing::debug!(property_id = id, "property deleted");
    Ok(())
}

/// Mark a property occupied. Returns `false` when it does not exist.
pub async fn mark_occupied<C: ConnectionTrait>(db: &C, id: i32) -> Result<bool, StoreError> {
    let Some(model) = property::Entity::find_by_id(id).one(db).await? else {
        return Ok(false);
    };
    if model.status != PropertyStatus::Occupied.as_str() {
        let mut active: property::ActiveModel = model.into();
        active.status = Set(PropertyStatus::Occupied.as_str().to_string());
        active.update(db).await?;
    }
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::test_support::{seed_property, setup};
    use crate::store::tenants::{self, NewTenant};

    #[tokio::test]
    async fn create_applies_defaults() {
        let db = setup().await;
        let p = create(&db, NewProperty::new("123 Main", 1000.0)).await.unwrap();

        assert_eq!(p.address, "123 Main");
        assert_eq!(p.monthly_rent, 1000.0);
        assert_eq!(p.unit_count, 1);
        assert_eq!(p.status, "vacant");
        assert_eq!(p.property_type, "Residential");
        assert_eq!(p.image_url, None);
    }

    #[tokio::test]
    async fn list_is_insertion_ordered() {
        let db = setup().await;
        seed_property(&db, "Zeta St", 900.0).await;
        seed_property(&db, "Alpha Ave", 1900.0).await;
        seed_property(&db, "Mid Rd", 100.0).await;

        let addresses: Vec<String> = list(&db).await.unwrap().into_iter().map(|p| p.address).collect();
        assert_eq!(addresses, vec!["Zeta St", "Alpha Ave", "Mid Rd"]);
    }

    #[tokio::test]
    async fn partial_update_keeps_other_fields() {
        let db = setup().await;
        let mut input = NewProperty::new("9 Oak", 1500.0);
        input.unit_count = 4;
        input.image_url = Some("https://img.example/oak.jpg".into());
        let p = create(&db, input).await.unwrap();

        let updated = update(
            &db,
            p.id,
            PropertyPatch {
                status: Some(PropertyStatus::Occupied),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        assert_eq!(updated.status, "occupied");
        assert_eq!(updated.address, "9 Oak");
        assert_eq!(updated.unit_count, 4);
        assert_eq!(updated.monthly_rent, 1500.0);
        assert_eq!(updated.image_url.as_deref(), Some("https://img.example/oak.jpg"));
        assert_eq!(updated.created_at, p.created_at);
    }

    #[tokio::test]
    async fn update_missing_is_not_found() {
        let db = setup().await;
        let err = update(&db, 99, PropertyPatch::default()).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound("Property")));
    }

    #[tokio::test]
    async fn delete_removes_from_list() {
        let db = setup().await;
        let keep = seed_property(&db, "Keep", 1.0).await;
        let gone = seed_property(&db, "Gone", 1.0).await;

        delete(&db, gone.id).await.unwrap();

        let ids: Vec<i32> = list(&db).await.unwrap().iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![keep.id]);
        assert!(matches!(get(&db, gone.id).await, Err(StoreError::NotFound(_))));
    }

    #[tokio::test]
    async fn delete_missing_is_not_found() {
        let db = setup().await;
        assert!(matches!(delete(&db, 1).await, Err(StoreError::NotFound(_))));
    }

    #[tokio::test]
    async fn delete_referenced_is_refused() {
        let db = setup().await;
        let p = seed_property(&db, "Busy", 1200.0).await;
        let mut t = NewTenant::new("Tina");
        t.property_id = Some(p.id);
        tenants::create(&db, t).await.unwrap();

        let err = delete(&db, p.id).await.unwrap_err();
        assert!(matches!(err, StoreError::Referenced(_)), "got {err:?}");
        assert_eq!(list(&db).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn refused_delete_leaves_connection_usable() {
        let db = setup().await;
        let busy = seed_property(&db, "Busy", 1200.0).await;
        let free = seed_property(&db, "Free", 900.0).await;
        let mut t = NewTenant::new("Tina");
        t.property_id = Some(busy.id);
        tenants::create(&db, t).await.unwrap();

        assert!(delete(&db, busy.id).await.is_err());
        delete(&db, free.id).await.unwrap();

        let ids: Vec<i32> = list(&db).await.unwrap().iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![busy.id]);
        assert_eq!(get(&db, busy.id).await.unwrap().status, "occupied");
    }

    #[tokio::test]
    async fn mark_occupied_reports_missing() {
        let db = setup().await;
        assert!(!mark_occupied(&db, 5).await.unwrap());

        let p = seed_property(&db, "Here", 10.0).await;
        assert!(mark_occupied(&db, p.id).await.unwrap());
        assert_eq!(get(&db, p.id).await.unwrap().status, "occupied");
    }
}

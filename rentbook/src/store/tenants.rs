use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};

use super::{StoreError, properties};
use crate::entity::tenant;

/// A validated tenant ready to insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTenant {
    pub name: String,
    pub email: Option<String>,
    pub property_id: Option<i32>,
    pub lease_start: Option<String>,
    pub lease_end: Option<String>,
    pub avatar: Option<String>,
}

impl NewTenant {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: None,
            property_id: None,
            lease_start: None,
            lease_end: None,
            avatar: None,
        }
    }
}

/// All tenants in insertion order.
pub async fn list<C: ConnectionTrait>(db: &C) -> Result<Vec<tenant::Model>, StoreError> {
    Ok(tenant::Entity::find()
        .order_by_asc(tenant::Column::Id)
        .all(db)
        .await?)
}

/// Insert a tenant and, if it names an existing property, mark that property
/// occupied. Both writes commit together or not at all. An unknown
/// `property_id` is stored as given and the status update is skipped.
pub async fn create<C>(db: &C, input: NewTenant) -> Result<tenant::Model, StoreError>
where
    C: ConnectionTrait + TransactionTrait,
{
    let txn = db.begin().await?;

    if let Some(ref email) = input.email {
        let taken = tenant::Entity::find()
            .filter(tenant::Column::Email.eq(email.as_str()))
            .one(&txn)
            .await?;
        if taken.is_some() {
            return Err(StoreError::Duplicate("Tenant email already exists".into()));
        }
    }

    let property_id = input.property_id;
    let model = tenant::ActiveModel {
        name: Set(input.name),
        email: Set(input.email),
        property_id: Set(property_id),
        lease_start: Set(input.lease_start),
        lease_end: Set(input.lease_end),
        avatar: Set(input.avatar),
        created_at: Set(Utc::now().naive_utc()),
        ..Default::default()
    }
    .insert(&txn)
    .await
    .map_err(|e| {
        let msg = e.to_string();
        if msg.contains("UNIQUE") || msg.contains("unique") {
            StoreError::Duplicate("Tenant email already exists".into())
        } else {
            StoreError::Db(e)
        }
    })?;

    if let Some(pid) = property_id
        && !properties::mark_occupied(&txn, pid).await?
    {
        tracing::debug!(tenant_id = model.id, property_id = pid, "tenant linked to unknown property");
    }

    txn.commit().await?;
    Ok(model)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::test_support::{seed_property, setup};

    #[tokio::test]
    async fn linking_tenant_marks_property_occupied() {
        let db = setup().await;
        let p = seed_property(&db, "1 Lease Ln", 1100.0).await;
        assert_eq!(p.status, "vacant");

        let mut input = NewTenant::new("Tia");
        input.property_id = Some(p.id);
        input.lease_start = Some("2024-01-01".into());
        let t = create(&db, input).await.unwrap();

        assert_eq!(t.property_id, Some(p.id));
        assert_eq!(properties::get(&db, p.id).await.unwrap().status, "occupied");
    }

    #[tokio::test]
    async fn unlinked_tenant_leaves_properties_alone() {
        let db = setup().await;
        let p = seed_property(&db, "2 Quiet Ct", 800.0).await;

        create(&db, NewTenant::new("Solo")).await.unwrap();

        assert_eq!(properties::get(&db, p.id).await.unwrap().status, "vacant");
    }

    #[tokio::test]
    async fn unknown_property_is_silently_skipped() {
        let db = setup().await;
        let mut input = NewTenant::new("Ghost");
        input.property_id = Some(404);

        let t = create(&db, input).await.unwrap();
        assert_eq!(t.property_id, Some(404));
        assert!(properties::list(&db).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn duplicate_email_rejected_without_insert() {
        let db = setup().await;
        let mut first = NewTenant::new("A");
        first.email = Some("a@example.com".into());
        create(&db, first).await.unwrap();

        let mut second = NewTenant::new("B");
        second.email = Some("a@example.com".into());
        let err = create(&db, second).await.unwrap_err();

        assert!(matches!(err, StoreError::Duplicate(_)), "got {err:?}");
        assert_eq!(list(&db).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn tenants_without_email_do_not_collide() {
        let db = setup().await;
        create(&db, NewTenant::new("One")).await.unwrap();
        create(&db, NewTenant::new("Two")).await.unwrap();

        let names: Vec<String> = list(&db).await.unwrap().into_iter().map(|t| t.name).collect();
        assert_eq!(names, vec!["One", "Two"]);
    }
}

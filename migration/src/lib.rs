pub use sea_orm_migration::prelude::*;

mod m20261001_000001_create_app_users;
mod m20261001_000002_create_properties;
mod m20261002_000003_create_tenants;
mod m20261002_000004_create_payments;
mod m20261009_000005_add_listing_media;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20261001_000001_create_app_users::Migration),
            Box::new(m20261001_000002_create_properties::Migration),
            Box::new(m20261002_000003_create_tenants::Migration),
            Box::new(m20261002_000004_create_payments::Migration),
            Box::new(m20261009_000005_add_listing_media::Migration),
        ]
    }
}

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // property_id is a soft reference: the domain store refuses to delete
        // a property that tenants still point at.
        manager
            .create_table(
                Table::create()
                    .table(Tenant::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Tenant::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Tenant::Name).string().not_null())
                    .col(ColumnDef::new(Tenant::Email).string().null())
                    .col(ColumnDef::new(Tenant::PropertyId).integer().null())
                    .col(ColumnDef::new(Tenant::LeaseStart).string().null())
                    .col(ColumnDef::new(Tenant::LeaseEnd).string().null())
                    .col(
                        ColumnDef::new(Tenant::CreatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // NULL emails do not collide, so tenants without an email are unconstrained.
        manager
            .create_index(
                Index::create()
                    .name("idx_tenant_email")
                    .table(Tenant::Table)
                    .col(Tenant::Email)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_tenant_property")
                    .table(Tenant::Table)
                    .col(Tenant::PropertyId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Tenant::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Tenant {
    Table,
    Id,
    Name,
    Email,
    PropertyId,
    LeaseStart,
    LeaseEnd,
    CreatedAt,
}

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

// SQLite only accepts one ALTER option per statement, hence one call per column.
#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .alter_table(
                Table::alter()
                    .table(Property::Table)
                    .add_column(
                        ColumnDef::new(Property::PropertyType)
                            .string()
                            .not_null()
                            .default("Residential"),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .alter_table(
                Table::alter()
                    .table(Property::Table)
                    .add_column(ColumnDef::new(Property::ImageUrl).string().null())
                    .to_owned(),
            )
            .await?;

        manager
            .alter_table(
                Table::alter()
                    .table(Tenant::Table)
                    .add_column(ColumnDef::new(Tenant::Avatar).string().null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .alter_table(
                Table::alter()
                    .table(Tenant::Table)
                    .drop_column(Tenant::Avatar)
                    .to_owned(),
            )
            .await?;

        manager
            .alter_table(
                Table::alter()
                    .table(Property::Table)
                    .drop_column(Property::ImageUrl)
                    .to_owned(),
            )
            .await?;

        manager
            .alter_table(
                Table::alter()
                    .table(Property::Table)
                    .drop_column(Property::PropertyType)
                    .to_owned(),
            )
            .await
    }
}

#[derive(Iden)]
enum Property {
    Table,
    PropertyType,
    ImageUrl,
}

#[derive(Iden)]
enum Tenant {
    Table,
    Avatar,
}

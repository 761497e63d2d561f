use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Payment::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Payment::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Payment::PropertyId).integer().not_null())
                    .col(ColumnDef::new(Payment::TenantId).integer().not_null())
                    .col(ColumnDef::new(Payment::Amount).double().not_null())
                    .col(ColumnDef::new(Payment::Date).string().null())
                    .col(
                        ColumnDef::new(Payment::Status)
                            .string()
                            .not_null()
                            .default("paid"),
                    )
                    .col(
                        ColumnDef::new(Payment::CreatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_payment_property")
                    .table(Payment::Table)
                    .col(Payment::PropertyId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_payment_tenant")
                    .table(Payment::Table)
                    .col(Payment::TenantId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Payment::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Payment {
    Table,
    Id,
    PropertyId,
    TenantId,
    Amount,
    Date,
    Status,
    CreatedAt,
}

use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(CoverageZip::Table)
                    .if_not_exists()
                    .col(pk_auto(CoverageZip::Id))
                    .col(string_len(CoverageZip::Zip, 10).not_null().unique_key())
                    .to_owned(),
            )
            .await?;

        // Seed the serviced delivery areas
        let insert = Query::insert()
            .into_table(CoverageZip::Table)
            .columns([CoverageZip::Zip])
            .values_panic(["10001".into()])
            .values_panic(["10002".into()])
            .values_panic(["10003".into()])
            .values_panic(["10011".into()])
            .values_panic(["10016".into()])
            .values_panic(["10027".into()])
            .to_owned();

        manager.exec_stmt(insert).await?;

        manager
            .create_table(
                Table::create()
                    .table(CoverageNotification::Table)
                    .if_not_exists()
                    .col(pk_auto(CoverageNotification::Id))
                    .col(string_len(CoverageNotification::Zip, 10).not_null())
                    .col(string_len(CoverageNotification::Email, 255).not_null())
                    .col(
                        timestamp_with_time_zone(CoverageNotification::CreatedAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(
                Table::drop()
                    .table(CoverageNotification::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(CoverageZip::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum CoverageZip {
    Table,
    Id,
    Zip,
}

#[derive(DeriveIden)]
pub enum CoverageNotification {
    Table,
    Id,
    Zip,
    Email,
    CreatedAt,
}

use sea_orm_migration::{prelude::*, schema::*};
use uuid::Uuid;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Pharmacy::Table)
                    .if_not_exists()
                    .col(uuid(Pharmacy::Id).primary_key())
                    .col(string_len(Pharmacy::Name, 200).not_null())
                    .col(string_len(Pharmacy::Address, 300).not_null())
                    .col(string_len(Pharmacy::City, 100).not_null())
                    .col(string_len(Pharmacy::State, 50).not_null())
                    .col(string_len(Pharmacy::Zip, 10).not_null())
                    .col(double(Pharmacy::Lat).not_null())
                    .col(double(Pharmacy::Lng).not_null())
                    .col(string_len_null(Pharmacy::Phone, 30))
                    .col(string_len_null(Pharmacy::Hours, 200))
                    .col(boolean(Pharmacy::IsPartner).not_null().default(false))
                    .to_owned(),
            )
            .await?;

        // Seed a starter set of pharmacies
        let insert = Query::insert()
            .into_table(Pharmacy::Table)
            .columns([
                Pharmacy::Id,
                Pharmacy::Name,
                Pharmacy::Address,
                Pharmacy::City,
                Pharmacy::State,
                Pharmacy::Zip,
                Pharmacy::Lat,
                Pharmacy::Lng,
                Pharmacy::Phone,
                Pharmacy::Hours,
                Pharmacy::IsPartner,
            ])
            .values_panic([
                Uuid::new_v4().into(),
                "Midtown Pharmacy".into(),
                "276 5th Ave".into(),
                "New York".into(),
                "NY".into(),
                "10001".into(),
                (40.7457).into(),
                (-73.9883).into(),
                "(212) 555-0134".into(),
                "Mon-Fri 9am-7pm, Sat 10am-4pm".into(),
                true.into(),
            ])
            .values_panic([
                Uuid::new_v4().into(),
                "Chelsea Drugs".into(),
                "200 W 23rd St".into(),
                "New York".into(),
                "NY".into(),
                "10011".into(),
                (40.7443).into(),
                (-73.9959).into(),
                "(212) 555-0188".into(),
                "Mon-Sat 8am-8pm".into(),
                false.into(),
            ])
            .values_panic([
                Uuid::new_v4().into(),
                "Harlem Apothecary".into(),
                "2341 Frederick Douglass Blvd".into(),
                "New York".into(),
                "NY".into(),
                "10027".into(),
                (40.8116).into(),
                (-73.9465).into(),
                "(212) 555-0147".into(),
                "Mon-Fri 9am-6pm".into(),
                false.into(),
            ])
            .to_owned();

        manager.exec_stmt(insert).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Pharmacy::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Pharmacy {
    Table,
    Id,
    Name,
    Address,
    City,
    State,
    Zip,
    Lat,
    Lng,
    Phone,
    Hours,
    IsPartner,
}

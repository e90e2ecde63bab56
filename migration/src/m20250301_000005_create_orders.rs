use sea_orm_migration::{prelude::*, schema::*, sea_orm::sea_query::extension::postgres::Type};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_type(
                Type::create()
                    .as_enum(OrderStatus::Enum)
                    .values([
                        OrderStatus::PendingPayment,
                        OrderStatus::Confirmed,
                        OrderStatus::Delivered,
                        OrderStatus::Cancelled,
                    ])
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Order::Table)
                    .if_not_exists()
                    .col(uuid(Order::Id).primary_key())
                    // Null user means a guest order
                    .col(uuid_null(Order::UserId))
                    .col(string_len(Order::PickupAddress, 500).not_null())
                    .col(double(Order::PickupLat).not_null())
                    .col(double(Order::PickupLng).not_null())
                    .col(string_len(Order::DropoffAddress, 500).not_null())
                    .col(double(Order::DropoffLat).not_null())
                    .col(double(Order::DropoffLng).not_null())
                    .col(date(Order::DeliveryDate).not_null())
                    .col(string_len(Order::DeliveryTime, 5).not_null())
                    .col(double(Order::DistanceMiles).not_null())
                    .col(string_len_null(Order::Duration, 30))
                    .col(double(Order::DeliveryCharge).not_null())
                    .col(double(Order::ServiceCharge).not_null())
                    .col(double(Order::Amount).not_null())
                    .col(uuid_null(Order::PharmacyId))
                    .col(
                        boolean(Order::IsPartnerPharmacy)
                            .not_null()
                            .default(false),
                    )
                    .col(string_len(Order::FirstName, 100).not_null())
                    .col(string_len(Order::LastName, 100).not_null())
                    .col(string_len(Order::Email, 255).not_null())
                    .col(string_len(Order::Phone, 30).not_null())
                    .col(
                        ColumnDef::new(Order::Status)
                            .custom(OrderStatus::Enum)
                            .not_null(),
                    )
                    .col(
                        timestamp_with_time_zone(Order::CreatedAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Order::Table).to_owned())
            .await?;

        manager
            .drop_type(Type::drop().name(OrderStatus::Enum).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Order {
    Table,
    Id,
    UserId,
    PickupAddress,
    PickupLat,
    PickupLng,
    DropoffAddress,
    DropoffLat,
    DropoffLng,
    DeliveryDate,
    DeliveryTime,
    DistanceMiles,
    Duration,
    DeliveryCharge,
    ServiceCharge,
    Amount,
    PharmacyId,
    IsPartnerPharmacy,
    FirstName,
    LastName,
    Email,
    Phone,
    Status,
    CreatedAt,
}

#[derive(DeriveIden)]
pub enum OrderStatus {
    #[sea_orm(iden = "order_status")]
    Enum,
    PendingPayment,
    Confirmed,
    Delivered,
    Cancelled,
}

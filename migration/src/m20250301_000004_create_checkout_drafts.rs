use sea_orm_migration::{prelude::*, schema::*, sea_orm::sea_query::extension::postgres::Type};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_type(
                Type::create()
                    .as_enum(CheckoutStep::Enum)
                    .values([CheckoutStep::ContactDetails, CheckoutStep::OrderSummary])
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(CheckoutDraft::Table)
                    .if_not_exists()
                    .col(uuid(CheckoutDraft::Id).primary_key())
                    // Exactly one of user_id / guest_token identifies the owner
                    .col(uuid_null(CheckoutDraft::UserId))
                    .col(uuid_null(CheckoutDraft::GuestToken))
                    .col(
                        ColumnDef::new(CheckoutDraft::Step)
                            .custom(CheckoutStep::Enum)
                            .not_null(),
                    )
                    .col(string_len_null(CheckoutDraft::PickupName, 200))
                    .col(string_len_null(CheckoutDraft::PickupAddress, 300))
                    .col(double_null(CheckoutDraft::PickupLat))
                    .col(double_null(CheckoutDraft::PickupLng))
                    .col(string_len_null(CheckoutDraft::DropoffName, 200))
                    .col(string_len_null(CheckoutDraft::DropoffAddress, 300))
                    .col(double_null(CheckoutDraft::DropoffLat))
                    .col(double_null(CheckoutDraft::DropoffLng))
                    .col(string_len_null(CheckoutDraft::ZipCode, 10))
                    .col(string_len_null(CheckoutDraft::City, 100))
                    .col(string_len_null(CheckoutDraft::State, 50))
                    .col(string_len_null(CheckoutDraft::DeliveryDate, 30))
                    .col(string_len_null(CheckoutDraft::DeliveryTime, 30))
                    .col(string_len_null(CheckoutDraft::Distance, 30))
                    .col(string_len_null(CheckoutDraft::Duration, 30))
                    .col(string_len_null(CheckoutDraft::FirstName, 100))
                    .col(string_len_null(CheckoutDraft::LastName, 100))
                    .col(string_len_null(CheckoutDraft::Email, 255))
                    .col(string_len_null(CheckoutDraft::Phone, 30))
                    .col(string_len_null(CheckoutDraft::DateOfBirth, 30))
                    .col(uuid_null(CheckoutDraft::PharmacyId))
                    .col(
                        boolean(CheckoutDraft::IsPartnerPharmacy)
                            .not_null()
                            .default(false),
                    )
                    .col(
                        timestamp_with_time_zone(CheckoutDraft::UpdatedAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // One draft per owner; NULLs stay distinct so the unique indexes
        // only bite on the populated owner column
        manager
            .create_index(
                Index::create()
                    .name("idx_checkout_draft_user")
                    .table(CheckoutDraft::Table)
                    .col(CheckoutDraft::UserId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_checkout_draft_guest")
                    .table(CheckoutDraft::Table)
                    .col(CheckoutDraft::GuestToken)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(CheckoutDraft::Table).to_owned())
            .await?;

        manager
            .drop_type(Type::drop().name(CheckoutStep::Enum).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum CheckoutDraft {
    Table,
    Id,
    UserId,
    GuestToken,
    Step,
    PickupName,
    PickupAddress,
    PickupLat,
    PickupLng,
    DropoffName,
    DropoffAddress,
    DropoffLat,
    DropoffLng,
    ZipCode,
    City,
    State,
    DeliveryDate,
    DeliveryTime,
    Distance,
    Duration,
    FirstName,
    LastName,
    Email,
    Phone,
    DateOfBirth,
    PharmacyId,
    IsPartnerPharmacy,
    UpdatedAt,
}

#[derive(DeriveIden)]
pub enum CheckoutStep {
    #[sea_orm(iden = "checkout_step")]
    Enum,
    ContactDetails,
    OrderSummary,
}

use sea_orm_migration::{prelude::*, schema::*, sea_orm::sea_query::extension::postgres::Type};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_type(
                Type::create()
                    .as_enum(RequestKind::Enum)
                    .values([
                        RequestKind::Refill,
                        RequestKind::Transfer,
                        RequestKind::Schedule,
                    ])
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ServiceRequest::Table)
                    .if_not_exists()
                    .col(uuid(ServiceRequest::Id).primary_key())
                    .col(
                        ColumnDef::new(ServiceRequest::Kind)
                            .custom(RequestKind::Enum)
                            .not_null(),
                    )
                    .col(string_len(ServiceRequest::Name, 200).not_null())
                    .col(string_len(ServiceRequest::Email, 255).not_null())
                    .col(string_len(ServiceRequest::Phone, 30).not_null())
                    .col(string_len_null(ServiceRequest::PharmacyName, 200))
                    .col(string_len_null(ServiceRequest::Medication, 300))
                    .col(string_len_null(ServiceRequest::PreferredDate, 30))
                    .col(string_len_null(ServiceRequest::Notes, 1000))
                    .col(
                        timestamp_with_time_zone(ServiceRequest::CreatedAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ContactMessage::Table)
                    .if_not_exists()
                    .col(uuid(ContactMessage::Id).primary_key())
                    .col(string_len(ContactMessage::Name, 200).not_null())
                    .col(string_len(ContactMessage::Email, 255).not_null())
                    .col(string_len(ContactMessage::Subject, 300).not_null())
                    .col(string_len(ContactMessage::Message, 2000).not_null())
                    .col(
                        timestamp_with_time_zone(ContactMessage::CreatedAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(BusinessInquiry::Table)
                    .if_not_exists()
                    .col(uuid(BusinessInquiry::Id).primary_key())
                    .col(string_len(BusinessInquiry::BusinessName, 200).not_null())
                    .col(string_len(BusinessInquiry::ContactName, 200).not_null())
                    .col(string_len(BusinessInquiry::Email, 255).not_null())
                    .col(string_len(BusinessInquiry::Phone, 30).not_null())
                    .col(string_len_null(BusinessInquiry::Message, 2000))
                    .col(
                        timestamp_with_time_zone(BusinessInquiry::CreatedAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(BusinessInquiry::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(ContactMessage::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(ServiceRequest::Table).to_owned())
            .await?;

        manager
            .drop_type(Type::drop().name(RequestKind::Enum).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum ServiceRequest {
    Table,
    Id,
    Kind,
    Name,
    Email,
    Phone,
    PharmacyName,
    Medication,
    PreferredDate,
    Notes,
    CreatedAt,
}

#[derive(DeriveIden)]
pub enum RequestKind {
    #[sea_orm(iden = "request_kind")]
    Enum,
    Refill,
    Transfer,
    Schedule,
}

#[derive(DeriveIden)]
pub enum ContactMessage {
    Table,
    Id,
    Name,
    Email,
    Subject,
    Message,
    CreatedAt,
}

#[derive(DeriveIden)]
pub enum BusinessInquiry {
    Table,
    Id,
    BusinessName,
    ContactName,
    Email,
    Phone,
    Message,
    CreatedAt,
}

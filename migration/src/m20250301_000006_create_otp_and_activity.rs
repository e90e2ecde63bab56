use sea_orm_migration::{prelude::*, schema::*, sea_orm::sea_query::extension::postgres::Type};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_type(
                Type::create()
                    .as_enum(OtpPurpose::Enum)
                    .values([OtpPurpose::Login, OtpPurpose::PasswordChange])
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(OtpCode::Table)
                    .if_not_exists()
                    .col(uuid(OtpCode::Id).primary_key())
                    .col(uuid(OtpCode::UserId).not_null())
                    .col(string_len(OtpCode::Code, 4).not_null())
                    .col(
                        ColumnDef::new(OtpCode::Purpose)
                            .custom(OtpPurpose::Enum)
                            .not_null(),
                    )
                    .col(timestamp_with_time_zone(OtpCode::ExpiresAt).not_null())
                    .col(boolean(OtpCode::Consumed).not_null().default(false))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ActivityLog::Table)
                    .if_not_exists()
                    .col(pk_auto(ActivityLog::Id))
                    .col(uuid(ActivityLog::UserId).not_null())
                    .col(string_len(ActivityLog::Action, 200).not_null())
                    .col(
                        timestamp_with_time_zone(ActivityLog::CreatedAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_activity_log_user")
                    .table(ActivityLog::Table)
                    .col(ActivityLog::UserId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ActivityLog::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(OtpCode::Table).to_owned())
            .await?;

        manager
            .drop_type(Type::drop().name(OtpPurpose::Enum).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum OtpCode {
    Table,
    Id,
    UserId,
    Code,
    Purpose,
    ExpiresAt,
    Consumed,
}

#[derive(DeriveIden)]
pub enum OtpPurpose {
    #[sea_orm(iden = "otp_purpose")]
    Enum,
    Login,
    PasswordChange,
}

#[derive(DeriveIden)]
pub enum ActivityLog {
    Table,
    Id,
    UserId,
    Action,
    CreatedAt,
}

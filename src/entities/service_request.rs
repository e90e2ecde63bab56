use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "request_kind")]
#[serde(rename_all = "lowercase")]
pub enum RequestKind {
    #[sea_orm(string_value = "refill")]
    Refill,
    #[sea_orm(string_value = "transfer")]
    Transfer,
    #[sea_orm(string_value = "schedule")]
    Schedule,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "service_request")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub kind: RequestKind,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub pharmacy_name: Option<String>,
    pub medication: Option<String>,
    pub preferred_date: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "checkout_step")]
pub enum CheckoutStep {
    #[sea_orm(string_value = "contact_details")]
    ContactDetails,
    #[sea_orm(string_value = "order_summary")]
    OrderSummary,
}

/// Incrementally staged order data. Exactly one of `user_id` / `guest_token`
/// is set; the other owner kind must never see the row.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "checkout_draft")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Option<Uuid>,
    pub guest_token: Option<Uuid>,
    pub step: CheckoutStep,
    pub pickup_name: Option<String>,
    pub pickup_address: Option<String>,
    pub pickup_lat: Option<f64>,
    pub pickup_lng: Option<f64>,
    pub dropoff_name: Option<String>,
    pub dropoff_address: Option<String>,
    pub dropoff_lat: Option<f64>,
    pub dropoff_lng: Option<f64>,
    pub zip_code: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub delivery_date: Option<String>,
    pub delivery_time: Option<String>,
    pub distance: Option<String>,
    pub duration: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub date_of_birth: Option<String>,
    pub pharmacy_id: Option<Uuid>,
    pub is_partner_pharmacy: bool,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

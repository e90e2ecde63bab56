use axum::{
    extract::{Path, State},
    Json,
};
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::order::{self, OrderStatus};
use crate::entities::user::{self, UserRole};
use crate::entities::{coverage_notification, coverage_zip, pharmacy};
use crate::error::{AppError, AppResult};
use crate::utils::validate::require_non_empty;
use crate::AppState;

// ============ Pharmacy Management ============

#[derive(Debug, Deserialize)]
pub struct CreatePharmacyRequest {
    pub name: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub lat: f64,
    pub lng: f64,
    pub phone: Option<String>,
    pub hours: Option<String>,
    #[serde(default)]
    pub is_partner: bool,
}

#[derive(Debug, Deserialize)]
pub struct UpdatePharmacyRequest {
    pub name: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub phone: Option<String>,
    pub hours: Option<String>,
    pub is_partner: Option<bool>,
}

/// Create a pharmacy (admin)
pub async fn create_pharmacy(
    State(state): State<AppState>,
    Json(payload): Json<CreatePharmacyRequest>,
) -> AppResult<Json<pharmacy::Model>> {
    require_non_empty("name", &payload.name)?;
    require_non_empty("address", &payload.address)?;
    require_non_empty("zip", &payload.zip)?;

    let pharmacy = pharmacy::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(payload.name),
        address: Set(payload.address),
        city: Set(payload.city),
        state: Set(payload.state),
        zip: Set(payload.zip),
        lat: Set(payload.lat),
        lng: Set(payload.lng),
        phone: Set(payload.phone),
        hours: Set(payload.hours),
        is_partner: Set(payload.is_partner),
    };

    let result = pharmacy.insert(state.db.as_ref()).await?;
    Ok(Json(result))
}

/// Update a pharmacy (admin)
pub async fn update_pharmacy(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdatePharmacyRequest>,
) -> AppResult<Json<pharmacy::Model>> {
    let pharmacy = pharmacy::Entity::find_by_id(id)
        .one(state.db.as_ref())
        .await?
        .ok_or_else(|| AppError::NotFound("Pharmacy not found".to_string()))?;

    let mut active: pharmacy::ActiveModel = pharmacy.into();

    if let Some(name) = payload.name {
        require_non_empty("name", &name)?;
        active.name = Set(name);
    }
    if let Some(address) = payload.address {
        active.address = Set(address);
    }
    if let Some(city) = payload.city {
        active.city = Set(city);
    }
    if let Some(st) = payload.state {
        active.state = Set(st);
    }
    if let Some(zip) = payload.zip {
        active.zip = Set(zip);
    }
    if let Some(lat) = payload.lat {
        active.lat = Set(lat);
    }
    if let Some(lng) = payload.lng {
        active.lng = Set(lng);
    }
    if let Some(phone) = payload.phone {
        active.phone = Set(Some(phone));
    }
    if let Some(hours) = payload.hours {
        active.hours = Set(Some(hours));
    }
    if let Some(is_partner) = payload.is_partner {
        active.is_partner = Set(is_partner);
    }

    let result = active.update(state.db.as_ref()).await?;
    Ok(Json(result))
}

/// Delete a pharmacy (admin)
pub async fn delete_pharmacy(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<serde_json::Value>> {
    let result = pharmacy::Entity::delete_by_id(id).exec(state.db.as_ref()).await?;

    if result.rows_affected == 0 {
        return Err(AppError::NotFound("Pharmacy not found".to_string()));
    }

    Ok(Json(serde_json::json!({ "message": "Pharmacy deleted" })))
}

// ============ Coverage Management ============

#[derive(Debug, Deserialize)]
pub struct AddZipRequest {
    pub zip: String,
}

/// Add a ZIP code to the coverage allow-list (admin)
pub async fn add_coverage_zip(
    State(state): State<AppState>,
    Json(payload): Json<AddZipRequest>,
) -> AppResult<Json<coverage_zip::Model>> {
    require_non_empty("zip", &payload.zip)?;

    let existing = coverage_zip::Entity::find()
        .filter(coverage_zip::Column::Zip.eq(&payload.zip))
        .one(state.db.as_ref())
        .await?;

    if existing.is_some() {
        return Err(AppError::Conflict("ZIP code already covered".to_string()));
    }

    let zip = coverage_zip::ActiveModel {
        zip: Set(payload.zip),
        ..Default::default()
    };

    let result = zip.insert(state.db.as_ref()).await?;
    Ok(Json(result))
}

/// Remove a ZIP code from the coverage allow-list (admin)
pub async fn remove_coverage_zip(
    State(state): State<AppState>,
    Path(zip): Path<String>,
) -> AppResult<Json<serde_json::Value>> {
    let result = coverage_zip::Entity::delete_many()
        .filter(coverage_zip::Column::Zip.eq(&zip))
        .exec(state.db.as_ref())
        .await?;

    if result.rows_affected == 0 {
        return Err(AppError::NotFound("ZIP code not covered".to_string()));
    }

    Ok(Json(serde_json::json!({ "message": "ZIP code removed" })))
}

/// List pending notify-me subscriptions, newest first (admin)
pub async fn list_coverage_notifications(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<coverage_notification::Model>>> {
    let subscriptions = coverage_notification::Entity::find()
        .order_by_desc(coverage_notification::Column::CreatedAt)
        .all(state.db.as_ref())
        .await?;

    Ok(Json(subscriptions))
}

// ============ Order Management ============

#[derive(Debug, Serialize)]
pub struct OrderSummaryInfo {
    pub id: Uuid,
    pub customer_name: String,
    pub email: String,
    pub pickup_address: String,
    pub dropoff_address: String,
    pub delivery_date: chrono::NaiveDate,
    pub delivery_time: String,
    pub amount: f64,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
}

impl From<order::Model> for OrderSummaryInfo {
    fn from(o: order::Model) -> Self {
        OrderSummaryInfo {
            id: o.id,
            customer_name: format!("{} {}", o.first_name, o.last_name),
            email: o.email,
            pickup_address: o.pickup_address,
            dropoff_address: o.dropoff_address,
            delivery_date: o.delivery_date,
            delivery_time: o.delivery_time,
            amount: o.amount,
            status: o.status,
            created_at: o.created_at.with_timezone(&Utc),
        }
    }
}

/// List all orders, newest first (admin)
pub async fn list_orders(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<OrderSummaryInfo>>> {
    let orders = order::Entity::find()
        .order_by_desc(order::Column::CreatedAt)
        .all(state.db.as_ref())
        .await?;

    Ok(Json(orders.into_iter().map(OrderSummaryInfo::from).collect()))
}

#[derive(Debug, Deserialize)]
pub struct UpdateOrderStatusRequest {
    pub status: OrderStatus,
}

/// Update an order's status (admin)
pub async fn update_order_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateOrderStatusRequest>,
) -> AppResult<Json<OrderSummaryInfo>> {
    let order = order::Entity::find_by_id(id)
        .one(state.db.as_ref())
        .await?
        .ok_or_else(|| AppError::NotFound("Order not found".to_string()))?;

    let mut active: order::ActiveModel = order.into();
    active.status = Set(payload.status);
    let updated = active.update(state.db.as_ref()).await?;

    Ok(Json(OrderSummaryInfo::from(updated)))
}

// ============ User Management ============

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: UserRole,
    pub two_factor_enabled: bool,
    pub created_at: DateTime<Utc>,
}

/// List all users (admin)
pub async fn list_all_users(State(state): State<AppState>) -> AppResult<Json<Vec<UserResponse>>> {
    let users = user::Entity::find().all(state.db.as_ref()).await?;

    let responses: Vec<UserResponse> = users
        .into_iter()
        .map(|u| UserResponse {
            id: u.id,
            email: u.email,
            first_name: u.first_name,
            last_name: u.last_name,
            role: u.role,
            two_factor_enabled: u.two_factor_enabled,
            created_at: u.created_at.with_timezone(&Utc),
        })
        .collect();

    Ok(Json(responses))
}

/// Delete a user account (admin)
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<serde_json::Value>> {
    let user = user::Entity::find_by_id(id)
        .one(state.db.as_ref())
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    if user.role == UserRole::Admin {
        return Err(AppError::Forbidden(
            "Admin accounts cannot be deleted".to_string(),
        ));
    }

    // Orders are kept for bookkeeping; the foreign key is nullable
    user::Entity::delete_by_id(id).exec(state.db.as_ref()).await?;

    Ok(Json(serde_json::json!({ "message": "User deleted" })))
}

use axum::{
    extract::{Path, State},
    Json,
};
use sea_orm::{ActiveModelTrait, Set};
use serde::Deserialize;
use uuid::Uuid;

use crate::entities::business_inquiry;
use crate::entities::contact_message;
use crate::entities::service_request::{self, RequestKind};
use crate::error::AppResult;
use crate::utils::validate::{require_email, require_non_empty};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct ServiceRequestPayload {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub pharmacy_name: Option<String>,
    pub medication: Option<String>,
    pub preferred_date: Option<String>,
    pub notes: Option<String>,
}

/// Submit a refill, transfer or scheduling request. The kind comes from
/// the path so all three forms share one handler.
pub async fn submit_service_request(
    State(state): State<AppState>,
    Path(kind): Path<RequestKind>,
    Json(payload): Json<ServiceRequestPayload>,
) -> AppResult<Json<service_request::Model>> {
    require_non_empty("name", &payload.name)?;
    require_email("email", &payload.email)?;
    require_non_empty("phone", &payload.phone)?;

    let request = service_request::ActiveModel {
        id: Set(Uuid::new_v4()),
        kind: Set(kind.clone()),
        name: Set(payload.name),
        email: Set(payload.email),
        phone: Set(payload.phone),
        pharmacy_name: Set(payload.pharmacy_name),
        medication: Set(payload.medication),
        preferred_date: Set(payload.preferred_date),
        notes: Set(payload.notes),
        ..Default::default()
    };

    let saved = request.insert(state.db.as_ref()).await?;
    tracing::info!(kind = ?kind, id = %saved.id, "Service request received");

    Ok(Json(saved))
}

#[derive(Debug, Deserialize)]
pub struct ContactPayload {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

/// Submit a general contact message
pub async fn submit_contact_message(
    State(state): State<AppState>,
    Json(payload): Json<ContactPayload>,
) -> AppResult<Json<serde_json::Value>> {
    require_non_empty("name", &payload.name)?;
    require_email("email", &payload.email)?;
    require_non_empty("subject", &payload.subject)?;
    require_non_empty("message", &payload.message)?;

    let message = contact_message::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(payload.name),
        email: Set(payload.email),
        subject: Set(payload.subject),
        message: Set(payload.message),
        ..Default::default()
    };
    message.insert(state.db.as_ref()).await?;

    Ok(Json(serde_json::json!({
        "message": "Thanks for reaching out, we will get back to you shortly"
    })))
}

#[derive(Debug, Deserialize)]
pub struct BusinessInquiryPayload {
    pub business_name: String,
    pub contact_name: String,
    pub email: String,
    pub phone: String,
    pub message: Option<String>,
}

/// Submit a partnership inquiry from a pharmacy or clinic
pub async fn submit_business_inquiry(
    State(state): State<AppState>,
    Json(payload): Json<BusinessInquiryPayload>,
) -> AppResult<Json<serde_json::Value>> {
    require_non_empty("business_name", &payload.business_name)?;
    require_non_empty("contact_name", &payload.contact_name)?;
    require_email("email", &payload.email)?;
    require_non_empty("phone", &payload.phone)?;

    let inquiry = business_inquiry::ActiveModel {
        id: Set(Uuid::new_v4()),
        business_name: Set(payload.business_name),
        contact_name: Set(payload.contact_name),
        email: Set(payload.email),
        phone: Set(payload.phone),
        message: Set(payload.message),
        ..Default::default()
    };
    inquiry.insert(state.db.as_ref()).await?;

    Ok(Json(serde_json::json!({
        "message": "Inquiry received, our partnerships team will be in touch"
    })))
}

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use axum::{extract::Query, extract::State, Extension, Json};
use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::activity_log;
use crate::entities::otp_code::OtpPurpose;
use crate::entities::user::{self, UserRole};
use crate::error::{AppError, AppResult};
use crate::handlers::auth::{consume_otp, issue_otp};
use crate::handlers::log_activity;
use crate::utils::jwt::Claims;
use crate::utils::validate::{require_new_password, require_non_empty, require_otp_format};
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<String>,
    pub avatar_url: Option<String>,
    pub two_factor_enabled: bool,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
}

impl From<user::Model> for ProfileResponse {
    fn from(u: user::Model) -> Self {
        ProfileResponse {
            id: u.id,
            email: u.email,
            first_name: u.first_name,
            last_name: u.last_name,
            phone: u.phone,
            date_of_birth: u.date_of_birth,
            gender: u.gender,
            avatar_url: u.avatar_url,
            two_factor_enabled: u.two_factor_enabled,
            role: u.role,
            created_at: u.created_at.with_timezone(&Utc),
        }
    }
}

async fn find_user(state: &AppState, id: Uuid) -> AppResult<user::Model> {
    user::Entity::find_by_id(id)
        .one(state.db.as_ref())
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))
}

/// Get the logged-in user's profile
pub async fn get_profile(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> AppResult<Json<ProfileResponse>> {
    let user = find_user(&state, claims.sub).await?;
    Ok(Json(ProfileResponse::from(user)))
}

#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<String>,
    pub avatar_url: Option<String>,
}

/// Update the editable profile fields wholesale (the form submits the
/// full record)
pub async fn update_profile(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<UpdateProfileRequest>,
) -> AppResult<Json<ProfileResponse>> {
    require_non_empty("first_name", &payload.first_name)?;
    require_non_empty("last_name", &payload.last_name)?;

    let user = find_user(&state, claims.sub).await?;

    let mut active: user::ActiveModel = user.into();
    active.first_name = Set(payload.first_name);
    active.last_name = Set(payload.last_name);
    active.phone = Set(payload.phone);
    active.date_of_birth = Set(payload.date_of_birth);
    active.gender = Set(payload.gender);
    active.avatar_url = Set(payload.avatar_url);

    let updated = active.update(state.db.as_ref()).await?;
    log_activity(state.db.as_ref(), claims.sub, "profile_updated").await?;

    Ok(Json(ProfileResponse::from(updated)))
}

#[derive(Debug, Deserialize)]
pub struct TwoFactorRequest {
    pub enabled: bool,
}

/// Enable or disable two-factor authentication
pub async fn set_two_factor(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<TwoFactorRequest>,
) -> AppResult<Json<ProfileResponse>> {
    let user = find_user(&state, claims.sub).await?;

    let mut active: user::ActiveModel = user.into();
    active.two_factor_enabled = Set(payload.enabled);
    let updated = active.update(state.db.as_ref()).await?;

    let action = if payload.enabled {
        "two_factor_enabled"
    } else {
        "two_factor_disabled"
    };
    log_activity(state.db.as_ref(), claims.sub, action).await?;

    Ok(Json(ProfileResponse::from(updated)))
}

/// Request a password-change OTP (only meaningful with 2FA enabled)
pub async fn request_password_otp(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> AppResult<Json<serde_json::Value>> {
    let user = find_user(&state, claims.sub).await?;

    if !user.two_factor_enabled {
        return Err(AppError::BadRequest(
            "Two-factor authentication is not enabled".to_string(),
        ));
    }

    issue_otp(state.db.as_ref(), user.id, OtpPurpose::PasswordChange).await?;

    Ok(Json(serde_json::json!({ "message": "Verification code sent" })))
}

#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    /// Required when 2FA is enabled
    pub otp: Option<String>,
    /// Required when 2FA is disabled
    pub current_password: Option<String>,
    pub new_password: String,
    pub confirm_password: String,
}

/// Change password. With 2FA the request carries an OTP; without it the
/// current password must be supplied.
pub async fn change_password(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<ChangePasswordRequest>,
) -> AppResult<Json<serde_json::Value>> {
    let user = find_user(&state, claims.sub).await?;

    if user.two_factor_enabled {
        let otp = payload
            .otp
            .as_deref()
            .ok_or_else(|| AppError::validation("otp", "Verification code is required"))?;
        // Reject malformed codes before touching the OTP table
        require_otp_format(otp)?;
        consume_otp(state.db.as_ref(), user.id, OtpPurpose::PasswordChange, otp).await?;
    } else {
        let current = payload
            .current_password
            .as_deref()
            .ok_or_else(|| {
                AppError::validation("current_password", "Current password is required")
            })?;
        require_non_empty("current_password", current)?;

        let parsed_hash = PasswordHash::new(&user.password_hash)
            .map_err(|e| AppError::Internal(format!("Failed to parse password hash: {}", e)))?;
        Argon2::default()
            .verify_password(current.as_bytes(), &parsed_hash)
            .map_err(|_| AppError::Unauthorized("Current password is incorrect".to_string()))?;
    }

    require_new_password(&payload.new_password, &payload.confirm_password)?;

    let salt = SaltString::generate(&mut OsRng);
    let password_hash = Argon2::default()
        .hash_password(payload.new_password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))?
        .to_string();

    let mut active: user::ActiveModel = user.into();
    active.password_hash = Set(password_hash);
    active.update(state.db.as_ref()).await?;

    log_activity(state.db.as_ref(), claims.sub, "password_changed").await?;

    Ok(Json(serde_json::json!({ "message": "Password updated" })))
}

#[derive(Debug, Deserialize)]
pub struct ActivityQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

#[derive(Debug, Serialize)]
pub struct ActivityEntry {
    pub id: i32,
    pub action: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ActivityPage {
    pub items: Vec<ActivityEntry>,
    pub page: u64,
    pub limit: u64,
    pub total: u64,
    pub has_more: bool,
}

/// Paginated activity log, newest first. Clients append pages locally
/// with a "load more" cursor.
pub async fn activity_log(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Query(query): Query<ActivityQuery>,
) -> AppResult<Json<ActivityPage>> {
    let page = query.page.unwrap_or(1).max(1);
    let limit = query.limit.unwrap_or(10).clamp(1, 100);

    let paginator = activity_log::Entity::find()
        .filter(activity_log::Column::UserId.eq(claims.sub))
        .order_by_desc(activity_log::Column::CreatedAt)
        .paginate(state.db.as_ref(), limit);

    let total = paginator.num_items().await?;
    let items = paginator
        .fetch_page(page - 1)
        .await?
        .into_iter()
        .map(|a| ActivityEntry {
            id: a.id,
            action: a.action,
            created_at: a.created_at.with_timezone(&Utc),
        })
        .collect();

    Ok(Json(ActivityPage {
        items,
        page,
        limit,
        total,
        has_more: page * limit < total,
    }))
}

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use axum::{extract::State, Json};
use chrono::{Duration, Utc};
use rand::Rng;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::otp_code::{self, OtpPurpose};
use crate::entities::user::{self, UserRole};
use crate::error::{AppError, AppResult};
use crate::handlers::log_activity;
use crate::utils::jwt::create_token;
use crate::utils::validate::{require_email, require_non_empty, require_otp_format};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginOtpRequest {
    pub email: String,
    pub code: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<UserInfo>,
    pub otp_required: bool,
}

#[derive(Debug, Serialize)]
pub struct UserInfo {
    pub id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: UserRole,
}

impl From<&user::Model> for UserInfo {
    fn from(u: &user::Model) -> Self {
        UserInfo {
            id: u.id,
            email: u.email.clone(),
            first_name: u.first_name.clone(),
            last_name: u.last_name.clone(),
            role: u.role.clone(),
        }
    }
}

/// Mint a single-use 4-digit code for the user. Delivery (SMS/email) is
/// out of process; the code is traced at debug level for development.
pub(crate) async fn issue_otp(
    db: &DatabaseConnection,
    user_id: Uuid,
    purpose: OtpPurpose,
) -> AppResult<()> {
    let code = format!("{:04}", rand::thread_rng().gen_range(0..10000));

    let otp = otp_code::ActiveModel {
        id: Set(Uuid::new_v4()),
        user_id: Set(user_id),
        code: Set(code.clone()),
        purpose: Set(purpose),
        expires_at: Set((Utc::now() + Duration::minutes(10)).into()),
        consumed: Set(false),
    };
    otp.insert(db).await?;

    tracing::debug!(%user_id, %code, "OTP issued");
    Ok(())
}

/// Verify and consume a pending OTP for the user
pub(crate) async fn consume_otp(
    db: &DatabaseConnection,
    user_id: Uuid,
    purpose: OtpPurpose,
    code: &str,
) -> AppResult<()> {
    let otp = otp_code::Entity::find()
        .filter(otp_code::Column::UserId.eq(user_id))
        .filter(otp_code::Column::Purpose.eq(purpose))
        .filter(otp_code::Column::Code.eq(code))
        .filter(otp_code::Column::Consumed.eq(false))
        .one(db)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Invalid or expired code".to_string()))?;

    if otp.expires_at.with_timezone(&Utc) < Utc::now() {
        return Err(AppError::Unauthorized("Invalid or expired code".to_string()));
    }

    let mut active: otp_code::ActiveModel = otp.into();
    active.consumed = Set(true);
    active.update(db).await?;

    Ok(())
}

/// Register a new customer account
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> AppResult<Json<AuthResponse>> {
    require_email("email", &payload.email)?;
    require_non_empty("first_name", &payload.first_name)?;
    require_non_empty("last_name", &payload.last_name)?;
    if payload.password.len() < 6 {
        return Err(AppError::validation(
            "password",
            "Password must be at least 6 characters",
        ));
    }

    // Check if email already exists
    let existing = user::Entity::find()
        .filter(user::Column::Email.eq(&payload.email))
        .one(state.db.as_ref())
        .await?;

    if existing.is_some() {
        return Err(AppError::Conflict("Email already registered".to_string()));
    }

    // Hash password
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let password_hash = argon2
        .hash_password(payload.password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))?
        .to_string();

    let new_user = user::ActiveModel {
        id: Set(Uuid::new_v4()),
        email: Set(payload.email.clone()),
        password_hash: Set(password_hash),
        first_name: Set(payload.first_name.clone()),
        last_name: Set(payload.last_name.clone()),
        phone: Set(payload.phone.clone()),
        two_factor_enabled: Set(false),
        role: Set(UserRole::Customer),
        ..Default::default()
    };

    let user = new_user.insert(state.db.as_ref()).await?;
    log_activity(state.db.as_ref(), user.id, "account_created").await?;

    let token = create_token(
        user.id,
        &user.email,
        user.role.clone(),
        &state.config.jwt_secret,
        state.config.jwt_expiration_hours,
    )?;

    Ok(Json(AuthResponse {
        token: Some(token),
        user: Some(UserInfo::from(&user)),
        otp_required: false,
    }))
}

/// Login with email and password. Accounts with 2FA enabled get an OTP
/// challenge instead of a token.
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    let user = user::Entity::find()
        .filter(user::Column::Email.eq(&payload.email))
        .one(state.db.as_ref())
        .await?
        .ok_or_else(|| AppError::Unauthorized("Invalid email or password".to_string()))?;

    let parsed_hash = PasswordHash::new(&user.password_hash)
        .map_err(|e| AppError::Internal(format!("Failed to parse password hash: {}", e)))?;

    Argon2::default()
        .verify_password(payload.password.as_bytes(), &parsed_hash)
        .map_err(|_| AppError::Unauthorized("Invalid email or password".to_string()))?;

    if user.two_factor_enabled {
        issue_otp(state.db.as_ref(), user.id, OtpPurpose::Login).await?;
        return Ok(Json(AuthResponse {
            token: None,
            user: None,
            otp_required: true,
        }));
    }

    log_activity(state.db.as_ref(), user.id, "login").await?;

    let token = create_token(
        user.id,
        &user.email,
        user.role.clone(),
        &state.config.jwt_secret,
        state.config.jwt_expiration_hours,
    )?;

    Ok(Json(AuthResponse {
        token: Some(token),
        user: Some(UserInfo::from(&user)),
        otp_required: false,
    }))
}

/// Complete a 2FA login by exchanging the emailed code for a token
pub async fn verify_login_otp(
    State(state): State<AppState>,
    Json(payload): Json<LoginOtpRequest>,
) -> AppResult<Json<AuthResponse>> {
    // Format check happens before any lookup
    require_otp_format(&payload.code)?;

    let user = user::Entity::find()
        .filter(user::Column::Email.eq(&payload.email))
        .one(state.db.as_ref())
        .await?
        .ok_or_else(|| AppError::Unauthorized("Invalid or expired code".to_string()))?;

    consume_otp(state.db.as_ref(), user.id, OtpPurpose::Login, &payload.code).await?;
    log_activity(state.db.as_ref(), user.id, "login").await?;

    let token = create_token(
        user.id,
        &user.email,
        user.role.clone(),
        &state.config.jwt_secret,
        state.config.jwt_expiration_hours,
    )?;

    Ok(Json(AuthResponse {
        token: Some(token),
        user: Some(UserInfo::from(&user)),
        otp_required: false,
    }))
}

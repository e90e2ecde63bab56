use axum::{
    extract::{Query, State},
    Extension, Json,
};
use chrono::NaiveDate;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::checkout_draft::{self, CheckoutStep};
use crate::entities::order::{self, OrderStatus};
use crate::error::{AppError, AppResult};
use crate::handlers::coverage::zip_is_covered;
use crate::handlers::log_activity;
use crate::middleware::auth::MaybeUser;
use crate::services::maps::format_coords;
use crate::utils::distance::parse_distance;
use crate::utils::pricing::{self, round_cents, to_24h, FeeQuote, SERVICE_FEE};
use crate::utils::validate::{require_email, require_non_empty};
use crate::AppState;

/// A draft belongs to exactly one owner. Authenticated requests always
/// resolve to the user and any supplied guest token is ignored, so one
/// session's data can never leak into the other.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DraftOwner {
    User(Uuid),
    Guest(Uuid),
}

impl DraftOwner {
    pub fn resolve(user: &MaybeUser, guest_token: Option<Uuid>) -> AppResult<Self> {
        if let Some(claims) = &user.0 {
            return Ok(DraftOwner::User(claims.sub));
        }
        guest_token.map(DraftOwner::Guest).ok_or_else(|| {
            AppError::BadRequest("guest_token is required for guest checkout".to_string())
        })
    }

    fn user_id(&self) -> Option<Uuid> {
        match self {
            DraftOwner::User(id) => Some(*id),
            DraftOwner::Guest(_) => None,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct OwnerQuery {
    pub guest_token: Option<Uuid>,
}

async fn find_draft(
    state: &AppState,
    owner: DraftOwner,
) -> AppResult<Option<checkout_draft::Model>> {
    let query = match owner {
        DraftOwner::User(id) => {
            checkout_draft::Entity::find().filter(checkout_draft::Column::UserId.eq(id))
        }
        DraftOwner::Guest(token) => {
            checkout_draft::Entity::find().filter(checkout_draft::Column::GuestToken.eq(token))
        }
    };
    Ok(query.one(state.db.as_ref()).await?)
}

async fn require_draft(state: &AppState, owner: DraftOwner) -> AppResult<checkout_draft::Model> {
    find_draft(state, owner)
        .await?
        .ok_or_else(|| AppError::NotFound("No checkout draft".to_string()))
}

/// `"Name, Address"` when a place name is present, plain address otherwise
fn format_address(name: Option<&str>, address: &str) -> String {
    match name {
        Some(name) if !name.trim().is_empty() => format!("{}, {}", name, address),
        _ => address.to_string(),
    }
}

/// Accepts `YYYY-MM-DD` as well as a full ISO datetime, using the date part
fn parse_delivery_date(text: &str) -> Option<NaiveDate> {
    let date_part = text.get(..10)?;
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}

fn staged<T>(field: &str, value: Option<T>) -> AppResult<T> {
    value.ok_or_else(|| AppError::validation(field, "This field is required"))
}

/// Fetch the current checkout draft
pub async fn get_draft(
    State(state): State<AppState>,
    Extension(user): Extension<MaybeUser>,
    Query(query): Query<OwnerQuery>,
) -> AppResult<Json<checkout_draft::Model>> {
    let owner = DraftOwner::resolve(&user, query.guest_token)?;
    let draft = require_draft(&state, owner).await?;
    Ok(Json(draft))
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateDraftRequest {
    pub pickup_name: Option<String>,
    pub pickup_address: Option<String>,
    pub pickup_lat: Option<f64>,
    pub pickup_lng: Option<f64>,
    pub dropoff_name: Option<String>,
    pub dropoff_address: Option<String>,
    pub dropoff_lat: Option<f64>,
    pub dropoff_lng: Option<f64>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub delivery_date: Option<String>,
    pub delivery_time: Option<String>,
    pub distance: Option<String>,
    pub duration: Option<String>,
    pub pharmacy_id: Option<Uuid>,
    pub is_partner_pharmacy: Option<bool>,
}

#[derive(Debug, Serialize)]
pub struct DraftUpdateResponse {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zipcode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub draft: Option<checkout_draft::Model>,
}

/// Merge incrementally staged fields into the draft, creating it on first
/// touch. A dropoff location is coverage-validated first; an out-of-coverage
/// attempt is reported and the whole update is discarded, leaving the draft
/// as it was.
pub async fn update_draft(
    State(state): State<AppState>,
    Extension(user): Extension<MaybeUser>,
    Query(query): Query<OwnerQuery>,
    Json(payload): Json<UpdateDraftRequest>,
) -> AppResult<Json<DraftUpdateResponse>> {
    let owner = DraftOwner::resolve(&user, query.guest_token)?;

    // Validate coverage before anything is persisted. A failed reverse
    // geocode degrades to a not-validated response with raw coordinates
    // rather than failing the request.
    let mut resolved_zip: Option<String> = None;
    if let (Some(lat), Some(lng)) = (payload.dropoff_lat, payload.dropoff_lng) {
        let geocoded = match state.maps.reverse_geocode(lat, lng).await {
            Ok(g) => g,
            Err(err) => {
                tracing::warn!(error = %err, "Reverse geocoding failed, dropoff not validated");
                return Ok(Json(DraftUpdateResponse {
                    valid: false,
                    zipcode: None,
                    address: Some(format_coords(lat, lng)),
                    draft: None,
                }));
            }
        };

        let Some(zip) = geocoded.zip else {
            return Ok(Json(DraftUpdateResponse {
                valid: false,
                zipcode: None,
                address: Some(geocoded.formatted_address),
                draft: None,
            }));
        };

        if !zip_is_covered(&state, &zip).await? {
            return Ok(Json(DraftUpdateResponse {
                valid: false,
                zipcode: Some(zip),
                address: Some(geocoded.formatted_address),
                draft: None,
            }));
        }

        resolved_zip = Some(zip);
    }

    let existing = find_draft(&state, owner).await?;
    let is_new = existing.is_none();
    let mut active: checkout_draft::ActiveModel = match existing {
        Some(draft) => draft.into(),
        None => checkout_draft::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(owner.user_id()),
            guest_token: Set(match owner {
                DraftOwner::Guest(token) => Some(token),
                DraftOwner::User(_) => None,
            }),
            step: Set(CheckoutStep::ContactDetails),
            is_partner_pharmacy: Set(false),
            ..Default::default()
        },
    };

    if let Some(v) = payload.pickup_name {
        active.pickup_name = Set(Some(v));
    }
    if let Some(v) = payload.pickup_address {
        active.pickup_address = Set(Some(v));
    }
    if let Some(v) = payload.pickup_lat {
        active.pickup_lat = Set(Some(v));
    }
    if let Some(v) = payload.pickup_lng {
        active.pickup_lng = Set(Some(v));
    }
    if let Some(v) = payload.dropoff_name {
        active.dropoff_name = Set(Some(v));
    }
    if let Some(v) = payload.dropoff_address {
        active.dropoff_address = Set(Some(v));
    }
    if let Some(v) = payload.dropoff_lat {
        active.dropoff_lat = Set(Some(v));
    }
    if let Some(v) = payload.dropoff_lng {
        active.dropoff_lng = Set(Some(v));
    }
    if let Some(v) = resolved_zip {
        active.zip_code = Set(Some(v));
    }
    if let Some(v) = payload.city {
        active.city = Set(Some(v));
    }
    if let Some(v) = payload.state {
        active.state = Set(Some(v));
    }
    if let Some(v) = payload.delivery_date {
        active.delivery_date = Set(Some(v));
    }
    if let Some(v) = payload.delivery_time {
        active.delivery_time = Set(Some(v));
    }
    if let Some(v) = payload.distance {
        active.distance = Set(Some(v));
    }
    if let Some(v) = payload.duration {
        active.duration = Set(Some(v));
    }
    if let Some(v) = payload.pharmacy_id {
        active.pharmacy_id = Set(Some(v));
    }
    if let Some(v) = payload.is_partner_pharmacy {
        active.is_partner_pharmacy = Set(v);
    }
    active.updated_at = Set(chrono::Utc::now().into());

    let draft = if is_new {
        active.insert(state.db.as_ref()).await?
    } else {
        active.update(state.db.as_ref()).await?
    };

    Ok(Json(DraftUpdateResponse {
        valid: true,
        zipcode: None,
        address: None,
        draft: Some(draft),
    }))
}

/// Discard the draft. Clients call this on logout, on auth-state changes
/// and when a guest abandons checkout.
pub async fn clear_draft(
    State(state): State<AppState>,
    Extension(user): Extension<MaybeUser>,
    Query(query): Query<OwnerQuery>,
) -> AppResult<Json<serde_json::Value>> {
    let owner = DraftOwner::resolve(&user, query.guest_token)?;

    let delete = match owner {
        DraftOwner::User(id) => checkout_draft::Entity::delete_many()
            .filter(checkout_draft::Column::UserId.eq(id)),
        DraftOwner::Guest(token) => checkout_draft::Entity::delete_many()
            .filter(checkout_draft::Column::GuestToken.eq(token)),
    };
    delete.exec(state.db.as_ref()).await?;

    Ok(Json(serde_json::json!({ "message": "Checkout draft cleared" })))
}

#[derive(Debug, Deserialize)]
pub struct ContactDetailsRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub date_of_birth: String,
}

/// Stage contact details and advance to the order summary step. Every
/// field must pass format validation or the step does not advance.
pub async fn submit_contact(
    State(state): State<AppState>,
    Extension(user): Extension<MaybeUser>,
    Query(query): Query<OwnerQuery>,
    Json(payload): Json<ContactDetailsRequest>,
) -> AppResult<Json<checkout_draft::Model>> {
    require_non_empty("first_name", &payload.first_name)?;
    require_non_empty("last_name", &payload.last_name)?;
    require_email("email", &payload.email)?;
    require_non_empty("phone", &payload.phone)?;
    require_non_empty("date_of_birth", &payload.date_of_birth)?;

    let owner = DraftOwner::resolve(&user, query.guest_token)?;
    let draft = require_draft(&state, owner).await?;

    let mut active: checkout_draft::ActiveModel = draft.into();
    active.first_name = Set(Some(payload.first_name));
    active.last_name = Set(Some(payload.last_name));
    active.email = Set(Some(payload.email));
    active.phone = Set(Some(payload.phone));
    active.date_of_birth = Set(Some(payload.date_of_birth));
    active.step = Set(CheckoutStep::OrderSummary);
    active.updated_at = Set(chrono::Utc::now().into());

    let updated = active.update(state.db.as_ref()).await?;
    Ok(Json(updated))
}

/// Return to the contact step; previously entered values are retained
pub async fn back_to_contact(
    State(state): State<AppState>,
    Extension(user): Extension<MaybeUser>,
    Query(query): Query<OwnerQuery>,
) -> AppResult<Json<checkout_draft::Model>> {
    let owner = DraftOwner::resolve(&user, query.guest_token)?;
    let draft = require_draft(&state, owner).await?;

    let mut active: checkout_draft::ActiveModel = draft.into();
    active.step = Set(CheckoutStep::ContactDetails);
    let updated = active.update(state.db.as_ref()).await?;

    Ok(Json(updated))
}

#[derive(Debug, Deserialize)]
pub struct QuoteRequest {
    pub distance: Option<String>,
    pub pickup_lat: Option<f64>,
    pub pickup_lng: Option<f64>,
    pub dropoff_lat: Option<f64>,
    pub dropoff_lng: Option<f64>,
    pub delivery_time: Option<String>,
    pub delivery_date: Option<String>,
    #[serde(default)]
    pub is_partner_pharmacy: bool,
}

#[derive(Debug, Serialize)]
pub struct QuoteResponse {
    pub distance: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    #[serde(flatten)]
    pub fees: FeeQuote,
}

/// Price a prospective order from a distance string, or from pickup and
/// dropoff coordinates routed through the maps service
pub async fn quote_order(
    State(state): State<AppState>,
    Json(payload): Json<QuoteRequest>,
) -> AppResult<Json<QuoteResponse>> {
    let (distance, duration) = match payload.distance {
        Some(d) => (d, None),
        None => {
            let (Some(p_lat), Some(p_lng), Some(d_lat), Some(d_lng)) = (
                payload.pickup_lat,
                payload.pickup_lng,
                payload.dropoff_lat,
                payload.dropoff_lng,
            ) else {
                return Err(AppError::BadRequest(
                    "Either distance or pickup/dropoff coordinates are required".to_string(),
                ));
            };
            let route = state.maps.route((p_lat, p_lng), (d_lat, d_lng)).await?;
            (route.distance_text, Some(route.duration_text))
        }
    };

    let date = payload
        .delivery_date
        .as_deref()
        .and_then(parse_delivery_date);

    let fees = pricing::quote(
        &distance,
        payload.delivery_time.as_deref(),
        date,
        payload.is_partner_pharmacy,
    );

    Ok(Json(QuoteResponse {
        distance,
        duration,
        fees,
    }))
}

#[derive(Debug, Deserialize)]
pub struct SubmitRequest {
    #[serde(default)]
    pub terms_accepted: bool,
}

#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    pub order_id: Uuid,
    pub delivery_charge: f64,
    pub service_charge: f64,
    pub amount: f64,
    pub redirect_url: String,
}

/// Assemble the staged draft into an order. The draft is only deleted once
/// the order row exists; any earlier failure leaves it intact for retry.
pub async fn submit_order(
    State(state): State<AppState>,
    Extension(user): Extension<MaybeUser>,
    Query(query): Query<OwnerQuery>,
    Json(payload): Json<SubmitRequest>,
) -> AppResult<Json<SubmitResponse>> {
    if !payload.terms_accepted {
        return Err(AppError::validation(
            "terms_accepted",
            "You must accept the terms to place an order",
        ));
    }

    let owner = DraftOwner::resolve(&user, query.guest_token)?;
    let draft = require_draft(&state, owner).await?;

    if draft.step != CheckoutStep::OrderSummary {
        return Err(AppError::BadRequest(
            "Contact details must be completed first".to_string(),
        ));
    }

    let pickup_address = staged("pickup_address", draft.pickup_address.clone())?;
    let pickup_lat = staged("pickup_lat", draft.pickup_lat)?;
    let pickup_lng = staged("pickup_lng", draft.pickup_lng)?;
    let dropoff_address = staged("dropoff_address", draft.dropoff_address.clone())?;
    let dropoff_lat = staged("dropoff_lat", draft.dropoff_lat)?;
    let dropoff_lng = staged("dropoff_lng", draft.dropoff_lng)?;
    let delivery_date_raw = staged("delivery_date", draft.delivery_date.clone())?;
    let delivery_time_raw = staged("delivery_time", draft.delivery_time.clone())?;
    let first_name = staged("first_name", draft.first_name.clone())?;
    let last_name = staged("last_name", draft.last_name.clone())?;
    let email = staged("email", draft.email.clone())?;
    let phone = staged("phone", draft.phone.clone())?;

    let delivery_date = parse_delivery_date(&delivery_date_raw)
        .ok_or_else(|| AppError::validation("delivery_date", "Invalid delivery date"))?;
    let delivery_time = to_24h(&delivery_time_raw)
        .ok_or_else(|| AppError::validation("delivery_time", "Invalid delivery time"))?;

    // Use the staged distance when the client already routed the trip,
    // otherwise compute it now
    let (distance_text, duration) = match draft.distance.clone() {
        Some(d) => (d, draft.duration.clone()),
        None => {
            let route = state
                .maps
                .route((pickup_lat, pickup_lng), (dropoff_lat, dropoff_lng))
                .await?;
            (route.distance_text, Some(route.duration_text))
        }
    };

    let delivery_charge = pricing::calculate_delivery_fee(
        &distance_text,
        Some(&delivery_time_raw),
        Some(delivery_date),
        draft.is_partner_pharmacy,
    );
    let amount = round_cents(delivery_charge + SERVICE_FEE);

    let new_order = order::ActiveModel {
        id: Set(Uuid::new_v4()),
        user_id: Set(owner.user_id()),
        pickup_address: Set(format_address(draft.pickup_name.as_deref(), &pickup_address)),
        pickup_lat: Set(pickup_lat),
        pickup_lng: Set(pickup_lng),
        dropoff_address: Set(format_address(
            draft.dropoff_name.as_deref(),
            &dropoff_address,
        )),
        dropoff_lat: Set(dropoff_lat),
        dropoff_lng: Set(dropoff_lng),
        delivery_date: Set(delivery_date),
        delivery_time: Set(delivery_time),
        distance_miles: Set(parse_distance(&distance_text)),
        duration: Set(duration),
        delivery_charge: Set(delivery_charge),
        service_charge: Set(SERVICE_FEE),
        amount: Set(amount),
        pharmacy_id: Set(draft.pharmacy_id),
        is_partner_pharmacy: Set(draft.is_partner_pharmacy),
        first_name: Set(first_name),
        last_name: Set(last_name),
        email: Set(email),
        phone: Set(phone),
        status: Set(OrderStatus::PendingPayment),
        ..Default::default()
    };

    let order = new_order.insert(state.db.as_ref()).await?;

    // The draft only goes away once the order exists
    checkout_draft::Entity::delete_by_id(draft.id)
        .exec(state.db.as_ref())
        .await?;

    if let Some(user_id) = owner.user_id() {
        log_activity(state.db.as_ref(), user_id, "order_placed").await?;
    }

    Ok(Json(SubmitResponse {
        order_id: order.id,
        delivery_charge: order.delivery_charge,
        service_charge: order.service_charge,
        amount: order.amount,
        redirect_url: format!("{}/{}", state.config.payment_redirect_base, order.id),
    }))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use sea_orm::{DatabaseBackend, MockDatabase};

    use super::*;
    use crate::entities::user::UserRole;
    use crate::services::maps::{Location, MapsApi, ReverseGeocode, RouteSummary};
    use crate::utils::jwt::Claims;
    use crate::{AppState, Config};

    struct OfflineMaps;

    #[async_trait]
    impl MapsApi for OfflineMaps {
        async fn geocode(&self, _address: &str) -> AppResult<Location> {
            Err(AppError::MapsApi("stub offline".to_string()))
        }

        async fn reverse_geocode(&self, _lat: f64, _lng: f64) -> AppResult<ReverseGeocode> {
            Err(AppError::MapsApi("stub offline".to_string()))
        }

        async fn route(&self, _from: (f64, f64), _to: (f64, f64)) -> AppResult<RouteSummary> {
            Err(AppError::MapsApi("stub offline".to_string()))
        }
    }

    fn test_state(db: sea_orm::DatabaseConnection) -> AppState {
        AppState {
            db: std::sync::Arc::new(db),
            config: Config {
                database_url: "postgres://localhost/test".to_string(),
                jwt_secret: "test-secret".to_string(),
                jwt_expiration_hours: 24,
                server_host: "127.0.0.1".to_string(),
                server_port: 0,
                maps_api_key: "test-key".to_string(),
                maps_base_url: "http://localhost".to_string(),
                payment_redirect_base: "https://pay.example.com/checkout".to_string(),
            },
            maps: Arc::new(OfflineMaps),
        }
    }

    fn guest_draft(token: Uuid) -> checkout_draft::Model {
        checkout_draft::Model {
            id: Uuid::new_v4(),
            user_id: None,
            guest_token: Some(token),
            step: CheckoutStep::ContactDetails,
            pickup_name: None,
            pickup_address: None,
            pickup_lat: None,
            pickup_lng: None,
            dropoff_name: None,
            dropoff_address: None,
            dropoff_lat: None,
            dropoff_lng: None,
            zip_code: None,
            city: None,
            state: None,
            delivery_date: None,
            delivery_time: None,
            distance: None,
            duration: None,
            first_name: None,
            last_name: None,
            email: None,
            phone: None,
            date_of_birth: None,
            pharmacy_id: None,
            is_partner_pharmacy: false,
            updated_at: chrono::Utc::now().into(),
        }
    }

    fn logged_in() -> MaybeUser {
        MaybeUser(Some(Claims {
            sub: Uuid::new_v4(),
            email: "customer@example.com".to_string(),
            role: UserRole::Customer,
            exp: 0,
            iat: 0,
        }))
    }

    #[test]
    fn test_authenticated_owner_ignores_guest_token() {
        let user = logged_in();
        let stray_guest = Some(Uuid::new_v4());

        let owner = DraftOwner::resolve(&user, stray_guest).unwrap();
        match owner {
            DraftOwner::User(id) => {
                assert_eq!(id, user.0.as_ref().unwrap().sub);
            }
            DraftOwner::Guest(_) => panic!("guest token must be ignored when logged in"),
        }
    }

    #[test]
    fn test_guest_owner_requires_token() {
        let anonymous = MaybeUser(None);

        assert!(DraftOwner::resolve(&anonymous, None).is_err());

        let token = Uuid::new_v4();
        let owner = DraftOwner::resolve(&anonymous, Some(token)).unwrap();
        assert_eq!(owner, DraftOwner::Guest(token));
    }

    #[test]
    fn test_format_address_includes_name_when_present() {
        assert_eq!(
            format_address(Some("Midtown Pharmacy"), "276 5th Ave"),
            "Midtown Pharmacy, 276 5th Ave"
        );
        assert_eq!(format_address(None, "276 5th Ave"), "276 5th Ave");
        assert_eq!(format_address(Some("  "), "276 5th Ave"), "276 5th Ave");
    }

    #[test]
    fn test_parse_delivery_date_accepts_iso_datetime() {
        let expected = NaiveDate::from_ymd_opt(2025, 3, 3).unwrap();
        assert_eq!(parse_delivery_date("2025-03-03"), Some(expected));
        assert_eq!(parse_delivery_date("2025-03-03T14:30:00Z"), Some(expected));
        assert_eq!(parse_delivery_date("03/03/2025"), None);
        assert_eq!(parse_delivery_date(""), None);
    }

    #[tokio::test]
    async fn test_dropoff_update_degrades_when_reverse_geocode_fails() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

        let payload = UpdateDraftRequest {
            dropoff_lat: Some(40.7457),
            dropoff_lng: Some(-73.9883),
            ..Default::default()
        };

        let response = update_draft(
            State(test_state(db)),
            Extension(MaybeUser(None)),
            Query(OwnerQuery {
                guest_token: Some(Uuid::new_v4()),
            }),
            Json(payload),
        )
        .await
        .unwrap();

        assert!(!response.0.valid);
        assert_eq!(response.0.address.as_deref(), Some("40.745700, -73.988300"));
        assert!(response.0.draft.is_none());
    }

    #[tokio::test]
    async fn test_contact_submission_advances_to_order_summary() {
        let token = Uuid::new_v4();
        let before = guest_draft(token);
        let mut after = before.clone();
        after.step = CheckoutStep::OrderSummary;
        after.first_name = Some("Jo".to_string());
        after.last_name = Some("Rivera".to_string());
        after.email = Some("jo@example.com".to_string());
        after.phone = Some("555-0100".to_string());
        after.date_of_birth = Some("1990-01-15".to_string());

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![before], vec![after]])
            .into_connection();

        let response = submit_contact(
            State(test_state(db)),
            Extension(MaybeUser(None)),
            Query(OwnerQuery {
                guest_token: Some(token),
            }),
            Json(ContactDetailsRequest {
                first_name: "Jo".to_string(),
                last_name: "Rivera".to_string(),
                email: "jo@example.com".to_string(),
                phone: "555-0100".to_string(),
                date_of_birth: "1990-01-15".to_string(),
            }),
        )
        .await
        .unwrap();

        assert_eq!(response.0.step, CheckoutStep::OrderSummary);
        assert_eq!(response.0.email.as_deref(), Some("jo@example.com"));
    }

    #[tokio::test]
    async fn test_contact_submission_rejects_invalid_email() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

        let err = submit_contact(
            State(test_state(db)),
            Extension(MaybeUser(None)),
            Query(OwnerQuery {
                guest_token: Some(Uuid::new_v4()),
            }),
            Json(ContactDetailsRequest {
                first_name: "Jo".to_string(),
                last_name: "Rivera".to_string(),
                email: "not-an-email".to_string(),
                phone: "555-0100".to_string(),
                date_of_birth: "1990-01-15".to_string(),
            }),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, AppError::Validation { ref field, .. } if field == "email"));
    }
}

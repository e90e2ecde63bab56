use axum::{
    extract::{Query, State},
    Json,
};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use serde::{Deserialize, Serialize};

use crate::entities::{coverage_notification, coverage_zip};
use crate::error::{AppError, AppResult};
use crate::services::maps::{format_coords, Location};
use crate::utils::validate::{require_email, require_non_empty};
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct CoverageResult {
    pub valid: bool,
    /// The out-of-coverage postal code, echoed so the client can offer a
    /// notify-me subscription for it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zipcode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

pub(crate) async fn zip_is_covered(state: &AppState, zip: &str) -> AppResult<bool> {
    let found = coverage_zip::Entity::find()
        .filter(coverage_zip::Column::Zip.eq(zip))
        .one(state.db.as_ref())
        .await?;
    Ok(found.is_some())
}

/// The full allow-list of serviced ZIP codes, fetched once per session by
/// clients
pub async fn list_zips(State(state): State<AppState>) -> AppResult<Json<Vec<String>>> {
    let zips = coverage_zip::Entity::find().all(state.db.as_ref()).await?;
    Ok(Json(zips.into_iter().map(|z| z.zip).collect()))
}

#[derive(Debug, Deserialize)]
pub struct CheckQuery {
    pub zip: String,
}

/// Check a postal code directly against the allow-list
pub async fn check_zip(
    State(state): State<AppState>,
    Query(query): Query<CheckQuery>,
) -> AppResult<Json<CoverageResult>> {
    if zip_is_covered(&state, &query.zip).await? {
        Ok(Json(CoverageResult {
            valid: true,
            zipcode: None,
            address: None,
        }))
    } else {
        Ok(Json(CoverageResult {
            valid: false,
            zipcode: Some(query.zip),
            address: None,
        }))
    }
}

#[derive(Debug, Deserialize)]
pub struct GeocodeQuery {
    pub address: String,
}

/// Resolve a typed address to coordinates for map placement
pub async fn geocode_address(
    State(state): State<AppState>,
    Query(query): Query<GeocodeQuery>,
) -> AppResult<Json<Location>> {
    require_non_empty("address", &query.address)?;
    let location = state.maps.geocode(&query.address).await?;
    Ok(Json(location))
}

#[derive(Debug, Deserialize)]
pub struct ValidateRequest {
    pub lat: f64,
    pub lng: f64,
}

/// Resolve a coordinate's postal code via reverse geocoding and check it
/// against the allow-list. A failed reverse geocode falls back to raw
/// coordinates for display and reports the location as not validated.
pub async fn validate_location(
    State(state): State<AppState>,
    Json(payload): Json<ValidateRequest>,
) -> AppResult<Json<CoverageResult>> {
    let geocoded = match state.maps.reverse_geocode(payload.lat, payload.lng).await {
        Ok(g) => g,
        Err(err) => {
            tracing::warn!(error = %err, "Reverse geocoding failed, using raw coordinates");
            return Ok(Json(CoverageResult {
                valid: false,
                zipcode: None,
                address: Some(format_coords(payload.lat, payload.lng)),
            }));
        }
    };

    let Some(zip) = geocoded.zip else {
        return Ok(Json(CoverageResult {
            valid: false,
            zipcode: None,
            address: Some(geocoded.formatted_address),
        }));
    };

    if zip_is_covered(&state, &zip).await? {
        Ok(Json(CoverageResult {
            valid: true,
            zipcode: None,
            address: Some(geocoded.formatted_address),
        }))
    } else {
        Ok(Json(CoverageResult {
            valid: false,
            zipcode: Some(zip),
            address: Some(geocoded.formatted_address),
        }))
    }
}

#[derive(Debug, Deserialize)]
pub struct NotifyRequest {
    pub zip: String,
    pub email: String,
}

/// Record an email to notify when a ZIP code becomes serviced
pub async fn notify_me(
    State(state): State<AppState>,
    Json(payload): Json<NotifyRequest>,
) -> AppResult<Json<serde_json::Value>> {
    require_email("email", &payload.email)?;

    if zip_is_covered(&state, &payload.zip).await? {
        return Err(AppError::BadRequest(
            "This area is already serviced".to_string(),
        ));
    }

    let existing = coverage_notification::Entity::find()
        .filter(coverage_notification::Column::Zip.eq(&payload.zip))
        .filter(coverage_notification::Column::Email.eq(&payload.email))
        .one(state.db.as_ref())
        .await?;

    if existing.is_some() {
        return Err(AppError::Conflict(
            "You are already subscribed for this area".to_string(),
        ));
    }

    let subscription = coverage_notification::ActiveModel {
        zip: Set(payload.zip.clone()),
        email: Set(payload.email.clone()),
        ..Default::default()
    };
    subscription.insert(state.db.as_ref()).await?;

    Ok(Json(serde_json::json!({
        "message": "We will notify you when delivery reaches your area"
    })))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use sea_orm::{DatabaseBackend, MockDatabase};

    use super::*;
    use crate::services::maps::{MapsApi, ReverseGeocode, RouteSummary};
    use crate::Config;

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

    #[tokio::test]
    async fn test_check_zip_covered() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![coverage_zip::Model {
                id: 1,
                zip: "10001".to_string(),
            }]])
            .into_connection();

        let response = check_zip(
            State(test_state(db)),
            Query(CheckQuery {
                zip: "10001".to_string(),
            }),
        )
        .await
        .unwrap();

        assert!(response.0.valid);
        assert!(response.0.zipcode.is_none());
    }

    #[tokio::test]
    async fn test_check_zip_not_covered_echoes_zipcode() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<coverage_zip::Model>::new()])
            .into_connection();

        let response = check_zip(
            State(test_state(db)),
            Query(CheckQuery {
                zip: "99999".to_string(),
            }),
        )
        .await
        .unwrap();

        assert!(!response.0.valid);
        assert_eq!(response.0.zipcode.as_deref(), Some("99999"));
    }

    #[tokio::test]
    async fn test_validate_location_falls_back_to_coordinates() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

        let response = validate_location(
            State(test_state(db)),
            Json(ValidateRequest {
                lat: 40.7457,
                lng: -73.9883,
            }),
        )
        .await
        .unwrap();

        assert!(!response.0.valid);
        assert!(response.0.zipcode.is_none());
        assert_eq!(response.0.address.as_deref(), Some("40.745700, -73.988300"));
    }
}

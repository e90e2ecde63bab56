use axum::{
    extract::{Path, Query, State},
    Json,
};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::pharmacy;
use crate::error::{AppError, AppResult};
use crate::utils::geo::haversine_miles;
use crate::utils::pricing::round_cents;
use crate::AppState;

const DEFAULT_RADIUS_MILES: f64 = 10.0;

#[derive(Debug, Serialize)]
pub struct PharmacyResponse {
    pub id: Uuid,
    pub name: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub lat: f64,
    pub lng: f64,
    pub phone: Option<String>,
    pub hours: Option<String>,
    pub is_partner: bool,
    /// Miles from the query center; only set for nearby searches
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,
}

impl PharmacyResponse {
    fn from_model(p: pharmacy::Model, distance: Option<f64>) -> Self {
        PharmacyResponse {
            id: p.id,
            name: p.name,
            address: p.address,
            city: p.city,
            state: p.state,
            zip: p.zip,
            lat: p.lat,
            lng: p.lng,
            phone: p.phone,
            hours: p.hours,
            is_partner: p.is_partner,
            distance,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct PharmacyFilter {
    pub zip: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
}

/// List pharmacies, optionally filtered by postal code, city or state
pub async fn list_pharmacies(
    State(state): State<AppState>,
    Query(filter): Query<PharmacyFilter>,
) -> AppResult<Json<Vec<PharmacyResponse>>> {
    let mut query = pharmacy::Entity::find();

    if let Some(zip) = &filter.zip {
        query = query.filter(pharmacy::Column::Zip.eq(zip));
    }
    if let Some(city) = &filter.city {
        query = query.filter(pharmacy::Column::City.eq(city));
    }
    if let Some(st) = &filter.state {
        query = query.filter(pharmacy::Column::State.eq(st));
    }

    let pharmacies = query.all(state.db.as_ref()).await?;

    Ok(Json(
        pharmacies
            .into_iter()
            .map(|p| PharmacyResponse::from_model(p, None))
            .collect(),
    ))
}

#[derive(Debug, Deserialize)]
pub struct NearbyQuery {
    pub lat: f64,
    pub lng: f64,
    pub radius: Option<f64>,
}

/// Find pharmacies within a radius of a center point, sorted nearest first
pub async fn nearby_pharmacies(
    State(state): State<AppState>,
    Query(query): Query<NearbyQuery>,
) -> AppResult<Json<Vec<PharmacyResponse>>> {
    let radius = query.radius.unwrap_or(DEFAULT_RADIUS_MILES);
    if radius <= 0.0 {
        return Err(AppError::BadRequest("Radius must be positive".to_string()));
    }

    let pharmacies = pharmacy::Entity::find().all(state.db.as_ref()).await?;

    let mut nearby: Vec<PharmacyResponse> = pharmacies
        .into_iter()
        .filter_map(|p| {
            let distance = haversine_miles(query.lat, query.lng, p.lat, p.lng);
            (distance <= radius)
                .then(|| PharmacyResponse::from_model(p, Some(round_cents(distance))))
        })
        .collect();

    nearby.sort_by(|a, b| {
        a.distance
            .partial_cmp(&b.distance)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    Ok(Json(nearby))
}

/// Get pharmacy details
pub async fn get_pharmacy(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<PharmacyResponse>> {
    let pharmacy = pharmacy::Entity::find_by_id(id)
        .one(state.db.as_ref())
        .await?
        .ok_or_else(|| AppError::NotFound("Pharmacy not found".to_string()))?;

    Ok(Json(PharmacyResponse::from_model(pharmacy, None)))
}

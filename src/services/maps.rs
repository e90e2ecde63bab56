use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Location {
    pub lat: f64,
    pub lng: f64,
    pub address: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ReverseGeocode {
    pub formatted_address: String,
    pub zip: Option<String>,
}

#[derive(Debug, Clone)]
pub struct RouteSummary {
    pub distance_text: String,
    pub duration_text: String,
}

/// Adapter over the maps provider so handlers stay SDK-agnostic and tests
/// can substitute a stub.
#[async_trait]
pub trait MapsApi: Send + Sync {
    async fn geocode(&self, address: &str) -> AppResult<Location>;

    async fn reverse_geocode(&self, lat: f64, lng: f64) -> AppResult<ReverseGeocode>;

    async fn route(&self, from: (f64, f64), to: (f64, f64)) -> AppResult<RouteSummary>;
}

/// Raw-coordinate fallback used when reverse geocoding fails; never blocks
/// the primary flow.
pub fn format_coords(lat: f64, lng: f64) -> String {
    format!("{:.6}, {:.6}", lat, lng)
}

/// Client for a Google-Maps-shaped geocoding/directions HTTP API. The base
/// URL is configurable so tests can point it at a local mock server.
pub struct HttpMapsClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl HttpMapsClient {
    pub fn new(base_url: String, api_key: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url,
            api_key,
        }
    }

    async fn get_json<T: for<'de> Deserialize<'de>>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> AppResult<T> {
        let url = format!("{}{}", self.base_url, path);

        let response = self
            .http
            .get(&url)
            .query(query)
            .query(&[("key", self.api_key.as_str())])
            .send()
            .await
            .map_err(|e| AppError::MapsApi(e.to_string()))?;

        if !response.status().is_success() {
            return Err(AppError::MapsApi(format!(
                "unexpected status {}",
                response.status()
            )));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| AppError::MapsApi(format!("invalid response body: {}", e)))
    }
}

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    status: String,
    #[serde(default)]
    results: Vec<GeocodeResult>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    formatted_address: String,
    geometry: Geometry,
    #[serde(default)]
    address_components: Vec<AddressComponent>,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    location: LatLng,
}

#[derive(Debug, Deserialize)]
struct LatLng {
    lat: f64,
    lng: f64,
}

#[derive(Debug, Deserialize)]
struct AddressComponent {
    long_name: String,
    types: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct DirectionsResponse {
    status: String,
    #[serde(default)]
    routes: Vec<Route>,
}

#[derive(Debug, Deserialize)]
struct Route {
    legs: Vec<Leg>,
}

#[derive(Debug, Deserialize)]
struct Leg {
    distance: TextValue,
    duration: TextValue,
}

#[derive(Debug, Deserialize)]
struct TextValue {
    text: String,
}

fn postal_code(components: &[AddressComponent]) -> Option<String> {
    components
        .iter()
        .find(|c| c.types.iter().any(|t| t == "postal_code"))
        .map(|c| c.long_name.clone())
}

#[async_trait]
impl MapsApi for HttpMapsClient {
    async fn geocode(&self, address: &str) -> AppResult<Location> {
        let body: GeocodeResponse = self
            .get_json("/geocode/json", &[("address", address.to_string())])
            .await?;

        if body.status != "OK" {
            return Err(AppError::MapsApi(format!("geocode status {}", body.status)));
        }

        let result = body
            .results
            .into_iter()
            .next()
            .ok_or_else(|| AppError::MapsApi("geocode returned no results".to_string()))?;

        Ok(Location {
            lat: result.geometry.location.lat,
            lng: result.geometry.location.lng,
            address: Some(result.formatted_address),
        })
    }

    async fn reverse_geocode(&self, lat: f64, lng: f64) -> AppResult<ReverseGeocode> {
        let body: GeocodeResponse = self
            .get_json(
                "/geocode/json",
                &[("latlng", format!("{},{}", lat, lng))],
            )
            .await?;

        if body.status != "OK" {
            return Err(AppError::MapsApi(format!(
                "reverse geocode status {}",
                body.status
            )));
        }

        let result = body
            .results
            .into_iter()
            .next()
            .ok_or_else(|| AppError::MapsApi("reverse geocode returned no results".to_string()))?;

        Ok(ReverseGeocode {
            zip: postal_code(&result.address_components),
            formatted_address: result.formatted_address,
        })
    }

    async fn route(&self, from: (f64, f64), to: (f64, f64)) -> AppResult<RouteSummary> {
        let body: DirectionsResponse = self
            .get_json(
                "/directions/json",
                &[
                    ("origin", format!("{},{}", from.0, from.1)),
                    ("destination", format!("{},{}", to.0, to.1)),
                ],
            )
            .await?;

        if body.status != "OK" {
            return Err(AppError::MapsApi(format!(
                "directions status {}",
                body.status
            )));
        }

        let leg = body
            .routes
            .into_iter()
            .next()
            .and_then(|r| r.legs.into_iter().next())
            .ok_or_else(|| AppError::MapsApi("directions returned no routes".to_string()))?;

        Ok(RouteSummary {
            distance_text: leg.distance.text,
            duration_text: leg.duration.text,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_reverse_geocode_extracts_postal_code() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/geocode/json"))
            .and(query_param("latlng", "40.7457,-73.9883"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "OK",
                "results": [{
                    "formatted_address": "276 5th Ave, New York, NY 10001, USA",
                    "geometry": { "location": { "lat": 40.7457, "lng": -73.9883 } },
                    "address_components": [
                        { "long_name": "New York", "types": ["locality"] },
                        { "long_name": "10001", "types": ["postal_code"] }
                    ]
                }]
            })))
            .mount(&server)
            .await;

        let client = HttpMapsClient::new(server.uri(), "test-key".to_string());
        let result = client.reverse_geocode(40.7457, -73.9883).await.unwrap();

        assert_eq!(result.zip.as_deref(), Some("10001"));
        assert_eq!(result.formatted_address, "276 5th Ave, New York, NY 10001, USA");
    }

    #[tokio::test]
    async fn test_geocode_non_ok_status_is_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/geocode/json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "ZERO_RESULTS",
                "results": []
            })))
            .mount(&server)
            .await;

        let client = HttpMapsClient::new(server.uri(), "test-key".to_string());
        let err = client.geocode("nowhere").await.unwrap_err();

        assert!(matches!(err, AppError::MapsApi(_)));
    }

    #[tokio::test]
    async fn test_route_returns_first_leg_texts() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/directions/json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "OK",
                "routes": [{
                    "legs": [{
                        "distance": { "text": "5.0 mi" },
                        "duration": { "text": "18 mins" }
                    }]
                }]
            })))
            .mount(&server)
            .await;

        let client = HttpMapsClient::new(server.uri(), "test-key".to_string());
        let route = client
            .route((40.7457, -73.9883), (40.7443, -73.9959))
            .await
            .unwrap();

        assert_eq!(route.distance_text, "5.0 mi");
        assert_eq!(route.duration_text, "18 mins");
    }

    #[test]
    fn test_format_coords() {
        assert_eq!(format_coords(40.7457, -73.9883), "40.745700, -73.988300");
    }
}

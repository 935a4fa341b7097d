use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};

use tripgate_suppliers::MapsError;

use crate::error::AppError;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/status", get(maps_status))
        .route("/geocode", post(geocode))
        .route("/reverse-geocode", post(reverse_geocode))
        .route("/search", post(search_places))
        .route("/place/{place_id}", get(place_details))
        .route("/distance", post(calculate_distance))
        .route("/static-map", get(static_map))
        .route("/embed", get(embed_url))
}

#[derive(Debug, Deserialize)]
pub struct GeocodeRequest {
    pub address: String,
}

#[derive(Debug, Deserialize)]
pub struct ReverseGeocodeRequest {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Deserialize)]
pub struct PlaceSearchRequest {
    pub query: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub radius: Option<i64>,
    #[serde(rename = "type")]
    pub place_type: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DistanceRequest {
    pub origin: String,
    pub destination: String,
    pub mode: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct MapImageQuery {
    #[serde(default)]
    pub latitude: f64,
    #[serde(default)]
    pub longitude: f64,
    #[serde(default = "default_zoom")]
    pub zoom: u32,
    #[serde(default = "default_size")]
    pub size: String,
}

fn default_zoom() -> u32 {
    15
}

fn default_size() -> String {
    "600x300".to_string()
}

fn maps_result(result: Result<Value, MapsError>) -> Json<Value> {
    match result {
        Ok(data) => Json(json!({"success": true, "data": data})),
        Err(err) => Json(json!({"success": false, "error": err.to_string()})),
    }
}

/// GET /api/maps/status
async fn maps_status(State(state): State<AppState>) -> Json<Value> {
    let available = state.maps.is_available();
    Json(json!({
        "available": available,
        "message": if available {
            "Google Maps API is configured"
        } else {
            "Google Maps API key not configured"
        },
    }))
}

/// POST /api/maps/geocode
async fn geocode(
    State(state): State<AppState>,
    Json(req): Json<GeocodeRequest>,
) -> Result<Json<Value>, AppError> {
    Ok(maps_result(state.maps.geocode(&req.address).await))
}

/// POST /api/maps/reverse-geocode
async fn reverse_geocode(
    State(state): State<AppState>,
    Json(req): Json<ReverseGeocodeRequest>,
) -> Result<Json<Value>, AppError> {
    Ok(maps_result(
        state.maps.reverse_geocode(req.latitude, req.longitude).await,
    ))
}

/// POST /api/maps/search
async fn search_places(
    State(state): State<AppState>,
    Json(req): Json<PlaceSearchRequest>,
) -> Result<Json<Value>, AppError> {
    let location = match (req.latitude, req.longitude) {
        (Some(lat), Some(lng)) => Some((lat, lng)),
        _ => None,
    };

    let result = state
        .maps
        .search_places(
            &req.query,
            location,
            req.radius.unwrap_or(5000),
            req.place_type.as_deref().unwrap_or("lodging"),
        )
        .await;

    match result {
        Ok(places) => Ok(Json(json!({"success": true, "data": places}))),
        Err(err) => Ok(Json(json!({"success": false, "error": err.to_string()}))),
    }
}

/// GET /api/maps/place/{place_id}
async fn place_details(
    State(state): State<AppState>,
    Path(place_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    Ok(maps_result(
        state
            .maps
            .place_details(
                &place_id,
                "name,formatted_address,geometry,rating,user_ratings_total,photos,website,formatted_phone_number",
            )
            .await,
    ))
}

/// POST /api/maps/distance
async fn calculate_distance(
    State(state): State<AppState>,
    Json(req): Json<DistanceRequest>,
) -> Result<Json<Value>, AppError> {
    Ok(maps_result(
        state
            .maps
            .distance(
                &req.origin,
                &req.destination,
                req.mode.as_deref().unwrap_or("driving"),
            )
            .await,
    ))
}

/// GET /api/maps/static-map
/// Redirects to the provider's static-map image.
async fn static_map(
    State(state): State<AppState>,
    Query(params): Query<MapImageQuery>,
) -> Result<Response, AppError> {
    if params.latitude == 0.0 || params.longitude == 0.0 {
        return Err(AppError::ValidationError("Missing coordinates".to_string()));
    }

    match state
        .maps
        .static_map_url(params.latitude, params.longitude, params.zoom, &params.size)
    {
        Some(url) => Ok(Redirect::temporary(&url).into_response()),
        None => Err(AppError::ValidationError(
            "Google Maps not configured".to_string(),
        )),
    }
}

/// GET /api/maps/embed
async fn embed_url(
    State(state): State<AppState>,
    Query(params): Query<MapImageQuery>,
) -> Result<Json<Value>, AppError> {
    if params.latitude == 0.0 || params.longitude == 0.0 {
        return Err(AppError::ValidationError("Missing coordinates".to_string()));
    }

    match state.maps.embed_url(params.latitude, params.longitude, params.zoom) {
        Some(url) => Ok(Json(json!({"success": true, "url": url}))),
        None => Err(AppError::ValidationError(
            "Google Maps not configured".to_string(),
        )),
    }
}

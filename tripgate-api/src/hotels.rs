use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{info, warn};

use tripgate_core::search::format_guests_for_search;
use tripgate_core::SupplierResponse;
use tripgate_rates::policies::format_hotel_policies;
use tripgate_rates::rooms::{format_room_groups, index_room_groups};
use tripgate_rates::{
    format_cancellation_policies, transform_hotels, RatePricer, TransformContext,
};
use tripgate_shared::models::events::SearchLoggedEvent;

use crate::destinations::{match_destination, FALLBACK_CITY_SUGGESTIONS};
use crate::error::AppError;
use crate::state::AppState;

/// Static-content enrichment is one supplier call per batch; cap the batch.
const MAX_STATIC_ENRICHMENT: usize = 30;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/suggest", get(suggest_get).post(suggest_post))
        .route("/autocomplete", get(autocomplete))
        .route("/search/region", post(search_by_region))
        .route("/search/geo", post(search_by_geo))
        .route("/search/hotels", post(search_by_hotel_ids))
        .route("/search/destination", post(search_by_destination))
        .route("/details", post(hotel_details))
        .route("/details-enriched", post(hotel_details_enriched))
        .route("/info/{hotel_id}", get(hotel_info))
        .route("/policies/{hotel_id}", get(hotel_policies))
        .route("/room-groups/{hotel_id}", get(room_groups))
        .route("/photos/google/{place_id}", get(place_photos))
}

// ============================================================================
// Request Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct RegionSearchRequest {
    pub region_id: i64,
    pub checkin: String,
    pub checkout: String,
    pub adults: u32,
    #[serde(default)]
    pub children_ages: Vec<u32>,
    pub currency: Option<String>,
    pub residency: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct GeoSearchRequest {
    pub latitude: f64,
    pub longitude: f64,
    pub radius: i64,
    pub checkin: String,
    pub checkout: String,
    pub adults: u32,
    #[serde(default)]
    pub children_ages: Vec<u32>,
    pub currency: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct HotelIdsSearchRequest {
    pub hotel_ids: Vec<String>,
    pub checkin: String,
    pub checkout: String,
    pub adults: u32,
    #[serde(default)]
    pub children_ages: Vec<u32>,
    pub currency: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DestinationSearchRequest {
    pub destination: String,
    pub checkin: String,
    pub checkout: String,
    pub adults: u32,
    #[serde(default)]
    pub children_ages: Vec<u32>,
    pub currency: Option<String>,
    pub residency: Option<String>,
    pub region_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct HotelPageRequest {
    pub hotel_id: String,
    pub checkin: String,
    pub checkout: String,
    pub adults: u32,
    #[serde(default)]
    pub children_ages: Vec<u32>,
    pub currency: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SuggestQuery {
    #[serde(default)]
    pub query: String,
    #[serde(default = "default_language")]
    pub language: String,
}

fn default_language() -> String {
    "en".to_string()
}

// ============================================================================
// Helpers
// ============================================================================

/// Uniform JSON envelope around a supplier response.
pub(crate) fn envelope(resp: &SupplierResponse) -> Value {
    if resp.success {
        json!({
            "success": true,
            "data": &resp.data,
            "status_code": resp.status_code,
        })
    } else {
        json!({
            "success": false,
            "error": &resp.error,
            "status_code": resp.status_code,
        })
    }
}

/// Nights in the stay, for nightly-price composition.
pub(crate) fn nights_between(checkin: &str, checkout: &str) -> i64 {
    match (
        NaiveDate::parse_from_str(checkin, "%Y-%m-%d"),
        NaiveDate::parse_from_str(checkout, "%Y-%m-%d"),
    ) {
        (Ok(from), Ok(to)) => (to - from).num_days().max(1),
        _ => 1,
    }
}

fn hotels_from(resp: &SupplierResponse) -> Vec<Value> {
    resp.inner_data()["hotels"]
        .as_array()
        .cloned()
        .unwrap_or_default()
}

/// Attach batch static content (names, images) to raw search hotels.
async fn enrich_with_static_data(state: &AppState, hotels: &mut [Value]) {
    let hotel_ids: Vec<String> = hotels
        .iter()
        .filter_map(|h| h["id"].as_str().map(str::to_string))
        .take(MAX_STATIC_ENRICHMENT)
        .collect();
    if hotel_ids.is_empty() {
        return;
    }

    info!("Fetching static data for {} hotels", hotel_ids.len());
    let static_resp = state.supplier.hotels_info(&hotel_ids).await;
    if !static_resp.success {
        warn!("Failed to fetch static hotel data: {:?}", static_resp.error);
        return;
    }

    let static_map = static_resp.inner_data();
    if !static_map.is_object() {
        return;
    }
    for hotel in hotels.iter_mut() {
        if let Some(id) = hotel["id"].as_str() {
            let static_info = &static_map[id];
            if static_info.is_object() {
                hotel["static_data"] = static_info.clone();
            }
        }
    }
}

async fn log_search(state: &AppState, search_type: &str, params: Value, results_count: i64) {
    let event = SearchLoggedEvent {
        search_type: search_type.to_string(),
        search_params: params,
        results_count,
        timestamp: chrono::Utc::now().timestamp(),
    };
    // Analytics write is best-effort; never fail the search over it
    if let Err(err) = state.search_history.log_search(&event).await {
        warn!("Failed to save search history: {}", err);
    }
}

// ============================================================================
// Suggest / Autocomplete
// ============================================================================

/// POST /api/hotels/suggest
/// Supplier multicomplete proxy.
async fn suggest_post(
    State(state): State<AppState>,
    Json(req): Json<Value>,
) -> Result<Json<Value>, AppError> {
    let query = req["query"].as_str().unwrap_or_default();
    if query.len() < 2 {
        return Err(AppError::ValidationError(
            "Query must be at least 2 characters".to_string(),
        ));
    }

    let language = req["language"].as_str().unwrap_or("en");
    let resp = state.supplier.multicomplete(query, language).await;
    Ok(Json(envelope(&resp)))
}

/// GET /api/hotels/suggest
/// Same proxy; short queries return an empty payload instead of an error.
async fn suggest_get(
    State(state): State<AppState>,
    Query(params): Query<SuggestQuery>,
) -> Result<Json<Value>, AppError> {
    if params.query.len() < 2 {
        return Ok(Json(json!({
            "success": true,
            "data": {"hotels": [], "regions": []},
        })));
    }

    let resp = state.supplier.multicomplete(&params.query, &params.language).await;
    Ok(Json(envelope(&resp)))
}

#[derive(Debug, Deserialize)]
pub struct AutocompleteQuery {
    #[serde(default)]
    pub query: String,
}

/// GET /api/hotels/autocomplete
/// Location suggestions from the places provider, with a popular-city
/// fallback when no maps key is configured.
async fn autocomplete(
    State(state): State<AppState>,
    Query(params): Query<AutocompleteQuery>,
) -> Result<Json<Value>, AppError> {
    let query = params.query.trim();
    if query.len() < 2 {
        return Err(AppError::ValidationError(
            "Query must be at least 2 characters".to_string(),
        ));
    }

    if !state.maps.is_available() {
        let needle = query.to_lowercase();
        let predictions: Vec<Value> = FALLBACK_CITY_SUGGESTIONS
            .iter()
            .filter(|(description, _, _)| description.to_lowercase().contains(&needle))
            .take(5)
            .map(|(description, main, secondary)| {
                json!({
                    "description": description,
                    "types": ["locality"],
                    "structured_formatting": {"main_text": main, "secondary_text": secondary},
                })
            })
            .collect();
        return Ok(Json(json!({
            "success": true,
            "predictions": predictions,
            "source": "fallback",
        })));
    }

    match state.maps.autocomplete(query, Some("(regions)")).await {
        Ok((status, predictions)) if status == "OK" => Ok(Json(json!({
            "success": true,
            "predictions": predictions.into_iter().take(8).collect::<Vec<_>>(),
            "source": "google",
        }))),
        Ok((status, _)) if status == "ZERO_RESULTS" => {
            // Regions filter can be too strict; retry unrestricted
            match state.maps.autocomplete(query, None).await {
                Ok((status, predictions)) if status == "OK" => Ok(Json(json!({
                    "success": true,
                    "predictions": predictions.into_iter().take(8).collect::<Vec<_>>(),
                    "source": "google_unfiltered",
                }))),
                Ok((status, _)) => Ok(Json(json!({
                    "success": false,
                    "error": status,
                    "predictions": [],
                }))),
                Err(err) => Err(AppError::InternalServerError(err.to_string())),
            }
        }
        Ok((status, _)) => Ok(Json(json!({
            "success": false,
            "error": status,
            "predictions": [],
        }))),
        Err(err) => Err(AppError::InternalServerError(err.to_string())),
    }
}

// ============================================================================
// Search
// ============================================================================

/// POST /api/hotels/search/region
async fn search_by_region(
    State(state): State<AppState>,
    Json(req): Json<RegionSearchRequest>,
) -> Result<Json<Value>, AppError> {
    let guests = format_guests_for_search(req.adults, &req.children_ages);

    let resp = state
        .supplier
        .search_by_region(
            req.region_id,
            &req.checkin,
            &req.checkout,
            &guests,
            req.currency.as_deref().unwrap_or("USD"),
            req.residency.as_deref().unwrap_or("gb"),
        )
        .await;

    let results_count = hotels_from(&resp).len() as i64;
    log_search(
        &state,
        "region",
        json!({
            "region_id": req.region_id,
            "checkin": req.checkin,
            "checkout": req.checkout,
            "adults": req.adults,
            "children_ages": req.children_ages,
        }),
        results_count,
    )
    .await;

    Ok(Json(envelope(&resp)))
}

/// POST /api/hotels/search/geo
async fn search_by_geo(
    State(state): State<AppState>,
    Json(req): Json<GeoSearchRequest>,
) -> Result<Json<Value>, AppError> {
    let guests = format_guests_for_search(req.adults, &req.children_ages);

    let resp = state
        .supplier
        .search_by_geo(
            req.latitude,
            req.longitude,
            req.radius,
            &req.checkin,
            &req.checkout,
            &guests,
            req.currency.as_deref().unwrap_or("USD"),
        )
        .await;

    Ok(Json(envelope(&resp)))
}

/// POST /api/hotels/search/hotels
async fn search_by_hotel_ids(
    State(state): State<AppState>,
    Json(req): Json<HotelIdsSearchRequest>,
) -> Result<Json<Value>, AppError> {
    let guests = format_guests_for_search(req.adults, &req.children_ages);

    let resp = state
        .supplier
        .search_by_hotels(
            &req.hotel_ids,
            &req.checkin,
            &req.checkout,
            &guests,
            req.currency.as_deref().unwrap_or("USD"),
        )
        .await;

    Ok(Json(envelope(&resp)))
}

/// POST /api/hotels/search/destination
/// Destination-name search: popular-destination table first, then the
/// supplier's multicomplete, then the places-provider fallback.
async fn search_by_destination(
    State(state): State<AppState>,
    Json(req): Json<DestinationSearchRequest>,
) -> Result<Response, AppError> {
    let target_currency = req.currency.clone().unwrap_or_else(|| "INR".to_string());
    let mut region_id = req.region_id;
    let mut location_name = req.destination.clone();
    // A caller-supplied region id is assumed bookable until proven otherwise
    let mut sandbox_supported = region_id.is_some();

    info!("Hotel search request: {}", req.destination);

    if let Some(dest) = match_destination(&req.destination) {
        region_id = Some(dest.region_id);
        location_name = dest.name.to_string();
        sandbox_supported = dest.sandbox;
        info!("Matched destination: {}, sandbox: {}", dest.name, dest.sandbox);
    }

    // Non-sandbox destinations would only waste a supplier round-trip that
    // returns empty; go straight to the places fallback.
    if region_id.is_some() && !sandbox_supported {
        let google_hotels = search_hotels_via_google(&state, &req.destination).await;
        if !google_hotels.is_empty() {
            info!("Found {} hotels via places fallback for {}", google_hotels.len(), location_name);
            return Ok(google_response(google_hotels, &location_name).into_response());
        }
    }

    if let Some(id) = region_id.filter(|_| sandbox_supported) {
        if let Some(response) = search_region_and_transform(
            &state,
            &req,
            id,
            &location_name,
            &target_currency,
        )
        .await
        {
            return Ok(response.into_response());
        }
        warn!("Supplier returned 0 hotels for {}, trying fallbacks", location_name);
    }

    // Unknown destination: ask the supplier's multicomplete for a region
    if region_id.is_none() {
        let suggest = state.supplier.multicomplete(&req.destination, "en").await;
        if suggest.success {
            let regions = suggest.inner_data()["regions"].clone();
            if let Some(region) = regions.as_array().and_then(|r| r.first()) {
                if let Some(id) = region["id"].as_i64() {
                    let name = region["name"].as_str().unwrap_or(&req.destination).to_string();
                    info!("Found region via multicomplete: {} ({})", name, id);
                    if let Some(response) = search_region_and_transform(
                        &state,
                        &req,
                        id,
                        &name,
                        &target_currency,
                    )
                    .await
                    {
                        return Ok(response.into_response());
                    }
                }
            }
        }
    }

    // Final fallback: places provider
    let google_hotels = search_hotels_via_google(&state, &req.destination).await;
    if !google_hotels.is_empty() {
        info!("Found {} hotels via places fallback", google_hotels.len());
        return Ok(google_response(google_hotels, &location_name).into_response());
    }

    info!("No hotels found for {}", req.destination);
    Ok((
        StatusCode::BAD_REQUEST,
        Json(json!({
            "success": false,
            "error": format!(
                "Could not find hotels for '{}'. Please try Paris, Dubai, or Moscow for best results.",
                req.destination
            ),
            "sandbox_mode": true,
            "supported_destinations": ["Paris", "Moscow", "Dubai"],
        })),
    )
        .into_response())
}

/// One sandbox region search plus enrichment and transformation. Returns
/// None when the supplier comes back empty so the caller can fall through.
async fn search_region_and_transform(
    state: &AppState,
    req: &DestinationSearchRequest,
    region_id: i64,
    location_name: &str,
    target_currency: &str,
) -> Option<Json<Value>> {
    let guests = format_guests_for_search(req.adults, &req.children_ages);

    let resp = state
        .supplier
        .search_by_region(
            region_id,
            &req.checkin,
            &req.checkout,
            &guests,
            target_currency,
            req.residency.as_deref().unwrap_or("gb"),
        )
        .await;

    if !resp.success {
        return None;
    }
    let mut hotels = hotels_from(&resp);
    if hotels.is_empty() {
        return None;
    }
    info!("Found {} hotels via supplier for {}", hotels.len(), location_name);

    enrich_with_static_data(state, &mut hotels).await;

    let pricer = RatePricer::new(state.pricing.clone());
    let ctx = TransformContext {
        pricer: &pricer,
        target_currency: target_currency.to_string(),
        nights: nights_between(&req.checkin, &req.checkout),
        location_name: Some(location_name.to_string()),
    };
    let transformed = transform_hotels(&hotels, &ctx, None);

    log_search(
        state,
        "destination",
        json!({
            "destination": &req.destination,
            "region_id": region_id,
            "checkin": &req.checkin,
            "checkout": &req.checkout,
            "adults": req.adults,
        }),
        transformed.len() as i64,
    )
    .await;

    let hotels_count = transformed.len();
    Some(Json(json!({
        "success": true,
        "data": {"hotels": transformed},
        "location": {"name": location_name, "region_id": region_id},
        "hotels_count": hotels_count,
        "real_data": true,
        "source": "ratehawk",
    })))
}

fn google_response(hotels: Vec<Value>, location_name: &str) -> Json<Value> {
    let hotels_count = hotels.len();
    Json(json!({
        "success": true,
        "data": {"hotels": hotels},
        "location": {"name": location_name},
        "hotels_count": hotels_count,
        "real_data": true,
        "source": "google_places",
    }))
}

/// Places-provider hotel fallback: real names/photos, estimated prices.
async fn search_hotels_via_google(state: &AppState, destination: &str) -> Vec<Value> {
    if !state.maps.is_available() {
        warn!("Maps provider not available for hotel fallback");
        return Vec::new();
    }

    let places = match state
        .maps
        .search_places(&format!("hotels in {}", destination), None, 5000, "lodging")
        .await
    {
        Ok(places) => places,
        Err(err) => {
            warn!("Places search failed: {}", err);
            return Vec::new();
        }
    };

    let destination_parts: Vec<&str> = destination.split(',').map(str::trim).collect();
    let city = destination_parts.first().copied().unwrap_or(destination);
    let country = if destination_parts.len() > 1 {
        destination_parts.last().copied().unwrap_or("India")
    } else {
        "India"
    };

    places
        .iter()
        .take(20)
        .enumerate()
        .map(|(idx, place)| {
            let rating = place["rating"].as_f64().unwrap_or(4.0);
            let star_rating = (rating.round() as i64).clamp(3, 5);
            // Rough nightly estimate; real prices need a booking supplier
            let base_price = (2000.0 + rating * 1500.0 + idx as f64 * 200.0).round();

            let mut images: Vec<String> = place["photos"]
                .as_array()
                .map(|photos| {
                    photos
                        .iter()
                        .take(5)
                        .filter_map(|photo| photo["photo_reference"].as_str())
                        .filter_map(|reference| state.maps.photo_url(reference, 800))
                        .collect()
                })
                .unwrap_or_default();
            if images.is_empty() {
                images.push(
                    tripgate_rates::images::FALLBACK_HOTEL_IMAGES
                        [idx % tripgate_rates::images::FALLBACK_HOTEL_IMAGES.len()]
                    .to_string(),
                );
            }

            let place_id = place["place_id"].as_str().unwrap_or_default();
            let primary_image = images[0].clone();
            json!({
                "id": format!("google_{}", place_id),
                "google_place_id": place_id,
                "name": place["name"].as_str().unwrap_or("Hotel"),
                "star_rating": star_rating,
                "guest_rating": rating,
                "review_count": place["user_ratings_total"].as_i64().unwrap_or(0),
                "address": place["address"].as_str().unwrap_or(destination),
                "city": city,
                "country": country,
                "location": format!("{}, {}", city, country),
                "image": primary_image,
                "images": images,
                "latitude": place["latitude"],
                "longitude": place["longitude"],
                "price": base_price,
                "original_price": (base_price * 1.2).round(),
                "currency": "INR",
                "amenities": ["wifi", "parking"],
                "meal_plan": "room_only",
                "discount": 15,
                "source": "google_places",
                "rates": [{
                    "book_hash": format!("google_booking_{}", place_id),
                    "room_name": "Standard Room",
                    "price": base_price,
                    // No live inventory behind these; booking goes via contact
                    "booking_type": "contact",
                }],
            })
        })
        .collect()
}

// ============================================================================
// Details / Static Content
// ============================================================================

/// POST /api/hotels/details
/// Hotel page with rates; formatted cancellation info is injected into every
/// rate before the payload goes out.
async fn hotel_details(
    State(state): State<AppState>,
    Json(req): Json<HotelPageRequest>,
) -> Result<Json<Value>, AppError> {
    let guests = format_guests_for_search(req.adults, &req.children_ages);

    let resp = state
        .supplier
        .hotel_page(
            &req.hotel_id,
            &req.checkin,
            &req.checkout,
            &guests,
            req.currency.as_deref().unwrap_or("INR"),
        )
        .await;

    let mut body = envelope(&resp);
    if resp.success {
        inject_cancellation_info(&mut body["data"]);
    }

    Ok(Json(body))
}

/// Walk data / data.data for a hotels array and attach cancellation_info to
/// each rate.
fn inject_cancellation_info(data: &mut Value) {
    let container = if data["data"].is_object() {
        &mut data["data"]
    } else {
        data
    };

    if let Some(hotels) = container["hotels"].as_array_mut() {
        for hotel in hotels {
            if let Some(rates) = hotel["rates"].as_array_mut() {
                for rate in rates.iter_mut() {
                    let info = format_cancellation_policies(rate);
                    rate["cancellation_info"] =
                        serde_json::to_value(info).unwrap_or(Value::Null);
                }
            }
        }
    }
}

/// POST /api/hotels/details-enriched
/// Hotel page with rates joined to static room groups and full price
/// composition applied.
async fn hotel_details_enriched(
    State(state): State<AppState>,
    Json(req): Json<HotelPageRequest>,
) -> Result<Json<Value>, AppError> {
    let guests = format_guests_for_search(req.adults, &req.children_ages);
    let target_currency = req.currency.clone().unwrap_or_else(|| "USD".to_string());

    let rates_resp = state
        .supplier
        .hotel_page(&req.hotel_id, &req.checkin, &req.checkout, &guests, &target_currency)
        .await;
    if !rates_resp.success {
        return Ok(Json(envelope(&rates_resp)));
    }

    let static_resp = state.supplier.hotel_static(&req.hotel_id).await;
    let (room_groups, static_info) = if static_resp.success {
        let static_data = static_resp.inner_data().clone();
        (index_room_groups(&static_data["room_groups"]), Some(static_data))
    } else {
        (Default::default(), None)
    };

    let mut hotels = hotels_from(&rates_resp);
    if let Some(static_info) = &static_info {
        for hotel in hotels.iter_mut() {
            hotel["static_data"] = static_info.clone();
        }
    }

    let pricer = RatePricer::new(state.pricing.clone());
    let ctx = TransformContext {
        pricer: &pricer,
        target_currency,
        nights: nights_between(&req.checkin, &req.checkout),
        location_name: None,
    };
    let transformed = transform_hotels(&hotels, &ctx, Some(&room_groups));

    Ok(Json(json!({
        "success": true,
        "data": {
            "hotels": transformed,
            "room_groups_count": room_groups.len(),
        },
    })))
}

/// GET /api/hotels/info/{hotel_id}
/// Static hotel content, cached.
async fn hotel_info(
    State(state): State<AppState>,
    Path(hotel_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    if let Ok(Some(cached)) = state.redis.get_cached_hotel_static(&hotel_id).await {
        return Ok(Json(json!({
            "success": true,
            "data": cached,
            "source": "cache",
        })));
    }

    let resp = state.supplier.hotel_static(&hotel_id).await;
    if resp.success {
        if let Err(err) = state.redis.cache_hotel_static(&hotel_id, &resp.data).await {
            warn!("Failed to cache hotel static data: {}", err);
        }
    }

    Ok(Json(envelope(&resp)))
}

/// GET /api/hotels/policies/{hotel_id}
/// Raw and formatted policy view from static data. policy_struct is
/// deprecated upstream and ignored; only metapolicy data is used.
async fn hotel_policies(
    State(state): State<AppState>,
    Path(hotel_id): Path<String>,
) -> Result<Response, AppError> {
    let resp = state.supplier.hotel_static(&hotel_id).await;
    if !resp.success {
        return Ok((
            StatusCode::BAD_REQUEST,
            Json(json!({
                "success": false,
                "error": resp.error.clone().unwrap_or_else(|| "Failed to fetch hotel static data".to_string()),
            })),
        )
            .into_response());
    }

    let hotel_data = resp.inner_data();
    let policies = json!({
        "metapolicy_struct": hotel_data["metapolicy_struct"],
        "metapolicy_extra_info": hotel_data["metapolicy_extra_info"],
        "check_in_time": hotel_data["check_in_time"],
        "check_out_time": hotel_data["check_out_time"],
    });

    let formatted = format_hotel_policies(&policies);

    Ok(Json(json!({
        "success": true,
        "data": {
            "policies": policies,
            "formatted_policies": formatted,
        },
    }))
    .into_response())
}

/// GET /api/hotels/room-groups/{hotel_id}
/// Room groups formatted for rate matching on the frontend.
async fn room_groups(
    State(state): State<AppState>,
    Path(hotel_id): Path<String>,
) -> Result<Response, AppError> {
    let resp = state.supplier.hotel_static(&hotel_id).await;
    if !resp.success {
        return Ok((
            StatusCode::BAD_REQUEST,
            Json(json!({
                "success": false,
                "error": resp.error.clone().unwrap_or_else(|| "Failed to fetch hotel static data".to_string()),
            })),
        )
            .into_response());
    }

    let formatted = format_room_groups(&resp.inner_data()["room_groups"]);

    Ok(Json(json!({
        "success": true,
        "data": {
            "room_groups": formatted,
            "hotel_id": hotel_id,
        },
    }))
    .into_response())
}

/// GET /api/hotels/photos/google/{place_id}
/// Photo gallery for a places-provider hotel.
async fn place_photos(
    State(state): State<AppState>,
    Path(place_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    if !state.maps.is_available() {
        return Err(AppError::ValidationError(
            "Google Maps API not configured".to_string(),
        ));
    }

    let details = state
        .maps
        .place_details(&place_id, "photos,name")
        .await
        .map_err(|err| AppError::InternalServerError(err.to_string()))?;

    let photos: Vec<Value> = details["photos"]
        .as_array()
        .map(|photo_data| {
            photo_data
                .iter()
                .take(10)
                .filter_map(|photo| {
                    let reference = photo["photo_reference"].as_str()?;
                    let url = state.maps.photo_url(reference, 800)?;
                    Some(json!({
                        "url": url,
                        "width": photo["width"],
                        "height": photo["height"],
                    }))
                })
                .collect()
        })
        .unwrap_or_default();

    let photo_urls: Vec<Value> = photos.iter().map(|p| p["url"].clone()).collect();
    let total_photos = photos.len();

    Ok(Json(json!({
        "success": true,
        "data": {
            "photos": photos,
            "photo_urls": photo_urls,
            "place_name": details["name"].as_str().unwrap_or(""),
            "total_photos": total_photos,
        },
    })))
}

use axum::{
    extract::State,
    http::Method,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde_json::json;
use std::net::SocketAddr;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod auth;
pub mod bookings;
pub mod destinations;
pub mod error;
pub mod hotels;
pub mod maps;
pub mod middleware;
pub mod payments;
pub mod state;

pub use state::AppState;

pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
            axum::http::header::USER_AGENT,
        ]);

    Router::new()
        .nest("/api/hotels", hotels::routes().merge(bookings::routes(state.clone())))
        .nest("/api/maps", maps::routes())
        .nest("/api/payments", payments::routes())
        .nest("/api/auth", auth::routes())
        .route("/api/health", get(health_check))
        .route("/api", get(api_info))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            rate_limit_middleware,
        ))
        .with_state(state)
}

async fn health_check() -> Json<serde_json::Value> {
    Json(json!({
        "status": "healthy",
        "service": "TripGate API",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn api_info() -> Json<serde_json::Value> {
    Json(json!({
        "name": "TripGate API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "health": "/api/health",
            "hotels_search_region": "POST /api/hotels/search/region",
            "hotels_search_geo": "POST /api/hotels/search/geo",
            "hotels_search_destination": "POST /api/hotels/search/destination",
            "hotels_details": "POST /api/hotels/details",
            "hotels_prebook": "POST /api/hotels/prebook",
            "hotels_book": "POST /api/hotels/book",
            "hotels_book_finish": "POST /api/hotels/book/finish",
            "hotels_book_status": "POST /api/hotels/book/status",
            "hotels_cancel": "POST /api/hotels/booking/cancel",
            "maps_geocode": "POST /api/maps/geocode",
            "maps_search": "POST /api/maps/search",
            "maps_distance": "POST /api/maps/distance",
            "payments_order": "POST /api/payments/order",
        },
    }))
}

async fn rate_limit_middleware(
    State(state): State<AppState>,
    axum::extract::ConnectInfo(addr): axum::extract::ConnectInfo<SocketAddr>,
    req: axum::extract::Request,
    next: axum::middleware::Next,
) -> Result<impl IntoResponse, impl IntoResponse> {
    let ip = addr.ip().to_string();
    let key = format!("ratelimit:{}", ip);

    match state.redis.check_rate_limit(&key, 100, 60).await {
        Ok(true) => Ok(next.run(req).await),
        Ok(false) => Err((axum::http::StatusCode::TOO_MANY_REQUESTS, "Rate limit exceeded")),
        Err(_) => Ok(next.run(req).await), // Fail open
    }
}

use std::time::Duration;

use serde_json::{json, Value};
use tracing::debug;

const GEOCODE_URL: &str = "https://maps.googleapis.com/maps/api/geocode/json";
const PLACES_TEXT_URL: &str = "https://maps.googleapis.com/maps/api/place/textsearch/json";
const PLACE_DETAILS_URL: &str = "https://maps.googleapis.com/maps/api/place/details/json";
const AUTOCOMPLETE_URL: &str = "https://maps.googleapis.com/maps/api/place/autocomplete/json";
const DISTANCE_URL: &str = "https://maps.googleapis.com/maps/api/distancematrix/json";
const PHOTO_URL: &str = "https://maps.googleapis.com/maps/api/place/photo";
const STATIC_MAP_URL: &str = "https://maps.googleapis.com/maps/api/staticmap";
const EMBED_URL: &str = "https://www.google.com/maps/embed/v1/place";

#[derive(Debug, thiserror::Error)]
pub enum MapsError {
    #[error("Google Maps not configured")]
    NotConfigured,

    #[error("No results found")]
    NoResults,

    #[error("Maps API error: {0}")]
    Provider(String),

    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// Client for the geocoding/places provider.
pub struct MapsClient {
    http: reqwest::Client,
    api_key: Option<String>,
}

impl MapsClient {
    pub fn new(api_key: Option<String>) -> Self {
        // Keys left as template placeholders count as unconfigured
        let api_key = api_key.filter(|key| !key.is_empty() && key != "your_google_maps_api_key");
        Self {
            http: reqwest::Client::builder()
                .timeout(Duration::from_secs(10))
                .build()
                .expect("failed to build maps http client"),
            api_key,
        }
    }

    pub fn is_available(&self) -> bool {
        self.api_key.is_some()
    }

    fn key(&self) -> Result<&str, MapsError> {
        self.api_key.as_deref().ok_or(MapsError::NotConfigured)
    }

    async fn get_json(&self, url: &str, params: &[(&str, String)]) -> Result<Value, MapsError> {
        debug!(url, "maps request");
        let response = self.http.get(url).query(params).send().await?;
        Ok(response.json().await?)
    }

    /// Convert an address to coordinates.
    pub async fn geocode(&self, address: &str) -> Result<Value, MapsError> {
        let key = self.key()?.to_string();
        let body = self
            .get_json(GEOCODE_URL, &[("address", address.to_string()), ("key", key)])
            .await?;

        let result = body["results"]
            .as_array()
            .and_then(|r| r.first())
            .ok_or(MapsError::NoResults)?;

        Ok(json!({
            "latitude": result["geometry"]["location"]["lat"],
            "longitude": result["geometry"]["location"]["lng"],
            "formatted_address": result["formatted_address"],
            "place_id": result["place_id"],
        }))
    }

    /// Convert coordinates to an address.
    pub async fn reverse_geocode(&self, latitude: f64, longitude: f64) -> Result<Value, MapsError> {
        let key = self.key()?.to_string();
        let body = self
            .get_json(
                GEOCODE_URL,
                &[("latlng", format!("{},{}", latitude, longitude)), ("key", key)],
            )
            .await?;

        let result = body["results"]
            .as_array()
            .and_then(|r| r.first())
            .ok_or(MapsError::NoResults)?;

        Ok(json!({
            "formatted_address": result["formatted_address"],
            "place_id": result["place_id"],
            "address_components": result["address_components"],
        }))
    }

    /// Text search for places (hotels, landmarks), optionally biased to a
    /// location.
    pub async fn search_places(
        &self,
        query: &str,
        location: Option<(f64, f64)>,
        radius: i64,
        place_type: &str,
    ) -> Result<Vec<Value>, MapsError> {
        let key = self.key()?.to_string();
        let mut params = vec![
            ("query", query.to_string()),
            ("type", place_type.to_string()),
            ("key", key),
        ];
        if let Some((lat, lng)) = location {
            params.push(("location", format!("{},{}", lat, lng)));
            params.push(("radius", radius.to_string()));
        }

        let body = self.get_json(PLACES_TEXT_URL, &params).await?;
        let places = body["results"]
            .as_array()
            .map(|results| {
                results
                    .iter()
                    .map(|place| {
                        json!({
                            "name": place["name"],
                            "address": place["formatted_address"],
                            "place_id": place["place_id"],
                            "rating": place["rating"],
                            "user_ratings_total": place["user_ratings_total"],
                            "latitude": place["geometry"]["location"]["lat"],
                            "longitude": place["geometry"]["location"]["lng"],
                            "types": place["types"],
                            "photos": place["photos"],
                        })
                    })
                    .collect()
            })
            .unwrap_or_default();

        Ok(places)
    }

    /// Place details, limited to the requested fields.
    pub async fn place_details(&self, place_id: &str, fields: &str) -> Result<Value, MapsError> {
        let key = self.key()?.to_string();
        let body = self
            .get_json(
                PLACE_DETAILS_URL,
                &[
                    ("place_id", place_id.to_string()),
                    ("fields", fields.to_string()),
                    ("key", key),
                ],
            )
            .await?;

        match body["result"].clone() {
            Value::Null => Err(MapsError::NoResults),
            result => Ok(result),
        }
    }

    /// Autocomplete predictions. `types` narrows the result class, e.g.
    /// "(regions)"; pass None to search everything.
    pub async fn autocomplete(
        &self,
        input: &str,
        types: Option<&str>,
    ) -> Result<(String, Vec<Value>), MapsError> {
        let key = self.key()?.to_string();
        let mut params = vec![("input", input.to_string()), ("key", key)];
        if let Some(types) = types {
            params.push(("types", types.to_string()));
        }

        let body = self.get_json(AUTOCOMPLETE_URL, &params).await?;
        let status = body["status"].as_str().unwrap_or("UNKNOWN_ERROR").to_string();
        let predictions = body["predictions"].as_array().cloned().unwrap_or_default();
        Ok((status, predictions))
    }

    /// Driving/walking distance between two free-form locations.
    pub async fn distance(
        &self,
        origin: &str,
        destination: &str,
        mode: &str,
    ) -> Result<Value, MapsError> {
        let key = self.key()?.to_string();
        let body = self
            .get_json(
                DISTANCE_URL,
                &[
                    ("origins", origin.to_string()),
                    ("destinations", destination.to_string()),
                    ("mode", mode.to_string()),
                    ("key", key),
                ],
            )
            .await?;

        let element = &body["rows"][0]["elements"][0];
        if element["status"] != json!("OK") {
            return Err(MapsError::Provider(
                element["status"].as_str().unwrap_or("UNKNOWN_ERROR").to_string(),
            ));
        }

        Ok(json!({
            "distance": element["distance"],
            "duration": element["duration"],
            "origin": body["origin_addresses"][0],
            "destination": body["destination_addresses"][0],
            "mode": mode,
        }))
    }

    /// Direct photo URL for a places photo reference.
    pub fn photo_url(&self, photo_reference: &str, max_width: u32) -> Option<String> {
        let key = self.api_key.as_deref()?;
        if photo_reference.is_empty() {
            return None;
        }
        Some(format!(
            "{}?maxwidth={}&photo_reference={}&key={}",
            PHOTO_URL, max_width, photo_reference, key
        ))
    }

    /// Static map image URL for embedding.
    pub fn static_map_url(&self, latitude: f64, longitude: f64, zoom: u32, size: &str) -> Option<String> {
        let key = self.api_key.as_deref()?;
        Some(format!(
            "{}?center={lat},{lng}&zoom={zoom}&size={size}&markers=color:red%7C{lat},{lng}&key={key}",
            STATIC_MAP_URL,
            lat = latitude,
            lng = longitude,
            zoom = zoom,
            size = size,
            key = key
        ))
    }

    /// Iframe embed URL.
    pub fn embed_url(&self, latitude: f64, longitude: f64, zoom: u32) -> Option<String> {
        let key = self.api_key.as_deref()?;
        Some(format!(
            "{}?key={}&q={},{}&zoom={}",
            EMBED_URL, key, latitude, longitude, zoom
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_key_counts_as_unconfigured() {
        assert!(!MapsClient::new(Some("your_google_maps_api_key".to_string())).is_available());
        assert!(!MapsClient::new(Some(String::new())).is_available());
        assert!(!MapsClient::new(None).is_available());
        assert!(MapsClient::new(Some("AIza-real-key".to_string())).is_available());
    }

    #[test]
    fn test_photo_url() {
        let client = MapsClient::new(Some("k123".to_string()));
        let url = client.photo_url("ref_abc", 800).unwrap();
        assert!(url.contains("maxwidth=800"));
        assert!(url.contains("photo_reference=ref_abc"));
        assert!(url.contains("key=k123"));

        assert!(client.photo_url("", 800).is_none());
        assert!(MapsClient::new(None).photo_url("ref_abc", 800).is_none());
    }

    #[test]
    fn test_static_and_embed_urls() {
        let client = MapsClient::new(Some("k123".to_string()));
        let static_url = client.static_map_url(48.8566, 2.3522, 15, "600x300").unwrap();
        assert!(static_url.contains("center=48.8566,2.3522"));
        assert!(static_url.contains("size=600x300"));

        let embed = client.embed_url(48.8566, 2.3522, 15).unwrap();
        assert!(embed.contains("q=48.8566,2.3522"));
    }
}

use std::collections::HashMap;

use serde_json::{json, Value};

use crate::cancellation::format_cancellation_policies;
use crate::images::{collect_image_urls, FALLBACK_HOTEL_IMAGES};
use crate::meals::{meal_display_name, process_meal_data};
use crate::pricing::RatePricer;
use crate::rooms::{enrich_rate_with_room_data, RoomGroupData};
use crate::taxes::{parse_taxes, sum_taxes};
use crate::{round2, title_case};

/// Rates shown per hotel card.
const MAX_RATES_PER_HOTEL: usize = 20;
/// Images carried per hotel card.
const MAX_IMAGES_PER_HOTEL: usize = 10;

/// Everything the hotel/rate transforms need besides the raw payload.
pub struct TransformContext<'a> {
    pub pricer: &'a RatePricer,
    pub target_currency: String,
    pub nights: i64,
    /// Destination label used when the hotel carries no address data.
    pub location_name: Option<String>,
}

/// Flatten supplier search results into frontend hotel cards.
///
/// Picks the cheapest all-inclusive nightly rate per hotel, prefers static
/// content for name/images/address and composes every rate's display price.
pub fn transform_hotels(
    hotels: &[Value],
    ctx: &TransformContext<'_>,
    room_groups: Option<&HashMap<String, RoomGroupData>>,
) -> Vec<Value> {
    hotels
        .iter()
        .enumerate()
        .map(|(idx, hotel)| transform_hotel(hotel, idx, ctx, room_groups))
        .collect()
}

fn transform_hotel(
    hotel: &Value,
    idx: usize,
    ctx: &TransformContext<'_>,
    room_groups: Option<&HashMap<String, RoomGroupData>>,
) -> Value {
    let hotel_id = hotel["hotel_id"]
        .as_str()
        .or_else(|| hotel["id"].as_str())
        .map(str::to_string);
    let empty = Vec::new();
    let rates = hotel["rates"].as_array().unwrap_or(&empty);

    // Cheapest all-inclusive nightly price across rates, and that rate's meal
    let mut lowest_nightly = 0.0f64;
    let mut best_meal_value = "nomeal".to_string();
    let mut best_no_child_meal = false;
    for rate in rates {
        let price = ctx.pricer.compose(rate, ctx.nights, &ctx.target_currency);
        if lowest_nightly == 0.0 || price.nightly < lowest_nightly {
            lowest_nightly = price.nightly;
            let meal_data = &rate["meal_data"];
            best_meal_value = meal_data["value"]
                .as_str()
                .or_else(|| rate["meal"].as_str())
                .unwrap_or("nomeal")
                .to_string();
            best_no_child_meal = meal_data["no_child_meal"].as_bool().unwrap_or(false);
        }
    }
    let best_meal_display = meal_display_name(&best_meal_value);
    let has_breakfast = best_meal_value.to_lowercase().contains("breakfast");

    let static_info = &hotel["static_data"];

    let mut hotel_name = static_info["name"]
        .as_str()
        .or_else(|| hotel["name"].as_str())
        .map(str::to_string)
        .unwrap_or_else(|| match &hotel_id {
            Some(id) => format!("Hotel {}", id),
            None => "Unknown Hotel".to_string(),
        });
    // The supplier sometimes returns snake_case slugs as names
    if hotel_name.contains('_') {
        hotel_name = title_case(&hotel_name);
    }

    // Static content first, then the search payload, stock photos last
    let mut all_images = collect_image_urls(&static_info["images"], MAX_IMAGES_PER_HOTEL);
    if all_images.is_empty() {
        all_images = collect_image_urls(&hotel["images"], MAX_IMAGES_PER_HOTEL);
    }
    if all_images.is_empty() {
        all_images.push(FALLBACK_HOTEL_IMAGES[idx % FALLBACK_HOTEL_IMAGES.len()].to_string());
    }
    let image_url = all_images[0].clone();

    let star_rating = static_info["star_rating"]
        .as_i64()
        .or_else(|| hotel["class"].as_i64())
        .unwrap_or(3);
    let guest_rating = round1(3.5 + star_rating as f64 * 0.3);
    let review_count = 50 + (idx as i64 * 23) % 500;

    let location_name = hotel["location_name"]
        .as_str()
        .map(str::to_string)
        .or_else(|| ctx.location_name.clone())
        .unwrap_or_else(|| "Unknown Location".to_string());
    let (city, country) = derive_city_country(static_info, hotel, &location_name);
    let location_str = if !city.is_empty() && !country.is_empty() {
        format!("{}, {}", city, country)
    } else {
        static_info["address"]
            .as_str()
            .map(str::to_string)
            .unwrap_or_else(|| title_case(&location_name))
    };

    let price = round2(lowest_nightly);
    let config = ctx.pricer.config();
    let description = static_info["description"]
        .as_str()
        .or_else(|| hotel["description"].as_str())
        .map(str::to_string)
        .unwrap_or_else(|| {
            format!(
                "Experience exceptional comfort at {}. This {}-star property offers world-class amenities and a prime location for your stay.",
                hotel_name, star_rating
            )
        });

    let mut amenities = extract_amenities(rates);
    if amenities.is_empty() {
        if let Some(static_amenities) = static_info["amenities"].as_array() {
            amenities = static_amenities
                .iter()
                .filter_map(|a| a.as_str().map(str::to_string))
                .collect();
        }
    }

    json!({
        "id": hotel_id.clone().unwrap_or_else(|| format!("hotel_{}", idx)),
        "hid": hotel["hid"].clone(),
        "name": hotel_name,
        "star_rating": star_rating,
        "guest_rating": guest_rating,
        "review_count": review_count,
        "address": static_info["address"].as_str()
            .or_else(|| hotel["address"].as_str())
            .map(str::to_string)
            .unwrap_or_else(|| title_case(&location_name)),
        "city": city,
        "country": country,
        "location": location_str,
        "latitude": non_null(&static_info["latitude"], &hotel["latitude"]),
        "longitude": non_null(&static_info["longitude"], &hotel["longitude"]),
        "image": image_url,
        "images": all_images,
        "description": description,
        "price": price,
        "original_price": round2(price * config.original_price_multiplier),
        "currency": &ctx.target_currency,
        "amenities": amenities,
        "meal_plan": &best_meal_value,
        "meal_info": {
            "value": &best_meal_value,
            "display_name": best_meal_display,
            "has_breakfast": has_breakfast,
            "no_child_meal": best_no_child_meal,
        },
        "static_data": static_info,
        "discount": config.discount_percent,
        "rates": transform_rates(rates, ctx, room_groups),
    })
}

/// Transform raw supplier rates into display rates with composed pricing,
/// meal/cancellation info and optional static room enrichment.
pub fn transform_rates(
    rates: &[Value],
    ctx: &TransformContext<'_>,
    room_groups: Option<&HashMap<String, RoomGroupData>>,
) -> Vec<Value> {
    rates
        .iter()
        .take(MAX_RATES_PER_HOTEL)
        .map(|rate| transform_rate(rate, ctx, room_groups))
        .collect()
}

fn transform_rate(
    rate: &Value,
    ctx: &TransformContext<'_>,
    room_groups: Option<&HashMap<String, RoomGroupData>>,
) -> Value {
    let enriched = room_groups.map(|groups| enrich_rate_with_room_data(rate, groups, ctx.pricer));
    let rate = enriched.as_ref().unwrap_or(rate);

    let payment_options = &rate["payment_options"];
    let rate_currency = payment_options["currency_code"].as_str().unwrap_or("USD");
    let config = ctx.pricer.config();

    let price = ctx.pricer.compose(rate, ctx.nights, &ctx.target_currency);
    let included_taxes = sum_taxes(
        &payment_options["tax_data"],
        true,
        rate_currency,
        &ctx.target_currency,
        &config.conversion,
    );

    let mut tax_info = parse_taxes(
        &payment_options["tax_data"],
        &ctx.target_currency,
        &config.conversion,
    );
    // One number covering everything the guest ultimately pays in taxes:
    // marked-up included taxes plus pay-at-property fees.
    tax_info.total_all_taxes = Some(round2(
        included_taxes * (1.0 + config.commission_rate) + price.non_included_taxes,
    ));

    let meal_fallback = rate["meal"].as_str();
    let meal_info = process_meal_data(&rate["meal_data"], meal_fallback);

    let room_data = &rate["room_data_trans"];
    let room_name = rate["room_static"]["room_name"]
        .as_str()
        .filter(|name| !name.is_empty() && rate["room_static"]["matched"] == json!(true))
        .or_else(|| room_data["main_name"].as_str())
        .or_else(|| room_data["name"].as_str())
        .or_else(|| rate["room_name"].as_str())
        .or_else(|| rate["room_category"].as_str())
        .unwrap_or("Standard Room");

    let mut out = json!({
        "book_hash": rate["match_hash"].as_str().unwrap_or(""),
        "room_name": room_name,
        // ALL-INCLUSIVE nightly and total
        "price": round2(price.nightly),
        "total_price": round2(price.total),
        "currency": &ctx.target_currency,
        "meal": &meal_info.value,
        "meal_plan": &meal_info.value,
        "meal_info": {
            "value": &meal_info.value,
            "display_name": &meal_info.display_name,
            "has_breakfast": meal_info.has_breakfast,
            "no_child_meal": meal_info.no_child_meal,
            "is_fixed_count": meal_info.is_fixed_count,
            "fixed_count": meal_info.fixed_count,
        },
        "tax_info": serde_json::to_value(&tax_info).unwrap_or(Value::Null),
        "cancellation_info": serde_json::to_value(format_cancellation_policies(rate)).unwrap_or(Value::Null),
    });

    if let Some(room_static) = rate.get("room_static") {
        out["room_static"] = room_static.clone();
    }

    out
}

/// Extract up to four amenity tags from rate amenity strings.
pub fn extract_amenities(rates: &[Value]) -> Vec<String> {
    const KEYWORD_TAGS: [(&[&str], &str); 7] = [
        (&["wifi"], "wifi"),
        (&["pool", "swimming"], "pool"),
        (&["park"], "parking"),
        (&["spa"], "spa"),
        (&["restaurant", "dining"], "restaurant"),
        (&["gym", "fitness"], "gym"),
        (&["bathroom"], "bathroom"),
    ];

    let mut amenities: Vec<String> = Vec::new();
    for rate in rates {
        let Some(list) = rate["amenities_data"].as_array() else {
            continue;
        };
        for amenity in list.iter().filter_map(|a| a.as_str()) {
            let lower = amenity.to_lowercase();
            for (keywords, tag) in KEYWORD_TAGS {
                if keywords.iter().any(|kw| lower.contains(kw))
                    && !amenities.iter().any(|existing| existing == tag)
                {
                    amenities.push(tag.to_string());
                }
            }
        }
    }

    if amenities.is_empty() {
        amenities = vec!["wifi".to_string(), "parking".to_string()];
    }
    amenities.truncate(4);
    amenities
}

fn derive_city_country(static_info: &Value, hotel: &Value, location_name: &str) -> (String, String) {
    let mut city = static_info["city"]
        .as_str()
        .or_else(|| hotel["city"].as_str())
        .unwrap_or("")
        .to_string();
    let mut country = static_info["country"]
        .as_str()
        .or_else(|| hotel["country"].as_str())
        .unwrap_or("")
        .to_string();

    if city.is_empty() || country.is_empty() {
        let parts: Vec<&str> = location_name.split(',').map(str::trim).collect();
        if city.is_empty() {
            city = parts
                .first()
                .map(|s| s.to_string())
                .unwrap_or_else(|| title_case(location_name));
        }
        if country.is_empty() {
            country = match parts.last() {
                Some(last) if parts.len() > 1 => last.to_string(),
                _ => "India".to_string(),
            };
        }
    }

    (city, country)
}

fn non_null(first: &Value, second: &Value) -> Value {
    if !first.is_null() {
        first.clone()
    } else {
        second.clone()
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::PricingConfig;
    use crate::rooms::index_room_groups;

    fn ctx<'a>(pricer: &'a RatePricer, nights: i64) -> TransformContext<'a> {
        TransformContext {
            pricer,
            target_currency: "USD".to_string(),
            nights,
            location_name: Some("Paris, France".to_string()),
        }
    }

    fn sample_rate(amount: &str, meal: &str, hash: &str) -> Value {
        json!({
            "match_hash": hash,
            "meal_data": {"value": meal},
            "room_data_trans": {"main_name": "Classic Room"},
            "payment_options": {
                "currency_code": "USD",
                "payment_types": [{"amount": amount}],
                "tax_data": {"taxes": [
                    {"name": "vat", "amount": "8.00", "currency_code": "USD", "included_by_supplier": true}
                ]}
            }
        })
    }

    #[test]
    fn test_hotel_card_picks_cheapest_nightly_rate() {
        let pricer = RatePricer::new(PricingConfig::default());
        let hotels = vec![json!({
            "id": "grand_palace_hotel",
            "rates": [
                sample_rate("400.00", "breakfast", "hash_a"),
                sample_rate("200.00", "nomeal", "hash_b"),
            ]
        })];

        let cards = transform_hotels(&hotels, &ctx(&pricer, 2), None);
        let card = &cards[0];

        // 200 * 1.15 / 2 nights
        assert_eq!(card["price"], 115.0);
        assert_eq!(card["meal_plan"], "nomeal");
        assert_eq!(card["name"], "Grand Palace Hotel");
        assert_eq!(card["city"], "Paris");
        assert_eq!(card["country"], "France");
        assert_eq!(card["rates"].as_array().unwrap().len(), 2);
        assert_eq!(card["discount"], 15);
        assert_eq!(card["original_price"], 143.75);
    }

    #[test]
    fn test_hotel_card_derived_display_fields() {
        let pricer = RatePricer::new(PricingConfig::default());
        let hotels = vec![
            json!({"id": "h1", "static_data": {"star_rating": 5}, "rates": []}),
            json!({"id": "h2", "rates": []}),
        ];

        let cards = transform_hotels(&hotels, &ctx(&pricer, 1), None);
        assert_eq!(cards[0]["guest_rating"], 5.0);
        assert_eq!(cards[0]["review_count"], 50);
        // defaults to 3 stars
        assert_eq!(cards[1]["star_rating"], 3);
        assert_eq!(cards[1]["guest_rating"], 4.4);
        assert_eq!(cards[1]["review_count"], 73);
        // no imagery anywhere -> stock photo fallback
        assert!(cards[1]["image"].as_str().unwrap().contains("unsplash"));
    }

    #[test]
    fn test_transform_rate_composed_totals() {
        let pricer = RatePricer::new(PricingConfig::default());
        let rate = json!({
            "match_hash": "h_1",
            "payment_options": {
                "currency_code": "USD",
                "payment_types": [{"amount": "100.00"}],
                "tax_data": {"taxes": [
                    {"name": "vat", "amount": "10.00", "currency_code": "USD", "included_by_supplier": true},
                    {"name": "resort_fee", "amount": "20.00", "currency_code": "USD", "included_by_supplier": false}
                ]}
            }
        });

        let rates = transform_rates(&[rate], &ctx(&pricer, 2), None);
        let out = &rates[0];

        assert_eq!(out["total_price"], 135.0);
        assert_eq!(out["price"], 67.5);
        // 10 * 1.15 + 20
        assert_eq!(out["tax_info"]["total_all_taxes"], 31.5);
        assert_eq!(out["tax_info"]["summary"], "Excludes property fees");
        assert_eq!(out["room_name"], "Standard Room");
        assert_eq!(out["book_hash"], "h_1");
    }

    #[test]
    fn test_transform_rates_caps_at_twenty() {
        let pricer = RatePricer::new(PricingConfig::default());
        let rates: Vec<Value> = (0..30)
            .map(|i| sample_rate("100.00", "nomeal", &format!("hash_{}", i)))
            .collect();

        assert_eq!(transform_rates(&rates, &ctx(&pricer, 1), None).len(), 20);
    }

    #[test]
    fn test_room_group_enrichment_carries_into_rate() {
        let pricer = RatePricer::new(PricingConfig::default());
        let groups = index_room_groups(&json!([
            {"name": "Panorama Suite", "rg_ext": [{"rg": 7}], "images": ["/content/s.jpg"], "room_amenities": ["balcony"]}
        ]));

        let mut rate = sample_rate("100.00", "breakfast", "hash_rg");
        rate["rg_ext"] = json!({"rg": 7});

        let out = transform_rates(&[rate], &ctx(&pricer, 1), Some(&groups));
        assert_eq!(out[0]["room_static"]["matched"], true);
        assert_eq!(out[0]["room_name"], "Panorama Suite");
    }

    #[test]
    fn test_extract_amenities() {
        let rates = vec![json!({
            "amenities_data": ["free-wifi", "swimming-pool", "valet-parking", "luxury-spa", "rooftop-restaurant"]
        })];

        let amenities = extract_amenities(&rates);
        assert_eq!(amenities.len(), 4);
        assert!(amenities.contains(&"wifi".to_string()));
        assert!(amenities.contains(&"pool".to_string()));

        // no data -> defaults
        assert_eq!(extract_amenities(&[]), vec!["wifi", "parking"]);
    }
}

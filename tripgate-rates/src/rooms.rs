use std::collections::HashMap;

use serde_json::{json, Value};

use crate::cancellation::format_cancellation_policies;
use crate::images::collect_image_urls;
use crate::meals::process_meal_data;
use crate::pricing::RatePricer;
use crate::taxes::format_tax_name;
use crate::{round2, title_case, value_as_f64};

/// Static room-group content, indexed for the rate join.
#[derive(Debug, Clone)]
pub struct RoomGroupData {
    pub rg_key: String,
    pub name: String,
    pub name_struct: Value,
    pub images: Vec<String>,
    pub room_amenities: Vec<String>,
}

/// The join key between static room groups and dynamic rates.
///
/// Static data has NO `rg_hash` field. Both sides carry `rg_ext`, but with
/// different shapes: a static room group's `rg_ext` is an ARRAY whose
/// elements each carry an `rg` value, while a dynamic rate's `rg_ext` is an
/// OBJECT with a single `rg`. The `rg` value is the key.
fn rg_value_key(rg: &Value) -> Option<String> {
    match rg {
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        _ => None,
    }
}

/// Extract every `rg` key a static room group is registered under.
pub fn static_group_keys(room_group: &Value) -> Vec<String> {
    match &room_group["rg_ext"] {
        Value::Array(entries) => entries
            .iter()
            .filter_map(|entry| rg_value_key(&entry["rg"]))
            .collect(),
        // Occasionally rg_ext arrives as a plain object
        Value::Object(_) => rg_value_key(&room_group["rg_ext"]["rg"])
            .into_iter()
            .collect(),
        _ => Vec::new(),
    }
}

/// Extract the lookup key a dynamic rate joins with.
pub fn rate_group_key(rate: &Value) -> Option<String> {
    match &rate["rg_ext"] {
        Value::Object(_) => rg_value_key(&rate["rg_ext"]["rg"]),
        // Defensive: some API versions return rg_ext as a list
        Value::Array(entries) => entries.first().and_then(|entry| rg_value_key(&entry["rg"])),
        _ => None,
    }
}

/// Index static room groups by every rg key they answer to, so a dynamic
/// rate can be joined with a single lookup.
pub fn index_room_groups(room_groups: &Value) -> HashMap<String, RoomGroupData> {
    let mut index = HashMap::new();
    let Some(groups) = room_groups.as_array() else {
        return index;
    };

    for rg in groups {
        let images = collect_image_urls(&rg["images"], 10);
        let name = rg["name"]
            .as_str()
            .or_else(|| rg["room_name"].as_str())
            .unwrap_or("")
            .to_string();
        let room_amenities: Vec<String> = rg["room_amenities"]
            .as_array()
            .map(|list| {
                list.iter()
                    .filter_map(|a| a.as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default();

        for key in static_group_keys(rg) {
            index.insert(
                key.clone(),
                RoomGroupData {
                    rg_key: key,
                    name: name.clone(),
                    name_struct: rg["name_struct"].clone(),
                    images: images.clone(),
                    room_amenities: room_amenities.clone(),
                },
            );
        }
    }

    index
}

/// Room amenity code → display label; unknown codes fall back to Title Case.
pub fn amenity_label(code: &str) -> String {
    let label = match code.to_lowercase().as_str() {
        "air-conditioning" => "Air Conditioning",
        "wi-fi" => "Free WiFi",
        "tv" => "Television",
        "minibar" => "Minibar",
        "safe" => "In-room Safe",
        "hairdryer" => "Hair Dryer",
        "bathtub" => "Bathtub",
        "shower" => "Shower",
        "balcony" => "Balcony",
        "sea-view" => "Sea View",
        "city-view" => "City View",
        "garden-view" => "Garden View",
        "pool-view" => "Pool View",
        "mountain-view" => "Mountain View",
        "kitchen" => "Kitchen",
        "kitchenette" => "Kitchenette",
        "coffee-maker" => "Coffee Maker",
        "iron" => "Iron",
        "desk" => "Work Desk",
        "sofa" => "Sofa",
        "wardrobe" => "Wardrobe",
        "telephone" => "Telephone",
        _ => return title_case(code),
    };
    label.to_string()
}

/// Format room groups for direct frontend consumption.
pub fn format_room_groups(room_groups: &Value) -> Vec<Value> {
    let Some(groups) = room_groups.as_array() else {
        return Vec::new();
    };

    groups
        .iter()
        .map(|rg| {
            let rg_keys = static_group_keys(rg);
            let name_struct = &rg["name_struct"];

            let amenities: Vec<Value> = rg["room_amenities"]
                .as_array()
                .map(|list| {
                    list.iter()
                        .filter_map(|a| match a {
                            Value::String(code) => Some(json!({
                                "code": code,
                                "label": amenity_label(code),
                            })),
                            Value::Object(_) => Some(json!({
                                "code": a["code"].as_str().unwrap_or(""),
                                "label": a["name"].as_str().or_else(|| a["label"].as_str()).unwrap_or(""),
                            })),
                            _ => None,
                        })
                        .collect()
                })
                .unwrap_or_default();

            let rg_hash = rg_keys.first().cloned().unwrap_or_default();
            json!({
                // rg_ext_keys replaces the (non-existent) rg_hash field;
                // rg_hash is kept as an alias for consumers that still read it.
                "rg_ext_keys": rg_keys,
                "rg_hash": rg_hash,
                "name": rg["name"].as_str().or_else(|| rg["room_name"].as_str()).unwrap_or("Room"),
                "name_struct": name_struct,
                "images": collect_image_urls(&rg["images"], 10),
                "amenities": amenities,
                "bed_type": name_struct["bedding_type"].as_str().unwrap_or(""),
                "bathroom": name_struct["bathroom"].as_str().unwrap_or(""),
                "quality": name_struct["quality"].as_str().unwrap_or(""),
            })
        })
        .collect()
}

/// Enrich a dynamic rate with static room content plus the composed price,
/// tax split, cancellation and meal info. Returns a copy; the input rate is
/// left untouched.
pub fn enrich_rate_with_room_data(
    rate: &Value,
    room_groups: &HashMap<String, RoomGroupData>,
    pricer: &RatePricer,
) -> Value {
    let mut enriched = rate.clone();

    // The supplier quotes NET prices; the platform markup goes on top.
    let net_price = rate["payment_options"]["payment_types"]
        .as_array()
        .and_then(|types| types.first())
        .map(|pt| value_as_f64(&pt["amount"]))
        .unwrap_or(0.0);
    let sales_price = pricer.sales_price(net_price);
    enriched["price"] = json!(round2(sales_price));
    enriched["net_price"] = json!(net_price);
    enriched["original_price"] = json!(round2(pricer.original_price(sales_price)));

    let rg_key = rate_group_key(rate);
    let room_static = match rg_key.as_ref().and_then(|key| room_groups.get(key)) {
        Some(group) => json!({
            "matched": true,
            "rg_key": &group.rg_key,
            "room_name": &group.name,
            "images": group.images.iter().take(5).collect::<Vec<_>>(),
            "amenities": group.room_amenities.iter().take(10).collect::<Vec<_>>(),
        }),
        None => {
            // No static match, fall back to the rate's own embedded room name
            let fallback_name = rate["room_name"]
                .as_str()
                .or_else(|| rate["room_data_trans"]["main_name"].as_str())
                .unwrap_or("Room");
            json!({
                "matched": false,
                "rg_key": rg_key,
                "room_name": fallback_name,
                "images": [],
                "amenities": [],
            })
        }
    };
    enriched["room_static"] = room_static;

    // Tax split: included_by_supplier false means payable at check-in and
    // must be surfaced separately.
    let tax_data = if rate["tax_data"].is_object() {
        &rate["tax_data"]
    } else {
        &rate["payment_options"]["tax_data"]
    };
    let mut included_taxes = Vec::new();
    let mut non_included_taxes = Vec::new();
    if let Some(taxes) = tax_data["taxes"].as_array() {
        for tax in taxes {
            let name = tax["name"].as_str().unwrap_or("Tax");
            let line = json!({
                "name": name,
                "display_name": format_tax_name(name),
                "amount": tax["amount"].clone(),
                "currency_code": tax["currency_code"].as_str().unwrap_or("USD"),
                "included_by_supplier": tax["included_by_supplier"].as_bool().unwrap_or(true),
            });
            if tax["included_by_supplier"].as_bool().unwrap_or(true) {
                included_taxes.push(line);
            } else {
                non_included_taxes.push(line);
            }
        }
    }
    enriched["tax_info"] = json!({
        "included_taxes": included_taxes,
        "has_non_included_taxes": !non_included_taxes.is_empty(),
        "non_included_taxes": non_included_taxes,
    });

    enriched["cancellation_info"] =
        serde_json::to_value(format_cancellation_policies(rate)).unwrap_or(Value::Null);

    let meal_fallback = rate["meal"].as_str();
    enriched["meal_info"] =
        serde_json::to_value(process_meal_data(&rate["meal_data"], meal_fallback))
            .unwrap_or(Value::Null);

    enriched
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::PricingConfig;

    fn static_groups() -> Value {
        json!([
            {
                "name": "Deluxe Double Room",
                "name_struct": {"bedding_type": "double bed", "bathroom": "private bathroom", "quality": "deluxe"},
                "rg_ext": [{"rg": 17}, {"rg": 42}],
                "images": ["/content/1/room.jpg"],
                "room_amenities": ["wi-fi", "minibar", "sea-view"]
            },
            {
                "name": "Standard Twin Room",
                "rg_ext": [{"rg": 99}],
                "images": [],
                "room_amenities": []
            }
        ])
    }

    #[test]
    fn test_index_registers_every_rg_key() {
        let index = index_room_groups(&static_groups());
        assert_eq!(index.len(), 3);
        assert_eq!(index.get("17").unwrap().name, "Deluxe Double Room");
        assert_eq!(index.get("42").unwrap().name, "Deluxe Double Room");
        assert_eq!(index.get("99").unwrap().name, "Standard Twin Room");
    }

    #[test]
    fn test_rate_joins_via_rg_ext_object() {
        let index = index_room_groups(&static_groups());
        let rate = json!({
            "rg_ext": {"rg": 42},
            "payment_options": {"payment_types": [{"amount": "100.00"}], "currency_code": "USD"}
        });

        let enriched =
            enrich_rate_with_room_data(&rate, &index, &RatePricer::new(PricingConfig::default()));

        assert_eq!(enriched["room_static"]["matched"], true);
        assert_eq!(enriched["room_static"]["room_name"], "Deluxe Double Room");
        assert_eq!(enriched["room_static"]["rg_key"], "42");
        assert_eq!(enriched["price"], 115.0);
        assert_eq!(enriched["net_price"], 100.0);
        assert_eq!(enriched["original_price"], 143.75);
    }

    #[test]
    fn test_unmatched_rate_falls_back_to_embedded_name() {
        let index = index_room_groups(&static_groups());
        let rate = json!({
            "rg_ext": {"rg": 1234},
            "room_data_trans": {"main_name": "Junior Suite"},
            "payment_options": {"payment_types": [{"amount": "80.00"}]}
        });

        let enriched =
            enrich_rate_with_room_data(&rate, &index, &RatePricer::new(PricingConfig::default()));

        assert_eq!(enriched["room_static"]["matched"], false);
        assert_eq!(enriched["room_static"]["room_name"], "Junior Suite");
    }

    #[test]
    fn test_tax_split_in_enriched_rate() {
        let rate = json!({
            "tax_data": {
                "taxes": [
                    {"name": "vat", "amount": "10.00", "currency_code": "USD", "included_by_supplier": true},
                    {"name": "city_tax", "amount": "4.00", "currency_code": "EUR", "included_by_supplier": false}
                ]
            },
            "payment_options": {"payment_types": [{"amount": "50.00"}]}
        });

        let enriched = enrich_rate_with_room_data(
            &rate,
            &HashMap::new(),
            &RatePricer::new(PricingConfig::default()),
        );

        assert_eq!(enriched["tax_info"]["has_non_included_taxes"], true);
        assert_eq!(enriched["tax_info"]["included_taxes"][0]["display_name"], "VAT");
        assert_eq!(
            enriched["tax_info"]["non_included_taxes"][0]["display_name"],
            "City Tax"
        );
    }

    #[test]
    fn test_format_room_groups_exposes_keys_and_alias() {
        let formatted = format_room_groups(&static_groups());
        assert_eq!(formatted[0]["rg_ext_keys"], json!(["17", "42"]));
        assert_eq!(formatted[0]["rg_hash"], "17");
        assert_eq!(formatted[0]["bed_type"], "double bed");
        assert_eq!(formatted[0]["amenities"][0]["label"], "Free WiFi");
        assert_eq!(formatted[1]["rg_hash"], "99");
    }

    #[test]
    fn test_amenity_label_fallback() {
        assert_eq!(amenity_label("wi-fi"), "Free WiFi");
        assert_eq!(amenity_label("heated-floor"), "Heated Floor");
    }
}

use serde_json::{json, Map, Value};

use crate::title_case;

/// Display buckets the frontend renders, in order.
const CATEGORIES: [&str; 18] = [
    "check_in_out",
    "early_late",
    "children",
    "pets",
    "payments",
    "internet",
    "parking",
    "meals",
    "extra_beds",
    "mandatory_fees",
    "optional_fees",
    "shuttle",
    "smoking",
    "age_restriction",
    "visa",
    "no_show",
    "special",
    "other",
];

/// Keyword fragments routing metapolicy_extra_info categories to display
/// buckets. First match wins.
const EXTRA_INFO_MAP: [(&str, &str, &str); 37] = [
    ("child", "children", "fa-child"),
    ("kid", "children", "fa-child"),
    ("pet", "pets", "fa-paw"),
    ("animal", "pets", "fa-paw"),
    ("internet", "internet", "fa-wifi"),
    ("wifi", "internet", "fa-wifi"),
    ("wi-fi", "internet", "fa-wifi"),
    ("parking", "parking", "fa-parking"),
    ("garage", "parking", "fa-parking"),
    ("payment", "payments", "fa-credit-card"),
    ("deposit", "payments", "fa-credit-card"),
    ("card", "payments", "fa-credit-card"),
    ("cash", "payments", "fa-credit-card"),
    ("meal", "meals", "fa-utensils"),
    ("breakfast", "meals", "fa-utensils"),
    ("lunch", "meals", "fa-utensils"),
    ("dinner", "meals", "fa-utensils"),
    ("food", "meals", "fa-utensils"),
    ("resort_fee", "mandatory_fees", "fa-dollar-sign"),
    ("facility_fee", "mandatory_fees", "fa-dollar-sign"),
    ("mandatory", "mandatory_fees", "fa-dollar-sign"),
    ("tax", "mandatory_fees", "fa-dollar-sign"),
    ("tourist", "mandatory_fees", "fa-dollar-sign"),
    ("city_tax", "mandatory_fees", "fa-dollar-sign"),
    ("optional", "optional_fees", "fa-money-bill-wave"),
    ("extra_charge", "optional_fees", "fa-money-bill-wave"),
    ("surcharge", "optional_fees", "fa-money-bill-wave"),
    ("service_charge", "optional_fees", "fa-money-bill-wave"),
    ("extra_fee", "optional_fees", "fa-money-bill-wave"),
    ("special", "special", "fa-info-circle"),
    ("instruction", "special", "fa-info-circle"),
    ("notice", "special", "fa-info-circle"),
    ("important", "special", "fa-info-circle"),
    ("shuttle", "shuttle", "fa-shuttle-van"),
    ("transfer", "shuttle", "fa-shuttle-van"),
    ("smoking", "smoking", "fa-smoking-ban"),
    ("smoke", "smoking", "fa-smoking-ban"),
];

/// Trailing entries checked after the primary map (age/visa/no-show/beds
/// share fragments with other keys, so they come last).
const EXTRA_INFO_MAP_TAIL: [(&str, &str, &str); 7] = [
    ("age", "age_restriction", "fa-id-card"),
    ("visa", "visa", "fa-passport"),
    ("no_show", "no_show", "fa-calendar-times"),
    ("noshow", "no_show", "fa-calendar-times"),
    ("bed", "extra_beds", "fa-bed"),
    ("cot", "extra_beds", "fa-bed"),
    ("crib", "extra_beds", "fa-bed"),
];

/// Normalize raw hotel policy data into user-facing display rows.
///
/// Parses `metapolicy_struct` (structured policy blocks) and
/// `metapolicy_extra_info`. Extra info mirrors the supplier's "Extra info"
/// hotel-page section and may include taxes/fees not included in the booking
/// price, so every category is surfaced. `policy_struct` is deprecated
/// upstream and is ignored entirely.
pub fn format_hotel_policies(policies: &Value) -> Value {
    let mut formatted = Map::new();
    formatted.insert(
        "check_in_time".to_string(),
        policies["check_in_time"].clone(),
    );
    formatted.insert(
        "check_out_time".to_string(),
        policies["check_out_time"].clone(),
    );
    for category in CATEGORIES {
        formatted.insert(category.to_string(), json!([]));
    }

    if let Some(time) = policies["check_in_time"].as_str() {
        push_row(&mut formatted, "check_in_out", "fa-sign-in-alt", "Check-in Time", time);
    }
    if let Some(time) = policies["check_out_time"].as_str() {
        push_row(&mut formatted, "check_in_out", "fa-sign-out-alt", "Check-out Time", time);
    }

    let metapolicy = &policies["metapolicy_struct"];
    if metapolicy.is_object() {
        format_metapolicy_struct(metapolicy, &mut formatted);
    }

    // When the property says nothing about early/late, show the standard ask
    if formatted["early_late"].as_array().is_some_and(|rows| rows.is_empty()) {
        push_row(
            &mut formatted,
            "early_late",
            "fa-clock",
            "Early Check-in",
            "Subject to availability - Contact hotel directly",
        );
        push_row(
            &mut formatted,
            "early_late",
            "fa-clock",
            "Late Check-out",
            "Subject to availability - Contact hotel directly",
        );
    }

    format_extra_info(&policies["metapolicy_extra_info"], &mut formatted);

    Value::Object(formatted)
}

fn format_metapolicy_struct(metapolicy: &Value, formatted: &mut Map<String, Value>) {
    // Early check-in
    for key in ["check_in", "early_check_in"] {
        format_time_window(
            &metapolicy[key],
            "Early Check-in",
            "From",
            &["time", "from"],
            formatted,
        );
    }
    // Late check-out
    for key in ["check_out", "late_check_out"] {
        format_time_window(
            &metapolicy[key],
            "Late Check-out",
            "Until",
            &["time", "until"],
            formatted,
        );
    }

    parse_policy_list(&metapolicy["children"], "fa-child", "Children Policy", "children", formatted);

    // Pets
    let pets = &metapolicy["pets"];
    if pets.is_object() {
        if let Some(allowed) = pets["pets_allowed"].as_bool().or_else(|| pets["allowed"].as_bool()) {
            let value = if allowed { "Pets Allowed" } else { "No Pets Allowed" };
            push_row(formatted, "pets", "fa-paw", "Pets", value);
        }
        if !pets["fee"].is_null() {
            push_row(formatted, "pets", "fa-money-bill", "Pet Fee", &scalar_string(&pets["fee"]));
        }
        if !pets["type"].is_null() {
            push_row(formatted, "pets", "fa-paw", "Pet Types", &scalar_string(&pets["type"]));
        }
    } else {
        parse_policy_list(pets, "fa-paw", "Pets Policy", "pets", formatted);
    }

    // Internet / WiFi
    let internet = &metapolicy["internet"];
    if let Some(items) = internet.as_array() {
        for item in items {
            if item.is_object() {
                let mut parts = Vec::new();
                if let Some(itype) = item["type"].as_str().or_else(|| item["internet_type"].as_str()) {
                    parts.push(title_case(itype));
                }
                let inclusion = &item["inclusion"];
                if is_included(inclusion) || is_included(&item["included_in_price"]) {
                    parts.push("Included in price".to_string());
                } else if is_surcharge(inclusion) {
                    match item["price"].as_str().map(str::to_string).or_else(|| {
                        item["price"].as_f64().map(|p| p.to_string())
                    }) {
                        Some(price) => parts.push(
                            format!(
                                "Fee: {} {} {}",
                                price,
                                item["currency"].as_str().unwrap_or(""),
                                item["price_unit"].as_str().unwrap_or("")
                            )
                            .trim()
                            .to_string(),
                        ),
                        None => parts.push("Available at extra charge".to_string()),
                    }
                }
                if let Some(area) = item["work_area"].as_str().filter(|a| !a.is_empty()) {
                    parts.push(format!("Available in: {}", area));
                }
                let value = if parts.is_empty() {
                    item.to_string()
                } else {
                    parts.join(" · ")
                };
                push_row(formatted, "internet", "fa-wifi", "Internet", &value);
            } else {
                push_row(formatted, "internet", "fa-wifi", "Internet", &scalar_string(item));
            }
        }
    } else {
        parse_policy_list(internet, "fa-wifi", "Internet", "internet", formatted);
    }

    parse_policy_list(&metapolicy["parking"], "fa-parking", "Parking", "parking", formatted);

    // Deposit / payment
    let deposit = &metapolicy["deposit"];
    if deposit.is_object() {
        let mut parts = Vec::new();
        if let Some(avail) = deposit["availability"].as_str() {
            parts.push(title_case(avail));
        }
        if let Some(dtype) = deposit["type"].as_str() {
            parts.push(format!("Type: {}", dtype));
        }
        if let Some(ptype) = deposit["payment_type"].as_str() {
            parts.push(format!("Payment: {}", ptype));
        }
        if !deposit["price"].is_null() {
            parts.push(
                format!(
                    "Amount: {} {} {}",
                    scalar_string(&deposit["price"]),
                    deposit["currency"].as_str().unwrap_or(""),
                    deposit["price_unit"].as_str().unwrap_or("")
                )
                .trim()
                .to_string(),
            );
        }
        let value = if parts.is_empty() {
            "Deposit required".to_string()
        } else {
            parts.join(" · ")
        };
        push_row(formatted, "payments", "fa-credit-card", "Deposit", &value);
    } else {
        parse_policy_list(deposit, "fa-credit-card", "Deposit", "payments", formatted);
    }

    // Accepted card brands
    let card = &metapolicy["card"];
    if let Some(cards) = card.as_array() {
        let brands: Vec<String> = cards.iter().map(scalar_string).collect();
        if !brands.is_empty() {
            push_row(formatted, "payments", "fa-credit-card", "Accepted Cards", &brands.join(", "));
        }
    } else {
        parse_policy_list(card, "fa-credit-card", "Accepted Cards", "payments", formatted);
    }

    // Meals
    let meal = &metapolicy["meal"];
    if let Some(items) = meal.as_array() {
        for item in items {
            if item.is_object() {
                let mut parts = Vec::new();
                if let Some(mtype) = item["type"].as_str().or_else(|| item["meal_type"].as_str()) {
                    parts.push(title_case(mtype));
                }
                if is_included(&item["inclusion"]) || is_included(&item["included_in_price"]) {
                    parts.push("Included in price".to_string());
                } else if !item["price"].is_null() {
                    parts.push(
                        format!(
                            "{} {} per person",
                            scalar_string(&item["price"]),
                            item["currency"].as_str().unwrap_or("")
                        )
                        .trim()
                        .to_string(),
                    );
                }
                let value = if parts.is_empty() {
                    item.to_string()
                } else {
                    parts.join(" · ")
                };
                push_row(formatted, "meals", "fa-utensils", "Meals", &value);
            } else {
                push_row(formatted, "meals", "fa-utensils", "Meals", &scalar_string(item));
            }
        }
    } else {
        parse_policy_list(meal, "fa-utensils", "Meals", "meals", formatted);
    }

    // add_fee: extra beds, cots, rollaways, cribs
    let add_fee = &metapolicy["add_fee"];
    if let Some(items) = add_fee.as_array() {
        for item in items {
            if item.is_object() {
                let label = item["type"]
                    .as_str()
                    .map(title_case)
                    .unwrap_or_else(|| "Extra Bed".to_string());
                let mut parts = Vec::new();
                if is_included(&item["inclusion"]) || is_included(&item["included_in_price"]) {
                    parts.push("Included in price".to_string());
                } else if !item["price"].is_null() {
                    parts.push(
                        format!(
                            "{} {} {}",
                            scalar_string(&item["price"]),
                            item["currency"].as_str().unwrap_or(""),
                            item["price_unit"].as_str().unwrap_or("")
                        )
                        .trim()
                        .to_string(),
                    );
                }
                if !item["max_age"].is_null() {
                    parts.push(format!("Max age: {}", scalar_string(&item["max_age"])));
                }
                let value = if parts.is_empty() {
                    "Available on request".to_string()
                } else {
                    parts.join(" · ")
                };
                push_row(formatted, "extra_beds", "fa-bed", &label, &value);
            } else {
                push_row(formatted, "extra_beds", "fa-bed", "Extra Bed/Cot", &scalar_string(item));
            }
        }
    } else {
        parse_policy_list(add_fee, "fa-bed", "Extra Beds / Cots", "extra_beds", formatted);
    }

    parse_policy_list(&metapolicy["shuttle"], "fa-shuttle-van", "Shuttle Service", "shuttle", formatted);

    // Smoking
    let smoking = &metapolicy["smoking"];
    if let Some(allowed) = smoking.as_bool() {
        let value = if allowed {
            "Allowed"
        } else {
            "Not allowed (smoke-free property)"
        };
        push_row(formatted, "smoking", "fa-smoking-ban", "Smoking", value);
    } else {
        parse_policy_list(smoking, "fa-smoking-ban", "Smoking Policy", "smoking", formatted);
    }

    // Age restriction
    let age = if !metapolicy["age_restriction"].is_null() {
        &metapolicy["age_restriction"]
    } else {
        &metapolicy["minimum_age"]
    };
    if age.is_object() {
        let min_age = if !age["min_age"].is_null() {
            &age["min_age"]
        } else {
            &age["minimum_age"]
        };
        if !min_age.is_null() {
            push_row(
                formatted,
                "age_restriction",
                "fa-id-card",
                "Minimum Check-in Age",
                &format!("{} years old", scalar_string(min_age)),
            );
        }
    } else if !age.is_null() {
        push_row(
            formatted,
            "age_restriction",
            "fa-id-card",
            "Minimum Check-in Age",
            &format!("{} years old", scalar_string(age)),
        );
    }

    // Visa / entry requirements
    let visa = &metapolicy["visa"];
    if let Some(available) = visa.as_bool() {
        let value = if available { "Available" } else { "Not available" };
        push_row(formatted, "visa", "fa-passport", "Visa On Arrival", value);
    } else {
        parse_policy_list(visa, "fa-passport", "Visa / Entry", "visa", formatted);
    }

    parse_policy_list(&metapolicy["no_show"], "fa-calendar-times", "No-show Policy", "no_show", formatted);
}

/// Early check-in / late check-out blocks share a shape: a time bound, an
/// availability flag and an optional fee.
fn format_time_window(
    block: &Value,
    label: &str,
    bound_word: &str,
    time_keys: &[&str],
    formatted: &mut Map<String, Value>,
) {
    if block.is_null() {
        return;
    }

    if block.is_object() {
        let mut parts = Vec::new();
        for key in time_keys {
            if let Some(time) = block[*key].as_str() {
                parts.push(format!("{} {}", bound_word, time));
                break;
            }
        }
        let avail = if !block["available"].is_null() {
            &block["available"]
        } else {
            &block["possibility"]
        };
        match avail.as_bool() {
            Some(true) => parts.push("Available upon request".to_string()),
            Some(false) => parts.push("Not available".to_string()),
            None => {}
        }
        let fee = if !block["fee"].is_null() {
            &block["fee"]
        } else {
            &block["price"]
        };
        if !fee.is_null() {
            parts.push(format!("Fee: {}", scalar_string(fee)));
        }
        let value = if parts.is_empty() {
            "Subject to availability".to_string()
        } else {
            parts.join(" - ")
        };
        push_row(formatted, "early_late", "fa-clock", label, &value);
    } else if let Some(text) = block.as_str() {
        push_row(formatted, "early_late", "fa-clock", label, text);
    }
}

fn format_extra_info(extra_info: &Value, formatted: &mut Map<String, Value>) {
    // extra_info can be a dict or a list of dicts
    let mut items: Vec<(String, Value)> = Vec::new();
    match extra_info {
        Value::Object(map) => {
            for (k, v) in map {
                items.push((k.clone(), v.clone()));
            }
        }
        Value::Array(entries) => {
            for entry in entries {
                match entry {
                    Value::Object(map) => {
                        for (k, v) in map {
                            items.push((k.clone(), v.clone()));
                        }
                    }
                    other => items.push(("Extra Info".to_string(), other.clone())),
                }
            }
        }
        _ => return,
    }

    for (category, info) in items {
        if info.is_null() {
            continue;
        }
        let (target, icon) = route_extra_info(&category);
        let label = title_case(&category);

        match info {
            Value::Array(entries) => {
                for item in entries {
                    let text = match &item {
                        Value::Object(_) => item["text"]
                            .as_str()
                            .or_else(|| item["description"].as_str())
                            .or_else(|| item["value"].as_str())
                            .map(str::to_string)
                            .unwrap_or_else(|| item.to_string()),
                        other => scalar_string(other),
                    };
                    push_row(formatted, target, icon, &label, &text);
                }
            }
            Value::Object(map) => {
                for (sub_key, sub_val) in map {
                    push_row(
                        formatted,
                        target,
                        icon,
                        &format!("{} - {}", label, title_case(&sub_key)),
                        &scalar_string(&sub_val),
                    );
                }
            }
            other => push_row(formatted, target, icon, &label, &scalar_string(&other)),
        }
    }
}

fn route_extra_info(category: &str) -> (&'static str, &'static str) {
    let lower = category.to_lowercase();
    for (keyword, target, icon) in EXTRA_INFO_MAP.iter().chain(EXTRA_INFO_MAP_TAIL.iter()) {
        if lower.contains(keyword) {
            return (target, icon);
        }
    }
    ("other", "fa-info-circle")
}

/// Append a list/dict/scalar policy block to a display bucket.
fn parse_policy_list(
    items: &Value,
    icon: &str,
    label: &str,
    category: &str,
    formatted: &mut Map<String, Value>,
) {
    match items {
        Value::Array(entries) => {
            for item in entries {
                if let Value::Object(_) = item {
                    let text = item["text"]
                        .as_str()
                        .or_else(|| item["description"].as_str())
                        .or_else(|| item["price"].as_str())
                        .map(str::to_string)
                        .unwrap_or_else(|| item.to_string());
                    // Enrich with structured sub-fields when available
                    let mut parts = Vec::new();
                    for key in [
                        "inclusion",
                        "type",
                        "availability",
                        "price",
                        "currency",
                        "price_unit",
                        "work_area",
                        "from",
                        "until",
                        "max_age",
                    ] {
                        if !item[key].is_null() {
                            parts.push(format!("{}: {}", title_case(key), scalar_string(&item[key])));
                        }
                    }
                    let value = if parts.is_empty() { text } else { parts.join("; ") };
                    push_row(formatted, category, icon, label, &value);
                } else {
                    push_row(formatted, category, icon, label, &scalar_string(item));
                }
            }
        }
        Value::Object(map) => {
            for (k, v) in map {
                push_row(
                    formatted,
                    category,
                    icon,
                    &format!("{} - {}", label, title_case(k)),
                    &scalar_string(v),
                );
            }
        }
        Value::String(text) => push_row(formatted, category, icon, label, text),
        Value::Bool(flag) => {
            let value = if *flag { "Yes" } else { "No" };
            push_row(formatted, category, icon, label, value);
        }
        _ => {}
    }
}

fn push_row(formatted: &mut Map<String, Value>, category: &str, icon: &str, label: &str, value: &str) {
    if let Some(rows) = formatted.get_mut(category).and_then(Value::as_array_mut) {
        rows.push(json!({"icon": icon, "label": label, "value": value}));
    }
}

/// Inclusion markers arrive as booleans or as strings ("included"/"surcharge").
fn is_included(value: &Value) -> bool {
    match value {
        Value::Bool(flag) => *flag,
        Value::String(s) => matches!(s.to_lowercase().as_str(), "included" | "true" | "1"),
        _ => false,
    }
}

fn is_surcharge(value: &Value) -> bool {
    match value {
        Value::Bool(flag) => !*flag,
        Value::String(s) => matches!(s.to_lowercase().as_str(), "surcharge" | "false" | "0"),
        _ => false,
    }
}

fn scalar_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Bool(true) => "True".to_string(),
        Value::Bool(false) => "False".to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_in_out_rows() {
        let formatted = format_hotel_policies(&json!({
            "check_in_time": "14:00",
            "check_out_time": "12:00",
        }));

        let rows = formatted["check_in_out"].as_array().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["label"], "Check-in Time");
        assert_eq!(rows[0]["value"], "14:00");
        assert_eq!(formatted["check_in_time"], "14:00");
    }

    #[test]
    fn test_early_late_defaults_when_absent() {
        let formatted = format_hotel_policies(&json!({}));
        let rows = formatted["early_late"].as_array().unwrap();
        assert_eq!(rows.len(), 2);
        assert!(rows[0]["value"].as_str().unwrap().contains("Subject to availability"));
    }

    #[test]
    fn test_metapolicy_internet_and_pets() {
        let formatted = format_hotel_policies(&json!({
            "metapolicy_struct": {
                "internet": [
                    {"type": "wifi", "inclusion": "included", "work_area": "lobby"},
                    {"type": "wired_internet", "inclusion": "surcharge", "price": "5", "currency": "EUR", "price_unit": "per day"}
                ],
                "pets": {"pets_allowed": false}
            }
        }));

        let internet = formatted["internet"].as_array().unwrap();
        assert_eq!(internet.len(), 2);
        assert_eq!(internet[0]["value"], "Wifi · Included in price · Available in: lobby");
        assert!(internet[1]["value"].as_str().unwrap().contains("Fee: 5 EUR per day"));

        let pets = formatted["pets"].as_array().unwrap();
        assert_eq!(pets[0]["value"], "No Pets Allowed");
    }

    #[test]
    fn test_metapolicy_extra_beds_and_smoking() {
        let formatted = format_hotel_policies(&json!({
            "metapolicy_struct": {
                "add_fee": [
                    {"type": "extra_bed", "price": "10", "currency": "USD", "price_unit": "per night", "max_age": 12}
                ],
                "smoking": false
            }
        }));

        let beds = formatted["extra_beds"].as_array().unwrap();
        assert_eq!(beds[0]["label"], "Extra Bed");
        assert!(beds[0]["value"].as_str().unwrap().contains("Max age: 12"));

        let smoking = formatted["smoking"].as_array().unwrap();
        assert_eq!(smoking[0]["value"], "Not allowed (smoke-free property)");
    }

    #[test]
    fn test_extra_info_keyword_routing() {
        let formatted = format_hotel_policies(&json!({
            "metapolicy_extra_info": {
                "resort_fee_details": "USD 25 per night, paid at the property",
                "pet_policy": ["Small dogs only"],
                "random_note": "Renovation works in the west wing"
            }
        }));

        let fees = formatted["mandatory_fees"].as_array().unwrap();
        assert_eq!(fees[0]["label"], "Resort Fee Details");
        assert!(fees[0]["value"].as_str().unwrap().contains("USD 25"));

        let pets = formatted["pets"].as_array().unwrap();
        assert_eq!(pets[0]["value"], "Small dogs only");

        let other = formatted["other"].as_array().unwrap();
        assert_eq!(other[0]["label"], "Random Note");
    }

    #[test]
    fn test_extra_info_as_list_of_dicts() {
        let formatted = format_hotel_policies(&json!({
            "metapolicy_extra_info": [
                {"city_tax": "EUR 2.50 per person per night"}
            ]
        }));

        let fees = formatted["mandatory_fees"].as_array().unwrap();
        assert_eq!(fees[0]["value"], "EUR 2.50 per person per night");
    }

    #[test]
    fn test_early_check_in_window() {
        let formatted = format_hotel_policies(&json!({
            "metapolicy_struct": {
                "check_in": {"time": "10:00", "available": true, "fee": "20 USD"}
            }
        }));

        let rows = formatted["early_late"].as_array().unwrap();
        assert_eq!(rows[0]["label"], "Early Check-in");
        assert_eq!(rows[0]["value"], "From 10:00 - Available upon request - Fee: 20 USD");
    }
}

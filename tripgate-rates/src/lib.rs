pub mod cancellation;
pub mod currency;
pub mod images;
pub mod meals;
pub mod policies;
pub mod pricing;
pub mod rooms;
pub mod taxes;
pub mod transform;

pub use cancellation::{format_cancellation_policies, CancellationInfo};
pub use currency::ConversionTable;
pub use meals::{process_meal_data, MealInfo};
pub use pricing::{PricingConfig, RatePricer};
pub use taxes::TaxBreakdown;
pub use transform::{transform_hotels, transform_rates, TransformContext};

/// Read a supplier numeric field that may arrive as a JSON number or a string
/// (the inventory API serializes money amounts as strings).
pub(crate) fn value_as_f64(value: &serde_json::Value) -> f64 {
    match value {
        serde_json::Value::Number(n) => n.as_f64().unwrap_or(0.0),
        serde_json::Value::String(s) => s.parse().unwrap_or(0.0),
        _ => 0.0,
    }
}

/// Round to two decimal places for display amounts.
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// snake_case / kebab-case → Title Case for display labels.
pub(crate) fn title_case(raw: &str) -> String {
    raw.replace(['_', '-'], " ")
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_value_as_f64_handles_strings_and_numbers() {
        assert_eq!(value_as_f64(&json!("123.45")), 123.45);
        assert_eq!(value_as_f64(&json!(99)), 99.0);
        assert_eq!(value_as_f64(&json!(null)), 0.0);
        assert_eq!(value_as_f64(&json!("not a number")), 0.0);
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("city_tax"), "City Tax");
        assert_eq!(title_case("breakfast-buffet"), "Breakfast Buffet");
        assert_eq!(title_case("grand_palace_hotel"), "Grand Palace Hotel");
    }
}

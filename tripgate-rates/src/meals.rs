use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::title_case;

/// Meal-plan display info attached to every rate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MealInfo {
    pub code: String,
    /// Alias matching the supplier's meal_data.value field name.
    pub value: String,
    pub display_name: String,
    pub has_breakfast: bool,
    pub no_child_meal: bool,
    pub includes_child: bool,
    pub is_fixed_count: bool,
    pub fixed_count: Option<u32>,
}

/// Supplier meal code → display label.
pub fn meal_display_name(code: &str) -> String {
    let label = match code {
        "all-inclusive" => "All Inclusive",
        "breakfast" => "Breakfast Included",
        "breakfast-buffet" => "Breakfast Buffet",
        "continental-breakfast" => "Continental Breakfast",
        "dinner" => "Dinner Included",
        "full-board" => "Full Board (All Meals)",
        "half-board" => "Half Board (Breakfast & Dinner)",
        "half-board-lunch" => "Half Board (Breakfast & Lunch)",
        "half-board-dinner" => "Half Board (Breakfast & Dinner)",
        "lunch" => "Lunch Included",
        "nomeal" => "Room Only (No Meals)",
        "some-meal" => "Some Meals Included",
        "english-breakfast" => "English Breakfast",
        "american-breakfast" => "American Breakfast",
        "asian-breakfast" => "Asian Breakfast",
        "chinese-breakfast" => "Chinese Breakfast",
        "israeli-breakfast" => "Israeli Breakfast",
        "japanese-breakfast" => "Japanese Breakfast",
        "scandinavian-breakfast" => "Scandinavian Breakfast",
        "scottish-breakfast" => "Scottish Breakfast",
        "breakfast-for-1" => "Breakfast for 1 Guest",
        "breakfast-for-2" => "Breakfast for 2 Guests",
        "super-all-inclusive" => "Super All Inclusive",
        "soft-all-inclusive" => "Soft All Inclusive",
        "ultra-all-inclusive" => "Ultra All Inclusive",
        _ => return title_case(code),
    };
    label.to_string()
}

/// Meal plans that cover a fixed number of guests rather than the whole room.
pub fn fixed_count_for(code: &str) -> Option<u32> {
    match code {
        "breakfast-for-1" => Some(1),
        "breakfast-for-2" => Some(2),
        _ => None,
    }
}

/// Build meal info from a rate's meal_data block.
///
/// meal_data replaces the supplier's legacy flat `meal` field; the caller
/// should fall back to that field for the code when meal_data is absent.
pub fn process_meal_data(meal_data: &Value, fallback_code: Option<&str>) -> MealInfo {
    let code = meal_data["value"]
        .as_str()
        .or(fallback_code)
        .unwrap_or("nomeal")
        .to_string();
    let has_breakfast = meal_data["has_breakfast"].as_bool().unwrap_or(false);
    let no_child_meal = meal_data["no_child_meal"].as_bool().unwrap_or(false);
    let fixed_count = fixed_count_for(&code);

    MealInfo {
        value: code.clone(),
        display_name: meal_display_name(&code),
        has_breakfast,
        no_child_meal,
        includes_child: !no_child_meal,
        is_fixed_count: fixed_count.is_some(),
        fixed_count,
        code,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_known_meal_codes() {
        assert_eq!(meal_display_name("breakfast-buffet"), "Breakfast Buffet");
        assert_eq!(meal_display_name("nomeal"), "Room Only (No Meals)");
        assert_eq!(meal_display_name("ultra-all-inclusive"), "Ultra All Inclusive");
    }

    #[test]
    fn test_unknown_meal_code_falls_back_to_title_case() {
        assert_eq!(meal_display_name("vegan-dinner-buffet"), "Vegan Dinner Buffet");
    }

    #[test]
    fn test_fixed_count_meals() {
        let info = process_meal_data(&json!({"value": "breakfast-for-2"}), None);
        assert!(info.is_fixed_count);
        assert_eq!(info.fixed_count, Some(2));
        assert_eq!(info.display_name, "Breakfast for 2 Guests");
    }

    #[test]
    fn test_child_meal_flags() {
        let info = process_meal_data(
            &json!({"value": "breakfast", "has_breakfast": true, "no_child_meal": true}),
            None,
        );
        assert!(info.has_breakfast);
        assert!(info.no_child_meal);
        assert!(!info.includes_child);
    }

    #[test]
    fn test_fallback_to_legacy_meal_field() {
        let info = process_meal_data(&json!({}), Some("half-board"));
        assert_eq!(info.code, "half-board");
        assert_eq!(info.display_name, "Half Board (Breakfast & Dinner)");
    }

    #[test]
    fn test_defaults_to_room_only() {
        let info = process_meal_data(&json!({}), None);
        assert_eq!(info.code, "nomeal");
        assert!(!info.has_breakfast);
        assert!(info.includes_child);
    }
}

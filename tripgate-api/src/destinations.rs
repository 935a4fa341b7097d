/// Destinations the search box matches before falling back to the supplier's
/// multicomplete. The sandbox environment only carries live inventory for a
/// handful of cities; the rest route to the places-provider fallback until
/// production credentials are active.
pub struct Destination {
    pub key: &'static str,
    pub name: &'static str,
    pub latitude: f64,
    pub longitude: f64,
    pub region_id: i64,
    pub sandbox: bool,
}

pub static POPULAR_DESTINATIONS: [Destination; 24] = [
    // Sandbox-supported destinations (real inventory available)
    Destination { key: "paris", name: "Paris", latitude: 48.8566, longitude: 2.3522, region_id: 2734, sandbox: true },
    Destination { key: "dubai", name: "Dubai", latitude: 25.2048, longitude: 55.2708, region_id: 6053839, sandbox: true },
    Destination { key: "moscow", name: "Moscow", latitude: 55.7558, longitude: 37.6173, region_id: 2395, sandbox: true },
    // Indian destinations (production region ids; sandbox returns empty)
    Destination { key: "goa", name: "Goa", latitude: 15.2993, longitude: 74.1240, region_id: 6308855, sandbox: false },
    Destination { key: "delhi", name: "New Delhi", latitude: 28.6139, longitude: 77.2090, region_id: 6308838, sandbox: false },
    Destination { key: "mumbai", name: "Mumbai", latitude: 19.0760, longitude: 72.8777, region_id: 6308862, sandbox: false },
    Destination { key: "bangalore", name: "Bangalore", latitude: 12.9716, longitude: 77.5946, region_id: 6308822, sandbox: false },
    Destination { key: "bengaluru", name: "Bangalore", latitude: 12.9716, longitude: 77.5946, region_id: 6308822, sandbox: false },
    Destination { key: "chennai", name: "Chennai", latitude: 13.0827, longitude: 80.2707, region_id: 6308834, sandbox: false },
    Destination { key: "kolkata", name: "Kolkata", latitude: 22.5726, longitude: 88.3639, region_id: 6308856, sandbox: false },
    Destination { key: "jaipur", name: "Jaipur", latitude: 26.9124, longitude: 75.7873, region_id: 6308849, sandbox: false },
    Destination { key: "udaipur", name: "Udaipur", latitude: 24.5854, longitude: 73.7125, region_id: 6308883, sandbox: false },
    Destination { key: "agra", name: "Agra", latitude: 27.1767, longitude: 78.0081, region_id: 6308815, sandbox: false },
    Destination { key: "hyderabad", name: "Hyderabad", latitude: 17.3850, longitude: 78.4867, region_id: 6308846, sandbox: false },
    Destination { key: "pune", name: "Pune", latitude: 18.5204, longitude: 73.8567, region_id: 6308870, sandbox: false },
    Destination { key: "kerala", name: "Kerala", latitude: 10.8505, longitude: 76.2711, region_id: 6308854, sandbox: false },
    Destination { key: "kochi", name: "Kochi", latitude: 9.9312, longitude: 76.2673, region_id: 6308855, sandbox: false },
    Destination { key: "manali", name: "Manali", latitude: 32.2396, longitude: 77.1887, region_id: 6308859, sandbox: false },
    Destination { key: "shimla", name: "Shimla", latitude: 31.1048, longitude: 77.1734, region_id: 6308876, sandbox: false },
    Destination { key: "rishikesh", name: "Rishikesh", latitude: 30.0869, longitude: 78.2676, region_id: 6308872, sandbox: false },
    Destination { key: "varanasi", name: "Varanasi", latitude: 25.3176, longitude: 82.9739, region_id: 6308885, sandbox: false },
    Destination { key: "amritsar", name: "Amritsar", latitude: 31.6340, longitude: 74.8723, region_id: 6308818, sandbox: false },
    Destination { key: "darjeeling", name: "Darjeeling", latitude: 27.0410, longitude: 88.2663, region_id: 6308837, sandbox: false },
    Destination { key: "ooty", name: "Ooty", latitude: 11.4102, longitude: 76.6950, region_id: 6308866, sandbox: false },
];

/// Match a free-form destination string against the table. Either side may
/// contain the other ("new delhi" matches "delhi", "goa" matches "north goa").
pub fn match_destination(destination: &str) -> Option<&'static Destination> {
    let needle = destination.to_lowercase();
    let needle = needle.trim();
    POPULAR_DESTINATIONS
        .iter()
        .find(|d| needle.contains(d.key) || d.key.contains(needle))
}

/// Fallback suggestions for the autocomplete endpoint when the maps provider
/// is not configured.
pub static FALLBACK_CITY_SUGGESTIONS: [(&str, &str, &str); 5] = [
    ("Mumbai, Maharashtra, India", "Mumbai", "Maharashtra, India"),
    ("Delhi, India", "Delhi", "India"),
    ("Dubai, United Arab Emirates", "Dubai", "United Arab Emirates"),
    ("Paris, France", "Paris", "France"),
    ("London, United Kingdom", "London", "United Kingdom"),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_match() {
        let dest = match_destination("Paris").unwrap();
        assert_eq!(dest.region_id, 2734);
        assert!(dest.sandbox);
    }

    #[test]
    fn test_substring_match_both_directions() {
        // query contains key
        assert_eq!(match_destination("North Goa, India").unwrap().name, "Goa");
        // key contains query
        assert_eq!(match_destination("bengalur").unwrap().name, "Bangalore");
    }

    #[test]
    fn test_no_match() {
        assert!(match_destination("Atlantis").is_none());
    }

    #[test]
    fn test_non_sandbox_flag() {
        assert!(!match_destination("mumbai").unwrap().sandbox);
    }
}

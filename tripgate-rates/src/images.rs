use serde_json::Value;

/// Supplier CDN base for relative image paths.
const CDN_BASE: &str = "https://cdn.worldota.net/t/";
/// Size slug substituted into templated URLs: crop/WIDTHxHEIGHT crops to fit.
const IMG_SIZE: &str = "crop/640x400";

/// Stock photos used when a hotel comes back with no imagery at all.
pub const FALLBACK_HOTEL_IMAGES: [&str; 6] = [
    "https://images.unsplash.com/photo-1566073771259-6a8506099945?w=600",
    "https://images.unsplash.com/photo-1520250497591-112f2f40a3f4?w=600",
    "https://images.unsplash.com/photo-1571896349842-33c89424de2d?w=600",
    "https://images.unsplash.com/photo-1582719508461-905c673771fd?w=600",
    "https://images.unsplash.com/photo-1564501049412-61c2a3083791?w=600",
    "https://images.unsplash.com/photo-1551882547-ff40c63fe5fa?w=600",
];

/// Normalize a supplier image URL.
///
/// Handles the `{size}` placeholder, CDN-relative paths ("/content/...jpg")
/// and bare object keys, all of which appear in static data.
pub fn process_image_url(raw: &str) -> Option<String> {
    let url = raw.trim();
    if url.is_empty() {
        return None;
    }

    let mut url = url.replace("{size}", IMG_SIZE);

    if url.starts_with('/') {
        url = format!("{}{}{}", CDN_BASE, IMG_SIZE, url);
    } else if !url.starts_with("http") {
        url = format!("{}{}/{}", CDN_BASE, IMG_SIZE, url);
    }

    Some(url)
}

/// Collect up to `limit` processed image URLs from a supplier image list.
/// Entries can be plain strings or objects carrying `url`/`src`.
pub fn collect_image_urls(images: &Value, limit: usize) -> Vec<String> {
    let Some(list) = images.as_array() else {
        return Vec::new();
    };

    list.iter()
        .take(limit)
        .filter_map(|img| match img {
            Value::String(s) => process_image_url(s),
            Value::Object(_) => img["url"]
                .as_str()
                .or_else(|| img["src"].as_str())
                .and_then(process_image_url),
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_size_placeholder_replacement() {
        let url = process_image_url("https://cdn.worldota.net/t/{size}/content/abc.jpg").unwrap();
        assert_eq!(url, "https://cdn.worldota.net/t/crop/640x400/content/abc.jpg");
    }

    #[test]
    fn test_relative_path_gets_cdn_base() {
        let url = process_image_url("/content/12345/abcdef.jpg").unwrap();
        assert_eq!(
            url,
            "https://cdn.worldota.net/t/crop/640x400/content/12345/abcdef.jpg"
        );
    }

    #[test]
    fn test_bare_key_gets_base_and_separator() {
        let url = process_image_url("content/12345/abcdef.jpg").unwrap();
        assert!(url.starts_with("https://cdn.worldota.net/t/crop/640x400/"));
    }

    #[test]
    fn test_empty_url_rejected() {
        assert_eq!(process_image_url("   "), None);
    }

    #[test]
    fn test_collect_mixed_entries() {
        let images = json!([
            "/content/1/a.jpg",
            {"url": "/content/2/b.jpg"},
            {"src": "/content/3/c.jpg"},
            42,
            {"other": "x"}
        ]);

        let urls = collect_image_urls(&images, 10);
        assert_eq!(urls.len(), 3);
        assert!(urls.iter().all(|u| u.starts_with("https://")));
    }

    #[test]
    fn test_collect_respects_limit() {
        let images = json!(["/a.jpg", "/b.jpg", "/c.jpg"]);
        assert_eq!(collect_image_urls(&images, 2).len(), 2);
    }
}

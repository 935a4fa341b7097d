use chrono::Utc;
use uuid::Uuid;

/// Generate a unique supplier-facing order id, e.g. "TG-20260201143000-9F3A1C2B".
pub fn generate_partner_order_id() -> String {
    format!(
        "TG-{}-{}",
        Utc::now().format("%Y%m%d%H%M%S"),
        Uuid::new_v4().simple().to_string()[..8].to_uppercase()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partner_order_id_shape() {
        let id = generate_partner_order_id();
        let parts: Vec<&str> = id.split('-').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "TG");
        assert_eq!(parts[1].len(), 14);
        assert!(parts[1].chars().all(|c| c.is_ascii_digit()));
        assert_eq!(parts[2].len(), 8);
        assert!(parts[2].chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));
    }

    #[test]
    fn test_partner_order_ids_are_unique() {
        assert_ne!(generate_partner_order_id(), generate_partner_order_id());
    }
}

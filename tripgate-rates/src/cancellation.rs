use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::value_as_f64;

const SUPPLIER_TIMESTAMP: &str = "%Y-%m-%dT%H:%M:%S";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FreeCancellationDeadline {
    /// e.g. "21 Oct 2025"
    pub date: String,
    /// e.g. "08:59"
    pub time: String,
    /// e.g. "21 Oct 2025, 08:59 (UTC+0)"
    pub datetime: String,
    pub raw: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PolicyKind {
    Free,
    PartialPenalty,
    FullPenalty,
    Unknown,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CancellationPolicy {
    #[serde(rename = "type")]
    pub kind: PolicyKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_formatted: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_formatted: Option<String>,
    /// Penalty shown to the guest.
    pub penalty_amount: String,
    /// Penalty the supplier charges the platform.
    pub penalty_amount_internal: String,
    pub currency: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CancellationInfo {
    pub is_free_cancellation: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub free_cancellation_before: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub free_cancellation_formatted: Option<FreeCancellationDeadline>,
    pub policies: Vec<CancellationPolicy>,
    pub summary: String,
    pub currency_code: String,
}

/// Parse and format a rate's cancellation penalties.
///
/// The supplier places `cancellation_penalties` under `payment_options` on
/// search/hotel-page rates, but at the rate top level in some prebook
/// payloads; both shapes are accepted. All deadlines are UTC+0 and the
/// formatted strings say so explicitly.
pub fn format_cancellation_policies(rate: &Value) -> CancellationInfo {
    let currency_code = rate["payment_options"]["currency_code"]
        .as_str()
        .or_else(|| rate["currency_code"].as_str())
        .unwrap_or("USD")
        .to_string();

    let penalties = {
        let nested = &rate["payment_options"]["cancellation_penalties"];
        if nested.is_object() {
            nested
        } else {
            &rate["cancellation_penalties"]
        }
    };

    let mut info = CancellationInfo {
        is_free_cancellation: false,
        free_cancellation_before: None,
        free_cancellation_formatted: None,
        policies: Vec::new(),
        summary: "Non-refundable".to_string(),
        currency_code,
    };

    if !penalties.is_object() {
        return info;
    }

    if let Some(deadline) = penalties["free_cancellation_before"].as_str() {
        info.is_free_cancellation = true;
        info.free_cancellation_before = Some(deadline.to_string());

        let trimmed = deadline.trim_end_matches('Z');
        match NaiveDateTime::parse_from_str(trimmed, SUPPLIER_TIMESTAMP) {
            Ok(dt) => {
                info.free_cancellation_formatted = Some(FreeCancellationDeadline {
                    date: dt.format("%d %b %Y").to_string(),
                    time: dt.format("%H:%M").to_string(),
                    datetime: dt.format("%d %b %Y, %H:%M (UTC+0)").to_string(),
                    raw: deadline.to_string(),
                });
                info.summary =
                    format!("Free cancellation until {} (UTC+0)", dt.format("%d %b %Y, %H:%M"));
            }
            Err(_) => {
                // Unparseable timestamp, surface the raw value
                info.free_cancellation_formatted = Some(FreeCancellationDeadline {
                    date: deadline.to_string(),
                    time: String::new(),
                    datetime: format!("{} (UTC+0)", deadline),
                    raw: deadline.to_string(),
                });
                info.summary = format!("Free cancellation until {} (UTC+0)", deadline);
            }
        }
    }

    if let Some(raw_policies) = penalties["policies"].as_array() {
        for policy in raw_policies {
            info.policies.push(format_policy_tier(policy, &info.currency_code));
        }
    }

    info
}

fn format_policy_tier(policy: &Value, currency: &str) -> CancellationPolicy {
    let start_at = policy["start_at"].as_str();
    let end_at = policy["end_at"].as_str();
    let amount_charge = policy["amount_charge"].as_str().unwrap_or("0.00").to_string();
    let amount_show = policy["amount_show"]
        .as_str()
        .map(str::to_string)
        .unwrap_or_else(|| amount_charge.clone());

    let kind = if value_as_f64(&Value::String(amount_show.clone())) == 0.0 {
        PolicyKind::Free
    } else if start_at.is_some() {
        if end_at.is_none() {
            PolicyKind::FullPenalty
        } else {
            PolicyKind::PartialPenalty
        }
    } else {
        // No window start but a non-zero charge: the penalty always applies
        PolicyKind::FullPenalty
    };

    CancellationPolicy {
        kind,
        start_formatted: start_at.and_then(format_tier_timestamp),
        end_formatted: end_at.and_then(format_tier_timestamp),
        penalty_amount: amount_show,
        penalty_amount_internal: amount_charge,
        currency: currency.to_string(),
    }
}

fn format_tier_timestamp(raw: &str) -> Option<String> {
    NaiveDateTime::parse_from_str(raw.trim_end_matches('Z'), SUPPLIER_TIMESTAMP)
        .ok()
        .map(|dt| dt.format("%d %b %Y %H:%M (UTC+0)").to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rate_with_penalties(penalties: Value) -> Value {
        json!({
            "payment_options": {
                "currency_code": "USD",
                "cancellation_penalties": penalties
            }
        })
    }

    #[test]
    fn test_free_cancellation_formatting() {
        let rate = rate_with_penalties(json!({
            "free_cancellation_before": "2025-10-21T08:59:00",
            "policies": []
        }));

        let info = format_cancellation_policies(&rate);
        assert!(info.is_free_cancellation);
        let formatted = info.free_cancellation_formatted.unwrap();
        assert_eq!(formatted.date, "21 Oct 2025");
        assert_eq!(formatted.time, "08:59");
        assert_eq!(formatted.datetime, "21 Oct 2025, 08:59 (UTC+0)");
        assert_eq!(info.summary, "Free cancellation until 21 Oct 2025, 08:59 (UTC+0)");
    }

    #[test]
    fn test_non_refundable_rate() {
        let info = format_cancellation_policies(&rate_with_penalties(json!({
            "policies": [
                {"start_at": null, "end_at": null, "amount_charge": "150.00", "amount_show": "150.00"}
            ]
        })));

        assert!(!info.is_free_cancellation);
        assert_eq!(info.summary, "Non-refundable");
        assert_eq!(info.policies[0].kind, PolicyKind::FullPenalty);
    }

    #[test]
    fn test_policy_tier_classification() {
        let info = format_cancellation_policies(&rate_with_penalties(json!({
            "free_cancellation_before": "2025-10-21T08:59:00",
            "policies": [
                {"start_at": null, "end_at": "2025-10-21T08:59:00", "amount_charge": "0.00", "amount_show": "0.00"},
                {"start_at": "2025-10-21T08:59:00", "end_at": "2025-10-23T08:59:00", "amount_charge": "50.00", "amount_show": "57.50"},
                {"start_at": "2025-10-23T08:59:00", "end_at": null, "amount_charge": "100.00", "amount_show": "115.00"}
            ]
        })));

        assert_eq!(info.policies[0].kind, PolicyKind::Free);
        assert_eq!(info.policies[1].kind, PolicyKind::PartialPenalty);
        assert_eq!(info.policies[2].kind, PolicyKind::FullPenalty);
        assert_eq!(info.policies[1].penalty_amount, "57.50");
        assert_eq!(info.policies[1].penalty_amount_internal, "50.00");
        assert_eq!(
            info.policies[1].start_formatted.as_deref(),
            Some("21 Oct 2025 08:59 (UTC+0)")
        );
    }

    #[test]
    fn test_top_level_penalties_shape() {
        // Prebook payloads carry cancellation_penalties at the rate root
        let rate = json!({
            "currency_code": "EUR",
            "cancellation_penalties": {
                "free_cancellation_before": "2026-01-05T18:00:00"
            }
        });

        let info = format_cancellation_policies(&rate);
        assert!(info.is_free_cancellation);
        assert_eq!(info.currency_code, "EUR");
    }

    #[test]
    fn test_missing_penalties() {
        let info = format_cancellation_policies(&json!({"payment_options": {}}));
        assert!(!info.is_free_cancellation);
        assert!(info.policies.is_empty());
        assert_eq!(info.summary, "Non-refundable");
    }
}

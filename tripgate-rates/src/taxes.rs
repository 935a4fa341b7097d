use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::currency::ConversionTable;
use crate::{round2, title_case, value_as_f64};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaxLine {
    pub name: String,
    pub amount: f64,
    pub currency: String,
    pub included: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_amount: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_currency: Option<String>,
}

/// Frontend-facing tax breakdown for a rate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaxBreakdown {
    pub total_included: f64,
    /// Included taxes marked up like the rest of the collected amount, plus
    /// property fees. Set by the rate transform.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_all_taxes: Option<f64>,
    pub currency: String,
    pub included_taxes: Vec<TaxLine>,
    pub non_included_taxes: Vec<TaxLine>,
    pub all_included: bool,
    pub summary: String,
}

impl TaxBreakdown {
    pub fn empty(target_currency: &str) -> Self {
        Self {
            total_included: 0.0,
            total_all_taxes: None,
            currency: target_currency.to_string(),
            included_taxes: Vec::new(),
            non_included_taxes: Vec::new(),
            all_included: true,
            summary: format!("Includes {} 0 taxes", target_currency),
        }
    }
}

/// Sum the taxes of one inclusion class, converted into the target currency.
pub fn sum_taxes(
    tax_data: &Value,
    included_by_supplier: bool,
    rate_currency: &str,
    target_currency: &str,
    conversion: &ConversionTable,
) -> f64 {
    let Some(taxes) = tax_data["taxes"].as_array() else {
        return 0.0;
    };

    taxes
        .iter()
        .filter(|tax| tax["included_by_supplier"].as_bool().unwrap_or(true) == included_by_supplier)
        .map(|tax| {
            let amount = value_as_f64(&tax["amount"]);
            let source = tax["currency_code"].as_str().unwrap_or(rate_currency);
            conversion.convert(amount, source, target_currency)
        })
        .sum()
}

/// Parse a rate's tax data into the display breakdown.
///
/// Included taxes are converted into the target currency for the price
/// breakdown. Taxes the supplier does not collect are payable at the property
/// and must be shown in their original currency and amount, so they are never
/// converted.
pub fn parse_taxes(
    tax_data: &Value,
    target_currency: &str,
    conversion: &ConversionTable,
) -> TaxBreakdown {
    let Some(taxes) = tax_data["taxes"].as_array().filter(|t| !t.is_empty()) else {
        return TaxBreakdown::empty(target_currency);
    };

    let mut included_taxes = Vec::new();
    let mut non_included_taxes = Vec::new();
    let mut total_included = 0.0;
    let mut all_included = true;

    for tax in taxes {
        let is_included = tax["included_by_supplier"].as_bool().unwrap_or(true);
        let amount = value_as_f64(&tax["amount"]);
        let currency = tax["currency_code"].as_str().unwrap_or("USD");
        let name = format_tax_name(tax["name"].as_str().unwrap_or("Tax"));

        if is_included {
            let converted = conversion.convert(amount, currency, target_currency);
            included_taxes.push(TaxLine {
                name,
                amount: round2(converted),
                currency: target_currency.to_string(),
                included: true,
                original_amount: Some(amount),
                original_currency: Some(currency.to_string()),
            });
            total_included += converted;
        } else {
            all_included = false;
            non_included_taxes.push(TaxLine {
                name,
                amount,
                currency: currency.to_string(),
                included: false,
                original_amount: None,
                original_currency: None,
            });
        }
    }

    let summary = if all_included {
        format!("Includes {} {} taxes", target_currency, round2(total_included))
    } else {
        "Excludes property fees".to_string()
    };

    TaxBreakdown {
        total_included: round2(total_included),
        total_all_taxes: None,
        currency: target_currency.to_string(),
        included_taxes,
        non_included_taxes,
        all_included,
        summary,
    }
}

/// User-facing tax name: keeps common abbreviations upper-case, otherwise
/// converts snake/kebab case to Title Case.
pub fn format_tax_name(raw: &str) -> String {
    match raw.to_lowercase().as_str() {
        "vat" => "VAT".to_string(),
        "gst" => "GST".to_string(),
        "tds" => "TDS".to_string(),
        _ => title_case(raw),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_format_tax_name() {
        assert_eq!(format_tax_name("vat"), "VAT");
        assert_eq!(format_tax_name("VAT"), "VAT");
        assert_eq!(format_tax_name("city_tax"), "City Tax");
        assert_eq!(format_tax_name("electricity_fee"), "Electricity Fee");
    }

    #[test]
    fn test_non_included_taxes_keep_original_currency() {
        let tax_data = json!({
            "taxes": [
                {"name": "vat", "amount": "5.00", "currency_code": "USD", "included_by_supplier": true},
                {"name": "city_tax", "amount": "3.50", "currency_code": "EUR", "included_by_supplier": false}
            ]
        });

        let breakdown = parse_taxes(&tax_data, "INR", &ConversionTable::default());

        assert!(!breakdown.all_included);
        assert_eq!(breakdown.summary, "Excludes property fees");
        // included converted into INR
        assert_eq!(breakdown.included_taxes[0].amount, 432.5);
        assert_eq!(breakdown.included_taxes[0].currency, "INR");
        assert_eq!(breakdown.included_taxes[0].original_amount, Some(5.0));
        // non-included untouched, still EUR
        assert_eq!(breakdown.non_included_taxes[0].amount, 3.5);
        assert_eq!(breakdown.non_included_taxes[0].currency, "EUR");
    }

    #[test]
    fn test_empty_tax_data() {
        let breakdown = parse_taxes(&json!({}), "USD", &ConversionTable::default());
        assert!(breakdown.all_included);
        assert!(breakdown.included_taxes.is_empty());
        assert_eq!(breakdown.total_included, 0.0);
    }

    #[test]
    fn test_sum_taxes_filters_by_inclusion() {
        let tax_data = json!({
            "taxes": [
                {"name": "vat", "amount": "5.00", "included_by_supplier": true},
                {"name": "resort_fee", "amount": "12.00", "included_by_supplier": false},
                {"name": "service_fee", "amount": "3.00", "included_by_supplier": false}
            ]
        });
        let conversion = ConversionTable::default();

        assert_eq!(sum_taxes(&tax_data, true, "USD", "USD", &conversion), 5.0);
        assert_eq!(sum_taxes(&tax_data, false, "USD", "USD", &conversion), 15.0);
    }
}

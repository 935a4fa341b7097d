use serde_json::Value;

use crate::currency::ConversionTable;
use crate::taxes;
use crate::value_as_f64;

/// Commission and display-price configuration.
#[derive(Debug, Clone)]
pub struct PricingConfig {
    /// Markup applied to the amount the platform collects (net + included taxes).
    pub commission_rate: f64,

    /// Multiplier for the struck-through "original" price shown next to the
    /// selling price.
    pub original_price_multiplier: f64,

    /// Discount badge percentage shown on hotel cards.
    pub discount_percent: i64,

    pub conversion: ConversionTable,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            commission_rate: 0.15,
            original_price_multiplier: 1.25,
            discount_percent: 15,
            conversion: ConversionTable::default(),
        }
    }
}

/// Composed display price for one rate.
#[derive(Debug, Clone, PartialEq)]
pub struct ComposedPrice {
    /// Grand total: commissioned supplier total plus pay-at-property fees.
    pub total: f64,
    /// Grand total divided across the stay's nights.
    pub nightly: f64,
    /// Supplier total before markup (net + included taxes).
    pub supplier_total: f64,
    /// Sum of taxes not included by the supplier, in the target currency.
    pub non_included_taxes: f64,
}

/// Applies the commission/tax composition rules to raw supplier rates.
pub struct RatePricer {
    config: PricingConfig,
}

impl RatePricer {
    pub fn new(config: PricingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PricingConfig {
        &self.config
    }

    /// Compose the all-inclusive display price for a rate.
    ///
    /// The supplier total (net + taxes it collects) takes the commission
    /// markup; taxes payable at the property are added on top unmarked, so the
    /// guest sees one grand total but the platform only margins what it
    /// actually collects.
    pub fn compose(&self, rate: &Value, nights: i64, target_currency: &str) -> ComposedPrice {
        let payment_options = &rate["payment_options"];
        let rate_currency = payment_options["currency_code"].as_str().unwrap_or("USD");

        let supplier_total = payment_options["payment_types"]
            .as_array()
            .and_then(|types| types.first())
            .map(|pt| value_as_f64(&pt["amount"]))
            .unwrap_or(0.0);

        let non_included_taxes = taxes::sum_taxes(
            &payment_options["tax_data"],
            false,
            rate_currency,
            target_currency,
            &self.config.conversion,
        );

        let total = supplier_total * (1.0 + self.config.commission_rate) + non_included_taxes;
        let nightly = total / nights.max(1) as f64;

        ComposedPrice {
            total,
            nightly,
            supplier_total,
            non_included_taxes,
        }
    }

    /// Selling price for a single net amount (used by the room-group
    /// enrichment path, which reports net and marked-up prices side by side).
    pub fn sales_price(&self, net: f64) -> f64 {
        net * (1.0 + self.config.commission_rate)
    }

    /// Struck-through comparison price derived from the selling price.
    pub fn original_price(&self, sales_price: f64) -> f64 {
        sales_price * self.config.original_price_multiplier
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::round2;
    use serde_json::json;

    fn rate_with(total: &str, taxes: Value) -> Value {
        json!({
            "payment_options": {
                "currency_code": "USD",
                "payment_types": [{"amount": total}],
                "tax_data": {"taxes": taxes}
            }
        })
    }

    #[test]
    fn test_commission_applied_to_supplier_total_only() {
        let pricer = RatePricer::new(PricingConfig::default());
        // 100 supplier total, 20 resort fee paid at the property
        let rate = rate_with(
            "100.00",
            json!([
                {"name": "vat", "amount": "10.00", "included_by_supplier": true, "currency_code": "USD"},
                {"name": "resort_fee", "amount": "20.00", "included_by_supplier": false, "currency_code": "USD"}
            ]),
        );

        let price = pricer.compose(&rate, 2, "USD");
        // 100 * 1.15 + 20 = 135, not (100 + 20) * 1.15
        assert_eq!(round2(price.total), 135.0);
        assert_eq!(round2(price.nightly), 67.5);
        assert_eq!(price.supplier_total, 100.0);
        assert_eq!(price.non_included_taxes, 20.0);
    }

    #[test]
    fn test_zero_nights_does_not_divide_by_zero() {
        let pricer = RatePricer::new(PricingConfig::default());
        let rate = rate_with("100.00", json!([]));

        let price = pricer.compose(&rate, 0, "USD");
        assert_eq!(price.nightly, price.total);
    }

    #[test]
    fn test_non_included_taxes_converted_into_target_currency() {
        let pricer = RatePricer::new(PricingConfig::default());
        let rate = rate_with(
            "100.00",
            json!([
                {"name": "city_tax", "amount": "2.00", "included_by_supplier": false, "currency_code": "USD"}
            ]),
        );

        let price = pricer.compose(&rate, 1, "INR");
        // fee converted at 86.5, supplier total left as requested from the API
        assert_eq!(price.non_included_taxes, 173.0);
        assert_eq!(round2(price.total), 288.0);
    }

    #[test]
    fn test_missing_payment_types() {
        let pricer = RatePricer::new(PricingConfig::default());
        let rate = json!({"payment_options": {}});

        let price = pricer.compose(&rate, 3, "USD");
        assert_eq!(price.total, 0.0);
        assert_eq!(price.nightly, 0.0);
    }

    #[test]
    fn test_sales_and_original_price() {
        let pricer = RatePricer::new(PricingConfig::default());
        let sales = pricer.sales_price(200.0);
        assert_eq!(round2(sales), 230.0);
        assert_eq!(round2(pricer.original_price(sales)), 287.5);
    }
}

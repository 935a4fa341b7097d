use serde::{Deserialize, Serialize};

/// Fixed conversion rates into INR used for display-price composition.
///
/// Search requests ask the supplier for the user's currency, but tax lines can
/// still arrive denominated in the rate's own currency; those get converted
/// here before entering the price breakdown.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionTable {
    pub usd_to_inr: f64,
    pub eur_to_inr: f64,
    pub gbp_to_inr: f64,
}

impl Default for ConversionTable {
    fn default() -> Self {
        Self {
            usd_to_inr: 86.5,
            eur_to_inr: 92.0,
            gbp_to_inr: 108.0,
        }
    }
}

impl ConversionTable {
    /// Convert an amount between currencies. Only conversions into INR are
    /// supported; any other pair passes through unchanged.
    pub fn convert(&self, amount: f64, from: &str, to: &str) -> f64 {
        if from == to || to != "INR" {
            return amount;
        }
        match from {
            "USD" => amount * self.usd_to_inr,
            "EUR" => amount * self.eur_to_inr,
            "GBP" => amount * self.gbp_to_inr,
            _ => amount,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_usd_to_inr() {
        let table = ConversionTable::default();
        assert_eq!(table.convert(10.0, "USD", "INR"), 865.0);
    }

    #[test]
    fn test_same_currency_passthrough() {
        let table = ConversionTable::default();
        assert_eq!(table.convert(42.0, "USD", "USD"), 42.0);
    }

    #[test]
    fn test_non_inr_target_passthrough() {
        let table = ConversionTable::default();
        assert_eq!(table.convert(42.0, "USD", "EUR"), 42.0);
    }

    #[test]
    fn test_unknown_source_passthrough() {
        let table = ConversionTable::default();
        assert_eq!(table.convert(42.0, "AED", "INR"), 42.0);
    }
}

//! Pricing extraction
//!
//! Four labeled currency lookups plus a looser "total" fallback. Amounts
//! are kept exactly as they appear on the page, never reformatted.

use super::{first_capture, Pricing};

pub fn extract_pricing(text: &str) -> Pricing {
    let mut pricing = Pricing::default();

    if let Some(amount) = first_capture(text, r"(?i)initial\s*price[:\s]*\$?([\d,]+\.?\d*)") {
        pricing.initial_price = dollars(&amount);
    }

    if let Some(amount) = first_capture(text, r"(?i)fuel\s*surcharge[:\s]*\$?([\d,]+\.?\d*)") {
        pricing.fuel_surcharge = dollars(&amount);
    }

    if let Some(amount) = first_capture(text, r"(?i)extra\s*charges?[:\s]*\$?([\d,]+\.?\d*)") {
        pricing.extra_charges = dollars(&amount);
    }

    if let Some(amount) = first_capture(text, r"(?i)total\s*estimate[:\s]*\$?([\d,]+\.?\d*)") {
        pricing.total_estimate = dollars(&amount);
    } else if let Some(amount) = first_capture(text, r"(?i)total[:\s]*\$?([\d,]+\.?\d*)") {
        pricing.total_estimate = dollars(&amount);
    }

    pricing
}

fn dollars(amount: &str) -> String {
    format!("${amount}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_estimate_is_kept_verbatim() {
        let pricing = extract_pricing("Total Estimate: $1,234.56");
        assert_eq!(pricing.total_estimate, "$1,234.56");
    }

    #[test]
    fn test_dollar_sign_added_when_missing() {
        let pricing = extract_pricing("Initial Price: 450.00");
        assert_eq!(pricing.initial_price, "$450.00");
    }

    #[test]
    fn test_loose_total_fallback() {
        let pricing = extract_pricing("Grand Total $999.99");
        assert_eq!(pricing.total_estimate, "$999.99");
    }

    #[test]
    fn test_total_estimate_preferred_over_loose_total() {
        let pricing = extract_pricing("Total 100.00 and Total Estimate: 200.00");
        assert_eq!(pricing.total_estimate, "$200.00");
    }

    #[test]
    fn test_all_four_charges() {
        let text = "Initial Price: $500.00 Fuel Surcharge: 50.25 Extra Charge: $10 Total Estimate: 560.25";
        let pricing = extract_pricing(text);

        assert_eq!(pricing.initial_price, "$500.00");
        assert_eq!(pricing.fuel_surcharge, "$50.25");
        assert_eq!(pricing.extra_charges, "$10");
        assert_eq!(pricing.total_estimate, "$560.25");
    }

    #[test]
    fn test_missing_labels_stay_empty() {
        let pricing = extract_pricing("nothing to see");
        assert_eq!(pricing, Pricing::default());
    }
}

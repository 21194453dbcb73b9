//! Monetary normalization and the total-price rule.
//!
//! The extraction microservice returns monetary fields as loosely typed JSON
//! (numbers or Brazilian-locale strings like `"1.234,56"`), so parsing takes
//! a raw [`serde_json::Value`].

use serde_json::Value;

/// Normalize a loosely typed monetary value to a number.
///
/// - Numbers pass through unchanged.
/// - Strings are read as Brazilian locale: thousands separator `.` is
///   stripped, decimal separator `,` becomes `.`.
/// - Anything else (absent, unparseable, wrong type) is `0.0`.
pub fn parse_number(value: Option<&Value>) -> f64 {
    match value {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => {
            let normalized = s.replace('.', "").replace(',', ".");
            normalized.trim().parse().unwrap_or(0.0)
        }
        _ => 0.0,
    }
}

/// Format a currency amount with exactly two decimal places.
pub fn format_brl(value: f64) -> String {
    format!("{value:.2}")
}

/// Recompute an order's total from shipping and unit price.
///
/// An update always overwrites any client-supplied total with
/// `frete + valorUnitario`, taking each component from the update when
/// supplied and from the stored order (or 0) otherwise.
pub fn recompute_total(
    new_frete: Option<f64>,
    new_valor_unitario: Option<f64>,
    current_frete: Option<f64>,
    current_valor_unitario: Option<f64>,
) -> f64 {
    let frete = new_frete.or(current_frete).unwrap_or(0.0);
    let valor_unitario = new_valor_unitario.or(current_valor_unitario).unwrap_or(0.0);
    frete + valor_unitario
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parse_number_handles_brazilian_locale_strings() {
        assert_eq!(parse_number(Some(&json!("1.234,56"))), 1234.56);
        assert_eq!(parse_number(Some(&json!("89,90"))), 89.90);
        assert_eq!(parse_number(Some(&json!("150"))), 150.0);
    }

    #[test]
    fn parse_number_passes_numbers_through() {
        assert_eq!(parse_number(Some(&json!(42))), 42.0);
        assert_eq!(parse_number(Some(&json!(19.99))), 19.99);
    }

    #[test]
    fn parse_number_defaults_to_zero() {
        assert_eq!(parse_number(None), 0.0);
        assert_eq!(parse_number(Some(&json!("abc"))), 0.0);
        assert_eq!(parse_number(Some(&json!(null))), 0.0);
        assert_eq!(parse_number(Some(&json!(["10"]))), 0.0);
    }

    #[test]
    fn format_brl_uses_two_decimals() {
        assert_eq!(format_brl(35.0), "35.00");
        assert_eq!(format_brl(1234.5), "1234.50");
        assert_eq!(format_brl(0.555), "0.56");
    }

    #[test]
    fn total_prefers_supplied_values() {
        // Stored values are irrelevant when the update supplies both.
        assert_eq!(
            recompute_total(Some(10.0), Some(25.0), Some(99.0), Some(99.0)),
            35.0
        );
    }

    #[test]
    fn total_falls_back_to_stored_values() {
        assert_eq!(recompute_total(None, None, Some(10.0), Some(25.0)), 35.0);
        assert_eq!(recompute_total(Some(5.0), None, Some(10.0), Some(25.0)), 30.0);
    }

    #[test]
    fn total_treats_missing_components_as_zero() {
        assert_eq!(recompute_total(None, None, None, None), 0.0);
        assert_eq!(recompute_total(None, Some(12.5), None, None), 12.5);
    }
}

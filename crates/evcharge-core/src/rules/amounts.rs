//! Numeric quantities: energy, power, cost, percentages and range.

use std::str::FromStr;

use rust_decimal::Decimal;

use super::patterns::{COST, KW, KWH, MILES, PERCENT};

/// Parse a displayed number such as `$1,234.50` or ` 16.7 `.
pub fn parse_decimal(s: &str) -> Option<Decimal> {
    let cleaned: String = s
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    Decimal::from_str(&cleaned).ok()
}

/// First `N kWh` quantity.
pub fn extract_kwh(text: &str) -> Option<Decimal> {
    KWH.captures(text).and_then(|c| parse_decimal(&c[1]))
}

/// First `N kW` rating; `kWh` quantities are skipped.
pub fn extract_kw_rating(text: &str) -> Option<Decimal> {
    KW.captures(text).and_then(|c| parse_decimal(&c[1]))
}

/// First dollar amount.
pub fn extract_cost(text: &str) -> Option<Decimal> {
    COST.captures(text).and_then(|c| parse_decimal(&c[1]))
}

/// First `N%` value.
pub fn extract_percentage(text: &str) -> Option<u32> {
    PERCENT.captures(text).and_then(|c| c[1].parse().ok())
}

/// Range added, written as `(+86 mi)`.
pub fn extract_miles(text: &str) -> Option<u32> {
    MILES.captures(text).and_then(|c| c[1].parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_parse_decimal() {
        assert_eq!(parse_decimal("$1,234.50"), Some(dec("1234.50")));
        assert_eq!(parse_decimal(" 16.7 "), Some(dec("16.7")));
        assert_eq!(parse_decimal("n/a"), None);
        assert_eq!(parse_decimal("1.2.3"), None);
    }

    #[test]
    fn test_kw_is_not_kwh() {
        let text = "Energy 22.4 kWh\nMax power 150 kW";
        assert_eq!(extract_kwh(text), Some(dec("22.4")));
        assert_eq!(extract_kw_rating(text), Some(dec("150")));
        assert_eq!(extract_kw_rating("only 12 kWh"), None);
    }

    #[test]
    fn test_cost_and_range() {
        assert_eq!(extract_cost("Total $ 12.87"), Some(dec("12.87")));
        assert_eq!(extract_miles("29% (+86 mi)"), Some(86));
        assert_eq!(extract_percentage("29% (+86 mi)"), Some(29));
    }
}

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

// Rupiah amounts carry no subunits.
pub const SCALE: u32 = 0;

pub fn default_currency_value() -> Decimal {
    Decimal::new(0, SCALE)
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct CurrencyValue {
    pub(crate) value: Decimal,
}

impl CurrencyValue {
    pub fn zero() -> Self {
        Self {
            value: default_currency_value(),
        }
    }

    pub fn new(units: i64) -> Self {
        Self {
            value: Decimal::new(units, SCALE),
        }
    }

    /// Rounds to the nearest whole unit, halves away from zero, so a
    /// down-payment split always re-adds to the total it came from.
    pub fn new_from_decimal(value: Decimal) -> Self {
        Self {
            value: value.round_dp_with_strategy(SCALE, RoundingStrategy::MidpointAwayFromZero),
        }
    }

    pub fn value(&self) -> Decimal {
        self.value
    }

    pub fn is_zero(&self) -> bool {
        self.value.is_zero()
    }

    pub fn is_negative(&self) -> bool {
        self.value.is_sign_negative() && !self.value.is_zero()
    }

    pub fn to_grouped_string(&self) -> String {
        format_rupiah_string(&self.value)
    }

    pub fn to_rupiah_str(&self) -> String {
        format!("Rp {}", format_rupiah_string(&self.value))
    }
}

impl PartialOrd for CurrencyValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CurrencyValue {
    fn cmp(&self, other: &Self) -> Ordering {
        self.value.cmp(&other.value)
    }
}

impl std::fmt::Display for CurrencyValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_rupiah_str())
    }
}

fn format_rupiah_string(num: &Decimal) -> String {
    let mut scaled_value = num.to_owned();
    scaled_value.rescale(SCALE);
    let input = scaled_value.to_string();
    let with_minus = input.starts_with('-');
    let digits = if with_minus { &input[1..] } else { &input[..] };

    let mut result = String::new();
    let chars: Vec<char> = digits.chars().rev().collect();
    for (i, c) in chars.iter().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push('.');
        }
        result.push(*c);
    }
    let grouped: String = result.chars().rev().collect();

    if with_minus {
        format!("- {}", grouped)
    } else {
        grouped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grouping() {
        assert_eq!(CurrencyValue::new(0).to_grouped_string(), "0");
        assert_eq!(CurrencyValue::new(999).to_grouped_string(), "999");
        assert_eq!(CurrencyValue::new(1000).to_grouped_string(), "1.000");
        assert_eq!(
            CurrencyValue::new(5_000_000).to_grouped_string(),
            "5.000.000"
        );
        assert_eq!(
            CurrencyValue::new(10_000_000).to_rupiah_str(),
            "Rp 10.000.000"
        );
    }

    #[test]
    fn negative_grouping() {
        assert_eq!(CurrencyValue::new(-1500).to_grouped_string(), "- 1.500");
    }

    #[test]
    fn rounding_to_whole_units() {
        let v = CurrencyValue::new_from_decimal(Decimal::new(297, 1)); // 29.7
        assert_eq!(v, CurrencyValue::new(30));
        let v = CurrencyValue::new_from_decimal(Decimal::new(2950, 2)); // 29.50
        assert_eq!(v, CurrencyValue::new(30));
        let v = CurrencyValue::new_from_decimal(Decimal::new(294, 1)); // 29.4
        assert_eq!(v, CurrencyValue::new(29));
    }

    #[test]
    fn sign_checks() {
        assert!(!CurrencyValue::zero().is_negative());
        assert!(CurrencyValue::new(-1).is_negative());
        assert!(CurrencyValue::new(0).is_zero());
    }
}

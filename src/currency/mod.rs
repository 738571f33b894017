use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Formatting preferences for monetary values.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CurrencyFormat {
    pub symbol: String,
    pub decimal_separator: char,
    pub grouping_separator: char,
}

impl Default for CurrencyFormat {
    fn default() -> Self {
        Self {
            symbol: "R$".into(),
            decimal_separator: ',',
            grouping_separator: '.',
        }
    }
}

/// Renders `value` with two decimals and digit grouping, e.g. `R$ 1.234,56`.
/// Half-cent values round away from zero.
pub fn format_currency(value: Decimal, format: &CurrencyFormat) -> String {
    let rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let fixed = format!("{:.2}", rounded.abs());
    let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    let body = format!(
        "{} {}{}{}",
        format.symbol,
        group_digits(whole, format.grouping_separator),
        format.decimal_separator,
        cents
    );
    if rounded < Decimal::ZERO {
        format!("-{body}")
    } else {
        body
    }
}

/// Percentage with one decimal place, e.g. `-20.0%`.
pub fn format_percentage(value: f64) -> String {
    format!("{value:.1}%")
}

fn group_digits(digits: &str, separator: char) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(separator);
        }
        grouped.push(ch);
    }
    grouped
}

use chrono::{NaiveDate, Weekday};
use rust_decimal::{Decimal, RoundingStrategy};

use crate::models::parse_api_date;

pub const CURRENCY_SYMBOL: &str = "$";

fn format_with_commas(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// `$1,234.50`, always two decimals.
pub fn format_currency(amount: Decimal) -> String {
    let rounded = amount
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
        .abs();
    let text = format!("{:.2}", rounded);
    let (whole, cents) = text.split_once('.').unwrap_or((text.as_str(), "00"));
    let sign = if amount.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    format!("{}{}{}.{}", sign, CURRENCY_SYMBOL, format_with_commas(whole), cents)
}

/// `Jan 15, 2024`; unparseable input is shown as is.
pub fn format_date(raw: &str) -> String {
    parse_api_date(raw)
        .map(format_naive_date)
        .unwrap_or_else(|| raw.to_string())
}

pub fn format_naive_date(date: NaiveDate) -> String {
    date.format("%b %-d, %Y").to_string()
}

/// `2024-01` → `Jan 2024`.
pub fn month_label(key: &str) -> String {
    NaiveDate::parse_from_str(&format!("{key}-01"), "%Y-%m-%d")
        .map(|d| d.format("%b %Y").to_string())
        .unwrap_or_else(|_| key.to_string())
}

/// Confidence in 0..=1 as a whole percentage.
pub fn confidence_percent(confidence: f64) -> String {
    format!("{:.0}%", (confidence.clamp(0.0, 1.0) * 100.0).round())
}

pub fn percent(value: Decimal) -> String {
    format!("{:.1}%", value.round_dp(1))
}

pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn currency_formatting() {
        assert_eq!(format_currency(dec!(0)), "$0.00");
        assert_eq!(format_currency(dec!(42.5)), "$42.50");
        assert_eq!(format_currency(dec!(1234567.891)), "$1,234,567.89");
        assert_eq!(format_currency(dec!(-980.125)), "-$980.13");
        assert_eq!(format_currency(dec!(100)), "$100.00");
    }

    #[test]
    fn date_formatting() {
        assert_eq!(format_date("2024-01-15 00:00:00"), "Jan 15, 2024");
        assert_eq!(format_date("garbage"), "garbage");
    }

    #[test]
    fn month_labels() {
        assert_eq!(month_label("2024-03"), "Mar 2024");
        assert_eq!(month_label("March"), "March");
    }

    #[test]
    fn percentages() {
        assert_eq!(confidence_percent(0.85), "85%");
        assert_eq!(confidence_percent(1.7), "100%");
        assert_eq!(percent(dec!(33.333)), "33.3%");
    }
}

//! Market-aware display strings.
//!
//! KRW prices are whole won with thousands separators and a `원` suffix.
//! USD prices are dollars with exactly two decimals.

use chrono::{Datelike, NaiveDate};
use rust_decimal::{Decimal, RoundingStrategy};

use crate::models::{Market, Period};

/// Formats prices, changes, axis ticks and labels.
pub struct PriceFormatter;

impl PriceFormatter {
    /// `70,000원` or `$187.42`.
    pub fn format_price(value: f64, market: Market) -> String {
        match market {
            Market::Krw => format!("{}원", group_thousands(&round_half_up(value))),
            Market::Usd => format!("${}", fixed(value, 2)),
        }
    }

    /// Signed change, e.g. `+1,500원` or `-$3.10`. Anything that rounds
    /// to zero counts as `+`.
    pub fn format_change(value: f64, market: Market) -> String {
        let amount = Self::format_price(value.abs(), market);
        format!("{}{}", sign(value, &amount), amount)
    }

    /// Signed percentage with two decimals, e.g. `-2.86%`.
    pub fn format_change_percent(percent: f64) -> String {
        let amount = fixed(percent.abs(), 2);
        format!("{}{}%", sign(percent, &amount), amount)
    }

    /// Price-axis tick: thousands of won (`70K`) or whole dollars (`$187`).
    pub fn format_axis_tick(value: f64, market: Market) -> String {
        match market {
            Market::Krw => format!("{}K", fixed(value / 1000.0, 0)),
            Market::Usd => format!("${}", fixed(value, 0)),
        }
    }

    /// Volume with thousands separators.
    pub fn format_volume(volume: u64) -> String {
        group_thousands(&volume.to_string())
    }

    /// Volume-axis tick in millions, e.g. `1.2M`.
    pub fn format_volume_tick(value: f64) -> String {
        format!("{}M", fixed(value / 1_000_000.0, 1))
    }

    /// Short date label for the x axis. Periods of three months or more
    /// carry a two-digit year.
    pub fn format_date_label(date: NaiveDate, period: Period) -> String {
        if period.days() >= 90 {
            format!(
                "{:02}년 {}월 {}일",
                date.year().rem_euclid(100),
                date.month(),
                date.day()
            )
        } else {
            format!("{}월 {}일", date.month(), date.day())
        }
    }
}

/// `-` only when the rendered amount still shows a non-zero digit.
fn sign(value: f64, rendered: &str) -> &'static str {
    let nonzero = rendered.chars().any(|c| matches!(c, '1'..='9'));
    if value < 0.0 && nonzero {
        "-"
    } else {
        "+"
    }
}

/// Whole number, ties rounded toward positive infinity.
fn round_half_up(value: f64) -> String {
    if !value.is_finite() {
        return "0".to_string();
    }
    let rounded = (value + 0.5).floor();
    // -0.4 rounds to -0; print it as 0
    if rounded == 0.0 {
        "0".to_string()
    } else {
        format!("{:.0}", rounded)
    }
}

/// Exactly `dp` decimals, ties away from zero on the exact binary value.
///
/// Magnitudes beyond `Decimal`'s range fall back to float formatting;
/// non-finite input renders as zero.
fn fixed(value: f64, dp: u32) -> String {
    if !value.is_finite() {
        return format!("{:.*}", dp as usize, 0.0);
    }
    let Some(decimal) = Decimal::from_f64_retain(value) else {
        return format!("{:.*}", dp as usize, value);
    };
    let mut rounded = decimal.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero);
    if rounded.is_zero() {
        rounded.set_sign_positive(true);
    }
    rounded.rescale(dp);
    rounded.to_string()
}

/// Insert `,` between every three digits of the integer part.
fn group_thousands(number: &str) -> String {
    let (sign, digits) = match number.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", number),
    };
    let (integer, fraction) = match digits.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (digits, None),
    };

    let mut grouped = String::with_capacity(integer.len() + integer.len() / 3);
    for (i, ch) in integer.chars().enumerate() {
        if i > 0 && (integer.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    match fraction {
        Some(f) => format!("{}{}.{}", sign, grouped, f),
        None => format!("{}{}", sign, grouped),
    }
}

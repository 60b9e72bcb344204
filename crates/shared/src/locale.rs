//! Vietnamese-locale rendering of commission numbers.
//!
//! The backend stores plain numbers; every surface shows them the way vi-VN
//! writes them: `.` groups thousands, `,` separates decimals, at most two
//! fraction digits. Money amounts are whole dong.

use crate::domain::{Commission, CommissionKind};

pub const CURRENCY_SYMBOL: &str = "₫";
const GROUPING_SEPARATOR: char = '.';
const DECIMAL_SEPARATOR: char = ',';

/// Text for the inline editor field. Zero and non-finite amounts render as
/// an empty field so the placeholder can show through.
pub fn format_input_number(amount: f64) -> String {
    if !amount.is_finite() || amount == 0.0 {
        return String::new();
    }
    format_grouped(amount)
}

/// `1234567.5` becomes `"1.234.567,5"`. Trailing fraction zeros are trimmed.
pub fn format_grouped(amount: f64) -> String {
    let rounded = round_to_max_fraction(amount);
    let negative = rounded < 0.0;
    // Scale to hundredths once so the integer/fraction split is exact.
    let scaled = (rounded.abs() * 100.0).round() as u64;
    let mut out = String::new();
    if negative {
        out.push('-');
    }
    out.push_str(&group_thousands(scaled / 100));
    let fraction = scaled % 100;
    if fraction > 0 {
        let mut digits = format!("{:02}", fraction);
        while digits.ends_with('0') {
            digits.pop();
        }
        out.push(DECIMAL_SEPARATOR);
        out.push_str(&digits);
    }
    out
}

/// Read-only display of a commission. The zero state always reads as an
/// amount of dong, whatever unit the record carries.
pub fn format_commission(commission: Commission) -> String {
    if commission.is_zero() {
        return format!("0 {}", CURRENCY_SYMBOL);
    }
    match commission.kind {
        CommissionKind::Money => {
            format!("{} {}", format_grouped(commission.amount), CURRENCY_SYMBOL)
        }
        CommissionKind::Percent => format!("{}%", format_grouped(commission.amount)),
    }
}

/// Parses editor input: grouping dots are stripped first, a comma is the
/// decimal separator. `None` for garbage, non-finite, or negative input.
pub fn parse_grouped(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    let normalized: String = trimmed
        .chars()
        .filter(|c| *c != GROUPING_SEPARATOR)
        .map(|c| if c == DECIMAL_SEPARATOR { '.' } else { c })
        .collect();
    let value: f64 = normalized.parse().ok()?;
    if !value.is_finite() || value < 0.0 {
        return None;
    }
    Some(value)
}

/// Largest precision kept for percent values (two decimals, half away from
/// zero, matching the display format).
pub fn round_to_max_fraction(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            out.push(GROUPING_SEPARATOR);
        }
        out.push(ch);
    }
    out
}

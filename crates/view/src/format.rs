//! Number, sign and time formatting shared by every widget.

use crate::tree::StyleClass;
use chrono::{DateTime, FixedOffset};
use trade_dash_domain::{Metric, MetricsSnapshot};

/// Fraction digits for KPI and series values.
pub const KPI_DIGITS: usize = 2;
/// Fraction digits for money columns in the trades table.
pub const MONEY_DIGITS: usize = 4;
/// Fraction digits for quantities.
pub const QTY_DIGITS: usize = 6;
/// Fraction digits for volatility figures.
pub const VOL_DIGITS: usize = 4;
/// Fraction digits for integer counts.
pub const COUNT_DIGITS: usize = 0;

/// Formats a number with thousands separators and at most
/// `max_fraction_digits` fraction digits. Trailing zeros are dropped.
///
/// Exact ties round half away from zero. A value that rounds to zero is
/// printed without a sign.
#[must_use]
pub fn format_number(value: f64, max_fraction_digits: usize) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "∞" } else { "-∞" }.to_string();
    }

    let abs = value.abs();
    // `{:.N}` breaks exact ties towards even; nudge them up by half a unit
    let rounded = if is_exact_tie(abs, max_fraction_digits) {
        abs + 0.5 / 10f64.powi(max_fraction_digits as i32)
    } else {
        abs
    };
    let fixed = format!("{:.*}", max_fraction_digits, rounded);
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((i, f)) => (i, f.trim_end_matches('0')),
        None => (fixed.as_str(), ""),
    };

    let mut out = String::with_capacity(fixed.len() + int_part.len() / 3 + 1);
    if value < 0.0 && (int_part != "0" || !frac_part.is_empty()) {
        out.push('-');
    }
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    if !frac_part.is_empty() {
        out.push('.');
        out.push_str(frac_part);
    }
    out
}

/// True if `value` lies exactly halfway between two multiples of
/// `10^-digits`, i.e. `value * 2 * 10^digits` is an odd integer.
///
/// With `value = m * 2^e` and `m` odd, that product is
/// `m * 5^digits * 2^(e + digits + 1)`, which is odd exactly when the power of
/// two vanishes.
fn is_exact_tie(value: f64, digits: usize) -> bool {
    let bits = value.to_bits();
    let biased = ((bits >> 52) & 0x7ff) as i64;
    let fraction = bits & ((1u64 << 52) - 1);
    let (mantissa, exponent) = if biased == 0 {
        (fraction, -1074)
    } else {
        (fraction | (1u64 << 52), biased - 1075)
    };
    if mantissa == 0 {
        return false;
    }
    exponent + i64::from(mantissa.trailing_zeros()) == -(digits as i64 + 1)
}

/// Formats a KPI value; text passes through unchanged.
#[must_use]
pub fn fmt(value: &Metric, max_fraction_digits: usize) -> String {
    match value {
        Metric::Number(v) => format_number(*v, max_fraction_digits),
        Metric::Text(s) => s.clone(),
    }
}

/// Sign-dependent style: `pos` iff `value >= 0`.
#[must_use]
pub fn sign_class(value: f64) -> StyleClass {
    if value >= 0.0 {
        StyleClass::Pos
    } else {
        StyleClass::Neg
    }
}

/// Sign class for a KPI value; text values carry no class.
#[must_use]
pub fn metric_sign_class(value: &Metric) -> Option<StyleClass> {
    value.as_f64().map(sign_class)
}

/// `HH:MM` label used on chart axes.
#[must_use]
pub fn tick_label(t: &DateTime<FixedOffset>) -> String {
    t.format("%H:%M").to_string()
}

/// `HH:MM:SS` label used in the table and the status line.
#[must_use]
pub fn clock_label(t: &DateTime<FixedOffset>) -> String {
    t.format("%H:%M:%S").to_string()
}

/// Text for the last-updated status line.
#[must_use]
pub fn updated_label(snapshot: &MetricsSnapshot) -> String {
    format!("Updated {}", clock_label(&snapshot.updated_at))
}

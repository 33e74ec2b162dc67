//! Display formatting for currency amounts and performance indices.

/// Default currency symbol.
pub const DEFAULT_CURRENCY: &str = "$";

/// Format a whole-unit amount with thousands separators, e.g. `-$11,000`.
pub fn format_currency(amount: i64, symbol: &str) -> String {
    let digits = amount.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if amount < 0 {
        format!("-{}{}", symbol, grouped)
    } else {
        format!("{}{}", symbol, grouped)
    }
}

/// Round a performance index to the two decimals it is displayed with.
///
/// Insight grading uses this too, so a printed `0.90` is never graded as
/// below `0.9`.
pub fn round_ratio(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Format a performance index with two decimals.
pub fn format_ratio(value: f64) -> String {
    format!("{:.2}", round_ratio(value))
}

/// Format an optional index, using `N/A` when it is undefined.
pub fn format_optional_ratio(value: Option<f64>) -> String {
    value.map(format_ratio).unwrap_or_else(|| "N/A".to_string())
}

//! Display helpers: rounding and Turkish date labels.

use chrono::{Datelike, NaiveDate};

const MONTHS_TR: [&str; 12] = [
    "Ocak", "Şubat", "Mart", "Nisan", "Mayıs", "Haziran", "Temmuz", "Ağustos", "Eylül", "Ekim",
    "Kasım", "Aralık",
];

/// Round to two decimal places for display.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Net formatted with two decimals.
pub fn format_net(value: f64) -> String {
    format!("{value:.2}")
}

/// Trend formatted with an explicit sign.
pub fn format_trend(value: f64) -> String {
    format!("{value:+.2}")
}

/// Chart axis label, `dd.MM`.
pub fn short_date_label(date: NaiveDate) -> String {
    format!("{:02}.{:02}", date.day(), date.month())
}

/// List label, e.g. `1 Mart 2024`.
pub fn long_date_label(date: NaiveDate) -> String {
    format!(
        "{} {} {}",
        date.day(),
        MONTHS_TR[date.month0() as usize],
        date.year()
    )
}

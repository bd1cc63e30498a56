//! Custom Askama template filters.

#![allow(clippy::unnecessary_wraps)]

use std::fmt::Display;

use papalote_core::Money;
use rust_decimal::Decimal;

/// Returns the current year.
///
/// Usage in templates: `{{ ""|current_year }}`
#[askama::filter_fn]
pub fn current_year(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<i32> {
    use chrono::Datelike;
    Ok(chrono::Utc::now().year())
}

/// Returns the content hash for main.css, computed by the build script.
///
/// Usage in templates: `{{ ""|css_hash }}`
#[askama::filter_fn]
pub fn css_hash(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<&'static str> {
    Ok(env!("CSS_HASH"))
}

/// Formats a peso amount, e.g. `1250` becomes `$1,250.00`.
///
/// Values that are not decimals pass through unchanged.
///
/// Usage in templates: `{{ item.unit_price|mxn }}`
#[askama::filter_fn]
pub fn mxn(value: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(format_mxn(&value.to_string()))
}

fn format_mxn(raw: &str) -> String {
    raw.parse::<Decimal>()
        .map_or_else(|_| raw.to_string(), |amount| Money::mxn(amount).to_string())
}

/// Renders a 0..=5 rating as filled and empty stars.
///
/// Usage in templates: `{{ product.rating|stars }}`
#[askama::filter_fn]
pub fn stars(value: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(star_string(&value.to_string()))
}

fn star_string(raw: &str) -> String {
    let rating = raw.parse::<f32>().unwrap_or(0.0).clamp(0.0, 5.0);
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let filled = rating.round() as usize;
    format!("{}{}", "★".repeat(filled), "☆".repeat(5 - filled))
}

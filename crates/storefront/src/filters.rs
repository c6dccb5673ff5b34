//! Custom Askama template filters.

#![allow(clippy::unnecessary_wraps)]

use std::fmt::Display;
use std::str::FromStr;

use rust_decimal::Decimal;

use glownest_core::Price;

/// Returns the current year.
///
/// Usage in templates: `{{ ""|current_year }}`
#[askama::filter_fn]
pub fn current_year(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<i32> {
    use chrono::Datelike;
    Ok(chrono::Utc::now().year())
}

/// Formats a decimal amount as dollars, e.g. `9.99` → `$9.99`.
///
/// Values that are not numbers are printed unchanged.
///
/// Usage in templates: `{{ product.price|money }}`
#[askama::filter_fn]
pub fn money(value: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(format_money(&value.to_string()))
}

/// Returns the URL of a fingerprinted static asset.
///
/// Usage in templates: `{{ "css/main.css"|asset_url }}`
#[askama::filter_fn]
pub fn asset_url(path: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(hashed_asset_url(&path.to_string()))
}

fn format_money(raw: &str) -> String {
    Decimal::from_str(raw.trim()).map_or_else(|_| raw.to_string(), |amount| Price::usd(amount).display())
}

/// Map `css/main.css` to `/static/css/derived/main.<hash>.css` using the
/// hashes computed at build time. Unknown assets and assets that were
/// missing at build time keep their plain path.
fn hashed_asset_url(path: &str) -> String {
    let hash = match path {
        "css/main.css" => env!("CSS_HASH"),
        "js/toast.js" => env!("JS_HASH"),
        _ => "",
    };
    with_hash(path, hash)
}

fn with_hash(path: &str, hash: &str) -> String {
    if hash.is_empty() {
        return format!("/static/{path}");
    }

    let (dir, file) = path.rsplit_once('/').unwrap_or(("", path));
    let Some((stem, ext)) = file.rsplit_once('.') else {
        return format!("/static/{path}");
    };

    if dir.is_empty() {
        format!("/static/derived/{stem}.{hash}.{ext}")
    } else {
        format!("/static/{dir}/derived/{stem}.{hash}.{ext}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_money() {
        assert_eq!(format_money("9.99"), "$9.99");
        assert_eq!(format_money("12.5"), "$12.50");
        assert_eq!(format_money("0.005"), "$0.01");
        assert_eq!(format_money("n/a"), "n/a");
    }

    #[test]
    fn test_with_hash() {
        assert_eq!(
            with_hash("css/main.css", "abcd1234"),
            "/static/css/derived/main.abcd1234.css"
        );
        assert_eq!(with_hash("css/main.css", ""), "/static/css/main.css");
        assert_eq!(with_hash("favicon.ico", "ff00ff00"), "/static/derived/favicon.ff00ff00.ico");
        assert_eq!(with_hash("LICENSE", "ff00ff00"), "/static/LICENSE");
    }

    #[test]
    fn test_unknown_asset_is_unhashed() {
        assert_eq!(hashed_asset_url("img/logo.svg"), "/static/img/logo.svg");
    }
}

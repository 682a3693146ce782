//! Helper functions for BSON value conversion

use chrono::{DateTime as ChronoDateTime, Utc};
use mongodb::bson::{Binary, DateTime};

/// Layout of `createdAt` / `updatedAt` cells
pub const EXPORT_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Render a BSON datetime as `YYYY-MM-DD HH:MM:SS` in UTC
///
/// Sub-second precision is dropped. Returns `None` for instants chrono
/// cannot represent.
pub fn datetime_to_export_string(dt: &DateTime) -> Option<String> {
    ChronoDateTime::<Utc>::from_timestamp_millis(dt.timestamp_millis())
        .map(|utc| utc.format(EXPORT_DATETIME_FORMAT).to_string())
}

/// Convert Binary data to hexadecimal string
pub fn binary_to_hex(bin: &Binary) -> String {
    hex::encode(&bin.bytes)
}

/// Format a double the way the order dashboards expect
///
/// Shortest round-trip digits. Integral values keep one fractional digit
/// (`10.0`). Decimal exponents of 16 and above or below -4 switch to
/// exponent notation with a signed, at least two-digit exponent (`1e+16`,
/// `1.5e-05`).
pub fn format_double(f: f64) -> String {
    if f.is_nan() {
        return "nan".to_string();
    }
    if f.is_infinite() {
        return if f > 0.0 { "inf" } else { "-inf" }.to_string();
    }

    let scientific = format!("{:e}", f);
    if let Some((mantissa, exponent)) = scientific.split_once('e')
        && let Ok(exponent) = exponent.parse::<i32>()
        && f != 0.0
        && !(-4..16).contains(&exponent)
    {
        let sign = if exponent < 0 { '-' } else { '+' };
        return format!("{mantissa}e{sign}{:02}", exponent.abs());
    }

    if f.fract() == 0.0 {
        format!("{:.1}", f)
    } else {
        f.to_string()
    }
}

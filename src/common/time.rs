//! Date and resolution helpers. Request dates are IST wall-clock times.

use chrono::NaiveDateTime;

use crate::error::ConfigError;

pub const IST_OFFSET_SECONDS: i64 = 5 * 3600 + 30 * 60;

/// Parse `YYYY-MM-DD` + `HH:MM:SS` in IST and return UTC epoch seconds.
pub fn ist_to_unix(date: &str, time: &str) -> Result<i64, ConfigError> {
    let text = format!("{} {}", date.trim(), time.trim());
    let naive = NaiveDateTime::parse_from_str(&text, "%Y-%m-%d %H:%M:%S")
        .map_err(|_| ConfigError::InvalidDateTime(text.clone()))?;
    Ok(naive.and_utc().timestamp() - IST_OFFSET_SECONDS)
}

/// Seconds per candle for resolutions like `1m`, `5m`, `4h`, `1d`.
pub fn resolution_seconds(resolution: &str) -> Result<i64, ConfigError> {
    let res = resolution.trim().to_ascii_lowercase();
    let invalid = || ConfigError::InvalidResolution(resolution.to_string());

    let Some(unit) = res.chars().last() else {
        return Err(invalid());
    };
    let count = &res[..res.len() - unit.len_utf8()];
    let multiplier = match unit {
        'm' => 60,
        'h' => 3600,
        'd' => 86_400,
        _ => return Err(invalid()),
    };
    let count: i64 = count.parse().map_err(|_| invalid())?;
    if count <= 0 {
        return Err(invalid());
    }
    count.checked_mul(multiplier).ok_or_else(invalid)
}

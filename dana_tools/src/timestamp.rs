//! Timestamps in the civil time zone DANA expects (Asia/Jakarta, UTC+7, no daylight saving).
//!
//! Every timestamp DANA sees, both the `X-TIMESTAMP` header and order expiry times, has the form
//! `YYYY-MM-DDTHH:mm:ss+07:00`.

use chrono::{DateTime, Duration, FixedOffset, Utc};
use log::warn;

pub const JAKARTA_UTC_OFFSET_SECS: i32 = 7 * 3600;
const ZONED_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%:z";
const FALLBACK_FORMAT: &str = "%Y-%m-%dT%H:%M:%S+07:00";

pub fn jakarta_offset() -> Option<FixedOffset> {
    FixedOffset::east_opt(JAKARTA_UTC_OFFSET_SECS)
}

/// Formats `instant` as Jakarta civil time.
pub fn format_jakarta(instant: DateTime<Utc>) -> String {
    match jakarta_offset() {
        Some(tz) => instant.with_timezone(&tz).format(ZONED_FORMAT).to_string(),
        None => {
            warn!("🕰️ Could not resolve the Jakarta time zone. Falling back to fixed offset arithmetic.");
            format_by_offset_arithmetic(instant)
        },
    }
}

/// Shifts the UTC wall clock by seven hours and stamps the result with a literal `+07:00`.
pub fn format_by_offset_arithmetic(instant: DateTime<Utc>) -> String {
    let shifted = instant.naive_utc() + Duration::seconds(i64::from(JAKARTA_UTC_OFFSET_SECS));
    shifted.format(FALLBACK_FORMAT).to_string()
}

pub fn jakarta_now() -> String {
    format_jakarta(Utc::now())
}

/// The default order expiry: one hour after `now`.
pub fn default_expiry(now: DateTime<Utc>) -> String {
    format_jakarta(now + Duration::hours(1))
}

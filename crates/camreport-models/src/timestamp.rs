//! Archive timestamp wire formatting.
//!
//! The archive media endpoint takes the instant as a path segment in the
//! form `YYYYMMDDTHHMMSS.mmm`, interpreted by the server as UTC with no
//! local offset. Callers in other timezones must convert before building
//! the request; this module only ever formats `DateTime<Utc>` so a local
//! offset cannot leak into the wire format.

use chrono::{DateTime, Utc};

/// Serialize a UTC instant into the archive path segment format.
///
/// # Examples
/// ```
/// use chrono::{TimeZone, Utc};
/// use camreport_models::timestamp::format_archive_timestamp;
///
/// let ts = Utc.with_ymd_and_hms(2024, 3, 7, 14, 30, 5).unwrap();
/// assert_eq!(format_archive_timestamp(&ts), "20240307T143005.000");
/// ```
pub fn format_archive_timestamp(ts: &DateTime<Utc>) -> String {
    format!(
        "{}.{:03}",
        ts.format("%Y%m%dT%H%M%S"),
        ts.timestamp_subsec_millis()
    )
}

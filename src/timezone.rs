//! Resolving the kiosk's local time zone.

use time::{OffsetDateTime, UtcOffset};
use time_tz::{Offset, TimeZone};

use crate::Error;

/// Get the current UTC offset of a canonical time zone, e.g. "Asia/Tokyo".
///
/// The offset is looked up for the current instant, so a daylight saving
/// change after start up is not picked up until the next restart.
///
/// # Errors
/// Returns [Error::InvalidTimezone] if the name is not a known time zone.
pub fn get_local_offset(canonical_timezone: &str) -> Result<UtcOffset, Error> {
    time_tz::timezones::get_by_name(canonical_timezone)
        .map(|tz| tz.get_offset_utc(&OffsetDateTime::now_utc()).to_utc())
        .ok_or_else(|| Error::InvalidTimezone(canonical_timezone.to_owned()))
}

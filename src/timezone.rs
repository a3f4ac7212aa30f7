//! Conversion from canonical timezone names to UTC offsets.

use time::{OffsetDateTime, UtcOffset};
use time_tz::{Offset, TimeZone};

/// Get the current UTC offset of `canonical_timezone`, e.g. "Pacific/Auckland".
///
/// Returns `None` if the name is not a known canonical timezone.
pub fn get_local_offset(canonical_timezone: &str) -> Option<UtcOffset> {
    time_tz::timezones::get_by_name(canonical_timezone)
        .map(|tz| tz.get_offset_utc(&OffsetDateTime::now_utc()).to_utc())
}

/// Whether `name` is a canonical timezone name known to the timezone database.
pub fn is_known_timezone(name: &str) -> bool {
    time_tz::timezones::get_by_name(name).is_some()
}

/// The name of every timezone in the timezone database, sorted alphabetically.
pub fn timezone_names() -> Vec<&'static str> {
    let mut names = time_tz::timezones::iter()
        .map(|tz| tz.name())
        .collect::<Vec<_>>();
    names.sort_unstable();
    names.dedup();

    names
}

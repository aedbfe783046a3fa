//! Field rules shared by input forms, usable as garde `custom` validators.

use crate::date::parse_date;

/// Non-empty string, absent JSON fields decode as empty.
pub fn non_empty(value: &str, _context: &()) -> garde::Result {
    if value.is_empty() {
        Err(garde::Error::new("required"))
    } else {
        Ok(())
    }
}

/// Required calendar date in `YYYY-MM-DD` format.
pub fn valid_date(value: &str, _context: &()) -> garde::Result {
    if value.is_empty() {
        return Err(garde::Error::new("required"));
    }
    parse_date(value)
        .map(|_| ())
        .map_err(|_| garde::Error::new("not a valid date in YYYY-MM-DD format"))
}

/// Empty, or an absolute URL with any scheme.
pub fn optional_url(value: &str, _context: &()) -> garde::Result {
    if value.is_empty() {
        return Ok(());
    }
    url::Url::parse(value)
        .map(|_| ())
        .map_err(|_| garde::Error::new("not a valid url"))
}

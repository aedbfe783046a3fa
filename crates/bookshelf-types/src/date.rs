//! Calendar dates as they travel on the wire.
//!
//! Validation of incoming forms and the mapping to the persisted model both go
//! through [`parse_date`], so a date accepted by one is always accepted by the other.

use time::{
    error::ParseFromDescription, format_description::BorrowedFormatItem,
    macros::format_description, Date,
};

/// `YYYY-MM-DD`
pub const DATE_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// Year must be four plain digits, `[year]` alone would also take a leading sign.
pub fn parse_date(value: &str) -> Result<Date, time::error::Parse> {
    if !value.starts_with(|c: char| c.is_ascii_digit()) {
        return Err(ParseFromDescription::InvalidComponent("year").into());
    }
    Date::parse(value, DATE_FORMAT)
}

pub fn format_date(date: Date) -> String {
    date.format(DATE_FORMAT)
        .expect("Date provides every component of DATE_FORMAT")
}

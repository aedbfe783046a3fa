pub mod date;
pub mod general;

pub use date::{format_date, parse_date, DATE_FORMAT};

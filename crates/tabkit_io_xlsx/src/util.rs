//! Stateless conversion helpers for the decode pipeline.

use chrono::{NaiveDate, NaiveDateTime};

use crate::conf::{TUP_FORMATS_DATE, TUP_FORMATS_DATETIME};

/// Parse locale date text into a date-time, trying the accepted date-time
/// formats first and date-only formats (at midnight) second.
pub fn parse_date_text(c_text: &str) -> Option<NaiveDateTime> {
    let c_trimmed = c_text.trim();
    if c_trimmed.is_empty() {
        return None;
    }

    for c_format in TUP_FORMATS_DATETIME {
        if let Ok(dt_value) = NaiveDateTime::parse_from_str(c_trimmed, c_format) {
            return Some(dt_value);
        }
    }
    for c_format in TUP_FORMATS_DATE {
        if let Ok(d_value) = NaiveDate::parse_from_str(c_trimmed, c_format) {
            return d_value.and_hms_opt(0, 0, 0);
        }
    }
    None
}

/// Whether text parses as a (possibly negative) base-10 integer.
pub fn is_integer_text(c_text: &str) -> bool {
    let c_trimmed = c_text.trim();
    let c_digits = c_trimmed.strip_prefix('-').unwrap_or(c_trimmed);
    !c_digits.is_empty() && c_digits.chars().all(|chr| chr.is_ascii_digit())
}

/// Epoch milliseconds of a date-time taken as UTC.
pub fn convert_datetime_to_epoch_millis(dt_value: &NaiveDateTime) -> i64 {
    dt_value.and_utc().timestamp_millis()
}

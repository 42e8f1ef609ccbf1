//! Date helper functions

use chrono::NaiveDateTime;
use std::fmt::Write;

/// Fallback used when a strftime format cannot be applied to a naive date
const FALLBACK_FORMAT: &str = "%Y-%m-%d";

/// Format `date` with a strftime string, or `None` when the format needs
/// something a naive date-time does not carry (an offset or zone name) or
/// contains an invalid specifier
pub fn try_format_date(date: &NaiveDateTime, format: &str) -> Option<String> {
    let mut out = String::new();
    write!(out, "{}", date.format(format)).ok()?;
    Some(out)
}

/// Format `date` with a strftime string, falling back to `YYYY-MM-DD`
///
/// # Examples
/// ```ignore
/// format_date(&date, "%B %d, %Y") // -> "January 15, 2024"
/// ```
pub fn format_date(date: &NaiveDateTime, format: &str) -> String {
    try_format_date(date, format).unwrap_or_else(|| {
        tracing::debug!("Date format {:?} not applicable, using {}", format, FALLBACK_FORMAT);
        date.format(FALLBACK_FORMAT).to_string()
    })
}

/// Format a date in ISO 8601 / XML format, without an offset
pub fn date_xml(date: &NaiveDateTime) -> String {
    date.format("%Y-%m-%dT%H:%M:%S").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 15)
            .unwrap()
            .and_hms_opt(10, 30, 0)
            .unwrap()
    }

    #[test]
    fn test_format_date() {
        assert_eq!(format_date(&date(), "%B %d, %Y"), "January 15, 2024");
        assert_eq!(date_xml(&date()), "2024-01-15T10:30:00");
    }

    #[test]
    fn test_zone_specifiers_do_not_panic() {
        assert_eq!(try_format_date(&date(), "%Y-%m-%d %Z"), None);
        assert_eq!(try_format_date(&date(), "%z"), None);
        assert_eq!(try_format_date(&date(), "%Q"), None);
        assert_eq!(format_date(&date(), "%Y %Z"), "2024-01-15");
    }
}

//! Date normalization for report fields.
//!
//! Dates are stored as ISO `YYYY-MM-DD` and shown as `DD/MM/YYYY`. Input that
//! cannot be parsed in any accepted format yields an empty string, which
//! callers treat as "unset".

use chrono::{DateTime, NaiveDate, NaiveDateTime};

const ISO_FORMAT: &str = "%Y-%m-%d";
const DISPLAY_FORMAT: &str = "%d/%m/%Y";

/// Date-only layouts tried in order.
const DATE_FORMATS: [&str; 3] = [ISO_FORMAT, "%Y/%m/%d", DISPLAY_FORMAT];

/// Date-time layouts accepted as a fallback; only the date part is kept.
const DATE_TIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Parses a date in any of the accepted formats.
pub fn parse_date(input: &str) -> Option<NaiveDate> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }

    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(trimmed, format).ok())
        .or_else(|| {
            DATE_TIME_FORMATS
                .iter()
                .find_map(|format| NaiveDateTime::parse_from_str(trimmed, format).ok())
                .map(|dt| dt.date())
        })
        .or_else(|| {
            DateTime::parse_from_rfc3339(trimmed)
                .or_else(|_| DateTime::parse_from_rfc2822(trimmed))
                .ok()
                .map(|dt| dt.date_naive())
        })
}

/// Normalizes any accepted date string to ISO `YYYY-MM-DD`, or `""`.
pub fn normalize_date(input: &str) -> String {
    parse_date(input)
        .map(|date| date.format(ISO_FORMAT).to_string())
        .unwrap_or_default()
}

/// Formats any accepted date string as `DD/MM/YYYY`, or `""`.
pub fn format_date_display(input: &str) -> String {
    parse_date(input)
        .map(|date| date.format(DISPLAY_FORMAT).to_string())
        .unwrap_or_default()
}

/// Formats a (display) date for storage. Same contract as [`normalize_date`].
pub fn format_date_storage(input: &str) -> String {
    normalize_date(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_all_accepted_formats() {
        assert_eq!(normalize_date("2024-06-01"), "2024-06-01");
        assert_eq!(normalize_date("2024/06/01"), "2024-06-01");
        assert_eq!(normalize_date("01/06/2024"), "2024-06-01");
        assert_eq!(normalize_date("2024-06-01T13:45"), "2024-06-01");
        assert_eq!(normalize_date("2024-06-01T13:45:00Z"), "2024-06-01");
        assert_eq!(normalize_date("Sat, 01 Jun 2024 10:00:00 +0000"), "2024-06-01");
    }

    #[test]
    fn unparseable_dates_become_empty() {
        assert_eq!(normalize_date(""), "");
        assert_eq!(normalize_date("mañana"), "");
        assert_eq!(normalize_date("31/02/2024"), "");
        assert_eq!(format_date_display("not a date"), "");
    }

    #[test]
    fn display_and_storage_round_trip() {
        assert_eq!(format_date_display(&normalize_date("2024-06-01")), "01/06/2024");
        assert_eq!(format_date_storage("01/06/2024"), "2024-06-01");
    }
}

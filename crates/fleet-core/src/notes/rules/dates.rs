//! Date parsing for note dates (`M/D/YY`).

use chrono::NaiveDate;

use super::patterns::DATE_PARTS;

/// Default two-digit year pivot: `00..=68` is 20xx, `69..=99` is 19xx.
pub const DEFAULT_YEAR_PIVOT: u32 = 68;

/// Parse a note date leniently.
///
/// Dates are month-first. When that is not a calendar date the parts are
/// retried day-first, so `13/1/23` still reads as 13 January. Anything else
/// yields `None`.
pub fn parse_note_date(s: &str, pivot: u32) -> Option<NaiveDate> {
    let caps = DATE_PARTS.captures(s)?;

    let first: u32 = caps[1].parse().ok()?;
    let second: u32 = caps[2].parse().ok()?;
    let year = parse_year(&caps[3], pivot)?;

    NaiveDate::from_ymd_opt(year, first, second)
        .or_else(|| NaiveDate::from_ymd_opt(year, second, first))
}

/// Render a date the way notes write it, e.g. `1/2/23` for `sep = '/'`.
pub fn format_note_date(date: NaiveDate, sep: char) -> String {
    date.format(&format!("%-m{sep}%-d{sep}%y")).to_string()
}

fn parse_year(s: &str, pivot: u32) -> Option<i32> {
    let year: u32 = s.parse().ok()?;
    if year >= 100 {
        return None;
    }
    let century = if year <= pivot { 2000 } else { 1900 };
    Some(century + year as i32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_month_first() {
        assert_eq!(parse_note_date("1/2/23", DEFAULT_YEAR_PIVOT), Some(ymd(2023, 1, 2)));
        assert_eq!(parse_note_date("12-31-22", DEFAULT_YEAR_PIVOT), Some(ymd(2022, 12, 31)));
        assert_eq!(parse_note_date("6.1.23", DEFAULT_YEAR_PIVOT), Some(ymd(2023, 6, 1)));
    }

    #[test]
    fn test_day_first_fallback() {
        assert_eq!(parse_note_date("13/1/23", DEFAULT_YEAR_PIVOT), Some(ymd(2023, 1, 13)));
    }

    #[test]
    fn test_invalid_dates() {
        assert_eq!(parse_note_date("2/30/23", DEFAULT_YEAR_PIVOT), None);
        assert_eq!(parse_note_date("13/13/23", DEFAULT_YEAR_PIVOT), None);
        assert_eq!(parse_note_date("0/0/00", DEFAULT_YEAR_PIVOT), None);
        assert_eq!(parse_note_date("soon", DEFAULT_YEAR_PIVOT), None);
        assert_eq!(parse_note_date("", DEFAULT_YEAR_PIVOT), None);
    }

    #[test]
    fn test_year_pivot() {
        assert_eq!(parse_note_date("1/1/68", DEFAULT_YEAR_PIVOT), Some(ymd(2068, 1, 1)));
        assert_eq!(parse_note_date("1/1/69", DEFAULT_YEAR_PIVOT), Some(ymd(1969, 1, 1)));
        assert_eq!(parse_note_date("1/1/30", 25), Some(ymd(1930, 1, 1)));
    }

    #[test]
    fn test_format_round_trip_each_separator() {
        for sep in ['/', '-', '.'] {
            for date in [ymd(2023, 1, 2), ymd(2022, 11, 30), ymd(2024, 2, 29), ymd(1999, 12, 9)] {
                let written = format_note_date(date, sep);
                assert_eq!(parse_note_date(&written, DEFAULT_YEAR_PIVOT), Some(date), "{}", written);
            }
        }
        assert_eq!(format_note_date(ymd(2023, 1, 2), '/'), "1/2/23");
        assert_eq!(format_note_date(ymd(2008, 7, 4), '.'), "7.4.08");
    }
}

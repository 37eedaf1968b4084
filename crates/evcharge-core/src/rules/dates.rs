//! Date and time-of-day extraction.

use chrono::{NaiveDate, NaiveTime};

use super::patterns::{DATE_MDY, DATE_YMD, LONG_DATE, TIME};

/// Parse the first long-form date ("December 16, 2025", "Dec 1st 2025").
///
/// OCR frequently renders "1st" as "Ist"; that token is read as day one.
pub fn parse_long_date(text: &str) -> Option<NaiveDate> {
    LONG_DATE.captures_iter(text).find_map(|caps| {
        let month = month_to_number(&caps[1])?;
        let day = parse_day_token(&caps[2])?;
        let year: i32 = caps[3].parse().ok()?;
        NaiveDate::from_ymd_opt(year, month, day)
    })
}

/// Parse the first numeric date, ISO (`2024-03-01`) before US (`03/01/2024`).
pub fn parse_numeric_date(text: &str) -> Option<NaiveDate> {
    let iso = DATE_YMD.captures_iter(text).find_map(|caps| {
        let year: i32 = caps[1].parse().ok()?;
        let month: u32 = caps[2].parse().ok()?;
        let day: u32 = caps[3].parse().ok()?;
        NaiveDate::from_ymd_opt(year, month, day)
    });
    if iso.is_some() {
        return iso;
    }

    DATE_MDY.captures_iter(text).find_map(|caps| {
        let month: u32 = caps[1].parse().ok()?;
        let day: u32 = caps[2].parse().ok()?;
        let year = parse_year(&caps[3])?;
        NaiveDate::from_ymd_opt(year, month, day)
    })
}

/// Any recognisable date, long form first.
pub fn find_date(text: &str) -> Option<NaiveDate> {
    parse_long_date(text).or_else(|| parse_numeric_date(text))
}

/// Find the first clock time in `text`, normalized to 24-hour `HH:MM`.
pub fn find_time_in(text: &str) -> Option<String> {
    TIME.captures_iter(text).find_map(|caps| {
        let hour: u32 = caps[1].parse().ok()?;
        let minute: u32 = caps[2].parse().ok()?;
        let hour = match caps.get(3).map(|m| m.as_str().to_ascii_uppercase()) {
            Some(meridiem) => to_24_hour(hour, &meridiem)?,
            None => hour,
        };
        NaiveTime::from_hms_opt(hour, minute, 0).map(|t| t.format("%H:%M").to_string())
    })
}

/// Parse a stored time-of-day string for ordering purposes.
pub fn parse_time_of_day(text: &str) -> Option<NaiveTime> {
    let text = text.trim();
    ["%H:%M", "%H:%M:%S", "%I:%M %p", "%I:%M%p"]
        .iter()
        .find_map(|fmt| NaiveTime::parse_from_str(text, fmt).ok())
}

fn to_24_hour(hour: u32, meridiem: &str) -> Option<u32> {
    if !(1..=12).contains(&hour) {
        return None;
    }
    match (meridiem, hour) {
        ("A", 12) => Some(0),
        ("A", h) => Some(h),
        ("P", 12) => Some(12),
        ("P", h) => Some(h + 12),
        _ => None,
    }
}

fn parse_day_token(token: &str) -> Option<u32> {
    if token.eq_ignore_ascii_case("ist") {
        return Some(1);
    }
    let digits: String = token.chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse().ok()
}

fn parse_year(s: &str) -> Option<i32> {
    let year: i32 = s.parse().ok()?;
    // Two-digit years on receipts are always this century
    Some(if year < 100 { 2000 + year } else { year })
}

fn month_to_number(month: &str) -> Option<u32> {
    let prefix: String = month.chars().take(3).collect::<String>().to_lowercase();
    let number = match prefix.as_str() {
        "jan" => 1,
        "feb" => 2,
        "mar" => 3,
        "apr" => 4,
        "may" => 5,
        "jun" => 6,
        "jul" => 7,
        "aug" => 8,
        "sep" => 9,
        "oct" => 10,
        "nov" => 11,
        "dec" => 12,
        _ => return None,
    };
    Some(number)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_long_date() {
        assert_eq!(parse_long_date("December 16, 2025"), Some(date(2025, 12, 16)));
        assert_eq!(parse_long_date("Start: Dec 3rd 2025"), Some(date(2025, 12, 3)));
        assert_eq!(parse_long_date("march 9 2024"), Some(date(2024, 3, 9)));
    }

    #[test]
    fn test_parse_long_date_ocr_ordinal() {
        assert_eq!(parse_long_date("December Ist, 2025"), Some(date(2025, 12, 1)));
    }

    #[test]
    fn test_parse_long_date_rejects_impossible_day() {
        assert_eq!(parse_long_date("February 30, 2024"), None);
        assert_eq!(parse_long_date("no date here"), None);
    }

    #[test]
    fn test_parse_numeric_date() {
        assert_eq!(parse_numeric_date("Date 2024-03-01"), Some(date(2024, 3, 1)));
        assert_eq!(parse_numeric_date("03/01/2024"), Some(date(2024, 3, 1)));
        assert_eq!(parse_numeric_date("3/1/24"), Some(date(2024, 3, 1)));
    }

    #[test]
    fn test_find_time_normalizes_clock() {
        assert_eq!(find_time_in("Start 12:32 71%"), Some("12:32".to_string()));
        assert_eq!(find_time_in("Start 8:05"), Some("08:05".to_string()));
        assert_eq!(find_time_in("Started 2:02 PM"), Some("14:02".to_string()));
        assert_eq!(find_time_in("12:15 am"), Some("00:15".to_string()));
        assert_eq!(find_time_in("no time"), None);
    }

    #[test]
    fn test_parse_time_of_day() {
        assert_eq!(parse_time_of_day("09:00"), NaiveTime::from_hms_opt(9, 0, 0));
        assert_eq!(parse_time_of_day("2:05 PM"), NaiveTime::from_hms_opt(14, 5, 0));
        assert_eq!(parse_time_of_day("later"), None);
    }
}

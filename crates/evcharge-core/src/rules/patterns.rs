//! Common regex patterns for charging-session text extraction.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Long dates: "December 16, 2025", "Dec 1st 2025", "December Ist, 2025" (OCR for 1st)
    pub static ref LONG_DATE: Regex = Regex::new(
        r"(?i)\b(January|February|March|April|May|June|July|August|September|October|November|December|Jan|Feb|Mar|Apr|Jun|Jul|Aug|Sept|Sep|Oct|Nov|Dec)\.?\s+(\d{1,2}(?:st|nd|rd|th)?|[iI]st)(?:,\s*|\s+)(\d{4})\b"
    ).unwrap();

    // Numeric dates
    pub static ref DATE_YMD: Regex = Regex::new(
        r"\b(\d{4})-(\d{1,2})-(\d{1,2})\b"
    ).unwrap();

    pub static ref DATE_MDY: Regex = Regex::new(
        r"\b(\d{1,2})/(\d{1,2})/(\d{4}|\d{2})\b"
    ).unwrap();

    // Clock times, optionally 12-hour
    pub static ref TIME: Regex = Regex::new(
        r"(?i)\b(\d{1,2}):(\d{2})(?:\s*([AP])\.?M\.?)?\b"
    ).unwrap();

    pub static ref PERCENT: Regex = Regex::new(
        r"(\d{1,3})\s*%"
    ).unwrap();

    // Charger rating; the trailing boundary keeps "kWh" out
    pub static ref KW: Regex = Regex::new(
        r"(?i)\b(\d+(?:\.\d+)?)\s*kW\b"
    ).unwrap();

    pub static ref KWH: Regex = Regex::new(
        r"(?i)(\d+(?:\.\d+)?)\s*kWh\b"
    ).unwrap();

    pub static ref COST: Regex = Regex::new(
        r"\$\s*(\d[\d,]*(?:\.\d+)?)"
    ).unwrap();

    // Range added: "(+86 mi)"
    pub static ref MILES: Regex = Regex::new(
        r"(?i)\(\s*\+?\s*(\d+)\s*mi\s*\)"
    ).unwrap();

    // Duration parts
    pub static ref DURATION_HOURS: Regex = Regex::new(
        r"(?i)(\d+(?:\.\d+)?)\s*(?:hours|hour|hrs|hr|h)(?:[^a-z]|$)"
    ).unwrap();

    // The leading guard keeps "1.5 min" from reading as "5 min"
    pub static ref DURATION_MINUTES: Regex = Regex::new(
        r"(?i)(?:^|[^\d.])(\d+(?:\.\d+)?)\s*(?:minutes|minute|mins|min|m)(?:[^a-z]|$)"
    ).unwrap();

    pub static ref DURATION_CLOCK: Regex = Regex::new(
        r"^\s*(\d{1,2}):(\d{2})(?::(\d{2}))?\s*$"
    ).unwrap();

    // Scaffold keyword tokens
    pub static ref KEYWORD: Regex = Regex::new(
        r"[a-z]{4,}"
    ).unwrap();
}

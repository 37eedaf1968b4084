//! FordPass charge-details screen.
//!
//! Layout after OCR:
//!   Charge details
//!   Summary
//!   Shell Recharge - Southland Mall - Macy's      <- charger name
//!   One Southland Mall Drive Hayward              <- location
//!   Charge / 29% (+86 mi)
//!   Time charging / 2 hrs 50 min
//!   Energy added / 16.7 kWh
//!   Additional details
//!   December 16, 2025
//!   Start 12:32 71%
//!   December 16, 2025
//!   End 15:23 100%

use chrono::NaiveDate;

use super::ChargingAppPlugin;
use crate::models::record::ChargeRecord;
use crate::rules::patterns::LONG_DATE;
use crate::rules::{
    extract_cost, extract_kw_rating, extract_kwh, extract_label_value, extract_miles,
    extract_percentage, find_line, find_percentage, find_time, find_time_in, parse_long_date,
    split_lines,
};

const SECTION_BREAKS: [&str; 6] = [
    "summary",
    "charge details",
    "charge",
    "time charging",
    "energy added",
    "additional details",
];

const LAYOUT_MARKERS: [&str; 4] = [
    "charge details",
    "additional details",
    "energy added",
    "time charging",
];

/// Parser for the FordPass app.
pub struct FordPassPlugin;

impl FordPassPlugin {
    pub fn new() -> Self {
        Self
    }
}

impl Default for FordPassPlugin {
    fn default() -> Self {
        Self::new()
    }
}

impl ChargingAppPlugin for FordPassPlugin {
    fn brand(&self) -> &'static str {
        "fordpass"
    }

    fn display_name(&self) -> &'static str {
        "FordPass"
    }

    // The summary names third-party networks ("Electrify America - ..."),
    // so the app layout has to win over network plugins.
    fn priority(&self) -> i32 {
        10
    }

    fn detect(&self, text: &str) -> bool {
        let lowered = text.to_lowercase();
        if lowered.contains("fordpass") || lowered.contains("ford pass") {
            return true;
        }
        LAYOUT_MARKERS.iter().filter(|m| lowered.contains(*m)).count() >= 2
    }

    fn parse(&self, text: &str) -> ChargeRecord {
        let lines = split_lines(text);

        let (mut name, mut location) = find_line(&lines, "summary")
            .map(|idx| summary_info(&lines[idx + 1..]))
            .unwrap_or_default();
        if name.is_none() {
            if let Some(idx) = find_line(&lines, "charge details") {
                (name, location) = summary_info(&lines[idx + 1..]);
            }
        }

        let charge = extract_label_value(&lines, "charge");
        let details = additional_details(&lines);

        ChargeRecord {
            date: details.start_date.or(details.end_date),
            charger_name: name,
            charger_location: location,
            kwh_added: extract_label_value(&lines, "energy added").and_then(|v| extract_kwh(&v)),
            charger_kw_rating: extract_kw_rating(text),
            charge_percentage: charge.as_deref().and_then(extract_percentage),
            charge_miles: charge.as_deref().and_then(extract_miles),
            start_time: details.start_time,
            end_time: details.end_time,
            start_percentage: details.start_pct,
            end_percentage: details.end_pct,
            cost: extract_cost(text),
            charger_brand: Some(self.brand().to_string()),
            ..ChargeRecord::default()
        }
        .with_duration(extract_label_value(&lines, "time charging"))
    }
}

fn is_section_break(lowered: &str) -> bool {
    SECTION_BREAKS
        .iter()
        .any(|label| lowered == *label || lowered.starts_with(&format!("{} ", label)))
}

/// Charger name and location: the first two lines that are not headings.
fn summary_info(lines: &[&str]) -> (Option<String>, Option<String>) {
    let mut name = None;
    for line in lines.iter().filter(|l| !l.is_empty()) {
        let lowered = line.to_lowercase();
        if is_section_break(&lowered) {
            if lowered == "summary" || lowered == "charge details" {
                continue;
            }
            break;
        }
        if name.is_none() {
            name = Some(line.to_string());
        } else {
            return (name, Some(line.to_string()));
        }
    }
    (name, None)
}

#[derive(Debug, Default)]
struct AdditionalDetails {
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
    start_time: Option<String>,
    end_time: Option<String>,
    start_pct: Option<u32>,
    end_pct: Option<u32>,
}

/// Start/end metadata from the "Additional details" section.
///
/// Each Start/End line belongs to the date line above it; the time may sit on
/// either line.
fn additional_details(lines: &[&str]) -> AdditionalDetails {
    let mut result = AdditionalDetails::default();
    let Some(idx) = find_line(lines, "additional details") else {
        return result;
    };
    let section = &lines[idx + 1..];

    let mut current_date = None;
    let mut pending_time: Option<String> = None;

    for (i, line) in section.iter().enumerate() {
        if line.is_empty() {
            continue;
        }
        if LONG_DATE.is_match(line) {
            current_date = parse_long_date(line);
            pending_time = find_time_in(line);
            continue;
        }

        let lowered = line.to_lowercase();
        let (date, time, pct) = if lowered.starts_with("start") {
            (&mut result.start_date, &mut result.start_time, &mut result.start_pct)
        } else if lowered.starts_with("end") {
            (&mut result.end_date, &mut result.end_time, &mut result.end_pct)
        } else {
            continue;
        };

        if date.is_none() {
            *date = current_date;
        }
        if time.is_none() {
            *time = pending_time.take().or_else(|| find_time(section, i));
        }
        if pct.is_none() {
            *pct = find_percentage(section, i);
        }
        pending_time = None;
    }

    result
}

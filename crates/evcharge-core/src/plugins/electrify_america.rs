//! Electrify America session details.
//!
//! Layout after OCR:
//!   Electrify America
//!   Session Details
//!   Walmart 4213 - Pleasanton                     <- charger name
//!   4501 Rosewood Dr, Pleasanton, CA              <- location
//!   Date 2024-03-01
//!   Start Time 2:02 PM / End Time 2:37 PM
//!   Charging Time 35 min
//!   Energy Delivered 22.4 kWh
//!   Max Power 150 kW
//!   Starting Battery 41% / Ending Battery 80%
//!   Total $12.87

use rust_decimal::Decimal;

use super::ChargingAppPlugin;
use crate::models::record::ChargeRecord;
use crate::rules::patterns::COST;
use crate::rules::{
    extract_cost, extract_kw_rating, extract_kwh, extract_label_value, extract_percentage,
    find_date, find_line, find_time_in, parse_decimal, split_lines,
};

const HEADINGS: [&str; 4] = ["session details", "charging session", "receipt", "session summary"];

const FIELD_LABELS: [&str; 14] = [
    "date",
    "start",
    "end",
    "charging time",
    "duration",
    "session time",
    "energy",
    "max power",
    "power",
    "starting battery",
    "ending battery",
    "total",
    "cost",
    "price",
];

/// Parser for the Electrify America app.
pub struct ElectrifyAmericaPlugin;

impl ElectrifyAmericaPlugin {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ElectrifyAmericaPlugin {
    fn default() -> Self {
        Self::new()
    }
}

impl ChargingAppPlugin for ElectrifyAmericaPlugin {
    fn brand(&self) -> &'static str {
        "electrify_america"
    }

    fn display_name(&self) -> &'static str {
        "Electrify America"
    }

    fn detect(&self, text: &str) -> bool {
        let lowered = text.to_lowercase();
        lowered.contains("electrify america") || lowered.contains("electrifyamerica")
    }

    fn parse(&self, text: &str) -> ChargeRecord {
        let lines = split_lines(text);
        let (name, location) = station(&lines);

        let date = first_label(&lines, &["date", "session date"])
            .and_then(|v| find_date(&v))
            .or_else(|| find_date(text));

        let start_percentage =
            first_label(&lines, &["starting battery", "start soc", "starting soc"])
                .and_then(|v| extract_percentage(&v));
        let end_percentage = first_label(&lines, &["ending battery", "end soc", "ending soc"])
            .and_then(|v| extract_percentage(&v));

        let kwh_added = first_label(&lines, &["energy delivered", "energy added", "energy"])
            .and_then(|v| extract_kwh(&v))
            .or_else(|| extract_kwh(text));
        let charger_kw_rating = first_label(&lines, &["max power", "peak power", "power"])
            .and_then(|v| extract_kw_rating(&v))
            .or_else(|| extract_kw_rating(text));

        let cost = first_label(&lines, &["total", "session total", "amount charged"])
            .and_then(|v| extract_cost(&v))
            .or_else(|| last_cost(text));

        ChargeRecord {
            date,
            charger_name: name,
            charger_location: location,
            kwh_added,
            charger_kw_rating,
            charge_percentage: charge_added(start_percentage, end_percentage),
            start_time: first_label(&lines, &["start time", "started", "start"])
                .and_then(|v| find_time_in(&v)),
            end_time: first_label(&lines, &["end time", "ended", "end"])
                .and_then(|v| find_time_in(&v)),
            start_percentage,
            end_percentage,
            cost,
            charger_brand: Some(self.brand().to_string()),
            ..ChargeRecord::default()
        }
        .with_duration(first_label(&lines, &["charging time", "duration", "session time"]))
    }
}

fn first_label(lines: &[&str], labels: &[&str]) -> Option<String> {
    labels
        .iter()
        .find_map(|label| extract_label_value(lines, label))
}

/// Station name and address: the first two plain lines after the brand header.
fn station(lines: &[&str]) -> (Option<String>, Option<String>) {
    let Some(idx) = find_line(lines, "electrify america") else {
        return (None, None);
    };

    let mut found = lines[idx + 1..]
        .iter()
        .filter(|l| !l.is_empty())
        .filter(|l| {
            let lowered = l.to_lowercase();
            !HEADINGS.iter().any(|h| lowered.starts_with(h))
        })
        .take_while(|l| !starts_with_field_label(l))
        .map(|l| l.to_string());

    (found.next(), found.next())
}

fn starts_with_field_label(line: &str) -> bool {
    let lowered = line.to_lowercase();
    FIELD_LABELS.iter().any(|label| {
        lowered
            .strip_prefix(label)
            .is_some_and(|rest| rest.is_empty() || rest.starts_with([' ', ':']))
    })
}

/// Receipts list per-kWh rates before the total, so the last amount wins.
fn last_cost(text: &str) -> Option<Decimal> {
    COST.captures_iter(text)
        .last()
        .and_then(|c| parse_decimal(&c[1]))
}

fn charge_added(start: Option<u32>, end: Option<u32>) -> Option<u32> {
    match (start, end) {
        (Some(s), Some(e)) if e >= s => Some(e - s),
        _ => None,
    }
}

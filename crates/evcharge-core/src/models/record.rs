//! Charging-session record and its CSV projection.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::rules::patterns::{DURATION_CLOCK, DURATION_HOURS, DURATION_MINUTES};
use crate::rules::{find_date, parse_decimal};

/// CSV header, in output order.
pub const CSV_COLUMNS: [&str; 15] = [
    "date",
    "charger_name",
    "charger_location",
    "duration",
    "kwh_added",
    "charger_kw_rating",
    "charge_percentage",
    "charge_miles",
    "start_time",
    "end_time",
    "start_percentage",
    "end_percentage",
    "cost",
    "charger_brand",
    "duration_minutes",
];

/// Deduplication key: `(date, charger_location, start_time)`.
pub type IdentityKey = (Option<NaiveDate>, Option<String>, Option<String>);

/// One parsed charging session.
///
/// Every field is optional; a record carrying only its brand is still valid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ChargeRecord {
    /// Session date.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,

    /// Station name as displayed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub charger_name: Option<String>,

    /// Station address or location line.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub charger_location: Option<String>,

    /// Duration as displayed ("2 hrs 50 min").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,

    /// Duration in whole minutes, derived from `duration`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_minutes: Option<u32>,

    /// Energy delivered in kWh.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kwh_added: Option<Decimal>,

    /// Rated charger power in kW.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub charger_kw_rating: Option<Decimal>,

    /// Battery percentage added.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub charge_percentage: Option<u32>,

    /// Range added in miles.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub charge_miles: Option<u32>,

    /// Session start, `HH:MM`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,

    /// Session end, `HH:MM`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,

    /// Battery level at start.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_percentage: Option<u32>,

    /// Battery level at end.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_percentage: Option<u32>,

    /// Amount charged for the session.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost: Option<Decimal>,

    /// Brand of the plugin that produced this record.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub charger_brand: Option<String>,
}

impl ChargeRecord {
    /// Create an empty record stamped with a brand.
    pub fn for_brand(brand: impl Into<String>) -> Self {
        Self {
            charger_brand: Some(brand.into()),
            ..Self::default()
        }
    }

    /// Set the displayed duration and its minute count together.
    pub fn with_duration(mut self, duration: Option<String>) -> Self {
        self.duration_minutes = duration.as_deref().and_then(parse_duration_to_minutes);
        self.duration = duration;
        self
    }

    /// Key used to recognise the same charging event across runs.
    pub fn identity_key(&self) -> IdentityKey {
        (
            self.date,
            self.charger_location.clone(),
            self.start_time.clone(),
        )
    }

    /// Project the record onto [`CSV_COLUMNS`]; unset fields become empty cells.
    pub fn to_row(&self) -> Vec<String> {
        vec![
            cell(&self.date.map(|d| d.format("%Y-%m-%d").to_string())),
            cell(&self.charger_name),
            cell(&self.charger_location),
            cell(&self.duration),
            cell(&self.kwh_added),
            cell(&self.charger_kw_rating),
            cell(&self.charge_percentage),
            cell(&self.charge_miles),
            cell(&self.start_time),
            cell(&self.end_time),
            cell(&self.start_percentage),
            cell(&self.end_percentage),
            cell(&self.cost),
            cell(&self.charger_brand),
            cell(&self.duration_minutes),
        ]
    }

    /// Rebuild a record from a CSV row, looking columns up by header name.
    ///
    /// Unknown columns are ignored and unparseable cells are left unset, so
    /// files written by older versions (e.g. costs stored as `$12.34`, no
    /// `duration_minutes` column) still load.
    pub fn from_row<H, R>(headers: &[H], row: &[R]) -> Self
    where
        H: AsRef<str>,
        R: AsRef<str>,
    {
        let get = |column: &str| -> Option<String> {
            headers
                .iter()
                .position(|h| h.as_ref().trim() == column)
                .and_then(|idx| row.get(idx))
                .map(|v| v.as_ref().trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let number = |column: &str| get(column).and_then(|v| v.parse::<u32>().ok());
        let decimal = |column: &str| get(column).and_then(|v| parse_decimal(&v));

        let duration = get("duration");
        let duration_minutes = number("duration_minutes")
            .or_else(|| duration.as_deref().and_then(parse_duration_to_minutes));

        Self {
            date: get("date").and_then(|v| {
                NaiveDate::parse_from_str(&v, "%Y-%m-%d")
                    .ok()
                    .or_else(|| find_date(&v))
            }),
            charger_name: get("charger_name"),
            charger_location: get("charger_location"),
            duration,
            duration_minutes,
            kwh_added: decimal("kwh_added"),
            charger_kw_rating: decimal("charger_kw_rating"),
            charge_percentage: number("charge_percentage"),
            charge_miles: number("charge_miles"),
            start_time: get("start_time"),
            end_time: get("end_time"),
            start_percentage: number("start_percentage"),
            end_percentage: number("end_percentage"),
            cost: decimal("cost"),
            charger_brand: get("charger_brand"),
        }
    }
}

fn cell<T: ToString>(value: &Option<T>) -> String {
    value.as_ref().map(ToString::to_string).unwrap_or_default()
}

/// Best-effort conversion of a displayed duration to whole minutes.
///
/// Understands "1h 23m", "2 hrs 50 min", "1 hour", "45 min" and "1:23".
/// Returns `None` when nothing recognisable is present.
pub fn parse_duration_to_minutes(text: &str) -> Option<u32> {
    if let Some(caps) = DURATION_CLOCK.captures(text) {
        let hours: u32 = caps[1].parse().ok()?;
        let minutes: u32 = caps[2].parse().ok()?;
        return hours.checked_mul(60)?.checked_add(minutes);
    }

    let from_hours = match DURATION_HOURS.captures(text) {
        Some(c) => Some(whole_minutes(c[1].parse().ok()?, 60.0)?),
        None => None,
    };
    let from_minutes = match DURATION_MINUTES.captures(text) {
        Some(c) => Some(whole_minutes(c[1].parse().ok()?, 1.0)?),
        None => None,
    };

    match (from_hours, from_minutes) {
        (None, None) => None,
        (h, m) => h.unwrap_or(0).checked_add(m.unwrap_or(0)),
    }
}

// Values too large for a u32 minute count are OCR noise, not durations.
fn whole_minutes(value: f64, scale: f64) -> Option<u32> {
    let minutes = (value * scale).round();
    (minutes.is_finite() && (0.0..=f64::from(u32::MAX)).contains(&minutes))
        .then_some(minutes as u32)
}

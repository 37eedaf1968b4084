//! Merge of new records into an existing set, with deduplication and
//! chronological ordering.

use std::cmp::Ordering;
use std::collections::HashMap;

use tracing::debug;

use crate::models::record::{ChargeRecord, IdentityKey};
use crate::rules::parse_time_of_day;

/// Result of a merge, with counts for reporting.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeOutcome {
    /// Merged records in chronological order.
    pub records: Vec<ChargeRecord>,
    /// New records whose identity key was not present before.
    pub added: usize,
    /// New records that replaced an earlier record with the same key.
    pub replaced: usize,
}

/// Merge `new` into `existing`.
///
/// Records are identified by `(date, charger_location, start_time)`. When two
/// records share a key the later one wins: existing records are overwritten by
/// new ones, and later new records overwrite earlier new ones. The winner keeps
/// the slot of the first record with that key, then the whole set is sorted
/// with [`sort_records`].
pub fn merge(existing: Vec<ChargeRecord>, new: Vec<ChargeRecord>) -> Vec<ChargeRecord> {
    merge_with_stats(existing, new).records
}

/// [`merge`], also reporting how many keys were added or replaced.
pub fn merge_with_stats(existing: Vec<ChargeRecord>, new: Vec<ChargeRecord>) -> MergeOutcome {
    let mut slots: Vec<ChargeRecord> = Vec::with_capacity(existing.len() + new.len());
    let mut index: HashMap<IdentityKey, usize> = HashMap::new();

    for record in existing {
        upsert(&mut slots, &mut index, record);
    }

    let mut outcome = MergeOutcome::default();
    for record in new {
        if upsert(&mut slots, &mut index, record) {
            outcome.replaced += 1;
        } else {
            outcome.added += 1;
        }
    }

    sort_records(&mut slots);
    debug!(
        "Merged to {} records ({} added, {} replaced)",
        slots.len(),
        outcome.added,
        outcome.replaced
    );
    outcome.records = slots;
    outcome
}

/// Insert or overwrite by identity key. Returns `true` when a record was replaced.
fn upsert(
    slots: &mut Vec<ChargeRecord>,
    index: &mut HashMap<IdentityKey, usize>,
    record: ChargeRecord,
) -> bool {
    let key = record.identity_key();
    if let Some(&slot) = index.get(&key) {
        slots[slot] = record;
        return true;
    }
    index.insert(key, slots.len());
    slots.push(record);
    false
}

/// Stable chronological sort.
///
/// Dated records come first, ascending by date then start time; records
/// without a date follow in their original relative order.
pub fn sort_records(records: &mut [ChargeRecord]) {
    records.sort_by(compare_chronologically);
}

fn compare_chronologically(a: &ChargeRecord, b: &ChargeRecord) -> Ordering {
    match (a.date, b.date) {
        (Some(da), Some(db)) => da
            .cmp(&db)
            .then_with(|| compare_start(a, b))
            .then_with(|| folded(&a.charger_location).cmp(&folded(&b.charger_location)))
            .then_with(|| folded(&a.charger_name).cmp(&folded(&b.charger_name))),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

// Clock order first; unparseable or missing times sort before parseable ones.
fn compare_start(a: &ChargeRecord, b: &ChargeRecord) -> Ordering {
    let ta = a.start_time.as_deref().and_then(parse_time_of_day);
    let tb = b.start_time.as_deref().and_then(parse_time_of_day);
    ta.cmp(&tb).then_with(|| a.start_time.cmp(&b.start_time))
}

fn folded(value: &Option<String>) -> String {
    value.as_deref().unwrap_or("").trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;

    fn record(date: Option<(i32, u32, u32)>, location: &str, start: &str) -> ChargeRecord {
        ChargeRecord {
            date: date.and_then(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d)),
            charger_location: Some(location.to_string()).filter(|s| !s.is_empty()),
            start_time: Some(start.to_string()).filter(|s| !s.is_empty()),
            charger_brand: Some("fordpass".to_string()),
            ..ChargeRecord::default()
        }
    }

    fn with_cost(mut r: ChargeRecord, cost: i64) -> ChargeRecord {
        r.cost = Some(Decimal::from(cost));
        r
    }

    #[test]
    fn test_collision_replaces_existing() {
        let existing = vec![with_cost(record(Some((2024, 1, 1)), "X", "09:00"), 5)];
        let new = vec![with_cost(record(Some((2024, 1, 1)), "X", "09:00"), 7)];

        let merged = merge(existing, new);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].cost, Some(Decimal::from(7)));
    }

    #[test]
    fn test_last_write_wins_within_new() {
        let r1 = with_cost(record(Some((2024, 2, 2)), "Y", "10:00"), 1);
        let r2 = with_cost(record(Some((2024, 2, 2)), "Y", "10:00"), 2);

        assert_eq!(merge(vec![], vec![r1, r2.clone()]), vec![r2]);
    }

    #[test]
    fn test_merge_is_idempotent() {
        let a = vec![
            record(Some((2025, 12, 16)), "Location A", "12:00"),
            record(None, "Nowhere", ""),
            record(Some((2025, 1, 5)), "Location C", "7:30"),
        ];
        let b = vec![
            with_cost(record(Some((2025, 12, 16)), "Location A", "12:00"), 9),
            record(Some((2026, 1, 1)), "Location B", "09:00"),
            record(None, "Elsewhere", ""),
            with_cost(record(Some((2026, 1, 1)), "Location B", "09:00"), 3),
        ];

        let once = merge(a, b.clone());
        let twice = merge(once.clone(), b);
        assert_eq!(twice, once);
    }

    #[test]
    fn test_sort_order_and_undated_last() {
        let records = vec![
            record(None, "U1", ""),
            record(Some((2025, 12, 16)), "A", "12:32"),
            record(None, "U2", "08:00"),
            record(Some((2025, 12, 16)), "B", "9:05"),
            record(Some((2024, 6, 1)), "C", "23:00"),
        ];

        let merged = merge(records, vec![]);
        let locations: Vec<_> = merged
            .iter()
            .map(|r| r.charger_location.clone().unwrap())
            .collect();
        assert_eq!(locations, vec!["C", "B", "A", "U1", "U2"]);
    }

    #[test]
    fn test_twelve_hour_times_sort_by_clock() {
        let mut records = vec![
            record(Some((2024, 3, 1)), "A", "2:00 PM"),
            record(Some((2024, 3, 1)), "B", "11:00"),
        ];
        sort_records(&mut records);
        assert_eq!(records[0].charger_location.as_deref(), Some("B"));
    }

    #[test]
    fn test_stats() {
        let existing = vec![record(Some((2025, 12, 16)), "Location A", "12:00")];
        let new = vec![
            record(Some((2025, 12, 16)), "Location A", "12:00"),
            record(Some((2026, 1, 1)), "Location B", "09:00"),
            record(None, "Location A", ""),
        ];

        let outcome = merge_with_stats(existing, new);
        assert_eq!(outcome.added, 2);
        assert_eq!(outcome.replaced, 1);
        assert_eq!(outcome.records.len(), 3);
        assert_eq!(
            outcome
                .records
                .iter()
                .map(|r| r.charger_location.as_deref().unwrap())
                .collect::<Vec<_>>(),
            vec!["Location A", "Location B", "Location A"]
        );
    }

    #[test]
    fn test_output_non_decreasing() {
        let new: Vec<_> = [(2024, 5, 2), (2023, 1, 1), (2024, 5, 1), (2023, 12, 31)]
            .iter()
            .enumerate()
            .map(|(i, &d)| record(Some(d), &format!("L{}", i), &format!("{}:15", 20 - i)))
            .collect();

        let merged = merge(vec![], new);
        for pair in merged.windows(2) {
            assert_ne!(compare_chronologically(&pair[0], &pair[1]), Ordering::Greater);
        }
    }
}

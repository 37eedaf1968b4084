//! CSV persistence for charge records.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::StoreError;
use crate::models::record::{ChargeRecord, CSV_COLUMNS};

/// Load records from a previously written CSV. A missing file yields no records.
pub fn read_records(path: &Path) -> Result<Vec<ChargeRecord>, StoreError> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)?;
    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row?;
        let cells: Vec<&str> = row.iter().collect();
        records.push(ChargeRecord::from_row(&headers, &cells));
    }

    debug!("Loaded {} records from {}", records.len(), path.display());
    Ok(records)
}

/// Write a header row and one row per record, replacing the file.
pub fn write_records(path: &Path, records: &[ChargeRecord]) -> Result<(), StoreError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let mut wtr = csv::Writer::from_path(path)?;
    write_rows(&mut wtr, records)?;
    wtr.flush()?;

    debug!("Wrote {} records to {}", records.len(), path.display());
    Ok(())
}

/// Render records as CSV text, header included.
pub fn render_csv(records: &[ChargeRecord]) -> Result<String, StoreError> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    write_rows(&mut wtr, records)?;
    let bytes = wtr.into_inner().map_err(|e| StoreError::Io(e.into_error()))?;
    String::from_utf8(bytes).map_err(|_| StoreError::Encoding)
}

fn write_rows<W: std::io::Write>(
    wtr: &mut csv::Writer<W>,
    records: &[ChargeRecord],
) -> Result<(), StoreError> {
    wtr.write_record(CSV_COLUMNS)?;
    for record in records {
        wtr.write_record(record.to_row())?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::merge::merge;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn sample() -> ChargeRecord {
        ChargeRecord {
            date: NaiveDate::from_ymd_opt(2025, 12, 16),
            charger_name: Some("Shell Recharge, Southland".to_string()),
            charger_location: Some("Location A".to_string()),
            kwh_added: Some(Decimal::from_str("16.7").unwrap()),
            start_time: Some("12:00".to_string()),
            charger_brand: Some("fordpass".to_string()),
            ..ChargeRecord::default()
        }
        .with_duration(Some("2 hrs".to_string()))
    }

    #[test]
    fn test_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        assert!(read_records(&dir.path().join("none.csv")).unwrap().is_empty());
    }

    #[test]
    fn test_write_then_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("charges.csv");

        write_records(&path, &[sample()]).unwrap();
        let loaded = read_records(&path).unwrap();

        assert_eq!(loaded, vec![sample()]);
    }

    #[test]
    fn test_blank_cells_never_say_none() {
        let text = render_csv(&[ChargeRecord::for_brand("fordpass")]).unwrap();
        let mut lines = text.lines();

        assert_eq!(lines.next().unwrap(), CSV_COLUMNS.join(","));
        let row = lines.next().unwrap();
        assert_eq!(row, ",,,,,,,,,,,,,fordpass,");
        assert!(!text.contains("None") && !text.contains("null"));
    }

    #[test]
    fn test_csv_cells_match_field_strings() {
        let record = sample();
        let text = render_csv(std::slice::from_ref(&record)).unwrap();

        let mut reader = csv::Reader::from_reader(text.as_bytes());
        let row = reader.records().next().unwrap().unwrap();
        let cells: Vec<&str> = row.iter().collect();

        assert_eq!(cells[1], "Shell Recharge, Southland");
        assert_eq!(cells[4], "16.7");
        assert_eq!(cells[14], "120");
        assert_eq!(cells, record.to_row());
    }

    #[test]
    fn test_reads_legacy_file_and_appends() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("charges.csv");
        fs::write(
            &path,
            "date,charger_name,charger_location,duration,kwh_added,charger_kw_rating,charge_percentage,charge_miles,start_time,end_time,start_percentage,end_percentage,cost,charger_brand\n\
             2025-12-16,Shell Recharge,Location A,2 hrs,10,,,,12:00,14:00,20,80,$4.50,Shell\n",
        )
        .unwrap();

        let existing = read_records(&path).unwrap();
        assert_eq!(existing[0].cost, Some(Decimal::from_str("4.50").unwrap()));
        assert_eq!(existing[0].duration_minutes, Some(120));

        let later = ChargeRecord {
            date: NaiveDate::from_ymd_opt(2026, 1, 1),
            charger_location: Some("Location B".to_string()),
            start_time: Some("09:00".to_string()),
            ..ChargeRecord::default()
        };
        let merged = merge(existing, vec![later]);
        write_records(&path, &merged).unwrap();

        let reloaded = read_records(&path).unwrap();
        assert_eq!(reloaded.len(), 2);
        assert_eq!(reloaded[1].charger_location.as_deref(), Some("Location B"));
    }
}

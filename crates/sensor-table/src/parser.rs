//! Whitespace-Delimited Record Parser

use crate::error::TableError;
use crate::reading::{SensorReading, COLUMN_NAMES, SENSOR_CHANNELS, SETTING_COUNT};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info, warn};

/// Fields per record: id, cycle, 3 settings, 21 sensors
pub const EXPECTED_FIELDS: usize = 26;

/// Ground-truth RUL for one engine
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GroundTruthEntry {
    pub engine_id: u32,
    /// Actual remaining cycles as recorded; clipping is applied by the consumer
    pub actual_rul: f64,
}

/// Parse sensor records.
///
/// Blank lines are skipped. Records wider than [`EXPECTED_FIELDS`] are truncated
/// to the first 26 fields (trailing delimiter artifacts in the published data
/// sets); narrower records are rejected.
pub fn parse_readings(text: &str) -> Result<Vec<SensorReading>, TableError> {
    let mut readings = Vec::new();
    let mut truncated = 0usize;

    for (idx, line) in text.lines().enumerate() {
        let line_no = idx + 1;
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.is_empty() {
            continue;
        }
        if fields.len() < EXPECTED_FIELDS {
            return Err(TableError::ShortRecord {
                line: line_no,
                expected: EXPECTED_FIELDS,
                found: fields.len(),
            });
        }
        if fields.len() > EXPECTED_FIELDS {
            truncated += 1;
        }

        let mut values = [0.0f64; EXPECTED_FIELDS];
        for (col, (slot, raw)) in values.iter_mut().zip(&fields).enumerate() {
            *slot = raw.parse::<f64>().map_err(|_| TableError::InvalidNumber {
                line: line_no,
                column: COLUMN_NAMES[col],
                value: raw.to_string(),
            })?;
        }

        let mut settings = [0.0; SETTING_COUNT];
        settings.copy_from_slice(&values[2..2 + SETTING_COUNT]);
        let mut sensors = [0.0; SENSOR_CHANNELS];
        sensors.copy_from_slice(&values[2 + SETTING_COUNT..]);

        readings.push(SensorReading {
            engine_id: positive_integer(values[0], line_no, "id")?,
            cycle: positive_integer(values[1], line_no, "cycle")?,
            settings,
            sensors,
        });
    }

    if readings.is_empty() {
        return Err(TableError::Empty);
    }
    if truncated > 0 {
        warn!(
            "Truncated {} record(s) wider than {} fields",
            truncated, EXPECTED_FIELDS
        );
    }
    debug!("Parsed {} sensor records", readings.len());
    Ok(readings)
}

/// Parse a ground-truth file: one RUL value per line, line N belongs to engine N.
///
/// Only the first field of each line is read; blank lines are skipped and do
/// not advance the engine numbering.
pub fn parse_ground_truth(text: &str) -> Result<Vec<GroundTruthEntry>, TableError> {
    let mut entries = Vec::new();

    for (idx, line) in text.lines().enumerate() {
        let Some(raw) = line.split_whitespace().next() else {
            continue;
        };
        let actual_rul = raw.parse::<f64>().map_err(|_| TableError::InvalidNumber {
            line: idx + 1,
            column: "actual_rul",
            value: raw.to_string(),
        })?;
        entries.push(GroundTruthEntry {
            engine_id: entries.len() as u32 + 1,
            actual_rul,
        });
    }

    if entries.is_empty() {
        return Err(TableError::Empty);
    }
    Ok(entries)
}

/// Read and parse a ground-truth file
pub fn load_ground_truth(path: impl AsRef<Path>) -> Result<Vec<GroundTruthEntry>, TableError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|source| TableError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let entries = parse_ground_truth(&text)?;
    info!("Loaded {} ground-truth entries from {}", entries.len(), path.display());
    Ok(entries)
}

fn positive_integer(value: f64, line: usize, column: &'static str) -> Result<u32, TableError> {
    if value >= 1.0 && value.fract() == 0.0 && value <= u32::MAX as f64 {
        Ok(value as u32)
    } else {
        Err(TableError::InvalidIdentifier {
            line,
            column,
            value,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const ROW: &str = "1 1 -0.0007 -0.0004 100.0 518.67 641.82 1589.70 1400.60 14.62 21.61 554.36 2388.06 9046.19 1.30 47.47 521.66 2388.02 8138.62 8.4195 0.03 392 2388 100.00 39.06 23.4190";

    #[test]
    fn test_parse_single_row() {
        let readings = parse_readings(ROW).unwrap();
        assert_eq!(readings.len(), 1);
        let r = &readings[0];
        assert_eq!(r.engine_id, 1);
        assert_eq!(r.cycle, 1);
        assert_eq!(r.settings[2], 100.0);
        assert_eq!(r.value("s11"), Some(47.47));
        assert_eq!(r.value("s14"), Some(8138.62));
        assert_eq!(r.value("s21"), Some(23.4190));
    }

    #[test]
    fn test_wide_records_are_truncated() {
        let text = format!("{ROW}  0 0\n{ROW} 5");
        let readings = parse_readings(&text).unwrap();
        assert_eq!(readings.len(), 2);
        assert_eq!(readings[1].value("s21"), Some(23.4190));
    }

    #[test]
    fn test_short_record_rejected() {
        let err = parse_readings("1 1 0.0 0.0").unwrap_err();
        assert!(matches!(
            err,
            TableError::ShortRecord { line: 1, found: 4, .. }
        ));
    }

    #[test]
    fn test_non_numeric_field_rejected() {
        let text = ROW.replacen("518.67", "<html>", 1);
        let err = parse_readings(&text).unwrap_err();
        assert!(matches!(err, TableError::InvalidNumber { column: "s1", .. }));
    }

    #[test]
    fn test_identifier_must_be_positive_integer() {
        let text = ROW.replacen("1 1 ", "0 1 ", 1);
        assert!(matches!(
            parse_readings(&text).unwrap_err(),
            TableError::InvalidIdentifier { column: "id", .. }
        ));

        let text = ROW.replacen("1 1 ", "1 2.5 ", 1);
        assert!(matches!(
            parse_readings(&text).unwrap_err(),
            TableError::InvalidIdentifier { column: "cycle", .. }
        ));
    }

    #[test]
    fn test_blank_lines_skipped_and_empty_rejected() {
        let text = format!("\n{ROW}\n\n");
        assert_eq!(parse_readings(&text).unwrap().len(), 1);
        assert!(matches!(parse_readings("\n  \n"), Err(TableError::Empty)));
    }

    #[test]
    fn test_ground_truth_numbering() {
        let entries = parse_ground_truth("112\n98 \n\n69\n").unwrap();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0], GroundTruthEntry { engine_id: 1, actual_rul: 112.0 });
        assert_eq!(entries[2], GroundTruthEntry { engine_id: 3, actual_rul: 69.0 });
    }

    #[test]
    fn test_ground_truth_rejects_garbage() {
        assert!(parse_ground_truth("12\nabc\n").is_err());
        assert!(parse_ground_truth("").is_err());
    }

    proptest! {
        #[test]
        fn prop_trailing_fields_do_not_change_record(
            extra in proptest::collection::vec(-1.0e3f64..1.0e3, 1..6)
        ) {
            let tail: Vec<String> = extra.iter().map(|v| v.to_string()).collect();
            let wide = format!("{ROW} {}", tail.join(" "));
            prop_assert_eq!(parse_readings(&wide).unwrap(), parse_readings(ROW).unwrap());
        }

        #[test]
        fn prop_identifiers_parse_exactly(id in 1u32..1_000_000, cycle in 1u32..1_000_000) {
            let text = ROW.replacen("1 1 ", &format!("{id} {cycle} "), 1);
            let reading = &parse_readings(&text).unwrap()[0];
            prop_assert_eq!((reading.engine_id, reading.cycle), (id, cycle));
        }
    }
}

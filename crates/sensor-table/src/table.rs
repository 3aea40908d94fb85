//! Sensor Table with Per-Engine Snapshot Index

use crate::error::TableError;
use crate::parser::parse_readings;
use crate::reading::SensorReading;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{info, warn};

/// Read-only collection of sensor readings for one or more engines.
///
/// The latest reading per engine is resolved by maximum cycle, not by
/// position in the log.
#[derive(Debug, Clone, Default)]
pub struct SensorTable {
    readings: Vec<SensorReading>,
    /// engine_id -> index of its highest-cycle reading
    latest: BTreeMap<u32, usize>,
}

impl SensorTable {
    /// Build a table from already parsed readings
    pub fn from_readings(readings: Vec<SensorReading>) -> Self {
        let mut latest: BTreeMap<u32, usize> = BTreeMap::new();
        let mut out_of_order = 0usize;

        for (idx, reading) in readings.iter().enumerate() {
            match latest.get(&reading.engine_id) {
                Some(&prev) if readings[prev].cycle >= reading.cycle => out_of_order += 1,
                _ => {
                    latest.insert(reading.engine_id, idx);
                }
            }
        }

        if out_of_order > 0 {
            warn!(
                "{} reading(s) do not advance their engine's cycle count",
                out_of_order
            );
        }

        Self { readings, latest }
    }

    /// Parse whitespace-delimited records
    pub fn parse(text: &str) -> Result<Self, TableError> {
        parse_readings(text).map(Self::from_readings)
    }

    /// Load a table from a file on disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TableError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| TableError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let table = Self::parse(&text)?;
        info!(
            "Loaded {} readings for {} engines from {}",
            table.len(),
            table.engine_count(),
            path.display()
        );
        Ok(table)
    }

    /// Highest-cycle reading for an engine
    pub fn snapshot(&self, engine_id: u32) -> Option<&SensorReading> {
        self.latest.get(&engine_id).map(|&idx| &self.readings[idx])
    }

    /// All readings in log order
    pub fn readings(&self) -> &[SensorReading] {
        &self.readings
    }

    /// Number of readings
    pub fn len(&self) -> usize {
        self.readings.len()
    }

    /// Check if table is empty
    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    /// Number of distinct engines
    pub fn engine_count(&self) -> usize {
        self.latest.len()
    }
}

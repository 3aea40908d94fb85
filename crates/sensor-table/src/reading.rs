//! Sensor Reading Row

use serde::{Deserialize, Serialize};

/// Number of operating-setting columns
pub const SETTING_COUNT: usize = 3;

/// Number of sensor channels (s1..s21)
pub const SENSOR_CHANNELS: usize = 21;

/// Column names in file order
pub const COLUMN_NAMES: [&str; 26] = [
    "id", "cycle", "setting1", "setting2", "setting3", "s1", "s2", "s3", "s4", "s5", "s6", "s7",
    "s8", "s9", "s10", "s11", "s12", "s13", "s14", "s15", "s16", "s17", "s18", "s19", "s20", "s21",
];

/// Non-identifier columns (settings followed by sensors)
pub const MEASUREMENT_COLUMNS: [&str; 24] = [
    "setting1", "setting2", "setting3", "s1", "s2", "s3", "s4", "s5", "s6", "s7", "s8", "s9",
    "s10", "s11", "s12", "s13", "s14", "s15", "s16", "s17", "s18", "s19", "s20", "s21",
];

/// Position of a column in the file layout
pub fn column_index(name: &str) -> Option<usize> {
    COLUMN_NAMES.iter().position(|c| *c == name)
}

/// One operational cycle of one engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorReading {
    /// Physical unit identifier (1-based)
    pub engine_id: u32,
    /// Operational cycle count (1-based)
    pub cycle: u32,
    /// setting1..setting3
    pub settings: [f64; SETTING_COUNT],
    /// s1..s21
    pub sensors: [f64; SENSOR_CHANNELS],
}

impl SensorReading {
    /// Look up a measurement by column name.
    ///
    /// Identifier columns (`id`, `cycle`) are not measurements and return `None`.
    pub fn value(&self, column: &str) -> Option<f64> {
        let idx = column_index(column)?;
        match idx {
            0 | 1 => None,
            2..=4 => Some(self.settings[idx - 2]),
            _ => Some(self.sensors[idx - 2 - SETTING_COUNT]),
        }
    }
}

impl Default for SensorReading {
    fn default() -> Self {
        Self {
            engine_id: 1,
            cycle: 1,
            settings: [0.0; SETTING_COUNT],
            sensors: [0.0; SENSOR_CHANNELS],
        }
    }
}

//! Sensor Table
//!
//! Canonical in-memory representation of multi-cycle turbofan sensor logs,
//! parsed from whitespace-delimited records.

mod error;
mod parser;
mod reading;
mod table;

pub use error::TableError;
pub use parser::{
    load_ground_truth, parse_ground_truth, parse_readings, GroundTruthEntry, EXPECTED_FIELDS,
};
pub use reading::{
    column_index, SensorReading, COLUMN_NAMES, MEASUREMENT_COLUMNS, SENSOR_CHANNELS,
    SETTING_COUNT,
};
pub use table::SensorTable;

//! Feature Vector Assembly and Training Table Construction

use crate::labels::LabelPolicy;
use crate::FeatureError;
use sensor_table::{SensorReading, SensorTable, MEASUREMENT_COLUMNS};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, info};

/// Columns considered constant or noise-dominated in the FD001 regime
pub const DEFAULT_DENYLIST: [&str; 8] = ["setting3", "s1", "s5", "s6", "s10", "s16", "s18", "s19"];

/// Feature selection and labelling configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureConfig {
    /// Measurement columns excluded from the feature vector
    pub denylist: Vec<String>,
    /// Label clipping
    pub label: LabelPolicy,
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self {
            denylist: DEFAULT_DENYLIST.iter().map(|c| c.to_string()).collect(),
            label: LabelPolicy::default(),
        }
    }
}

/// Model input selected from one reading
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    /// Values in the order of the requested column names
    pub values: Vec<f64>,
}

impl FeatureVector {
    /// Select columns from a reading by name, in the given order.
    ///
    /// The caller's name list governs the layout; the table's own column order
    /// plays no part.
    pub fn from_reading<S: AsRef<str>>(
        reading: &SensorReading,
        columns: &[S],
    ) -> Result<Self, FeatureError> {
        let values = columns
            .iter()
            .map(|c| {
                let name = c.as_ref();
                reading
                    .value(name)
                    .ok_or_else(|| FeatureError::UnknownColumn(name.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { values })
    }
}

/// Supervised training table: one row per reading
#[derive(Debug, Clone, Default)]
pub struct TrainingTable {
    /// Feature column names, in row layout order
    pub columns: Vec<String>,
    /// Feature rows
    pub rows: Vec<Vec<f64>>,
    /// Clipped RUL label per row
    pub labels: Vec<f64>,
}

impl TrainingTable {
    /// Number of examples
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Check if table has no examples
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Builds training tables from run-to-failure histories
#[derive(Debug, Clone)]
pub struct FeatureLabelBuilder {
    columns: Vec<String>,
    policy: LabelPolicy,
}

impl FeatureLabelBuilder {
    /// Create a builder, resolving the feature columns from the denylist
    pub fn new(config: &FeatureConfig) -> Result<Self, FeatureError> {
        for denied in &config.denylist {
            if !MEASUREMENT_COLUMNS.contains(&denied.as_str()) {
                return Err(FeatureError::UnknownColumn(denied.clone()));
            }
        }

        let columns: Vec<String> = MEASUREMENT_COLUMNS
            .iter()
            .filter(|c| !config.denylist.iter().any(|d| d == *c))
            .map(|c| c.to_string())
            .collect();

        if columns.is_empty() {
            return Err(FeatureError::NoFeatures);
        }

        debug!("Feature columns: {:?}", columns);
        Ok(Self {
            columns,
            policy: config.label,
        })
    }

    /// Selected feature columns in canonical order
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Produce one labelled example per reading
    pub fn build(&self, table: &SensorTable) -> Result<TrainingTable, FeatureError> {
        let mut max_cycle: HashMap<u32, u32> = HashMap::new();
        for r in table.readings() {
            let entry = max_cycle.entry(r.engine_id).or_insert(r.cycle);
            *entry = (*entry).max(r.cycle);
        }

        let mut rows = Vec::with_capacity(table.len());
        let mut labels = Vec::with_capacity(table.len());

        for r in table.readings() {
            labels.push(self.policy.label(max_cycle[&r.engine_id], r.cycle));
            rows.push(FeatureVector::from_reading(r, &self.columns)?.values);
        }

        info!(
            "Built training table: {} examples, {} engines, {} features",
            rows.len(),
            max_cycle.len(),
            self.columns.len()
        );

        Ok(TrainingTable {
            columns: self.columns.clone(),
            rows,
            labels,
        })
    }
}

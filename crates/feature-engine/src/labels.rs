//! RUL Label Policy

use serde::{Deserialize, Serialize};

/// Upper bound on RUL labels and ground-truth values.
///
/// Engines further than this from failure are treated as equally healthy.
pub const RUL_CEILING: f64 = 125.0;

/// Clipping applied to training labels and ground-truth RUL
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelPolicy {
    /// Values above this become the ceiling
    pub ceiling: f64,
    /// Clip negative values (non-monotonic cycle logs) to zero
    pub clip_negative: bool,
}

impl Default for LabelPolicy {
    fn default() -> Self {
        Self {
            ceiling: RUL_CEILING,
            clip_negative: true,
        }
    }
}

impl LabelPolicy {
    /// Apply the policy to a raw RUL value
    pub fn clip(&self, rul: f64) -> f64 {
        let capped = rul.min(self.ceiling);
        if self.clip_negative {
            capped.max(0.0)
        } else {
            capped
        }
    }

    /// RUL label for a reading given its engine's final cycle
    pub fn label(&self, max_cycle: u32, cycle: u32) -> f64 {
        self.clip(max_cycle as f64 - cycle as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ceiling() {
        let policy = LabelPolicy::default();
        assert_eq!(policy.clip(200.0), 125.0);
        assert_eq!(policy.clip(125.0), 125.0);
        assert_eq!(policy.clip(42.0), 42.0);
    }

    #[test]
    fn test_negative_clip_is_optional() {
        let policy = LabelPolicy::default();
        assert_eq!(policy.label(3, 5), 0.0);

        let raw = LabelPolicy {
            clip_negative: false,
            ..Default::default()
        };
        assert_eq!(raw.label(3, 5), -2.0);
    }
}

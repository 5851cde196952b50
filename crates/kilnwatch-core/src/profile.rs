//! Plant profile: the metric set and tick period a simulation starts from.
//!
//! Profiles are JSON documents:
//!
//! ```json
//! {
//!   "tick_ms": 2000,
//!   "metrics": [
//!     { "name": "tsr", "label": "Thermal substitution rate", "unit": "%",
//!       "initial": 22.0, "target": 35.0, "bounds": { "min": 15.0, "max": 40.0 },
//!       "direction": "higher_is_better", "step_scale": 2.0 }
//!   ]
//! }
//! ```
//!
//! Omitting `step_scale` holds a metric static.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ProfileError;
use crate::metric::{Bounds, Direction, MetricSpec};
use crate::simulator::PlantState;

/// Default simulator period.
pub const DEFAULT_TICK_MS: u64 = 2000;

fn default_tick_ms() -> u64 {
    DEFAULT_TICK_MS
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlantProfile {
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,
    pub metrics: Vec<MetricSpec>,
}

impl PlantProfile {
    /// Parse and validate a profile from JSON text.
    pub fn from_json(text: &str) -> Result<Self, ProfileError> {
        let profile: Self = serde_json::from_str(text)?;
        profile.validate()?;
        Ok(profile)
    }

    /// Read, parse and validate a profile file.
    pub fn load(path: &Path) -> Result<Self, ProfileError> {
        let text = std::fs::read_to_string(path).map_err(|source| ProfileError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let profile = Self::from_json(&text)?;
        log::info!(
            "loaded profile {} ({} metrics, tick {}ms)",
            path.display(),
            profile.metrics.len(),
            profile.tick_ms
        );
        Ok(profile)
    }

    /// Check the tick period and every metric definition.
    pub fn validate(&self) -> Result<(), ProfileError> {
        if self.tick_ms == 0 {
            return Err(ProfileError::ZeroTick);
        }
        PlantState::from_profile(self).map(|_| ())
    }

    pub fn tick_period(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }

    /// Override the tick period; `None` keeps the profile's own.
    pub fn with_tick_ms(mut self, tick_ms: Option<u64>) -> Self {
        if let Some(ms) = tick_ms {
            self.tick_ms = ms;
        }
        self
    }
}

impl Default for PlantProfile {
    /// Cement plant sustainability metrics. Quality index and water usage are
    /// static; the rest random-walk.
    fn default() -> Self {
        Self {
            tick_ms: DEFAULT_TICK_MS,
            metrics: vec![
                metric(
                    "tsr",
                    "Thermal substitution rate",
                    "%",
                    22.0,
                    35.0,
                    (15.0, 40.0),
                    Direction::HigherIsBetter,
                    Some(2.0),
                ),
                metric(
                    "energy_efficiency",
                    "Energy efficiency",
                    "%",
                    85.2,
                    90.0,
                    (75.0, 95.0),
                    Direction::HigherIsBetter,
                    Some(1.0),
                ),
                metric(
                    "quality_index",
                    "Quality index",
                    "/100",
                    92.8,
                    95.0,
                    (85.0, 99.0),
                    Direction::HigherIsBetter,
                    None,
                ),
                metric(
                    "carbon_footprint",
                    "Carbon footprint",
                    "kg CO2/t",
                    820.0,
                    750.0,
                    (700.0, 950.0),
                    Direction::LowerIsBetter,
                    Some(2.0),
                ),
                metric(
                    "water_usage",
                    "Water usage",
                    "L/t",
                    245.0,
                    220.0,
                    (200.0, 300.0),
                    Direction::LowerIsBetter,
                    None,
                ),
                metric(
                    "specific_heat",
                    "Specific heat consumption",
                    "GJ/t clinker",
                    3.2,
                    3.0,
                    (2.9, 3.6),
                    Direction::LowerIsBetter,
                    Some(0.2),
                ),
            ],
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn metric(
    name: &str,
    label: &str,
    unit: &str,
    initial: f64,
    target: f64,
    (min, max): (f64, f64),
    direction: Direction,
    step_scale: Option<f64>,
) -> MetricSpec {
    MetricSpec {
        name: name.to_string(),
        label: label.to_string(),
        unit: unit.to_string(),
        initial,
        target,
        bounds: Bounds::new(min, max),
        direction,
        step_scale,
    }
}

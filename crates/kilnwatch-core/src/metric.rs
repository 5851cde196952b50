//! Named plant metrics with a target, hard bounds and a direction.

use serde::{Deserialize, Serialize};

use crate::error::MetricError;
use crate::status::{Status, ratio_percent};

/// Which way a metric improves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    #[default]
    HigherIsBetter,
    LowerIsBetter,
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::HigherIsBetter => write!(f, "higher_is_better"),
            Self::LowerIsBetter => write!(f, "lower_is_better"),
        }
    }
}

/// Raw movement of a metric's value over its last update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Increasing,
    Decreasing,
    Stable,
}

impl Trend {
    /// Changes smaller than this are stable.
    pub const EPSILON: f64 = 1e-9;

    pub fn between(previous: f64, current: f64) -> Self {
        let delta = current - previous;
        if delta > Self::EPSILON {
            Self::Increasing
        } else if delta < -Self::EPSILON {
            Self::Decreasing
        } else {
            Self::Stable
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Self::Increasing => "↑",
            Self::Decreasing => "↓",
            Self::Stable => "→",
        }
    }
}

impl std::fmt::Display for Trend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Increasing => write!(f, "increasing"),
            Self::Decreasing => write!(f, "decreasing"),
            Self::Stable => write!(f, "stable"),
        }
    }
}

/// Closed `[min, max]` range a metric's current value is held in.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: f64,
    pub max: f64,
}

impl Bounds {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    fn is_valid(&self) -> bool {
        self.min.is_finite() && self.max.is_finite() && self.min <= self.max
    }
}

/// Everything needed to build a [`MetricPair`]; also the on-disk profile form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricSpec {
    pub name: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub unit: String,
    pub initial: f64,
    pub target: f64,
    pub bounds: Bounds,
    #[serde(default)]
    pub direction: Direction,
    /// Random-walk amplitude per tick. Absent means the metric is held static.
    #[serde(default)]
    pub step_scale: Option<f64>,
}

/// A tracked metric.
///
/// `current` always lies within `bounds`; `target` never changes after
/// construction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricPair {
    name: String,
    label: String,
    unit: String,
    current: f64,
    /// Value before the last update.
    #[serde(skip)]
    previous: f64,
    target: f64,
    bounds: Bounds,
    direction: Direction,
    step_scale: Option<f64>,
}

impl MetricPair {
    /// Validate a spec and build the metric.
    pub fn new(spec: MetricSpec) -> Result<Self, MetricError> {
        let MetricSpec {
            name,
            label,
            unit,
            initial,
            target,
            bounds,
            direction,
            step_scale,
        } = spec;

        // Ratios against a negative target invert the meaning of progress.
        if !(target.is_finite() && target > 0.0) {
            return Err(MetricError::InvalidTarget { name, target });
        }
        if !bounds.is_valid() {
            return Err(MetricError::InvalidBounds {
                name,
                min: bounds.min,
                max: bounds.max,
            });
        }
        if !initial.is_finite() || !bounds.contains(initial) {
            return Err(MetricError::OutOfBounds {
                name,
                value: initial,
                min: bounds.min,
                max: bounds.max,
            });
        }
        if let Some(step) = step_scale.filter(|s| !(s.is_finite() && *s >= 0.0)) {
            return Err(MetricError::InvalidStep { name, step });
        }

        let label = if label.is_empty() { name.clone() } else { label };
        Ok(Self {
            name,
            label,
            unit,
            current: initial,
            previous: initial,
            target,
            bounds,
            direction,
            step_scale,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn label(&self) -> &str {
        &self.label
    }
    pub fn unit(&self) -> &str {
        &self.unit
    }
    pub fn current(&self) -> f64 {
        self.current
    }
    pub fn previous(&self) -> f64 {
        self.previous
    }
    pub fn target(&self) -> f64 {
        self.target
    }
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }
    pub fn direction(&self) -> Direction {
        self.direction
    }
    pub fn step_scale(&self) -> Option<f64> {
        self.step_scale
    }

    /// Whether the simulator moves this metric.
    pub fn is_simulated(&self) -> bool {
        self.step_scale.is_some_and(|s| s > 0.0)
    }

    /// Store a new current value, clamped into bounds. Returns the stored value.
    pub fn set_current(&mut self, value: f64) -> f64 {
        if value.is_nan() {
            return self.current;
        }
        self.previous = self.current;
        self.current = self.bounds.clamp(value);
        self.current
    }

    /// Movement of the raw value over the last update.
    pub fn trend(&self) -> Trend {
        Trend::between(self.previous, self.current)
    }

    /// Progress toward target as a percentage, oriented so that larger is
    /// always better. Targets are positive, so the ratio keeps its sign.
    ///
    /// A lower-is-better metric sitting at zero has reached its target.
    pub fn progress(&self) -> f64 {
        self.progress_at(self.current)
    }

    /// Progress before the last update.
    pub fn previous_progress(&self) -> f64 {
        self.progress_at(self.previous)
    }

    fn progress_at(&self, value: f64) -> f64 {
        match self.direction {
            Direction::HigherIsBetter => ratio_percent(value, self.target),
            Direction::LowerIsBetter => {
                if value <= 0.0 {
                    f64::INFINITY
                } else {
                    ratio_percent(self.target, value)
                }
            }
        }
    }

    /// Status of this metric; always consistent with [`Self::progress`].
    pub fn status(&self) -> Status {
        Status::from_progress(self.progress())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(initial: f64, target: f64) -> MetricSpec {
        MetricSpec {
            name: "tsr".into(),
            label: "Thermal substitution rate".into(),
            unit: "%".into(),
            initial,
            target,
            bounds: Bounds::new(15.0, 40.0),
            direction: Direction::HigherIsBetter,
            step_scale: Some(2.0),
        }
    }

    #[test]
    fn builds_valid_metric() {
        let m = MetricPair::new(spec(22.0, 35.0)).unwrap();
        assert_eq!(m.name(), "tsr");
        assert_eq!(m.current(), 22.0);
        assert_eq!(m.target(), 35.0);
        assert!(m.is_simulated());
        assert_eq!(m.status(), Status::Critical);
    }

    #[test]
    fn rejects_zero_target() {
        let err = MetricPair::new(spec(22.0, 0.0)).unwrap_err();
        assert!(matches!(err, MetricError::InvalidTarget { .. }));
    }

    #[test]
    fn rejects_negative_target() {
        let mut s = spec(-20.0, -10.0);
        s.bounds = Bounds::new(-30.0, 0.0);
        let err = MetricPair::new(s).unwrap_err();
        assert!(matches!(err, MetricError::InvalidTarget { target, .. } if target == -10.0));
        assert!(err.to_string().contains("positive"));
    }

    #[test]
    fn rejects_non_finite_target() {
        assert!(MetricPair::new(spec(22.0, f64::NAN)).is_err());
        assert!(MetricPair::new(spec(22.0, f64::INFINITY)).is_err());
    }

    #[test]
    fn rejects_inverted_bounds() {
        let mut s = spec(22.0, 35.0);
        s.bounds = Bounds::new(40.0, 15.0);
        assert!(matches!(
            MetricPair::new(s),
            Err(MetricError::InvalidBounds { .. })
        ));
    }

    #[test]
    fn rejects_initial_outside_bounds() {
        assert!(matches!(
            MetricPair::new(spec(41.0, 35.0)),
            Err(MetricError::OutOfBounds { .. })
        ));
    }

    #[test]
    fn rejects_negative_step() {
        let mut s = spec(22.0, 35.0);
        s.step_scale = Some(-1.0);
        assert!(matches!(
            MetricPair::new(s),
            Err(MetricError::InvalidStep { .. })
        ));
    }

    #[test]
    fn empty_label_falls_back_to_name() {
        let mut s = spec(22.0, 35.0);
        s.label.clear();
        assert_eq!(MetricPair::new(s).unwrap().label(), "tsr");
    }

    #[test]
    fn set_current_clamps() {
        let mut m = MetricPair::new(spec(22.0, 35.0)).unwrap();
        assert_eq!(m.set_current(100.0), 40.0);
        assert_eq!(m.set_current(-5.0), 15.0);
        assert_eq!(m.set_current(f64::NAN), 15.0);
        assert_eq!(m.target(), 35.0);
    }

    #[test]
    fn lower_is_better_inverts_progress_and_status_together() {
        let m = MetricPair::new(MetricSpec {
            name: "carbon_footprint".into(),
            label: String::new(),
            unit: "kg CO2/t".into(),
            initial: 820.0,
            target: 750.0,
            bounds: Bounds::new(700.0, 950.0),
            direction: Direction::LowerIsBetter,
            step_scale: Some(2.0),
        })
        .unwrap();
        let p = m.progress();
        assert!((p - 91.46).abs() < 0.01, "progress {p}");
        assert_eq!(m.status(), Status::Good);
    }

    #[test]
    fn lower_is_better_below_target_is_optimal() {
        let mut m = MetricPair::new(MetricSpec {
            name: "water_usage".into(),
            label: String::new(),
            unit: "L/t".into(),
            initial: 245.0,
            target: 220.0,
            bounds: Bounds::new(0.0, 300.0),
            direction: Direction::LowerIsBetter,
            step_scale: None,
        })
        .unwrap();
        m.set_current(200.0);
        assert_eq!(m.status(), Status::Optimal);
        m.set_current(0.0);
        assert_eq!(m.status(), Status::Optimal);
        assert!(!m.is_simulated());
    }

    #[test]
    fn trend_follows_last_update() {
        let mut m = MetricPair::new(spec(22.0, 35.0)).unwrap();
        assert_eq!(m.trend(), Trend::Stable);
        m.set_current(24.0);
        assert_eq!(m.trend(), Trend::Increasing);
        assert_eq!(m.previous(), 22.0);
        m.set_current(23.5);
        assert_eq!(m.trend(), Trend::Decreasing);
        m.set_current(23.5);
        assert_eq!(m.trend(), Trend::Stable);
    }

    #[test]
    fn clamped_update_at_bound_is_stable() {
        let mut m = MetricPair::new(spec(40.0, 35.0)).unwrap();
        m.set_current(45.0);
        assert_eq!(m.current(), 40.0);
        assert_eq!(m.trend(), Trend::Stable);
    }

    #[test]
    fn previous_progress_is_direction_aware() {
        let mut s = spec(820.0, 750.0);
        s.bounds = Bounds::new(700.0, 950.0);
        s.direction = Direction::LowerIsBetter;
        let mut m = MetricPair::new(s).unwrap();
        m.set_current(750.0);
        assert!((m.previous_progress() - 750.0 / 820.0 * 100.0).abs() < 1e-9);
        assert!((m.progress() - 100.0).abs() < 1e-9);
        assert_eq!(m.trend(), Trend::Decreasing);
    }

    #[test]
    fn spec_deserializes_with_defaults() {
        let s: MetricSpec = serde_json::from_str(
            r#"{"name":"x","initial":1.0,"target":2.0,"bounds":{"min":0.0,"max":3.0}}"#,
        )
        .unwrap();
        assert_eq!(s.direction, Direction::HigherIsBetter);
        assert_eq!(s.step_scale, None);
        assert!(s.label.is_empty());
    }
}

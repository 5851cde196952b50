//! Serializable point-in-time view of a plant.

use serde::Serialize;

use crate::metric::{Direction, MetricPair, Trend};
use crate::simulator::PlantState;
use crate::status::Status;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricView {
    pub name: String,
    pub label: String,
    pub unit: String,
    pub current: f64,
    pub target: f64,
    /// Percent of target, oriented so larger is better.
    pub progress: f64,
    pub status: Status,
    pub direction: Direction,
    pub simulated: bool,
    pub trend: Trend,
}

impl From<&MetricPair> for MetricView {
    fn from(m: &MetricPair) -> Self {
        Self {
            name: m.name().to_string(),
            label: m.label().to_string(),
            unit: m.unit().to_string(),
            current: m.current(),
            target: m.target(),
            progress: finite_progress(m.progress()),
            status: m.status(),
            direction: m.direction(),
            simulated: m.is_simulated(),
            trend: m.trend(),
        }
    }
}

// JSON has no infinity; a lower-is-better metric at zero reports as far past target.
fn finite_progress(p: f64) -> f64 {
    if p.is_finite() { p } else { f64::MAX }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSnapshot {
    pub tick: u64,
    /// Mean progress with each metric capped at 100.
    pub overall_score: f64,
    pub metrics: Vec<MetricView>,
}

impl DashboardSnapshot {
    pub fn capture(state: &PlantState) -> Self {
        let metrics: Vec<MetricView> = state.metrics().iter().map(MetricView::from).collect();
        Self {
            tick: state.tick(),
            overall_score: overall_score(state),
            metrics,
        }
    }

    pub fn metric(&self, name: &str) -> Option<&MetricView> {
        self.metrics.iter().find(|m| m.name == name)
    }
}

/// Mean of per-metric progress capped at 100. Zero for an empty plant.
pub fn overall_score(state: &PlantState) -> f64 {
    let metrics = state.metrics();
    if metrics.is_empty() {
        return 0.0;
    }
    let total: f64 = metrics.iter().map(|m| capped(m.progress())).sum();
    total / metrics.len() as f64
}

/// Progress as it counts toward a score: NaN is 0, anything past 100 is 100.
pub(crate) fn capped(progress: f64) -> f64 {
    if progress.is_nan() { 0.0 } else { progress.min(100.0) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::PlantProfile;

    fn state() -> PlantState {
        PlantState::from_profile(&PlantProfile::default()).unwrap()
    }

    #[test]
    fn capture_mirrors_state() {
        let s = state();
        let snap = DashboardSnapshot::capture(&s);
        assert_eq!(snap.tick, 0);
        assert_eq!(snap.metrics.len(), s.metrics().len());
        let tsr = snap.metric("tsr").unwrap();
        assert_eq!(tsr.current, 22.0);
        assert_eq!(tsr.status, Status::Critical);
        assert!(tsr.simulated);
        assert!(!snap.metric("quality_index").unwrap().simulated);
    }

    #[test]
    fn overall_score_caps_each_metric() {
        let mut s = state();
        for name in ["tsr", "energy_efficiency", "quality_index"] {
            let target = s.metric(name).unwrap().target();
            s.force(name, target * 2.0).unwrap();
        }
        for name in ["carbon_footprint", "water_usage", "specific_heat"] {
            s.force(name, 0.0).unwrap();
        }
        assert!((overall_score(&s) - 100.0).abs() < 1e-9);
    }

    #[test]
    fn overall_score_is_mean_progress() {
        let s = state();
        let expected: f64 =
            s.metrics().iter().map(|m| m.progress().min(100.0)).sum::<f64>() / 6.0;
        assert!((overall_score(&s) - expected).abs() < 1e-9);
        assert!(overall_score(&s) < 100.0);
    }

    #[test]
    fn snapshot_serializes() {
        let json = serde_json::to_value(DashboardSnapshot::capture(&state())).unwrap();
        assert_eq!(json["metrics"][0]["name"], "tsr");
        assert_eq!(json["metrics"][0]["status"], "critical");
        assert_eq!(json["metrics"][3]["direction"], "lower_is_better");
        assert_eq!(json["metrics"][0]["trend"], "stable");
    }

    #[test]
    fn view_carries_last_movement() {
        let mut s = state();
        s.force("tsr", 25.0).unwrap();
        s.force("carbon_footprint", 800.0).unwrap();
        let snap = DashboardSnapshot::capture(&s);
        assert_eq!(snap.metric("tsr").unwrap().trend, Trend::Increasing);
        assert_eq!(snap.metric("carbon_footprint").unwrap().trend, Trend::Decreasing);
        assert_eq!(snap.metric("water_usage").unwrap().trend, Trend::Stable);
    }
}

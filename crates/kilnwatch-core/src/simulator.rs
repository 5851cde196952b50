//! Simulated plant telemetry.
//!
//! Each tick nudges every simulated metric by a bounded random delta and clamps
//! it back into the metric's bounds:
//!
//! ```text
//! next = clamp(current + (uniform(0, 1) - 0.5) * step_scale, min, max)
//! ```
//!
//! The update is pure given the random source, so tests drive it with a
//! seeded [`rand::rngs::StdRng`]. Scheduling lives in [`crate::ticker`].

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use rand::Rng;

use crate::error::{MetricError, ProfileError};
use crate::metric::{Bounds, MetricPair};
use crate::profile::PlantProfile;
use crate::ticker::Ticker;

/// Plant state shared between a ticker and a view.
pub type SharedPlant = Arc<Mutex<PlantState>>;

/// One random-walk step. `draw` is a uniform sample in `[0, 1)`.
pub fn random_walk(current: f64, draw: f64, step_scale: f64, bounds: Bounds) -> f64 {
    bounds.clamp(current + (draw - 0.5) * step_scale)
}

/// The full metric set plus a tick counter.
#[derive(Debug, Clone, PartialEq)]
pub struct PlantState {
    metrics: Vec<MetricPair>,
    tick: u64,
}

impl PlantState {
    /// Build from validated metrics. Names must be unique.
    pub fn new(metrics: Vec<MetricPair>) -> Result<Self, MetricError> {
        let mut seen = HashSet::new();
        for m in &metrics {
            if !seen.insert(m.name()) {
                return Err(MetricError::Duplicate {
                    name: m.name().to_string(),
                });
            }
        }
        Ok(Self { metrics, tick: 0 })
    }

    pub fn from_profile(profile: &PlantProfile) -> Result<Self, ProfileError> {
        if profile.metrics.is_empty() {
            return Err(ProfileError::Empty);
        }
        let metrics = profile
            .metrics
            .iter()
            .cloned()
            .map(MetricPair::new)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(metrics)?)
    }

    pub fn metrics(&self) -> &[MetricPair] {
        &self.metrics
    }

    pub fn metric(&self, name: &str) -> Option<&MetricPair> {
        self.metrics.iter().find(|m| m.name() == name)
    }

    /// Number of ticks applied so far.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Advance one tick in place.
    pub fn step<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        for m in &mut self.metrics {
            let Some(step) = m.step_scale() else {
                continue;
            };
            let draw: f64 = rng.random();
            let next = random_walk(m.current(), draw, step, m.bounds());
            m.set_current(next);
        }
        self.tick += 1;
        log::debug!("plant tick {}", self.tick);
    }

    /// Set a metric explicitly. The value is clamped into the metric's
    /// bounds; the stored value is returned.
    pub fn force(&mut self, name: &str, value: f64) -> Result<f64, MetricError> {
        let m = self
            .metrics
            .iter_mut()
            .find(|m| m.name() == name)
            .ok_or_else(|| MetricError::Unknown(name.to_string()))?;
        let stored = m.set_current(value);
        if stored != value {
            log::warn!("{name}: forced value {value} clamped to {stored}");
        }
        Ok(stored)
    }

    /// Wrap for sharing with a ticker.
    pub fn into_shared(self) -> SharedPlant {
        Arc::new(Mutex::new(self))
    }
}

/// Pure form of [`PlantState::step`].
pub fn advance<R: Rng + ?Sized>(mut state: PlantState, rng: &mut R) -> PlantState {
    state.step(rng);
    state
}

/// Lock shared plant state, recovering it if a previous holder panicked.
pub fn lock_plant(plant: &SharedPlant) -> MutexGuard<'_, PlantState> {
    match plant.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

/// Start stepping `plant` every `period` on a background ticker.
///
/// The simulation stops when the returned [`Ticker`] is cancelled or dropped.
pub fn start_simulation<R>(plant: SharedPlant, period: Duration, mut rng: R) -> Ticker
where
    R: Rng + Send + 'static,
{
    Ticker::spawn(period, move || {
        lock_plant(&plant).step(&mut rng);
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metric::{Direction, MetricSpec};
    use crate::status::Status;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn default_state() -> PlantState {
        PlantState::from_profile(&PlantProfile::default()).unwrap()
    }

    #[test]
    fn random_walk_stays_in_bounds() {
        let b = Bounds::new(15.0, 40.0);
        assert_eq!(random_walk(40.0, 0.999, 2.0, b), 40.0);
        assert_eq!(random_walk(15.0, 0.0, 2.0, b), 15.0);
        assert!((random_walk(20.0, 1.0, 2.0, b) - 21.0).abs() < 1e-12);
        assert!((random_walk(20.0, 0.0, 2.0, b) - 19.0).abs() < 1e-12);
        assert_eq!(random_walk(20.0, 0.5, 2.0, b), 20.0);
    }

    #[test]
    fn clamp_is_idempotent_at_boundaries() {
        let b = Bounds::new(0.0, 10.0);
        let mut v = 10.0;
        for _ in 0..5 {
            v = random_walk(v, 1.0, 3.0, b);
            assert_eq!(v, 10.0);
        }
        let mut v = 0.0;
        for _ in 0..5 {
            v = random_walk(v, 0.0, 3.0, b);
            assert_eq!(v, 0.0);
        }
    }

    #[test]
    fn step_keeps_every_metric_in_bounds() {
        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut state = default_state();
            for _ in 0..500 {
                state.step(&mut rng);
                for m in state.metrics() {
                    assert!(
                        m.bounds().contains(m.current()),
                        "{} escaped bounds: {}",
                        m.name(),
                        m.current()
                    );
                }
            }
            assert_eq!(state.tick(), 500);
        }
    }

    #[test]
    fn step_never_touches_targets_or_static_metrics() {
        let mut rng = StdRng::seed_from_u64(7);
        let before = default_state();
        let after = (0..100).fold(before.clone(), |s, _| advance(s, &mut rng));
        for (a, b) in before.metrics().iter().zip(after.metrics()) {
            assert_eq!(a.target(), b.target());
            if !a.is_simulated() {
                assert_eq!(a.current(), b.current(), "{} moved", a.name());
            }
        }
        assert_ne!(
            before.metric("tsr").unwrap().current(),
            after.metric("tsr").unwrap().current()
        );
    }

    #[test]
    fn seeded_runs_are_reproducible() {
        let run = |seed| {
            let mut rng = StdRng::seed_from_u64(seed);
            (0..50).fold(default_state(), |s, _| advance(s, &mut rng))
        };
        assert_eq!(run(42), run(42));
        assert_ne!(run(42), run(43));
    }

    #[test]
    fn force_scenario() {
        let mut state = default_state();
        assert_eq!(state.metric("tsr").unwrap().status(), Status::Critical);
        assert_eq!(state.force("tsr", 34.0).unwrap(), 34.0);
        let tsr = state.metric("tsr").unwrap();
        assert!((tsr.progress() - 97.14).abs() < 0.01);
        assert_eq!(tsr.status(), Status::Optimal);
    }

    #[test]
    fn force_clamps_and_rejects_unknown() {
        let mut state = default_state();
        assert_eq!(state.force("tsr", 99.0).unwrap(), 40.0);
        assert_eq!(
            state.force("nox", 1.0),
            Err(MetricError::Unknown("nox".into()))
        );
    }

    #[test]
    fn duplicate_names_rejected() {
        let spec = MetricSpec {
            name: "tsr".into(),
            label: String::new(),
            unit: String::new(),
            initial: 1.0,
            target: 2.0,
            bounds: Bounds::new(0.0, 3.0),
            direction: Direction::HigherIsBetter,
            step_scale: None,
        };
        let a = MetricPair::new(spec.clone()).unwrap();
        let b = MetricPair::new(spec).unwrap();
        assert!(matches!(
            PlantState::new(vec![a, b]),
            Err(MetricError::Duplicate { .. })
        ));
    }

    #[test]
    fn empty_profile_rejected() {
        let profile = PlantProfile {
            tick_ms: 100,
            metrics: vec![],
        };
        assert!(matches!(
            PlantState::from_profile(&profile),
            Err(ProfileError::Empty)
        ));
    }
}

//! Integration tests for kilnwatch-core.
//!
//! These tests exercise the full loop:
//! profile → plant state → background ticker → snapshot / alerts → teardown.

use std::thread;
use std::time::{Duration, Instant};

use kilnwatch_core::{
    CategoryTrend, DashboardSnapshot, OptimizationArea, PlantProfile, PlantState, SeriesKind,
    Status, Trend, classify, derive_alerts, focus_areas, lock_plant, performance_summary,
    start_simulation,
};
use rand::SeedableRng;
use rand::rngs::StdRng;

fn shared_default() -> kilnwatch_core::SharedPlant {
    PlantState::from_profile(&PlantProfile::default())
        .unwrap()
        .into_shared()
}

fn wait_for_tick(plant: &kilnwatch_core::SharedPlant, tick: u64) {
    let deadline = Instant::now() + Duration::from_secs(5);
    while lock_plant(plant).tick() < tick {
        assert!(Instant::now() < deadline, "simulation never reached tick {tick}");
        thread::sleep(Duration::from_millis(2));
    }
}

#[test]
fn background_simulation_advances_and_stays_bounded() {
    let plant = shared_default();
    let mut ticker = start_simulation(
        plant.clone(),
        Duration::from_millis(2),
        StdRng::seed_from_u64(11),
    );
    wait_for_tick(&plant, 20);
    ticker.cancel();

    let state = lock_plant(&plant);
    assert!(state.tick() >= 20);
    for m in state.metrics() {
        assert!(m.bounds().contains(m.current()), "{} out of bounds", m.name());
    }
}

#[test]
fn no_updates_after_teardown() {
    let plant = shared_default();
    let mut ticker = start_simulation(
        plant.clone(),
        Duration::from_millis(5),
        StdRng::seed_from_u64(3),
    );
    wait_for_tick(&plant, 2);
    ticker.cancel();

    let frozen = lock_plant(&plant).clone();
    // Several periods' worth of time.
    thread::sleep(Duration::from_millis(50));
    assert_eq!(*lock_plant(&plant), frozen);
}

#[test]
fn dropping_the_ticker_stops_the_simulation() {
    let plant = shared_default();
    {
        let _ticker = start_simulation(
            plant.clone(),
            Duration::from_millis(2),
            StdRng::seed_from_u64(5),
        );
        wait_for_tick(&plant, 3);
    }
    let tick = lock_plant(&plant).tick();
    thread::sleep(Duration::from_millis(30));
    assert_eq!(lock_plant(&plant).tick(), tick);
}

#[test]
fn tsr_scenario_end_to_end() {
    let mut plant = PlantState::from_profile(&PlantProfile::default()).unwrap();
    let tsr = plant.metric("tsr").unwrap();
    assert_eq!(classify(tsr.current(), tsr.target()), Status::Critical);
    assert_eq!(derive_alerts(&plant)[0].metric, "tsr");

    plant.force("tsr", 34.0).unwrap();
    let snap = DashboardSnapshot::capture(&plant);
    let tsr = snap.metric("tsr").unwrap();
    assert!((tsr.progress - 97.14).abs() < 0.01);
    assert_eq!(tsr.status, Status::Optimal);
    assert!(derive_alerts(&plant).iter().all(|a| a.metric != "tsr"));
}

#[test]
fn custom_profile_drives_simulation() {
    let profile = PlantProfile::from_json(
        r#"{
            "tick_ms": 50,
            "metrics": [
                {"name": "nox", "label": "NOx", "unit": "mg/Nm3",
                 "initial": 420, "target": 400, "bounds": {"min": 350, "max": 500},
                 "direction": "lower_is_better", "step_scale": 10.0}
            ]
        }"#,
    )
    .unwrap();
    assert_eq!(profile.tick_period(), Duration::from_millis(50));

    let mut rng = StdRng::seed_from_u64(9);
    let mut plant = PlantState::from_profile(&profile).unwrap();
    for _ in 0..200 {
        plant.step(&mut rng);
        let nox = plant.metric("nox").unwrap();
        assert!((350.0..=500.0).contains(&nox.current()));
        assert_eq!(nox.target(), 400.0);
    }
}

#[test]
fn every_series_kind_generates() {
    let mut rng = StdRng::seed_from_u64(1);
    for kind in SeriesKind::ALL {
        let records = kind.generate(&mut rng);
        assert_eq!(records.len(), kind.length());
        assert!(records.iter().all(|r| r.values.len() == kind.fields().len()));
    }
}

#[test]
fn trends_track_each_step() {
    let mut plant = PlantState::from_profile(&PlantProfile::default()).unwrap();
    let mut rng = StdRng::seed_from_u64(11);
    for _ in 0..20 {
        let before: Vec<f64> = plant.metrics().iter().map(|m| m.current()).collect();
        plant.step(&mut rng);
        let snap = DashboardSnapshot::capture(&plant);
        for (view, prev) in snap.metrics.iter().zip(before) {
            assert_eq!(view.trend, Trend::between(prev, view.current), "{}", view.name);
        }
        let summary = performance_summary(&plant);
        assert_eq!(summary.tick, snap.tick);
        assert!((summary.overall_score - snap.overall_score).abs() < 1e-9);
        for c in summary.categories.values() {
            assert!((0.0..=100.0).contains(&c.score));
        }
    }
}

#[test]
fn tsr_recovery_shows_in_summary_and_focus() {
    let mut plant = PlantState::from_profile(&PlantProfile::default()).unwrap();
    let fuels_before = performance_summary(&plant).categories[&OptimizationArea::Fuels].score;

    plant.force("tsr", 34.0).unwrap();
    let summary = performance_summary(&plant);
    let fuels = &summary.categories[&OptimizationArea::Fuels];
    assert_eq!(fuels.trend, CategoryTrend::Improving);
    assert!(fuels.score > fuels_before);
    assert_eq!(fuels.key_metric, "carbon_footprint");

    let focus = focus_areas(&plant);
    let fuel_focus = focus.iter().find(|f| f.area == OptimizationArea::Fuels).unwrap();
    assert!((fuel_focus.score - fuels.score).abs() < 1e-9);
    assert_eq!(fuel_focus.metrics[0].trend, Trend::Increasing);
}

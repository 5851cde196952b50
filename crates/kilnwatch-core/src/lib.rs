//! # kilnwatch-core
//!
//! **Sustainability telemetry for a cement plant, simulated.**
//!
//! `kilnwatch-core` tracks a fixed set of plant metrics (thermal substitution
//! rate, energy efficiency, quality index, carbon footprint, water usage,
//! specific heat), random-walks them on a fixed tick, and classifies each one
//! against its target.
//!
//! ## Quick Start
//!
//! ```
//! use kilnwatch_core::{PlantProfile, PlantState, Status};
//! use rand::SeedableRng;
//!
//! let mut plant = PlantState::from_profile(&PlantProfile::default()).unwrap();
//! assert_eq!(plant.metric("tsr").unwrap().status(), Status::Critical);
//!
//! let mut rng = rand::rngs::StdRng::seed_from_u64(7);
//! plant.step(&mut rng);
//! assert_eq!(plant.tick(), 1);
//! ```
//!
//! ## Architecture
//!
//! Profile → PlantState → (Ticker drives `step`) → Snapshot / Alerts
//!
//! - [`PlantState::step`] / [`advance`] are pure given the injected RNG.
//! - [`Ticker`] is the only scheduler: one worker thread, fixed period,
//!   cancelled exactly once on teardown.
//! - [`classify`] buckets percent-of-target into four [`Status`]es;
//!   [`MetricPair::status`] orients that by [`Direction`] first.
//! - [`SeriesKind`] feeds chart panels with fresh synthetic data.
//! - [`performance_summary`] and [`focus_areas`] group metrics by
//!   [`OptimizationArea`].

pub mod alerts;
pub mod error;
pub mod metric;
pub mod optimize;
pub mod profile;
pub mod series;
pub mod simulator;
pub mod snapshot;
pub mod status;
pub mod summary;
pub mod ticker;

pub use alerts::{Alert, derive_alerts};
pub use error::{MetricError, ProfileError, UnknownArea, UnknownSeries};
pub use metric::{Bounds, Direction, MetricPair, MetricSpec, Trend};
pub use optimize::{OptimizationArea, OptimizationTicket, request_optimization};
pub use profile::{DEFAULT_TICK_MS, PlantProfile};
pub use series::{FieldSpec, SeriesKind, SeriesRecord};
pub use simulator::{
    PlantState, SharedPlant, advance, lock_plant, random_walk, start_simulation,
};
pub use snapshot::{DashboardSnapshot, MetricView, overall_score};
pub use status::{Status, StatusStyle, classify, ratio_percent};
pub use summary::{
    CategoryScore, CategoryTrend, FocusArea, PerformanceSummary, Priority, Recommendation,
    focus_areas, performance_summary,
};
pub use ticker::Ticker;

/// Library version (from Cargo.toml).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

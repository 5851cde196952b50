//! Error types for metric construction and profile loading.
//!
//! The simulator and the classifier cannot fail; everything here comes from
//! building a plant out of untrusted numbers or looking things up by name.

use std::path::PathBuf;

use thiserror::Error;

/// Rejected metric definitions and lookups.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MetricError {
    #[error("metric {name}: target must be finite and positive, got {target}")]
    InvalidTarget { name: String, target: f64 },
    #[error("metric {name}: bounds [{min}, {max}] are not a finite ascending range")]
    InvalidBounds { name: String, min: f64, max: f64 },
    #[error("metric {name}: initial value {value} lies outside [{min}, {max}]")]
    OutOfBounds {
        name: String,
        value: f64,
        min: f64,
        max: f64,
    },
    #[error("metric {name}: step scale must be finite and non-negative, got {step}")]
    InvalidStep { name: String, step: f64 },
    #[error("metric {name} is defined more than once")]
    Duplicate { name: String },
    #[error("unknown metric {0}")]
    Unknown(String),
}

/// Failures while reading or validating a [`crate::profile::PlantProfile`].
#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("failed to read profile {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed profile: {0}")]
    Parse(#[from] serde_json::Error),
    #[error(transparent)]
    Metric(#[from] MetricError),
    #[error("tick period must be at least 1 ms")]
    ZeroTick,
    #[error("profile defines no metrics")]
    Empty,
}

/// A string that does not name any [`crate::optimize::OptimizationArea`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown optimization area {0:?} (expected fuels, energy, quality or cross-process)")]
pub struct UnknownArea(pub String);

/// A string that does not name any [`crate::series::SeriesKind`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error(
    "unknown series {0:?} (expected fuel-mix, energy-profile, quality-trend or cross-process)"
)]
pub struct UnknownSeries(pub String);

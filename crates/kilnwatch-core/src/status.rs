//! Four-level status classification of progress toward a target.
//!
//! A metric's progress is expressed as a percentage of its target and bucketed
//! high to low; the first threshold met wins:
//!
//! | progress | status |
//! |---|---|
//! | `>= 95 %` | [`Status::Optimal`] |
//! | `>= 85 %` | [`Status::Good`] |
//! | `>= 70 %` | [`Status::Warning`] |
//! | otherwise | [`Status::Critical`] |

use serde::{Deserialize, Serialize};

/// Progress (percent of target) at or above which a metric is optimal.
pub const OPTIMAL_THRESHOLD: f64 = 95.0;
/// Progress at or above which a metric is good.
pub const GOOD_THRESHOLD: f64 = 85.0;
/// Progress at or above which a metric is a warning rather than critical.
pub const WARNING_THRESHOLD: f64 = 70.0;

/// Ordinal status of a metric. Ordering follows severity:
/// `Critical < Warning < Good < Optimal`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Critical,
    Warning,
    Good,
    Optimal,
}

/// Display attributes for a status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusStyle {
    pub label: &'static str,
    /// `#rrggbb`
    pub color: &'static str,
    pub symbol: &'static str,
}

// Indexed by `Status as usize`.
const STYLES: [StatusStyle; 4] = [
    StatusStyle {
        label: "Critical",
        color: "#ef4444",
        symbol: "✖",
    },
    StatusStyle {
        label: "Warning",
        color: "#f59e0b",
        symbol: "▲",
    },
    StatusStyle {
        label: "Good",
        color: "#3b82f6",
        symbol: "●",
    },
    StatusStyle {
        label: "Optimal",
        color: "#22c55e",
        symbol: "✔",
    },
];

impl Status {
    pub const ALL: [Status; 4] = [
        Status::Critical,
        Status::Warning,
        Status::Good,
        Status::Optimal,
    ];

    /// Bucket a progress percentage. NaN is critical.
    pub fn from_progress(progress: f64) -> Self {
        if progress >= OPTIMAL_THRESHOLD {
            Self::Optimal
        } else if progress >= GOOD_THRESHOLD {
            Self::Good
        } else if progress >= WARNING_THRESHOLD {
            Self::Warning
        } else {
            Self::Critical
        }
    }

    pub fn style(self) -> &'static StatusStyle {
        &STYLES[self as usize]
    }

    pub fn label(self) -> &'static str {
        self.style().label
    }

    /// Whether this status should raise an alert.
    pub fn needs_attention(self) -> bool {
        self <= Self::Warning
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Critical => write!(f, "critical"),
            Self::Warning => write!(f, "warning"),
            Self::Good => write!(f, "good"),
            Self::Optimal => write!(f, "optimal"),
        }
    }
}

/// `current / target * 100`. A zero or negative target yields NaN.
pub fn ratio_percent(current: f64, target: f64) -> f64 {
    if target <= 0.0 {
        return f64::NAN;
    }
    current / target * 100.0
}

/// Classify `current` against `target`, treating higher as better.
///
/// A zero or negative target is critical by convention; callers that hold a
/// [`crate::metric::MetricPair`] never see one because construction rejects it.
pub fn classify(current: f64, target: f64) -> Status {
    Status::from_progress(ratio_percent(current, target))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thresholds_are_inclusive() {
        assert_eq!(classify(95.0, 100.0), Status::Optimal);
        assert_eq!(classify(85.0, 100.0), Status::Good);
        assert_eq!(classify(84.999, 100.0), Status::Warning);
        assert_eq!(classify(70.0, 100.0), Status::Warning);
        assert_eq!(classify(69.999, 100.0), Status::Critical);
    }

    #[test]
    fn above_target_is_optimal() {
        assert_eq!(classify(140.0, 100.0), Status::Optimal);
    }

    #[test]
    fn zero_target_is_critical() {
        assert_eq!(classify(10.0, 0.0), Status::Critical);
        assert_eq!(classify(0.0, 0.0), Status::Critical);
        assert!(ratio_percent(1.0, 0.0).is_nan());
    }

    #[test]
    fn negative_target_is_critical() {
        assert_eq!(classify(-20.0, -10.0), Status::Critical);
        assert!(ratio_percent(-20.0, -10.0).is_nan());
    }

    #[test]
    fn nan_progress_is_critical() {
        assert_eq!(Status::from_progress(f64::NAN), Status::Critical);
    }

    #[test]
    fn classify_is_monotonic_in_current() {
        let target = 35.0;
        let mut prev = Status::Critical;
        for i in 0..=500 {
            let current = i as f64 * 0.1;
            let s = classify(current, target);
            assert!(s >= prev, "status dropped at current={current}");
            prev = s;
        }
        assert_eq!(prev, Status::Optimal);
    }

    #[test]
    fn tsr_scenario() {
        let ratio = ratio_percent(22.0, 35.0);
        assert!((ratio - 62.857).abs() < 0.01);
        assert_eq!(classify(22.0, 35.0), Status::Critical);
        assert_eq!(classify(34.0, 35.0), Status::Optimal);
    }

    #[test]
    fn ordering_matches_severity() {
        assert!(Status::Critical < Status::Warning);
        assert!(Status::Warning < Status::Good);
        assert!(Status::Good < Status::Optimal);
    }

    #[test]
    fn style_table_lines_up_with_variants() {
        for s in Status::ALL {
            assert_eq!(s.style().label.to_lowercase(), s.to_string());
            assert!(s.style().color.starts_with('#'));
            assert_eq!(s.style().color.len(), 7);
        }
    }

    #[test]
    fn attention_covers_warning_and_critical() {
        assert!(Status::Critical.needs_attention());
        assert!(Status::Warning.needs_attention());
        assert!(!Status::Good.needs_attention());
        assert!(!Status::Optimal.needs_attention());
    }

    #[test]
    fn serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&Status::Optimal).unwrap(),
            "\"optimal\""
        );
    }
}

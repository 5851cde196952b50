//! Per-area performance scores and focus areas with recommendations.
//!
//! Both views are derived from a single [`PlantState`]; trends compare each
//! metric against its value before the last update.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::metric::MetricPair;
use crate::optimize::OptimizationArea;
use crate::simulator::PlantState;
use crate::snapshot::{MetricView, capped, overall_score};

/// Direction of an area's capped progress over the last tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryTrend {
    Improving,
    Declining,
    Stable,
}

impl CategoryTrend {
    /// Net progress changes smaller than this are stable.
    pub const EPSILON: f64 = 1e-6;

    fn from_delta(delta: f64) -> Self {
        if delta > Self::EPSILON {
            Self::Improving
        } else if delta < -Self::EPSILON {
            Self::Declining
        } else {
            Self::Stable
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Self::Improving => "▲",
            Self::Declining => "▼",
            Self::Stable => "■",
        }
    }
}

impl std::fmt::Display for CategoryTrend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(match self {
            Self::Improving => "improving",
            Self::Declining => "declining",
            Self::Stable => "stable",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryScore {
    /// Mean capped progress of the area's metrics.
    pub score: f64,
    pub trend: CategoryTrend,
    /// Name of the area's weakest metric.
    pub key_metric: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PerformanceSummary {
    pub tick: u64,
    pub overall_score: f64,
    pub categories: BTreeMap<OptimizationArea, CategoryScore>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Recommendation {
    pub title: &'static str,
    pub description: &'static str,
    pub priority: Priority,
    pub estimated_impact: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FocusArea {
    pub area: OptimizationArea,
    pub name: &'static str,
    pub description: &'static str,
    /// Same value as the area's [`CategoryScore::score`]; zero when the plant
    /// has none of the area's metrics.
    pub score: f64,
    pub metrics: Vec<MetricView>,
    pub recommendations: Vec<Recommendation>,
    pub priority_score: f64,
}

struct FocusContent {
    name: &'static str,
    description: &'static str,
    priority_score: f64,
    recommendations: &'static [Recommendation],
}

const fn rec(
    title: &'static str,
    description: &'static str,
    priority: Priority,
    estimated_impact: &'static str,
) -> Recommendation {
    Recommendation {
        title,
        description,
        priority,
        estimated_impact,
    }
}

static FUELS: FocusContent = FocusContent {
    name: "Improve Fuel Efficiency",
    description: "Cut fuel consumption and raise alternative fuel substitution",
    priority_score: 8.8,
    recommendations: &[
        rec(
            "Maximize Alternative Fuel Usage",
            "Raise RDF and biomass feed rates within kiln stability limits",
            Priority::High,
            "0.2 GJ/t reduction",
        ),
        rec(
            "Optimize Fuel Mix",
            "Rebalance coal, petcoke and alternative fuels on cost and calorific value",
            Priority::Medium,
            "5-8% fuel cost reduction",
        ),
    ],
};

static ENERGY: FocusContent = FocusContent {
    name: "Reduce Specific Power Consumption",
    description: "Lower energy use across raw and cement grinding",
    priority_score: 9.2,
    recommendations: &[
        rec(
            "Optimize Grinding Media Distribution",
            "Adjust ball charge grading in the cement mills",
            Priority::High,
            "2-3 kWh/t reduction",
        ),
        rec(
            "Deploy Soft Sensors for Mill Control",
            "Estimate fineness online and close the loop on separator speed",
            Priority::Medium,
            "1.5-2 kWh/t reduction",
        ),
    ],
};

static QUALITY: FocusContent = FocusContent {
    name: "Ensure Consistent Quality",
    description: "Hold cement quality parameters steady and reduce variability",
    priority_score: 9.5,
    recommendations: &[
        rec(
            "Adaptive Blaine Control",
            "Track Blaine deviations and retune the mill controller automatically",
            Priority::High,
            "50% variability reduction",
        ),
        rec(
            "Improve Raw Mix Homogenization",
            "Tighten stockpile blending ahead of the kiln feed",
            Priority::Medium,
            "0.3% free lime reduction",
        ),
    ],
};

static CROSS_PROCESS: FocusContent = FocusContent {
    name: "Enhance Operational Stability",
    description: "Improve stability across process sections and reduce swings",
    priority_score: 7.8,
    recommendations: &[
        rec(
            "Advanced Process Control",
            "Coordinate kiln, cooler and mill setpoints with a multivariable controller",
            Priority::Medium,
            "30% variability reduction",
        ),
        rec(
            "Extend Sensor Coverage",
            "Add redundant measurements at the preheater and cooler",
            Priority::Low,
            "Better monitoring",
        ),
    ],
};

fn content(area: OptimizationArea) -> &'static FocusContent {
    match area {
        OptimizationArea::Fuels => &FUELS,
        OptimizationArea::Energy => &ENERGY,
        OptimizationArea::Quality => &QUALITY,
        OptimizationArea::CrossProcess => &CROSS_PROCESS,
    }
}

fn area_metrics(state: &PlantState, area: OptimizationArea) -> Vec<&MetricPair> {
    area.metric_names()
        .iter()
        .filter_map(|name| state.metric(name))
        .collect()
}

fn category_score(metrics: &[&MetricPair]) -> Option<CategoryScore> {
    let weakest = metrics.iter().min_by(|a, b| {
        capped(a.progress()).total_cmp(&capped(b.progress()))
    })?;
    let n = metrics.len() as f64;
    let score = metrics.iter().map(|m| capped(m.progress())).sum::<f64>() / n;
    let delta: f64 = metrics
        .iter()
        .map(|m| capped(m.progress()) - capped(m.previous_progress()))
        .sum();
    Some(CategoryScore {
        score,
        trend: CategoryTrend::from_delta(delta),
        key_metric: weakest.name().to_string(),
    })
}

/// Overall score plus one entry per area that has at least one metric.
pub fn performance_summary(state: &PlantState) -> PerformanceSummary {
    let categories = OptimizationArea::ALL
        .into_iter()
        .filter_map(|area| category_score(&area_metrics(state, area)).map(|c| (area, c)))
        .collect();
    PerformanceSummary {
        tick: state.tick(),
        overall_score: overall_score(state),
        categories,
    }
}

/// Every area with its current metrics and recommendations, highest
/// `priority_score` first.
pub fn focus_areas(state: &PlantState) -> Vec<FocusArea> {
    let mut areas: Vec<FocusArea> = OptimizationArea::ALL
        .into_iter()
        .map(|area| {
            let c = content(area);
            let metrics = area_metrics(state, area);
            FocusArea {
                area,
                name: c.name,
                description: c.description,
                score: category_score(&metrics).map_or(0.0, |s| s.score),
                metrics: metrics.into_iter().map(MetricView::from).collect(),
                recommendations: c.recommendations.to_vec(),
                priority_score: c.priority_score,
            }
        })
        .collect();
    areas.sort_by(|a, b| b.priority_score.total_cmp(&a.priority_score));
    areas
}

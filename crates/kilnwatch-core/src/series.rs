//! Synthetic chart series.
//!
//! Every chart panel is fed by the same generator: a list of record labels and
//! a list of numeric fields, each drawn uniformly from its range. The four
//! built-in [`SeriesKind`]s are just table entries over that generator.
//! Output is fresh on every call and has no relation to the simulated plant.

use std::collections::BTreeMap;
use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::UnknownSeries;

/// A numeric field and the uniform range it is drawn from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub unit: &'static str,
    pub min: f64,
    pub max: f64,
}

const fn field(name: &'static str, unit: &'static str, min: f64, max: f64) -> FieldSpec {
    FieldSpec {
        name,
        unit,
        min,
        max,
    }
}

/// One labelled record of a series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesRecord {
    pub label: String,
    pub values: BTreeMap<String, f64>,
}

impl SeriesRecord {
    pub fn value(&self, field: &str) -> Option<f64> {
        self.values.get(field).copied()
    }
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// Draw one record per label with every field sampled from its range and
/// rounded to two decimals.
pub fn generate<R: Rng + ?Sized>(
    labels: &[String],
    fields: &[FieldSpec],
    rng: &mut R,
) -> Vec<SeriesRecord> {
    labels
        .iter()
        .map(|label| SeriesRecord {
            label: label.clone(),
            values: fields
                .iter()
                .map(|f| {
                    let v = if f.max > f.min {
                        rng.random_range(f.min..=f.max)
                    } else {
                        f.min
                    };
                    (f.name.to_string(), round2(v))
                })
                .collect(),
        })
        .collect()
}

/// Rescale `field` across records so it sums to `total`, keeping two
/// decimals. Rounding can leave the sum a few hundredths off `total`.
pub fn normalize(records: &mut [SeriesRecord], field: &str, total: f64) {
    let sum: f64 = records.iter().filter_map(|r| r.value(field)).sum();
    if sum <= 0.0 {
        return;
    }
    for r in records.iter_mut() {
        if let Some(v) = r.values.get_mut(field) {
            *v = round2(*v / sum * total);
        }
    }
}

const FUEL_LABELS: &[&str] = &[
    "Coal",
    "Petcoke",
    "RDF",
    "Biomass",
    "Tyre-derived fuel",
    "Plastic waste",
];

const PROCESS_LABELS: &[&str] = &[
    "Raw mill",
    "Kiln",
    "Clinker cooler",
    "Cement mill",
    "Packing",
    "Utilities",
];

// `share` is drawn from 5..=40 and then normalized to sum to 100, so a
// published share lies in [100 * 5 / 205, 100 * 40 / 65].
const FUEL_FIELDS: &[FieldSpec] = &[
    field("share", "%", 5.0, 40.0),
    field("calorific_value", "MJ/kg", 12.0, 30.0),
];

const ENERGY_FIELDS: &[FieldSpec] = &[
    field("consumption_mwh", "MWh", 20.0, 35.0),
    field("efficiency", "%", 80.0, 95.0),
    field("renewable_share", "%", 10.0, 30.0),
];

const QUALITY_FIELDS: &[FieldSpec] = &[
    field("strength_28d", "MPa", 48.0, 56.0),
    field("blaine", "m²/kg", 330.0, 370.0),
    field("free_lime", "%", 0.8, 2.0),
];

const PROCESS_FIELDS: &[FieldSpec] = &[
    field("efficiency", "%", 70.0, 98.0),
    field("utilization", "%", 75.0, 100.0),
];

/// Built-in chart series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SeriesKind {
    /// Fuel mix breakdown; shares sum to 100.
    FuelMix,
    /// Hourly energy profile over one day.
    EnergyProfile,
    /// Daily quality trend over a month.
    QualityTrend,
    /// Efficiency per process area.
    CrossProcess,
}

impl SeriesKind {
    pub const ALL: [SeriesKind; 4] = [
        SeriesKind::FuelMix,
        SeriesKind::EnergyProfile,
        SeriesKind::QualityTrend,
        SeriesKind::CrossProcess,
    ];

    pub fn id(self) -> &'static str {
        match self {
            Self::FuelMix => "fuel-mix",
            Self::EnergyProfile => "energy-profile",
            Self::QualityTrend => "quality-trend",
            Self::CrossProcess => "cross-process",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::FuelMix => "Fuel mix",
            Self::EnergyProfile => "Energy profile (24h)",
            Self::QualityTrend => "Quality trend (30 days)",
            Self::CrossProcess => "Cross-process efficiency",
        }
    }

    pub fn fields(self) -> &'static [FieldSpec] {
        match self {
            Self::FuelMix => FUEL_FIELDS,
            Self::EnergyProfile => ENERGY_FIELDS,
            Self::QualityTrend => QUALITY_FIELDS,
            Self::CrossProcess => PROCESS_FIELDS,
        }
    }

    pub fn labels(self) -> Vec<String> {
        match self {
            Self::FuelMix => FUEL_LABELS.iter().map(|s| s.to_string()).collect(),
            Self::EnergyProfile => (0..24).map(|h| format!("{h:02}:00")).collect(),
            Self::QualityTrend => (1..=30).map(|d| format!("Day {d}")).collect(),
            Self::CrossProcess => PROCESS_LABELS.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn length(self) -> usize {
        match self {
            Self::FuelMix | Self::CrossProcess => 6,
            Self::EnergyProfile => 24,
            Self::QualityTrend => 30,
        }
    }

    /// Generate a fresh series of this kind.
    pub fn generate<R: Rng + ?Sized>(self, rng: &mut R) -> Vec<SeriesRecord> {
        let mut records = generate(&self.labels(), self.fields(), rng);
        if self == Self::FuelMix {
            normalize(&mut records, "share", 100.0);
        }
        records
    }
}

impl std::fmt::Display for SeriesKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for SeriesKind {
    type Err = UnknownSeries;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('_', "-").as_str() {
            "fuel-mix" | "fuels" => Ok(Self::FuelMix),
            "energy-profile" | "energy" => Ok(Self::EnergyProfile),
            "quality-trend" | "quality" => Ok(Self::QualityTrend),
            "cross-process" => Ok(Self::CrossProcess),
            _ => Err(UnknownSeries(s.to_string())),
        }
    }
}

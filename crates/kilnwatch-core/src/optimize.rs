//! Optimization requests.
//!
//! Requests are acknowledged and logged only. Nothing is recomputed and no
//! metric changes as a result.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::UnknownArea;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OptimizationArea {
    Fuels,
    Energy,
    Quality,
    CrossProcess,
}

impl OptimizationArea {
    pub const ALL: [OptimizationArea; 4] = [
        OptimizationArea::Fuels,
        OptimizationArea::Energy,
        OptimizationArea::Quality,
        OptimizationArea::CrossProcess,
    ];

    pub fn id(self) -> &'static str {
        match self {
            Self::Fuels => "fuels",
            Self::Energy => "energy",
            Self::Quality => "quality",
            Self::CrossProcess => "cross-process",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::Fuels => "Alternative Fuels",
            Self::Energy => "Energy",
            Self::Quality => "Quality",
            Self::CrossProcess => "Cross-Process",
        }
    }

    /// Default-profile metrics that belong to this area. A metric may sit in
    /// more than one area.
    pub fn metric_names(self) -> &'static [&'static str] {
        match self {
            Self::Fuels => &["tsr", "carbon_footprint"],
            Self::Energy => &["energy_efficiency", "specific_heat"],
            Self::Quality => &["quality_index"],
            Self::CrossProcess => &["water_usage", "carbon_footprint"],
        }
    }
}

impl std::fmt::Display for OptimizationArea {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for OptimizationArea {
    type Err = UnknownArea;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('_', "-").as_str() {
            "fuels" | "fuel" | "tsr" => Ok(Self::Fuels),
            "energy" => Ok(Self::Energy),
            "quality" => Ok(Self::Quality),
            "cross-process" => Ok(Self::CrossProcess),
            _ => Err(UnknownArea(s.to_string())),
        }
    }
}

/// Acknowledgement of an optimization request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OptimizationTicket {
    pub id: String,
    pub area: OptimizationArea,
    pub accepted: bool,
}

/// Record an optimization request for `area`.
pub fn request_optimization(area: OptimizationArea) -> OptimizationTicket {
    let id = Uuid::new_v4().to_string();
    log::info!("optimization requested for {area} (ticket {id})");
    OptimizationTicket {
        id,
        area,
        accepted: true,
    }
}

//! Alerts for metrics that have fallen to warning or critical.

use serde::Serialize;

use crate::simulator::PlantState;
use crate::status::Status;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Alert {
    pub metric: String,
    pub severity: Status,
    pub progress: f64,
    pub message: String,
}

/// One alert per metric needing attention, worst first. Ties keep profile order.
pub fn derive_alerts(state: &PlantState) -> Vec<Alert> {
    let mut alerts: Vec<Alert> = state
        .metrics()
        .iter()
        .filter(|m| m.status().needs_attention())
        .map(|m| {
            let progress = m.progress();
            Alert {
                metric: m.name().to_string(),
                severity: m.status(),
                progress,
                message: format!(
                    "{} at {:.1}% of target ({:.2} vs {:.2} {})",
                    m.label(),
                    progress,
                    m.current(),
                    m.target(),
                    m.unit()
                )
                .trim_end()
                .to_string(),
            }
        })
        .collect();
    alerts.sort_by_key(|a| a.severity);
    alerts
}

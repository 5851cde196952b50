pub mod classify;
pub mod monitor;
pub mod series;
pub mod server;
pub mod snapshot;
pub mod watch;

use std::path::Path;

use anyhow::Context;
use kilnwatch_core::{MetricView, PlantProfile, PlantState, Status};
use rand::SeedableRng;
use rand::rngs::StdRng;

/// Load the named profile, or the built-in one, applying a tick override.
pub fn load_profile(path: Option<&str>, tick_ms: Option<u64>) -> anyhow::Result<PlantProfile> {
    let profile = match path {
        Some(p) => PlantProfile::load(Path::new(p))
            .with_context(|| format!("could not load plant profile {p}"))?,
        None => PlantProfile::default(),
    };
    let profile = profile.with_tick_ms(tick_ms);
    profile.validate().context("invalid plant profile")?;
    Ok(profile)
}

/// Build the plant a command starts from.
pub fn load_plant(path: Option<&str>, tick_ms: Option<u64>) -> anyhow::Result<(PlantProfile, PlantState)> {
    let profile = load_profile(path, tick_ms)?;
    let plant = PlantState::from_profile(&profile)?;
    Ok((profile, plant))
}

/// Seeded RNG when a seed is given, OS-seeded otherwise.
pub fn make_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_os_rng(),
    }
}

/// Status badge for terminal output, e.g. `✔ optimal`.
pub fn status_badge(status: Status) -> String {
    format!("{} {}", status.style().symbol, status)
}

/// Render a value with its unit, trimming the space for `%`.
pub fn format_value(value: f64, unit: &str) -> String {
    match unit {
        "" => format!("{value:.2}"),
        "%" => format!("{value:.1}%"),
        u if u.starts_with('/') => format!("{value:.1}{u}"),
        u => format!("{value:.2} {u}"),
    }
}

/// Progress percentage, or `∞` for a lower-is-better metric at zero.
pub fn format_progress(progress: f64) -> String {
    if progress >= f64::MAX || progress.is_infinite() {
        "∞".to_string()
    } else {
        format!("{progress:.1}%")
    }
}

/// One table row for `snapshot` and `watch`.
pub fn metric_row(m: &MetricView) -> String {
    format!(
        "  {:<28} {:>16} {:>16} {:>8}  {}",
        m.label,
        format_value(m.current, &m.unit),
        format_value(m.target, &m.unit),
        format_progress(m.progress),
        status_badge(m.status)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn format_value_units() {
        assert_eq!(format_value(22.0, "%"), "22.0%");
        assert_eq!(format_value(92.8, "/100"), "92.8/100");
        assert_eq!(format_value(3.2, "GJ/t clinker"), "3.20 GJ/t clinker");
        assert_eq!(format_value(1.5, ""), "1.50");
    }

    #[test]
    fn format_progress_handles_unbounded() {
        assert_eq!(format_progress(62.857), "62.9%");
        assert_eq!(format_progress(f64::MAX), "∞");
        assert_eq!(format_progress(f64::INFINITY), "∞");
    }

    #[test]
    fn status_badge_includes_symbol() {
        assert_eq!(status_badge(Status::Optimal), "✔ optimal");
        assert!(status_badge(Status::Critical).ends_with("critical"));
    }

    #[test]
    fn default_profile_loads() {
        let p = load_profile(None, None).unwrap();
        assert_eq!(p, PlantProfile::default());
    }

    #[test]
    fn tick_override_applies() {
        let p = load_profile(None, Some(100)).unwrap();
        assert_eq!(p.tick_ms, 100);
    }

    #[test]
    fn zero_tick_override_rejected() {
        assert!(load_profile(None, Some(0)).is_err());
    }

    #[test]
    fn missing_profile_names_the_path() {
        let err = load_profile(Some("/nonexistent/kilnwatch.json"), None).unwrap_err();
        assert!(format!("{err:#}").contains("/nonexistent/kilnwatch.json"));
    }

    #[test]
    fn seeded_rng_is_deterministic() {
        let a: u64 = make_rng(Some(9)).random();
        let b: u64 = make_rng(Some(9)).random();
        assert_eq!(a, b);
    }

    #[test]
    fn metric_row_contains_label_and_status() {
        let (_, plant) = load_plant(None, None).unwrap();
        let view = MetricView::from(plant.metric("tsr").unwrap());
        let row = metric_row(&view);
        assert!(row.contains("Thermal substitution rate"));
        assert!(row.contains("critical"));
        assert!(row.contains("62.9%"));
    }
}

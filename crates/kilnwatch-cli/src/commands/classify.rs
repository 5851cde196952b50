use kilnwatch_core::{Bounds, Direction, MetricPair, MetricSpec};

pub fn run(current: f64, target: f64, lower_is_better: bool) -> anyhow::Result<()> {
    let direction = if lower_is_better {
        Direction::LowerIsBetter
    } else {
        Direction::HigherIsBetter
    };
    let metric = MetricPair::new(MetricSpec {
        name: "value".to_string(),
        label: String::new(),
        unit: String::new(),
        initial: current,
        target,
        bounds: Bounds::new(current, current),
        direction,
        step_scale: None,
    })?;

    println!(
        "{current} vs target {target} ({direction}): {} of target → {}",
        super::format_progress(metric.progress()),
        super::status_badge(metric.status())
    );
    Ok(())
}

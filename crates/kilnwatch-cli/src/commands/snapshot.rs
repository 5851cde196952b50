use kilnwatch_core::{DashboardSnapshot, derive_alerts, focus_areas, performance_summary};

pub fn run(ticks: u64, seed: Option<u64>, profile: Option<&str>, format: &str) -> anyhow::Result<()> {
    let (_, mut plant) = super::load_plant(profile, None)?;
    let mut rng = super::make_rng(seed);
    for _ in 0..ticks {
        plant.step(&mut rng);
    }

    let snapshot = DashboardSnapshot::capture(&plant);
    if format == "json" {
        let alerts = derive_alerts(&plant);
        let json = serde_json::json!({
            "snapshot": snapshot,
            "alerts": alerts,
            "performance_summary": performance_summary(&plant),
            "focus_areas": focus_areas(&plant),
        });
        println!("{}", serde_json::to_string_pretty(&json)?);
        return Ok(());
    }

    println!("🏭 Kilnwatch snapshot after {} ticks", snapshot.tick);
    println!();
    println!(
        "  {:<28} {:>16} {:>16} {:>8}  Status",
        "Metric", "Current", "Target", "Progress"
    );
    println!("  {}", "─".repeat(84));
    for m in &snapshot.metrics {
        println!("{}", super::metric_row(m));
    }
    println!();
    println!("  Overall score: {:.1}/100", snapshot.overall_score);
    for (area, c) in &performance_summary(&plant).categories {
        println!(
            "    {:<18} {:>5.1} {} {:<9}  weakest: {}",
            area.title(),
            c.score,
            c.trend.symbol(),
            c.trend,
            c.key_metric
        );
    }

    println!();
    println!("  Focus areas:");
    for fa in focus_areas(&plant) {
        let top = fa.recommendations.first().map_or("", |r| r.title);
        println!("    {:>4.1}  {:<36} {}", fa.priority_score, fa.name, top);
    }

    let alerts = derive_alerts(&plant);
    if !alerts.is_empty() {
        println!();
        println!("  Alerts:");
        for a in &alerts {
            println!("    {} {}", super::status_badge(a.severity), a.message);
        }
    }
    Ok(())
}

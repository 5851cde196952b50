pub fn run(
    host: &str,
    port: u16,
    profile: Option<&str>,
    tick_ms: Option<u64>,
    seed: Option<u64>,
) -> anyhow::Result<()> {
    let (profile, plant) = super::load_plant(profile, tick_ms)?;

    let base = format!("http://{host}:{port}");

    println!("🏭 Kilnwatch Server v{}", kilnwatch_core::VERSION);
    println!("   {base}");
    println!(
        "   {} metrics simulated every {}ms",
        plant.metrics().len(),
        profile.tick_ms
    );
    println!();
    println!("   Endpoints:");
    println!("     GET  /                        API index (try: curl {base})");
    println!("     GET  /health                  Health check with current tick");
    println!("     GET  /api/v1/metrics          Every metric with progress and status");
    println!("     GET  /api/v1/metrics/<name>   A single metric");
    println!("     GET  /api/v1/alerts           Metrics at warning or critical");
    println!("     GET  /api/v1/focus-areas      Areas with recommendations, highest priority first");
    println!("     GET  /api/v1/performance-summary  Overall and per-area score with trend");
    println!("     GET  /api/v1/series/<kind>    fuel-mix | energy-profile | quality-trend | cross-process");
    println!("     POST /api/v1/optimize/<area>  fuels | energy | quality | cross-process");
    println!();
    println!("   Examples:");
    println!("     curl {base}/api/v1/metrics");
    println!("     curl {base}/api/v1/series/fuel-mix?seed=42");
    println!("     curl -X POST {base}/api/v1/optimize/fuels");
    println!();

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(kilnwatch_server::run_server(
        plant,
        profile.tick_period(),
        seed,
        host,
        port,
    ))?;
    Ok(())
}

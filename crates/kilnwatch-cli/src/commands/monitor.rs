use crate::tui::app::App;

pub fn run(profile: Option<&str>, tick_ms: Option<u64>, seed: Option<u64>) -> anyhow::Result<()> {
    let (profile, plant) = super::load_plant(profile, tick_ms)?;
    let mut app = App::new(
        plant,
        profile.tick_period(),
        seed,
        Box::new(|| log::info!("dashboard closed by user")),
    );
    app.run()?;

    let snapshot = app.snapshot();
    println!(
        "Closed after {} ticks, overall score {:.1}/100",
        snapshot.tick, snapshot.overall_score
    );
    Ok(())
}

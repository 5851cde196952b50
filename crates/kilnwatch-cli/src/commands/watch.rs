use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::time::Duration;

use kilnwatch_core::{
    DashboardSnapshot, PlantState, SharedPlant, Ticker, derive_alerts, lock_plant,
};
use rand::Rng;

pub fn run(
    ticks: u64,
    profile: Option<&str>,
    tick_ms: Option<u64>,
    seed: Option<u64>,
) -> anyhow::Result<()> {
    let (profile, plant) = super::load_plant(profile, tick_ms)?;
    let metrics = plant.metrics().len();
    let plant = plant.into_shared();

    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    ctrlc::set_handler(move || {
        r.store(false, Ordering::SeqCst);
    })?;

    let (tx, rx) = mpsc::channel();
    let mut ticker = spawn_reporting(
        Arc::clone(&plant),
        profile.tick_period(),
        super::make_rng(seed),
        tx,
    );

    println!("Watching plant telemetry");
    println!("  Metrics:  {metrics}");
    println!("  Tick:     {}ms", ticker.period().as_millis());
    if ticks > 0 {
        println!("  Stop:     after {ticks} ticks");
    } else {
        println!("  Stop:     Ctrl+C");
    }
    println!();

    let last = report_ticks(&rx, ticks, &running, &mut io::stdout().lock())?;
    ticker.cancel();

    // The ticker may have stepped past the last reported tick before cancel.
    let state = last.unwrap_or_else(|| lock_plant(&plant).clone());
    let snapshot = DashboardSnapshot::capture(&state);
    println!();
    println!(
        "Stopped after {} ticks, overall score {:.1}/100",
        snapshot.tick, snapshot.overall_score
    );
    for alert in derive_alerts(&state) {
        println!("  {} {}", super::status_badge(alert.severity), alert.message);
    }
    Ok(())
}

/// Step `plant` every `period` and send a copy of each stepped state.
fn spawn_reporting<R>(
    plant: SharedPlant,
    period: Duration,
    mut rng: R,
    tx: Sender<PlantState>,
) -> Ticker
where
    R: Rng + Send + 'static,
{
    Ticker::spawn(period, move || {
        let stepped = {
            let mut state = lock_plant(&plant);
            state.step(&mut rng);
            state.clone()
        };
        // The receiver is gone once watching has stopped.
        let _ = tx.send(stepped);
    })
}

/// Write one line per received tick until `ticks` lines (0 = unbounded) or
/// `running` clears. Returns the last reported state.
fn report_ticks<W: Write>(
    rx: &Receiver<PlantState>,
    ticks: u64,
    running: &AtomicBool,
    out: &mut W,
) -> io::Result<Option<PlantState>> {
    let mut last = None;
    let mut reported = 0;
    while running.load(Ordering::SeqCst) {
        match rx.recv_timeout(Duration::from_millis(50)) {
            Ok(state) => {
                writeln!(out, "{}", status_line(&state))?;
                reported += 1;
                last = Some(state);
                if ticks > 0 && reported >= ticks {
                    break;
                }
            }
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => break,
        }
    }
    Ok(last)
}

/// `#12  score 91.3  tsr 23.4% ✖  energy_efficiency 86.0% ● ...`
fn status_line(state: &PlantState) -> String {
    let snapshot = DashboardSnapshot::capture(state);
    let mut line = format!("#{:<5} score {:>5.1}", snapshot.tick, snapshot.overall_score);
    for m in snapshot.metrics.iter().filter(|m| m.simulated) {
        line.push_str(&format!(
            "  {} {} {}",
            m.name,
            super::format_value(m.current, &m.unit),
            m.status.style().symbol
        ));
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use kilnwatch_core::PlantProfile;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn default_plant() -> PlantState {
        PlantState::from_profile(&PlantProfile::default()).unwrap()
    }

    fn tick_numbers(out: &[u8]) -> Vec<u64> {
        String::from_utf8_lossy(out)
            .lines()
            .map(|l| {
                l.trim_start_matches('#')
                    .split_whitespace()
                    .next()
                    .unwrap()
                    .parse()
                    .unwrap()
            })
            .collect()
    }

    #[test]
    fn status_line_lists_only_simulated_metrics() {
        let line = status_line(&default_plant());
        assert!(line.starts_with("#0"));
        assert!(line.contains("tsr 22.0%"));
        assert!(line.contains("carbon_footprint"));
        assert!(!line.contains("quality_index"));
        assert!(!line.contains("water_usage"));
    }

    #[test]
    fn fast_ticks_each_get_a_line() {
        for _ in 0..10 {
            let plant = default_plant().into_shared();
            let (tx, rx) = mpsc::channel();
            let mut ticker = spawn_reporting(
                Arc::clone(&plant),
                Duration::from_millis(1),
                StdRng::seed_from_u64(1),
                tx,
            );
            let running = AtomicBool::new(true);
            let mut out = Vec::new();
            let last = report_ticks(&rx, 5, &running, &mut out).unwrap();
            ticker.cancel();

            assert_eq!(tick_numbers(&out), vec![1, 2, 3, 4, 5]);
            assert_eq!(last.map(|s| s.tick()), Some(5));
        }
    }

    #[test]
    fn stops_when_running_clears() {
        let (_tx, rx) = mpsc::channel::<PlantState>();
        let running = AtomicBool::new(false);
        let mut out = Vec::new();
        let last = report_ticks(&rx, 0, &running, &mut out).unwrap();
        assert!(last.is_none());
        assert!(out.is_empty());
    }

    #[test]
    fn stops_when_ticker_is_gone() {
        let (tx, rx) = mpsc::channel();
        tx.send(default_plant()).unwrap();
        drop(tx);
        let running = AtomicBool::new(true);
        let mut out = Vec::new();
        let last = report_ticks(&rx, 0, &running, &mut out).unwrap();
        assert_eq!(tick_numbers(&out), vec![0]);
        assert_eq!(last.map(|s| s.tick()), Some(0));
    }
}

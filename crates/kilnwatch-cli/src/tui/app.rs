//! TUI application state and event loop.
//!
//! The dashboard owns one simulation [`Ticker`] for as long as it is mounted.
//! The ticker steps the shared plant on its own thread; the render loop only
//! reads it under the same mutex. Quitting calls the host's close callback
//! exactly once and then tears the ticker down.

use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::prelude::*;

use kilnwatch_core::{
    Alert, DashboardSnapshot, FocusArea, OptimizationArea, PerformanceSummary, PlantState,
    SeriesKind, SeriesRecord, SharedPlant, Ticker, derive_alerts, focus_areas, lock_plant,
    performance_summary, request_optimization, start_simulation,
};
use rand::SeedableRng;
use rand::rngs::StdRng;

// ---------------------------------------------------------------------------
// Section
// ---------------------------------------------------------------------------

/// Dashboard tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Section {
    #[default]
    Overview,
    Fuels,
    Energy,
    Quality,
    CrossProcess,
}

impl Section {
    pub const ALL: [Section; 5] = [
        Section::Overview,
        Section::Fuels,
        Section::Energy,
        Section::Quality,
        Section::CrossProcess,
    ];

    pub fn next(self) -> Self {
        match self {
            Self::Overview => Self::Fuels,
            Self::Fuels => Self::Energy,
            Self::Energy => Self::Quality,
            Self::Quality => Self::CrossProcess,
            Self::CrossProcess => Self::Overview,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Self::Overview => Self::CrossProcess,
            Self::Fuels => Self::Overview,
            Self::Energy => Self::Fuels,
            Self::Quality => Self::Energy,
            Self::CrossProcess => Self::Quality,
        }
    }

    pub fn id(self) -> &'static str {
        match self {
            Self::Overview => "overview",
            Self::Fuels => "fuels",
            Self::Energy => "energy",
            Self::Quality => "quality",
            Self::CrossProcess => "cross-process",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::Overview => "Overview",
            Self::Fuels => "Alternative Fuels",
            Self::Energy => "Energy",
            Self::Quality => "Quality",
            Self::CrossProcess => "Cross-Process",
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }

    /// `1`..=`5` key to section.
    pub fn from_digit(c: char) -> Option<Self> {
        let n = c.to_digit(10)? as usize;
        Self::ALL.get(n.checked_sub(1)?).copied()
    }

    /// Chart shown on this tab. The overview has none.
    pub fn series(self) -> Option<SeriesKind> {
        match self {
            Self::Overview => None,
            Self::Fuels => Some(SeriesKind::FuelMix),
            Self::Energy => Some(SeriesKind::EnergyProfile),
            Self::Quality => Some(SeriesKind::QualityTrend),
            Self::CrossProcess => Some(SeriesKind::CrossProcess),
        }
    }

    pub fn area(self) -> Option<OptimizationArea> {
        match self {
            Self::Overview => None,
            Self::Fuels => Some(OptimizationArea::Fuels),
            Self::Energy => Some(OptimizationArea::Energy),
            Self::Quality => Some(OptimizationArea::Quality),
            Self::CrossProcess => Some(OptimizationArea::CrossProcess),
        }
    }

    /// Metric cards shown above the chart. Empty means all of them.
    pub fn metric_names(self) -> &'static [&'static str] {
        self.area().map(OptimizationArea::metric_names).unwrap_or_default()
    }
}

// ---------------------------------------------------------------------------
// App
// ---------------------------------------------------------------------------

pub struct App {
    plant: SharedPlant,
    tick_period: Duration,
    sim_rng: Option<StdRng>,
    ticker: Option<Ticker>,

    section: Section,
    series_rng: StdRng,
    series: Vec<SeriesRecord>,
    series_tick: u64,

    message: Option<String>,
    running: bool,
    on_close: Option<Box<dyn FnMut()>>,
}

impl App {
    /// Build an unmounted dashboard. The simulation starts in [`App::run`].
    pub fn new(
        plant: PlantState,
        tick_period: Duration,
        seed: Option<u64>,
        on_close: Box<dyn FnMut()>,
    ) -> Self {
        let (sim_rng, series_rng) = match seed {
            Some(s) => (
                StdRng::seed_from_u64(s),
                StdRng::seed_from_u64(s.wrapping_add(1)),
            ),
            None => (StdRng::from_os_rng(), StdRng::from_os_rng()),
        };
        Self {
            plant: plant.into_shared(),
            tick_period,
            sim_rng: Some(sim_rng),
            ticker: None,
            section: Section::default(),
            series_rng,
            series: Vec::new(),
            series_tick: 0,
            message: None,
            running: true,
            on_close: Some(on_close),
        }
    }

    pub fn run(&mut self) -> io::Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        // Restore the terminal before the panic message is printed.
        let original_hook = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            let _ = disable_raw_mode();
            let _ = execute!(io::stdout(), LeaveAlternateScreen, crossterm::cursor::Show);
            original_hook(info);
        }));

        self.mount();
        let result = self.run_loop(&mut terminal);
        self.teardown();

        let _ = std::panic::take_hook();
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            crossterm::cursor::Show
        )?;

        result
    }

    fn run_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> io::Result<()> {
        let mut last_message = Instant::now();

        while self.running {
            self.refresh_series_if_stale();
            terminal.draw(|f| super::ui::draw(f, self))?;

            if event::poll(Duration::from_millis(50))?
                && let Event::Key(key) = event::read()?
                && key.kind == KeyEventKind::Press
            {
                self.handle_key(key.code);
                last_message = Instant::now();
            }

            if self.message.is_some() && last_message.elapsed() >= Duration::from_secs(4) {
                self.message = None;
            }
        }

        Ok(())
    }

    /// Start the simulation. Does nothing if already mounted or torn down.
    fn mount(&mut self) {
        if let Some(rng) = self.sim_rng.take() {
            self.ticker = Some(start_simulation(
                Arc::clone(&self.plant),
                self.tick_period,
                rng,
            ));
            log::info!(
                "dashboard mounted, ticking every {}ms",
                self.tick_period.as_millis()
            );
        }
    }

    /// Stop the simulation. Safe to call more than once.
    fn teardown(&mut self) {
        if let Some(mut ticker) = self.ticker.take() {
            ticker.cancel();
            log::info!("dashboard torn down after {} ticks", ticker.ticks());
        }
    }

    pub(crate) fn handle_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('q') | KeyCode::Esc => self.close(),
            KeyCode::Tab | KeyCode::Right | KeyCode::Char('l') => {
                self.select(self.section.next());
            }
            KeyCode::BackTab | KeyCode::Left | KeyCode::Char('h') => {
                self.select(self.section.prev());
            }
            KeyCode::Char(c @ '1'..='5') => {
                if let Some(section) = Section::from_digit(c) {
                    self.select(section);
                }
            }
            KeyCode::Char('r') => {
                self.regenerate_series();
                self.message = Some("Charts refreshed".to_string());
            }
            KeyCode::Char('o') => self.optimize(),
            _ => {}
        }
    }

    /// Dismiss the dashboard. The close callback fires once.
    fn close(&mut self) {
        self.running = false;
        if let Some(mut on_close) = self.on_close.take() {
            on_close();
        }
    }

    fn select(&mut self, section: Section) {
        if self.section != section {
            log::debug!("section {} -> {}", self.section.id(), section.id());
            self.section = section;
            self.message = None;
            self.regenerate_series();
        }
    }

    fn optimize(&mut self) {
        self.message = Some(match self.section.area() {
            Some(area) => {
                let ticket = request_optimization(area);
                format!(
                    "Optimization requested for {} (ticket {})",
                    area,
                    &ticket.id[..8]
                )
            }
            None => "Select a section to optimize".to_string(),
        });
    }

    fn regenerate_series(&mut self) {
        self.series = match self.section.series() {
            Some(kind) => kind.generate(&mut self.series_rng),
            None => Vec::new(),
        };
        self.series_tick = self.tick();
    }

    /// Charts follow the plant: fresh values whenever it has ticked.
    fn refresh_series_if_stale(&mut self) {
        let tick = self.tick();
        let missing = self.series.is_empty() && self.section.series().is_some();
        if missing || tick != self.series_tick {
            self.regenerate_series();
        }
    }

    // -----------------------------------------------------------------------
    // Accessors for the renderer
    // -----------------------------------------------------------------------

    pub fn section(&self) -> Section {
        self.section
    }

    pub fn tick(&self) -> u64 {
        lock_plant(&self.plant).tick()
    }

    pub fn tick_period(&self) -> Duration {
        self.tick_period
    }

    pub fn is_mounted(&self) -> bool {
        self.ticker.as_ref().is_some_and(Ticker::is_running)
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn series(&self) -> &[SeriesRecord] {
        &self.series
    }

    pub fn snapshot(&self) -> DashboardSnapshot {
        DashboardSnapshot::capture(&lock_plant(&self.plant))
    }

    pub fn alerts(&self) -> Vec<Alert> {
        derive_alerts(&lock_plant(&self.plant))
    }

    pub fn performance(&self) -> PerformanceSummary {
        performance_summary(&lock_plant(&self.plant))
    }

    pub fn focus_areas(&self) -> Vec<FocusArea> {
        focus_areas(&lock_plant(&self.plant))
    }
}

impl Drop for App {
    fn drop(&mut self) {
        self.teardown();
    }
}

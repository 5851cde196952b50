//! CLI for kilnwatch: live cement plant sustainability dashboard.

mod commands;
mod tui;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "kilnwatch")]
#[command(about = "kilnwatch: simulated sustainability telemetry for cement plants")]
#[command(version = kilnwatch_core::VERSION)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Live interactive sustainability dashboard (TUI)
    Monitor {
        /// Plant profile JSON (default: built-in cement plant)
        #[arg(long)]
        profile: Option<String>,

        /// Override the simulator tick period in milliseconds
        #[arg(long)]
        tick_ms: Option<u64>,

        /// Seed the simulator for a reproducible run
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Run the simulator headless, printing one status line per tick
    Watch {
        /// Stop after N ticks (0 = until Ctrl-C)
        #[arg(long, default_value = "0")]
        ticks: u64,

        /// Plant profile JSON (default: built-in cement plant)
        #[arg(long)]
        profile: Option<String>,

        /// Override the simulator tick period in milliseconds
        #[arg(long)]
        tick_ms: Option<u64>,

        /// Seed the simulator for a reproducible run
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Advance the simulator N ticks instantly and print the resulting state
    Snapshot {
        /// Number of ticks to apply
        #[arg(long, default_value = "0")]
        ticks: u64,

        /// Seed the simulator for a reproducible run
        #[arg(long)]
        seed: Option<u64>,

        /// Plant profile JSON (default: built-in cement plant)
        #[arg(long)]
        profile: Option<String>,

        /// Output format
        #[arg(long, default_value = "table", value_parser = ["table", "json"])]
        format: String,
    },

    /// Classify a value against a target
    Classify {
        /// Current value
        #[arg(long, allow_hyphen_values = true)]
        current: f64,

        /// Target value (must be positive)
        #[arg(long, allow_hyphen_values = true)]
        target: f64,

        /// Treat the metric as lower-is-better (e.g. carbon footprint)
        #[arg(long)]
        lower_is_better: bool,
    },

    /// Generate a synthetic chart series
    Series {
        /// fuel-mix, energy-profile, quality-trend or cross-process
        kind: String,

        /// Seed for reproducible output
        #[arg(long)]
        seed: Option<u64>,

        /// Output format
        #[arg(long, default_value = "table", value_parser = ["table", "json"])]
        format: String,
    },

    /// Start the HTTP dashboard API
    Server {
        /// Port to listen on
        #[arg(long, default_value = "8043")]
        port: u16,

        /// Bind address
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Plant profile JSON (default: built-in cement plant)
        #[arg(long)]
        profile: Option<String>,

        /// Override the simulator tick period in milliseconds
        #[arg(long)]
        tick_ms: Option<u64>,

        /// Seed the simulator for a reproducible run
        #[arg(long)]
        seed: Option<u64>,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Monitor {
            profile,
            tick_ms,
            seed,
        } => commands::monitor::run(profile.as_deref(), tick_ms, seed),
        Commands::Watch {
            ticks,
            profile,
            tick_ms,
            seed,
        } => commands::watch::run(ticks, profile.as_deref(), tick_ms, seed),
        Commands::Snapshot {
            ticks,
            seed,
            profile,
            format,
        } => commands::snapshot::run(ticks, seed, profile.as_deref(), &format),
        Commands::Classify {
            current,
            target,
            lower_is_better,
        } => commands::classify::run(current, target, lower_is_better),
        Commands::Series { kind, seed, format } => commands::series::run(&kind, seed, &format),
        Commands::Server {
            port,
            host,
            profile,
            tick_ms,
            seed,
        } => commands::server::run(&host, port, profile.as_deref(), tick_ms, seed),
    }
}

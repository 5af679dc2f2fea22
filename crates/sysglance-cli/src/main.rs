//! CLI for sysglance — a glanceable host status overlay.

mod commands;
mod host;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "sysglance")]
#[command(about = "sysglance — VPN, CPU, RAM and temperature at a glance")]
#[command(version = sysglance_core::VERSION)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the sampling service until Ctrl+C
    Run {
        /// Settings JSON file, re-read every cycle
        #[arg(long, default_value = "sysglance.json")]
        settings: PathBuf,

        /// Directory for shared instance flags (default: <tmp>/sysglance)
        #[arg(long)]
        flag_dir: Option<PathBuf>,

        /// Overlay sink file; "-" prints frames to stdout
        #[arg(long, default_value = "-")]
        output: String,

        /// Marker file signalling the host UI is ready (unset: always ready)
        #[arg(long)]
        ready_file: Option<PathBuf>,

        /// Marker file signalling an active modal dialog
        #[arg(long)]
        modal_file: Option<PathBuf>,

        /// Marker file signalling active media playback
        #[arg(long)]
        playback_file: Option<PathBuf>,

        /// Boot-gate settle budget (e.g. "15s", "500ms")
        #[arg(long)]
        gate_budget: Option<String>,

        /// Delay before the first display cycle
        #[arg(long)]
        boot_delay: Option<String>,

        /// How long each overlay stays visible
        #[arg(long)]
        dwell: Option<String>,

        /// Wait between display cycles
        #[arg(long)]
        refresh: Option<String>,
    },

    /// Sample every probe once and print the readings
    Sample {
        /// Emit machine-readable JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Run {
            settings,
            flag_dir,
            output,
            ready_file,
            modal_file,
            playback_file,
            gate_budget,
            boot_delay,
            dwell,
            refresh,
        } => commands::run(commands::RunArgs {
            settings,
            flag_dir,
            output,
            ready_file,
            modal_file,
            playback_file,
            gate_budget,
            boot_delay,
            dwell,
            refresh,
        }),
        Commands::Sample { json } => commands::sample(json),
    }
}

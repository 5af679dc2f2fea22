//! Command implementations for the `sysglance` binary.

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use log::error;
use serde::Serialize;

use sysglance_core::{
    CpuProbe, ExitReason, Probes, Service, ServiceConfig, label,
};

use crate::host::{LocalHost, LocalHostConfig, OverlaySink};

pub struct RunArgs {
    pub settings: PathBuf,
    pub flag_dir: Option<PathBuf>,
    pub output: String,
    pub ready_file: Option<PathBuf>,
    pub modal_file: Option<PathBuf>,
    pub playback_file: Option<PathBuf>,
    pub gate_budget: Option<String>,
    pub boot_delay: Option<String>,
    pub dwell: Option<String>,
    pub refresh: Option<String>,
}

/// Run the sampling service against the local host until Ctrl+C.
pub fn run(args: RunArgs) {
    let cancelled = Arc::new(AtomicBool::new(false));
    let c = cancelled.clone();
    ctrlc::set_handler(move || {
        c.store(true, Ordering::SeqCst);
    })
    .expect("Error setting Ctrl+C handler");

    let sink = if args.output == "-" {
        OverlaySink::Stdout
    } else {
        OverlaySink::File(PathBuf::from(args.output))
    };
    let flag_dir = args
        .flag_dir
        .unwrap_or_else(|| std::env::temp_dir().join("sysglance"));

    let host = LocalHost::new(
        LocalHostConfig {
            settings_file: args.settings,
            flag_dir,
            sink,
            ready_file: args.ready_file,
            modal_file: args.modal_file,
            playback_file: args.playback_file,
        },
        cancelled,
    );

    let defaults = ServiceConfig::default();
    let config = ServiceConfig {
        gate_budget: duration_or(args.gate_budget, defaults.gate_budget),
        boot_delay: duration_or(args.boot_delay, defaults.boot_delay),
        dwell: duration_or(args.dwell, defaults.dwell),
        refresh: duration_or(args.refresh, defaults.refresh),
        lock_key: defaults.lock_key,
    };

    let mut service = Service::new(host, config, Probes::system());
    match service.run() {
        ExitReason::AlreadyRunning => {
            error!("another sysglance instance is already running");
            std::process::exit(1);
        }
        ExitReason::GateAborted | ExitReason::Cancelled => {}
    }
}

#[derive(Serialize)]
struct SampleReport {
    vpn: String,
    cpu: String,
    ram: String,
    temp: String,
}

/// Sample every probe once and print the readings.
pub fn sample(json: bool) {
    let mut probes = Probes::system();
    // A single CPU read has no baseline; take two readings a short gap
    // apart so the report carries a real percentage.
    probes.cpu = CpuProbe::new().with_recency(Duration::ZERO);
    probes.cpu.sample();
    std::thread::sleep(Duration::from_millis(200));

    let report = SampleReport {
        vpn: probes.vpn.sample().token(label::VPN),
        cpu: probes.cpu.sample().token(label::CPU),
        ram: probes.ram.sample().token(label::RAM),
        temp: probes.temp.sample().token(label::TEMP),
    };

    if json {
        match serde_json::to_string_pretty(&report) {
            Ok(s) => println!("{s}"),
            Err(e) => {
                eprintln!("Failed to serialize report: {e}");
                std::process::exit(1);
            }
        }
    } else {
        println!("{}", report.vpn);
        println!("{}", report.cpu);
        println!("{}", report.ram);
        println!("{}", report.temp);
    }
}

fn duration_or(arg: Option<String>, default: Duration) -> Duration {
    arg.map_or(default, |s| parse_duration(&s))
}

/// Parse a duration string like "5m", "30s", "1h", "100ms".
fn parse_duration(s: &str) -> Duration {
    let s = s.trim();

    let (numeric, multiplier) = if let Some(rest) = s.strip_suffix("ms") {
        (rest, 1u64)
    } else if let Some(rest) = s.strip_suffix('s') {
        (rest, 1000)
    } else if let Some(rest) = s.strip_suffix('m') {
        (rest, 60_000)
    } else if let Some(rest) = s.strip_suffix('h') {
        (rest, 3_600_000)
    } else {
        // Assume seconds
        (s, 1000)
    };

    let value: u64 = numeric.parse().unwrap_or_else(|_| {
        eprintln!("Invalid duration: {s}");
        std::process::exit(1);
    });

    Duration::from_millis(value * multiplier)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_duration_units() {
        assert_eq!(parse_duration("100ms"), Duration::from_millis(100));
        assert_eq!(parse_duration("9s"), Duration::from_secs(9));
        assert_eq!(parse_duration("2m"), Duration::from_secs(120));
        assert_eq!(parse_duration("1h"), Duration::from_secs(3600));
        // Bare numbers read as seconds.
        assert_eq!(parse_duration("5"), Duration::from_secs(5));
    }
}

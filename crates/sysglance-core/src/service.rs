//! Scheduler — the service's single logical thread of control.
//!
//! State machine: Starting -> (boot gate) -> Sampling -> Stopped. On entry
//! the instance lock is acquired (or the process refuses to start), the
//! boot gate runs once, and after a short pre-display delay the loop
//! repeats: fresh settings snapshot, sample enabled metrics, compose,
//! show-or-suppress, then wait out the refresh interval. Every exit path
//! releases the instance lock; the guard's drop covers panic unwind too.

use std::time::Duration;

use log::{debug, info, warn};

use crate::compose::{ReadingSet, compose_display_text};
use crate::gate::{GATE_BUDGET, GateOutcome, await_ready};
use crate::host::Host;
use crate::lock::{InstanceLock, LOCK_KEY};
use crate::probes::{Probes, label};
use crate::settings::DisplaySettings;

/// Fixed timings and identifiers of the service loop.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Total boot-gate settle budget.
    pub gate_budget: Duration,
    /// Delay between gate completion and the first display cycle.
    pub boot_delay: Duration,
    /// How long each overlay stays visible.
    pub dwell: Duration,
    /// Wait between display cycles, measured after the dwell.
    pub refresh: Duration,
    /// Instance lock flag key.
    pub lock_key: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            gate_budget: GATE_BUDGET,
            boot_delay: Duration::from_secs(3),
            dwell: Duration::from_secs(9),
            refresh: Duration::from_secs(5),
            lock_key: LOCK_KEY.to_string(),
        }
    }
}

/// Why the service stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitReason {
    /// Another instance holds the lock; nothing was started and nothing
    /// must be cleaned up.
    AlreadyRunning,
    /// Cancellation fired during the boot gate; the loop never ran.
    GateAborted,
    /// Cancellation fired before or during the sampling loop.
    Cancelled,
}

/// The background sampler service.
pub struct Service<H: Host> {
    host: H,
    config: ServiceConfig,
    probes: Probes,
}

impl<H: Host> Service<H> {
    pub fn new(host: H, config: ServiceConfig, probes: Probes) -> Self {
        Self {
            host,
            config,
            probes,
        }
    }

    /// Borrow the host.
    pub fn host(&self) -> &H {
        &self.host
    }

    /// Run the service to completion.
    pub fn run(&mut self) -> ExitReason {
        let Self {
            host,
            config,
            probes,
        } = self;
        let host = &*host;

        let Some(lock) = InstanceLock::acquire(host, &config.lock_key) else {
            return ExitReason::AlreadyRunning;
        };
        info!("boot detected, waiting for UI to settle");

        if await_ready(host, config.gate_budget) == GateOutcome::Aborted {
            lock.release();
            return ExitReason::GateAborted;
        }

        if !config.boot_delay.is_zero() && host.wait_for_cancel(config.boot_delay) {
            lock.release();
            return ExitReason::Cancelled;
        }

        info!(
            "sampling every {:.0}s, dwell {:.0}s",
            config.refresh.as_secs_f64(),
            config.dwell.as_secs_f64()
        );

        while !host.is_cancelled() {
            let settings = DisplaySettings::load(host);
            let readings = sample_enabled(probes, &settings);
            let text = compose_display_text(&readings);

            if text.is_empty() {
                debug!("no metrics enabled, skipping display cycle");
            } else if settings.silence_during_playback && host.is_media_playing() {
                info!("media playing, overlay suppressed this cycle");
            } else if let Err(e) = host.show_text(&text, config.dwell) {
                // Degrade the iteration, not the loop.
                warn!("overlay error: {e}");
            }

            if host.wait_for_cancel(config.refresh) {
                break;
            }
        }

        lock.release();
        info!("clean shutdown, lock cleared");
        ExitReason::Cancelled
    }
}

/// Sample only the metrics the settings enable; disabled metrics stay
/// `None` so composition omits them. The VPN liveness sub-test therefore
/// never runs while the VPN toggle is off.
fn sample_enabled(probes: &mut Probes, settings: &DisplaySettings) -> ReadingSet {
    ReadingSet {
        vpn: settings
            .show_vpn
            .then(|| probes.vpn.sample().token(label::VPN)),
        cpu: settings
            .show_cpu
            .then(|| probes.cpu.sample().token(label::CPU)),
        ram: settings
            .show_ram
            .then(|| probes.ram.sample().token(label::RAM)),
        temp: settings
            .show_temp
            .then(|| probes.temp.sample().token(label::TEMP)),
    }
}

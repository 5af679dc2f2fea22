//! CPU usage probe — counter deltas over the kernel's aggregate `cpu` line.
//!
//! Usage is derived from the difference between two cumulative tick
//! readings, so the probe is stateful: it keeps the last observed idle and
//! total tick counts. The first call has no baseline and reports warming-up.
//! Because the service invokes probes at an externally-driven cadence, a
//! recency window caches the last computed reading for ~5s to avoid noisy
//! sub-interval sampling.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use super::Reading;

/// Default recency window before the usage is recomputed.
const RECENCY_WINDOW: Duration = Duration::from_secs(5);

const PROC_STAT: &str = "/proc/stat";

/// Stateful CPU usage probe.
pub struct CpuProbe {
    stat_path: PathBuf,
    recency: Duration,
    last_idle: Option<u64>,
    last_total: Option<u64>,
    cached: Option<(Instant, Reading)>,
}

impl CpuProbe {
    /// Probe reading the real `/proc/stat`.
    pub fn new() -> Self {
        Self::with_stat_path(PROC_STAT)
    }

    /// Probe reading an alternate stat file.
    pub fn with_stat_path(path: impl Into<PathBuf>) -> Self {
        Self {
            stat_path: path.into(),
            recency: RECENCY_WINDOW,
            last_idle: None,
            last_total: None,
            cached: None,
        }
    }

    /// Override the recency window. A zero window recomputes on every call.
    pub fn with_recency(mut self, recency: Duration) -> Self {
        self.recency = recency;
        self
    }

    /// Sample CPU usage.
    ///
    /// Within the recency window the previously computed reading is reused
    /// as-is; recency is measured against a monotonic clock.
    pub fn sample(&mut self) -> Reading {
        if let Some((computed_at, reading)) = &self.cached
            && computed_at.elapsed() < self.recency
        {
            return reading.clone();
        }
        let reading = self.compute();
        self.cached = Some((Instant::now(), reading.clone()));
        reading
    }

    fn compute(&mut self) -> Reading {
        let Some((idle, total)) = read_cpu_ticks(&self.stat_path) else {
            return Reading::Unavailable;
        };

        let prev = (self.last_idle, self.last_total);
        self.last_idle = Some(idle);
        self.last_total = Some(total);

        let (Some(prev_idle), Some(prev_total)) = prev else {
            // No baseline yet: store one, report nothing.
            return Reading::WarmingUp;
        };

        // Counter reset or read race: fall back rather than produce a
        // negative or infinite percentage.
        if total <= prev_total {
            return Reading::Unavailable;
        }

        let total_delta = (total - prev_total) as f64;
        let idle_delta = idle.saturating_sub(prev_idle) as f64;
        let usage = (100.0 * (1.0 - idle_delta / total_delta)).clamp(0.0, 100.0);
        Reading::Value(format!("{}%", usage.round() as u32))
    }
}

impl Default for CpuProbe {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse the aggregate `cpu` line into (idle, total) cumulative ticks.
///
/// Idle ticks include the iowait field; total is the sum of every field.
fn read_cpu_ticks(path: &Path) -> Option<(u64, u64)> {
    let raw = std::fs::read_to_string(path).ok()?;
    let line = raw.lines().next()?;
    let mut fields = line.split_whitespace();
    if fields.next()? != "cpu" {
        return None;
    }
    let ticks: Vec<u64> = fields.map(str::parse).collect::<Result<_, _>>().ok()?;
    if ticks.len() < 5 {
        return None;
    }
    let idle = ticks[3] + ticks[4];
    let total = ticks.iter().sum();
    Some((idle, total))
}

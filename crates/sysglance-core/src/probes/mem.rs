//! RAM usage probe — MemTotal/MemAvailable from the kernel meminfo exposure.
//!
//! Displays percentage used (`used = total - available`). The percentage
//! convention was chosen over absolute MB so that the reading stays
//! meaningful on any machine size; it is the one documented convention for
//! this probe.

use std::path::{Path, PathBuf};

use super::Reading;

const PROC_MEMINFO: &str = "/proc/meminfo";

/// Stateless RAM usage probe.
pub struct MemProbe {
    meminfo_path: PathBuf,
}

impl MemProbe {
    /// Probe reading the real `/proc/meminfo`.
    pub fn new() -> Self {
        Self::with_meminfo_path(PROC_MEMINFO)
    }

    /// Probe reading an alternate meminfo file.
    pub fn with_meminfo_path(path: impl Into<PathBuf>) -> Self {
        Self {
            meminfo_path: path.into(),
        }
    }

    /// Sample RAM usage as a percentage of total memory.
    pub fn sample(&self) -> Reading {
        let Some((total_kb, avail_kb)) = read_meminfo(&self.meminfo_path) else {
            return Reading::Unavailable;
        };
        if total_kb == 0 {
            return Reading::Unavailable;
        }
        let used_kb = total_kb.saturating_sub(avail_kb);
        let pct = (100.0 * used_kb as f64 / total_kb as f64).round() as u32;
        Reading::Value(format!("{pct}%"))
    }
}

impl Default for MemProbe {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse (MemTotal, MemAvailable) in kilobytes from a meminfo-style file.
fn read_meminfo(path: &Path) -> Option<(u64, u64)> {
    let raw = std::fs::read_to_string(path).ok()?;
    let mut total = None;
    let mut avail = None;
    for line in raw.lines() {
        if let Some(rest) = line.strip_prefix("MemTotal:") {
            total = rest.split_whitespace().next()?.parse().ok();
        } else if let Some(rest) = line.strip_prefix("MemAvailable:") {
            avail = rest.split_whitespace().next()?.parse().ok();
        }
        if total.is_some() && avail.is_some() {
            break;
        }
    }
    Some((total?, avail?))
}

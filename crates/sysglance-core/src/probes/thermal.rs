//! Temperature probe — millidegree thermal-zone exposure with fallbacks.
//!
//! Tries an ordered list of candidate paths and reports the first readable
//! value divided by 1000. Boards differ in which zone carries the CPU
//! sensor, hence the fallback list.

use std::path::PathBuf;

use super::Reading;
use super::helpers::read_trimmed;

const DEFAULT_CANDIDATES: &[&str] = &[
    "/sys/class/thermal/thermal_zone0/temp",
    "/sys/class/thermal/thermal_zone1/temp",
    "/sys/class/hwmon/hwmon0/temp1_input",
];

/// Stateless temperature probe.
pub struct ThermalProbe {
    candidates: Vec<PathBuf>,
}

impl ThermalProbe {
    /// Probe trying the standard thermal-zone and hwmon paths.
    pub fn new() -> Self {
        Self::with_candidates(DEFAULT_CANDIDATES.iter().map(PathBuf::from).collect())
    }

    /// Probe trying an explicit ordered candidate list.
    pub fn with_candidates(candidates: Vec<PathBuf>) -> Self {
        Self { candidates }
    }

    /// Sample the temperature in whole degrees.
    pub fn sample(&self) -> Reading {
        for path in &self.candidates {
            if let Some(milli) = read_trimmed(path).and_then(|v| v.parse::<i64>().ok()) {
                return Reading::Value(format!("{}°", milli / 1000));
            }
        }
        Reading::Unavailable
    }
}

impl Default for ThermalProbe {
    fn default() -> Self {
        Self::new()
    }
}

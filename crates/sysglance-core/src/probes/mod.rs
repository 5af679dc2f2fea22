//! Metric probes — independent best-effort readers of host machine state.
//!
//! Each probe reads OS-exposed counters or files and returns a [`Reading`]:
//! a formatted value, an explicit "unavailable" marker, or (for the CPU
//! probe's first call) a "warming up" marker. Probes never return errors and
//! never retry within an iteration; a failed read degrades that one metric
//! for that one cycle.

pub mod cpu;
pub mod helpers;
pub mod mem;
pub mod thermal;
pub mod vpn;

pub use cpu::CpuProbe;
pub use mem::MemProbe;
pub use thermal::ThermalProbe;
pub use vpn::{AddrProbe, IpCommandProbe, VpnProbe, VpnStatus};

/// Display labels for the four metrics.
pub mod label {
    pub const VPN: &str = "VPN";
    pub const CPU: &str = "CPU";
    pub const RAM: &str = "RAM";
    pub const TEMP: &str = "Temp";
}

/// One metric reading for one iteration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reading {
    /// A formatted value, e.g. `42%` or `ON`.
    Value(String),
    /// No baseline yet for a delta-based metric; a later call will have one.
    WarmingUp,
    /// The underlying OS source is missing, unreadable, or timed out.
    Unavailable,
}

impl Reading {
    /// Render this reading as a `LABEL:value` display token.
    pub fn token(&self, label: &str) -> String {
        match self {
            Self::Value(v) => format!("{label}:{v}"),
            Self::WarmingUp => format!("{label}:..."),
            Self::Unavailable => format!("{label}:??"),
        }
    }
}

/// The four probes the service samples each cycle.
///
/// Owned by the service so the CPU probe's counter baseline survives across
/// iterations (one instance per running service process).
pub struct Probes {
    pub vpn: VpnProbe,
    pub cpu: CpuProbe,
    pub ram: MemProbe,
    pub temp: ThermalProbe,
}

impl Probes {
    /// Probes wired to the real kernel exposures of the local machine.
    pub fn system() -> Self {
        Self {
            vpn: VpnProbe::system(),
            cpu: CpuProbe::new(),
            ram: MemProbe::new(),
            temp: ThermalProbe::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_token() {
        assert_eq!(Reading::Value("42%".into()).token(label::CPU), "CPU:42%");
    }

    #[test]
    fn warming_up_token() {
        assert_eq!(Reading::WarmingUp.token(label::CPU), "CPU:...");
    }

    #[test]
    fn unavailable_token() {
        assert_eq!(Reading::Unavailable.token(label::RAM), "RAM:??");
    }
}

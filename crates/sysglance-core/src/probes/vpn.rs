//! VPN activity probe — heuristic multi-signal tunnel classifier.
//!
//! Candidate interfaces are those whose names carry a tunnel-style prefix
//! (`tun*`, `wg*`) or match a known VPN product alias. Classification is an
//! ordered rule list over the evidence set {interface existence, address
//! presence, byte-counter delta}:
//!
//! 1. no candidate interfaces            -> `Off`
//! 2. any candidate holds an address     -> `On` (byte sub-test skipped)
//! 3. any positive rx or tx delta across
//!    a short paired counter sampling    -> `On`
//! 4. candidates exist, none live        -> `Idle`
//!
//! Rule 3 is the liveness sub-test: it blocks the caller for the sampling
//! gap. False positives/negatives on edge-case network setups are accepted;
//! this is a heuristic, not a routing-table audit.

use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use super::Reading;
use super::helpers::{read_u64, run_command_with_timeout, which_path};

/// Tunnel-style interface name prefixes.
const VPN_PREFIXES: &[&str] = &["tun", "wg"];

/// Known VPN product interface names.
const VPN_ALIASES: &[&str] = &["mullvad", "mullvad0", "tailscale0", "nordlynx"];

/// Gap between the paired byte-counter samples of the liveness sub-test.
const LIVENESS_GAP: Duration = Duration::from_millis(500);

/// Hard timeout for one external address query.
const ADDR_TIMEOUT: Duration = Duration::from_secs(1);

/// Known install locations for the `ip` utility, tried in order.
const IP_CANDIDATES: &[&str] = &["/sbin/ip", "/usr/sbin/ip", "/bin/ip", "/usr/bin/ip"];

/// Last-resort default when neither the candidates nor PATH resolve.
const IP_FALLBACK: &str = "/sbin/ip";

const SYS_CLASS_NET: &str = "/sys/class/net";

/// VPN activity classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VpnStatus {
    /// At least one candidate interface is live.
    On,
    /// Candidate interfaces exist but none show activity.
    Idle,
    /// No candidate interfaces exist.
    Off,
}

impl VpnStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::On => "ON",
            Self::Idle => "IDLE",
            Self::Off => "OFF",
        }
    }
}

/// Seam for the "does this interface hold an assigned address" query, so
/// tests can script the answer instead of shelling out.
pub trait AddrProbe: Send {
    fn has_address(&self, iface: &str) -> bool;
}

/// Address query backed by the external `ip` command.
pub struct IpCommandProbe {
    program: String,
}

impl IpCommandProbe {
    /// Resolve the `ip` binary: known install locations, then PATH, then a
    /// hardcoded default.
    pub fn resolve() -> Self {
        let program = IP_CANDIDATES
            .iter()
            .find(|p| Path::new(p).exists())
            .map(|p| (*p).to_string())
            .or_else(|| which_path("ip"))
            .unwrap_or_else(|| IP_FALLBACK.to_string());
        Self { program }
    }
}

impl AddrProbe for IpCommandProbe {
    fn has_address(&self, iface: &str) -> bool {
        let Some(out) = run_command_with_timeout(
            &self.program,
            &["-o", "addr", "show", "dev", iface],
            ADDR_TIMEOUT,
        ) else {
            return false;
        };
        out.starts_with("inet ") || out.contains(" inet ")
    }
}

/// Heuristic VPN activity probe.
pub struct VpnProbe {
    net_dir: PathBuf,
    gap: Duration,
    addr: Box<dyn AddrProbe>,
}

impl VpnProbe {
    /// Probe wired to the real `/sys/class/net` and the `ip` command.
    pub fn system() -> Self {
        Self::new(SYS_CLASS_NET, LIVENESS_GAP, Box::new(IpCommandProbe::resolve()))
    }

    /// Probe over an alternate net-class directory and address query.
    pub fn new(net_dir: impl Into<PathBuf>, gap: Duration, addr: Box<dyn AddrProbe>) -> Self {
        Self {
            net_dir: net_dir.into(),
            gap,
            addr,
        }
    }

    /// Sample VPN activity as a display reading.
    pub fn sample(&self) -> Reading {
        Reading::Value(self.classify().as_str().to_string())
    }

    /// Run the classification rule list.
    pub fn classify(&self) -> VpnStatus {
        let candidates = self.candidate_ifaces();
        if candidates.is_empty() {
            return VpnStatus::Off;
        }

        if candidates.iter().any(|i| self.addr.has_address(i)) {
            return VpnStatus::On;
        }

        // Liveness sub-test: paired counter sampling across a fixed gap.
        let before: Vec<(u64, u64)> = candidates.iter().map(|i| self.iface_bytes(i)).collect();
        thread::sleep(self.gap);
        for (iface, (rx0, tx0)) in candidates.iter().zip(before) {
            let (rx1, tx1) = self.iface_bytes(iface);
            if rx1 > rx0 || tx1 > tx0 {
                return VpnStatus::On;
            }
        }

        VpnStatus::Idle
    }

    /// Interface names under the net-class directory matching a VPN
    /// prefix or alias, in stable order. An unreadable directory yields no
    /// candidates.
    fn candidate_ifaces(&self) -> Vec<String> {
        let Ok(entries) = std::fs::read_dir(&self.net_dir) else {
            return Vec::new();
        };
        let mut names: Vec<String> = entries
            .filter_map(|e| e.ok())
            .filter_map(|e| e.file_name().into_string().ok())
            .filter(|n| is_vpn_name(n))
            .collect();
        names.sort();
        names
    }

    /// Cumulative (rx, tx) byte counters; unreadable counters read as 0.
    fn iface_bytes(&self, iface: &str) -> (u64, u64) {
        let stats = self.net_dir.join(iface).join("statistics");
        (
            read_u64(&stats.join("rx_bytes")).unwrap_or(0),
            read_u64(&stats.join("tx_bytes")).unwrap_or(0),
        )
    }
}

fn is_vpn_name(name: &str) -> bool {
    VPN_PREFIXES.iter().any(|p| name.starts_with(p)) || VPN_ALIASES.contains(&name)
}

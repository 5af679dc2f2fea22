//! # sysglance-core
//!
//! Sampling and synchronization core for the sysglance status overlay: a
//! background service that periodically measures host machine state (VPN
//! tunnel activity, CPU, RAM, temperature) and renders a short text summary
//! onto a host display surface for a fixed dwell, repeating on a fixed
//! interval.
//!
//! ## Architecture
//!
//! Scheduler -> Boot gate (once) -> loop { settings snapshot -> probes ->
//! composed text -> overlay }.
//!
//! The display surface, settings storage, flag store, and cancellation
//! signal are all reached through the [`Host`] trait; this crate owns no
//! wire protocol and persists nothing. Probes degrade to explicit
//! "unavailable" markers instead of erroring, so a missing kernel exposure
//! costs one metric for one cycle and nothing else.
//!
//! ## Quick start
//!
//! ```no_run
//! use sysglance_core::{Probes, Service, ServiceConfig};
//! # use sysglance_core::Host;
//! # fn with_host(host: impl Host) {
//! let mut service = Service::new(host, ServiceConfig::default(), Probes::system());
//! let reason = service.run();
//! # let _ = reason;
//! # }
//! ```

pub mod compose;
pub mod gate;
pub mod host;
pub mod lock;
pub mod probes;
pub mod service;
pub mod settings;

pub use compose::{ReadingSet, compose_display_text};
pub use gate::{GATE_BUDGET, GATE_POLL, GateOutcome, await_ready};
pub use host::{Host, cond, setting};
pub use lock::{InstanceLock, LOCK_KEY};
pub use probes::{
    AddrProbe, CpuProbe, IpCommandProbe, MemProbe, Probes, Reading, ThermalProbe, VpnProbe,
    VpnStatus, label,
};
pub use service::{ExitReason, Service, ServiceConfig};
pub use settings::DisplaySettings;

/// Library version (from Cargo.toml).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

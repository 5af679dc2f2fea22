//! Per-cycle snapshot of the host's display toggles.
//!
//! Settings are externally mutable at any time, so the service reads a
//! fresh snapshot at the top of every iteration instead of caching one.

use crate::host::{Host, setting};

/// Boolean display toggles for one loop iteration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DisplaySettings {
    pub show_vpn: bool,
    pub show_cpu: bool,
    pub show_ram: bool,
    pub show_temp: bool,
    pub silence_during_playback: bool,
}

impl DisplaySettings {
    /// Read a fresh snapshot from the host.
    pub fn load<H: Host>(host: &H) -> Self {
        Self {
            show_vpn: host.get_bool_setting(setting::SHOW_VPN),
            show_cpu: host.get_bool_setting(setting::SHOW_CPU),
            show_ram: host.get_bool_setting(setting::SHOW_RAM),
            show_temp: host.get_bool_setting(setting::SHOW_TEMP),
            silence_during_playback: host.get_bool_setting(setting::SILENCE_DURING_PLAYBACK),
        }
    }
}

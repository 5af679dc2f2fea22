//! Abstract host bridge.
//!
//! The sampling core never talks to a display surface, settings store, or
//! shutdown signal directly. Everything it consumes from the surrounding
//! environment goes through the [`Host`] trait, so the service loop can run
//! against a media-center shell, a plain daemon host, or a scripted test
//! double without changes.

use std::io;
use std::time::Duration;

/// Well-known condition names queried through [`Host::is_condition_true`].
pub mod cond {
    /// The host's home UI is visible and stable.
    pub const HOME_VISIBLE: &str = "home_visible";
    /// A modal dialog is currently on top of the UI.
    pub const MODAL_ACTIVE: &str = "modal_active";
}

/// Boolean display toggles read through [`Host::get_bool_setting`].
pub mod setting {
    pub const SHOW_VPN: &str = "show_vpn";
    pub const SHOW_CPU: &str = "show_cpu";
    pub const SHOW_RAM: &str = "show_ram";
    pub const SHOW_TEMP: &str = "show_temp";
    pub const SILENCE_DURING_PLAYBACK: &str = "silence_during_playback";
}

/// Everything the sampling core consumes from its host environment.
///
/// Contract notes:
/// - `wait_for_cancel` blocks up to `timeout` and returns `true` iff the
///   process-wide cancellation signal fired during the wait.
/// - `show_text` is synchronous: it returns only after the overlay has been
///   visible for `dwell` (or the call failed).
/// - Flag access is assumed atomic per single get/set/clear call. That is
///   the only guarantee the instance lock relies on.
pub trait Host {
    /// Query a named boolean condition of the host UI.
    fn is_condition_true(&self, name: &str) -> bool;

    /// Has the process-wide cancellation signal fired?
    fn is_cancelled(&self) -> bool;

    /// Block up to `timeout`; `true` if cancellation fired during the wait.
    fn wait_for_cancel(&self, timeout: Duration) -> bool;

    /// Read a flag from the shared host-wide key-value space.
    fn get_flag(&self, key: &str) -> Option<String>;

    /// Set a flag in the shared host-wide key-value space.
    fn set_flag(&self, key: &str, value: &str);

    /// Clear a flag from the shared host-wide key-value space.
    fn clear_flag(&self, key: &str);

    /// Read a boolean setting, fresh on every call.
    fn get_bool_setting(&self, name: &str) -> bool;

    /// Show `text` on the overlay surface for `dwell`, then hide it.
    fn show_text(&self, text: &str, dwell: Duration) -> io::Result<()>;

    /// Is the host currently playing media?
    fn is_media_playing(&self) -> bool;
}

//! Local daemon host — a plain-filesystem implementation of the core's
//! `Host` trait.
//!
//! Mapping of the host contracts:
//! - flags: one file per key under a flag directory shared by all
//!   instances;
//! - settings: a JSON object re-read on every query (externally editable
//!   while the service runs);
//! - UI conditions and playback state: optional marker files, present
//!   means true; an unconfigured home-ready probe reports ready;
//! - overlay: text written to stdout or a sink file, held for the dwell in
//!   cancellable steps, then blanked (best-effort hide);
//! - cancellation: a ctrlc-backed atomic checked every 10ms during waits.

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use log::debug;

use sysglance_core::{Host, cond, setting};

/// Polling step for cancellable waits.
const WAIT_STEP: Duration = Duration::from_millis(10);

/// Where overlay text goes.
#[derive(Debug, Clone)]
pub enum OverlaySink {
    /// Print frames to stdout.
    Stdout,
    /// Write the current frame into a file (for an OSD consumer); an empty
    /// file means nothing is displayed.
    File(PathBuf),
}

/// Configuration of the local host.
#[derive(Debug, Clone)]
pub struct LocalHostConfig {
    pub settings_file: PathBuf,
    pub flag_dir: PathBuf,
    pub sink: OverlaySink,
    pub ready_file: Option<PathBuf>,
    pub modal_file: Option<PathBuf>,
    pub playback_file: Option<PathBuf>,
}

pub struct LocalHost {
    config: LocalHostConfig,
    cancelled: Arc<AtomicBool>,
}

impl LocalHost {
    pub fn new(config: LocalHostConfig, cancelled: Arc<AtomicBool>) -> Self {
        Self { config, cancelled }
    }

    fn flag_path(&self, key: &str) -> PathBuf {
        self.config.flag_dir.join(key)
    }

    /// Read one boolean from the settings JSON. Display toggles default to
    /// on and the playback-silence toggle to off when the file or key is
    /// missing, so a fresh install shows everything.
    fn read_setting(&self, name: &str) -> Option<bool> {
        let raw = std::fs::read_to_string(&self.config.settings_file).ok()?;
        let value: serde_json::Value = serde_json::from_str(&raw).ok()?;
        value.get(name).and_then(serde_json::Value::as_bool)
    }

    fn write_frame(&self, text: &str) -> io::Result<()> {
        match &self.config.sink {
            OverlaySink::Stdout => {
                let mut out = io::stdout().lock();
                writeln!(out, "{text}")?;
                out.flush()
            }
            OverlaySink::File(path) => std::fs::write(path, text),
        }
    }

    fn clear_frame(&self) -> io::Result<()> {
        match &self.config.sink {
            // Stdout frames scroll away on their own.
            OverlaySink::Stdout => Ok(()),
            OverlaySink::File(path) => std::fs::write(path, ""),
        }
    }
}

fn marker_present(path: &Option<PathBuf>) -> bool {
    path.as_deref().is_some_and(Path::exists)
}

impl Host for LocalHost {
    fn is_condition_true(&self, name: &str) -> bool {
        match name {
            // No configured readiness probe means the UI is always ready.
            cond::HOME_VISIBLE => match &self.config.ready_file {
                Some(path) => path.exists(),
                None => true,
            },
            cond::MODAL_ACTIVE => marker_present(&self.config.modal_file),
            _ => false,
        }
    }

    fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    fn wait_for_cancel(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        while Instant::now() < deadline {
            if self.is_cancelled() {
                return true;
            }
            std::thread::sleep(WAIT_STEP.min(deadline.saturating_duration_since(Instant::now())));
        }
        self.is_cancelled()
    }

    fn get_flag(&self, key: &str) -> Option<String> {
        let raw = std::fs::read_to_string(self.flag_path(key)).ok()?;
        let v = raw.trim();
        if v.is_empty() { None } else { Some(v.to_string()) }
    }

    fn set_flag(&self, key: &str, value: &str) {
        let path = self.flag_path(key);
        if let Some(parent) = path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        if let Err(e) = std::fs::write(&path, value) {
            debug!("failed to set flag {key}: {e}");
        }
    }

    fn clear_flag(&self, key: &str) {
        if let Err(e) = std::fs::remove_file(self.flag_path(key))
            && e.kind() != io::ErrorKind::NotFound
        {
            debug!("failed to clear flag {key}: {e}");
        }
    }

    fn get_bool_setting(&self, name: &str) -> bool {
        self.read_setting(name)
            .unwrap_or(name != setting::SILENCE_DURING_PLAYBACK)
    }

    fn show_text(&self, text: &str, dwell: Duration) -> io::Result<()> {
        self.write_frame(text)?;
        // Hold the frame for the dwell; an early cancellation still blanks
        // the frame so no residual text outlives the service.
        self.wait_for_cancel(dwell);
        self.clear_frame()
    }

    fn is_media_playing(&self) -> bool {
        marker_present(&self.config.playback_file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn local_host(dir: &TempDir) -> LocalHost {
        LocalHost::new(
            LocalHostConfig {
                settings_file: dir.path().join("settings.json"),
                flag_dir: dir.path().join("flags"),
                sink: OverlaySink::File(dir.path().join("overlay.txt")),
                ready_file: None,
                modal_file: Some(dir.path().join("modal")),
                playback_file: Some(dir.path().join("playing")),
            },
            Arc::new(AtomicBool::new(false)),
        )
    }

    #[test]
    fn flags_round_trip() {
        let dir = TempDir::new().unwrap();
        let host = local_host(&dir);
        assert!(host.get_flag("sysglance.lock").is_none());
        host.set_flag("sysglance.lock", "1");
        assert_eq!(host.get_flag("sysglance.lock").as_deref(), Some("1"));
        host.clear_flag("sysglance.lock");
        assert!(host.get_flag("sysglance.lock").is_none());
        // Clearing an absent flag is a no-op.
        host.clear_flag("sysglance.lock");
    }

    #[test]
    fn settings_are_read_fresh_each_call() {
        let dir = TempDir::new().unwrap();
        let host = local_host(&dir);
        fs::write(
            dir.path().join("settings.json"),
            r#"{"show_cpu": false, "silence_during_playback": true}"#,
        )
        .unwrap();
        assert!(!host.get_bool_setting(setting::SHOW_CPU));
        assert!(host.get_bool_setting(setting::SILENCE_DURING_PLAYBACK));

        fs::write(dir.path().join("settings.json"), r#"{"show_cpu": true}"#).unwrap();
        assert!(host.get_bool_setting(setting::SHOW_CPU));
    }

    #[test]
    fn missing_settings_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let host = local_host(&dir);
        assert!(host.get_bool_setting(setting::SHOW_VPN));
        assert!(host.get_bool_setting(setting::SHOW_TEMP));
        assert!(!host.get_bool_setting(setting::SILENCE_DURING_PLAYBACK));
    }

    #[test]
    fn marker_files_drive_conditions() {
        let dir = TempDir::new().unwrap();
        let host = local_host(&dir);
        assert!(host.is_condition_true(cond::HOME_VISIBLE));
        assert!(!host.is_condition_true(cond::MODAL_ACTIVE));
        assert!(!host.is_media_playing());

        fs::write(dir.path().join("modal"), "").unwrap();
        fs::write(dir.path().join("playing"), "").unwrap();
        assert!(host.is_condition_true(cond::MODAL_ACTIVE));
        assert!(host.is_media_playing());
    }

    #[test]
    fn ready_file_gates_home_visibility() {
        let dir = TempDir::new().unwrap();
        let mut host = local_host(&dir);
        host.config.ready_file = Some(dir.path().join("ready"));
        assert!(!host.is_condition_true(cond::HOME_VISIBLE));
        fs::write(dir.path().join("ready"), "").unwrap();
        assert!(host.is_condition_true(cond::HOME_VISIBLE));
    }

    #[test]
    fn show_text_writes_then_blanks_frame() {
        let dir = TempDir::new().unwrap();
        let host = local_host(&dir);
        host.show_text("CPU:42%", Duration::from_millis(20)).unwrap();
        let frame = fs::read_to_string(dir.path().join("overlay.txt")).unwrap();
        assert!(frame.is_empty(), "frame must be blanked after the dwell");
    }

    #[test]
    fn wait_for_cancel_observes_cancellation() {
        let dir = TempDir::new().unwrap();
        let cancelled = Arc::new(AtomicBool::new(false));
        let host = LocalHost::new(
            LocalHostConfig {
                settings_file: dir.path().join("settings.json"),
                flag_dir: dir.path().join("flags"),
                sink: OverlaySink::Stdout,
                ready_file: None,
                modal_file: None,
                playback_file: None,
            },
            cancelled.clone(),
        );
        assert!(!host.wait_for_cancel(Duration::from_millis(20)));
        cancelled.store(true, Ordering::SeqCst);
        let start = Instant::now();
        assert!(host.wait_for_cancel(Duration::from_secs(5)));
        assert!(start.elapsed() < Duration::from_secs(1));
    }
}

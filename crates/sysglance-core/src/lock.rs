//! Single-instance lock over the host's shared flag store.
//!
//! The lock is a named boolean flag in a key-value space reachable by every
//! instance of the service. Discipline: a process that observes the flag
//! already set exits immediately and never clears it (it does not own it);
//! the holder clears it exactly once, on any exit path. Plain get/set/clear
//! is adequate because only the holder ever clears the flag and the host's
//! individual flag accesses are atomic.

use log::warn;

use crate::host::Host;

/// Default flag key used by the service.
pub const LOCK_KEY: &str = "sysglance.lock";

const LOCK_VALUE: &str = "1";

/// Guard for the held instance lock.
///
/// Clears the flag exactly once: either via [`InstanceLock::release`] or on
/// drop (which also covers panic unwind out of the service loop).
pub struct InstanceLock<'a, H: Host> {
    host: &'a H,
    key: String,
    released: bool,
}

impl<'a, H: Host> InstanceLock<'a, H> {
    /// Try to acquire the lock.
    ///
    /// Returns `None` when another instance already holds it; the caller
    /// must then terminate without touching the flag.
    pub fn acquire(host: &'a H, key: &str) -> Option<Self> {
        if host.get_flag(key).is_some() {
            warn!("instance lock '{key}' already held, refusing to start");
            return None;
        }
        host.set_flag(key, LOCK_VALUE);
        Some(Self {
            host,
            key: key.to_string(),
            released: false,
        })
    }

    /// Explicitly release the lock.
    pub fn release(mut self) {
        self.clear_once();
    }

    fn clear_once(&mut self) {
        if !self.released {
            self.host.clear_flag(&self.key);
            self.released = true;
        }
    }
}

impl<H: Host> Drop for InstanceLock<'_, H> {
    fn drop(&mut self) {
        self.clear_once();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io;
    use std::sync::Mutex;
    use std::time::Duration;

    #[derive(Default)]
    struct FlagHost {
        flags: Mutex<HashMap<String, String>>,
        clears: Mutex<u32>,
    }

    impl Host for FlagHost {
        fn is_condition_true(&self, _name: &str) -> bool {
            true
        }
        fn is_cancelled(&self) -> bool {
            false
        }
        fn wait_for_cancel(&self, _timeout: Duration) -> bool {
            false
        }
        fn get_flag(&self, key: &str) -> Option<String> {
            self.flags.lock().unwrap().get(key).cloned()
        }
        fn set_flag(&self, key: &str, value: &str) {
            self.flags
                .lock()
                .unwrap()
                .insert(key.to_string(), value.to_string());
        }
        fn clear_flag(&self, key: &str) {
            self.flags.lock().unwrap().remove(key);
            *self.clears.lock().unwrap() += 1;
        }
        fn get_bool_setting(&self, _name: &str) -> bool {
            false
        }
        fn show_text(&self, _text: &str, _dwell: Duration) -> io::Result<()> {
            Ok(())
        }
        fn is_media_playing(&self) -> bool {
            false
        }
    }

    #[test]
    fn acquire_sets_flag() {
        let host = FlagHost::default();
        let lock = InstanceLock::acquire(&host, LOCK_KEY).unwrap();
        assert_eq!(host.get_flag(LOCK_KEY).as_deref(), Some("1"));
        lock.release();
        assert!(host.get_flag(LOCK_KEY).is_none());
    }

    #[test]
    fn second_acquire_fails_and_does_not_clear() {
        let host = FlagHost::default();
        let first = InstanceLock::acquire(&host, LOCK_KEY).unwrap();
        assert!(InstanceLock::acquire(&host, LOCK_KEY).is_none());
        // The loser must not have cleared the winner's flag.
        assert_eq!(host.get_flag(LOCK_KEY).as_deref(), Some("1"));
        assert_eq!(*host.clears.lock().unwrap(), 0);
        drop(first);
        assert_eq!(*host.clears.lock().unwrap(), 1);
    }

    #[test]
    fn release_then_drop_clears_exactly_once() {
        let host = FlagHost::default();
        let lock = InstanceLock::acquire(&host, LOCK_KEY).unwrap();
        lock.release(); // consumes the guard; drop runs here too
        assert_eq!(*host.clears.lock().unwrap(), 1);
    }

    #[test]
    fn drop_on_unwind_clears_flag() {
        let host = FlagHost::default();
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _lock = InstanceLock::acquire(&host, LOCK_KEY).unwrap();
            panic!("mid-iteration failure");
        }));
        assert!(result.is_err());
        assert!(host.get_flag(LOCK_KEY).is_none());
        assert_eq!(*host.clears.lock().unwrap(), 1);
    }
}

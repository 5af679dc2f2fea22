//! Boot gate — one-time startup wait for host UI stability.
//!
//! The gate polls two host conditions in sequence (home UI visible, then no
//! active modal dialog) and afterwards sleeps whatever remains of a fixed
//! settle budget. Total time from entry to `Ready` is therefore never less
//! than the budget, even when the UI was ready instantly. Cancellation at
//! any poll point aborts the whole startup sequence.

use std::time::{Duration, Instant};

use log::{debug, info};

use crate::host::{Host, cond};

/// Default total settle budget from gate entry to completion.
pub const GATE_BUDGET: Duration = Duration::from_millis(15_000);

/// Resolution of the condition polls.
pub const GATE_POLL: Duration = Duration::from_millis(100);

/// Outcome of the one-time boot gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateOutcome {
    /// Both predicates satisfied and the settle budget elapsed.
    Ready,
    /// Cancellation fired while waiting. The caller must release the
    /// instance lock before terminating.
    Aborted,
}

/// Wait for the host UI to become stable, with a bounded total wait.
///
/// Runs once at startup; there is no terminal retry.
pub fn await_ready<H: Host>(host: &H, budget: Duration) -> GateOutcome {
    let entered = Instant::now();

    while !host.is_condition_true(cond::HOME_VISIBLE) {
        if host.wait_for_cancel(GATE_POLL) {
            info!("boot gate aborted while waiting for home UI");
            return GateOutcome::Aborted;
        }
    }

    while host.is_condition_true(cond::MODAL_ACTIVE) {
        if host.wait_for_cancel(GATE_POLL) {
            info!("boot gate aborted while waiting for modal dialogs to close");
            return GateOutcome::Aborted;
        }
    }

    // Settle floor: one bounded wait for whatever is left of the budget.
    let remaining = budget.saturating_sub(entered.elapsed());
    if !remaining.is_zero() && host.wait_for_cancel(remaining) {
        info!("boot gate aborted during settle wait");
        return GateOutcome::Aborted;
    }

    debug!(
        "boot gate ready after {:.1}s",
        entered.elapsed().as_secs_f64()
    );
    GateOutcome::Ready
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::sync::Mutex;
    use std::time::Instant;

    /// Host double with scripted condition answers and a cancel countdown.
    struct GateHost {
        /// Remaining `false` answers for home-visible.
        home_delay: Mutex<u32>,
        /// Remaining `true` answers for modal-active.
        modal_delay: Mutex<u32>,
        /// Number of waits before cancellation fires; `None` never cancels.
        cancel_after_waits: Mutex<Option<u32>>,
        /// Whether waits actually sleep (needed for timing assertions).
        real_sleep: bool,
    }

    impl GateHost {
        fn ready(real_sleep: bool) -> Self {
            Self {
                home_delay: Mutex::new(0),
                modal_delay: Mutex::new(0),
                cancel_after_waits: Mutex::new(None),
                real_sleep,
            }
        }
    }

    impl Host for GateHost {
        fn is_condition_true(&self, name: &str) -> bool {
            match name {
                cond::HOME_VISIBLE => {
                    let mut d = self.home_delay.lock().unwrap();
                    if *d > 0 {
                        *d -= 1;
                        false
                    } else {
                        true
                    }
                }
                cond::MODAL_ACTIVE => {
                    let mut d = self.modal_delay.lock().unwrap();
                    if *d > 0 {
                        *d -= 1;
                        true
                    } else {
                        false
                    }
                }
                _ => false,
            }
        }

        fn is_cancelled(&self) -> bool {
            *self.cancel_after_waits.lock().unwrap() == Some(0)
        }

        fn wait_for_cancel(&self, timeout: Duration) -> bool {
            if self.real_sleep {
                std::thread::sleep(timeout);
            }
            let mut c = self.cancel_after_waits.lock().unwrap();
            match *c {
                Some(0) => true,
                Some(n) => {
                    *c = Some(n - 1);
                    *c == Some(0)
                }
                None => false,
            }
        }

        fn get_flag(&self, _key: &str) -> Option<String> {
            None
        }
        fn set_flag(&self, _key: &str, _value: &str) {}
        fn clear_flag(&self, _key: &str) {}
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
    fn instant_ready_still_waits_full_budget() {
        let host = GateHost::ready(true);
        let budget = Duration::from_millis(250);
        let start = Instant::now();
        let outcome = await_ready(&host, budget);
        let elapsed = start.elapsed();
        assert_eq!(outcome, GateOutcome::Ready);
        assert!(elapsed >= budget, "settle floor violated: {elapsed:?}");
        assert!(
            elapsed < budget + GATE_POLL,
            "gate overshot the budget: {elapsed:?}"
        );
    }

    #[test]
    fn waits_for_home_then_modal() {
        let host = GateHost::ready(false);
        *host.home_delay.lock().unwrap() = 3;
        *host.modal_delay.lock().unwrap() = 2;
        assert_eq!(await_ready(&host, Duration::ZERO), GateOutcome::Ready);
        assert_eq!(*host.home_delay.lock().unwrap(), 0);
        assert_eq!(*host.modal_delay.lock().unwrap(), 0);
    }

    #[test]
    fn cancel_during_home_poll_aborts() {
        let host = GateHost::ready(false);
        *host.home_delay.lock().unwrap() = 100;
        *host.cancel_after_waits.lock().unwrap() = Some(2);
        assert_eq!(
            await_ready(&host, Duration::from_secs(15)),
            GateOutcome::Aborted
        );
    }

    #[test]
    fn cancel_during_settle_wait_aborts() {
        let host = GateHost::ready(false);
        *host.cancel_after_waits.lock().unwrap() = Some(1);
        assert_eq!(
            await_ready(&host, Duration::from_secs(15)),
            GateOutcome::Aborted
        );
    }

    #[test]
    fn zero_budget_skips_settle_wait() {
        // With a zero budget and instantly-true predicates, no wait call is
        // ever made, so a pending cancellation is not observed.
        let host = GateHost::ready(false);
        *host.cancel_after_waits.lock().unwrap() = Some(1);
        assert_eq!(await_ready(&host, Duration::ZERO), GateOutcome::Ready);
    }
}

//! Shared helpers used by multiple probe implementations.

use std::path::Path;
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use log::debug;

/// Read a file and return its trimmed contents, or `None` when the file is
/// missing, unreadable, or empty.
pub fn read_trimmed(path: &Path) -> Option<String> {
    let raw = std::fs::read_to_string(path).ok()?;
    let v = raw.trim();
    if v.is_empty() { None } else { Some(v.to_string()) }
}

/// Read a file containing a single integer counter.
pub fn read_u64(path: &Path) -> Option<u64> {
    read_trimmed(path)?.parse().ok()
}

/// Locate a command on PATH by running `which`.
pub fn which_path(name: &str) -> Option<String> {
    let output = Command::new("which")
        .arg(name)
        .stderr(Stdio::null())
        .output()
        .ok()?;
    if !output.status.success() {
        return None;
    }
    let path = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if path.is_empty() { None } else { Some(path) }
}

/// Run a subprocess and return its stdout, with a hard timeout.
///
/// Returns `None` if the command fails to spawn, exits non-zero, or is
/// still running when the timeout expires (it is then killed). The timeout
/// bounds the worst-case blocking of any single external probe call.
pub fn run_command_with_timeout(
    program: &str,
    args: &[&str],
    timeout: Duration,
) -> Option<String> {
    let mut child = Command::new(program)
        .args(args)
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .stdin(Stdio::null())
        .spawn()
        .ok()?;

    let deadline = Instant::now() + timeout;
    loop {
        match child.try_wait() {
            Ok(Some(status)) => {
                if !status.success() {
                    return None;
                }
                break;
            }
            Ok(None) => {
                if Instant::now() >= deadline {
                    debug!("{program} timed out after {timeout:?}, killing");
                    let _ = child.kill();
                    let _ = child.wait();
                    return None;
                }
                thread::sleep(Duration::from_millis(10));
            }
            Err(_) => return None,
        }
    }

    let mut stdout = child.stdout.take()?;
    let mut buf = String::new();
    std::io::Read::read_to_string(&mut stdout, &mut buf).ok()?;
    Some(buf)
}

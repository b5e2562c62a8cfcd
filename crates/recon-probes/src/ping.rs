//! ICMP reachability via the system `ping` binary.
//!
//! Runs unprivileged: no raw sockets are opened by this process.

use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;
use tracing::debug;

/// Result of one echo attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PingOutcome {
    /// `ping` ran; `true` when it exited successfully.
    Completed { reachable: bool },

    /// `ping` could not be run at all.
    Unavailable { error: String },
}

/// Send a single echo request to `target`, waiting up to `timeout` for a reply.
///
/// The subprocess itself is bounded by `timeout` plus one second of grace and
/// killed if it overruns; an overrun counts as unreachable.
pub async fn icmp_echo(target: &str, timeout: Duration) -> PingOutcome {
    let wait_secs = timeout.as_secs().max(1).to_string();

    let child = Command::new("ping")
        .args(["-c", "1", "-W", wait_secs.as_str(), target])
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .kill_on_drop(true)
        .spawn();

    let mut child = match child {
        Ok(child) => child,
        Err(e) => {
            debug!(target = %target, error = %e, "ping unavailable");
            return PingOutcome::Unavailable {
                error: e.to_string(),
            };
        }
    };

    match tokio::time::timeout(timeout + Duration::from_secs(1), child.wait()).await {
        Ok(Ok(status)) => PingOutcome::Completed {
            reachable: status.success(),
        },
        Ok(Err(e)) => PingOutcome::Unavailable {
            error: e.to_string(),
        },
        Err(_) => {
            debug!(target = %target, "ping overran its timeout");
            PingOutcome::Completed { reachable: false }
        }
    }
}

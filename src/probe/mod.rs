//! Probe executor boundary.
//!
//! One probe is a single best-effort echo request against a hostname,
//! bounded by a timeout. The engine only depends on the [`Prober`] trait,
//! so the system ping implementation can be swapped for a mock in tests.

mod latency;
mod ping;

pub use latency::*;
pub use ping::*;

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// Probe error types.
#[derive(Error, Debug)]
pub enum ProbeError {
    /// No echo reply within the timeout. Normal for a down host.
    #[error("probe timed out after {0:?}")]
    Timeout(Duration),
    /// The check ran but the host did not answer.
    #[error("host unreachable: {0}")]
    Unreachable(String),
    /// The check could not even be started (missing binary, exec failure).
    #[error("failed to launch probe: {0}")]
    Launch(String),
}

impl ProbeError {
    /// Launch failures are surfaced as `Error` status rather than `Down`.
    pub fn is_launch_failure(&self) -> bool {
        matches!(self, ProbeError::Launch(_))
    }
}

/// A successful echo reply with the combined stdout/stderr text.
#[derive(Debug, Clone)]
pub struct ProbeReply {
    pub raw_output: String,
}

/// A single reachability check against one hostname.
///
/// Implementations must not mutate any engine state; the result is the
/// only channel back to the caller.
#[async_trait]
pub trait Prober: Send + Sync {
    async fn probe(&self, hostname: &str, timeout: Duration) -> Result<ProbeReply, ProbeError>;
}

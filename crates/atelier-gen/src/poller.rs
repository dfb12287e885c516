//! Readiness polling
//!
//! One parameterized loop, [`await_ready`], shared by every caller. What counts
//! as "ready" is decided by a [`ReadinessProbe`]: the tri-state status
//! endpoint ([`StatusProbe`]), a successful preview download ([`BinaryProbe`]),
//! or any closure.

use crate::store::AssetStore;
use atelier_core::{AssetKind, AssetStatus, Result};
use serde::Serialize;
use std::time::Duration;

/// What one probe observed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Readiness {
    Ready,
    Pending,
    Failed,
}

impl From<AssetStatus> for Readiness {
    fn from(status: AssetStatus) -> Self {
        match status {
            AssetStatus::Ready => Readiness::Ready,
            AssetStatus::Failed => Readiness::Failed,
            AssetStatus::Submitted | AssetStatus::Pending | AssetStatus::Unknown => {
                Readiness::Pending
            }
        }
    }
}

/// A single readiness check against the upstream
pub trait ReadinessProbe {
    fn probe(&self, asset_id: &str) -> Result<Readiness>;
}

impl<F> ReadinessProbe for F
where
    F: Fn(&str) -> Result<Readiness>,
{
    fn probe(&self, asset_id: &str) -> Result<Readiness> {
        self(asset_id)
    }
}

/// Reads the job status endpoint
pub struct StatusProbe<'a> {
    store: &'a dyn AssetStore,
}

impl<'a> StatusProbe<'a> {
    pub fn new(store: &'a dyn AssetStore) -> Self {
        Self { store }
    }
}

impl ReadinessProbe for StatusProbe<'_> {
    fn probe(&self, asset_id: &str) -> Result<Readiness> {
        Ok(self.store.fetch_status(asset_id)?.status.into())
    }
}

/// Treats any successful preview download as ready
pub struct BinaryProbe<'a> {
    store: &'a dyn AssetStore,
    kind: AssetKind,
}

impl<'a> BinaryProbe<'a> {
    pub fn new(store: &'a dyn AssetStore, kind: AssetKind) -> Self {
        Self { store, kind }
    }
}

impl ReadinessProbe for BinaryProbe<'_> {
    fn probe(&self, asset_id: &str) -> Result<Readiness> {
        self.store.fetch_binary(asset_id, self.kind)?;
        Ok(Readiness::Ready)
    }
}

/// Attempt budget and spacing for one wait
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    pub max_attempts: u32,
    pub delay: Duration,
}

impl PollPolicy {
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self { max_attempts, delay }
    }

    /// Waiting on the status endpoint after an upload-based generation
    pub fn status_endpoint() -> Self {
        Self::new(20, Duration::from_secs(3))
    }

    /// Waiting for the model preview to become downloadable
    pub fn binary_endpoint() -> Self {
        Self::new(15, Duration::from_secs(3))
    }

    /// Waiting for a generated image to appear
    pub fn image_preview() -> Self {
        Self::new(5, Duration::from_secs(2))
    }

    /// Upper bound on time spent sleeping between attempts
    pub fn total_delay(&self) -> Duration {
        self.delay * self.max_attempts.saturating_sub(1)
    }
}

/// Outcome of a wait. Exhaustion is a normal `ready == false`, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReadyOutcome {
    pub ready: bool,
    /// Probes actually made
    pub attempts: u32,
    /// Last probe result, `None` if every attempt errored or none were made
    #[serde(skip)]
    pub last: Option<Readiness>,
}

impl ReadyOutcome {
    /// The probe reported a terminal failure
    pub fn failed(&self) -> bool {
        self.last == Some(Readiness::Failed)
    }
}

/// Probe until ready, failed, or out of attempts.
///
/// Pending answers and probe errors are retried after `policy.delay`; there
/// is no sleep after the final attempt.
pub fn await_ready<P>(probe: &P, asset_id: &str, policy: PollPolicy) -> ReadyOutcome
where
    P: ReadinessProbe + ?Sized,
{
    let mut last = None;

    for attempt in 1..=policy.max_attempts {
        match probe.probe(asset_id) {
            Ok(Readiness::Ready) => {
                tracing::debug!(asset_id, attempt, "Asset ready");
                return ReadyOutcome {
                    ready: true,
                    attempts: attempt,
                    last: Some(Readiness::Ready),
                };
            }
            Ok(Readiness::Failed) => {
                tracing::warn!(asset_id, attempt, "Upstream reported generation failure");
                return ReadyOutcome {
                    ready: false,
                    attempts: attempt,
                    last: Some(Readiness::Failed),
                };
            }
            Ok(Readiness::Pending) => {
                tracing::debug!(asset_id, attempt, max = policy.max_attempts, "Asset pending");
                last = Some(Readiness::Pending);
            }
            Err(e) => {
                tracing::debug!(asset_id, attempt, error = %e, "Readiness probe failed; retrying");
            }
        }

        if attempt < policy.max_attempts && !policy.delay.is_zero() {
            std::thread::sleep(policy.delay);
        }
    }

    tracing::info!(asset_id, attempts = policy.max_attempts, "Gave up waiting for asset");
    ReadyOutcome {
        ready: false,
        attempts: policy.max_attempts,
        last,
    }
}

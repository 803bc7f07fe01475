//! Import prober - one timed load attempt per unit.

use std::time::{Duration, Instant};

use tracing::debug;

use crate::registry::Registry;

/// Outcome of a single probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// The unit is loaded (fresh load or already-loaded short-circuit).
    Loaded,
    /// The load failed; the captured message says why.
    Failed(String),
}

/// Result of one timed load attempt.
///
/// Transient: the runner renders it as soon as the probe completes and then
/// discards it. Nothing outlives the iteration that produced it.
#[derive(Debug, Clone)]
pub struct ProbeResult {
    pub unit: String,
    pub elapsed: Duration,
    pub outcome: ProbeOutcome,
}

impl ProbeResult {
    pub fn succeeded(&self) -> bool {
        matches!(self.outcome, ProbeOutcome::Loaded)
    }

    /// Elapsed time in seconds, as rendered on the status line.
    pub fn elapsed_secs(&self) -> f64 {
        self.elapsed.as_secs_f64()
    }
}

/// Attempt to load `unit` from `registry`, timing the attempt and capturing
/// any failure.
///
/// The defining contract: a failed load never propagates to the caller. It
/// is folded into the returned result so the rest of the sequence keeps
/// running. There is no timeout; a hanging loader hangs the probe.
pub fn probe(registry: &Registry, unit: &str) -> ProbeResult {
    let start = Instant::now();
    let outcome = match registry.load(unit) {
        Ok(_) => ProbeOutcome::Loaded,
        Err(err) => ProbeOutcome::Failed(err.to_string()),
    };
    let elapsed = start.elapsed();
    debug!("probed {} in {:.2}s", unit, elapsed.as_secs_f64());

    ProbeResult {
        unit: unit.to_string(),
        elapsed,
        outcome,
    }
}

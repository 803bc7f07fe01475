//! Host facts snapshot.
//!
//! Captured once at load time; the diagnostic log attaches it so a slow
//! transcript can be read next to the machine it came from. Deliberately
//! cheap: no process table, no external commands.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

static SNAPSHOT: OnceLock<HostFacts> = OnceLock::new();

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostFacts {
    pub hostname: String,
    pub cpu_cores: usize,
    pub os: String,
    pub arch: String,
}

impl HostFacts {
    fn collect() -> Self {
        HostFacts {
            hostname: hostname(),
            cpu_cores: num_cpus::get(),
            os: std::env::consts::OS.to_string(),
            arch: std::env::consts::ARCH.to_string(),
        }
    }

    /// JSON rendering for the diagnostic log.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }
}

fn hostname() -> String {
    if let Ok(name) = std::fs::read_to_string("/etc/hostname") {
        let name = name.trim();
        if !name.is_empty() {
            return name.to_string();
        }
    }
    std::env::var("HOSTNAME").unwrap_or_else(|_| "unknown".to_string())
}

/// Capture the host snapshot.
pub fn init() -> Result<()> {
    let _ = SNAPSHOT.set(HostFacts::collect());
    Ok(())
}

/// The captured snapshot, if `init` has run.
pub fn snapshot() -> Option<&'static HostFacts> {
    SNAPSHOT.get()
}

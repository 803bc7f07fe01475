//! Tool configuration.
//!
//! Lives in an optional `bisect.toml` in the state directory. A missing
//! file means defaults; a malformed file is a load failure surfaced on the
//! bisect transcript like any other broken unit.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::sync::OnceLock;

use crate::subsys::paths;

const CONFIG_FILE: &str = "bisect.toml";

static CONFIG: OnceLock<Config> = OnceLock::new();

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Loads slower than this many milliseconds get a warning in the
    /// diagnostic log.
    #[serde(default = "default_slow_threshold_ms")]
    pub slow_threshold_ms: u64,

    /// Scrub failure messages before they reach the diagnostic log.
    #[serde(default = "default_redact_enabled")]
    pub redact_enabled: bool,
}

fn default_slow_threshold_ms() -> u64 {
    250
}

fn default_redact_enabled() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Config {
            slow_threshold_ms: default_slow_threshold_ms(),
            redact_enabled: default_redact_enabled(),
        }
    }
}

impl Config {
    /// Parse configuration from `path`, defaulting when the file is absent.
    fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Config::default());
        }
        let raw = fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        toml::from_str(&raw).with_context(|| format!("parsing {}", path.display()))
    }

    fn load() -> Result<Self> {
        match paths::state_dir() {
            Ok(dir) => Config::load_from(&dir.join(CONFIG_FILE)),
            // No state directory at all: run on defaults.
            Err(_) => Ok(Config::default()),
        }
    }
}

/// One-time configuration load.
pub fn init() -> Result<()> {
    let config = Config::load()?;
    let _ = CONFIG.set(config);
    Ok(())
}

/// Effective configuration. Defaults when `init` has not run.
pub fn get() -> Config {
    CONFIG.get().cloned().unwrap_or_default()
}

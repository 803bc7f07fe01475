//! State directory resolution.
//!
//! Fallback chain, highest priority first:
//! 1. $BISECT_STATE_DIR (explicit override)
//! 2. $XDG_STATE_HOME/bisect
//! 3. $HOME/.local/state/bisect
//!
//! Resolution only; nothing is created on disk.

use anyhow::{anyhow, Result};
use std::path::PathBuf;
use std::sync::OnceLock;

static STATE_DIR: OnceLock<PathBuf> = OnceLock::new();

fn discover(
    override_dir: Option<String>,
    xdg_state: Option<String>,
    home: Option<String>,
) -> Option<PathBuf> {
    if let Some(dir) = override_dir {
        return Some(PathBuf::from(dir));
    }
    if let Some(xdg) = xdg_state {
        return Some(PathBuf::from(xdg).join("bisect"));
    }
    if let Some(home) = home {
        return Some(PathBuf::from(home).join(".local/state/bisect"));
    }
    None
}

fn discover_from_env() -> Option<PathBuf> {
    discover(
        std::env::var("BISECT_STATE_DIR").ok(),
        std::env::var("XDG_STATE_HOME").ok(),
        std::env::var("HOME").ok(),
    )
}

/// Resolve and remember the state directory.
pub fn init() -> Result<()> {
    let dir = discover_from_env()
        .ok_or_else(|| anyhow!("no usable state directory (HOME unset)"))?;
    let _ = STATE_DIR.set(dir);
    Ok(())
}

/// The resolved state directory. Falls back to fresh discovery when `init`
/// has not run yet.
pub fn state_dir() -> Result<PathBuf> {
    if let Some(dir) = STATE_DIR.get() {
        return Ok(dir.clone());
    }
    discover_from_env().ok_or_else(|| anyhow!("no usable state directory (HOME unset)"))
}

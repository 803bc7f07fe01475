//! Application subsystems probed by the startup manifest.
//!
//! Each subsystem performs its one-time setup in `init()` and keeps the
//! result in process-wide state. The prober treats them as opaque: it only
//! observes timing and success, never what the initialization did.

pub mod config;
pub mod paths;
pub mod redact;
pub mod telemetry;

//! Error types for the bisect engine.

use thiserror::Error;

/// A failure to load one named unit.
///
/// Everything that can go wrong while resolving or initializing a unit
/// collapses into one of these variants. The prober converts the error into
/// a FAIL line; it never propagates past the probe boundary.
#[derive(Error, Debug)]
pub enum LoadError {
    /// The identifier does not resolve to any registered unit.
    #[error("No module named '{0}'")]
    UnknownUnit(String),

    /// The unit's loader ran and failed, or panicked.
    #[error("{message}")]
    Init { unit: String, message: String },
}

//! The startup chain probed by the shipped binary.

use crate::registry::Registry;
use crate::subsys;

/// Units of the application startup chain, in the order they initialize at
/// boot. The run walks this list top to bottom; the sequence is fixed for
/// the lifetime of a run.
pub const STARTUP_CHAIN: &[&str] = &[
    "subsys::paths",
    "subsys::config",
    "subsys::redact",
    "subsys::telemetry",
];

/// Registry with every unit of the startup chain bound to its initializer.
pub fn builtin_registry() -> Registry {
    let mut registry = Registry::new();
    registry.register("subsys::paths", subsys::paths::init);
    registry.register("subsys::config", subsys::config::init);
    registry.register("subsys::redact", subsys::redact::init);
    registry.register("subsys::telemetry", subsys::telemetry::init);
    registry
}

//! bisect - startup import bisect tool.
//!
//! Walks the application's startup chain in order, timing each unit load
//! and reporting the first one that is slow or broken. Output is the
//! line-oriented transcript on stdout; diagnostics go to stderr.

use anyhow::Result;
use clap::Parser;
use tracing::{debug, Level};

use bisect_common::manifest;
use bisect_common::runner::run_bisect;
use bisect_common::subsys;

#[derive(Parser)]
#[command(name = "bisect")]
#[command(about = "Bisect a slow or broken startup import chain", long_about = None)]
#[command(version)]
struct Cli {}

fn main() -> Result<()> {
    // Stderr, so stdout carries exactly the transcript lines.
    tracing_subscriber::fmt()
        .with_max_level(Level::WARN)
        .with_writer(std::io::stderr)
        .init();

    let _cli = Cli::parse();

    let registry = manifest::builtin_registry();
    let use_color = atty::is(atty::Stream::Stdout);

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    run_bisect(&registry, manifest::STARTUP_CHAIN, &mut out, use_color)?;

    if let Some(facts) = subsys::telemetry::snapshot() {
        debug!("host facts: {}", facts.to_json());
    }

    Ok(())
}

//! Bisect runner - ordered probe sequence with a streamed transcript.
//!
//! The transcript is the tool's entire external interface:
//!
//! ```text
//! 1. Starting debug bisect...
//! Importing <unit>... DONE (<seconds>s)
//! Importing <unit>... FAIL: <message>
//! Bisect complete.
//! ```
//!
//! Lines are streamed, not batched: the announcement is flushed before the
//! probe runs, so a hanging loader leaves the unit's name on screen as the
//! last visible line.

use std::io::{self, Write};

use owo_colors::OwoColorize;
use tracing::{info, warn};

use crate::probe::{probe, ProbeOutcome};
use crate::registry::Registry;
use crate::subsys;

fn done_marker(elapsed_secs: f64, use_color: bool) -> String {
    let text = format!("DONE ({:.2}s)", elapsed_secs);
    if use_color {
        text.green().to_string()
    } else {
        text
    }
}

fn fail_marker(message: &str, use_color: bool) -> String {
    if use_color {
        format!("{} {}", "FAIL:".red().bold(), message)
    } else {
        format!("FAIL: {}", message)
    }
}

/// Probe every unit in `units`, in order, writing one status line per unit
/// to `sink` as each probe completes.
///
/// A probe failure is reported inline and the run continues to the final
/// completion line. Only a sink write failure aborts the run; that is the
/// harness failing, not a probe.
pub fn run_bisect<W: Write>(
    registry: &Registry,
    units: &[&str],
    sink: &mut W,
    use_color: bool,
) -> io::Result<()> {
    writeln!(sink, "1. Starting debug bisect...")?;

    let mut failures = 0usize;

    for unit in units {
        write!(sink, "Importing {}... ", unit)?;
        sink.flush()?;

        let result = probe(registry, unit);
        // Re-read per unit: the config unit may itself load mid-run, and
        // later units should see the configured values, not the defaults.
        let config = subsys::config::get();
        match &result.outcome {
            ProbeOutcome::Loaded => {
                writeln!(sink, "{}", done_marker(result.elapsed_secs(), use_color))?;
                if result.elapsed.as_millis() as u64 > config.slow_threshold_ms {
                    warn!(
                        "slow unit: {} took {:.2}s (threshold {}ms)",
                        unit,
                        result.elapsed_secs(),
                        config.slow_threshold_ms
                    );
                }
            }
            ProbeOutcome::Failed(message) => {
                failures += 1;
                writeln!(sink, "{}", fail_marker(message, use_color))?;

                let logged = if config.redact_enabled {
                    subsys::redact::redact(message)
                } else {
                    message.clone()
                };
                warn!("unit {} failed to load: {}", unit, logged);
            }
        }
    }

    writeln!(sink, "Bisect complete.")?;
    info!("bisect finished: {} probed, {} failed", units.len(), failures);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use regex::Regex;
    use std::thread;
    use std::time::Duration;

    fn ok_unit() -> anyhow::Result<()> {
        Ok(())
    }

    fn slow_unit() -> anyhow::Result<()> {
        thread::sleep(Duration::from_millis(20));
        Ok(())
    }

    fn failing_unit() -> anyhow::Result<()> {
        anyhow::bail!("state directory is read-only")
    }

    fn panicking_unit() -> anyhow::Result<()> {
        panic!("queue backend misconfigured");
    }

    fn transcript(registry: &Registry, units: &[&str]) -> Vec<String> {
        let mut sink = Vec::new();
        run_bisect(registry, units, &mut sink, false).unwrap();
        String::from_utf8(sink)
            .unwrap()
            .lines()
            .map(|l| l.to_string())
            .collect()
    }

    #[test]
    fn announcements_appear_in_input_order_with_no_omissions() {
        let mut registry = Registry::new();
        registry.register("app::a", ok_unit);
        registry.register("app::b", failing_unit);
        registry.register("app::c", ok_unit);

        let lines = transcript(&registry, &["app::a", "app::b", "app::c"]);
        let announced: Vec<&str> = lines
            .iter()
            .filter(|l| l.starts_with("Importing "))
            .map(|l| l.split("...").next().unwrap())
            .collect();
        assert_eq!(
            announced,
            vec![
                "Importing app::a",
                "Importing app::b",
                "Importing app::c"
            ]
        );
    }

    #[test]
    fn a_failure_does_not_stop_subsequent_probes() {
        let mut registry = Registry::new();
        registry.register("app::broken", failing_unit);
        registry.register("app::after", ok_unit);

        let lines = transcript(&registry, &["app::broken", "app::after"]);
        assert!(lines[1].starts_with("Importing app::broken... FAIL:"));
        assert!(lines[2].starts_with("Importing app::after... DONE"));
        assert_eq!(lines.last().unwrap(), "Bisect complete.");
    }

    #[test]
    fn success_line_has_two_decimal_seconds() {
        let mut registry = Registry::new();
        registry.register("app::slow", slow_unit);

        let lines = transcript(&registry, &["app::slow"]);
        let pattern = Regex::new(r"^Importing app::slow\.\.\. DONE \(\d+\.\d{2}s\)$").unwrap();
        assert!(
            pattern.is_match(&lines[1]),
            "unexpected success line: {}",
            lines[1]
        );
    }

    #[test]
    fn failure_line_carries_the_message_and_no_done_marker() {
        let registry = Registry::new();

        let lines = transcript(&registry, &["nonexistent_module_xyz"]);
        assert_eq!(
            lines[1],
            "Importing nonexistent_module_xyz... FAIL: No module named 'nonexistent_module_xyz'"
        );
        assert!(!lines[1].contains("DONE"));
    }

    #[test]
    fn final_line_is_always_the_completion_marker() {
        let mut registry = Registry::new();
        registry.register("app::a", failing_unit);

        let lines = transcript(&registry, &["app::a", "missing", "also_missing"]);
        assert_eq!(lines.last().unwrap(), "Bisect complete.");
    }

    #[test]
    fn empty_sequence_prints_only_startup_and_completion() {
        let registry = Registry::new();
        let lines = transcript(&registry, &[]);
        assert_eq!(lines, vec!["1. Starting debug bisect...", "Bisect complete."]);
    }

    #[test]
    fn reprobing_a_loaded_unit_reports_done_again() {
        let mut registry = Registry::new();
        registry.register("app::a", slow_unit);

        let lines = transcript(&registry, &["app::a", "app::a"]);
        assert!(lines[1].starts_with("Importing app::a... DONE"));
        assert!(lines[2].starts_with("Importing app::a... DONE"));
    }

    #[test]
    fn unit_panicking_at_load_time_is_reported_and_run_continues() {
        let mut registry = Registry::new();
        registry.register("app::queue", panicking_unit);
        registry.register("app::after", ok_unit);

        let lines = transcript(&registry, &["app::queue", "app::after"]);
        assert_eq!(
            lines[1],
            "Importing app::queue... FAIL: queue backend misconfigured"
        );
        assert!(lines[2].starts_with("Importing app::after... DONE"));
    }

    #[test]
    fn plain_sink_sees_no_escape_sequences() {
        let mut registry = Registry::new();
        registry.register("app::a", ok_unit);

        let mut sink = Vec::new();
        run_bisect(&registry, &["app::a", "missing"], &mut sink, false).unwrap();
        let text = String::from_utf8(sink).unwrap();
        assert!(!text.contains('\u{1b}'));
    }

    #[test]
    fn colored_sink_keeps_the_same_visible_text() {
        let mut registry = Registry::new();
        registry.register("app::a", ok_unit);

        let mut sink = Vec::new();
        run_bisect(&registry, &["app::a"], &mut sink, true).unwrap();
        let text = String::from_utf8(sink).unwrap();
        assert!(text.contains("DONE ("));
        assert!(text.contains("Bisect complete.\n"));
    }
}

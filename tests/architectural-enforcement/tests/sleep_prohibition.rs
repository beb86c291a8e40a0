//! Integration Test: Sleep Prohibition
//!
//! **Policy**: production code in the core and the TUI must not sleep. Ticks
//! are armed as deadlines and the event loop waits on them alongside input,
//! so a sleep anywhere would stall key handling.
//! **Exceptions**: test modules.

use architectural_enforcement::{sleep_violations_in, workspace_root};

/// Production source trees that must stay sleep-free
const CHECKED_DIRS: &[&str] = &["display/core/src", "tui/src"];

#[test]
fn test_no_sleep_in_production_code() {
    let root = workspace_root();
    let violations: Vec<_> = CHECKED_DIRS
        .iter()
        .flat_map(|dir| sleep_violations_in(&root.join(dir)))
        .collect();

    if !violations.is_empty() {
        eprintln!("\nSleep calls found in production code:\n");
        for violation in &violations {
            eprintln!("  {violation}");
        }
        eprintln!("\nArm a deadline (TickSchedule) or wait on I/O instead.");

        panic!(
            "\nFound {} sleep violation(s) in production code.",
            violations.len()
        );
    }
}

#[test]
fn test_checked_dirs_exist() {
    let root = workspace_root();
    for dir in CHECKED_DIRS {
        assert!(root.join(dir).is_dir(), "{dir} is missing; update CHECKED_DIRS");
    }
}

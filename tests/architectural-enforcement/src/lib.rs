//! Architectural Enforcement
//!
//! Source scanners used by the integration tests in `tests/`:
//! - No sleep calls in production code. Ticks are armed deadlines that the
//!   event loop waits on, never sleeps.
//!
//! Test modules (`#[cfg(test)]` to end of file) are exempt.

use std::fs;
use std::path::{Path, PathBuf};

/// One offending line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub path: PathBuf,
    pub line: usize,
    pub text: String,
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{} - {}", self.path.display(), self.line, self.text)
    }
}

/// Workspace root, resolved from this crate's manifest
pub fn workspace_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../..")
}

/// Scan every `.rs` file under `dir` for sleep calls
pub fn sleep_violations_in(dir: &Path) -> Vec<Violation> {
    let mut violations = Vec::new();
    if !dir.exists() {
        return violations;
    }

    for entry in walkdir::WalkDir::new(dir)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        if entry.path().extension().and_then(|s| s.to_str()) != Some("rs") {
            continue;
        }
        let Ok(content) = fs::read_to_string(entry.path()) else {
            continue;
        };
        violations.extend(
            sleep_lines(&content)
                .into_iter()
                .map(|(line, text)| Violation {
                    path: entry.path().to_path_buf(),
                    line,
                    text,
                }),
        );
    }
    violations
}

/// Line numbers (1-based) and text of sleep calls outside test modules
pub fn sleep_lines(content: &str) -> Vec<(usize, String)> {
    content
        .lines()
        .enumerate()
        .take_while(|(_, line)| !line.trim_start().starts_with("#[cfg(test)]"))
        .filter(|(_, line)| is_sleep_call(line))
        .map(|(idx, line)| (idx + 1, line.trim().to_string()))
        .collect()
}

/// Whether the code part of `line` calls a sleep function
///
/// `sleep_until` passes: waiting on a deadline is how ticks are scheduled.
pub fn is_sleep_call(line: &str) -> bool {
    // Skip comments
    let code_part = line.split("//").next().unwrap_or(line);
    code_part.contains("::sleep(") || code_part.contains(".sleep(")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sleep_violation_detection() {
        assert!(is_sleep_call("    tokio::time::sleep(Duration::from_millis(10)).await;"));
        assert!(is_sleep_call("    std::thread::sleep(d);"));
        assert!(is_sleep_call("    clock.sleep(d);"));
    }

    #[test]
    fn test_deadline_wait_is_allowed() {
        assert!(!is_sleep_call("    Some(deadline) => tokio::time::sleep_until(deadline).await,"));
    }

    #[test]
    fn test_comments_are_ignored() {
        assert!(!is_sleep_call("    // never tokio::time::sleep(d) here"));
    }

    #[test]
    fn test_test_module_is_exempt() {
        let code = [
            "fn tick() {",
            "    std::thread::sleep(d);",
            "}",
            "",
            "#[cfg(test)]",
            "mod tests {",
            "    fn slow() { std::thread::sleep(d); }",
            "}",
        ]
        .join("\n");

        let found = sleep_lines(&code);
        assert_eq!(found, vec![(2, "std::thread::sleep(d);".to_string())]);
    }
}

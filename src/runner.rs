//! Check runner: invokes one external tool per file and classifies its
//! textual output.
//!
//! Produces a `RunSummary` with one `CheckResult` per processed file. Files
//! run strictly in sequence; fail-fast checks stop at the first error, so
//! callers must not assume every input file appears in the summary. Exit
//! codes from the tools are captured but never drive classification — the
//! textual rules do, matching the tools' historically inconsistent exit
//! behavior. The runner holds no state across files and is safe to call
//! concurrently for different checks.

use crate::exec::{self, CommandSpec};
use crate::models::descriptor::{CheckDescriptor, ParseStrategy};
use crate::models::{CheckResult, Classification, RunSummary};
use crate::utils;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone)]
/// Per-run settings resolved from CLI, config, and descriptor defaults.
pub struct RunOptions {
    pub verbose: bool,
    pub fail_fast: bool,
    pub timeout: Option<Duration>,
    pub standard: String,
    pub encoding: String,
}

impl Default for RunOptions {
    fn default() -> Self {
        RunOptions {
            verbose: false,
            fail_fast: false,
            timeout: None,
            standard: "Drupal".to_string(),
            encoding: "UTF8".to_string(),
        }
    }
}

/// Substitute descriptor placeholders for one file. Substitution happens per
/// argv element; the result is spawned directly, never via a shell.
pub fn build_command(desc: &CheckDescriptor, file: &Path, opts: &RunOptions) -> CommandSpec {
    let file_str = file.to_string_lossy();
    let args = desc
        .args
        .iter()
        .map(|a| {
            a.replace("{file}", &file_str)
                .replace("{standard}", &opts.standard)
                .replace("{encoding}", &opts.encoding)
        })
        .collect();
    CommandSpec::new(desc.program, args)
}

/// Run one check over an ordered file list.
pub fn run(desc: &CheckDescriptor, files: &[PathBuf], opts: &RunOptions) -> RunSummary {
    let mut summary = RunSummary::new(desc.name);
    for file in files {
        if opts.verbose {
            eprintln!(
                "{} {} {}",
                utils::status_prefix(),
                desc.label,
                file.display()
            );
        }
        let spec = build_command(desc, file, opts);
        let file_str = file.to_string_lossy().to_string();
        let result = match exec::run_command(&spec, opts.timeout) {
            Ok(out) if out.timed_out => CheckResult {
                file: file_str,
                classification: Classification::Unexpected,
                messages: out.lines,
                note: Some(format!(
                    "timed out after {}s: {}",
                    opts.timeout.map(|t| t.as_secs()).unwrap_or(0),
                    spec.display()
                )),
            },
            Ok(out) => classify(desc, file_str, &out.lines),
            Err(e) => CheckResult {
                file: file_str,
                classification: Classification::Unexpected,
                messages: Vec::new(),
                note: Some(format!("failed to run {}: {}", spec.display(), e)),
            },
        };
        let halt = opts.fail_fast && result.classification == Classification::Error;
        summary.push(result);
        if halt {
            break;
        }
    }
    summary
}

/// Classify one file's captured output lines against the descriptor's rules.
pub fn classify(desc: &CheckDescriptor, file: String, lines: &[String]) -> CheckResult {
    if lines.iter().all(|l| l.trim().is_empty()) {
        if desc.empty_output_ok {
            return CheckResult::ok(file);
        }
        return CheckResult {
            file,
            classification: Classification::Unexpected,
            messages: Vec::new(),
            note: Some(format!("{} produced no output", desc.program)),
        };
    }

    // Confirm the response is well-formed before trusting anything else.
    let mut summary_captures: Option<Vec<String>> = None;
    if let Some(wf) = &desc.well_formed {
        let marker = lines
            .len()
            .checked_sub(1 + wf.line_from_end)
            .and_then(|idx| lines.get(idx))
            .and_then(|line| wf.pattern.captures(line));
        match marker {
            Some(caps) => {
                summary_captures = Some(
                    caps.iter()
                        .map(|m| m.map(|m| m.as_str().to_string()).unwrap_or_default())
                        .collect(),
                );
            }
            None => {
                return CheckResult {
                    file,
                    classification: Classification::Unexpected,
                    messages: lines.to_vec(),
                    note: Some(format!("unexpected response from {}", desc.program)),
                };
            }
        }
    }

    // Header/footer noise is excluded from message content.
    let end = lines.len().saturating_sub(desc.strip_tail);
    let retained: Vec<String> = lines
        .get(desc.strip_head..end.max(desc.strip_head))
        .unwrap_or(&[])
        .iter()
        .filter(|l| !l.trim().is_empty())
        .cloned()
        .collect();

    match &desc.strategy {
        ParseStrategy::LineScan { severity } => {
            if retained.is_empty() {
                CheckResult::ok(file)
            } else {
                CheckResult {
                    file,
                    classification: *severity,
                    messages: retained,
                    note: None,
                }
            }
        }
        ParseStrategy::CountSummary {
            error_group,
            warning_group,
        } => {
            let caps = match summary_captures {
                Some(c) => c,
                // Misconfigured descriptor; report rather than guess.
                None => {
                    return CheckResult {
                        file,
                        classification: Classification::Unexpected,
                        messages: lines.to_vec(),
                        note: Some(format!("no summary line rule for {}", desc.program)),
                    }
                }
            };
            let count = |group: &Option<usize>| -> f64 {
                group
                    .and_then(|g| caps.get(g))
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(0.0)
            };
            if count(error_group) > 0.0 {
                CheckResult {
                    file,
                    classification: Classification::Error,
                    messages: retained,
                    note: None,
                }
            } else if count(warning_group) > 0.0 {
                CheckResult {
                    file,
                    classification: Classification::Warning,
                    messages: retained,
                    note: None,
                }
            } else {
                CheckResult::ok(file)
            }
        }
        ParseStrategy::SuccessMarker { pattern } => {
            let bad: Vec<String> = retained
                .iter()
                .filter(|l| !pattern.is_match(l))
                .cloned()
                .collect();
            if bad.is_empty() {
                CheckResult::ok(file)
            } else {
                CheckResult {
                    file,
                    classification: Classification::Error,
                    messages: bad,
                    note: None,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checks::find_check;
    use crate::models::descriptor::{ParseStrategy, WellFormed};
    use regex::Regex;
    use std::fs;
    use std::io::Write;
    use tempfile::tempdir;

    fn lines(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_success_marker_clean_file() {
        let desc = find_check("php-lint").unwrap();
        let out = lines(&["No syntax errors detected in foo.php"]);
        let res = classify(&desc, "foo.php".into(), &out);
        assert_eq!(res.classification, Classification::Ok);
        assert!(res.messages.is_empty());
    }

    #[test]
    fn test_success_marker_syntax_error() {
        let desc = find_check("php-lint").unwrap();
        let out = lines(&[
            "PHP Parse error:  syntax error, unexpected '}' in foo.php on line 3",
            "Errors parsing foo.php",
        ]);
        let res = classify(&desc, "foo.php".into(), &out);
        assert_eq!(res.classification, Classification::Error);
        assert_eq!(res.messages.len(), 2);
        assert!(res.messages[0].contains("Parse error"));
    }

    #[test]
    fn test_success_marker_empty_output_is_unexpected() {
        let desc = find_check("php-lint").unwrap();
        let res = classify(&desc, "foo.php".into(), &[]);
        assert_eq!(res.classification, Classification::Unexpected);
        assert!(res.note.unwrap().contains("no output"));
    }

    #[test]
    fn test_line_scan_debug_statement_kept_verbatim() {
        let desc = find_check("js-debug").unwrap();
        let out = lines(&["app.js:12:  console.log('here');"]);
        let res = classify(&desc, "app.js".into(), &out);
        assert_eq!(res.classification, Classification::Error);
        assert_eq!(res.messages, vec!["app.js:12:  console.log('here');"]);
    }

    #[test]
    fn test_line_scan_empty_output_is_ok() {
        let desc = find_check("php-debug").unwrap();
        let res = classify(&desc, "foo.php".into(), &[]);
        assert_eq!(res.classification, Classification::Ok);
    }

    #[test]
    fn test_mess_detector_lines_are_warnings() {
        let desc = find_check("php-md").unwrap();
        let out = lines(&["foo.php:10 The method x() has a Cyclomatic Complexity of 14."]);
        let res = classify(&desc, "foo.php".into(), &out);
        assert_eq!(res.classification, Classification::Warning);
    }

    #[test]
    fn test_count_summary_errors_win_over_warnings() {
        let desc = find_check("js-lint").unwrap();
        let out = lines(&[
            "app.js(3): SyntaxError: missing ; before statement",
            "2 errors, 1 warning",
        ]);
        let res = classify(&desc, "app.js".into(), &out);
        assert_eq!(res.classification, Classification::Error);
        // Summary line is footer noise, not a message.
        assert_eq!(res.messages, vec!["app.js(3): SyntaxError: missing ; before statement"]);
    }

    #[test]
    fn test_count_summary_warnings_only() {
        let desc = find_check("js-lint").unwrap();
        let out = lines(&["app.js(9): lint warning: unused variable", "0 errors, 1 warning"]);
        let res = classify(&desc, "app.js".into(), &out);
        assert_eq!(res.classification, Classification::Warning);
    }

    #[test]
    fn test_count_summary_clean() {
        let desc = find_check("js-lint").unwrap();
        let out = lines(&["0 errors, 0 warnings"]);
        let res = classify(&desc, "app.js".into(), &out);
        assert_eq!(res.classification, Classification::Ok);
        assert!(res.messages.is_empty());
    }

    #[test]
    fn test_count_summary_malformed_is_unexpected_never_ok() {
        let desc = find_check("js-lint").unwrap();
        let out = lines(&["something went sideways"]);
        let res = classify(&desc, "app.js".into(), &out);
        assert_eq!(res.classification, Classification::Unexpected);
        assert!(res.note.unwrap().contains("unexpected response from jsl"));
        assert_eq!(res.messages, vec!["something went sideways"]);
    }

    #[test]
    fn test_duplication_percentage_zero_is_ok() {
        let desc = find_check("php-cpd").unwrap();
        let out = lines(&[
            "phpcpd 1.4.3 by Sebastian Bergmann.",
            "",
            "0.00% duplicated lines out of 120 total lines of code.",
            "",
            "Time: 0 seconds, Memory: 2.00Mb",
        ]);
        let res = classify(&desc, "foo.php".into(), &out);
        assert_eq!(res.classification, Classification::Ok);
    }

    #[test]
    fn test_duplication_percentage_positive_is_warning_with_body() {
        let desc = find_check("php-cpd").unwrap();
        let out = lines(&[
            "phpcpd 1.4.3 by Sebastian Bergmann.",
            "",
            "Found 1 exact clones with 25 duplicated lines in 1 files:",
            "  - foo.php:10-35",
            "12.50% duplicated lines out of 200 total lines of code.",
            "",
            "Time: 0 seconds, Memory: 2.00Mb",
        ]);
        let res = classify(&desc, "foo.php".into(), &out);
        assert_eq!(res.classification, Classification::Warning);
        // First two and last two lines are stripped from the report body.
        assert_eq!(
            res.messages,
            vec![
                "Found 1 exact clones with 25 duplicated lines in 1 files:",
                "  - foo.php:10-35",
                "12.50% duplicated lines out of 200 total lines of code.",
            ]
        );
    }

    #[test]
    fn test_style_checker_footer_marker_and_residual_warnings() {
        let desc = find_check("php-cs").unwrap();
        let out = lines(&[
            "FILE: foo.php",
            " 3 | ERROR | Missing file doc comment",
            "Time: 0.5 seconds, Memory: 4.00Mb",
            "",
        ]);
        let res = classify(&desc, "foo.php".into(), &out);
        assert_eq!(res.classification, Classification::Warning);
        assert_eq!(res.messages.len(), 2);
    }

    #[test]
    fn test_style_checker_missing_footer_is_unexpected() {
        let desc = find_check("php-cs").unwrap();
        let out = lines(&["phpcs: command mangled its own output"]);
        let res = classify(&desc, "foo.php".into(), &out);
        assert_eq!(res.classification, Classification::Unexpected);
    }

    #[test]
    fn test_build_command_substitutes_argv_elements() {
        let desc = find_check("php-cs").unwrap();
        let opts = RunOptions::default();
        let spec = build_command(&desc, Path::new("a dir/f.php"), &opts);
        assert_eq!(spec.program, "phpcs");
        assert_eq!(
            spec.args,
            vec!["--standard=Drupal", "--encoding=UTF8", "a dir/f.php"]
        );
    }

    #[test]
    fn test_run_empty_file_list_is_ok() {
        let desc = find_check("php-lint").unwrap();
        let sum = run(&desc, &[], &RunOptions::default());
        assert_eq!(sum.overall, Classification::Ok);
        assert!(sum.results.is_empty());
    }

    #[test]
    fn test_run_grep_check_end_to_end() {
        let dir = tempdir().unwrap();
        let clean = dir.path().join("clean.js");
        let dirty = dir.path().join("dirty.js");
        fs::write(&clean, "var x = 1;\n").unwrap();
        let mut f = fs::File::create(&dirty).unwrap();
        writeln!(f, "function f() {{").unwrap();
        writeln!(f, "  console.log('debug');").unwrap();
        writeln!(f, "}}").unwrap();

        let desc = find_check("js-debug").unwrap();
        let sum = run(
            &desc,
            &[clean.clone(), dirty.clone()],
            &RunOptions::default(),
        );
        assert_eq!(sum.overall, Classification::Error);
        assert_eq!(sum.results.len(), 2);
        assert_eq!(sum.results[0].classification, Classification::Ok);
        assert_eq!(sum.results[1].classification, Classification::Error);
        assert!(sum.results[1].messages[0].contains("console.log"));
    }

    #[test]
    fn test_run_fail_fast_truncates_results() {
        let dir = tempdir().unwrap();
        let bad = dir.path().join("bad.js");
        let never = dir.path().join("never.js");
        fs::write(&bad, "  console.log('x');\n").unwrap();
        fs::write(&never, "var y = 2;\n").unwrap();

        let desc = find_check("js-debug").unwrap();
        let opts = RunOptions {
            fail_fast: true,
            ..RunOptions::default()
        };
        let sum = run(&desc, &[bad.clone(), never.clone()], &opts);
        assert_eq!(sum.results.len(), 1);
        assert_eq!(sum.overall, Classification::Error);
    }

    #[test]
    fn test_run_missing_tool_is_unexpected() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("a.php");
        fs::write(&file, "<?php\n").unwrap();
        let mut desc = find_check("php-lint").unwrap();
        desc.program = "checkrun-no-such-tool-0000";
        let sum = run(&desc, &[file], &RunOptions::default());
        assert_eq!(sum.overall, Classification::Unexpected);
        assert!(sum.results[0].note.as_ref().unwrap().contains("failed to run"));
    }

    #[test]
    fn test_run_timeout_is_unexpected_with_note() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("a.php");
        fs::write(&file, "<?php\n").unwrap();
        let desc = CheckDescriptor {
            name: "slow",
            label: "Stalling",
            program: "sleep",
            args: vec!["5".into()],
            strategy: ParseStrategy::LineScan {
                severity: Classification::Error,
            },
            well_formed: None,
            strip_head: 0,
            strip_tail: 0,
            empty_output_ok: true,
            fail_fast: false,
            fileset: "php-custom",
        };
        let opts = RunOptions {
            timeout: Some(Duration::from_millis(100)),
            ..RunOptions::default()
        };
        let sum = run(&desc, &[file], &opts);
        assert_eq!(sum.overall, Classification::Unexpected);
        assert!(sum.results[0].note.as_ref().unwrap().contains("timed out"));
    }

    #[test]
    fn test_well_formed_marker_position_guard() {
        // Marker indexed from the end must not underflow on short output.
        let desc = CheckDescriptor {
            name: "short",
            label: "Checking",
            program: "tool",
            args: vec!["{file}".into()],
            strategy: ParseStrategy::CountSummary {
                error_group: Some(1),
                warning_group: None,
            },
            well_formed: Some(WellFormed {
                pattern: Regex::new(r"^(\d+) problems").unwrap(),
                line_from_end: 5,
            }),
            strip_head: 0,
            strip_tail: 0,
            empty_output_ok: false,
            fail_fast: false,
            fileset: "php-custom",
        };
        let res = classify(&desc, "x".into(), &lines(&["only one line"]));
        assert_eq!(res.classification, Classification::Unexpected);
    }
}

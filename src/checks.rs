//! Built-in check definitions.
//!
//! Seven checks, each a thin wrapper around an external analysis tool:
//! - `php-lint`: `php -n -l`, syntax check via the success marker line.
//! - `php-debug` / `js-debug`: `grep -nHE` for common debug statements.
//! - `js-lint`: JavaScriptLint with an error/warning count summary line.
//! - `php-md`: PHPMD mess detection, every output line is a warning.
//! - `php-cpd`: PHPCPD copy/paste detection with a `% duplicated` summary.
//! - `php-cs`: PHP_CodeSniffer with a `Time: ... Memory:` footer marker.

use crate::models::descriptor::{CheckDescriptor, ParseStrategy, WellFormed};
use crate::models::Classification;
use regex::Regex;

/// Debug statements grepped for in PHP sources. The leading space keeps
/// definitions of similarly named functions from matching.
pub const PHP_DEBUG_PATTERNS: &[&str] = &[
    " dsm\\(",
    " dpm\\(",
    " dpr\\(",
    " dprint_r\\(",
    " db_queryd\\(",
    " krumo",
    " kpr\\(",
    " kprint_r\\(",
    " var_dump\\(",
    " dd\\(",
    " drupal_debug\\(",
    " dpq\\(",
];

/// Debug statements grepped for in JavaScript sources.
pub const JS_DEBUG_PATTERNS: &[&str] = &[" console.log\\("];

fn re(pattern: &str) -> Regex {
    Regex::new(pattern).expect("invalid built-in pattern")
}

fn grep_args(patterns: &[&str]) -> Vec<String> {
    vec![
        "-nHE".to_string(),
        format!("({})", patterns.join("|")),
        "{file}".to_string(),
    ]
}

/// All built-in checks, in the order they run under `--all`.
pub fn builtin_checks() -> Vec<CheckDescriptor> {
    vec![
        CheckDescriptor {
            name: "php-lint",
            label: "Linting",
            program: "php",
            args: vec!["-n".into(), "-l".into(), "{file}".into()],
            strategy: ParseStrategy::SuccessMarker {
                pattern: re(r"^No syntax errors detected"),
            },
            well_formed: None,
            strip_head: 0,
            strip_tail: 0,
            empty_output_ok: false,
            fail_fast: false,
            fileset: "php-custom",
        },
        CheckDescriptor {
            name: "php-debug",
            label: "Checking",
            program: "grep",
            args: grep_args(PHP_DEBUG_PATTERNS),
            strategy: ParseStrategy::LineScan {
                severity: Classification::Error,
            },
            well_formed: None,
            strip_head: 0,
            strip_tail: 0,
            empty_output_ok: true,
            fail_fast: false,
            fileset: "php-custom",
        },
        CheckDescriptor {
            name: "js-lint",
            label: "Linting",
            program: "jsl",
            args: vec![
                "-nologo".into(),
                "-nofilelisting".into(),
                "-process".into(),
                "{file}".into(),
            ],
            strategy: ParseStrategy::CountSummary {
                error_group: Some(1),
                warning_group: Some(3),
            },
            well_formed: Some(WellFormed {
                pattern: re(r"^(\d+) error(.*?), (\d+) warning"),
                line_from_end: 0,
            }),
            strip_head: 0,
            strip_tail: 1,
            empty_output_ok: false,
            fail_fast: true,
            fileset: "js-custom",
        },
        CheckDescriptor {
            name: "js-debug",
            label: "Checking",
            program: "grep",
            args: grep_args(JS_DEBUG_PATTERNS),
            strategy: ParseStrategy::LineScan {
                severity: Classification::Error,
            },
            well_formed: None,
            strip_head: 0,
            strip_tail: 0,
            empty_output_ok: true,
            fail_fast: false,
            fileset: "js-custom",
        },
        CheckDescriptor {
            name: "php-md",
            label: "Mess detecting",
            program: "phpmd",
            args: vec![
                "{file}".into(),
                "text".into(),
                "codesize,controversial,design,naming,unusedcode".into(),
            ],
            strategy: ParseStrategy::LineScan {
                severity: Classification::Warning,
            },
            well_formed: None,
            strip_head: 0,
            strip_tail: 0,
            empty_output_ok: true,
            fail_fast: false,
            fileset: "php-custom",
        },
        CheckDescriptor {
            name: "php-cpd",
            label: "Copy/paste detecting",
            program: "phpcpd",
            args: vec!["{file}".into()],
            strategy: ParseStrategy::CountSummary {
                error_group: None,
                warning_group: Some(1),
            },
            // The duplication percentage sits on the 3rd-last line; the first
            // two and last two lines are banner and timing noise.
            well_formed: Some(WellFormed {
                pattern: re(r"^(\d+\.\d+)% duplicated"),
                line_from_end: 2,
            }),
            strip_head: 2,
            strip_tail: 2,
            empty_output_ok: false,
            fail_fast: false,
            fileset: "php-custom",
        },
        CheckDescriptor {
            name: "php-cs",
            label: "Code sniffing",
            program: "phpcs",
            args: vec![
                "--standard={standard}".into(),
                "--encoding={encoding}".into(),
                "{file}".into(),
            ],
            strategy: ParseStrategy::LineScan {
                severity: Classification::Warning,
            },
            well_formed: Some(WellFormed {
                pattern: re(r"^Time: .*? seconds, Memory:"),
                line_from_end: 1,
            }),
            strip_head: 0,
            strip_tail: 2,
            empty_output_ok: false,
            fail_fast: false,
            fileset: "php-custom",
        },
    ]
}

/// Look up a built-in check by name.
pub fn find_check(name: &str) -> Option<CheckDescriptor> {
    builtin_checks().into_iter().find(|c| c.name == name)
}

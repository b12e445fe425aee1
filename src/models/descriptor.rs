//! Check descriptor schema: command template plus output classification rules.
//!
//! A descriptor is static configuration defined once at startup and never
//! mutated. The command is an argument vector with `{file}`, `{standard}` and
//! `{encoding}` placeholders; arguments are always passed discretely to the
//! OS, never through a shell, so arbitrary file paths cannot inject commands.

use crate::models::Classification;
use regex::Regex;

#[derive(Debug, Clone)]
/// How the (stripped) tool output maps to a classification.
pub enum ParseStrategy {
    /// Any retained non-empty line is a finding at the given severity.
    /// Used by the debug-statement greppers (error) and by tools whose every
    /// output line is a diagnostic (warning).
    LineScan { severity: Classification },
    /// The well-formed marker line carries numeric capture groups; a non-zero
    /// error count classifies as error, else a non-zero warning count as
    /// warning, else ok. Counts are parsed as floats so percentages work too.
    CountSummary {
        error_group: Option<usize>,
        warning_group: Option<usize>,
    },
    /// A line matching `pattern` marks success; any other non-empty output
    /// classifies as error with the full message retained.
    SuccessMarker { pattern: Regex },
}

#[derive(Debug, Clone)]
/// A line the tool must emit for its response to count as well-formed.
/// When the line is missing the file is classified `unexpected-output`,
/// never silently ok.
pub struct WellFormed {
    /// Compiled once at descriptor construction; classification does no
    /// pattern compilation on the per-file path.
    pub pattern: Regex,
    /// Index of the marker line counted from the end of output (0 = last).
    pub line_from_end: usize,
}

#[derive(Debug, Clone)]
/// Static definition of one external check.
pub struct CheckDescriptor {
    pub name: &'static str,
    /// Verb used in per-file progress notices, e.g. "Linting".
    pub label: &'static str,
    pub program: &'static str,
    /// Argument template; `{file}` is substituted per file, `{standard}` and
    /// `{encoding}` from run options.
    pub args: Vec<String>,
    pub strategy: ParseStrategy,
    pub well_formed: Option<WellFormed>,
    /// Leading lines to drop before collecting messages (tool header noise).
    pub strip_head: usize,
    /// Trailing lines to drop before collecting messages (timing/memory
    /// footers). Stripped lines are still consulted for the marker above.
    pub strip_tail: usize,
    /// Whether completely empty output means a clean file. When false, empty
    /// output classifies as `unexpected-output`.
    pub empty_output_ok: bool,
    /// Stop processing remaining files after the first error-classified file.
    pub fail_fast: bool,
    /// Name of the fileset this check runs over by default.
    pub fileset: &'static str,
}

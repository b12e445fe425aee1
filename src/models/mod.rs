//! Shared data models for check outcomes and run summaries.

pub mod descriptor;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "kebab-case")]
/// Outcome bucket for one checked file.
///
/// Variant order defines severity: `Error` > `Unexpected` > `Warning` > `Ok`,
/// which is what `RunSummary::overall` aggregates with.
pub enum Classification {
    Ok,
    Warning,
    /// The tool produced output the classifier cannot parse, or failed to run
    /// at all. An operational fault, distinct from a code-quality finding.
    #[serde(rename = "unexpected-output")]
    Unexpected,
    Error,
}

impl Classification {
    /// Stable textual name, matching the JSON serialization.
    pub fn as_str(&self) -> &'static str {
        match self {
            Classification::Ok => "ok",
            Classification::Warning => "warning",
            Classification::Unexpected => "unexpected-output",
            Classification::Error => "error",
        }
    }
}

impl std::fmt::Display for Classification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Serialize)]
/// Per-file outcome: classification plus the raw tool message lines.
pub struct CheckResult {
    pub file: String,
    pub classification: Classification,
    /// Raw tool output lines retained for this file, verbatim.
    pub messages: Vec<String>,
    /// Explanatory note when the tool's output did not match any expected
    /// pattern (missing summary line, spawn failure, timeout).
    pub note: Option<String>,
}

impl CheckResult {
    pub fn ok(file: String) -> Self {
        CheckResult {
            file,
            classification: Classification::Ok,
            messages: Vec::new(),
            note: None,
        }
    }
}

#[derive(Debug, Serialize)]
/// Aggregate over all files of one check run.
pub struct RunSummary {
    pub check: String,
    /// Worst classification observed across results.
    pub overall: Classification,
    pub results: Vec<CheckResult>,
}

impl RunSummary {
    pub fn new(check: &str) -> Self {
        RunSummary {
            check: check.to_string(),
            overall: Classification::Ok,
            results: Vec::new(),
        }
    }

    /// Record a result, keeping `overall` at the maximum severity seen.
    pub fn push(&mut self, result: CheckResult) {
        if result.classification > self.overall {
            self.overall = result.classification;
        }
        self.results.push(result);
    }
}

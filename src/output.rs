//! Output rendering for check runs.
//!
//! Supports `human` (default) and `json` outputs. Raw tool message lines are
//! printed verbatim so operators can trace a finding back to the underlying
//! tool's diagnostic. The JSON form includes per-file results and a top-level
//! summary.

use crate::models::{Classification, RunSummary};
use crate::utils;
use owo_colors::OwoColorize;
use serde_json::json;
use serde_json::Value as JsonVal;
use std::path::Path;

fn rel_display(root: &Path, file: &str) -> String {
    pathdiff::diff_paths(file, root)
        .map(|p| p.to_string_lossy().to_string())
        .unwrap_or_else(|| file.to_string())
}

/// Print run results in the requested format.
pub fn print_runs(runs: &[RunSummary], root: &Path, output: &str) {
    match output {
        "json" => println!(
            "{}",
            serde_json::to_string_pretty(&compose_runs_json(runs, root)).unwrap()
        ),
        _ => {
            let color = utils::use_colors();
            for run in runs {
                for res in &run.results {
                    if res.classification == Classification::Ok {
                        continue;
                    }
                    let sev = match res.classification {
                        Classification::Error => {
                            if color {
                                "⟦error⟧".red().bold().to_string()
                            } else {
                                "⟦error⟧".to_string()
                            }
                        }
                        Classification::Unexpected => {
                            if color {
                                "⟦unexpected⟧".magenta().bold().to_string()
                            } else {
                                "⟦unexpected⟧".to_string()
                            }
                        }
                        _ => {
                            if color {
                                "⟦warn⟧".yellow().bold().to_string()
                            } else {
                                "⟦warn⟧".to_string()
                            }
                        }
                    };
                    let icon = match res.classification {
                        Classification::Error => "✖".red().to_string(),
                        Classification::Unexpected => "◆".magenta().to_string(),
                        _ => "▲".yellow().to_string(),
                    };
                    let file = rel_display(root, &res.file);
                    let file = if color {
                        file.bold().to_string()
                    } else {
                        file
                    };
                    println!("{} {} {} ❲{}❳", icon, sev, file, run.check);
                    if let Some(note) = &res.note {
                        println!("    {}", note);
                    }
                    for msg in &res.messages {
                        println!("    {}", msg);
                    }
                }
            }
            let (errors, warnings, unexpected, _ok, files) = totals(runs);
            let summary = format!(
                "— Summary — errors={} warnings={} unexpected={} files={}",
                errors, warnings, unexpected, files
            );
            if color {
                println!("{}", summary.bold());
            } else {
                println!("{}", summary);
            }
        }
    }
}

fn totals(runs: &[RunSummary]) -> (usize, usize, usize, usize, usize) {
    let mut errors = 0;
    let mut warnings = 0;
    let mut unexpected = 0;
    let mut ok = 0;
    let mut files = 0;
    for run in runs {
        for res in &run.results {
            files += 1;
            match res.classification {
                Classification::Error => errors += 1,
                Classification::Warning => warnings += 1,
                Classification::Unexpected => unexpected += 1,
                Classification::Ok => ok += 1,
            }
        }
    }
    (errors, warnings, unexpected, ok, files)
}

/// Compose the runs JSON object (pure) for testing/snapshot purposes.
pub fn compose_runs_json(runs: &[RunSummary], root: &Path) -> JsonVal {
    let checks: Vec<_> = runs
        .iter()
        .map(|run| {
            let results: Vec<_> = run
                .results
                .iter()
                .map(|r| {
                    json!({
                        "file": rel_display(root, &r.file),
                        "classification": r.classification,
                        "messages": r.messages,
                        "note": r.note,
                    })
                })
                .collect();
            json!({
                "name": run.check,
                "overall": run.overall,
                "results": results,
            })
        })
        .collect();
    let (errors, warnings, unexpected, ok, files) = totals(runs);
    let summary = json!({
        "errors": errors,
        "warnings": warnings,
        "unexpected": unexpected,
        "ok": ok,
        "files": files,
    });
    json!({"checks": checks, "summary": summary})
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CheckResult;

    fn sample_runs() -> Vec<RunSummary> {
        let mut lint = RunSummary::new("php-lint");
        lint.push(CheckResult::ok("/repo/a.php".into()));
        lint.push(CheckResult {
            file: "/repo/b.php".into(),
            classification: Classification::Error,
            messages: vec!["Parse error in b.php on line 3".into()],
            note: None,
        });
        let mut cpd = RunSummary::new("php-cpd");
        cpd.push(CheckResult {
            file: "/repo/c.php".into(),
            classification: Classification::Unexpected,
            messages: vec![],
            note: Some("failed to run phpcpd /repo/c.php: not found".into()),
        });
        vec![lint, cpd]
    }

    #[test]
    fn test_compose_runs_json_shape() {
        let out = compose_runs_json(&sample_runs(), Path::new("/repo"));
        assert_eq!(out["summary"]["errors"], 1);
        assert_eq!(out["summary"]["unexpected"], 1);
        assert_eq!(out["summary"]["warnings"], 0);
        assert_eq!(out["summary"]["ok"], 1);
        assert_eq!(out["summary"]["files"], 3);
        assert_eq!(out["checks"][0]["name"], "php-lint");
        assert_eq!(out["checks"][0]["overall"], "error");
        assert_eq!(out["checks"][0]["results"][1]["file"], "b.php");
        assert_eq!(
            out["checks"][0]["results"][1]["messages"][0],
            "Parse error in b.php on line 3"
        );
        assert_eq!(out["checks"][1]["overall"], "unexpected-output");
        assert!(out["checks"][1]["results"][0]["note"]
            .as_str()
            .unwrap()
            .contains("failed to run"));
    }

    #[test]
    fn test_compose_runs_json_relativizes_paths() {
        let out = compose_runs_json(&sample_runs(), Path::new("/repo"));
        assert_eq!(out["checks"][0]["results"][0]["file"], "a.php");
    }
}

//! Configuration discovery and effective settings resolution.
//!
//! checkrun reads `checkrun.toml|yaml|yml` from the repository root (or
//! closest ancestor) and merges it with CLI flags to produce an `Effective`
//! config. Defaults:
//! - `output`: `human`
//! - `verbose`: false
//! - `halt_on_unexpected`: false
//! - `timeout`: none (0 disables)
//! - `standard`: `Drupal`, `encoding`: `UTF8` (style checker)
//!
//! Overrides precedence: CLI > config file > defaults. Per-check sections
//! under `[checks.<name>]` may repoint the fileset and adjust fail-fast,
//! timeout, standard, and encoding; `[filesets.<name>]` replaces include or
//! exclude patterns of a built-in fileset or defines a new one.

use crate::fileset::{self, Fileset};
use crate::models::descriptor::CheckDescriptor;
use crate::runner::RunOptions;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Default, Deserialize, Clone)]
/// Per-check configuration section under `[checks.<name>]`.
pub struct CheckCfg {
    pub fileset: Option<String>,
    pub fail_fast: Option<bool>,
    /// Seconds; 0 disables the timeout for this check.
    pub timeout: Option<u64>,
    pub standard: Option<String>,
    pub encoding: Option<String>,
}

#[derive(Debug, Default, Deserialize, Clone)]
/// Fileset pattern override under `[filesets.<name>]`.
pub struct FilesetCfg {
    #[serde(default)]
    pub include: Vec<String>,
    #[serde(default)]
    pub exclude: Vec<String>,
}

#[derive(Debug, Default, Deserialize, Clone)]
/// Root configuration loaded from `checkrun.toml|yaml`.
pub struct CheckrunConfig {
    pub output: Option<String>,
    pub verbose: Option<bool>,
    pub halt_on_unexpected: Option<bool>,
    pub timeout: Option<u64>,
    #[serde(default)]
    pub checks: Option<HashMap<String, CheckCfg>>,
    #[serde(default)]
    pub filesets: Option<HashMap<String, FilesetCfg>>,
}

#[derive(Debug, Clone)]
/// Fully-resolved configuration used by commands after applying precedence.
pub struct Effective {
    pub repo_root: PathBuf,
    pub output: String,
    pub verbose: bool,
    /// Treat `unexpected-output` like `error` for the exit code.
    pub halt_on_unexpected: bool,
    /// CLI-level timeout override applying to every selected check.
    pub timeout: Option<u64>,
    /// Config-file default timeout; per-check `[checks.<name>].timeout` is
    /// more specific and wins over this.
    pub global_timeout: Option<u64>,
    pub standard: Option<String>,
    pub encoding: Option<String>,
    /// CLI-level fileset override applying to every selected check.
    pub fileset: Option<String>,
    pub fail_fast: Option<bool>,
    pub checks: HashMap<String, CheckCfg>,
    pub filesets: HashMap<String, FilesetCfg>,
}

/// Walk upward from `start` to detect the repository root.
///
/// Stops when a `checkrun.toml|yaml|yml` or a `.git` directory is found.
pub fn detect_repo_root(start: &Path) -> PathBuf {
    let mut cur = start;
    loop {
        if cur.join("checkrun.toml").exists()
            || cur.join("checkrun.yaml").exists()
            || cur.join("checkrun.yml").exists()
        {
            return cur.to_path_buf();
        }
        if cur.join(".git").exists() {
            return cur.to_path_buf();
        }
        match cur.parent() {
            Some(p) => cur = p,
            None => return start.to_path_buf(),
        }
    }
}

/// A CLI-provided repository root must name an existing directory; a bogus
/// path is a usage fault, not an empty run.
pub fn check_start_root(cli_repo_root: Option<&str>) -> Result<(), String> {
    match cli_repo_root {
        Some(root) if !Path::new(root).is_dir() => {
            Err(format!("Repository root not found: {}", root))
        }
        _ => Ok(()),
    }
}

/// Load `CheckrunConfig` from `checkrun.toml` or `checkrun.yaml|yml`.
///
/// `Ok(None)` means no config file exists. A file that exists but cannot be
/// read or parsed is a config fault and is reported as `Err` with the
/// parser's message, never silently replaced by defaults.
pub fn load_config(root: &Path) -> Result<Option<CheckrunConfig>, String> {
    let toml_path = root.join("checkrun.toml");
    if toml_path.exists() {
        let s = fs::read_to_string(&toml_path)
            .map_err(|e| format!("{}: {}", toml_path.display(), e))?;
        let cfg: CheckrunConfig =
            toml::from_str(&s).map_err(|e| format!("{}: {}", toml_path.display(), e))?;
        return Ok(Some(cfg));
    }
    for yml in ["checkrun.yaml", "checkrun.yml"] {
        let p = root.join(yml);
        if p.exists() {
            let s = fs::read_to_string(&p).map_err(|e| format!("{}: {}", p.display(), e))?;
            let cfg: CheckrunConfig =
                serde_yaml::from_str(&s).map_err(|e| format!("{}: {}", p.display(), e))?;
            return Ok(Some(cfg));
        }
    }
    Ok(None)
}

/// Resolve `Effective` by merging CLI flags, discovered config, and defaults.
pub fn resolve_effective(
    cli_repo_root: Option<&str>,
    cli_output: Option<&str>,
    cli_verbose: Option<bool>,
    cli_timeout: Option<u64>,
    cli_standard: Option<&str>,
    cli_encoding: Option<&str>,
    cli_fileset: Option<&str>,
    cli_fail_fast: Option<bool>,
    cli_halt_on_unexpected: Option<bool>,
) -> Result<Effective, String> {
    let start = PathBuf::from(cli_repo_root.unwrap_or("."));
    let repo_root = detect_repo_root(&start);
    let cfg = load_config(&repo_root)?.unwrap_or_default();

    let output = cli_output
        .map(|s| s.to_string())
        .or(cfg.output)
        .unwrap_or_else(|| "human".to_string());
    let verbose = cli_verbose.or(cfg.verbose).unwrap_or(false);
    let halt_on_unexpected = cli_halt_on_unexpected
        .or(cfg.halt_on_unexpected)
        .unwrap_or(false);

    Ok(Effective {
        repo_root,
        output,
        verbose,
        halt_on_unexpected,
        timeout: cli_timeout,
        global_timeout: cfg.timeout,
        standard: cli_standard.map(|s| s.to_string()),
        encoding: cli_encoding.map(|s| s.to_string()),
        fileset: cli_fileset.map(|s| s.to_string()),
        fail_fast: cli_fail_fast,
        checks: cfg.checks.unwrap_or_default(),
        filesets: cfg.filesets.unwrap_or_default(),
    })
}

impl Effective {
    /// Per-check run options after applying CLI > `[checks.<name>]` >
    /// descriptor defaults.
    pub fn run_options(&self, desc: &CheckDescriptor) -> RunOptions {
        let check = self.checks.get(desc.name);
        let fail_fast = self
            .fail_fast
            .or_else(|| check.and_then(|c| c.fail_fast))
            .unwrap_or(desc.fail_fast);
        // CLI beats per-check config, which beats the config-wide default.
        let timeout_secs = self
            .timeout
            .or_else(|| check.and_then(|c| c.timeout))
            .or(self.global_timeout)
            .unwrap_or(0);
        let standard = self
            .standard
            .clone()
            .or_else(|| check.and_then(|c| c.standard.clone()))
            .unwrap_or_else(|| "Drupal".to_string());
        let encoding = self
            .encoding
            .clone()
            .or_else(|| check.and_then(|c| c.encoding.clone()))
            .unwrap_or_else(|| "UTF8".to_string());
        RunOptions {
            verbose: self.verbose,
            fail_fast,
            timeout: if timeout_secs == 0 {
                None
            } else {
                Some(Duration::from_secs(timeout_secs))
            },
            standard,
            encoding,
        }
    }

    /// Fileset name a check runs over: CLI override > config > descriptor.
    pub fn fileset_for(&self, desc: &CheckDescriptor) -> String {
        self.fileset
            .clone()
            .or_else(|| {
                self.checks
                    .get(desc.name)
                    .and_then(|c| c.fileset.clone())
            })
            .unwrap_or_else(|| desc.fileset.to_string())
    }

    /// Built-in filesets with `[filesets.<name>]` overrides applied; config
    /// names with no built-in counterpart become new filesets.
    pub fn filesets(&self) -> Vec<Fileset> {
        let mut sets = fileset::builtin_filesets();
        for (name, ov) in &self.filesets {
            if let Some(existing) = sets.iter_mut().find(|f| &f.name == name) {
                if !ov.include.is_empty() {
                    existing.include = ov.include.clone();
                }
                if !ov.exclude.is_empty() {
                    existing.exclude = ov.exclude.clone();
                }
            } else {
                sets.push(Fileset {
                    name: name.clone(),
                    include: ov.include.clone(),
                    exclude: ov.exclude.clone(),
                });
            }
        }
        sets
    }
}

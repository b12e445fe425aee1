//! checkrun CLI binary entry point.
//! Delegates to modules for fileset resolution and check runs, prints results.

mod checks;
mod cli;
mod config;
mod exec;
mod fileset;
mod models;
mod output;
mod runner;
mod utils;

use crate::models::descriptor::CheckDescriptor;
use crate::models::{Classification, RunSummary};
use clap::Parser;
use cli::{Cli, Commands};
use rayon::prelude::*;
use std::path::PathBuf;

fn main() {
    let cli = Cli::parse();
    match cli.cmd {
        Commands::Version => {
            println!("{}", env!("CARGO_PKG_VERSION"));
        }
        Commands::List { repo_root } => {
            if let Err(e) = config::check_start_root(repo_root.as_deref()) {
                eprintln!("{} {}", utils::error_prefix(), e);
                std::process::exit(2);
            }
            let eff = match config::resolve_effective(
                repo_root.as_deref(),
                None,
                None,
                None,
                None,
                None,
                None,
                None,
                None,
            ) {
                Ok(eff) => eff,
                Err(e) => {
                    eprintln!("{} {}", utils::error_prefix(), e);
                    std::process::exit(2);
                }
            };
            println!("checks:");
            for c in checks::builtin_checks() {
                println!("  {:<10} tool={:<7} fileset={}", c.name, c.program, c.fileset);
            }
            println!("filesets:");
            for f in eff.filesets() {
                println!("  {:<11} include={:?} exclude={:?}", f.name, f.include, f.exclude);
            }
        }
        Commands::Run {
            checks: names,
            all,
            repo_root,
            fileset,
            output,
            verbose,
            timeout,
            standard,
            encoding,
            fail_fast,
            no_fail_fast,
            halt_on_unexpected,
        } => {
            let cli_fail_fast = if fail_fast {
                Some(true)
            } else if no_fail_fast {
                Some(false)
            } else {
                None
            };
            if let Err(e) = config::check_start_root(repo_root.as_deref()) {
                eprintln!("{} {}", utils::error_prefix(), e);
                std::process::exit(2);
            }
            let eff = match config::resolve_effective(
                repo_root.as_deref(),
                output.as_deref(),
                if verbose { Some(true) } else { None },
                timeout,
                standard.as_deref(),
                encoding.as_deref(),
                fileset.as_deref(),
                cli_fail_fast,
                if halt_on_unexpected { Some(true) } else { None },
            ) {
                Ok(eff) => eff,
                Err(e) => {
                    eprintln!("{} {}", utils::error_prefix(), e);
                    std::process::exit(2);
                }
            };
            if let Ok(None) = config::load_config(&eff.repo_root) {
                eprintln!(
                    "{} {}",
                    utils::note_prefix(),
                    "No checkrun.toml found; using defaults."
                );
            }

            let selected: Vec<CheckDescriptor> = if all {
                checks::builtin_checks()
            } else {
                if names.is_empty() {
                    eprintln!(
                        "{} {}",
                        utils::error_prefix(),
                        "No checks named. Pass check names or --all."
                    );
                    std::process::exit(2);
                }
                let mut out = Vec::new();
                for name in &names {
                    match checks::find_check(name) {
                        Some(c) => out.push(c),
                        None => {
                            eprintln!(
                                "{} {}",
                                utils::error_prefix(),
                                format!("Unknown check '{}'. See `checkrun list`.", name)
                            );
                            std::process::exit(2);
                        }
                    }
                }
                out
            };

            // Warn once per missing tool instead of once per file.
            for desc in &selected {
                if !exec::tool_available(desc.program) {
                    eprintln!(
                        "{} {}",
                        utils::note_prefix(),
                        format!(
                            "{} not found on PATH; {} results will be classified unexpected-output",
                            desc.program, desc.name
                        )
                    );
                }
            }

            let filesets = eff.filesets();
            let mut jobs: Vec<(CheckDescriptor, Vec<PathBuf>, runner::RunOptions)> = Vec::new();
            for desc in selected {
                let set_name = eff.fileset_for(&desc);
                let set = match fileset::find_fileset(&filesets, &set_name) {
                    Some(s) => s,
                    None => {
                        eprintln!(
                            "{} {}",
                            utils::error_prefix(),
                            format!(
                                "Unknown fileset '{}' for check '{}'.",
                                set_name, desc.name
                            )
                        );
                        std::process::exit(2);
                    }
                };
                let files = match fileset::resolve(&eff.repo_root, set) {
                    Ok(f) => f,
                    Err(e) => {
                        eprintln!(
                            "{} {}",
                            utils::error_prefix(),
                            format!("Bad glob pattern in fileset '{}': {}", set_name, e)
                        );
                        std::process::exit(2);
                    }
                };
                let opts = eff.run_options(&desc);
                jobs.push((desc, files, opts));
            }

            // Checks share no state, so they may run concurrently; files within
            // one check stay strictly sequential for fail-fast ordering.
            let runs: Vec<RunSummary> = jobs
                .par_iter()
                .map(|(desc, files, opts)| runner::run(desc, files, opts))
                .collect();

            output::print_runs(&runs, &eff.repo_root, &eff.output);

            let failed = runs.iter().any(|r| r.overall == Classification::Error)
                || (eff.halt_on_unexpected
                    && runs
                        .iter()
                        .any(|r| r.overall == Classification::Unexpected));
            if failed {
                std::process::exit(1);
            }
        }
    }
}

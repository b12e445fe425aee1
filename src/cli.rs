//! CLI argument parsing via `clap`.

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "checkrun",
    version,
    about = "Run external code-quality tools over filesets",
    long_about = "checkrun — run external analysis tools (syntax linters, mess/copy-paste detectors, style checkers, debug-statement greppers) over glob-defined filesets and classify their output.\n\nConfiguration precedence: CLI > checkrun.toml > defaults.",
    after_help = "Examples:\n  checkrun run php-lint php-debug\n  checkrun run --all --output json\n  checkrun run php-cs --standard Drupal --encoding UTF8\n  checkrun run js-lint --no-fail-fast --timeout 60",
    arg_required_else_help = true
)]
/// Top-level CLI options and subcommands.
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand)]
/// Supported subcommands.
pub enum Commands {
    /// Show version
    #[command(about = "Show version", long_about = "Print the current checkrun version.")]
    Version,
    /// Run checks by name
    #[command(
        about = "Run checks",
        long_about = "Run the named checks (or all of them) over their filesets. Exits 1 when any check classifies a file as error, 2 on usage/config faults.",
        after_help = "Examples:\n  checkrun run php-lint\n  checkrun run --all --output json\n  checkrun run php-debug --fileset php"
    )]
    Run {
        #[arg(help = "Check names (php-lint, php-debug, js-lint, js-debug, php-md, php-cpd, php-cs)")]
        checks: Vec<String>,
        #[arg(long, action = clap::ArgAction::SetTrue, help = "Run every built-in check")]
        all: bool,
        #[arg(long, help = "Repository root (default: current dir)")]
        repo_root: Option<String>,
        #[arg(long, help = "Fileset override applied to every selected check")]
        fileset: Option<String>,
        #[arg(long, help = "Output mode: human|json (default: human)")]
        output: Option<String>,
        #[arg(long, action = clap::ArgAction::SetTrue, help = "Print a notice for every file processed")]
        verbose: bool,
        #[arg(long, help = "Per-invocation timeout in seconds (0 disables)")]
        timeout: Option<u64>,
        #[arg(long, help = "Coding standard for the style checker (default: Drupal)")]
        standard: Option<String>,
        #[arg(long, help = "File encoding for the style checker (default: UTF8)")]
        encoding: Option<String>,
        #[arg(long, action = clap::ArgAction::SetTrue, conflicts_with = "no_fail_fast", help = "Stop each check at its first error-classified file")]
        fail_fast: bool,
        #[arg(long, action = clap::ArgAction::SetTrue, help = "Never stop early, even for checks that fail fast by default")]
        no_fail_fast: bool,
        #[arg(long, action = clap::ArgAction::SetTrue, help = "Exit non-zero on unexpected-output classifications too")]
        halt_on_unexpected: bool,
    },
    /// List known checks and filesets
    #[command(
        about = "List checks and filesets",
        long_about = "Show built-in checks with their tools and default filesets, and the fileset patterns after config overrides."
    )]
    List {
        #[arg(long, help = "Repository root (default: current dir)")]
        repo_root: Option<String>,
    },
}

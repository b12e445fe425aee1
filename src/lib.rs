//! checkrun core library.
//!
//! This crate exposes programmatic APIs for running external code-quality
//! tools over glob-defined filesets and classifying their textual output into
//! ok/warning/error/unexpected-output per file.
//!
//! High-level modules:
//! - `cli`: CLI argument parsing (binary uses this).
//! - `config`: Discovery and effective configuration resolution.
//! - `checks`: Built-in check descriptors for the wrapped tools.
//! - `fileset`: Named glob include/exclude groups resolved to file lists.
//! - `exec`: Argv-style subprocess invocation with optional timeout.
//! - `runner`: Per-file tool invocation and output classification.
//! - `models`: Data models for descriptors, results, and summaries.
//! - `output`: Human/JSON printers for run summaries.
//! - `utils`: Supporting helpers.
pub mod checks;
pub mod cli;
pub mod config;
pub mod exec;
pub mod fileset;
pub mod models;
pub mod output;
pub mod runner;
pub mod utils;

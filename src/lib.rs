//! Atomaudit - migration auditor for hybrid Recoil/Jotai codebases.
//!
//! Atomaudit scans a typed React codebase that uses both Recoil (legacy)
//! and Jotai (target) during an incremental migration. It indexes every
//! state symbol, extracts every usage event (reads, runtime writes,
//! initialization writes) and every state→state dependency edge, then
//! evaluates migration-safety rules and answers reverse-impact queries.
//!
//! ## Module Structure
//!
//! - `cli`: command-line interface layer
//! - `config`: configuration file loading and parsing
//! - `core`: the analysis engine (index, bindings, extractors, pipeline)
//! - `issues`: issue type definitions
//! - `rules`: migration-safety rules over the analysis output
//! - `utils`: shared utility functions

pub mod cli;
pub mod config;
pub mod core;
pub mod issues;
pub mod rules;
pub mod utils;

//! Migration-safety rules.
//!
//! Each rule is a pure reduction over the analysis output: count events or
//! walk edges, compare, report. Rules run unchanged against whichever event
//! set the capability profile produced.
//!
//! ## Module Structure
//!
//! - `helpers`: per-state usage counters
//! - `cross_store`: dependencies that couple the two stores (both directions)
//! - `write_only`: states that are written but never read
//! - `read_only`: plain Recoil atoms with reads and no runtime writes

pub mod cross_store;
pub mod helpers;
pub mod read_only;
pub mod write_only;

use clap::ValueEnum;

use crate::core::pipeline::ProjectAnalysis;
use crate::issues::Issue;

pub use helpers::{UsageCounts, count_usage};

/// Rule selection on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum AuditRule {
    LegacyReadsTarget,
    TargetReadsLegacy,
    WriteOnlyState,
    ReadOnlyAtom,
}

impl AuditRule {
    pub fn all() -> Vec<AuditRule> {
        vec![
            AuditRule::LegacyReadsTarget,
            AuditRule::TargetReadsLegacy,
            AuditRule::WriteOnlyState,
            AuditRule::ReadOnlyAtom,
        ]
    }
}

/// Evaluate the selected rules (all of them when `rules` is empty).
pub fn run_rules(analysis: &ProjectAnalysis, rules: &[AuditRule]) -> Vec<Issue> {
    let selected = if rules.is_empty() {
        AuditRule::all()
    } else {
        rules.to_vec()
    };
    let mut issues = Vec::new();
    for rule in selected {
        match rule {
            AuditRule::LegacyReadsTarget => {
                issues.extend(cross_store::find_legacy_reads_target(analysis));
            }
            AuditRule::TargetReadsLegacy => {
                issues.extend(cross_store::find_target_reads_legacy(analysis));
            }
            AuditRule::WriteOnlyState => {
                issues.extend(write_only::find_write_only_states(analysis));
            }
            AuditRule::ReadOnlyAtom => {
                issues.extend(read_only::find_read_only_atoms(analysis));
            }
        }
    }
    issues
}

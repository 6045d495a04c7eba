//! Read-only plain atom detection.
//!
//! A plain Recoil atom (no selector default) with runtime reads and zero
//! runtime writes can move to Jotai immediately; initialization writes do
//! not count against it.

use crate::core::pipeline::ProjectAnalysis;
use crate::issues::{Issue, ReadOnlyAtomIssue};
use crate::rules::count_usage;

pub fn find_read_only_atoms(analysis: &ProjectAnalysis) -> Vec<Issue> {
    let counts = count_usage(&analysis.output.usage_events);
    let mut issues = Vec::new();
    for state in &analysis.states {
        if !state.plain_recoil_atom {
            continue;
        }
        let Some(usage) = counts.get(&state.id) else {
            continue;
        };
        if usage.runtime_reads > 0 && usage.runtime_writes == 0 {
            issues.push(Issue::ReadOnlyAtom(ReadOnlyAtomIssue {
                location: state.location.clone(),
                state_id: state.id.clone(),
                name: state.name.clone(),
                runtime_reads: usage.runtime_reads,
            }));
        }
    }
    issues
}

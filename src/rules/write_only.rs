//! Write-only state detection: runtime writes with no reads of any phase.

use crate::core::pipeline::ProjectAnalysis;
use crate::issues::{Issue, WriteOnlyStateIssue};
use crate::rules::count_usage;

pub fn find_write_only_states(analysis: &ProjectAnalysis) -> Vec<Issue> {
    let counts = count_usage(&analysis.output.usage_events);
    let mut issues = Vec::new();
    for state in &analysis.states {
        let Some(usage) = counts.get(&state.id) else {
            continue;
        };
        if usage.runtime_writes > 0 && usage.total_reads() == 0 {
            issues.push(Issue::WriteOnlyState(WriteOnlyStateIssue {
                location: state.location.clone(),
                state_id: state.id.clone(),
                name: state.name.clone(),
                runtime_writes: usage.runtime_writes,
            }));
        }
    }
    issues
}

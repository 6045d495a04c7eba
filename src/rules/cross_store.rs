//! Cross-store dependency rules - both coupling directions.

use crate::core::data::Store;
use crate::core::pipeline::ProjectAnalysis;
use crate::issues::{Issue, LegacyReadsTargetIssue, TargetReadsLegacyIssue};

/// A Recoil state depending on a Jotai state: every such edge is a finding.
pub fn find_legacy_reads_target(analysis: &ProjectAnalysis) -> Vec<Issue> {
    let mut issues = Vec::new();
    for edge in &analysis.output.dependency_edges {
        let (Some(from), Some(to)) = (
            analysis.state(&edge.from_state_id),
            analysis.state(&edge.to_state_id),
        ) else {
            continue;
        };
        if from.store == Store::Recoil && to.store == Store::Jotai {
            issues.push(Issue::LegacyReadsTarget(LegacyReadsTargetIssue {
                location: edge.location.clone(),
                from_id: from.id.clone(),
                from_name: from.name.clone(),
                from_kind: from.kind,
                to_id: to.id.clone(),
                to_name: to.name.clone(),
                via: edge.via.clone(),
            }));
        }
    }
    issues
}

/// A Jotai derived state depending on a Recoil state.
pub fn find_target_reads_legacy(analysis: &ProjectAnalysis) -> Vec<Issue> {
    let mut issues = Vec::new();
    for edge in &analysis.output.dependency_edges {
        let (Some(from), Some(to)) = (
            analysis.state(&edge.from_state_id),
            analysis.state(&edge.to_state_id),
        ) else {
            continue;
        };
        if from.store == Store::Jotai && to.store == Store::Recoil {
            issues.push(Issue::TargetReadsLegacy(TargetReadsLegacyIssue {
                location: edge.location.clone(),
                from_id: from.id.clone(),
                from_name: from.name.clone(),
                from_kind: from.kind,
                to_id: to.id.clone(),
                to_name: to.name.clone(),
                via: edge.via.clone(),
            }));
        }
    }
    issues
}

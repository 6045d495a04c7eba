//! Reverse-impact queries: "if I touch state X, who is affected?"
//!
//! BFS over reverse dependency edges from the root state, plus the
//! runtime-phase events that touch the root or any affected state (the UI
//! surfaces that would feel the change).

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use serde::Serialize;

use crate::core::data::{Phase, UsageEvent};
use crate::core::pipeline::ProjectAnalysis;

/// A state reached by walking dependency edges backwards from the root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImpactEntry {
    pub state_id: String,
    /// Dependency hops from the root (direct dependents are 1).
    pub distance: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImpactReport {
    pub root: String,
    /// Affected states ordered by (distance, id).
    pub affected: Vec<ImpactEntry>,
    /// Runtime events against the root or any affected state, in canonical
    /// event order.
    pub usages: Vec<UsageEvent>,
}

pub fn impact(analysis: &ProjectAnalysis, root: &str) -> ImpactReport {
    // Reverse adjacency: to → set of froms.
    let mut dependents: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();
    for edge in &analysis.output.dependency_edges {
        dependents
            .entry(edge.to_state_id.as_str())
            .or_default()
            .insert(edge.from_state_id.as_str());
    }

    let mut distances: BTreeMap<&str, usize> = BTreeMap::new();
    let mut queue: VecDeque<(&str, usize)> = VecDeque::new();
    queue.push_back((root, 0));
    while let Some((state, distance)) = queue.pop_front() {
        if let Some(readers) = dependents.get(state) {
            for reader in readers {
                if *reader != root && !distances.contains_key(reader) {
                    distances.insert(reader, distance + 1);
                    queue.push_back((reader, distance + 1));
                }
            }
        }
    }

    let mut affected: Vec<ImpactEntry> = distances
        .into_iter()
        .map(|(state_id, distance)| ImpactEntry {
            state_id: state_id.to_string(),
            distance,
        })
        .collect();
    affected.sort_by(|a, b| (a.distance, &a.state_id).cmp(&(b.distance, &b.state_id)));

    let touched: BTreeSet<&str> = std::iter::once(root)
        .chain(affected.iter().map(|e| e.state_id.as_str()))
        .collect();
    let usages: Vec<UsageEvent> = analysis
        .output
        .usage_events
        .iter()
        .filter(|event| event.phase == Phase::Runtime && touched.contains(event.state_id.as_str()))
        .cloned()
        .collect();

    ImpactReport {
        root: root.to_string(),
        affected,
        usages,
    }
}

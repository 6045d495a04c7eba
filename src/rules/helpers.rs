//! Per-state usage counters shared by the rules.

use std::collections::BTreeMap;

use crate::core::data::{EventType, Phase, UsageEvent};

/// How often a state was touched, split the way the rules need it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UsageCounts {
    pub runtime_reads: usize,
    pub dependency_reads: usize,
    pub runtime_writes: usize,
    pub init_writes: usize,
}

impl UsageCounts {
    pub fn total_reads(&self) -> usize {
        self.runtime_reads + self.dependency_reads
    }
}

/// Aggregate events into per-state counters.
pub fn count_usage(events: &[UsageEvent]) -> BTreeMap<String, UsageCounts> {
    let mut counts: BTreeMap<String, UsageCounts> = BTreeMap::new();
    for event in events {
        let entry = counts.entry(event.state_id.clone()).or_default();
        match (event.event_type, event.phase) {
            (EventType::Read, Phase::Runtime) => entry.runtime_reads += 1,
            (EventType::Read, Phase::Dependency) => entry.dependency_reads += 1,
            (EventType::RuntimeWrite, _) => entry.runtime_writes += 1,
            (EventType::InitWrite, _) => entry.init_writes += 1,
        }
    }
    counts
}

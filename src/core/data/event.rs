//! Usage events and dependency edges — the analyzer's output vocabulary.
//!
//! Every observation the extractors make is either a [`UsageEvent`] (someone
//! read or wrote a state) or a [`DependencyEdge`] (a selector/derived state
//! reads another state during its compute step). Both are immutable records;
//! the pipeline deduplicates and sorts them before returning.

use serde::Serialize;

use crate::core::data::SourceLocation;

/// What happened at the usage site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum EventType {
    Read,
    RuntimeWrite,
    InitWrite,
}

impl std::fmt::Display for EventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventType::Read => write!(f, "read"),
            EventType::RuntimeWrite => write!(f, "runtimeWrite"),
            EventType::InitWrite => write!(f, "initWrite"),
        }
    }
}

/// Whether the event happened on a runtime surface (hooks, callbacks, store
/// handles) or inside a state's own compute function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Phase {
    Runtime,
    Dependency,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Phase::Runtime => write!(f, "runtime"),
            Phase::Dependency => write!(f, "dependency"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ActorKind {
    State,
    Function,
    Unknown,
}

/// Who performed the usage: a state (dependency reads), a named function or
/// component, or unknown (module-level code, anonymous closures).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Actor {
    pub kind: ActorKind,
    pub name: String,
    /// Present only for dependency reads: the id of the reading state.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state_id: Option<String>,
}

impl Actor {
    pub fn function(name: impl Into<String>) -> Self {
        Self {
            kind: ActorKind::Function,
            name: name.into(),
            state_id: None,
        }
    }

    pub fn state(name: impl Into<String>, state_id: impl Into<String>) -> Self {
        Self {
            kind: ActorKind::State,
            name: name.into(),
            state_id: Some(state_id.into()),
        }
    }

    pub fn unknown() -> Self {
        Self {
            kind: ActorKind::Unknown,
            name: String::new(),
            state_id: None,
        }
    }
}

/// A single read or write observed against a state symbol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageEvent {
    pub event_type: EventType,
    pub phase: Phase,
    pub state_id: String,
    pub actor: Actor,
    pub location: SourceLocation,
    /// Short tag identifying the detection shape (e.g., `recoil:useRecoilValue`,
    /// `setter-call`, `jotai:store.get`, `init:set`).
    pub via: String,
}

impl UsageEvent {
    /// The tuple that makes two events "the same observation".
    /// Used for deduplication after all extractors have run.
    pub fn identity(
        &self,
    ) -> (
        EventType,
        Phase,
        &str,
        ActorKind,
        &str,
        &str,
        usize,
        usize,
        &str,
    ) {
        (
            self.event_type,
            self.phase,
            &self.state_id,
            self.actor.kind,
            &self.actor.name,
            &self.location.file_path,
            self.location.line,
            self.location.col,
            &self.via,
        )
    }

    /// Canonical output order: location first, then type, then state.
    /// The remaining components only break ties so the order is total.
    pub fn sort_key(
        &self,
    ) -> (
        &str,
        usize,
        usize,
        EventType,
        &str,
        Phase,
        &str,
        ActorKind,
        &str,
    ) {
        (
            &self.location.file_path,
            self.location.line,
            self.location.col,
            self.event_type,
            &self.state_id,
            self.phase,
            &self.via,
            self.actor.kind,
            &self.actor.name,
        )
    }
}

/// A directed `from → to` relation: the selector/derived `from` reads `to`
/// during its compute step. Always produced together with a dependency-phase
/// read event at the same location with the same via.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DependencyEdge {
    pub from_state_id: String,
    pub to_state_id: String,
    pub location: SourceLocation,
    pub via: String,
}

impl DependencyEdge {
    pub fn identity(&self) -> (&str, &str, &str, usize, usize, &str) {
        (
            &self.from_state_id,
            &self.to_state_id,
            &self.location.file_path,
            self.location.line,
            self.location.col,
            &self.via,
        )
    }

    pub fn sort_key(&self) -> (&str, usize, usize, &str, &str, &str) {
        (
            &self.location.file_path,
            self.location.line,
            self.location.col,
            &self.from_state_id,
            &self.to_state_id,
            &self.via,
        )
    }
}

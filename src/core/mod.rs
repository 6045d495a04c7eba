//! Core analysis engine.
//!
//! Data flow: symbol index → (setter bindings → one-hop forwarding) ∥
//! (store handle detection) → event extractors & dependency extractor →
//! deduplicated, ordered `{usage events, dependency edges}`.
//!
//! ## Module Structure
//!
//! - `parsers`: swc parsing and the in-memory project model
//! - `facade`: syntactic and symbol queries over the ASTs
//! - `data`: state symbols, usage events, dependency edges
//! - `stores`: Recoil/Jotai library identities
//! - `index`: the state symbol index
//! - `bindings`: setter bindings, forwarding, store handles
//! - `extract`: the usage-event and dependency extractors
//! - `pipeline`: composition, dedup, canonical ordering
//! - `impact`: reverse-impact queries over the output
//! - `context`, `file_scanner`: the disk-facing loader used by the CLI

pub mod bindings;
pub mod context;
pub mod data;
pub mod extract;
pub mod facade;
pub mod file_scanner;
pub mod impact;
pub mod index;
pub mod parsers;
pub mod pipeline;
pub mod stores;

pub use context::AuditContext;
pub use data::{
    Actor, ActorKind, DependencyEdge, EventType, Phase, SourceLocation, StateKind, StateSymbol,
    Store, UsageEvent,
};
pub use impact::{ImpactEntry, ImpactReport, impact};
pub use parsers::Project;
pub use pipeline::{AnalysisOutput, CapabilityProfile, ProjectAnalysis, analyze};

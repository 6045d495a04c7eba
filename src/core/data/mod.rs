//! Core data types shared by all pipeline phases.
//!
//! ## Module Structure
//!
//! - `source`: Source code location types (SourceLocation)
//! - `state`: State symbol types (StateSymbol, Store, StateKind)
//! - `event`: Usage events and dependency edges

pub mod event;
pub mod source;
pub mod state;

pub use event::{Actor, ActorKind, DependencyEdge, EventType, Phase, UsageEvent};
pub use source::SourceLocation;
pub use state::{StateKind, StateSymbol, Store, state_id};

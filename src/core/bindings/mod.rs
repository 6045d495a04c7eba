//! Binding resolution - which local identifiers mutate which state.
//!
//! ## Module Structure
//!
//! - `setters`: direct and wrapper-aware setter binding resolution
//! - `forward`: one-hop forwarding through call arguments and JSX props
//! - `handles`: Jotai imperative store handle detection
//!
//! All maps produced here are scratch data for a single pipeline run.

pub mod forward;
pub mod handles;
pub mod setters;

pub use forward::forward_bindings;
pub use handles::HandleSet;
pub use setters::{SetterBinding, SetterBindings, SetterFlavor, resolve_setter_bindings};

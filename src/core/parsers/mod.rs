//! Source parsing and the in-memory project model.

pub mod source;

pub use source::{ParsedSource, Project, parse_source};

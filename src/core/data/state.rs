//! State symbol types.
//!
//! A state symbol is a declared piece of reactive state recognized by its
//! originating factory call: a Recoil atom/selector/family or a Jotai
//! atom/derived atom/family. Symbols are collected once per analysis by the
//! symbol index and never mutated afterwards.

use serde::Serialize;

use crate::core::data::SourceLocation;

/// Which state library a symbol belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Store {
    Recoil,
    Jotai,
}

impl std::fmt::Display for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Store::Recoil => write!(f, "recoil"),
            Store::Jotai => write!(f, "jotai"),
        }
    }
}

/// The factory shape a state symbol was created with.
///
/// `DerivedAtom` is a Jotai `atom(fn)` whose first argument is function-like;
/// a Jotai `atom(value)` with a plain first argument is `Atom`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum StateKind {
    Atom,
    Selector,
    AtomFamily,
    SelectorFamily,
    DerivedAtom,
    AtomWithDefault,
}

impl std::fmt::Display for StateKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StateKind::Atom => write!(f, "atom"),
            StateKind::Selector => write!(f, "selector"),
            StateKind::AtomFamily => write!(f, "atomFamily"),
            StateKind::SelectorFamily => write!(f, "selectorFamily"),
            StateKind::DerivedAtom => write!(f, "derivedAtom"),
            StateKind::AtomWithDefault => write!(f, "atomWithDefault"),
        }
    }
}

/// Build the stable id of a state: `<file>::<name>`.
pub fn state_id(file_path: &str, name: &str) -> String {
    format!("{}::{}", file_path, name)
}

/// A declared atom, selector, family, or derived atom.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StateSymbol {
    /// Stable id: `<file>::<name>`.
    pub id: String,
    /// Variable name the state is bound to (e.g., "counterState").
    pub name: String,
    pub store: Store,
    pub kind: StateKind,
    /// Location of the declaring identifier.
    pub location: SourceLocation,
    /// Whether the declaring statement is part of the module's public surface.
    pub exported: bool,
    /// A Recoil atom whose `default` is a plain value rather than a selector
    /// (directly or by reference). Only plain atoms are subject to the
    /// read-only-atom rule. Always false for non-Recoil or non-atom symbols.
    pub plain_recoil_atom: bool,
}

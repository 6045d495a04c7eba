//! Issue types for migration-audit results.
//!
//! Each issue is self-contained with everything the reporters need: rule,
//! severity, location, and a human-readable message.

use enum_dispatch::enum_dispatch;

use crate::core::data::{SourceLocation, StateKind};

/// Severity level of an issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// Rule identifier for each issue type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Rule {
    LegacyReadsTarget,
    TargetReadsLegacy,
    WriteOnlyState,
    ReadOnlyAtom,
    ParseError,
}

impl std::fmt::Display for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Rule::LegacyReadsTarget => write!(f, "legacy-reads-target"),
            Rule::TargetReadsLegacy => write!(f, "target-reads-legacy"),
            Rule::WriteOnlyState => write!(f, "write-only-state"),
            Rule::ReadOnlyAtom => write!(f, "read-only-atom"),
            Rule::ParseError => write!(f, "parse-error"),
        }
    }
}

/// Everything a reporter needs from an issue.
#[enum_dispatch]
pub trait Report {
    fn severity(&self) -> Severity;
    fn rule(&self) -> Rule;
    fn location(&self) -> &SourceLocation;
    fn message(&self) -> String;
}

/// A Recoil selector (or atom with selector default) depends on a Jotai
/// state. During an incremental migration this direction couples the legacy
/// store to the target store and breaks teardown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegacyReadsTargetIssue {
    pub location: SourceLocation,
    pub from_id: String,
    pub from_name: String,
    pub from_kind: StateKind,
    pub to_id: String,
    pub to_name: String,
    pub via: String,
}

impl Report for LegacyReadsTargetIssue {
    fn severity(&self) -> Severity {
        Severity::Error
    }

    fn rule(&self) -> Rule {
        Rule::LegacyReadsTarget
    }

    fn location(&self) -> &SourceLocation {
        &self.location
    }

    fn message(&self) -> String {
        format!(
            "Recoil {} '{}' depends on Jotai state '{}' (via {})",
            self.from_kind, self.from_name, self.to_name, self.via
        )
    }
}

/// A Jotai derived state depends on a Recoil state - the reverse coupling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetReadsLegacyIssue {
    pub location: SourceLocation,
    pub from_id: String,
    pub from_name: String,
    pub from_kind: StateKind,
    pub to_id: String,
    pub to_name: String,
    pub via: String,
}

impl Report for TargetReadsLegacyIssue {
    fn severity(&self) -> Severity {
        Severity::Error
    }

    fn rule(&self) -> Rule {
        Rule::TargetReadsLegacy
    }

    fn location(&self) -> &SourceLocation {
        &self.location
    }

    fn message(&self) -> String {
        format!(
            "Jotai {} '{}' depends on Recoil state '{}' (via {})",
            self.from_kind, self.from_name, self.to_name, self.via
        )
    }
}

/// A state with runtime writes but no reads anywhere - dead weight that
/// should not be migrated as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteOnlyStateIssue {
    pub location: SourceLocation,
    pub state_id: String,
    pub name: String,
    pub runtime_writes: usize,
}

impl Report for WriteOnlyStateIssue {
    fn severity(&self) -> Severity {
        Severity::Warning
    }

    fn rule(&self) -> Rule {
        Rule::WriteOnlyState
    }

    fn location(&self) -> &SourceLocation {
        &self.location
    }

    fn message(&self) -> String {
        format!(
            "state '{}' is written at runtime ({} write{}) but never read",
            self.name,
            self.runtime_writes,
            crate::utils::plural(self.runtime_writes)
        )
    }
}

/// A plain Recoil atom that is read at runtime but never written
/// (initialization writes ignored) - a safe, overdue migration candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadOnlyAtomIssue {
    pub location: SourceLocation,
    pub state_id: String,
    pub name: String,
    pub runtime_reads: usize,
}

impl Report for ReadOnlyAtomIssue {
    fn severity(&self) -> Severity {
        Severity::Warning
    }

    fn rule(&self) -> Rule {
        Rule::ReadOnlyAtom
    }

    fn location(&self) -> &SourceLocation {
        &self.location
    }

    fn message(&self) -> String {
        format!(
            "plain Recoil atom '{}' has {} runtime read{} and no runtime writes; migrate it to Jotai",
            self.name,
            self.runtime_reads,
            crate::utils::plural(self.runtime_reads)
        )
    }
}

/// A source file that could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseErrorIssue {
    pub location: SourceLocation,
    pub error: String,
}

impl Report for ParseErrorIssue {
    fn severity(&self) -> Severity {
        Severity::Error
    }

    fn rule(&self) -> Rule {
        Rule::ParseError
    }

    fn location(&self) -> &SourceLocation {
        &self.location
    }

    fn message(&self) -> String {
        format!("failed to parse source file: {}", self.error)
    }
}

/// All issue kinds the audit can report.
#[enum_dispatch(Report)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Issue {
    LegacyReadsTarget(LegacyReadsTargetIssue),
    TargetReadsLegacy(TargetReadsLegacyIssue),
    WriteOnlyState(WriteOnlyStateIssue),
    ReadOnlyAtom(ReadOnlyAtomIssue),
    ParseError(ParseErrorIssue),
}

//! Report formatting and printing.
//!
//! Issues print in cargo-style format; `--format json` switches every
//! command to machine output built from the same data.

use std::io::{self, Write};

use colored::Colorize;
use serde_json::json;

use crate::core::data::{DependencyEdge, StateSymbol};
use crate::core::impact::ImpactReport;
use crate::issues::{Issue, Report, Severity};
use crate::utils::plural;

pub const SUCCESS_MARK: &str = "\u{2713}"; // ✓
pub const FAILURE_MARK: &str = "\u{2718}"; // ✘

/// Print issues and a summary line to stdout.
pub fn print_issues(issues: &[Issue], source_files: usize, state_count: usize) {
    let _ = print_issues_to(issues, source_files, state_count, &mut io::stdout().lock());
}

pub fn print_issues_to<W: Write>(
    issues: &[Issue],
    source_files: usize,
    state_count: usize,
    writer: &mut W,
) -> io::Result<()> {
    let mut sorted = issues.to_vec();
    sorted.sort_by(|a, b| {
        (a.location(), a.rule())
            .cmp(&(b.location(), b.rule()))
    });

    for issue in &sorted {
        let severity = match issue.severity() {
            Severity::Error => format!("error[{}]", issue.rule()).red().bold(),
            Severity::Warning => format!("warning[{}]", issue.rule()).yellow().bold(),
        };
        writeln!(writer, "{}: {}", severity, issue.message())?;
        writeln!(writer, "  --> {}", issue.location().to_string().dimmed())?;
        writeln!(writer)?;
    }

    let errors = sorted
        .iter()
        .filter(|i| i.severity() == Severity::Error)
        .count();
    let warnings = sorted.len() - errors;

    if sorted.is_empty() {
        writeln!(
            writer,
            "{} {}",
            SUCCESS_MARK.green(),
            format!(
                "Checked {} source file{}, {} state symbol{} - no issues found",
                source_files,
                plural(source_files),
                state_count,
                plural(state_count)
            )
            .green()
        )?;
    } else {
        writeln!(
            writer,
            "{} {}",
            FAILURE_MARK.red(),
            format!(
                "{} error{}, {} warning{} (checked {} source file{}, {} state symbol{})",
                errors,
                plural(errors),
                warnings,
                plural(warnings),
                source_files,
                plural(source_files),
                state_count,
                plural(state_count)
            )
            .red()
        )?;
    }
    Ok(())
}

pub fn issues_json(issues: &[Issue], source_files: usize, state_count: usize) -> serde_json::Value {
    let mut sorted = issues.to_vec();
    sorted.sort_by(|a, b| (a.location(), a.rule()).cmp(&(b.location(), b.rule())));
    let errors = sorted
        .iter()
        .filter(|i| i.severity() == Severity::Error)
        .count();
    json!({
        "issues": sorted.iter().map(|issue| json!({
            "rule": issue.rule().to_string(),
            "severity": issue.severity().to_string(),
            "message": issue.message(),
            "file": issue.location().file_path,
            "line": issue.location().line,
            "col": issue.location().col,
        })).collect::<Vec<_>>(),
        "summary": {
            "errors": errors,
            "warnings": sorted.len() - errors,
            "sourceFiles": source_files,
            "states": state_count,
        }
    })
}

/// Print the dependency graph: one line per state, one per edge.
pub fn print_graph_to<W: Write>(
    states: &[StateSymbol],
    edges: &[DependencyEdge],
    writer: &mut W,
) -> io::Result<()> {
    writeln!(
        writer,
        "{}",
        format!("{} state{}", states.len(), plural(states.len())).bold()
    )?;
    for state in states {
        writeln!(
            writer,
            "  {} ({} {}) at {}",
            state.name.bold(),
            state.store,
            state.kind,
            state.location.to_string().dimmed()
        )?;
    }
    writeln!(
        writer,
        "{}",
        format!("{} edge{}", edges.len(), plural(edges.len())).bold()
    )?;
    for edge in edges {
        writeln!(
            writer,
            "  {} -> {} (via {}) at {}",
            edge.from_state_id,
            edge.to_state_id,
            edge.via,
            edge.location.to_string().dimmed()
        )?;
    }
    Ok(())
}

pub fn graph_json(states: &[StateSymbol], edges: &[DependencyEdge]) -> serde_json::Value {
    json!({
        "states": states,
        "edges": edges,
    })
}

/// Print a reverse-impact report for one state.
pub fn print_impact_to<W: Write>(report: &ImpactReport, writer: &mut W) -> io::Result<()> {
    writeln!(writer, "{}", format!("Impact of {}", report.root).bold())?;
    if report.affected.is_empty() {
        writeln!(writer, "  no dependent states")?;
    } else {
        for entry in &report.affected {
            writeln!(
                writer,
                "  {} hop{}: {}",
                entry.distance,
                plural(entry.distance),
                entry.state_id
            )?;
        }
    }
    writeln!(
        writer,
        "{}",
        format!(
            "{} runtime usage{} touching the affected set",
            report.usages.len(),
            plural(report.usages.len())
        )
        .bold()
    )?;
    for event in &report.usages {
        let actor = if event.actor.name.is_empty() {
            "(module scope)".to_string()
        } else {
            event.actor.name.clone()
        };
        writeln!(
            writer,
            "  {} {} by {} via {} at {}",
            event.event_type,
            event.state_id,
            actor,
            event.via,
            event.location.to_string().dimmed()
        )?;
    }
    Ok(())
}

pub fn impact_json(report: &ImpactReport) -> serde_json::Value {
    json!(report)
}

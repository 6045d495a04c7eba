//! Command dispatcher.

use std::{fs, io, path::Path};

use anyhow::{Result, bail};

use super::args::{Arguments, CheckCommand, Command, GraphCommand, ImpactCommand, OutputFormat};
use super::exit_status::ExitStatus;
use super::report;
use crate::config::{CONFIG_FILE_NAME, default_config_json};
use crate::core::AuditContext;
use crate::core::impact::impact;
use crate::issues::Issue;
use crate::rules::run_rules;

pub fn run(Arguments { command }: Arguments) -> Result<ExitStatus> {
    match command {
        Some(Command::Check(cmd)) => check(cmd),
        Some(Command::Impact(cmd)) => impact_query(cmd),
        Some(Command::Graph(cmd)) => graph(cmd),
        Some(Command::Init) => init(),
        None => {
            bail!("No command provided. Use --help to see available commands.")
        }
    }
}

fn check(cmd: CheckCommand) -> Result<ExitStatus> {
    let ctx = AuditContext::new(&cmd.common)?;
    if ctx.files.is_empty() {
        bail!("No source files found in scope (check sourceRoot/includes)");
    }

    let analysis = ctx.analysis();
    let mut issues = run_rules(analysis, &cmd.rules);
    issues.extend(ctx.parse_errors().iter().cloned().map(Issue::from));

    match cmd.common.format {
        OutputFormat::Text => {
            report::print_issues(&issues, ctx.files.len(), analysis.states.len());
        }
        OutputFormat::Json => {
            let value = report::issues_json(&issues, ctx.files.len(), analysis.states.len());
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
    }

    if issues.is_empty() {
        Ok(ExitStatus::Success)
    } else {
        Ok(ExitStatus::Failure)
    }
}

fn impact_query(cmd: ImpactCommand) -> Result<ExitStatus> {
    let ctx = AuditContext::new(&cmd.common)?;
    if ctx.files.is_empty() {
        bail!("No source files found in scope (check sourceRoot/includes)");
    }
    let analysis = ctx.analysis();

    // Accept a full id or a unique state name.
    let root = if analysis.state(&cmd.state).is_some() {
        cmd.state.clone()
    } else {
        let candidates: Vec<_> = analysis
            .states
            .iter()
            .filter(|state| state.name == cmd.state)
            .collect();
        match candidates.as_slice() {
            [] => bail!("Unknown state '{}'", cmd.state),
            [only] => only.id.clone(),
            many => bail!(
                "State name '{}' is ambiguous; use one of: {}",
                cmd.state,
                many.iter()
                    .map(|state| state.id.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
        }
    };

    let result = impact(analysis, &root);
    match cmd.common.format {
        OutputFormat::Text => {
            report::print_impact_to(&result, &mut io::stdout().lock())?;
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&report::impact_json(&result))?);
        }
    }
    Ok(ExitStatus::Success)
}

fn graph(cmd: GraphCommand) -> Result<ExitStatus> {
    let ctx = AuditContext::new(&cmd.common)?;
    if ctx.files.is_empty() {
        bail!("No source files found in scope (check sourceRoot/includes)");
    }
    let analysis = ctx.analysis();
    match cmd.common.format {
        OutputFormat::Text => {
            report::print_graph_to(
                &analysis.states,
                &analysis.output.dependency_edges,
                &mut io::stdout().lock(),
            )?;
        }
        OutputFormat::Json => {
            let value = report::graph_json(&analysis.states, &analysis.output.dependency_edges);
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
    }
    Ok(ExitStatus::Success)
}

fn init() -> Result<ExitStatus> {
    let config_path = Path::new(CONFIG_FILE_NAME);
    if config_path.exists() {
        bail!("{} already exists", CONFIG_FILE_NAME);
    }
    fs::write(config_path, default_config_json()?)?;
    println!("Created {}", CONFIG_FILE_NAME);
    Ok(ExitStatus::Success)
}

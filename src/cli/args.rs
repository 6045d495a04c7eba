//! CLI argument definitions using clap.
//!
//! ## Commands
//!
//! - `check`: run the migration-safety rules over the scoped sources
//! - `impact`: reverse-impact query for one state ("who is affected?")
//! - `graph`: print the state dependency graph
//! - `init`: write a default `.atomauditrc.json`

use std::path::PathBuf;

use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};

use crate::core::pipeline::CapabilityProfile;
use crate::rules::AuditRule;

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Arguments {
    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Arguments {
    /// Check if a command was provided, otherwise print help and return None.
    pub fn with_command_or_help(self) -> Option<Self> {
        if self.command.is_none() {
            Self::command().print_help().ok();
            None
        } else {
            Some(self)
        }
    }
}

/// Capability profile selection: `core` turns the callback, wrapper,
/// forwarding, and handle analyses off; `extended` turns them all on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ProfileArg {
    Core,
    Extended,
}

impl ProfileArg {
    pub fn capabilities(self) -> CapabilityProfile {
        match self {
            ProfileArg::Core => CapabilityProfile::core(),
            ProfileArg::Extended => CapabilityProfile::extended(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Common arguments shared by the analysis commands.
#[derive(Debug, Clone, Args)]
pub struct CommonArgs {
    /// Source code root directory (overrides config file)
    #[arg(long)]
    pub source_root: Option<PathBuf>,

    /// Capability profile (overrides config file switches)
    #[arg(long, value_enum)]
    pub profile: Option<ProfileArg>,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Args)]
pub struct CheckCommand {
    /// Rules to run (default: all)
    #[arg(value_enum)]
    pub rules: Vec<AuditRule>,

    #[command(flatten)]
    pub common: CommonArgs,
}

#[derive(Debug, Args)]
pub struct ImpactCommand {
    /// State id (`path/to/file.ts::name`) or unique state name
    pub state: String,

    #[command(flatten)]
    pub common: CommonArgs,
}

#[derive(Debug, Args)]
pub struct GraphCommand {
    #[command(flatten)]
    pub common: CommonArgs,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Check for migration hazards (cross-store reads, write-only and
    /// read-only states)
    Check(CheckCommand),
    /// Show which states and components are affected when a state changes
    Impact(ImpactCommand),
    /// Print the state dependency graph
    Graph(GraphCommand),
    /// Initialize a new .atomauditrc.json configuration file
    Init,
}

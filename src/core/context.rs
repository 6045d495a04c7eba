//! Audit context - configuration, file scanning, and lazy pipeline data.
//!
//! `AuditContext` is the orchestrator behind the CLI commands. It loads
//! configuration (CLI args > config file > defaults), scans the source
//! tree, and computes each later stage on first access:
//!
//! 1. `project()` - parallel read + parse of every scoped file
//! 2. `analysis()` - the full event/edge pipeline under the active profile
//!
//! Parse failures of individual files are collected as issues instead of
//! aborting the run; an empty scope is reported by the commands, not here.

use std::{
    cell::OnceCell,
    collections::BTreeSet,
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::{Context as _, Result, anyhow};
use rayon::prelude::*;

use crate::{
    cli::args::CommonArgs,
    config::{Config, load_config},
    core::{
        file_scanner::scan_files,
        parsers::{ParsedSource, Project, parse_source},
        pipeline::{ProjectAnalysis, analyze},
    },
    issues::ParseErrorIssue,
    utils::normalize_path,
};

pub struct AuditContext {
    /// Merged configuration (CLI args > config file > defaults).
    pub config: Config,

    /// Project root directory (for resolving relative paths).
    pub root_dir: PathBuf,

    /// All source files to analyze, sorted.
    pub files: BTreeSet<String>,

    /// Whether to print verbose diagnostic messages.
    pub verbose: bool,

    project: OnceCell<Project>,
    parse_errors: OnceCell<Vec<ParseErrorIssue>>,
    analysis: OnceCell<ProjectAnalysis>,
}

impl AuditContext {
    /// Create a context from command line arguments: load config, apply CLI
    /// overrides, and scan the source tree.
    pub fn new(common: &CommonArgs) -> Result<Self> {
        let source_root = common
            .source_root
            .clone()
            .unwrap_or_else(|| PathBuf::from("."));
        let root_dir = source_root.clone();
        let path = source_root
            .to_str()
            .with_context(|| anyhow!("Invalid path: {:?}", source_root))?;

        let config_result = load_config(Path::new(path))?;
        if common.verbose && !config_result.from_file {
            eprintln!("Note: No .atomauditrc.json found, using default configuration");
        }

        let mut config = config_result.config;
        if let Some(profile) = common.profile {
            config.capabilities = profile.capabilities();
        }

        let scan_result = scan_files(
            path,
            &config.includes,
            &config.ignores,
            config.ignore_test_files,
            common.verbose,
        );
        if scan_result.skipped_count > 0 {
            eprintln!(
                "Warning: {} path(s) skipped due to access errors{}",
                scan_result.skipped_count,
                if common.verbose { "" } else { " (use -v for details)" }
            );
        }

        Ok(Self {
            config,
            root_dir,
            files: scan_result.files,
            verbose: common.verbose,
            project: OnceCell::new(),
            parse_errors: OnceCell::new(),
            analysis: OnceCell::new(),
        })
    }

    /// The parsed project (lazy). File reading and parsing run in parallel;
    /// each file gets its own `Arc<SourceMap>` so that is safe. Results are
    /// merged into the sorted project regardless of completion order.
    pub fn project(&self) -> &Project {
        self.project.get_or_init(|| {
            let parse_results: Vec<_> = self
                .files
                .par_iter()
                .map(|file_path| {
                    let normalized = normalize_path(Path::new(file_path));
                    let result = std::fs::read_to_string(file_path)
                        .map_err(|e| anyhow!("Failed to read file: {}", e))
                        .and_then(|code| {
                            let source_map = Arc::new(swc_common::SourceMap::default());
                            parse_source(code, &normalized, source_map)
                        });
                    (normalized, result)
                })
                .collect();

            let mut parsed: Vec<ParsedSource> = Vec::new();
            let mut errors = Vec::new();
            for (file_path, result) in parse_results {
                match result {
                    Ok(source) => parsed.push(source),
                    Err(e) => {
                        if self.verbose {
                            eprintln!("Warning: {} - {}", file_path, e);
                        }
                        errors.push(ParseErrorIssue {
                            location: crate::core::data::SourceLocation::new(
                                file_path.as_str(),
                                1,
                                1,
                            ),
                            error: e.to_string(),
                        });
                    }
                }
            }

            let _ = self.parse_errors.set(errors);
            Project::new(parsed)
        })
    }

    /// Parse errors collected while building the project.
    pub fn parse_errors(&self) -> &Vec<ParseErrorIssue> {
        self.project();
        self.parse_errors.get_or_init(Vec::new)
    }

    /// The pipeline result (lazy). Triggers parsing if needed.
    pub fn analysis(&self) -> &ProjectAnalysis {
        self.analysis
            .get_or_init(|| analyze(self.project(), &self.config.capabilities))
    }
}

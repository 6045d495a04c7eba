use std::collections::BTreeMap;
use std::sync::Arc;

use anyhow::{Result, anyhow};
use swc_common::{FileName, Globals, SourceMap};
use swc_ecma_ast::Module;
use swc_ecma_parser::{Parser, StringInput, Syntax, TsSyntax};

/// A single parsed source file.
///
/// Each file carries its own `SourceMap` wrapped in `Arc` so parsing can run
/// in parallel; byte positions are only meaningful against the owning file's
/// map.
pub struct ParsedSource {
    pub file_path: String,
    pub module: Module,
    pub source_map: Arc<SourceMap>,
}

/// Parse a TSX/JSX/TS/JS source string into an AST.
pub fn parse_source(code: String, file_path: &str, source_map: Arc<SourceMap>) -> Result<ParsedSource> {
    use swc_common::GLOBALS;

    GLOBALS.set(&Globals::new(), || {
        let source_file =
            source_map.new_source_file(FileName::Real(file_path.into()).into(), code);

        let syntax = Syntax::Typescript(TsSyntax {
            tsx: true,
            ..Default::default()
        });

        let mut parser = Parser::new(syntax, StringInput::from(&*source_file), None);

        let module = parser
            .parse_module()
            .map_err(|e| anyhow!("Failed to parse source: {:?}", e))?;

        Ok(ParsedSource {
            file_path: file_path.to_string(),
            module,
            source_map,
        })
    })
}

/// All parsed source files of one analysis run, ordered by path.
///
/// Sorting on construction is what makes the whole pipeline insensitive to
/// the presentation order of inputs.
pub struct Project {
    files: Vec<ParsedSource>,
    by_path: BTreeMap<String, usize>,
}

impl Project {
    pub fn new(mut files: Vec<ParsedSource>) -> Self {
        files.sort_by(|a, b| a.file_path.cmp(&b.file_path));
        let by_path = files
            .iter()
            .enumerate()
            .map(|(i, f)| (f.file_path.clone(), i))
            .collect();
        Self { files, by_path }
    }

    /// Parse a set of in-memory sources. Used by tests and embedders; the CLI
    /// goes through `AuditContext`, which reads files from disk first.
    pub fn from_sources(sources: &[(&str, &str)]) -> Result<Self> {
        let mut files = Vec::with_capacity(sources.len());
        for (path, code) in sources {
            let source_map = Arc::new(SourceMap::default());
            files.push(parse_source(code.to_string(), path, source_map)?);
        }
        Ok(Self::new(files))
    }

    pub fn files(&self) -> &[ParsedSource] {
        &self.files
    }

    pub fn get(&self, path: &str) -> Option<&ParsedSource> {
        self.by_path.get(path).map(|&i| &self.files[i])
    }

    pub fn contains(&self, path: &str) -> bool {
        self.by_path.contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

use serde::Serialize;
use swc_common::{BytePos, SourceMap};

/// Pure position information in source code files (TSX/JSX/TS/JS).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct SourceLocation {
    pub file_path: String,
    /// Line number (1-indexed).
    pub line: usize,
    /// Column number (1-indexed).
    pub col: usize,
}

impl SourceLocation {
    pub fn new(file_path: impl Into<String>, line: usize, col: usize) -> Self {
        Self {
            file_path: file_path.into(),
            line,
            col,
        }
    }

    /// Look up the line/column of a byte position in a file's own source map.
    ///
    /// Byte positions are only meaningful against the source map of the file
    /// they came from; callers must pair them correctly.
    pub fn from_pos(file_path: &str, source_map: &SourceMap, pos: BytePos) -> Self {
        let loc = source_map.lookup_char_pos(pos);
        Self {
            file_path: file_path.to_string(),
            line: loc.line,
            col: loc.col_display + 1,
        }
    }
}

impl std::fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}:{}", self.file_path, self.line, self.col)
    }
}

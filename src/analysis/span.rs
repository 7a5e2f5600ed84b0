//! Source locations shared by tokens, syntax nodes and diagnostics.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Source location span with byte offsets and line/column positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    /// Start byte offset (0-indexed).
    pub start_byte: usize,
    /// End byte offset (0-indexed, exclusive).
    pub end_byte: usize,
    /// Start line (1-indexed).
    pub start_line: usize,
    /// Start column (1-indexed).
    pub start_col: usize,
    /// End line (1-indexed).
    pub end_line: usize,
    /// End column (1-indexed).
    pub end_col: usize,
}

impl Span {
    /// Create a span from a tree-sitter node.
    pub fn from_node(node: tree_sitter::Node) -> Self {
        let start = node.start_position();
        let end = node.end_position();
        Self {
            start_byte: node.start_byte(),
            end_byte: node.end_byte(),
            start_line: start.row + 1, // tree-sitter is 0-indexed
            start_col: start.column + 1,
            end_line: end.row + 1,
            end_col: end.column + 1,
        }
    }

    /// Zero-width span at a position. Used for synthesized tokens.
    pub fn point(byte: usize, line: usize, col: usize) -> Self {
        Self {
            start_byte: byte,
            end_byte: byte,
            start_line: line,
            start_col: col,
            end_line: line,
            end_col: col,
        }
    }

    /// Span covering the bytes between two positions on the same line.
    pub fn between(start_byte: usize, end_byte: usize, line: usize, start_col: usize) -> Self {
        Self {
            start_byte,
            end_byte,
            start_line: line,
            start_col,
            end_line: line,
            end_col: start_col + (end_byte - start_byte),
        }
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.start_line, self.start_col)
    }
}

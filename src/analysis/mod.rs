//! Source analysis: parsing, token stream and syntax tree.
//!
//! tree-sitter does the lexing and parsing. This module turns its concrete
//! tree into the two views the checkers consume:
//!
//! ```text
//! ┌─────────────┐     ┌────────────┐     ┌──────────────────┐
//! │ Source file │────▶│ ParsedFile │──┬─▶│ Vec<Token>       │
//! └─────────────┘     │ (ts tree)  │  │  │ (process_tokens) │
//!                     └────────────┘  │  └──────────────────┘
//!                                     │  ┌──────────────────┐
//!                                     └─▶│ SyntaxTree arena │
//!                                        │ (visit_node)     │
//!                                        └──────────────────┘
//! ```

mod parse;
mod span;
mod tokens;
mod tree;

pub use parse::{parse_python, python_language, ParsedFile};
pub use span::Span;
pub use tokens::{tokenize, Token, TokenKind};
pub use tree::{BinOpKind, ConstKind, Node, NodeId, NodeKind, NodeTag, SyntaxTree};

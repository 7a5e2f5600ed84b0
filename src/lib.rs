//! Unilint - string hygiene linter for Python 2 code bases.
//!
//! Unilint reports three things that get in the way of a clean unicode
//! story in Python 2 code:
//!
//! - W1403 `simple-basestring-literal`: a string literal without `u` or `r`
//! - W1404 `string-format-operator-deprecated`: `%` applied to a string literal
//! - W1405 `implement-unicode-magic-method`: `__str__` defined without `__unicode__`
//!
//! # Architecture
//!
//! The codebase uses tree-sitter for parsing:
//!
//! - `analysis`: Parsing, the token stream, and the arena syntax tree
//! - `checkers`: The `Checker` trait, the message registry, and the rules
//! - `lint`: The linter, message collection, and inline suppressions
//! - `config`: YAML configuration schema
//! - `report`: Output formatting (pretty, text, JSON, SARIF)
//!
//! # Adding a Checker
//!
//! Implement `Checker`, add its messages to `checkers::messages`, and list
//! it in `checkers::default_checkers`.

pub mod analysis;
pub mod checkers;
pub mod cli;
pub mod config;
pub mod lint;
pub mod report;

pub use analysis::{parse_python, tokenize, SyntaxTree, Token, TokenKind};
pub use checkers::{default_checkers, register, Checker, MessageId};
pub use config::{Config, ConfigError};
pub use lint::{Diagnostic, FileReport, LintResult, Linter, MessageFilter, Severity};

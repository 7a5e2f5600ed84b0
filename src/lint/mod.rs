//! Linting driver: message collection, suppressions, and the run loop.

mod collector;
mod linter;
pub mod suppress;
mod types;
mod walker;

pub use collector::{Anchor, MessageCollector, MessageFilter};
pub use linter::Linter;
pub use suppress::{Suppression, SuppressionType};
pub use types::{Diagnostic, FileError, FileReport, LintResult, Severity, SuppressedDiagnostic};

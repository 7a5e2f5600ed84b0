//! Core types for lint results.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::checkers::MessageId;

use super::Suppression;

/// Severity levels for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Info => write!(f, "info"),
        }
    }
}

/// A single reported finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub id: MessageId,
    pub message: String,
    pub file: String,
    /// 1-indexed line.
    pub line: usize,
    /// 1-indexed column; absent for line-level messages.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column: Option<usize>,
    pub severity: Severity,
}

impl Diagnostic {
    pub fn code(&self) -> &'static str {
        self.id.code()
    }

    pub fn symbol(&self) -> &'static str {
        self.id.symbol()
    }

    /// Sort key: file, line, column, code.
    fn sort_key(&self) -> (&str, usize, usize, &'static str) {
        (self.file.as_str(), self.line, self.column.unwrap_or(0), self.code())
    }
}

/// A diagnostic silenced by an inline directive.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuppressedDiagnostic {
    pub diagnostic: Diagnostic,
    pub suppression: Suppression,
}

/// Results for one file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FileReport {
    pub file: String,
    pub diagnostics: Vec<Diagnostic>,
    #[serde(default)]
    pub suppressed: Vec<SuppressedDiagnostic>,
}

impl FileReport {
    pub fn new(file: &str) -> Self {
        Self {
            file: file.to_string(),
            ..Default::default()
        }
    }

    /// Diagnostics carrying the given message id.
    pub fn with_id(&self, id: MessageId) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(move |d| d.id == id)
    }
}

/// A file that could not be linted at all.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileError {
    pub file: String,
    pub error: String,
}

/// Results of linting a set of files.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LintResult {
    pub diagnostics: Vec<Diagnostic>,
    /// Diagnostics that were suppressed by inline comments
    #[serde(default)]
    pub suppressed: Vec<SuppressedDiagnostic>,
    /// Files that could not be read or parsed
    #[serde(default)]
    pub errors: Vec<FileError>,
    /// Number of files scanned
    pub scanned: usize,
}

impl LintResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge a per-file report into this result.
    pub fn add_file(&mut self, report: FileReport) {
        self.diagnostics.extend(report.diagnostics);
        self.suppressed.extend(report.suppressed);
        self.scanned += 1;
    }

    /// Put diagnostics and errors in a deterministic order.
    pub fn sort(&mut self) {
        self.diagnostics.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));
        self.suppressed
            .sort_by(|a, b| a.diagnostic.sort_key().cmp(&b.diagnostic.sort_key()));
        self.errors.sort_by(|a, b| a.file.cmp(&b.file));
    }

    /// Number of suppressed diagnostics.
    pub fn suppressed_count(&self) -> usize {
        self.suppressed.len()
    }

    /// Check if there are any error-severity diagnostics.
    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity == Severity::Error)
    }

    /// True when nothing was reported and every file was linted.
    pub fn passed(&self) -> bool {
        self.diagnostics.is_empty() && self.errors.is_empty()
    }

    /// Diagnostic counts per message id, in code order.
    pub fn count_by_message(&self) -> BTreeMap<MessageId, usize> {
        let mut counts = BTreeMap::new();
        for d in &self.diagnostics {
            *counts.entry(d.id).or_insert(0) += 1;
        }
        counts
    }
}

//! Linter that drives every registered checker over a file.

use std::path::{Path, PathBuf};

use rayon::prelude::*;

use crate::analysis::{parse_python, tokenize, SyntaxTree};
use crate::checkers::{self, Checker, MessageId};

use super::suppress::{filter_suppressed, parse_suppressions};
use super::walker::{walk, DispatchTable};
use super::{Anchor, FileError, FileReport, LintResult, MessageCollector, MessageFilter};

/// Runs registered checkers against Python sources.
pub struct Linter {
    checkers: Vec<Box<dyn Checker>>,
    dispatch: DispatchTable,
    filter: MessageFilter,
}

impl Default for Linter {
    fn default() -> Self {
        Self::new()
    }
}

impl Linter {
    /// Create a linter with no checkers.
    pub fn new() -> Self {
        Self {
            checkers: Vec::new(),
            dispatch: DispatchTable::default(),
            filter: MessageFilter::new(),
        }
    }

    /// Create a linter with every built-in checker registered.
    pub fn with_default_checkers() -> Self {
        let mut linter = Self::new();
        checkers::register(&mut linter);
        linter
    }

    /// Set which messages are enabled.
    pub fn with_filter(mut self, filter: MessageFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Add a checker. Callbacks run in registration order.
    pub fn register_checker(&mut self, checker: Box<dyn Checker>) {
        let index = self.checkers.len();
        tracing::debug!("registering checker {}", checker.name());
        self.dispatch.register(index, checker.node_interests());
        self.checkers.push(checker);
    }

    pub fn checker_names(&self) -> Vec<&'static str> {
        self.checkers.iter().map(|c| c.name()).collect()
    }

    /// Lint one in-memory source file.
    ///
    /// A file that does not parse gets a single `syntax-error` diagnostic and
    /// no checker runs on it.
    pub fn check_source(&self, path: &str, source: &[u8]) -> anyhow::Result<FileReport> {
        let parsed = parse_python(Path::new(path), source)?;
        let mut collector = MessageCollector::new(path, &self.filter);

        if let Some(span) = parsed.syntax_error() {
            tracing::debug!("{}: syntax error at {}", path, span);
            collector.add_message(MessageId::SyntaxError, Anchor::Span(span));
            return Ok(FileReport {
                file: path.to_string(),
                diagnostics: collector.into_diagnostics(),
                suppressed: Vec::new(),
            });
        }

        let tokens = tokenize(&parsed);
        let tree = SyntaxTree::lower(&parsed);

        // A checker whose messages are all disabled is not run at all
        let active: Vec<bool> = self
            .checkers
            .iter()
            .map(|c| c.messages().iter().any(|id| self.filter.is_enabled(*id)))
            .collect();

        for (checker, _) in self.checkers.iter().zip(&active).filter(|(_, on)| **on) {
            checker.process_tokens(&tokens, &mut collector);
        }
        walk(&tree, &self.checkers, &active, &self.dispatch, &mut collector);

        let suppressions = parse_suppressions(path, &tokens);
        let (mut diagnostics, suppressed) =
            filter_suppressed(collector.into_diagnostics(), &suppressions);
        // Stable: ties keep emission order
        diagnostics.sort_by_key(|d| (d.line, d.column.unwrap_or(0)));

        Ok(FileReport {
            file: path.to_string(),
            diagnostics,
            suppressed,
        })
    }

    /// Read and lint one file from disk.
    pub fn check_file(&self, path: &Path) -> anyhow::Result<FileReport> {
        let source = std::fs::read(path)?;
        self.check_source(&path.to_string_lossy(), &source)
    }

    /// Lint many files in parallel. Unreadable files are recorded as errors
    /// and do not stop the run.
    pub fn check_files(&self, files: &[PathBuf]) -> LintResult {
        let reports: Vec<_> = files
            .par_iter()
            .map(|path| (path, self.check_file(path)))
            .collect();

        let mut result = LintResult::new();
        for (path, report) in reports {
            match report {
                Ok(report) => result.add_file(report),
                Err(e) => {
                    tracing::warn!("failed to lint {}: {}", path.display(), e);
                    result.errors.push(FileError {
                        file: path.to_string_lossy().into_owned(),
                        error: e.to_string(),
                    });
                }
            }
        }
        result.sort();

        tracing::info!(
            "linted {} files: {} diagnostics, {} suppressed",
            result.scanned,
            result.diagnostics.len(),
            result.suppressed_count()
        );
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_new_linter_has_no_checkers() {
        let linter = Linter::new();
        assert!(linter.checker_names().is_empty());
        let report = linter.check_source("t.py", b"x = 'a' % b\n").unwrap();
        assert!(report.diagnostics.is_empty());
    }

    #[test]
    fn test_diagnostics_sorted_by_line() {
        let linter = Linter::with_default_checkers();
        let source = "class A:\n    def __str__(self):\n        return '%s' % self\n";
        let report = linter.check_source("t.py", source.as_bytes()).unwrap();
        let found: Vec<_> = report.diagnostics.iter().map(|d| (d.line, d.code())).collect();
        assert_eq!(found, vec![(1, "W1405"), (3, "W1403"), (3, "W1404")]);
    }

    #[test]
    fn test_syntax_error_skips_checkers() {
        let linter = Linter::with_default_checkers();
        let report = linter.check_source("bad.py", b"x = 'a'\ndef broken(:\n").unwrap();
        assert_eq!(report.diagnostics.len(), 1);
        assert_eq!(report.diagnostics[0].id, MessageId::SyntaxError);
        assert_eq!(report.diagnostics[0].code(), "E0001");
    }

    #[test]
    fn test_filter_disables_messages() {
        let mut filter = MessageFilter::new();
        filter.disable("W1403");
        let linter = Linter::with_default_checkers().with_filter(filter);
        let report = linter.check_source("t.py", b"x = '%s' % y\n").unwrap();
        let codes: Vec<_> = report.diagnostics.iter().map(|d| d.code()).collect();
        assert_eq!(codes, vec!["W1404"]);
    }

    #[test]
    fn test_inline_suppression_moves_diagnostic() {
        let linter = Linter::with_default_checkers();
        let source = "x = 'a'  # unilint: disable=W1403 - fixture\ny = 'b'\n";
        let report = linter.check_source("t.py", source.as_bytes()).unwrap();
        assert_eq!(report.diagnostics.len(), 1);
        assert_eq!(report.diagnostics[0].line, 2);
        assert_eq!(report.suppressed.len(), 1);
        assert_eq!(report.suppressed[0].suppression.reason, "fixture");
    }

    #[test]
    fn test_trailing_suppression_after_multiline_literal() {
        let linter = Linter::with_default_checkers();
        let source = "x = \"\"\"a\nb\"\"\"  # unilint: disable=W1403\ny = 'c'\n";
        let report = linter.check_source("t.py", source.as_bytes()).unwrap();
        let active: Vec<_> = report.diagnostics.iter().map(|d| d.line).collect();
        assert_eq!(active, vec![3]);
        assert_eq!(report.suppressed.len(), 1);
        assert_eq!(report.suppressed[0].diagnostic.line, 1);
    }

    #[test]
    fn test_check_files_records_unreadable_files() {
        let temp = TempDir::new().unwrap();
        let good = temp.path().join("good.py");
        std::fs::write(&good, "x = u'fine'\n").unwrap();
        let bad = temp.path().join("missing.py");

        let linter = Linter::with_default_checkers();
        let result = linter.check_files(&[good, bad]);

        assert_eq!(result.scanned, 1);
        assert_eq!(result.errors.len(), 1);
        assert!(result.errors[0].file.ends_with("missing.py"));
        assert!(result.diagnostics.is_empty());
        assert!(!result.passed());
    }

    #[test]
    fn test_check_files_is_deterministic() {
        let temp = TempDir::new().unwrap();
        let mut files = Vec::new();
        for name in ["c.py", "a.py", "b.py"] {
            let path = temp.path().join(name);
            std::fs::write(&path, "x = 'a'\n").unwrap();
            files.push(path);
        }

        let linter = Linter::with_default_checkers();
        let result = linter.check_files(&files);
        let names: Vec<_> = result
            .diagnostics
            .iter()
            .map(|d| Path::new(&d.file).file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.py", "b.py", "c.py"]);
    }
}

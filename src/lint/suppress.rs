//! Inline suppression of diagnostics via comments.
//!
//! Supports directives like:
//! - `# unilint: disable=W1403` (trailing code: that statement; alone: next line)
//! - `# unilint: disable-next-line=string-format-operator-deprecated`
//! - `# unilint: disable-file=all - generated code`
//!
//! `pylint:` is accepted in place of `unilint:` so existing directives keep
//! working. Several ids may be given, separated by commas.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::analysis::{Token, TokenKind};
use crate::checkers::MessageId;

use super::{Diagnostic, SuppressedDiagnostic};

/// How a suppression applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SuppressionType {
    /// Applies to the same line
    Line,
    /// Applies to the next line
    NextLine,
    /// Applies to the entire file
    File,
}

/// An inline suppression directive.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Suppression {
    /// Selectors as written: codes, symbols, `all` or `*`
    pub rules: Vec<String>,
    /// Human-readable reason
    pub reason: String,
    /// File containing the suppression
    pub file: String,
    /// Line number (0 for file-level)
    pub line: usize,
    /// First line covered by a trailing directive on a multi-line statement
    #[serde(default)]
    pub first_line: usize,
    /// How the suppression applies
    pub suppression_type: SuppressionType,
}

impl Suppression {
    /// Whether any selector covers the message.
    pub fn covers(&self, id: MessageId) -> bool {
        self.rules
            .iter()
            .any(|rule| MessageId::matching(rule).contains(&id))
    }
}

lazy_static! {
    static ref DIRECTIVE: Regex = Regex::new(
        r"#\s*(?:unilint|pylint)\s*:\s*(disable-next-line|disable-file|disable)\s*=\s*([\w*-]+(?:\s*,\s*[\w*-]+)*)(?:\s+-\s*(.*))?"
    )
    .unwrap();
}

/// Parse suppression directives from the comment tokens of a file.
pub fn parse_suppressions(file: &str, tokens: &[Token<'_>]) -> Vec<Suppression> {
    let mut suppressions = Vec::new();
    let mut seen_code = false;
    let mut last_code_line = 0;
    // First line of the logical line being read, 0 between statements
    let mut statement_line = 0;

    for token in tokens {
        match token.kind {
            TokenKind::Comment => {}
            TokenKind::Newline => {
                statement_line = 0;
                continue;
            }
            kind if kind.is_layout() => continue,
            _ => {
                seen_code = true;
                if statement_line == 0 {
                    statement_line = token.line();
                }
                last_code_line = token.span.end_line;
                continue;
            }
        }

        let Some(caps) = DIRECTIVE.captures(token.text) else {
            continue;
        };
        let directive = caps.get(1).map(|m| m.as_str()).unwrap_or("");
        let rules: Vec<String> = caps
            .get(2)
            .map(|m| m.as_str())
            .unwrap_or("")
            .split(',')
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty())
            .collect();
        let reason = caps
            .get(3)
            .map(|m| m.as_str().trim().to_string())
            .unwrap_or_default();

        for rule in &rules {
            if MessageId::matching(rule).is_empty() {
                tracing::debug!("{}:{}: unknown message {:?} in directive", file, token.line(), rule);
            }
        }

        let suppression_type = match directive {
            "disable-file" => {
                // File-level suppressions must sit in the header, before any code
                if seen_code {
                    tracing::debug!(
                        "{}:{}: ignoring disable-file after the module header",
                        file,
                        token.line()
                    );
                    continue;
                }
                SuppressionType::File
            }
            "disable-next-line" => SuppressionType::NextLine,
            _ => {
                if last_code_line == token.line() {
                    SuppressionType::Line
                } else {
                    SuppressionType::NextLine
                }
            }
        };

        let (first_line, line) = match suppression_type {
            SuppressionType::File => (0, 0),
            SuppressionType::Line => (statement_line.min(token.line()), token.line()),
            SuppressionType::NextLine => (token.line(), token.line()),
        };
        suppressions.push(Suppression {
            rules,
            reason,
            file: file.to_string(),
            line,
            first_line,
            suppression_type,
        });
    }

    suppressions
}

/// Check if a diagnostic matches a suppression.
pub fn matches_suppression(diagnostic: &Diagnostic, suppression: &Suppression) -> bool {
    if diagnostic.file != suppression.file || !suppression.covers(diagnostic.id) {
        return false;
    }

    match suppression.suppression_type {
        SuppressionType::File => true,
        SuppressionType::Line => {
            (suppression.first_line..=suppression.line).contains(&diagnostic.line)
        }
        SuppressionType::NextLine => diagnostic.line == suppression.line + 1,
    }
}

/// Separate diagnostics into active and suppressed.
pub fn filter_suppressed(
    diagnostics: Vec<Diagnostic>,
    suppressions: &[Suppression],
) -> (Vec<Diagnostic>, Vec<SuppressedDiagnostic>) {
    if suppressions.is_empty() {
        return (diagnostics, Vec::new());
    }

    let mut active = Vec::new();
    let mut suppressed = Vec::new();

    for diagnostic in diagnostics {
        match suppressions
            .iter()
            .find(|s| matches_suppression(&diagnostic, s))
        {
            Some(suppression) => suppressed.push(SuppressedDiagnostic {
                diagnostic,
                suppression: suppression.clone(),
            }),
            None => active.push(diagnostic),
        }
    }

    (active, suppressed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{parse_python, tokenize};
    use crate::lint::Severity;
    use std::path::Path;

    fn suppressions(source: &str) -> Vec<Suppression> {
        let parsed = parse_python(Path::new("main.py"), source.as_bytes()).unwrap();
        let tokens = tokenize(&parsed);
        parse_suppressions("main.py", &tokens)
    }

    fn diagnostic(id: MessageId, line: usize) -> Diagnostic {
        Diagnostic {
            id,
            message: String::new(),
            file: "main.py".to_string(),
            line,
            column: None,
            severity: Severity::Warning,
        }
    }

    #[test]
    fn test_trailing_directive_applies_to_line() {
        let found = suppressions("x = 'a'  # unilint: disable=W1403\n");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].suppression_type, SuppressionType::Line);
        assert_eq!(found[0].line, 1);
        assert_eq!(found[0].first_line, 1);
        assert_eq!(found[0].rules, vec!["W1403"]);
    }

    #[test]
    fn test_standalone_directive_applies_to_next_line() {
        let source = "import os\n# unilint: disable=simple-basestring-literal, W1404 - legacy API\nx = 'a' % os.sep\n";
        let found = suppressions(source);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].suppression_type, SuppressionType::NextLine);
        assert_eq!(found[0].line, 2);
        assert_eq!(found[0].rules, vec!["simple-basestring-literal", "W1404"]);
        assert_eq!(found[0].reason, "legacy API");
    }

    #[test]
    fn test_trailing_directive_covers_whole_statement() {
        let source = "x = \"\"\"a\nb\"\"\"  # unilint: disable=W1403\ny = 'c'\n";
        let found = suppressions(source);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].suppression_type, SuppressionType::Line);
        assert_eq!((found[0].first_line, found[0].line), (1, 2));

        let d = diagnostic(MessageId::SimpleBasestringLiteral, 1);
        assert!(matches_suppression(&d, &found[0]));
        let after = diagnostic(MessageId::SimpleBasestringLiteral, 3);
        assert!(!matches_suppression(&after, &found[0]));
    }

    #[test]
    fn test_pylint_prefix_is_accepted() {
        let found = suppressions("# pylint: disable-next-line=W1403\nx = 'a'\n");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].suppression_type, SuppressionType::NextLine);
    }

    #[test]
    fn test_file_directive_only_in_header() {
        let header = suppressions("# -*- coding: utf-8 -*-\n# unilint: disable-file=all\nx = 'a'\n");
        assert_eq!(header.len(), 1);
        assert_eq!(header[0].suppression_type, SuppressionType::File);
        assert_eq!(header[0].line, 0);

        let late = suppressions("x = 'a'\n# unilint: disable-file=all\n");
        assert!(late.is_empty());
    }

    #[test]
    fn test_directive_inside_string_is_ignored() {
        assert!(suppressions("x = u'# unilint: disable=all'\n").is_empty());
    }

    #[test]
    fn test_matches_suppression() {
        let d = diagnostic(MessageId::SimpleBasestringLiteral, 5);

        let file = Suppression {
            rules: vec!["all".to_string()],
            reason: String::new(),
            file: "main.py".to_string(),
            line: 0,
            first_line: 0,
            suppression_type: SuppressionType::File,
        };
        assert!(matches_suppression(&d, &file));

        let next_line = Suppression {
            rules: vec!["w1403".to_string()],
            line: 4,
            suppression_type: SuppressionType::NextLine,
            ..file.clone()
        };
        assert!(matches_suppression(&d, &next_line));

        let wrong_rule = Suppression {
            rules: vec!["W1405".to_string()],
            ..file.clone()
        };
        assert!(!matches_suppression(&d, &wrong_rule));

        let other_file = Suppression {
            file: "other.py".to_string(),
            ..file.clone()
        };
        assert!(!matches_suppression(&d, &other_file));
    }

    #[test]
    fn test_filter_suppressed() {
        let diagnostics = vec![
            diagnostic(MessageId::SimpleBasestringLiteral, 1),
            diagnostic(MessageId::SimpleBasestringLiteral, 2),
        ];
        let suppressions = vec![Suppression {
            rules: vec!["simple-basestring-literal".to_string()],
            reason: "fixture".to_string(),
            file: "main.py".to_string(),
            line: 2,
            first_line: 2,
            suppression_type: SuppressionType::Line,
        }];

        let (active, suppressed) = filter_suppressed(diagnostics, &suppressions);
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].line, 1);
        assert_eq!(suppressed.len(), 1);
        assert_eq!(suppressed[0].suppression.reason, "fixture");
    }
}

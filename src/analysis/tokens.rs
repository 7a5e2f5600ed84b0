//! Python-style token stream derived from the tree-sitter parse.
//!
//! tree-sitter keeps NEWLINE/INDENT/DEDENT hidden, so the layout tokens are
//! reconstructed from leaf positions:
//! - a row change after code, outside brackets, is a `Newline`
//! - any other row change is an `Nl`
//! - the first token of a logical line is measured against an indent stack
//!
//! Every `string` node is emitted as a single token with its prefix and
//! quotes, matching what Python's own tokenizer yields for a literal.

use super::{ParsedFile, Span};

/// Token category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Identifiers and keywords.
    Name,
    Number,
    /// A complete string literal, prefix and quotes included.
    String,
    /// Operators and punctuation.
    Op,
    Comment,
    /// End of a logical line.
    Newline,
    /// Non-logical line break (inside brackets, after comment-only lines).
    Nl,
    Indent,
    Dedent,
    EndMarker,
}

impl TokenKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenKind::Name => "NAME",
            TokenKind::Number => "NUMBER",
            TokenKind::String => "STRING",
            TokenKind::Op => "OP",
            TokenKind::Comment => "COMMENT",
            TokenKind::Newline => "NEWLINE",
            TokenKind::Nl => "NL",
            TokenKind::Indent => "INDENT",
            TokenKind::Dedent => "DEDENT",
            TokenKind::EndMarker => "ENDMARKER",
        }
    }

    /// Tokens that only describe line structure.
    pub fn is_layout(&self) -> bool {
        matches!(
            self,
            TokenKind::Newline
                | TokenKind::Nl
                | TokenKind::Indent
                | TokenKind::Dedent
                | TokenKind::EndMarker
        )
    }
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A lexical unit borrowed from the parsed source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
    pub span: Span,
}

impl<'a> Token<'a> {
    pub fn new(kind: TokenKind, text: &'a str, span: Span) -> Self {
        Self { kind, text, span }
    }

    /// Start line (1-indexed).
    pub fn line(&self) -> usize {
        self.span.start_line
    }
}

/// Produce the ordered token stream for a parsed file.
pub fn tokenize(parsed: &ParsedFile) -> Vec<Token<'_>> {
    let source = parsed.source_str();
    let root = parsed.tree.root_node();
    let leaves = collect_leaves(root);

    let mut tokens = Vec::with_capacity(leaves.len() + leaves.len() / 4);
    let mut indents: Vec<usize> = vec![1];
    let mut depth: usize = 0;
    let mut line_open = false;
    let mut continued = false;
    let mut last_end: Option<Span> = None;

    for leaf in leaves {
        let span = Span::from_node(leaf);
        let text = parsed.node_text(leaf);

        if leaf.kind() == "line_continuation" {
            continued = true;
            continue;
        }

        if let Some(prev) = last_end {
            if span.start_line > prev.end_line && !continued {
                let at = Span::point(prev.end_byte, prev.end_line, prev.end_col);
                if line_open && depth == 0 {
                    tokens.push(Token::new(TokenKind::Newline, "\n", at));
                    line_open = false;
                } else {
                    tokens.push(Token::new(TokenKind::Nl, "\n", at));
                }
            }
        }
        continued = false;
        last_end = Some(span);

        let kind = classify(leaf.kind(), text);
        if kind == TokenKind::Comment {
            tokens.push(Token::new(kind, text, span));
            continue;
        }

        if !line_open && depth == 0 {
            let current = indents.last().copied().unwrap_or(1);
            if span.start_col > current {
                let line_start = span.start_byte - (span.start_col - 1);
                let whitespace = &source[line_start..span.start_byte];
                tokens.push(Token::new(
                    TokenKind::Indent,
                    whitespace,
                    Span::between(line_start, span.start_byte, span.start_line, 1),
                ));
                indents.push(span.start_col);
            } else {
                while indents.len() > 1 && span.start_col < indents.last().copied().unwrap_or(1) {
                    indents.pop();
                    tokens.push(Token::new(
                        TokenKind::Dedent,
                        "",
                        Span::point(span.start_byte, span.start_line, span.start_col),
                    ));
                }
            }
        }

        if kind == TokenKind::Op {
            match text {
                "(" | "[" | "{" => depth += 1,
                ")" | "]" | "}" => depth = depth.saturating_sub(1),
                _ => {}
            }
        }

        tokens.push(Token::new(kind, text, span));
        line_open = true;
    }

    let end = Span::from_node(root);
    let eof = Span::point(end.end_byte, end.end_line, end.end_col);
    if line_open {
        let at = last_end
            .map(|s| Span::point(s.end_byte, s.end_line, s.end_col))
            .unwrap_or(eof);
        tokens.push(Token::new(TokenKind::Newline, "", at));
    }
    for _ in 1..indents.len() {
        tokens.push(Token::new(TokenKind::Dedent, "", eof));
    }
    tokens.push(Token::new(TokenKind::EndMarker, "", eof));

    tokens
}

/// Collect leaf nodes in source order, treating `string` nodes as leaves.
fn collect_leaves(root: tree_sitter::Node<'_>) -> Vec<tree_sitter::Node<'_>> {
    let mut leaves = Vec::new();
    let mut cursor = root.walk();
    let mut descend = true;

    loop {
        let node = cursor.node();
        if descend {
            if node.kind() == "string" || node.child_count() == 0 {
                if node.end_byte() > node.start_byte() {
                    leaves.push(node);
                }
            } else if cursor.goto_first_child() {
                continue;
            }
        }

        if cursor.goto_next_sibling() {
            descend = true;
            continue;
        }
        if !cursor.goto_parent() {
            break;
        }
        descend = false;
    }

    leaves
}

fn classify(kind: &str, text: &str) -> TokenKind {
    match kind {
        // tree-sitter parses the `expr` repr form as a string
        "string" if text.starts_with('`') => TokenKind::Op,
        "string" => TokenKind::String,
        "comment" => TokenKind::Comment,
        "integer" | "float" => TokenKind::Number,
        _ => match text.chars().next() {
            Some(c) if c.is_alphabetic() || c == '_' => TokenKind::Name,
            _ => TokenKind::Op,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::parse_python;
    use std::path::Path;

    fn kinds(source: &str) -> Vec<TokenKind> {
        let parsed = parse_python(Path::new("t.py"), source.as_bytes()).unwrap();
        tokenize(&parsed).iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_simple_assignment() {
        use TokenKind::*;
        assert_eq!(
            kinds("x = \"hello\"\n"),
            vec![Name, Op, String, Newline, EndMarker]
        );
    }

    #[test]
    fn test_string_token_keeps_prefix() {
        let parsed = parse_python(Path::new("t.py"), b"x = Rb'\\d+'\n").unwrap();
        let tokens = tokenize(&parsed);
        let string = tokens.iter().find(|t| t.kind == TokenKind::String).unwrap();
        assert_eq!(string.text, "Rb'\\d+'");
        assert_eq!(string.line(), 1);
        assert_eq!(string.span.start_col, 5);
    }

    #[test]
    fn test_indent_and_dedent() {
        use TokenKind::*;
        let source = "def f():\n    \"\"\"doc\"\"\"\n    return 1\nx = 2\n";
        assert_eq!(
            kinds(source),
            vec![
                Name, Name, Op, Op, Op, Newline, // def f():
                Indent, String, Newline, // docstring
                Name, Number, Newline, // return 1
                Dedent, Name, Op, Number, Newline, // x = 2
                EndMarker,
            ]
        );
    }

    #[test]
    fn test_dedent_at_end_of_file() {
        let all = kinds("if x:\n    y = 1\n");
        let tail: Vec<_> = all.iter().rev().take(2).collect();
        assert_eq!(tail, vec![&TokenKind::EndMarker, &TokenKind::Dedent]);
    }

    #[test]
    fn test_bracket_continuation_is_not_a_newline() {
        use TokenKind::*;
        let source = "x = (\n    'a',\n    'b',\n)\n";
        let all = kinds(source);
        assert!(!all.contains(&Indent));
        assert_eq!(all.iter().filter(|k| **k == Newline).count(), 1);
        assert_eq!(all.iter().filter(|k| **k == Nl).count(), 3);
    }

    #[test]
    fn test_comments_do_not_change_indentation() {
        use TokenKind::*;
        let source = "if x:\n    y = 1\n# trailing\n    z = 2\n";
        let all = kinds(source);
        assert!(all.contains(&Comment));
        assert_eq!(all.iter().filter(|k| **k == Indent).count(), 1);
    }

    #[test]
    fn test_concatenated_strings_are_separate_tokens() {
        let parsed = parse_python(Path::new("t.py"), b"x = 'a' u'b'\n").unwrap();
        let strings: Vec<_> = tokenize(&parsed)
            .into_iter()
            .filter(|t| t.kind == TokenKind::String)
            .map(|t| t.text)
            .collect();
        assert_eq!(strings, vec!["'a'", "u'b'"]);
    }

    #[test]
    fn test_backslash_continuation() {
        use TokenKind::*;
        let all = kinds("x = 1 + \\\n    2\n");
        assert_eq!(all, vec![Name, Op, Number, Op, Number, Newline, EndMarker]);
    }

    #[test]
    fn test_backtick_repr_is_not_a_string() {
        use TokenKind::*;
        assert_eq!(kinds("x = `y`\n"), vec![Name, Op, Op, Newline, EndMarker]);
    }

    #[test]
    fn test_empty_source() {
        assert_eq!(kinds(""), vec![TokenKind::EndMarker]);
    }

    #[test]
    fn test_colon_precedes_docstring() {
        let parsed = parse_python(Path::new("t.py"), b"class A:\n    'doc'\n").unwrap();
        let tokens = tokenize(&parsed);
        let meaningful: Vec<_> = tokens
            .iter()
            .filter(|t| !t.kind.is_layout())
            .map(|t| t.text)
            .collect();
        assert_eq!(meaningful, vec!["class", "A", ":", "'doc'"]);
    }
}

//! Python parsing on top of tree-sitter.

use std::path::Path;

use tree_sitter::{Language, Parser};

use super::Span;

/// Holds a parsed tree-sitter tree and associated metadata.
///
/// Tokens and the lowered syntax tree both borrow from this, so one parse
/// serves every checker callback for the file.
pub struct ParsedFile {
    /// The tree-sitter parse tree.
    pub tree: tree_sitter::Tree,
    /// The decoded source text. Byte offsets in `tree` index into this.
    pub source: String,
    /// The file path (for error reporting).
    pub path: String,
}

impl ParsedFile {
    /// Get the source code as a string slice.
    pub fn source_str(&self) -> &str {
        &self.source
    }

    /// Get text for a tree-sitter node.
    pub fn node_text(&self, node: tree_sitter::Node) -> &str {
        node.utf8_text(self.source.as_bytes()).unwrap_or("")
    }

    /// Location of the first `ERROR` or `MISSING` node, if the parse failed.
    pub fn syntax_error(&self) -> Option<Span> {
        let root = self.tree.root_node();
        if !root.has_error() {
            return None;
        }

        let mut node = root;
        'descend: loop {
            if node.is_error() || node.is_missing() {
                return Some(Span::from_node(node));
            }
            let mut cursor = node.walk();
            for child in node.children(&mut cursor) {
                if child.is_error() || child.is_missing() || child.has_error() {
                    node = child;
                    continue 'descend;
                }
            }
            // has_error() was set but no child carries it
            return Some(Span::from_node(node));
        }
    }
}

/// The tree-sitter grammar used for every file.
pub fn python_language() -> Language {
    tree_sitter_python::LANGUAGE.into()
}

/// Parse Python source into a tree-sitter tree.
///
/// Partial parse errors still produce a tree; check `syntax_error()` before
/// trusting its shape.
pub fn parse_python(path: &Path, source: &[u8]) -> anyhow::Result<ParsedFile> {
    let text = match String::from_utf8(source.to_vec()) {
        Ok(text) => text,
        Err(e) => {
            tracing::warn!(
                "{}: source is not valid UTF-8 ({}), decoding lossily",
                path.display(),
                e.utf8_error()
            );
            String::from_utf8_lossy(source).into_owned()
        }
    };

    let mut parser = Parser::new();
    parser.set_language(&python_language())?;
    let tree = parser
        .parse(text.as_bytes(), None)
        .ok_or_else(|| anyhow::anyhow!("failed to parse {}", path.display()))?;

    Ok(ParsedFile {
        tree,
        source: text,
        path: path.to_string_lossy().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_source() {
        let parsed = parse_python(Path::new("ok.py"), b"x = u'hello'\n").unwrap();
        assert_eq!(parsed.tree.root_node().kind(), "module");
        assert!(parsed.syntax_error().is_none());
        assert_eq!(parsed.path, "ok.py");
    }

    #[test]
    fn test_parse_reports_syntax_error() {
        let parsed = parse_python(Path::new("bad.py"), b"def broken(:\n    pass\n").unwrap();
        let span = parsed.syntax_error().expect("should find a syntax error");
        assert_eq!(span.start_line, 1);
    }

    #[test]
    fn test_parse_lossy_utf8() {
        let parsed = parse_python(Path::new("latin.py"), b"x = u'caf\xe9'\n").unwrap();
        assert!(parsed.source_str().contains('\u{FFFD}'));
    }
}

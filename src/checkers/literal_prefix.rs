//! Flags string literals without a `u` or `r` prefix.
//!
//! A literal directly after a `:` token is assumed to be a docstring (or a
//! dict value, annotation, slice bound...) and is left alone. The heuristic
//! is deliberately naive: a module docstring on the first line has no colon
//! before it and is flagged.

use crate::analysis::{Token, TokenKind};
use crate::lint::{Anchor, MessageCollector};

use super::{Checker, MessageId};

/// Prefix letters that exempt a literal.
const RAW_MARKER: char = 'r';
const TEXT_MARKER: char = 'u';

pub struct LiteralPrefixScanner;

impl Checker for LiteralPrefixScanner {
    fn name(&self) -> &'static str {
        "only_unicode"
    }

    fn messages(&self) -> &'static [MessageId] {
        &[MessageId::SimpleBasestringLiteral]
    }

    fn process_tokens(&self, tokens: &[Token<'_>], collector: &mut MessageCollector<'_>) {
        let mut previous: Option<&Token<'_>> = None;

        for token in tokens {
            if is_skipped(token) {
                continue;
            }
            if token.kind == TokenKind::String {
                let after_colon = previous.is_some_and(|p| p.text == ":");
                if !after_colon && !has_exempt_prefix(token.text) {
                    collector.add_message(MessageId::SimpleBasestringLiteral, Anchor::Line(token.line()));
                }
            }
            previous = Some(token);
        }
    }
}

/// Layout and comment tokens never become the "previous" token.
fn is_skipped(token: &Token<'_>) -> bool {
    matches!(
        token.kind,
        TokenKind::Indent | TokenKind::Newline | TokenKind::Nl | TokenKind::Comment
    ) || token.text == "\n"
}

/// Whether the characters before the first quote include `r` or `u`.
pub fn has_exempt_prefix(literal: &str) -> bool {
    let end = literal.find(['\'', '"']).unwrap_or(0);
    let prefix = literal[..end].to_lowercase();
    prefix.contains(RAW_MARKER) || prefix.contains(TEXT_MARKER)
}

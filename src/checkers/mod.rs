//! Checker contract and the built-in checkers.
//!
//! A checker is a stateless rule. The linter calls it through two hooks:
//! - `process_tokens`: once per file with the full token stream
//! - `visit_node`: once per syntax node whose tag is in `node_interests`
//!
//! Each hook reports through the `MessageCollector` it is given.

mod literal_prefix;
mod magic_methods;
pub mod messages;
mod string_format;

pub use literal_prefix::LiteralPrefixScanner;
pub use magic_methods::MagicMethodPairChecker;
pub use messages::{MessageDef, MessageId};
pub use string_format::DeprecatedOperatorDetector;

use crate::analysis::{NodeId, NodeTag, SyntaxTree, Token};
use crate::lint::{Linter, MessageCollector};

/// A lint rule invoked by the linter.
pub trait Checker: Send + Sync {
    /// Checker name (e.g., "only_unicode").
    fn name(&self) -> &'static str;

    /// Messages this checker can emit.
    fn messages(&self) -> &'static [MessageId];

    /// Node kinds this checker wants `visit_node` called for.
    fn node_interests(&self) -> &'static [NodeTag] {
        &[]
    }

    /// Inspect the ordered token stream of one file.
    fn process_tokens(&self, _tokens: &[Token<'_>], _collector: &mut MessageCollector<'_>) {}

    /// Inspect one node. Only called for kinds listed in `node_interests`.
    fn visit_node(&self, _tree: &SyntaxTree, _node: NodeId, _collector: &mut MessageCollector<'_>) {}
}

/// Fresh instances of every built-in checker.
pub fn default_checkers() -> Vec<Box<dyn Checker>> {
    vec![
        Box::new(LiteralPrefixScanner),
        Box::new(DeprecatedOperatorDetector),
        Box::new(MagicMethodPairChecker),
    ]
}

/// Register the built-in checkers with a linter.
pub fn register(linter: &mut Linter) {
    for checker in default_checkers() {
        linter.register_checker(checker);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_default_checkers_cover_every_rule_message() {
        let emitted: HashSet<MessageId> = default_checkers()
            .iter()
            .flat_map(|c| c.messages().iter().copied())
            .collect();
        for id in MessageId::ALL {
            if id == MessageId::SyntaxError {
                continue;
            }
            assert!(emitted.contains(&id), "no checker emits {}", id);
        }
    }

    #[test]
    fn test_message_defs_name_their_checker() {
        for checker in default_checkers() {
            for id in checker.messages() {
                assert_eq!(id.def().checker, checker.name());
            }
        }
    }

    #[test]
    fn test_register_adds_all_checkers() {
        let mut linter = Linter::new();
        register(&mut linter);
        assert_eq!(linter.checker_names(), vec![
            "only_unicode",
            "string-format-deprecated",
            "unicode-magic-method",
        ]);
    }
}

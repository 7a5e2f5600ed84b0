//! Flags scopes that define `__str__` without `__unicode__`.

use crate::analysis::{NodeId, NodeKind, NodeTag, SyntaxTree};
use crate::lint::{Anchor, MessageCollector};

use super::{Checker, MessageId};

/// Method that should be defined.
const PRIMARY_METHOD: &str = "__unicode__";
/// Method whose presence triggers the check.
const SECONDARY_METHOD: &str = "__str__";

pub struct MagicMethodPairChecker;

impl Checker for MagicMethodPairChecker {
    fn name(&self) -> &'static str {
        "unicode-magic-method"
    }

    fn messages(&self) -> &'static [MessageId] {
        &[MessageId::ImplementUnicodeMagicMethod]
    }

    fn node_interests(&self) -> &'static [NodeTag] {
        &[NodeTag::FunctionDef]
    }

    fn visit_node(&self, tree: &SyntaxTree, node: NodeId, collector: &mut MessageCollector<'_>) {
        match tree.kind(node) {
            NodeKind::FunctionDef { name } if name == SECONDARY_METHOD => {}
            _ => return,
        }
        let Some(scope) = tree.enclosing_scope(node) else {
            return;
        };
        // Direct members only: an inherited __unicode__ does not count.
        if !tree.binds(scope, PRIMARY_METHOD) {
            tracing::debug!("{} defines {} only", tree.describe(scope), SECONDARY_METHOD);
            collector.add_message(
                MessageId::ImplementUnicodeMagicMethod,
                Anchor::Span(tree.node(scope).span),
            );
        }
    }
}

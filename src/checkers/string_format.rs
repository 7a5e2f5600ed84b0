//! Flags `%` formatting applied to a string literal.

use crate::analysis::{BinOpKind, NodeId, NodeKind, NodeTag, SyntaxTree};
use crate::lint::{Anchor, MessageCollector};

use super::{Checker, MessageId};

pub struct DeprecatedOperatorDetector;

impl Checker for DeprecatedOperatorDetector {
    fn name(&self) -> &'static str {
        "string-format-deprecated"
    }

    fn messages(&self) -> &'static [MessageId] {
        &[MessageId::StringFormatOperatorDeprecated]
    }

    fn node_interests(&self) -> &'static [NodeTag] {
        &[NodeTag::BinOp]
    }

    fn visit_node(&self, tree: &SyntaxTree, node: NodeId, collector: &mut MessageCollector<'_>) {
        let NodeKind::BinOp { op: BinOpKind::Mod } = tree.kind(node) else {
            return;
        };
        // Only literal left operands are known to be strings; names, calls
        // and f-strings are not inspected.
        let Some(left) = tree.left_operand(node) else {
            return;
        };
        if let NodeKind::Const(kind) = tree.kind(left) {
            if kind.is_string() {
                collector.add_message(
                    MessageId::StringFormatOperatorDeprecated,
                    Anchor::Span(tree.node(node).span),
                );
            }
        }
    }
}

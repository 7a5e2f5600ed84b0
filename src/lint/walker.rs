//! Tree traversal with per-kind checker dispatch.

use std::collections::HashMap;

use crate::analysis::{NodeTag, SyntaxTree};
use crate::checkers::Checker;

use super::MessageCollector;

/// Maps node tags to the checkers interested in them.
#[derive(Debug, Default)]
pub(crate) struct DispatchTable {
    handlers: HashMap<NodeTag, Vec<usize>>,
}

impl DispatchTable {
    /// Record that checker `index` wants nodes tagged with `interests`.
    pub fn register(&mut self, index: usize, interests: &[NodeTag]) {
        for tag in interests {
            let handlers = self.handlers.entry(*tag).or_default();
            if !handlers.contains(&index) {
                handlers.push(index);
            }
        }
    }

    pub fn handlers(&self, tag: NodeTag) -> &[usize] {
        self.handlers.get(&tag).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

/// Visit every node in preorder, calling the interested active checkers in
/// registration order.
pub(crate) fn walk(
    tree: &SyntaxTree,
    checkers: &[Box<dyn Checker>],
    active: &[bool],
    table: &DispatchTable,
    collector: &mut MessageCollector<'_>,
) {
    if table.is_empty() {
        return;
    }
    for (id, node) in tree.iter() {
        for &index in table.handlers(node.kind.tag()) {
            if active[index] {
                checkers[index].visit_node(tree, id, collector);
            }
        }
    }
}

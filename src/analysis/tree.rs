//! Arena syntax tree lowered from the tree-sitter parse.
//!
//! Nodes live in a flat `Vec` addressed by `NodeId`. Each node stores its
//! parent id and child ids, so parent/sibling navigation never needs
//! back-references. Ids are allocated in preorder: iterating the arena visits
//! nodes in the same order as a depth-first walk.

use std::fmt;

use super::{ParsedFile, Span};

/// Index of a node in a `SyntaxTree`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Category of a literal constant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConstKind {
    Str,
    Bytes,
    Int,
    Float,
    Complex,
    Bool,
    None,
    Ellipsis,
}

impl ConstKind {
    /// `basestring` in Python 2 terms: text or byte strings.
    pub fn is_string(self) -> bool {
        matches!(self, ConstKind::Str | ConstKind::Bytes)
    }
}

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinOpKind {
    Add,
    Sub,
    Mult,
    MatMult,
    Div,
    FloorDiv,
    Mod,
    Pow,
    LShift,
    RShift,
    BitAnd,
    BitOr,
    BitXor,
}

impl BinOpKind {
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        Some(match symbol {
            "+" => BinOpKind::Add,
            "-" => BinOpKind::Sub,
            "*" => BinOpKind::Mult,
            "@" => BinOpKind::MatMult,
            "/" => BinOpKind::Div,
            "//" => BinOpKind::FloorDiv,
            "%" => BinOpKind::Mod,
            "**" => BinOpKind::Pow,
            "<<" => BinOpKind::LShift,
            ">>" => BinOpKind::RShift,
            "&" => BinOpKind::BitAnd,
            "|" => BinOpKind::BitOr,
            "^" => BinOpKind::BitXor,
            _ => return None,
        })
    }

    pub fn symbol(self) -> &'static str {
        match self {
            BinOpKind::Add => "+",
            BinOpKind::Sub => "-",
            BinOpKind::Mult => "*",
            BinOpKind::MatMult => "@",
            BinOpKind::Div => "/",
            BinOpKind::FloorDiv => "//",
            BinOpKind::Mod => "%",
            BinOpKind::Pow => "**",
            BinOpKind::LShift => "<<",
            BinOpKind::RShift => ">>",
            BinOpKind::BitAnd => "&",
            BinOpKind::BitOr => "|",
            BinOpKind::BitXor => "^",
        }
    }
}

impl fmt::Display for BinOpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Node kind with kind-specific attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Module,
    ClassDef { name: String },
    /// `def` and `async def`.
    FunctionDef { name: String },
    Lambda,
    BinOp { op: BinOpKind },
    Const(ConstKind),
    /// f-string; children are the interpolated expressions.
    JoinedStr,
    /// Identifier in load position.
    Name { id: String },
    /// Identifier bound by an assignment.
    AssignName { name: String },
    /// Any other tree-sitter node, by grammar kind.
    Other(&'static str),
}

/// Fieldless mirror of `NodeKind`, used as the dispatch key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeTag {
    Module,
    ClassDef,
    FunctionDef,
    Lambda,
    BinOp,
    Const,
    JoinedStr,
    Name,
    AssignName,
    Other,
}

impl NodeKind {
    pub fn tag(&self) -> NodeTag {
        match self {
            NodeKind::Module => NodeTag::Module,
            NodeKind::ClassDef { .. } => NodeTag::ClassDef,
            NodeKind::FunctionDef { .. } => NodeTag::FunctionDef,
            NodeKind::Lambda => NodeTag::Lambda,
            NodeKind::BinOp { .. } => NodeTag::BinOp,
            NodeKind::Const(_) => NodeTag::Const,
            NodeKind::JoinedStr => NodeTag::JoinedStr,
            NodeKind::Name { .. } => NodeTag::Name,
            NodeKind::AssignName { .. } => NodeTag::AssignName,
            NodeKind::Other(_) => NodeTag::Other,
        }
    }

    /// Nodes that open a new name scope.
    pub fn is_scope(&self) -> bool {
        matches!(
            self,
            NodeKind::Module
                | NodeKind::ClassDef { .. }
                | NodeKind::FunctionDef { .. }
                | NodeKind::Lambda
        )
    }

    /// The name this node binds in its enclosing scope, if any.
    pub fn bound_name(&self) -> Option<&str> {
        match self {
            NodeKind::ClassDef { name }
            | NodeKind::FunctionDef { name }
            | NodeKind::AssignName { name } => Some(name),
            _ => None,
        }
    }
}

/// A node in the arena.
#[derive(Debug, Clone)]
pub struct Node {
    pub kind: NodeKind,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    pub span: Span,
}

/// Arena of lowered syntax nodes for one file.
#[derive(Debug, Clone)]
pub struct SyntaxTree {
    nodes: Vec<Node>,
}

impl SyntaxTree {
    /// Lower a parsed file into the arena.
    pub fn lower(parsed: &ParsedFile) -> Self {
        let mut lowering = Lowering {
            parsed,
            nodes: Vec::new(),
        };
        lowering.lower_node(parsed.tree.root_node(), None);
        Self {
            nodes: lowering.nodes,
        }
    }

    /// The module node. Always id 0.
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.nodes[id.0].kind
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    /// Iterate nodes in preorder.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes.iter().enumerate().map(|(i, n)| (NodeId(i), n))
    }

    /// Left operand of a binary operation.
    pub fn left_operand(&self, id: NodeId) -> Option<NodeId> {
        match self.kind(id) {
            NodeKind::BinOp { .. } => self.children(id).first().copied(),
            _ => None,
        }
    }

    /// Nearest ancestor that opens a scope (module, class, function, lambda).
    pub fn enclosing_scope(&self, id: NodeId) -> Option<NodeId> {
        let mut current = self.parent(id);
        while let Some(parent) = current {
            if self.kind(parent).is_scope() {
                return Some(parent);
            }
            current = self.parent(parent);
        }
        None
    }

    /// Names bound directly in `scope`, in source order.
    ///
    /// Nested definitions contribute their own name but are not entered.
    pub fn scope_bindings(&self, scope: NodeId) -> Vec<&str> {
        let mut names = Vec::new();
        let mut stack: Vec<NodeId> = self.children(scope).iter().rev().copied().collect();

        while let Some(id) = stack.pop() {
            let kind = self.kind(id);
            if let Some(name) = kind.bound_name() {
                names.push(name);
            }
            if kind.is_scope() {
                continue;
            }
            stack.extend(self.children(id).iter().rev().copied());
        }

        names
    }

    /// Whether `name` is bound directly in `scope`.
    ///
    /// Bindings are `def` and `class` names, assignment and `for` targets,
    /// `with ... as` and `except ..., e` aliases, and imported names.
    /// Augmented assignments, `global` declarations and comprehension
    /// variables are not counted.
    pub fn binds(&self, scope: NodeId, name: &str) -> bool {
        self.scope_bindings(scope).iter().any(|n| *n == name)
    }

    /// Display name for a node, used in diagnostics and debugging.
    pub fn describe(&self, id: NodeId) -> String {
        match self.kind(id) {
            NodeKind::Module => "module".to_string(),
            NodeKind::ClassDef { name } => format!("class {}", name),
            NodeKind::FunctionDef { name } => format!("function {}", name),
            NodeKind::Lambda => "lambda".to_string(),
            NodeKind::BinOp { op } => format!("binary operation {}", op),
            NodeKind::Const(kind) => format!("{:?} constant", kind),
            NodeKind::JoinedStr => "f-string".to_string(),
            NodeKind::Name { id } => id.clone(),
            NodeKind::AssignName { name } => name.clone(),
            NodeKind::Other(kind) => kind.to_string(),
        }
    }
}

struct Lowering<'p> {
    parsed: &'p ParsedFile,
    nodes: Vec<Node>,
}

impl<'p> Lowering<'p> {
    fn push(&mut self, kind: NodeKind, parent: Option<NodeId>, span: Span) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            kind,
            parent,
            children: Vec::new(),
            span,
        });
        if let Some(parent) = parent {
            self.nodes[parent.0].children.push(id);
        }
        id
    }

    fn lower_node(&mut self, ts: tree_sitter::Node<'_>, parent: Option<NodeId>) {
        match ts.kind() {
            "comment" | "line_continuation" => return,
            "parenthesized_expression" => {
                self.lower_named_children(ts, parent, None);
                return;
            }
            _ => {}
        }
        if !ts.is_named() {
            return;
        }

        let kind = self.classify(ts);
        let mut span = Span::from_node(ts);
        if kind == NodeKind::Module {
            // tree-sitter starts the root after leading blank lines
            span.start_byte = 0;
            span.start_line = 1;
            span.start_col = 1;
        }

        if let Some(target) = binding_target(ts) {
            let id = self.push(kind, parent, span);
            self.lower_target(target, id);
            self.lower_named_children(ts, Some(id), Some(target.id()));
            return;
        }

        match kind {
            NodeKind::Const(_) | NodeKind::Name { .. } => {
                self.push(kind, parent, span);
            }
            NodeKind::JoinedStr => {
                let id = self.push(kind, parent, span);
                self.lower_interpolations(ts, id);
            }
            NodeKind::ClassDef { .. } | NodeKind::FunctionDef { .. } => {
                let id = self.push(kind, parent, span);
                let name_node = ts.child_by_field_name("name").map(|n| n.id());
                self.lower_named_children(ts, Some(id), name_node);
            }
            NodeKind::Other("import_statement" | "import_from_statement") => {
                let id = self.push(kind, parent, span);
                let mut cursor = ts.walk();
                let names: Vec<_> = ts.children_by_field_name("name", &mut cursor).collect();
                for name in &names {
                    self.lower_target(*name, id);
                }
                let mut cursor = ts.walk();
                let rest: Vec<_> = ts
                    .named_children(&mut cursor)
                    .filter(|c| !names.contains(c))
                    .collect();
                for child in rest {
                    self.lower_node(child, Some(id));
                }
            }
            _ => {
                let id = self.push(kind, parent, span);
                self.lower_named_children(ts, Some(id), None);
            }
        }
    }

    fn lower_named_children(
        &mut self,
        ts: tree_sitter::Node<'_>,
        parent: Option<NodeId>,
        skip: Option<usize>,
    ) {
        let mut cursor = ts.walk();
        let children: Vec<_> = ts.named_children(&mut cursor).collect();
        for child in children {
            if Some(child.id()) == skip {
                continue;
            }
            self.lower_node(child, parent);
        }
    }

    /// Lower an assignment target, turning bare identifiers into bindings.
    fn lower_target(&mut self, ts: tree_sitter::Node<'_>, parent: NodeId) {
        match ts.kind() {
            "identifier" => {
                let name = self.parsed.node_text(ts).to_string();
                self.push(NodeKind::AssignName { name }, Some(parent), Span::from_node(ts));
            }
            // `import a.b` binds `a`
            "dotted_name" => {
                if let Some(head) = ts.named_child(0) {
                    self.lower_target(head, parent);
                }
            }
            "pattern_list" | "tuple_pattern" | "list_pattern" | "list_splat_pattern"
            | "parenthesized_expression" | "tuple" | "list" | "as_pattern_target" => {
                let mut cursor = ts.walk();
                let children: Vec<_> = ts.named_children(&mut cursor).collect();
                for child in children {
                    self.lower_target(child, parent);
                }
            }
            _ => self.lower_node(ts, Some(parent)),
        }
    }

    fn lower_interpolations(&mut self, ts: tree_sitter::Node<'_>, parent: NodeId) {
        let mut cursor = ts.walk();
        let children: Vec<_> = ts.named_children(&mut cursor).collect();
        for child in children {
            match child.kind() {
                "string" => self.lower_interpolations(child, parent),
                "interpolation" => {
                    if let Some(expr) = child.named_child(0) {
                        self.lower_node(expr, Some(parent));
                    }
                }
                _ => {}
            }
        }
    }

    fn classify(&self, ts: tree_sitter::Node<'_>) -> NodeKind {
        let text = || self.parsed.node_text(ts);
        let field_text = |field: &str| {
            ts.child_by_field_name(field)
                .map(|n| self.parsed.node_text(n).to_string())
                .unwrap_or_default()
        };

        match ts.kind() {
            "module" => NodeKind::Module,
            "class_definition" => NodeKind::ClassDef {
                name: field_text("name"),
            },
            "function_definition" => NodeKind::FunctionDef {
                name: field_text("name"),
            },
            "lambda" => NodeKind::Lambda,
            "binary_operator" => match BinOpKind::from_symbol(&field_text("operator")) {
                Some(op) => NodeKind::BinOp { op },
                None => NodeKind::Other("binary_operator"),
            },
            "string" if text().starts_with('`') => NodeKind::Other("repr"),
            "string" => {
                if has_interpolation(ts) {
                    NodeKind::JoinedStr
                } else {
                    NodeKind::Const(string_const_kind(text()))
                }
            }
            "concatenated_string" => {
                let mut cursor = ts.walk();
                let parts: Vec<_> = ts
                    .named_children(&mut cursor)
                    .filter(|n| n.kind() == "string")
                    .collect();
                if parts.iter().any(|p| self.parsed.node_text(*p).starts_with('`')) {
                    NodeKind::Other("concatenated_string")
                } else if parts.iter().any(|p| has_interpolation(*p)) {
                    NodeKind::JoinedStr
                } else {
                    let first = parts.first().map(|p| self.parsed.node_text(*p)).unwrap_or("");
                    NodeKind::Const(string_const_kind(first))
                }
            }
            "integer" | "float" => {
                if text().ends_with(['j', 'J']) {
                    NodeKind::Const(ConstKind::Complex)
                } else if ts.kind() == "integer" {
                    NodeKind::Const(ConstKind::Int)
                } else {
                    NodeKind::Const(ConstKind::Float)
                }
            }
            "true" | "false" => NodeKind::Const(ConstKind::Bool),
            "none" => NodeKind::Const(ConstKind::None),
            "ellipsis" => NodeKind::Const(ConstKind::Ellipsis),
            "identifier" => NodeKind::Name {
                id: text().to_string(),
            },
            other => NodeKind::Other(other),
        }
    }
}

/// The child that receives the binding for statements that bind a single target.
fn binding_target(ts: tree_sitter::Node<'_>) -> Option<tree_sitter::Node<'_>> {
    let field = match ts.kind() {
        "assignment" | "for_statement" => "left",
        "as_pattern" | "aliased_import" | "except_clause" => "alias",
        _ => return None,
    };
    ts.child_by_field_name(field)
}

fn has_interpolation(string: tree_sitter::Node<'_>) -> bool {
    let mut cursor = string.walk();
    let found = string
        .named_children(&mut cursor)
        .any(|n| n.kind() == "interpolation");
    found
}

fn string_const_kind(literal: &str) -> ConstKind {
    let prefix_end = literal.find(['\'', '"']).unwrap_or(0);
    if literal[..prefix_end].contains(['b', 'B']) {
        ConstKind::Bytes
    } else {
        ConstKind::Str
    }
}

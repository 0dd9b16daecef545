//! Expression trees: an arena of tagged nodes.
//!
//! One tree is built per completion scan and discarded after one
//! resolution pass. Nodes live in a flat arena and reference each other by
//! [`ExprId`]; the parent link is an id too, so the tree carries no owning
//! cycles.

use text_size::{TextRange, TextSize};

use crate::symbols::ResolvedType;

use super::lexer::Token;

/// Index of a node inside its [`ExprTree`] arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ExprId(u32);

impl ExprId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Which literal a `Constant` node holds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LiteralKind {
    Int,
    Long,
    Float,
    Double,
    Char,
    String,
    Boolean,
    Null,
}

/// The closed set of expression-node kinds.
///
/// `*Open` variants exist only while the builder is mid-scan; a finished
/// tree contains none of them.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExprKind {
    /// A literal; the token text carries the value.
    Constant(LiteralKind),
    /// A bare name (also `this`/`super`, and the empty completion target).
    Variable,
    /// Binary operator; the operator token is `tokens[0]`, children are
    /// the two operands.
    Operator,
    /// Prefix or postfix unary operator with one operand.
    UnaryOperator,
    /// A dot chain; children are the segments in order.
    Dot,
    /// A dot chain still accepting segments.
    DotOpen,
    /// Array access (`children = [receiver, index]`) or array type/creation
    /// suffix (`children = [element]` or `[index]`, see parent context).
    Array,
    /// An array group still accepting its index expression.
    ArrayOpen,
    /// A parenthesized sub-expression (one child).
    Parenthesis,
    /// A parenthesis group still accepting content.
    ParenthesisOpen,
    /// A call; name tokens identify the method, children are arguments.
    Method,
    /// A call still accepting arguments.
    MethodOpen,
    /// `new T(args)`: `children[0]` is the `Type`, the rest are arguments.
    Constructor,
    /// A cast: `children = [type, operand]`.
    Conversion,
    /// A type position (class name or dotted name reinterpreted as a type).
    Type,
    /// `new` awaiting its type, or array creation (`children = [Type, Array]`).
    New,
    /// `expr instanceof T`: `children = [operand, type]`.
    InstanceOf,
}

impl ExprKind {
    /// Kinds that only exist while the builder is mid-scan.
    pub fn is_open(self) -> bool {
        matches!(
            self,
            ExprKind::DotOpen
                | ExprKind::ArrayOpen
                | ExprKind::ParenthesisOpen
                | ExprKind::MethodOpen
        )
    }
}

/// One node of an expression tree.
#[derive(Clone, Debug)]
pub struct ExprNode {
    pub kind: ExprKind,
    /// The tokens that belong to this node itself (operator token, name
    /// tokens, brackets), not those of its children.
    pub tokens: Vec<Token>,
    pub children: Vec<ExprId>,
    pub parent: Option<ExprId>,
    /// Filled in by the resolver for sub-expressions it computed a type for.
    pub ty: Option<ResolvedType>,
}

impl ExprNode {
    fn new(kind: ExprKind, tokens: Vec<Token>) -> Self {
        Self {
            kind,
            tokens,
            children: Vec::new(),
            parent: None,
            ty: None,
        }
    }

    /// Concatenated token text of this node (not its children).
    pub fn text(&self) -> String {
        self.tokens.iter().map(|t| t.text.as_ref()).collect()
    }
}

/// Arena of expression nodes plus the root of the finished tree.
#[derive(Default)]
pub struct ExprTree {
    nodes: Vec<ExprNode>,
    root: Option<ExprId>,
}

impl ExprTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alloc(&mut self, kind: ExprKind, tokens: Vec<Token>) -> ExprId {
        let id = ExprId(self.nodes.len() as u32);
        self.nodes.push(ExprNode::new(kind, tokens));
        id
    }

    pub fn node(&self, id: ExprId) -> &ExprNode {
        &self.nodes[id.index()]
    }

    pub fn node_mut(&mut self, id: ExprId) -> &mut ExprNode {
        &mut self.nodes[id.index()]
    }

    pub fn kind(&self, id: ExprId) -> ExprKind {
        self.nodes[id.index()].kind
    }

    pub fn children(&self, id: ExprId) -> &[ExprId] {
        &self.nodes[id.index()].children
    }

    /// Attach `child` as the last child of `parent`.
    pub fn add_child(&mut self, parent: ExprId, child: ExprId) {
        self.nodes[child.index()].parent = Some(parent);
        self.nodes[parent.index()].children.push(child);
    }

    pub fn root(&self) -> Option<ExprId> {
        self.root
    }

    pub fn set_root(&mut self, root: Option<ExprId>) {
        self.root = root;
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The source range covered by a node and its children, if any of them
    /// carry tokens.
    pub fn range(&self, id: ExprId) -> Option<TextRange> {
        let node = self.node(id);
        let mut start: Option<TextSize> = None;
        let mut end: Option<TextSize> = None;
        for token in &node.tokens {
            start = Some(start.map_or(token.offset, |s| s.min(token.offset)));
            end = Some(end.map_or(token.end(), |e| e.max(token.end())));
        }
        for &child in &node.children {
            if let Some(range) = self.range(child) {
                start = Some(start.map_or(range.start(), |s| s.min(range.start())));
                end = Some(end.map_or(range.end(), |e| e.max(range.end())));
            }
        }
        Some(TextRange::new(start?, end?))
    }

    /// All tokens of a node and its children, in source order.
    pub fn collect_tokens(&self, id: ExprId, out: &mut Vec<Token>) {
        let node = self.node(id);
        out.extend(node.tokens.iter().cloned());
        for &child in &node.children {
            self.collect_tokens(child, out);
        }
        out.sort_by_key(|t| t.offset);
    }

    /// Compact single-line rendering, for tests and trace logging:
    /// `Operator(+)[Variable(a), Operator(*)[Variable(b), Variable(c)]]`.
    pub fn render(&self, id: ExprId) -> String {
        let node = self.node(id);
        let label = match node.kind {
            ExprKind::Constant(_) => "Constant",
            ExprKind::Variable => "Variable",
            ExprKind::Operator => "Operator",
            ExprKind::UnaryOperator => "Unary",
            ExprKind::Dot => "Dot",
            ExprKind::DotOpen => "DotOpen",
            ExprKind::Array => "Array",
            ExprKind::ArrayOpen => "ArrayOpen",
            ExprKind::Parenthesis => "Paren",
            ExprKind::ParenthesisOpen => "ParenOpen",
            ExprKind::Method => "Method",
            ExprKind::MethodOpen => "MethodOpen",
            ExprKind::Constructor => "Constructor",
            ExprKind::Conversion => "Conversion",
            ExprKind::Type => "Type",
            ExprKind::New => "New",
            ExprKind::InstanceOf => "InstanceOf",
        };
        let mut out = String::from(label);
        let text = self.node(id).text();
        if !text.is_empty() {
            out.push('(');
            out.push_str(&text);
            out.push(')');
        }
        if !node.children.is_empty() {
            out.push('[');
            for (i, &child) in node.children.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                out.push_str(&self.render(child));
            }
            out.push(']');
        }
        out
    }
}

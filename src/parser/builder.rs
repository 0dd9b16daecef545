//! The expression-tree builder (token processor).
//!
//! A small shift-reduce stack machine. Each incoming token is interpreted
//! against the top of a stack of partially built nodes:
//!
//! 1. a *join check* first folds completed sub-expressions (a unary
//!    operator over its operand, a cast over the converted expression, a
//!    closed constructor call into its `new`) so the stack stays shallow;
//! 2. the token is then classified: identifiers and literals push leaf
//!    nodes, `.`/`(`/`[` open grouping nodes, operators push operator
//!    nodes;
//! 3. a precedence-climbing reduction folds the pending operand/operator
//!    run into one node whenever a stop token (`)`, `]`, `,`, `;`, end of
//!    input) is seen, honoring associativity at equal precedence;
//! 4. end of input finalizes still-open nodes (a trailing `obj.` becomes a
//!    dot chain with an empty completion segment).
//!
//! The parse is deliberately permissive: an unclassifiable token clears
//! the stack and, when the token is identifier-like, restarts from that
//! identifier, so completion stays available after a broken prefix.

use text_size::TextSize;
use tracing::trace;

use crate::core::text_utils;

use super::expr::{ExprId, ExprKind, ExprTree, LiteralKind};
use super::lexer::Token;
use super::token_kind::{Prec, TokenKind};

/// A recoverable builder error; the scan continues after it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SyntaxError {
    pub message: String,
    pub offset: TextSize,
}

/// Result of one builder scan. `tree.root()` is `None` when the input
/// yielded nothing resolvable (parse-fatal).
pub struct Build {
    pub tree: ExprTree,
    pub errors: Vec<SyntaxError>,
}

impl Build {
    pub fn ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// The builder state: the node arena plus the work stack.
#[derive(Default)]
pub struct ExprBuilder {
    tree: ExprTree,
    stack: Vec<ExprId>,
    errors: Vec<SyntaxError>,
}

impl ExprBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume one token batch and produce one expression tree.
    pub fn process(tokens: &[Token]) -> Build {
        let mut builder = Self::new();
        for token in tokens {
            if !token.kind.is_trivia() {
                builder.push_token(token);
            }
        }
        builder.finish()
    }

    // =========================================================================
    // Stack inspection
    // =========================================================================

    fn top(&self) -> Option<ExprId> {
        self.stack.last().copied()
    }

    fn below_top(&self) -> Option<ExprId> {
        (self.stack.len() >= 2).then(|| self.stack[self.stack.len() - 2])
    }

    /// A node that can serve as an operand as it stands.
    fn is_complete(&self, id: ExprId) -> bool {
        let children = self.tree.children(id).len();
        match self.tree.kind(id) {
            ExprKind::Constant(_)
            | ExprKind::Variable
            | ExprKind::Type
            | ExprKind::Dot
            | ExprKind::Array
            | ExprKind::Parenthesis
            | ExprKind::Method
            | ExprKind::Constructor => true,
            ExprKind::Operator | ExprKind::InstanceOf | ExprKind::Conversion => children == 2,
            ExprKind::UnaryOperator => children == 1,
            ExprKind::New => children > 0,
            ExprKind::DotOpen
            | ExprKind::ArrayOpen
            | ExprKind::ParenthesisOpen
            | ExprKind::MethodOpen => false,
        }
    }

    /// A shape that can stand in type position: a name, a dotted name, or
    /// either with array brackets.
    fn is_type_shaped(&self, id: ExprId) -> bool {
        match self.tree.kind(id) {
            ExprKind::Variable => !self.tree.node(id).tokens.is_empty(),
            ExprKind::Type => true,
            ExprKind::Dot => self
                .tree
                .children(id)
                .iter()
                .all(|&c| self.is_type_shaped(c)),
            ExprKind::Array => {
                let children = self.tree.children(id);
                children.len() == 1 && self.is_type_shaped(children[0])
            }
            _ => false,
        }
    }

    /// Re-tag a type-shaped expression as a type position.
    fn to_type(&mut self, id: ExprId) {
        if matches!(
            self.tree.kind(id),
            ExprKind::Variable | ExprKind::Dot | ExprKind::Array
        ) {
            self.tree.node_mut(id).kind = ExprKind::Type;
        }
    }

    /// A dot chain is pending when its last `.` still waits for a segment.
    fn dot_pending(&self, id: ExprId) -> bool {
        let node = self.tree.node(id);
        let dots = node
            .tokens
            .iter()
            .filter(|t| t.kind == TokenKind::Dot)
            .count();
        node.children.len() == dots
    }

    // =========================================================================
    // Token dispatch
    // =========================================================================

    fn push_token(&mut self, token: &Token) {
        self.join(Some(token.kind));
        match token.kind {
            kind if kind.is_name() => self.on_name(token),
            kind if kind.is_literal() => self.on_literal(token),
            TokenKind::Dot => self.on_dot(token),
            TokenKind::LParen => self.on_lparen(token),
            TokenKind::RParen => self.on_rparen(token),
            TokenKind::LBracket => self.on_lbracket(token),
            TokenKind::RBracket => self.on_rbracket(token),
            TokenKind::Comma => self.on_comma(token),
            TokenKind::Semicolon | TokenKind::LBrace | TokenKind::RBrace => {
                self.on_statement_end()
            }
            TokenKind::NewKw => self.on_new(token),
            TokenKind::Error => {
                // The lexer only matches ASCII identifiers; accept a
                // non-ASCII identifier here instead of bailing out.
                if text_utils::is_identifier(&token.text) {
                    self.on_name(token);
                } else {
                    self.recover(token);
                }
            }
            kind if kind.precedence().level > 0 => self.on_operator(token),
            _ => self.recover(token),
        }
    }

    fn on_name(&mut self, token: &Token) {
        if let Some(top) = self.top() {
            if self.tree.kind(top) == ExprKind::DotOpen && self.dot_pending(top) {
                let segment = self.tree.alloc(ExprKind::Variable, vec![token.clone()]);
                self.tree.add_child(top, segment);
                return;
            }
            if self.is_complete(top) {
                // `(Type) name`: the parenthesis is a cast, the name may
                // follow it directly.
                if !self.is_cast_shaped(top) {
                    self.recover(token);
                    return;
                }
            }
        }
        let id = self.tree.alloc(ExprKind::Variable, vec![token.clone()]);
        self.stack.push(id);
    }

    fn on_literal(&mut self, token: &Token) {
        if let Some(top) = self.top() {
            if self.is_complete(top) && !self.is_cast_shaped(top) {
                self.recover(token);
                return;
            }
            if self.tree.kind(top) == ExprKind::DotOpen && self.dot_pending(top) {
                self.recover(token);
                return;
            }
        }
        let kind = match token.kind {
            TokenKind::IntLit => LiteralKind::Int,
            TokenKind::LongLit => LiteralKind::Long,
            TokenKind::FloatLit => LiteralKind::Float,
            TokenKind::DoubleLit => LiteralKind::Double,
            TokenKind::CharLit => LiteralKind::Char,
            TokenKind::StringLit => LiteralKind::String,
            TokenKind::TrueLit | TokenKind::FalseLit => LiteralKind::Boolean,
            _ => LiteralKind::Null,
        };
        let id = self
            .tree
            .alloc(ExprKind::Constant(kind), vec![token.clone()]);
        self.stack.push(id);
    }

    /// A `Parenthesis` whose single child is type-shaped, i.e. a cast
    /// waiting for its operand.
    fn is_cast_shaped(&self, id: ExprId) -> bool {
        self.tree.kind(id) == ExprKind::Parenthesis
            && self.tree.children(id).len() == 1
            && self.is_type_shaped(self.tree.children(id)[0])
    }

    fn on_dot(&mut self, token: &Token) {
        match self.top() {
            Some(top) if self.tree.kind(top) == ExprKind::DotOpen => {
                if self.dot_pending(top) {
                    self.recover(token); // `a..`
                } else {
                    self.tree.node_mut(top).tokens.push(token.clone());
                }
            }
            Some(top) if self.is_complete(top) => {
                self.stack.pop();
                let chain = self.tree.alloc(ExprKind::DotOpen, vec![token.clone()]);
                self.tree.add_child(chain, top);
                self.stack.push(chain);
            }
            _ => self.recover(token),
        }
    }

    /// When the stack reads `new` + type expression, fold the type into
    /// the `new` node. Accepts a still-open dot chain of plain names
    /// (`new java.util.Date` at the `(`).
    fn fold_new_type(&mut self) -> bool {
        let (Some(top), Some(below)) = (self.top(), self.below_top()) else {
            return false;
        };
        if self.tree.kind(below) != ExprKind::New || !self.tree.children(below).is_empty() {
            return false;
        }
        let chain_of_names = self.tree.kind(top) == ExprKind::DotOpen
            && !self.dot_pending(top)
            && self
                .tree
                .children(top)
                .iter()
                .all(|&c| self.tree.kind(c) == ExprKind::Variable);
        if !self.is_type_shaped(top) && !chain_of_names {
            return false;
        }
        self.stack.pop();
        if self.tree.kind(top) == ExprKind::DotOpen {
            self.tree.node_mut(top).kind = ExprKind::Dot;
        }
        self.to_type(top);
        self.tree.add_child(below, top);
        true
    }

    fn on_lparen(&mut self, token: &Token) {
        // `new T(`: the type folds into the `new`, the parenthesis starts
        // collecting constructor arguments.
        if self.fold_new_type() {
            let call = self.tree.alloc(ExprKind::MethodOpen, vec![token.clone()]);
            self.stack.push(call);
            return;
        }

        match self.top() {
            // `obj.name(`: the freshly appended segment becomes a call.
            Some(top) if self.tree.kind(top) == ExprKind::DotOpen => {
                if self.dot_pending(top) {
                    self.recover(token);
                    return;
                }
                let last = *self.tree.children(top).last().expect("satisfied dot chain");
                if self.tree.kind(last) != ExprKind::Variable {
                    self.recover(token);
                    return;
                }
                let node = self.tree.node_mut(last);
                node.kind = ExprKind::MethodOpen;
                node.tokens.push(token.clone());
                self.stack.push(last);
            }
            // `name(`: a bare variable becomes a call, not a grouping.
            Some(top) if self.tree.kind(top) == ExprKind::Variable => {
                let node = self.tree.node_mut(top);
                node.kind = ExprKind::MethodOpen;
                node.tokens.push(token.clone());
            }
            // `(Type)(expr)`: grouping after a cast is fine.
            Some(top) if self.is_complete(top) && !self.is_cast_shaped(top) => {
                self.recover(token)
            }
            _ => {
                let id = self
                    .tree
                    .alloc(ExprKind::ParenthesisOpen, vec![token.clone()]);
                self.stack.push(id);
            }
        }
    }

    fn on_rparen(&mut self, token: &Token) {
        self.reduce();
        let Some(top) = self.top() else {
            self.recover(token);
            return;
        };
        match self.tree.kind(top) {
            ExprKind::MethodOpen => self.close_call(top, token),
            ExprKind::ParenthesisOpen => self.recover(token), // `()`
            _ if self.is_complete(top) => {
                let Some(below) = self.below_top() else {
                    self.recover(token);
                    return;
                };
                match self.tree.kind(below) {
                    ExprKind::MethodOpen => {
                        self.stack.pop();
                        self.tree.add_child(below, top);
                        self.close_call(below, token);
                    }
                    ExprKind::ParenthesisOpen => {
                        self.stack.pop();
                        self.tree.add_child(below, top);
                        let node = self.tree.node_mut(below);
                        node.kind = ExprKind::Parenthesis;
                        node.tokens.push(token.clone());
                    }
                    _ => self.recover(token),
                }
            }
            _ => self.recover(token),
        }
    }

    /// Close a `MethodOpen` into a `Method`. A call that is a segment of a
    /// dot chain is already attached there, so it leaves the stack.
    fn close_call(&mut self, call: ExprId, token: &Token) {
        {
            let node = self.tree.node_mut(call);
            node.kind = ExprKind::Method;
            node.tokens.push(token.clone());
        }
        let in_chain = self
            .tree
            .node(call)
            .parent
            .is_some_and(|p| self.tree.kind(p) == ExprKind::DotOpen);
        if in_chain {
            debug_assert_eq!(self.top(), Some(call));
            self.stack.pop();
        }
    }

    fn on_lbracket(&mut self, token: &Token) {
        // `new T[` starts array creation; the type folds into the `new`.
        if self.fold_new_type() {
            let group = self.tree.alloc(ExprKind::ArrayOpen, vec![token.clone()]);
            self.stack.push(group);
            return;
        }
        match self.top() {
            Some(top) if self.is_complete(top) => {
                self.stack.pop();
                let group = self.tree.alloc(ExprKind::ArrayOpen, vec![token.clone()]);
                self.tree.add_child(group, top);
                self.stack.push(group);
            }
            _ => self.recover(token),
        }
    }

    fn on_rbracket(&mut self, token: &Token) {
        self.reduce();
        let Some(top) = self.top() else {
            self.recover(token);
            return;
        };
        match self.tree.kind(top) {
            // `T[]`: an array group without an index.
            ExprKind::ArrayOpen => {
                let node = self.tree.node_mut(top);
                node.kind = ExprKind::Array;
                node.tokens.push(token.clone());
            }
            _ if self.is_complete(top) => {
                let Some(below) = self.below_top() else {
                    self.recover(token);
                    return;
                };
                if self.tree.kind(below) != ExprKind::ArrayOpen {
                    self.recover(token);
                    return;
                }
                self.stack.pop();
                self.tree.add_child(below, top);
                let node = self.tree.node_mut(below);
                node.kind = ExprKind::Array;
                node.tokens.push(token.clone());
            }
            _ => self.recover(token),
        }
    }

    fn on_comma(&mut self, token: &Token) {
        self.reduce();
        let Some(top) = self.top() else {
            self.recover(token);
            return;
        };
        if !self.is_complete(top) {
            self.recover(token);
            return;
        }
        let Some(below) = self.below_top() else {
            self.recover(token);
            return;
        };
        if self.tree.kind(below) == ExprKind::MethodOpen {
            self.stack.pop();
            self.tree.add_child(below, top);
        } else {
            self.recover(token);
        }
    }

    fn on_statement_end(&mut self) {
        // A completed statement contributes nothing to the completion
        // context; start over for the next expression.
        self.join(None);
        self.reduce();
        self.stack.clear();
    }

    fn on_new(&mut self, token: &Token) {
        match self.top() {
            Some(top) if self.is_complete(top) => self.recover(token),
            _ => {
                let id = self.tree.alloc(ExprKind::New, vec![token.clone()]);
                self.stack.push(id);
            }
        }
    }

    fn on_operator(&mut self, token: &Token) {
        let complete_operand = self.top().is_some_and(|top| self.is_complete(top));

        if token.kind.is_unary_only() {
            if complete_operand
                && matches!(token.kind, TokenKind::PlusPlus | TokenKind::MinusMinus)
            {
                // postfix
                let operand = self.stack.pop().expect("complete operand");
                let unary = self
                    .tree
                    .alloc(ExprKind::UnaryOperator, vec![token.clone()]);
                self.tree.add_child(unary, operand);
                self.stack.push(unary);
            } else if complete_operand {
                self.recover(token);
            } else {
                let id = self
                    .tree
                    .alloc(ExprKind::UnaryOperator, vec![token.clone()]);
                self.stack.push(id);
            }
            return;
        }

        if complete_operand {
            // Binary (including `instanceof`, `?` and `:`); folded into a
            // tree at the next stop token.
            let id = self.tree.alloc(ExprKind::Operator, vec![token.clone()]);
            self.stack.push(id);
        } else if token.kind.is_unary_prefix() {
            let id = self
                .tree
                .alloc(ExprKind::UnaryOperator, vec![token.clone()]);
            self.stack.push(id);
        } else {
            self.recover(token);
        }
    }

    // =========================================================================
    // Join check
    // =========================================================================

    /// Fold completed sub-expressions below the top of the stack.
    ///
    /// `next` is the kind of the token about to be interpreted; precedence-
    /// sensitive folds (unary operators, casts) hold off while a tighter
    /// postfix (`.` or `[`) is coming up.
    fn join(&mut self, next: Option<TokenKind>) {
        let postfix_next = matches!(next, Some(TokenKind::Dot | TokenKind::LBracket));
        loop {
            let Some(top) = self.top() else { return };
            let Some(below) = self.below_top() else { return };
            if !self.is_complete(top) {
                return;
            }
            match self.tree.kind(below) {
                ExprKind::UnaryOperator
                    if self.tree.children(below).is_empty() && !postfix_next =>
                {
                    self.stack.pop();
                    self.tree.add_child(below, top);
                }
                ExprKind::Parenthesis if self.is_cast_shaped(below) && !postfix_next => {
                    // `(Type) expr`: the parenthesis becomes a conversion.
                    self.stack.pop();
                    let type_child = self.tree.children(below)[0];
                    self.to_type(type_child);
                    self.tree.node_mut(below).kind = ExprKind::Conversion;
                    self.tree.add_child(below, top);
                }
                ExprKind::New => {
                    if !self.constructor_fold(below, top) {
                        return;
                    }
                }
                _ => return,
            }
        }
    }

    /// Fold `new T (args)` / `new T [size]` once the call or size group has
    /// closed. Returns false when no fold applies.
    fn constructor_fold(&mut self, new_id: ExprId, top: ExprId) -> bool {
        let new_children = self.tree.children(new_id);
        if new_children.len() != 1 || self.tree.kind(new_children[0]) != ExprKind::Type {
            return false;
        }
        match self.tree.kind(top) {
            ExprKind::Method => {
                // Absorb the argument list; the call node itself dissolves.
                self.stack.pop();
                let args = self.tree.node(top).children.clone();
                let tokens = std::mem::take(&mut self.tree.node_mut(top).tokens);
                for arg in args {
                    self.tree.add_child(new_id, arg);
                }
                self.tree.node_mut(new_id).tokens.extend(tokens);
                self.tree.node_mut(new_id).kind = ExprKind::Constructor;
                true
            }
            ExprKind::Array if self.tree.node(top).parent.is_none() => {
                // Array creation: keep the size group as a child.
                self.stack.pop();
                self.tree.add_child(new_id, top);
                true
            }
            _ => false,
        }
    }

    // =========================================================================
    // Precedence-climbing reduction
    // =========================================================================

    fn op_prec(&self, id: ExprId) -> Prec {
        self.tree.node(id).tokens[0].kind.precedence()
    }

    /// Fold the operand/operator run on top of the stack into one node.
    fn reduce(&mut self) {
        let mut run = Vec::new();
        while let Some(top) = self.top() {
            let pending_operator = self.tree.kind(top) == ExprKind::Operator
                && self.tree.children(top).is_empty();
            if self.is_complete(top) || pending_operator {
                run.push(self.stack.pop().expect("inspected top"));
            } else {
                break;
            }
        }
        if run.is_empty() {
            return;
        }
        run.reverse();

        let mut operands: Vec<ExprId> = Vec::new();
        let mut operators: Vec<ExprId> = Vec::new();
        for id in run {
            let pending_operator = self.tree.kind(id) == ExprKind::Operator
                && self.tree.children(id).is_empty();
            if pending_operator {
                let prec = self.op_prec(id);
                while let Some(&prev) = operators.last() {
                    let prev_prec = self.op_prec(prev);
                    // Equal precedence defers to the associativity flag.
                    if prev_prec.level > prec.level
                        || (prev_prec.level == prec.level && !prec.right_assoc)
                    {
                        self.fold_top(&mut operands, &mut operators);
                    } else {
                        break;
                    }
                }
                operators.push(id);
            } else {
                operands.push(id);
            }
        }
        while !operators.is_empty() {
            self.fold_top(&mut operands, &mut operators);
        }
        for id in operands {
            self.stack.push(id);
        }
    }

    /// Pop one operator and give it its operands. A run broken by error
    /// recovery may leave an operator with a single operand; the node is
    /// kept incomplete rather than dropped.
    fn fold_top(&mut self, operands: &mut Vec<ExprId>, operators: &mut Vec<ExprId>) {
        let Some(op) = operators.pop() else { return };
        let rhs = operands.pop();
        let lhs = operands.pop();
        if let Some(lhs) = lhs {
            self.tree.add_child(op, lhs);
        }
        if let Some(rhs) = rhs {
            self.tree.add_child(op, rhs);
        }
        if self.tree.node(op).tokens[0].kind == TokenKind::InstanceofKw {
            self.tree.node_mut(op).kind = ExprKind::InstanceOf;
            if self.tree.children(op).len() == 2 {
                let ty = self.tree.children(op)[1];
                self.to_type(ty);
            }
        }
        operands.push(op);
    }

    // =========================================================================
    // Finalization and recovery
    // =========================================================================

    /// Close one still-open node at the top of the stack. Returns false
    /// when nothing was closed.
    fn finalize_step(&mut self) -> bool {
        let Some(top) = self.top() else { return false };
        match self.tree.kind(top) {
            ExprKind::DotOpen => {
                if self.dot_pending(top) {
                    // The trailing segment is the completion target.
                    let end = self
                        .tree
                        .node(top)
                        .tokens
                        .last()
                        .map(|t| t.end())
                        .unwrap_or_default();
                    let empty = self.tree.alloc(
                        ExprKind::Variable,
                        vec![Token::new(TokenKind::Ident, "", end)],
                    );
                    self.tree.add_child(top, empty);
                }
                self.tree.node_mut(top).kind = ExprKind::Dot;
                true
            }
            ExprKind::MethodOpen => {
                self.tree.node_mut(top).kind = ExprKind::Method;
                let in_chain = self
                    .tree
                    .node(top)
                    .parent
                    .is_some_and(|p| self.tree.kind(p) == ExprKind::DotOpen);
                if in_chain {
                    self.stack.pop();
                }
                true
            }
            ExprKind::ParenthesisOpen => {
                self.tree.node_mut(top).kind = ExprKind::Parenthesis;
                true
            }
            ExprKind::ArrayOpen => {
                self.tree.node_mut(top).kind = ExprKind::Array;
                true
            }
            _ if self.is_complete(top) => {
                let Some(below) = self.below_top() else {
                    return false;
                };
                match self.tree.kind(below) {
                    ExprKind::MethodOpen
                    | ExprKind::ParenthesisOpen
                    | ExprKind::ArrayOpen => {
                        self.stack.pop();
                        self.tree.add_child(below, top);
                        true
                    }
                    ExprKind::New
                        if self.tree.children(below).is_empty()
                            && self.is_type_shaped(top) =>
                    {
                        self.stack.pop();
                        self.to_type(top);
                        self.tree.add_child(below, top);
                        true
                    }
                    _ => false,
                }
            }
            _ => false,
        }
    }

    fn recover(&mut self, token: &Token) {
        trace!(text = %token.text, "builder recovery");
        self.errors.push(SyntaxError {
            message: format!("unexpected token '{}'", token.text),
            offset: token.offset,
        });
        self.stack.clear();
        // Restart from an identifier so completion still has a prefix.
        if token.kind.is_name()
            || (token.kind == TokenKind::Error && text_utils::is_identifier(&token.text))
        {
            let id = self.tree.alloc(ExprKind::Variable, vec![token.clone()]);
            self.stack.push(id);
        }
    }

    /// Flush the stack into one tree and return the build.
    pub fn finish(mut self) -> Build {
        loop {
            self.join(None);
            self.reduce();
            self.join(None);
            if !self.finalize_step() {
                break;
            }
        }
        let root = self.top();
        self.tree.set_root(root);
        Build {
            tree: self.tree,
            errors: self.errors,
        }
    }
}

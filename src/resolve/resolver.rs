//! The expression resolver.
//!
//! Walks a finished expression tree bottom-up against the symbol index and
//! computes either a concrete result type (for a fully resolvable
//! expression) or a ranked candidate list (when the cursor sits on the
//! trailing, still-typed segment).
//!
//! Dot chains follow a small state machine: a bare first segment is
//! tried as local binding, then field, then package, then class; each
//! further segment moves package → subpackage/class, type → inner
//! class/static member, value → instance member. Once a chain passes
//! through a non-static member access, static-only filtering stays off for
//! the rest of that chain.

use text_size::{TextRange, TextSize};
use tracing::trace;

use crate::base::{STRING_CLASS, Modifiers};
use crate::index::SymbolIndex;
use crate::parser::{ExprId, ExprKind, ExprTree, LiteralKind, TokenKind};
use crate::symbols::{
    ClassBody, ClassSymbol, PackageSymbol, ResolvedType, TypeName, primitive,
};

use super::assign::is_assignable;
use super::candidates::{Candidate, CandidateList};
use super::promote::{
    PrimitiveKind, binary_numeric_promotion, unary_numeric_promotion,
};

/// External collaborator: the names declared in the scope enclosing the
/// cursor (method parameters, locals). The editor side implements this.
pub trait LocalProvider {
    fn find_local(&self, name: &str) -> Option<TypeName>;
}

/// Where the cursor sits: the enclosing class (if any) and whether the
/// surrounding code is a static context.
#[derive(Clone, Default)]
pub struct CursorContext {
    pub enclosing_class: Option<ClassSymbol>,
    pub static_context: bool,
}

/// What a resolution produced.
#[derive(Debug)]
pub enum Resolution {
    /// The expression has a concrete result type.
    Type(ResolvedType),
    /// The cursor position produced completion candidates.
    Candidates(CandidateList),
    /// Nothing resolvable (empty input, unknown names).
    None,
}

/// One step of a dot-chain resolution.
enum Step {
    Package(PackageSymbol),
    /// A type position: static members and inner classes are accessible.
    Class(ClassSymbol),
    /// A value: instance members are accessible.
    Value(ResolvedType),
}

/// The resolver. Cheap to construct; build one per request.
pub struct Resolver<'a> {
    index: &'a SymbolIndex,
    context: CursorContext,
    locals: Option<&'a dyn LocalProvider>,
}

impl<'a> Resolver<'a> {
    pub fn new(index: &'a SymbolIndex, context: CursorContext) -> Self {
        Self {
            index,
            context,
            locals: None,
        }
    }

    pub fn with_locals(mut self, locals: &'a dyn LocalProvider) -> Self {
        self.locals = Some(locals);
        self
    }

    /// Resolve a tree against the cursor position: a candidate list when
    /// the cursor terminates the expression, a result type otherwise.
    pub fn resolve(&self, tree: &mut ExprTree, cursor: TextSize) -> Resolution {
        let Some(root) = tree.root() else {
            return Resolution::None;
        };
        if let Some(target) = self.completion_target(tree, root, cursor) {
            let list = self.candidates_at(tree, target);
            return match list {
                Some(list) if !list.is_empty() => Resolution::Candidates(list),
                _ => Resolution::None,
            };
        }
        match self.resolve_value(tree, root) {
            Some(ty) => Resolution::Type(ty),
            None => Resolution::None,
        }
    }

    // =========================================================================
    // Completion target discovery
    // =========================================================================

    /// The node the cursor is still typing, if any: the trailing segment of
    /// the rightmost name position ending exactly at the cursor.
    fn completion_target(
        &self,
        tree: &ExprTree,
        id: ExprId,
        cursor: TextSize,
    ) -> Option<ExprId> {
        match tree.kind(id) {
            // A dotted type (`new java.util.Da`) completes like a chain.
            ExprKind::Dot | ExprKind::Type if !tree.children(id).is_empty() => {
                let last = *tree.children(id).last()?;
                if self.is_open_name(tree, last, cursor) {
                    Some(id)
                } else {
                    self.completion_target(tree, last, cursor)
                }
            }
            ExprKind::Variable | ExprKind::Type => {
                self.is_open_name(tree, id, cursor).then_some(id)
            }
            ExprKind::Operator
            | ExprKind::UnaryOperator
            | ExprKind::Conversion
            | ExprKind::InstanceOf
            | ExprKind::Method
            | ExprKind::Constructor
            | ExprKind::New
            | ExprKind::Array
            | ExprKind::Parenthesis => {
                let last = *tree.children(id).last()?;
                self.completion_target(tree, last, cursor)
            }
            _ => None,
        }
    }

    /// A name node the cursor touches: empty (freshly opened dot) or
    /// ending exactly at the cursor.
    fn is_open_name(&self, tree: &ExprTree, id: ExprId, cursor: TextSize) -> bool {
        if !matches!(tree.kind(id), ExprKind::Variable | ExprKind::Type) {
            return false;
        }
        let node = tree.node(id);
        match node.tokens.last() {
            None => true,
            Some(token) => token.text.is_empty() || token.end() == cursor,
        }
    }

    // =========================================================================
    // Candidate assembly
    // =========================================================================

    fn candidates_at(&self, tree: &ExprTree, target: ExprId) -> Option<CandidateList> {
        match tree.kind(target) {
            ExprKind::Dot | ExprKind::Type if !tree.children(target).is_empty() => {
                let children = tree.children(target).to_vec();
                let (&last, receiver) = children.split_last()?;
                let step = self.resolve_chain(tree, receiver)?;
                let prefix = tree.node(last).text();
                let range = self.replace_range(tree, last);
                let mut list = CandidateList::new(&prefix, range);
                self.member_candidates(&step, &prefix, &mut list);
                list.finish();
                trace!(prefix = %prefix, count = list.len(), "member candidates");
                Some(list)
            }
            ExprKind::Variable | ExprKind::Type => {
                let prefix = tree.node(target).text();
                let range = self.replace_range(tree, target);
                let mut list = CandidateList::new(&prefix, range);
                let type_position = tree.node(target).parent.is_some_and(|p| {
                    matches!(tree.kind(p), ExprKind::New | ExprKind::Constructor)
                });
                if type_position {
                    self.type_candidates(&prefix, &mut list);
                } else {
                    self.scope_candidates(&prefix, &mut list);
                }
                list.finish();
                trace!(prefix = %prefix, count = list.len(), "scope candidates");
                Some(list)
            }
            _ => None,
        }
    }

    fn replace_range(&self, tree: &ExprTree, id: ExprId) -> TextRange {
        tree.range(id)
            .unwrap_or_else(|| TextRange::empty(TextSize::new(0)))
    }

    /// Members reachable through a resolved receiver step.
    fn member_candidates(&self, step: &Step, prefix: &str, list: &mut CandidateList) {
        match step {
            Step::Package(package) => {
                let child_prefix = format!("{}.{prefix}", package.name());
                for sub in self.index.find_packages(&child_prefix, false, false) {
                    list.push(Candidate::from_package(&sub));
                }
                for class in self.index.find_classes(Some(package), prefix, false) {
                    list.push(Candidate::from_class(&class));
                }
            }
            Step::Class(class) => {
                for field in self.index.find_fields(class, prefix, false, true, false) {
                    list.push(Candidate::from_field(&field));
                }
                for method in self.index.find_methods(class, prefix, false, true, false) {
                    list.push(Candidate::from_method(&method));
                }
                // Inner classes are named `Outer$Inner` in the index.
                let inner_prefix = format!("{}${prefix}", class.name());
                for inner in self.index.find_classes(None, &inner_prefix, false) {
                    if inner.package() == class.package() {
                        list.push(Candidate::from_class(&inner));
                    }
                }
            }
            Step::Value(ty) => {
                if ty.is_array() {
                    if "length".starts_with(prefix) {
                        list.push(
                            Candidate::new("length", super::CandidateKind::Field)
                                .with_detail("int"),
                        );
                    }
                    return;
                }
                let Some(class) = ty.class() else { return };
                for field in self.index.find_fields(class, prefix, false, false, false) {
                    list.push(Candidate::from_field(&field));
                }
                for method in self.index.find_methods(class, prefix, false, false, false) {
                    list.push(Candidate::from_method(&method));
                }
            }
        }
    }

    /// Bare-prefix candidates: members of the enclosing class, then
    /// packages and classes.
    fn scope_candidates(&self, prefix: &str, list: &mut CandidateList) {
        if let Some(enclosing) = &self.context.enclosing_class {
            let static_only = self.context.static_context;
            for field in self
                .index
                .find_fields(enclosing, prefix, false, static_only, true)
            {
                list.push(Candidate::from_field(&field));
            }
            for method in self
                .index
                .find_methods(enclosing, prefix, false, static_only, true)
            {
                list.push(Candidate::from_method(&method));
            }
        }
        if !prefix.is_empty() {
            for package in self.index.find_packages(prefix, false, false) {
                list.push(Candidate::from_package(&package));
            }
        }
        for class in self.index.find_classes(None, prefix, false) {
            list.push(Candidate::from_class(&class));
        }
    }

    /// Candidates in type position (after `new`): classes, packages, and,
    /// for an exact class name, its constructors.
    fn type_candidates(&self, prefix: &str, list: &mut CandidateList) {
        if !prefix.is_empty() {
            for package in self.index.find_packages(prefix, false, false) {
                list.push(Candidate::from_package(&package));
            }
        }
        for class in self.index.find_classes(None, prefix, false) {
            list.push(Candidate::from_class(&class));
        }
        for class in self.index.find_classes(None, prefix, true) {
            for constructor in class.constructors() {
                list.push(Candidate::from_constructor(constructor, &class));
            }
        }
    }

    // =========================================================================
    // Chain resolution
    // =========================================================================

    fn resolve_chain(&self, tree: &ExprTree, segments: &[ExprId]) -> Option<Step> {
        let (&first, rest) = segments.split_first()?;
        let mut step = self.resolve_first_segment(tree, first)?;
        for &segment in rest {
            step = self.advance(tree, step, segment)?;
        }
        Some(step)
    }

    /// The head of a chain (or a bare name): local binding, then field on
    /// the enclosing class, then package, then class, in that order.
    fn resolve_first_segment(&self, tree: &ExprTree, id: ExprId) -> Option<Step> {
        match tree.kind(id) {
            ExprKind::Variable => {
                let name = tree.node(id).text();
                match name.as_str() {
                    "this" => {
                        let class = self.context.enclosing_class.clone()?;
                        return Some(Step::Value(ResolvedType::of(class)));
                    }
                    "super" => {
                        let class = self.context.enclosing_class.clone()?;
                        let parent = class.superclass().cloned()?;
                        let parent = self.index.find_exact_class(&parent)?;
                        return Some(Step::Value(ResolvedType::of(parent)));
                    }
                    _ => {}
                }
                if let Some(locals) = self.locals {
                    if let Some(ty) = locals.find_local(&name) {
                        return Some(Step::Value(self.instantiate(&ty)?));
                    }
                }
                if let Some(enclosing) = &self.context.enclosing_class {
                    let fields = self.index.find_fields(
                        enclosing,
                        &name,
                        true,
                        self.context.static_context,
                        true,
                    );
                    if let Some(field) = fields.first() {
                        return Some(Step::Value(self.instantiate(&field.ty)?));
                    }
                }
                if let Some(package) = self.index.find_exact_package(&name) {
                    return Some(Step::Package(package));
                }
                self.find_class_by_name(&name).map(Step::Class)
            }
            ExprKind::Method => {
                let enclosing = self.context.enclosing_class.clone()?;
                let name = method_name(tree, id);
                let ty = self.resolve_call(
                    tree,
                    &enclosing,
                    &name,
                    self.context.static_context,
                    tree.children(id),
                )?;
                Some(Step::Value(ty))
            }
            _ => self.peek_value(tree, id).map(Step::Value),
        }
    }

    /// One `.` hop. Packages alternate into subpackages or classes; a type
    /// position reaches inner classes and static members; a value reaches
    /// instance members, and static-only stays off from then on.
    fn advance(&self, tree: &ExprTree, step: Step, segment: ExprId) -> Option<Step> {
        match step {
            Step::Package(package) => match tree.kind(segment) {
                ExprKind::Variable => {
                    let name = tree.node(segment).text();
                    let qualified = format!("{}.{name}", package.name());
                    if let Some(sub) = self.index.find_exact_package(&qualified) {
                        return Some(Step::Package(sub));
                    }
                    self.index.find_exact_class(&qualified).map(Step::Class)
                }
                _ => None,
            },
            Step::Class(class) => match tree.kind(segment) {
                ExprKind::Variable => {
                    let name = tree.node(segment).text();
                    let inner = format!("{}${name}", class.full_name());
                    if let Some(inner) = self.index.find_exact_class(&inner) {
                        return Some(Step::Class(inner));
                    }
                    let fields = self.index.find_fields(&class, &name, true, true, false);
                    let field = fields.first()?;
                    Some(Step::Value(self.instantiate(&field.ty)?))
                }
                ExprKind::Method => {
                    let name = method_name(tree, segment);
                    let ty =
                        self.resolve_call(tree, &class, &name, true, tree.children(segment))?;
                    Some(Step::Value(ty))
                }
                _ => None,
            },
            Step::Value(ty) => {
                if ty.is_array() {
                    // The only member of an array is `length`.
                    if tree.kind(segment) == ExprKind::Variable
                        && tree.node(segment).text() == "length"
                    {
                        return Some(Step::Value(ResolvedType::of(primitive("int")?)));
                    }
                    return None;
                }
                let class = ty.class()?.clone();
                match tree.kind(segment) {
                    ExprKind::Variable => {
                        let name = tree.node(segment).text();
                        let fields = self.index.find_fields(&class, &name, true, false, false);
                        let field = fields.first()?;
                        Some(Step::Value(self.instantiate(&field.ty)?))
                    }
                    ExprKind::Method => {
                        let name = method_name(tree, segment);
                        let ty = self.resolve_call(
                            tree,
                            &class,
                            &name,
                            false,
                            tree.children(segment),
                        )?;
                        Some(Step::Value(ty))
                    }
                    _ => None,
                }
            }
        }
    }

    // =========================================================================
    // Value resolution
    // =========================================================================

    /// Resolve the type of a sub-expression and record the result (and the
    /// results for every descendant that resolved) in the tree.
    fn resolve_value(&self, tree: &mut ExprTree, id: ExprId) -> Option<ResolvedType> {
        let ty = self.peek_value(tree, id);
        self.annotate(tree, id);
        ty
    }

    /// Store the computed type on `id` and its descendants. Best-effort:
    /// nodes that do not resolve keep `ty = None`.
    fn annotate(&self, tree: &mut ExprTree, id: ExprId) {
        let ty = self.peek_value(tree, id);
        tree.node_mut(id).ty = ty;
        for child in tree.children(id).to_vec() {
            self.annotate(tree, child);
        }
    }

    /// Bottom-up type computation for a sub-expression.
    fn peek_value(&self, tree: &ExprTree, id: ExprId) -> Option<ResolvedType> {
        match tree.kind(id) {
            ExprKind::Constant(kind) => self.literal_type(kind),
            ExprKind::Variable | ExprKind::Method => {
                match self.resolve_first_segment(tree, id)? {
                    Step::Value(ty) => Some(ty),
                    _ => None,
                }
            }
            ExprKind::Dot => {
                let segments = tree.children(id).to_vec();
                match self.resolve_chain(tree, &segments)? {
                    Step::Value(ty) => Some(ty),
                    _ => None,
                }
            }
            ExprKind::Parenthesis => {
                let child = *tree.children(id).first()?;
                self.peek_value(tree, child)
            }
            ExprKind::Operator => self.operator_type(tree, id),
            ExprKind::UnaryOperator => self.unary_type(tree, id),
            ExprKind::InstanceOf => Some(ResolvedType::of(primitive("boolean")?)),
            ExprKind::Conversion => {
                let ty = *tree.children(id).first()?;
                self.type_node(tree, ty)
            }
            ExprKind::Constructor => {
                let children = tree.children(id);
                let (&type_child, args) = children.split_first()?;
                let ty = self.type_node(tree, type_child)?;
                let class = ty.class()?.clone();
                // Check the argument list against the declared constructors;
                // a class without any declared constructor has the implicit
                // zero-argument one.
                if !class.constructors().is_empty() {
                    let arg_types = self.argument_types(tree, args);
                    let matching = filter_constructors(
                        self.index,
                        class.constructors(),
                        &arg_types,
                        false,
                    );
                    if matching.is_empty() {
                        trace!(class = %class, "no constructor overload matched");
                    }
                }
                Some(ty)
            }
            ExprKind::New => {
                // Array creation: the size groups add one depth per bracket.
                let children = tree.children(id);
                let (&type_child, rest) = children.split_first()?;
                let base = self.type_node(tree, type_child)?;
                let extra: u32 = rest
                    .iter()
                    .filter(|&&c| tree.kind(c) == ExprKind::Array)
                    .count() as u32;
                match base {
                    ResolvedType::Instance { class, array_depth } => {
                        Some(ResolvedType::array_of(class, array_depth + extra))
                    }
                    ResolvedType::Null => None,
                }
            }
            ExprKind::Array => {
                let children = tree.children(id);
                if children.len() != 2 {
                    return None;
                }
                let (receiver_id, index_id) = (children[0], children[1]);
                let receiver = self.peek_value(tree, receiver_id)?;
                let index_ty = self.peek_value(tree, index_id)?;
                if !self.is_integral(&index_ty) {
                    return None;
                }
                match receiver {
                    ResolvedType::Instance { class, array_depth } if array_depth > 0 => {
                        Some(ResolvedType::array_of(class, array_depth - 1))
                    }
                    _ => None,
                }
            }
            _ => None,
        }
    }

    fn operator_type(&self, tree: &ExprTree, id: ExprId) -> Option<ResolvedType> {
        let op = tree.node(id).tokens.first()?.kind;
        let children = tree.children(id);
        if children.len() != 2 {
            return None;
        }
        let (lhs, rhs) = (children[0], children[1]);

        // Assignment yields the left operand's type.
        if op.is_assignment() {
            return self.peek_value(tree, lhs);
        }

        match op {
            // Ternary: `cond ? a : b` arrives as `?` over (cond, `:`(a, b)).
            TokenKind::Question => {
                let colon = rhs;
                if tree.kind(colon) == ExprKind::Operator
                    && tree.node(colon).tokens.first().map(|t| t.kind) == Some(TokenKind::Colon)
                {
                    let branches = tree.children(colon);
                    if branches.len() == 2 {
                        let a = self.peek_value(tree, branches[0]);
                        let b = self.peek_value(tree, branches[1]);
                        return self.common_type(a, b);
                    }
                }
                None
            }
            TokenKind::Colon => {
                let a = self.peek_value(tree, lhs);
                let b = self.peek_value(tree, rhs);
                self.common_type(a, b)
            }
            TokenKind::EqEq
            | TokenKind::BangEq
            | TokenKind::Lt
            | TokenKind::Gt
            | TokenKind::LtEq
            | TokenKind::GtEq
            | TokenKind::AmpAmp
            | TokenKind::PipePipe => Some(ResolvedType::of(primitive("boolean")?)),
            _ => {
                let a = self.peek_value(tree, lhs);
                let b = self.peek_value(tree, rhs);
                // String concatenation wins over numeric promotion.
                if op == TokenKind::Plus
                    && (self.is_string(a.as_ref()) || self.is_string(b.as_ref()))
                {
                    return self.string_type();
                }
                let pa = self.primitive_kind(a.as_ref()?)?;
                let pb = self.primitive_kind(b.as_ref()?)?;
                let result = binary_numeric_promotion(pa, pb)?;
                Some(ResolvedType::of(primitive(result.name())?))
            }
        }
    }

    fn unary_type(&self, tree: &ExprTree, id: ExprId) -> Option<ResolvedType> {
        let op = tree.node(id).tokens.first()?.kind;
        let operand = *tree.children(id).first()?;
        let ty = self.peek_value(tree, operand)?;
        match op {
            TokenKind::Bang => Some(ResolvedType::of(primitive("boolean")?)),
            TokenKind::PlusPlus | TokenKind::MinusMinus => Some(ty),
            _ => {
                let kind = self.primitive_kind(&ty)?;
                let promoted = unary_numeric_promotion(kind)?;
                Some(ResolvedType::of(primitive(promoted.name())?))
            }
        }
    }

    // =========================================================================
    // Call and overload filtering
    // =========================================================================

    fn resolve_call(
        &self,
        tree: &ExprTree,
        class: &ClassSymbol,
        name: &str,
        static_only: bool,
        args: &[ExprId],
    ) -> Option<ResolvedType> {
        let methods = self.index.find_methods(class, name, true, static_only, false);
        let arg_types = self.argument_types(tree, args);
        let matching = filter_overloads(self.index, &methods, &arg_types, false);
        let method = matching.first()?;
        self.instantiate(&method.return_type)
    }

    /// Argument types, resolved best-effort: an unresolvable argument is
    /// kept as a wildcard so it does not reject every overload.
    fn argument_types(&self, tree: &ExprTree, args: &[ExprId]) -> Vec<Option<ResolvedType>> {
        args.iter()
            .map(|&arg| self.peek_value(tree, arg))
            .collect()
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    fn literal_type(&self, kind: LiteralKind) -> Option<ResolvedType> {
        match kind {
            LiteralKind::Int => Some(ResolvedType::of(primitive("int")?)),
            LiteralKind::Long => Some(ResolvedType::of(primitive("long")?)),
            LiteralKind::Float => Some(ResolvedType::of(primitive("float")?)),
            LiteralKind::Double => Some(ResolvedType::of(primitive("double")?)),
            LiteralKind::Char => Some(ResolvedType::of(primitive("char")?)),
            LiteralKind::Boolean => Some(ResolvedType::of(primitive("boolean")?)),
            LiteralKind::String => self.string_type(),
            LiteralKind::Null => Some(ResolvedType::Null),
        }
    }

    /// The string class from the index, or a detached stand-in so string
    /// typing works before the standard classes are indexed.
    fn string_type(&self) -> Option<ResolvedType> {
        let class = self.index.find_exact_class(STRING_CLASS).unwrap_or_else(|| {
            ClassSymbol::new(
                "String",
                "java.lang",
                Modifiers::new(Modifiers::PUBLIC | Modifiers::FINAL),
                ClassBody::default(),
            )
        });
        Some(ResolvedType::of(class))
    }

    /// Turn a serialized type reference into a resolved one.
    fn instantiate(&self, ty: &TypeName) -> Option<ResolvedType> {
        let class = self.find_class_by_name(&ty.name)?;
        Some(ResolvedType::array_of(class, ty.array_depth))
    }

    /// Class lookup by name: primitives, exact full names, the enclosing
    /// package, then a unique global simple name.
    fn find_class_by_name(&self, name: &str) -> Option<ClassSymbol> {
        if let Some(p) = primitive(name) {
            return Some(p);
        }
        if name.contains('.') {
            return self.index.find_exact_class(name);
        }
        if let Some(enclosing) = &self.context.enclosing_class {
            if !enclosing.package().is_empty() {
                let qualified = format!("{}.{name}", enclosing.package());
                if let Some(class) = self.index.find_exact_class(&qualified) {
                    return Some(class);
                }
            }
        }
        self.index
            .find_classes(None, name, true)
            .into_iter()
            .next()
    }

    /// The type named by a `Type` node: concatenated name segments plus
    /// one array depth per bracket.
    fn type_node(&self, tree: &ExprTree, id: ExprId) -> Option<ResolvedType> {
        let mut tokens = Vec::new();
        tree.collect_tokens(id, &mut tokens);
        let mut name = String::new();
        let mut depth = 0u32;
        for token in &tokens {
            match token.kind {
                kind if kind.is_name() => {
                    if !name.is_empty() {
                        name.push('.');
                    }
                    name.push_str(&token.text);
                }
                TokenKind::LBracket => depth += 1,
                _ => {}
            }
        }
        if name.is_empty() {
            return None;
        }
        let class = self.find_class_by_name(&name)?;
        Some(ResolvedType::array_of(class, depth))
    }

    fn primitive_kind(&self, ty: &ResolvedType) -> Option<PrimitiveKind> {
        if !ty.is_primitive() {
            return None;
        }
        PrimitiveKind::from_name(ty.class()?.name())
    }

    fn is_integral(&self, ty: &ResolvedType) -> bool {
        self.primitive_kind(ty).is_some_and(|k| k.is_integral())
    }

    fn is_string(&self, ty: Option<&ResolvedType>) -> bool {
        match ty {
            Some(ResolvedType::Instance { class, array_depth }) => {
                *array_depth == 0 && class.full_name().as_ref() == STRING_CLASS
            }
            _ => false,
        }
    }

    /// The common type of two ternary branches.
    fn common_type(
        &self,
        a: Option<ResolvedType>,
        b: Option<ResolvedType>,
    ) -> Option<ResolvedType> {
        match (a, b) {
            (Some(a), Some(b)) => {
                if a == b {
                    return Some(a);
                }
                if let (Some(pa), Some(pb)) =
                    (self.primitive_kind(&a), self.primitive_kind(&b))
                {
                    let common = binary_numeric_promotion(pa, pb)?;
                    return Some(ResolvedType::of(primitive(common.name())?));
                }
                // One branch may be the null literal.
                match (&a, &b) {
                    (ResolvedType::Null, _) => Some(b),
                    (_, ResolvedType::Null) => Some(a),
                    _ => Some(a),
                }
            }
            (Some(a), None) => Some(a),
            (None, Some(b)) => Some(b),
            (None, None) => None,
        }
    }
}

fn method_name(tree: &ExprTree, id: ExprId) -> String {
    tree.node(id)
        .tokens
        .iter()
        .filter(|t| t.kind.is_name())
        .map(|t| t.text.as_ref())
        .collect()
}

/// How well an argument list fits a parameter list.
#[derive(Clone, Copy, PartialEq, Eq)]
enum MatchQuality {
    No,
    Compatible,
    Exact,
}

fn params_match(
    index: &SymbolIndex,
    parameters: &[crate::symbols::Parameter],
    args: &[Option<ResolvedType>],
    accept_more_parameters: bool,
) -> MatchQuality {
    let count_ok = parameters.len() == args.len()
        || (accept_more_parameters && parameters.len() >= args.len());
    if !count_ok {
        return MatchQuality::No;
    }

    let mut exact = parameters.len() == args.len();
    for (arg, parameter) in args.iter().zip(parameters) {
        match arg {
            Some(ty) => {
                if ty.to_type_name().as_ref() == Some(&parameter.ty) {
                    continue;
                }
                exact = false;
                if !is_assignable(index, ty, &parameter.ty) {
                    return MatchQuality::No;
                }
            }
            None => {
                // An unresolvable argument never disqualifies a candidate.
                exact = false;
            }
        }
    }
    if exact {
        MatchQuality::Exact
    } else {
        MatchQuality::Compatible
    }
}

/// Filter method overloads by argument compatibility.
///
/// The first exact-parameter-type match clears previously accepted
/// compatible candidates; from then on only exact matches are kept. With
/// `accept_more_parameters`, overloads with more parameters than supplied
/// arguments stay in (the caller is still typing the argument list).
pub fn filter_overloads<'m>(
    index: &SymbolIndex,
    methods: &'m [crate::symbols::MethodSymbol],
    args: &[Option<ResolvedType>],
    accept_more_parameters: bool,
) -> Vec<&'m crate::symbols::MethodSymbol> {
    let mut best = Vec::new();
    let mut exact_found = false;
    for method in methods {
        match params_match(index, &method.parameters, args, accept_more_parameters) {
            MatchQuality::Exact => {
                if !exact_found {
                    best.clear();
                    exact_found = true;
                }
                best.push(method);
            }
            MatchQuality::Compatible if !exact_found => best.push(method),
            _ => {}
        }
    }
    best
}

/// Constructor counterpart of [`filter_overloads`].
pub fn filter_constructors<'c>(
    index: &SymbolIndex,
    constructors: &'c [crate::symbols::ConstructorSymbol],
    args: &[Option<ResolvedType>],
    accept_more_parameters: bool,
) -> Vec<&'c crate::symbols::ConstructorSymbol> {
    let mut best = Vec::new();
    let mut exact_found = false;
    for constructor in constructors {
        match params_match(index, &constructor.parameters, args, accept_more_parameters) {
            MatchQuality::Exact => {
                if !exact_found {
                    best.clear();
                    exact_found = true;
                }
                best.push(constructor);
            }
            MatchQuality::Compatible if !exact_found => best.push(constructor),
            _ => {}
        }
    }
    best
}

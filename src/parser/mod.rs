//! Lexing and expression-tree building.
//!
//! The lexer produces `(kind, text, offset)` tokens; the builder consumes
//! one batch of tokens (typically the statement prefix left of the caret)
//! and produces exactly one expression tree per scan. The parse is
//! deliberately permissive: it exists to feed completion, not to validate
//! source.

pub mod builder;
pub mod expr;
pub mod lexer;
pub mod token_kind;

pub use builder::{Build, ExprBuilder, SyntaxError};
pub use expr::{ExprId, ExprKind, ExprNode, ExprTree, LiteralKind};
pub use lexer::{Lexer, Token, tokenize};
pub use token_kind::{Prec, TokenKind};

//! # javelin-base
//!
//! Core library for Java symbol indexing, expression parsing, and code
//! completion.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! resolve   → expression resolver (types, completion candidates)
//!   ↓
//! parser    → Logos lexer, expression-tree builder
//!   ↓
//! store     → persistent symbol store (skeleton + body files)
//!   ↓
//! index     → in-memory symbol index (sorted arrays, binary search)
//!   ↓
//! symbols   → symbol model (classes, members, packages, types)
//!   ↓
//! core      → string interner, identifier utilities
//!   ↓
//! base      → primitives (modifier bitset, offsets, well-known names)
//! ```

// ============================================================================
// MODULES (dependency order: base → core → symbols → index → store → parser → resolve)
// ============================================================================

/// Foundation types: modifier bitset, source offsets, well-known names
pub mod base;

/// Core utilities: string interning, identifier text helpers
pub mod core;

/// Symbol model: classes, fields, methods, constructors, packages, types
pub mod symbols;

/// In-memory symbol index with binary search and incremental update
pub mod index;

/// Persistent symbol store: two-section file format with lazy bodies
pub mod store;

/// Parser: Logos lexer and the expression-tree builder
pub mod parser;

/// Expression resolver: result types and completion candidates
pub mod resolve;

// Re-export foundation types
pub use base::{Modifiers, TextRange, TextSize};
pub use crate::core::Interner;
pub use index::SymbolIndex;
pub use parser::{ExprBuilder, ExprTree, Lexer, Token, TokenKind};
pub use resolve::{Candidate, CandidateList, CursorContext, Resolution, Resolver};
pub use store::{StoreError, SymbolStore};
pub use symbols::{
    ClassProvider, ClassSymbol, ConstructorSymbol, FieldSymbol, MethodSymbol, PackageSymbol,
    ResolvedType, TypeName,
};

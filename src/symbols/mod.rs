//! Symbol model: immutable value descriptions of classes, fields, methods,
//! constructors, packages, and types.
//!
//! Symbols are created by an index rebuild or by deserializing a persisted
//! record, and never mutated afterwards; updates replace whole symbols.
//! The one exception is a class body, which transitions once from unloaded
//! to loaded (see [`ClassSymbol::body`]).
//!
//! Cross-symbol references (superclass, interfaces, enclosing class) are
//! stored as *names* and resolved through the [`crate::index::SymbolIndex`]
//! on demand, so the model itself is cycle-free.

mod class;
mod member;
mod package;
mod provider;
mod type_name;

pub use class::{BodySource, ClassBody, ClassSymbol};
pub use member::{ConstructorSymbol, FieldSymbol, MethodSymbol, Parameter};
pub use package::PackageSymbol;
pub use provider::{ClassProvider, ProviderSet, VecProvider};
pub use type_name::{ResolvedType, TypeName};

use std::sync::OnceLock;

use crate::base::{Modifiers, PRIMITIVE_NAMES};

/// The primitive types as packageless class symbols.
///
/// Built once; every clone is an `Arc` bump.
pub fn primitives() -> &'static [ClassSymbol] {
    static PRIMITIVES: OnceLock<Vec<ClassSymbol>> = OnceLock::new();
    PRIMITIVES.get_or_init(|| {
        PRIMITIVE_NAMES
            .iter()
            .map(|name| {
                ClassSymbol::new(
                    *name,
                    "",
                    Modifiers::new(Modifiers::PUBLIC | Modifiers::FINAL),
                    ClassBody::default(),
                )
            })
            .collect()
    })
}

/// Look up a primitive class symbol by name.
pub fn primitive(name: &str) -> Option<ClassSymbol> {
    primitives().iter().find(|c| c.name().as_ref() == name).cloned()
}

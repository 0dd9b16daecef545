//! Foundation types shared by every layer.
//!
//! Source offsets come from the `text-size` crate; everything that points
//! into an edited buffer uses [`TextSize`]/[`TextRange`] so the host editor
//! can splice completion results without converting coordinate systems.

mod modifiers;

pub use modifiers::Modifiers;
pub use text_size::{TextRange, TextSize};

/// Names of the primitive types of the analyzed language.
///
/// These are pre-seeded into every [`crate::core::Interner`] and exposed as
/// packageless class symbols by [`crate::symbols::primitives`].
pub const PRIMITIVE_NAMES: [&str; 9] = [
    "boolean", "byte", "char", "double", "float", "int", "long", "short", "void",
];

/// Separator between an enclosing class and a nested class in a full name
/// (`p.Outer$Inner`).
pub const INNER_SEPARATOR: char = '$';

/// The root class every non-interface class ultimately extends.
pub const OBJECT_CLASS: &str = "java.lang.Object";

/// The string class, special-cased by `+` concatenation typing.
pub const STRING_CLASS: &str = "java.lang.String";

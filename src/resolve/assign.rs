//! Assignability: may an argument of one type flow into a parameter of
//! another?
//!
//! Covers widening numeric conversions, subtype and interface-
//! implementation checks through the index, and the `null` literal, which
//! is compatible with any reference or array type.

use crate::base::OBJECT_CLASS;
use crate::index::SymbolIndex;
use crate::symbols::{ClassSymbol, ResolvedType, TypeName};

use super::promote::{PrimitiveKind, is_widening};

fn is_primitive_name(name: &str) -> bool {
    PrimitiveKind::from_name(name).is_some()
}

/// Check whether `arg` is compatible with a parameter of type `param`.
pub fn is_assignable(index: &SymbolIndex, arg: &ResolvedType, param: &TypeName) -> bool {
    let param_primitive = param.array_depth == 0 && is_primitive_name(&param.name);

    let ResolvedType::Instance { class, array_depth } = arg else {
        // `null` fits any non-primitive parameter and any array parameter.
        return !param_primitive;
    };

    if param_primitive {
        let (Some(from), Some(to)) = (
            (*array_depth == 0)
                .then(|| PrimitiveKind::from_name(class.name()))
                .flatten(),
            PrimitiveKind::from_name(&param.name),
        ) else {
            return false;
        };
        return is_widening(from, to);
    }

    // Every reference type and every array fits Object.
    if param.array_depth == 0 && is_object(&param.name) {
        return *array_depth > 0 || !is_primitive_name(class.name());
    }

    if *array_depth != param.array_depth {
        return false;
    }
    is_subtype(index, class, &param.name)
}

fn is_object(name: &str) -> bool {
    name == OBJECT_CLASS || name == "Object"
}

/// Walk the superclass chain and the transitive interface closure of
/// `class`, looking for `target` (matched by full name, or by simple name
/// when `target` is unqualified).
pub fn is_subtype(index: &SymbolIndex, class: &ClassSymbol, target: &str) -> bool {
    let mut pending = vec![class.clone()];
    let mut guard = 0usize;
    while let Some(current) = pending.pop() {
        // A cyclic hierarchy would only come from corrupt input; bail out.
        guard += 1;
        if guard > 256 {
            return false;
        }
        if names_match(current.full_name(), current.name(), target) {
            return true;
        }
        for interface in current.interfaces() {
            if names_match(interface, simple_of(interface), target) {
                return true;
            }
            if let Some(parent) = index.find_exact_class(interface) {
                pending.push(parent);
            }
        }
        if let Some(superclass) = current.superclass() {
            if names_match(superclass, simple_of(superclass), target) {
                return true;
            }
            if let Some(parent) = index.find_exact_class(superclass) {
                pending.push(parent);
            }
        }
    }
    false
}

fn simple_of(full: &str) -> &str {
    full.rsplit(['.', '$']).next().unwrap_or(full)
}

fn names_match(full: &str, simple: &str, target: &str) -> bool {
    if target.contains('.') {
        full == target
    } else {
        simple == target
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::Modifiers;
    use crate::symbols::{ClassBody, primitive};

    fn class_with_super(name: &str, package: &str, superclass: Option<&str>) -> ClassSymbol {
        ClassSymbol::new(
            name,
            package,
            Modifiers::new(Modifiers::PUBLIC),
            ClassBody {
                superclass: superclass.map(Into::into),
                ..ClassBody::default()
            },
        )
    }

    fn value(class: &ClassSymbol) -> ResolvedType {
        ResolvedType::of(class.clone())
    }

    #[test]
    fn test_widening_primitive_argument() {
        let index = SymbolIndex::new();
        let int = primitive("int").unwrap();
        assert!(is_assignable(&index, &value(&int), &TypeName::scalar("long")));
        assert!(is_assignable(&index, &value(&int), &TypeName::scalar("int")));
        assert!(!is_assignable(&index, &value(&int), &TypeName::scalar("short")));
        assert!(!is_assignable(&index, &value(&int), &TypeName::scalar("boolean")));
    }

    #[test]
    fn test_null_fits_references_and_arrays() {
        let index = SymbolIndex::new();
        assert!(is_assignable(&index, &ResolvedType::Null, &TypeName::scalar("java.lang.String")));
        assert!(is_assignable(&index, &ResolvedType::Null, &TypeName::new("int", 1)));
        assert!(!is_assignable(&index, &ResolvedType::Null, &TypeName::scalar("int")));
    }

    #[test]
    fn test_subtype_through_superclass_chain() {
        let base = class_with_super("Base", "a", None);
        let mid = class_with_super("Mid", "a", Some("a.Base"));
        let leaf = class_with_super("Leaf", "a", Some("a.Mid"));
        let index = SymbolIndex::new();
        index.rebuild_from(vec![base, mid, leaf.clone()]);

        assert!(is_assignable(&index, &value(&leaf), &TypeName::scalar("a.Base")));
        assert!(!is_assignable(
            &index,
            &value(&index.find_exact_class("a.Base").unwrap()),
            &TypeName::scalar("a.Leaf")
        ));
    }

    #[test]
    fn test_interface_implementation() {
        let closeable = ClassSymbol::new(
            "Closeable",
            "io",
            Modifiers::new(Modifiers::PUBLIC | Modifiers::INTERFACE),
            ClassBody::default(),
        );
        let file = ClassSymbol::new(
            "File",
            "io",
            Modifiers::new(Modifiers::PUBLIC),
            ClassBody {
                interfaces: vec!["io.Closeable".into()],
                ..ClassBody::default()
            },
        );
        let index = SymbolIndex::new();
        index.rebuild_from(vec![closeable, file.clone()]);
        assert!(is_assignable(&index, &value(&file), &TypeName::scalar("io.Closeable")));
    }

    #[test]
    fn test_everything_reference_fits_object() {
        let index = SymbolIndex::new();
        let stray = class_with_super("Stray", "p", None);
        assert!(is_assignable(&index, &value(&stray), &TypeName::scalar(OBJECT_CLASS)));
        let int = primitive("int").unwrap();
        assert!(!is_assignable(&index, &value(&int), &TypeName::scalar(OBJECT_CLASS)));
        // but an int[] is an object
        assert!(is_assignable(
            &index,
            &ResolvedType::array_of(int, 1),
            &TypeName::scalar(OBJECT_CLASS)
        ));
    }

    #[test]
    fn test_array_depth_must_match() {
        let index = SymbolIndex::new();
        let s = class_with_super("String", "java.lang", None);
        assert!(is_assignable(
            &index,
            &ResolvedType::array_of(s.clone(), 1),
            &TypeName::new("java.lang.String", 1)
        ));
        assert!(!is_assignable(
            &index,
            &ResolvedType::array_of(s.clone(), 2),
            &TypeName::new("java.lang.String", 1)
        ));
        assert!(!is_assignable(&index, &value(&s), &TypeName::new("java.lang.String", 1)));
    }
}

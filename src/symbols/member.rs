//! Member symbols: fields, methods, constructors, and their parameters.
//!
//! All members carry the full name of their owning class (not a reference)
//! and a declaration offset into the defining source, used by the host for
//! go-to-declaration. The offset is informational only; `-1` means unknown.

use crate::base::Modifiers;
use crate::core::IStr;

use super::TypeName;

/// One ordered method/constructor parameter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Parameter {
    pub name: IStr,
    pub ty: TypeName,
}

impl Parameter {
    pub fn new(name: impl Into<IStr>, ty: TypeName) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

/// A field declaration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldSymbol {
    /// Full name of the declaring class.
    pub owner: IStr,
    pub name: IStr,
    pub modifiers: Modifiers,
    pub ty: TypeName,
    pub declaration_offset: i32,
}

impl FieldSymbol {
    pub fn new(
        owner: impl Into<IStr>,
        name: impl Into<IStr>,
        modifiers: Modifiers,
        ty: TypeName,
    ) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
            modifiers,
            ty,
            declaration_offset: -1,
        }
    }

    pub fn with_declaration_offset(mut self, offset: i32) -> Self {
        self.declaration_offset = offset;
        self
    }
}

/// A method declaration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MethodSymbol {
    /// Full name of the declaring class.
    pub owner: IStr,
    pub name: IStr,
    pub modifiers: Modifiers,
    pub parameters: Vec<Parameter>,
    pub return_type: TypeName,
    pub throws: Vec<IStr>,
    pub declaration_offset: i32,
}

impl MethodSymbol {
    pub fn new(
        owner: impl Into<IStr>,
        name: impl Into<IStr>,
        modifiers: Modifiers,
        parameters: Vec<Parameter>,
        return_type: TypeName,
    ) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
            modifiers,
            parameters,
            return_type,
            throws: Vec::new(),
            declaration_offset: -1,
        }
    }

    pub fn with_throws(mut self, throws: Vec<IStr>) -> Self {
        self.throws = throws;
        self
    }

    pub fn with_declaration_offset(mut self, offset: i32) -> Self {
        self.declaration_offset = offset;
        self
    }

    /// Override equality: same name and parameter types.
    ///
    /// Return type and throws are ignored; an override may narrow either.
    pub fn signature_equals(&self, other: &MethodSymbol) -> bool {
        self.name == other.name
            && self.parameters.len() == other.parameters.len()
            && self
                .parameters
                .iter()
                .zip(&other.parameters)
                .all(|(a, b)| a.ty == b.ty)
    }

    /// Format the parameter types for disambiguation display: `"(int, String)"`.
    pub fn parameter_display(&self) -> String {
        format_parameters(&self.parameters)
    }
}

/// A constructor declaration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConstructorSymbol {
    /// Full name of the declaring class.
    pub owner: IStr,
    pub modifiers: Modifiers,
    pub parameters: Vec<Parameter>,
    pub throws: Vec<IStr>,
    pub declaration_offset: i32,
}

impl ConstructorSymbol {
    pub fn new(owner: impl Into<IStr>, modifiers: Modifiers, parameters: Vec<Parameter>) -> Self {
        Self {
            owner: owner.into(),
            modifiers,
            parameters,
            throws: Vec::new(),
            declaration_offset: -1,
        }
    }

    pub fn with_throws(mut self, throws: Vec<IStr>) -> Self {
        self.throws = throws;
        self
    }

    pub fn with_declaration_offset(mut self, offset: i32) -> Self {
        self.declaration_offset = offset;
        self
    }

    pub fn parameter_display(&self) -> String {
        format_parameters(&self.parameters)
    }
}

fn format_parameters(parameters: &[Parameter]) -> String {
    let mut out = String::from("(");
    for (i, p) in parameters.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        out.push_str(p.ty.simple_name());
        for _ in 0..p.ty.array_depth {
            out.push_str("[]");
        }
    }
    out.push(')');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn method(name: &str, param_types: &[&str]) -> MethodSymbol {
        let parameters = param_types
            .iter()
            .map(|t| Parameter::new("p", TypeName::scalar(*t)))
            .collect();
        MethodSymbol::new(
            "com.example.A",
            name,
            Modifiers::new(Modifiers::PUBLIC),
            parameters,
            TypeName::scalar("void"),
        )
    }

    #[test]
    fn test_signature_equality_ignores_return_and_throws() {
        let a = method("run", &["int"]);
        let mut b = method("run", &["int"]);
        b.return_type = TypeName::scalar("java.lang.String");
        b.throws = vec!["java.io.IOException".into()];
        assert!(a.signature_equals(&b));
    }

    #[test]
    fn test_signature_differs_by_parameter_types() {
        assert!(!method("run", &["int"]).signature_equals(&method("run", &["long"])));
        assert!(!method("run", &["int"]).signature_equals(&method("run", &["int", "int"])));
        assert!(!method("run", &["int"]).signature_equals(&method("walk", &["int"])));
    }

    #[test]
    fn test_parameter_display_uses_simple_names() {
        let m = MethodSymbol::new(
            "com.example.A",
            "copy",
            Modifiers::new(Modifiers::PUBLIC),
            vec![
                Parameter::new("src", TypeName::new("java.lang.String", 1)),
                Parameter::new("count", TypeName::scalar("int")),
            ],
            TypeName::scalar("void"),
        );
        assert_eq!(m.parameter_display(), "(String[], int)");
    }
}

//! Shared fixtures for the integration tests.
#![allow(dead_code)]

use javelin::base::Modifiers;
use javelin::symbols::{
    ClassBody, ClassSymbol, ConstructorSymbol, FieldSymbol, MethodSymbol, Parameter, TypeName,
};

pub fn public() -> Modifiers {
    Modifiers::new(Modifiers::PUBLIC)
}

pub fn simple_class(name: &str, package: &str) -> ClassSymbol {
    ClassSymbol::new(name, package, public(), ClassBody::default())
}

pub fn method(
    owner: &str,
    name: &str,
    params: &[(&str, &str)],
    return_type: &str,
) -> MethodSymbol {
    let parameters = params
        .iter()
        .map(|(pname, ptype)| Parameter::new(*pname, TypeName::scalar(*ptype)))
        .collect();
    MethodSymbol::new(
        owner,
        name,
        public(),
        parameters,
        TypeName::scalar(return_type),
    )
}

pub fn field(owner: &str, name: &str, ty: &str) -> FieldSymbol {
    FieldSymbol::new(owner, name, public(), TypeName::scalar(ty))
}

/// `java.lang.Object` with the usual suspects.
pub fn object_class() -> ClassSymbol {
    ClassSymbol::new(
        "Object",
        "java.lang",
        public(),
        ClassBody {
            methods: vec![
                method("java.lang.Object", "toString", &[], "java.lang.String"),
                method("java.lang.Object", "hashCode", &[], "int"),
            ],
            ..ClassBody::default()
        },
    )
}

/// `java.lang.String` with a few members worth completing.
pub fn string_class() -> ClassSymbol {
    let owner = "java.lang.String";
    ClassSymbol::new(
        "String",
        "java.lang",
        Modifiers::new(Modifiers::PUBLIC | Modifiers::FINAL),
        ClassBody {
            superclass: Some("java.lang.Object".into()),
            fields: vec![],
            constructors: vec![ConstructorSymbol::new(owner, public(), vec![])],
            methods: vec![
                method(owner, "length", &[], "int"),
                method(owner, "charAt", &[("index", "int")], "char"),
                method(owner, "trim", &[], "java.lang.String"),
                method(
                    owner,
                    "substring",
                    &[("begin", "int"), ("end", "int")],
                    "java.lang.String",
                ),
            ],
            ..ClassBody::default()
        },
    )
}

/// `demo.Person { String name; String getName(); int getAge(); }`
pub fn person_class() -> ClassSymbol {
    let owner = "demo.Person";
    ClassSymbol::new(
        "Person",
        "demo",
        public(),
        ClassBody {
            superclass: Some("java.lang.Object".into()),
            fields: vec![field(owner, "name", "java.lang.String")],
            constructors: vec![
                ConstructorSymbol::new(owner, public(), vec![]),
                ConstructorSymbol::new(
                    owner,
                    public(),
                    vec![Parameter::new("name", TypeName::scalar("java.lang.String"))],
                ),
            ],
            methods: vec![
                method(owner, "getName", &[], "java.lang.String"),
                method(owner, "getAge", &[], "int"),
            ],
            ..ClassBody::default()
        },
    )
}

/// The classes most resolver tests need.
pub fn base_fixture() -> Vec<ClassSymbol> {
    vec![object_class(), string_class(), person_class()]
}

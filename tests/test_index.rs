//! Index invariants over rebuilds and incremental updates.

mod helpers;

use helpers::{base_fixture, field, public, simple_class};
use javelin::SymbolIndex;
use javelin::base::Modifiers;
use javelin::symbols::{ClassBody, ClassSymbol};

fn rebuilt(classes: Vec<ClassSymbol>) -> SymbolIndex {
    let index = SymbolIndex::new();
    index.rebuild_from(classes);
    index
}

#[test]
fn test_rebuild_then_lookup() {
    let index = rebuilt(base_fixture());
    assert_eq!(index.class_count(), 3);
    assert!(index.find_exact_class("demo.Person").is_some());
    assert!(index.find_exact_package("java.lang").is_some());
    assert!(index.find_exact_class("demo.Missing").is_none());
}

#[test]
fn test_name_order_is_deterministic_regardless_of_insertion() {
    let forward = rebuilt(vec![
        simple_class("Print", "p"),
        simple_class("Printer", "p"),
        simple_class("Process", "p"),
    ]);
    let backward = rebuilt(vec![
        simple_class("Process", "p"),
        simple_class("Printer", "p"),
        simple_class("Print", "p"),
    ]);
    let names = |index: &SymbolIndex| -> Vec<String> {
        index
            .find_classes(None, "Pr", false)
            .iter()
            .map(|c| c.name().to_string())
            .collect()
    };
    assert_eq!(names(&forward), ["Print", "Printer", "Process"]);
    assert_eq!(names(&forward), names(&backward));
}

#[test]
fn test_incremental_update_keeps_lookups_consistent() {
    let index = rebuilt(vec![
        simple_class("A", "p"),
        simple_class("B", "p"),
        simple_class("A", "q"),
        simple_class("C", "q"),
    ]);

    // Replace p.A with a version that has a field.
    let replacement = ClassSymbol::new(
        "A",
        "p",
        public(),
        ClassBody {
            fields: vec![field("p.A", "added", "int")],
            ..ClassBody::default()
        },
    );
    assert!(index.try_incremental_update(replacement));

    assert_eq!(index.class_count(), 4);
    assert_eq!(index.find_exact_class("p.A").unwrap().fields().len(), 1);
    // q.A is untouched.
    assert!(index.find_exact_class("q.A").unwrap().fields().is_empty());
    // Prefix search still sees both As.
    assert_eq!(index.find_classes(None, "A", true).len(), 2);
}

#[test]
fn test_incremental_update_of_unknown_class_requests_rebuild() {
    let index = rebuilt(vec![simple_class("A", "p")]);
    assert!(!index.try_incremental_update(simple_class("B", "p")));
    // The caller is expected to rebuild; doing so picks the class up.
    index.rebuild_from(vec![simple_class("A", "p"), simple_class("B", "p")]);
    assert!(index.find_exact_class("p.B").is_some());
}

#[test]
fn test_cross_package_field_visibility() {
    let base = ClassSymbol::new(
        "Base",
        "lib",
        public(),
        ClassBody {
            fields: vec![
                javelin::symbols::FieldSymbol::new(
                    "lib.Base",
                    "x",
                    Modifiers::new(Modifiers::PRIVATE),
                    javelin::symbols::TypeName::scalar("int"),
                ),
                javelin::symbols::FieldSymbol::new(
                    "lib.Base",
                    "y",
                    Modifiers::new(Modifiers::PROTECTED),
                    javelin::symbols::TypeName::scalar("int"),
                ),
            ],
            ..ClassBody::default()
        },
    );
    let derived = ClassSymbol::new(
        "Derived",
        "app",
        public(),
        ClassBody {
            superclass: Some("lib.Base".into()),
            ..ClassBody::default()
        },
    );
    let index = rebuilt(vec![base, derived.clone()]);

    let names: Vec<String> = index
        .find_fields(&derived, "", false, false, false)
        .iter()
        .map(|f| f.name.to_string())
        .collect();
    assert!(names.contains(&"y".to_string()));
    assert!(!names.contains(&"x".to_string()));
}

#[test]
fn test_method_search_walks_hierarchy() {
    let index = rebuilt(base_fixture());
    let person = index.find_exact_class("demo.Person").unwrap();
    // Inherited from Object through the superclass chain.
    let methods = index.find_methods(&person, "toString", true, false, false);
    assert_eq!(methods.len(), 1);
    // Own and inherited together under an empty prefix.
    let all = index.find_methods(&person, "", false, false, false);
    let names: Vec<String> = all.iter().map(|m| m.name.to_string()).collect();
    assert!(names.contains(&"getName".to_string()));
    assert!(names.contains(&"hashCode".to_string()));
}

#[test]
fn test_package_listing() {
    let index = rebuilt(vec![
        simple_class("A", "com.app.ui"),
        simple_class("B", "com.app.net"),
        simple_class("C", "com.other"),
    ]);
    let children: Vec<String> = index
        .find_packages("com.app", true, false)
        .iter()
        .map(|p| p.name().to_string())
        .collect();
    assert_eq!(children, ["com.app.net", "com.app.ui"]);

    let all: Vec<String> = index
        .find_packages("com.", false, true)
        .iter()
        .map(|p| p.name().to_string())
        .collect();
    assert_eq!(all, ["com.app", "com.app.net", "com.app.ui", "com.other"]);
}

//! Source text in, candidate list out: the full pipeline.

mod helpers;

use helpers::base_fixture;
use javelin::parser::{ExprBuilder, tokenize};
use javelin::resolve::{CursorContext, LocalProvider, Resolution, Resolver};
use javelin::symbols::TypeName;
use javelin::{SymbolIndex, TextSize};

/// The editor-side "declared locals" collaborator, as a fixed map.
struct Locals(Vec<(String, TypeName)>);

impl LocalProvider for Locals {
    fn find_local(&self, name: &str) -> Option<TypeName> {
        self.0
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, ty)| ty.clone())
    }
}

fn complete(index: &SymbolIndex, locals: &Locals, source: &str) -> Resolution {
    let tokens = tokenize(source);
    let mut build = ExprBuilder::process(&tokens);
    Resolver::new(index, CursorContext::default())
        .with_locals(locals)
        .resolve(&mut build.tree, TextSize::new(source.len() as u32))
}

#[test]
fn test_member_completion_after_call_chain() {
    // `obj` is bound to Person; `obj.getName().` completes on String.
    let index = SymbolIndex::new();
    index.rebuild_from(base_fixture());
    let locals = Locals(vec![("obj".into(), TypeName::scalar("demo.Person"))]);

    let Resolution::Candidates(list) = complete(&index, &locals, "obj.getName().") else {
        panic!("expected candidates");
    };

    let labels = list.labels();
    for expected in ["charAt", "length", "substring", "trim", "toString"] {
        assert!(labels.contains(&expected), "missing {expected} in {labels:?}");
    }
    assert_eq!(list.title, "*");
    // The replacement range is the empty trailing segment at the cursor.
    assert_eq!(list.replace_range.start(), TextSize::new(14));
    assert_eq!(list.replace_range.end(), TextSize::new(14));
}

#[test]
fn test_member_completion_with_prefix() {
    let index = SymbolIndex::new();
    index.rebuild_from(base_fixture());
    let locals = Locals(vec![("obj".into(), TypeName::scalar("demo.Person"))]);

    let Resolution::Candidates(list) = complete(&index, &locals, "obj.get") else {
        panic!("expected candidates");
    };
    assert_eq!(list.title, "get*");
    assert_eq!(list.labels(), ["getAge", "getName"]);

    // Overload details carry the formatted parameter types.
    let get_name = &list.items[1];
    assert_eq!(get_name.detail.as_deref(), Some("() : java.lang.String"));
}

#[test]
fn test_completion_survives_broken_prefix() {
    // The leading garbage cannot parse; completion restarts at `obj`.
    let index = SymbolIndex::new();
    index.rebuild_from(base_fixture());
    let locals = Locals(vec![("obj".into(), TypeName::scalar("demo.Person"))]);

    let Resolution::Candidates(list) = complete(&index, &locals, "int ) ; obj.get") else {
        panic!("expected candidates");
    };
    assert_eq!(list.labels(), ["getAge", "getName"]);
}

#[test]
fn test_type_result_for_complete_expression() {
    let index = SymbolIndex::new();
    index.rebuild_from(base_fixture());
    let locals = Locals(vec![("obj".into(), TypeName::scalar("demo.Person"))]);

    let tokens = tokenize("obj.getAge() + 1");
    let mut build = ExprBuilder::process(&tokens);
    let resolution = Resolver::new(&index, CursorContext::default())
        .with_locals(&locals)
        .resolve(&mut build.tree, TextSize::new(u32::MAX));

    let Resolution::Type(ty) = resolution else {
        panic!("expected a type");
    };
    assert_eq!(ty.to_string(), "int");
}

#[test]
fn test_package_walk_completion() {
    let index = SymbolIndex::new();
    index.rebuild_from(base_fixture());
    let locals = Locals(vec![]);

    let Resolution::Candidates(list) = complete(&index, &locals, "java.lang.Str") else {
        panic!("expected candidates");
    };
    assert_eq!(list.labels(), ["String"]);
}

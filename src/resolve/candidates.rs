//! Completion candidates.
//!
//! A [`CandidateList`] is what the resolver produces when the cursor sits
//! mid-expression: the matched items, a display title, and the
//! source-buffer range the host replaces when one is picked.

use text_size::TextRange;

use crate::symbols::{
    ClassSymbol, ConstructorSymbol, FieldSymbol, MethodSymbol, PackageSymbol,
};

/// The kind of one completion suggestion.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum CandidateKind {
    Package,
    Class,
    Field,
    Method,
    Constructor,
}

/// One completion suggestion.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Candidate {
    /// The text shown and inserted.
    pub label: String,
    pub kind: CandidateKind,
    /// Type / parameter information shown after the label.
    pub detail: Option<String>,
}

impl Candidate {
    pub fn new(label: impl Into<String>, kind: CandidateKind) -> Self {
        Self {
            label: label.into(),
            kind,
            detail: None,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub fn from_package(package: &PackageSymbol) -> Self {
        Self::new(package.last_segment().as_ref(), CandidateKind::Package)
            .with_detail(package.name().as_ref())
    }

    pub fn from_class(class: &ClassSymbol) -> Self {
        let label = class
            .name()
            .rsplit('$')
            .next()
            .unwrap_or(class.name())
            .to_string();
        Self::new(label, CandidateKind::Class).with_detail(class.package().as_ref())
    }

    pub fn from_field(field: &FieldSymbol) -> Self {
        Self::new(field.name.as_ref(), CandidateKind::Field).with_detail(field.ty.to_string())
    }

    /// Methods carry their formatted parameter types so overloads stay
    /// distinguishable in the list.
    pub fn from_method(method: &MethodSymbol) -> Self {
        Self::new(method.name.as_ref(), CandidateKind::Method).with_detail(format!(
            "{} : {}",
            method.parameter_display(),
            method.return_type
        ))
    }

    pub fn from_constructor(constructor: &ConstructorSymbol, class: &ClassSymbol) -> Self {
        Self::new(class.name().as_ref(), CandidateKind::Constructor)
            .with_detail(constructor.parameter_display())
    }
}

/// The ranked set of completion suggestions for one cursor position.
#[derive(Clone, Debug)]
pub struct CandidateList {
    /// Display title, e.g. `"getNa*"`.
    pub title: String,
    /// The source range the chosen candidate replaces.
    pub replace_range: TextRange,
    pub items: Vec<Candidate>,
}

impl CandidateList {
    pub fn new(prefix: &str, replace_range: TextRange) -> Self {
        Self {
            title: format!("{prefix}*"),
            replace_range,
            items: Vec::new(),
        }
    }

    pub fn push(&mut self, candidate: Candidate) {
        self.items.push(candidate);
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Put the list into its final deterministic order and drop duplicates:
    /// kind groups first, names alphabetical within a group, overloads by
    /// their parameter display.
    pub fn finish(&mut self) {
        self.items
            .sort_by(|a, b| (a.kind, &a.label, &a.detail).cmp(&(b.kind, &b.label, &b.detail)));
        self.items.dedup();
    }

    /// Labels in final order, for assertions and list rendering.
    pub fn labels(&self) -> Vec<&str> {
        self.items.iter().map(|c| c.label.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use text_size::TextSize;

    #[test]
    fn test_finish_orders_by_kind_then_name() {
        let mut list = CandidateList::new("x", TextRange::empty(TextSize::new(0)));
        list.push(Candidate::new("zeta", CandidateKind::Method));
        list.push(Candidate::new("alpha", CandidateKind::Method));
        list.push(Candidate::new("mid", CandidateKind::Field));
        list.finish();
        assert_eq!(list.labels(), ["mid", "alpha", "zeta"]);
        assert_eq!(list.title, "x*");
    }

    #[test]
    fn test_finish_deduplicates() {
        let mut list = CandidateList::new("", TextRange::empty(TextSize::new(0)));
        list.push(Candidate::new("dup", CandidateKind::Field));
        list.push(Candidate::new("dup", CandidateKind::Field));
        list.finish();
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn test_overloads_stay_distinct() {
        let mut list = CandidateList::new("m", TextRange::empty(TextSize::new(0)));
        list.push(Candidate::new("m", CandidateKind::Method).with_detail("(int) : void"));
        list.push(Candidate::new("m", CandidateKind::Method).with_detail("(int, int) : void"));
        list.finish();
        assert_eq!(list.len(), 2);
    }
}

//! The symbol-source contract.
//!
//! Any producer of class symbols (the persistent store, a reflection
//! adapter over a live class loader, or a source-text scanner) implements
//! [`ClassProvider`] so the index can be (re)built from it without knowing
//! where symbols come from.

use indexmap::IndexMap;

use super::ClassSymbol;

/// A source of class symbols.
pub trait ClassProvider {
    /// All classes this provider currently knows. Degraded sources return
    /// an empty list rather than failing.
    fn classes(&self) -> Vec<ClassSymbol>;

    /// Merge another provider's classes into this one. Returns `false` if
    /// the merge was rejected or interrupted.
    fn append(&mut self, other: &dyn ClassProvider) -> bool;

    /// Drop all symbols held by this provider.
    fn reset(&mut self);

    /// Observation hook invoked once per class during a merge.
    ///
    /// Returning `false` interrupts the merge; [`ClassProvider::append`]
    /// then reports failure.
    fn notify_append(&self, _class: &ClassSymbol, _is_last: bool) -> bool {
        true
    }
}

/// A plain in-memory provider.
///
/// Used by tests and as the collection seam for external scanners that
/// build symbols eagerly.
#[derive(Default)]
pub struct VecProvider {
    classes: Vec<ClassSymbol>,
}

impl VecProvider {
    pub fn new(classes: Vec<ClassSymbol>) -> Self {
        Self { classes }
    }

    pub fn push(&mut self, class: ClassSymbol) {
        self.classes.push(class);
    }
}

impl ClassProvider for VecProvider {
    fn classes(&self) -> Vec<ClassSymbol> {
        self.classes.clone()
    }

    fn append(&mut self, other: &dyn ClassProvider) -> bool {
        let incoming = other.classes();
        let last = incoming.len().saturating_sub(1);
        for (i, class) in incoming.into_iter().enumerate() {
            if !self.notify_append(&class, i == last) {
                return false;
            }
            self.classes.push(class);
        }
        true
    }

    fn reset(&mut self) {
        self.classes.clear();
    }
}

/// An ordered aggregate of named providers.
///
/// Sources are iterated in registration order, so a rebuild from a set of
/// providers is deterministic.
#[derive(Default)]
pub struct ProviderSet {
    sources: IndexMap<String, Box<dyn ClassProvider>>,
}

impl ProviderSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a provider under a stable name, replacing any previous
    /// provider with the same name.
    pub fn add_source(&mut self, name: impl Into<String>, provider: Box<dyn ClassProvider>) {
        self.sources.insert(name.into(), provider);
    }

    pub fn remove_source(&mut self, name: &str) -> bool {
        self.sources.shift_remove(name).is_some()
    }

    pub fn source_names(&self) -> impl Iterator<Item = &str> {
        self.sources.keys().map(String::as_str)
    }
}

impl ClassProvider for ProviderSet {
    fn classes(&self) -> Vec<ClassSymbol> {
        self.sources
            .values()
            .flat_map(|source| source.classes())
            .collect()
    }

    fn append(&mut self, other: &dyn ClassProvider) -> bool {
        // Appends land in the last registered source; an empty set rejects.
        match self.sources.values_mut().last() {
            Some(target) => target.append(other),
            None => false,
        }
    }

    fn reset(&mut self) {
        for source in self.sources.values_mut() {
            source.reset();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::Modifiers;
    use crate::symbols::ClassBody;

    fn class(name: &str) -> ClassSymbol {
        ClassSymbol::new(name, "p", Modifiers::empty(), ClassBody::default())
    }

    #[test]
    fn test_vec_provider_append() {
        let mut target = VecProvider::default();
        let source = VecProvider::new(vec![class("A"), class("B")]);
        assert!(target.append(&source));
        assert_eq!(target.classes().len(), 2);
    }

    #[test]
    fn test_provider_set_order_is_registration_order() {
        let mut set = ProviderSet::new();
        set.add_source("store", Box::new(VecProvider::new(vec![class("S")])));
        set.add_source("scanner", Box::new(VecProvider::new(vec![class("T")])));
        let names: Vec<_> = set.classes().iter().map(|c| c.name().to_string()).collect();
        assert_eq!(names, ["S", "T"]);
    }

    #[test]
    fn test_provider_set_reset_clears_all() {
        let mut set = ProviderSet::new();
        set.add_source("a", Box::new(VecProvider::new(vec![class("A")])));
        set.reset();
        assert!(set.classes().is_empty());
    }

    #[test]
    fn test_empty_set_rejects_append() {
        let mut set = ProviderSet::new();
        assert!(!set.append(&VecProvider::new(vec![class("A")])));
    }
}

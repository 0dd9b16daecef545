//! In-memory symbol index.
//!
//! Holds every known class and package in arrays sorted for binary search:
//! by simple name (completion of a bare prefix), by full name (exact
//! lookups and incremental replacement), and by package name. A full
//! rebuild is O(n log n); replacing one already-known class is a cheap
//! binary-search update that falls back to "caller must rebuild" rather
//! than ever leaving an array unsorted.
//!
//! All lookups degrade to an empty result on a missing class or package;
//! nothing on the lookup path returns an error.
//!
//! The index takes its own lock (one `Mutex` per instance) around every
//! public operation, per the engine's single-writer concurrency model.

use parking_lot::Mutex;
use rayon::prelude::*;
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::{debug, trace};

use crate::core::IStr;
use crate::symbols::{
    ClassProvider, ClassSymbol, FieldSymbol, MethodSymbol, PackageSymbol,
};

/// The in-memory symbol index. One instance per symbol database.
#[derive(Default)]
pub struct SymbolIndex {
    inner: Mutex<IndexInner>,
}

#[derive(Default)]
struct IndexInner {
    /// Sorted by `(simple name, full name)`.
    by_name: Vec<ClassSymbol>,
    /// Sorted by full name.
    by_full_name: Vec<ClassSymbol>,
    /// Sorted by package name. Ancestor packages are materialized even when
    /// they contain no classes of their own, so depth-based package
    /// completion always has an entry to offer.
    packages: Vec<PackageSymbol>,
    class_map: FxHashMap<IStr, ClassSymbol>,
    package_map: FxHashMap<IStr, PackageSymbol>,
}

impl SymbolIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Full rebuild from a set of classes. Later duplicates of a full name
    /// replace earlier ones.
    pub fn rebuild_from(&self, classes: impl IntoIterator<Item = ClassSymbol>) {
        let classes: Vec<ClassSymbol> = classes.into_iter().collect();
        let mut inner = self.inner.lock();
        inner.rebuild(classes);
        debug!(
            classes = inner.by_full_name.len(),
            packages = inner.packages.len(),
            "symbol index rebuilt"
        );
    }

    /// Rebuild from everything a provider currently knows.
    pub fn rebuild_from_provider(&self, provider: &dyn ClassProvider) {
        self.rebuild_from(provider.classes());
    }

    /// Replace one already-indexed class in place.
    ///
    /// Returns `false`, without touching the index, when the class is
    /// new, its package is unknown, or a binary-search probe misses; the
    /// caller is expected to fall back to [`SymbolIndex::rebuild_from`].
    pub fn try_incremental_update(&self, class: ClassSymbol) -> bool {
        let mut inner = self.inner.lock();
        let updated = inner.try_incremental_update(class);
        trace!(updated, "incremental class update");
        updated
    }

    /// Exact full-name lookup.
    pub fn find_exact_class(&self, full_name: &str) -> Option<ClassSymbol> {
        self.inner.lock().class_map.get(full_name).cloned()
    }

    /// Exact package-name lookup.
    pub fn find_exact_package(&self, name: &str) -> Option<PackageSymbol> {
        self.inner.lock().package_map.get(name).cloned()
    }

    /// Find packages by prefix.
    ///
    /// * `exact_match`: `prefix` names an existing package; the result is
    ///   its direct child packages (`prefix.X`).
    /// * otherwise, packages whose name starts with `prefix`: all depths
    ///   when `include_subpackages`, only the prefix's own depth when not.
    pub fn find_packages(
        &self,
        prefix: &str,
        exact_match: bool,
        include_subpackages: bool,
    ) -> Vec<PackageSymbol> {
        let inner = self.inner.lock();
        if exact_match {
            let child_prefix = format!("{prefix}.");
            let child_depth = child_prefix.matches('.').count() as u32;
            return inner.scan_packages(&child_prefix, |p| p.dot_count() == child_depth);
        }
        let depth = prefix.matches('.').count() as u32;
        inner.scan_packages(prefix, |p| include_subpackages || p.dot_count() == depth)
    }

    /// Find classes by simple-name prefix, either inside one package or
    /// across the whole index.
    pub fn find_classes(
        &self,
        package: Option<&PackageSymbol>,
        name_prefix: &str,
        exact_match: bool,
    ) -> Vec<ClassSymbol> {
        let inner = self.inner.lock();
        let classes: &[ClassSymbol] = match package {
            Some(p) => p.classes(),
            None => &inner.by_name,
        };
        let start = classes.partition_point(|c| c.name().as_ref() < name_prefix);
        let mut out = Vec::new();
        for class in &classes[start..] {
            if exact_match {
                if class.name().as_ref() != name_prefix {
                    break;
                }
            } else if !class.name().starts_with(name_prefix) {
                break;
            }
            out.push(class.clone());
        }
        out
    }

    /// Find the fields visible on `class` whose name matches the prefix.
    ///
    /// Walks the superclass chain (for interfaces: the extended-interface
    /// closure), applying the visibility rules: private members only on the
    /// queried class itself, cross-package members only when public or
    /// protected, instance members dropped under `static_only`. Fields
    /// declared by interfaces anywhere in the hierarchy are implicitly
    /// public static and are always collected. With
    /// `inspect_outer_classes`, the enclosing-class chain is scanned too;
    /// a static nested class sees only static members of its outers.
    pub fn find_fields(
        &self,
        class: &ClassSymbol,
        name_prefix: &str,
        exact_match: bool,
        static_only: bool,
        inspect_outer_classes: bool,
    ) -> Vec<FieldSymbol> {
        let inner = self.inner.lock();
        let mut out: Vec<FieldSymbol> = Vec::new();
        inner.collect_fields(class, name_prefix, exact_match, static_only, &mut out);

        if inspect_outer_classes {
            let statics_only_outer = static_only || class.modifiers().is_static();
            let mut enclosing = class.enclosing_class_name().map(str::to_owned);
            while let Some(outer_name) = enclosing {
                let Some(outer) = inner.class_map.get(outer_name.as_str()).cloned() else {
                    break;
                };
                inner.collect_fields(&outer, name_prefix, exact_match, statics_only_outer, &mut out);
                enclosing = outer.enclosing_class_name().map(str::to_owned);
            }
        }

        // De-duplicate (a diamond of interfaces can contribute one field
        // twice) and put the result in display order.
        out.sort_by(|a, b| (&a.name, &a.owner).cmp(&(&b.name, &b.owner)));
        out.dedup_by(|a, b| a.name == b.name && a.owner == b.owner);
        out
    }

    /// Find the methods visible on `class` whose name matches the prefix.
    ///
    /// Same traversal and filtering as [`SymbolIndex::find_fields`], except
    /// that a subclass method with the same signature as an already
    /// collected ancestor method replaces it (override wins, including its
    /// narrowed throws clause).
    pub fn find_methods(
        &self,
        class: &ClassSymbol,
        name_prefix: &str,
        exact_match: bool,
        static_only: bool,
        inspect_outer_classes: bool,
    ) -> Vec<MethodSymbol> {
        let inner = self.inner.lock();
        let mut out: Vec<MethodSymbol> = Vec::new();
        inner.collect_methods(class, name_prefix, exact_match, static_only, &mut out);

        if inspect_outer_classes {
            let statics_only_outer = static_only || class.modifiers().is_static();
            let mut enclosing = class.enclosing_class_name().map(str::to_owned);
            while let Some(outer_name) = enclosing {
                let Some(outer) = inner.class_map.get(outer_name.as_str()).cloned() else {
                    break;
                };
                inner.collect_methods(
                    &outer,
                    name_prefix,
                    exact_match,
                    statics_only_outer,
                    &mut out,
                );
                enclosing = outer.enclosing_class_name().map(str::to_owned);
            }
        }

        out.sort_by(|a, b| {
            (&a.name, a.parameters.len(), &a.owner).cmp(&(&b.name, b.parameters.len(), &b.owner))
        });
        out
    }

    pub fn class_count(&self) -> usize {
        self.inner.lock().by_full_name.len()
    }

    pub fn package_count(&self) -> usize {
        self.inner.lock().packages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().by_full_name.is_empty()
    }

    /// Snapshot of all classes in full-name order.
    pub fn classes(&self) -> Vec<ClassSymbol> {
        self.inner.lock().by_full_name.clone()
    }

    /// Snapshot of all packages in name order.
    pub fn packages(&self) -> Vec<PackageSymbol> {
        self.inner.lock().packages.clone()
    }

    #[cfg(test)]
    pub(crate) fn check_sorted(&self) -> bool {
        let inner = self.inner.lock();
        inner
            .by_name
            .windows(2)
            .all(|w| (w[0].name(), w[0].full_name()) <= (w[1].name(), w[1].full_name()))
            && inner
                .by_full_name
                .windows(2)
                .all(|w| w[0].full_name() < w[1].full_name())
            && inner.packages.windows(2).all(|w| w[0].name() < w[1].name())
    }
}

impl IndexInner {
    fn rebuild(&mut self, classes: Vec<ClassSymbol>) {
        self.class_map = FxHashMap::default();
        self.class_map.reserve(classes.len());
        for class in classes {
            self.class_map.insert(class.full_name().clone(), class);
        }

        self.by_full_name = self.class_map.values().cloned().collect();
        self.by_full_name
            .par_sort_unstable_by(|a, b| a.full_name().cmp(b.full_name()));

        self.by_name = self.by_full_name.clone();
        self.by_name
            .par_sort_unstable_by(|a, b| (a.name(), a.full_name()).cmp(&(b.name(), b.full_name())));

        // Group classes by package, materializing ancestor packages.
        let mut grouped: FxHashMap<IStr, Vec<ClassSymbol>> = FxHashMap::default();
        for class in &self.by_name {
            grouped
                .entry(class.package().clone())
                .or_default()
                .push(class.clone());
        }
        let mut names: FxHashSet<IStr> = grouped.keys().cloned().collect();
        names.remove("");
        for name in names.clone() {
            let mut rest = name.as_ref();
            while let Some((parent, _)) = rest.rsplit_once('.') {
                names.insert(IStr::from(parent));
                rest = parent;
            }
        }

        self.package_map = FxHashMap::default();
        self.package_map.reserve(names.len());
        for name in names {
            let classes = grouped.remove(&name).unwrap_or_default();
            let package = PackageSymbol::new(name.clone(), classes);
            self.package_map.insert(name, package);
        }
        self.packages = self.package_map.values().cloned().collect();
        self.packages
            .par_sort_unstable_by(|a, b| a.name().cmp(b.name()));
    }

    fn try_incremental_update(&mut self, class: ClassSymbol) -> bool {
        if !self.class_map.contains_key(class.full_name()) {
            return false;
        }
        let Some(package) = self.package_map.get(class.package()).cloned() else {
            return false;
        };

        // Locate in the full-name array.
        let Ok(full_pos) = self
            .by_full_name
            .binary_search_by(|c| c.full_name().cmp(class.full_name()))
        else {
            return false;
        };

        // Locate in the name array: binary search to the simple-name run,
        // then shift within the run to the matching full name (several
        // packages may declare the same simple name).
        let run_start = self
            .by_name
            .partition_point(|c| c.name() < class.name());
        let name_pos = self.by_name[run_start..]
            .iter()
            .take_while(|c| c.name() == class.name())
            .position(|c| c.full_name() == class.full_name())
            .map(|offset| run_start + offset);
        let Some(name_pos) = name_pos else {
            return false;
        };

        // Replace inside the package's local class array.
        let mut package_classes = package.classes().to_vec();
        let Some(local) = package_classes
            .iter()
            .position(|c| c.full_name() == class.full_name())
        else {
            return false;
        };
        package_classes[local] = class.clone();
        let replacement = package.with_classes(package_classes);
        let Ok(package_pos) = self
            .packages
            .binary_search_by(|p| p.name().cmp(replacement.name()))
        else {
            return false;
        };

        // All probes succeeded; commit.
        self.by_full_name[full_pos] = class.clone();
        self.by_name[name_pos] = class.clone();
        self.packages[package_pos] = replacement.clone();
        self.package_map
            .insert(replacement.name().clone(), replacement);
        self.class_map.insert(class.full_name().clone(), class);
        true
    }

    fn scan_packages(
        &self,
        prefix: &str,
        keep: impl Fn(&PackageSymbol) -> bool,
    ) -> Vec<PackageSymbol> {
        let start = self.packages.partition_point(|p| p.name().as_ref() < prefix);
        self.packages[start..]
            .iter()
            .take_while(|p| p.name().starts_with(prefix))
            .filter(|p| keep(p))
            .cloned()
            .collect()
    }

    /// The classes whose members are visible on `class`, least derived
    /// first: the superclass chain root-down, or, for an interface, the
    /// transitive extended-interface closure ending at the interface itself.
    fn hierarchy(&self, class: &ClassSymbol) -> Vec<ClassSymbol> {
        let mut chain = Vec::new();
        let mut seen: FxHashSet<IStr> = FxHashSet::default();

        if class.is_interface() {
            self.interface_closure(class, &mut seen, &mut chain);
        } else {
            let mut cursor = Some(class.clone());
            while let Some(current) = cursor {
                if !seen.insert(current.full_name().clone()) {
                    break;
                }
                cursor = current
                    .superclass()
                    .and_then(|name| self.class_map.get(name).cloned());
                chain.push(current);
            }
            chain.reverse();
        }
        chain
    }

    /// Depth-first closure over extended interfaces, parents before the
    /// interface that extends them.
    fn interface_closure(
        &self,
        interface: &ClassSymbol,
        seen: &mut FxHashSet<IStr>,
        out: &mut Vec<ClassSymbol>,
    ) {
        if !seen.insert(interface.full_name().clone()) {
            return;
        }
        for parent in interface.interfaces().to_vec() {
            if let Some(parent) = self.class_map.get(&parent).cloned() {
                self.interface_closure(&parent, seen, out);
            }
        }
        out.push(interface.clone());
    }

    fn collect_fields(
        &self,
        class: &ClassSymbol,
        prefix: &str,
        exact: bool,
        static_only: bool,
        out: &mut Vec<FieldSymbol>,
    ) {
        let chain = self.hierarchy(class);
        for declaring in &chain {
            let own = declaring.full_name() == class.full_name();
            for field in declaring.fields() {
                if !name_matches(&field.name, prefix, exact) {
                    continue;
                }
                if declaring.is_interface() {
                    // Interface fields are implicitly public static final;
                    // the static/visibility filters never exclude them.
                    out.push(field.clone());
                    continue;
                }
                if static_only && !field.modifiers.is_static() {
                    continue;
                }
                if field.modifiers.is_private() && !own {
                    continue;
                }
                if declaring.package() != class.package()
                    && !field.modifiers.is_cross_package_visible()
                {
                    continue;
                }
                out.push(field.clone());
            }
            // Interface fields reach classes through the full transitive
            // closure of every implemented interface.
            if !declaring.is_interface() {
                let mut seen: FxHashSet<IStr> =
                    chain.iter().map(|c| c.full_name().clone()).collect();
                let mut ifaces = Vec::new();
                for name in declaring.interfaces().to_vec() {
                    if let Some(iface) = self.class_map.get(&name).cloned() {
                        self.interface_closure(&iface, &mut seen, &mut ifaces);
                    }
                }
                for iface in ifaces {
                    for field in iface.fields() {
                        if name_matches(&field.name, prefix, exact) {
                            out.push(field.clone());
                        }
                    }
                }
            }
        }
    }

    fn collect_methods(
        &self,
        class: &ClassSymbol,
        prefix: &str,
        exact: bool,
        static_only: bool,
        out: &mut Vec<MethodSymbol>,
    ) {
        for declaring in self.hierarchy(class) {
            let own = declaring.full_name() == class.full_name();
            for method in declaring.methods() {
                if !name_matches(&method.name, prefix, exact) {
                    continue;
                }
                if static_only && !method.modifiers.is_static() {
                    continue;
                }
                if method.modifiers.is_private() && !own {
                    continue;
                }
                if declaring.package() != class.package()
                    && !method.modifiers.is_cross_package_visible()
                {
                    continue;
                }
                // An override replaces the ancestor entry it shadows.
                match out.iter_mut().find(|m| m.signature_equals(method)) {
                    Some(existing) => *existing = method.clone(),
                    None => out.push(method.clone()),
                }
            }
        }
    }
}

fn name_matches(name: &str, prefix: &str, exact: bool) -> bool {
    if exact {
        name == prefix
    } else {
        name.starts_with(prefix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::Modifiers;
    use crate::symbols::{ClassBody, TypeName};

    fn class(name: &str, package: &str) -> ClassSymbol {
        ClassSymbol::new(name, package, Modifiers::new(Modifiers::PUBLIC), ClassBody::default())
    }

    fn field(owner: &str, name: &str, bits: u16) -> FieldSymbol {
        FieldSymbol::new(owner, name, Modifiers::new(bits), TypeName::scalar("int"))
    }

    fn index_of(classes: Vec<ClassSymbol>) -> SymbolIndex {
        let index = SymbolIndex::new();
        index.rebuild_from(classes);
        index
    }

    #[test]
    fn test_rebuild_deduplicates_by_full_name() {
        let index = index_of(vec![class("A", "p"), class("A", "p"), class("B", "p")]);
        assert_eq!(index.class_count(), 2);
    }

    #[test]
    fn test_find_exact_class_and_package() {
        let index = index_of(vec![class("List", "java.util")]);
        assert!(index.find_exact_class("java.util.List").is_some());
        assert!(index.find_exact_class("java.util.Map").is_none());
        assert!(index.find_exact_package("java.util").is_some());
        // Ancestor packages are materialized.
        assert!(index.find_exact_package("java").is_some());
    }

    #[test]
    fn test_find_packages_exact_lists_direct_children() {
        let index = index_of(vec![
            class("A", "java.util"),
            class("B", "java.util.regex"),
            class("C", "java.awt"),
        ]);
        let children: Vec<_> = index
            .find_packages("java", true, false)
            .iter()
            .map(|p| p.name().to_string())
            .collect();
        assert_eq!(children, ["java.awt", "java.util"]);
    }

    #[test]
    fn test_find_packages_prefix_depth_filter() {
        let index = index_of(vec![
            class("A", "java.util"),
            class("B", "java.util.regex"),
        ]);
        // Same-depth completion of a partial segment.
        let same_level: Vec<_> = index
            .find_packages("java.ut", false, false)
            .iter()
            .map(|p| p.name().to_string())
            .collect();
        assert_eq!(same_level, ["java.util"]);
        // All depths when subpackages are requested.
        let all: Vec<_> = index
            .find_packages("java.ut", false, true)
            .iter()
            .map(|p| p.name().to_string())
            .collect();
        assert_eq!(all, ["java.util", "java.util.regex"]);
    }

    #[test]
    fn test_find_classes_global_and_scoped() {
        let index = index_of(vec![
            class("Print", "p"),
            class("Printer", "p"),
            class("Process", "p"),
            class("Print", "q"),
        ]);
        let global = index.find_classes(None, "Print", false);
        assert_eq!(global.len(), 3); // p.Print, q.Print, p.Printer

        let package = index.find_exact_package("p").unwrap();
        let scoped: Vec<_> = index
            .find_classes(Some(&package), "Pr", false)
            .iter()
            .map(|c| c.name().to_string())
            .collect();
        assert_eq!(scoped, ["Print", "Printer", "Process"]);

        let exact = index.find_classes(Some(&package), "Print", true);
        assert_eq!(exact.len(), 1);
    }

    #[test]
    fn test_incremental_update_replaces_in_place() {
        let index = index_of(vec![class("A", "p"), class("B", "p"), class("A", "q")]);
        let replacement = ClassSymbol::new(
            "A",
            "p",
            Modifiers::new(Modifiers::PUBLIC),
            ClassBody {
                fields: vec![field("p.A", "answer", Modifiers::PUBLIC)],
                ..ClassBody::default()
            },
        );
        assert!(index.try_incremental_update(replacement));
        assert!(index.check_sorted());
        let updated = index.find_exact_class("p.A").unwrap();
        assert_eq!(updated.fields().len(), 1);
        // The package-local array saw the replacement too.
        let package = index.find_exact_package("p").unwrap();
        let in_package = package
            .classes()
            .iter()
            .find(|c| c.full_name().as_ref() == "p.A")
            .unwrap();
        assert_eq!(in_package.fields().len(), 1);
    }

    #[test]
    fn test_incremental_update_rejects_new_class() {
        let index = index_of(vec![class("A", "p")]);
        assert!(!index.try_incremental_update(class("New", "p")));
        assert!(!index.try_incremental_update(class("A", "unknown.pkg")));
        assert_eq!(index.class_count(), 1);
    }

    #[test]
    fn test_sorted_invariant_after_many_updates() {
        let index = index_of(vec![
            class("A", "p"),
            class("A", "q"),
            class("B", "p"),
            class("C", "r"),
        ]);
        for _ in 0..3 {
            for (name, package) in [("A", "p"), ("A", "q"), ("C", "r")] {
                assert!(index.try_incremental_update(class(name, package)));
            }
        }
        assert!(index.check_sorted());
    }

    #[test]
    fn test_field_visibility_across_packages() {
        let base = ClassSymbol::new(
            "Base",
            "a",
            Modifiers::new(Modifiers::PUBLIC),
            ClassBody {
                fields: vec![
                    field("a.Base", "x", Modifiers::PRIVATE),
                    field("a.Base", "y", Modifiers::PROTECTED),
                    field("a.Base", "z", 0), // package-private
                ],
                ..ClassBody::default()
            },
        );
        let derived = ClassSymbol::new(
            "Derived",
            "b",
            Modifiers::new(Modifiers::PUBLIC),
            ClassBody {
                superclass: Some("a.Base".into()),
                ..ClassBody::default()
            },
        );
        let index = index_of(vec![base, derived.clone()]);
        let names: Vec<_> = index
            .find_fields(&derived, "", false, false, false)
            .iter()
            .map(|f| f.name.to_string())
            .collect();
        assert_eq!(names, ["y"]);
    }

    #[test]
    fn test_private_fields_visible_on_own_class() {
        let c = ClassSymbol::new(
            "C",
            "p",
            Modifiers::new(Modifiers::PUBLIC),
            ClassBody {
                fields: vec![field("p.C", "secret", Modifiers::PRIVATE)],
                ..ClassBody::default()
            },
        );
        let index = index_of(vec![c.clone()]);
        assert_eq!(index.find_fields(&c, "", false, false, false).len(), 1);
    }

    #[test]
    fn test_interface_constants_ignore_static_filter() {
        let iface = ClassSymbol::new(
            "Named",
            "a",
            Modifiers::new(Modifiers::PUBLIC | Modifiers::INTERFACE),
            ClassBody {
                fields: vec![field("a.Named", "KIND", Modifiers::PUBLIC | Modifiers::STATIC)],
                ..ClassBody::default()
            },
        );
        let impl_class = ClassSymbol::new(
            "Thing",
            "b",
            Modifiers::new(Modifiers::PUBLIC),
            ClassBody {
                interfaces: vec!["a.Named".into()],
                ..ClassBody::default()
            },
        );
        let index = index_of(vec![iface, impl_class.clone()]);
        let fields = index.find_fields(&impl_class, "", false, false, false);
        assert_eq!(fields.len(), 1);
        assert_eq!(&*fields[0].name, "KIND");
    }

    #[test]
    fn test_method_override_shadows_ancestor() {
        let object = ClassSymbol::new(
            "Object",
            "java.lang",
            Modifiers::new(Modifiers::PUBLIC),
            ClassBody {
                methods: vec![
                    MethodSymbol::new(
                        "java.lang.Object",
                        "toString",
                        Modifiers::new(Modifiers::PUBLIC),
                        vec![],
                        TypeName::scalar("java.lang.String"),
                    )
                    .with_throws(vec!["java.lang.Exception".into()]),
                ],
                ..ClassBody::default()
            },
        );
        let sub = ClassSymbol::new(
            "Sub",
            "p",
            Modifiers::new(Modifiers::PUBLIC),
            ClassBody {
                superclass: Some("java.lang.Object".into()),
                methods: vec![MethodSymbol::new(
                    "p.Sub",
                    "toString",
                    Modifiers::new(Modifiers::PUBLIC),
                    vec![],
                    TypeName::scalar("java.lang.String"),
                )],
                ..ClassBody::default()
            },
        );
        let index = index_of(vec![object, sub.clone()]);
        let methods = index.find_methods(&sub, "toString", true, false, false);
        assert_eq!(methods.len(), 1);
        assert_eq!(&*methods[0].owner, "p.Sub");
        assert!(methods[0].throws.is_empty());
    }

    #[test]
    fn test_static_nested_sees_only_static_outer_members() {
        let outer = ClassSymbol::new(
            "Outer",
            "p",
            Modifiers::new(Modifiers::PUBLIC),
            ClassBody {
                fields: vec![
                    field("p.Outer", "shared", Modifiers::PUBLIC | Modifiers::STATIC),
                    field("p.Outer", "instance", Modifiers::PUBLIC),
                ],
                ..ClassBody::default()
            },
        );
        let nested = ClassSymbol::new(
            "Outer$Nested",
            "p",
            Modifiers::new(Modifiers::PUBLIC | Modifiers::STATIC),
            ClassBody::default(),
        );
        let inner = ClassSymbol::new(
            "Outer$Inner",
            "p",
            Modifiers::new(Modifiers::PUBLIC),
            ClassBody::default(),
        );
        let index = index_of(vec![outer, nested.clone(), inner.clone()]);

        let from_nested: Vec<_> = index
            .find_fields(&nested, "", false, false, true)
            .iter()
            .map(|f| f.name.to_string())
            .collect();
        assert_eq!(from_nested, ["shared"]);

        let from_inner: Vec<_> = index
            .find_fields(&inner, "", false, false, true)
            .iter()
            .map(|f| f.name.to_string())
            .collect();
        assert_eq!(from_inner, ["instance", "shared"]);
    }

    #[test]
    fn test_lookups_degrade_to_empty() {
        let index = SymbolIndex::new();
        assert!(index.find_packages("java", false, true).is_empty());
        assert!(index.find_classes(None, "X", false).is_empty());
        let orphan = class("Orphan", "nowhere");
        assert!(index.find_fields(&orphan, "", false, false, true).is_empty());
    }
}

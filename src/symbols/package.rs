//! Package symbols: a dotted name plus the classes declared directly in it.

use std::sync::Arc;

use crate::core::IStr;

use super::ClassSymbol;

struct PackageData {
    name: IStr,
    last_segment: IStr,
    dot_count: u32,
    classes: Vec<ClassSymbol>,
}

/// One package and its directly contained classes. Cheap to clone.
#[derive(Clone)]
pub struct PackageSymbol {
    data: Arc<PackageData>,
}

impl PackageSymbol {
    /// Create a package. `classes` is sorted by simple name on construction.
    pub fn new(name: impl Into<IStr>, mut classes: Vec<ClassSymbol>) -> Self {
        let name = name.into();
        let last_segment: IStr = match name.rsplit_once('.') {
            Some((_, last)) => Arc::from(last),
            None => name.clone(),
        };
        let dot_count = name.matches('.').count() as u32;
        classes.sort_by(|a, b| (a.name(), a.full_name()).cmp(&(b.name(), b.full_name())));
        Self {
            data: Arc::new(PackageData {
                name,
                last_segment,
                dot_count,
                classes,
            }),
        }
    }

    /// Full dotted name (`java.util`).
    pub fn name(&self) -> &IStr {
        &self.data.name
    }

    /// The last segment of the dotted name (`util`).
    pub fn last_segment(&self) -> &IStr {
        &self.data.last_segment
    }

    /// Number of dots in the full name; used for subpackage-depth matching.
    pub fn dot_count(&self) -> u32 {
        self.data.dot_count
    }

    /// Classes declared directly in this package, sorted by simple name.
    pub fn classes(&self) -> &[ClassSymbol] {
        &self.data.classes
    }

    /// Replace this package's class list (sorted again on construction).
    /// Used by the index's incremental update; the old symbol is dropped.
    pub fn with_classes(&self, classes: Vec<ClassSymbol>) -> Self {
        Self::new(self.data.name.clone(), classes)
    }
}

impl PartialEq for PackageSymbol {
    fn eq(&self, other: &Self) -> bool {
        self.data.name == other.data.name
    }
}

impl Eq for PackageSymbol {}

impl std::fmt::Debug for PackageSymbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PackageSymbol")
            .field("name", &self.data.name)
            .field("classes", &self.data.classes.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::Modifiers;
    use crate::symbols::ClassBody;

    fn class(name: &str, package: &str) -> ClassSymbol {
        ClassSymbol::new(name, package, Modifiers::empty(), ClassBody::default())
    }

    #[test]
    fn test_segments_and_depth() {
        let p = PackageSymbol::new("java.awt.event", vec![]);
        assert_eq!(&**p.last_segment(), "event");
        assert_eq!(p.dot_count(), 2);

        let root = PackageSymbol::new("java", vec![]);
        assert_eq!(&**root.last_segment(), "java");
        assert_eq!(root.dot_count(), 0);
    }

    #[test]
    fn test_classes_sorted_by_simple_name() {
        let p = PackageSymbol::new(
            "p",
            vec![class("Zebra", "p"), class("Ant", "p"), class("Mole", "p")],
        );
        let names: Vec<_> = p.classes().iter().map(|c| c.name().to_string()).collect();
        assert_eq!(names, ["Ant", "Mole", "Zebra"]);
    }
}

//! Class symbols with a two-tier skeleton/body representation.
//!
//! The skeleton (names, modifiers) is always present and cheap; the body
//! (members, superclass, interfaces) can be loaded lazily from a
//! [`BodySource`] the first time it is touched. The transition happens at
//! most once per symbol; concurrent readers block on the same `OnceLock`
//! until the first loader finishes.

use std::sync::{Arc, OnceLock};

use tracing::warn;

use crate::base::{INNER_SEPARATOR, Modifiers};
use crate::core::IStr;

use super::{ConstructorSymbol, FieldSymbol, MethodSymbol};

/// Loader for a lazily populated class body.
///
/// Implemented by the persistent store; errors degrade to an empty body at
/// the call site (lookups never fail past the symbol boundary).
pub trait BodySource: Send + Sync {
    fn load_body(
        &self,
        full_name: &str,
    ) -> Result<ClassBody, Box<dyn std::error::Error + Send + Sync>>;
}

/// The heavyweight half of a class: members and hierarchy names.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ClassBody {
    /// Offset of the class declaration in its defining source, `-1` if unknown.
    pub declaration_offset: i32,
    /// Full name of the superclass. `None` for roots and interfaces.
    pub superclass: Option<IStr>,
    /// Full names of implemented (classes) or extended (interfaces) interfaces.
    pub interfaces: Vec<IStr>,
    /// Sorted by name.
    pub fields: Vec<FieldSymbol>,
    /// Sorted by parameter count.
    pub constructors: Vec<ConstructorSymbol>,
    /// Sorted by name, then parameter count.
    pub methods: Vec<MethodSymbol>,
}

impl ClassBody {
    /// Restore the sort orders the member lookups binary-search on.
    ///
    /// Called on construction and after deserialization; a body is never
    /// re-sorted once published.
    pub fn normalize(&mut self) {
        self.fields.sort_by(|a, b| a.name.cmp(&b.name));
        self.constructors
            .sort_by_key(|c| c.parameters.len());
        self.methods
            .sort_by(|a, b| (&a.name, a.parameters.len()).cmp(&(&b.name, b.parameters.len())));
    }
}

struct ClassData {
    name: IStr,
    package: IStr,
    full_name: IStr,
    modifiers: Modifiers,
    body: OnceLock<ClassBody>,
    source: Option<Arc<dyn BodySource>>,
}

/// Descriptor of one class or interface. Cheap to clone.
///
/// The full name (`package.Name`, nested classes as `package.Outer$Inner`)
/// is the global unique key; equality compares only full names.
#[derive(Clone)]
pub struct ClassSymbol {
    data: Arc<ClassData>,
}

impl ClassSymbol {
    /// Create a class with an eagerly supplied body.
    pub fn new(
        name: impl Into<IStr>,
        package: impl Into<IStr>,
        modifiers: Modifiers,
        mut body: ClassBody,
    ) -> Self {
        let name = name.into();
        let package = package.into();
        let full_name: IStr = if package.is_empty() {
            name.clone()
        } else {
            Arc::from(format!("{package}.{name}"))
        };
        body.normalize();
        let cell = OnceLock::new();
        let _ = cell.set(body);
        Self {
            data: Arc::new(ClassData {
                name,
                package,
                full_name,
                modifiers,
                body: cell,
                source: None,
            }),
        }
    }

    /// Create a skeleton-only class whose body loads from `source` on first
    /// member access.
    ///
    /// `package_len` is the length of the package prefix within `full_name`
    /// (0 for the unnamed package).
    pub fn new_lazy(
        full_name: impl Into<IStr>,
        package_len: usize,
        modifiers: Modifiers,
        source: Arc<dyn BodySource>,
    ) -> Self {
        let full_name = full_name.into();
        let package_len = package_len.min(full_name.len());
        let package: IStr = Arc::from(&full_name[..package_len]);
        let name: IStr = if package_len == 0 || package_len + 1 >= full_name.len() {
            full_name.clone()
        } else {
            Arc::from(&full_name[package_len + 1..])
        };
        Self {
            data: Arc::new(ClassData {
                name,
                package,
                full_name,
                modifiers,
                body: OnceLock::new(),
                source: Some(source),
            }),
        }
    }

    /// Simple name (`List`, nested classes as `Outer$Inner`).
    pub fn name(&self) -> &IStr {
        &self.data.name
    }

    /// Package name, empty for the unnamed package.
    pub fn package(&self) -> &IStr {
        &self.data.package
    }

    /// Globally unique full name.
    pub fn full_name(&self) -> &IStr {
        &self.data.full_name
    }

    pub fn modifiers(&self) -> Modifiers {
        self.data.modifiers
    }

    pub fn is_interface(&self) -> bool {
        self.data.modifiers.is_interface()
    }

    /// Full name of the enclosing class, for nested classes.
    pub fn enclosing_class_name(&self) -> Option<&str> {
        self.data
            .full_name
            .rsplit_once(INNER_SEPARATOR)
            .map(|(outer, _)| outer)
    }

    /// True once the body has been loaded (or was eagerly supplied).
    pub fn is_body_loaded(&self) -> bool {
        self.data.body.get().is_some()
    }

    /// The class body, loading it from the body source on first access.
    ///
    /// A failed load logs one warning and publishes an empty body; the
    /// lookup paths then behave as a miss rather than an error.
    pub fn body(&self) -> &ClassBody {
        self.data.body.get_or_init(|| match &self.data.source {
            Some(source) => match source.load_body(&self.data.full_name) {
                Ok(mut body) => {
                    body.normalize();
                    body
                }
                Err(err) => {
                    warn!(class = %self.data.full_name, %err, "class body load failed");
                    ClassBody::default()
                }
            },
            None => ClassBody::default(),
        })
    }

    pub fn superclass(&self) -> Option<&IStr> {
        self.body().superclass.as_ref()
    }

    pub fn interfaces(&self) -> &[IStr] {
        &self.body().interfaces
    }

    pub fn fields(&self) -> &[FieldSymbol] {
        &self.body().fields
    }

    pub fn constructors(&self) -> &[ConstructorSymbol] {
        &self.body().constructors
    }

    pub fn methods(&self) -> &[MethodSymbol] {
        &self.body().methods
    }
}

impl PartialEq for ClassSymbol {
    fn eq(&self, other: &Self) -> bool {
        self.data.full_name == other.data.full_name
    }
}

impl Eq for ClassSymbol {}

impl std::fmt::Debug for ClassSymbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClassSymbol")
            .field("full_name", &self.data.full_name)
            .field("modifiers", &self.data.modifiers)
            .field("body_loaded", &self.is_body_loaded())
            .finish()
    }
}

impl std::fmt::Display for ClassSymbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.data.full_name)
    }
}

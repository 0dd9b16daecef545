//! Declaration modifier bitset.
//!
//! Bit values match the class-file access flags of the analyzed language,
//! so a reflection-based symbol source can pass its flag word through
//! unchanged. The `INTERFACE` bit doubles as the "is interface" marker in
//! the persistent skeleton record.

/// Modifier bitset for classes, fields, methods, and constructors.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Modifiers(pub u16);

impl Modifiers {
    pub const PUBLIC: u16 = 0x0001;
    pub const PRIVATE: u16 = 0x0002;
    pub const PROTECTED: u16 = 0x0004;
    pub const STATIC: u16 = 0x0008;
    pub const FINAL: u16 = 0x0010;
    pub const SYNCHRONIZED: u16 = 0x0020;
    pub const VOLATILE: u16 = 0x0040;
    pub const TRANSIENT: u16 = 0x0080;
    pub const NATIVE: u16 = 0x0100;
    pub const INTERFACE: u16 = 0x0200;
    pub const ABSTRACT: u16 = 0x0400;

    pub const fn new(bits: u16) -> Self {
        Self(bits)
    }

    pub const fn empty() -> Self {
        Self(0)
    }

    pub const fn bits(self) -> u16 {
        self.0
    }

    pub const fn contains(self, bits: u16) -> bool {
        self.0 & bits != 0
    }

    pub const fn with(self, bits: u16) -> Self {
        Self(self.0 | bits)
    }

    pub const fn is_public(self) -> bool {
        self.contains(Self::PUBLIC)
    }

    pub const fn is_private(self) -> bool {
        self.contains(Self::PRIVATE)
    }

    pub const fn is_protected(self) -> bool {
        self.contains(Self::PROTECTED)
    }

    pub const fn is_static(self) -> bool {
        self.contains(Self::STATIC)
    }

    pub const fn is_interface(self) -> bool {
        self.contains(Self::INTERFACE)
    }

    pub const fn is_abstract(self) -> bool {
        self.contains(Self::ABSTRACT)
    }

    /// True when the member is visible from a different package without an
    /// inheritance relationship being considered (public) or through one
    /// (protected).
    pub const fn is_cross_package_visible(self) -> bool {
        self.contains(Self::PUBLIC | Self::PROTECTED)
    }
}

impl std::fmt::Display for Modifiers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for (bit, word) in [
            (Self::PUBLIC, "public"),
            (Self::PRIVATE, "private"),
            (Self::PROTECTED, "protected"),
            (Self::STATIC, "static"),
            (Self::FINAL, "final"),
            (Self::ABSTRACT, "abstract"),
        ] {
            if self.contains(bit) {
                if !first {
                    f.write_str(" ")?;
                }
                f.write_str(word)?;
                first = false;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_and_with() {
        let m = Modifiers::empty().with(Modifiers::PUBLIC).with(Modifiers::STATIC);
        assert!(m.is_public());
        assert!(m.is_static());
        assert!(!m.is_private());
    }

    #[test]
    fn test_interface_bit_is_class_file_value() {
        assert_eq!(Modifiers::INTERFACE, 0x0200);
        assert!(Modifiers::new(0x0201).is_interface());
    }

    #[test]
    fn test_display_orders_keywords() {
        let m = Modifiers::new(Modifiers::PUBLIC | Modifiers::STATIC | Modifiers::FINAL);
        assert_eq!(m.to_string(), "public static final");
    }
}

//! Module namespaces and the qualified keys built from them.

use std::fmt;

/// A module's position in the global key space.
///
/// Components are separated by `/`. Empty components are ignored, so `""`
/// is the root namespace and `"basket/"` is the same as `"basket"`.
#[derive(Clone, Debug, Default, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct Namespace {
    pub components: Vec<String>,
}

impl Namespace {
    /// Parse a `/`-separated namespace.
    ///
    /// ```rust
    /// use statebind_core::Namespace;
    ///
    /// assert!(Namespace::new("").is_root());
    /// assert_eq!(Namespace::new("shop//basket/"), Namespace::new("shop/basket"));
    /// ```
    pub fn new(s: &str) -> Self {
        Namespace {
            components: s
                .split('/')
                .filter(|c| !c.is_empty())
                .map(|c| c.to_string())
                .collect(),
        }
    }

    /// The root namespace.
    pub fn root() -> Self {
        Self::default()
    }

    pub fn is_root(&self) -> bool {
        self.components.is_empty()
    }

    /// Namespace of a child module.
    #[must_use]
    pub fn child(&self, name: &str) -> Namespace {
        let mut components = self.components.clone();
        components.extend(Namespace::new(name).components);
        Namespace { components }
    }

    /// Qualify a handler key: `namespace/key`, or just `key` at the root.
    pub fn qualify(&self, key: &str) -> QualifiedKey {
        if self.is_root() {
            QualifiedKey(key.to_string())
        } else {
            QualifiedKey(format!("{}/{}", self, key))
        }
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.components.join("/"))
    }
}

impl From<&str> for Namespace {
    fn from(s: &str) -> Self {
        Namespace::new(s)
    }
}

/// The fully namespace-prefixed key a container registers a handler under.
#[derive(Clone, Debug, Default, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct QualifiedKey(String);

impl QualifiedKey {
    /// The empty key, bound by accessors built from untagged handlers.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for QualifiedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for QualifiedKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_qualifies_to_bare_key() {
        let ns = Namespace::root();
        assert_eq!(ns.qualify("language").as_str(), "language");
    }

    #[test]
    fn namespaced_key_is_prefixed() {
        let ns = Namespace::new("basket");
        assert_eq!(ns.qualify("isEmpty").as_str(), "basket/isEmpty");
    }

    #[test]
    fn nested_namespaces_join() {
        let ns = Namespace::new("shop").child("basket");
        assert_eq!(ns.to_string(), "shop/basket");
        assert_eq!(ns.qualify("PUSH_ITEM").as_str(), "shop/basket/PUSH_ITEM");
    }

    #[test]
    fn empty_components_are_normalized() {
        assert_eq!(Namespace::new("/basket/"), Namespace::new("basket"));
        assert!(Namespace::new("//").is_root());
    }

    #[test]
    fn empty_key_is_empty() {
        assert!(QualifiedKey::empty().is_empty());
        assert!(!Namespace::root().qualify("x").is_empty());
    }
}

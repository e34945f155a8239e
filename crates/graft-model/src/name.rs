//! Canonical names and type references.
//!
//! A [`ClassName`] is the canonical dotted name of a declaration
//! (`app.ui.HomeScreen`). A [`TypeRef`] is a possibly-parameterized use of a
//! name (`graft.runtime.Provider<app.Repo>`). Equality on both is structural,
//! so two independently-constructed references to the same type compare equal
//! regardless of where they were written.

use std::fmt;

/// Canonical dotted name of a class, interface, or annotation type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClassName(String);

impl ClassName {
    /// Creates a name from its canonical dotted form.
    pub fn new(canonical: impl Into<String>) -> Self {
        ClassName(canonical.into())
    }

    /// The full dotted name.
    pub fn canonical_name(&self) -> &str {
        &self.0
    }

    /// The segment after the last dot (the whole name if there is no dot).
    pub fn simple_name(&self) -> &str {
        match self.0.rfind('.') {
            Some(idx) => &self.0[idx + 1..],
            None => &self.0,
        }
    }

    /// Everything before the last dot, or the empty string for an unqualified
    /// name.
    pub fn package_name(&self) -> &str {
        match self.0.rfind('.') {
            Some(idx) => &self.0[..idx],
            None => "",
        }
    }

    /// A sibling name in the same package with the given simple name.
    ///
    /// Used to derive proxy names for package-private aggregated elements.
    pub fn peer(&self, simple_name: &str) -> ClassName {
        let pkg = self.package_name();
        if pkg.is_empty() {
            ClassName::new(simple_name)
        } else {
            ClassName::new(format!("{pkg}.{simple_name}"))
        }
    }
}

impl fmt::Display for ClassName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ClassName {
    fn from(value: &str) -> Self {
        ClassName::new(value)
    }
}

impl From<String> for ClassName {
    fn from(value: String) -> Self {
        ClassName(value)
    }
}

/// A possibly-parameterized reference to a type.
///
/// `TypeRef::new(name)` is a raw reference; `TypeRef::parameterized` attaches
/// type arguments. Raw and parameterized references to the same name are not
/// equal (`Map` vs `Map<K, V>`), which is what lets the multibinding
/// introspection reject raw collection types.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeRef {
    name: ClassName,
    arguments: Vec<TypeRef>,
}

impl TypeRef {
    /// A raw (non-generic) reference.
    pub fn new(name: impl Into<ClassName>) -> Self {
        TypeRef { name: name.into(), arguments: Vec::new() }
    }

    /// A parameterized reference.
    pub fn parameterized(name: impl Into<ClassName>, arguments: Vec<TypeRef>) -> Self {
        TypeRef { name: name.into(), arguments }
    }

    pub fn name(&self) -> &ClassName {
        &self.name
    }

    pub fn arguments(&self) -> &[TypeRef] {
        &self.arguments
    }

    pub fn is_parameterized(&self) -> bool {
        !self.arguments.is_empty()
    }

    /// The reference with its type arguments erased.
    pub fn raw(&self) -> TypeRef {
        TypeRef::new(self.name.clone())
    }

    /// Whether this is a reference to `name`, parameterized or not.
    pub fn is_type_of(&self, name: &ClassName) -> bool {
        &self.name == name
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if !self.arguments.is_empty() {
            write!(f, "<")?;
            for (i, arg) in self.arguments.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{arg}")?;
            }
            write!(f, ">")?;
        }
        Ok(())
    }
}

impl From<&str> for TypeRef {
    fn from(value: &str) -> Self {
        TypeRef::new(value)
    }
}

impl From<ClassName> for TypeRef {
    fn from(value: ClassName) -> Self {
        TypeRef::new(value)
    }
}

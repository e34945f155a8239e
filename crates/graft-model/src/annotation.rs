//! Annotation instances and their typed values.

use std::collections::BTreeMap;
use std::fmt;

use crate::name::{ClassName, TypeRef};

/// A single value inside an annotation instance.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AnnotationValue {
    Str(String),
    Type(ClassName),
    Bool(bool),
    Int(i64),
    Values(Vec<AnnotationValue>),
}

impl AnnotationValue {
    /// The key type a map contribution with this map-key value produces.
    pub fn key_type(&self) -> TypeRef {
        match self {
            AnnotationValue::Str(_) => TypeRef::new(crate::names::string()),
            AnnotationValue::Type(_) => TypeRef::new(crate::names::class()),
            AnnotationValue::Bool(_) => TypeRef::new(crate::names::boolean()),
            AnnotationValue::Int(_) => TypeRef::new(crate::names::int()),
            // A list map key has no meaningful key type; the multibinding
            // validator reports it against the contribution site.
            AnnotationValue::Values(_) => TypeRef::new(crate::names::class()),
        }
    }
}

impl fmt::Display for AnnotationValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnnotationValue::Str(s) => write!(f, "\"{s}\""),
            AnnotationValue::Type(t) => write!(f, "{t}"),
            AnnotationValue::Bool(b) => write!(f, "{b}"),
            AnnotationValue::Int(i) => write!(f, "{i}"),
            AnnotationValue::Values(vs) => {
                write!(f, "{{")?;
                for (i, v) in vs.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{v}")?;
                }
                write!(f, "}}")
            }
        }
    }
}

/// An annotation instance: the annotation type plus its member values.
///
/// Values are kept in a sorted map so equality and hashing are semantic, not
/// dependent on the order members were written in source.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Annotation {
    name: ClassName,
    values: BTreeMap<String, AnnotationValue>,
}

impl Annotation {
    pub fn of(name: impl Into<ClassName>) -> Self {
        Annotation { name: name.into(), values: BTreeMap::new() }
    }

    pub fn with_value(mut self, member: impl Into<String>, value: AnnotationValue) -> Self {
        self.values.insert(member.into(), value);
        self
    }

    pub fn with_type_value(self, member: impl Into<String>, ty: impl Into<ClassName>) -> Self {
        self.with_value(member, AnnotationValue::Type(ty.into()))
    }

    pub fn name(&self) -> &ClassName {
        &self.name
    }

    pub fn value(&self, member: &str) -> Option<&AnnotationValue> {
        self.values.get(member)
    }

    pub fn string_value(&self, member: &str) -> Option<&str> {
        match self.values.get(member) {
            Some(AnnotationValue::Str(s)) => Some(s),
            _ => None,
        }
    }

    pub fn type_value(&self, member: &str) -> Option<&ClassName> {
        match self.values.get(member) {
            Some(AnnotationValue::Type(t)) => Some(t),
            _ => None,
        }
    }

    /// Flattens a list-valued member into the class names it holds.
    /// Returns an empty list for an absent member.
    pub fn type_values(&self, member: &str) -> Vec<ClassName> {
        match self.values.get(member) {
            Some(AnnotationValue::Values(values)) => values
                .iter()
                .filter_map(|v| match v {
                    AnnotationValue::Type(t) => Some(t.clone()),
                    AnnotationValue::Str(s) => Some(ClassName::new(s.clone())),
                    _ => None,
                })
                .collect(),
            Some(AnnotationValue::Type(t)) => vec![t.clone()],
            _ => Vec::new(),
        }
    }
}

impl fmt::Display for Annotation {
    /// Renders `@pkg.Name` or `@pkg.Name(a=1, b="x")`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.name)?;
        if !self.values.is_empty() {
            write!(f, "(")?;
            for (i, (member, value)) in self.values.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{member}={value}")?;
            }
            write!(f, ")")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_semantic_equality_ignores_member_order() {
        let a = Annotation::of("graft.Named")
            .with_value("value", AnnotationValue::Str("db".into()))
            .with_value("group", AnnotationValue::Int(1));
        let b = Annotation::of("graft.Named")
            .with_value("group", AnnotationValue::Int(1))
            .with_value("value", AnnotationValue::Str("db".into()));
        assert_eq!(a, b);
    }

    #[test]
    fn test_type_values_flattening() {
        let ann = Annotation::of("graft.InstallIn").with_value(
            "components",
            AnnotationValue::Values(vec![
                AnnotationValue::Type(ClassName::new("a.Foo")),
                AnnotationValue::Str("b.Bar".into()),
            ]),
        );
        assert_eq!(
            ann.type_values("components"),
            vec![ClassName::new("a.Foo"), ClassName::new("b.Bar")]
        );
        assert!(ann.type_values("absent").is_empty());
    }

    #[test]
    fn test_display() {
        let ann = Annotation::of("graft.Named")
            .with_value("value", AnnotationValue::Str("db".into()));
        assert_eq!(ann.to_string(), "@graft.Named(value=\"db\")");
        assert_eq!(Annotation::of("graft.Singleton").to_string(), "@graft.Singleton");
    }

    #[test]
    fn test_map_key_type() {
        assert_eq!(
            AnnotationValue::Str("k".into()).key_type(),
            TypeRef::new(crate::names::string())
        );
        assert_eq!(
            AnnotationValue::Int(3).key_type(),
            TypeRef::new(crate::names::int())
        );
    }
}

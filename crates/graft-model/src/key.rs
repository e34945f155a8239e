//! Binding keys and scopes.
//!
//! A [`Key`] identifies one slot in the binding graph: the requested type
//! plus an optional qualifier annotation. Individual multibinding
//! contributions additionally carry a [`ContributionIdentifier`] so that
//! three `@IntoSet` methods producing the same type occupy three distinct
//! slots underneath the one synthetic `Set<T>` node.

use std::fmt;

use crate::annotation::Annotation;
use crate::name::{ClassName, TypeRef};

/// Identity of one binding slot.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Key {
    ty: TypeRef,
    qualifier: Option<Annotation>,
    multibinding_contribution: Option<ContributionIdentifier>,
}

impl Key {
    pub fn of(ty: impl Into<TypeRef>) -> Self {
        Key { ty: ty.into(), qualifier: None, multibinding_contribution: None }
    }

    pub fn qualified(ty: impl Into<TypeRef>, qualifier: Annotation) -> Self {
        Key { ty: ty.into(), qualifier: Some(qualifier), multibinding_contribution: None }
    }

    /// Derives the key of an individual multibinding contribution.
    ///
    /// The contribution identifier makes the key unique per contributing
    /// method, so contributions never collide with each other or with the
    /// synthetic collection binding they feed.
    pub fn contribution(self, identifier: ContributionIdentifier) -> Self {
        Key { multibinding_contribution: Some(identifier), ..self }
    }

    /// The same key with any contribution identifier stripped.
    pub fn without_contribution(&self) -> Key {
        Key {
            ty: self.ty.clone(),
            qualifier: self.qualifier.clone(),
            multibinding_contribution: None,
        }
    }

    pub fn ty(&self) -> &TypeRef {
        &self.ty
    }

    pub fn qualifier(&self) -> Option<&Annotation> {
        self.qualifier.as_ref()
    }

    pub fn multibinding_contribution(&self) -> Option<&ContributionIdentifier> {
        self.multibinding_contribution.as_ref()
    }

    pub fn is_contribution(&self) -> bool {
        self.multibinding_contribution.is_some()
    }

    /// The same qualifier attached to a different type. Used when wrapping
    /// or unwrapping framework types around a requested key.
    pub fn with_type(&self, ty: TypeRef) -> Key {
        Key {
            ty,
            qualifier: self.qualifier.clone(),
            multibinding_contribution: self.multibinding_contribution.clone(),
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(qualifier) = &self.qualifier {
            write!(f, "{qualifier} ")?;
        }
        write!(f, "{}", self.ty)?;
        if let Some(contribution) = &self.multibinding_contribution {
            write!(f, " [{contribution}]")?;
        }
        Ok(())
    }
}

/// Identifies one multibinding contribution site.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContributionIdentifier {
    pub module: ClassName,
    pub element: String,
}

impl ContributionIdentifier {
    pub fn new(module: ClassName, element: impl Into<String>) -> Self {
        ContributionIdentifier { module, element: element.into() }
    }
}

impl fmt::Display for ContributionIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.module, self.element)
    }
}

/// A scope annotation instance.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Scope(Annotation);

impl Scope {
    pub fn new(annotation: Annotation) -> Self {
        Scope(annotation)
    }

    pub fn annotation(&self) -> &Annotation {
        &self.0
    }

    pub fn name(&self) -> &ClassName {
        self.0.name()
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation::AnnotationValue;

    #[test]
    fn test_qualified_keys_are_distinct() {
        let plain = Key::of("app.Repo");
        let named = Key::qualified(
            "app.Repo",
            Annotation::of("graft.Named").with_value("value", AnnotationValue::Str("db".into())),
        );
        assert_ne!(plain, named);
    }

    #[test]
    fn test_contribution_keys_are_distinct_per_site() {
        let base = Key::of(TypeRef::parameterized("core.Set", vec!["app.Task".into()]));
        let a = base
            .clone()
            .contribution(ContributionIdentifier::new(ClassName::new("app.TasksModule"), "one"));
        let b = base
            .clone()
            .contribution(ContributionIdentifier::new(ClassName::new("app.TasksModule"), "two"));
        assert_ne!(a, b);
        assert_ne!(a, base);
        assert_eq!(a.without_contribution(), base);
    }

    #[test]
    fn test_display() {
        let named = Key::qualified(
            "app.Repo",
            Annotation::of("graft.Named").with_value("value", AnnotationValue::Str("db".into())),
        );
        assert_eq!(named.to_string(), "@graft.Named(value=\"db\") app.Repo");
    }
}

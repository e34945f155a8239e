//! Binding declarations.
//!
//! A [`Binding`] is one way of satisfying a [`Key`]: a `@Provides` method,
//! an `@Inject` constructor, a creator-bound instance, a getter on a
//! component dependency, or the synthetic collection node the resolver
//! fabricates over a key's multibinding contributions.

use std::fmt;

use crate::annotation::AnnotationValue;
use crate::key::{Key, Scope};
use crate::name::ClassName;
use crate::request::DependencyRequest;

/// What produced a binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BindingKind {
    /// A `@Provides` method on a module.
    Provision,
    /// An `@Inject`-annotated constructor.
    Injection,
    /// A `@BindsInstance` creator parameter.
    BoundInstance,
    /// A zero-argument getter on a component dependency.
    ComponentDependency,
    /// Synthetic collection binding aggregating multibinding contributions.
    Multibound,
}

/// How a binding contributes to its key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContributionType {
    /// The sole binding for its key.
    Unique,
    /// One element of a `Set<T>` (`@IntoSet`).
    Set,
    /// A batch of elements of a `Set<T>` (`@ElementsIntoSet`).
    SetValues,
    /// One entry of a `Map<K, V>` (`@IntoMap`).
    Map,
}

impl ContributionType {
    pub fn is_multibinding(self) -> bool {
        !matches!(self, ContributionType::Unique)
    }
}

/// One declared or synthetic way of satisfying a key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    pub key: Key,
    pub kind: BindingKind,
    pub contribution_type: ContributionType,
    pub scope: Option<Scope>,
    pub is_nullable: bool,
    /// Map key value of an `@IntoMap` contribution.
    pub map_key: Option<AnnotationValue>,
    pub dependencies: Vec<DependencyRequest>,
    /// Description of the declaring site, used in diagnostics
    /// (`"app.NetModule.provideClient()"`).
    pub declaring_site: String,
    /// Module that contributed the binding, if any.
    pub contributing_module: Option<ClassName>,
    /// Whether the contributing module must be instantiated to call the
    /// declaring method (non-static `@Provides` on a module without a
    /// default constructor still needs an instance).
    pub requires_module_instance: bool,
}

impl Binding {
    pub fn new(key: Key, kind: BindingKind, declaring_site: impl Into<String>) -> Self {
        Binding {
            key,
            kind,
            contribution_type: ContributionType::Unique,
            scope: None,
            is_nullable: false,
            map_key: None,
            dependencies: Vec::new(),
            declaring_site: declaring_site.into(),
            contributing_module: None,
            requires_module_instance: false,
        }
    }

    pub fn with_contribution_type(mut self, contribution_type: ContributionType) -> Self {
        self.contribution_type = contribution_type;
        self
    }

    pub fn with_scope(mut self, scope: Scope) -> Self {
        self.scope = Some(scope);
        self
    }

    pub fn with_map_key(mut self, map_key: AnnotationValue) -> Self {
        self.map_key = Some(map_key);
        self
    }

    pub fn with_dependency(mut self, dependency: DependencyRequest) -> Self {
        self.dependencies.push(dependency);
        self
    }

    pub fn with_dependencies(mut self, dependencies: Vec<DependencyRequest>) -> Self {
        self.dependencies = dependencies;
        self
    }

    pub fn from_module(mut self, module: ClassName, requires_instance: bool) -> Self {
        self.contributing_module = Some(module);
        self.requires_module_instance = requires_instance;
        self
    }

    pub fn nullable(mut self) -> Self {
        self.is_nullable = true;
        self
    }

    pub fn is_multibinding_contribution(&self) -> bool {
        self.contribution_type.is_multibinding()
    }
}

impl fmt::Display for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.key, self.declaring_site)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation::Annotation;

    #[test]
    fn test_contribution_type_classification() {
        assert!(!ContributionType::Unique.is_multibinding());
        assert!(ContributionType::Set.is_multibinding());
        assert!(ContributionType::SetValues.is_multibinding());
        assert!(ContributionType::Map.is_multibinding());
    }

    #[test]
    fn test_builder() {
        let binding = Binding::new(
            Key::of("app.Repo"),
            BindingKind::Provision,
            "app.RepoModule.provideRepo()",
        )
        .with_scope(Scope::new(Annotation::of("graft.Singleton")))
        .from_module(ClassName::new("app.RepoModule"), true);
        assert!(binding.scope.is_some());
        assert!(binding.requires_module_instance);
        assert_eq!(binding.to_string(), "app.Repo [app.RepoModule.provideRepo()]");
    }
}

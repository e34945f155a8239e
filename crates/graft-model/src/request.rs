//! Dependency requests and request-kind classification.
//!
//! A requested type is classified by peeling framework wrappers off it:
//! `Provider<Lazy<T>>` is a provider-of-lazy request for `T`, `Provider<T>`
//! a provider request, and so on. [`RequestKind::wrap`] is the strict
//! inverse, rebuilding the requested type from a kind and a key type.

use std::fmt;

use crate::key::Key;
use crate::name::TypeRef;
use crate::names;

/// How a dependency is requested at an injection site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestKind {
    /// A direct `T` request.
    Instance,
    /// `Provider<T>`.
    Provider,
    /// `Lazy<T>`.
    Lazy,
    /// `Provider<Lazy<T>>`.
    ProviderOfLazy,
    /// `Producer<T>`.
    Producer,
    /// `Produced<T>`.
    Produced,
}

impl RequestKind {
    /// Classifies a requested type, returning the kind and the key type the
    /// wrappers enclosed.
    pub fn from_type(ty: &TypeRef) -> (RequestKind, TypeRef) {
        if let Some(inner) = single_argument(ty, &names::provider()) {
            // Provider<Lazy<T>> is its own kind, not Provider of a Lazy key.
            if let Some(innermost) = single_argument(inner, &names::lazy()) {
                return (RequestKind::ProviderOfLazy, innermost.clone());
            }
            return (RequestKind::Provider, inner.clone());
        }
        if let Some(inner) = single_argument(ty, &names::lazy()) {
            return (RequestKind::Lazy, inner.clone());
        }
        if let Some(inner) = single_argument(ty, &names::producer()) {
            return (RequestKind::Producer, inner.clone());
        }
        if let Some(inner) = single_argument(ty, &names::produced()) {
            return (RequestKind::Produced, inner.clone());
        }
        (RequestKind::Instance, ty.clone())
    }

    /// Rebuilds the requested type for this kind around a key type.
    ///
    /// Strict inverse of [`RequestKind::from_type`]:
    /// `wrap(from_type(t).0, &from_type(t).1) == t` for every `t`.
    pub fn wrap(self, key_type: &TypeRef) -> TypeRef {
        match self {
            RequestKind::Instance => key_type.clone(),
            RequestKind::Provider => {
                TypeRef::parameterized(names::provider(), vec![key_type.clone()])
            }
            RequestKind::Lazy => TypeRef::parameterized(names::lazy(), vec![key_type.clone()]),
            RequestKind::ProviderOfLazy => TypeRef::parameterized(
                names::provider(),
                vec![TypeRef::parameterized(names::lazy(), vec![key_type.clone()])],
            ),
            RequestKind::Producer => {
                TypeRef::parameterized(names::producer(), vec![key_type.clone()])
            }
            RequestKind::Produced => {
                TypeRef::parameterized(names::produced(), vec![key_type.clone()])
            }
        }
    }

    /// Whether an edge requested this way breaks a dependency cycle.
    ///
    /// Provider-shaped requests defer construction to call time, so a cycle
    /// routed through one can still be instantiated.
    pub fn breaks_cycle(self) -> bool {
        matches!(
            self,
            RequestKind::Provider | RequestKind::Lazy | RequestKind::ProviderOfLazy
        )
    }
}

fn single_argument<'a>(ty: &'a TypeRef, wrapper: &crate::name::ClassName) -> Option<&'a TypeRef> {
    if ty.is_type_of(wrapper) && ty.arguments().len() == 1 {
        Some(&ty.arguments()[0])
    } else {
        None
    }
}

impl fmt::Display for RequestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RequestKind::Instance => "instance",
            RequestKind::Provider => "provider",
            RequestKind::Lazy => "lazy",
            RequestKind::ProviderOfLazy => "provider-of-lazy",
            RequestKind::Producer => "producer",
            RequestKind::Produced => "produced",
        };
        f.write_str(name)
    }
}

/// One edge in the binding graph: a key requested a certain way from a
/// certain site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyRequest {
    pub key: Key,
    pub kind: RequestKind,
    pub is_nullable: bool,
    /// Description of the requesting site, used in diagnostics
    /// (`"getRepo()"`, `"app.Repo(clock)"`).
    pub site: String,
}

impl DependencyRequest {
    pub fn new(key: Key, kind: RequestKind, site: impl Into<String>) -> Self {
        DependencyRequest { key, kind, is_nullable: false, site: site.into() }
    }

    pub fn nullable(mut self) -> Self {
        self.is_nullable = true;
        self
    }
}

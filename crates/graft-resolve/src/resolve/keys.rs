//! Key derivation and collection-type introspection.
//!
//! Keys are derived from annotated sites: the site's type is classified
//! into a request kind (peeling framework wrappers), and the site's
//! qualifier annotation, if any, becomes part of the key. [`MapType`] and
//! [`SetType`] introspect multibinding collection types; constructing one
//! from a raw collection is a resolver bug and asserts.

use graft_model::{
    names, Annotation, DependencyRequest, Key, RequestKind, SymbolTable, TypeRef,
};

/// The qualifier among a site's annotations, if any.
///
/// A qualifier is any annotation whose own type is meta-annotated
/// `@Qualifier`. Sites with more than one are malformed input; the first
/// wins here and the declaration validator reports the rest.
pub fn qualifier(annotations: &[Annotation], symbols: &SymbolTable) -> Option<Annotation> {
    annotations
        .iter()
        .find(|a| symbols.is_qualifier_annotation(a.name()))
        .cloned()
}

/// Derives the dependency request made by a site of type `ty`.
pub fn request_from_type(
    ty: &TypeRef,
    qualifier: Option<Annotation>,
    site: impl Into<String>,
) -> DependencyRequest {
    let (kind, key_type) = RequestKind::from_type(ty);
    let key = match qualifier {
        Some(qualifier) => Key::qualified(key_type, qualifier),
        None => Key::of(key_type),
    };
    DependencyRequest::new(key, kind, site)
}

/// An introspected `Map<K, V>` multibinding type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapType {
    key: TypeRef,
    value: TypeRef,
}

impl MapType {
    pub fn is_map(ty: &TypeRef) -> bool {
        ty.is_type_of(&names::map())
    }

    /// Introspects a map type.
    ///
    /// Asserts that `ty` is a two-argument `Map`: a raw map reaching this
    /// point means a resolver failed to classify the request upstream.
    pub fn of(ty: &TypeRef) -> MapType {
        assert!(Self::is_map(ty), "not a map type: {ty}");
        assert!(
            ty.arguments().len() == 2,
            "raw map cannot be introspected: {ty}"
        );
        MapType { key: ty.arguments()[0].clone(), value: ty.arguments()[1].clone() }
    }

    pub fn key_type(&self) -> &TypeRef {
        &self.key
    }

    pub fn value_type(&self) -> &TypeRef {
        &self.value
    }

    /// Classifies the value type, exposing whether contributions are
    /// requested through a framework wrapper (`Map<K, Provider<V>>`).
    pub fn value_request(&self) -> (RequestKind, TypeRef) {
        RequestKind::from_type(&self.value)
    }

    pub fn values_are_wrapped(&self) -> bool {
        self.value_request().0 != RequestKind::Instance
    }
}

/// An introspected `Set<E>` multibinding type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetType {
    element: TypeRef,
}

impl SetType {
    pub fn is_set(ty: &TypeRef) -> bool {
        ty.is_type_of(&names::set())
    }

    /// Introspects a set type. Asserts on a raw `Set`.
    pub fn of(ty: &TypeRef) -> SetType {
        assert!(Self::is_set(ty), "not a set type: {ty}");
        assert!(
            ty.arguments().len() == 1,
            "raw set cannot be introspected: {ty}"
        );
        SetType { element: ty.arguments()[0].clone() }
    }

    pub fn element_type(&self) -> &TypeRef {
        &self.element
    }

    pub fn element_request(&self) -> (RequestKind, TypeRef) {
        RequestKind::from_type(&self.element)
    }
}

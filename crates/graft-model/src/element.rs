//! Input elements and the symbol table.
//!
//! The compiler consumes already-structured declarations (metadata parsing
//! is an input adapter, not part of this engine). An [`Element`] is one
//! top-level declaration (an interface, class, or annotation type) with
//! its annotations, members, and supertypes. The [`SymbolTable`] owns all
//! elements visible in the current round.
//!
//! # Identity across rounds
//!
//! Every element carries an [`ElementId`] stamped on insertion. Ids embed
//! the table's generation counter, which [`SymbolTable::advance_generation`]
//! bumps when a processing round emits new sources: re-inserting "the same"
//! declaration in a later round yields a distinct id, so memoized resolvers
//! keyed by id never serve stale cross-round results.

use indexmap::IndexMap;

use crate::annotation::Annotation;
use crate::name::{ClassName, TypeRef};

/// Opaque, table-assigned identity of an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElementId {
    index: u64,
    generation: u32,
}

/// Kind of a top-level declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    Interface,
    Class,
    AnnotationType,
}

/// A method member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Method {
    pub name: String,
    pub parameters: Vec<Parameter>,
    pub return_type: TypeRef,
    pub is_static: bool,
    pub annotations: Vec<Annotation>,
}

impl Method {
    pub fn new(name: impl Into<String>, return_type: impl Into<TypeRef>) -> Self {
        Method {
            name: name.into(),
            parameters: Vec::new(),
            return_type: return_type.into(),
            is_static: false,
            annotations: Vec::new(),
        }
    }

    pub fn with_parameter(mut self, name: impl Into<String>, ty: impl Into<TypeRef>) -> Self {
        self.parameters.push(Parameter {
            name: name.into(),
            ty: ty.into(),
            annotations: Vec::new(),
        });
        self
    }

    pub fn with_annotated_parameter(
        mut self,
        name: impl Into<String>,
        ty: impl Into<TypeRef>,
        annotations: Vec<Annotation>,
    ) -> Self {
        self.parameters.push(Parameter { name: name.into(), ty: ty.into(), annotations });
        self
    }

    pub fn with_annotation(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }

    pub fn static_method(mut self) -> Self {
        self.is_static = true;
        self
    }

    pub fn annotation(&self, name: &ClassName) -> Option<&Annotation> {
        self.annotations.iter().find(|a| a.name() == name)
    }

    pub fn has_annotation(&self, name: &ClassName) -> bool {
        self.annotation(name).is_some()
    }
}

/// A method or constructor parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    pub name: String,
    pub ty: TypeRef,
    pub annotations: Vec<Annotation>,
}

impl Parameter {
    pub fn annotation(&self, name: &ClassName) -> Option<&Annotation> {
        self.annotations.iter().find(|a| a.name() == name)
    }

    pub fn has_annotation(&self, name: &ClassName) -> bool {
        self.annotation(name).is_some()
    }
}

/// A field member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub name: String,
    pub ty: TypeRef,
    pub is_static: bool,
}

/// A constructor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Constructor {
    pub parameters: Vec<Parameter>,
    pub annotations: Vec<Annotation>,
}

impl Constructor {
    pub fn has_annotation(&self, name: &ClassName) -> bool {
        self.annotations.iter().any(|a| a.name() == name)
    }
}

/// One top-level declaration.
#[derive(Debug, Clone)]
pub struct Element {
    id: ElementId,
    kind: ElementKind,
    name: ClassName,
    pub is_public: bool,
    pub annotations: Vec<Annotation>,
    /// Names of directly extended/implemented interfaces.
    pub interfaces: Vec<ClassName>,
    pub type_parameters: usize,
    pub methods: Vec<Method>,
    pub fields: Vec<Field>,
    pub constructors: Vec<Constructor>,
}

impl Element {
    fn new(kind: ElementKind, name: impl Into<ClassName>) -> Self {
        Element {
            // Placeholder until the table stamps the real id on insertion.
            id: ElementId { index: u64::MAX, generation: u32::MAX },
            kind,
            name: name.into(),
            is_public: true,
            annotations: Vec::new(),
            interfaces: Vec::new(),
            type_parameters: 0,
            methods: Vec::new(),
            fields: Vec::new(),
            constructors: Vec::new(),
        }
    }

    pub fn interface(name: impl Into<ClassName>) -> Self {
        Element::new(ElementKind::Interface, name)
    }

    pub fn class(name: impl Into<ClassName>) -> Self {
        Element::new(ElementKind::Class, name)
    }

    pub fn annotation_type(name: impl Into<ClassName>) -> Self {
        Element::new(ElementKind::AnnotationType, name)
    }

    pub fn with_annotation(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }

    pub fn with_interface(mut self, name: impl Into<ClassName>) -> Self {
        self.interfaces.push(name.into());
        self
    }

    pub fn with_type_parameters(mut self, count: usize) -> Self {
        self.type_parameters = count;
        self
    }

    pub fn with_method(mut self, method: Method) -> Self {
        self.methods.push(method);
        self
    }

    pub fn with_field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    pub fn with_constructor(mut self, constructor: Constructor) -> Self {
        self.constructors.push(constructor);
        self
    }

    pub fn package_private(mut self) -> Self {
        self.is_public = false;
        self
    }

    pub fn id(&self) -> ElementId {
        self.id
    }

    pub fn kind(&self) -> ElementKind {
        self.kind
    }

    pub fn name(&self) -> &ClassName {
        &self.name
    }

    pub fn annotation(&self, name: &ClassName) -> Option<&Annotation> {
        self.annotations.iter().find(|a| a.name() == name)
    }

    pub fn has_annotation(&self, name: &ClassName) -> bool {
        self.annotation(name).is_some()
    }

    /// Whether the element can be constructed without arguments: it declares
    /// no constructors at all, or at least one zero-parameter constructor.
    pub fn has_default_constructor(&self) -> bool {
        self.constructors.is_empty()
            || self.constructors.iter().any(|c| c.parameters.is_empty())
    }
}

/// All declarations visible to the current compilation.
///
/// Insertion order is preserved, and every lookup that enumerates elements
/// (package scans in particular) iterates in that order, which is what makes
/// diagnostic output deterministic.
#[derive(Debug, Default)]
pub struct SymbolTable {
    elements: IndexMap<ClassName, Element>,
    next_index: u64,
    generation: u32,
}

impl SymbolTable {
    pub fn new() -> Self {
        SymbolTable::default()
    }

    /// Inserts an element, stamping its identity. Re-inserting a name
    /// replaces the previous element under a fresh id.
    pub fn insert(&mut self, mut element: Element) -> ElementId {
        let id = ElementId { index: self.next_index, generation: self.generation };
        self.next_index += 1;
        element.id = id;
        self.elements.insert(element.name.clone(), element);
        id
    }

    pub fn type_element(&self, name: &ClassName) -> Option<&Element> {
        self.elements.get(name)
    }

    /// Every element, in insertion order.
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.elements.values()
    }

    /// All elements declared directly in `package`, in insertion order.
    pub fn package_elements(&self, package: &str) -> Vec<&Element> {
        self.elements
            .values()
            .filter(|e| e.name.package_name() == package)
            .collect()
    }

    pub fn has_package(&self, package: &str) -> bool {
        self.elements.values().any(|e| e.name.package_name() == package)
    }

    /// Marks the start of a new processing round. Elements inserted after
    /// this call get ids distinct from any earlier generation.
    pub fn advance_generation(&mut self) {
        self.generation += 1;
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }

    /// Whether `name` refers to an annotation type meta-annotated as a scope.
    pub fn is_scope_annotation(&self, name: &ClassName) -> bool {
        self.has_meta_annotation(name, &crate::names::scope())
    }

    /// Whether `name` refers to an annotation type meta-annotated as a
    /// qualifier.
    pub fn is_qualifier_annotation(&self, name: &ClassName) -> bool {
        self.has_meta_annotation(name, &crate::names::qualifier())
    }

    /// Whether `name` refers to an annotation type meta-annotated as a map
    /// key.
    pub fn is_map_key_annotation(&self, name: &ClassName) -> bool {
        self.has_meta_annotation(name, &crate::names::map_key())
    }

    fn has_meta_annotation(&self, name: &ClassName, meta: &ClassName) -> bool {
        self.type_element(name)
            .map(|e| e.has_annotation(meta))
            .unwrap_or(false)
    }
}

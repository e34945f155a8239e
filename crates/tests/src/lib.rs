//! Integration test harness for Graft.
//!
//! Builds full compilation scenarios: a symbol table pre-seeded with the
//! framework's well-known annotation types and the singleton component,
//! plus helpers for installing modules and entry points through real
//! aggregation markers, so tests exercise the same path a production
//! compilation takes.

use graft_aggregate::AggregatedDepsPayload;
use graft_compiler::{CompileOptions, CompileOutput};
use graft_model::{
    names, Annotation, AnnotationValue, ClassName, Element, Method, SymbolTable,
};

pub const SINGLETON: &str = "graft.components.SingletonComponent";
pub const SINGLETON_SCOPE: &str = "graft.Singleton";
pub const STRING_KEY: &str = "graft.multibindings.StringKey";

/// One compilation scenario under construction.
pub struct Scenario {
    symbols: SymbolTable,
    markers: usize,
}

impl Scenario {
    /// A scenario with the singleton component (scoped `@Singleton`) and
    /// the framework annotation types already declared.
    pub fn new() -> Self {
        let mut symbols = SymbolTable::new();
        symbols.insert(
            Element::annotation_type(SINGLETON_SCOPE)
                .with_annotation(Annotation::of(names::scope())),
        );
        symbols.insert(
            Element::annotation_type(STRING_KEY)
                .with_annotation(Annotation::of(names::map_key())),
        );
        symbols.insert(
            Element::interface(SINGLETON)
                .with_annotation(Annotation::of(names::define_component()))
                .with_annotation(Annotation::of(SINGLETON_SCOPE)),
        );
        Scenario { symbols, markers: 0 }
    }

    /// A scenario whose singleton component declares no scopes.
    pub fn without_singleton_scope() -> Self {
        let mut scenario = Scenario::new();
        scenario.symbols.insert(
            Element::interface(SINGLETON)
                .with_annotation(Annotation::of(names::define_component())),
        );
        scenario
    }

    pub fn insert(&mut self, element: Element) -> &mut Self {
        self.symbols.insert(element);
        self
    }

    /// Declares a child component under `parent`.
    pub fn define_subcomponent(&mut self, name: &str, parent: &str) -> &mut Self {
        self.insert(
            Element::interface(name).with_annotation(
                Annotation::of(names::define_component()).with_type_value("parent", parent),
            ),
        )
    }

    /// Inserts `module` and the marker installing it into `component`.
    pub fn install_module(&mut self, module: Element, component: &str) -> &mut Self {
        let payload = AggregatedDepsPayload {
            components: vec![component.into()],
            modules: vec![module.name().canonical_name().into()],
            ..AggregatedDepsPayload::default()
        };
        self.symbols.insert(module);
        self.marker(payload)
    }

    /// Inserts `entry_point` and the marker installing it into `component`.
    pub fn install_entry_point(&mut self, entry_point: Element, component: &str) -> &mut Self {
        let payload = AggregatedDepsPayload {
            components: vec![component.into()],
            entry_points: vec![entry_point.name().canonical_name().into()],
            ..AggregatedDepsPayload::default()
        };
        self.symbols.insert(entry_point);
        self.marker(payload)
    }

    fn marker(&mut self, payload: AggregatedDepsPayload) -> &mut Self {
        self.markers += 1;
        let name = format!("{}._Marker{}", names::AGGREGATED_DEPS_PACKAGE, self.markers);
        let encoded = payload.encode().expect("marker payload encodes");
        self.symbols.insert(Element::class(name).with_annotation(
            Annotation::of(names::aggregated_deps())
                .with_value("value", AnnotationValue::Str(encoded)),
        ));
        self
    }

    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    pub fn symbols_mut(&mut self) -> &mut SymbolTable {
        &mut self.symbols
    }

    pub fn compile(&self) -> CompileOutput {
        graft_compiler::compile(&self.symbols, &CompileOptions::default())
    }

    pub fn compile_with(&self, options: &CompileOptions) -> CompileOutput {
        graft_compiler::compile(&self.symbols, options)
    }
}

impl Default for Scenario {
    fn default() -> Self {
        Scenario::new()
    }
}

/// A `@Module` class with the given `@Provides` methods.
pub fn module(name: &str, methods: Vec<Method>) -> Element {
    let mut element = Element::class(name).with_annotation(Annotation::of(names::module()));
    for method in methods {
        element = element.with_method(method);
    }
    element
}

/// A static `@Provides` method.
pub fn provides(name: &str, return_type: impl Into<graft_model::TypeRef>) -> Method {
    Method::new(name, return_type)
        .with_annotation(Annotation::of(names::provides()))
        .static_method()
}

/// An entry-point interface with one accessor per (method, type) pair.
pub fn entry_point(name: &str, accessors: &[(&str, &str)]) -> Element {
    let mut element = Element::interface(name);
    for (method, ty) in accessors {
        element = element.with_method(Method::new(*method, *ty));
    }
    element
}

/// An `@IntoSet` contribution method.
pub fn into_set(method: Method) -> Method {
    method.with_annotation(Annotation::of(names::into_set()))
}

/// An `@IntoMap` contribution method keyed by a `StringKey`.
pub fn into_map_string_keyed(method: Method, key: &str) -> Method {
    method
        .with_annotation(Annotation::of(names::into_map()))
        .with_annotation(
            Annotation::of(STRING_KEY).with_value("value", AnnotationValue::Str(key.into())),
        )
}

pub fn singleton_component() -> ClassName {
    ClassName::new(SINGLETON)
}

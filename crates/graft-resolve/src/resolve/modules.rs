//! Binding extraction from modules, entry points, and injected classes.
//!
//! Modules contribute `@Provides` methods, entry points contribute the
//! requests that seed graph resolution, and classes with an `@Inject`
//! constructor contribute implicit fallback bindings. Everything extracted
//! here is declaration-local; cross-declaration problems are left to the
//! graph validators.

use graft_model::{
    names, Binding, BindingKind, ContributionIdentifier, ContributionType, DependencyRequest,
    Diagnostic, DiagnosticKind, Element, Key, Method, Scope, SymbolTable, TypeRef,
};

use crate::resolve::keys::{self, SetType};

/// Extracts the bindings declared by one module.
pub fn module_bindings(
    module: &Element,
    symbols: &SymbolTable,
    diagnostics: &mut Vec<Diagnostic>,
) -> Vec<Binding> {
    if !module.has_annotation(&names::module()) {
        diagnostics.push(
            Diagnostic::error(
                DiagnosticKind::InvalidModule,
                format!("{} is not annotated with @{}", module.name(), names::module()),
            )
            .with_element(module.name().clone()),
        );
        return Vec::new();
    }

    let mut bindings = Vec::new();
    for method in &module.methods {
        if !method.has_annotation(&names::provides()) {
            continue;
        }
        if let Some(binding) = provides_binding(module, method, symbols, diagnostics) {
            bindings.push(binding);
        }
    }
    bindings
}

/// Whether a module must be passed in explicitly rather than constructed by
/// the component: it has instance binding methods but no way to default-
/// construct it.
pub fn requires_instantiation(module: &Element) -> bool {
    let has_instance_bindings = module
        .methods
        .iter()
        .any(|m| !m.is_static && m.has_annotation(&names::provides()));
    has_instance_bindings && !module.has_default_constructor()
}

fn provides_binding(
    module: &Element,
    method: &Method,
    symbols: &SymbolTable,
    diagnostics: &mut Vec<Diagnostic>,
) -> Option<Binding> {
    let site = format!("{}.{}()", module.name(), method.name);
    let qualifier = keys::qualifier(&method.annotations, symbols);
    let provided = &method.return_type;

    let (contribution_type, key, map_key) = if method.has_annotation(&names::into_set()) {
        let set = TypeRef::parameterized(names::set(), vec![provided.clone()]);
        (ContributionType::Set, qualified(set, qualifier), None)
    } else if method.has_annotation(&names::elements_into_set()) {
        if !SetType::is_set(provided) || !provided.is_parameterized() {
            diagnostics.push(invalid_module(
                module,
                format!("@ElementsIntoSet method {}() must return a parameterized Set", method.name),
            ));
            return None;
        }
        (ContributionType::SetValues, qualified(provided.clone(), qualifier), None)
    } else if method.has_annotation(&names::into_map()) {
        let map_key = method
            .annotations
            .iter()
            .find(|a| symbols.is_map_key_annotation(a.name()));
        let map_key = match map_key {
            Some(annotation) => annotation,
            None => {
                diagnostics.push(invalid_module(
                    module,
                    format!("@IntoMap method {}() declares no map key", method.name),
                ));
                return None;
            }
        };
        let value = match map_key.value("value") {
            Some(value) => value.clone(),
            None => {
                diagnostics.push(invalid_module(
                    module,
                    format!("map key {} on {}() has no value", map_key.name(), method.name),
                ));
                return None;
            }
        };
        let map = TypeRef::parameterized(names::map(), vec![value.key_type(), provided.clone()]);
        (ContributionType::Map, qualified(map, qualifier), Some(value))
    } else {
        (ContributionType::Unique, qualified(provided.clone(), qualifier), None)
    };

    let key = if contribution_type.is_multibinding() {
        key.contribution(ContributionIdentifier::new(module.name().clone(), method.name.clone()))
    } else {
        key
    };

    let mut binding = Binding::new(key, BindingKind::Provision, site.clone())
        .with_contribution_type(contribution_type)
        .with_dependencies(parameter_requests(&site, method, symbols))
        .from_module(module.name().clone(), !method.is_static);
    if let Some(map_key) = map_key {
        binding = binding.with_map_key(map_key);
    }
    if let Some(scope) = scope_of(&method.annotations, symbols) {
        binding = binding.with_scope(scope);
    }
    if method.has_annotation(&names::nullable()) {
        binding = binding.nullable();
    }
    Some(binding)
}

/// The requests an entry-point interface makes: one per non-static
/// zero-argument method.
pub fn entry_point_requests(
    entry_point: &Element,
    symbols: &SymbolTable,
    diagnostics: &mut Vec<Diagnostic>,
) -> Vec<DependencyRequest> {
    let mut requests = Vec::new();
    for method in entry_point.methods.iter().filter(|m| !m.is_static) {
        if !method.parameters.is_empty() {
            diagnostics.push(
                Diagnostic::error(
                    DiagnosticKind::InvalidEntryPoint,
                    format!("entry point method {}() must take no arguments", method.name),
                )
                .with_element(entry_point.name().clone()),
            );
            continue;
        }
        let qualifier = keys::qualifier(&method.annotations, symbols);
        let mut request = keys::request_from_type(
            &method.return_type,
            qualifier,
            format!("{}()", method.name),
        );
        if method.has_annotation(&names::nullable()) {
            request = request.nullable();
        }
        requests.push(request);
    }
    requests
}

/// The implicit binding of a class with an `@Inject` constructor.
///
/// This is the fallback the graph factory uses when no module binds a
/// requested key: the type can construct itself.
pub fn injection_binding(class: &Element, symbols: &SymbolTable) -> Option<Binding> {
    let constructor = class
        .constructors
        .iter()
        .find(|c| c.has_annotation(&names::inject()))?;

    let site = format!(
        "{}({})",
        class.name(),
        constructor
            .parameters
            .iter()
            .map(|p| p.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    );
    let dependencies = constructor
        .parameters
        .iter()
        .map(|p| {
            keys::request_from_type(
                &p.ty,
                keys::qualifier(&p.annotations, symbols),
                site.clone(),
            )
        })
        .collect();

    let mut binding = Binding::new(Key::of(class.name().clone()), BindingKind::Injection, site)
        .with_dependencies(dependencies);
    if let Some(scope) = scope_of(&class.annotations, symbols) {
        binding = binding.with_scope(scope);
    }
    Some(binding)
}

fn parameter_requests(
    site: &str,
    method: &Method,
    symbols: &SymbolTable,
) -> Vec<DependencyRequest> {
    method
        .parameters
        .iter()
        .map(|p| {
            keys::request_from_type(
                &p.ty,
                keys::qualifier(&p.annotations, symbols),
                site.to_string(),
            )
        })
        .collect()
}

fn qualified(ty: TypeRef, qualifier: Option<graft_model::Annotation>) -> Key {
    match qualifier {
        Some(qualifier) => Key::qualified(ty, qualifier),
        None => Key::of(ty),
    }
}

fn scope_of(
    annotations: &[graft_model::Annotation],
    symbols: &SymbolTable,
) -> Option<Scope> {
    annotations
        .iter()
        .find(|a| symbols.is_scope_annotation(a.name()))
        .cloned()
        .map(Scope::new)
}

fn invalid_module(module: &Element, message: impl Into<String>) -> Diagnostic {
    Diagnostic::error(DiagnosticKind::InvalidModule, message)
        .with_element(module.name().clone())
}

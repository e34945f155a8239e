//! Component creator (builder) resolution.
//!
//! A creator is an interface with exactly one non-static zero-argument
//! method returning a component-defined type (the build method). Every
//! other non-static method must return the creator's own type, the fluent
//! setter shape. Setter parameters annotated `@BindsInstance` bind their
//! argument into the built component's graph.

use graft_model::{
    names, ClassName, CreatorDescriptor, Diagnostic, DiagnosticKind, Element, ElementKind, Key,
    RequestKind, SymbolTable,
};

use crate::resolve::keys;

/// Resolves one `@DefineComponentBuilder` element.
///
/// Returns `None` when the declaration is malformed; every problem found is
/// reported so the user sees the complete list at once.
pub fn resolve_creator(
    element: &Element,
    symbols: &SymbolTable,
    diagnostics: &mut Vec<Diagnostic>,
) -> Option<CreatorDescriptor> {
    let before = diagnostics.len();

    if element.kind() != ElementKind::Interface {
        diagnostics.push(invalid(element, "creator must be an interface"));
    }
    if element.type_parameters > 0 {
        diagnostics.push(invalid(element, "creator must not have type parameters"));
    }

    let mut build_methods = Vec::new();
    let mut bound_instances = Vec::new();
    for method in element.methods.iter().filter(|m| !m.is_static) {
        if method.parameters.is_empty() && is_component_type(method.return_type.name(), symbols) {
            build_methods.push(method);
            continue;
        }

        // Fluent setter shape: anything else non-static must give back the
        // creator itself.
        if !method.return_type.is_type_of(element.name()) {
            diagnostics.push(invalid(
                element,
                format!(
                    "method {}() must return the creator type {} or a component type",
                    method.name,
                    element.name()
                ),
            ));
            continue;
        }
        for parameter in &method.parameters {
            if parameter.has_annotation(&names::binds_instance()) {
                let qualifier = keys::qualifier(&parameter.annotations, symbols);
                let (kind, key_type) = RequestKind::from_type(&parameter.ty);
                if kind != RequestKind::Instance {
                    diagnostics.push(invalid(
                        element,
                        format!(
                            "@BindsInstance parameter {} must be an instance type, not {}",
                            parameter.name, parameter.ty
                        ),
                    ));
                    continue;
                }
                bound_instances.push(match qualifier {
                    Some(qualifier) => Key::qualified(key_type, qualifier),
                    None => Key::of(key_type),
                });
            }
        }
    }

    let build_method = match build_methods.as_slice() {
        [method] => method,
        [] => {
            diagnostics.push(invalid(
                element,
                "creator must declare exactly one zero-argument method returning its component",
            ));
            return None;
        }
        several => {
            let mut diag = invalid(
                element,
                "creator declares more than one zero-argument component-returning method",
            );
            for method in several {
                diag = diag.with_note(format!("candidate: {}()", method.name));
            }
            diagnostics.push(diag);
            return None;
        }
    };

    if diagnostics.len() > before {
        return None;
    }

    Some(CreatorDescriptor {
        element: element.id(),
        name: element.name().clone(),
        component: build_method.return_type.name().clone(),
        build_method: build_method.name.clone(),
        bound_instances,
    })
}

fn is_component_type(name: &ClassName, symbols: &SymbolTable) -> bool {
    symbols
        .type_element(name)
        .map(|e| e.has_annotation(&names::define_component()))
        .unwrap_or(false)
}

fn invalid(element: &Element, message: impl Into<String>) -> Diagnostic {
    Diagnostic::error(DiagnosticKind::InvalidCreator, message)
        .with_element(element.name().clone())
}

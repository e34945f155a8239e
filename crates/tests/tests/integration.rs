//! End-to-end compilation scenarios.
//!
//! Each test builds a full symbol table, installs declarations through real
//! aggregation markers, and runs the whole pipeline: store, descriptor
//! resolution, graph construction, validation.

use graft_aggregate::AggregatedDepsPayload;
use graft_compiler::{CollectingHost, DiagnosticReporter, Outcome, RoundDriver};
use graft_model::{
    names, Annotation, AnnotationValue, ClassName, Constructor, Diagnostic, DiagnosticKind,
    Element, Key, Method, Parameter, TypeRef,
};
use graft_tests::{
    entry_point, into_map_string_keyed, into_set, module, provides, singleton_component,
    Scenario, SINGLETON, SINGLETON_SCOPE,
};

fn set_of(element: &str) -> TypeRef {
    TypeRef::parameterized(names::set(), vec![element.into()])
}

fn map_of(key: &str, value: &str) -> TypeRef {
    TypeRef::parameterized(names::map(), vec![key.into(), value.into()])
}

fn provider_of(ty: &str) -> TypeRef {
    TypeRef::parameterized(names::provider(), vec![ty.into()])
}

#[test]
fn test_two_module_graph_resolves_clean() {
    let mut scenario = Scenario::new();
    scenario
        .install_module(module("app.ModuleA", vec![provides("provideString", "core.String")]), SINGLETON)
        .install_module(
            module(
                "app.ModuleB",
                vec![provides("provideInt", "core.Int").with_parameter("s", "core.String")],
            ),
            SINGLETON,
        )
        .install_entry_point(entry_point("app.Accessors", &[("getInt", "core.Int")]), SINGLETON);

    let output = scenario.compile();
    assert!(!output.has_errors(), "{:?}", output.diagnostics);
    assert_eq!(output.graphs.len(), 1);

    let graph = &output.graphs[0];
    assert_eq!(graph.component.name, singleton_component());
    assert_eq!(graph.nodes.len(), 2);
    assert!(graph.resolved(&Key::of("core.Int")).is_some());
    assert!(graph.resolved(&Key::of("core.String")).is_some());
}

#[test]
fn test_compilation_is_deterministic() {
    let build = || {
        let mut scenario = Scenario::new();
        scenario
            .install_module(module("app.M1", vec![provides("a", "app.A")]), SINGLETON)
            .install_module(module("app.M2", vec![provides("b", "app.B")]), SINGLETON)
            .install_entry_point(
                entry_point("app.E", &[("getA", "app.A"), ("getB", "app.B")]),
                SINGLETON,
            );
        scenario.compile()
    };

    let first = build();
    let second = build();
    assert_eq!(first.diagnostics, second.diagnostics);
    let keys = |output: &graft_compiler::CompileOutput| {
        output.graphs[0].nodes.keys().cloned().collect::<Vec<_>>()
    };
    assert_eq!(keys(&first), keys(&second));
}

#[test]
fn test_instance_cycle_reported() {
    let mut scenario = Scenario::new();
    scenario
        .install_module(
            module(
                "app.CycleModule",
                vec![
                    provides("provideA", "app.A").with_parameter("b", "app.B"),
                    provides("provideB", "app.B").with_parameter("a", "app.A"),
                ],
            ),
            SINGLETON,
        )
        .install_entry_point(entry_point("app.E", &[("getA", "app.A")]), SINGLETON);

    let output = scenario.compile();
    let cycle = output
        .diagnostics
        .iter()
        .find(|d| d.kind == DiagnosticKind::DependencyCycle)
        .expect("cycle diagnostic");
    assert!(cycle.message.contains("app.A"));
    assert!(cycle.message.contains("app.B"));
}

#[test]
fn test_provider_mediated_cycle_passes() {
    let mut scenario = Scenario::new();
    scenario
        .install_module(
            module(
                "app.CycleModule",
                vec![
                    provides("provideA", "app.A").with_parameter("b", "app.B"),
                    provides("provideB", "app.B").with_parameter("a", provider_of("app.A")),
                ],
            ),
            SINGLETON,
        )
        .install_entry_point(entry_point("app.E", &[("getA", "app.A")]), SINGLETON);

    let output = scenario.compile();
    assert!(
        !output.diagnostics.iter().any(|d| d.kind == DiagnosticKind::DependencyCycle),
        "{:?}",
        output.diagnostics
    );
}

#[test]
fn test_set_contributions_merge_regardless_of_order() {
    let modules: [fn() -> Element; 3] = [
        || module("app.M1", vec![into_set(provides("one", "app.Task"))]),
        || module("app.M2", vec![into_set(provides("two", "app.Task"))]),
        || module("app.M3", vec![into_set(provides("three", "app.Task"))]),
    ];

    for order in [[0, 1, 2], [2, 0, 1]] {
        let mut scenario = Scenario::new();
        for index in order {
            scenario.install_module(modules[index](), SINGLETON);
        }
        scenario.install_entry_point(
            Element::interface("app.E").with_method(Method::new("tasks", set_of("app.Task"))),
            SINGLETON,
        );

        let output = scenario.compile();
        assert!(!output.has_errors(), "{:?}", output.diagnostics);
        let node = output.graphs[0]
            .resolved(&Key::of(set_of("app.Task")))
            .expect("set node");
        let multibound = node.unique().expect("one synthetic binding");
        assert_eq!(multibound.dependencies.len(), 3);
    }
}

#[test]
fn test_map_key_collision_reported() {
    let mut scenario = Scenario::new();
    scenario
        .install_module(
            module("app.M1", vec![into_map_string_keyed(provides("sync", "app.Task"), "sync")]),
            SINGLETON,
        )
        .install_module(
            module("app.M2", vec![into_map_string_keyed(provides("other", "app.Task"), "sync")]),
            SINGLETON,
        )
        .install_entry_point(
            Element::interface("app.E")
                .with_method(Method::new("tasks", map_of("core.String", "app.Task"))),
            SINGLETON,
        );

    let output = scenario.compile();
    let collision = output
        .diagnostics
        .iter()
        .find(|d| d.kind == DiagnosticKind::DuplicateBinding)
        .expect("collision diagnostic");
    assert!(collision.message.contains("more than once"), "{}", collision.message);
}

#[test]
fn test_missing_binding_chain_from_entry_point() {
    let mut scenario = Scenario::new();
    scenario
        .install_module(
            module(
                "app.FooModule",
                vec![provides("provideFoo", "app.Foo").with_parameter("bar", "app.Bar")],
            ),
            SINGLETON,
        )
        .install_entry_point(entry_point("app.E", &[("getFoo", "app.Foo")]), SINGLETON);

    let output = scenario.compile();
    let missing: Vec<&Diagnostic> = output
        .diagnostics
        .iter()
        .filter(|d| d.kind == DiagnosticKind::MissingBinding)
        .collect();
    assert_eq!(missing.len(), 1);
    assert!(missing[0].message.contains("app.Bar cannot be provided"));
    assert_eq!(missing[0].notes[0], "requested at getFoo() → app.Foo → app.Bar");
}

#[test]
fn test_scoped_binding_in_unscoped_component_rejected() {
    let mut scenario = Scenario::new();
    scenario.define_subcomponent("app.RequestComponent", SINGLETON);
    scenario
        .install_module(
            module(
                "app.RepoModule",
                vec![provides("provideRepo", "app.Repo")
                    .with_annotation(Annotation::of(SINGLETON_SCOPE))],
            ),
            "app.RequestComponent",
        )
        .install_entry_point(
            entry_point("app.E", &[("getRepo", "app.Repo")]),
            "app.RequestComponent",
        );

    let output = scenario.compile();
    assert!(output
        .diagnostics
        .iter()
        .any(|d| d.kind == DiagnosticKind::IncompatiblyScoped));
}

#[test]
fn test_scoped_binding_in_matching_component_passes() {
    let mut scenario = Scenario::new();
    scenario
        .install_module(
            module(
                "app.RepoModule",
                vec![provides("provideRepo", "app.Repo")
                    .with_annotation(Annotation::of(SINGLETON_SCOPE))],
            ),
            SINGLETON,
        )
        .install_entry_point(entry_point("app.E", &[("getRepo", "app.Repo")]), SINGLETON);

    let output = scenario.compile();
    assert!(!output.has_errors(), "{:?}", output.diagnostics);
}

/// A module with an instance binding method and no zero-argument
/// constructor: the parent's factory method has to supply it.
fn uninstantiable_module(name: &str) -> Element {
    module(
        name,
        vec![Method::new("provideSession", "app.Session")
            .with_annotation(Annotation::of(names::provides()))],
    )
    .with_constructor(Constructor {
        parameters: vec![Parameter {
            name: "config".into(),
            ty: TypeRef::new("app.Config"),
            annotations: Vec::new(),
        }],
        annotations: Vec::new(),
    })
}

#[test]
fn test_factory_method_supplying_required_module_passes() {
    let mut scenario = Scenario::new();
    scenario.insert(
        Element::interface(SINGLETON)
            .with_annotation(Annotation::of(names::define_component()))
            .with_annotation(Annotation::of(SINGLETON_SCOPE))
            .with_method(
                Method::new("requestComponent", "app.RequestComponent")
                    .with_parameter("m", "app.RequestModule")
                    .static_method(),
            ),
    );
    scenario.define_subcomponent("app.RequestComponent", SINGLETON);
    scenario.install_module(uninstantiable_module("app.RequestModule"), "app.RequestComponent");

    let output = scenario.compile();
    assert!(!output.has_errors(), "{:?}", output.diagnostics);
    let factory_method = &output.graphs[0].factory_methods[0];
    assert_eq!(factory_method.subcomponent, ClassName::new("app.RequestComponent"));
    assert_eq!(factory_method.required_modules, vec![ClassName::new("app.RequestModule")]);
    assert_eq!(factory_method.supplied_modules, factory_method.required_modules);
}

#[test]
fn test_factory_method_omitting_required_module_rejected() {
    let mut scenario = Scenario::new();
    scenario.insert(
        Element::interface(SINGLETON)
            .with_annotation(Annotation::of(names::define_component()))
            .with_annotation(Annotation::of(SINGLETON_SCOPE))
            .with_method(
                Method::new("requestComponent", "app.RequestComponent").static_method(),
            ),
    );
    scenario.define_subcomponent("app.RequestComponent", SINGLETON);
    scenario.install_module(uninstantiable_module("app.RequestModule"), "app.RequestComponent");

    let output = scenario.compile();
    let rejected = output
        .diagnostics
        .iter()
        .find(|d| d.kind == DiagnosticKind::InvalidFactoryMethod)
        .expect("factory method diagnostic");
    assert!(rejected
        .notes
        .iter()
        .any(|n| n.contains("missing parameter") && n.contains("app.RequestModule")));
}

#[test]
fn test_deferred_module_resolves_in_a_later_round() {
    let mut scenario = Scenario::new();
    // The marker references a module no round has generated yet.
    scenario.insert(
        Element::class(format!("{}._GenMarker", names::AGGREGATED_DEPS_PACKAGE)).with_annotation(
            Annotation::of(names::aggregated_deps()).with_value(
                "value",
                AnnotationValue::Str(
                    AggregatedDepsPayload {
                        components: vec![SINGLETON.into()],
                        modules: vec!["app.GenModule".into()],
                        ..AggregatedDepsPayload::default()
                    }
                    .encode()
                    .unwrap(),
                ),
            ),
        ),
    );
    scenario.install_entry_point(entry_point("app.E", &[("getRepo", "app.Repo")]), SINGLETON);

    let mut driver = RoundDriver::new(3);
    driver.enqueue(names::define_component(), ClassName::new(SINGLETON));

    let mut host = CollectingHost::new();
    let generated = ClassName::new("app.GenModule");
    let ok = driver.run(
        scenario.symbols_mut(),
        &mut host,
        |item, symbols, reporter: &mut DiagnosticReporter| {
            if symbols.type_element(&generated).is_none() {
                // Simulate a generating processor emitting the module.
                symbols.insert(module("app.GenModule", vec![provides("repo", "app.Repo")]));
                reporter.record(
                    Diagnostic::error(
                        DiagnosticKind::DeferredType,
                        "app.GenModule is not resolvable in this round",
                    )
                    .with_element(item.element.clone()),
                );
                return Outcome::Deferred;
            }
            let output =
                graft_compiler::compile(symbols, &graft_compiler::CompileOptions::default());
            reporter.record_all(output.diagnostics);
            Outcome::Resolved
        },
    );

    assert!(ok, "{:?}", host.emitted);
    assert!(host.emitted.is_empty());
}

#[test]
fn test_full_graph_mode_validates_unassembled_modules() {
    let mut scenario = Scenario::new();
    scenario.install_module(
        module(
            "app.LibModule",
            vec![provides("provideFoo", "app.Foo").with_parameter("bar", "app.Bar")],
        ),
        "lib.FutureComponent",
    );

    let options = graft_compiler::CompileOptions {
        full_graph: true,
        ..graft_compiler::CompileOptions::default()
    };
    let output = scenario.compile_with(&options);
    // The library module's missing dependency surfaces without any real
    // component installing it.
    assert!(output
        .diagnostics
        .iter()
        .any(|d| d.kind == DiagnosticKind::MissingBinding));
}

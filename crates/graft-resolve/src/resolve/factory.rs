//! The binding graph factory.
//!
//! Builds one [`BindingGraph`] per component tree. Resolution is a
//! memoized fixed-point traversal: a frontier of requested keys is seeded
//! from entry points and bound instances, each key resolves to its
//! bindings, and each binding's own dependency requests join the frontier.
//! Already-resolved keys are never revisited, so diamond dependencies
//! resolve once.
//!
//! The factory never fails on user input. Unresolvable keys are recorded
//! in the graph's missing set, duplicates are kept side by side, and scope
//! mismatches are left in place: the validators need the complete shape of
//! the broken graph to render good diagnostics.

use std::cell::RefCell;
use std::sync::Arc;

use indexmap::{IndexMap, IndexSet};
use tracing::{debug, trace};

use graft_aggregate::ComponentDependencies;
use graft_model::{
    names, Binding, BindingGraph, BindingKind, ClassName, ComponentDescriptor, DependencyRequest,
    Diagnostic, Key, RequestKind, ResolvedBinding, SubcomponentFactoryMethod, SymbolTable,
};

use crate::resolve::keys::{self, MapType};
use crate::resolve::modules;

/// Builds binding graphs from resolved descriptors and aggregated
/// dependencies.
pub struct BindingGraphFactory<'a> {
    symbols: &'a SymbolTable,
    deps: &'a ComponentDependencies,
}

impl<'a> BindingGraphFactory<'a> {
    pub fn new(symbols: &'a SymbolTable, deps: &'a ComponentDependencies) -> Self {
        BindingGraphFactory { symbols, deps }
    }

    /// Builds the graph for `root` and, recursively, each descriptor in
    /// `all` whose parent is `root`.
    ///
    /// In full-graph mode every known declaration is seeded into the
    /// frontier, not only the keys reachable from entry points. Library
    /// authors use it to validate modules before any application assembles
    /// them into a real component.
    pub fn build(
        &self,
        root: Arc<ComponentDescriptor>,
        all: &[Arc<ComponentDescriptor>],
        full_graph: bool,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> BindingGraph {
        let frame = self.frame(root, None, diagnostics);
        let graph = self.build_frame(&frame, all, full_graph, diagnostics);
        debug!(
            component = %graph.component.name,
            nodes = graph.node_count(),
            full_graph,
            "binding graph built"
        );
        graph
    }

    fn build_frame(
        &self,
        frame: &Frame<'_>,
        all: &[Arc<ComponentDescriptor>],
        full_graph: bool,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> BindingGraph {
        // Seed the frontier. Entry points first, then creator-bound
        // instances, then (full graph only) every local declaration.
        let entry_points = self.entry_point_requests(frame, diagnostics);
        for request in &entry_points {
            frame.resolve(&request.key, self);
        }
        if let Some(creator) = &frame.component.creator {
            for key in &creator.bound_instances {
                frame.resolve(key, self);
            }
        }
        if full_graph {
            let local: Vec<Key> = frame
                .explicit
                .keys()
                .chain(frame.contributions.keys())
                .cloned()
                .collect();
            for key in local {
                frame.resolve(&key, self);
            }
        }

        let factory_methods = self.factory_methods(frame, all);

        // Children resolve after the parent's own frontier: inherited keys
        // they request land in this frame's node map as they go.
        let mut children = Vec::new();
        for descriptor in all {
            let is_child = descriptor
                .parent
                .as_ref()
                .map(|p| p.name == frame.component.name)
                .unwrap_or(false);
            if is_child {
                let child = self.frame(descriptor.clone(), Some(frame), diagnostics);
                children.push(self.build_frame(&child, all, full_graph, diagnostics));
            }
        }

        BindingGraph {
            component: frame.component.clone(),
            full_graph,
            nodes: frame.resolved.borrow().clone(),
            entry_points,
            missing: frame.missing.borrow().clone(),
            factory_methods,
            children,
        }
    }

    /// Collects the declarations installed into one component.
    fn frame<'f>(
        &self,
        component: Arc<ComponentDescriptor>,
        parent: Option<&'f Frame<'f>>,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Frame<'f> {
        let mut explicit: IndexMap<Key, Vec<Binding>> = IndexMap::new();
        let mut contributions: IndexMap<Key, Vec<Binding>> = IndexMap::new();

        for module_name in self.deps.modules(&component.name) {
            let module = match self.symbols.type_element(&module_name) {
                Some(module) => module,
                None => {
                    trace!(module = %module_name, "module not in this compilation, skipped");
                    continue;
                }
            };
            for binding in modules::module_bindings(module, self.symbols, diagnostics) {
                if binding.is_multibinding_contribution() {
                    contributions
                        .entry(binding.key.without_contribution())
                        .or_default()
                        .push(binding);
                } else {
                    explicit.entry(binding.key.clone()).or_default().push(binding);
                }
            }
        }

        if let Some(creator) = &component.creator {
            for key in &creator.bound_instances {
                let binding = Binding::new(
                    key.clone(),
                    BindingKind::BoundInstance,
                    format!("@BindsInstance {key}"),
                );
                explicit.entry(key.clone()).or_default().push(binding);
            }
        }

        for dependency in component.annotation.dependencies() {
            self.dependency_bindings(dependency, &mut explicit);
        }

        Frame {
            parent,
            component,
            explicit,
            contributions,
            resolved: RefCell::new(IndexMap::new()),
            resolving: RefCell::new(IndexSet::new()),
            missing: RefCell::new(IndexSet::new()),
        }
    }

    /// Zero-argument getters on a component dependency each provide their
    /// return type.
    fn dependency_bindings(
        &self,
        dependency: &ClassName,
        explicit: &mut IndexMap<Key, Vec<Binding>>,
    ) {
        let element = match self.symbols.type_element(dependency) {
            Some(element) => element,
            None => return,
        };
        for method in element.methods.iter().filter(|m| !m.is_static && m.parameters.is_empty()) {
            let qualifier = keys::qualifier(&method.annotations, self.symbols);
            let request = keys::request_from_type(
                &method.return_type,
                qualifier,
                format!("{}.{}()", dependency, method.name),
            );
            if request.kind != RequestKind::Instance {
                continue;
            }
            let binding = Binding::new(
                request.key.clone(),
                BindingKind::ComponentDependency,
                format!("{}.{}()", dependency, method.name),
            );
            explicit.entry(request.key).or_default().push(binding);
        }
    }

    fn entry_point_requests(
        &self,
        frame: &Frame<'_>,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Vec<DependencyRequest> {
        let mut requests = Vec::new();
        for name in self.deps.entry_points(&frame.component.name) {
            let element = match self.symbols.type_element(&name) {
                Some(element) => element,
                None => {
                    trace!(entry_point = %name, "entry point not in this compilation, skipped");
                    continue;
                }
            };
            requests.extend(modules::entry_point_requests(element, self.symbols, diagnostics));
        }
        requests
    }

    /// Methods on the component definition returning a child component are
    /// subcomponent factory methods. The validator compares their parameters
    /// against the child's instantiation requirements.
    fn factory_methods(
        &self,
        frame: &Frame<'_>,
        all: &[Arc<ComponentDescriptor>],
    ) -> Vec<SubcomponentFactoryMethod> {
        let element = match self.symbols.type_element(&frame.component.name) {
            Some(element) => element,
            None => return Vec::new(),
        };

        let mut methods = Vec::new();
        for method in &element.methods {
            let returned = method.return_type.name();
            let child = all.iter().find(|d| {
                &d.name == returned
                    && d.parent.as_ref().map(|p| p.name == frame.component.name).unwrap_or(false)
            });
            let child = match child {
                Some(child) => child,
                None => continue,
            };

            let supplied_modules: Vec<ClassName> =
                method.parameters.iter().map(|p| p.ty.name().clone()).collect();
            let required_modules: Vec<ClassName> = self
                .deps
                .modules(&child.name)
                .into_iter()
                .filter(|m| {
                    self.symbols
                        .type_element(m)
                        .map(modules::requires_instantiation)
                        .unwrap_or(false)
                })
                .collect();

            methods.push(SubcomponentFactoryMethod {
                method: format!("{}()", method.name),
                subcomponent: child.name.clone(),
                supplied_modules,
                required_modules,
            });
        }
        methods
    }
}

/// One component's resolution state. Frames chain to their parent, so a key
/// that cannot be satisfied locally falls back up the chain, and a binding
/// owned by an ancestor is resolved in the ancestor's frame, visible but
/// not re-resolved in the child.
struct Frame<'f> {
    parent: Option<&'f Frame<'f>>,
    component: Arc<ComponentDescriptor>,
    explicit: IndexMap<Key, Vec<Binding>>,
    /// Multibinding contributions grouped by their collection key.
    contributions: IndexMap<Key, Vec<Binding>>,
    resolved: RefCell<IndexMap<Key, ResolvedBinding>>,
    /// Keys currently on the resolution stack. Guards the traversal against
    /// dependency cycles; the cycle itself is the cycle validator's job.
    resolving: RefCell<IndexSet<Key>>,
    missing: RefCell<IndexSet<Key>>,
}

impl<'f> Frame<'f> {
    fn resolve(&self, key: &Key, factory: &BindingGraphFactory<'_>) {
        if self.resolved.borrow().contains_key(key) || self.resolving.borrow().contains(key) {
            return;
        }
        // An ancestor's node satisfies this key only when this frame adds
        // no contributions of its own; otherwise a local synthetic node
        // must union the whole chain's contributions.
        let inherited = self.parent.map(|p| p.is_resolved(key)).unwrap_or(false);
        if inherited && !self.has_local_contributions(key) {
            return;
        }
        self.resolving.borrow_mut().insert(key.clone());
        self.resolve_uncached(key, factory);
        self.resolving.borrow_mut().shift_remove(key);
    }

    fn resolve_uncached(&self, key: &Key, factory: &BindingGraphFactory<'_>) {
        trace!(%key, component = %self.component.name, "resolving");

        // Explicit bindings win. The nearest frame declaring the key owns
        // it and resolves its dependencies in its own scope.
        if let Some(owner) = self.frame_with_explicit(key) {
            let bindings = owner.explicit[key].clone();
            owner.install(key.clone(), bindings.clone());
            for binding in &bindings {
                for dependency in &binding.dependencies {
                    owner.resolve(&dependency.key, factory);
                }
            }
            return;
        }

        // Multibinding contributions merge across the whole chain into one
        // synthetic node at the deepest contributing frame.
        let contributions = self.collect_contributions(key);
        if !contributions.is_empty() {
            let owner = self.frame_with_contribution(key).unwrap_or(self);
            let mut dependencies = Vec::new();
            for contribution in &contributions {
                owner.install(contribution.key.clone(), vec![contribution.clone()]);
                for dependency in &contribution.dependencies {
                    owner.resolve(&dependency.key, factory);
                }
                dependencies.push(DependencyRequest::new(
                    contribution.key.clone(),
                    RequestKind::Instance,
                    contribution.declaring_site.clone(),
                ));
            }
            let synthetic = Binding::new(
                key.clone(),
                BindingKind::Multibound,
                format!("{key} (multibinding)"),
            )
            .with_dependencies(dependencies);
            owner.install(key.clone(), vec![synthetic]);
            return;
        }

        // Implicit fallback: the requested type injects itself. Ownership
        // follows the binding's scope up the chain.
        if key.qualifier().is_none() && !key.is_contribution() {
            if let Some(element) = factory.symbols.type_element(key.ty().name()) {
                if let Some(binding) = modules::injection_binding(element, factory.symbols) {
                    let owner = binding
                        .scope
                        .as_ref()
                        .and_then(|scope| self.frame_with_scope(scope))
                        .unwrap_or(self);
                    owner.install(key.clone(), vec![binding.clone()]);
                    for dependency in &binding.dependencies {
                        owner.resolve(&dependency.key, factory);
                    }
                    return;
                }
            }
        }

        self.missing.borrow_mut().insert(key.clone());
    }

    fn install(&self, key: Key, bindings: Vec<Binding>) {
        let owner = self.component.name.clone();
        let mut resolved = self.resolved.borrow_mut();
        match resolved.get_mut(&key) {
            Some(existing) => {
                for binding in bindings {
                    if !existing.bindings.contains(&binding) {
                        existing.bindings.push(binding);
                    }
                }
            }
            None => {
                resolved.insert(key.clone(), ResolvedBinding { key, bindings, owner });
            }
        }
    }

    fn is_resolved(&self, key: &Key) -> bool {
        if self.resolved.borrow().contains_key(key) {
            return true;
        }
        self.parent.map(|p| p.is_resolved(key)).unwrap_or(false)
    }

    fn frame_with_explicit(&self, key: &Key) -> Option<&Frame<'f>> {
        if self.explicit.contains_key(key) {
            return Some(self);
        }
        self.parent.and_then(|p| p.frame_with_explicit(key))
    }

    fn frame_with_contribution(&self, key: &Key) -> Option<&Frame<'f>> {
        if self.has_local_contributions(key) {
            return Some(self);
        }
        self.parent.and_then(|p| p.frame_with_contribution(key))
    }

    fn has_local_contributions(&self, key: &Key) -> bool {
        self.contributions.contains_key(key)
            || unwrapped_map_key(key)
                .map(|k| self.contributions.contains_key(&k))
                .unwrap_or(false)
    }

    /// Contributions for `key` from this frame and every ancestor. A map
    /// requested with framework-wrapped values (`Map<K, Provider<V>>`)
    /// matches contributions declared under the plain map key.
    fn collect_contributions(&self, key: &Key) -> Vec<Binding> {
        let mut all = Vec::new();
        let mut frame = Some(self);
        while let Some(current) = frame {
            if let Some(local) = current.contributions.get(key) {
                all.extend(local.iter().cloned());
            }
            if let Some(unwrapped) = unwrapped_map_key(key) {
                if let Some(local) = current.contributions.get(&unwrapped) {
                    all.extend(local.iter().cloned());
                }
            }
            frame = current.parent;
        }
        all
    }

    fn frame_with_scope(&self, scope: &graft_model::Scope) -> Option<&Frame<'f>> {
        if self.component.has_scope(scope) {
            return Some(self);
        }
        self.parent.and_then(|p| p.frame_with_scope(scope))
    }
}

/// `Map<K, Provider<V>>` and friends match contributions keyed `Map<K, V>`.
fn unwrapped_map_key(key: &Key) -> Option<Key> {
    if !MapType::is_map(key.ty()) || key.ty().arguments().len() != 2 {
        return None;
    }
    let map = MapType::of(key.ty());
    if !map.values_are_wrapped() {
        return None;
    }
    let (_, value) = map.value_request();
    let plain = graft_model::TypeRef::parameterized(
        names::map(),
        vec![map.key_type().clone(), value],
    );
    Some(key.with_type(plain))
}

//! Well-known names of the graft framework surface.
//!
//! Every annotation, wrapper type, and reserved component the compiler
//! recognizes is listed here, so the rest of the codebase never spells a
//! canonical name twice.

use crate::name::ClassName;

/// Package into which aggregated dependency markers are generated.
pub const AGGREGATED_DEPS_PACKAGE: &str = "graft_aggregated_deps";

/// Package into which uninstall-modules markers are generated.
pub const AGGREGATED_UNINSTALL_PACKAGE: &str = "graft_aggregated_uninstall_modules";

pub fn define_component() -> ClassName {
    ClassName::new("graft.DefineComponent")
}

pub fn define_component_builder() -> ClassName {
    ClassName::new("graft.DefineComponentBuilder")
}

/// Sentinel used as the default `parent` value of a component definition.
pub fn define_component_no_parent() -> ClassName {
    ClassName::new("graft.DefineComponentNoParent")
}

pub fn singleton_component() -> ClassName {
    ClassName::new("graft.components.SingletonComponent")
}

/// Pre-rename name of the singleton component, still found in markers
/// emitted by old compiler versions.
pub fn legacy_application_component() -> ClassName {
    ClassName::new("graft.components.ApplicationComponent")
}

pub fn aggregated_deps() -> ClassName {
    ClassName::new("graft.aggregateddeps.AggregatedDeps")
}

pub fn aggregated_element_proxy() -> ClassName {
    ClassName::new("graft.AggregatedElementProxy")
}

pub fn aggregated_uninstall_modules() -> ClassName {
    ClassName::new("graft.uninstallmodules.AggregatedUninstallModules")
}

pub fn module() -> ClassName {
    ClassName::new("graft.Module")
}

pub fn provides() -> ClassName {
    ClassName::new("graft.Provides")
}

pub fn inject() -> ClassName {
    ClassName::new("graft.Inject")
}

pub fn binds_instance() -> ClassName {
    ClassName::new("graft.BindsInstance")
}

pub fn entry_point() -> ClassName {
    ClassName::new("graft.EntryPoint")
}

pub fn into_set() -> ClassName {
    ClassName::new("graft.multibindings.IntoSet")
}

pub fn elements_into_set() -> ClassName {
    ClassName::new("graft.multibindings.ElementsIntoSet")
}

pub fn into_map() -> ClassName {
    ClassName::new("graft.multibindings.IntoMap")
}

/// Meta-annotation marking an annotation type as a map key.
pub fn map_key() -> ClassName {
    ClassName::new("graft.multibindings.MapKey")
}

/// Meta-annotation marking an annotation type as a scope.
pub fn scope() -> ClassName {
    ClassName::new("graft.Scope")
}

/// Meta-annotation marking an annotation type as a qualifier.
pub fn qualifier() -> ClassName {
    ClassName::new("graft.Qualifier")
}

pub fn singleton() -> ClassName {
    ClassName::new("graft.Singleton")
}

pub fn nullable() -> ClassName {
    ClassName::new("graft.Nullable")
}

// Wrapper types recognized by the request-kind classifier.

pub fn provider() -> ClassName {
    ClassName::new("graft.runtime.Provider")
}

pub fn lazy() -> ClassName {
    ClassName::new("graft.runtime.Lazy")
}

pub fn producer() -> ClassName {
    ClassName::new("graft.runtime.Producer")
}

pub fn produced() -> ClassName {
    ClassName::new("graft.runtime.Produced")
}

// Collection types used by multibindings.

pub fn map() -> ClassName {
    ClassName::new("core.Map")
}

pub fn set() -> ClassName {
    ClassName::new("core.Set")
}

pub fn string() -> ClassName {
    ClassName::new("core.String")
}

pub fn int() -> ClassName {
    ClassName::new("core.Int")
}

pub fn boolean() -> ClassName {
    ClassName::new("core.Bool")
}

/// Key type of a class-valued map key.
pub fn class() -> ClassName {
    ClassName::new("core.Class")
}

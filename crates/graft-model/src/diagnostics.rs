//! Compile-time error reporting and diagnostics.
//!
//! Every phase of the compiler reports through [`Diagnostic`]: validation
//! passes return `Vec<Diagnostic>` instead of failing on the first problem,
//! so a single compilation surfaces everything that is wrong with the graph.
//!
//! # Design
//!
//! - `Diagnostic` is a single report with a primary element and optional
//!   secondary labels and notes
//! - `DiagnosticKind` categorizes reports by the phase that produced them
//! - `Severity` distinguishes hard errors from warnings and notes

use std::fmt;

use crate::name::ClassName;

/// A single compilation report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Category of this report
    pub kind: DiagnosticKind,
    /// Severity level
    pub severity: Severity,
    /// Primary message
    pub message: String,
    /// Element the report is attached to, if any
    pub element: Option<ClassName>,
    /// Additional labeled elements
    pub labels: Vec<Label>,
    /// Additional notes or hints
    pub notes: Vec<String>,
}

/// Category of compilation report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticKind {
    // Component definition validation
    /// Malformed component definition
    InvalidComponent,
    /// Component parent chain loops back on itself
    ComponentCycle,
    /// Component takes a name reserved by the framework
    ReservedComponentName,
    /// Malformed component creator definition
    InvalidCreator,

    // Aggregation
    /// Malformed module definition
    InvalidModule,
    /// Malformed entry-point definition
    InvalidEntryPoint,
    /// Malformed aggregated marker
    InvalidAggregation,
    /// Installation target is not a known component
    UnknownComponent,

    // Graph validation
    /// More than one binding satisfies a key
    DuplicateBinding,
    /// A requested key has no binding
    MissingBinding,
    /// Binding dependency cycle with no breaking edge
    DependencyCycle,
    /// Scoped binding owned by a component without that scope
    IncompatiblyScoped,
    /// Conflicting multibinding contributions
    MultibindingConflict,
    /// Malformed subcomponent factory method
    InvalidFactoryMethod,
    /// Nullable binding requested at a non-nullable site
    NullableViolation,

    // Round processing
    /// Element refers to a type not yet generated
    DeferredType,

    /// Internal compiler error (bug in compiler)
    Internal,
}

impl DiagnosticKind {
    /// Human-readable name used in rendered output.
    pub fn name(self) -> &'static str {
        match self {
            DiagnosticKind::InvalidComponent => "invalid component",
            DiagnosticKind::ComponentCycle => "component cycle",
            DiagnosticKind::ReservedComponentName => "reserved component name",
            DiagnosticKind::InvalidCreator => "invalid creator",
            DiagnosticKind::InvalidModule => "invalid module",
            DiagnosticKind::InvalidEntryPoint => "invalid entry point",
            DiagnosticKind::InvalidAggregation => "invalid aggregation",
            DiagnosticKind::UnknownComponent => "unknown component",
            DiagnosticKind::DuplicateBinding => "duplicate binding",
            DiagnosticKind::MissingBinding => "missing binding",
            DiagnosticKind::DependencyCycle => "dependency cycle",
            DiagnosticKind::IncompatiblyScoped => "incompatibly scoped",
            DiagnosticKind::MultibindingConflict => "multibinding conflict",
            DiagnosticKind::InvalidFactoryMethod => "invalid factory method",
            DiagnosticKind::NullableViolation => "nullable violation",
            DiagnosticKind::DeferredType => "deferred type",
            DiagnosticKind::Internal => "internal compiler error",
        }
    }
}

/// Diagnostic severity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    /// Informational note (not an error)
    Note,
    /// Warning (graph is usable but suspicious)
    Warning,
    /// Error (compilation cannot proceed)
    Error,
}

/// Secondary labeled element in a diagnostic.
///
/// Points at related declarations ("also bound here").
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Label {
    pub element: ClassName,
    pub message: String,
}

impl Diagnostic {
    /// Creates an error diagnostic.
    pub fn error(kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self::with_severity(kind, Severity::Error, message.into())
    }

    /// Creates a warning diagnostic.
    pub fn warning(kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self::with_severity(kind, Severity::Warning, message.into())
    }

    /// Creates a note diagnostic.
    pub fn note(kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self::with_severity(kind, Severity::Note, message.into())
    }

    fn with_severity(kind: DiagnosticKind, severity: Severity, message: String) -> Self {
        Diagnostic {
            kind,
            severity,
            message,
            element: None,
            labels: Vec::new(),
            notes: Vec::new(),
        }
    }

    /// Attaches the primary element.
    pub fn with_element(mut self, element: ClassName) -> Self {
        self.element = Some(element);
        self
    }

    /// Adds a secondary labeled element.
    pub fn with_label(mut self, element: ClassName, message: impl Into<String>) -> Self {
        self.labels.push(Label { element, message: message.into() });
        self
    }

    /// Adds a note or hint.
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Note => write!(f, "note"),
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}: {}", self.severity, self.kind.name(), self.message)?;
        if let Some(element) = &self.element {
            write!(f, " [{element}]")?;
        }
        Ok(())
    }
}

impl std::error::Error for Diagnostic {}

/// Returns true if any diagnostic in the slice is a hard error.
pub fn has_errors(diagnostics: &[Diagnostic]) -> bool {
    diagnostics.iter().any(Diagnostic::is_error)
}

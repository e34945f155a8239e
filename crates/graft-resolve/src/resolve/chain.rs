//! Request-chain rendering.
//!
//! Validators describe a path through the graph as the sequence of sites
//! that requested each key, starting from the entry point. The rendered
//! form is what users see in cycle and missing-binding diagnostics.

/// Renders a request chain: `getFoo() → Foo → Bar`.
pub fn render(segments: &[String]) -> String {
    segments.join(" → ")
}

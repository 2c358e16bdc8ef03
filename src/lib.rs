//! ecs-lint: static analysis for ECS attribute usage.
//!
//! This library checks source declarations written against a
//! component-based entity framework and reports attribute-usage mistakes
//! as span-anchored diagnostics:
//!
//! - `#[filter(...)]` type arguments must implement `Component`
//! - `#[messager(...)]` type arguments must implement `Message`
//! - systems calling `get_unique::<T>()` are flagged when `T` lacks the
//!   `#[unique]` marker
//!
//! Checks arm themselves only when the framework's marker traits resolve
//! in the analyzed source; otherwise they stay silent rather than guess.

pub mod analysis;
pub mod diagnostics;
pub mod output;
pub mod testing;
pub mod util;

pub use analysis::{
    AnalysisEngine, Capability, CapabilityClassifier, FakeSymbolTable, HostSymbolTable, Rule,
    RuleRegistry, SymbolResolver,
};
pub use diagnostics::{Diagnostic, Severity, Span};
pub use output::{render_json, render_text, Format};

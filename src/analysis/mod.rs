//! Rule-evaluation engine for ECS attribute usage.
//!
//! ## Layered Architecture
//!
//! - **Symbols** (`symbols.rs`): the resolver seam; opaque type/attribute
//!   identities and first-class attribute applications
//! - **Host** (`host.rs`): the only syntax-aware layer, builds the symbol
//!   table from one `ra_ap_syntax` parse
//! - **Capability** (`capability.rs`): marker-contract classification by
//!   identity comparison, fail-open on unresolved markers
//! - **Rules** (`rules/`): stateless checks behind an explicit registry
//! - **Engine** (`engine.rs`): parallel trigger-site dispatch and the
//!   diagnostic sink

mod capability;
mod engine;
mod host;
mod symbols;

pub mod rules;

pub use capability::{Capability, CapabilityClassifier, CapabilityId};
pub use engine::{collect_sites, AnalysisEngine, DiagnosticSink};
pub use host::HostSymbolTable;
pub use rules::{
    FilterArgsRule, MessagerArgsRule, Rule, RuleCx, RuleDescriptor, RuleRegistry, TriggerKind,
    TriggerSite, UniqueUsageRule,
};
pub use symbols::{
    framework, AccessMode, AttrArg, AttrId, AttributeApplication, FakeSymbolTable, SymbolResolver,
    TypeId, TypeKind, TypeSymbol, UniqueAccess,
};

//! The rule set: stateless checks registered against trigger kinds.
//!
//! Rules are composed into an explicit [`RuleRegistry`] at startup; the
//! engine asks the registry which rules subscribe to a trigger kind and
//! invokes them with a borrowed [`RuleCx`]. A rule writes its diagnostics
//! into a per-invocation batch, which keeps each invocation side-effect
//! free and preserves left-to-right argument order when batches land in
//! the shared sink concurrently.

mod filter;
mod messager;
mod unique;

pub use filter::FilterArgsRule;
pub use messager::MessagerArgsRule;
pub use unique::UniqueUsageRule;

use crate::analysis::capability::CapabilityClassifier;
use crate::analysis::symbols::{AttributeApplication, SymbolResolver, TypeId};
use crate::diagnostics::{Diagnostic, Severity};

/// Syntax trigger kinds a rule can subscribe to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TriggerKind {
    /// An attribute argument list on a declaration.
    AttributeArgs,
    /// A struct declaration.
    TypeDecl,
}

/// Static identity and metadata of a rule.
#[derive(Debug)]
pub struct RuleDescriptor {
    /// Stable identifier surfaced in reports, e.g. `ECS0001`.
    pub id: &'static str,
    /// Short name used by expectation comments, e.g. `non_component`.
    pub name: &'static str,
    pub severity: Severity,
    pub description: &'static str,
}

/// Everything a rule invocation may consult.
pub struct RuleCx<'a> {
    pub resolver: &'a dyn SymbolResolver,
    pub classifier: &'a CapabilityClassifier<'a>,
}

/// One occurrence of a trigger in the analyzed source.
#[derive(Debug, Clone, Copy)]
pub enum TriggerSite<'a> {
    AttributeArgs {
        /// The annotated declaration.
        owner: TypeId,
        app: &'a AttributeApplication,
    },
    TypeDecl {
        ty: TypeId,
    },
}

impl TriggerSite<'_> {
    pub fn kind(&self) -> TriggerKind {
        match self {
            TriggerSite::AttributeArgs { .. } => TriggerKind::AttributeArgs,
            TriggerSite::TypeDecl { .. } => TriggerKind::TypeDecl,
        }
    }
}

/// A single analysis rule.
///
/// Implementations hold no mutable state; `check` may run concurrently
/// with itself across distinct sites.
pub trait Rule: Send + Sync {
    fn descriptor(&self) -> &'static RuleDescriptor;

    /// Trigger kinds this rule subscribes to.
    fn triggers(&self) -> &'static [TriggerKind];

    /// Inspect one trigger site, appending any diagnostics to `out` in
    /// left-to-right source order.
    fn check(&self, cx: &RuleCx<'_>, site: &TriggerSite<'_>, out: &mut Vec<Diagnostic>);
}

/// The explicit trigger-kind → rules mapping, fixed at construction.
pub struct RuleRegistry {
    rules: Vec<Box<dyn Rule>>,
}

impl RuleRegistry {
    pub fn new(rules: Vec<Box<dyn Rule>>) -> Self {
        Self { rules }
    }

    /// The shipped rule set.
    pub fn default_rules() -> Self {
        Self::new(vec![
            Box::new(FilterArgsRule),
            Box::new(MessagerArgsRule),
            Box::new(UniqueUsageRule),
        ])
    }

    pub fn rules_for<'a>(&'a self, kind: TriggerKind) -> impl Iterator<Item = &'a dyn Rule> + 'a {
        self.rules
            .iter()
            .map(|r| r.as_ref())
            .filter(move |r| r.triggers().contains(&kind))
    }

    pub fn descriptors(&self) -> impl Iterator<Item = &'static RuleDescriptor> + '_ {
        self.rules.iter().map(|r| r.descriptor())
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// All descriptors shipped with the default registry, for consumers that
/// map rule ids back to metadata (the test matcher, report tooling).
pub fn all_descriptors() -> [&'static RuleDescriptor; 3] {
    [
        &filter::FILTER_ARGS,
        &messager::MESSAGER_ARGS,
        &unique::UNIQUE_USAGE,
    ]
}

/// Look up a descriptor by its stable id.
pub fn descriptor_for_id(id: &str) -> Option<&'static RuleDescriptor> {
    all_descriptors().into_iter().find(|d| d.id == id)
}

/// Look up a descriptor by its short name.
pub fn descriptor_for_name(name: &str) -> Option<&'static RuleDescriptor> {
    all_descriptors().into_iter().find(|d| d.name == name)
}

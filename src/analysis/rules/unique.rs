//! Systems retrieving a singleton entity must retrieve a `#[unique]`
//! component.
//!
//! `get_unique::<T>()` silently picks an arbitrary entity when more than
//! one carries `T`; the `#[unique]` marker is the author's assertion that
//! this cannot happen.

use crate::analysis::capability::Capability;
use crate::analysis::rules::{Rule, RuleCx, RuleDescriptor, TriggerKind, TriggerSite};
use crate::diagnostics::{Diagnostic, Severity};

pub static UNIQUE_USAGE: RuleDescriptor = RuleDescriptor {
    id: "ECS0003",
    name: "unmarked_unique",
    severity: Severity::Warning,
    description: "components retrieved with get_unique should carry #[unique]",
};

/// Checks struct declarations. Non-systems are ignored; for systems, every
/// recorded `get_unique` call site whose component type resolves but lacks
/// the `#[unique]` marker gets one diagnostic at the call site.
pub struct UniqueUsageRule;

impl Rule for UniqueUsageRule {
    fn descriptor(&self) -> &'static RuleDescriptor {
        &UNIQUE_USAGE
    }

    fn triggers(&self) -> &'static [TriggerKind] {
        &[TriggerKind::TypeDecl]
    }

    fn check(&self, cx: &RuleCx<'_>, site: &TriggerSite<'_>, out: &mut Vec<Diagnostic>) {
        let TriggerSite::TypeDecl { ty } = site else {
            return;
        };
        if !cx.classifier.satisfies(*ty, Capability::System) {
            return;
        }

        for access in cx.resolver.unique_accesses(*ty) {
            let Some(component) = access.resolved else {
                tracing::debug!(
                    component = %access.component,
                    "get_unique component does not resolve, skipping"
                );
                continue;
            };
            if !cx.classifier.satisfies(component, Capability::Unique) {
                out.push(Diagnostic::warning(
                    UNIQUE_USAGE.id,
                    format!(
                        "`get_unique::<{}>()` retrieves a component not marked `#[{}]`",
                        access.component,
                        Capability::Unique.expected_name()
                    ),
                    access.span,
                ));
            }
        }
    }
}

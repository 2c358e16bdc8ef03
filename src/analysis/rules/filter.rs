//! Every type argument of `#[filter(...)]` must be a Component.

use crate::analysis::capability::Capability;
use crate::analysis::rules::{Rule, RuleCx, RuleDescriptor, TriggerKind, TriggerSite};
use crate::analysis::symbols::{framework, AttrArg};
use crate::diagnostics::{Diagnostic, Severity};

pub static FILTER_ARGS: RuleDescriptor = RuleDescriptor {
    id: "ECS0001",
    name: "non_component",
    severity: Severity::Warning,
    description: "types passed to #[filter] must implement Component",
};

/// Checks `#[filter]` argument lists. Mode arguments are skipped; each
/// resolved type argument that is not a Component gets one diagnostic at
/// exactly its own span, left to right.
pub struct FilterArgsRule;

impl Rule for FilterArgsRule {
    fn descriptor(&self) -> &'static RuleDescriptor {
        &FILTER_ARGS
    }

    fn triggers(&self) -> &'static [TriggerKind] {
        &[TriggerKind::AttributeArgs]
    }

    fn check(&self, cx: &RuleCx<'_>, site: &TriggerSite<'_>, out: &mut Vec<Diagnostic>) {
        let TriggerSite::AttributeArgs { app, .. } = site else {
            return;
        };
        let Some(filter) = cx.resolver.resolve_attr(framework::FILTER_ATTR) else {
            return;
        };
        if app.attr != filter {
            return;
        }
        // Without a resolvable Component marker there is no contract to
        // check against; stay silent rather than flag everything.
        if cx.classifier.resolved(Capability::Component).is_none() {
            return;
        }

        for arg in &app.args {
            let AttrArg::Type {
                name,
                resolved,
                span,
            } = arg
            else {
                continue;
            };
            let Some(ty) = resolved else {
                // Unresolved arguments never produce diagnostics.
                tracing::debug!(arg = %name, "filter argument does not resolve, skipping");
                continue;
            };
            if !cx.classifier.satisfies(*ty, Capability::Component) {
                out.push(Diagnostic::warning(
                    FILTER_ARGS.id,
                    format!(
                        "type `{}` in `#[filter]` does not implement `{}`",
                        name,
                        Capability::Component.expected_name()
                    ),
                    *span,
                ));
            }
        }
    }
}

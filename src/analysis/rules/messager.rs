//! Every type argument of `#[messager(...)]` must be a Message.

use crate::analysis::capability::{Capability, CapabilityId};
use crate::analysis::rules::{Rule, RuleCx, RuleDescriptor, TriggerKind, TriggerSite};
use crate::analysis::symbols::AttrArg;
use crate::diagnostics::{Diagnostic, Severity};

pub static MESSAGER_ARGS: RuleDescriptor = RuleDescriptor {
    id: "ECS0002",
    name: "non_message",
    severity: Severity::Warning,
    description: "types passed to #[messager] must implement Message",
};

/// Checks `#[messager]` argument lists, same shape as the filter rule with
/// the Message capability. The subscription attribute itself is identified
/// through the capability table rather than by name.
pub struct MessagerArgsRule;

impl Rule for MessagerArgsRule {
    fn descriptor(&self) -> &'static RuleDescriptor {
        &MESSAGER_ARGS
    }

    fn triggers(&self) -> &'static [TriggerKind] {
        &[TriggerKind::AttributeArgs]
    }

    fn check(&self, cx: &RuleCx<'_>, site: &TriggerSite<'_>, out: &mut Vec<Diagnostic>) {
        let TriggerSite::AttributeArgs { app, .. } = site else {
            return;
        };
        let Some(CapabilityId::Attr(messager)) = cx.classifier.resolved(Capability::Messager)
        else {
            return;
        };
        if app.attr != messager {
            return;
        }
        if cx.classifier.resolved(Capability::Message).is_none() {
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
                tracing::debug!(arg = %name, "messager argument does not resolve, skipping");
                continue;
            };
            if !cx.classifier.satisfies(*ty, Capability::Message) {
                out.push(Diagnostic::warning(
                    MESSAGER_ARGS.id,
                    format!(
                        "type `{}` in `#[messager]` does not implement `{}`",
                        name,
                        Capability::Message.expected_name()
                    ),
                    *span,
                ));
            }
        }
    }
}

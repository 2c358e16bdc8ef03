//! Dispatch engine: drives registered rules over one pass.
//!
//! The engine collects trigger sites from the resolver, fans them out over
//! a worker pool, and gathers diagnostics through a shared append-only
//! sink. Inter-site ordering is unspecified during emission; the final
//! report is sorted by span, which both restores determinism and keeps the
//! left-to-right order of diagnostics within one argument list.

use std::sync::Mutex;

use rayon::prelude::*;

use crate::analysis::capability::CapabilityClassifier;
use crate::analysis::host::HostSymbolTable;
use crate::analysis::rules::{RuleCx, RuleRegistry, TriggerSite};
use crate::analysis::symbols::{SymbolResolver, TypeKind};
use crate::diagnostics::Diagnostic;

/// Append-only diagnostic accumulator, safe under concurrent writers.
#[derive(Debug, Default)]
pub struct DiagnosticSink {
    diagnostics: Mutex<Vec<Diagnostic>>,
}

impl DiagnosticSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Report one rule invocation's batch. Batching keeps a single
    /// argument list's diagnostics contiguous regardless of interleaving.
    pub fn report(&self, batch: Vec<Diagnostic>) {
        if batch.is_empty() {
            return;
        }
        self.diagnostics
            .lock()
            .expect("diagnostic sink poisoned")
            .extend(batch);
    }

    /// Drain into the final report, sorted by span then rule id.
    pub fn finish(self) -> Vec<Diagnostic> {
        let mut diagnostics = self
            .diagnostics
            .into_inner()
            .expect("diagnostic sink poisoned");
        diagnostics.sort_by_key(|d| (d.span.start, d.span.end, d.rule));
        diagnostics
    }
}

/// Collect every trigger site the resolver knows about, in declaration
/// order: one `AttributeArgs` site per attribute application carrying an
/// argument list, one `TypeDecl` site per struct declaration.
pub fn collect_sites(resolver: &dyn SymbolResolver) -> Vec<TriggerSite<'_>> {
    let mut sites = Vec::new();
    for id in resolver.type_ids() {
        let symbol = resolver.symbol(id);
        for app in &symbol.attrs {
            if app.has_arg_list {
                sites.push(TriggerSite::AttributeArgs { owner: id, app });
            }
        }
        if symbol.kind == TypeKind::Struct {
            sites.push(TriggerSite::TypeDecl { ty: id });
        }
    }
    sites
}

/// The analyzer: a rule registry plus the per-pass drive loop.
pub struct AnalysisEngine {
    registry: RuleRegistry,
}

impl AnalysisEngine {
    pub fn new(registry: RuleRegistry) -> Self {
        Self { registry }
    }

    pub fn with_default_rules() -> Self {
        Self::new(RuleRegistry::default_rules())
    }

    /// Run every registered rule against every matching trigger site.
    pub fn run(&self, resolver: &dyn SymbolResolver) -> Vec<Diagnostic> {
        let classifier = CapabilityClassifier::new(resolver);
        let cx = RuleCx {
            resolver,
            classifier: &classifier,
        };
        let sites = collect_sites(resolver);
        tracing::debug!(sites = sites.len(), "dispatching trigger sites");

        let sink = DiagnosticSink::new();
        sites.par_iter().for_each(|site| {
            for rule in self.registry.rules_for(site.kind()) {
                let mut batch = Vec::new();
                rule.check(&cx, site, &mut batch);
                sink.report(batch);
            }
        });
        sink.finish()
    }

    /// Parse `source` through the host adapter and analyze it.
    pub fn analyze(&self, source: &str) -> Vec<Diagnostic> {
        let table = HostSymbolTable::build(source);
        self.run(&table)
    }
}

impl Default for AnalysisEngine {
    fn default() -> Self {
        Self::with_default_rules()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::symbols::{AccessMode, FakeSymbolTable};
    use crate::diagnostics::Span;

    fn framework_table() -> (FakeSymbolTable, crate::analysis::symbols::TypeId) {
        let mut table = FakeSymbolTable::new();
        let component = table.add_trait("Component");
        table.add_trait("Message");
        table.add_trait("System");
        (table, component)
    }

    #[test]
    fn test_one_diagnostic_per_offending_argument() {
        let (mut table, component) = framework_table();
        let message_trait = table.resolve_type("Message").unwrap();

        let msg = table.add_struct("Hit");
        table.implement(msg, message_trait);
        let pos = table.add_struct("Position");
        table.implement(pos, component);
        let plain = table.add_struct("Plain");
        let _ = plain;

        let system = table.add_struct("BadSystem");
        let args = vec![
            table.mode_arg(AccessMode::Read, Span::new(10, 14)),
            table.type_arg("Hit", Span::new(16, 19)),
            table.type_arg("Position", Span::new(21, 29)),
            table.type_arg("Plain", Span::new(31, 36)),
        ];
        table.attach_attr(system, "filter", args);

        let engine = AnalysisEngine::with_default_rules();
        let diagnostics = engine.run(&table);

        assert_eq!(diagnostics.len(), 2);
        // Left-to-right order, spans bounding exactly the offending args.
        assert_eq!(diagnostics[0].span, Span::new(16, 19));
        assert_eq!(diagnostics[1].span, Span::new(31, 36));
        assert!(diagnostics.iter().all(|d| d.rule == "ECS0001"));
    }

    #[test]
    fn test_all_valid_arguments_emit_nothing() {
        let (mut table, component) = framework_table();
        let pos = table.add_struct("Position");
        table.implement(pos, component);

        let system = table.add_struct("GoodSystem");
        let args = vec![
            table.mode_arg(AccessMode::Read, Span::new(10, 14)),
            table.type_arg("Position", Span::new(16, 24)),
        ];
        table.attach_attr(system, "filter", args);

        let engine = AnalysisEngine::with_default_rules();
        assert!(engine.run(&table).is_empty());
    }

    #[test]
    fn test_missing_framework_fails_open() {
        // No marker traits declared at all.
        let mut table = FakeSymbolTable::new();
        let plain = table.add_struct("Plain");
        let system = table.add_struct("BadSystem");
        let args = vec![table.type_arg("Plain", Span::new(16, 21))];
        table.attach_attr(system, "filter", args);
        let _ = plain;

        let engine = AnalysisEngine::with_default_rules();
        assert!(engine.run(&table).is_empty());
    }

    #[test]
    fn test_run_is_idempotent() {
        let (mut table, _component) = framework_table();
        let plain = table.add_struct("Plain");
        let _ = plain;
        let system = table.add_struct("BadSystem");
        let args = vec![table.type_arg("Plain", Span::new(16, 21))];
        table.attach_attr(system, "filter", args);

        let engine = AnalysisEngine::with_default_rules();
        let first = engine.run(&table);
        let second = engine.run(&table);
        assert_eq!(first, second);
    }
}

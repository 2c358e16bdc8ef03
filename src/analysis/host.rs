//! Host adapter: builds a [`HostSymbolTable`] from one parsed source file.
//!
//! This is the only module that touches the syntax tree. It materializes,
//! once per pass, everything the rules consume: declared types, attribute
//! applications split into arguments with exact spans, `impl Trait for
//! Type` edges with their transitive closure, and `get_unique::<T>()`
//! call sites attributed to the enclosing type. Malformed shapes degrade
//! to "no data" — a declaration the adapter cannot make sense of simply
//! contributes nothing.
//!
//! Resolution is single-file and syntactic: names resolve by their final
//! path segment against declarations in the same compilation unit, and a
//! retrieval call site is any method call named `get_unique` carrying a
//! type argument. The framework prelude (the `Component`/`Message`/
//! `System` traits) must therefore be visible in the analyzed file for
//! any trait-backed check to arm itself.

use indexmap::IndexMap;
use ra_ap_syntax::{
    ast::{self, HasAttrs, HasGenericArgs, HasName, HasTypeBounds},
    AstNode, SourceFile, SyntaxKind,
};

use crate::analysis::symbols::{
    framework, AccessMode, AttrArg, AttrId, AttributeApplication, SymbolResolver, TypeId, TypeKind,
    TypeSymbol, UniqueAccess,
};
use crate::diagnostics::Span;

/// Pass-scoped symbol table built from a parse.
#[derive(Debug)]
pub struct HostSymbolTable {
    types: Vec<TypeSymbol>,
    by_name: IndexMap<String, TypeId>,
    attr_paths: IndexMap<String, AttrId>,
}

impl HostSymbolTable {
    /// Parse `source` (edition 2021, error-tolerant) and materialize the
    /// table.
    pub fn build(source: &str) -> Self {
        let parse = SourceFile::parse(source, ra_ap_syntax::Edition::Edition2021);
        if !parse.errors().is_empty() {
            tracing::debug!(errors = parse.errors().len(), "source has parse errors");
        }
        let file = parse.tree();

        let mut table = Self {
            types: Vec::new(),
            by_name: IndexMap::new(),
            attr_paths: IndexMap::new(),
        };
        // Framework attribute identities resolve even in sources that
        // never apply them.
        for path in [
            framework::FILTER_ATTR,
            framework::MESSAGER_ATTR,
            framework::UNIQUE_ATTR,
        ] {
            table.intern_attr(path);
        }

        // Declarations first, so attribute arguments and impl edges can
        // resolve forward references.
        let mut structs = Vec::new();
        let mut enums = Vec::new();
        let mut traits = Vec::new();
        let mut impls = Vec::new();
        for node in file.syntax().descendants() {
            if let Some(st) = ast::Struct::cast(node.clone()) {
                if let Some(id) = table.declare(st.name(), TypeKind::Struct) {
                    structs.push((id, st));
                }
            } else if let Some(en) = ast::Enum::cast(node.clone()) {
                if let Some(id) = table.declare(en.name(), TypeKind::Enum) {
                    enums.push((id, en));
                }
            } else if let Some(tr) = ast::Trait::cast(node.clone()) {
                if let Some(id) = table.declare(tr.name(), TypeKind::Trait) {
                    traits.push((id, tr));
                }
            } else if let Some(imp) = ast::Impl::cast(node) {
                impls.push(imp);
            }
        }

        table.resolve_trait_edges(&traits, &impls);

        for (id, st) in &structs {
            let attrs = table.collect_attrs(st.attrs(), source);
            table.types[id.0 as usize].attrs = attrs;
        }
        for (id, en) in &enums {
            let attrs = table.collect_attrs(en.attrs(), source);
            table.types[id.0 as usize].attrs = attrs;
        }
        for (id, tr) in &traits {
            let attrs = table.collect_attrs(tr.attrs(), source);
            table.types[id.0 as usize].attrs = attrs;
        }

        table.collect_unique_accesses(&impls);
        table
    }

    fn intern_attr(&mut self, path: &str) -> AttrId {
        if let Some(id) = self.attr_paths.get(path) {
            return *id;
        }
        let id = AttrId(self.attr_paths.len() as u32);
        self.attr_paths.insert(path.to_string(), id);
        id
    }

    fn declare(&mut self, name: Option<ast::Name>, kind: TypeKind) -> Option<TypeId> {
        let name = name?;
        let text = name.text().to_string();
        let span = Span::from(name.syntax().text_range());
        let id = TypeId(self.types.len() as u32);
        self.types.push(TypeSymbol::new(&text, kind, span));
        // First declaration of a name wins; later shadows are still in
        // the table, just not reachable by name.
        self.by_name.entry(text).or_insert(id);
        Some(id)
    }

    /// Resolve supertrait edges and `impl Trait for Type` edges, then
    /// store each symbol's transitive implemented-trait set.
    fn resolve_trait_edges(&mut self, traits: &[(TypeId, ast::Trait)], impls: &[ast::Impl]) {
        let mut direct: IndexMap<TypeId, Vec<TypeId>> = IndexMap::new();
        for (id, tr) in traits {
            let mut supers = Vec::new();
            if let Some(bounds) = tr.type_bound_list() {
                for bound in bounds.bounds() {
                    if let Some(super_id) = bound.ty().and_then(|ty| self.resolve_type_ast(&ty)) {
                        supers.push(super_id);
                    }
                }
            }
            direct.insert(*id, supers);
        }

        for (id, _) in traits {
            let closure = transitive_closure(&direct, *id);
            self.types[id.0 as usize].traits = closure;
        }

        for imp in impls {
            let Some(trait_id) = imp.trait_().and_then(|ty| self.resolve_type_ast(&ty)) else {
                continue;
            };
            let Some(self_id) = imp.self_ty().and_then(|ty| self.resolve_type_ast(&ty)) else {
                continue;
            };
            if self.types[trait_id.0 as usize].kind != TypeKind::Trait {
                continue;
            }
            let mut implemented = vec![trait_id];
            implemented.extend(self.types[trait_id.0 as usize].traits.iter().copied());
            let traits = &mut self.types[self_id.0 as usize].traits;
            for t in implemented {
                if !traits.contains(&t) {
                    traits.push(t);
                }
            }
        }
    }

    fn resolve_type_ast(&self, ty: &ast::Type) -> Option<TypeId> {
        let ast::Type::PathType(path_ty) = ty else {
            return None;
        };
        let name = path_ty.path()?.segment()?.name_ref()?.text().to_string();
        self.by_name.get(&name).copied()
    }

    fn collect_attrs(
        &mut self,
        attrs: impl Iterator<Item = ast::Attr>,
        source: &str,
    ) -> Vec<AttributeApplication> {
        let mut out = Vec::new();
        for attr in attrs {
            let Some(path) = attr.path() else {
                continue;
            };
            // Attribute identity follows the final segment, matching how
            // type names resolve.
            let Some(simple) = path
                .segment()
                .and_then(|s| s.name_ref())
                .map(|n| n.text().to_string())
            else {
                continue;
            };
            let attr_id = self.intern_attr(&simple);
            let token_tree = attr.token_tree();
            let args = token_tree
                .as_ref()
                .map(|tt| self.parse_attr_args(tt, source))
                .unwrap_or_default();
            out.push(AttributeApplication {
                attr: attr_id,
                path: simple,
                args,
                has_arg_list: token_tree.is_some(),
                span: Span::from(attr.syntax().text_range()),
            });
        }
        out
    }

    /// Split an attribute token tree into arguments at top-level commas.
    ///
    /// Each argument's span runs from its first to its last non-trivia
    /// token, so a diagnostic underlines exactly the argument expression.
    fn parse_attr_args(&self, token_tree: &ast::TokenTree, source: &str) -> Vec<AttrArg> {
        let mut args = Vec::new();
        let mut segment = SegmentAcc::default();
        let mut depth = 0u32;

        for element in token_tree.syntax().children_with_tokens() {
            let range = element.text_range();
            match element.as_token().map(|t| t.kind()) {
                Some(SyntaxKind::L_PAREN | SyntaxKind::L_BRACK | SyntaxKind::L_CURLY) => {
                    depth += 1;
                    if depth > 1 {
                        segment.push(range, None);
                    }
                }
                Some(SyntaxKind::R_PAREN | SyntaxKind::R_BRACK | SyntaxKind::R_CURLY) => {
                    if depth > 1 {
                        segment.push(range, None);
                    }
                    depth = depth.saturating_sub(1);
                }
                Some(SyntaxKind::COMMA) if depth == 1 => {
                    segment.flush(source, &self.by_name, &mut args);
                }
                Some(SyntaxKind::WHITESPACE | SyntaxKind::COMMENT) => {}
                Some(SyntaxKind::IDENT) => {
                    let text = element
                        .as_token()
                        .map(|t| t.text().to_string())
                        .unwrap_or_default();
                    segment.push(range, Some(text));
                }
                Some(_) => segment.push(range, None),
                // Nested token trees stay part of the current argument.
                None => segment.push(range, None),
            }
        }
        segment.flush(source, &self.by_name, &mut args);
        args
    }

    /// Record `get_unique::<T>()` call sites against each impl's self
    /// type.
    fn collect_unique_accesses(&mut self, impls: &[ast::Impl]) {
        for imp in impls {
            let Some(self_id) = imp.self_ty().and_then(|ty| self.resolve_type_ast(&ty)) else {
                continue;
            };
            let mut accesses = Vec::new();
            for call in imp.syntax().descendants().filter_map(ast::MethodCallExpr::cast) {
                let Some(name_ref) = call.name_ref() else {
                    continue;
                };
                if name_ref.text().to_string() != framework::GET_UNIQUE_METHOD {
                    continue;
                }
                let Some(component) = first_type_argument(&call) else {
                    continue;
                };
                let resolved = self
                    .by_name
                    .get(component.rsplit("::").next().unwrap_or(component.as_str()))
                    .copied();
                accesses.push(UniqueAccess {
                    component,
                    resolved,
                    span: Span::from(call.syntax().text_range()),
                });
            }
            self.types[self_id.0 as usize]
                .unique_accesses
                .extend(accesses);
        }
    }
}

/// Accumulates one attribute argument between top-level commas.
#[derive(Default)]
struct SegmentAcc {
    first: Option<u32>,
    last: Option<u32>,
    idents: Vec<String>,
    pieces: u32,
}

impl SegmentAcc {
    fn push(&mut self, range: ra_ap_syntax::TextRange, ident: Option<String>) {
        if self.first.is_none() {
            self.first = Some(range.start().into());
        }
        self.last = Some(range.end().into());
        self.pieces += 1;
        if let Some(ident) = ident {
            self.idents.push(ident);
        }
    }

    fn flush(
        &mut self,
        source: &str,
        by_name: &IndexMap<String, TypeId>,
        args: &mut Vec<AttrArg>,
    ) {
        let acc = std::mem::take(self);
        let (Some(start), Some(end)) = (acc.first, acc.last) else {
            return;
        };
        let span = Span::new(start, end);

        // A lone lowercase ident naming an access mode is a mode
        // argument, not a type.
        if acc.pieces == 1 && acc.idents.len() == 1 {
            if let Some(mode) = AccessMode::parse(&acc.idents[0]) {
                args.push(AttrArg::Mode { mode, span });
                return;
            }
        }

        let name = source
            .get(start as usize..end as usize)
            .unwrap_or_default()
            .to_string();
        let resolved = acc
            .idents
            .last()
            .and_then(|simple| by_name.get(simple))
            .copied();
        args.push(AttrArg::Type {
            name,
            resolved,
            span,
        });
    }
}

/// Depth-first transitive closure over direct supertrait edges. Cycles in
/// malformed input terminate through the seen set.
fn transitive_closure(direct: &IndexMap<TypeId, Vec<TypeId>>, start: TypeId) -> Vec<TypeId> {
    let mut seen = Vec::new();
    let mut stack: Vec<TypeId> = direct.get(&start).cloned().unwrap_or_default();
    while let Some(next) = stack.pop() {
        if next != start && !seen.contains(&next) {
            seen.push(next);
            if let Some(supers) = direct.get(&next) {
                stack.extend(supers.iter().copied());
            }
        }
    }
    seen
}

/// The first type argument of a call's turbofish, as written.
fn first_type_argument(call: &ast::MethodCallExpr) -> Option<String> {
    let args = call.generic_arg_list()?;
    for arg in args.generic_args() {
        if let ast::GenericArg::TypeArg(type_arg) = arg {
            let ty = type_arg.ty()?;
            return Some(ty.syntax().text().to_string());
        }
    }
    None
}

impl SymbolResolver for HostSymbolTable {
    fn resolve_type(&self, name: &str) -> Option<TypeId> {
        let simple = name.rsplit("::").next().unwrap_or(name);
        self.by_name.get(simple).copied()
    }

    fn resolve_attr(&self, path: &str) -> Option<AttrId> {
        self.attr_paths.get(path).copied()
    }

    fn symbol(&self, id: TypeId) -> &TypeSymbol {
        &self.types[id.0 as usize]
    }

    fn type_ids(&self) -> Vec<TypeId> {
        (0..self.types.len() as u32).map(TypeId).collect()
    }
}

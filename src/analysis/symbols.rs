//! Symbol table model: the seam between the host adapter and the rules.
//!
//! The rule engine never touches the syntax tree. It sees declared types
//! through the [`SymbolResolver`] trait: opaque [`TypeId`] identities, the
//! attribute applications attached to each declaration, and the transitive
//! set of implemented marker traits. The production implementation is
//! [`HostSymbolTable`](crate::analysis::host::HostSymbolTable), built once
//! per pass from a parse; [`FakeSymbolTable`] builds the same data
//! programmatically so the engine can be exercised without any source text.

use indexmap::IndexMap;

use crate::diagnostics::Span;

/// Opaque identity of a declared type within one analysis pass.
///
/// All "does T implement M" checks compare `TypeId`s, never names, so two
/// types sharing a simple name can never satisfy each other's contracts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeId(pub u32);

/// Interned identity of an attribute path within one analysis pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AttrId(pub u32);

/// Declaration kind of a [`TypeSymbol`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeKind {
    Struct,
    Enum,
    Trait,
}

/// Well-known framework names the analyzer keys on.
pub mod framework {
    /// Marker trait for data components.
    pub const COMPONENT_TRAIT: &str = "Component";
    /// Marker trait for transient messages.
    pub const MESSAGE_TRAIT: &str = "Message";
    /// Marker trait for behavior units.
    pub const SYSTEM_TRAIT: &str = "System";
    /// Attribute declaring which components a system reads/writes.
    pub const FILTER_ATTR: &str = "filter";
    /// Attribute declaring which messages a system subscribes to.
    pub const MESSAGER_ATTR: &str = "messager";
    /// Marker attribute asserting at most one entity carries the component.
    pub const UNIQUE_ATTR: &str = "unique";
    /// Registry method retrieving the single entity holding a component.
    pub const GET_UNIQUE_METHOD: &str = "get_unique";
}

/// Access mode accepted as a leading `#[filter]` argument.
///
/// The value is opaque to the rules; it only matters that mode arguments
/// are not mistaken for type arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessMode {
    Read,
    Write,
    ReadWrite,
}

impl AccessMode {
    pub fn parse(text: &str) -> Option<Self> {
        match text {
            "read" => Some(AccessMode::Read),
            "write" => Some(AccessMode::Write),
            "read_write" => Some(AccessMode::ReadWrite),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            AccessMode::Read => "read",
            AccessMode::Write => "write",
            AccessMode::ReadWrite => "read_write",
        }
    }
}

/// One argument inside an attribute's argument list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttrArg {
    /// An access-mode value such as `read`. Skipped by the argument rules.
    Mode { mode: AccessMode, span: Span },
    /// A type reference. `resolved` is `None` when the name does not
    /// resolve in this pass; rules treat that as "skip".
    Type {
        /// The argument text as written (may be a qualified path).
        name: String,
        resolved: Option<TypeId>,
        span: Span,
    },
}

impl AttrArg {
    pub fn span(&self) -> Span {
        match self {
            AttrArg::Mode { span, .. } | AttrArg::Type { span, .. } => *span,
        }
    }
}

/// A first-class attribute application attached to a declaration.
///
/// Produced once by the host adapter so rules never walk syntax ancestor
/// chains to recover which attribute owns an argument list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeApplication {
    /// Interned identity of the attribute path.
    pub attr: AttrId,
    /// The attribute path as written, e.g. `filter`.
    pub path: String,
    /// Ordered arguments, left to right.
    pub args: Vec<AttrArg>,
    /// True when the application carries an argument list, even an empty
    /// one: `#[filter()]` has a list, `#[unique]` does not.
    pub has_arg_list: bool,
    /// Span of the whole application.
    pub span: Span,
}

/// A `get_unique::<T>()` call site recorded against the enclosing type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UniqueAccess {
    /// The component type argument as written.
    pub component: String,
    pub resolved: Option<TypeId>,
    /// Span of the whole call expression.
    pub span: Span,
}

/// A declared type together with the semantic facts the rules consume.
#[derive(Debug, Clone)]
pub struct TypeSymbol {
    pub name: String,
    pub kind: TypeKind,
    /// Span of the declared name.
    pub span: Span,
    pub attrs: Vec<AttributeApplication>,
    /// Transitive implemented traits (for traits: supertrait closure).
    pub traits: Vec<TypeId>,
    /// Recorded unique-retrieval call sites from this type's impl bodies.
    pub unique_accesses: Vec<UniqueAccess>,
}

impl TypeSymbol {
    pub fn new(name: impl Into<String>, kind: TypeKind, span: Span) -> Self {
        Self {
            name: name.into(),
            kind,
            span,
            attrs: Vec::new(),
            traits: Vec::new(),
            unique_accesses: Vec::new(),
        }
    }

    /// Whether this symbol carries an attribute with the given identity.
    pub fn has_attr(&self, attr: AttrId) -> bool {
        self.attrs.iter().any(|app| app.attr == attr)
    }
}

/// Resolution queries the engine runs against the current pass.
///
/// Implementations must be `Sync`: the engine dispatches rule callbacks
/// from a worker pool and every invocation borrows the same resolver.
pub trait SymbolResolver: Sync {
    /// Resolve a type name to its declared symbol, if any. Qualified paths
    /// resolve by their final segment.
    fn resolve_type(&self, name: &str) -> Option<TypeId>;

    /// Resolve an attribute path to its interned identity, if seen this
    /// pass (framework attribute paths are always interned).
    fn resolve_attr(&self, path: &str) -> Option<AttrId>;

    /// Look up a symbol by identity. Ids handed out by this resolver are
    /// always valid for the duration of the pass.
    fn symbol(&self, id: TypeId) -> &TypeSymbol;

    /// All type ids known to this pass, in declaration order.
    fn type_ids(&self) -> Vec<TypeId>;

    fn attributes(&self, id: TypeId) -> &[AttributeApplication] {
        &self.symbol(id).attrs
    }

    fn implemented_traits(&self, id: TypeId) -> &[TypeId] {
        &self.symbol(id).traits
    }

    fn unique_accesses(&self, id: TypeId) -> &[UniqueAccess] {
        &self.symbol(id).unique_accesses
    }
}

/// In-memory symbol table for tests: build declarations by hand, no parse.
#[derive(Debug, Default)]
pub struct FakeSymbolTable {
    types: Vec<TypeSymbol>,
    by_name: IndexMap<String, TypeId>,
    attr_paths: IndexMap<String, AttrId>,
}

impl FakeSymbolTable {
    pub fn new() -> Self {
        let mut table = Self::default();
        for path in [
            framework::FILTER_ATTR,
            framework::MESSAGER_ATTR,
            framework::UNIQUE_ATTR,
        ] {
            table.intern_attr(path);
        }
        table
    }

    pub fn intern_attr(&mut self, path: &str) -> AttrId {
        if let Some(id) = self.attr_paths.get(path) {
            return *id;
        }
        let id = AttrId(self.attr_paths.len() as u32);
        self.attr_paths.insert(path.to_string(), id);
        id
    }

    fn add_type(&mut self, name: &str, kind: TypeKind) -> TypeId {
        let id = TypeId(self.types.len() as u32);
        self.types.push(TypeSymbol::new(name, kind, Span::new(0, 0)));
        self.by_name.entry(name.to_string()).or_insert(id);
        id
    }

    pub fn add_trait(&mut self, name: &str) -> TypeId {
        self.add_type(name, TypeKind::Trait)
    }

    pub fn add_struct(&mut self, name: &str) -> TypeId {
        self.add_type(name, TypeKind::Struct)
    }

    /// Record that `ty` implements `tr`, including `tr`'s own closure.
    pub fn implement(&mut self, ty: TypeId, tr: TypeId) {
        let mut closure = vec![tr];
        closure.extend(self.types[tr.0 as usize].traits.iter().copied());
        let traits = &mut self.types[ty.0 as usize].traits;
        for t in closure {
            if !traits.contains(&t) {
                traits.push(t);
            }
        }
    }

    /// Attach an attribute application with an argument list.
    pub fn attach_attr(&mut self, ty: TypeId, path: &str, args: Vec<AttrArg>) {
        let attr = self.intern_attr(path);
        self.types[ty.0 as usize].attrs.push(AttributeApplication {
            attr,
            path: path.to_string(),
            args,
            has_arg_list: true,
            span: Span::new(0, 0),
        });
    }

    /// Attach a zero-argument marker attribute such as `#[unique]`.
    pub fn attach_marker(&mut self, ty: TypeId, path: &str) {
        let attr = self.intern_attr(path);
        self.types[ty.0 as usize].attrs.push(AttributeApplication {
            attr,
            path: path.to_string(),
            args: Vec::new(),
            has_arg_list: false,
            span: Span::new(0, 0),
        });
    }

    pub fn record_unique_access(&mut self, ty: TypeId, component: &str, span: Span) {
        let resolved = self.by_name.get(component).copied();
        self.types[ty.0 as usize].unique_accesses.push(UniqueAccess {
            component: component.to_string(),
            resolved,
            span,
        });
    }

    /// A type argument resolved against the table as it stands.
    pub fn type_arg(&self, name: &str, span: Span) -> AttrArg {
        AttrArg::Type {
            name: name.to_string(),
            resolved: self.by_name.get(name).copied(),
            span,
        }
    }

    pub fn mode_arg(&self, mode: AccessMode, span: Span) -> AttrArg {
        AttrArg::Mode { mode, span }
    }
}

impl SymbolResolver for FakeSymbolTable {
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_access_mode_parse() {
        assert_eq!(AccessMode::parse("read"), Some(AccessMode::Read));
        assert_eq!(AccessMode::parse("write"), Some(AccessMode::Write));
        assert_eq!(AccessMode::parse("read_write"), Some(AccessMode::ReadWrite));
        assert_eq!(AccessMode::parse("Read"), None);
        assert_eq!(AccessMode::parse("Position"), None);
    }

    #[test]
    fn test_fake_table_resolves_by_simple_name() {
        let mut table = FakeSymbolTable::new();
        let pos = table.add_struct("Position");
        assert_eq!(table.resolve_type("Position"), Some(pos));
        assert_eq!(table.resolve_type("ecs::Position"), Some(pos));
        assert_eq!(table.resolve_type("Velocity"), None);
    }

    #[test]
    fn test_implement_records_supertrait_closure() {
        let mut table = FakeSymbolTable::new();
        let component = table.add_trait("Component");
        let tagged = table.add_trait("Tagged");
        table.implement(tagged, component);

        let pos = table.add_struct("Position");
        table.implement(pos, tagged);

        let traits = table.implemented_traits(pos);
        assert!(traits.contains(&tagged));
        assert!(traits.contains(&component));
    }

    #[test]
    fn test_framework_attrs_preinterned() {
        let table = FakeSymbolTable::new();
        assert!(table.resolve_attr("filter").is_some());
        assert!(table.resolve_attr("messager").is_some());
        assert!(table.resolve_attr("unique").is_some());
        assert!(table.resolve_attr("derive").is_none());
    }
}

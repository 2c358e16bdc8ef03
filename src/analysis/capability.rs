//! Capability classification: does a declared type satisfy a named marker
//! contract?
//!
//! Each [`Capability`] is backed by one framework identity — a marker trait
//! or a marker attribute. The backing identity is resolved at most once per
//! pass and cached; membership checks afterwards are pure identity
//! comparisons. When a trait-backed identity cannot be resolved (the
//! framework prelude is not visible in this compilation unit), every query
//! for that capability answers `false` for the rest of the pass, so the
//! analyzer never reports against code it cannot see the contracts of.

use std::sync::OnceLock;

use crate::analysis::symbols::{framework, AttrId, SymbolResolver, TypeId, TypeKind};

/// The fixed set of marker contracts the rules check against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// Data component; backed by the `Component` trait.
    Component,
    /// Transient message; backed by the `Message` trait.
    Message,
    /// Behavior unit; backed by the `System` trait.
    System,
    /// The `#[messager]` subscription attribute.
    Messager,
    /// The `#[unique]` singleton marker attribute.
    Unique,
}

const CAPABILITY_COUNT: usize = 5;

/// What a capability resolves to for one pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapabilityId {
    Trait(TypeId),
    Attr(AttrId),
}

enum Backing {
    Trait(&'static str),
    Attr(&'static str),
}

impl Capability {
    fn index(self) -> usize {
        match self {
            Capability::Component => 0,
            Capability::Message => 1,
            Capability::System => 2,
            Capability::Messager => 3,
            Capability::Unique => 4,
        }
    }

    fn backing(self) -> Backing {
        match self {
            Capability::Component => Backing::Trait(framework::COMPONENT_TRAIT),
            Capability::Message => Backing::Trait(framework::MESSAGE_TRAIT),
            Capability::System => Backing::Trait(framework::SYSTEM_TRAIT),
            Capability::Messager => Backing::Attr(framework::MESSAGER_ATTR),
            Capability::Unique => Backing::Attr(framework::UNIQUE_ATTR),
        }
    }

    /// The name diagnostics use for the expected contract.
    pub fn expected_name(self) -> &'static str {
        match self.backing() {
            Backing::Trait(name) => name,
            Backing::Attr(path) => path,
        }
    }
}

/// Pass-scoped classifier over a [`SymbolResolver`].
///
/// Capability identities resolve lazily and idempotently; racing
/// initializations compute the same value. Per-type answers are not cached.
pub struct CapabilityClassifier<'a> {
    resolver: &'a dyn SymbolResolver,
    slots: [OnceLock<Option<CapabilityId>>; CAPABILITY_COUNT],
}

impl<'a> CapabilityClassifier<'a> {
    pub fn new(resolver: &'a dyn SymbolResolver) -> Self {
        Self {
            resolver,
            slots: [const { OnceLock::new() }; CAPABILITY_COUNT],
        }
    }

    /// The backing identity for `cap`, or `None` when unresolvable this
    /// pass.
    pub fn resolved(&self, cap: Capability) -> Option<CapabilityId> {
        *self.slots[cap.index()].get_or_init(|| match cap.backing() {
            Backing::Trait(name) => {
                let id = self.resolver.resolve_type(name)?;
                // A struct shadowing the marker's simple name is not the
                // marker.
                if self.resolver.symbol(id).kind != TypeKind::Trait {
                    tracing::debug!(capability = name, "marker name resolves to a non-trait");
                    return None;
                }
                Some(CapabilityId::Trait(id))
            }
            Backing::Attr(path) => self.resolver.resolve_attr(path).map(CapabilityId::Attr),
        })
    }

    /// Whether `ty` satisfies `cap`. Unresolvable capabilities answer
    /// `false` (fail-open).
    pub fn satisfies(&self, ty: TypeId, cap: Capability) -> bool {
        match self.resolved(cap) {
            None => false,
            Some(CapabilityId::Trait(marker)) => {
                self.resolver.implemented_traits(ty).contains(&marker)
            }
            Some(CapabilityId::Attr(marker)) => self.resolver.symbol(ty).has_attr(marker),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::symbols::FakeSymbolTable;

    #[test]
    fn test_satisfies_by_trait_identity() {
        let mut table = FakeSymbolTable::new();
        let component = table.add_trait("Component");
        let pos = table.add_struct("Position");
        let plain = table.add_struct("Plain");
        table.implement(pos, component);

        let classifier = CapabilityClassifier::new(&table);
        assert!(classifier.satisfies(pos, Capability::Component));
        assert!(!classifier.satisfies(plain, Capability::Component));
    }

    #[test]
    fn test_unresolvable_capability_fails_open() {
        let mut table = FakeSymbolTable::new();
        let pos = table.add_struct("Position");

        let classifier = CapabilityClassifier::new(&table);
        assert_eq!(classifier.resolved(Capability::Component), None);
        assert!(!classifier.satisfies(pos, Capability::Component));
    }

    #[test]
    fn test_struct_shadowing_marker_name_does_not_resolve() {
        let mut table = FakeSymbolTable::new();
        // A struct named Component is not the marker trait.
        let fake = table.add_struct("Component");
        let pos = table.add_struct("Position");
        table.implement(pos, fake);

        let classifier = CapabilityClassifier::new(&table);
        assert_eq!(classifier.resolved(Capability::Component), None);
        assert!(!classifier.satisfies(pos, Capability::Component));
    }

    #[test]
    fn test_satisfies_by_marker_attribute() {
        let mut table = FakeSymbolTable::new();
        let camera = table.add_struct("Camera");
        let settings = table.add_struct("Settings");
        table.attach_marker(camera, "unique");

        let classifier = CapabilityClassifier::new(&table);
        assert!(classifier.satisfies(camera, Capability::Unique));
        assert!(!classifier.satisfies(settings, Capability::Unique));
    }

    #[test]
    fn test_resolution_happens_once() {
        let mut table = FakeSymbolTable::new();
        let component = table.add_trait("Component");

        let classifier = CapabilityClassifier::new(&table);
        let first = classifier.resolved(Capability::Component);
        let second = classifier.resolved(Capability::Component);
        assert_eq!(first, Some(CapabilityId::Trait(component)));
        assert_eq!(first, second);
    }
}

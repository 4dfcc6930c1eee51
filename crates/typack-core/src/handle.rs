//! Loaded type handles.

use std::collections::BTreeSet;
use std::fmt;

use crate::archive::ArchiveRef;
use crate::descriptor::TypeKind;
use crate::name::TypeName;

/// A successfully loaded type.
///
/// Handles are created once during [`PackLoader::build`], owned by the
/// [`Registry`] that created them, and shared by reference with query
/// results. They are immutable: the qualified name, the originating pack,
/// the declared supertypes, and the conformance closure are all fixed at
/// load time.
///
/// [`PackLoader::build`]: crate::PackLoader::build
/// [`Registry`]: crate::Registry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeHandle {
    name: TypeName,
    origin: ArchiveRef,
    kind: TypeKind,
    declared: Vec<String>,
    conformance: BTreeSet<String>,
    symbol: Option<String>,
}

impl TypeHandle {
    pub(crate) fn new(
        name: TypeName,
        origin: ArchiveRef,
        kind: TypeKind,
        declared: Vec<String>,
        conformance: BTreeSet<String>,
        symbol: Option<String>,
    ) -> Self {
        Self {
            name,
            origin,
            kind,
            declared,
            conformance,
            symbol,
        }
    }

    /// The fully-qualified name, e.g. `plugins.audio.Mixer`.
    #[must_use]
    pub fn qualified_name(&self) -> &str {
        self.name.as_str()
    }

    /// The namespace portion of the name, `""` for top-level types.
    #[must_use]
    pub fn namespace(&self) -> &str {
        self.name.namespace()
    }

    /// The unqualified name, e.g. `Mixer`.
    #[must_use]
    pub fn simple_name(&self) -> &str {
        self.name.simple_name()
    }

    /// The pack this type was loaded from.
    #[must_use]
    pub fn origin(&self) -> &ArchiveRef {
        &self.origin
    }

    /// Whether the type was declared as a class or an interface.
    #[must_use]
    pub fn kind(&self) -> TypeKind {
        self.kind
    }

    /// Supertypes as declared in the definition, extended before
    /// implemented, in declaration order.
    #[must_use]
    pub fn declared_supertypes(&self) -> &[String] {
        &self.declared
    }

    /// Exported factory symbol for the host's dynamic-linking layer, if the
    /// definition declared one.
    #[must_use]
    pub fn export_symbol(&self) -> Option<&str> {
        self.symbol.as_deref()
    }

    /// Tests conformance against a supertype name.
    ///
    /// True when `supertype` is the type's own name (conformance is
    /// reflexive) or appears anywhere in the transitive closure of declared
    /// supertypes.
    #[must_use]
    pub fn conforms_to(&self, supertype: &str) -> bool {
        self.name.as_str() == supertype || self.conformance.contains(supertype)
    }

    /// Tests whether the type declares `supertype` anywhere in its
    /// transitive supertype closure.
    ///
    /// Unlike [`conforms_to`](Self::conforms_to) this is not reflexive: a
    /// type does not extend or implement itself, so querying for the
    /// implementors of an interface never returns the interface.
    #[must_use]
    pub fn extends_or_implements(&self, supertype: &str) -> bool {
        self.conformance.contains(supertype)
    }

    /// Tests whether this type is assignable to `other`, i.e. whether it
    /// is, extends, or implements `other`.
    #[must_use]
    pub fn is_assignable_to(&self, other: &TypeHandle) -> bool {
        self.conforms_to(other.qualified_name())
    }
}

impl fmt::Display for TypeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

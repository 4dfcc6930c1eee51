//! Composable queries over a [`Registry`].
//!
//! A query combines up to three filter dimensions — originating pack,
//! namespace, supertype conformance — by intersection, while repeated
//! constraints within one dimension are combined by union. A dimension with
//! no constraints imposes none. Filter state is plain data
//! ([`FilterSpec`]); [`TypeQuery`] is fluent sugar that accumulates a spec
//! against a registry and evaluates it lazily on every terminal call.

use std::ops::Range;
use std::path::Path;

use tracing::debug;

use crate::ScanError;
use crate::archive::ArchiveRef;
use crate::handle::TypeHandle;
use crate::name::NAMESPACE_SEPARATOR;
use crate::registry::Registry;

/// Suffix marking a namespace pattern as a prefix wildcard.
const WILDCARD_SUFFIX: &str = ".*";

/// Accumulated filter state, independent of any registry.
///
/// Each dimension is a union of its entries; an empty dimension matches
/// everything. Specs are plain values: build one directly, or let
/// [`TypeQuery`] accumulate it, then evaluate with [`Registry::select`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSpec {
    archives: Vec<ArchiveRef>,
    namespaces: Vec<String>,
    supertypes: Vec<String>,
}

impl FilterSpec {
    /// Creates a spec with no constraints.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts results to types originating from the given pack.
    pub fn include_archive<P: AsRef<Path>>(&mut self, archive: P) {
        self.archives.push(ArchiveRef::new(archive));
    }

    /// Restricts results to types matching the given namespace pattern
    /// (exact namespace, or prefix wildcard like `plugins.audio.*`).
    pub fn include_namespace<S: Into<String>>(&mut self, pattern: S) {
        self.namespaces.push(pattern.into());
    }

    /// Restricts results to types conforming to the given supertype.
    pub fn include_supertype<S: Into<SupertypeRef>>(&mut self, supertype: S) {
        self.supertypes.push(supertype.into().0);
    }

    /// The origin-dimension constraints.
    #[must_use]
    pub fn archives(&self) -> &[ArchiveRef] {
        &self.archives
    }

    /// The namespace-dimension constraints.
    #[must_use]
    pub fn namespaces(&self) -> &[String] {
        &self.namespaces
    }

    /// The supertype-dimension constraints.
    #[must_use]
    pub fn supertypes(&self) -> &[String] {
        &self.supertypes
    }

    /// Whether no dimension is constrained.
    #[must_use]
    pub fn is_unconstrained(&self) -> bool {
        self.archives.is_empty() && self.namespaces.is_empty() && self.supertypes.is_empty()
    }
}

/// A supertype filter identifier: a qualified name, given directly or
/// borrowed from an already-loaded handle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupertypeRef(String);

impl From<&str> for SupertypeRef {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl From<String> for SupertypeRef {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl From<&TypeHandle> for SupertypeRef {
    fn from(handle: &TypeHandle) -> Self {
        Self(handle.qualified_name().to_string())
    }
}

/// A fluent, lazily-evaluated query over one registry.
///
/// Filter-adding calls may come in any order and any number; nothing is
/// evaluated until [`iter`](Self::iter) or [`count`](Self::count), and
/// every evaluation starts from the registry's full canonical list — never
/// from a previous result. Adding constraints between two evaluations
/// therefore changes what the second one returns.
///
/// # Examples
///
/// ```no_run
/// use typack_core::PackLoader;
///
/// # fn main() -> Result<(), typack_core::ScanError> {
/// let mut loader = PackLoader::new();
/// loader.include("plugins/");
/// loader.build();
///
/// let registry = loader.registry()?;
/// let query = registry
///     .query()
///     .in_namespaces(["plugins.audio.*"])
///     .that_extend_or_implement(["plugins.Effect"]);
///
/// println!("{} matching effects", query.count());
/// for handle in query.iter() {
///     println!("  {handle}");
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct TypeQuery<'r> {
    registry: &'r Registry,
    spec: FilterSpec,
}

impl<'r> TypeQuery<'r> {
    pub(crate) fn new(registry: &'r Registry) -> Self {
        Self {
            registry,
            spec: FilterSpec::new(),
        }
    }

    /// Keeps only types originating from the given packs. Refs the
    /// registry was not loaded from are ignored and contribute nothing.
    #[must_use]
    pub fn from_archives<I, P>(mut self, archives: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        for archive in archives {
            self.spec.include_archive(archive);
        }
        self
    }

    /// Keeps only types whose namespace matches at least one pattern.
    ///
    /// A pattern matches by exact namespace equality, or — when it ends in
    /// `.*` — when the namespace equals the stem or starts with the stem
    /// followed by a separator: `a.b.*` matches namespaces `a.b` and
    /// `a.b.c`, but neither `a.bc` nor `a`.
    #[must_use]
    pub fn in_namespaces<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for pattern in patterns {
            self.spec.include_namespace(pattern);
        }
        self
    }

    /// Keeps only types that extend or implement at least one of the given
    /// supertypes (by name, or by handle). The supertype itself is not
    /// among its own implementors.
    ///
    /// Each identifier is resolved through the loading context the
    /// registry was built with; an identifier that does not resolve there
    /// contributes no matches but does not fail the query.
    #[must_use]
    pub fn that_extend_or_implement<I>(mut self, supertypes: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<SupertypeRef>,
    {
        for supertype in supertypes {
            self.spec.include_supertype(supertype);
        }
        self
    }

    /// The accumulated filter state.
    #[must_use]
    pub fn spec(&self) -> &FilterSpec {
        &self.spec
    }

    /// Evaluates the query and iterates over the matching types in load
    /// order. Re-evaluates from the full canonical list on every call.
    #[must_use]
    pub fn iter(&self) -> std::vec::IntoIter<&'r TypeHandle> {
        evaluate(self.registry, &self.spec).into_iter()
    }

    /// Evaluates the query and returns the number of matching types.
    /// Always equal to `iter().count()` for the same filter state.
    #[must_use]
    pub fn count(&self) -> usize {
        evaluate(self.registry, &self.spec).len()
    }
}

impl<'q, 'r> IntoIterator for &'q TypeQuery<'r> {
    type Item = &'r TypeHandle;
    type IntoIter = std::vec::IntoIter<&'r TypeHandle>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Evaluates a filter spec against a registry.
///
/// Pure with respect to both inputs: the result is always an
/// order-preserving subset of the canonical list, each dimension applied
/// as a union of its entries and the dimensions intersected.
pub(crate) fn evaluate<'r>(registry: &'r Registry, spec: &FilterSpec) -> Vec<&'r TypeHandle> {
    let origin_ranges = origin_ranges(registry, spec);
    let supertypes = resolved_supertypes(registry, spec);

    registry
        .all()
        .iter()
        .enumerate()
        .filter(|(i, _)| {
            origin_ranges
                .as_ref()
                .is_none_or(|ranges| ranges.iter().any(|range| range.contains(i)))
        })
        .filter(|(_, handle)| {
            spec.namespaces().is_empty()
                || spec
                    .namespaces()
                    .iter()
                    .any(|pattern| namespace_matches(pattern, handle.namespace()))
        })
        .filter(|(_, handle)| {
            supertypes
                .as_ref()
                .is_none_or(|names| names.iter().any(|name| handle.extends_or_implements(name)))
        })
        .map(|(_, handle)| handle)
        .collect()
}

/// Union of the origin subsets named by the spec, `None` when the origin
/// dimension is unconstrained. Unknown refs contribute nothing.
fn origin_ranges(registry: &Registry, spec: &FilterSpec) -> Option<Vec<Range<usize>>> {
    if spec.archives().is_empty() {
        return None;
    }
    Some(
        spec.archives()
            .iter()
            .filter_map(|archive| registry.subset_range(archive.as_path()))
            .collect(),
    )
}

/// Supertype identifiers that resolve in the registry's loading context,
/// `None` when the supertype dimension is unconstrained.
fn resolved_supertypes<'s>(registry: &Registry, spec: &'s FilterSpec) -> Option<Vec<&'s str>> {
    if spec.supertypes().is_empty() {
        return None;
    }
    Some(
        spec.supertypes()
            .iter()
            .filter(|name| {
                let resolved = registry.context().contains(name);
                if !resolved {
                    let err = ScanError::SupertypeResolution {
                        name: (*name).clone(),
                    };
                    debug!("{err}; identifier contributes no matches");
                }
                resolved
            })
            .map(String::as_str)
            .collect(),
    )
}

fn namespace_matches(pattern: &str, namespace: &str) -> bool {
    pattern.strip_suffix(WILDCARD_SUFFIX).map_or_else(
        || namespace == pattern,
        |stem| {
            namespace == stem
                || namespace
                    .strip_prefix(stem)
                    .is_some_and(|rest| rest.starts_with(NAMESPACE_SEPARATOR))
        },
    )
}

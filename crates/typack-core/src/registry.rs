//! The registry of loaded types.

use std::collections::BTreeMap;
use std::ops::Range;
use std::path::Path;

use crate::archive::ArchiveRef;
use crate::context::LoadingContext;
use crate::handle::TypeHandle;
use crate::query::FilterSpec;
use crate::query::TypeQuery;
use crate::query::evaluate;

/// The aggregate result of loading a pack archive set.
///
/// Owns the canonical ordered list of all loaded [`TypeHandle`]s — in
/// discovery order of their packs, entry order within each pack — plus an
/// origin index mapping each pack to the contiguous range of handles loaded
/// from it. Because loading appends pack by pack, every origin subset is a
/// slice into the canonical list rather than a copy.
///
/// A registry is immutable once built and may be read concurrently by any
/// number of query evaluations.
#[derive(Debug)]
pub struct Registry {
    handles: Vec<TypeHandle>,
    index: Vec<(ArchiveRef, Range<usize>)>,
    by_name: BTreeMap<String, usize>,
    context: LoadingContext,
}

impl Registry {
    pub(crate) fn new(
        handles: Vec<TypeHandle>,
        index: Vec<(ArchiveRef, Range<usize>)>,
        context: LoadingContext,
    ) -> Self {
        let by_name = handles
            .iter()
            .enumerate()
            .map(|(i, handle)| (handle.qualified_name().to_string(), i))
            .collect();
        Self {
            handles,
            index,
            by_name,
            context,
        }
    }

    /// The canonical list of all loaded types, in load order.
    #[must_use]
    pub fn all(&self) -> &[TypeHandle] {
        &self.handles
    }

    /// Number of loaded types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    /// Whether no types were loaded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// The packs this registry was loaded from, in discovery order.
    pub fn archives(&self) -> impl Iterator<Item = &ArchiveRef> {
        self.index.iter().map(|(archive, _)| archive)
    }

    /// The types loaded from one pack, in entry order.
    ///
    /// Returns an empty slice for a pack this registry was not loaded from.
    #[must_use]
    pub fn from_archive<P: AsRef<Path>>(&self, archive: P) -> &[TypeHandle] {
        self.subset_range(archive.as_ref())
            .map_or(&[], |range| &self.handles[range])
    }

    /// Looks up a loaded type by its fully-qualified name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&TypeHandle> {
        self.by_name.get(name).map(|&i| &self.handles[i])
    }

    /// Starts a query over this registry with no constraints set.
    #[must_use]
    pub fn query(&self) -> TypeQuery<'_> {
        TypeQuery::new(self)
    }

    /// Evaluates a filter against the canonical list.
    ///
    /// This is the pure entry point behind [`TypeQuery`]: the same spec
    /// against the same registry always yields the same order-preserving
    /// subset of [`Registry::all`].
    #[must_use]
    pub fn select(&self, spec: &FilterSpec) -> Vec<&TypeHandle> {
        evaluate(self, spec)
    }

    pub(crate) fn subset_range(&self, archive: &Path) -> Option<Range<usize>> {
        let key = ArchiveRef::new(archive);
        self.index
            .iter()
            .find(|(candidate, _)| *candidate == key)
            .map(|(_, range)| range.clone())
    }

    pub(crate) fn context(&self) -> &LoadingContext {
        &self.context
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::PackLoader;
    use crate::test_utils::PackBuilder;
    use tempfile::TempDir;

    fn two_pack_registry() -> (TempDir, PackLoader) {
        let temp = TempDir::new().unwrap();
        PackBuilder::new()
            .add_interface("pkg.Iface")
            .add_class("pkg.Impl1", &["pkg.Iface"])
            .write_to(temp.path().join("a.tpk"));
        PackBuilder::new()
            .add_class("pkg.Impl2", &["pkg.Iface"])
            .write_to(temp.path().join("b.tpk"));

        let mut loader = PackLoader::new();
        loader.include(temp.path());
        loader.build();
        (temp, loader)
    }

    #[test]
    fn test_canonical_order_and_len() {
        let (_temp, loader) = two_pack_registry();
        let registry = loader.registry().unwrap();

        assert_eq!(registry.len(), 3);
        assert!(!registry.is_empty());
        let names: Vec<_> = registry.all().iter().map(TypeHandle::to_string).collect();
        assert_eq!(names, vec!["pkg.Iface", "pkg.Impl1", "pkg.Impl2"]);
    }

    #[test]
    fn test_origin_subsets_partition_canonical_list() {
        let (_temp, loader) = two_pack_registry();
        let registry = loader.registry().unwrap();

        let archives: Vec<_> = registry.archives().cloned().collect();
        assert_eq!(archives.len(), 2);

        let subset_total: usize = archives
            .iter()
            .map(|a| registry.from_archive(a).len())
            .sum();
        assert_eq!(subset_total, registry.len());

        for handle in registry.all() {
            let owners = archives
                .iter()
                .filter(|a| {
                    registry
                        .from_archive(a)
                        .iter()
                        .any(|h| h.qualified_name() == handle.qualified_name())
                })
                .count();
            assert_eq!(owners, 1, "{handle} must belong to exactly one pack");
        }
    }

    #[test]
    fn test_from_archive_unknown_pack_is_empty() {
        let (_temp, loader) = two_pack_registry();
        let registry = loader.registry().unwrap();
        assert!(registry.from_archive("/no/such/pack.tpk").is_empty());
    }

    #[test]
    fn test_get_by_name() {
        let (_temp, loader) = two_pack_registry();
        let registry = loader.registry().unwrap();

        let handle = registry.get("pkg.Impl1").unwrap();
        assert_eq!(handle.qualified_name(), "pkg.Impl1");
        assert!(registry.get("pkg.Missing").is_none());
    }
}

//! The combined loading context over one pack archive set.

use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::fs::File;
use std::io::BufReader;
use std::io::Read;

use tracing::debug;

use crate::Result;
use crate::ScanError;
use crate::archive::ArchiveRef;
use crate::descriptor;
use crate::descriptor::TypeDef;
use crate::enumerate::derive_type_name;
use crate::name::TypeName;

/// Resolution scope spanning exactly one set of pack archives.
///
/// Indexes every type definition entry of the set, so that a definition in
/// one pack may name supertypes declared in any other pack of the same set
/// — and in none outside it. When two packs declare the same name, the
/// pack earlier in discovery order wins. The context stays crate-private:
/// the loader builds it and the query evaluator resolves supertype
/// identifiers through it, external callers never see it.
#[derive(Debug, Default)]
pub(crate) struct LoadingContext {
    types: BTreeMap<String, TypeDef>,
    malformed: BTreeMap<String, String>,
}

impl LoadingContext {
    /// Indexes all type definition entries of the given archives.
    ///
    /// Unreadable archives contribute nothing; the enumeration step reports
    /// them, so here they are only noted at debug level.
    pub(crate) fn from_archives(archives: &[ArchiveRef]) -> Self {
        let mut context = Self::default();
        for archive in archives {
            if let Err(err) = context.index_archive(archive) {
                debug!(archive = %archive, "skipping unreadable pack: {err}");
            }
        }
        context
    }

    /// Resolves a name to its type definition.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::TypeResolution`] when the name is not indexed,
    /// not well-formed, or its definition entry was malformed.
    pub(crate) fn resolve(&self, name: &TypeName) -> Result<&TypeDef> {
        if !name.is_well_formed() {
            return Err(ScanError::TypeResolution {
                name: name.to_string(),
                reason: "name has empty segments".to_string(),
            });
        }
        if let Some(def) = self.types.get(name.as_str()) {
            return Ok(def);
        }
        let reason = self.malformed.get(name.as_str()).map_or_else(
            || "no type definition indexed under this name".to_string(),
            Clone::clone,
        );
        Err(ScanError::TypeResolution {
            name: name.to_string(),
            reason,
        })
    }

    /// Whether a well-formed definition is indexed under `name`.
    pub(crate) fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    /// Computes the transitive set of names `def` conforms to, walking
    /// declared supertypes through the context. Names without an indexed
    /// definition stay in the closure but cannot be walked further.
    /// Cycles terminate because every name is visited once.
    pub(crate) fn conformance_closure(&self, def: &TypeDef) -> BTreeSet<String> {
        let mut closure = BTreeSet::new();
        let mut pending: Vec<String> = def.supertypes().map(str::to_string).collect();

        while let Some(name) = pending.pop() {
            if closure.insert(name.clone())
                && let Some(parent) = self.types.get(&name)
            {
                pending.extend(parent.supertypes().map(str::to_string));
            }
        }

        closure
    }

    fn index_archive(&mut self, archive: &ArchiveRef) -> Result<()> {
        let file = File::open(archive.as_path())?;
        let mut zip = zip::ZipArchive::new(BufReader::new(file)).map_err(|err| {
            ScanError::ArchiveRead {
                path: archive.as_path().to_path_buf(),
                reason: format!("failed to open pack: {err}"),
            }
        })?;

        for i in 0..zip.len() {
            let mut entry = zip.by_index(i).map_err(|err| ScanError::ArchiveRead {
                path: archive.as_path().to_path_buf(),
                reason: format!("failed to read pack entry: {err}"),
            })?;

            let Some(name) = derive_type_name(entry.name()) else {
                continue;
            };
            if self.types.contains_key(name.as_str()) || self.malformed.contains_key(name.as_str())
            {
                // First pack in discovery order wins.
                continue;
            }

            let mut bytes = Vec::new();
            if let Err(err) = entry.read_to_end(&mut bytes) {
                self.malformed
                    .insert(name.as_str().to_string(), format!("unreadable entry: {err}"));
                continue;
            }

            match descriptor::parse_type_def(&bytes) {
                Ok(def) => {
                    if let Some(declared) = def.name.as_deref()
                        && declared != name.as_str()
                    {
                        self.malformed.insert(
                            name.as_str().to_string(),
                            format!("declared name `{declared}` does not match entry path"),
                        );
                    } else {
                        self.types.insert(name.as_str().to_string(), def);
                    }
                }
                Err(err) => {
                    self.malformed
                        .insert(name.as_str().to_string(), format!("malformed definition: {err}"));
                }
            }
        }

        Ok(())
    }
}

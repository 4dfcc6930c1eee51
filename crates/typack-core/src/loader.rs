//! Pack loading and registry construction.

use std::collections::BTreeSet;
use std::path::Path;

use tracing::debug;
use tracing::info;
use tracing::warn;

use crate::Result;
use crate::ScanError;
use crate::archive::ArchiveRef;
use crate::context::LoadingContext;
use crate::enumerate;
use crate::handle::TypeHandle;
use crate::locator::ArchiveLocator;
use crate::name::TypeName;
use crate::registry::Registry;
use crate::report::ScanReport;

/// Discovers packs and loads their declared types into a [`Registry`].
///
/// Usage order matters: include paths first, then [`build`](Self::build)
/// exactly once, then read the registry. `build` runs at most once per
/// loader — the first call decides the result and every later call is a
/// no-op, so paths included afterwards have no effect on the loaded set.
/// Requesting [`registry`](Self::registry) or [`report`](Self::report)
/// before `build` fails with [`ScanError::NotYetLoaded`]; that is the one
/// usage error surfaced to the caller, everything else encountered during
/// scanning is logged, recorded in the report, and skipped.
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
/// for handle in registry.all() {
///     println!("loaded {handle} from {}", handle.origin());
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct PackLoader {
    locator: ArchiveLocator,
    built: Option<BuiltState>,
}

#[derive(Debug)]
struct BuiltState {
    registry: Registry,
    report: ScanReport,
}

impl PackLoader {
    /// Creates a loader with no included paths.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Includes a pack file or a directory to scan recursively.
    /// See [`ArchiveLocator::include`] for the per-path rules.
    pub fn include<P: AsRef<Path>>(&mut self, path: P) {
        self.locator.include(path);
    }

    /// The pack archives located so far, in discovery order.
    #[must_use]
    pub fn located_archives(&self) -> &[ArchiveRef] {
        self.locator.located()
    }

    /// Loads every located pack and builds the registry.
    ///
    /// Constructs one loading context spanning exactly the located archive
    /// set, then resolves each enumerated type name through it. Unreadable
    /// packs, unresolvable names, and names already loaded from an earlier
    /// pack are recorded and skipped; nothing aborts the build. Calling
    /// `build` again is a no-op.
    pub fn build(&mut self) {
        if self.built.is_some() {
            debug!("build() already completed, ignoring repeated call");
            return;
        }

        let archives = self.locator.located().to_vec();
        let context = LoadingContext::from_archives(&archives);

        let mut report = ScanReport::new();
        report.archives_scanned = archives.len();

        let mut handles: Vec<TypeHandle> = Vec::new();
        let mut index = Vec::with_capacity(archives.len());
        let mut loaded: BTreeSet<String> = BTreeSet::new();

        for archive in archives {
            let start = handles.len();
            let names = match enumerate::type_names(archive.as_path()) {
                Ok(names) => names,
                Err(err) => {
                    warn!(archive = %archive, "{err}");
                    report.add_warning(err.to_string());
                    Vec::new()
                }
            };
            report.names_discovered += names.len();

            for name in names {
                if loaded.contains(name.as_str()) {
                    let message =
                        format!("type `{name}` already loaded from an earlier pack, skipping");
                    warn!(archive = %archive, "{message}");
                    report.add_warning(message);
                    continue;
                }

                match load_one(&context, &archive, &name) {
                    Ok(handle) => {
                        loaded.insert(name.as_str().to_string());
                        handles.push(handle);
                    }
                    Err(err) => {
                        warn!(archive = %archive, "{err}");
                        report.add_warning(err.to_string());
                    }
                }
            }

            index.push((archive, start..handles.len()));
        }

        report.types_loaded = handles.len();
        info!(
            archives = report.archives_scanned,
            types = report.types_loaded,
            dropped = report.names_dropped(),
            "pack scan complete"
        );

        self.built = Some(BuiltState {
            registry: Registry::new(handles, index, context),
            report,
        });
    }

    /// The registry built by [`build`](Self::build).
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::NotYetLoaded`] if `build` has not completed.
    pub fn registry(&self) -> Result<&Registry> {
        self.built
            .as_ref()
            .map(|state| &state.registry)
            .ok_or(ScanError::NotYetLoaded)
    }

    /// The report recorded by [`build`](Self::build).
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::NotYetLoaded`] if `build` has not completed.
    pub fn report(&self) -> Result<&ScanReport> {
        self.built
            .as_ref()
            .map(|state| &state.report)
            .ok_or(ScanError::NotYetLoaded)
    }
}

/// Resolves one enumerated name into a handle.
fn load_one(context: &LoadingContext, origin: &ArchiveRef, name: &TypeName) -> Result<TypeHandle> {
    let def = context.resolve(name)?;
    let conformance = context.conformance_closure(def);
    Ok(TypeHandle::new(
        name.clone(),
        origin.clone(),
        def.kind,
        def.supertypes().map(str::to_string).collect(),
        conformance,
        def.symbol.clone(),
    ))
}

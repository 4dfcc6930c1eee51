//! Plugin type discovery and filtering over pack archives.
//!
//! `typack-core` scans pack archives (`.tpk` zip files bundling type
//! definition entries) and loads the declared types into an immutable
//! registry, which a host application then narrows with composable queries
//! — by originating pack, by namespace, and by supertype conformance —
//! without compile-time knowledge of the plugin types involved.
//!
//! # Examples
//!
//! ```no_run
//! use typack_core::PackLoader;
//!
//! # fn main() -> Result<(), typack_core::ScanError> {
//! let mut loader = PackLoader::new();
//! loader.include("plugins/");
//! loader.build();
//!
//! let registry = loader.registry()?;
//! let effects = registry
//!     .query()
//!     .in_namespaces(["plugins.audio.*"])
//!     .that_extend_or_implement(["plugins.Effect"]);
//! for handle in effects.iter() {
//!     println!("{handle} from {}", handle.origin());
//! }
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod archive;
mod context;
pub mod descriptor;
pub mod enumerate;
pub mod error;
pub mod handle;
pub mod loader;
pub mod locator;
pub mod name;
pub mod query;
pub mod registry;
pub mod report;
pub mod test_utils;

// Re-export main API types
pub use archive::ArchiveRef;
pub use archive::PACK_EXT;
pub use descriptor::TYPE_DEF_SUFFIX;
pub use descriptor::TypeDef;
pub use descriptor::TypeKind;
pub use error::Result;
pub use error::ScanError;
pub use handle::TypeHandle;
pub use loader::PackLoader;
pub use locator::ArchiveLocator;
pub use name::TypeName;
pub use query::FilterSpec;
pub use query::SupertypeRef;
pub use query::TypeQuery;
pub use registry::Registry;
pub use report::ScanReport;

//! Test utilities for creating pack archives.
//!
//! This module provides a reusable builder for assembling pack files in
//! tests, so individual tests do not repeat zip-writing boilerplate.
//!
//! # Panics
//!
//! All functions in this module may panic on I/O errors since they are
//! designed for test use only where panics are acceptable.

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::io::Cursor;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;

use crate::descriptor::TYPE_DEF_SUFFIX;
use crate::descriptor::TypeDef;
use crate::descriptor::TypeKind;

/// Builder assembling a pack archive from type definitions and raw entries.
///
/// # Examples
///
/// ```
/// use typack_core::test_utils::PackBuilder;
///
/// let bytes = PackBuilder::new()
///     .add_interface("pkg.Iface")
///     .add_class("pkg.Impl", &["pkg.Iface"])
///     .add_raw("README.txt", b"not a type definition")
///     .build();
/// assert!(!bytes.is_empty());
/// ```
pub struct PackBuilder {
    zip: zip::ZipWriter<Cursor<Vec<u8>>>,
}

impl PackBuilder {
    /// Creates an empty pack builder.
    #[must_use]
    pub fn new() -> Self {
        Self {
            zip: zip::ZipWriter::new(Cursor::new(Vec::new())),
        }
    }

    /// Adds a class definition implementing the given interfaces. The
    /// entry path is derived from the dotted name.
    #[must_use]
    pub fn add_class(self, name: &str, implements: &[&str]) -> Self {
        let def = TypeDef {
            implements: implements.iter().map(ToString::to_string).collect(),
            ..TypeDef::default()
        };
        self.add_def(name, &def)
    }

    /// Adds an interface definition with no supertypes of its own.
    #[must_use]
    pub fn add_interface(self, name: &str) -> Self {
        let def = TypeDef {
            kind: TypeKind::Interface,
            ..TypeDef::default()
        };
        self.add_def(name, &def)
    }

    /// Adds a full type definition under the entry path derived from the
    /// dotted name.
    #[must_use]
    pub fn add_def(self, name: &str, def: &TypeDef) -> Self {
        let entry = format!("{}{TYPE_DEF_SUFFIX}", name.replace('.', "/"));
        let bytes = serde_json::to_vec(def).unwrap();
        self.add_raw(&entry, &bytes)
    }

    /// Adds a raw entry with the given name and content.
    #[must_use]
    pub fn add_raw(mut self, entry_name: &str, data: &[u8]) -> Self {
        use zip::write::SimpleFileOptions;

        let options = SimpleFileOptions::default()
            .compression_method(zip::CompressionMethod::Stored)
            .unix_permissions(0o644);

        self.zip.start_file(entry_name, options).unwrap();
        self.zip.write_all(data).unwrap();
        self
    }

    /// Builds and returns the pack archive bytes.
    #[must_use]
    pub fn build(self) -> Vec<u8> {
        self.zip.finish().unwrap().into_inner()
    }

    /// Builds the pack and writes it to `path`, returning the path.
    pub fn write_to<P: AsRef<Path>>(self, path: P) -> PathBuf {
        let path = path.as_ref().to_path_buf();
        std::fs::write(&path, self.build()).unwrap();
        path
    }
}

impl Default for PackBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_produces_bytes() {
        let bytes = PackBuilder::new().add_class("pkg.Impl", &[]).build();
        assert!(!bytes.is_empty());
    }

    #[test]
    fn test_write_to_creates_file() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = PackBuilder::new()
            .add_interface("pkg.Iface")
            .write_to(temp.path().join("p.tpk"));
        assert!(path.exists());
    }
}

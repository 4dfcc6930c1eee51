//! Type name enumeration over a single pack archive.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::Result;
use crate::ScanError;
use crate::descriptor::TYPE_DEF_SUFFIX;
use crate::name::NAMESPACE_SEPARATOR;
use crate::name::TypeName;

/// Lists the fully-qualified type names declared in one pack, in archive
/// entry order.
///
/// Every entry whose name ends case-insensitively with
/// [`TYPE_DEF_SUFFIX`] contributes one name: the suffix is stripped and
/// path separators are mapped to namespace separators
/// (`plugins/audio/Mixer.tydef` becomes `plugins.audio.Mixer`). All other
/// entries are ignored. The archive handle is released before returning.
///
/// # Errors
///
/// Returns [`ScanError::ArchiveRead`] if the pack cannot be opened or its
/// entry stream read. Partial results from a partially-read pack are never
/// surfaced; the caller treats the whole archive as contributing nothing.
pub fn type_names(archive: &Path) -> Result<Vec<TypeName>> {
    let file = File::open(archive).map_err(|err| ScanError::ArchiveRead {
        path: archive.to_path_buf(),
        reason: err.to_string(),
    })?;

    let mut zip =
        zip::ZipArchive::new(BufReader::new(file)).map_err(|err| ScanError::ArchiveRead {
            path: archive.to_path_buf(),
            reason: format!("failed to open pack: {err}"),
        })?;

    let mut names = Vec::new();
    for i in 0..zip.len() {
        let entry = zip.by_index(i).map_err(|err| ScanError::ArchiveRead {
            path: archive.to_path_buf(),
            reason: format!("failed to read pack entry: {err}"),
        })?;

        if let Some(name) = derive_type_name(entry.name()) {
            names.push(name);
        }
    }

    Ok(names)
}

/// Derives a fully-qualified type name from a pack entry name, or `None`
/// for entries that are not type definitions.
#[must_use]
pub fn derive_type_name(entry_name: &str) -> Option<TypeName> {
    let stem = strip_suffix_ignore_case(entry_name, TYPE_DEF_SUFFIX)?;
    Some(TypeName::new(
        stem.replace('/', &NAMESPACE_SEPARATOR.to_string()),
    ))
}

fn strip_suffix_ignore_case<'a>(name: &'a str, suffix: &str) -> Option<&'a str> {
    if name.len() < suffix.len() {
        return None;
    }
    let (stem, tail) = name.split_at(name.len() - suffix.len());
    tail.eq_ignore_ascii_case(suffix).then_some(stem)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::test_utils::PackBuilder;
    use tempfile::TempDir;

    #[test]
    fn test_derive_type_name() {
        assert_eq!(
            derive_type_name("plugins/audio/Mixer.tydef"),
            Some(TypeName::new("plugins.audio.Mixer"))
        );
        assert_eq!(
            derive_type_name("Top.tydef"),
            Some(TypeName::new("Top"))
        );
        assert_eq!(derive_type_name("README.txt"), None);
        assert_eq!(derive_type_name(""), None);
    }

    #[test]
    fn test_derive_type_name_case_insensitive_suffix() {
        assert_eq!(
            derive_type_name("pkg/Impl.TYDEF"),
            Some(TypeName::new("pkg.Impl"))
        );
        assert_eq!(
            derive_type_name("pkg/Impl.TyDef"),
            Some(TypeName::new("pkg.Impl"))
        );
    }

    #[test]
    fn test_type_names_skips_foreign_entries() {
        let temp = TempDir::new().unwrap();
        let pack = PackBuilder::new()
            .add_class("plugins.Foo", &[])
            .add_class("plugins.Bar", &[])
            .add_raw("README.txt", b"docs")
            .write_to(temp.path().join("p.tpk"));

        let names = type_names(&pack).unwrap();
        assert_eq!(
            names,
            vec![TypeName::new("plugins.Foo"), TypeName::new("plugins.Bar")]
        );
    }

    #[test]
    fn test_type_names_entry_order() {
        let temp = TempDir::new().unwrap();
        let pack = PackBuilder::new()
            .add_class("z.Last", &[])
            .add_class("a.First", &[])
            .write_to(temp.path().join("p.tpk"));

        let names = type_names(&pack).unwrap();
        assert_eq!(names[0], TypeName::new("z.Last"));
        assert_eq!(names[1], TypeName::new("a.First"));
    }

    #[test]
    fn test_type_names_missing_pack() {
        let result = type_names(Path::new("/no/such/pack.tpk"));
        assert!(matches!(result, Err(ScanError::ArchiveRead { .. })));
    }

    #[test]
    fn test_type_names_corrupt_pack() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("broken.tpk");
        std::fs::write(&path, b"this is not a zip file").unwrap();

        let result = type_names(&path);
        assert!(matches!(result, Err(ScanError::ArchiveRead { .. })));
    }
}

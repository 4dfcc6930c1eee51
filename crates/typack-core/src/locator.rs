//! Pack archive location on the filesystem.

use std::path::Path;

use tracing::debug;
use tracing::warn;
use walkdir::WalkDir;

use crate::ScanError;
use crate::archive;
use crate::archive::ArchiveRef;

/// Resolves filesystem paths into a flat list of pack archives.
///
/// Paths are accepted through [`include`](Self::include); directories are
/// walked depth-first and every contained pack file is collected. All
/// problem conditions (missing path, file that is neither a pack nor a
/// directory, unreadable directory entry) are non-fatal: they are logged
/// and the offending path is excluded.
///
/// # Examples
///
/// ```no_run
/// use typack_core::ArchiveLocator;
///
/// let mut locator = ArchiveLocator::new();
/// locator.include("plugins/");
/// locator.include("extra/audio.tpk");
/// for archive in locator.located() {
///     println!("found pack: {archive}");
/// }
/// ```
#[derive(Debug, Default)]
pub struct ArchiveLocator {
    archives: Vec<ArchiveRef>,
}

impl ArchiveLocator {
    /// Creates an empty locator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Includes a path: a pack file is appended, a directory is walked
    /// recursively, anything else is logged and skipped.
    pub fn include<P: AsRef<Path>>(&mut self, path: P) {
        let path = path.as_ref();

        if !path.exists() {
            let err = ScanError::PathNotFound {
                path: path.to_path_buf(),
            };
            warn!(path = %path.display(), "{err}");
            return;
        }

        if path.is_file() {
            self.include_file(path);
        } else {
            self.include_dir(path);
        }
    }

    /// Returns the located archives in discovery order.
    #[must_use]
    pub fn located(&self) -> &[ArchiveRef] {
        &self.archives
    }

    fn include_file(&mut self, path: &Path) {
        if archive::is_pack_file(path) {
            self.push(ArchiveRef::new(path));
        } else {
            let err = ScanError::InvalidArchivePath {
                path: path.to_path_buf(),
            };
            warn!(path = %path.display(), "{err}");
        }
    }

    /// Walks a directory depth-first in sorted sibling order. Nested
    /// non-pack files are skipped silently; subdirectories are always
    /// descended into regardless of their name.
    fn include_dir(&mut self, dir: &Path) {
        let walker = WalkDir::new(dir)
            .min_depth(1)
            .follow_links(false)
            .sort_by_file_name();

        for entry in walker {
            match entry {
                Ok(entry) if entry.file_type().is_file() => {
                    if archive::is_pack_file(entry.path()) {
                        self.push(ArchiveRef::new(entry.path()));
                    }
                }
                Ok(_) => {}
                Err(err) => {
                    warn!(dir = %dir.display(), "failed to read directory entry: {err}");
                }
            }
        }
    }

    fn push(&mut self, archive: ArchiveRef) {
        if self.archives.contains(&archive) {
            debug!(archive = %archive, "pack already located, skipping duplicate");
        } else {
            self.archives.push(archive);
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(path: &Path) {
        fs::write(path, b"").unwrap();
    }

    #[test]
    fn test_nonexistent_path_located_nothing() {
        let mut locator = ArchiveLocator::new();
        locator.include("/does/not/exist/at/all");
        assert!(locator.located().is_empty());
    }

    #[test]
    fn test_include_pack_file() {
        let temp = TempDir::new().unwrap();
        let pack = temp.path().join("audio.tpk");
        touch(&pack);

        let mut locator = ArchiveLocator::new();
        locator.include(&pack);

        assert_eq!(locator.located().len(), 1);
        assert_eq!(locator.located()[0], ArchiveRef::new(&pack));
    }

    #[test]
    fn test_include_non_pack_file_rejected() {
        let temp = TempDir::new().unwrap();
        let other = temp.path().join("notes.txt");
        touch(&other);

        let mut locator = ArchiveLocator::new();
        locator.include(&other);
        assert!(locator.located().is_empty());
    }

    #[test]
    fn test_directory_walk_collects_nested_packs() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        fs::create_dir(root.join("deep")).unwrap();
        touch(&root.join("deep/a.tpk"));
        touch(&root.join("readme.md"));
        touch(&root.join("z.tpk"));

        let mut locator = ArchiveLocator::new();
        locator.include(root);

        let located: Vec<_> = locator
            .located()
            .iter()
            .map(|a| a.as_path().file_name().unwrap().to_str().unwrap().to_string())
            .collect();
        // Sorted sibling order, depth-first: the `deep` subtree is expanded
        // before its later sibling `z.tpk` is processed.
        assert_eq!(located, vec!["a.tpk", "z.tpk"]);
    }

    #[test]
    fn test_case_insensitive_extension() {
        let temp = TempDir::new().unwrap();
        let pack = temp.path().join("loud.TPK");
        touch(&pack);

        let mut locator = ArchiveLocator::new();
        locator.include(&pack);
        assert_eq!(locator.located().len(), 1);
    }

    #[test]
    fn test_duplicate_include_deduplicated() {
        let temp = TempDir::new().unwrap();
        let pack = temp.path().join("audio.tpk");
        touch(&pack);

        let mut locator = ArchiveLocator::new();
        locator.include(&pack);
        locator.include(&pack);
        locator.include(temp.path());

        assert_eq!(locator.located().len(), 1);
    }

    #[test]
    fn test_discovery_order_preserved_across_includes() {
        let temp = TempDir::new().unwrap();
        let first = temp.path().join("z.tpk");
        let second = temp.path().join("a.tpk");
        touch(&first);
        touch(&second);

        let mut locator = ArchiveLocator::new();
        locator.include(&first);
        locator.include(&second);

        assert_eq!(locator.located()[0], ArchiveRef::new(&first));
        assert_eq!(locator.located()[1], ArchiveRef::new(&second));
    }
}

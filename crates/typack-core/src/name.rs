//! Fully-qualified type names.

use std::fmt;

/// Separator between namespace segments in a fully-qualified name.
pub const NAMESPACE_SEPARATOR: char = '.';

/// A fully-qualified, dot-separated type name such as `plugins.audio.Mixer`.
///
/// The namespace is everything before the last separator (empty for a
/// top-level name), the simple name everything after it.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TypeName(String);

impl TypeName {
    /// Wraps a dotted name without validating it.
    #[must_use]
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self(name.into())
    }

    /// Returns the full dotted name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the namespace portion, or `""` for a top-level name.
    #[must_use]
    pub fn namespace(&self) -> &str {
        match self.0.rfind(NAMESPACE_SEPARATOR) {
            Some(idx) => &self.0[..idx],
            None => "",
        }
    }

    /// Returns the simple (unqualified) name.
    #[must_use]
    pub fn simple_name(&self) -> &str {
        match self.0.rfind(NAMESPACE_SEPARATOR) {
            Some(idx) => &self.0[idx + 1..],
            None => &self.0,
        }
    }

    /// Whether the name consists of non-empty dot-separated segments.
    ///
    /// A name derived from a malformed entry path (empty segments, leading
    /// or trailing separators) fails this check and is rejected during
    /// resolution rather than during enumeration.
    #[must_use]
    pub fn is_well_formed(&self) -> bool {
        !self.0.is_empty() && self.0.split(NAMESPACE_SEPARATOR).all(|seg| !seg.is_empty())
    }
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TypeName {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for TypeName {
    fn from(name: String) -> Self {
        Self::new(name)
    }
}

impl AsRef<str> for TypeName {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_namespace_split() {
        let name = TypeName::new("plugins.audio.Mixer");
        assert_eq!(name.namespace(), "plugins.audio");
        assert_eq!(name.simple_name(), "Mixer");
    }

    #[test]
    fn test_top_level_name() {
        let name = TypeName::new("Mixer");
        assert_eq!(name.namespace(), "");
        assert_eq!(name.simple_name(), "Mixer");
    }

    #[test]
    fn test_well_formed() {
        assert!(TypeName::new("a.b.C").is_well_formed());
        assert!(TypeName::new("C").is_well_formed());
        assert!(!TypeName::new("").is_well_formed());
        assert!(!TypeName::new("a..C").is_well_formed());
        assert!(!TypeName::new(".C").is_well_formed());
        assert!(!TypeName::new("a.").is_well_formed());
    }

    #[test]
    fn test_display_round_trip() {
        let name = TypeName::new("pkg.Impl");
        assert_eq!(name.to_string(), "pkg.Impl");
        assert_eq!(name.as_str(), "pkg.Impl");
    }
}

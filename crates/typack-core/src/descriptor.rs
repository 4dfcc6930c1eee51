//! Type definition descriptors carried inside pack archives.
//!
//! A pack does not contain introspectable compiled code; it contains one
//! JSON descriptor per exported type, declaring the type's identity and the
//! named supertypes it extends or implements. Conformance queries work off
//! these declared capability lists, and the optional `symbol` field names
//! the factory entry point a host may hand to its own dynamic-linking layer.

use serde::Deserialize;
use serde::Serialize;

/// Entry-name suffix identifying a type definition inside a pack
/// (matched case-insensitively).
pub const TYPE_DEF_SUFFIX: &str = ".tydef";

/// Kind of a declared type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeKind {
    /// A concrete or abstract class.
    #[default]
    Class,
    /// An interface (no instances of its own).
    Interface,
}

/// One parsed type definition.
///
/// All fields are optional in the wire format; an empty JSON object `{}` is
/// a valid definition for a class with no declared supertypes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TypeDef {
    /// Declared fully-qualified name. When present it must agree with the
    /// name derived from the entry path, otherwise the definition is
    /// rejected as malformed during resolution.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Declared kind, defaulting to `class`.
    #[serde(default)]
    pub kind: TypeKind,

    /// Fully-qualified names of extended base types.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extends: Vec<String>,

    /// Fully-qualified names of implemented interfaces.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub implements: Vec<String>,

    /// Exported factory symbol for the host's dynamic-linking layer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
}

impl TypeDef {
    /// Iterates over all declared supertypes, extended before implemented.
    pub fn supertypes(&self) -> impl Iterator<Item = &str> {
        self.extends
            .iter()
            .chain(self.implements.iter())
            .map(String::as_str)
    }
}

/// Parses descriptor bytes into a [`TypeDef`].
///
/// # Errors
///
/// Returns the underlying JSON error for malformed input; callers convert
/// this into a type-resolution failure for the affected name.
pub fn parse_type_def(bytes: &[u8]) -> Result<TypeDef, serde_json::Error> {
    serde_json::from_slice(bytes)
}

//! Identifier management using string interning for efficient string storage and comparison
//!
//! This module provides the [`Id`] type used for graph node identities and the
//! [`slugify`] helper that derives content-based node ids from labels.

use std::{
    fmt,
    sync::{Mutex, OnceLock},
};

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use string_interner::{DefaultStringInterner, DefaultSymbol};

/// Maximum length of a slug, in bytes of its ASCII output.
pub const SLUG_MAX_LEN: usize = 50;

/// Global string interner for efficient identifier storage.
///
/// # Thread Safety
///
/// This uses `Mutex` for thread-safe access to the string interner.
static INTERNER: OnceLock<Mutex<DefaultStringInterner>> = OnceLock::new();

fn interner() -> std::sync::MutexGuard<'static, DefaultStringInterner> {
    INTERNER
        .get_or_init(|| Mutex::new(DefaultStringInterner::new()))
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// The kind of diagram element a raw graph node was built from.
///
/// Used only to mint readable, deterministic node and connector ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdKind {
    /// A container outline (`box`)
    Container,
    /// A free-standing text line (`text`)
    Text,
    /// A connector region (`conn`)
    Connector,
}

/// Efficient identifier type using string interning
///
/// Node ids are compared and hashed constantly while graphs are merged and
/// rewired, so they are interned once and copied afterwards.
///
/// # Examples
///
/// ```
/// use inkgraph_core::identifier::{Id, IdKind};
///
/// let a = Id::new("data");
/// let b = Id::new("data");
/// assert_eq!(a, b);
///
/// let node = Id::for_element(2, IdKind::Container, 0);
/// assert_eq!(node, "g2_box0");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Id(DefaultSymbol);

impl Id {
    /// Creates an `Id` from &str.
    ///
    /// # Arguments
    ///
    /// * `name` - The string representation of the identifier
    pub fn new(name: &str) -> Self {
        let symbol = interner().get_or_intern(name);
        Self(symbol)
    }

    /// Creates the id of the `index`-th node of `kind` inside diagram group `group`.
    ///
    /// Ids are unique across a page as long as group indices are, which lets
    /// per-group graphs be concatenated without renaming.
    pub fn for_element(group: usize, kind: IdKind, index: usize) -> Self {
        let prefix = match kind {
            IdKind::Container => "box",
            IdKind::Text => "text",
            IdKind::Connector => "conn",
        };
        Self::new(&format!("g{group}_{prefix}{index}"))
    }

    /// Creates the content-derived id of a label, see [`slugify`].
    pub fn from_label(label: &str) -> Self {
        Self::new(&slugify(label))
    }

    /// Returns `true` when the identifier text contains `needle`.
    pub fn contains(&self, needle: &str) -> bool {
        let interner = interner();
        interner
            .resolve(self.0)
            .is_some_and(|value| value.contains(needle))
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let interner = interner();
        let str_value = interner.resolve(self.0).unwrap_or_default();
        write!(f, "{}", str_value)
    }
}

impl From<&str> for Id {
    /// Creates an `Id` from a string slice
    ///
    /// This is a convenience implementation that calls `Id::new`.
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl PartialEq<str> for Id {
    /// Allows direct comparison with string slices: `id == "string"`
    fn eq(&self, other: &str) -> bool {
        let interner = interner();
        interner.resolve(self.0) == Some(other)
    }
}

impl PartialEq<&str> for Id {
    fn eq(&self, other: &&str) -> bool {
        self == *other
    }
}

impl Serialize for Id {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Id {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        Ok(Self::new(&value))
    }
}

/// Derives a filesystem- and id-safe slug from a label.
///
/// The label is lowercased, every run of characters outside `[a-z0-9]` becomes a
/// single `_`, leading and trailing underscores are trimmed, and the result is
/// truncated to [`SLUG_MAX_LEN`] characters. Identical labels always produce
/// identical slugs.
///
/// # Examples
///
/// ```
/// use inkgraph_core::identifier::slugify;
///
/// assert_eq!(slugify("Learning Program"), "learning_program");
/// assert_eq!(slugify("  Relational diagrams (like graphs, trees) "), "relational_diagrams_like_graphs_trees");
/// ```
pub fn slugify(label: &str) -> String {
    let mut slug = String::with_capacity(label.len());
    let mut pending_separator = false;

    for c in label.to_lowercase().chars() {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if pending_separator && !slug.is_empty() {
                slug.push('_');
            }
            pending_separator = false;
            slug.push(c);
        } else {
            pending_separator = true;
        }
    }

    slug.truncate(SLUG_MAX_LEN);
    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new() {
        let id1 = Id::new("model");
        let id2 = Id::new("model");
        let id3 = Id::new("data");

        assert_eq!(id1, id2);
        assert_ne!(id1, id3);
        assert_eq!(id1, "model");
    }

    #[test]
    fn test_for_element() {
        assert_eq!(Id::for_element(0, IdKind::Container, 3), "g0_box3");
        assert_eq!(Id::for_element(4, IdKind::Text, 0), "g4_text0");
        assert_eq!(Id::for_element(1, IdKind::Connector, 2), "g1_conn2");
        assert_ne!(
            Id::for_element(0, IdKind::Text, 1),
            Id::for_element(1, IdKind::Text, 0)
        );
    }

    #[test]
    fn test_display_trait() {
        let id = Id::new("display_test");
        assert_eq!(format!("{}", id), "display_test");
    }

    #[test]
    fn test_contains() {
        let id = Id::new("definition_of_ml");
        assert!(id.contains("definition"));
        assert!(!id.contains("model"));
    }

    #[test]
    fn test_serde_as_string() {
        let id = Id::new("learning_program");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"learning_program\"");

        let parsed: Id = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn test_slugify_basic() {
        assert_eq!(slugify("Data"), "data");
        assert_eq!(slugify("Machine Learning"), "machine_learning");
        assert_eq!(slugify("Logical if-else rules"), "logical_if_else_rules");
    }

    #[test]
    fn test_slugify_trims_separators() {
        assert_eq!(slugify("--Model--"), "model");
        assert_eq!(slugify("!!!"), "");
        assert_eq!(slugify(""), "");
    }

    #[test]
    fn test_slugify_truncates() {
        let label = "a".repeat(80);
        assert_eq!(slugify(&label).len(), SLUG_MAX_LEN);
    }

    #[test]
    fn test_slugify_non_ascii_becomes_separator() {
        assert_eq!(slugify("café au lait"), "caf_au_lait");
    }

    #[test]
    fn test_from_label() {
        assert_eq!(Id::from_label("Learning Program"), "learning_program");
    }
}

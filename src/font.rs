//! Font entry model, lookup references and the category table.

use crate::error::CatalogError;
use serde::{Deserialize, Serialize};

/// A single font known to the catalog.
///
/// The `stack` is the CSS font-stack string; the catalog appends the provider
/// name as a quoted fallback token on insertion, which makes the stack a
/// de-facto unique key across providers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FontEntry {
    /// Slugified family name, unique within a provider.
    pub key: String,
    /// Display name of the family.
    pub name: String,
    /// Name of the provider that supplied this entry.
    #[serde(default)]
    pub provider: String,
    /// CSS font-stack, provider fallback included once stored.
    pub stack: String,
    /// Script subsets this family covers.
    #[serde(default)]
    pub subsets: Vec<String>,
    /// Available variants (weights/styles) of this family.
    #[serde(default)]
    pub variants: Vec<String>,
    /// Category key, see [`DEFAULT_CATEGORIES`].
    pub category: String,
    /// Rank within the source catalog, higher is more popular.
    #[serde(default)]
    pub popularity: u32,
    #[serde(default)]
    pub last_modified: String,
    /// Count of active consumers currently selecting this font.
    #[serde(default)]
    pub used: u32,
    /// Whether the provider's loader has been invoked for this entry.
    #[serde(default)]
    pub loaded: bool,
}

impl FontEntry {
    /// A minimal entry with the required fields set and everything else empty.
    pub fn new(
        name: impl Into<String>,
        key: impl Into<String>,
        stack: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            key: key.into(),
            name: name.into(),
            provider: String::new(),
            stack: stack.into(),
            subsets: Vec::new(),
            variants: Vec::new(),
            category: category.into(),
            popularity: 0,
            last_modified: String::new(),
            used: 0,
            loaded: false,
        }
    }

    /// Rejects entries with an empty required field, naming the field.
    pub(crate) fn validate(&self) -> Result<(), CatalogError> {
        let required = [
            ("name", &self.name),
            ("key", &self.key),
            ("stack", &self.stack),
            ("category", &self.category),
        ];
        for (field, value) in required {
            if value.is_empty() {
                return Err(CatalogError::InvalidEntry(field));
            }
        }
        Ok(())
    }
}

/// Derives the catalog key for a family name.
pub fn font_key(family: &str) -> String {
    slug::slugify(family)
}

/// A lookup reference to a stored font.
///
/// Replaces duck-typed "entry or key string" arguments with an explicit
/// tagged variant resolved at the call site.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontRef<'a> {
    /// By the unique stack string (provider fallback included).
    Stack(&'a str),
    /// By family key within a provider.
    Key { key: &'a str, provider: &'a str },
}

/// A font category with its CSS generic fallback stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FontCategory {
    pub key: &'static str,
    pub name: &'static str,
    /// Generic family appended to stacks of fonts in this category.
    pub fallback: &'static str,
}

/// The fixed set of selectable categories. The last one (`other`) doubles as
/// the fallback when remote classification finds no match.
pub const DEFAULT_CATEGORIES: [FontCategory; 6] = [
    FontCategory { key: "serif", name: "Serif", fallback: "serif" },
    FontCategory { key: "sansserif", name: "Sans Serif", fallback: "sans-serif" },
    FontCategory { key: "handwriting", name: "Handwriting", fallback: "cursive" },
    FontCategory { key: "display", name: "Display", fallback: "fantasy" },
    FontCategory { key: "monospace", name: "Monospace", fallback: "monospace" },
    FontCategory { key: "other", name: "Other", fallback: "sans-serif" },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_entry_passes() {
        let font = FontEntry::new("Arial", "arial", "Arial, sans-serif", "sansserif");
        assert!(font.validate().is_ok());
    }

    #[test]
    fn empty_required_field_is_rejected() {
        let font = FontEntry::new("Arial", "", "Arial, sans-serif", "sansserif");
        let err = font.validate().unwrap_err();
        assert!(matches!(err, CatalogError::InvalidEntry("key")));
    }

    #[test]
    fn font_key_slugifies_family_names() {
        assert_eq!(font_key("Open Sans"), "open-sans");
        assert_eq!(font_key("PT Serif Caption"), "pt-serif-caption");
    }

    #[test]
    fn other_is_the_last_category() {
        assert_eq!(DEFAULT_CATEGORIES[5].key, "other");
    }
}

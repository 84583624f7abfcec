//! The bundled "web-safe" font seed list.
//!
//! These entries are added synchronously at catalog construction. Stacks are
//! given without the provider fallback; the catalog appends it on insertion.

use crate::font::FontEntry;

fn websafe(
    name: &str,
    key: &str,
    stack: &str,
    category: &str,
    popularity: u32,
) -> FontEntry {
    FontEntry {
        subsets: vec!["latin".to_string()],
        variants: vec!["regular".to_string()],
        popularity,
        ..FontEntry::new(name, key, stack, category)
    }
}

/// Fonts every platform can render without loading anything.
pub fn default_websafe_fonts() -> Vec<FontEntry> {
    vec![
        websafe(
            "Arial",
            "arial",
            "Arial, 'Helvetica Neue', Helvetica, sans-serif",
            "sansserif",
            8,
        ),
        websafe(
            "Verdana",
            "verdana",
            "Verdana, Geneva, sans-serif",
            "sansserif",
            7,
        ),
        websafe(
            "Trebuchet MS",
            "trebuchet-ms",
            "'Trebuchet MS', Helvetica, sans-serif",
            "sansserif",
            6,
        ),
        websafe(
            "Times New Roman",
            "times-new-roman",
            "'Times New Roman', Times, serif",
            "serif",
            5,
        ),
        websafe(
            "Georgia",
            "georgia",
            "Georgia, 'Times New Roman', serif",
            "serif",
            4,
        ),
        websafe(
            "Courier New",
            "courier-new",
            "'Courier New', Courier, monospace",
            "monospace",
            3,
        ),
        websafe(
            "Comic Sans MS",
            "comic-sans-ms",
            "'Comic Sans MS', cursive",
            "handwriting",
            2,
        ),
        websafe("Impact", "impact", "Impact, Charcoal, fantasy", "display", 1),
    ]
}

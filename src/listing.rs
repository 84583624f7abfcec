//! Presentation adapter for font-list entries.
//!
//! A rendering layer deals with three kinds of list rows: provider
//! headlines, selectable fonts and free-text rows. [`EntryView`] collapses
//! an entry's classification into boolean flags for template branching.

use crate::font::FontEntry;

/// One row of the rendered font list.
#[derive(Debug, Clone, PartialEq)]
pub enum ListEntry {
    /// A provider or category headline.
    Headline { text: String },
    /// A selectable font.
    Font { font: FontEntry },
    /// Plain text, e.g. an empty-result notice.
    Text { text: String },
}

/// Flags derived from one entry and the current selection. Stateless;
/// recompute whenever the entry changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryView {
    pub is_headline: bool,
    pub is_font: bool,
    pub is_text: bool,
    /// Whether this row shows the currently selected font.
    pub is_current: bool,
}

impl EntryView {
    pub fn new(entry: &ListEntry, current: Option<&FontEntry>) -> Self {
        let is_current = match (entry, current) {
            (ListEntry::Font { font }, Some(selected)) => font.stack == selected.stack,
            _ => false,
        };
        Self {
            is_headline: matches!(entry, ListEntry::Headline { .. }),
            is_font: matches!(entry, ListEntry::Font { .. }),
            is_text: matches!(entry, ListEntry::Text { .. }),
            is_current,
        }
    }
}

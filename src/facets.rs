//! Togglable selection sets (subsets, providers, imports, usage).
//!
//! A [`FacetSet`] is an insertion-ordered name→value map with a single merge
//! routine covering both "additive" (merge into the existing set) and
//! "replace" (prune keys absent from the source, then merge) updates, and
//! both "update existing" and "insert-only" semantics for keys that are
//! already present. Insertion order matters: derived stylesheet URLs join
//! subset names in first-seen order.

/// Options for [`FacetSet::merge`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectOptions {
    /// When false, target keys absent from the source are removed first.
    pub additive: bool,
    /// When true, source values overwrite existing keys.
    pub update: bool,
}

impl Default for SelectOptions {
    fn default() -> Self {
        Self { additive: true, update: false }
    }
}

impl SelectOptions {
    /// Prune-then-merge: the result tracks exactly the source keys.
    pub fn replace() -> Self {
        Self { additive: false, update: false }
    }

    /// Additive with existing keys overwritten.
    pub fn updating() -> Self {
        Self { additive: true, update: true }
    }
}

/// Source of a merge: bare names (values default) or explicit pairs.
#[derive(Debug, Clone)]
pub enum FacetSource<V> {
    Names(Vec<String>),
    Entries(Vec<(String, V)>),
}

impl<V> From<Vec<String>> for FacetSource<V> {
    fn from(names: Vec<String>) -> Self {
        FacetSource::Names(names)
    }
}

impl<V> From<&[String]> for FacetSource<V> {
    fn from(names: &[String]) -> Self {
        FacetSource::Names(names.to_vec())
    }
}

impl<V, const N: usize> From<[&str; N]> for FacetSource<V> {
    fn from(names: [&str; N]) -> Self {
        FacetSource::Names(names.iter().map(|n| n.to_string()).collect())
    }
}

impl<V> From<Vec<(String, V)>> for FacetSource<V> {
    fn from(entries: Vec<(String, V)>) -> Self {
        FacetSource::Entries(entries)
    }
}

/// An insertion-ordered mapping from facet name to value.
///
/// Values are `bool` active-flags for subsets/providers/usage and stylesheet
/// URLs (`String`) for imports. Sets are small, so lookups scan linearly.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FacetSet<V = bool> {
    entries: Vec<(String, V)>,
}

impl<V> FacetSet<V> {
    pub fn new() -> Self {
        Self { entries: Vec::new() }
    }

    pub fn get(&self, name: &str) -> Option<&V> {
        self.entries.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Inserts or overwrites a single entry.
    pub fn insert(&mut self, name: &str, value: V) {
        match self.entries.iter_mut().find(|(n, _)| n == name) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((name.to_string(), value)),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    /// Merges a source into this set per the given options.
    ///
    /// Bare names take `V::default()` as their value. Non-additive merges
    /// first delete every key absent from the source; insert-only merges
    /// leave values of existing keys untouched.
    pub fn merge(&mut self, source: impl Into<FacetSource<V>>, options: SelectOptions)
    where
        V: Default,
    {
        let pairs: Vec<(String, V)> = match source.into() {
            FacetSource::Names(names) => {
                names.into_iter().map(|n| (n, V::default())).collect()
            }
            FacetSource::Entries(entries) => entries,
        };

        if !options.additive {
            self.entries.retain(|(name, _)| pairs.iter().any(|(n, _)| n == name));
        }

        for (name, value) in pairs {
            match self.entries.iter_mut().find(|(n, _)| *n == name) {
                Some((_, slot)) if options.update => *slot = value,
                Some(_) => {}
                None => self.entries.push((name, value)),
            }
        }
    }
}

impl FacetSet<bool> {
    /// Whether a facet is present and active.
    pub fn is_active(&self, name: &str) -> bool {
        self.get(name).copied().unwrap_or(false)
    }

    /// Names of active facets, in insertion order.
    pub fn active_names(&self) -> impl Iterator<Item = &str> {
        self.entries
            .iter()
            .filter(|(_, active)| *active)
            .map(|(n, _)| n.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(set: &FacetSet<bool>) -> Vec<&str> {
        set.names().collect()
    }

    #[test]
    fn additive_merge_keeps_existing_keys() {
        let mut set = FacetSet::new();
        set.merge(["a", "b"], SelectOptions::default());
        set.merge(["b", "c"], SelectOptions::default());
        assert_eq!(names(&set), vec!["a", "b", "c"]);
    }

    #[test]
    fn replace_prunes_then_merges() {
        let mut set = FacetSet::new();
        set.merge(["a", "b"], SelectOptions::default());
        set.merge(["b", "c"], SelectOptions::replace());
        assert_eq!(names(&set), vec!["b", "c"]);
    }

    #[test]
    fn insert_only_merge_leaves_existing_values() {
        let mut set = FacetSet::new();
        set.insert("a", true);
        set.merge(["a", "b"], SelectOptions::default());
        assert!(set.is_active("a"));
        assert!(!set.is_active("b"));
    }

    #[test]
    fn update_merge_overwrites_existing_values() {
        let mut set = FacetSet::new();
        set.insert("a", true);
        set.merge(["a"], SelectOptions::updating());
        assert!(!set.is_active("a"));
    }

    #[test]
    fn replace_keeps_values_of_surviving_keys() {
        let mut set = FacetSet::new();
        set.insert("a", true);
        set.insert("b", true);
        set.merge(["b", "c"], SelectOptions::replace());
        assert!(set.is_active("b"));
        assert!(!set.is_active("c"));
        assert!(!set.contains("a"));
    }

    #[test]
    fn string_valued_entries_merge() {
        let mut set: FacetSet<String> = FacetSet::new();
        set.merge(
            vec![("google-fonts".to_string(), "https://example.test/css".to_string())],
            SelectOptions::updating(),
        );
        assert_eq!(
            set.get("google-fonts").map(String::as_str),
            Some("https://example.test/css")
        );
    }

    #[test]
    fn active_names_preserve_insertion_order() {
        let mut set = FacetSet::new();
        set.insert("latin", true);
        set.insert("greek", false);
        set.insert("cyrillic", true);
        let active: Vec<&str> = set.active_names().collect();
        assert_eq!(active, vec!["latin", "cyrillic"]);
    }
}

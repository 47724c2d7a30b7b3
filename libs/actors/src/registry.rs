//! Registry Seam
//!
//! Name-keyed lookup shared by the queue and lock registries. Names are
//! stored with their original case; every comparison goes through
//! [`fold_name`] so lookups are case-insensitive.

/// Read-only lookup surface common to every name-keyed registry
pub trait Registry<V> {
    /// Look up a single entry, `None` on miss
    fn get(&self, name: &str) -> Option<V>;

    /// Entries matching any of `names`, in registry order.
    /// An empty `names` slice selects every entry.
    fn get_many(&self, names: &[&str]) -> Vec<(String, V)>;

    /// All registered names, in registry order
    fn list(&self) -> Vec<String>;

    /// Number of entries
    fn len(&self) -> usize {
        self.list().len()
    }

    /// True when nothing is registered
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True when `name` resolves to an entry
    fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }
}

/// Canonical form used for name comparison.
///
/// Lower-cased, then upper-cased, so that every spelling of a name in any
/// casing folds to one key (`"straße"` and `"STRASSE"` both give `"STRASSE"`).
pub fn fold_name(name: &str) -> String {
    name.to_lowercase().to_uppercase()
}

/// Case-insensitive name equality
pub fn names_match(a: &str, b: &str) -> bool {
    a == b || fold_name(a) == fold_name(b)
}

/// True when `name` matches any entry of `wanted`; an empty filter matches everything
pub(crate) fn selected(name: &str, wanted: &[&str]) -> bool {
    wanted.is_empty() || wanted.iter().any(|w| names_match(name, w))
}

//! Ordered literal find/replace.

/// Sequential literal replacements.
///
/// Entries are applied in insertion order, each over the output of the
/// previous one, so a later entry can rewrite text introduced by an earlier
/// one.
///
/// [`insert`](Self::insert) has map semantics: re-inserting an existing key
/// overwrites its value but keeps the key's original position.
///
/// # Example
///
/// ```
/// use lilc_shader::ReplaceTable;
///
/// let mut text = "*A*".to_owned();
/// let mut table = ReplaceTable::new();
/// table.push("*A*", "*B*");
/// table.push("*B*", "done");
/// table.apply(&mut text);
///
/// assert_eq!(text, "done");
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReplaceTable {
    items: Vec<(String, String)>,
}

impl ReplaceTable {
    /// Create an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a replacement, even if `from` is already present.
    pub fn push(&mut self, from: impl Into<String>, to: impl Into<String>) {
        self.items.push((from.into(), to.into()));
    }

    /// Insert or overwrite the replacement for `from`.
    pub fn insert(&mut self, from: impl Into<String>, to: impl Into<String>) {
        let from = from.into();
        let to = to.into();
        match self.items.iter_mut().find(|(key, _)| *key == from) {
            Some((_, value)) => *value = to,
            None => self.items.push((from, to)),
        }
    }

    /// Replacement registered for `from`.
    #[must_use]
    pub fn get(&self, from: &str) -> Option<&str> {
        self.items
            .iter()
            .find(|(key, _)| key == from)
            .map(|(_, value)| value.as_str())
    }

    /// Iterate entries in application order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.items.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Apply all entries in order. Empty keys are skipped.
    pub fn apply(&self, text: &mut String) {
        for (from, to) in &self.items {
            if !from.is_empty() && text.contains(from.as_str()) {
                *text = text.replace(from.as_str(), to);
            }
        }
    }

    /// Check if the table has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }
}

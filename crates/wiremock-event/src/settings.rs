//! Parsing of custom-event settings into a replacement table.
//!
//! Settings arrive as a single free-form string in the form
//! `key1=value1;key2=value2;...`. A key without `=value` maps to the empty
//! string. There is no escaping: keys and values must not contain `;`, and
//! keys must not contain `=`.

use serde::Serialize;
use std::collections::HashMap;

const ENTRY_SEPARATOR: char = ';';
const KEY_VALUE_SEPARATOR: char = '=';

/// Placeholder key to replacement value mapping, built fresh per event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Replacements {
    values: HashMap<String, String>,
}

impl Replacements {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite a replacement.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    /// Look up the replacement value for a key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate over `(key, value)` pairs in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K, V> FromIterator<(K, V)> for Replacements
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut replacements = Self::new();
        for (key, value) in iter {
            replacements.insert(key, value);
        }
        replacements
    }
}

/// Parse an event settings string into a [`Replacements`] table.
///
/// `None`, empty and whitespace-only input all produce an empty table.
/// Entries are split on the first `=` only, so `a=b=c` maps `a` to `b=c`.
/// Empty entries are skipped and a repeated key keeps its last value.
/// No trimming is applied to keys or values.
pub fn parse_settings(settings: Option<&str>) -> Replacements {
    let Some(settings) = settings else {
        return Replacements::new();
    };
    if settings.trim().is_empty() {
        return Replacements::new();
    }

    settings
        .split(ENTRY_SEPARATOR)
        .filter(|entry| !entry.is_empty())
        .map(|entry| match entry.split_once(KEY_VALUE_SEPARATOR) {
            Some((key, value)) => (key, value),
            None => (entry, ""),
        })
        .collect()
}

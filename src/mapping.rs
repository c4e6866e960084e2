use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// The resolver strategy that produced a value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    Alias,
    ExactName,
    Substring,
    TokenOverlap,
    AddressPart,
    /// Supplied directly rather than resolved from a field.
    Manual,
}

/// A resolved value and the field it came from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Resolution {
    pub value: String,
    pub field: String,
    pub tier: Tier,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    pub field: Option<String>,
    pub tier: Tier,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Entry {
    /// Empty when unresolved.
    pub value: String,
    pub source: Option<Source>,
}

impl Entry {
    pub fn is_resolved(&self) -> bool {
        self.source.is_some()
    }
}

/// Total placeholder → value association for one fill pass. Unresolved
/// placeholders are present with an empty value.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Mapping {
    entries: BTreeMap<String, Entry>,
}

impl Mapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the resolver's outcome for a placeholder.
    pub fn record(&mut self, placeholder: impl Into<String>, resolution: Option<Resolution>) {
        let entry = match resolution {
            Some(r) => Entry {
                value: r.value,
                source: Some(Source {
                    field: Some(r.field),
                    tier: r.tier,
                }),
            },
            None => Entry::default(),
        };
        self.entries.insert(placeholder.into(), entry);
    }

    /// Set a value directly. An empty value leaves the placeholder unresolved.
    pub fn insert(&mut self, placeholder: impl Into<String>, value: impl Into<String>) {
        let value = value.into();
        let source = (!value.is_empty()).then_some(Source {
            field: None,
            tier: Tier::Manual,
        });
        self.entries.insert(placeholder.into(), Entry { value, source });
    }

    pub fn get(&self, placeholder: &str) -> Option<&Entry> {
        self.entries.get(placeholder)
    }

    pub fn value(&self, placeholder: &str) -> Option<&str> {
        self.entries.get(placeholder).map(|e| e.value.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Entry)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn placeholders(&self) -> BTreeSet<String> {
        self.entries.keys().cloned().collect()
    }

    /// Plain placeholder → value pairs, e.g. for display or JSON export.
    pub fn values(&self) -> BTreeMap<String, String> {
        self.entries
            .iter()
            .map(|(k, e)| (k.clone(), e.value.clone()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn resolved_count(&self) -> usize {
        self.entries.values().filter(|e| e.is_resolved()).count()
    }

    /// Apply manually supplied values. Blank overrides are ignored, as are names
    /// that are not placeholders of this mapping. Returns how many were applied.
    pub fn apply_overrides(&mut self, overrides: &BTreeMap<String, String>) -> usize {
        let mut applied = 0;
        for (placeholder, value) in overrides {
            if value.trim().is_empty() {
                continue;
            }
            match self.entries.get_mut(placeholder) {
                Some(entry) => {
                    entry.value = value.clone();
                    entry.source = Some(Source {
                        field: None,
                        tier: Tier::Manual,
                    });
                    applied += 1;
                }
                None => log::warn!("Override for unknown placeholder [{placeholder}] ignored"),
            }
        }
        applied
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Mapping {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut mapping = Self::new();
        for (placeholder, value) in iter {
            mapping.insert(placeholder, value);
        }
        mapping
    }
}

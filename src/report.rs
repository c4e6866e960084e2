use std::collections::{BTreeSet, HashSet};

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::fields::FieldDictionary;
use crate::mapping::{Mapping, Tier};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedEntry {
    pub placeholder: String,
    pub value: String,
    /// `None` for manually supplied values.
    pub field: Option<String>,
    pub tier: Tier,
}

/// Audit record of one resolution pass.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub total_placeholders: usize,
    pub resolved_count: usize,
    pub unresolved: Vec<String>,
    pub resolved: Vec<ResolvedEntry>,
    /// Present fields that did not supply any placeholder.
    pub unused_fields: Vec<String>,
}

pub fn report(placeholders: &BTreeSet<String>, mapping: &Mapping, fields: &FieldDictionary) -> Report {
    let mut resolved = Vec::new();
    let mut unresolved = Vec::new();
    for placeholder in placeholders {
        match mapping.get(placeholder).and_then(|e| e.source.as_ref().map(|s| (e, s))) {
            Some((entry, source)) => resolved.push(ResolvedEntry {
                placeholder: placeholder.clone(),
                value: entry.value.clone(),
                field: source.field.clone(),
                tier: source.tier,
            }),
            None => unresolved.push(placeholder.clone()),
        }
    }

    let used: HashSet<&str> = resolved.iter().filter_map(|r| r.field.as_deref()).collect();
    let unused_fields = fields
        .iter_present()
        .map(|(name, _)| name)
        .filter(|name| !used.contains(name))
        .map(str::to_string)
        .collect();

    Report {
        total_placeholders: placeholders.len(),
        resolved_count: resolved.len(),
        unresolved,
        resolved,
        unused_fields,
    }
}

impl Report {
    pub fn to_json(&self) -> Result<String, Error> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// One-line summary, e.g. `12 placeholders: 9 resolved, 3 unresolved`.
    pub fn summary(&self) -> String {
        format!(
            "{} placeholders: {} resolved, {} unresolved",
            self.total_placeholders,
            self.resolved_count,
            self.unresolved.len()
        )
    }
}

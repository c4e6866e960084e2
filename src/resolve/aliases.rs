use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Placeholders whose field is known up front. `None` marks information the
/// source documents never carry; those placeholders stay blank.
const BUILTIN: &[(&str, Option<&str>)] = &[
    ("DATE_LOSS", Some("date_of_loss")),
    ("INSURED_NAME", Some("insured_name")),
    ("MORTGAGE_CO", Some("mortgage_company")),
    ("MORTGAGEE", Some("mortgage_company")),
    ("INSURED_H_STREET", Some("address_street")),
    ("INSURED_H_CITY", Some("address_city")),
    ("INSURED_H_STATE", Some("address_state")),
    ("INSURED_H_ZIP", Some("address_zip")),
    ("DATE_INSPECTED", Some("date_inspected")),
    ("TOL_CODE", Some("type_of_loss")),
    ("POLICY_NUMBER", Some("policy_number")),
    ("CLAIM_NUMBER", Some("claim_number")),
    ("DATE_RECEIVED", None),
];

/// Direct placeholder → field table, consulted before any fuzzy matching.
///
/// Serialized as a flat JSON object: `{"DATE_LOSS": "date_of_loss", "DATE_RECEIVED": null}`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AliasTable {
    entries: BTreeMap<String, Option<String>>,
}

impl AliasTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builtin() -> Self {
        BUILTIN
            .iter()
            .map(|(placeholder, field)| (placeholder.to_string(), field.map(str::to_string)))
            .collect()
    }

    pub fn insert(&mut self, placeholder: impl Into<String>, field: Option<String>) {
        self.entries.insert(placeholder.into(), field);
    }

    /// `None` if the placeholder has no alias, `Some(None)` if it is aliased to no field.
    pub fn get(&self, placeholder: &str) -> Option<Option<&str>> {
        self.entries.get(placeholder).map(Option::as_deref)
    }

    /// Add entries from `other`, replacing any that share a placeholder.
    pub fn extend(&mut self, other: AliasTable) {
        self.entries.extend(other.entries);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn from_json_str(json: &str) -> Result<Self, Error> {
        serde_json::from_str(json)
            .map_err(|e| Error::Config(format!("alias table must map names to a field or null: {e}")))
    }

    pub fn from_json_file(path: &Path) -> Result<Self, Error> {
        let json = std::fs::read_to_string(path).map_err(|e| {
            Error::Io(std::io::Error::new(
                e.kind(),
                format!("{}: {}", e, path.display()),
            ))
        })?;
        Self::from_json_str(&json)
    }
}

impl FromIterator<(String, Option<String>)> for AliasTable {
    fn from_iter<I: IntoIterator<Item = (String, Option<String>)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

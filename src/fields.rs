use std::path::Path;

use serde_json::Value;

use crate::error::Error;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FieldValue {
    Present(String),
    Absent,
}

impl FieldValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Present(s) => Some(s),
            FieldValue::Absent => None,
        }
    }

    pub fn is_present(&self) -> bool {
        matches!(self, FieldValue::Present(_))
    }
}

impl From<Option<String>> for FieldValue {
    /// Blank strings carry no information and count as absent.
    fn from(value: Option<String>) -> Self {
        match value {
            Some(s) if !s.trim().is_empty() => FieldValue::Present(s),
            _ => FieldValue::Absent,
        }
    }
}

impl From<Option<&str>> for FieldValue {
    fn from(value: Option<&str>) -> Self {
        value.map(str::to_string).into()
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Some(value).into()
    }
}

/// Extracted fields keyed by snake_case name. Iteration follows insertion order,
/// which for JSON input is the order the keys appear in the source.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FieldDictionary {
    entries: Vec<(String, FieldValue)>,
}

impl FieldDictionary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a field, keeping the position of an existing key.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<FieldValue>) {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.entries.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    /// The value of a field, if the field exists and is present.
    pub fn present(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(FieldValue::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v))
    }

    /// Fields that carry a value.
    pub fn iter_present(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .filter_map(|(n, v)| v.as_str().map(|s| (n.as_str(), s)))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Build from a flat JSON object. Numbers and booleans become text; nulls,
    /// blank strings, arrays and objects are absent.
    pub fn from_json_value(value: &Value) -> Result<Self, Error> {
        let Value::Object(map) = value else {
            return Err(Error::Config(
                "field dictionary must be a JSON object".into(),
            ));
        };
        let mut fields = Self {
            entries: Vec::with_capacity(map.len()),
        };
        for (name, value) in map {
            let value = match value {
                Value::String(s) => Some(s.clone()),
                Value::Number(n) => Some(n.to_string()),
                Value::Bool(b) => Some(b.to_string()),
                Value::Null => None,
                Value::Array(_) | Value::Object(_) => {
                    log::warn!("Field {name:?} is not a scalar; treating it as absent");
                    None
                }
            };
            // Object keys are already unique.
            fields.entries.push((name.clone(), value.into()));
        }
        Ok(fields)
    }

    pub fn from_json_str(json: &str) -> Result<Self, Error> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_json_value(&value)
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

impl<K: Into<String>, V: Into<FieldValue>> FromIterator<(K, V)> for FieldDictionary {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut fields = Self::new();
        for (name, value) in iter {
            fields.insert(name, value);
        }
        fields
    }
}

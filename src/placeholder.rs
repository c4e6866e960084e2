//! Placeholder discovery. A placeholder is written `[NAME]` where `NAME` is one or
//! more of `A-Z`, `0-9` and `_`.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::LazyLock;

use regex::Regex;

use crate::model::Document;

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([A-Z_0-9]+)\]").expect("valid placeholder pattern"));

/// The literal token for a placeholder name, e.g. `DATE_LOSS` -> `[DATE_LOSS]`.
pub fn token(name: &str) -> String {
    format!("[{name}]")
}

pub(crate) fn pattern() -> &'static Regex {
    &PLACEHOLDER
}

/// Placeholder names occurring in one piece of text, in order of appearance.
pub fn find_in(text: &str) -> impl Iterator<Item = &str> {
    PLACEHOLDER
        .captures_iter(text)
        .filter_map(|c| c.get(1))
        .map(|m| m.as_str())
}

/// Every distinct placeholder name in the document, including table cells.
pub fn extract(doc: &Document) -> BTreeSet<String> {
    let mut names = BTreeSet::new();
    for para in doc.paragraphs() {
        let text = para.text();
        names.extend(find_in(&text).map(str::to_string));
    }
    log::info!("Found {} placeholders: {:?}", names.len(), names);
    names
}

/// Every placeholder mapped to an empty value, as a starting point for manual entry.
pub fn mapping_template(placeholders: &BTreeSet<String>) -> BTreeMap<String, String> {
    placeholders
        .iter()
        .map(|name| (name.clone(), String::new()))
        .collect()
}

//! Type-plausibility checks keyed on the shape of a placeholder name.
//!
//! Rules are tried in order and the first whose predicate matches the name decides
//! whether a candidate value is acceptable. New placeholder "types" are added by
//! inserting a row in [`RULES`]; the tiering in the resolver never changes.

use std::sync::LazyLock;

use regex::Regex;

static ZIP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{5}(-\d{4})?$").expect("valid zip pattern"));
static TWO_LETTER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z]{2}$").expect("valid state pattern"));
static DATE_LIKE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+[/-]\d+").expect("valid date pattern"));

const STREET_SUFFIXES: &[&str] = &[
    "st", "street", "ave", "avenue", "road", "rd", "lane", "ln", "drive", "dr",
];

const QUANTITY_TOKENS: &[&str] = &[
    "number", "num", "no", "age", "year", "years", "count", "amount", "pitch", "qty", "total",
];

/// Lowercase form of a name, all alphanumerics kept.
pub fn normalize(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Split into maximal runs of letters or of digits, lowercased.
/// `INSURED_H_ZIP2` -> `["insured", "h", "zip", "2"]`.
pub fn tokenize(name: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut current_is_digit = false;
    for c in name.chars() {
        if c.is_alphabetic() || c.is_ascii_digit() {
            let is_digit = c.is_ascii_digit();
            if !current.is_empty() && is_digit != current_is_digit {
                tokens.push(std::mem::take(&mut current));
            }
            current_is_digit = is_digit;
            current.extend(c.to_lowercase());
        } else if !current.is_empty() {
            tokens.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    tokens
}

/// A placeholder or field name prepared for rule matching.
#[derive(Clone, Debug)]
pub struct NameShape {
    lower: String,
    tokens: Vec<String>,
}

impl NameShape {
    pub fn of(name: &str) -> Self {
        Self {
            lower: name.to_lowercase(),
            tokens: tokenize(name),
        }
    }

    pub fn contains(&self, fragment: &str) -> bool {
        self.lower.contains(fragment)
    }

    pub fn has_token(&self, token: &str) -> bool {
        self.tokens.iter().any(|t| t == token)
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }
}

pub struct Rule {
    pub kind: &'static str,
    applies: fn(&NameShape) -> bool,
    accepts: fn(&str) -> bool,
}

impl Rule {
    pub fn accepts(&self, candidate: &str) -> bool {
        let candidate = candidate.trim();
        !candidate.is_empty() && (self.accepts)(candidate)
    }
}

fn has_letter(s: &str) -> bool {
    s.chars().any(char::is_alphabetic)
}

fn has_digit(s: &str) -> bool {
    s.chars().any(|c| c.is_ascii_digit())
}

fn all_digits(s: &str) -> bool {
    s.chars().all(|c| c.is_ascii_digit())
}

fn wordy(s: &str) -> bool {
    has_letter(s) && !all_digits(s)
}

fn street_like(s: &str) -> bool {
    has_digit(s)
        || tokenize(s)
            .iter()
            .any(|t| STREET_SUFFIXES.contains(&t.as_str()))
}

pub static RULES: &[Rule] = &[
    Rule {
        kind: "zip",
        applies: |n| n.contains("zip"),
        accepts: |v| ZIP.is_match(v),
    },
    Rule {
        kind: "city",
        applies: |n| n.contains("city"),
        accepts: wordy,
    },
    Rule {
        kind: "state",
        applies: |n| n.contains("state"),
        accepts: |v| TWO_LETTER.is_match(v) || has_letter(v),
    },
    Rule {
        kind: "street",
        applies: |n| n.contains("street") || n.has_token("st"),
        accepts: street_like,
    },
    Rule {
        kind: "date",
        applies: |n| n.contains("date"),
        accepts: |v| DATE_LIKE.is_match(v),
    },
    Rule {
        kind: "reference",
        applies: |n| n.contains("policy") || n.contains("claim"),
        accepts: |_| true,
    },
    Rule {
        kind: "name",
        applies: |n| n.contains("insured") || n.contains("name"),
        accepts: wordy,
    },
    Rule {
        kind: "quantity",
        applies: |n| QUANTITY_TOKENS.iter().any(|t| n.has_token(t)),
        accepts: |_| true,
    },
    Rule {
        kind: "text",
        applies: |_| true,
        accepts: |v| !all_digits(v),
    },
];

/// The rule governing a placeholder. The last rule matches every name.
pub fn rule_for(shape: &NameShape) -> &'static Rule {
    RULES
        .iter()
        .find(|rule| (rule.applies)(shape))
        .unwrap_or(&RULES[RULES.len() - 1])
}

//! Placeholder → field resolution.
//!
//! Tiers, first acceptable candidate wins:
//! 1. alias table
//! 2. normalized exact name
//! 3. normalized substring (either direction)
//! 4. best token overlap (identity fields barred from address placeholders)
//! 5. component of a full-address field
//!
//! Every candidate must pass the plausibility rule for the placeholder's name
//! (see [`rules`]); a rejected candidate is skipped, never returned.

pub mod address;
pub mod aliases;
pub mod rules;

use std::collections::{BTreeSet, HashSet};

use crate::fields::FieldDictionary;
use crate::mapping::{Mapping, Resolution, Tier};

use address::{AddressPart, is_address_flavored, is_full_address_field, parse_address};
use aliases::AliasTable;
use rules::{NameShape, Rule, normalize, rule_for, tokenize};

/// Personal identity fields that must not fill address slots by incidental token overlap.
const IDENTITY_FIELDS: &[&str] = &[
    "name",
    "full_name",
    "insured_name",
    "owner_name",
    "policyholder",
    "policyholder_name",
    "adjuster_name",
    "contact_name",
];

#[derive(Clone, Debug)]
pub struct ResolverConfig {
    pub aliases: AliasTable,
    pub identity_fields: Vec<String>,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            aliases: AliasTable::builtin(),
            identity_fields: IDENTITY_FIELDS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl ResolverConfig {
    pub fn with_aliases(mut self, aliases: AliasTable) -> Self {
        self.aliases = aliases;
        self
    }
}

pub struct Resolver {
    aliases: AliasTable,
    identity_fields: HashSet<String>,
}

impl Default for Resolver {
    fn default() -> Self {
        Self::new(ResolverConfig::default())
    }
}

struct Request<'a> {
    placeholder: &'a str,
    shape: NameShape,
    normalized: String,
    rule: &'static Rule,
}

impl Request<'_> {
    fn accepts(&self, tier: Tier, field: &str, value: &str) -> bool {
        let ok = self.rule.accepts(value);
        if !ok {
            log::debug!(
                "[{}] rejected {field:?} = {value:?} at {tier:?}: not a plausible {}",
                self.placeholder,
                self.rule.kind
            );
        }
        ok
    }

    /// The returned value is the trimmed text the rule accepted.
    fn hit(&self, tier: Tier, field: &str, value: &str) -> Resolution {
        Resolution {
            value: value.trim().to_string(),
            field: field.to_string(),
            tier,
        }
    }
}

impl Resolver {
    pub fn new(config: ResolverConfig) -> Self {
        Self {
            aliases: config.aliases,
            identity_fields: config
                .identity_fields
                .iter()
                .map(|f| normalize(f))
                .collect(),
        }
    }

    fn is_identity_field(&self, field: &str) -> bool {
        self.identity_fields.contains(&normalize(field))
    }

    /// Best value for one placeholder, or `None` when no tier yields a plausible one.
    pub fn resolve(&self, placeholder: &str, fields: &FieldDictionary) -> Option<Resolution> {
        let shape = NameShape::of(placeholder);
        let rule = rule_for(&shape);
        let req = Request {
            placeholder,
            normalized: normalize(placeholder),
            shape,
            rule,
        };

        match self.aliases.get(placeholder) {
            Some(None) => {
                log::debug!("[{placeholder}] is aliased to no field; leaving it blank");
                return None;
            }
            Some(Some(field)) => {
                if let Some(value) = fields.present(field) {
                    if req.accepts(Tier::Alias, field, value) {
                        return Some(req.hit(Tier::Alias, field, value));
                    }
                }
            }
            None => {}
        }

        self.exact_name(&req, fields)
            .or_else(|| self.substring(&req, fields))
            .or_else(|| self.token_overlap(&req, fields))
            .or_else(|| self.address_part(&req, fields))
    }

    fn exact_name(&self, req: &Request, fields: &FieldDictionary) -> Option<Resolution> {
        fields
            .iter_present()
            .filter(|(name, _)| normalize(name) == req.normalized)
            .find(|(name, value)| req.accepts(Tier::ExactName, name, value))
            .map(|(name, value)| req.hit(Tier::ExactName, name, value))
    }

    fn substring(&self, req: &Request, fields: &FieldDictionary) -> Option<Resolution> {
        if req.normalized.is_empty() {
            return None;
        }
        fields
            .iter_present()
            .filter(|(name, _)| {
                let field = normalize(name);
                !field.is_empty()
                    && (req.normalized.contains(&field) || field.contains(&req.normalized))
            })
            .find(|(name, value)| req.accepts(Tier::Substring, name, value))
            .map(|(name, value)| req.hit(Tier::Substring, name, value))
    }

    /// Highest shared-token count wins; on a tie the earlier field in dictionary order keeps it.
    fn token_overlap(&self, req: &Request, fields: &FieldDictionary) -> Option<Resolution> {
        let wanted: HashSet<&str> = req.shape.tokens().iter().map(String::as_str).collect();
        let address_slot = is_address_flavored(&req.shape);

        let mut best: Option<(usize, &str, &str)> = None;
        for (name, value) in fields.iter_present() {
            let score = tokenize(name)
                .iter()
                .map(String::as_str)
                .collect::<HashSet<_>>()
                .intersection(&wanted)
                .count();
            if score == 0 || best.is_some_and(|(top, _, _)| score <= top) {
                continue;
            }
            if address_slot && self.is_identity_field(name) {
                log::debug!(
                    "[{}] rejected identity field {name:?} for an address slot",
                    req.placeholder
                );
                continue;
            }
            if !req.accepts(Tier::TokenOverlap, name, value) {
                continue;
            }
            best = Some((score, name, value));
        }
        best.map(|(_, name, value)| req.hit(Tier::TokenOverlap, name, value))
    }

    fn address_part(&self, req: &Request, fields: &FieldDictionary) -> Option<Resolution> {
        let part = AddressPart::of(&req.shape)?;
        fields
            .iter_present()
            .filter(|(name, _)| is_full_address_field(name))
            .find_map(|(name, full)| {
                let parsed = parse_address(full);
                let value = parsed.part(part)?;
                req.accepts(Tier::AddressPart, name, value)
                    .then(|| req.hit(Tier::AddressPart, name, value))
            })
    }

    /// Resolve every placeholder. The result has exactly one entry per placeholder.
    pub fn resolve_all(&self, placeholders: &BTreeSet<String>, fields: &FieldDictionary) -> Mapping {
        let mut mapping = Mapping::new();
        for placeholder in placeholders {
            let resolution = self.resolve(placeholder, fields);
            match &resolution {
                Some(r) => log::info!(
                    "Mapped [{placeholder}] -> {:?} from {} ({:?})",
                    r.value,
                    r.field,
                    r.tier
                ),
                None => log::warn!("No mapping found for [{placeholder}]"),
            }
            mapping.record(placeholder.clone(), resolution);
        }
        mapping
    }
}

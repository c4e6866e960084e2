use std::sync::LazyLock;

use regex::Regex;

use super::rules::NameShape;

/// `IL 62704`, `IL 62704-1234`, or with leading city text: `Springfield IL 62704`.
static STATE_ZIP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:(?P<city>.*\S)\s+)?(?P<state>[A-Za-z]{2})\s+(?P<zip>\d{5}(?:-\d{4})?)$")
        .expect("valid state/zip pattern")
});

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AddressPart {
    Street,
    City,
    State,
    Zip,
}

impl AddressPart {
    /// The address component a placeholder name asks for, if any.
    pub fn of(shape: &NameShape) -> Option<Self> {
        if shape.contains("zip") {
            Some(AddressPart::Zip)
        } else if shape.contains("state") {
            Some(AddressPart::State)
        } else if shape.contains("city") {
            Some(AddressPart::City)
        } else if shape.contains("street") || shape.has_token("st") {
            Some(AddressPart::Street)
        } else {
            None
        }
    }
}

/// Whether a name refers to an address or any part of one.
pub fn is_address_flavored(shape: &NameShape) -> bool {
    AddressPart::of(shape).is_some() || shape.contains("address") || shape.has_token("addr")
}

/// A field holding a whole address rather than one component of it,
/// e.g. `risk_address` or `property_address`.
pub fn is_full_address_field(name: &str) -> bool {
    let shape = NameShape::of(name);
    (shape.contains("address") || shape.has_token("addr")) && AddressPart::of(&shape).is_none()
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ParsedAddress {
    pub street: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
}

impl ParsedAddress {
    pub fn part(&self, part: AddressPart) -> Option<&str> {
        match part {
            AddressPart::Street => self.street.as_deref(),
            AddressPart::City => self.city.as_deref(),
            AddressPart::State => self.state.as_deref(),
            AddressPart::Zip => self.zip.as_deref(),
        }
    }
}

/// Split a one-line or multi-line address. The first segment is the street; a
/// trailing `ST 12345` segment yields state and zip with the segments between
/// forming the city; otherwise the last segment is the city.
pub fn parse_address(full: &str) -> ParsedAddress {
    let joined = full.replace("\r\n", ",").replace('\n', ",");
    let segments: Vec<&str> = joined
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();

    let mut parsed = ParsedAddress::default();
    let Some((street, rest)) = segments.split_first() else {
        return parsed;
    };
    parsed.street = Some(street.to_string());

    let Some((last, middle)) = rest.split_last() else {
        return parsed;
    };
    match STATE_ZIP.captures(last) {
        Some(caps) => {
            parsed.state = caps.name("state").map(|m| m.as_str().to_ascii_uppercase());
            parsed.zip = caps.name("zip").map(|m| m.as_str().to_string());
            let mut city: Vec<&str> = middle.to_vec();
            if let Some(m) = caps.name("city") {
                city.push(m.as_str());
            }
            if !city.is_empty() {
                parsed.city = Some(city.join(", "));
            }
        }
        None => parsed.city = Some(last.to_string()),
    }
    parsed
}

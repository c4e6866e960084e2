use std::collections::HashMap;

use crate::model::DEFAULT_FONT_SIZE;

use super::{WML_NS, wml, wml_attr, wml_bool};

pub(super) struct StyleDefaults {
    pub(super) font_size: f32,
    pub(super) font_name: Option<String>,
    pub(super) bold: bool,
    pub(super) italic: bool,
}

/// Run-level properties a paragraph or character style can set.
#[derive(Clone, Default)]
pub(super) struct TextStyle {
    pub(super) font_size: Option<f32>,
    pub(super) font_name: Option<String>,
    pub(super) bold: Option<bool>,
    pub(super) italic: Option<bool>,
    pub(super) based_on: Option<String>,
}

pub(super) struct StylesInfo {
    pub(super) defaults: StyleDefaults,
    pub(super) default_paragraph_style: String,
    pub(super) paragraph_styles: HashMap<String, TextStyle>,
    pub(super) character_styles: HashMap<String, TextStyle>,
}

impl StylesInfo {
    fn empty() -> Self {
        Self {
            defaults: StyleDefaults {
                font_size: DEFAULT_FONT_SIZE,
                font_name: None,
                bold: false,
                italic: false,
            },
            default_paragraph_style: String::from("Normal"),
            paragraph_styles: HashMap::new(),
            character_styles: HashMap::new(),
        }
    }
}

/// Half-points to points.
pub(super) fn parse_size(rpr: roxmltree::Node) -> Option<f32> {
    wml_attr(rpr, "sz")
        .and_then(|v| v.parse::<f32>().ok())
        .map(|hp| hp / 2.0)
}

pub(super) fn parse_font_name(rpr: roxmltree::Node) -> Option<String> {
    wml(rpr, "rFonts")
        .and_then(|n| {
            n.attribute((WML_NS, "ascii"))
                .or_else(|| n.attribute((WML_NS, "hAnsi")))
        })
        .map(|s| s.to_string())
}

fn parse_text_style(style_node: roxmltree::Node) -> TextStyle {
    let rpr = wml(style_node, "rPr");
    TextStyle {
        font_size: rpr.and_then(parse_size),
        font_name: rpr.and_then(parse_font_name),
        bold: rpr.and_then(|n| wml_bool(n, "b")),
        italic: rpr.and_then(|n| wml_bool(n, "i")),
        based_on: wml_attr(style_node, "basedOn").map(|s| s.to_string()),
    }
}

/// Parse `word/styles.xml`. A missing or unreadable part yields built-in defaults.
pub(super) fn parse_styles(xml_content: Option<&str>) -> StylesInfo {
    let mut info = StylesInfo::empty();

    let Some(xml_content) = xml_content else {
        return info;
    };
    let xml = match roxmltree::Document::parse(xml_content) {
        Ok(xml) => xml,
        Err(e) => {
            log::warn!("Ignoring unreadable styles.xml: {e}");
            return info;
        }
    };

    let root = xml.root_element();

    if let Some(rpr) = wml(root, "docDefaults")
        .and_then(|n| wml(n, "rPrDefault"))
        .and_then(|n| wml(n, "rPr"))
    {
        if let Some(size) = parse_size(rpr) {
            info.defaults.font_size = size;
        }
        info.defaults.font_name = parse_font_name(rpr);
        info.defaults.bold = wml_bool(rpr, "b").unwrap_or(false);
        info.defaults.italic = wml_bool(rpr, "i").unwrap_or(false);
    }

    for style_node in root.children() {
        if style_node.tag_name().name() != "style"
            || style_node.tag_name().namespace() != Some(WML_NS)
        {
            continue;
        }
        let Some(style_id) = style_node.attribute((WML_NS, "styleId")) else {
            continue;
        };
        match style_node.attribute((WML_NS, "type")) {
            Some("paragraph") => {
                let is_default = style_node
                    .attribute((WML_NS, "default"))
                    .is_some_and(|v| v == "1" || v == "true");
                if is_default {
                    info.default_paragraph_style = style_id.to_string();
                }
                info.paragraph_styles
                    .insert(style_id.to_string(), parse_text_style(style_node));
            }
            Some("character") => {
                info.character_styles
                    .insert(style_id.to_string(), parse_text_style(style_node));
            }
            _ => {}
        }
    }

    resolve_based_on(&mut info.paragraph_styles);
    resolve_based_on(&mut info.character_styles);
    info
}

fn resolve_based_on(styles: &mut HashMap<String, TextStyle>) {
    let ids: Vec<String> = styles.keys().cloned().collect();
    for id in ids {
        let mut chain: Vec<String> = Vec::new();
        let mut current = id.clone();
        loop {
            if chain.contains(&current) {
                break;
            }
            chain.push(current.clone());
            match styles.get(&current).and_then(|s| s.based_on.clone()) {
                Some(parent) => current = parent,
                None => break,
            }
        }

        // Furthest ancestor first; each closer one overrides.
        let mut inh = TextStyle::default();
        for ancestor_id in chain.iter().rev() {
            if let Some(s) = styles.get(ancestor_id) {
                if s.font_size.is_some() {
                    inh.font_size = s.font_size;
                }
                if s.font_name.is_some() {
                    inh.font_name = s.font_name.clone();
                }
                if s.bold.is_some() {
                    inh.bold = s.bold;
                }
                if s.italic.is_some() {
                    inh.italic = s.italic;
                }
            }
        }

        if let Some(s) = styles.get_mut(&id) {
            s.font_size = s.font_size.or(inh.font_size);
            s.font_name = s.font_name.take().or(inh.font_name);
            s.bold = s.bold.or(inh.bold);
            s.italic = s.italic.or(inh.italic);
        }
    }
}

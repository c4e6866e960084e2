mod styles;
mod write;

use std::io::{Cursor, Read, Seek};
use std::path::Path;
use std::sync::Arc;

use crate::error::Error;
use crate::model::{Block, Document, Origin, Paragraph, Run, Table, TableCell, TableRow};

use styles::{StylesInfo, parse_font_name, parse_size, parse_styles};

pub use write::{to_bytes, write};

pub(crate) const WML_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";

const DOCUMENT_PART: &str = "word/document.xml";
const STYLES_PART: &str = "word/styles.xml";

/// The source DOCX package a document was loaded from. Immutable once loaded;
/// filled copies share it and only `word/document.xml` is regenerated on write.
#[derive(Debug)]
pub(crate) struct Package {
    pub(crate) entries: Vec<(String, Vec<u8>)>,
    pub(crate) document_xml: String,
    /// `None` when the document binds WML to the default namespace.
    pub(crate) wml_prefix: Option<String>,
}

/// Parse a WML boolean toggle element (e.g., w:b, w:i).
/// Present with no val or val != "0"/"false" means true.
pub(super) fn wml_bool(parent: roxmltree::Node, name: &str) -> Option<bool> {
    wml(parent, name).map(|n| {
        n.attribute((WML_NS, "val"))
            .is_none_or(|v| v != "0" && v != "false")
    })
}

pub(super) fn wml<'a>(node: roxmltree::Node<'a, 'a>, name: &str) -> Option<roxmltree::Node<'a, 'a>> {
    node.children().find(|n| is_wml(*n, name))
}

pub(super) fn wml_attr<'a>(node: roxmltree::Node<'a, 'a>, child: &str) -> Option<&'a str> {
    wml(node, child).and_then(|n| n.attribute((WML_NS, "val")))
}

fn is_wml(node: roxmltree::Node, name: &str) -> bool {
    node.tag_name().name() == name && node.tag_name().namespace() == Some(WML_NS)
}

/// Flatten SDT wrappers: descend into w:sdtContent and collect effective children.
fn collect_block_nodes<'a>(parent: roxmltree::Node<'a, 'a>) -> Vec<roxmltree::Node<'a, 'a>> {
    let mut nodes = Vec::new();
    for child in parent.children() {
        if is_wml(child, "sdt") {
            if let Some(content) = wml(child, "sdtContent") {
                nodes.extend(collect_block_nodes(content));
            }
        } else {
            nodes.push(child);
        }
    }
    nodes
}

/// Runs directly in the paragraph plus those nested in hyperlinks, inline content
/// controls, simple fields and tracked insertions. Deleted text is skipped.
fn collect_run_nodes<'a>(parent: roxmltree::Node<'a, 'a>, out: &mut Vec<roxmltree::Node<'a, 'a>>) {
    for child in parent.children() {
        if child.tag_name().namespace() != Some(WML_NS) {
            continue;
        }
        match child.tag_name().name() {
            "r" => out.push(child),
            "hyperlink" | "fldSimple" | "ins" | "smartTag" => collect_run_nodes(child, out),
            "sdt" => {
                if let Some(content) = wml(child, "sdtContent") {
                    collect_run_nodes(content, out);
                }
            }
            _ => {}
        }
    }
}

fn run_text(run_node: roxmltree::Node) -> String {
    let mut text = String::new();
    for child in run_node.children() {
        if child.tag_name().namespace() != Some(WML_NS) {
            continue;
        }
        match child.tag_name().name() {
            "t" => text.push_str(child.text().unwrap_or("")),
            "tab" => text.push('\t'),
            "br" | "cr" => text.push('\n'),
            "noBreakHyphen" => text.push('-'),
            _ => {}
        }
    }
    text
}

fn parse_paragraph(para_node: roxmltree::Node, xml: &str, styles: &StylesInfo) -> Paragraph {
    let ppr = wml(para_node, "pPr");
    let para_style = ppr
        .and_then(|ppr| wml_attr(ppr, "pStyle"))
        .and_then(|id| styles.paragraph_styles.get(id))
        .or_else(|| styles.paragraph_styles.get(&styles.default_paragraph_style));

    let style_font_size = para_style
        .and_then(|s| s.font_size)
        .unwrap_or(styles.defaults.font_size);
    let style_font_name = para_style
        .and_then(|s| s.font_name.clone())
        .or_else(|| styles.defaults.font_name.clone());
    let style_bold = para_style
        .and_then(|s| s.bold)
        .unwrap_or(styles.defaults.bold);
    let style_italic = para_style
        .and_then(|s| s.italic)
        .unwrap_or(styles.defaults.italic);

    let mut run_nodes = Vec::new();
    collect_run_nodes(para_node, &mut run_nodes);

    let mut runs = Vec::new();
    for run_node in run_nodes {
        let text = run_text(run_node);
        if text.is_empty() {
            continue;
        }
        let rpr = wml(run_node, "rPr");
        let char_style = rpr
            .and_then(|n| wml_attr(n, "rStyle"))
            .and_then(|id| styles.character_styles.get(id));

        let font_size = rpr
            .and_then(parse_size)
            .or_else(|| char_style.and_then(|cs| cs.font_size))
            .unwrap_or(style_font_size);
        let font_name = rpr
            .and_then(parse_font_name)
            .or_else(|| char_style.and_then(|cs| cs.font_name.clone()))
            .or_else(|| style_font_name.clone());
        let bold = rpr
            .and_then(|n| wml_bool(n, "b"))
            .or_else(|| char_style.and_then(|cs| cs.bold))
            .unwrap_or(style_bold);
        let italic = rpr
            .and_then(|n| wml_bool(n, "i"))
            .or_else(|| char_style.and_then(|cs| cs.italic))
            .unwrap_or(style_italic);

        runs.push(Run {
            text,
            font_size,
            font_name,
            bold,
            italic,
        });
    }

    Paragraph {
        runs,
        origin: Some(Origin {
            span: para_node.range(),
            properties: ppr.map(|n| xml[n.range()].to_string()),
        }),
        rewritten: false,
    }
}

fn parse_table(tbl_node: roxmltree::Node, xml: &str, styles: &StylesInfo) -> Table {
    let rows = collect_block_nodes(tbl_node)
        .into_iter()
        .filter(|n| is_wml(*n, "tr"))
        .map(|tr| TableRow {
            cells: collect_block_nodes(tr)
                .into_iter()
                .filter(|n| is_wml(*n, "tc"))
                .map(|tc| TableCell {
                    paragraphs: collect_block_nodes(tc)
                        .into_iter()
                        .filter(|n| is_wml(*n, "p"))
                        .map(|p| parse_paragraph(p, xml, styles))
                        .collect(),
                })
                .collect(),
        })
        .collect();
    Table { rows }
}

fn parse_body(
    xml_content: &str,
    styles: &StylesInfo,
) -> Result<(Vec<Block>, Option<String>), Error> {
    let xml = roxmltree::Document::parse(xml_content)?;
    let root = xml.root_element();
    let body = wml(root, "body").ok_or_else(|| Error::InvalidDocx("missing w:body".into()))?;

    let wml_prefix = root
        .lookup_prefix(WML_NS)
        .filter(|p| !p.is_empty())
        .map(String::from);

    let mut blocks = Vec::new();
    for node in collect_block_nodes(body) {
        if node.tag_name().namespace() != Some(WML_NS) {
            continue;
        }
        match node.tag_name().name() {
            "p" => blocks.push(Block::Paragraph(parse_paragraph(node, xml_content, styles))),
            "tbl" => blocks.push(Block::Table(parse_table(node, xml_content, styles))),
            _ => {}
        }
    }
    Ok((blocks, wml_prefix))
}

fn read_entries<R: Read + Seek>(
    zip: &mut zip::ZipArchive<R>,
) -> Result<Vec<(String, Vec<u8>)>, Error> {
    let mut entries = Vec::with_capacity(zip.len());
    for i in 0..zip.len() {
        let mut file = zip.by_index(i)?;
        if file.is_dir() {
            continue;
        }
        let mut data = Vec::new();
        file.read_to_end(&mut data)?;
        entries.push((file.name().to_string(), data));
    }
    Ok(entries)
}

fn entry_text<'a>(entries: &'a [(String, Vec<u8>)], name: &str) -> Option<&'a [u8]> {
    entries
        .iter()
        .find(|(n, _)| n == name)
        .map(|(_, data)| data.as_slice())
}

fn parse_archive<R: Read + Seek>(reader: R) -> Result<Document, Error> {
    let mut zip = zip::ZipArchive::new(reader)
        .map_err(|_| Error::InvalidDocx("file is not a ZIP archive".into()))?;
    let entries = read_entries(&mut zip)?;

    let document_xml = entry_text(&entries, DOCUMENT_PART)
        .ok_or_else(|| {
            Error::InvalidDocx("missing word/document.xml (is this a DOCX file?)".into())
        })
        .and_then(|bytes| {
            String::from_utf8(bytes.to_vec())
                .map_err(|_| Error::InvalidDocx("word/document.xml is not UTF-8".into()))
        })?;

    let styles_xml = entry_text(&entries, STYLES_PART).map(String::from_utf8_lossy);
    let styles = parse_styles(styles_xml.as_deref());

    let (blocks, wml_prefix) = parse_body(&document_xml, &styles)?;
    log::debug!(
        "Parsed {} blocks from {} package entries",
        blocks.len(),
        entries.len()
    );

    Ok(Document {
        blocks,
        package: Some(Arc::new(Package {
            entries,
            document_xml,
            wml_prefix,
        })),
    })
}

pub fn parse(path: &Path) -> Result<Document, Error> {
    let file = std::fs::File::open(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound | std::io::ErrorKind::PermissionDenied => Error::Io(
            std::io::Error::new(e.kind(), format!("{}: {}", e, path.display())),
        ),
        _ => Error::Io(e),
    })?;
    parse_archive(file)
}

pub fn parse_bytes(input: &[u8]) -> Result<Document, Error> {
    parse_archive(Cursor::new(input))
}

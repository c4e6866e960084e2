use std::io::{Cursor, Write};
use std::path::Path;

use zip::write::SimpleFileOptions;

use crate::error::Error;
use crate::model::{Block, Document, Paragraph, Run, Table};

use super::{DOCUMENT_PART, Package, WML_NS};

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/></Types>"#;

const ROOT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/></Relationships>"#;

/// Characters XML 1.0 cannot carry at all, even escaped.
fn is_xml_char(c: char) -> bool {
    matches!(c, '\t' | '\n' | '\r')
        || matches!(c, '\u{20}'..='\u{D7FF}' | '\u{E000}'..='\u{FFFD}' | '\u{10000}'..='\u{10FFFF}')
}

fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            c if !is_xml_char(c) => {}
            _ => out.push(c),
        }
    }
    out
}

fn write_run(out: &mut String, w: &str, run: &Run) {
    out.push_str(&format!("<{w}:r><{w}:rPr>"));
    if let Some(font) = &run.font_name {
        let font = escape_xml(font);
        out.push_str(&format!(r#"<{w}:rFonts {w}:ascii="{font}" {w}:hAnsi="{font}"/>"#));
    }
    if run.bold {
        out.push_str(&format!("<{w}:b/>"));
    } else {
        out.push_str(&format!(r#"<{w}:b {w}:val="0"/>"#));
    }
    if run.italic {
        out.push_str(&format!("<{w}:i/>"));
    }
    let half_points = (run.font_size * 2.0).round() as u32;
    out.push_str(&format!(r#"<{w}:sz {w}:val="{half_points}"/>"#));
    out.push_str(&format!("</{w}:rPr>"));

    // Tabs and line breaks are elements in WML, not characters.
    let mut segment = String::new();
    let flush = |out: &mut String, segment: &mut String| {
        if !segment.is_empty() {
            out.push_str(&format!(
                r#"<{w}:t xml:space="preserve">{}</{w}:t>"#,
                escape_xml(segment)
            ));
            segment.clear();
        }
    };
    let mut chars = run.text.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\t' => {
                flush(out, &mut segment);
                out.push_str(&format!("<{w}:tab/>"));
            }
            '\r' | '\n' => {
                if c == '\r' {
                    chars.next_if_eq(&'\n');
                }
                flush(out, &mut segment);
                out.push_str(&format!("<{w}:br/>"));
            }
            _ => segment.push(c),
        }
    }
    flush(out, &mut segment);
    out.push_str(&format!("</{w}:r>"));
}

fn paragraph_xml(w: &str, para: &Paragraph) -> String {
    let mut out = format!("<{w}:p>");
    if let Some(props) = para.origin.as_ref().and_then(|o| o.properties.as_deref()) {
        out.push_str(props);
    }
    for run in &para.runs {
        write_run(&mut out, w, run);
    }
    out.push_str(&format!("</{w}:p>"));
    out
}

fn table_xml(w: &str, table: &Table) -> String {
    let columns = table.rows.iter().map(|r| r.cells.len()).max().unwrap_or(0);
    let mut out = format!(
        r#"<{w}:tbl><{w}:tblPr><{w}:tblW {w}:w="0" {w}:type="auto"/></{w}:tblPr><{w}:tblGrid>"#
    );
    for _ in 0..columns {
        out.push_str(&format!("<{w}:gridCol/>"));
    }
    out.push_str(&format!("</{w}:tblGrid>"));
    for row in &table.rows {
        out.push_str(&format!("<{w}:tr>"));
        for cell in &row.cells {
            out.push_str(&format!(
                r#"<{w}:tc><{w}:tcPr><{w}:tcW {w}:w="0" {w}:type="auto"/></{w}:tcPr>"#
            ));
            if cell.paragraphs.is_empty() {
                // Every cell needs at least one paragraph.
                out.push_str(&format!("<{w}:p/>"));
            }
            for para in &cell.paragraphs {
                out.push_str(&paragraph_xml(w, para));
            }
            out.push_str(&format!("</{w}:tc>"));
        }
        out.push_str(&format!("</{w}:tr>"));
    }
    out.push_str(&format!("</{w}:tbl>"));
    out
}

/// Serialize a document that has no source package.
fn fresh_document_xml(doc: &Document) -> String {
    let w = "w";
    let mut out = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<{w}:document xmlns:{w}="{WML_NS}"><{w}:body>"#
    );
    for block in &doc.blocks {
        match block {
            Block::Paragraph(p) => out.push_str(&paragraph_xml(w, p)),
            Block::Table(t) => out.push_str(&table_xml(w, t)),
        }
    }
    out.push_str(&format!("</{w}:body></{w}:document>"));
    out
}

/// Re-emit only the rewritten paragraphs, leaving every other byte of the source intact.
fn spliced_document_xml(doc: &Document, package: &Package) -> String {
    let w = package.wml_prefix.as_deref().unwrap_or("w");
    let mut edits: Vec<(std::ops::Range<usize>, String)> = Vec::new();
    let mut orphaned = 0usize;
    for para in doc.paragraphs().filter(|p| p.rewritten) {
        let Some(origin) = &para.origin else {
            orphaned += 1;
            continue;
        };
        let mut xml = paragraph_xml(w, para);
        if package.wml_prefix.is_none() {
            // The source never declared a prefix; bind ours on the paragraph itself.
            xml = xml.replacen(&format!("<{w}:p>"), &format!(r#"<{w}:p xmlns:{w}="{WML_NS}">"#), 1);
        }
        edits.push((origin.span.clone(), xml));
    }
    if orphaned > 0 {
        log::warn!("{orphaned} rewritten paragraphs have no source position and were not written");
    }
    edits.sort_by_key(|(span, _)| span.start);

    let source = package.document_xml.as_str();
    let mut out = String::with_capacity(source.len());
    let mut cursor = 0;
    for (span, xml) in edits {
        if span.start < cursor || span.end > source.len() {
            log::warn!("Skipping overlapping paragraph edit at byte {}", span.start);
            continue;
        }
        out.push_str(&source[cursor..span.start]);
        out.push_str(&xml);
        cursor = span.end;
    }
    out.push_str(&source[cursor..]);
    out
}

fn zip_entries<'a>(
    entries: impl Iterator<Item = (&'a str, &'a [u8])>,
) -> Result<Vec<u8>, Error> {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let options =
        SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);
    for (name, data) in entries {
        writer.start_file(name, options)?;
        writer.write_all(data)?;
    }
    Ok(writer.finish()?.into_inner())
}

/// Serialize a document as DOCX bytes. Documents loaded from a package keep every
/// other part of that package unchanged.
pub fn to_bytes(doc: &Document) -> Result<Vec<u8>, Error> {
    match &doc.package {
        Some(package) => {
            let document_xml = spliced_document_xml(doc, package);
            zip_entries(package.entries.iter().map(|(name, data)| {
                if name == DOCUMENT_PART {
                    (name.as_str(), document_xml.as_bytes())
                } else {
                    (name.as_str(), data.as_slice())
                }
            }))
        }
        None => {
            let document_xml = fresh_document_xml(doc);
            zip_entries(
                [
                    ("[Content_Types].xml", CONTENT_TYPES.as_bytes()),
                    ("_rels/.rels", ROOT_RELS.as_bytes()),
                    (DOCUMENT_PART, document_xml.as_bytes()),
                ]
                .into_iter(),
            )
        }
    }
}

pub fn write(doc: &Document, path: &Path) -> Result<(), Error> {
    let bytes = to_bytes(doc)?;
    std::fs::write(path, &bytes).map_err(|e| {
        Error::Io(std::io::Error::new(
            e.kind(),
            format!("{}: {}", e, path.display()),
        ))
    })?;
    log::info!("Wrote {} ({} bytes)", path.display(), bytes.len());
    Ok(())
}

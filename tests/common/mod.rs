#![allow(dead_code)]

use std::io::{Cursor, Read, Write};

use formfill::{Block, Document, Paragraph, Run, Table, TableCell, TableRow};

pub const W: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/></Types>"#;

const ROOT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/></Relationships>"#;

/// An extra part that must survive a fill untouched.
pub const MEDIA_PART: &str = "word/media/logo.bin";
pub const MEDIA_BYTES: &[u8] = &[0x89, 0x50, 0x4e, 0x47, 0x00, 0xff];

pub fn document_xml(body: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="{W}"><w:body>{body}<w:sectPr/></w:body></w:document>"#
    )
}

pub fn styles_xml(inner: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:styles xmlns:w="{W}">{inner}</w:styles>"#
    )
}

/// `<w:p>` with one plain run.
pub fn p(text: &str) -> String {
    format!(r#"<w:p><w:r><w:t xml:space="preserve">{text}</w:t></w:r></w:p>"#)
}

/// `<w:p>` with one bold run of the given size in points.
pub fn p_bold(text: &str, size_pt: u32) -> String {
    format!(
        r#"<w:p><w:r><w:rPr><w:b/><w:sz w:val="{}"/></w:rPr><w:t xml:space="preserve">{text}</w:t></w:r></w:p>"#,
        size_pt * 2
    )
}

/// One-row table, one paragraph per cell.
pub fn table(cells: &[&str]) -> String {
    let cells: String = cells
        .iter()
        .map(|c| format!("<w:tc><w:tcPr/>{}</w:tc>", p(c)))
        .collect();
    format!("<w:tbl><w:tblPr/><w:tblGrid/><w:tr>{cells}</w:tr></w:tbl>")
}

pub fn docx_bytes(body: &str, styles: Option<&str>) -> Vec<u8> {
    let mut parts: Vec<(&str, Vec<u8>)> = vec![
        ("[Content_Types].xml", CONTENT_TYPES.as_bytes().to_vec()),
        ("_rels/.rels", ROOT_RELS.as_bytes().to_vec()),
        ("word/document.xml", document_xml(body).into_bytes()),
        (MEDIA_PART, MEDIA_BYTES.to_vec()),
    ];
    if let Some(styles) = styles {
        parts.push(("word/styles.xml", styles_xml(styles).into_bytes()));
    }
    zip_parts(&parts)
}

pub fn zip_parts(parts: &[(&str, Vec<u8>)]) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let options = zip::write::SimpleFileOptions::default();
    for (name, data) in parts {
        writer.start_file(*name, options).unwrap();
        writer.write_all(data).unwrap();
    }
    writer.finish().unwrap().into_inner()
}

pub fn read_part(docx: &[u8], name: &str) -> Option<Vec<u8>> {
    let mut zip = zip::ZipArchive::new(Cursor::new(docx)).unwrap();
    let mut file = zip.by_name(name).ok()?;
    let mut data = Vec::new();
    file.read_to_end(&mut data).unwrap();
    Some(data)
}

pub fn read_part_text(docx: &[u8], name: &str) -> Option<String> {
    read_part(docx, name).map(|d| String::from_utf8(d).unwrap())
}

pub fn para(text: &str) -> Block {
    Block::Paragraph(Paragraph::new(vec![Run::new(text)]))
}

pub fn cell_table(rows: &[&[&str]]) -> Block {
    Block::Table(Table {
        rows: rows
            .iter()
            .map(|cells| TableRow {
                cells: cells
                    .iter()
                    .map(|text| TableCell {
                        paragraphs: vec![Paragraph::new(vec![Run::new(*text)])],
                    })
                    .collect(),
            })
            .collect(),
    })
}

/// A small claim form touching body paragraphs and table cells.
pub fn claim_form() -> Document {
    Document::new(vec![
        para("Insured: [INSURED_NAME]"),
        para("Policy #: [POLICY_NUMBER]   Claim #: [CLAIM_NUMBER]"),
        cell_table(&[
            &["Date of loss", "[DATE_LOSS]"],
            &["Type of loss", "[TOL_CODE]"],
            &["Received", "[DATE_RECEIVED]"],
        ]),
        para("Address: [INSURED_H_STREET], [INSURED_H_CITY], [INSURED_H_STATE] [INSURED_H_ZIP]"),
        para("No placeholders here."),
    ])
}

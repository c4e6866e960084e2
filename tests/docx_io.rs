mod common;

use common::*;
use formfill::{Block, Document, Error, Mapping, Paragraph, Run, docx, fill};

fn texts(doc: &Document) -> Vec<String> {
    doc.paragraphs().map(Paragraph::text).collect()
}

#[test]
fn parses_paragraphs_and_table_cells_in_layout_order() {
    let body = format!(
        "{}{}{}",
        p("Insured: [INSURED_NAME]"),
        table(&["Date of loss", "[DATE_LOSS]"]),
        p("Closing line")
    );
    let doc = docx::parse_bytes(&docx_bytes(&body, None)).unwrap();

    assert_eq!(doc.blocks.len(), 3);
    assert!(matches!(doc.blocks[1], Block::Table(_)));
    assert_eq!(
        texts(&doc),
        ["Insured: [INSURED_NAME]", "Date of loss", "[DATE_LOSS]", "Closing line"]
    );
    assert!(doc.has_source_package());
}

#[test]
fn placeholder_split_across_runs_is_joined() {
    let body = r#"<w:p><w:r><w:t>Policy: [POLICY_</w:t></w:r><w:r><w:rPr><w:i/></w:rPr><w:t>NUMBER]</w:t></w:r></w:p>"#;
    let doc = docx::parse_bytes(&docx_bytes(body, None)).unwrap();
    let para = doc.paragraphs().next().unwrap();
    assert_eq!(para.runs.len(), 2);
    assert_eq!(para.text(), "Policy: [POLICY_NUMBER]");
    assert!(para.runs[1].italic);
}

#[test]
fn hyperlinks_content_controls_tabs_and_breaks_contribute_text() {
    let body = concat!(
        r#"<w:sdt><w:sdtContent><w:p>"#,
        r#"<w:r><w:t>A</w:t><w:tab/><w:t>B</w:t><w:br/><w:t>C</w:t></w:r>"#,
        r#"<w:hyperlink><w:r><w:t> link</w:t></w:r></w:hyperlink>"#,
        r#"<w:del><w:r><w:delText>gone</w:delText></w:r></w:del>"#,
        r#"</w:p></w:sdtContent></w:sdt>"#
    );
    let doc = docx::parse_bytes(&docx_bytes(body, None)).unwrap();
    assert_eq!(texts(&doc), ["A\tB\nC link"]);
}

#[test]
fn run_formatting_resolves_through_styles() {
    let styles = concat!(
        r#"<w:docDefaults><w:rPrDefault><w:rPr><w:sz w:val="22"/></w:rPr></w:rPrDefault></w:docDefaults>"#,
        r#"<w:style w:type="paragraph" w:default="1" w:styleId="Normal"><w:name w:val="Normal"/></w:style>"#,
        r#"<w:style w:type="paragraph" w:styleId="Base"><w:rPr><w:b/><w:sz w:val="28"/></w:rPr></w:style>"#,
        r#"<w:style w:type="paragraph" w:styleId="Heading"><w:basedOn w:val="Base"/><w:rPr><w:sz w:val="32"/></w:rPr></w:style>"#,
        r#"<w:style w:type="character" w:styleId="Quiet"><w:rPr><w:b w:val="0"/></w:rPr></w:style>"#,
    );
    let body = concat!(
        r#"<w:p><w:r><w:t>plain</w:t></w:r></w:p>"#,
        r#"<w:p><w:pPr><w:pStyle w:val="Heading"/></w:pPr><w:r><w:t>heading</w:t></w:r></w:p>"#,
        r#"<w:p><w:pPr><w:pStyle w:val="Heading"/></w:pPr><w:r><w:rPr><w:rStyle w:val="Quiet"/></w:rPr><w:t>quiet</w:t></w:r></w:p>"#,
        r#"<w:p><w:r><w:rPr><w:b/><w:sz w:val="24"/><w:rFonts w:ascii="Arial"/></w:rPr><w:t>direct</w:t></w:r></w:p>"#,
    );
    let doc = docx::parse_bytes(&docx_bytes(body, Some(styles))).unwrap();
    let runs: Vec<&Run> = doc.paragraphs().map(|p| &p.runs[0]).collect();

    assert_eq!((runs[0].font_size, runs[0].bold), (11.0, false));
    assert_eq!((runs[1].font_size, runs[1].bold), (16.0, true));
    assert_eq!((runs[2].font_size, runs[2].bold), (16.0, false));
    assert_eq!((runs[3].font_size, runs[3].bold), (12.0, true));
    assert_eq!(runs[3].font_name.as_deref(), Some("Arial"));
}

#[test]
fn rejects_non_zip_input() {
    let err = docx::parse_bytes(b"definitely not a zip").unwrap_err();
    assert!(matches!(err, Error::InvalidDocx(_)), "{err}");
}

#[test]
fn rejects_package_without_main_document() {
    let bytes = zip_parts(&[("word/styles.xml", styles_xml("").into_bytes())]);
    let err = docx::parse_bytes(&bytes).unwrap_err();
    assert!(matches!(err, Error::InvalidDocx(_)), "{err}");
}

#[test]
fn rejects_malformed_document_xml() {
    let bytes = zip_parts(&[("word/document.xml", b"<w:document><w:body>".to_vec())]);
    let err = docx::parse_bytes(&bytes).unwrap_err();
    assert!(matches!(err, Error::Xml(_)), "{err}");
}

#[test]
fn missing_file_reports_path() {
    let err = docx::parse(std::path::Path::new("does/not/exist.docx")).unwrap_err();
    assert!(matches!(err, Error::Io(_)));
    assert!(err.to_string().contains("exist.docx"));
}

#[test]
fn writing_a_filled_package_only_touches_rewritten_paragraphs() {
    let untouched = r#"<w:p w:rsidR="00A1B2C3"><w:pPr><w:jc w:val="center"/></w:pPr><w:r><w:t>Keep me &amp; my markup</w:t></w:r></w:p>"#;
    let filled_src = r#"<w:p><w:pPr><w:jc w:val="right"/></w:pPr><w:r><w:rPr><w:b/><w:sz w:val="24"/></w:rPr><w:t>Insured: [INSURED_NAME]</w:t></w:r></w:p>"#;
    let template = docx::parse_bytes(&docx_bytes(&format!("{untouched}{filled_src}"), None)).unwrap();

    let mapping: Mapping = [("INSURED_NAME", "Jane <Doe> & Co")].into_iter().collect();
    let filled = fill(&template, &mapping);
    let bytes = docx::to_bytes(&filled.document).unwrap();

    let xml = read_part_text(&bytes, "word/document.xml").unwrap();
    roxmltree::Document::parse(&xml).expect("spliced document.xml is well-formed");
    assert!(xml.contains(untouched));
    assert!(!xml.contains("[INSURED_NAME]"));
    assert!(xml.contains(r#"<w:jc w:val="right"/>"#));
    assert_eq!(read_part(&bytes, MEDIA_PART).unwrap(), MEDIA_BYTES);

    let reread = docx::parse_bytes(&bytes).unwrap();
    assert_eq!(texts(&reread), ["Keep me & my markup", "Insured: Jane <Doe> & Co"]);
    let run = &reread.paragraphs().nth(1).unwrap().runs[0];
    assert!(run.bold);
    assert_eq!(run.font_size, 12.0);
}

#[test]
fn unfilled_package_round_trips_document_xml_byte_for_byte() {
    let bytes = docx_bytes(&format!("{}{}", p("[A]"), table(&["x", "[B]"])), None);
    let doc = docx::parse_bytes(&bytes).unwrap();
    let written = docx::to_bytes(&doc).unwrap();
    assert_eq!(
        read_part(&written, "word/document.xml"),
        read_part(&bytes, "word/document.xml")
    );
}

#[test]
fn in_memory_document_writes_a_fresh_package() {
    let doc = Document::new(vec![
        Block::Paragraph(Paragraph::new(vec![
            Run::new("Title\twith tab").with_bold(true).with_size(14.0),
        ])),
        cell_table(&[&["a", "b"], &["c", ""]]),
    ]);
    let bytes = docx::to_bytes(&doc).unwrap();
    assert!(read_part(&bytes, "[Content_Types].xml").is_some());
    assert!(read_part(&bytes, "_rels/.rels").is_some());

    let reread = docx::parse_bytes(&bytes).unwrap();
    assert_eq!(texts(&reread), ["Title\twith tab", "a", "b", "c", ""]);
    let title = &reread.paragraphs().next().unwrap().runs[0];
    assert!(title.bold);
    assert_eq!(title.font_size, 14.0);
}

#[test]
fn write_and_parse_through_the_filesystem() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.docx");
    let doc = Document::new(vec![para("Saved [NAME]")]);
    docx::write(&doc, &path).unwrap();
    let reread = docx::parse(&path).unwrap();
    assert_eq!(reread.plain_text(), "Saved [NAME]");
}

#[test]
fn default_namespace_documents_are_filled_in_place() {
    let xml = format!(
        r#"<?xml version="1.0" encoding="UTF-8"?><document xmlns="{W}"><body><p><pPr><jc val="center"/></pPr><r><t>Dear [NAME]</t></r></p><p><r><t>static</t></r></p></body></document>"#
    );
    let bytes = zip_parts(&[("word/document.xml", xml.into_bytes())]);
    let template = docx::parse_bytes(&bytes).unwrap();

    let mapping: Mapping = [("NAME", "Ann")].into_iter().collect();
    let written = docx::to_bytes(&fill(&template, &mapping).document).unwrap();

    let xml = read_part_text(&written, "word/document.xml").unwrap();
    roxmltree::Document::parse(&xml).expect("spliced document.xml is well-formed");
    assert!(xml.contains(&format!(r#"<w:p xmlns:w="{W}"><pPr><jc val="center"/></pPr>"#)));
    assert!(xml.contains("<p><r><t>static</t></r></p>"));
    assert_eq!(texts(&docx::parse_bytes(&written).unwrap()), ["Dear Ann", "static"]);
}

#[test]
fn control_characters_in_values_do_not_break_the_package() {
    let template = docx::parse_bytes(&docx_bytes(&p("Notes: [NOTES]"), None)).unwrap();
    let mapping: Mapping = [("NOTES", "hail\u{0b}damage\u{1}\r\nroof\rgutters")]
        .into_iter()
        .collect();
    let bytes = docx::to_bytes(&fill(&template, &mapping).document).unwrap();

    let xml = read_part_text(&bytes, "word/document.xml").unwrap();
    roxmltree::Document::parse(&xml).expect("filled document.xml is well-formed");
    let reread = docx::parse_bytes(&bytes).unwrap();
    assert_eq!(texts(&reread), ["Notes: haildamage\nroof\ngutters"]);

    let fresh = Document::new(vec![para("bell\u{7} and\u{0} nul")]);
    let reread = docx::parse_bytes(&docx::to_bytes(&fresh).unwrap()).unwrap();
    assert_eq!(reread.plain_text(), "bell and nul");
}

#![allow(dead_code)]

use std::io::{Cursor, Write};

use zip::write::SimpleFileOptions;
use zip::ZipWriter;

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/><Override PartName="/word/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml"/></Types>"#;

const RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/></Relationships>"#;

pub const STYLES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:styles xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:style w:type="paragraph" w:styleId="Heading1"><w:name w:val="heading 1"/></w:style><w:style w:type="paragraph" w:styleId="ListNumber"><w:name w:val="List Number"/></w:style></w:styles>"#;

const SECT_PR: &str = r#"<w:sectPr><w:pgSz w:w="12240" w:h="15840"/><w:pgMar w:top="1440" w:right="1440" w:bottom="1440" w:left="1440"/></w:sectPr>"#;

/// A body-level paragraph for a fixture document.
pub enum Block<'a> {
    Plain(&'a str),
    Styled(&'a str, &'a str),
    /// Text split over several runs, the first one bold.
    Runs(&'a [&'a str]),
    Blank,
    /// A one-cell table; its text must never surface as a clause.
    Table(&'a str),
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn render(block: &Block) -> String {
    match block {
        Block::Plain(text) => format!(
            r#"<w:p><w:r><w:t xml:space="preserve">{}</w:t></w:r></w:p>"#,
            escape(text)
        ),
        Block::Styled(style, text) => format!(
            r#"<w:p><w:pPr><w:pStyle w:val="{}"/></w:pPr><w:r><w:t>{}</w:t></w:r></w:p>"#,
            style,
            escape(text)
        ),
        Block::Runs(parts) => {
            let mut xml = String::from("<w:p>");
            for (idx, part) in parts.iter().enumerate() {
                if idx == 0 {
                    xml.push_str("<w:r><w:rPr><w:b/></w:rPr>");
                } else {
                    xml.push_str("<w:r>");
                }
                xml.push_str(&format!(
                    r#"<w:t xml:space="preserve">{}</w:t></w:r>"#,
                    escape(part)
                ));
            }
            xml.push_str("</w:p>");
            xml
        }
        Block::Blank => "<w:p/>".to_string(),
        Block::Table(text) => format!(
            r#"<w:tbl><w:tr><w:tc><w:p><w:r><w:t>{}</w:t></w:r></w:p></w:tc></w:tr></w:tbl>"#,
            escape(text)
        ),
    }
}

pub fn document_xml(blocks: &[Block]) -> String {
    let body: String = blocks.iter().map(render).collect();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{}{}</w:body></w:document>"#,
        body, SECT_PR
    )
}

/// Builds a complete `.docx` package around `blocks`.
pub fn build_docx(blocks: &[Block]) -> Vec<u8> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default();

    let parts = [
        ("[Content_Types].xml", CONTENT_TYPES.to_string()),
        ("_rels/.rels", RELS.to_string()),
        ("word/document.xml", document_xml(blocks)),
        ("word/styles.xml", STYLES.to_string()),
    ];
    for (name, data) in parts {
        writer.start_file(name, options).unwrap();
        writer.write_all(data.as_bytes()).unwrap();
    }

    writer.finish().unwrap().into_inner()
}

/// Document with one plain paragraph per entry.
pub fn plain_docx(texts: &[&str]) -> Vec<u8> {
    let blocks: Vec<Block> = texts.iter().map(|text| Block::Plain(text)).collect();
    build_docx(&blocks)
}

/// Reads one entry of a package back as a string.
pub fn read_part(docx: &[u8], name: &str) -> String {
    use std::io::Read;

    let mut archive = zip::ZipArchive::new(Cursor::new(docx)).unwrap();
    let mut file = archive.by_name(name).unwrap();
    let mut out = String::new();
    file.read_to_string(&mut out).unwrap();
    out
}

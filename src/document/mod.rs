//! Reading and rewriting `.docx` packages.
//!
//! Only the main document part is interpreted. Every other package entry is
//! carried through untouched, and inside the body only direct `<w:p>` children
//! are modelled; tables, bookmarks and section properties stay as raw XML.

mod paragraph;

pub use paragraph::{Paragraph, ParagraphStyle};

use std::io::{Cursor, Read, Write};
use std::path::Path;

use log::debug;
use quick_xml::events::Event;
use quick_xml::Reader;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::error::{RedlineError, Result};

/// MIME type of a Word (OOXML) document.
pub const DOCX_MIME_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

const DOCUMENT_PART: &str = "word/document.xml";

const BLANK_CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/></Types>"#;

const BLANK_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/></Relationships>"#;

const BLANK_DOCUMENT_HEAD: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>"#;

const BLANK_DOCUMENT_TAIL: &str = "</w:body></w:document>";

#[derive(Debug, Clone)]
struct PackageEntry {
    name: String,
    data: Vec<u8>,
    is_dir: bool,
}

#[derive(Debug, Clone)]
enum BodyItem {
    Raw(String),
    Paragraph(usize),
}

#[derive(Debug, Clone, Copy)]
enum BodyChild {
    Paragraph,
    SectionProperties,
}

impl BodyChild {
    fn from_name(local_name: &[u8]) -> Option<Self> {
        match local_name {
            b"p" => Some(BodyChild::Paragraph),
            b"sectPr" => Some(BodyChild::SectionProperties),
            _ => None,
        }
    }
}

/// An in-memory Word document.
#[derive(Debug, Clone)]
pub struct WordDocument {
    entries: Vec<PackageEntry>,
    items: Vec<BodyItem>,
    paragraphs: Vec<Paragraph>,
    /// Index in `items` where appended paragraphs go: after the existing body
    /// content, before the trailing section properties.
    append_at: usize,
}

impl WordDocument {
    /// An empty document with the minimum set of package parts.
    pub fn blank() -> Self {
        let entry = |name: &str, data: &str| PackageEntry {
            name: name.to_string(),
            data: data.as_bytes().to_vec(),
            is_dir: false,
        };

        Self {
            entries: vec![
                entry("[Content_Types].xml", BLANK_CONTENT_TYPES),
                entry("_rels/.rels", BLANK_RELS),
                entry(DOCUMENT_PART, ""),
            ],
            items: vec![
                BodyItem::Raw(BLANK_DOCUMENT_HEAD.to_string()),
                BodyItem::Raw(BLANK_DOCUMENT_TAIL.to_string()),
            ],
            paragraphs: Vec::new(),
            append_at: 1,
        }
    }

    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let bytes = std::fs::read(path.as_ref())?;
        Self::from_bytes(&bytes)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let mut archive = ZipArchive::new(Cursor::new(bytes)).map_err(|e| {
            RedlineError::DocumentParse(format!("not a Word document package: {}", e))
        })?;

        let mut entries = Vec::with_capacity(archive.len());
        for index in 0..archive.len() {
            let mut file = archive
                .by_index(index)
                .map_err(|e| RedlineError::DocumentParse(e.to_string()))?;
            let name = file.name().to_string();
            let is_dir = file.is_dir();
            let mut data = Vec::new();
            file.read_to_end(&mut data).map_err(|e| {
                RedlineError::DocumentParse(format!("cannot read package entry '{}': {}", name, e))
            })?;
            entries.push(PackageEntry { name, data, is_dir });
        }

        let main_part = entries
            .iter()
            .find(|entry| entry.name == DOCUMENT_PART)
            .ok_or_else(|| {
                RedlineError::DocumentParse(format!("package has no {}", DOCUMENT_PART))
            })?;
        let xml = std::str::from_utf8(&main_part.data).map_err(|e| {
            RedlineError::DocumentParse(format!("{} is not UTF-8: {}", DOCUMENT_PART, e))
        })?;

        let (items, paragraphs, append_at) = parse_body(xml)?;

        debug!(
            "Parsed Word package: {} entries, {} body paragraphs",
            entries.len(),
            paragraphs.len()
        );

        Ok(Self {
            entries,
            items,
            paragraphs,
            append_at,
        })
    }

    /// Body-level paragraphs in document order, blank ones included.
    pub fn paragraphs(&self) -> &[Paragraph] {
        &self.paragraphs
    }

    pub fn paragraph_mut(&mut self, index: usize) -> Option<&mut Paragraph> {
        self.paragraphs.get_mut(index)
    }

    pub fn paragraphs_mut(&mut self) -> impl Iterator<Item = &mut Paragraph> {
        self.paragraphs.iter_mut()
    }

    pub fn paragraph_texts(&self) -> Vec<&str> {
        self.paragraphs.iter().map(Paragraph::text).collect()
    }

    /// Adds a paragraph at the end of the body and returns its index.
    pub fn append_paragraph(&mut self, text: &str, style: Option<ParagraphStyle>) -> usize {
        let index = self.paragraphs.len();
        self.paragraphs.push(Paragraph::new(text, style));
        self.items.insert(self.append_at, BodyItem::Paragraph(index));
        self.append_at += 1;
        index
    }

    fn render_document_xml(&self) -> String {
        let mut xml = String::new();
        for item in &self.items {
            match item {
                BodyItem::Raw(raw) => xml.push_str(raw),
                BodyItem::Paragraph(index) => xml.push_str(&self.paragraphs[*index].to_xml()),
            }
        }
        xml
    }

    /// Serializes the package. Entry order and every part other than the main
    /// document are preserved.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let document_xml = self.render_document_xml();
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));

        for entry in &self.entries {
            if entry.is_dir {
                writer
                    .add_directory(entry.name.as_str(), options)
                    .map_err(generation_error)?;
                continue;
            }

            writer
                .start_file(entry.name.as_str(), options)
                .map_err(generation_error)?;
            let data = if entry.name == DOCUMENT_PART {
                document_xml.as_bytes()
            } else {
                entry.data.as_slice()
            };
            writer
                .write_all(data)
                .map_err(|e| RedlineError::DocumentGeneration(e.to_string()))?;
        }

        let cursor = writer.finish().map_err(generation_error)?;
        Ok(cursor.into_inner())
    }
}

fn generation_error(err: zip::result::ZipError) -> RedlineError {
    RedlineError::DocumentGeneration(err.to_string())
}

fn flush_raw(items: &mut Vec<BodyItem>, raw: &str) {
    if !raw.is_empty() {
        items.push(BodyItem::Raw(raw.to_string()));
    }
}

/// Splits the main document XML into raw fragments and body-level paragraphs.
fn parse_body(xml: &str) -> Result<(Vec<BodyItem>, Vec<Paragraph>, usize)> {
    let mut reader = Reader::from_str(xml);
    let mut items = Vec::new();
    let mut paragraphs = Vec::new();
    let mut depth = 0usize;
    let mut body_depth: Option<usize> = None;
    let mut append_at: Option<usize> = None;
    let mut raw_start = 0usize;
    let mut open: Option<(BodyChild, usize)> = None;

    let mut push_child = |kind: BodyChild,
                          fragment: &str,
                          items: &mut Vec<BodyItem>,
                          append_at: &mut Option<usize>|
     -> Result<()> {
        match kind {
            BodyChild::Paragraph => {
                paragraphs.push(Paragraph::parse(fragment)?);
                items.push(BodyItem::Paragraph(paragraphs.len() - 1));
            }
            BodyChild::SectionProperties => {
                append_at.get_or_insert(items.len());
                items.push(BodyItem::Raw(fragment.to_string()));
            }
        }
        Ok(())
    };

    loop {
        let before = reader.buffer_position() as usize;
        let event = reader
            .read_event()
            .map_err(|e| RedlineError::DocumentParse(format!("malformed document XML: {}", e)))?;
        let after = reader.buffer_position() as usize;

        match event {
            Event::Start(e) => {
                let name = e.local_name();
                if body_depth.is_none() && name.as_ref() == b"body" {
                    body_depth = Some(depth + 1);
                } else if open.is_none() && body_depth == Some(depth) {
                    if let Some(kind) = BodyChild::from_name(name.as_ref()) {
                        flush_raw(&mut items, &xml[raw_start..before]);
                        open = Some((kind, before));
                    }
                }
                depth += 1;
            }
            Event::End(e) => {
                depth = depth.saturating_sub(1);
                if body_depth == Some(depth) {
                    if let Some((kind, start)) = open.take() {
                        push_child(kind, &xml[start..after], &mut items, &mut append_at)?;
                        raw_start = after;
                    }
                } else if body_depth == Some(depth + 1) && e.local_name().as_ref() == b"body" {
                    flush_raw(&mut items, &xml[raw_start..before]);
                    append_at.get_or_insert(items.len());
                    raw_start = before;
                }
            }
            Event::Empty(e) if open.is_none() && body_depth == Some(depth) => {
                if let Some(kind) = BodyChild::from_name(e.local_name().as_ref()) {
                    flush_raw(&mut items, &xml[raw_start..before]);
                    push_child(kind, &xml[before..after], &mut items, &mut append_at)?;
                    raw_start = after;
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if body_depth.is_none() {
        return Err(RedlineError::DocumentParse(
            "main document part has no <w:body>".to_string(),
        ));
    }

    flush_raw(&mut items, &xml[raw_start..]);
    let append_at = append_at.unwrap_or(items.len());

    Ok((items, paragraphs, append_at))
}

use std::borrow::Cow;

use quick_xml::escape::escape;
use quick_xml::events::Event;
use quick_xml::Reader;

use crate::error::{RedlineError, Result};

/// Paragraph-level formatting, kept as the raw `<w:pPr>` element so that
/// everything Word stored there (style, numbering, spacing) survives a rewrite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParagraphStyle {
    xml: String,
}

impl ParagraphStyle {
    /// Properties that only reference a named style, e.g. `Heading1`.
    pub fn named(style_id: &str) -> Self {
        Self {
            xml: format!(r#"<w:pPr><w:pStyle w:val="{}"/></w:pPr>"#, escape(style_id)),
        }
    }

    pub(crate) fn from_xml(xml: impl Into<String>) -> Self {
        Self { xml: xml.into() }
    }

    pub fn as_xml(&self) -> &str {
        &self.xml
    }

    /// The `w:pStyle` value, if the properties reference a named style.
    pub fn style_id(&self) -> Option<String> {
        let mut reader = Reader::from_str(&self.xml);
        loop {
            match reader.read_event() {
                Ok(Event::Start(e)) | Ok(Event::Empty(e))
                    if e.local_name().as_ref() == b"pStyle" =>
                {
                    return e
                        .try_get_attribute("w:val")
                        .ok()
                        .flatten()
                        .and_then(|attr| attr.unescape_value().ok())
                        .map(|value| value.into_owned());
                }
                Ok(Event::Eof) | Err(_) => return None,
                _ => {}
            }
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Capture {
    ParagraphProperties,
    RunProperties,
}

/// A body-level `<w:p>` element.
///
/// Untouched paragraphs serialize back to their original XML byte for byte.
/// Once the text is replaced the paragraph is re-rendered as a single run that
/// keeps the paragraph properties and the formatting of the first text run.
#[derive(Debug, Clone)]
pub struct Paragraph {
    raw: String,
    text: String,
    style: Option<ParagraphStyle>,
    run_properties: Option<String>,
    edited: bool,
}

impl Paragraph {
    pub fn new(text: impl Into<String>, style: Option<ParagraphStyle>) -> Self {
        Self {
            raw: String::new(),
            text: text.into(),
            style,
            run_properties: None,
            edited: true,
        }
    }

    pub(crate) fn parse(raw: &str) -> Result<Self> {
        let mut reader = Reader::from_str(raw);
        let mut depth = 0usize;
        let mut text = String::new();
        let mut style = None;
        let mut run_properties = None;
        let mut current_run_properties: Option<String> = None;
        let mut seen_text = false;
        let mut in_text = false;
        let mut capture: Option<(Capture, usize, usize)> = None;
        // Depth of a subtree whose text is not part of the paragraph.
        let mut skip: Option<usize> = None;

        loop {
            let before = reader.buffer_position() as usize;
            let event = reader.read_event().map_err(xml_error)?;
            let after = reader.buffer_position() as usize;

            if let Some(level) = skip {
                match event {
                    Event::Start(_) => depth += 1,
                    Event::End(_) => {
                        depth = depth.saturating_sub(1);
                        if depth == level {
                            skip = None;
                        }
                    }
                    Event::Eof => break,
                    _ => {}
                }
                continue;
            }

            match event {
                Event::Start(e) => {
                    if is_hidden_subtree(e.local_name().as_ref()) {
                        skip = Some(depth);
                    } else if capture.is_none() {
                        match e.local_name().as_ref() {
                            b"pPr" if depth == 1 => {
                                capture = Some((Capture::ParagraphProperties, before, depth))
                            }
                            b"rPr" => capture = Some((Capture::RunProperties, before, depth)),
                            b"r" => current_run_properties = None,
                            b"t" => in_text = true,
                            _ => {}
                        }
                    }
                    depth += 1;
                }
                Event::End(e) => {
                    depth = depth.saturating_sub(1);
                    if let Some((kind, start, level)) = capture {
                        if level == depth {
                            let xml = &raw[start..after];
                            match kind {
                                Capture::ParagraphProperties => {
                                    style = Some(ParagraphStyle::from_xml(xml))
                                }
                                Capture::RunProperties => {
                                    current_run_properties = Some(xml.to_string())
                                }
                            }
                            capture = None;
                        }
                    }
                    if e.local_name().as_ref() == b"t" {
                        in_text = false;
                    }
                }
                Event::Empty(e) if capture.is_none() => match e.local_name().as_ref() {
                    b"pPr" if depth == 1 => {
                        style = Some(ParagraphStyle::from_xml(&raw[before..after]))
                    }
                    b"rPr" => current_run_properties = Some(raw[before..after].to_string()),
                    b"tab" => text.push('\t'),
                    b"br" | b"cr" => text.push('\n'),
                    _ => {}
                },
                Event::Text(e) if in_text => {
                    let chunk = e.unescape().map_err(xml_error)?;
                    if !seen_text && !chunk.is_empty() {
                        run_properties = current_run_properties.clone();
                        seen_text = true;
                    }
                    text.push_str(&chunk);
                }
                Event::CData(e) if in_text => {
                    text.push_str(&String::from_utf8_lossy(&e.into_inner()));
                }
                Event::Eof => break,
                _ => {}
            }
        }

        Ok(Self {
            raw: raw.to_string(),
            text,
            style,
            run_properties,
            edited: false,
        })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn style(&self) -> Option<&ParagraphStyle> {
        self.style.as_ref()
    }

    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    pub fn is_edited(&self) -> bool {
        self.edited
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.edited = true;
    }

    pub(crate) fn to_xml(&self) -> Cow<'_, str> {
        if self.edited {
            Cow::Owned(self.render())
        } else {
            Cow::Borrowed(&self.raw)
        }
    }

    fn render(&self) -> String {
        let mut xml = String::from("<w:p>");
        if let Some(style) = &self.style {
            xml.push_str(style.as_xml());
        }

        if !self.text.is_empty() {
            xml.push_str("<w:r>");
            if let Some(props) = &self.run_properties {
                xml.push_str(props);
            }
            for (line_idx, line) in self.text.split('\n').enumerate() {
                if line_idx > 0 {
                    xml.push_str("<w:br/>");
                }
                for (seg_idx, segment) in line.split('\t').enumerate() {
                    if seg_idx > 0 {
                        xml.push_str("<w:tab/>");
                    }
                    if !segment.is_empty() {
                        xml.push_str(r#"<w:t xml:space="preserve">"#);
                        xml.push_str(&escape(segment));
                        xml.push_str("</w:t>");
                    }
                }
            }
            xml.push_str("</w:r>");
        }

        xml.push_str("</w:p>");
        xml
    }
}

/// Text-box bodies and the legacy fallback copy of alternate content. Word
/// stores text boxes twice, so reading them would double the paragraph text.
fn is_hidden_subtree(local_name: &[u8]) -> bool {
    matches!(local_name, b"txbxContent" | b"Fallback")
}

fn xml_error(err: quick_xml::Error) -> RedlineError {
    RedlineError::DocumentParse(format!("malformed paragraph XML: {}", err))
}

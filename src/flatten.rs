use crate::document::WordDocument;
use crate::error::Result;
use crate::schema::Clause;

/// Lists the non-blank body paragraphs of `doc` as clauses, in document order.
///
/// Blank paragraphs do not consume an identifier, so the n-th clause is always
/// `clause_{n:03}` regardless of how much spacing the document uses.
pub fn flatten_document(doc: &WordDocument) -> Vec<Clause> {
    doc.paragraphs()
        .iter()
        .map(|para| para.text().trim())
        .filter(|text| !text.is_empty())
        .enumerate()
        .map(|(idx, text)| Clause::new(idx + 1, text))
        .collect()
}

/// Parses an uploaded `.docx` and flattens it.
pub fn parse_clauses(bytes: &[u8]) -> Result<Vec<Clause>> {
    let doc = WordDocument::from_bytes(bytes)?;
    Ok(flatten_document(&doc))
}

use std::collections::HashMap;

use log::{debug, info};

use crate::document::WordDocument;
use crate::error::{RedlineError, Result};
use crate::placeholders::apply_form_data;
use crate::schema::{EditOperation, FormData};

/// Prefix given to the file name of every regenerated document.
pub const GENERATED_PREFIX: &str = "Generated_";

/// What applying a batch of operations did to a document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EditSummary {
    pub modified: usize,
    pub removed: usize,
    pub appended: usize,
    /// MODIFY/REMOVE operations whose `original_text` matched no paragraph.
    pub unmatched: usize,
    pub skipped_errors: usize,
}

#[derive(Debug, Clone)]
pub struct GeneratedDocument {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Applies `operations` to `doc` in the order given.
///
/// MODIFY and REMOVE locate their paragraph by trimmed text equality against
/// the document as it was before any operation ran; when several paragraphs
/// share a text, the first one is used. Unmatched operations are ignored.
/// REMOVE blanks the paragraph but keeps it. ADD ignores its anchor: new
/// clauses are appended at the end in the order received, styled like the
/// second-to-last paragraph of the original document.
pub fn apply_edits(doc: &mut WordDocument, operations: &[EditOperation]) -> EditSummary {
    let mut lookup: HashMap<String, usize> = HashMap::new();
    for (idx, para) in doc.paragraphs().iter().enumerate() {
        let key = para.text().trim();
        if !key.is_empty() {
            lookup.entry(key.to_string()).or_insert(idx);
        }
    }

    let mut summary = EditSummary::default();
    let mut pending_additions = Vec::new();

    for op in operations {
        match op {
            EditOperation::Modify {
                original_text,
                new_text,
                ..
            } => match lookup.get(original_text.trim()) {
                Some(&idx) => {
                    if let Some(para) = doc.paragraph_mut(idx) {
                        para.set_text(new_text.as_str());
                        summary.modified += 1;
                    }
                }
                None => {
                    debug!("MODIFY matched no paragraph: {:?}", original_text);
                    summary.unmatched += 1;
                }
            },
            EditOperation::Remove { original_text, .. } => match lookup.get(original_text.trim()) {
                Some(&idx) => {
                    if let Some(para) = doc.paragraph_mut(idx) {
                        para.set_text("");
                        summary.removed += 1;
                    }
                }
                None => {
                    debug!("REMOVE matched no paragraph: {:?}", original_text);
                    summary.unmatched += 1;
                }
            },
            EditOperation::Add { new_clause, .. } => pending_additions.push(new_clause.text.as_str()),
            EditOperation::Error { .. } => summary.skipped_errors += 1,
        }
    }

    let paragraphs = doc.paragraphs();
    let append_style = if paragraphs.len() >= 2 {
        paragraphs[paragraphs.len() - 2].style().cloned()
    } else {
        None
    };

    for text in pending_additions {
        doc.append_paragraph(text, append_style.clone());
        summary.appended += 1;
    }

    debug!("Applied edits: {:?}", summary);
    summary
}

/// Rebuilds `template` with `operations` applied and placeholders filled from
/// `form_data`, returning the serialized document named `Generated_<file_name>`.
pub fn generate_document(
    template: &[u8],
    file_name: &str,
    operations: &[EditOperation],
    form_data: Option<&FormData>,
) -> Result<GeneratedDocument> {
    let mut doc = WordDocument::from_bytes(template).map_err(|e| {
        RedlineError::DocumentGeneration(format!("template '{}' is unreadable: {}", file_name, e))
    })?;

    let summary = apply_edits(&mut doc, operations);
    let filled = form_data.map_or(0, |data| apply_form_data(&mut doc, data));

    let bytes = doc.to_bytes().map_err(|e| match e {
        RedlineError::DocumentGeneration(_) => e,
        other => RedlineError::DocumentGeneration(other.to_string()),
    })?;

    info!(
        "Generated '{}{}': {} modified, {} removed, {} appended, {} unmatched, {} paragraphs filled",
        GENERATED_PREFIX,
        file_name,
        summary.modified,
        summary.removed,
        summary.appended,
        summary.unmatched,
        filled
    );

    Ok(GeneratedDocument {
        file_name: format!("{}{}", GENERATED_PREFIX, file_name),
        bytes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::ParagraphStyle;
    use crate::schema::NewClause;

    fn modify(original: &str, new: &str) -> EditOperation {
        EditOperation::Modify {
            clause_id: String::new(),
            original_text: original.to_string(),
            new_text: new.to_string(),
            reason: None,
        }
    }

    fn remove(original: &str) -> EditOperation {
        EditOperation::Remove {
            clause_id: String::new(),
            original_text: original.to_string(),
            reason: None,
        }
    }

    fn add(text: &str) -> EditOperation {
        EditOperation::Add {
            clause_id: "clause_001".to_string(),
            new_clause: NewClause {
                clause_id: "clause_new".to_string(),
                clause_title: String::new(),
                text: text.to_string(),
            },
            reason: None,
        }
    }

    fn document(paragraphs: &[(&str, Option<&str>)]) -> WordDocument {
        let mut doc = WordDocument::blank();
        for (text, style) in paragraphs {
            doc.append_paragraph(text, style.map(ParagraphStyle::named));
        }
        WordDocument::from_bytes(&doc.to_bytes().unwrap()).unwrap()
    }

    #[test]
    fn test_modify_and_add_scenario() {
        let mut doc = document(&[("A", None), ("B", None), ("C", None)]);
        let summary = apply_edits(&mut doc, &[modify("B", "B2"), add("D")]);

        assert_eq!(doc.paragraph_texts(), vec!["A", "B2", "C", "D"]);
        assert_eq!(summary.modified, 1);
        assert_eq!(summary.appended, 1);
    }

    #[test]
    fn test_modify_matches_trimmed_text_and_keeps_style() {
        let mut doc = document(&[("Intro", None), ("  Rent is due.  ", Some("BodyText"))]);
        apply_edits(&mut doc, &[modify("Rent is due.\n", "Rent is due weekly.")]);

        let para = &doc.paragraphs()[1];
        assert_eq!(para.text(), "Rent is due weekly.");
        assert_eq!(para.style().unwrap().style_id().as_deref(), Some("BodyText"));
        assert!(!doc.paragraphs()[0].is_edited());
    }

    #[test]
    fn test_remove_blanks_but_keeps_the_slot() {
        let mut doc = document(&[("A", None), ("B", None), ("C", None)]);
        let summary = apply_edits(&mut doc, &[remove("B")]);

        assert_eq!(doc.paragraph_texts(), vec!["A", "", "C"]);
        assert_eq!(summary.removed, 1);
    }

    #[test]
    fn test_unmatched_and_error_operations_have_no_effect() {
        let mut doc = document(&[("A", None), ("B", None)]);
        let summary = apply_edits(
            &mut doc,
            &[
                modify("Z", "nope"),
                remove("paraphrased B"),
                EditOperation::error("model failed"),
            ],
        );

        assert_eq!(doc.paragraph_texts(), vec!["A", "B"]);
        assert_eq!(summary.unmatched, 2);
        assert_eq!(summary.skipped_errors, 1);
        assert!(doc.paragraphs().iter().all(|p| !p.is_edited()));
    }

    #[test]
    fn test_duplicate_text_resolves_to_first_paragraph() {
        let mut doc = document(&[("Same", None), ("Other", None), ("Same", None)]);
        apply_edits(&mut doc, &[modify("Same", "Changed")]);
        assert_eq!(doc.paragraph_texts(), vec!["Changed", "Other", "Same"]);
    }

    #[test]
    fn test_operations_use_original_text_lookup() {
        let mut doc = document(&[("A", None), ("B", None)]);
        apply_edits(&mut doc, &[modify("A", "A2"), modify("A", "A3"), modify("A2", "x")]);
        assert_eq!(doc.paragraph_texts(), vec!["A3", "B"]);
    }

    #[test]
    fn test_additions_append_in_order_with_second_to_last_style() {
        let mut doc = document(&[
            ("Title", Some("Title")),
            ("Clause", Some("ListParagraph")),
            ("Signature", Some("Signature")),
        ]);
        apply_edits(&mut doc, &[add("First new"), modify("Title", "Lease"), add("Second new")]);

        assert_eq!(
            doc.paragraph_texts(),
            vec!["Lease", "Clause", "Signature", "First new", "Second new"]
        );
        for para in &doc.paragraphs()[3..] {
            assert_eq!(
                para.style().unwrap().style_id().as_deref(),
                Some("ListParagraph")
            );
        }
    }

    #[test]
    fn test_additions_to_single_paragraph_document_are_unstyled() {
        let mut doc = document(&[("Only", Some("Title"))]);
        apply_edits(&mut doc, &[add("New")]);
        assert_eq!(doc.paragraph_texts(), vec!["Only", "New"]);
        assert!(doc.paragraphs()[1].style().is_none());
    }

    #[test]
    fn test_generate_document_names_and_serializes() {
        let template = document(&[("Tenant: [Tenant]", None), ("B", None)])
            .to_bytes()
            .unwrap();
        let form: FormData =
            serde_json::from_value(serde_json::json!({ "Tenant": "Jordan Lee" })).unwrap();

        let generated =
            generate_document(&template, "lease.docx", &[modify("B", "B2")], Some(&form)).unwrap();

        assert_eq!(generated.file_name, "Generated_lease.docx");
        let reread = WordDocument::from_bytes(&generated.bytes).unwrap();
        assert_eq!(reread.paragraph_texts(), vec!["Tenant: Jordan Lee", "B2"]);
    }

    #[test]
    fn test_generate_from_corrupt_template_fails() {
        let err = generate_document(b"not a docx", "broken.docx", &[], None).unwrap_err();
        assert!(matches!(err, RedlineError::DocumentGeneration(_)));
    }
}

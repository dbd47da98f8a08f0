//! `[Placeholder]` markers that the user fills in before downloading.

use std::borrow::Cow;
use std::collections::HashSet;

use chrono::{DateTime, NaiveDate};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde_json::Value;

use crate::document::WordDocument;
use crate::schema::{Clause, EditOperation, FormData};

static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[(.*?)\]").expect("placeholder pattern is valid"));

/// Placeholder names in `text`, in order of appearance.
pub fn find_placeholders(text: &str) -> Vec<&str> {
    PLACEHOLDER
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str())
        .collect()
}

/// Placeholders the user has to fill once `accepted` has been applied.
///
/// Clauses replaced or removed by an accepted operation no longer contribute
/// theirs; accepted MODIFY and ADD texts do. Names are reported once, in the
/// order they are first seen.
pub fn collect_placeholders(clauses: &[Clause], accepted: &[EditOperation]) -> Vec<String> {
    let replaced: HashSet<&str> = accepted
        .iter()
        .filter_map(|op| match op {
            EditOperation::Modify { clause_id, .. } | EditOperation::Remove { clause_id, .. } => {
                Some(clause_id.as_str())
            }
            _ => None,
        })
        .collect();

    let surviving = clauses
        .iter()
        .filter(|clause| !replaced.contains(clause.clause_id.as_str()))
        .map(|clause| clause.text.as_str());

    let introduced = accepted.iter().filter_map(|op| match op {
        EditOperation::Modify { new_text, .. } => Some(new_text.as_str()),
        EditOperation::Add { new_clause, .. } => Some(new_clause.text.as_str()),
        _ => None,
    });

    let mut seen = HashSet::new();
    let mut names = Vec::new();
    for text in surviving.chain(introduced) {
        for name in find_placeholders(text) {
            if seen.insert(name) {
                names.push(name.to_string());
            }
        }
    }
    names
}

/// Renders a form value for insertion into the document. ISO dates become
/// long-form US dates ("March 1, 2024"). Empty values render as nothing so the
/// marker is kept.
pub fn format_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if s.trim().is_empty() => None,
        Value::String(s) => Some(format_date(s.trim()).unwrap_or_else(|| s.clone())),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn format_date(s: &str) -> Option<String> {
    let date = NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.date_naive()))?;
    Some(date.format("%B %-d, %Y").to_string())
}

/// Replaces every `[name]` in `text` that has a value in `form_data`.
pub fn fill_placeholders<'a>(text: &'a str, form_data: &FormData) -> Cow<'a, str> {
    PLACEHOLDER.replace_all(text, |caps: &Captures| {
        form_data
            .get(&caps[1])
            .and_then(format_value)
            .unwrap_or_else(|| caps[0].to_string())
    })
}

/// Fills placeholders throughout `doc`. Only paragraphs whose text actually
/// changes are rewritten. Returns the number of paragraphs touched.
pub fn apply_form_data(doc: &mut WordDocument, form_data: &FormData) -> usize {
    if form_data.is_empty() {
        return 0;
    }

    let mut touched = 0;
    for para in doc.paragraphs_mut() {
        let filled = match fill_placeholders(para.text(), form_data) {
            Cow::Owned(filled) if filled != para.text() => filled,
            _ => continue,
        };
        para.set_text(filled);
        touched += 1;
    }
    touched
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::NewClause;
    use serde_json::json;

    fn form(value: Value) -> FormData {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_find_placeholders() {
        assert_eq!(
            find_placeholders("Between [Landlord] and [Tenant], dated [Start Date]."),
            vec!["Landlord", "Tenant", "Start Date"]
        );
        assert!(find_placeholders("No markers here").is_empty());
    }

    #[test]
    fn test_collect_skips_replaced_clauses_and_adds_new_text() {
        let clauses = vec![
            Clause::new(1, "Lease between [Landlord] and [Tenant]."),
            Clause::new(2, "Rent of [Rent] is due monthly."),
            Clause::new(3, "Deposit: [Deposit]."),
        ];
        let accepted = vec![
            EditOperation::Modify {
                clause_id: "clause_002".to_string(),
                original_text: "Rent of [Rent] is due monthly.".to_string(),
                new_text: "Rent of [Weekly Rent] is due weekly.".to_string(),
                reason: None,
            },
            EditOperation::Remove {
                clause_id: "clause_003".to_string(),
                original_text: "Deposit: [Deposit].".to_string(),
                reason: None,
            },
            EditOperation::Add {
                clause_id: "clause_001".to_string(),
                new_clause: NewClause {
                    clause_id: "clause_new".to_string(),
                    clause_title: "Pets".to_string(),
                    text: "[Tenant] may keep [Pet Count] pets.".to_string(),
                },
                reason: None,
            },
        ];

        assert_eq!(
            collect_placeholders(&clauses, &accepted),
            vec!["Landlord", "Tenant", "Weekly Rent", "Pet Count"]
        );
    }

    #[test]
    fn test_fill_formats_dates_and_keeps_unknown_markers() {
        let data = form(json!({
            "Tenant": "Jordan Lee",
            "Start Date": "2024-03-01",
            "Signed": "2024-07-04T10:00:00Z",
            "Rent": 1500,
            "Landlord": ""
        }));

        let filled = fill_placeholders(
            "[Landlord] leases to [Tenant] from [Start Date] (signed [Signed]) for [Rent]; [Other].",
            &data,
        );
        assert_eq!(
            filled,
            "[Landlord] leases to Jordan Lee from March 1, 2024 (signed July 4, 2024) for 1500; [Other]."
        );
    }

    #[test]
    fn test_apply_form_data_only_touches_changed_paragraphs() {
        let mut doc = WordDocument::blank();
        doc.append_paragraph("Plain clause", None);
        doc.append_paragraph("Tenant: [Tenant]", None);
        doc.append_paragraph("Guarantor: [Guarantor]", None);
        let mut doc = WordDocument::from_bytes(&doc.to_bytes().unwrap()).unwrap();

        let touched = apply_form_data(&mut doc, &form(json!({ "Tenant": "Jordan Lee" })));

        assert_eq!(touched, 1);
        assert_eq!(
            doc.paragraph_texts(),
            vec!["Plain clause", "Tenant: Jordan Lee", "Guarantor: [Guarantor]"]
        );
        assert!(!doc.paragraphs()[0].is_edited());
        assert!(!doc.paragraphs()[2].is_edited());
    }
}

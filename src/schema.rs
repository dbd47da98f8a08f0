use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Field values supplied alongside a scenario (party names, dates, amounts).
/// Ordered so prompts serialize deterministically.
pub type BaseFields = BTreeMap<String, Value>;

/// Values used to fill `[Placeholder]` markers when regenerating a document.
pub type FormData = BTreeMap<String, Value>;

/// One non-blank paragraph of a source document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Clause {
    /// Sequential identifier, `clause_001` for the first non-blank paragraph.
    pub clause_id: String,
    /// The paragraph text with surrounding whitespace removed.
    pub text: String,
}

impl Clause {
    pub fn new(index: usize, text: impl Into<String>) -> Self {
        Self {
            clause_id: format!("clause_{:03}", index),
            text: text.into(),
        }
    }
}

/// A clause proposed by the model for insertion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewClause {
    pub clause_id: String,
    pub clause_title: String,
    pub text: String,
}

/// A single suggested change to a document, or the placeholder emitted when
/// the model's reply could not be obtained or decoded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EditOperation {
    /// Replace the text of an existing clause.
    Modify {
        clause_id: String,
        original_text: String,
        new_text: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        reason: Option<String>,
    },

    /// Insert a new clause. `clause_id` names the clause it should follow.
    Add {
        clause_id: String,
        new_clause: NewClause,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        reason: Option<String>,
    },

    /// Blank out an existing clause.
    Remove {
        clause_id: String,
        original_text: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        reason: Option<String>,
    },

    /// Produced locally; never sent by a well-behaved model.
    Error { reason: String },
}

impl EditOperation {
    pub fn error(reason: impl Into<String>) -> Self {
        EditOperation::Error {
            reason: reason.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, EditOperation::Error { .. })
    }

    /// The clause this operation targets (the anchor clause for ADD).
    pub fn clause_id(&self) -> Option<&str> {
        match self {
            EditOperation::Modify { clause_id, .. }
            | EditOperation::Add { clause_id, .. }
            | EditOperation::Remove { clause_id, .. } => Some(clause_id),
            EditOperation::Error { .. } => None,
        }
    }

    pub fn action_name(&self) -> &'static str {
        match self {
            EditOperation::Modify { .. } => "MODIFY",
            EditOperation::Add { .. } => "ADD",
            EditOperation::Remove { .. } => "REMOVE",
            EditOperation::Error { .. } => "ERROR",
        }
    }
}

/// The object the model is instructed to return.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuggestionEnvelope {
    pub suggestions: Vec<EditOperation>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResponse {
    #[serde(rename = "originalDoc")]
    pub original_doc: Vec<Clause>,
    pub suggestions: Vec<EditOperation>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateDocumentRequest {
    pub file_name: String,
    #[serde(default)]
    pub suggestions: Vec<EditOperation>,
    #[serde(default)]
    pub form_data: Option<FormData>,
}

//! # Clause Redliner
//!
//! Scenario-driven redlining of Word legal documents with a language model.
//!
//! ## Core Concepts
//!
//! - **Clause**: one non-blank paragraph of the uploaded document, numbered
//!   `clause_001`, `clause_002`, ... in reading order
//! - **Scenario**: free text describing the deal; the model proposes edits to
//!   make the document fit it
//! - **Edit operation**: a tagged `MODIFY`, `ADD`, `REMOVE` or `ERROR` record
//!   returned by the model and reviewed by the user
//! - **Reconstruction**: accepted operations are replayed onto the pristine
//!   template, matching paragraphs by their original text, and the result is
//!   served back as a new `.docx`
//!
//! ## Example
//!
//! ```rust,ignore
//! use clause_redliner::*;
//!
//! let clauses = parse_clauses(&std::fs::read("nda.docx")?)?;
//! let advisor = ClauseAdvisor::new(std::sync::Arc::new(GeminiClient::new(api_key)));
//! let suggestions = advisor
//!     .suggest(&clauses, "Mutual NDA between two startups", &BaseFields::new())
//!     .await;
//!
//! let generated = generate_document(&std::fs::read("nda.docx")?, "nda.docx", &suggestions, None)?;
//! std::fs::write(&generated.file_name, generated.bytes)?;
//! ```

pub mod document;
pub mod error;
pub mod flatten;
pub mod llm;
pub mod placeholders;
pub mod reconstruct;
pub mod schema;
pub mod templates;

#[cfg(feature = "server")]
pub mod server;

pub use document::{Paragraph, ParagraphStyle, WordDocument, DOCX_MIME_TYPE};
pub use error::{RedlineError, Result};
pub use flatten::{flatten_document, parse_clauses};
pub use llm::{parse_suggestions, validate_scenario, ClauseAdvisor, LanguageModel};
#[cfg(feature = "gemini")]
pub use llm::GeminiClient;
pub use placeholders::{apply_form_data, collect_placeholders, fill_placeholders};
pub use reconstruct::{apply_edits, generate_document, EditSummary, GeneratedDocument};
pub use schema::*;
pub use templates::TemplateStore;

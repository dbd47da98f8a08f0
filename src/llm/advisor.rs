use std::sync::Arc;

use log::{info, warn};

use crate::error::{RedlineError, Result};
use crate::llm::parser::parse_suggestions;
use crate::llm::prompts::build_analysis_prompt;
use crate::llm::LanguageModel;
use crate::schema::{BaseFields, Clause, EditOperation};

/// Rejects a scenario that is empty once trimmed.
pub fn validate_scenario(scenario: &str) -> Result<&str> {
    let trimmed = scenario.trim();
    if trimmed.is_empty() {
        return Err(RedlineError::InvalidScenario(
            "No scenario text provided".to_string(),
        ));
    }
    Ok(trimmed)
}

/// Turns a scenario and a flattened document into suggested edits.
#[derive(Clone)]
pub struct ClauseAdvisor {
    model: Arc<dyn LanguageModel>,
}

impl ClauseAdvisor {
    pub fn new(model: Arc<dyn LanguageModel>) -> Self {
        Self { model }
    }

    /// Asks the model for edits.
    ///
    /// Never fails: if the prompt cannot be built, the call fails or the reply
    /// cannot be decoded, the result is a single ERROR operation carrying the
    /// reason. Callers must check [`EditOperation::is_error`].
    pub async fn suggest(
        &self,
        clauses: &[Clause],
        scenario: &str,
        base_fields: &BaseFields,
    ) -> Vec<EditOperation> {
        let prompt = match build_analysis_prompt(clauses, scenario, base_fields) {
            Ok(prompt) => prompt,
            Err(e) => {
                warn!("Could not build analysis prompt: {}", e);
                return vec![EditOperation::error(e.to_string())];
            }
        };

        let reply = match self.model.generate(&prompt).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!("Model call failed: {}", e);
                return vec![EditOperation::error(e.to_string())];
            }
        };

        let suggestions = parse_suggestions(&reply);
        if !suggestions.first().is_some_and(EditOperation::is_error) {
            info!(
                "Model suggested {} edits for {} clauses",
                suggestions.len(),
                clauses.len()
            );
        }
        suggestions
    }
}

// Prompt text for the clause analysis request

use crate::error::Result;
use crate::schema::{BaseFields, Clause};
use serde_json::Value;

pub const ANALYSIS_PREAMBLE: &str = r#"
You are a meticulous legal AI assistant. Your task is to analyze a user's scenario
against a provided legal document and suggest specific modifications.

## INSTRUCTIONS
1. Carefully review the `scenario` provided by the user and any base field values.
2. Analyze each clause in the document clauses.
3. Based on the scenario, decide whether each clause needs to be modified or removed, and whether new clauses need to be added.
4. Your response MUST be a single, valid JSON object. Do not include any text or markdown before or after the JSON object.
5. The JSON object must contain exactly one key: "suggestions".
6. The value of "suggestions" must be a list of JSON objects, one per suggested change, with the following structure:
   - `action`: "MODIFY", "ADD", or "REMOVE".
   - `clause_id`: The ID of the clause to be modified or removed. For "ADD", the ID of the clause *after which* the new clause should be inserted.
   - `original_text`: (MODIFY and REMOVE only) The original text of the clause, copied EXACTLY as given.
   - `new_text`: (MODIFY only) The suggested new text for the clause.
   - `new_clause`: (ADD only) An object with "clause_id", "clause_title" and "text" for the new clause.
   - `reason`: A brief, clear explanation of why the change is suggested.
7. Where a value is unknown, leave a placeholder in square brackets, e.g. [Tenant Name].
"#;

/// Renders the base field values as a `- key: value` list. Strings are
/// written without quotes; other JSON values in their compact form.
pub fn format_base_fields(base_fields: &BaseFields) -> String {
    if base_fields.is_empty() {
        return "- (none provided)".to_string();
    }

    base_fields
        .iter()
        .map(|(key, value)| match value {
            Value::String(s) => format!("- {}: {}", key, s),
            other => format!("- {}: {}", key, other),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Builds the single instruction string sent to the model. The output depends
/// only on the arguments.
pub fn build_analysis_prompt(
    clauses: &[Clause],
    scenario: &str,
    base_fields: &BaseFields,
) -> Result<String> {
    let clauses_json = serde_json::to_string_pretty(clauses)?;

    Ok(format!(
        "{}\n\
         ## BASE FIELD VALUES\n\
         {}\n\n\
         ## SCENARIO\n\
         ---\n\
         {}\n\
         ---\n\n\
         ## DOCUMENT CLAUSES (JSON)\n\
         ---\n\
         {}\n\
         ---\n\n\
         ## YOUR JSON RESPONSE\n",
        ANALYSIS_PREAMBLE.trim(),
        format_base_fields(base_fields),
        scenario,
        clauses_json
    ))
}

use log::warn;

use crate::error::{RedlineError, Result};
use crate::schema::{EditOperation, SuggestionEnvelope};

/// Removes a surrounding markdown code fence (```` ``` ```` or ```` ```json ````)
/// from a model reply.
pub fn strip_code_fences(raw: &str) -> &str {
    let mut text = raw.trim();

    if let Some(rest) = text.strip_prefix("```") {
        // Drop the info string (e.g. `json`) up to the end of the fence line.
        text = match rest.find('\n') {
            Some(newline) if rest[..newline].trim().chars().all(|c| c.is_ascii_alphanumeric()) => {
                &rest[newline + 1..]
            }
            _ => rest.strip_prefix("json").unwrap_or(rest),
        };
    }

    if let Some(rest) = text.trim_end().strip_suffix("```") {
        text = rest;
    }

    text.trim()
}

/// Decodes a reply into operations, rejecting anything that is not an object
/// with a `suggestions` list of well-formed operations. ERROR is only ever
/// produced locally, so a reply containing one is rejected as a whole.
pub fn decode_suggestions(raw: &str) -> Result<Vec<EditOperation>> {
    let cleaned = strip_code_fences(raw);
    let envelope: SuggestionEnvelope = serde_json::from_str(cleaned)
        .map_err(|e| RedlineError::ResponseParse(e.to_string()))?;

    let model_error = envelope.suggestions.iter().find_map(|op| match op {
        EditOperation::Error { reason } => Some(reason),
        _ => None,
    });
    if let Some(reason) = model_error {
        return Err(RedlineError::ResponseParse(format!(
            "reply contains an ERROR operation: {}",
            reason
        )));
    }

    Ok(envelope.suggestions)
}

/// Like [`decode_suggestions`], but a failure becomes a one-element list
/// holding an ERROR operation.
pub fn parse_suggestions(raw: &str) -> Vec<EditOperation> {
    match decode_suggestions(raw) {
        Ok(suggestions) => suggestions,
        Err(e) => {
            warn!("Discarding unparsable model reply: {}", e);
            vec![EditOperation::error(e.to_string())]
        }
    }
}

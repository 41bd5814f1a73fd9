//! Strict parsing of model output into an email draft.

use serde::{Deserialize, Serialize};

use crate::provider::AiError;

/// A generated email draft, reviewed (and possibly edited) before sending.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailDraft {
    pub subject: String,
    pub text: String,
}

/// Parse a raw model response into a draft.
///
/// Models routinely wrap JSON in markdown code fences; those are stripped
/// first. Anything that still fails to parse — or parses to an empty subject
/// or body — is a typed error.
pub fn parse_draft(raw: &str) -> Result<EmailDraft, AiError> {
    let cleaned = strip_fences(raw);
    let draft: EmailDraft = serde_json::from_str(cleaned.trim())
        .map_err(|e| AiError::InvalidResponse(format!("draft is not valid JSON: {e}")))?;

    if draft.subject.trim().is_empty() {
        return Err(AiError::InvalidResponse("draft subject is empty".to_string()));
    }
    if draft.text.trim().is_empty() {
        return Err(AiError::InvalidResponse("draft body is empty".to_string()));
    }
    Ok(draft)
}

fn strip_fences(raw: &str) -> String {
    if raw.contains("```") {
        raw.replace("```json", "").replace("```", "")
    } else {
        raw.to_string()
    }
}

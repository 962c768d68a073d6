use anyhow::Result;
use serde::de::DeserializeOwned;

use super::types::{PromptHookInput, StatusRequest};

/// Parse a whole stdin payload as a single JSON document.
///
/// Surrounding whitespace is ignored. An empty payload is malformed JSON,
/// not an empty request.
fn parse_payload<T: DeserializeOwned>(raw: &str) -> Result<T, serde_json::Error> {
    serde_json::from_str(raw.trim())
}

/// Parse the statusLine request.
pub fn parse_request(raw: &str) -> Result<StatusRequest> {
    Ok(parse_payload(raw)?)
}

/// Parse the prompt hook payload.
pub fn parse_hook_input(raw: &str) -> Result<PromptHookInput, serde_json::Error> {
    parse_payload(raw)
}

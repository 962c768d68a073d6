use std::io::Write;

use tracing::warn;

use crate::prompt_store::PromptStore;
use crate::protocol::parse::parse_hook_input;

#[derive(Debug, thiserror::Error)]
pub enum HookError {
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Missing required fields. session_id: {}, prompt: {has_prompt}", .session_id.as_deref().unwrap_or("<missing>"))]
    MissingFields {
        session_id: Option<String>,
        has_prompt: bool,
    },
    #[error("Unexpected error: {0:#}")]
    Unexpected(#[from] anyhow::Error),
}

/// Persist the prompt from a UserPromptSubmit hook payload.
///
/// Every failure is also appended to the session's error log before it is
/// returned.
pub fn save_prompt(
    raw_input: &str,
    store: &PromptStore,
    writer: &mut impl Write,
) -> Result<(), HookError> {
    let input = parse_hook_input(raw_input).map_err(|e| record(store, None, e.into()))?;

    let session_id = input.session_id.as_deref().filter(|s| !s.is_empty());
    let prompt = input.prompt.as_deref().filter(|p| !p.is_empty());
    let (Some(id), Some(prompt)) = (session_id, prompt) else {
        let err = HookError::MissingFields {
            session_id: session_id.map(String::from),
            has_prompt: prompt.is_some(),
        };
        return Err(record(store, session_id, err));
    };

    store
        .write(id, prompt)
        .map_err(|e| record(store, Some(id), e.into()))?;
    writeln!(writer, "Saved prompt for session {id}")
        .map_err(|e| record(store, Some(id), anyhow::Error::from(e).into()))?;
    Ok(())
}

/// Log `err` to the session's error log and hand it back.
fn record(store: &PromptStore, session_id: Option<&str>, err: HookError) -> HookError {
    if let Err(log_err) = store.log_error(session_id, &err.to_string()) {
        warn!(error = %format!("{log_err:#}"), "failed to write hook error log");
    }
    err
}

use serde::Deserialize;

/// The statusLine payload Claude Code pipes to the status command.
///
/// Only the fields the line displays are modeled; everything else in the
/// payload (model, transcript path, workspace) is ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StatusRequest {
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub cwd: Option<String>,
    #[serde(default)]
    pub cost: Option<CostRecord>,
}

/// Aggregate cost summary for the session.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct CostRecord {
    #[serde(default)]
    pub total_cost_usd: Option<f64>,
}

impl StatusRequest {
    /// Total cost so far, with every missing level treated as zero.
    pub fn total_cost(&self) -> f64 {
        self.cost.and_then(|c| c.total_cost_usd).unwrap_or(0.0)
    }

    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref().filter(|s| !s.is_empty())
    }

    pub fn cwd(&self) -> Option<&str> {
        self.cwd.as_deref().filter(|s| !s.is_empty())
    }
}

/// The UserPromptSubmit hook payload consumed by `save-prompt`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PromptHookInput {
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub prompt: Option<String>,
}

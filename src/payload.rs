use serde::{Deserialize, Serialize};

/// Canonical request payload shape for the chat streaming endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    pub content: String,
    /// Default: true.
    #[serde(default = "default_true")]
    pub stream: bool,
    /// Opts the backend into its Wikipedia search tool for this turn.
    #[serde(default)]
    pub use_wikipedia_tool: bool,
}

fn default_true() -> bool {
    true
}

impl ChatRequest {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            stream: true,
            use_wikipedia_tool: false,
        }
    }

    #[must_use]
    pub fn with_wikipedia_tool(mut self, enabled: bool) -> Self {
        self.use_wikipedia_tool = enabled;
        self
    }
}

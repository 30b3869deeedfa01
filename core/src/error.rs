use thiserror::Error;

/// Failures raised at the tool layer.
///
/// Only [`ToolError::DuplicateTool`] ever reaches a caller of the session
/// surface. The others are turned into tool-result text by
/// [`ToolRegistry::dispatch`](crate::agent::ToolRegistry::dispatch) so the
/// model can see them and adapt.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ToolError {
    #[error("Tool '{0}' is already registered")]
    DuplicateTool(String),

    #[error("Tool '{0}' not found")]
    UnknownTool(String),

    #[error("Invalid arguments for tool '{tool}': {reason}")]
    InvalidArguments { tool: String, reason: String },

    #[error("Tool '{tool}' failed: {message}")]
    Execution { tool: String, message: String },
}

/// A saved transcript that breaks the tool call / tool reply pairing.
#[derive(Debug, Error)]
pub enum TranscriptError {
    #[error("message {index}: tool reply has no tool_call_id")]
    MissingToolCallId { index: usize },

    #[error("message {index}: tool reply '{id}' does not answer an open tool call")]
    OrphanToolReply { index: usize, id: String },

    #[error("message {index}: tool reply '{id}' is out of order, expected '{expected}'")]
    OutOfOrderToolReply {
        index: usize,
        id: String,
        expected: String,
    },

    #[error("message {index}: tool call '{id}' was never answered")]
    UnansweredToolCall { index: usize, id: String },

    #[error("message {index}: only assistant messages may carry tool calls")]
    MisplacedToolCalls { index: usize },

    #[error("invalid transcript JSON: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum AgentError {
    /// The completion API could not be reached or returned an unusable
    /// response. Never retried; the transcript keeps everything appended
    /// before the failure.
    #[error("Completion request failed: {0:#}")]
    Completion(#[source] anyhow::Error),

    #[error(transparent)]
    Transcript(#[from] TranscriptError),
}

impl AgentError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Completion(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_tool_message_names_the_tool() {
        let error = ToolError::UnknownTool("unknown_tool".into());
        assert_eq!(error.to_string(), "Tool 'unknown_tool' not found");
    }

    #[test]
    fn completion_failure_is_retryable() {
        let error = AgentError::Completion(anyhow::anyhow!("connection reset"));
        assert!(error.is_retryable());
        assert!(error.to_string().contains("connection reset"));

        let error = AgentError::from(TranscriptError::MissingToolCallId { index: 2 });
        assert!(!error.is_retryable());
    }
}

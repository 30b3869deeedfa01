use crate::agent::{Conversation, ToolRegistry};
use crate::error::AgentError;
use crate::traits::{ChatMessage, ChatRequest, ChatResponse, Provider, ToolCall};
use std::sync::Arc;
use tracing::{debug, info, warn};

pub const DEFAULT_MAX_TURNS: usize = 10;

#[derive(Debug)]
enum LoopState {
    AwaitModel,
    ExecuteTools(Vec<ToolCall>),
    Done,
    TurnExhausted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    /// The model answered without requesting tools.
    Completed,
    /// The turn budget ran out while the model was still calling tools.
    TurnBudgetExceeded,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RunOutcome {
    pub status: RunStatus,
    /// Completed tool rounds.
    pub turns: usize,
    /// Last assistant message appended by this run.
    pub reply: ChatMessage,
}

impl RunOutcome {
    pub fn is_exhausted(&self) -> bool {
        self.status == RunStatus::TurnBudgetExceeded
    }

    /// The final plain answer, absent when the budget was exhausted.
    pub fn answer(&self) -> Option<&str> {
        match self.status {
            RunStatus::Completed => Some(self.reply.text()),
            RunStatus::TurnBudgetExceeded => None,
        }
    }
}

/// Drives the exchange between the transcript, the completion API and the
/// tool registry.
///
/// Each `run` alternates between asking the model and resolving the tool
/// calls it requested, one call at a time in the order received, until the
/// model answers in plain text or `max_turns` tool rounds have completed.
/// The transcript outlives a single `run`; the next call continues it.
pub struct ConversationLoop {
    session_id: String,
    provider: Arc<dyn Provider>,
    tool_registry: Arc<ToolRegistry>,
    model: String,
    system_message: String,
    conversation: Conversation,
}

impl ConversationLoop {
    pub fn new(
        provider: Arc<dyn Provider>,
        tool_registry: Arc<ToolRegistry>,
        model: impl Into<String>,
        system_message: impl Into<String>,
    ) -> Self {
        Self {
            session_id: uuid::Uuid::new_v4().to_string(),
            provider,
            tool_registry,
            model: model.into(),
            system_message: system_message.into(),
            conversation: Conversation::new(),
        }
    }

    pub fn with_conversation(mut self, conversation: Conversation) -> Self {
        self.conversation = conversation;
        self
    }

    pub fn with_system_message(mut self, system_message: impl Into<String>) -> Self {
        self.system_message = system_message.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_tool_registry(mut self, tool_registry: Arc<ToolRegistry>) -> Self {
        self.tool_registry = tool_registry;
        self
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    pub fn tool_registry(&self) -> &Arc<ToolRegistry> {
        &self.tool_registry
    }

    /// Appends `task` as a user message and loops until the model stops
    /// calling tools or `max_turns` tool rounds have run.
    ///
    /// The model is always asked at least once, so a budget of zero behaves
    /// like a budget of one.
    pub async fn run(&mut self, task: &str, max_turns: usize) -> Result<RunOutcome, AgentError> {
        if self.conversation.is_empty() {
            self.conversation
                .push(ChatMessage::system(self.system_message.clone()));
        }
        self.conversation.push(ChatMessage::user(task));

        let mut turns = 0;
        let mut state = LoopState::AwaitModel;

        loop {
            debug!(session = %self.session_id, turn = turns, state = ?state, "Loop transition");

            state = match state {
                LoopState::AwaitModel => {
                    let response = self.request_completion().await?;
                    self.record_response(response)
                }
                LoopState::ExecuteTools(calls) => {
                    self.execute_tools(calls).await;
                    turns += 1;
                    if turns < max_turns {
                        LoopState::AwaitModel
                    } else {
                        LoopState::TurnExhausted
                    }
                }
                LoopState::Done => {
                    info!(session = %self.session_id, turns, "Run completed");
                    return Ok(self.outcome(RunStatus::Completed, turns));
                }
                LoopState::TurnExhausted => {
                    warn!(session = %self.session_id, turns, max_turns, "Turn budget exhausted");
                    return Ok(self.outcome(RunStatus::TurnBudgetExceeded, turns));
                }
            };
        }
    }

    async fn request_completion(&self) -> Result<ChatResponse, AgentError> {
        let declarations = self.tool_registry.declarations();
        let request = ChatRequest {
            model: &self.model,
            messages: self.conversation.messages(),
            tools: if declarations.is_empty() {
                None
            } else {
                Some(declarations.as_slice())
            },
        };

        self.provider
            .chat(request)
            .await
            .map_err(AgentError::Completion)
    }

    fn record_response(&mut self, response: ChatResponse) -> LoopState {
        if response.has_tool_calls() {
            let calls = response.tool_calls.clone();
            self.conversation.push(ChatMessage::assistant_with_tool_calls(
                response.text,
                response.tool_calls,
            ));
            LoopState::ExecuteTools(calls)
        } else {
            self.conversation
                .push(ChatMessage::assistant(response.text.unwrap_or_default()));
            LoopState::Done
        }
    }

    async fn execute_tools(&mut self, calls: Vec<ToolCall>) {
        for call in calls {
            debug!(
                session = %self.session_id,
                tool = %call.name,
                call_id = %call.id,
                "Dispatching tool call"
            );
            let output = self
                .tool_registry
                .dispatch(&call.name, &call.arguments)
                .await;
            self.conversation
                .push(ChatMessage::tool_result(call.id, output));
        }
    }

    fn outcome(&self, status: RunStatus, turns: usize) -> RunOutcome {
        let reply = self
            .conversation
            .last_assistant()
            .cloned()
            .unwrap_or_else(|| ChatMessage::assistant(""));
        RunOutcome {
            status,
            turns,
            reply,
        }
    }
}

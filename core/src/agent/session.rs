use crate::agent::loop_::DEFAULT_MAX_TURNS;
use crate::agent::{ContextBuilder, Conversation, ConversationLoop, RunOutcome, ToolRegistry};
use crate::error::{AgentError, ToolError};
use crate::traits::{ChatMessage, Provider, Tool};
use std::sync::Arc;

pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// An agent session: an objective, the tools it may use and the transcript
/// of everything said so far.
///
/// Sessions live in memory only. To continue a conversation elsewhere,
/// serialize [`Agent::transcript`] and hand it to [`Agent::with_transcript`].
pub struct Agent {
    context: ContextBuilder,
    max_turns: usize,
    conversation_loop: ConversationLoop,
}

impl Agent {
    pub fn new(objective: impl Into<String>, provider: Arc<dyn Provider>) -> Self {
        let context = ContextBuilder::new(objective);
        let conversation_loop = ConversationLoop::new(
            provider,
            Arc::new(ToolRegistry::new()),
            DEFAULT_MODEL,
            context.build_system_prompt(),
        );

        Self {
            context,
            max_turns: DEFAULT_MAX_TURNS,
            conversation_loop,
        }
    }

    pub fn create(
        objective: impl Into<String>,
        model: impl Into<String>,
        system_message: Option<String>,
        provider: Arc<dyn Provider>,
    ) -> Self {
        let agent = Self::new(objective, provider).with_model(model);
        match system_message {
            Some(message) => agent.with_system_message(message),
            None => agent,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.conversation_loop = self.conversation_loop.with_model(model);
        self
    }

    pub fn with_system_message(mut self, system_message: impl Into<String>) -> Self {
        self.context = self.context.with_system_message(system_message);
        self.conversation_loop = self
            .conversation_loop
            .with_system_message(self.context.build_system_prompt());
        self
    }

    /// Shares an existing registry, possibly with other sessions.
    pub fn with_tool_registry(mut self, tool_registry: Arc<ToolRegistry>) -> Self {
        self.conversation_loop = self.conversation_loop.with_tool_registry(tool_registry);
        self
    }

    /// Default budget for [`Agent::send_message`].
    pub fn with_max_turns(mut self, max_turns: usize) -> Self {
        self.max_turns = max_turns;
        self
    }

    /// Continues from a previously exported transcript. A non-empty
    /// transcript already carries its system message, so none is added.
    pub fn with_transcript(mut self, transcript: Conversation) -> Self {
        self.conversation_loop = self.conversation_loop.with_conversation(transcript);
        self
    }

    pub fn add_tool(&self, tool: Box<dyn Tool>) -> Result<(), ToolError> {
        self.conversation_loop.tool_registry().register(tool)
    }

    pub async fn run(&mut self, task: &str, max_turns: usize) -> Result<RunOutcome, AgentError> {
        self.conversation_loop.run(task, max_turns).await
    }

    /// Sends one user message and resolves any tool calls it triggers,
    /// returning the last assistant message.
    pub async fn send_message(&mut self, text: &str) -> Result<ChatMessage, AgentError> {
        let outcome = self.run(text, self.max_turns).await?;
        Ok(outcome.reply)
    }

    pub fn objective(&self) -> &str {
        &self.context.objective
    }

    pub fn system_message(&self) -> String {
        self.context.build_system_prompt()
    }

    pub fn model(&self) -> &str {
        self.conversation_loop.model()
    }

    pub fn max_turns(&self) -> usize {
        self.max_turns
    }

    pub fn session_id(&self) -> &str {
        self.conversation_loop.session_id()
    }

    pub fn tool_registry(&self) -> &Arc<ToolRegistry> {
        self.conversation_loop.tool_registry()
    }

    pub fn transcript(&self) -> &Conversation {
        self.conversation_loop.conversation()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::ScriptedProvider;
    use crate::tools::Calculator;
    use crate::traits::{ChatResponse, Role, ToolCall};

    fn calculator_call(id: &str) -> ChatResponse {
        ChatResponse::from_tool_calls(vec![ToolCall {
            id: id.into(),
            name: "calculator".into(),
            arguments: r#"{"operation":"multiply","a":25,"b":13}"#.into(),
        }])
    }

    #[tokio::test]
    async fn first_message_is_seeded_with_objective() {
        let provider = Arc::new(ScriptedProvider::new(vec![ChatResponse::from_text("hi")]));
        let mut agent = Agent::new("Help with maths", provider);

        agent.send_message("hello").await.unwrap();

        let first = &agent.transcript().messages()[0];
        assert_eq!(first.role, Role::System);
        assert!(first.text().contains("objective: Help with maths"));
    }

    #[tokio::test]
    async fn create_applies_model_and_system_override() {
        let provider = Arc::new(ScriptedProvider::new(vec![ChatResponse::from_text("ok")]));
        let mut agent = Agent::create(
            "anything",
            "gpt-4o",
            Some("Answer tersely.".to_string()),
            provider.clone(),
        );

        agent.send_message("hi").await.unwrap();

        assert_eq!(agent.model(), "gpt-4o");
        assert_eq!(agent.transcript().messages()[0].text(), "Answer tersely.");
        assert!(provider.requests()[0].contains("\"model\":\"gpt-4o\""));
    }

    #[test]
    fn add_tool_rejects_duplicates() {
        let provider = Arc::new(ScriptedProvider::new(vec![]));
        let agent = Agent::new("maths", provider);

        agent.add_tool(Box::new(Calculator)).unwrap();
        let err = agent.add_tool(Box::new(Calculator)).unwrap_err();

        assert_eq!(err, ToolError::DuplicateTool("calculator".into()));
        assert_eq!(agent.tool_registry().len(), 1);
    }

    #[tokio::test]
    async fn send_message_resolves_tools_before_replying() {
        let provider = Arc::new(ScriptedProvider::new(vec![
            calculator_call("call_1"),
            ChatResponse::from_text("25 * 13 = 325"),
        ]));
        let mut agent = Agent::new("maths", provider);
        agent.add_tool(Box::new(Calculator)).unwrap();

        let reply = agent.send_message("Calculate 25 * 13").await.unwrap();

        assert_eq!(reply.text(), "25 * 13 = 325");
        assert_eq!(agent.transcript().messages()[3].text(), "325");
    }

    #[tokio::test]
    async fn send_message_uses_configured_budget() {
        let provider = Arc::new(ScriptedProvider::repeating(calculator_call("call_1")));
        let mut agent = Agent::new("maths", provider.clone()).with_max_turns(2);
        agent.add_tool(Box::new(Calculator)).unwrap();

        let reply = agent.send_message("loop forever").await.unwrap();

        assert_eq!(provider.request_count(), 2);
        assert_eq!(reply.requested_tool_calls().len(), 1);
    }

    #[tokio::test]
    async fn restored_transcript_produces_identical_next_request() {
        let original_provider = Arc::new(ScriptedProvider::new(vec![
            calculator_call("call_1"),
            ChatResponse::from_text("325"),
            ChatResponse::from_text("You're welcome"),
        ]));
        let mut original = Agent::new("maths", original_provider.clone());
        original.add_tool(Box::new(Calculator)).unwrap();

        original.send_message("Calculate 25 * 13").await.unwrap();
        let saved = original.transcript().to_json().unwrap();
        original.send_message("Thanks").await.unwrap();

        let restored_provider = Arc::new(ScriptedProvider::new(vec![ChatResponse::from_text(
            "You're welcome",
        )]));
        let mut restored = Agent::new("maths", restored_provider.clone())
            .with_transcript(Conversation::from_json(&saved).unwrap());
        restored.add_tool(Box::new(Calculator)).unwrap();

        restored.send_message("Thanks").await.unwrap();

        assert_eq!(
            restored_provider.requests()[0],
            original_provider.requests()[2]
        );
        assert_eq!(restored.transcript(), original.transcript());
    }

    #[tokio::test]
    async fn registry_can_be_shared_between_sessions() {
        let registry = Arc::new(ToolRegistry::new());
        registry.register(Box::new(Calculator)).unwrap();

        let first_provider = Arc::new(ScriptedProvider::new(vec![
            calculator_call("call_1"),
            ChatResponse::from_text("325"),
        ]));
        let second_provider = Arc::new(ScriptedProvider::new(vec![ChatResponse::from_text(
            "hello",
        )]));

        let mut first = Agent::new("maths", first_provider).with_tool_registry(registry.clone());
        let mut second = Agent::new("chat", second_provider).with_tool_registry(registry);

        first.send_message("Calculate 25 * 13").await.unwrap();
        second.send_message("hi").await.unwrap();

        assert_eq!(first.transcript().len(), 5);
        assert_eq!(second.transcript().len(), 3);
        assert_ne!(first.session_id(), second.session_id());
    }
}

/// Builds the system message that seeds a fresh transcript.
#[derive(Debug, Clone)]
pub struct ContextBuilder {
    pub objective: String,
    pub system_message: Option<String>,
}

impl ContextBuilder {
    pub fn new(objective: impl Into<String>) -> Self {
        Self {
            objective: objective.into(),
            system_message: None,
        }
    }

    pub fn with_system_message(mut self, system_message: impl Into<String>) -> Self {
        self.system_message = Some(system_message.into());
        self
    }

    /// An explicit, non-blank override wins; otherwise the objective is
    /// folded into the default instructions.
    pub fn build_system_prompt(&self) -> String {
        match self.system_message.as_deref() {
            Some(message) if !message.trim().is_empty() => message.to_string(),
            _ => format!(
                "You are a helpful AI assistant with the objective: {}. Think step by step to achieve the objective.",
                self.objective.trim()
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_prompt_mentions_objective() {
        let context = ContextBuilder::new("Help the user solve problems using available tools");
        assert_eq!(
            context.build_system_prompt(),
            "You are a helpful AI assistant with the objective: Help the user solve problems using available tools. Think step by step to achieve the objective."
        );
    }

    #[test]
    fn override_replaces_default_prompt() {
        let context = ContextBuilder::new("anything").with_system_message("You only speak French.");
        assert_eq!(context.build_system_prompt(), "You only speak French.");
    }

    #[test]
    fn blank_override_falls_back_to_default() {
        let context = ContextBuilder::new("count sheep").with_system_message("   ");
        assert!(context.build_system_prompt().contains("count sheep"));
    }
}

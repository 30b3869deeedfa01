pub mod provider;
pub mod tool;

pub use provider::{ChatMessage, ChatRequest, ChatResponse, Provider, Role, ToolCall};
pub use tool::{FunctionDeclaration, Tool, ToolDeclaration, ToolSpec};

pub mod agent;
pub mod config;
pub mod error;
pub mod providers;
pub mod tools;
pub mod traits;

pub use agent::{
    Agent, ContextBuilder, Conversation, ConversationLoop, RunOutcome, RunStatus, ToolRegistry,
};
pub use config::*;
pub use error::{AgentError, ToolError, TranscriptError};
pub use providers::*;
pub use tools::*;
pub use traits::*;

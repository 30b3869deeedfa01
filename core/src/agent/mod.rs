pub mod context;
pub mod conversation;
pub mod loop_;
pub mod registry;
pub mod schema;
pub mod session;

pub use context::ContextBuilder;
pub use conversation::Conversation;
pub use loop_::{ConversationLoop, DEFAULT_MAX_TURNS, RunOutcome, RunStatus};
pub use registry::ToolRegistry;
pub use session::{Agent, DEFAULT_MODEL};

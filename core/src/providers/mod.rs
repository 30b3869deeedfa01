pub mod factory;
pub mod mock;
pub mod openai;

pub use factory::{AVAILABLE_PROVIDERS, create_provider};
pub use mock::ScriptedProvider;
pub use openai::OpenAIProvider;

use crate::agent::schema;
use crate::error::ToolError;
use crate::traits::{Tool, ToolDeclaration, ToolSpec};
use futures_util::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::{debug, warn};

/// Tools available to a session, kept in registration order.
///
/// Registration goes through `&self` so a registry behind an `Arc` can be
/// shared by several sessions; dispatch only ever reads.
pub struct ToolRegistry {
    tools: RwLock<Vec<Arc<dyn Tool>>>,
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            tools: RwLock::new(Vec::new()),
        }
    }

    pub fn register(&self, tool: Box<dyn Tool>) -> Result<(), ToolError> {
        let mut tools = self.tools.write().unwrap_or_else(PoisonError::into_inner);
        if tools.iter().any(|t| t.name() == tool.name()) {
            return Err(ToolError::DuplicateTool(tool.name().to_string()));
        }
        debug!(tool = tool.name(), "Registered tool");
        tools.push(Arc::from(tool));
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        let tools = self.tools.read().unwrap_or_else(PoisonError::into_inner);
        tools.iter().find(|t| t.name() == name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.tools.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get_specs(&self) -> Vec<ToolSpec> {
        let tools = self.tools.read().unwrap_or_else(PoisonError::into_inner);
        tools.iter().map(|t| t.spec()).collect()
    }

    pub fn declarations(&self) -> Vec<ToolDeclaration> {
        self.get_specs()
            .into_iter()
            .map(ToolDeclaration::from)
            .collect()
    }

    /// Runs a tool and always yields text for the transcript. Lookup,
    /// validation and execution failures are rendered as `Error: ...`.
    pub async fn dispatch(&self, name: &str, raw_arguments: &str) -> String {
        match self.try_dispatch(name, raw_arguments).await {
            Ok(output) => output,
            Err(e) => {
                warn!(tool = name, error = %e, "Tool dispatch failed");
                format!("Error: {}", e)
            }
        }
    }

    pub async fn try_dispatch(&self, name: &str, raw_arguments: &str) -> Result<String, ToolError> {
        let tool = self
            .get(name)
            .ok_or_else(|| ToolError::UnknownTool(name.to_string()))?;

        let args = schema::parse_arguments(&tool.parameters_schema(), raw_arguments).map_err(
            |reason| ToolError::InvalidArguments {
                tool: name.to_string(),
                reason,
            },
        )?;

        match AssertUnwindSafe(tool.execute(args)).catch_unwind().await {
            Ok(Ok(output)) => Ok(output),
            Ok(Err(e)) => Err(ToolError::Execution {
                tool: name.to_string(),
                message: format!("{:#}", e),
            }),
            Err(panic) => Err(ToolError::Execution {
                tool: name.to_string(),
                message: panic_message(panic.as_ref()),
            }),
        }
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        format!("panicked: {}", message)
    } else if let Some(message) = panic.downcast_ref::<String>() {
        format!("panicked: {}", message)
    } else {
        "panicked".to_string()
    }
}

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolSpec {
    pub name: String,
    pub description: String,
    pub parameters_schema: serde_json::Value,
}

/// A tool as declared to the completion API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDeclaration {
    #[serde(rename = "type")]
    pub kind: String,
    pub function: FunctionDeclaration,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionDeclaration {
    pub name: String,
    pub description: String,
    pub parameters: serde_json::Value,
}

impl From<ToolSpec> for ToolDeclaration {
    fn from(spec: ToolSpec) -> Self {
        Self {
            kind: "function".to_string(),
            function: FunctionDeclaration {
                name: spec.name,
                description: spec.description,
                parameters: spec.parameters_schema,
            },
        }
    }
}

/// The single contract every tool implements.
///
/// `execute` receives arguments that already passed validation against
/// `parameters_schema`. Implementations should report their own failures as
/// descriptive text; an `Err` is still caught by the registry and turned into
/// text for the model.
#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &str;

    fn description(&self) -> &str;

    fn parameters_schema(&self) -> serde_json::Value;

    async fn execute(&self, args: serde_json::Value) -> anyhow::Result<String>;

    fn spec(&self) -> ToolSpec {
        ToolSpec {
            name: self.name().to_string(),
            description: self.description().to_string(),
            parameters_schema: self.parameters_schema(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn declaration_uses_function_wire_shape() {
        let spec = ToolSpec {
            name: "calculator".into(),
            description: "Perform simple arithmetic calculations".into(),
            parameters_schema: json!({"type": "object"}),
        };

        let value = serde_json::to_value(ToolDeclaration::from(spec)).unwrap();
        assert_eq!(
            value,
            json!({
                "type": "function",
                "function": {
                    "name": "calculator",
                    "description": "Perform simple arithmetic calculations",
                    "parameters": {"type": "object"}
                }
            })
        );
    }
}

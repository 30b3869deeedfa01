use crate::tools::{extract_f64_arg, extract_string_arg};
use crate::traits::Tool;
use async_trait::async_trait;
use serde_json::json;

pub struct Calculator;

#[async_trait]
impl Tool for Calculator {
    fn name(&self) -> &str {
        "calculator"
    }

    fn description(&self) -> &str {
        "Perform simple arithmetic calculations"
    }

    fn parameters_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "operation": {
                    "type": "string",
                    "enum": ["add", "subtract", "multiply", "divide"],
                    "description": "The arithmetic operation to perform"
                },
                "a": {
                    "type": "number",
                    "description": "The first number"
                },
                "b": {
                    "type": "number",
                    "description": "The second number"
                }
            },
            "required": ["operation", "a", "b"]
        })
    }

    async fn execute(&self, args: serde_json::Value) -> anyhow::Result<String> {
        let operation = extract_string_arg(&args, "operation")?;
        let a = extract_f64_arg(&args, "a")?;
        let b = extract_f64_arg(&args, "b")?;

        let result = match operation.as_str() {
            "add" => a + b,
            "subtract" => a - b,
            "multiply" => a * b,
            "divide" => {
                if b == 0.0 {
                    return Ok("Error: Division by zero".to_string());
                }
                a / b
            }
            other => return Ok(format!("Error: Unknown operation {}", other)),
        };

        Ok(format_number(result))
    }
}

/// Renders whole numbers without a fractional part (`325`, not `325.0`).
pub fn format_number(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

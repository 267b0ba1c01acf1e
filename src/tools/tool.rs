use std::{collections::BTreeMap, fmt, future::Future, pin::Pin, sync::Arc};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use super::errors::ToolExecutionError;

/// Defines the type of tool available. Currently, only 'function' is supported.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ToolType {
    Function,
}

/// Signature for an asynchronous tool executor function.
///
/// Accepts a JSON [`Value`] of arguments and produces a `String` result
/// or a [`ToolExecutionError`] if execution fails.
pub type AsyncToolFn = Arc<dyn Fn(Value) -> ToolFuture + Send + Sync>;

/// Boxed future returned by a tool executor.
pub type ToolFuture = Pin<Box<dyn Future<Output = Result<String, ToolExecutionError>> + Send>>;

/// A function the agent runtime may call, with its schema and executor.
#[derive(Serialize, Clone)]
pub struct Tool {
    #[serde(rename = "type")]
    pub tool_type: ToolType,
    pub function: Function,
    #[serde(skip)]
    pub executor: AsyncToolFn,
}

impl fmt::Debug for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tool")
            .field("tool_type", &self.tool_type)
            .field("function", &self.function)
            .field("executor", &"<async_fn>")
            .finish()
    }
}

impl Tool {
    /// Run the executor with `args`.
    pub async fn execute(&self, args: Value) -> Result<String, ToolExecutionError> {
        (self.executor)(args).await
    }

    /// Run the executor and render failures as the `Error ...` string the
    /// runtime expects back from a tool.
    pub async fn call(&self, args: Value) -> String {
        match self.execute(args).await {
            Ok(out) => {
                info!(target: "tool", tool = self.name(), "tool call succeeded");
                out
            }
            Err(e) => {
                warn!(target: "tool", tool = self.name(), error = %e, "tool call failed");
                e.to_string()
            }
        }
    }

    /// Gets the name of the tool from its function definition.
    pub fn name(&self) -> &str {
        &self.function.name
    }
}

/// Defines a function, its description, and its arguments.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Function {
    pub name: String,
    pub description: String,
    pub parameters: FunctionParameters,
}

/// Defines the arguments for a function using a JSON schema-like structure.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct FunctionParameters {
    #[serde(rename = "type")]
    pub param_type: String,
    pub properties: BTreeMap<String, Property>,
    pub required: Vec<String>,
}

/// Defines a single property within function arguments.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Property {
    #[serde(rename = "type")]
    pub property_type: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    #[serde(rename = "enum", default, skip_serializing_if = "Option::is_none")]
    pub allowed_values: Option<Vec<String>>,
}

/// A tool call as sent by the agent runtime.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ToolCall {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Some runtimes omit the type, so it defaults to [`ToolType::Function`].
    #[serde(rename = "type", default = "default_tool_call_type")]
    pub tool_type: ToolType,
    pub function: ToolCallFunction,
}

fn default_tool_call_type() -> ToolType {
    ToolType::Function
}

/// Contains the name and arguments for a function call.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ToolCallFunction {
    pub name: String,
    #[serde(default)]
    pub arguments: Value,
}

impl ToolCall {
    pub fn new(name: impl Into<String>, arguments: Value) -> Self {
        Self {
            id: None,
            tool_type: ToolType::Function,
            function: ToolCallFunction {
                name: name.into(),
                arguments,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::ToolBuilder;
    use serde_json::json;

    fn failing_tool() -> Tool {
        ToolBuilder::new()
            .function_name("always_fails")
            .function_description("Fails every time")
            .executor(Arc::new(|_: Value| -> ToolFuture {
                Box::pin(async { Err(ToolExecutionError::ExecutionFailed("boom".into())) })
            }))
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn call_renders_errors_as_strings() {
        let out = failing_tool().call(json!({})).await;
        assert_eq!(out, "Error boom");
    }

    #[test]
    fn tool_serializes_without_executor() {
        let value = serde_json::to_value(failing_tool()).unwrap();
        assert_eq!(value["type"], "function");
        assert_eq!(value["function"]["name"], "always_fails");
        assert!(value.get("executor").is_none());
    }

    #[test]
    fn tool_call_defaults_missing_type() {
        let call: ToolCall =
            serde_json::from_value(json!({"function": {"name": "x", "arguments": {"a": 1}}}))
                .unwrap();
        assert_eq!(call.tool_type, ToolType::Function);
        assert_eq!(call.function.arguments["a"], 1);
    }
}

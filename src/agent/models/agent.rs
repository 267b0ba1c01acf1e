use core::fmt;

use serde::Serialize;
use serde_json::{json, Value};
use tracing::instrument;

use crate::tools::{Tool, ToolCall, ToolExecutionError};

/// Capabilities the agent runtime provides itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BuiltinTool {
    GoogleSearch,
}

impl BuiltinTool {
    pub fn name(&self) -> &'static str {
        match self {
            BuiltinTool::GoogleSearch => "google_search",
        }
    }
}

/// A tool as it appears in an agent's roster.
#[derive(Debug, Clone)]
pub enum AgentTool {
    /// Executed in this process.
    Function(Tool),
    /// Resolved by the runtime; only referenced by name.
    Builtin(BuiltinTool),
}

impl AgentTool {
    pub fn name(&self) -> &str {
        match self {
            AgentTool::Function(tool) => tool.name(),
            AgentTool::Builtin(builtin) => builtin.name(),
        }
    }

    fn manifest(&self) -> Value {
        match self {
            AgentTool::Function(tool) => serde_json::to_value(tool)
                .unwrap_or_else(|e| json!({"name": tool.name(), "error": e.to_string()})),
            AgentTool::Builtin(builtin) => json!({"type": "builtin", "name": builtin.name()}),
        }
    }
}

impl From<Tool> for AgentTool {
    fn from(tool: Tool) -> Self {
        AgentTool::Function(tool)
    }
}

impl From<BuiltinTool> for AgentTool {
    fn from(builtin: BuiltinTool) -> Self {
        AgentTool::Builtin(builtin)
    }
}

/// Declarative description of an agent handed to an external runtime.
///
/// The runtime owns the conversation loop. This crate only supplies the
/// instruction, the model name and the tools, and executes function tools when
/// the runtime calls back with a [`ToolCall`].
#[derive(Clone)]
pub struct AgentDefinition {
    /// Unique agent name.
    pub name: String,
    /// Model identifier the runtime should run the agent on.
    pub model: String,
    pub description: String,
    /// Compiled system instruction.
    pub instruction: String,
    pub tools: Vec<AgentTool>,
}

impl AgentDefinition {
    /// JSON description of the agent for the runtime.
    pub fn manifest(&self) -> Value {
        json!({
            "name": self.name,
            "model": self.model,
            "description": self.description,
            "instruction": self.instruction,
            "tools": self.tools.iter().map(AgentTool::manifest).collect::<Vec<_>>(),
        })
    }

    pub fn tool_names(&self) -> Vec<&str> {
        self.tools.iter().map(AgentTool::name).collect()
    }

    /// Find a tool reference by name, if it exists.
    pub fn get_tool_ref_by_name<T>(&self, name: T) -> Option<&AgentTool>
    where
        T: AsRef<str>,
    {
        let name = name.as_ref();
        self.tools.iter().find(|tool| tool.name() == name)
    }

    /// Dispatch a runtime tool call to the matching function tool.
    #[instrument(level = "debug", skip(self, call), fields(agent = %self.name, tool = %call.function.name))]
    pub async fn invoke_tool(&self, call: &ToolCall) -> Result<String, ToolExecutionError> {
        match self.get_tool_ref_by_name(&call.function.name) {
            Some(AgentTool::Function(tool)) => tool.execute(call.function.arguments.clone()).await,
            Some(AgentTool::Builtin(builtin)) => Err(ToolExecutionError::RuntimeProvided(
                builtin.name().to_string(),
            )),
            None => Err(ToolExecutionError::ToolNotFound(call.function.name.clone())),
        }
    }

    /// Like [`invoke_tool`](Self::invoke_tool) but renders failures as the
    /// `Error ...` string the runtime expects.
    pub async fn call_tool(&self, call: &ToolCall) -> String {
        match self.get_tool_ref_by_name(&call.function.name) {
            Some(AgentTool::Function(tool)) => tool.call(call.function.arguments.clone()).await,
            _ => match self.invoke_tool(call).await {
                Ok(out) => out,
                Err(e) => e.to_string(),
            },
        }
    }
}

impl fmt::Debug for AgentDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AgentDefinition")
            .field("name", &self.name)
            .field("model", &self.model)
            .field("description", &self.description)
            .field("tools", &self.tool_names())
            .finish()
    }
}

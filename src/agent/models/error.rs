use crate::tools::ToolBuilderError;

/// Errors that can occur while building an [`AgentDefinition`](super::AgentDefinition).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AgentBuildError {
    /// Required name was not set on the builder.
    NameNotSet,
    /// Required model was not set on the builder.
    ModelNotSet,
    /// Neither an instruction nor an instruction template was set.
    InstructionNotSet,
    /// Two tools share a name.
    DuplicateTool(String),
    /// A tool definition could not be built.
    Tool(ToolBuilderError),
}

impl std::fmt::Display for AgentBuildError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AgentBuildError::NameNotSet => write!(f, "Agent name not set."),
            AgentBuildError::ModelNotSet => write!(f, "Model not set."),
            AgentBuildError::InstructionNotSet => write!(f, "Instruction not set."),
            AgentBuildError::DuplicateTool(name) => {
                write!(f, "Tool '{name}' is registered more than once.")
            }
            AgentBuildError::Tool(e) => write!(f, "Tool build error: {e}"),
        }
    }
}

impl std::error::Error for AgentBuildError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AgentBuildError::Tool(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ToolBuilderError> for AgentBuildError {
    fn from(err: ToolBuilderError) -> Self {
        AgentBuildError::Tool(err)
    }
}

/// Errors that can occur while executing a tool.
///
/// The rendered message always starts with `Error`, which is how the
/// agent runtime tells a failed tool call from a successful one.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolExecutionError {
    /// The provided arguments could not be parsed or were invalid.
    ArgumentParsingError(String),
    /// The tool failed while running.
    ExecutionFailed(String),
    /// No tool with this name is registered on the agent.
    ToolNotFound(String),
    /// The tool is a built-in of the agent runtime and cannot run locally.
    RuntimeProvided(String),
}

impl std::fmt::Display for ToolExecutionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ToolExecutionError::ArgumentParsingError(s) => {
                write!(f, "Error: invalid tool arguments: {s}")
            }
            ToolExecutionError::ExecutionFailed(s) => write!(f, "Error {s}"),
            ToolExecutionError::ToolNotFound(s) => write!(f, "Error: tool not found: {s}"),
            ToolExecutionError::RuntimeProvided(s) => {
                write!(f, "Error: '{s}' is executed by the agent runtime")
            }
        }
    }
}

impl std::error::Error for ToolExecutionError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_variant_renders_with_error_prefix() {
        let errors = [
            ToolExecutionError::ArgumentParsingError("missing 'query'".into()),
            ToolExecutionError::ExecutionFailed("storing document: boom".into()),
            ToolExecutionError::ToolNotFound("nope".into()),
            ToolExecutionError::RuntimeProvided("google_search".into()),
        ];
        for err in errors {
            assert!(err.to_string().starts_with("Error"), "{err}");
        }
    }
}

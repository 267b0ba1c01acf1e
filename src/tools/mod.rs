pub mod args;
pub mod document_tools;
mod errors;
pub mod status_tools;
mod tool;
mod tool_builder;

pub use document_tools::{crud_tools, document_tools};
pub use errors::ToolExecutionError;
pub use status_tools::{status_tools, StatusEnvelope};
pub use tool::{
    AsyncToolFn, Function, FunctionParameters, Property, Tool, ToolCall, ToolCallFunction,
    ToolFuture, ToolType,
};
pub use tool_builder::{ToolBuilder, ToolBuilderError};

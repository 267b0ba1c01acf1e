use crate::{documents::DocumentError, services::search::SearchError};

use super::WorkflowKind;

/// Failure of a single workflow step.
#[derive(Debug)]
pub enum StepError {
    Document(DocumentError),
    Search(SearchError),
    InvalidArgument(String),
    Encoding(serde_json::Error),
}

impl std::fmt::Display for StepError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StepError::Document(e) => write!(f, "{e}"),
            StepError::Search(e) => write!(f, "{e}"),
            StepError::InvalidArgument(s) => write!(f, "Invalid argument: {s}"),
            StepError::Encoding(e) => write!(f, "Encoding error: {e}"),
        }
    }
}

impl std::error::Error for StepError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StepError::Document(e) => Some(e),
            StepError::Search(e) => Some(e),
            StepError::Encoding(e) => Some(e),
            StepError::InvalidArgument(_) => None,
        }
    }
}

impl From<DocumentError> for StepError {
    fn from(err: DocumentError) -> Self {
        StepError::Document(err)
    }
}

impl From<SearchError> for StepError {
    fn from(err: SearchError) -> Self {
        StepError::Search(err)
    }
}

impl From<serde_json::Error> for StepError {
    fn from(err: serde_json::Error) -> Self {
        StepError::Encoding(err)
    }
}

/// A workflow aborted at `step`.
#[derive(Debug)]
pub struct CoordinationError {
    /// Failure label such as `research_pipeline_failed`.
    pub workflow: String,
    pub step: String,
    pub source: StepError,
}

impl CoordinationError {
    pub(crate) fn new(kind: WorkflowKind, step: &str, source: StepError) -> Self {
        Self {
            workflow: kind.failure_label().to_string(),
            step: step.to_string(),
            source,
        }
    }
}

impl std::fmt::Display for CoordinationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} step failed: {}", self.step, self.source)
    }
}

impl std::error::Error for CoordinationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}

use crate::services::mongo::StoreError;

/// Errors returned by document operations.
#[derive(Debug)]
pub enum DocumentError {
    /// Input that had to be JSON could not be parsed.
    InvalidJson(String),
    /// An update or upsert payload lacked object-valued `filter` / `update` keys.
    InvalidUpdatePayload,
    /// The requested write operation is not one of insert, update, upsert.
    UnsupportedOperation(String),
    /// Deleting with `{}` would wipe the collection.
    EmptyDeleteFilter,
    /// A caller-supplied argument is out of range or empty.
    InvalidArgument(String),
    /// The database round trip failed.
    Store(StoreError),
}

impl std::fmt::Display for DocumentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DocumentError::InvalidJson(s) => write!(f, "Invalid JSON: {s}"),
            DocumentError::InvalidUpdatePayload => {
                write!(f, "update payload must contain 'filter' and 'update' keys")
            }
            DocumentError::UnsupportedOperation(op) => {
                write!(f, "Unsupported operation '{op}'. Use insert, update, or upsert")
            }
            DocumentError::EmptyDeleteFilter => {
                write!(f, "refusing to delete with an empty filter")
            }
            DocumentError::InvalidArgument(s) => write!(f, "Invalid argument: {s}"),
            DocumentError::Store(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for DocumentError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DocumentError::Store(e) => Some(e),
            _ => None,
        }
    }
}

impl From<StoreError> for DocumentError {
    fn from(err: StoreError) -> Self {
        DocumentError::Store(err)
    }
}

impl From<mongodb::error::Error> for DocumentError {
    fn from(err: mongodb::error::Error) -> Self {
        DocumentError::Store(StoreError::Driver(err))
    }
}

impl From<serde_json::Error> for DocumentError {
    fn from(err: serde_json::Error) -> Self {
        DocumentError::InvalidJson(err.to_string())
    }
}

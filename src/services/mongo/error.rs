/// Errors raised by the MongoDB connection layer.
#[derive(Debug)]
pub enum StoreError {
    /// The connection string or client options were rejected.
    Config(String),
    /// The server could not be reached or did not answer the ping.
    Connection(String),
    /// A driver call failed after the connection was established.
    Driver(mongodb::error::Error),
    /// A value could not be converted between JSON and BSON.
    Conversion(String),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::Config(s) => write!(f, "Store config error: {s}"),
            StoreError::Connection(s) => write!(f, "Could not connect to MongoDB: {s}"),
            StoreError::Driver(e) => write!(f, "MongoDB error: {e}"),
            StoreError::Conversion(s) => write!(f, "Conversion error: {s}"),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::Driver(e) => Some(e),
            _ => None,
        }
    }
}

impl From<mongodb::error::Error> for StoreError {
    fn from(err: mongodb::error::Error) -> Self {
        StoreError::Driver(err)
    }
}

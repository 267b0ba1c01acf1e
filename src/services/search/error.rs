#[derive(Debug)]
pub enum SearchError {
    Config(String),
    Request(String),
    Api(String),
    Serialization(String),
}

impl std::fmt::Display for SearchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SearchError::Config(s) => write!(f, "Search config error: {s}"),
            SearchError::Request(s) => write!(f, "Search request error: {s}"),
            SearchError::Api(s) => write!(f, "Search API error: {s}"),
            SearchError::Serialization(s) => write!(f, "Search response error: {s}"),
        }
    }
}

impl std::error::Error for SearchError {}

impl From<reqwest::Error> for SearchError {
    fn from(err: reqwest::Error) -> Self {
        SearchError::Request(err.to_string())
    }
}

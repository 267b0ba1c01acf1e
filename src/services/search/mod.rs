mod error;
mod google;

use std::{future::Future, pin::Pin};

use serde::{Deserialize, Serialize};

pub use error::SearchError;
pub use google::{GoogleSearchClient, SearchConfig, DEFAULT_SEARCH_URL};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub title: String,
    pub link: String,
    pub snippet: String,
}

pub type SearchFuture<'a> =
    Pin<Box<dyn Future<Output = Result<Vec<SearchHit>, SearchError>> + Send + 'a>>;

/// A hosted web search the coordinator can call directly.
pub trait WebSearch: Send + Sync {
    fn search<'a>(&'a self, query: &'a str) -> SearchFuture<'a>;

    /// Name reported in coordination reports.
    fn name(&self) -> &str {
        "web_search"
    }
}

/// Stand-in used when no search backend is configured. Every query fails
/// with the configuration problem that disabled it.
#[derive(Debug, Clone)]
pub struct DisabledSearch {
    reason: String,
}

impl DisabledSearch {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl WebSearch for DisabledSearch {
    fn search<'a>(&'a self, _query: &'a str) -> SearchFuture<'a> {
        let reason = self.reason.clone();
        Box::pin(async move { Err(SearchError::Config(reason)) })
    }

    fn name(&self) -> &str {
        "disabled_search"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn disabled_search_reports_its_reason() {
        let search = DisabledSearch::new("GOOGLE_API_KEY not set");
        let err = search.search("rust").await.unwrap_err();
        assert_eq!(err.to_string(), "Search config error: GOOGLE_API_KEY not set");
    }
}

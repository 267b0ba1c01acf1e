use std::env;

use reqwest::Client;
use serde::Deserialize;
use tracing::{error, span, Instrument, Level};

use super::{SearchError, SearchFuture, SearchHit, WebSearch};

pub const DEFAULT_SEARCH_URL: &str = "https://www.googleapis.com/customsearch/v1";

#[derive(Debug, Clone)]
pub struct SearchConfig {
    pub api_key: Option<String>,
    pub engine_id: Option<String>,
    pub base_url: String,
    /// Results per query, the API caps this at 10.
    pub num_results: u8,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            engine_id: None,
            base_url: DEFAULT_SEARCH_URL.into(),
            num_results: 5,
        }
    }
}

impl SearchConfig {
    /// Reads `GOOGLE_API_KEY` and `GOOGLE_CSE_ID`.
    pub fn from_env() -> Self {
        Self {
            api_key: env::var("GOOGLE_API_KEY").ok().filter(|v| !v.is_empty()),
            engine_id: env::var("GOOGLE_CSE_ID").ok().filter(|v| !v.is_empty()),
            ..Default::default()
        }
    }
}

/// Google Custom Search JSON API client.
#[derive(Debug, Clone)]
pub struct GoogleSearchClient {
    client: Client,
    api_key: String,
    engine_id: String,
    base_url: String,
    num_results: u8,
}

#[derive(Debug, Deserialize)]
struct CustomSearchResponse {
    #[serde(default)]
    items: Vec<CustomSearchItem>,
}

#[derive(Debug, Deserialize)]
struct CustomSearchItem {
    #[serde(default)]
    title: String,
    #[serde(default)]
    link: String,
    #[serde(default)]
    snippet: String,
}

impl GoogleSearchClient {
    pub fn new(cfg: SearchConfig) -> Result<Self, SearchError> {
        let Some(api_key) = cfg.api_key else {
            return Err(SearchError::Config("GOOGLE_API_KEY not set".into()));
        };
        let Some(engine_id) = cfg.engine_id else {
            return Err(SearchError::Config("GOOGLE_CSE_ID not set".into()));
        };
        Ok(Self {
            client: Client::new(),
            api_key,
            engine_id,
            base_url: cfg.base_url,
            num_results: cfg.num_results.clamp(1, 10),
        })
    }

    async fn query(&self, query: &str) -> Result<Vec<SearchHit>, SearchError> {
        let span = span!(
            Level::INFO,
            "Google search request",
            "http.request.method" = "GET",
            "server.address" = self.base_url.as_str(),
        );

        async {
            let num = self.num_results.to_string();
            let response = self
                .client
                .get(&self.base_url)
                .query(&[
                    ("key", self.api_key.as_str()),
                    ("cx", self.engine_id.as_str()),
                    ("q", query),
                    ("num", num.as_str()),
                ])
                .send()
                .await?;

            let status = response.status();
            if !status.is_success() {
                let error_text = response
                    .text()
                    .await
                    .unwrap_or_else(|_| "Failed to read error body".into());
                error!(%status, body = %error_text, "search request failed");
                return Err(SearchError::Api(format!(
                    "Google search failed: {status} - {error_text}"
                )));
            }

            let text = response
                .text()
                .await
                .map_err(|e| SearchError::Request(format!("Failed to read response text: {e}")))?;

            let parsed: CustomSearchResponse = serde_json::from_str(&text).map_err(|e| {
                error!(%e, "search deserialization error");
                SearchError::Serialization(e.to_string())
            })?;

            Ok(parsed
                .items
                .into_iter()
                .map(|item| SearchHit {
                    title: item.title,
                    link: item.link,
                    snippet: item.snippet,
                })
                .collect())
        }
        .instrument(span)
        .await
    }
}

impl WebSearch for GoogleSearchClient {
    fn search<'a>(&'a self, query: &'a str) -> SearchFuture<'a> {
        Box::pin(self.query(query))
    }

    fn name(&self) -> &str {
        "google_search"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_credentials_are_config_errors() {
        let err = GoogleSearchClient::new(SearchConfig::default()).unwrap_err();
        assert!(matches!(err, SearchError::Config(_)));

        let cfg = SearchConfig {
            api_key: Some("k".into()),
            ..Default::default()
        };
        assert!(matches!(
            GoogleSearchClient::new(cfg),
            Err(SearchError::Config(msg)) if msg.contains("GOOGLE_CSE_ID")
        ));
    }

    #[test]
    fn result_count_is_clamped() {
        let cfg = SearchConfig {
            api_key: Some("k".into()),
            engine_id: Some("cx".into()),
            num_results: 50,
            ..Default::default()
        };
        let client = GoogleSearchClient::new(cfg).unwrap();
        assert_eq!(client.num_results, 10);
        assert_eq!(client.name(), "google_search");
    }

    #[test]
    fn response_without_items_is_empty() {
        let parsed: CustomSearchResponse =
            serde_json::from_str(r#"{"kind":"customsearch#search"}"#).unwrap();
        assert!(parsed.items.is_empty());
    }
}

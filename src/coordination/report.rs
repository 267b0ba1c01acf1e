use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::json;

use crate::{
    documents::{RagResponse, SearchReport, SimilarityReport, StoreReceipt, SummaryReport, TrendReport},
    services::search::SearchHit,
};

pub(crate) const SUCCESS: &str = "success";

#[derive(Debug, Clone, Serialize)]
pub struct UserInteractionReport {
    pub run_id: String,
    pub user_query: String,
    pub context_retrieved: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<SearchReport>,
    pub chat_response: String,
    pub conversation_stored: StoreReceipt,
    pub summary_provided: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<SummaryReport>,
    pub workflow: &'static str,
    pub status: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchAndStoreReport {
    pub run_id: String,
    pub query: String,
    pub search_results: Vec<SearchHit>,
    pub storage_result: StoreReceipt,
    pub semantic_analysis: SearchReport,
    pub workflow: &'static str,
    pub status: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResearchPhase {
    pub phase: usize,
    pub query: String,
    pub results: Vec<SearchHit>,
    pub storage: StoreReceipt,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResearchPipelineReport {
    pub run_id: String,
    pub research_topic: String,
    pub search_phases: Vec<ResearchPhase>,
    pub synthesis: SummaryReport,
    pub patterns_and_insights: TrendReport,
    pub collection_name: String,
    pub research_depth: usize,
    pub workflow: &'static str,
    pub status: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResearchAndOrganizeReport {
    pub run_id: String,
    pub research_topic: String,
    pub search_results: Vec<SearchHit>,
    pub storage_result: StoreReceipt,
    pub organization_summary: SummaryReport,
    pub related_research: SimilarityReport,
    pub workflow: &'static str,
    pub status: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct KnowledgeQueryReport {
    pub run_id: String,
    pub question: String,
    pub rag_response: RagResponse,
    pub related_documents: SimilarityReport,
    pub collection_queried: String,
    pub conversation_context_used: bool,
    pub workflow: &'static str,
    pub status: &'static str,
}

/// What `analyze_stored_documents` computes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisKind {
    Summary,
    Patterns,
    Organization,
}

impl AnalysisKind {
    pub const ALL: [&'static str; 3] = ["summary", "patterns", "organization"];

    pub(crate) fn workflow(&self) -> &'static str {
        match self {
            AnalysisKind::Summary => "collection_summary",
            AnalysisKind::Patterns => "trend_analysis",
            AnalysisKind::Organization => "collection_summary -> trend_analysis",
        }
    }
}

impl FromStr for AnalysisKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "summary" => Ok(AnalysisKind::Summary),
            "patterns" => Ok(AnalysisKind::Patterns),
            "organization" => Ok(AnalysisKind::Organization),
            other => Err(format!(
                "analysis '{other}' is not one of {}",
                Self::ALL.join(", ")
            )),
        }
    }
}

impl fmt::Display for AnalysisKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AnalysisKind::Summary => "summary",
            AnalysisKind::Patterns => "patterns",
            AnalysisKind::Organization => "organization",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DocumentAnalysisReport {
    pub run_id: String,
    pub collection: String,
    pub analysis: AnalysisKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<SummaryReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trends: Option<TrendReport>,
    pub workflow: &'static str,
    pub status: &'static str,
}

/// Search results as the JSON document stored for later retrieval.
pub fn format_search_results(
    query: &str,
    hits: &[SearchHit],
    source: &str,
    now: DateTime<Utc>,
) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&json!({
        "search_query": query,
        "results": hits,
        "timestamp": now.to_rfc3339(),
        "source": source,
        "category": "web_search",
    }))
}

/// One `- title (link): snippet` line per hit.
pub fn format_findings(hits: &[SearchHit]) -> String {
    if hits.is_empty() {
        return "No results found.".to_string();
    }
    hits.iter()
        .map(|hit| format!("- {} ({}): {}", hit.title, hit.link, hit.snippet))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Search queries covering the aspects of a research topic.
pub fn research_queries(topic: &str, year: i32) -> Vec<String> {
    vec![
        format!("{topic} overview definition"),
        format!("{topic} current trends {year}"),
        format!("{topic} best practices methods"),
        format!("{topic} challenges problems solutions"),
        format!("{topic} future predictions outlook"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::Value;

    fn hit(n: u32) -> SearchHit {
        SearchHit {
            title: format!("Title {n}"),
            link: format!("https://example.org/{n}"),
            snippet: format!("snippet {n}"),
        }
    }

    #[test]
    fn search_results_are_stored_as_categorised_json() {
        let now = Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap();
        let raw = format_search_results("rust", &[hit(1)], "google_search", now).unwrap();
        let value: Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["search_query"], "rust");
        assert_eq!(value["category"], "web_search");
        assert_eq!(value["source"], "google_search");
        assert_eq!(value["results"][0]["link"], "https://example.org/1");
        assert!(value["timestamp"].as_str().unwrap().starts_with("2025-03-01T12:00:00"));
    }

    #[test]
    fn findings_list_each_hit() {
        assert_eq!(format_findings(&[]), "No results found.");
        assert_eq!(
            format_findings(&[hit(1), hit(2)]),
            "- Title 1 (https://example.org/1): snippet 1\n- Title 2 (https://example.org/2): snippet 2"
        );
    }

    #[test]
    fn research_queries_cover_five_aspects() {
        let queries = research_queries("vector databases", 2026);
        assert_eq!(queries.len(), 5);
        assert_eq!(queries[1], "vector databases current trends 2026");
        assert_eq!(queries[4], "vector databases future predictions outlook");
    }

    #[test]
    fn analysis_kind_parses_case_insensitively() {
        assert_eq!("Patterns".parse::<AnalysisKind>(), Ok(AnalysisKind::Patterns));
        assert_eq!(AnalysisKind::Organization.to_string(), "organization");
        let err = "themes".parse::<AnalysisKind>().unwrap_err();
        assert!(err.contains("summary, patterns, organization"));
    }
}

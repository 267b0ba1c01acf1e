use std::{collections::BTreeMap, fmt};

use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone, Serialize)]
pub struct StoreReceipt {
    pub id: String,
    pub collection: String,
    pub title: String,
}

impl fmt::Display for StoreReceipt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Document stored successfully with ID: {}. Ready for semantic search.",
            self.id
        )
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchReport {
    pub query: String,
    pub collection: String,
    pub results: Vec<Value>,
    pub total_found: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ContextQueryReport {
    pub query: String,
    pub summary: String,
    pub context_documents: Vec<Value>,
    pub context_count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct RecentDocument {
    pub title: String,
    pub timestamp: Value,
    #[serde(rename = "type")]
    pub doc_type: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CollectionSummary {
    pub collection: String,
    pub total_documents: u64,
    pub analyzed_documents: usize,
    pub document_types: BTreeMap<String, u64>,
    pub sample_titles: Vec<String>,
    pub recent_documents: Vec<RecentDocument>,
    pub summary: String,
}

/// Outcome of summarising a collection, empty collections only carry a message.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum SummaryReport {
    Empty { message: String },
    Summary(CollectionSummary),
}

#[derive(Debug, Clone, Serialize)]
pub struct SimilarDocument {
    pub document: Value,
    pub similarity_score: f64,
    pub title: String,
    pub content_preview: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SimilarityReport {
    pub reference_text: String,
    pub similarity_threshold: f64,
    pub similar_documents: Vec<SimilarDocument>,
    pub total_found: usize,
    pub search_keywords: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TrendReport {
    pub collection: String,
    pub total_documents: u64,
    pub daily_document_counts: BTreeMap<String, u64>,
    pub category_distribution: BTreeMap<String, u64>,
    pub analysis_period: String,
    /// `[category, count]`, absent when no document had a parseable date.
    pub most_active_category: Option<(String, u64)>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RankedDocument {
    pub document: Value,
    pub relevance_score: f64,
    pub query_matches: usize,
    pub context_matches: usize,
    pub title: String,
    pub timestamp: Value,
    pub content_preview: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RagInsight {
    pub rank: usize,
    pub title: String,
    pub relevance: f64,
    pub key_points: String,
    pub timestamp: Value,
}

#[derive(Debug, Clone, Serialize)]
pub struct RagRecommendations {
    pub use_for_response: String,
    pub follow_up_queries: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RagResponse {
    pub query: String,
    pub conversation_context_used: bool,
    pub search_strategy: String,
    pub retrieved_documents: Vec<RankedDocument>,
    pub rag_insights: Vec<RagInsight>,
    pub context_summary: String,
    pub total_retrieved: usize,
    pub search_terms_used: Vec<String>,
    pub recommendations: RagRecommendations,
}

/// Result of a write through the CRUD tools.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum WriteOutcome {
    Inserted { id: String },
    InsertedMany { ids: Vec<String> },
    Updated { matched: u64, modified: u64 },
    Upserted { id: Option<String>, matched: u64, modified: u64 },
}

impl fmt::Display for WriteOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WriteOutcome::Inserted { id } => {
                write!(f, "Document inserted successfully with ID: {id}")
            }
            WriteOutcome::InsertedMany { ids } => {
                write!(f, "Inserted {} documents successfully", ids.len())
            }
            WriteOutcome::Updated { matched, modified } => {
                write!(f, "Updated {modified} document(s) (matched {matched})")
            }
            WriteOutcome::Upserted {
                id: Some(id), ..
            } => write!(f, "Document upserted with ID: {id}"),
            WriteOutcome::Upserted {
                id: None,
                matched,
                modified,
            } => write!(f, "Matched {matched}, updated {modified} document(s)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn write_outcomes_render_like_tool_messages() {
        let inserted = WriteOutcome::Inserted { id: "abc".into() };
        assert_eq!(inserted.to_string(), "Document inserted successfully with ID: abc");

        let updated = WriteOutcome::Updated { matched: 2, modified: 1 };
        assert!(updated.to_string().starts_with("Updated 1"));

        let upsert_new = WriteOutcome::Upserted { id: Some("x".into()), matched: 0, modified: 0 };
        assert!(upsert_new.to_string().contains("upserted"));

        let upsert_existing = WriteOutcome::Upserted { id: None, matched: 1, modified: 1 };
        assert!(upsert_existing.to_string().contains("updated"));
    }

    #[test]
    fn empty_summary_serializes_to_message_only() {
        let report = SummaryReport::Empty { message: "No documents found in collection 'c'".into() };
        assert_eq!(
            serde_json::to_value(&report).unwrap(),
            json!({"message": "No documents found in collection 'c'"})
        );
    }

    #[test]
    fn most_active_category_is_a_pair() {
        let report = TrendReport {
            collection: "c".into(),
            total_documents: 3,
            daily_document_counts: BTreeMap::new(),
            category_distribution: BTreeMap::new(),
            analysis_period: "0 days with data".into(),
            most_active_category: Some(("news".into(), 3)),
        };
        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["most_active_category"], json!(["news", 3]));
    }
}

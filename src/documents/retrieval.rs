//! Pure shaping of text-search results into tool reports.
//!
//! The database does the matching and the `textScore` ranking, this module only
//! filters, re-weights and formats what came back.

use std::cmp::Ordering;

use mongodb::bson::{doc, Document};

use super::{
    models::{
        ContextQueryReport, RagInsight, RagRecommendations, RagResponse, RankedDocument,
        SearchReport, SimilarDocument, SimilarityReport,
    },
    text::{preview, preview_if_longer, KeyTerms},
};
use crate::services::mongo::{bson_as_f64, bson_to_display_string, document_to_json};

const QUERY_MATCH_WEIGHT: f64 = 0.3;
const CONTEXT_MATCH_WEIGHT: f64 = 0.1;
const CONTEXT_WORDS_CONSIDERED: usize = 5;
const FOLLOW_UPS: usize = 3;
const TERMS_REPORTED: usize = 10;

pub const SEARCH_STRATEGY: &str = "semantic_with_context";

/// `$text` filter for `search`.
pub fn text_filter(search: &str) -> Document {
    doc! { "$text": { "$search": search } }
}

/// Projection/sort value exposing the text score as `score`.
pub fn text_score() -> Document {
    doc! { "score": { "$meta": "textScore" } }
}

/// Aggregation returning the `limit` best text matches with a string id.
pub fn context_pipeline(query: &str, limit: i64) -> Vec<Document> {
    vec![
        doc! { "$match": text_filter(query) },
        doc! { "$addFields": text_score() },
        doc! { "$sort": { "score": -1 } },
        doc! { "$limit": limit },
        doc! { "$project": {
            "_id": { "$toString": "$_id" },
            "title": 1,
            "content": 1,
            "timestamp": 1,
            "score": 1,
        }},
    ]
}

pub(crate) fn score_of(doc: &Document) -> f64 {
    doc.get("score").and_then(bson_as_f64).unwrap_or(0.0)
}

pub(crate) fn field_text(doc: &Document, key: &str) -> String {
    doc.get(key).map(bson_to_display_string).unwrap_or_default()
}

fn title_of(doc: &Document) -> String {
    match doc.get("title") {
        Some(title) => bson_to_display_string(title),
        None => "Untitled".to_string(),
    }
}

fn timestamp_of(doc: &Document) -> serde_json::Value {
    doc.get("timestamp")
        .map(|t| t.clone().into_relaxed_extjson())
        .unwrap_or_else(|| serde_json::Value::String(String::new()))
}

pub fn build_search_report(query: &str, collection: &str, docs: Vec<Document>) -> SearchReport {
    let results: Vec<_> = docs.into_iter().map(document_to_json).collect();
    SearchReport {
        query: query.to_string(),
        collection: collection.to_string(),
        total_found: results.len(),
        results,
    }
}

pub fn build_context_report(query: &str, docs: Vec<Document>) -> ContextQueryReport {
    let summary = if docs.is_empty() {
        format!("No documents found matching query: '{query}'")
    } else {
        let mut summary = format!(
            "Found {} relevant documents for query: '{query}'",
            docs.len()
        );
        for (i, doc) in docs.iter().enumerate() {
            summary.push_str(&format!(
                "\n{}. {}: {}",
                i + 1,
                title_of(doc),
                preview(&field_text(doc, "content"), 100)
            ));
        }
        summary
    };

    let context_documents: Vec<_> = docs.into_iter().map(document_to_json).collect();
    ContextQueryReport {
        query: query.to_string(),
        summary,
        context_count: context_documents.len(),
        context_documents,
    }
}

/// Keep text matches scoring at least `threshold`.
pub fn build_similarity_report(
    reference_text: &str,
    threshold: f64,
    keywords: Vec<String>,
    docs: Vec<Document>,
) -> SimilarityReport {
    let similar_documents: Vec<_> = docs
        .into_iter()
        .filter_map(|doc| {
            let score = score_of(&doc);
            if score < threshold {
                return None;
            }
            let title = title_of(&doc);
            let content_preview = preview(&field_text(&doc, "content"), 150);
            Some(SimilarDocument {
                document: document_to_json(doc),
                similarity_score: score,
                title,
                content_preview,
            })
        })
        .collect();

    SimilarityReport {
        reference_text: preview_if_longer(reference_text, 100),
        similarity_threshold: threshold,
        total_found: similar_documents.len(),
        similar_documents,
        search_keywords: keywords,
    }
}

fn round3(v: f64) -> f64 {
    (v * 1000.0).round() / 1000.0
}

/// Re-weight text matches by how many query and context words they contain.
///
/// `score + 0.3 * query_matches + 0.1 * context_matches`, best first, at most `limit`.
pub fn rerank(docs: Vec<Document>, terms: &KeyTerms, limit: usize) -> Vec<RankedDocument> {
    let mut ranked: Vec<RankedDocument> = docs
        .into_iter()
        .map(|doc| {
            let content_text = format!(
                "{} {}",
                field_text(&doc, "content"),
                field_text(&doc, "searchable_text")
            )
            .to_lowercase();
            let title_text = field_text(&doc, "title").to_lowercase();

            let query_matches = terms
                .query_words
                .iter()
                .filter(|t| content_text.contains(t.as_str()) || title_text.contains(t.as_str()))
                .count();
            let context_matches = terms
                .context_words
                .iter()
                .take(CONTEXT_WORDS_CONSIDERED)
                .filter(|t| content_text.contains(t.as_str()))
                .count();

            let relevance_score = round3(
                score_of(&doc)
                    + query_matches as f64 * QUERY_MATCH_WEIGHT
                    + context_matches as f64 * CONTEXT_MATCH_WEIGHT,
            );

            RankedDocument {
                title: title_of(&doc),
                timestamp: timestamp_of(&doc),
                content_preview: preview_if_longer(&content_text, 200),
                document: document_to_json(doc),
                relevance_score,
                query_matches,
                context_matches,
            }
        })
        .collect();

    ranked.sort_by(|a, b| {
        b.relevance_score
            .partial_cmp(&a.relevance_score)
            .unwrap_or(Ordering::Equal)
    });
    ranked.truncate(limit);
    ranked
}

pub fn build_rag_response(
    query: &str,
    conversation_context: &str,
    terms: &KeyTerms,
    ranked: Vec<RankedDocument>,
) -> RagResponse {
    let context_used = !conversation_context.trim().is_empty();

    let context_summary = if ranked.is_empty() {
        format!("No relevant documents found for query: '{query}'")
    } else if context_used {
        format!(
            "Retrieved {} relevant documents for query: '{query}' (with conversation context considered)",
            ranked.len()
        )
    } else {
        format!("Retrieved {} relevant documents for query: '{query}'", ranked.len())
    };

    let rag_insights = ranked
        .iter()
        .enumerate()
        .map(|(i, r)| RagInsight {
            rank: i + 1,
            title: r.title.clone(),
            relevance: r.relevance_score,
            key_points: r.content_preview.clone(),
            timestamp: r.timestamp.clone(),
        })
        .collect();

    let follow_up_queries = ranked
        .iter()
        .take(FOLLOW_UPS)
        .map(|r| format!("Tell me more about {}", r.title))
        .collect();

    RagResponse {
        query: query.to_string(),
        conversation_context_used: context_used,
        search_strategy: SEARCH_STRATEGY.to_string(),
        total_retrieved: ranked.len(),
        retrieved_documents: ranked,
        rag_insights,
        context_summary,
        search_terms_used: terms.terms.iter().take(TERMS_REPORTED).cloned().collect(),
        recommendations: RagRecommendations {
            use_for_response:
                "Combine retrieved insights with your knowledge to provide contextual answers"
                    .to_string(),
            follow_up_queries,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::oid::ObjectId;
    use serde_json::json;

    fn scored(title: &str, content: &str, score: f64) -> Document {
        doc! {
            "_id": ObjectId::new(),
            "title": title,
            "content": content,
            "timestamp": "2025-08-02T10:00:00Z",
            "score": score,
        }
    }

    #[test]
    fn search_report_counts_and_stringifies_ids() {
        let report = build_search_report("fox", "notes", vec![scored("a", "quick fox", 1.2)]);
        assert_eq!(report.total_found, 1);
        assert!(report.results[0]["_id"].is_string());
        assert_eq!(report.results[0]["score"], json!(1.2));
    }

    #[test]
    fn context_summary_lists_titles_and_previews() {
        let long = "x".repeat(150);
        let report = build_context_report("sleep", vec![scored("Night", &long, 2.0)]);
        assert_eq!(report.context_count, 1);
        assert!(report.summary.starts_with("Found 1 relevant documents for query: 'sleep'"));
        assert!(report.summary.contains(&format!("\n1. Night: {}...", "x".repeat(100))));

        let empty = build_context_report("sleep", vec![]);
        assert_eq!(empty.summary, "No documents found matching query: 'sleep'");
        assert_eq!(empty.context_count, 0);
    }

    #[test]
    fn similarity_respects_threshold() {
        let docs = vec![scored("keep", "alpha", 0.9), scored("drop", "beta", 0.2)];
        let report = build_similarity_report("alpha beta", 0.5, vec!["alpha".into()], docs);
        assert_eq!(report.total_found, 1);
        assert_eq!(report.similar_documents[0].title, "keep");
        assert_eq!(report.similar_documents[0].content_preview, "alpha...");
        assert_eq!(report.reference_text, "alpha beta");

        let long_ref = "word ".repeat(40);
        let report = build_similarity_report(&long_ref, 0.5, vec![], vec![]);
        assert!(report.reference_text.ends_with("..."));
        assert_eq!(report.reference_text.chars().count(), 103);
    }

    #[test]
    fn rerank_boosts_query_and_context_matches() {
        let terms = KeyTerms::extract("quantum error", "correction breakthroughs");
        let docs = vec![
            scored("Unrelated", "nothing here", 1.0),
            scored("Quantum advances", "error correction breakthroughs", 0.8),
        ];
        let ranked = rerank(docs, &terms, 5);

        assert_eq!(ranked[0].title, "Quantum advances");
        assert_eq!(ranked[0].query_matches, 2);
        assert_eq!(ranked[0].context_matches, 2);
        // 0.8 + 2 * 0.3 + 2 * 0.1
        assert!((ranked[0].relevance_score - 1.6).abs() < 1e-9);
        assert!((ranked[1].relevance_score - 1.0).abs() < 1e-9);
    }

    #[test]
    fn rerank_truncates_to_limit() {
        let terms = KeyTerms::extract("alpha", "");
        let docs = (0..6).map(|i| scored(&format!("d{i}"), "alpha", i as f64)).collect();
        let ranked = rerank(docs, &terms, 3);
        assert_eq!(ranked.len(), 3);
        assert_eq!(ranked[0].title, "d5");
    }

    #[test]
    fn rag_response_mentions_context_and_follow_ups() {
        let terms = KeyTerms::extract("journal mood", "last week");
        let ranked = rerank(
            vec![scored("Monday", "mood was good", 1.0), scored("Tuesday", "journal", 0.5)],
            &terms,
            5,
        );
        let response = build_rag_response("journal mood", "last week", &terms, ranked);

        assert!(response.conversation_context_used);
        assert!(response.context_summary.ends_with("(with conversation context considered)"));
        assert_eq!(response.total_retrieved, 2);
        assert_eq!(response.rag_insights[0].rank, 1);
        assert_eq!(
            response.recommendations.follow_up_queries,
            vec!["Tell me more about Monday", "Tell me more about Tuesday"]
        );
        assert_eq!(response.search_strategy, SEARCH_STRATEGY);

        let empty = build_rag_response("x", "", &KeyTerms::default(), vec![]);
        assert!(!empty.conversation_context_used);
        assert_eq!(empty.context_summary, "No relevant documents found for query: 'x'");
    }

    #[test]
    fn context_pipeline_shape() {
        let pipeline = context_pipeline("fox", 3);
        assert_eq!(pipeline.len(), 5);
        assert_eq!(pipeline[3], doc! { "$limit": 3_i64 });
    }
}

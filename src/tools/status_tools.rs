//! Wrappers that report document tool results inside a status envelope,
//! `{"status": "success", "result": ...}` or `{"status": "error", "error_message": ...}`.

use std::sync::Arc;

use serde::Serialize;
use serde_json::{Map, Value};

use super::{
    document_tools::{
        analyze_trends_tool, find_similar_tool, query_with_context_tool, semantic_query_tool,
        semantic_search_tool, store_document_tool, summarize_collection_tool,
    },
    Tool, ToolBuilder, ToolBuilderError, ToolExecutionError, ToolFuture,
};
use crate::documents::DocumentService;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum StatusEnvelope {
    Success { result: Value },
    Error { error_message: String },
}

impl StatusEnvelope {
    /// Wrap a tool result; JSON output is embedded as JSON, anything else as text.
    pub fn from_result(result: Result<String, ToolExecutionError>) -> Self {
        match result {
            Ok(out) => StatusEnvelope::Success {
                result: serde_json::from_str(&out).unwrap_or(Value::String(out)),
            },
            Err(e) => StatusEnvelope::Error {
                error_message: e.to_string(),
            },
        }
    }

    pub fn render(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|e| {
            format!(r#"{{"status":"error","error_message":"Error encoding result: {e}"}}"#)
        })
    }
}

/// Argument `(exposed name, name understood by the wrapped tool, description, required)`.
type Forward = (&'static str, &'static str, &'static str, bool);

fn wrap(
    name: &str,
    description: &str,
    inner: Tool,
    forwards: &'static [Forward],
) -> Result<Tool, ToolBuilderError> {
    let inner = Arc::new(inner);
    let exec = Arc::new(move |args: Value| -> ToolFuture {
        let inner = inner.clone();
        Box::pin(async move {
            let mut mapped = Map::new();
            for (exposed, target, _, _) in forwards {
                if let Some(v) = args.get(*exposed).filter(|v| !v.is_null()) {
                    mapped.insert((*target).to_string(), v.clone());
                }
            }
            let result = inner.execute(Value::Object(mapped)).await;
            Ok(StatusEnvelope::from_result(result).render())
        })
    });

    forwards
        .iter()
        .fold(
            ToolBuilder::new()
                .function_name(name)
                .function_description(description),
            |builder, (exposed, _, desc, required)| {
                if *required {
                    builder.add_required_property(*exposed, "string", *desc)
                } else {
                    builder.add_property(*exposed, "string", *desc)
                }
            },
        )
        .executor(exec)
        .build()
}

const COLLECTION: Forward = (
    "collection_name",
    "collection_name",
    "MongoDB collection name",
    true,
);

pub fn status_tools(service: &DocumentService) -> Result<Vec<Tool>, ToolBuilderError> {
    Ok(vec![
        wrap(
            "search_mongodb_documents",
            "Searches for documents in MongoDB using the text index and relevance scores.",
            semantic_search_tool(service)?,
            &[("query", "query", "The search query", true), COLLECTION],
        )?,
        wrap(
            "save_document_to_mongodb",
            "Stores a document in MongoDB with search metadata.",
            store_document_tool(service)?,
            &[
                ("document_content", "document", "The content of the document to store", true),
                COLLECTION,
                ("title", "title", "Optional title for the document", false),
            ],
        )?,
        wrap(
            "get_mongodb_collection_summary",
            "Generates a summary of a MongoDB collection's contents.",
            summarize_collection_tool(service)?,
            &[COLLECTION],
        )?,
        wrap(
            "query_documents_with_ai_context",
            "Retrieves the documents most relevant to a natural language query, with a summary.",
            query_with_context_tool(service)?,
            &[("query", "query", "The natural language query", true), COLLECTION],
        )?,
        wrap(
            "find_related_documents",
            "Finds documents similar to the provided reference text.",
            find_similar_tool(service)?,
            &[
                ("reference_text", "reference_text", "The text to find similar documents for", true),
                COLLECTION,
            ],
        )?,
        wrap(
            "analyze_collection_trends",
            "Analyzes document creation trends and category distribution over time.",
            analyze_trends_tool(service)?,
            &[COLLECTION],
        )?,
        wrap(
            "semantic_rag_query_with_context",
            "Retrieves documents for a question using the conversation so far to improve relevance.",
            semantic_query_tool(service)?,
            &[
                ("query", "query", "The current user query", true),
                COLLECTION,
                (
                    "conversation_context",
                    "conversation_context",
                    "Previous conversation context",
                    false,
                ),
            ],
        )?,
    ])
}

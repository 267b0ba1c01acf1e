//! One tool per document operation, returning pretty JSON or a plain message.

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use super::{
    args::{f64_or, json_text, optional_str, required_str, string_or, limit_or},
    AsyncToolFn, Tool, ToolBuilder, ToolBuilderError, ToolExecutionError, ToolFuture,
};
use crate::documents::{
    DocumentError, DocumentService, DEFAULT_CONTEXT_LIMIT, DEFAULT_READ_LIMIT,
    DEFAULT_SEARCH_LIMIT, DEFAULT_SIMILARITY_THRESHOLD, DEFAULT_SUMMARY_DOCS, DEFAULT_TIME_FIELD,
};

pub const SEMANTIC_SEARCH: &str = "semantic_search_documents";
pub const STORE_DOCUMENT: &str = "store_document_with_embeddings";
pub const QUERY_WITH_CONTEXT: &str = "query_documents_with_context";
pub const SUMMARIZE_COLLECTION: &str = "summarize_collection";
pub const FIND_SIMILAR: &str = "find_similar_documents";
pub const ANALYZE_TRENDS: &str = "analyze_document_trends";
pub const SEMANTIC_QUERY: &str = "semantic_query_documents_with_context";
pub const WRITE: &str = "write_to_mongodb";
pub const READ: &str = "read_from_mongodb";
pub const COUNT: &str = "count_mongodb_documents";
pub const DELETE: &str = "delete_from_mongodb";

const COLLECTION_DESC: &str = "MongoDB collection name";

/// Map a document failure to `Error <context>: <cause>`.
pub(crate) fn failed(context: &'static str) -> impl Fn(DocumentError) -> ToolExecutionError {
    move |e| ToolExecutionError::ExecutionFailed(format!("{context}: {e}"))
}

pub(crate) fn pretty<T: Serialize>(value: &T) -> Result<String, ToolExecutionError> {
    serde_json::to_string_pretty(value)
        .map_err(|e| ToolExecutionError::ExecutionFailed(format!("encoding result: {e}")))
}

/// Wrap an async closure over the service into a tool executor.
pub(crate) fn executor<F, Fut>(service: &DocumentService, run: F) -> AsyncToolFn
where
    F: Fn(DocumentService, Value) -> Fut + Send + Sync + 'static,
    Fut: std::future::Future<Output = Result<String, ToolExecutionError>> + Send + 'static,
{
    let service = service.clone();
    let run = Arc::new(run);
    Arc::new(move |args: Value| {
        let service = service.clone();
        let run = run.clone();
        let fut: ToolFuture = Box::pin(async move { run(service, args).await });
        fut
    })
}

pub fn semantic_search_tool(service: &DocumentService) -> Result<Tool, ToolBuilderError> {
    let exec = executor(service, |service, args| async move {
        let query = required_str(&args, "query")?;
        let collection = required_str(&args, "collection_name")?;
        let limit = limit_or(&args, "limit", DEFAULT_SEARCH_LIMIT)?;
        let report = service
            .semantic_search(query, collection, limit)
            .await
            .map_err(failed("performing semantic search"))?;
        pretty(&report)
    });

    ToolBuilder::new()
        .function_name(SEMANTIC_SEARCH)
        .function_description(
            "Search stored documents with the database text index, ranked by relevance score.",
        )
        .add_required_property("query", "string", "Natural language search query")
        .add_required_property("collection_name", "string", COLLECTION_DESC)
        .add_property_with_default("limit", "integer", "Maximum number of results", DEFAULT_SEARCH_LIMIT)
        .executor(exec)
        .build()
}

pub fn store_document_tool(service: &DocumentService) -> Result<Tool, ToolBuilderError> {
    let exec = executor(service, |service, args| async move {
        let collection = required_str(&args, "collection_name")?;
        let document = json_text(&args, "document")?;
        let title = optional_str(&args, "title")?;
        let receipt = service
            .store_document(collection, &document, title)
            .await
            .map_err(failed("storing document"))?;
        Ok(receipt.to_string())
    });

    ToolBuilder::new()
        .function_name(STORE_DOCUMENT)
        .function_description(
            "Store a document (JSON object or plain text) with search metadata so it can be found later.",
        )
        .add_required_property("collection_name", "string", COLLECTION_DESC)
        .add_required_property("document", "string", "Document content as JSON or plain text")
        .add_property("title", "string", "Optional document title")
        .executor(exec)
        .build()
}

pub fn query_with_context_tool(service: &DocumentService) -> Result<Tool, ToolBuilderError> {
    let exec = executor(service, |service, args| async move {
        let collection = required_str(&args, "collection_name")?;
        let query = required_str(&args, "query")?;
        let limit = limit_or(&args, "context_limit", DEFAULT_CONTEXT_LIMIT)?;
        let report = service
            .query_with_context(collection, query, limit)
            .await
            .map_err(failed("querying with context"))?;
        pretty(&report)
    });

    ToolBuilder::new()
        .function_name(QUERY_WITH_CONTEXT)
        .function_description(
            "Retrieve the most relevant documents for a query together with a short textual summary.",
        )
        .add_required_property("collection_name", "string", COLLECTION_DESC)
        .add_required_property("query", "string", "Question or topic to retrieve context for")
        .add_property_with_default(
            "context_limit",
            "integer",
            "Number of context documents",
            DEFAULT_CONTEXT_LIMIT,
        )
        .executor(exec)
        .build()
}

pub fn summarize_collection_tool(service: &DocumentService) -> Result<Tool, ToolBuilderError> {
    let exec = executor(service, |service, args| async move {
        let collection = required_str(&args, "collection_name")?;
        let max_docs = limit_or(&args, "max_docs", DEFAULT_SUMMARY_DOCS)?;
        let report = service
            .summarize_collection(collection, max_docs)
            .await
            .map_err(failed("summarizing collection"))?;
        pretty(&report)
    });

    ToolBuilder::new()
        .function_name(SUMMARIZE_COLLECTION)
        .function_description(
            "Summarize a collection: document count, categories, sample titles and recent documents.",
        )
        .add_required_property("collection_name", "string", COLLECTION_DESC)
        .add_property_with_default(
            "max_docs",
            "integer",
            "Maximum number of documents to analyze",
            DEFAULT_SUMMARY_DOCS,
        )
        .executor(exec)
        .build()
}

pub fn find_similar_tool(service: &DocumentService) -> Result<Tool, ToolBuilderError> {
    let exec = executor(service, |service, args| async move {
        let collection = required_str(&args, "collection_name")?;
        let reference = required_str(&args, "reference_text")?;
        let threshold = f64_or(&args, "similarity_threshold", DEFAULT_SIMILARITY_THRESHOLD)?;
        let report = service
            .find_similar(collection, reference, threshold)
            .await
            .map_err(failed("finding similar documents"))?;
        pretty(&report)
    });

    ToolBuilder::new()
        .function_name(FIND_SIMILAR)
        .function_description("Find documents similar to a reference text.")
        .add_required_property("collection_name", "string", COLLECTION_DESC)
        .add_required_property("reference_text", "string", "Text to find similar documents for")
        .add_property_with_default(
            "similarity_threshold",
            "number",
            "Minimum relevance score a match must reach",
            DEFAULT_SIMILARITY_THRESHOLD,
        )
        .executor(exec)
        .build()
}

pub fn analyze_trends_tool(service: &DocumentService) -> Result<Tool, ToolBuilderError> {
    let exec = executor(service, |service, args| async move {
        let collection = required_str(&args, "collection_name")?;
        let time_field = string_or(&args, "time_field", DEFAULT_TIME_FIELD)?;
        let report = service
            .analyze_trends(collection, &time_field)
            .await
            .map_err(failed("analyzing document trends"))?;
        pretty(&report)
    });

    ToolBuilder::new()
        .function_name(ANALYZE_TRENDS)
        .function_description(
            "Analyze how many documents were created per day and how they spread over categories.",
        )
        .add_required_property("collection_name", "string", COLLECTION_DESC)
        .add_property_with_default(
            "time_field",
            "string",
            "Field holding the document date",
            DEFAULT_TIME_FIELD,
        )
        .executor(exec)
        .build()
}

pub fn semantic_query_tool(service: &DocumentService) -> Result<Tool, ToolBuilderError> {
    let exec = executor(service, |service, args| async move {
        let query = required_str(&args, "query")?;
        let collection = required_str(&args, "collection_name")?;
        let context = string_or(&args, "conversation_context", "")?;
        let limit = limit_or(&args, "limit", DEFAULT_SEARCH_LIMIT)?;
        let response = service
            .semantic_query_with_context(query, collection, &context, limit)
            .await
            .map_err(failed("in semantic RAG query"))?;
        pretty(&response)
    });

    ToolBuilder::new()
        .function_name(SEMANTIC_QUERY)
        .function_description(
            "Retrieve documents for answering a question, using the ongoing conversation to improve relevance.",
        )
        .add_required_property("query", "string", "The current user question")
        .add_required_property("collection_name", "string", COLLECTION_DESC)
        .add_property_with_default(
            "conversation_context",
            "string",
            "Recent conversation text",
            "",
        )
        .add_property_with_default("limit", "integer", "Maximum number of documents", DEFAULT_SEARCH_LIMIT)
        .executor(exec)
        .build()
}

pub fn write_tool(service: &DocumentService) -> Result<Tool, ToolBuilderError> {
    let exec = executor(service, |service, args| async move {
        let collection = required_str(&args, "collection_name")?;
        let data = json_text(&args, "data")?;
        let operation = string_or(&args, "operation", "insert")?;
        let outcome = service
            .write(collection, &data, &operation)
            .await
            .map_err(failed("writing to MongoDB"))?;
        Ok(outcome.to_string())
    });

    ToolBuilder::new()
        .function_name(WRITE)
        .function_description(
            "Insert documents, or update/upsert with a payload of the form {\"filter\": {...}, \"update\": {...}}.",
        )
        .add_required_property("collection_name", "string", COLLECTION_DESC)
        .add_required_property("data", "string", "JSON document, array of documents, or update payload")
        .add_enum_property("operation", "Write mode", ["insert", "update", "upsert"])
        .executor(exec)
        .build()
}

pub fn read_tool(service: &DocumentService) -> Result<Tool, ToolBuilderError> {
    let exec = executor(service, |service, args| async move {
        let collection = required_str(&args, "collection_name")?;
        let query = string_or(&args, "query", "{}")?;
        let limit = limit_or(&args, "limit", DEFAULT_READ_LIMIT)?;
        let docs = service
            .read(collection, &query, limit)
            .await
            .map_err(failed("reading from MongoDB"))?;
        pretty(&docs)
    });

    ToolBuilder::new()
        .function_name(READ)
        .function_description("Read documents matching a JSON query filter.")
        .add_required_property("collection_name", "string", COLLECTION_DESC)
        .add_property_with_default("query", "string", "JSON query filter", "{}")
        .add_property_with_default("limit", "integer", "Maximum number of documents", DEFAULT_READ_LIMIT)
        .executor(exec)
        .build()
}

pub fn count_tool(service: &DocumentService) -> Result<Tool, ToolBuilderError> {
    let exec = executor(service, |service, args| async move {
        let collection = required_str(&args, "collection_name")?;
        let query = string_or(&args, "query", "{}")?;
        let count = service
            .count(collection, &query)
            .await
            .map_err(failed("counting documents"))?;
        Ok(format!("Found {count} documents matching query"))
    });

    ToolBuilder::new()
        .function_name(COUNT)
        .function_description("Count documents matching a JSON query filter.")
        .add_required_property("collection_name", "string", COLLECTION_DESC)
        .add_property_with_default("query", "string", "JSON query filter", "{}")
        .executor(exec)
        .build()
}

pub fn delete_tool(service: &DocumentService) -> Result<Tool, ToolBuilderError> {
    let exec = executor(service, |service, args| async move {
        let collection = required_str(&args, "collection_name")?;
        let query = required_str(&args, "query")?;
        let deleted = service
            .delete(collection, query)
            .await
            .map_err(failed("deleting from MongoDB"))?;
        Ok(format!("Deleted {deleted} document(s)"))
    });

    ToolBuilder::new()
        .function_name(DELETE)
        .function_description("Delete documents matching a non-empty JSON query filter.")
        .add_required_property("collection_name", "string", COLLECTION_DESC)
        .add_required_property("query", "string", "JSON query filter, must not be empty")
        .executor(exec)
        .build()
}

/// The search and analysis tools handed to retrieval agents.
pub fn document_tools(service: &DocumentService) -> Result<Vec<Tool>, ToolBuilderError> {
    Ok(vec![
        semantic_search_tool(service)?,
        store_document_tool(service)?,
        query_with_context_tool(service)?,
        summarize_collection_tool(service)?,
        find_similar_tool(service)?,
        analyze_trends_tool(service)?,
        semantic_query_tool(service)?,
    ])
}

/// Raw create/read/count/delete access.
pub fn crud_tools(service: &DocumentService) -> Result<Vec<Tool>, ToolBuilderError> {
    Ok(vec![
        write_tool(service)?,
        read_tool(service)?,
        count_tool(service)?,
        delete_tool(service)?,
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::mongo::{MongoStore, StoreConfig};
    use serde_json::json;

    // Argument validation and payload checks never reach the server, so an
    // unconnected handle is enough.
    async fn offline_service() -> DocumentService {
        DocumentService::new(MongoStore::lazy(StoreConfig::default()).await.unwrap())
    }

    #[tokio::test]
    async fn tool_names_are_unique() {
        let service = offline_service().await;
        let mut names: Vec<String> = document_tools(&service)
            .unwrap()
            .into_iter()
            .chain(crud_tools(&service).unwrap())
            .map(|t| t.name().to_string())
            .collect();
        assert_eq!(names.len(), 11);
        names.sort();
        names.dedup();
        assert_eq!(names.len(), 11);
    }

    #[tokio::test]
    async fn missing_arguments_are_reported() {
        let tool = semantic_search_tool(&offline_service().await).unwrap();
        let out = tool.call(json!({"collection_name": "notes"})).await;
        assert!(out.starts_with("Error"));
        assert!(out.contains("'query'"));
    }

    #[tokio::test]
    async fn invalid_write_payloads_fail_before_the_database() {
        let tool = write_tool(&offline_service().await).unwrap();

        let out = tool
            .call(json!({"collection_name": "c", "data": "invalid json string"}))
            .await;
        assert!(out.starts_with("Error"));
        assert!(out.contains("Invalid JSON"));

        let out = tool
            .call(json!({"collection_name": "c", "data": "{\"data\": \"test\"}", "operation": "update"}))
            .await;
        assert!(out.contains("must contain 'filter' and 'update'"));

        let out = tool
            .call(json!({"collection_name": "c", "data": "{}", "operation": "invalid_op"}))
            .await;
        assert!(out.contains("Unsupported operation"));
    }

    #[tokio::test]
    async fn empty_delete_filter_is_refused() {
        let tool = delete_tool(&offline_service().await).unwrap();
        let out = tool.call(json!({"collection_name": "c", "query": "{}"})).await;
        assert!(out.starts_with("Error"));
        assert!(out.contains("empty filter"));
    }

    #[tokio::test]
    async fn invalid_read_query_is_reported() {
        let tool = read_tool(&offline_service().await).unwrap();
        let out = tool
            .call(json!({"collection_name": "c", "query": "invalid query"}))
            .await;
        assert!(out.contains("Invalid JSON"));
    }

    #[tokio::test]
    async fn zero_limits_are_refused() {
        let service = offline_service().await;

        let out = read_tool(&service)
            .unwrap()
            .call(json!({"collection_name": "c", "limit": 0}))
            .await;
        assert!(out.starts_with("Error"));
        assert!(out.contains("'limit' must be a positive integer"));

        let out = summarize_collection_tool(&service)
            .unwrap()
            .call(json!({"collection_name": "c", "max_docs": "0"}))
            .await;
        assert!(out.contains("'max_docs' must be a positive integer"));
    }
}

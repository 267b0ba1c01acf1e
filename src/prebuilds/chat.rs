use super::{prompts::CHAT_INSTRUCTION, AgentPrebuild};
use crate::{
    agent::{AgentBuildError, AgentBuilder, BuiltinTool, ModelConfig},
    documents::{
        DocumentService, DEFAULT_CONTEXT_LIMIT, DEFAULT_SEARCH_LIMIT,
        DEFAULT_SIMILARITY_THRESHOLD, DEFAULT_SUMMARY_DOCS,
    },
    templates::{DateDataSource, Template},
    tools::{
        args::{required_str, string_or},
        document_tools::{executor, failed, pretty},
        Tool, ToolBuilder, ToolBuilderError, ToolExecutionError,
    },
};

fn unsupported(operation: &str) -> ToolExecutionError {
    ToolExecutionError::ExecutionFailed(format!("Operation '{operation}' not supported"))
}

/// Delegates search, storage and contextual lookups to the document layer.
pub fn call_mongodb_rag_agent_tool(service: &DocumentService) -> Result<Tool, ToolBuilderError> {
    let default_collection = service.store().config().conversation_collection.clone();
    let fallback = default_collection.clone();
    let exec = executor(service, move |service, args| {
        let fallback = fallback.clone();
        async move {
            let query = required_str(&args, "query")?;
            let operation = string_or(&args, "operation", "search")?;
            let collection = string_or(&args, "collection_name", &fallback)?;
            match operation.as_str() {
                "search" => {
                    let report = service
                        .semantic_search(query, &collection, DEFAULT_SEARCH_LIMIT)
                        .await
                        .map_err(failed("searching documents"))?;
                    pretty(&report)
                }
                "store" => {
                    let receipt = service
                        .store_document(&collection, query, None)
                        .await
                        .map_err(failed("storing document"))?;
                    Ok(receipt.to_string())
                }
                "analyze" => {
                    let report = service
                        .query_with_context(&collection, query, DEFAULT_CONTEXT_LIMIT)
                        .await
                        .map_err(failed("querying documents"))?;
                    pretty(&report)
                }
                other => Err(unsupported(other)),
            }
        }
    });

    ToolBuilder::new()
        .function_name("call_mongodb_rag_agent")
        .function_description(
            "Searches past conversations and documents, stores new content, or retrieves the most relevant documents with a summary.",
        )
        .add_required_property("query", "string", "The query, or the content to store")
        .add_enum_property("operation", "What to do", ["search", "store", "analyze"])
        .add_property_with_default(
            "collection_name",
            "string",
            "MongoDB collection name",
            default_collection,
        )
        .executor(exec)
        .build()
}

/// Delegates summaries and similarity grouping to the document layer.
pub fn call_summarization_agent_tool(service: &DocumentService) -> Result<Tool, ToolBuilderError> {
    let default_collection = service.store().config().conversation_collection.clone();
    let fallback = default_collection.clone();
    let exec = executor(service, move |service, args| {
        let fallback = fallback.clone();
        async move {
            let content = required_str(&args, "content")?;
            let operation = string_or(&args, "operation", "summarize")?;
            let collection = string_or(&args, "collection_name", &fallback)?;
            match operation.as_str() {
                "summarize" => {
                    let summary = service
                        .summarize_collection(&collection, DEFAULT_SUMMARY_DOCS)
                        .await
                        .map_err(failed("summarizing collection"))?;
                    pretty(&summary)
                }
                "organize" => {
                    let similar = service
                        .find_similar(&collection, content, DEFAULT_SIMILARITY_THRESHOLD)
                        .await
                        .map_err(failed("finding similar documents"))?;
                    pretty(&similar)
                }
                other => Err(unsupported(other)),
            }
        }
    });

    ToolBuilder::new()
        .function_name("call_summarization_agent")
        .function_description(
            "Summarizes a collection, or groups its documents by similarity to the given content.",
        )
        .add_required_property("content", "string", "Topic or text the request is about")
        .add_enum_property("operation", "What to do", ["summarize", "organize"])
        .add_property_with_default(
            "collection_name",
            "string",
            "MongoDB collection name",
            default_collection,
        )
        .executor(exec)
        .build()
}

impl AgentPrebuild {
    /// User-facing conversational agent.
    pub fn chat(service: &DocumentService) -> Result<AgentBuilder, AgentBuildError> {
        Ok(AgentBuilder::default()
            .set_name("google_chat")
            .import_model_config(ModelConfig::from_env())
            .set_description(
                "Main conversational agent with web search that keeps conversations in MongoDB.",
            )
            .set_template(Template::new(CHAT_INSTRUCTION, DateDataSource))
            .set_template_value(
                "collection",
                service.store().config().conversation_collection.as_str(),
            )
            .add_builtin(BuiltinTool::GoogleSearch)
            .add_tool(call_mongodb_rag_agent_tool(service)?)
            .add_tool(call_summarization_agent_tool(service)?))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::services::mongo::{MongoStore, StoreConfig};

    async fn service() -> DocumentService {
        DocumentService::new(MongoStore::lazy(StoreConfig::default()).await.unwrap())
    }

    #[tokio::test]
    async fn unsupported_operations_are_errors() {
        let service = service().await;

        let out = call_mongodb_rag_agent_tool(&service)
            .unwrap()
            .call(json!({"query": "x", "operation": "delete"}))
            .await;
        assert_eq!(out, "Error Operation 'delete' not supported");

        let out = call_summarization_agent_tool(&service)
            .unwrap()
            .call(json!({"content": "x", "operation": "translate"}))
            .await;
        assert_eq!(out, "Error Operation 'translate' not supported");
    }

    #[tokio::test]
    async fn collection_defaults_to_conversations() {
        let tool = call_mongodb_rag_agent_tool(&service().await).unwrap();
        let prop = &tool.function.parameters.properties["collection_name"];
        assert_eq!(prop.default, Some(json!("user_conversations")));
    }
}

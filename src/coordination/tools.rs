//! Coordinator workflows exposed as tools. Tools share one coordinator and
//! may run their workflows concurrently.

use std::{future::Future, sync::Arc};

use serde::Serialize;
use serde_json::{json, Value};

use super::{
    coordinator::{DEFAULT_PIPELINE_COLLECTION, DEFAULT_RESEARCH_COLLECTION},
    error::CoordinationError,
    report::AnalysisKind,
    Coordinator,
};
use crate::tools::{
    args::{bool_or, required_str, string_or},
    AsyncToolFn, Tool, ToolBuilder, ToolBuilderError, ToolExecutionError, ToolFuture,
};

pub type SharedCoordinator = Arc<Coordinator>;

/// Success renders the report itself, failure a status envelope naming the
/// failed workflow.
pub fn render_outcome<T: Serialize>(outcome: Result<T, CoordinationError>) -> String {
    let value = match outcome {
        Ok(report) => serde_json::to_value(&report).unwrap_or_else(|e| {
            json!({"status": "error", "error_message": format!("Error encoding report: {e}")})
        }),
        Err(e) => json!({
            "status": "error",
            "error_message": format!("Error {e}"),
            "workflow": e.workflow,
        }),
    };
    serde_json::to_string_pretty(&value).unwrap_or_else(|e| format!("Error encoding report: {e}"))
}

fn executor<F, Fut>(coordinator: &SharedCoordinator, run: F) -> AsyncToolFn
where
    F: Fn(SharedCoordinator, Value) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<String, ToolExecutionError>> + Send + 'static,
{
    let coordinator = coordinator.clone();
    let run = Arc::new(run);
    Arc::new(move |args: Value| -> ToolFuture {
        let coordinator = coordinator.clone();
        let run = run.clone();
        Box::pin(async move { run(coordinator, args).await })
    })
}

pub fn user_query_tool(coordinator: &SharedCoordinator) -> Result<Tool, ToolBuilderError> {
    let exec = executor(coordinator, |coordinator, args| async move {
        let query = required_str(&args, "user_query")?;
        let include_context = bool_or(&args, "include_context", true)?;
        let outcome = coordinator
            .coordinate_user_interaction(query, include_context)
            .await;
        Ok(render_outcome(outcome))
    });

    ToolBuilder::new()
        .function_name("coordinate_agents_for_user_query")
        .function_description(
            "Answers a user query: looks up related past conversations, forms a response and \
             stores the exchange for future context.",
        )
        .add_required_property("user_query", "string", "The user's question or request")
        .add_property_with_default(
            "include_context",
            "boolean",
            "Whether to retrieve past conversation context",
            true,
        )
        .executor(exec)
        .build()
}

pub fn search_and_store_tool(coordinator: &SharedCoordinator) -> Result<Tool, ToolBuilderError> {
    let exec = executor(coordinator, |coordinator, args| async move {
        let query = required_str(&args, "query")?;
        let collection = string_or(&args, "collection_name", DEFAULT_RESEARCH_COLLECTION)?;
        let outcome = coordinator
            .coordinate_search_and_store(query, &collection)
            .await;
        Ok(render_outcome(outcome))
    });

    ToolBuilder::new()
        .function_name("coordinate_search_and_store")
        .function_description(
            "Searches the web, stores the results in MongoDB and searches the stored results.",
        )
        .add_required_property("query", "string", "The web search query")
        .add_property_with_default(
            "collection_name",
            "string",
            "Collection to store results in",
            DEFAULT_RESEARCH_COLLECTION,
        )
        .executor(exec)
        .build()
}

pub fn research_pipeline_tool(coordinator: &SharedCoordinator) -> Result<Tool, ToolBuilderError> {
    let exec = executor(coordinator, |coordinator, args| async move {
        let topic = required_str(&args, "research_topic")?;
        let collection = string_or(&args, "collection_name", DEFAULT_PIPELINE_COLLECTION)?;
        let outcome = coordinator
            .intelligent_research_pipeline(topic, &collection)
            .await;
        Ok(render_outcome(outcome))
    });

    ToolBuilder::new()
        .function_name("intelligent_research_pipeline")
        .function_description(
            "Researches a topic in five phases (overview, trends, practices, challenges, \
             outlook), stores every phase, then summarizes and analyzes the collection.",
        )
        .add_required_property("research_topic", "string", "The topic to research")
        .add_property_with_default(
            "collection_name",
            "string",
            "Collection for the research phases",
            DEFAULT_PIPELINE_COLLECTION,
        )
        .executor(exec)
        .build()
}

pub fn research_and_organize_tool(
    coordinator: &SharedCoordinator,
) -> Result<Tool, ToolBuilderError> {
    let exec = executor(coordinator, |coordinator, args| async move {
        let topic = required_str(&args, "research_topic")?;
        let collection = string_or(&args, "collection_name", DEFAULT_RESEARCH_COLLECTION)?;
        let outcome = coordinator
            .coordinate_research_and_organize(topic, &collection)
            .await;
        Ok(render_outcome(outcome))
    });

    ToolBuilder::new()
        .function_name("research_and_organize_workflow")
        .function_description(
            "Searches for a topic, stores the findings, summarizes the collection and finds \
             related earlier research.",
        )
        .add_required_property("research_topic", "string", "The topic to research")
        .add_property_with_default(
            "collection_name",
            "string",
            "Collection for the research note",
            DEFAULT_RESEARCH_COLLECTION,
        )
        .executor(exec)
        .build()
}

pub fn knowledge_base_tool(coordinator: &SharedCoordinator) -> Result<Tool, ToolBuilderError> {
    let exec = executor(coordinator, |coordinator, args| async move {
        let question = required_str(&args, "question")?;
        let collection = string_or(&args, "collection_name", DEFAULT_RESEARCH_COLLECTION)?;
        let outcome = coordinator
            .query_knowledge_base(question, &collection)
            .await;
        Ok(render_outcome(outcome))
    });

    ToolBuilder::new()
        .function_name("query_knowledge_base")
        .function_description(
            "Answers a question from stored research, using earlier questions and topics as \
             context.",
        )
        .add_required_property("question", "string", "The question to answer")
        .add_property_with_default(
            "collection_name",
            "string",
            "Collection to query",
            DEFAULT_RESEARCH_COLLECTION,
        )
        .executor(exec)
        .build()
}

pub fn document_analysis_tool(
    coordinator: &SharedCoordinator,
    default_collection: &str,
) -> Result<Tool, ToolBuilderError> {
    let fallback = default_collection.to_string();
    let exec = executor(coordinator, move |coordinator, args| {
        let fallback = fallback.clone();
        async move {
            let collection = string_or(&args, "collection_name", &fallback)?;
            let analysis = string_or(&args, "analysis", "summary")?;
            let outcome = coordinator
                .analyze_stored_documents(&collection, &analysis)
                .await;
            Ok(render_outcome(outcome))
        }
    });

    ToolBuilder::new()
        .function_name("analyze_stored_documents")
        .function_description(
            "Analyzes a stored collection: a content summary, creation trends, or both.",
        )
        .add_property_with_default(
            "collection_name",
            "string",
            "Collection to analyze",
            default_collection,
        )
        .add_enum_property("analysis", "Kind of analysis", AnalysisKind::ALL)
        .executor(exec)
        .build()
}

/// All coordinator workflows as tools.
pub fn coordination_tools(coordinator: &SharedCoordinator) -> Result<Vec<Tool>, ToolBuilderError> {
    Ok(vec![
        user_query_tool(coordinator)?,
        search_and_store_tool(coordinator)?,
        research_pipeline_tool(coordinator)?,
        research_and_organize_tool(coordinator)?,
        knowledge_base_tool(coordinator)?,
        document_analysis_tool(coordinator, coordinator.conversation_collection())?,
    ])
}

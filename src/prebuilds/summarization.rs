use super::{prompts::SUMMARIZATION_INSTRUCTION, AgentPrebuild};
use crate::{
    agent::{AgentBuildError, AgentBuilder, ModelConfig},
    documents::{DocumentService, DEFAULT_SIMILARITY_THRESHOLD, DEFAULT_TIME_FIELD},
    templates::{DateDataSource, Template},
    tools::{
        args::{optional_str, required_str, string_or},
        document_tools,
        document_tools::{executor, failed, pretty},
        Tool, ToolBuilder, ToolBuilderError, ToolExecutionError,
    },
};

const PATTERN_DOCS: u32 = 50;
const THEMATIC_DOCS: u32 = 30;
const STRATEGIES: [&str; 3] = ["thematic", "temporal", "similarity"];

/// Collection summary over a wide sample, prefixed for the reader.
pub fn analyze_document_patterns_tool(service: &DocumentService) -> Result<Tool, ToolBuilderError> {
    let exec = executor(service, |service, args| async move {
        let collection = required_str(&args, "collection_name")?;
        let summary = service
            .summarize_collection(collection, PATTERN_DOCS)
            .await
            .map_err(failed("analyzing document patterns"))?;
        Ok(format!(
            "Document Pattern Analysis for '{collection}':\n{}",
            pretty(&summary)?
        ))
    });

    ToolBuilder::new()
        .function_name("analyze_document_patterns")
        .function_description(
            "Analyzes document types, titles and recent activity in a collection to suggest an organization.",
        )
        .add_required_property("collection_name", "string", "MongoDB collection to analyze")
        .executor(exec)
        .build()
}

/// Thematic, temporal or similarity view of a collection.
pub fn organize_content_tool(service: &DocumentService) -> Result<Tool, ToolBuilderError> {
    let exec = executor(service, |service, args| async move {
        let collection = required_str(&args, "collection_name")?;
        let strategy = string_or(&args, "organization_strategy", STRATEGIES[0])?;
        match strategy.as_str() {
            "thematic" => {
                let summary = service
                    .summarize_collection(collection, THEMATIC_DOCS)
                    .await
                    .map_err(failed("organizing content"))?;
                pretty(&summary)
            }
            "temporal" => {
                let trends = service
                    .analyze_trends(collection, DEFAULT_TIME_FIELD)
                    .await
                    .map_err(failed("organizing content"))?;
                pretty(&trends)
            }
            "similarity" => {
                let Some(reference) = optional_str(&args, "reference_text")? else {
                    return Err(ToolExecutionError::ArgumentParsingError(
                        "'reference_text' is required for the similarity strategy".into(),
                    ));
                };
                let similar = service
                    .find_similar(collection, reference, DEFAULT_SIMILARITY_THRESHOLD)
                    .await
                    .map_err(failed("organizing content"))?;
                pretty(&similar)
            }
            other => Err(ToolExecutionError::ExecutionFailed(format!(
                "Organization strategy '{other}' not implemented"
            ))),
        }
    });

    ToolBuilder::new()
        .function_name("organize_mongodb_content")
        .function_description(
            "Organizes a collection by theme (summary), by time (creation trends) or by similarity to a reference text.",
        )
        .add_required_property("collection_name", "string", "MongoDB collection to organize")
        .add_enum_property("organization_strategy", "How to organize the content", STRATEGIES)
        .add_property(
            "reference_text",
            "string",
            "Reference text, required for the similarity strategy",
        )
        .executor(exec)
        .build()
}

impl AgentPrebuild {
    /// Summarization and organization agent.
    pub fn summarization(service: &DocumentService) -> Result<AgentBuilder, AgentBuildError> {
        Ok(AgentBuilder::default()
            .set_name("google_summarization_agent")
            .import_model_config(ModelConfig::from_env())
            .set_description(
                "Summarizes stored documents, analyzes their patterns and organizes collections.",
            )
            .set_template(Template::new(SUMMARIZATION_INSTRUCTION, DateDataSource))
            .set_template_value(
                "collection",
                service.store().config().conversation_collection.as_str(),
            )
            .add_tools(document_tools(service)?)
            .add_tool(analyze_document_patterns_tool(service)?)
            .add_tool(organize_content_tool(service)?))
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
    async fn unknown_strategy_is_reported() {
        let tool = organize_content_tool(&service().await).unwrap();
        let out = tool
            .call(json!({"collection_name": "notes", "organization_strategy": "hierarchical"}))
            .await;
        assert_eq!(out, "Error Organization strategy 'hierarchical' not implemented");
    }

    #[tokio::test]
    async fn similarity_needs_reference_text() {
        let tool = organize_content_tool(&service().await).unwrap();
        let err = tool
            .execute(json!({"collection_name": "notes", "organization_strategy": "similarity"}))
            .await
            .unwrap_err();
        assert!(matches!(err, ToolExecutionError::ArgumentParsingError(_)));
    }

    #[tokio::test]
    async fn strategy_defaults_to_thematic() {
        let tool = organize_content_tool(&service().await).unwrap();
        let prop = &tool.function.parameters.properties["organization_strategy"];
        assert_eq!(prop.default, Some(json!("thematic")));
    }
}

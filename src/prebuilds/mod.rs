mod chat;
mod coordinator;
mod prompts;
mod rag;
mod summarization;

use crate::{
    agent::{AgentBuildError, AgentDefinition, ModelConfig},
    coordination::SharedCoordinator,
    documents::DocumentService,
};

pub use chat::{call_mongodb_rag_agent_tool, call_summarization_agent_tool};
pub use prompts::{
    CHAT_INSTRUCTION, COORDINATOR_INSTRUCTION, RAG_INSTRUCTION, SUMMARIZATION_INSTRUCTION,
};
pub use summarization::{analyze_document_patterns_tool, organize_content_tool};

/// Preconfigured agent builders. Each returns an
/// [`AgentBuilder`](crate::AgentBuilder) with name, model, instruction and
/// tools set, which callers may adjust before building.
pub struct AgentPrebuild;

/// The coordinator and its three sub-agents, built with `model`.
pub async fn agent_roster(
    service: &DocumentService,
    coordinator: &SharedCoordinator,
    model: ModelConfig,
) -> Result<Vec<AgentDefinition>, AgentBuildError> {
    Ok(vec![
        AgentPrebuild::coordinator(service, coordinator)?
            .import_model_config(model.clone())
            .build()
            .await?,
        AgentPrebuild::chat(service)?
            .import_model_config(model.clone())
            .build()
            .await?,
        AgentPrebuild::mongodb_rag(service)?
            .import_model_config(model.clone())
            .build()
            .await?,
        AgentPrebuild::summarization(service)?
            .import_model_config(model)
            .build()
            .await?,
    ])
}

#[cfg(test)]
mod tests {
    use std::{collections::HashSet, sync::Arc};

    use super::*;
    use crate::{
        agent::{AgentTool, DEFAULT_MODEL},
        coordination::Coordinator,
        services::{
            mongo::{MongoStore, StoreConfig},
            search::{GoogleSearchClient, SearchConfig},
        },
    };

    async fn service() -> DocumentService {
        DocumentService::new(MongoStore::lazy(StoreConfig::default()).await.unwrap())
    }

    fn search() -> GoogleSearchClient {
        GoogleSearchClient::new(SearchConfig {
            api_key: Some("test-key".into()),
            engine_id: Some("test-cx".into()),
            ..Default::default()
        })
        .unwrap()
    }

    #[tokio::test]
    async fn roster_builds_four_agents() {
        let service = service().await;
        let coordinator = Arc::new(Coordinator::new(service.clone(), Arc::new(search())));

        let roster = agent_roster(&service, &coordinator, ModelConfig::default())
            .await
            .unwrap();
        let names: Vec<&str> = roster.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(
            names,
            [
                "a2a_coordinator",
                "google_chat",
                "mongodb_rag_agent",
                "google_summarization_agent"
            ]
        );
        assert!(roster.iter().all(|a| a.model == DEFAULT_MODEL));
        assert!(roster.iter().all(|a| !a.instruction.contains("{{")));

        let names: HashSet<&str> = roster.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names.len(), roster.len());
    }

    #[tokio::test]
    async fn coordinator_references_builtin_search() {
        let service = service().await;
        let coordinator = Arc::new(Coordinator::new(service.clone(), Arc::new(search())));

        let agent = AgentPrebuild::coordinator(&service, &coordinator)
            .unwrap()
            .build()
            .await
            .unwrap();
        assert!(matches!(
            agent.get_tool_ref_by_name("google_search"),
            Some(AgentTool::Builtin(_))
        ));
        assert!(agent.get_tool_ref_by_name("save_document_to_mongodb").is_some());
        assert!(agent.get_tool_ref_by_name("query_knowledge_base").is_some());
        assert!(agent.instruction.contains("'user_conversations'"));
    }
}

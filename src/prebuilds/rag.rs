use super::{prompts::RAG_INSTRUCTION, AgentPrebuild};
use crate::{
    agent::{AgentBuildError, AgentBuilder, ModelConfig},
    documents::DocumentService,
    templates::{DateDataSource, Template},
    tools::{crud_tools, document_tools},
};

impl AgentPrebuild {
    /// Document storage and retrieval agent with every document and CRUD tool.
    pub fn mongodb_rag(service: &DocumentService) -> Result<AgentBuilder, AgentBuildError> {
        Ok(AgentBuilder::default()
            .set_name("mongodb_rag_agent")
            .import_model_config(ModelConfig::from_env())
            .set_description(
                "Stores documents in MongoDB and retrieves them with text search for grounded answers.",
            )
            .set_template(Template::new(RAG_INSTRUCTION, DateDataSource))
            .set_template_value(
                "collection",
                service.store().config().conversation_collection.as_str(),
            )
            .add_tools(document_tools(service)?)
            .add_tools(crud_tools(service)?))
    }
}

use super::{prompts::COORDINATOR_INSTRUCTION, AgentPrebuild};
use crate::{
    agent::{AgentBuildError, AgentBuilder, BuiltinTool, ModelConfig},
    coordination::{coordination_tools, SharedCoordinator},
    documents::DocumentService,
    templates::{DateDataSource, Template},
    tools::status_tools,
};

impl AgentPrebuild {
    /// Root agent: web search, status-envelope document tools and the
    /// coordinator workflows.
    pub fn coordinator(
        service: &DocumentService,
        coordinator: &SharedCoordinator,
    ) -> Result<AgentBuilder, AgentBuildError> {
        Ok(AgentBuilder::default()
            .set_name("a2a_coordinator")
            .import_model_config(ModelConfig::from_env())
            .set_description(
                "Coordinates web search, document storage, retrieval and summarization workflows.",
            )
            .set_template(Template::new(COORDINATOR_INSTRUCTION, DateDataSource))
            .set_template_value(
                "collection",
                service.store().config().conversation_collection.as_str(),
            )
            .add_builtin(BuiltinTool::GoogleSearch)
            .add_tools(status_tools(service)?)
            .add_tools(coordination_tools(coordinator)?))
    }
}

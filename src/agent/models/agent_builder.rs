use std::collections::{HashMap, HashSet};

use crate::{
    agent::models::{
        agent::{AgentDefinition, AgentTool, BuiltinTool},
        configs::ModelConfig,
        error::AgentBuildError,
    },
    templates::Template,
    tools::Tool,
};

/// A builder for [`AgentDefinition`].
///
/// Name, model and an instruction (raw or templated) are required. When a
/// template is used, `{{tools}}` is filled with the comma separated tool
/// names unless the caller supplies it.
///
/// ```
/// use docagent::AgentBuilder;
///
/// async {
///     let agent = AgentBuilder::default()
///         .set_name("helper")
///         .set_model("gemini-2.0-flash-live-001")
///         .set_instruction("Answer briefly.")
///         .build()
///         .await;
/// };
/// ```
#[derive(Debug, Default)]
pub struct AgentBuilder {
    name: Option<String>,
    model: Option<String>,
    description: Option<String>,
    instruction: Option<String>,
    template: Option<Template>,
    template_data: HashMap<String, String>,
    tools: Vec<AgentTool>,
}

impl AgentBuilder {
    /// Apply the model selection from a [`ModelConfig`].
    pub fn import_model_config(self, conf: ModelConfig) -> Self {
        self.set_model(conf.model)
    }

    pub fn set_name<T>(mut self, name: T) -> Self
    where
        T: Into<String>,
    {
        self.name = Some(name.into());
        self
    }

    pub fn set_model<T: Into<String>>(mut self, model: T) -> Self {
        self.model = Some(model.into());
        self
    }

    /// One-line description other agents see when delegating.
    pub fn set_description<T: Into<String>>(mut self, description: T) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Raw instruction. A template set with [`set_template`](Self::set_template) takes precedence.
    pub fn set_instruction<T: Into<String>>(mut self, instruction: T) -> Self {
        self.instruction = Some(instruction.into());
        self
    }

    pub fn set_template(mut self, template: Template) -> Self {
        self.template = Some(template);
        self
    }

    /// Value for a `{{key}}` placeholder of the instruction template.
    pub fn set_template_value<K, V>(mut self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.template_data.insert(key.into(), value.into());
        self
    }

    pub fn add_tool(mut self, tool: Tool) -> Self {
        self.tools.push(AgentTool::Function(tool));
        self
    }

    pub fn add_tools<I>(mut self, tools: I) -> Self
    where
        I: IntoIterator<Item = Tool>,
    {
        self.tools.extend(tools.into_iter().map(AgentTool::Function));
        self
    }

    /// Reference a tool the runtime provides.
    pub fn add_builtin(mut self, builtin: BuiltinTool) -> Self {
        self.tools.push(AgentTool::Builtin(builtin));
        self
    }

    /// Finalize all settings and produce an [`AgentDefinition`].
    pub async fn build(self) -> Result<AgentDefinition, AgentBuildError> {
        let name = self.name.ok_or(AgentBuildError::NameNotSet)?;
        let model = self.model.ok_or(AgentBuildError::ModelNotSet)?;

        let mut seen = HashSet::new();
        if let Some(dup) = self.tools.iter().find(|t| !seen.insert(t.name().to_string())) {
            return Err(AgentBuildError::DuplicateTool(dup.name().to_string()));
        }

        let instruction = match (self.template, self.instruction) {
            (Some(template), _) => {
                let mut data = self.template_data;
                data.entry("tools".to_string()).or_insert_with(|| {
                    self.tools
                        .iter()
                        .map(AgentTool::name)
                        .collect::<Vec<_>>()
                        .join(", ")
                });
                template.compile(&data).await
            }
            (None, Some(instruction)) => instruction,
            (None, None) => return Err(AgentBuildError::InstructionNotSet),
        };

        Ok(AgentDefinition {
            description: self.description.unwrap_or_else(|| format!("Agent {name}")),
            name,
            model,
            instruction,
            tools: self.tools,
        })
    }
}

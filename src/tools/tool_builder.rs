use std::collections::BTreeMap;

use serde_json::Value;

use super::tool::{AsyncToolFn, Function, FunctionParameters, Property, Tool, ToolType};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolBuilderError {
    MissingFunctionName,
    MissingFunctionDescription,
    MissingExecutor,
    /// A required property was never declared.
    UnknownRequiredProperty(String),
}

impl std::fmt::Display for ToolBuilderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ToolBuilderError::MissingFunctionName => write!(f, "Function name is required."),
            ToolBuilderError::MissingFunctionDescription => {
                write!(f, "Function description is required.")
            }
            ToolBuilderError::MissingExecutor => {
                write!(f, "Executor function is required for the tool.")
            }
            ToolBuilderError::UnknownRequiredProperty(name) => {
                write!(f, "Required property '{name}' has no definition.")
            }
        }
    }
}

impl std::error::Error for ToolBuilderError {}

#[derive(Default)]
pub struct ToolBuilder {
    function_name: Option<String>,
    function_description: Option<String>,
    function_properties: BTreeMap<String, Property>,
    function_required: Vec<String>,
    executor: Option<AsyncToolFn>,
}

impl std::fmt::Debug for ToolBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolBuilder")
            .field("function_name", &self.function_name)
            .field("function_description", &self.function_description)
            .field("function_properties", &self.function_properties)
            .field("function_required", &self.function_required)
            .field("executor", &self.executor.as_ref().map(|_| "<async_fn>"))
            .finish()
    }
}

impl ToolBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the name of the function for the tool. (Required)
    pub fn function_name(mut self, name: impl Into<String>) -> Self {
        self.function_name = Some(name.into());
        self
    }

    /// Sets the description of the function for the tool. (Required)
    pub fn function_description(mut self, description: impl Into<String>) -> Self {
        self.function_description = Some(description.into());
        self
    }

    fn insert(mut self, name: String, property: Property) -> Self {
        self.function_properties.insert(name, property);
        self
    }

    /// Adds an optional property to the function's parameters.
    ///
    /// `property_type` is a JSON schema type such as `"string"` or `"integer"`.
    pub fn add_property(
        self,
        name: impl Into<String>,
        property_type: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        self.insert(
            name.into(),
            Property {
                property_type: property_type.into(),
                description: description.into(),
                default: None,
                allowed_values: None,
            },
        )
    }

    /// Adds an optional property whose value defaults to `default` when omitted.
    pub fn add_property_with_default(
        self,
        name: impl Into<String>,
        property_type: impl Into<String>,
        description: impl Into<String>,
        default: impl Into<Value>,
    ) -> Self {
        self.insert(
            name.into(),
            Property {
                property_type: property_type.into(),
                description: description.into(),
                default: Some(default.into()),
                allowed_values: None,
            },
        )
    }

    /// Adds a string property restricted to `values`, defaulting to the first.
    pub fn add_enum_property<I, S>(
        self,
        name: impl Into<String>,
        description: impl Into<String>,
        values: I,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let values: Vec<String> = values.into_iter().map(Into::into).collect();
        self.insert(
            name.into(),
            Property {
                property_type: "string".into(),
                description: description.into(),
                default: values.first().cloned().map(Value::String),
                allowed_values: Some(values),
            },
        )
    }

    /// Adds a property and marks it as required.
    pub fn add_required_property(
        mut self,
        name: impl Into<String>,
        property_type: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        let name = name.into();
        self.function_required.push(name.clone());
        self.add_property(name, property_type, description)
    }

    /// Sets the asynchronous executor function for the tool. (Required for building)
    pub fn executor(mut self, exec: AsyncToolFn) -> Self {
        self.executor = Some(exec);
        self
    }

    /// Consumes the builder and attempts to create a `Tool`.
    pub fn build(self) -> Result<Tool, ToolBuilderError> {
        let name = self
            .function_name
            .ok_or(ToolBuilderError::MissingFunctionName)?;
        let description = self
            .function_description
            .ok_or(ToolBuilderError::MissingFunctionDescription)?;
        let executor = self.executor.ok_or(ToolBuilderError::MissingExecutor)?;

        if let Some(missing) = self
            .function_required
            .iter()
            .find(|r| !self.function_properties.contains_key(*r))
        {
            return Err(ToolBuilderError::UnknownRequiredProperty(missing.clone()));
        }

        Ok(Tool {
            tool_type: ToolType::Function,
            function: Function {
                name,
                description,
                parameters: FunctionParameters {
                    param_type: "object".to_string(),
                    properties: self.function_properties,
                    required: self.function_required,
                },
            },
            executor,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::ToolFuture;
    use std::sync::Arc;

    fn create_dummy_executor() -> AsyncToolFn {
        Arc::new(|_args: Value| -> ToolFuture {
            Box::pin(async { Ok("dummy execution".to_string()) })
        })
    }

    #[test]
    fn tool_builder_valid_tool() {
        let tool = ToolBuilder::new()
            .function_name("semantic_search_documents")
            .function_description("Search stored documents")
            .add_required_property("query", "string", "Search query")
            .add_property_with_default("limit", "integer", "Maximum results", 5)
            .executor(create_dummy_executor())
            .build()
            .unwrap();

        assert_eq!(tool.function.name, "semantic_search_documents");
        let params = &tool.function.parameters;
        assert_eq!(params.properties["query"].property_type, "string");
        assert_eq!(params.properties["limit"].default, Some(Value::from(5)));
        assert_eq!(params.required, vec!["query".to_string()]);
    }

    #[test]
    fn enum_property_defaults_to_first_value() {
        let tool = ToolBuilder::new()
            .function_name("write_to_mongodb")
            .function_description("Write documents")
            .add_enum_property("operation", "Write mode", ["insert", "update", "upsert"])
            .executor(create_dummy_executor())
            .build()
            .unwrap();

        let prop = &tool.function.parameters.properties["operation"];
        assert_eq!(prop.default, Some(Value::from("insert")));
        assert_eq!(prop.allowed_values.as_ref().map(Vec::len), Some(3));
        let json = serde_json::to_value(prop).unwrap();
        assert_eq!(json["enum"][2], "upsert");
    }

    #[test]
    fn tool_builder_missing_parts_fail() {
        let err = ToolBuilder::new()
            .function_description("A tool missing a name")
            .executor(create_dummy_executor())
            .build()
            .unwrap_err();
        assert_eq!(err, ToolBuilderError::MissingFunctionName);

        let err = ToolBuilder::new()
            .function_name("no_desc")
            .executor(create_dummy_executor())
            .build()
            .unwrap_err();
        assert_eq!(err, ToolBuilderError::MissingFunctionDescription);

        let err = ToolBuilder::new()
            .function_name("no_exec")
            .function_description("A tool missing an executor")
            .build()
            .unwrap_err();
        assert_eq!(err, ToolBuilderError::MissingExecutor);
    }
}

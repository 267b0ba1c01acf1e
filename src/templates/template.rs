use std::{collections::HashMap, fmt};

use super::TemplateDataSource;

/// Text with `{{key}}` placeholders.
///
/// Values from the data source are applied first, caller values after, so a
/// caller can't override a data source key that was already substituted.
pub struct Template {
    content: String,
    data_source: Option<Box<dyn TemplateDataSource>>,
}

impl Template {
    pub fn new<D: TemplateDataSource + 'static>(content: &str, data_source: D) -> Self {
        Self {
            content: content.to_string(),
            data_source: Some(Box::new(data_source)),
        }
    }

    pub fn simple<T>(content: T) -> Self
    where
        T: Into<String>,
    {
        Self {
            content: content.into(),
            data_source: None,
        }
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// Placeholder names in order of first appearance.
    pub fn placeholders(&self) -> Vec<String> {
        let mut found: Vec<String> = Vec::new();
        let mut rest = self.content.as_str();
        while let Some(start) = rest.find("{{") {
            let after = &rest[start + 2..];
            let Some(end) = after.find("}}") else {
                break;
            };
            let key = after[..end].trim();
            if !key.is_empty() && !found.iter().any(|k| k == key) {
                found.push(key.to_string());
            }
            rest = &after[end + 2..];
        }
        found
    }

    pub async fn compile(&self, data: &HashMap<String, String>) -> String {
        let mut filled = self.content.clone();

        if let Some(source) = &self.data_source {
            for (key, value) in source.get_values().await {
                filled = filled.replace(&format!("{{{{{key}}}}}"), &value);
            }
        }

        for (key, value) in data {
            filled = filled.replace(&format!("{{{{{key}}}}}"), value);
        }

        filled
    }
}

impl Clone for Template {
    fn clone(&self) -> Self {
        Self {
            content: self.content.clone(),
            data_source: self.data_source.as_ref().map(|d| d.clone_data_source()),
        }
    }
}

impl fmt::Debug for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Template")
            .field("content", &self.content)
            .field(
                "data_source",
                &self.data_source.as_ref().map(|_| "Box<dyn TemplateDataSource>"),
            )
            .finish()
    }
}

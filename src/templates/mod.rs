mod data_source;
mod template;

pub use self::{
    data_source::{DateDataSource, TemplateDataSource},
    template::Template,
};

#[cfg(test)]
mod tests {
    use super::*;
    use std::{collections::HashMap, future::Future, pin::Pin};

    #[derive(Clone)]
    pub struct MockDataSource {
        data: HashMap<String, String>,
    }

    impl TemplateDataSource for MockDataSource {
        fn get_values(&self) -> Pin<Box<dyn Future<Output = HashMap<String, String>> + Send>> {
            let data = self.data.clone();
            Box::pin(async move { data })
        }

        fn clone_data_source(&self) -> Box<dyn TemplateDataSource> {
            Box::new(self.clone())
        }
    }

    #[tokio::test]
    async fn compile_merges_source_and_caller_values() {
        let source = MockDataSource {
            data: HashMap::from([("collection".to_string(), "research_data".to_string())]),
        };
        let template = Template::new(
            "Default collection: {{collection}}. Tools: {{tools}}.",
            source,
        );
        let user_data = HashMap::from([("tools".to_string(), "search, store".to_string())]);

        let compiled = template.clone().compile(&user_data).await;
        assert_eq!(compiled, "Default collection: research_data. Tools: search, store.");
    }

    #[tokio::test]
    async fn unknown_placeholders_are_left_alone() {
        let template = Template::simple("Hello {{name}}, today is {{current_date}}");
        let compiled = template.compile(&HashMap::new()).await;
        assert_eq!(compiled, "Hello {{name}}, today is {{current_date}}");
        assert_eq!(template.placeholders(), vec!["name", "current_date"]);
    }

    #[tokio::test]
    async fn date_source_fills_current_date() {
        let template = Template::new("Year {{current_year}} / {{current_date}}", DateDataSource);
        let compiled = template.compile(&HashMap::new()).await;
        assert!(!compiled.contains("{{"));
        assert_eq!(compiled.len(), "Year 2025 / 2025-08-02".len());
    }
}

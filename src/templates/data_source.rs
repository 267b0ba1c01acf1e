use std::{collections::HashMap, future::Future, pin::Pin};

use chrono::Utc;

/// Supplies placeholder values at compile time, e.g. the current date.
pub trait TemplateDataSource: Send + Sync {
    fn get_values(&self) -> Pin<Box<dyn Future<Output = HashMap<String, String>> + Send>>;
    fn clone_data_source(&self) -> Box<dyn TemplateDataSource>;
}

/// Fills `{{current_date}}` (`YYYY-MM-DD`) and `{{current_year}}` in UTC.
#[derive(Debug, Clone, Copy, Default)]
pub struct DateDataSource;

impl TemplateDataSource for DateDataSource {
    fn get_values(&self) -> Pin<Box<dyn Future<Output = HashMap<String, String>> + Send>> {
        Box::pin(async move {
            let now = Utc::now();
            HashMap::from([
                ("current_date".to_string(), now.format("%Y-%m-%d").to_string()),
                ("current_year".to_string(), now.format("%Y").to_string()),
            ])
        })
    }

    fn clone_data_source(&self) -> Box<dyn TemplateDataSource> {
        Box::new(*self)
    }
}

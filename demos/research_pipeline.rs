//! Runs the research pipeline for a topic and prints progress as it happens.
//!
//! ```text
//! MONGODB_URI=mongodb://localhost:27017 GOOGLE_API_KEY=... GOOGLE_CSE_ID=... \
//!     cargo run --example research_pipeline -- "rust async runtimes"
//! ```

use std::{error::Error, sync::Arc};

use docagent::{
    coordination::DEFAULT_PIPELINE_COLLECTION, init_default_tracing, Coordinator,
    DocumentService, GoogleSearchClient, MongoStore, NotificationContent, SearchConfig,
    StoreConfig,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    init_default_tracing();

    let topic = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "vector databases".to_string());

    let store = MongoStore::connect(StoreConfig::from_env()).await?;
    let service = DocumentService::new(store);
    let search = GoogleSearchClient::new(SearchConfig::from_env())?;

    let (coordinator, mut notifications) =
        Coordinator::new(service, Arc::new(search)).with_notifications();

    let printer = tokio::spawn(async move {
        while let Some(msg) = notifications.recv().await {
            match msg.content {
                NotificationContent::StepStarted { step, .. } => println!("-> {step}"),
                NotificationContent::StepFinished { step, success, .. } => {
                    println!("<- {step} ({})", if success { "ok" } else { "failed" })
                }
                NotificationContent::WorkflowDone {
                    workflow, success, ..
                } => println!("{workflow} finished, success: {success}"),
            }
        }
    });

    let report = coordinator
        .intelligent_research_pipeline(&topic, DEFAULT_PIPELINE_COLLECTION)
        .await?;
    println!("{}", serde_json::to_string_pretty(&report)?);

    let answer = coordinator
        .query_knowledge_base(&format!("What are the main challenges of {topic}?"), DEFAULT_PIPELINE_COLLECTION)
        .await?;
    for insight in &answer.rag_response.rag_insights {
        println!("#{} {} ({:.3})", insight.rank, insight.title, insight.relevance);
    }

    drop(coordinator);
    printer.await?;
    Ok(())
}

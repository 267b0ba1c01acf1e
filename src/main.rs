use std::{process::ExitCode, sync::Arc};

use serde_json::{json, Value};
use tracing::{error, info, warn};

use docagent::{
    agent_roster, init_default_tracing, Coordinator, DisabledSearch, DocumentService,
    GoogleSearchClient, ModelConfig, MongoStore, SearchConfig, StoreConfig, WebSearch,
};

const USAGE: &str = "usage: docagent [ping|manifest]";

#[tokio::main]
async fn main() -> ExitCode {
    init_default_tracing();

    let command = std::env::args().nth(1).unwrap_or_else(|| "manifest".into());
    let config = StoreConfig::from_env();

    match command.as_str() {
        "ping" => ping(config).await,
        "manifest" => manifest(config).await,
        "-h" | "--help" | "help" => {
            println!("{USAGE}");
            ExitCode::SUCCESS
        }
        other => {
            eprintln!("unknown command '{other}'\n{USAGE}");
            ExitCode::FAILURE
        }
    }
}

async fn ping(config: StoreConfig) -> ExitCode {
    match MongoStore::connect(config).await {
        Ok(store) => {
            println!("connected to database '{}'", store.database_name());
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "ping failed");
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn web_search() -> Arc<dyn WebSearch> {
    match GoogleSearchClient::new(SearchConfig::from_env()) {
        Ok(client) => Arc::new(client),
        Err(e) => {
            warn!(error = %e, "web search disabled");
            Arc::new(DisabledSearch::new(e.to_string()))
        }
    }
}

async fn manifest(config: StoreConfig) -> ExitCode {
    let store = match MongoStore::connect(config).await {
        Ok(store) => store,
        Err(e) => {
            error!(error = %e, "could not connect to MongoDB");
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };

    let service = DocumentService::new(store);
    let coordinator = Arc::new(Coordinator::new(service.clone(), web_search()));

    let roster = match agent_roster(&service, &coordinator, ModelConfig::from_env()).await {
        Ok(roster) => roster,
        Err(e) => {
            error!(error = %e, "could not build agent roster");
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };
    info!(agents = roster.len(), "agent roster built");

    let (root, sub_agents) = match roster.split_first() {
        Some(split) => split,
        None => return ExitCode::FAILURE,
    };
    let mut manifest = root.manifest();
    manifest["sub_agents"] = Value::Array(sub_agents.iter().map(|a| a.manifest()).collect());

    match serde_json::to_string_pretty(&json!({ "root_agent": manifest })) {
        Ok(out) => {
            println!("{out}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}

//! MongoDB document tools and declarative agent definitions for LLM agent
//! runtimes.
//!
//! The runtime runs the conversation. This crate hands it agent manifests
//! and executes the function tools it calls back with.

pub mod agent;
pub mod coordination;
pub mod documents;
pub mod notifications;
pub mod observability;
pub mod prebuilds;
pub mod services;
pub mod templates;
pub mod tools;

pub use agent::*;
pub use coordination::{Coordinator, CoordinationError, SharedCoordinator};
pub use documents::{DocumentError, DocumentService};
pub use notifications::{Notification, NotificationContent, NotificationHandler};
pub use observability::{init_default_tracing, init_json_tracing};
pub use prebuilds::{agent_roster, AgentPrebuild};
pub use services::{
    mongo::{MongoStore, StoreConfig, StoreError},
    search::{DisabledSearch, GoogleSearchClient, SearchConfig, SearchHit, WebSearch},
};
pub use tools::{Tool, ToolBuilder, ToolCall, ToolExecutionError};

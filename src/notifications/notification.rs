use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

/// Progress events emitted while a workflow runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NotificationContent {
    StepStarted {
        workflow: String,
        step: String,
    },
    StepFinished {
        workflow: String,
        step: String,
        success: bool,
    },
    WorkflowDone {
        workflow: String,
        success: bool,
        summary: Option<String>,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    /// Name of the emitting channel, usually the coordinator.
    pub agent: String,
    pub content: NotificationContent,
    pub timestamp_millis: u128,
}

impl Notification {
    pub fn new(agent: String, content: NotificationContent) -> Self {
        Self {
            agent,
            content,
            timestamp_millis: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_millis())
                .unwrap_or_default(),
        }
    }
}

use tokio::sync::mpsc::Sender;

use super::{Notification, NotificationContent};

pub trait NotificationHandler {
    fn get_outgoing_channel(&self) -> Option<&Sender<Notification>>;
    fn get_channel_name(&self) -> &str;

    /// Send a notification with the given content.
    ///
    /// Returns `true` if delivered, `false` when there is no channel or the
    /// receiver is gone.
    async fn notify(&self, content: NotificationContent) -> bool {
        let Some(channel) = self.get_outgoing_channel() else {
            return false;
        };

        match channel
            .send(Notification::new(self.get_channel_name().to_string(), content))
            .await
        {
            Ok(_) => true,
            Err(e) => {
                tracing::error!(error = %e, "Failed sending notification");
                false
            }
        }
    }

    async fn notify_step_started(&self, workflow: &str, step: &str) -> bool {
        self.notify(NotificationContent::StepStarted {
            workflow: workflow.to_string(),
            step: step.to_string(),
        })
        .await
    }

    async fn notify_step_finished(&self, workflow: &str, step: &str, success: bool) -> bool {
        self.notify(NotificationContent::StepFinished {
            workflow: workflow.to_string(),
            step: step.to_string(),
            success,
        })
        .await
    }

    async fn notify_done(&self, workflow: &str, success: bool, summary: Option<String>) -> bool {
        self.notify(NotificationContent::WorkflowDone {
            workflow: workflow.to_string(),
            success,
            summary,
        })
        .await
    }
}

/// Stand-alone sender for code that is not itself a handler.
#[derive(Debug, Clone)]
pub struct NotificationChannel {
    sender: Option<Sender<Notification>>,
    name: String,
}

impl NotificationChannel {
    pub fn new(sender: Option<Sender<Notification>>, name: impl Into<String>) -> Self {
        Self {
            sender,
            name: name.into(),
        }
    }
}

impl NotificationHandler for NotificationChannel {
    fn get_outgoing_channel(&self) -> Option<&Sender<Notification>> {
        self.sender.as_ref()
    }

    fn get_channel_name(&self) -> &str {
        &self.name
    }
}

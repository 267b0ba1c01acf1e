mod handler;
mod notification;

pub use handler::{NotificationChannel, NotificationHandler};
pub use notification::{Notification, NotificationContent};

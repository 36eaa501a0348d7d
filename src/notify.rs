//! User-facing notifications.
//!
//! Notifications are transient: they never block and never retry. Rendering
//! them (toasts, status bars, terminal lines) is up to the embedding
//! application.

use std::sync::Mutex;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    Success(String),
    Error(String),
}

impl Notification {
    pub fn message(&self) -> &str {
        match self {
            Notification::Success(message) | Notification::Error(message) => message,
        }
    }
}

pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);

    fn success(&self, message: String) {
        self.notify(Notification::Success(message));
    }

    fn error(&self, message: String) {
        self.notify(Notification::Error(message));
    }
}

/// Emits notifications as log events.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notification: Notification) {
        match notification {
            Notification::Success(message) => tracing::info!(target: "notify", "{}", message),
            Notification::Error(message) => tracing::warn!(target: "notify", "{}", message),
        }
    }
}

/// Keeps every notification in memory, in emission order.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    notifications: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.notifications
            .lock()
            .map(|n| n.clone())
            .unwrap_or_default()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        if let Ok(mut notifications) = self.notifications.lock() {
            notifications.push(notification);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_keeps_order() {
        let notifier = RecordingNotifier::new();
        notifier.success("a submitted!".to_string());
        notifier.error("Error uploading b. Please try again.".to_string());

        let seen = notifier.notifications();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0], Notification::Success("a submitted!".to_string()));
        assert_eq!(seen[1].message(), "Error uploading b. Please try again.");
    }
}

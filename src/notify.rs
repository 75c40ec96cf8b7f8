//! User-facing notifications.
//!
//! The session controller emits one [`Notification`] per outcome. How it is
//! shown is up to the sink; [`ConsoleNotifier`] prints it to stdout.

use std::time::Duration;

use tracing::{error, info};

/// Display hint for wallet-connected messages.
pub const CONNECTED_DURATION: Duration = Duration::from_secs(5);

/// Display hint for validation and success messages.
pub const STATUS_DURATION: Duration = Duration::from_secs(6);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
    /// How long to keep the message visible. `None` means until dismissed.
    pub duration: Option<Duration>,
}

impl Notification {
    pub fn info(message: impl Into<String>, duration: Duration) -> Self {
        Self {
            kind: NotificationKind::Info,
            message: message.into(),
            duration: Some(duration),
        }
    }

    /// A validation message: shown as an error but auto-dismissed.
    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Error,
            message: message.into(),
            duration: Some(STATUS_DURATION),
        }
    }

    /// A failure from the wallet or the chain; stays until dismissed.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Error,
            message: message.into(),
            duration: None,
        }
    }
}

pub trait NotificationSink: Send + Sync {
    fn notify(&self, notification: Notification);
}

impl<T: NotificationSink + ?Sized> NotificationSink for std::sync::Arc<T> {
    fn notify(&self, notification: Notification) {
        (**self).notify(notification)
    }
}

/// Prints notifications to stdout.
#[derive(Debug, Default)]
pub struct ConsoleNotifier;

impl NotificationSink for ConsoleNotifier {
    fn notify(&self, notification: Notification) {
        match notification.kind {
            NotificationKind::Info => {
                info!(message = %notification.message, "notification");
                println!("[info] {}", notification.message);
            }
            NotificationKind::Error => {
                error!(message = %notification.message, "notification");
                println!("[error] {}", notification.message);
            }
        }
    }
}

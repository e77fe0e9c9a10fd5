//! Fire-and-forget operator notifications.

/// Visual weight of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationVariant {
    /// Operation succeeded.
    Success,
    /// Operation failed.
    Danger,
    /// Neutral progress information.
    Info,
}

/// A single operator-facing notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Headline.
    pub title: String,
    /// Supporting copy.
    pub description: String,
    /// Visual weight.
    pub variant: NotificationVariant,
    /// The operator can dismiss it.
    pub dismissable: bool,
    /// It goes away on its own.
    pub auto_dismiss: bool,
}

impl Notification {
    fn new(title: impl Into<String>, description: impl Into<String>, variant: NotificationVariant) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            variant,
            dismissable: true,
            auto_dismiss: true,
        }
    }

    /// Success notification.
    #[must_use]
    pub fn success(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(title, description, NotificationVariant::Success)
    }

    /// Failure notification.
    #[must_use]
    pub fn danger(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(title, description, NotificationVariant::Danger)
    }

    /// Progress notification.
    #[must_use]
    pub fn info(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(title, description, NotificationVariant::Info)
    }
}

/// Notification sink. Dispatch never fails and is never awaited.
pub trait Notifier: Send + Sync {
    /// Deliver one notification.
    fn dispatch(&self, notification: Notification);
}

use log::{error, info};
use std::sync::mpsc::Sender;

#[derive(Debug, Clone)]
pub enum Notification {
    Error(InnerNotification),
    Info(InnerNotification),
}

#[derive(Debug, Clone)]
pub struct InnerNotification {
    pub text: String,
}

impl InnerNotification {
    pub fn new(text: String) -> Self {
        Self { text }
    }
}

/// Where success/error toasts go. Fire-and-forget; nothing is returned
/// to the caller.
pub trait Notifier {
    fn notify(&self, notification: Notification);

    fn notify_success(&self, text: &str) {
        self.notify(Notification::Info(InnerNotification::new(text.to_owned())));
    }

    fn notify_error(&self, text: &str) {
        self.notify(Notification::Error(InnerNotification::new(text.to_owned())));
    }
}

/// Fallback surface for embedders without a UI, e.g. batch jobs.
#[derive(Debug, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, notification: Notification) {
        match notification {
            Notification::Info(inner) => info!("{}", inner.text),
            Notification::Error(inner) => error!("{}", inner.text),
        }
    }
}

impl Notifier for Sender<Notification> {
    fn notify(&self, notification: Notification) {
        if let Err(err) = self.send(notification) {
            error!("Could not send notification, {err}");
        }
    }
}

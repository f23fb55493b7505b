use crate::notify::interface;

/// Writes notifications to the log instead of delivering them.
pub(crate) struct LoggingNotifier {
    recipient: String,
}

impl LoggingNotifier {
    pub fn new(recipient: String) -> Self {
        Self { recipient }
    }
}

#[async_trait::async_trait]
impl interface::Notifier for LoggingNotifier {
    async fn notify(
        &self,
        notification: &interface::Notification,
    ) -> Result<(), anyhow::Error> {
        ::log::info!(
            "notification for {}: {}\n{}",
            self.recipient,
            notification.subject,
            notification.body
        );
        Ok(())
    }
}

use crate::notify::interface;

pub(crate) struct NoopNotifier;

#[async_trait::async_trait]
impl interface::Notifier for NoopNotifier {
    async fn notify(
        &self,
        _notification: &interface::Notification,
    ) -> Result<(), anyhow::Error> {
        Ok(())
    }
}

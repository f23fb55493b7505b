use crate::notify::interface;
use ::anyhow::Result;
use ::std::time::Duration;

const MAX_ELAPSED: Duration = Duration::from_secs(30);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Posts notifications as JSON to an HTTP endpoint.
///
/// Transport errors and 5xx responses are retried with exponential backoff,
/// any 4xx response is permanent.
pub(crate) struct WebhookNotifier {
    client: ::reqwest::Client,
    url: String,
    recipient: String,
}

impl WebhookNotifier {
    pub fn new(url: String, recipient: String) -> Result<Self> {
        let client = ::reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            client,
            url,
            recipient,
        })
    }
}

#[async_trait::async_trait]
impl interface::Notifier for WebhookNotifier {
    async fn notify(
        &self,
        notification: &interface::Notification,
    ) -> Result<()> {
        let payload = ::serde_json::json!({
            "to": self.recipient,
            "subject": notification.subject,
            "text": notification.body,
        });

        let client = &self.client;
        let url = &self.url;
        let payload = &payload;

        let op = || async move {
            let response = client
                .post(url.as_str())
                .json(payload)
                .send()
                .await
                .map_err(|err| {
                    ::backoff::Error::transient(::anyhow::Error::from(err))
                })?;

            let status = response.status();

            if status.is_success() {
                Ok(())
            } else if status.is_client_error() {
                Err(::backoff::Error::permanent(::anyhow::anyhow!(
                    "webhook rejected notification with {}",
                    status
                )))
            } else {
                ::log::warn!(
                    "temporary webhook failure with status {}",
                    status
                );
                Err(::backoff::Error::transient(::anyhow::anyhow!(
                    "webhook returned {}",
                    status
                )))
            }
        };

        let backoff = ::backoff::ExponentialBackoff {
            max_elapsed_time: Some(MAX_ELAPSED),
            ..Default::default()
        };

        ::backoff::future::retry(backoff, op).await
    }
}
